//! `make-2d`: write a stencil starting grid.

use blockgrid_cli::{init_tracing, parse_args, Make2d};

fn main() -> anyhow::Result<()> {
    let cli: Make2d = parse_args();
    init_tracing("warn");
    cli.run(&mut std::io::stdout().lock())
}
