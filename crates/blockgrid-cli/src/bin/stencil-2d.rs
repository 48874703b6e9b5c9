//! `stencil-2d`: serial 9-point stencil with a stacked checkpoint.

use blockgrid_cli::{init_tracing, parse_args, Stencil2d};

fn main() -> anyhow::Result<()> {
    let cli: Stencil2d = parse_args();
    init_tracing("warn");
    cli.run(&mut std::io::stdout().lock())
}
