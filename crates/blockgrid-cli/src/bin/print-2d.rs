//! `print-2d`: print a 2-D grid or a stacked checkpoint file.

use blockgrid_cli::{init_tracing, parse_args, Print2d};

fn main() -> anyhow::Result<()> {
    let cli: Print2d = parse_args();
    init_tracing("warn");
    cli.run(&mut std::io::stdout().lock())
}
