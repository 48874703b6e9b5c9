//! `floyds`: serial all-pairs shortest paths.

use blockgrid_cli::{init_tracing, parse_args, Floyds};

fn main() -> anyhow::Result<()> {
    let cli: Floyds = parse_args();
    init_tracing("warn");
    cli.run(&mut std::io::stdout().lock())
}
