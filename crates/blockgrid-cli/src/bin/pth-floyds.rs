//! `pth-floyds`: all-pairs shortest paths on the worker pool.

use blockgrid_cli::{init_tracing, parse_args, PthFloyds};

fn main() -> anyhow::Result<()> {
    let cli: PthFloyds = parse_args();
    init_tracing("info");
    cli.run(&mut std::io::stdout().lock())
}
