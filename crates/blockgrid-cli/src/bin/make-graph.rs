//! `make-graph`: write a random weighted adjacency matrix.

use blockgrid_cli::{init_tracing, parse_args, MakeGraph};

fn main() -> anyhow::Result<()> {
    let cli: MakeGraph = parse_args();
    init_tracing("warn");
    cli.run(&mut std::io::stdout().lock())
}
