//! `make-graph-fixture`: write the six-node reference graph.

use blockgrid_cli::{init_tracing, parse_args, MakeGraphFixture};

fn main() -> anyhow::Result<()> {
    let cli: MakeGraphFixture = parse_args();
    init_tracing("warn");
    cli.run(&mut std::io::stdout().lock())
}
