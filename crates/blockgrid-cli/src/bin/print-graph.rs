//! `print-graph`: print an adjacency matrix.

use blockgrid_cli::{init_tracing, parse_args, PrintGraph};

fn main() -> anyhow::Result<()> {
    let cli: PrintGraph = parse_args();
    init_tracing("warn");
    cli.run(&mut std::io::stdout().lock())
}
