//! `pth-stencil-2d`: 9-point stencil on the worker pool.
//!
//! The debug level picks the log filter when `RUST_LOG` is unset; level 2
//! enables the per-step grid dump.

use blockgrid_cli::{debug_level_filter, init_tracing, parse_args, PthStencil2d};

fn main() -> anyhow::Result<()> {
    let cli: PthStencil2d = parse_args();
    init_tracing(debug_level_filter(cli.debug));
    cli.run(&mut std::io::stdout().lock())
}
