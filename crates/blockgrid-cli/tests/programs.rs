//! Integration test: the command-line programs driven in-process.
//!
//! Each test parses a real argument vector, runs the command against
//! files in a temp directory, and checks the files it leaves behind.

use std::path::Path;

use blockgrid_cli::{
    try_args_from, Floyds, Make2d, MakeGraph, MakeGraphFixture, Print2d, PrintGraph, PthFloyds,
    PthStencil2d, Stencil2d,
};
use blockgrid_io::{open_stacked, read_graph, read_grid2d};
use blockgrid_kernels::serial;
use blockgrid_test_utils::six_node_shortest_paths;
use clap::Parser;

fn run<C>(args: &[&str], exec: impl FnOnce(&C, &mut Vec<u8>) -> anyhow::Result<()>) -> String
where
    C: Parser,
{
    let cli: C = try_args_from(args.iter().copied()).unwrap();
    let mut out = Vec::new();
    exec(&cli, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

fn p(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn missing_arguments_print_usage_with_code_1() {
    let exit = try_args_from::<Floyds, _, _>(["floyds", "in.graph"]).unwrap_err();
    assert_eq!(exit.code, 1);
    assert!(exit.text.contains("Usage"), "{}", exit.text);

    let exit = try_args_from::<PthStencil2d, _, _>(["pth-stencil-2d", "5", "a", "b", "3", "2"])
        .unwrap_err();
    assert_eq!(exit.code, 1);

    let exit = try_args_from::<MakeGraph, _, _>(["make-graph", "4", "g", "1.5", "1", "9"])
        .unwrap_err();
    assert_eq!(exit.code, 1);
}

#[test]
fn help_exits_cleanly() {
    let exit = try_args_from::<PthFloyds, _, _>(["pth-floyds", "--help"]).unwrap_err();
    assert_eq!(exit.code, 0);
}

#[test]
fn fixture_solves_serially_and_in_parallel() {
    let dir = tempfile::tempdir().unwrap();
    let graph = dir.path().join("fixture.graph");
    let serial_out = dir.path().join("serial.graph");
    let parallel_out = dir.path().join("parallel.graph");

    run::<MakeGraphFixture>(&["make-graph-fixture", p(&graph)], |c, o| c.run(o));
    let text = run::<Floyds>(&["floyds", p(&graph), p(&serial_out)], |c, o| c.run(o));
    assert!(text.contains("[Compute Time]"));
    for threads in ["1", "2", "3", "6"] {
        run::<PthFloyds>(&["pth-floyds", p(&graph), p(&parallel_out), threads], |c, o| c.run(o));
        assert_eq!(read_graph(&parallel_out).unwrap(), six_node_shortest_paths());
    }
    assert_eq!(read_graph(&serial_out).unwrap(), six_node_shortest_paths());

    let printed = run::<PrintGraph>(&["print-graph", p(&serial_out)], |c, o| c.run(o));
    assert!(printed.contains("0\t2\t5\t3\t6\t9\t\n"), "{printed}");
    assert!(printed.contains("-1\t5\t6\t2\t4\t0\t\n"), "{printed}");
}

#[test]
fn too_many_threads_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let graph = dir.path().join("fixture.graph");
    run::<MakeGraphFixture>(&["make-graph-fixture", p(&graph)], |c, o| c.run(o));

    let cli: PthFloyds =
        try_args_from(["pth-floyds", p(&graph), p(&dir.path().join("out")), "7"]).unwrap();
    let err = cli.run(&mut Vec::new()).unwrap_err();
    assert!(format!("{err:#}").contains("7 workers"), "{err:#}");
    assert!(!dir.path().join("out").exists());
}

#[test]
fn random_graph_is_seeded() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.graph");
    let b = dir.path().join("b.graph");
    let c = dir.path().join("c.graph");
    run::<MakeGraph>(&["make-graph", "30", p(&a), "0.4", "1", "20"], |c, o| c.run(o));
    run::<MakeGraph>(&["make-graph", "30", p(&b), "0.4", "1", "20", "--seed", "1"], |c, o| c.run(o));
    run::<MakeGraph>(&["make-graph", "30", p(&c), "0.4", "1", "20", "--seed", "2"], |c, o| c.run(o));
    assert_eq!(std::fs::read(&a).unwrap(), std::fs::read(&b).unwrap());
    assert_ne!(std::fs::read(&a).unwrap(), std::fs::read(&c).unwrap());

    let serial_out = dir.path().join("serial.graph");
    let parallel_out = dir.path().join("parallel.graph");
    run::<Floyds>(&["floyds", p(&a), p(&serial_out)], |c, o| c.run(o));
    run::<PthFloyds>(&["pth-floyds", p(&a), p(&parallel_out), "4"], |c, o| c.run(o));
    assert_eq!(read_graph(&serial_out).unwrap(), read_graph(&parallel_out).unwrap());
}

#[test]
fn inverted_weight_range_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let cli: MakeGraph =
        try_args_from(["make-graph", "5", p(&dir.path().join("g")), "0.5", "9", "3"]).unwrap();
    assert!(cli.run(&mut Vec::new()).is_err());
}

#[test]
fn serial_and_parallel_stencil_agree() {
    let dir = tempfile::tempdir().unwrap();
    let start = dir.path().join("start.grid");
    let serial_out = dir.path().join("serial.grid");
    let serial_all = dir.path().join("serial.raw");
    let parallel_out = dir.path().join("parallel.grid");
    let parallel_all = dir.path().join("parallel.raw");

    let text = run::<Make2d>(&["make-2d", "10", "8", p(&start)], |c, o| c.run(o));
    assert!(text.contains("size = 648(B)"), "{text}");

    let text = run::<Stencil2d>(
        &["stencil-2d", "12", p(&start), p(&serial_out), p(&serial_all)],
        |c, o| c.run(o),
    );
    assert!(text.contains("initial matrix state + 12 iterations"), "{text}");

    let text = run::<PthStencil2d>(
        &["pth-stencil-2d", "12", p(&start), p(&parallel_out), "1", "3", p(&parallel_all)],
        |c, o| c.run(o),
    );
    assert!(text.contains("Running 12 parallel stencil iterations"), "{text}");

    assert_eq!(read_grid2d(&serial_out).unwrap(), read_grid2d(&parallel_out).unwrap());
    assert_eq!(
        std::fs::read(&serial_all).unwrap(),
        std::fs::read(&parallel_all).unwrap()
    );
    assert_eq!(std::fs::metadata(&serial_all).unwrap().len(), 13 * 10 * 8 * 8);

    let mut frames = open_stacked::<f64>(&parallel_all, 10, 8).unwrap();
    let last = frames.frames().last().unwrap().unwrap();
    assert_eq!(last, read_grid2d(&parallel_out).unwrap());
}

#[test]
fn quiet_parallel_stencil_without_stacked_file() {
    let dir = tempfile::tempdir().unwrap();
    let start = dir.path().join("start.grid");
    let out = dir.path().join("out.grid");
    run::<Make2d>(&["make-2d", "6", "6", p(&start)], |c, o| c.run(o));
    let text = run::<PthStencil2d>(
        &["pth-stencil-2d", "3", p(&start), p(&out), "0", "4"],
        |c, o| c.run(o),
    );
    assert!(!text.contains("Running"));
    assert!(text.contains("[Overall Time]"));
    let expected = serial::stencil(read_grid2d(&start).unwrap(), 3, |_, _| {});
    assert_eq!(read_grid2d(&out).unwrap(), expected);
}

#[test]
fn unopenable_stacked_file_still_writes_output() {
    let dir = tempfile::tempdir().unwrap();
    let start = dir.path().join("start.grid");
    let serial_out = dir.path().join("serial.grid");
    let parallel_out = dir.path().join("parallel.grid");
    let all = dir.path().join("no-such-dir").join("all.raw");
    run::<Make2d>(&["make-2d", "7", "5", p(&start)], |c, o| c.run(o));
    let expected = serial::stencil(read_grid2d(&start).unwrap(), 4, |_, _| {});

    let text = run::<Stencil2d>(
        &["stencil-2d", "4", p(&start), p(&serial_out), p(&all)],
        |c, o| c.run(o),
    );
    assert!(text.contains("Wrote final matrix state"), "{text}");
    assert!(!text.contains("initial matrix state +"), "{text}");
    assert_eq!(read_grid2d(&serial_out).unwrap(), expected);

    let text = run::<PthStencil2d>(
        &["pth-stencil-2d", "4", p(&start), p(&parallel_out), "1", "2", p(&all)],
        |c, o| c.run(o),
    );
    assert!(text.contains("Wrote final matrix state"), "{text}");
    assert!(!text.contains("initial matrix state +"), "{text}");
    assert_eq!(read_grid2d(&parallel_out).unwrap(), expected);
    assert!(!all.exists());
}

#[test]
fn small_grid_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let cli: Make2d = try_args_from(["make-2d", "2", "8", p(&dir.path().join("g"))]).unwrap();
    assert!(cli.run(&mut Vec::new()).is_err());
}

#[test]
fn print_2d_plain_and_stacked() {
    let dir = tempfile::tempdir().unwrap();
    let start = dir.path().join("start.grid");
    let out = dir.path().join("out.grid");
    let all = dir.path().join("all.raw");
    run::<Make2d>(&["make-2d", "3", "3", p(&start)], |c, o| c.run(o));

    let text = run::<Print2d>(&["print-2d", p(&start)], |c, o| c.run(o));
    assert!(text.contains("1.00\t0.00\t1.00\t\n"), "{text}");

    run::<Stencil2d>(&["stencil-2d", "2", p(&start), p(&out), p(&all)], |c, o| c.run(o));
    let text = run::<Print2d>(&["print-2d", p(&all), "--stacked", "3", "3"], |c, o| c.run(o));
    assert_eq!(text.matches("frame ").count(), 3);
    assert!(text.contains("1.00\t0.67\t1.00\t\n"), "{text}");

    // A 4x4 reading of a 3x3 stack runs into a partial frame.
    let cli: Print2d = try_args_from(["print-2d", p(&all), "--stacked", "4", "4"]).unwrap();
    assert!(cli.run(&mut Vec::new()).is_err());
}
