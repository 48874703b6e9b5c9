//! Integration test: all-pairs shortest paths through the worker pool.
//!
//! The in-place pivot kernel must give the hand-computed answer on the
//! six-node reference graph for every worker count, and must agree
//! bit-for-bit with the serial sweep on random graphs.

use blockgrid_core::Grid;
use blockgrid_engine::{Checkpoint, ConfigError, Coordinator, RunConfig, RunError, RunStatus};
use blockgrid_kernels::{random_graph, serial, PairwiseRelaxation};
use blockgrid_test_utils::{naive_floyd, six_node_graph, six_node_shortest_paths, FailingWriter};
use proptest::prelude::*;

fn solve(grid: Grid<i32>, workers: usize) -> Grid<i32> {
    let iterations = grid.rows();
    let out = Coordinator::new()
        .run(grid, &RunConfig::new(workers, iterations), &PairwiseRelaxation)
        .unwrap();
    assert_eq!(out.status, RunStatus::Completed);
    assert_eq!(out.metrics.iterations_completed, iterations);
    out.grid
}

#[test]
fn six_node_graph_any_worker_count() {
    let expected = six_node_shortest_paths();
    for workers in 1..=6 {
        assert_eq!(solve(six_node_graph(), workers), expected, "workers = {workers}");
    }
}

#[test]
fn metrics_cover_every_worker() {
    let out = Coordinator::new()
        .run(six_node_graph(), &RunConfig::new(3, 6), &PairwiseRelaxation)
        .unwrap();
    let m = &out.metrics;
    assert_eq!(m.workers.len(), 3);
    assert_eq!(
        m.workers.iter().map(|w| w.rows.count).sum::<usize>(),
        6
    );
    assert_eq!(m.compute, m.workers.iter().map(|w| w.compute).max().unwrap());
    assert!(m.wall >= m.compute);
    assert!(out.checkpoint.is_none());
}

#[test]
fn runs_are_deterministic() {
    let g = random_graph(40, 0.3, 1, 20, 11).unwrap();
    assert_eq!(solve(g.clone(), 7), solve(g, 7));
}

#[test]
fn partial_sweep_matches_serial_prefix() {
    let g = random_graph(12, 0.25, 1, 9, 3).unwrap();
    let out = Coordinator::new()
        .run(g.clone(), &RunConfig::new(4, 5), &PairwiseRelaxation)
        .unwrap();
    let mut expected = g;
    serial::shortest_paths_steps(&mut expected, 5).unwrap();
    assert_eq!(out.grid, expected);
}

#[test]
fn zero_iterations_return_input() {
    let g = six_node_graph();
    let out = Coordinator::new()
        .run(g.clone(), &RunConfig::new(2, 0), &PairwiseRelaxation)
        .unwrap();
    assert_eq!(out.grid, g);
    assert!(out.is_complete());
}

#[test]
fn non_square_grid_rejected() {
    let g = Grid::filled(3, 4, 0i32).unwrap();
    let err = Coordinator::new()
        .run(g, &RunConfig::new(1, 3), &PairwiseRelaxation)
        .unwrap_err();
    assert!(matches!(
        err,
        RunError::Config(ConfigError::NotSquare { rows: 3, cols: 4 })
    ));
}

#[test]
fn more_workers_than_rows_rejected() {
    let err = Coordinator::new()
        .run(six_node_graph(), &RunConfig::new(7, 6), &PairwiseRelaxation)
        .unwrap_err();
    assert!(matches!(
        err,
        RunError::Config(ConfigError::TooManyWorkers {
            workers: 7,
            eligible: 6
        })
    ));
}

#[test]
fn checkpoint_records_every_pivot() {
    let g = six_node_graph();
    let sink = FailingWriter::new(usize::MAX);
    let bytes = sink.bytes();
    let out = Coordinator::new()
        .run_with_checkpoint(g.clone(), &RunConfig::new(2, 6), &PairwiseRelaxation, Checkpoint::new(sink))
        .unwrap();
    let report = out.checkpoint.unwrap();
    assert!(report.is_complete());
    assert_eq!(report.frames_written, 7);

    let bytes = bytes.lock().unwrap();
    let frame = 6 * 6 * 4;
    assert_eq!(bytes.len(), 7 * frame);
    for k in 0..=6 {
        let mut expected = g.clone();
        serial::shortest_paths_steps(&mut expected, k).unwrap();
        let decoded: Vec<i32> = bytes[k * frame..(k + 1) * frame]
            .chunks_exact(4)
            .map(|c| i32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        assert_eq!(decoded, expected.into_vec(), "frame {k}");
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn parallel_matches_serial(
        n in 1usize..28,
        p in 0.0f64..=1.0,
        seed: u64,
        workers in 1usize..9,
    ) {
        prop_assume!(workers <= n);
        let g = random_graph(n, p, 1, 50, seed).unwrap();
        let mut expected = g.clone();
        serial::shortest_paths(&mut expected).unwrap();
        prop_assert_eq!(&expected, &naive_floyd(&g));
        prop_assert_eq!(solve(g, workers), expected);
    }
}
