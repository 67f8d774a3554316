use proptest::prelude::*;

use super::*;
use crate::array::HostArray;
use crate::colors::*;
use crate::config::RuntimeConfig;
use crate::error::ErrorKind;
use crate::scene::Scene;

fn runtime() -> ArrayRuntime {
    ArrayRuntime::new(&RuntimeConfig::default()).unwrap()
}

fn grid(rows: usize, cols: usize, live: &[(usize, usize)]) -> Vec<Vec<u8>> {
    let mut ret = vec![vec![0; cols]; rows];
    for &(r, c) in live {
        ret[r][c] = 1;
    }
    ret
}

fn live_cells(rt: &ArrayRuntime, sim: &LifeSimulator) -> Vec<(usize, usize)> {
    let host = rt.to_host(sim.state()).unwrap();
    let (rows, cols) = host.shape().as_2d().unwrap();
    let cells = host.as_slice::<i32>().unwrap();
    (0..rows * cols)
        .filter(|&i| cells[i] != 0)
        .map(|i| (i / cols, i % cols))
        .collect()
}

/// Computes the next generation cell by cell, counting only neighbors.
fn brute_force_step(cells: &[Vec<u8>]) -> Vec<Vec<u8>> {
    let rows = cells.len() as isize;
    let cols = cells[0].len() as isize;
    let alive = |r: isize, c: isize| {
        (0..rows).contains(&r) && (0..cols).contains(&c) && cells[r as usize][c as usize] != 0
    };
    (0..rows)
        .map(|r| {
            (0..cols)
                .map(|c| {
                    let neighbors = (-1..=1)
                        .flat_map(|dr| (-1..=1).map(move |dc| (dr, dc)))
                        .filter(|&(dr, dc)| (dr, dc) != (0, 0) && alive(r + dr, c + dc))
                        .count();
                    match (alive(r, c), neighbors) {
                        (true, 2) | (_, 3) => 1,
                        _ => 0,
                    }
                })
                .collect()
        })
        .collect()
}

#[test]
fn test_blinker_on_every_backend() {
    let rt = runtime();
    let horizontal = vec![(2, 1), (2, 2), (2, 3)];
    let vertical = vec![(1, 2), (2, 2), (3, 2)];
    for &backend in &BackendKind::ALL {
        let start = HostArray::from_rows(&grid(5, 5, &horizontal)).unwrap();
        let config = LifeConfig {
            backend: Some(backend),
            ..LifeConfig::default()
        };
        let start = rt.from_host(&start).unwrap();
        let mut sim = LifeSimulator::new(&rt, &start, &config).unwrap();
        assert_eq!(backend, sim.state().backend());
        assert_eq!(DType::Int32, sim.state().dtype());

        assert_eq!(4, sim.step(&rt).unwrap());
        assert_eq!(vertical, live_cells(&rt, &sim));
        assert_eq!(4, sim.step(&rt).unwrap());
        assert_eq!(horizontal, live_cells(&rt, &sim));
        assert_eq!(2, sim.generation());
        assert_eq!(3, sim.population(&rt).unwrap());
    }
    // The runtime's own selection is untouched.
    assert_eq!(BackendKind::CpuArray, rt.backend());
}

#[test]
fn test_block_is_still_life() {
    let rt = runtime();
    let block = vec![(1, 1), (1, 2), (2, 1), (2, 2)];
    let mut sim = LifeSimulator::from_rows(&rt, &grid(4, 4, &block)).unwrap();
    assert_eq!(4, sim.take_changes().len());
    for _ in 0..3 {
        assert_eq!(0, sim.step(&rt).unwrap());
    }
    assert_eq!(block, live_cells(&rt, &sim));
    assert!(sim.pending_changes().is_empty());
}

#[test]
fn test_start_is_normalized() {
    let rt = runtime();
    let start = rt
        .from_shaped(&[2, 3], &[0.0, 2.5, -1.0, 0.0, 0.0, 7.0], DType::Float32)
        .unwrap();
    let sim = LifeSimulator::new(&rt, &start, &LifeConfig::default()).unwrap();
    assert_eq!(DType::Int32, sim.state().dtype());
    assert_eq!(vec![(0, 1), (0, 2), (1, 2)], live_cells(&rt, &sim));

    let flat = rt.zeros(&[9], DType::Int32).unwrap();
    let err = LifeSimulator::new(&rt, &flat, &LifeConfig::default()).unwrap_err();
    assert_eq!(ErrorKind::Validation, err.kind());
}

#[test]
fn test_board_layout() {
    let layout = BoardLayout::new(12, 12, 3, 3, 1).unwrap();
    assert_eq!(2, layout.cell_size);
    assert_eq!((1, 1), layout.origin);
    assert_eq!((10, 10), layout.size);
    assert_eq!((5..7, 5..7), layout.cell_rect(1, 1));

    // Wide buffers center the board horizontally.
    let layout = BoardLayout::new(30, 12, 3, 3, 1).unwrap();
    assert_eq!((1, 10), layout.origin);

    let err = BoardLayout::new(4, 4, 3, 3, 1).unwrap_err();
    assert_eq!(ErrorKind::Validation, err.kind());
}

#[test]
fn test_incremental_draw() {
    let rt = runtime();
    let mut scene = Scene::new();
    let id = scene.add_object(LifeSimulator::from_rows(&rt, &grid(3, 3, &[(1, 1)])).unwrap());
    let mut buffer = PixelBuffer::new(12, 12, 0);

    // The first draw shows the starting pattern without simulating.
    scene.draw(id, &rt, &mut buffer).unwrap();
    assert_eq!(LIFE_BACKGROUND, buffer[[0, 0]]);
    assert_eq!(LIFE_GRIDLINES, buffer[[1, 1]]);
    assert_eq!(LIFE_GRIDLINES, buffer[[4, 10]]);
    assert_eq!(LIFE_BACKGROUND, buffer[[2, 2]]);
    assert_eq!(LIFE_ALIVE, buffer[[5, 5]]);
    assert_eq!(LIFE_ALIVE, buffer[[6, 6]]);
    let sim = scene.get::<LifeSimulator>(id).unwrap();
    assert_eq!(0, sim.generation());
    assert!(sim.pending_changes().is_empty());

    // Later draws only repaint changed cells.
    buffer[[1, 1]] = 0;
    buffer[[0, 0]] = 0;
    let (sim, view) = scene.focus(id).unwrap();
    let sim = sim.as_any_mut().downcast_mut::<LifeSimulator>().unwrap();
    sim.draw_with(&rt, &mut buffer, &view, true).unwrap();
    assert_eq!(LIFE_BACKGROUND, buffer[[5, 5]]);
    assert_eq!(0, buffer[[1, 1]]);
    assert_eq!(0, buffer[[0, 0]]);
    assert_eq!(1, sim.generation());

    sim.invalidate(&rt).unwrap();
    sim.draw_with(&rt, &mut buffer, &view, false).unwrap();
    assert_eq!(LIFE_GRIDLINES, buffer[[1, 1]]);
}

#[test]
fn test_draw_follows_scene_time() {
    let rt = runtime();
    let mut scene = Scene::new();
    let blinker = grid(5, 5, &[(2, 1), (2, 2), (2, 3)]);
    let id = scene.add_object(LifeSimulator::from_rows(&rt, &blinker).unwrap());
    let mut buffer = PixelBuffer::new(40, 40, 0);
    let generation = |scene: &Scene| scene.get::<LifeSimulator>(id).unwrap().generation();

    scene.update(0.005).unwrap();
    scene.draw(id, &rt, &mut buffer).unwrap();
    assert_eq!(0, generation(&scene));

    scene.update(0.01).unwrap();
    scene.draw(id, &rt, &mut buffer).unwrap();
    assert_eq!(1, generation(&scene));
    scene.draw(id, &rt, &mut buffer).unwrap();
    assert_eq!(1, generation(&scene));

    scene.update(0.02).unwrap();
    scene.draw(id, &rt, &mut buffer).unwrap();
    assert_eq!(2, generation(&scene));
}

#[test]
fn test_step_at_restarts_draw_timer() {
    let rt = runtime();
    let mut scene = Scene::new();
    let blinker = grid(5, 5, &[(2, 1), (2, 2), (2, 3)]);
    let id = scene.add_object(LifeSimulator::from_rows(&rt, &blinker).unwrap());
    let mut buffer = PixelBuffer::new(40, 40, 0);

    scene.update(0.5).unwrap();
    let time = scene.time();
    let sim = scene.get_mut::<LifeSimulator>(id).unwrap();
    assert_eq!(4, sim.step_at(&rt, time).unwrap());
    assert_eq!(1, sim.generation());

    // The timer restarted at the manual step, so drawing at the same scene
    // time does not simulate again.
    scene.draw(id, &rt, &mut buffer).unwrap();
    assert_eq!(1, scene.get::<LifeSimulator>(id).unwrap().generation());

    // A plain step leaves the timer alone.
    let sim = scene.get_mut::<LifeSimulator>(id).unwrap();
    sim.step(&rt).unwrap();
    scene.update(0.02).unwrap();
    scene.draw(id, &rt, &mut buffer).unwrap();
    assert_eq!(3, scene.get::<LifeSimulator>(id).unwrap().generation());
}

#[test]
fn test_changes_accumulate_between_draws() {
    let rt = runtime();
    let blinker = grid(5, 5, &[(2, 1), (2, 2), (2, 3)]);
    let mut sim = LifeSimulator::from_rows(&rt, &blinker).unwrap();
    sim.take_changes();
    sim.step(&rt).unwrap();
    sim.step(&rt).unwrap();
    let changes = sim.take_changes();
    assert_eq!(8, changes.len());
    assert_eq!(
        CellChange {
            row: 1,
            col: 2,
            alive: true,
        },
        changes[0],
    );
    assert_eq!(
        CellChange {
            row: 1,
            col: 2,
            alive: false,
        },
        changes[4],
    );
}

fn arb_grid() -> impl Strategy<Value = Vec<Vec<u8>>> {
    (1..10_usize, 1..10_usize)
        .prop_flat_map(|(rows, cols)| {
            prop::collection::vec(prop::collection::vec(0..2_u8, cols), rows)
        })
}

proptest! {
    /// Replaying the emitted changes on the old grid yields the new grid,
    /// and every emitted change is a real change.
    #[test]
    fn test_diff_round_trip(cells in arb_grid()) {
        let rt = runtime();
        let mut sim = LifeSimulator::from_rows(&rt, &cells).unwrap();
        sim.take_changes();
        sim.step(&rt).unwrap();

        let expected = brute_force_step(&cells);
        let mut replayed = cells.clone();
        for change in sim.take_changes() {
            let old = &mut replayed[change.row][change.col];
            prop_assert_ne!(*old != 0, change.alive);
            *old = change.alive as u8;
        }
        prop_assert_eq!(&expected, &replayed);
    }

    /// Fresh simulators on different backends agree on every generation.
    #[test]
    fn test_backends_agree(cells in arb_grid()) {
        let rt = runtime();
        let mut sims: Vec<LifeSimulator> = BackendKind::ALL
            .iter()
            .map(|&backend| {
                let config = LifeConfig { backend: Some(backend), ..LifeConfig::default() };
                let start = rt.from_host(&HostArray::from_rows(&cells).unwrap()).unwrap();
                LifeSimulator::new(&rt, &start, &config).unwrap()
            })
            .collect();
        for _ in 0..3 {
            let grids: Vec<_> = sims
                .iter_mut()
                .map(|sim| {
                    sim.step(&rt).unwrap();
                    live_cells(&rt, sim)
                })
                .collect();
            prop_assert!(grids.windows(2).all(|w| w[0] == w[1]));
        }
    }
}
