use streampower::random::random_field;
use streampower::{GridGeometry, ModelError, ModelParams, StreamPower};

fn flat(nx: usize, ny: usize, h: f64) -> Vec<Vec<f64>> {
    vec![vec![h; ny]; nx]
}

fn plane(nx: usize, ny: usize) -> Vec<Vec<f64>> {
    (0..nx).map(|i| (0..ny).map(|j| 10.0 + 0.1 * i as f64 + 0.05 * j as f64).collect()).collect()
}

fn is_border(i: usize, j: usize, nx: usize, ny: usize) -> bool {
    i == 0 || j == 0 || i == nx - 1 || j == ny - 1
}

#[test]
fn flat_grid_without_erosion_grows_timestep_each_step() {
    let params = ModelParams { k: 0.0, timestep: 1.0, ..Default::default() };
    let mut m = StreamPower::new(params).unwrap();
    m.init(GridGeometry::new(8, 8)).unwrap();
    m.set_topo(&flat(8, 8, 5.0)).unwrap();

    let mut expected_dt = 1.0;
    let mut expected_time = 0.0;
    for _ in 0..6 {
        let s = m.step().unwrap();
        assert!(s.accepted);
        assert_eq!(s.max_rate, 0.0);
        expected_time += expected_dt;
        expected_dt *= 1.2;
        assert!((s.next_timestep - expected_dt).abs() < 1e-12 * expected_dt);
        assert!((m.time() - expected_time).abs() < 1e-12 * expected_time);
    }
    assert!(m.topo().unwrap().iter().flatten().all(|&v| v == 5.0));
}

#[test]
fn uplift_only_raises_interior_and_keeps_border() {
    let (nx, ny) = (10, 9);
    let params = ModelParams { k: 0.0, timestep: 2.0, ..Default::default() };
    let mut m = StreamPower::new(params).unwrap();
    m.init(GridGeometry::new(nx, ny).with_cell_size(1.0)).unwrap();
    let initial = plane(nx, ny);
    m.set_topo(&initial).unwrap();
    m.set_uplift_uniform(0.25).unwrap();

    let s = m.step().unwrap();
    assert!(s.accepted);
    let after = m.topo().unwrap();
    for i in 0..nx {
        for j in 0..ny {
            if is_border(i, j, nx, ny) {
                assert_eq!(after[i][j], initial[i][j], "border ({}, {}) moved", i, j);
            } else {
                let want = initial[i][j] + 0.25 * 2.0;
                assert!((after[i][j] - want).abs() < 1e-12, "({}, {}): {} vs {}", i, j, after[i][j], want);
            }
        }
    }
}

#[test]
fn unstable_step_is_rolled_back_with_half_timestep() {
    let (nx, ny) = (6, 6);
    let params = ModelParams { k: 1.0, timestep: 10.0, ..Default::default() };
    let mut m = StreamPower::new(params).unwrap();
    m.init(GridGeometry::new(nx, ny).with_cell_size(1.0)).unwrap();
    m.set_topo(&flat(nx, ny, 10.0)).unwrap();
    m.set_uplift_uniform(1.0).unwrap();

    let s = m.step().unwrap();
    assert!(!s.accepted);
    assert_eq!(s.timestep, 10.0);
    assert_eq!(s.next_timestep, 5.0);
    assert_eq!(m.time(), 0.0);
    // pre-step surface + uplift of the attempted step - uplift of the retry
    let t = m.topo().unwrap();
    for i in 0..nx {
        for j in 0..ny {
            let want = if is_border(i, j, nx, ny) { 10.0 } else { 15.0 };
            assert_eq!(t[i][j], want, "({}, {})", i, j);
        }
    }

    // halving eventually gets under the stability bound
    let mut accepted = false;
    for _ in 0..60 {
        let s = m.step().unwrap();
        if s.accepted {
            assert!(s.max_rate * s.timestep <= 0.3 * 1.0 + 1e-12);
            accepted = true;
            break;
        }
        assert_eq!(m.time(), 0.0);
    }
    assert!(accepted);
    assert!(m.time() > 0.0);
}

#[test]
fn heights_stay_non_negative_over_many_steps() {
    let (nx, ny) = (20, 16);
    let params = ModelParams { k: 0.05, timestep: 1.0, ..Default::default() };
    let mut m = StreamPower::new(params).unwrap();
    m.init(GridGeometry::new(nx, ny).with_cell_size(10.0)).unwrap();
    let mut topo = random_field(nx, ny, 17);
    for row in topo.iter_mut() {
        for v in row.iter_mut() {
            *v = v.abs();
        }
    }
    m.set_topo(&topo).unwrap();
    m.set_uplift_uniform(0.01).unwrap();
    for _ in 0..80 {
        m.step().unwrap();
        let t = m.topo().unwrap();
        assert!(t.iter().flatten().all(|&v| v >= 0.0 && v.is_finite()));
    }
}

#[test]
fn zero_erodibility_region_is_not_incised() {
    let (nx, ny) = (10, 10);
    let params = ModelParams { k: 0.001, timestep: 1.0, ..Default::default() };
    let mut m = StreamPower::new(params).unwrap();
    m.init(GridGeometry::new(nx, ny).with_cell_size(1.0)).unwrap();
    let initial = plane(nx, ny);
    m.set_topo(&initial).unwrap();
    let k: Vec<Vec<f64>> = (0..nx).map(|i| vec![if i < nx / 2 { 0.0 } else { 0.001 }; ny]).collect();
    m.set_erodibility(&k).unwrap();

    assert!(m.step().unwrap().accepted);
    let t = m.topo().unwrap();
    for i in 1..nx - 1 {
        for j in 1..ny - 1 {
            if i < nx / 2 {
                assert_eq!(t[i][j], initial[i][j]);
            } else {
                assert!(t[i][j] < initial[i][j], "({}, {}) was not lowered", i, j);
            }
        }
    }
}

#[test]
fn run_stops_at_duration() {
    let params = ModelParams { k: 0.0, timestep: 1.0, duration: 10.0, ..Default::default() };
    let mut m = StreamPower::new(params).unwrap();
    m.init(GridGeometry::new(5, 5)).unwrap();
    m.set_topo(&flat(5, 5, 1.0)).unwrap();
    m.set_uplift_uniform(0.1).unwrap();

    let summary = m.run(|_| true).unwrap();
    assert!(!summary.cancelled);
    assert_eq!(summary.rejected, 0);
    // dt grows 1, 1.2, 1.44, ... so seven steps pass 10
    assert_eq!(summary.steps, 7);
    assert!(summary.time >= 10.0);
    assert_eq!(m.progress(), 1.0);
}

#[test]
fn run_honours_cancellation() {
    let params = ModelParams { k: 0.0, duration: 1.0e6, ..Default::default() };
    let mut m = StreamPower::new(params).unwrap();
    m.init(GridGeometry::new(5, 5)).unwrap();
    m.set_topo(&flat(5, 5, 1.0)).unwrap();

    let mut polls = Vec::new();
    let summary = m
        .run(|clock| {
            polls.push(clock.step_idx);
            polls.len() < 3
        })
        .unwrap();
    // polled before each step: two steps run, the third poll stops the loop
    assert_eq!(polls, vec![0, 1, 2]);
    assert!(summary.cancelled);
    assert_eq!(summary.steps, 2);
    assert!(m.progress() < 1.0);
    assert_eq!(m.clock().step_idx, 2);
}

#[test]
fn run_cancelled_up_front_takes_no_step() {
    let params = ModelParams { k: 0.0, duration: 10.0, ..Default::default() };
    let mut m = StreamPower::new(params).unwrap();
    m.init(GridGeometry::new(5, 5)).unwrap();
    m.set_topo(&flat(5, 5, 1.0)).unwrap();
    let before = m.topo().unwrap();

    let summary = m.run(|_| false).unwrap();
    assert!(summary.cancelled);
    assert_eq!(summary.steps, 0);
    assert_eq!(summary.time, 0.0);
    assert_eq!(m.clock().step_idx, 0);
    assert_eq!(m.topo().unwrap(), before);
}

#[test]
fn identical_inputs_give_identical_surfaces() {
    let build = || {
        let mut m = StreamPower::new(ModelParams::default()).unwrap();
        m.init(GridGeometry::new(14, 11)).unwrap();
        let mut topo = random_field(14, 11, 99);
        for row in topo.iter_mut() {
            for v in row.iter_mut() {
                *v = 100.0 + 20.0 * *v;
            }
        }
        m.set_topo(&topo).unwrap();
        m.set_uplift_uniform(0.5).unwrap();
        for _ in 0..10 {
            m.step().unwrap();
        }
        m.topo().unwrap()
    };
    assert_eq!(build(), build());
}

#[test]
fn calls_out_of_order_are_rejected() {
    let mut m = StreamPower::new(ModelParams::default()).unwrap();
    assert!(matches!(m.set_topo(&flat(4, 4, 0.0)), Err(ModelError::NotInitialized(_))));
    assert!(matches!(m.step(), Err(ModelError::NotInitialized(_))));
    m.init(GridGeometry::new(4, 4)).unwrap();
    assert!(matches!(m.step(), Err(ModelError::NotInitialized(_))));
    assert!(matches!(m.set_uplift_uniform(1.0), Err(ModelError::NotInitialized(_))));
    assert!(matches!(m.topo(), Err(ModelError::NotInitialized(_))));
}

#[test]
fn mismatched_grids_are_rejected() {
    let mut m = StreamPower::new(ModelParams::default()).unwrap();
    m.init(GridGeometry::new(6, 5)).unwrap();
    assert!(matches!(m.set_topo(&flat(5, 6, 0.0)), Err(ModelError::DimensionMismatch { .. })));
    m.set_topo(&flat(6, 5, 0.0)).unwrap();
    assert!(matches!(m.set_uplift(&flat(6, 4, 0.0)), Err(ModelError::DimensionMismatch { .. })));
    assert!(matches!(m.set_erodibility(&flat(7, 5, 0.0)), Err(ModelError::DimensionMismatch { .. })));
}

#[test]
fn bad_geometry_and_params_are_rejected() {
    let mut m = StreamPower::new(ModelParams::default()).unwrap();
    assert!(matches!(m.init(GridGeometry::new(2, 9)), Err(ModelError::InvalidGeometry(_))));
    assert!(matches!(m.init(GridGeometry::new(9, 9).with_cell_size(0.0)), Err(ModelError::InvalidGeometry(_))));
    let bad = ModelParams { timestep: -1.0, ..Default::default() };
    assert!(matches!(StreamPower::new(bad), Err(ModelError::InvalidParameter { name: "timestep", .. })));
}

#[test]
fn init_diffusion_prepares_a_drainable_surface() {
    let (nx, ny) = (12, 12);
    let mut m = StreamPower::new(ModelParams::default()).unwrap();
    m.init(GridGeometry::new(nx, ny)).unwrap();
    m.set_topo(&flat(nx, ny, 0.0)).unwrap();
    m.init_diffusion().unwrap();
    let t = m.topo().unwrap();
    assert!(t[nx / 2][ny / 2] > 0.0);
    assert_eq!(t[0][0], 0.0);
    m.hillslope_diffusion().unwrap();
    assert!(m.step().unwrap().timestep > 0.0);
}

#[test]
fn flow_and_slope_reflect_the_last_step() {
    let (nx, ny) = (8, 8);
    let mut m = StreamPower::new(ModelParams { k: 0.001, ..Default::default() }).unwrap();
    m.init(GridGeometry::new(nx, ny).with_cell_size(1.0)).unwrap();
    m.set_topo(&plane(nx, ny)).unwrap();
    assert!(m.flow().unwrap().iter().flatten().all(|&q| q == 1.0));

    m.step().unwrap();
    let q = m.flow().unwrap();
    assert!(q[1][1] > 1.0, "low corner should collect upstream discharge");
    assert_eq!(q[nx - 1][ny - 1], 1.0);
    let s = m.slope().unwrap();
    assert_eq!(s[0][3], 0.0);
    assert!(s[3][3] > 0.0);
}
