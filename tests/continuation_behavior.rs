use approx::assert_abs_diff_eq;
use ndarray::{Array1, Array2};
use rand::SeedableRng;
use rand::rngs::StdRng;
use sica::{
    ActiveSet, SicaOptions, SparseLinearSpec, StageParams, StageStatus, StandardizedDesign,
    fit_sica, fit_sica_warm_start, run_stage, sample_sparse_linear, solve,
};

fn sample(seed: u64) -> (Array2<f64>, Array1<f64>) {
    let spec =
        SparseLinearSpec::with_support(80, 12, &[0, 5, 9], &[2.0, -1.5, 1.0], 0.4).unwrap();
    let sample = sample_sparse_linear(&spec, &mut StdRng::seed_from_u64(seed)).unwrap();
    (sample.x, sample.y)
}

#[test]
fn shape_at_least_one_runs_only_the_final_stage() {
    let (x, y) = sample(41);
    let options = SicaOptions::new(1.5, 0.1);
    let fit = fit_sica(x.view(), y.view(), &options).unwrap();
    assert_eq!(fit.stages.len(), 1);
    assert!(!fit.stages[0].stabilization);

    let design = StandardizedDesign::new(x.view(), y.view()).unwrap();
    let direct = run_stage(
        &design,
        Array1::zeros(12),
        ActiveSet::new(),
        &ActiveSet::new(),
        &StageParams {
            a: 1.5,
            lambda: 0.1,
            max_iterations: options.max_iterations,
            tolerance: options.tolerance,
        },
    );
    assert_eq!(fit.beta_scaled, direct.beta);
    assert_eq!(fit.stages[0].iterations, direct.iterations);
}

#[test]
fn disabling_stabilization_matches_a_single_stage() {
    let (x, y) = sample(42);
    let options = SicaOptions::new(0.05, 0.2).with_stabilization(false);
    let fit = fit_sica(x.view(), y.view(), &options).unwrap();
    assert_eq!(fit.stages.len(), 1);

    let design = StandardizedDesign::new(x.view(), y.view()).unwrap();
    let direct = run_stage(
        &design,
        Array1::zeros(12),
        ActiveSet::new(),
        &ActiveSet::new(),
        &StageParams {
            a: 0.05,
            lambda: 0.2,
            max_iterations: options.max_iterations,
            tolerance: options.tolerance,
        },
    );
    assert_eq!(fit.beta_scaled, direct.beta);
}

#[test]
fn refitting_from_a_converged_solution_changes_nothing() {
    let (x, y) = sample(43);
    let options = SicaOptions::new(0.3, 0.15)
        .with_tolerance(1e-12)
        .with_max_iterations(1_000)
        .with_stabilization(false);
    let first = fit_sica(x.view(), y.view(), &options).unwrap();
    assert!(first.converged());

    let second = fit_sica_warm_start(x.view(), y.view(), &options, first.beta.view()).unwrap();
    assert_eq!(first.support(), second.support());
    for j in 0..first.beta.len() {
        assert_abs_diff_eq!(first.beta[j], second.beta[j], epsilon = 1e-9);
    }
    assert!(second.stages[0].iterations <= 2);
}

#[test]
fn every_stage_converges_on_a_well_posed_problem() {
    let (x, y) = sample(44);
    let fit = fit_sica(x.view(), y.view(), &SicaOptions::new(1e-3, 0.05)).unwrap();
    assert_eq!(fit.stages.len(), 4);
    assert_eq!(fit.a, 1e-3);
    for stage in &fit.stages {
        assert_eq!(stage.status, StageStatus::Converged, "stage a={}", stage.a);
        assert!(stage.step_history.len() == stage.iterations);
    }
}

#[test]
fn default_solve_keeps_strong_signals() {
    let (x, y) = sample(45);
    let beta = solve(x.view(), y.view()).unwrap();
    assert_eq!(beta.len(), 12);
    assert!(beta.iter().all(|b| b.is_finite()));
    // The default lambda is far below the signal strength.
    for j in [0, 5, 9] {
        assert!(beta[j] != 0.0);
    }
}

#[test]
fn wide_designs_raise_the_support_advisory() {
    let x = Array2::from_shape_fn((6, 10), |(i, j)| ((i * 7 + j * 3) % 11) as f64 - 5.0 + 0.1 * j as f64);
    let y = Array1::from_shape_fn(6, |i| i as f64 - 2.5);
    let fit = fit_sica(x.view(), y.view(), &SicaOptions::new(1.0, 0.0)).unwrap();
    assert!(fit.nonzero_count() * 2 > 6);
    assert!(fit.oversized_support);
}
