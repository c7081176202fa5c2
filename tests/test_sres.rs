use sres::{
    rng::set_default_seed, BoundCheck, LogLevel, Optimizer, ParameterSet, RandomNumberGenerator, SharedRng,
    Sres, SresError, SresOptions, Termination,
};

fn beale(x: &[f64]) -> f64 {
    let (a, b) = (x[0], x[1]);
    (1.5 - a + a * b).powi(2) + (2.25 - a + a * b * b).powi(2) + (2.625 - a + a * b.powi(3)).powi(2)
}

fn beale_sres(generations: usize, seed: u64) -> Sres<fn(&[f64]) -> f64> {
    let mut sres = Sres::from_vectors(
        beale as fn(&[f64]) -> f64,
        SresOptions::new(10, generations, 7),
        &[9.454, 3.556],
        &[0.1, 0.1],
        &[10.0, 10.0],
        false,
    )
    .unwrap();
    sres.set_seed(seed);
    sres
}

#[test]
fn test_beale_converges() {
    let mut sres = beale_sres(250, 4);
    sres.fit().unwrap();

    let solution = sres.solution_values();
    assert!((solution[0] - 3.0).abs() < 0.01, "x = {}", solution[0]);
    assert!((solution[1] - 0.5).abs() < 0.01, "y = {}", solution[1]);
    assert!(sres.best_fitness_value() < 1e-4);
}

#[test]
fn test_beale_fifty_generations() {
    let mut sres = beale_sres(50, 4);
    assert_eq!(sres.fit().unwrap(), Termination::MaxGenerations);

    let solution = sres.solution_values();
    assert!((solution[0] - 3.0).abs() < 0.01, "x = {}", solution[0]);
    assert!((solution[1] - 0.5).abs() < 0.01, "y = {}", solution[1]);
    assert!(sres.best_fitness_value() < 1e-4, "best = {}", sres.best_fitness_value());
}

#[test]
fn test_same_seed_reproduces_run() {
    let mut first = beale_sres(40, 7);
    let mut second = beale_sres(40, 7);
    first.fit().unwrap();
    second.fit().unwrap();

    assert_eq!(first.solution_values(), second.solution_values());
    assert_eq!(first.hall_of_fame(), second.hall_of_fame());

    // A second fit on the same instance starts from a clean slate.
    first.set_seed(7);
    first.fit().unwrap();
    assert_eq!(first.hall_of_fame(), second.hall_of_fame());
}

#[test]
fn test_hall_of_fame_only_improves() {
    let mut sres = beale_sres(60, 13);
    sres.fit().unwrap();

    let hof = sres.hall_of_fame();
    assert_eq!(hof[0], f64::INFINITY);
    assert!(hof.windows(2).all(|w| w[1] <= w[0]));
    assert_eq!(hof.last().copied(), Some(sres.best_fitness_value()));
}

#[test]
fn test_best_is_at_least_as_good_as_creation() {
    let mut sres = beale_sres(20, 3);
    sres.initialize().unwrap();
    sres.creation(0).unwrap();
    let created = sres.population_fitness()[..sres.population_size()].to_vec();

    sres.set_seed(3);
    sres.fit().unwrap();

    assert!(created.iter().all(|&f| sres.best_fitness_value() <= f));
}

#[test]
fn test_solution_stays_within_bounds() {
    let rosenbrock = |x: &[f64]| {
        x.windows(2)
            .map(|w| 100.0 * (w[1] - w[0] * w[0]).powi(2) + (1.0 - w[0]).powi(2))
            .sum::<f64>()
    };
    let lower = [-1.0, 2.0, -4.0];
    let upper = [0.5, 4.0, 4.0];
    let mut sres = Sres::from_vectors(rosenbrock, SresOptions::new(15, 80, 7), &[0.0, 3.0, 0.0], &lower, &upper, false)
        .unwrap();
    sres.set_seed(5);
    sres.fit().unwrap();

    for (j, &v) in sres.solution_values().iter().enumerate() {
        assert!(v >= lower[j] && v <= upper[j]);
    }
    assert!(sres.phi_values()[..15].iter().all(|&phi| phi == 0.0));
}

#[test]
fn test_logspace_run() {
    // Minimum at k = 10, which is 1.0 in log space.
    let cost = |x: &[f64]| (x[0] - 1.0).powi(2);
    let mut sres = Sres::from_vectors(cost, SresOptions::new(10, 60, 7), &[0.01], &[1e-3], &[1e3], true).unwrap();
    sres.set_seed(9);
    sres.fit().unwrap();

    assert!((sres.solution_values()[0] - 1.0).abs() < 1e-2);
    assert!(sres.parameters()[0].is_logspace());
}

#[test]
fn test_starting_value_on_bound_is_nudged() {
    let mut sres = Sres::from_vectors(
        beale as fn(&[f64]) -> f64,
        SresOptions::new(4, 10, 7),
        &[0.1, 10.0],
        &[0.1, 0.1],
        &[10.0, 10.0],
        false,
    )
    .unwrap();
    sres.initialize().unwrap();
    sres.creation(0).unwrap();

    let first = &sres.population()[0];
    assert!(first[0] > 0.1 && first[0] < 10.0);
    assert!(first[1] > 0.1 && first[1] < 10.0);
}

#[test]
fn test_fit_lhs_reaches_minimum() {
    let mut sres = beale_sres(150, 4);
    assert_eq!(sres.fit_lhs().unwrap(), Termination::MaxGenerations);

    let solution = sres.solution_values();
    assert!((solution[0] - 3.0).abs() < 0.1);
    assert!((solution[1] - 0.5).abs() < 0.05);
}

#[test]
fn test_shared_stream_runs_are_reproducible() {
    let parameters = ParameterSet::from_vectors(&[9.454, 3.556], &[0.1, 0.1], &[10.0, 10.0], false).unwrap();
    let mut first = Sres::with_stream(beale as fn(&[f64]) -> f64, SresOptions::new(10, 20, 7), parameters.clone(), SharedRng)
        .unwrap();
    let mut second = Sres::with_stream(beale as fn(&[f64]) -> f64, SresOptions::new(10, 20, 7), parameters, SharedRng)
        .unwrap();

    set_default_seed(31);
    first.fit().unwrap();
    set_default_seed(31);
    second.fit().unwrap();

    assert_eq!(first.solution_values(), second.solution_values());
}

#[test]
fn test_configuration_errors() {
    let mut sres = beale_sres(10, 1);
    sres.set_child_rate(0);

    assert!(matches!(sres.fit(), Err(SresError::Configuration(_))));
    assert!(matches!(sres.fit_lhs(), Err(SresError::Configuration(_))));

    sres.set_child_rate(7);
    assert!(sres.fit().is_ok());
}

#[test]
fn test_injected_stream_matches_seeded_default() {
    let parameters = ParameterSet::from_vectors(&[9.454, 3.556], &[0.1, 0.1], &[10.0, 10.0], false).unwrap();
    let mut injected = Sres::with_stream(
        beale as fn(&[f64]) -> f64,
        SresOptions::new(10, 15, 7),
        parameters,
        RandomNumberGenerator::from_seed(4),
    )
    .unwrap();
    let mut seeded = beale_sres(15, 4);

    injected.fit().unwrap();
    seeded.fit().unwrap();

    assert_eq!(injected.solution_values(), seeded.solution_values());
}

#[test]
fn test_verbose_run_logs() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let mut sres = beale_sres(5, 2);
    sres.set_log_level(LogLevel::Verbose);

    assert_eq!(sres.fit().unwrap(), Termination::MaxGenerations);
}

#[cfg(feature = "serde")]
#[test]
fn test_options_serde() {
    let options = SresOptions::builder()
        .population_size(25)
        .stall_limit(1)
        .log_level(LogLevel::Minimal)
        .build();

    let json = serde_json::to_string(&options).unwrap();
    let restored: SresOptions = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, options);
}

#[test]
fn test_parameter_values_follow_best_solution() {
    let mut sres = beale_sres(30, 6);
    sres.fit().unwrap();

    assert_eq!(sres.parameters().values(), sres.solution_values().to_vec());
    assert!(sres
        .parameters()
        .iter()
        .all(|p| p.check_constraint() == BoundCheck::Within));

    sres.set_population_size(0);
    assert!(sres.fit().is_err());
    sres.set_population_size(10);
    sres.initialize().unwrap();
    assert_eq!(sres.parameters().values(), vec![9.454, 3.556]);
}

#[test]
fn test_fit_lhs_with_single_trial() {
    let mut options = SresOptions::new(10, 30, 7);
    options.set_lhs_trials(1);
    let mut sres = Sres::from_vectors(
        beale as fn(&[f64]) -> f64,
        options,
        &[9.454, 3.556],
        &[0.1, 0.1],
        &[10.0, 10.0],
        false,
    )
    .unwrap();
    sres.set_seed(4);

    assert_eq!(sres.fit_lhs().unwrap(), Termination::MaxGenerations);
    assert!(sres.hall_of_fame().len() >= 2);
    assert!(sres.best_fitness_value().is_finite());
}

#[test]
fn test_fit_lhs_rejects_zero_trials() {
    let mut sres = beale_sres(10, 4);
    let mut options = sres.options().clone();
    options.set_lhs_trials(0);
    let parameters = sres.parameters().clone();

    assert!(matches!(
        Sres::new(beale as fn(&[f64]) -> f64, options, parameters),
        Err(SresError::Configuration(_))
    ));
    assert!(sres.fit_lhs().is_ok());
}
