use sres::{BoundCheck, Parameter, ParameterSet, SresError};

#[test]
fn test_from_vectors_rejects_mismatched_lengths() {
    let result = ParameterSet::from_vectors(&[1.0, 2.0], &[0.0], &[3.0, 3.0], false);

    match result {
        Err(SresError::LengthMismatch {
            starting_values,
            lower_bounds,
            upper_bounds,
        }) => {
            assert_eq!(starting_values, 2);
            assert_eq!(lower_bounds, 1);
            assert_eq!(upper_bounds, 2);
        }
        other => panic!("Expected LengthMismatch error, got {:?}", other),
    }
}

#[test]
fn test_from_vectors_reports_first_bad_parameter() {
    let result = ParameterSet::from_vectors(&[1.0, 1.0, 1.0], &[0.0, 2.0, 5.0], &[2.0, 0.0, 1.0], false);

    assert_eq!(
        result,
        Err(SresError::InvalidBounds {
            index: 1,
            lower: 2.0,
            upper: 0.0
        })
    );
}

#[test]
fn test_logspace_parameters_are_stored_as_log10() {
    let set = ParameterSet::from_vectors(&[10.0, 1.0], &[0.1, 0.01], &[1000.0, 100.0], true).unwrap();

    assert!(set.iter().all(Parameter::is_logspace));
    assert!((set[0].starting_value() - 1.0).abs() < 1e-12);
    assert!((set[0].lower_bound() + 1.0).abs() < 1e-12);
    assert!((set[1].upper_bound() - 2.0).abs() < 1e-12);
}

#[test]
fn test_logspace_rejects_non_positive_values() {
    assert!(Parameter::new(1.0, 0.0, 10.0, true).is_err());
    assert!(Parameter::new(-1.0, 0.1, 10.0, true).is_err());
}

#[test]
fn test_bound_classification() {
    let p = Parameter::new(5.0, 1.0, 10.0, false).unwrap();

    assert_eq!(p.check_constraint(), BoundCheck::Within);
    assert_eq!(p.check_constraint_value(0.5), BoundCheck::Below);
    assert_eq!(p.check_constraint_value(10.5), BoundCheck::Above);
    assert_eq!(p.check_constraint_value(1.0), BoundCheck::Within);
    assert_eq!(p.check_constraint_value(10.0), BoundCheck::Within);
    assert_eq!(BoundCheck::Below.signum(), -1);
    assert_eq!(BoundCheck::Above.signum(), 1);

    assert!(p.check_lower_bound(1.0));
    assert!(!p.check_upper_bound(10.1));
}

#[test]
fn test_nudge_inside_leaves_bounds() {
    let p = Parameter::new(0.0, 0.0, 1.0, false).unwrap();

    let low = p.nudge_inside(0.0);
    assert!(low > 0.0 && low < 1.0);

    let high = p.nudge_inside(1.0);
    assert!(high > 0.0 && high < 1.0);

    let negative = Parameter::new(-3.0, -3.0, -1.0, false).unwrap();
    let nudged = negative.nudge_inside(-3.0);
    assert!(nudged > -3.0 && nudged < -1.0);

    assert_eq!(p.nudge_inside(0.25), 0.25);
}

#[test]
fn test_set_values_updates_current_values() {
    let mut set = ParameterSet::from_vectors(&[1.0, 2.0], &[0.0, 0.0], &[5.0, 5.0], false).unwrap();
    set.set_values(&[3.0, 4.0]);

    assert_eq!(set.values(), vec![3.0, 4.0]);
    assert_eq!(set.starting_values(), vec![1.0, 2.0]);
    assert_eq!(set.lower_bounds(), vec![0.0, 0.0]);
}

#[test]
fn test_collects_from_parameters() {
    let set: ParameterSet = (1..=3)
        .map(|i| Parameter::new(i as f64, 0.0, 10.0, false).unwrap())
        .collect();

    assert_eq!(set.len(), 3);
    assert_eq!(set.get(2).map(Parameter::value), Some(3.0));
    assert!(set.get(3).is_none());
    assert_eq!((&set).into_iter().count(), 3);
}

#[test]
fn test_from_vectors_rejects_infinite_bounds() {
    let result = ParameterSet::from_vectors(&[0.0, 1.0], &[-1.0, 0.0], &[1.0, f64::INFINITY], false);

    match result {
        Err(SresError::InvalidBounds { index, lower, upper }) => {
            assert_eq!(index, 1);
            assert_eq!(lower, 0.0);
            assert!(upper.is_infinite());
        }
        other => panic!("Expected InvalidBounds error, got {:?}", other),
    }

    assert!(ParameterSet::from_vectors(&[0.0], &[f64::NEG_INFINITY], &[f64::INFINITY], false).is_err());
}
