use digitlaw_engine::{analyze, score, validate_column, Conformity, Value, EXPECTED};

fn numbers(values: &[f64]) -> Vec<Value> {
    values.iter().map(|&n| Value::Number(n)).collect()
}

#[test]
fn skewed_column_lands_in_non_conformity() {
    // Six values lead with 1, one with 2, one with 9
    let column = numbers(&[100.0, 200.0, 150.0, 123.0, 111.0, 199.0, 101.0, 999.0]);

    let dist = analyze(&column).unwrap();
    assert_eq!(dist.bins[0].observed, 6.0 / 8.0);
    assert_eq!(dist.bins[1].observed, 1.0 / 8.0);
    assert_eq!(dist.bins[8].observed, 1.0 / 8.0);

    let scored = score(&dist).unwrap();

    // Hand-computed MAD from those tallies vs the fixed constants
    let hand_computed = ((0.75 - EXPECTED[0]).abs()
        + (0.125 - EXPECTED[1]).abs()
        + EXPECTED[2]
        + EXPECTED[3]
        + EXPECTED[4]
        + EXPECTED[5]
        + EXPECTED[6]
        + EXPECTED[7]
        + (0.125 - EXPECTED[8]).abs())
        / 9.0;
    assert!((scored.mad - hand_computed).abs() < 1e-12);
    assert_eq!(scored.conformity, Conformity::NonConformity);
}

#[test]
fn mixed_column_matches_its_clean_subset() {
    let noisy = vec![
        Value::Number(0.0),
        Value::Null,
        Value::Text("abc".to_string()),
        Value::Number(123.0),
        Value::Number(456.0),
    ];
    let clean = numbers(&[123.0, 456.0]);

    let a = validate_column("f.csv", "col", &noisy).unwrap();
    let b = validate_column("f.csv", "col", &clean).unwrap();
    assert_eq!(a.distribution, b.distribution);
    assert_eq!(a.mad_score, b.mad_score);
    assert_eq!(a.conformity, b.conformity);
}

#[test]
fn negative_values_share_buckets_with_positive() {
    let signed = numbers(&[-123.0, 456.0, -789.0]);
    let unsigned = numbers(&[123.0, 456.0, 789.0]);
    assert_eq!(analyze(&signed).unwrap(), analyze(&unsigned).unwrap());
}

#[test]
fn benford_like_sequence_scores_close() {
    // Powers of a constant ratio follow Benford closely; 1.05^n over a
    // few hundred terms gives observed frequencies near the constants.
    let column: Vec<Value> = (0..1000)
        .map(|n| Value::Number(1.05f64.powi(n)))
        .collect();
    let result = validate_column("powers.csv", "value", &column).unwrap();
    assert!(
        result.mad_score < 0.012,
        "mad {} unexpectedly high for a geometric sequence",
        result.mad_score
    );
}
