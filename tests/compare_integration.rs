//! Integration tests for comparing analyses of real fixtures.

use std::path::PathBuf;

use codescope::{analyze, compare};

fn read_fixture(name: &str) -> Vec<u8> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("testdata")
        .join(name);
    std::fs::read(path).expect("fixture should exist")
}

#[test]
fn test_compare_script_to_calculator() {
    let script = analyze(&read_fixture("script.py"), "script.py").unwrap();
    let calculator = analyze(&read_fixture("calculator.py"), "calculator.py").unwrap();

    let delta = compare(&script, &calculator);
    assert_eq!(delta.first_path, "script.py");
    assert_eq!(delta.second_path, "calculator.py");
    assert_eq!(delta.functions.delta, 1); // 1 -> 2
    assert_eq!(delta.classes.delta, 1); // 0 -> 1
    assert_eq!(delta.complexity.delta, 10); // 2 -> 12
    assert!(delta.total_lines.delta > 0);
}

#[test]
fn test_compare_fixture_antisymmetry() {
    let script = analyze(&read_fixture("script.py"), "script.py").unwrap();
    let calculator = analyze(&read_fixture("calculator.py"), "calculator.py").unwrap();

    let forward = compare(&script, &calculator);
    let backward = compare(&calculator, &script);
    for ((label, f), (_, b)) in forward.fields().iter().zip(backward.fields().iter()) {
        assert_eq!(f.delta, -b.delta, "field {label} is not antisymmetric");
        assert_eq!(f.first, b.second);
        assert_eq!(f.second, b.first);
    }
}

#[test]
fn test_compare_fixture_with_itself() {
    let calculator = analyze(&read_fixture("calculator.py"), "calculator.py").unwrap();
    let delta = compare(&calculator, &calculator);
    assert!(delta.is_unchanged());
}
