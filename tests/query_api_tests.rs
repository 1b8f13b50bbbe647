//! Read-only query surface: bounds, debug info resolution, error shape

mod utils;

use contador::error::ProfileError;
use utils::{manual_profiler, replay, MockInterp, MockUnit};

#[test]
fn test_out_of_range_unit_queries_fail() {
    let mut interp = MockInterp::new();
    interp.push(MockUnit::stripped(2));

    let (mut profiler, _clock) = manual_profiler();
    profiler.attach(&interp).unwrap();

    let count = profiler.unit_count();
    let err = profiler.instruction_count(count).unwrap_err();
    assert_eq!(
        err,
        ProfileError::UnitOutOfRange {
            index: count,
            len: count
        }
    );

    let err = profiler.lookup(&interp, count, 0).unwrap_err();
    assert!(err.is_out_of_range());
}

#[test]
fn test_out_of_range_offset_fails_not_clamps() {
    let mut interp = MockInterp::new();
    interp.push(MockUnit::stripped(3));

    let (mut profiler, _clock) = manual_profiler();
    profiler.attach(&interp).unwrap();

    let err = profiler.lookup(&interp, 0, 3).unwrap_err();
    assert_eq!(
        err,
        ProfileError::OffsetOutOfRange {
            unit: 0,
            offset: 3,
            len: 3
        }
    );
}

#[test]
fn test_queries_on_empty_profiler() {
    let interp = MockInterp::new();
    let (profiler, _clock) = manual_profiler();

    assert_eq!(profiler.unit_count(), 0);
    assert!(profiler.instruction_count(0).is_err());
    assert!(profiler.lookup(&interp, 0, 0).is_err());
}

#[test]
fn test_lookup_resolves_debug_info() {
    let mut interp = MockInterp::new();
    let unit = interp.push(MockUnit::with_debug("app.rb", &[10, 11, 11]));

    let (mut profiler, clock) = manual_profiler();
    replay(&mut profiler, &clock, &interp, &[(0.0, unit, 2)]);

    let entry = profiler.lookup(&interp, 0, 2).unwrap();
    assert_eq!(entry.source_file.as_deref(), Some("app.rb"));
    assert_eq!(entry.source_line, Some(11));
    assert_eq!(entry.hits, 1);
}

#[test]
fn test_lookup_without_debug_info_returns_unknown_not_error() {
    let mut interp = MockInterp::new();
    interp.push(MockUnit::stripped(1));

    let (mut profiler, _clock) = manual_profiler();
    profiler.attach(&interp).unwrap();

    let entry = profiler.lookup(&interp, 0, 0).unwrap();
    assert_eq!(entry.source_file, None);
    assert_eq!(entry.source_line, None);
    assert_eq!(entry.hits, 0);
    assert_eq!(entry.time, 0.0);
}

#[test]
fn test_lookup_on_never_fetched_offset_is_zeroed() {
    let mut interp = MockInterp::new();
    let unit = interp.push(MockUnit::stripped(4));

    let (mut profiler, clock) = manual_profiler();
    replay(&mut profiler, &clock, &interp, &[(0.0, unit, 0)]);

    let entry = profiler.lookup(&interp, 0, 3).unwrap();
    assert_eq!(entry.hits, 0);
    assert_eq!(entry.time, 0.0);
}

#[test]
fn test_queries_are_stable_across_reads() {
    let mut interp = MockInterp::new();
    let unit = interp.push(MockUnit::stripped(2));

    let (mut profiler, clock) = manual_profiler();
    replay(
        &mut profiler,
        &clock,
        &interp,
        &[(0.0, unit, 0), (0.5, unit, 1)],
    );

    let a = profiler.lookup(&interp, 0, 0).unwrap();
    let b = profiler.lookup(&interp, 0, 0).unwrap();
    assert_eq!(a, b);
}
