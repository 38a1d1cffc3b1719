//! Behavioural tests for range expressions.

use proptest::prelude::*;

use rowspec_ranges::{Range, character_code};

#[test]
fn exact_value_is_both_bounds() {
    let range = Range::parse("42").expect("parse");
    assert!(range.contains(42));
    assert!(!range.contains(41));
    assert!(!range.contains(43));
    assert_eq!(range.exact_value(), Some(42));
}

#[test]
fn bounded_item_includes_both_ends() {
    let range = Range::parse("10...20, 30...40").expect("parse");
    for accepted in [10, 20, 30, 40, 15, 35] {
        assert!(range.contains(accepted), "{accepted} must be accepted");
    }
    for rejected in [9, 21, 29, 41] {
        assert!(!range.contains(rejected), "{rejected} must be rejected");
    }
}

#[test]
fn legacy_colon_separator_keeps_working() {
    let range = Range::parse("10:20").expect("parse");
    assert!(range.contains(10));
    assert!(range.contains(20));
    assert!(!range.contains(21));
}

#[test]
fn open_ended_items() {
    let below = Range::parse("...60").expect("parse");
    assert!(below.contains(i64::MIN));
    assert!(below.contains(60));
    assert!(!below.contains(61));

    let above = Range::parse("38000...").expect("parse");
    assert!(above.contains(38000));
    assert!(above.contains(i64::MAX));
    assert!(!above.contains(37999));
}

#[test]
fn hex_and_symbolic_and_quoted_values() {
    let range = Range::parse("0x20...0x7e, Tab, 'ä'").expect("parse");
    assert!(range.contains(0x20));
    assert!(range.contains(0x7e));
    assert!(range.contains(9));
    assert!(range.contains(i64::from(u32::from('ä'))));
    assert!(!range.contains(0x7f));
}

#[test]
fn negative_bounds() {
    let range = Range::parse("-100...-10").expect("parse");
    assert!(range.contains(-100));
    assert!(range.contains(-10));
    assert!(!range.contains(-9));
    assert!(!range.contains(0));
}

#[test]
fn overlapping_items_behave_as_union() {
    let range = Range::parse("1...10, 5...20").expect("parse");
    for value in 1..=20 {
        assert!(range.contains(value));
    }
    assert!(!range.contains(0));
    assert!(!range.contains(21));
}

#[test]
fn limits_reflect_extreme_bounds() {
    let range = Range::parse("5...10, 20...30").expect("parse");
    assert_eq!(range.lower_limit(), Some(5));
    assert_eq!(range.upper_limit(), Some(30));

    let open = Range::parse("...10, 20...").expect("parse");
    assert_eq!(open.lower_limit(), None);
    assert_eq!(open.upper_limit(), None);
}

#[test]
fn display_normalizes_items() {
    let range = Range::parse("1 ... 2,5").expect("parse");
    assert_eq!(range.to_string(), "1...2, 5");
}

#[test]
fn rejects_swapped_bounds() {
    let error = Range::parse("20...10").unwrap_err();
    assert!(error.message.contains("lower limit"), "{error}");
}

#[test]
fn rejects_empty_item_between_commas() {
    assert!(Range::parse("1,,3").is_err());
    assert!(Range::parse("1,").is_err());
    assert!(Range::parse("").is_err());
    assert!(Range::parse("   ").is_err());
}

#[test]
fn rejects_lone_ellipsis_and_extra_bounds() {
    assert!(Range::parse("...").is_err());
    assert!(Range::parse("1...2...3").is_err());
    assert!(Range::parse("1 2").is_err());
}

#[test]
fn rejects_malformed_tokens() {
    assert!(Range::parse("0x").is_err());
    assert!(Range::parse("'ab'").is_err());
    assert!(Range::parse(r"'\q'").is_err());
    assert!(Range::parse("1...x").is_err());
    assert!(Range::parse("-").is_err());
}

#[test]
fn character_code_accepts_all_spellings() {
    assert_eq!(character_code(","), Ok(','));
    assert_eq!(character_code("0x09"), Ok('\t'));
    assert_eq!(character_code("59"), Ok(';'));
    assert_eq!(character_code("tab"), Ok('\t'));
    assert_eq!(character_code(r"'\t'"), Ok('\t'));
    assert!(character_code("abc,def").is_err());
    assert!(character_code("-1").is_err());
}

/// Reference evaluation: a value is inside a list of `(lower, upper)`
/// interval bounds if any interval accepts it.
fn reference_contains(intervals: &[(Option<i64>, Option<i64>)], value: i64) -> bool {
    intervals.iter().any(|(lower, upper)| {
        lower.is_none_or(|low| value >= low) && upper.is_none_or(|up| value <= up)
    })
}

fn interval_strategy() -> impl Strategy<Value = (Option<i64>, Option<i64>)> {
    (-500i64..500, 0i64..200).prop_flat_map(|(lower, width)| {
        let upper = lower + width;
        prop_oneof![
            Just((Some(lower), Some(upper))),
            Just((None, Some(upper))),
            Just((Some(lower), None)),
        ]
    })
}

proptest! {
    /// Parsing a rendered interval list and probing it agrees with the
    /// reference union evaluation, for both separator spellings.
    #[test]
    fn contains_matches_reference(
        intervals in proptest::collection::vec(interval_strategy(), 1..6),
        probes in proptest::collection::vec(-700i64..700, 1..30),
        use_colon in proptest::bool::ANY,
    ) {
        let separator = if use_colon { ":" } else { "..." };
        let text = intervals
            .iter()
            .map(|(lower, upper)| match (lower, upper) {
                (Some(low), Some(up)) => format!("{low}{separator}{up}"),
                (None, Some(up)) => format!("{separator}{up}"),
                (Some(low), None) => format!("{low}{separator}"),
                (None, None) => unreachable!("strategy never yields unbounded items"),
            })
            .collect::<Vec<_>>()
            .join(", ");
        let range = Range::parse(&text).expect("rendered range must parse");
        for probe in probes {
            prop_assert_eq!(
                range.contains(probe),
                reference_contains(&intervals, probe),
                "probe {} against {}", probe, text
            );
        }
    }
}
