//! Parameter store validation tests

use comtrade::params::{MAX_LIMIT, names};
use comtrade::{ComtradeError, ParameterStore};
use rstest::*;

#[fixture]
fn store() -> ParameterStore {
    ParameterStore::new()
}

#[rstest]
#[case(0)]
#[case(-1)]
#[case(50_001)]
fn test_limit_out_of_range(mut store: ParameterStore, #[case] limit: i64) {
    let err = store.set_limit(limit).unwrap_err();
    assert!(matches!(err, ComtradeError::InvalidParameter { ref name, .. } if name == names::LIMIT));
    assert_eq!(store.get(names::LIMIT), Some("50000"));
}

#[rstest]
#[case(1, "1")]
#[case(MAX_LIMIT, "50000")]
fn test_limit_in_range(mut store: ParameterStore, #[case] limit: i64, #[case] expected: &str) {
    store.set_limit(limit).unwrap();
    assert_eq!(store.get(names::LIMIT), Some(expected));
}

#[rstest]
#[case("all", true)]
#[case("0", true)]
#[case("842", true)]
#[case("-1", false)]
#[case("USA", false)]
#[case("", false)]
#[case("All", false)]
fn test_area_codes(mut store: ParameterStore, #[case] value: &str, #[case] accepted: bool) {
    assert_eq!(store.set_reporter(value).is_ok(), accepted);
    assert_eq!(store.set_partner_area(value).is_ok(), accepted);
    if accepted {
        assert_eq!(store.get(names::REPORTER), Some(value));
        assert_eq!(store.get(names::PARTNER_AREA), Some(value));
    } else {
        assert_eq!(store.get(names::REPORTER), Some("all"));
        assert_eq!(store.get(names::PARTNER_AREA), Some("all"));
    }
}

#[rstest]
#[case("all", true)]
#[case("1", true)]
#[case("4", true)]
#[case("0", false)]
#[case("-2", false)]
#[case("exports", false)]
fn test_trade_flow(mut store: ParameterStore, #[case] value: &str, #[case] accepted: bool) {
    assert_eq!(store.set_trade_flow(value).is_ok(), accepted);
}

#[rstest]
#[case("C", true)]
#[case("S", true)]
#[case("c", false)]
#[case("X", false)]
fn test_trade_data_type(mut store: ParameterStore, #[case] value: &str, #[case] accepted: bool) {
    assert_eq!(store.set_trade_data_type(value).is_ok(), accepted);
}

#[rstest]
fn test_free_form_parameters(mut store: ParameterStore) {
    store.set_data_frequency("M");
    store.set_time_period("201501,201502");
    store.set_classification("H4");
    store.set_classification_code("AG2");

    assert_eq!(store.get(names::DATA_FREQUENCY), Some("M"));
    assert_eq!(store.get(names::TIME_PERIOD), Some("201501,201502"));
    assert_eq!(store.get(names::CLASSIFICATION), Some("H4"));
    assert_eq!(store.get(names::CLASSIFICATION_CODE), Some("AG2"));
}

#[rstest]
fn test_later_set_overwrites(mut store: ParameterStore) {
    let before = store.len();
    store.set_reporter("40").unwrap();
    store.set_reporter("842").unwrap();

    assert_eq!(store.get(names::REPORTER), Some("842"));
    assert_eq!(store.len(), before);
}

#[rstest]
fn test_iteration_is_lexicographic(store: ParameterStore) {
    let keys: Vec<_> = store.iter().map(|(name, _)| name).collect();
    let mut sorted = keys.clone();
    sorted.sort_unstable();
    assert_eq!(keys, sorted);
}
