//! Property-based tests for snapshot-index using proptest.

use proptest::prelude::*;
use snapshot_core::{Record, Value};
use snapshot_index::{DimensionFilter, IndexCollection, KeyRange};

fn collection_of(values: &[i64]) -> IndexCollection {
    let records: Vec<Record> = values
        .iter()
        .enumerate()
        .map(|(i, v)| Record::from_iter([("id", Value::from(i as i64)), ("score", Value::from(*v))]))
        .collect();
    let mut collection = IndexCollection::new(records);
    collection.add_dimension("id");
    collection.add_dimension("score");
    collection
}

fn scores(records: &[&Record]) -> Vec<i64> {
    records
        .iter()
        .filter_map(|r| r.get("score").and_then(Value::as_i64))
        .collect()
}

proptest! {
    /// Bottom extraction is sorted ascending and holds every record.
    #[test]
    fn bottom_is_sorted(values in prop::collection::vec(-1000i64..1000, 0..300)) {
        let collection = collection_of(&values);
        let out = scores(&collection.dimension("score").unwrap().bottom(None));
        let mut expected = values.clone();
        expected.sort();
        prop_assert_eq!(out, expected);
    }

    /// Top extraction is the reverse of bottom extraction.
    #[test]
    fn top_reverses_bottom(values in prop::collection::vec(0i64..50, 0..200)) {
        let collection = collection_of(&values);
        let dim = collection.dimension("score").unwrap();
        let mut bottom = scores(&dim.bottom(None));
        bottom.reverse();
        prop_assert_eq!(scores(&dim.top(None)), bottom);
    }

    /// The binary-searched range path agrees with a linear scan.
    #[test]
    fn range_filter_matches_scan(
        values in prop::collection::vec(-100i64..100, 0..300),
        low in -120i64..120,
        high in -120i64..120,
    ) {
        let mut collection = collection_of(&values);
        collection
            .dimension_mut("score")
            .unwrap()
            .filter_range(KeyRange::inclusive(Value::from(low), Value::from(high)));
        let expected = values.iter().filter(|v| **v >= low && **v <= high).count();
        prop_assert_eq!(collection.filtered_len(), expected);
    }

    /// Stacked filters select the intersection of each filter alone.
    #[test]
    fn stacked_filters_intersect(
        values in prop::collection::vec(0i64..100, 0..200),
        bound in 0i64..100,
        modulus in 1i64..7,
    ) {
        let mut collection = collection_of(&values);
        let mut score = collection.dimension_mut("score").unwrap();
        score.filter_range(KeyRange::upper_bound(Value::from(bound), false));
        score.push_filter(DimensionFilter::predicate(move |v| {
            v.as_i64().map_or(false, |i| i % modulus == 0)
        }));
        let expected = values.iter().filter(|v| **v <= bound && **v % modulus == 0).count();
        prop_assert_eq!(collection.filtered_len(), expected);
    }

    /// Group counts sum to the selected record count.
    #[test]
    fn group_counts_sum(values in prop::collection::vec(0i64..20, 0..200), cut in 0i64..200) {
        let mut collection = collection_of(&values);
        collection
            .dimension_mut("id")
            .unwrap()
            .filter_range(KeyRange::lower_bound(Value::from(cut), false));
        let groups = collection.dimension("score").unwrap().group_all();
        let total: usize = groups.iter().map(|g| g.count).sum();
        prop_assert_eq!(total, collection.filtered_len());
        prop_assert!(groups.windows(2).all(|w| w[0].key < w[1].key));
    }

    /// Clearing every filter restores the full collection.
    #[test]
    fn clear_restores_all(values in prop::collection::vec(0i64..100, 0..200), pick in 0i64..100) {
        let mut collection = collection_of(&values);
        collection.dimension_mut("score").unwrap().filter_exact(pick);
        collection.dimension_mut("id").unwrap().filter_range(KeyRange::upper_bound(Value::from(50), true));
        collection.clear_all_filters();
        prop_assert_eq!(collection.filtered_len(), values.len());
    }
}

fn large_number() -> impl Strategy<Value = Value> {
    let base = 1i64 << 53;
    prop_oneof![
        (-64i64..64).prop_map(move |k| Value::Int64(base + k)),
        (-64i64..64).prop_map(move |k| Value::Float64((base + k) as f64)),
        (-64i64..64).prop_map(move |k| Value::Int64(-base - k)),
        (-64i64..64).prop_map(move |k| Value::Float64(k as f64 + 0.5)),
        (-64i64..64).prop_map(Value::Int64),
        Just(Value::Float64(f64::NAN)),
        Just(Value::Int64(i64::MAX)),
        Just(Value::Float64(f64::INFINITY)),
    ]
}

proptest! {
    /// Mixed integers and floats near the edge of f64 precision build a
    /// dimension whose extraction is ordered and transitive.
    #[test]
    fn mixed_numbers_sort_consistently(values in prop::collection::vec(large_number(), 0..400)) {
        let records: Vec<Record> = values
            .iter()
            .enumerate()
            .map(|(i, v)| Record::from_iter([("id", Value::from(i as i64)), ("v", v.clone())]))
            .collect();
        let mut collection = IndexCollection::new(records);
        collection.add_dimension("v");

        let out: Vec<Value> = collection
            .dimension("v")
            .unwrap()
            .bottom(None)
            .iter()
            .map(|r| r.get_or_null("v"))
            .collect();
        prop_assert_eq!(out.len(), values.len());
        for pair in out.windows(2) {
            prop_assert!(pair[0] <= pair[1]);
        }
        let mut expected = values.clone();
        expected.sort();
        prop_assert_eq!(out, expected);
    }

    /// Exact filters over large integers select only the identical key.
    #[test]
    fn exact_filter_separates_adjacent_large_ints(k in 0i64..32) {
        let base = 1i64 << 53;
        let values: Vec<i64> = (0..32).map(|i| base + i).collect();
        let mut collection = collection_of(&values);
        collection.dimension_mut("score").unwrap().filter_exact(Value::Int64(base + k));
        prop_assert_eq!(scores(&collection.filtered()), vec![base + k]);
    }
}
