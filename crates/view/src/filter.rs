//! Filter requests and their routing onto dimensions.
//!
//! A filter request names one or more dimension keys, a `FilterDescriptor`
//! and a `FilterMode`. Keys that do not name a dimension are logged and
//! skipped; the remaining keys are still filtered.

use hashbrown::HashSet;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use snapshot_core::{Error, Result, Value};
use snapshot_index::{DimensionFilter, IndexCollection, KeyRange};

/// How a new filter combines with a dimension's existing filters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    /// Clear the dimension's filters, then apply.
    #[default]
    Replace,
    /// Narrow the dimension's current selection further.
    Compose,
}

/// A filter over one dimension's values.
#[derive(Clone, Debug, PartialEq)]
pub enum FilterDescriptor {
    /// Value equals.
    Exact(Value),
    /// Value is one of.
    InSet(Vec<Value>),
    /// Value is none of.
    NotInSet(Vec<Value>),
    /// Case-insensitive unanchored pattern over the value's text.
    Fuzzy(String),
    /// Pattern over the value's text. Flags `i`, `m` and `s` are honoured,
    /// others ignored.
    Pattern { pattern: String, flags: String },
    /// Inclusive range `[low, high]`.
    Range { low: Value, high: Value },
}

impl FilterDescriptor {
    pub fn exact(value: impl Into<Value>) -> Self {
        FilterDescriptor::Exact(value.into())
    }

    pub fn range(low: impl Into<Value>, high: impl Into<Value>) -> Self {
        FilterDescriptor::Range {
            low: low.into(),
            high: high.into(),
        }
    }

    pub fn fuzzy(pattern: impl Into<String>) -> Self {
        FilterDescriptor::Fuzzy(pattern.into())
    }

    pub fn pattern(pattern: impl Into<String>, flags: impl Into<String>) -> Self {
        FilterDescriptor::Pattern {
            pattern: pattern.into(),
            flags: flags.into(),
        }
    }

    /// Builds the dimension filter for this descriptor.
    ///
    /// Fails only for malformed patterns.
    pub fn compile(&self) -> Result<DimensionFilter> {
        let filter = match self {
            FilterDescriptor::Exact(value) => DimensionFilter::exact(value.clone()),
            FilterDescriptor::Range { low, high } => {
                DimensionFilter::Range(KeyRange::inclusive(low.clone(), high.clone()))
            }
            FilterDescriptor::InSet(values) => {
                let set: HashSet<Value> = values.iter().cloned().collect();
                DimensionFilter::predicate(move |v| set.contains(v))
            }
            FilterDescriptor::NotInSet(values) => {
                let set: HashSet<Value> = values.iter().cloned().collect();
                DimensionFilter::predicate(move |v| !set.contains(v))
            }
            FilterDescriptor::Fuzzy(pattern) => text_filter(compile_pattern(pattern, "i")?),
            FilterDescriptor::Pattern { pattern, flags } => text_filter(compile_pattern(pattern, flags)?),
        };
        Ok(filter)
    }
}

/// Compiles a client pattern. Matching runs in time linear in the input.
fn compile_pattern(pattern: &str, flags: &str) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(flags.contains('i'))
        .multi_line(flags.contains('m'))
        .dot_matches_new_line(flags.contains('s'))
        .build()
        .map_err(|err| Error::invalid_pattern(pattern, err.to_string()))
}

fn text_filter(regex: Regex) -> DimensionFilter {
    DimensionFilter::predicate(move |v| !v.is_null() && regex.is_match(&v.to_text()))
}

/// One or many dimension keys.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "KeyListRepr")]
pub struct KeyList(Vec<String>);

#[derive(Deserialize)]
#[serde(untagged)]
enum KeyListRepr {
    One(String),
    Many(Vec<String>),
}

impl From<KeyListRepr> for KeyList {
    fn from(repr: KeyListRepr) -> Self {
        match repr {
            KeyListRepr::One(key) => KeyList(vec![key]),
            KeyListRepr::Many(keys) => KeyList(keys),
        }
    }
}

impl KeyList {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for KeyList {
    fn from(key: &str) -> Self {
        KeyList(vec![key.to_string()])
    }
}

impl From<String> for KeyList {
    fn from(key: String) -> Self {
        KeyList(vec![key])
    }
}

impl From<Vec<String>> for KeyList {
    fn from(keys: Vec<String>) -> Self {
        KeyList(keys)
    }
}

impl From<Vec<&str>> for KeyList {
    fn from(keys: Vec<&str>) -> Self {
        KeyList(keys.into_iter().map(String::from).collect())
    }
}

impl From<&[&str]> for KeyList {
    fn from(keys: &[&str]) -> Self {
        KeyList(keys.iter().map(|k| k.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for KeyList {
    fn from(keys: [&str; N]) -> Self {
        KeyList(keys.iter().map(|k| k.to_string()).collect())
    }
}

/// Outcome of a filter request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterReport {
    /// Keys whose dimension was filtered.
    pub applied: Vec<String>,
    /// Keys that named no dimension.
    pub skipped: Vec<String>,
}

/// Applies `descriptor` to every dimension named in `keys`.
///
/// A malformed pattern is logged and installed as a filter that matches
/// nothing.
pub fn apply_filter(
    collection: &mut IndexCollection,
    keys: &KeyList,
    descriptor: &FilterDescriptor,
    mode: FilterMode,
) -> FilterReport {
    let mut report = FilterReport::default();
    for key in keys.iter() {
        match apply_one(collection, key, descriptor, mode) {
            Ok(()) => report.applied.push(key.to_string()),
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "filter key skipped");
                report.skipped.push(key.to_string());
            }
        }
    }
    report
}

fn apply_one(
    collection: &mut IndexCollection,
    key: &str,
    descriptor: &FilterDescriptor,
    mode: FilterMode,
) -> Result<()> {
    let mut dimension = collection
        .dimension_mut(key)
        .ok_or_else(|| Error::unknown_dimension(key))?;

    let filter = descriptor.compile().unwrap_or_else(|err| {
        tracing::warn!(key = %key, error = %err, "pattern matches nothing");
        DimensionFilter::predicate(|_| false)
    });

    if mode == FilterMode::Replace {
        dimension.filter_clear();
    }
    dimension.push_filter(filter);
    Ok(())
}

/// Clears the filters of one dimension.
pub fn clear_filter(collection: &mut IndexCollection, key: &str) -> Result<()> {
    collection
        .dimension_mut(key)
        .ok_or_else(|| Error::unknown_dimension(key))?
        .filter_clear();
    Ok(())
}

/// Clears the filters of every dimension.
pub fn clear_filters(collection: &mut IndexCollection) {
    collection.clear_all_filters();
}

#[cfg(test)]
mod tests {
    use super::*;
    use snapshot_core::Record;

    fn people() -> IndexCollection {
        let records: Vec<Record> = [
            (1, "Adam"),
            (2, "Masha"),
            (3, "Karl"),
            (4, "Brian"),
            (5, "Simon"),
            (6, "Artem"),
        ]
        .iter()
        .map(|(id, name)| Record::from_iter([("id", Value::from(*id)), ("name", Value::from(*name))]))
        .collect();
        let mut collection = IndexCollection::new(records);
        collection.add_dimension("id");
        collection.add_dimension("name");
        collection
    }

    fn selected_ids(collection: &IndexCollection) -> Vec<i64> {
        collection
            .filtered()
            .iter()
            .filter_map(|r| r.get("id").and_then(Value::as_i64))
            .collect()
    }

    #[test]
    fn test_exact_filter() {
        let mut collection = people();
        let report = apply_filter(
            &mut collection,
            &"name".into(),
            &FilterDescriptor::exact("Adam"),
            FilterMode::Replace,
        );
        assert_eq!(report.applied, vec!["name"]);
        assert_eq!(selected_ids(&collection), vec![1]);
    }

    #[test]
    fn test_unknown_key_skipped() {
        let mut collection = people();
        let report = apply_filter(
            &mut collection,
            &["surname", "id"].into(),
            &FilterDescriptor::range(2, 3),
            FilterMode::Replace,
        );
        assert_eq!(report.skipped, vec!["surname"]);
        assert_eq!(report.applied, vec!["id"]);
        assert_eq!(selected_ids(&collection), vec![2, 3]);
    }

    #[test]
    fn test_replace_clears_previous() {
        let mut collection = people();
        let keys = KeyList::from("id");
        apply_filter(&mut collection, &keys, &FilterDescriptor::range(1, 2), FilterMode::Replace);
        apply_filter(&mut collection, &keys, &FilterDescriptor::range(5, 6), FilterMode::Replace);
        assert_eq!(selected_ids(&collection), vec![5, 6]);
    }

    #[test]
    fn test_compose_narrows() {
        let mut collection = people();
        let keys = KeyList::from("name");
        apply_filter(&mut collection, &keys, &FilterDescriptor::fuzzy("a"), FilterMode::Replace);
        assert_eq!(selected_ids(&collection), vec![1, 2, 3, 4, 6]);
        apply_filter(&mut collection, &keys, &FilterDescriptor::fuzzy("r"), FilterMode::Compose);
        assert_eq!(selected_ids(&collection), vec![3, 4, 6]);
    }

    #[test]
    fn test_set_filters() {
        let mut collection = people();
        let keys = KeyList::from("name");
        let names = vec![Value::from("Karl"), Value::from("Simon")];
        apply_filter(&mut collection, &keys, &FilterDescriptor::InSet(names.clone()), FilterMode::Replace);
        assert_eq!(selected_ids(&collection), vec![3, 5]);
        apply_filter(&mut collection, &keys, &FilterDescriptor::NotInSet(names), FilterMode::Replace);
        assert_eq!(selected_ids(&collection), vec![1, 2, 4, 6]);
    }

    #[test]
    fn test_pattern_flags() {
        let mut collection = people();
        let keys = KeyList::from("name");
        apply_filter(&mut collection, &keys, &FilterDescriptor::pattern("^a", ""), FilterMode::Replace);
        assert!(selected_ids(&collection).is_empty());
        apply_filter(&mut collection, &keys, &FilterDescriptor::pattern("^a", "i"), FilterMode::Replace);
        assert_eq!(selected_ids(&collection), vec![1, 6]);
    }

    #[test]
    fn test_pattern_alternation_and_repeats() {
        let mut collection = people();
        let keys = KeyList::from("name");
        apply_filter(&mut collection, &keys, &FilterDescriptor::pattern("^(adam|karl)$", "i"), FilterMode::Replace);
        assert_eq!(selected_ids(&collection), vec![1, 3]);
        apply_filter(&mut collection, &keys, &FilterDescriptor::pattern("^[a-z]{4}$", "i"), FilterMode::Replace);
        assert_eq!(selected_ids(&collection), vec![1, 3]);
        apply_filter(&mut collection, &keys, &FilterDescriptor::fuzzy("sh|mo"), FilterMode::Replace);
        assert_eq!(selected_ids(&collection), vec![2, 5]);
    }

    #[test]
    fn test_nested_repeats_stay_fast() {
        let records: Vec<Record> = (0..20)
            .map(|i| Record::from_iter([("id", Value::from(i)), ("text", Value::from("a".repeat(24)))]))
            .collect();
        let mut collection = IndexCollection::new(records);
        collection.add_dimension("text");

        let started = std::time::Instant::now();
        apply_filter(
            &mut collection,
            &"text".into(),
            &FilterDescriptor::fuzzy("a*a*a*a*a*a*b"),
            FilterMode::Replace,
        );
        assert_eq!(collection.filtered_len(), 0);
        apply_filter(&mut collection, &"text".into(), &FilterDescriptor::fuzzy("(a+)+$"), FilterMode::Replace);
        assert_eq!(collection.filtered_len(), 20);
        assert!(started.elapsed() < std::time::Duration::from_secs(2));
    }

    #[test]
    fn test_numeric_fuzzy_uses_text() {
        let mut collection = people();
        apply_filter(&mut collection, &"id".into(), &FilterDescriptor::fuzzy("^4$"), FilterMode::Replace);
        assert_eq!(selected_ids(&collection), vec![4]);
    }

    #[test]
    fn test_invalid_pattern_matches_nothing() {
        assert!(FilterDescriptor::pattern("[a-", "").compile().is_err());
        assert!(matches!(
            FilterDescriptor::pattern("(adam", "i").compile(),
            Err(Error::InvalidPattern { .. })
        ));
        let mut collection = people();
        let report = apply_filter(&mut collection, &"name".into(), &FilterDescriptor::fuzzy("[a-"), FilterMode::Replace);
        assert_eq!(report.applied, vec!["name"]);
        assert_eq!(collection.filtered_len(), 0);
    }

    #[test]
    fn test_clear_filter() {
        let mut collection = people();
        apply_filter(&mut collection, &"name".into(), &FilterDescriptor::exact("Karl"), FilterMode::Replace);
        assert!(clear_filter(&mut collection, "name").is_ok());
        assert_eq!(collection.filtered_len(), 6);
        assert!(clear_filter(&mut collection, "name").is_ok());
        assert_eq!(collection.filtered_len(), 6);
        assert!(matches!(
            clear_filter(&mut collection, "surname"),
            Err(Error::UnknownDimension { .. })
        ));
    }

    #[test]
    fn test_clear_filters() {
        let mut collection = people();
        apply_filter(&mut collection, &"name".into(), &FilterDescriptor::exact("Karl"), FilterMode::Replace);
        apply_filter(&mut collection, &"id".into(), &FilterDescriptor::exact(1), FilterMode::Replace);
        clear_filters(&mut collection);
        assert_eq!(collection.filtered_len(), 6);
    }

    #[test]
    fn test_key_list_serde() {
        let one: KeyList = serde_json::from_str("\"name\"").unwrap();
        assert_eq!(one, KeyList::from("name"));
        let many: KeyList = serde_json::from_str("[\"id\", \"name\"]").unwrap();
        assert_eq!(many.iter().collect::<Vec<_>>(), vec!["id", "name"]);
    }
}
