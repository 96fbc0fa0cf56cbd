//! The indexed record collection.
//!
//! `IndexCollection` owns a shared immutable record array and the dimensions
//! built over it. A record is *selected* when no dimension's filter stack
//! rejects it; every extraction (top/bottom, groups, min/max, `filtered`) sees
//! only selected records.

use crate::dimension::Dimension;
use crate::group::{count_sorted, GroupCount};
use crate::traits::{DimensionFilter, KeyRange};
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;
use hashbrown::HashMap;
use snapshot_core::{Record, RecordIndex, Value};

/// An in-memory record collection with per-field dimensions.
pub struct IndexCollection {
    records: Arc<[Record]>,
    dimensions: Vec<Dimension>,
    positions: HashMap<String, usize>,
    /// Indexed by record position: number of dimensions currently rejecting it.
    rejections: Vec<u32>,
}

impl IndexCollection {
    /// Creates a collection with no dimensions.
    pub fn new(records: impl Into<Arc<[Record]>>) -> Self {
        let records = records.into();
        let len = records.len();
        Self {
            records,
            dimensions: Vec::new(),
            positions: HashMap::new(),
            rejections: vec![0; len],
        }
    }

    /// Returns the shared record array.
    pub fn records(&self) -> &Arc<[Record]> {
        &self.records
    }

    /// Returns the number of records, selected or not.
    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the collection holds no records.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Builds the dimension for field `name`.
    ///
    /// Returns false (and does nothing) if the dimension already exists.
    pub fn add_dimension(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.positions.contains_key(&name) {
            return false;
        }
        let dimension = Dimension::build(name.clone(), &self.records);
        self.positions.insert(name, self.dimensions.len());
        self.dimensions.push(dimension);
        true
    }

    /// Returns true if a dimension named `name` exists.
    pub fn has_dimension(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    /// Iterates over dimension names in creation order.
    pub fn dimension_names(&self) -> impl Iterator<Item = &str> {
        self.dimensions.iter().map(Dimension::name)
    }

    /// Returns the number of dimensions.
    pub fn dimension_count(&self) -> usize {
        self.dimensions.len()
    }

    /// Read access to a dimension.
    pub fn dimension(&self, name: &str) -> Option<DimensionRef<'_>> {
        let position = *self.positions.get(name)?;
        Some(DimensionRef {
            collection: self,
            position,
        })
    }

    /// Filter access to a dimension.
    pub fn dimension_mut(&mut self, name: &str) -> Option<DimensionMut<'_>> {
        let position = *self.positions.get(name)?;
        Some(DimensionMut {
            collection: self,
            position,
        })
    }

    /// Returns true if the record at `index` passes every dimension.
    #[inline]
    pub fn is_selected(&self, index: RecordIndex) -> bool {
        self.rejections
            .get(index as usize)
            .map_or(false, |count| *count == 0)
    }

    /// Selected records in collection order.
    pub fn filtered(&self) -> Vec<&Record> {
        self.records
            .iter()
            .zip(self.rejections.iter())
            .filter(|(_, rejected)| **rejected == 0)
            .map(|(record, _)| record)
            .collect()
    }

    /// Number of selected records.
    pub fn filtered_len(&self) -> usize {
        self.rejections.iter().filter(|r| **r == 0).count()
    }

    /// Clears the filter stack of every dimension.
    pub fn clear_all_filters(&mut self) {
        for position in 0..self.dimensions.len() {
            if self.dimensions[position].has_filter() {
                self.dimensions[position].clear();
                self.refresh(position);
            }
        }
    }

    fn refresh(&mut self, position: usize) {
        for (index, passes) in self.dimensions[position].refresh() {
            let slot = &mut self.rejections[index as usize];
            if passes {
                *slot = slot.saturating_sub(1);
            } else {
                *slot += 1;
            }
        }
    }
}

impl core::fmt::Debug for IndexCollection {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("IndexCollection")
            .field("records", &self.records.len())
            .field("dimensions", &self.dimensions.iter().map(Dimension::name).collect::<Vec<_>>())
            .field("selected", &self.filtered_len())
            .finish()
    }
}

/// Read handle to one dimension of an `IndexCollection`.
#[derive(Clone, Copy)]
pub struct DimensionRef<'a> {
    collection: &'a IndexCollection,
    position: usize,
}

impl<'a> DimensionRef<'a> {
    fn dimension(&self) -> &'a Dimension {
        &self.collection.dimensions[self.position]
    }

    fn selected(&self) -> impl DoubleEndedIterator<Item = &'a (Value, RecordIndex)> + 'a {
        let collection = self.collection;
        self.dimension()
            .entries()
            .iter()
            .filter(move |(_, index)| collection.is_selected(*index))
    }

    /// The dimension's field name.
    pub fn name(&self) -> &'a str {
        self.dimension().name()
    }

    /// Returns true if this dimension has at least one filter.
    pub fn has_filter(&self) -> bool {
        self.dimension().has_filter()
    }

    /// Selected records in descending value order, at most `limit` of them.
    pub fn top(&self, limit: Option<usize>) -> Vec<&'a Record> {
        let records = &self.collection.records;
        self.selected()
            .rev()
            .take(limit.unwrap_or(usize::MAX))
            .map(move |(_, index)| &records[*index as usize])
            .collect()
    }

    /// Selected records in ascending value order, at most `limit` of them.
    pub fn bottom(&self, limit: Option<usize>) -> Vec<&'a Record> {
        let records = &self.collection.records;
        self.selected()
            .take(limit.unwrap_or(usize::MAX))
            .map(move |(_, index)| &records[*index as usize])
            .collect()
    }

    /// Counts of selected records per distinct value, ascending by value.
    /// Values with no selected record are omitted.
    pub fn group_all(&self) -> Vec<GroupCount> {
        count_sorted(self.selected().map(|(value, _)| value))
    }

    /// Smallest selected value.
    pub fn min(&self) -> Option<&'a Value> {
        self.selected().next().map(|(value, _)| value)
    }

    /// Largest selected value.
    pub fn max(&self) -> Option<&'a Value> {
        self.selected().next_back().map(|(value, _)| value)
    }
}

/// Filter handle to one dimension of an `IndexCollection`.
///
/// `filter_*` methods replace the dimension's filter stack; `push_filter`
/// narrows it further.
pub struct DimensionMut<'a> {
    collection: &'a mut IndexCollection,
    position: usize,
}

impl DimensionMut<'_> {
    /// The dimension's field name.
    pub fn name(&self) -> &str {
        self.collection.dimensions[self.position].name()
    }

    /// Keeps only records whose value equals `value`.
    pub fn filter_exact(&mut self, value: impl Into<Value>) {
        self.replace(DimensionFilter::exact(value));
    }

    /// Keeps only records whose value lies in `range`.
    pub fn filter_range(&mut self, range: KeyRange<Value>) {
        self.replace(DimensionFilter::Range(range));
    }

    /// Keeps only records whose value satisfies `f`.
    pub fn filter_predicate<F>(&mut self, f: F)
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.replace(DimensionFilter::predicate(f));
    }

    /// Adds `filter` on top of the existing stack.
    pub fn push_filter(&mut self, filter: DimensionFilter) {
        self.collection.dimensions[self.position].push(filter);
        self.collection.refresh(self.position);
    }

    /// Removes every filter from this dimension.
    pub fn filter_clear(&mut self) {
        if self.collection.dimensions[self.position].has_filter() {
            self.collection.dimensions[self.position].clear();
            self.collection.refresh(self.position);
        }
    }

    fn replace(&mut self, filter: DimensionFilter) {
        let dimension = &mut self.collection.dimensions[self.position];
        dimension.clear();
        dimension.push(filter);
        self.collection.refresh(self.position);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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

    fn names(records: &[&Record]) -> Vec<String> {
        records
            .iter()
            .filter_map(|r| r.get("name").and_then(Value::as_str).map(String::from))
            .collect()
    }

    fn ids(records: &[&Record]) -> Vec<i64> {
        records.iter().filter_map(|r| r.get("id").and_then(Value::as_i64)).collect()
    }

    #[test]
    fn test_add_dimension_once() {
        let mut collection = people();
        assert!(!collection.add_dimension("id"));
        assert_eq!(collection.dimension_count(), 2);
        assert_eq!(collection.dimension_names().collect::<Vec<_>>(), vec!["id", "name"]);
        assert!(collection.dimension("surname").is_none());
    }

    #[test]
    fn test_bottom_and_top() {
        let collection = people();
        let name = collection.dimension("name").unwrap();
        assert_eq!(names(&name.bottom(Some(3))), vec!["Adam", "Artem", "Brian"]);
        assert_eq!(names(&name.top(Some(2))), vec!["Simon", "Masha"]);
        assert_eq!(name.bottom(None).len(), 6);
    }

    #[test]
    fn test_filter_exact() {
        let mut collection = people();
        collection.dimension_mut("name").unwrap().filter_exact("Adam");
        assert_eq!(collection.filtered_len(), 1);
        let id = collection.dimension("id").unwrap();
        assert_eq!(ids(&id.bottom(None)), vec![1]);
    }

    #[test]
    fn test_filter_range_inclusive_descending() {
        let mut collection = people();
        collection
            .dimension_mut("id")
            .unwrap()
            .filter_range(KeyRange::inclusive(Value::from(2), Value::from(4)));
        let id = collection.dimension("id").unwrap();
        assert_eq!(ids(&id.top(None)), vec![4, 3, 2]);
    }

    #[test]
    fn test_filters_intersect_across_dimensions() {
        let mut collection = people();
        collection
            .dimension_mut("id")
            .unwrap()
            .filter_range(KeyRange::upper_bound(Value::from(4), false));
        collection
            .dimension_mut("name")
            .unwrap()
            .filter_predicate(|v| v.as_str().map_or(false, |s| s.starts_with('A') || s.starts_with('M')));
        assert_eq!(ids(&collection.filtered()), vec![1, 2]);
    }

    #[test]
    fn test_filter_replace_vs_push() {
        let mut collection = people();
        let mut id = collection.dimension_mut("id").unwrap();
        id.filter_range(KeyRange::lower_bound(Value::from(3), false));
        id.filter_range(KeyRange::upper_bound(Value::from(2), false));
        assert_eq!(collection.filtered_len(), 2);

        let mut id = collection.dimension_mut("id").unwrap();
        id.push_filter(DimensionFilter::exact(2));
        assert_eq!(ids(&collection.filtered()), vec![2]);
    }

    #[test]
    fn test_filter_clear() {
        let mut collection = people();
        collection.dimension_mut("name").unwrap().filter_exact("Karl");
        collection.dimension_mut("name").unwrap().filter_clear();
        assert_eq!(collection.filtered_len(), 6);
        // clearing a clear dimension is a no-op
        collection.dimension_mut("name").unwrap().filter_clear();
        assert_eq!(collection.filtered_len(), 6);
    }

    #[test]
    fn test_clear_all_filters() {
        let mut collection = people();
        collection.dimension_mut("name").unwrap().filter_exact("Karl");
        collection.dimension_mut("id").unwrap().filter_exact(1);
        assert_eq!(collection.filtered_len(), 0);
        collection.clear_all_filters();
        assert_eq!(collection.filtered_len(), 6);
        assert!(!collection.dimension("id").unwrap().has_filter());
    }

    #[test]
    fn test_group_all_sees_filters() {
        let records: Vec<Record> = ["a", "b", "a", "c", "a"]
            .iter()
            .enumerate()
            .map(|(i, w)| Record::from_iter([("id", Value::from(i as i64)), ("word", Value::from(*w))]))
            .collect();
        let mut collection = IndexCollection::new(records);
        collection.add_dimension("id");
        collection.add_dimension("word");

        let groups = collection.dimension("word").unwrap().group_all();
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0], GroupCount { key: Value::from("a"), count: 3 });

        collection
            .dimension_mut("id")
            .unwrap()
            .filter_range(KeyRange::inclusive(Value::from(1), Value::from(3)));
        let groups = collection.dimension("word").unwrap().group_all();
        assert_eq!(
            groups,
            vec![
                GroupCount { key: Value::from("a"), count: 1 },
                GroupCount { key: Value::from("b"), count: 1 },
                GroupCount { key: Value::from("c"), count: 1 },
            ]
        );
    }

    #[test]
    fn test_group_all_applies_own_filter() {
        let mut collection = people();
        collection
            .dimension_mut("name")
            .unwrap()
            .filter_range(KeyRange::inclusive(Value::from("Adam"), Value::from("Brian")));
        let groups = collection.dimension("name").unwrap().group_all();
        let keys: Vec<&Value> = groups.iter().map(|g| &g.key).collect();
        assert_eq!(keys, vec![&Value::from("Adam"), &Value::from("Artem"), &Value::from("Brian")]);
        assert!(groups.iter().all(|g| g.count == 1));
    }

    #[test]
    fn test_rejections_past_u16_dimensions() {
        let mut collection = IndexCollection::new(vec![Record::from_iter([("id", Value::from(1))])]);
        let count = usize::from(u16::MAX) + 10;
        for i in 0..count {
            let key = alloc::format!("f{}", i);
            collection.add_dimension(key.clone());
            collection.dimension_mut(&key).unwrap().filter_exact(0);
        }
        assert_eq!(collection.filtered_len(), 0);
        collection.clear_all_filters();
        assert_eq!(collection.filtered_len(), 1);
    }

    #[test]
    fn test_min_max() {
        let mut collection = people();
        let id = collection.dimension("id").unwrap();
        assert_eq!(id.min(), Some(&Value::from(1)));
        assert_eq!(id.max(), Some(&Value::from(6)));

        collection.dimension_mut("name").unwrap().filter_exact("nobody");
        let id = collection.dimension("id").unwrap();
        assert_eq!(id.min(), None);
        assert_eq!(id.max(), None);
    }

    #[test]
    fn test_shared_records_isolated_filters() {
        let a = people();
        let mut b = IndexCollection::new(a.records().clone());
        b.add_dimension("id");
        b.dimension_mut("id").unwrap().filter_exact(3);
        assert_eq!(a.filtered_len(), 6);
        assert_eq!(b.filtered_len(), 1);
        assert!(Arc::ptr_eq(a.records(), b.records()));
    }

    #[test]
    fn test_empty_collection() {
        let mut collection = IndexCollection::new(Vec::<Record>::new());
        assert!(collection.is_empty());
        collection.add_dimension("id");
        let id = collection.dimension("id").unwrap();
        assert!(id.top(None).is_empty());
        assert!(id.group_all().is_empty());
        assert!(collection.filtered().is_empty());
    }
}
