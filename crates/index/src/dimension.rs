//! A single per-field dimension.
//!
//! A dimension keeps every record's value for one field in ascending order,
//! plus a stack of filters and the resulting per-record pass mask.

use crate::traits::DimensionFilter;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use snapshot_core::{Record, RecordIndex, Value};

pub(crate) struct Dimension {
    name: String,
    /// `(value, record)` pairs sorted by value, ties broken by record position.
    entries: Vec<(Value, RecordIndex)>,
    filters: Vec<DimensionFilter>,
    /// Indexed by record position: true when every filter on the stack accepts it.
    passes: Vec<bool>,
}

impl Dimension {
    /// Indexes one field of `records`. Records missing the field index as Null.
    pub(crate) fn build(name: String, records: &[Record]) -> Self {
        let mut entries: Vec<(Value, RecordIndex)> = records
            .iter()
            .enumerate()
            .map(|(i, r)| (r.get_or_null(&name), i as RecordIndex))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));
        Self {
            name,
            entries,
            filters: Vec::new(),
            passes: vec![true; records.len()],
        }
    }

    #[inline]
    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub(crate) fn entries(&self) -> &[(Value, RecordIndex)] {
        &self.entries
    }

    #[inline]
    pub(crate) fn has_filter(&self) -> bool {
        !self.filters.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn filter_count(&self) -> usize {
        self.filters.len()
    }

    #[cfg(test)]
    pub(crate) fn passes(&self, index: RecordIndex) -> bool {
        self.passes[index as usize]
    }

    pub(crate) fn push(&mut self, filter: DimensionFilter) {
        self.filters.push(filter);
    }

    pub(crate) fn clear(&mut self) {
        self.filters.clear();
    }

    /// Recomputes the pass mask from the filter stack.
    ///
    /// Returns the positions whose pass state flipped, with the new state.
    pub(crate) fn refresh(&mut self) -> Vec<(RecordIndex, bool)> {
        let next = self.evaluate();
        let mut changed = Vec::new();
        for (i, (old, new)) in self.passes.iter().zip(next.iter()).enumerate() {
            if old != new {
                changed.push((i as RecordIndex, *new));
            }
        }
        self.passes = next;
        changed
    }

    fn evaluate(&self) -> Vec<bool> {
        match self.filters.as_slice() {
            [] => vec![true; self.passes.len()],
            // A lone interval selects a contiguous run of the sorted entries.
            [DimensionFilter::Range(range)] => {
                let mut mask = vec![false; self.passes.len()];
                let start = self.entries.partition_point(|(v, _)| range.is_below(v));
                let end = self
                    .entries
                    .partition_point(|(v, _)| !range.is_above(v))
                    .max(start);
                for (_, index) in &self.entries[start..end] {
                    mask[*index as usize] = true;
                }
                mask
            }
            filters => {
                let mut mask = vec![false; self.passes.len()];
                for (value, index) in &self.entries {
                    mask[*index as usize] = filters.iter().all(|f| f.matches(value));
                }
                mask
            }
        }
    }
}
