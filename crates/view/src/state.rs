//! Per-session view configuration and derived state.

use crate::delta::DeltaEncoder;
use crate::filter::KeyList;
use crate::sort::{SortDirection, Sorting};

/// Page size of a view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageSize {
    /// Fixed page size; `Fixed(0)` puts every record on one page.
    Fixed(usize),
    /// No finite page size: the page size is the filtered record count.
    Unbounded,
}

impl Default for PageSize {
    fn default() -> Self {
        PageSize::Fixed(0)
    }
}

impl PageSize {
    /// Number of pages needed for `models` records. Never less than one.
    pub fn page_count(self, models: usize) -> usize {
        match self {
            PageSize::Fixed(n) if n > 0 => models.div_ceil(n).max(1),
            _ => 1,
        }
    }

    /// Index range of page `page_number` (1-based) within `models` records.
    pub fn bounds(self, page_number: usize, models: usize) -> (usize, usize) {
        match self {
            PageSize::Fixed(n) if n > 0 => {
                let start = page_number.saturating_sub(1).saturating_mul(n).min(models);
                (start, start.saturating_add(n).min(models))
            }
            _ => (0, models),
        }
    }
}

/// Configuration and derived state of one view.
#[derive(Clone, Debug)]
pub struct ViewState {
    pub(crate) per_page: PageSize,
    pub(crate) page_number: usize,
    pub(crate) sorting: Sorting,
    pub(crate) groups: KeyList,
    pub(crate) ranges: KeyList,
    pub(crate) partition: usize,
    pub(crate) delta_enabled: bool,
    pub(crate) delta: DeltaEncoder,
    pub(crate) last_page_number: usize,
    pub(crate) emit_suspended: bool,
    pub(crate) primary_key: Option<String>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            per_page: PageSize::default(),
            page_number: 1,
            sorting: Sorting::default(),
            groups: KeyList::default(),
            ranges: KeyList::default(),
            partition: 0,
            delta_enabled: false,
            delta: DeltaEncoder::new(),
            last_page_number: 1,
            emit_suspended: false,
            primary_key: None,
        }
    }
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a page size; negative sizes become 0.
    pub fn set_per_page(&mut self, per_page: i64) {
        self.per_page = PageSize::Fixed(usize::try_from(per_page).unwrap_or(0));
    }

    pub fn set_per_page_unbounded(&mut self) {
        self.per_page = PageSize::Unbounded;
    }

    /// Moves to page `page_number`.
    ///
    /// Before a collection is loaded any positive number is stored and the
    /// call reports no change. Afterwards numbers outside
    /// `1..=last_page_number` are rejected.
    pub fn set_page_number(&mut self, page_number: i64, loaded: bool) -> bool {
        let Ok(page_number) = usize::try_from(page_number) else {
            return false;
        };
        if page_number == 0 {
            return false;
        }
        if !loaded {
            self.page_number = page_number;
            return false;
        }
        if page_number > self.last_page_number {
            return false;
        }
        self.page_number = page_number;
        true
    }

    pub fn set_sort_by(&mut self, key: impl Into<String>, direction: Option<SortDirection>) {
        self.sorting.sort_by(key, direction);
    }

    pub fn set_groups(&mut self, keys: impl Into<KeyList>) {
        self.groups = keys.into();
    }

    pub fn set_ranges(&mut self, keys: impl Into<KeyList>) {
        self.ranges = keys.into();
    }

    pub fn set_partition(&mut self, partition: usize) {
        self.partition = partition;
    }

    pub fn use_delta(&mut self, enabled: bool) {
        self.delta_enabled = enabled;
    }

    /// Resets what a collection load invalidates.
    pub(crate) fn reset_for_load(&mut self, primary_key: Option<String>) {
        self.primary_key = primary_key;
        self.delta.clear();
        self.last_page_number = 1;
    }

    pub fn per_page(&self) -> PageSize {
        self.per_page
    }

    pub fn page_number(&self) -> usize {
        self.page_number
    }

    pub fn last_page_number(&self) -> usize {
        self.last_page_number
    }

    pub fn sorting(&self) -> &Sorting {
        &self.sorting
    }

    pub fn groups(&self) -> &KeyList {
        &self.groups
    }

    pub fn ranges(&self) -> &KeyList {
        &self.ranges
    }

    pub fn partition(&self) -> usize {
        self.partition
    }

    pub fn delta_enabled(&self) -> bool {
        self.delta_enabled
    }

    pub fn delta(&self) -> &DeltaEncoder {
        &self.delta
    }

    pub fn emit_suspended(&self) -> bool {
        self.emit_suspended
    }

    pub fn primary_key(&self) -> Option<&str> {
        self.primary_key.as_deref()
    }
}
