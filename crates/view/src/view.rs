//! The view facade.
//!
//! `View` ties a `ViewState`, the loaded collection and a `ContentSink`
//! together. Loads, filter changes and `refresh` run the emission pipeline;
//! plain setters only store configuration so that a caller can batch them.

use crate::filter::{self, FilterDescriptor, FilterMode, FilterReport, KeyList};
use crate::loader::{resolve_keys, CollectionState, LoadOptions, PendingLoad};
use crate::pipeline::{self, ContentUpdate};
use crate::sink::{ContentSink, DetachedSink};
use crate::sort::SortDirection;
use crate::state::ViewState;
use snapshot_core::{Error, Record};
use snapshot_index::IndexCollection;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

/// A filtered, sorted and paginated projection of one record collection.
pub struct View {
    state: ViewState,
    collection: CollectionState,
    sink: Box<dyn ContentSink>,
}

impl Default for View {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("View")
            .field("state", &self.state)
            .field("loaded", &self.is_loaded())
            .field("indexing", &self.is_indexing())
            .finish()
    }
}

impl View {
    /// Creates a view with no collection and no transport.
    pub fn new() -> Self {
        Self {
            state: ViewState::new(),
            collection: CollectionState::Empty,
            sink: Box::new(DetachedSink),
        }
    }

    /// Creates a view that emits into `sink`.
    pub fn with_sink(sink: impl ContentSink + 'static) -> Self {
        let mut view = Self::new();
        view.attach(sink);
        view
    }

    /// Replaces the sink.
    pub fn attach(&mut self, sink: impl ContentSink + 'static) {
        self.sink = Box::new(sink);
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Mutable configuration access. Changes take effect on the next emission.
    pub fn state_mut(&mut self) -> &mut ViewState {
        &mut self.state
    }

    /// The fully indexed collection, if one is loaded.
    pub fn collection(&self) -> Option<&IndexCollection> {
        match &self.collection {
            CollectionState::Ready(collection) => Some(collection),
            _ => None,
        }
    }

    /// Returns true once a load has finished indexing.
    pub fn is_loaded(&self) -> bool {
        matches!(self.collection, CollectionState::Ready(_))
    }

    /// Returns true while a deferred load still has dimensions to build.
    pub fn is_indexing(&self) -> bool {
        matches!(self.collection, CollectionState::Indexing(_))
    }

    /// Replaces the collection.
    ///
    /// Discards every dimension, filter and the delta memory. Without
    /// `defer_indexing` all dimensions are built now and the view emits
    /// unless `suppress_emit` is set; otherwise `index_step` builds them.
    pub fn load_collection(&mut self, records: impl Into<Arc<[Record]>>, options: LoadOptions) {
        let started = Instant::now();
        let records: Arc<[Record]> = records.into();
        let keys = resolve_keys(&records, options.keys);
        let primary_key = options.primary_key.or_else(|| keys.first().cloned());

        tracing::debug!(
            records = records.len(),
            dimensions = keys.len(),
            primary_key = primary_key.as_deref().unwrap_or(""),
            deferred = options.defer_indexing,
            "loading collection"
        );

        self.state.reset_for_load(primary_key);
        let mut pending = PendingLoad::new(records, keys, options.suppress_emit, started);

        if options.defer_indexing && pending.remaining() > 0 {
            self.collection = CollectionState::Indexing(pending);
        } else {
            pending.finish();
            self.finish_load(pending);
        }
    }

    /// Builds one pending dimension.
    ///
    /// Returns true while more work remains. The step that builds the last
    /// dimension also performs the load's emission.
    pub fn index_step(&mut self) -> bool {
        let CollectionState::Indexing(pending) = &mut self.collection else {
            return false;
        };
        if !pending.step() {
            return true;
        }
        if let CollectionState::Indexing(pending) =
            std::mem::replace(&mut self.collection, CollectionState::Empty)
        {
            self.finish_load(pending);
        }
        false
    }

    fn finish_load(&mut self, pending: PendingLoad) {
        let PendingLoad {
            collection,
            suppress_emit,
            started,
            ..
        } = pending;
        self.collection = CollectionState::Ready(collection);
        if !suppress_emit {
            self.emit(started);
        }
    }

    /// Stores a page size; negative sizes become 0.
    pub fn set_per_page(&mut self, per_page: i64) {
        self.state.set_per_page(per_page);
    }

    pub fn set_per_page_unbounded(&mut self) {
        self.state.set_per_page_unbounded();
    }

    /// Moves to page `page_number`; returns true if the page changed.
    pub fn set_page_number(&mut self, page_number: i64) -> bool {
        let loaded = self.is_loaded();
        self.state.set_page_number(page_number, loaded)
    }

    pub fn set_sort_by(&mut self, key: impl Into<String>, direction: Option<SortDirection>) {
        self.state.set_sort_by(key, direction);
    }

    pub fn set_groups(&mut self, keys: impl Into<KeyList>) {
        self.state.set_groups(keys);
    }

    pub fn set_ranges(&mut self, keys: impl Into<KeyList>) {
        self.state.set_ranges(keys);
    }

    pub fn set_partition(&mut self, partition: usize) {
        self.state.set_partition(partition);
    }

    pub fn use_delta(&mut self, enabled: bool) {
        self.state.use_delta(enabled);
    }

    /// Suppresses emission until `resume_emit`.
    pub fn pause_emit(&mut self) {
        self.state.emit_suspended = true;
    }

    /// Lifts a pause, emitting once if `emit_now` is set.
    pub fn resume_emit(&mut self, emit_now: bool) {
        self.state.emit_suspended = false;
        if emit_now {
            self.refresh();
        }
    }

    /// Filters every dimension named in `keys`, then emits once.
    pub fn apply_filter(
        &mut self,
        keys: impl Into<KeyList>,
        descriptor: FilterDescriptor,
        mode: FilterMode,
    ) -> FilterReport {
        let keys = keys.into();
        let report = match self.collection_mut() {
            Some(collection) => filter::apply_filter(collection, &keys, &descriptor, mode),
            None => {
                for key in keys.iter() {
                    tracing::warn!(key = %key, error = %Error::unknown_dimension(key), "no collection loaded");
                }
                FilterReport {
                    applied: Vec::new(),
                    skipped: keys.iter().map(String::from).collect(),
                }
            }
        };
        self.refresh();
        report
    }

    /// Clears one dimension's filters and emits. Unknown keys only warn.
    pub fn clear_filter(&mut self, key: &str) -> bool {
        let result = match self.collection_mut() {
            Some(collection) => filter::clear_filter(collection, key),
            None => Err(Error::unknown_dimension(key)),
        };
        match result {
            Ok(()) => {
                self.refresh();
                true
            }
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "clear filter skipped");
                false
            }
        }
    }

    /// Clears every dimension's filters and emits.
    pub fn clear_filters(&mut self) {
        if let Some(collection) = self.collection_mut() {
            filter::clear_filters(collection);
        }
        self.refresh();
    }

    /// Runs the pipeline and emits, unless paused or nothing is loaded.
    pub fn refresh(&mut self) -> Option<ContentUpdate> {
        self.emit(Instant::now())
    }

    fn emit(&mut self, started: Instant) -> Option<ContentUpdate> {
        if self.state.emit_suspended {
            return None;
        }
        let CollectionState::Ready(collection) = &self.collection else {
            return None;
        };
        let update = pipeline::run(&mut self.state, collection, started);
        tracing::debug!(
            models = update.statistics.models.total,
            page = update.statistics.pages.current,
            pages = update.statistics.pages.total,
            "content updated"
        );
        self.sink.content_updated(&update);
        Some(update)
    }

    fn collection_mut(&mut self) -> Option<&mut IndexCollection> {
        match &mut self.collection {
            CollectionState::Ready(collection) => Some(collection),
            CollectionState::Indexing(pending) => Some(&mut pending.collection),
            CollectionState::Empty => None,
        }
    }
}
