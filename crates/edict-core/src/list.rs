use std::time::Duration;

use edict_client::{ApiError, PageQuery};
use edict_types::{SortBy, SortOrder, Word, WordsPage};

/// Quiet window after the last search keystroke before a reload fires.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Rows before the rendered end at which the next page is prefetched,
/// so the user never scrolls into a visible stall.
pub const LOAD_MORE_LOOKAHEAD: usize = 5;

const LOAD_FAILED_MESSAGE: &str = "Failed to load words";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    /// Replaces the accumulated entries (initial load, sort change,
    /// search settle, post-save reload).
    First,
    /// Appends after the existing entries, continuing from the cursor.
    More,
}

/// Request descriptor handed to the IO layer. The carried generation is
/// checked again on apply so a slow response can never overwrite newer
/// state.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    pub generation: u64,
    pub kind: PageKind,
    pub query: PageQuery,
}

/// State machine behind the words screen: the accumulated sorted and
/// filtered window of entries plus its continuation cursor.
///
/// Transitions return [`PageRequest`]s; the caller performs the fetch
/// and feeds the outcome back through [`WordList::apply_page`].
pub struct WordList {
    entries: Vec<Word>,
    next_cursor: Option<String>,
    total_count: Option<u64>,
    sort_by: SortBy,
    order: SortOrder,
    search: String,
    loading: bool,
    loading_more: bool,
    error: Option<String>,
    load_generation: u64,
    search_generation: u64,
    viewport_attached: bool,
}

impl Default for WordList {
    fn default() -> Self {
        Self::new()
    }
}

impl WordList {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_cursor: None,
            total_count: None,
            sort_by: SortBy::default(),
            order: SortOrder::default(),
            search: String::new(),
            loading: false,
            loading_more: false,
            error: None,
            load_generation: 0,
            search_generation: 0,
            viewport_attached: false,
        }
    }

    pub fn entries(&self) -> &[Word] {
        &self.entries
    }

    pub fn next_cursor(&self) -> Option<&str> {
        self.next_cursor.as_deref()
    }

    pub fn total_count(&self) -> Option<u64> {
        self.total_count
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_loading_more(&self) -> bool {
        self.loading_more
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn sort_by(&self) -> SortBy {
        self.sort_by
    }

    pub fn order(&self) -> SortOrder {
        self.order
    }

    pub fn attach_viewport(&mut self) {
        self.viewport_attached = true;
    }

    pub fn detach_viewport(&mut self) {
        self.viewport_attached = false;
    }

    fn current_query(&self, cursor: Option<String>) -> PageQuery {
        let search = self.search.trim();
        PageQuery {
            cursor,
            sort_by: self.sort_by,
            order: self.order,
            search: (!search.is_empty()).then(|| search.to_string()),
            ..PageQuery::default()
        }
    }

    /// Full reload from the top. Discards the continuation state on
    /// apply: a cursor from a previous filter is meaningless under a
    /// new one.
    pub fn load_first(&mut self) -> PageRequest {
        self.error = None;
        self.loading = true;
        self.load_generation += 1;
        PageRequest {
            generation: self.load_generation,
            kind: PageKind::First,
            query: self.current_query(None),
        }
    }

    /// Next page from the cursor. No-op while a page is already in
    /// flight or when there is nothing left to fetch.
    pub fn load_more(&mut self) -> Option<PageRequest> {
        let cursor = self.next_cursor.clone()?;
        if self.loading_more {
            return None;
        }
        self.loading_more = true;
        Some(PageRequest {
            generation: self.load_generation,
            kind: PageKind::More,
            query: self.current_query(Some(cursor)),
        })
    }

    pub fn set_sort(&mut self, sort_by: SortBy, order: SortOrder) -> PageRequest {
        self.sort_by = sort_by;
        self.order = order;
        self.load_first()
    }

    /// Records the term immediately (the input must reflect keystrokes)
    /// and returns the debounce generation the caller arms a timer with.
    pub fn set_search(&mut self, term: impl Into<String>) -> u64 {
        self.search = term.into();
        self.search_generation += 1;
        self.search_generation
    }

    /// Fires the deferred reload, but only for the latest keystroke in
    /// a burst: stale generations are ignored.
    pub fn search_settled(&mut self, generation: u64) -> Option<PageRequest> {
        (generation == self.search_generation).then(|| self.load_first())
    }

    /// Virtualized-list callback. Prefetches when the rendered end is
    /// within [`LOAD_MORE_LOOKAHEAD`] rows of the list end, and only
    /// while a viewport is attached.
    pub fn viewport_scrolled(&mut self, rendered_end: usize) -> Option<PageRequest> {
        if !self.viewport_attached {
            return None;
        }
        if rendered_end + LOAD_MORE_LOOKAHEAD < self.entries.len() {
            return None;
        }
        self.load_more()
    }

    /// Reconciles a confirmed delete without a refetch round-trip.
    pub fn remove_local(&mut self, id: &str) {
        self.entries.retain(|w| w.id != id);
    }

    /// Any successful mutation triggers a full reload so the displayed
    /// sort/filter/cursor state stays consistent with the server.
    pub fn entry_saved(&mut self, _word: &Word) -> PageRequest {
        self.load_first()
    }

    pub fn apply_page(&mut self, request: &PageRequest, result: Result<WordsPage, ApiError>) {
        if request.generation != self.load_generation {
            tracing::debug!(
                stale = request.generation,
                current = self.load_generation,
                "Dropping superseded page response"
            );
            if request.kind == PageKind::More {
                self.loading_more = false;
            }
            return;
        }

        match (request.kind, result) {
            (PageKind::First, Ok(page)) => {
                self.entries = page.items;
                self.next_cursor = page.next_cursor;
                self.total_count = Some(page.total_count);
                self.loading = false;
            }
            (PageKind::First, Err(err)) => {
                let message = err.surface_message();
                self.error = Some(if message.is_empty() {
                    LOAD_FAILED_MESSAGE.to_string()
                } else {
                    message
                });
                self.loading = false;
            }
            (PageKind::More, Ok(page)) => {
                self.entries.extend(page.items);
                self.next_cursor = page.next_cursor;
                self.total_count = Some(page.total_count);
                self.loading_more = false;
            }
            (PageKind::More, Err(err)) => {
                // Load-more failures stay silent: flag cleared, entries
                // untouched, nothing surfaced.
                tracing::debug!("Load-more failed: {err}");
                self.loading_more = false;
            }
        }
    }
}
