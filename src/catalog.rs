//! Catalog viewer state machine
//!
//! Owns every piece of mutable session state: the accumulated records, the
//! page cursor, the single-flight loading flag, the search query with its
//! filtered view, and the expanded card. All changes go through the
//! transition functions below, driven from one thread.

use crate::error::BreedViewError;
use crate::logging;
use crate::rating::Rating;
use crate::record::BreedRecord;
use serde_json::Value;

/// Maximum number of pages fetched per session
pub const PAGE_CEILING: u32 = 7;

/// Records requested per page
pub const PAGE_SIZE: u32 = 10;

/// Maximum number of search matches shown at once
pub const DISPLAY_CAP: usize = 10;

/// Fixed limits the catalog enforces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogLimits {
    pub page_size: u32,
    pub page_ceiling: u32,
    pub display_cap: usize,
}

impl Default for CatalogLimits {
    fn default() -> Self {
        Self {
            page_size: PAGE_SIZE,
            page_ceiling: PAGE_CEILING,
            display_cap: DISPLAY_CAP,
        }
    }
}

/// Discrete inputs delivered to the controller loop
#[derive(Debug)]
pub enum CatalogEvent {
    Mounted,
    ScrollNearBottom,
    QueryChanged(String),
    ToggleDetail(String),
    PageLoaded { page: u32, items: Vec<Value> },
    PageFailed { page: u32, error: BreedViewError },
}

/// Work the front-end must carry out on the controller's behalf
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    FetchPage { page: u32, limit: u32 },
}

pub struct Catalog {
    records: Vec<BreedRecord>,
    next_page: u32,
    is_loading: bool,
    query: String,
    /// Indices into `records`, in record order
    filtered: Vec<usize>,
    expanded_id: Option<String>,
    mounted: bool,
    limits: CatalogLimits,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(CatalogLimits::default())
    }
}

impl Catalog {
    pub fn new(limits: CatalogLimits) -> Self {
        Self {
            records: Vec::new(),
            next_page: 1,
            is_loading: false,
            query: String::new(),
            filtered: Vec::new(),
            expanded_id: None,
            mounted: false,
            limits,
        }
    }

    // --- Accessors ---

    pub fn records(&self) -> &[BreedRecord] {
        &self.records
    }

    pub fn next_page(&self) -> u32 {
        self.next_page
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn limits(&self) -> CatalogLimits {
        self.limits
    }

    /// Every record matching the current query, in record order
    pub fn filtered(&self) -> Vec<&BreedRecord> {
        self.filtered.iter().map(|&i| &self.records[i]).collect()
    }

    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    pub fn expanded_id(&self) -> Option<&str> {
        self.expanded_id.as_deref()
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded_id.as_deref() == Some(id)
    }

    /// True while pages remain under the ceiling
    pub fn has_more_pages(&self) -> bool {
        self.next_page <= self.limits.page_ceiling
    }

    /// Records the view should draw.
    ///
    /// With matches: the first `display_cap` of them. Without matches the
    /// full record list is shown, so a query that matches nothing renders
    /// the same as no query at all.
    pub fn visible(&self) -> Vec<&BreedRecord> {
        if self.filtered.is_empty() {
            self.records.iter().collect()
        } else {
            self.filtered
                .iter()
                .take(self.limits.display_cap)
                .map(|&i| &self.records[i])
                .collect()
        }
    }

    /// An active query with zero matches (visible list fell back to everything)
    pub fn is_unmatched_query(&self) -> bool {
        !self.query.is_empty() && self.filtered.is_empty()
    }

    // --- Transitions ---

    /// Single entry point for the controller loop
    pub fn handle(&mut self, event: CatalogEvent) -> Option<Command> {
        match event {
            CatalogEvent::Mounted => self.mount(),
            CatalogEvent::ScrollNearBottom => self.on_scroll_near_bottom(),
            CatalogEvent::QueryChanged(raw) => {
                self.on_query_change(&raw);
                None
            }
            CatalogEvent::ToggleDetail(id) => {
                self.toggle_detail(&id);
                None
            }
            CatalogEvent::PageLoaded { page, items } => {
                self.apply_page(page, &items);
                None
            }
            CatalogEvent::PageFailed { page, error } => {
                self.fail_page(page, &error);
                None
            }
        }
    }

    /// First activation loads page one; later calls do nothing
    pub fn mount(&mut self) -> Option<Command> {
        if self.mounted {
            return None;
        }
        self.mounted = true;
        logging::separator("catalog mounted");
        self.load_next_page()
    }

    /// Start fetching `next_page` unless a fetch is in flight or the ceiling is reached
    pub fn load_next_page(&mut self) -> Option<Command> {
        if self.is_loading || !self.has_more_pages() {
            return None;
        }
        self.is_loading = true;
        logging::log_page_request(self.next_page, self.limits.page_size);
        Some(Command::FetchPage {
            page: self.next_page,
            limit: self.limits.page_size,
        })
    }

    pub fn on_scroll_near_bottom(&mut self) -> Option<Command> {
        if self.is_loading || !self.has_more_pages() {
            return None;
        }
        self.load_next_page()
    }

    /// Complete the in-flight fetch with the raw items it returned.
    ///
    /// Returns the number of records appended. A completion for any page
    /// other than the one in flight is dropped.
    pub fn apply_page(&mut self, page: u32, items: &[Value]) -> usize {
        if !self.is_loading || page != self.next_page {
            logging::warn(
                "CATALOG",
                &format!(
                    "Ignoring stale completion for page {} (in flight: {})",
                    page,
                    self.in_flight_label()
                ),
            );
            return 0;
        }

        let start = self.records.len();
        self.records.extend(items.iter().map(BreedRecord::normalize));
        for record in &self.records[start..] {
            for (label, value) in record.scores() {
                if let Err(e) = Rating::new(value) {
                    logging::log_invalid_rating(&record.name, label, &e);
                }
            }
        }
        self.next_page += 1;
        self.is_loading = false;
        logging::log_page_applied(page, items.len(), self.records.len());
        items.len()
    }

    /// Abort the in-flight fetch, leaving records and cursor untouched
    pub fn fail_page(&mut self, page: u32, error: &BreedViewError) {
        logging::log_page_failure(page, error);
        if self.is_loading && page == self.next_page {
            self.is_loading = false;
        }
    }

    /// Recompute the filtered view for a new search input
    pub fn on_query_change(&mut self, raw: &str) {
        let query = raw.trim();
        self.expanded_id = None;
        self.filtered.clear();

        if query.is_empty() {
            self.query.clear();
            return;
        }

        self.query = query.to_string();
        let needle = query.to_lowercase();
        self.filtered = self
            .records
            .iter()
            .enumerate()
            .filter(|(_, record)| record.matches(&needle))
            .map(|(i, _)| i)
            .collect();
        logging::log_search(&self.query, self.filtered.len(), self.records.len());
    }

    /// Expand `id`, or collapse it if it is already expanded
    pub fn toggle_detail(&mut self, id: &str) {
        if self.is_expanded(id) {
            self.expanded_id = None;
        } else if self.records.iter().any(|r| r.id == id) {
            self.expanded_id = Some(id.to_string());
        }
    }

    fn in_flight_label(&self) -> String {
        if self.is_loading {
            self.next_page.to_string()
        } else {
            "none".to_string()
        }
    }
}
