use std::sync::Arc;

use catalog::VideoEntity;
use tracing::debug;

/// Handle for one in-flight page load.
///
/// Carries the result generation and page it was issued under so a completion
/// that arrives after a filter change can be recognised and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadTicket {
    pub generation: u64,
    pub page: usize,
}

/// Result of completing a page load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Appended { count: usize },
    Exhausted,
    Stale,
}

/// Growing prefix window over one filtered result list.
///
/// # Example
/// ```
/// use engine::pagination::{LoadOutcome, Paginator};
///
/// let mut paginator = Paginator::new(2);
/// paginator.reset(Vec::new());
///
/// assert!(paginator.begin_load().is_none());
/// assert!(!paginator.has_more());
/// assert!(!paginator.is_loading_more());
/// ```
#[derive(Debug)]
pub struct Paginator {
    page_size: usize,
    results: Vec<Arc<VideoEntity>>,
    visible_len: usize,
    page: usize,
    has_more: bool,
    in_flight: Option<LoadTicket>,
    generation: u64,
}

impl Paginator {
    /// Creates an empty paginator. `page_size` must be positive.
    pub fn new(page_size: usize) -> Self {
        assert!(page_size > 0, "page size must be positive");
        Self {
            page_size,
            results: Vec::new(),
            visible_len: 0,
            page: 1,
            has_more: false,
            in_flight: None,
            generation: 0,
        }
    }

    /// Replaces the result list and restarts at page 1.
    ///
    /// Any load issued before the reset becomes stale.
    pub fn reset(&mut self, results: Vec<Arc<VideoEntity>>) {
        self.generation += 1;
        self.visible_len = results.len().min(self.page_size);
        self.has_more = results.len() > self.page_size;
        self.results = results;
        self.page = 1;
        if let Some(ticket) = self.in_flight.take() {
            debug!(
                stale_generation = ticket.generation,
                stale_page = ticket.page,
                "in-flight page load invalidated by reset"
            );
        }
    }

    /// Starts loading the next page.
    ///
    /// Returns `None` without touching state while a load is in flight or the
    /// list is exhausted.
    pub fn begin_load(&mut self) -> Option<LoadTicket> {
        if self.in_flight.is_some() || !self.has_more {
            return None;
        }
        let ticket = LoadTicket {
            generation: self.generation,
            page: self.page,
        };
        self.in_flight = Some(ticket);
        Some(ticket)
    }

    /// Applies the page a ticket asked for.
    pub fn complete_load(&mut self, ticket: LoadTicket) -> LoadOutcome {
        if self.in_flight != Some(ticket) {
            debug!(
                generation = ticket.generation,
                page = ticket.page,
                current_generation = self.generation,
                "stale page load dropped"
            );
            return LoadOutcome::Stale;
        }
        self.in_flight = None;

        let start = (self.page * self.page_size).min(self.results.len());
        let end = ((self.page + 1) * self.page_size).min(self.results.len());
        if start == end {
            self.has_more = false;
            return LoadOutcome::Exhausted;
        }

        self.visible_len = end;
        self.page += 1;
        self.has_more = self.page * self.page_size < self.results.len();
        LoadOutcome::Appended { count: end - start }
    }

    /// Currently materialized prefix of the result list.
    pub fn visible(&self) -> &[Arc<VideoEntity>] {
        &self.results[..self.visible_len]
    }

    pub fn results(&self) -> &[Arc<VideoEntity>] {
        &self.results
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn is_loading_more(&self) -> bool {
        self.in_flight.is_some()
    }
}
