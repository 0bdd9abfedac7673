//! Card queue policy.
//!
//! [`QueueState`] owns the history, the pending queue and the displayed card.
//! User operations never perform I/O themselves: they update the state and
//! hand back a [`FetchPlan`] describing the fetch to run. The owner executes
//! the plan and reports the outcome through [`QueueState::complete`].
//!
//! Foreground fetches (initial load, reset-loads and the blocking advance
//! fetch) carry a generation number; a result from an older generation was
//! superseded by a later reset and is discarded. Background prefetches are
//! merged whenever they land, even if the category changed in the meantime,
//! unless a search is active.

use std::collections::{
    HashSet,
    VecDeque,
};

use thiserror::Error;

use super::TorchLearnError;
use crate::{
    cards::{
        Card,
        Category,
    },
    source::FetchRequest,
};

/// Queue length below which a background prefetch is issued.
pub const LOW_WATER_MARK: usize = 2;
pub const BROWSE_BATCH: usize = 3;
pub const SEARCH_BATCH: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchKind {
    Initial,
    Reset,
    Advance,
    Prefetch,
}

impl FetchKind {
    pub fn is_foreground(&self) -> bool {
        !matches!(self, FetchKind::Prefetch)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub kind: FetchKind,
    pub generation: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchPlan {
    pub ticket: FetchTicket,
    pub request: FetchRequest,
}

/// What happened to a completed fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    Failed,
    Superseded,
}

/// User-visible error states. Only one is active at a time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueueError {
    #[error("No PyTorch function found for \"{query}\". Try another keyword.")]
    EmptySearch { query: String },

    #[error("Cannot fetch cards for {category}.")]
    NoCards { category: Category },

    #[error("Cannot fetch more cards.")]
    AdvanceFailed,

    #[error("Failed to generate flashcards. Check your network connection or API key. ({0})")]
    Transport(String),
}

impl QueueError {
    /// `true` when the source simply had nothing to offer.
    pub fn is_empty_result(&self) -> bool {
        matches!(self, QueueError::EmptySearch { .. } | QueueError::NoCards { .. })
    }

    pub fn title(&self) -> &'static str {
        if self.is_empty_result() {
            "Nothing here"
        } else {
            "Something went wrong"
        }
    }
}

#[derive(Debug, Clone)]
pub struct QueueState {
    history: Vec<String>,
    queue: VecDeque<Card>,
    current: Option<Card>,
    selected_category: Category,
    search_input: String,
    is_loading: bool,
    is_initializing: bool,
    error: Option<QueueError>,

    generation: u64,
    foreground_query: String,
    prefetch_in_flight: bool,
}

impl Default for QueueState {
    fn default() -> Self {
        Self::new()
    }
}

impl QueueState {
    pub fn new() -> Self {
        Self {
            history: Vec::new(),
            queue: VecDeque::new(),
            current: None,
            selected_category: Category::All,
            search_input: String::new(),
            is_loading: false,
            is_initializing: true,
            error: None,
            generation: 0,
            foreground_query: String::new(),
            prefetch_in_flight: false,
        }
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn queue(&self) -> &VecDeque<Card> {
        &self.queue
    }

    pub fn current_card(&self) -> Option<&Card> {
        self.current.as_ref()
    }

    pub fn selected_category(&self) -> Category {
        self.selected_category
    }

    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    pub fn is_searching(&self) -> bool {
        !self.search_input.is_empty()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn is_initializing(&self) -> bool {
        self.is_initializing
    }

    pub fn error(&self) -> Option<&QueueError> {
        self.error.as_ref()
    }

    pub fn prefetch_in_flight(&self) -> bool {
        self.prefetch_in_flight
    }

    /// Text-change handler for the search box.
    pub fn set_search_input(&mut self, text: impl Into<String>) {
        self.search_input = text.into();
    }

    /// First load of the session. Skipped when browsing and cards are
    /// already available, so repeated calls never stack fills.
    pub fn initial_load(&mut self) -> Option<FetchPlan> {
        if self.search_input.is_empty() && (!self.queue.is_empty() || self.current.is_some()) {
            return None;
        }

        let request =
            FetchRequest::browse(self.history.clone(), BROWSE_BATCH, self.selected_category);
        Some(self.start_foreground(FetchKind::Initial, request))
    }

    /// The user learned the current card.
    pub fn advance(&mut self) -> Option<FetchPlan> {
        if self.is_loading {
            return None;
        }
        let finished = self.current.as_ref()?.name.clone();

        if !self.history.contains(&finished) {
            self.history.push(finished);
        }

        if let Some(next) = self.queue.pop_front() {
            self.current = Some(next);

            if self.queue.len() < LOW_WATER_MARK
                && self.search_input.is_empty()
                && !self.prefetch_in_flight
            {
                self.prefetch_in_flight = true;
                let request = FetchRequest::browse(
                    self.history.clone(),
                    BROWSE_BATCH,
                    self.selected_category,
                );
                return Some(FetchPlan {
                    ticket: FetchTicket { kind: FetchKind::Prefetch, generation: self.generation },
                    request,
                });
            }
            return None;
        }

        if !self.search_input.is_empty() {
            self.search_input.clear();
            return Some(self.reset_load(String::new()));
        }

        let request =
            FetchRequest::browse(self.history.clone(), BROWSE_BATCH, self.selected_category);
        Some(self.start_foreground(FetchKind::Advance, request))
    }

    pub fn select_category(&mut self, category: Category) -> Option<FetchPlan> {
        if category == self.selected_category && self.search_input.is_empty() {
            return None;
        }

        self.selected_category = category;
        self.search_input.clear();
        Some(self.reset_load(String::new()))
    }

    /// Searches for the trimmed search input. Blank input is ignored.
    pub fn submit_search(&mut self) -> Option<FetchPlan> {
        let query = self.search_input.trim().to_string();
        if query.is_empty() {
            return None;
        }

        Some(self.reset_load(query))
    }

    pub fn clear_search(&mut self) -> FetchPlan {
        self.search_input.clear();
        self.reset_load(String::new())
    }

    /// Re-runs the reset-load for the current category and search input.
    pub fn retry(&mut self) -> FetchPlan {
        let query = self.search_input.trim().to_string();
        self.reset_load(query)
    }

    /// Merges the outcome of a fetch previously handed out by this state.
    pub fn complete(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<Card>, TorchLearnError>,
    ) -> Completion {
        if !ticket.kind.is_foreground() {
            return self.complete_prefetch(result);
        }

        if ticket.generation != self.generation {
            log::debug!(
                "Dropping {:?} result from generation {} (current {})",
                ticket.kind,
                ticket.generation,
                self.generation
            );
            return Completion::Superseded;
        }

        self.is_loading = false;
        self.is_initializing = false;

        let cards = match result {
            Ok(cards) => cards,
            Err(e) => {
                log::warn!("{:?} fetch failed: {}", ticket.kind, e);
                self.error = Some(match ticket.kind {
                    FetchKind::Advance => QueueError::AdvanceFailed,
                    _ => QueueError::Transport(e.to_string()),
                });
                return Completion::Failed;
            }
        };

        if cards.is_empty() {
            self.error = Some(match ticket.kind {
                FetchKind::Advance => QueueError::AdvanceFailed,
                _ if !self.foreground_query.is_empty() => {
                    QueueError::EmptySearch { query: self.foreground_query.clone() }
                }
                _ => QueueError::NoCards { category: self.selected_category },
            });
            return Completion::Failed;
        }

        self.error = None;
        self.install(cards);
        Completion::Applied
    }

    fn complete_prefetch(&mut self, result: Result<Vec<Card>, TorchLearnError>) -> Completion {
        self.prefetch_in_flight = false;

        match result {
            // Search mode holds at most the single search result.
            Ok(cards) if self.is_searching() => {
                log::debug!("Dropping {} prefetched card(s) while searching", cards.len());
                Completion::Superseded
            }
            Ok(cards) => {
                let added = self.enqueue(cards);
                log::debug!("Prefetch added {} card(s), queue now {}", added, self.queue.len());
                Completion::Applied
            }
            Err(e) => {
                log::warn!("Background prefetch failed: {}", e);
                Completion::Failed
            }
        }
    }

    fn reset_load(&mut self, query: String) -> FetchPlan {
        self.queue.clear();
        self.current = None;

        let request = if query.is_empty() {
            FetchRequest::browse(self.history.clone(), BROWSE_BATCH, self.selected_category)
        } else {
            FetchRequest::search(query, SEARCH_BATCH, self.selected_category)
        };

        self.start_foreground(FetchKind::Reset, request)
    }

    fn start_foreground(&mut self, kind: FetchKind, request: FetchRequest) -> FetchPlan {
        self.generation += 1;
        self.is_loading = true;
        self.error = None;
        self.foreground_query = request.search_query.clone();

        FetchPlan { ticket: FetchTicket { kind, generation: self.generation }, request }
    }

    /// Replaces the displayed card and the queue with a fresh batch.
    fn install(&mut self, cards: Vec<Card>) {
        let mut cards = cards.into_iter();
        self.current = cards.next();
        self.queue.clear();
        self.enqueue(cards);
    }

    /// Appends cards not already displayed or queued. Returns how many were
    /// added.
    fn enqueue(&mut self, cards: impl IntoIterator<Item = Card>) -> usize {
        let mut present: HashSet<String> = self.queue.iter().map(|card| card.name.clone()).collect();
        if let Some(current) = &self.current {
            present.insert(current.name.clone());
        }

        let before = self.queue.len();
        for card in cards {
            if present.insert(card.name.clone()) {
                self.queue.push_back(card);
            }
        }
        self.queue.len() - before
    }
}
