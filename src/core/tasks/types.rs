use crate::{
    cards::Card,
    core::{
        queue::FetchTicket,
        TorchLearnError,
    },
};

pub type FetchResult = Result<Vec<Card>, TorchLearnError>;

#[derive(Debug)]
pub enum TaskResult {
    CardsFetched { ticket: FetchTicket, result: FetchResult },
}

impl TaskResult {
    pub fn task_type(&self) -> &'static str {
        match self {
            TaskResult::CardsFetched { ticket, .. } if ticket.kind.is_foreground() => "cards_fetched",
            TaskResult::CardsFetched { .. } => "cards_prefetched",
        }
    }
}
