//! Card suppliers.
//!
//! A [`CardSource`] turns a [`FetchRequest`] into a list of candidate cards.
//! Two interchangeable implementations exist: [`DatasetSource`] serves the
//! bundled fixture and [`GeminiSource`] asks the Gemini API to generate cards.
//! Both follow the same contract:
//!
//! * Search mode (non-empty `search_query`) ignores `seen` and the category
//!   and returns at most `count` matches, best match first. No match is an
//!   empty list, never an error.
//! * Browse mode excludes every name in `seen`, honours the category filter
//!   and returns up to `count` cards.
//! * Names are unique within one response.
//! * Errors are reserved for transport and parse failures.

pub mod dataset;
pub mod gemini;

use std::collections::HashSet;

use async_trait::async_trait;

pub use dataset::DatasetSource;
pub use gemini::GeminiSource;

use crate::{
    cards::{
        Card,
        Category,
    },
    core::TorchLearnError,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub seen: Vec<String>,
    pub count: usize,
    pub category: Category,
    pub search_query: String,
}

impl FetchRequest {
    pub fn browse(seen: Vec<String>, count: usize, category: Category) -> Self {
        Self { seen, count, category, search_query: String::new() }
    }

    pub fn search(query: impl Into<String>, count: usize, category: Category) -> Self {
        Self { seen: Vec::new(), count, category, search_query: query.into() }
    }

    pub fn is_search(&self) -> bool {
        !self.search_query.is_empty()
    }

    /// Filters a candidate list down to what the source contract allows:
    /// unique names, no seen names and matching category in browse mode, and
    /// at most `count` entries. Order is preserved.
    pub fn admit(&self, cards: Vec<Card>) -> Vec<Card> {
        let seen: HashSet<&str> = if self.is_search() {
            HashSet::new()
        } else {
            self.seen.iter().map(String::as_str).collect()
        };

        let mut names = HashSet::new();
        let mut admitted = Vec::with_capacity(self.count.min(cards.len()));

        for card in cards {
            if admitted.len() >= self.count {
                break;
            }
            if seen.contains(card.name.as_str()) {
                continue;
            }
            if !self.is_search() && !self.category.admits(card.category) {
                continue;
            }
            if names.insert(card.name.clone()) {
                admitted.push(card);
            }
        }

        admitted
    }
}

#[async_trait]
pub trait CardSource: Send + Sync {
    /// Short label shown in the UI and logs.
    fn name(&self) -> &str;

    async fn fetch(&self, request: FetchRequest) -> Result<Vec<Card>, TorchLearnError>;
}


#[cfg(test)]
mod tests {
    use super::{
        testing::card,
        *,
    };

    #[test]
    fn test_admit_browse_rules() {
        let request = FetchRequest::browse(vec!["torch.a".into()], 2, Category::Math);
        let admitted = request.admit(vec![
            card("torch.a", Category::Math),
            card("torch.b", Category::Utilities),
            card("torch.c", Category::Math),
            card("torch.c", Category::Math),
            card("torch.d", Category::Math),
            card("torch.e", Category::Math),
        ]);

        let names: Vec<_> = admitted.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["torch.c", "torch.d"]);
    }

    #[test]
    fn test_admit_search_ignores_history_and_category() {
        let mut request = FetchRequest::search("torch.a", 1, Category::Utilities);
        request.seen = vec!["torch.a".into()];

        let admitted = request.admit(vec![card("torch.a", Category::Math)]);
        assert_eq!(admitted.len(), 1);
        assert!(request.is_search());
    }
}
