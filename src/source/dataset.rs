use std::{
    collections::HashSet,
    fs,
    path::Path,
    sync::Mutex,
};

use async_trait::async_trait;
use rand::{
    rngs::StdRng,
    seq::SliceRandom,
    SeedableRng,
};

use super::{
    CardSource,
    FetchRequest,
};
use crate::{
    cards::Card,
    core::TorchLearnError,
};

const BUNDLED_CARDS: &str = include_str!("../../assets/cards.json");

/// Serves cards from a static list.
pub struct DatasetSource {
    cards: Vec<Card>,
    rng: Mutex<StdRng>,
}

impl DatasetSource {
    /// The fixture compiled into the binary.
    pub fn bundled() -> Result<Self, TorchLearnError> {
        Ok(Self::from_cards(serde_json::from_str(BUNDLED_CARDS)?))
    }

    /// Reads a JSON array of cards from disk.
    pub fn from_file(path: &Path) -> Result<Self, TorchLearnError> {
        let json = fs::read_to_string(path)?;
        let cards: Vec<Card> = serde_json::from_str(&json)?;
        log::info!("Loaded {} cards from {}", cards.len(), path.display());
        Ok(Self::from_cards(cards))
    }

    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards: dedup_by_name(cards), rng: Mutex::new(StdRng::from_os_rng()) }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Cards whose name or description contains `query` (case-insensitive),
    /// best match first.
    pub fn search(&self, query: &str, count: usize) -> Vec<Card> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let mut ranked: Vec<(u8, usize, &Card)> = self
            .cards
            .iter()
            .enumerate()
            .filter_map(|(idx, card)| match_rank(card, &needle).map(|rank| (rank, idx, card)))
            .collect();

        ranked.sort_by_key(|(rank, idx, _)| (*rank, *idx));
        ranked.into_iter().take(count).map(|(_, _, card)| card.clone()).collect()
    }

    /// Random unseen cards of the requested category. Once every card of the
    /// category has been seen, the whole category pool is served again.
    pub fn browse(&self, request: &FetchRequest) -> Vec<Card> {
        let seen: HashSet<&str> = request.seen.iter().map(String::as_str).collect();

        let pool: Vec<&Card> =
            self.cards.iter().filter(|card| request.category.admits(card.category)).collect();

        let mut candidates: Vec<&Card> =
            pool.iter().copied().filter(|card| !seen.contains(card.name.as_str())).collect();

        if candidates.is_empty() && !pool.is_empty() {
            log::debug!(
                "All {} cards in '{}' have been seen, recycling the pool",
                pool.len(),
                request.category
            );
            candidates = pool;
        }

        match self.rng.lock() {
            Ok(mut rng) => candidates.shuffle(&mut *rng),
            Err(poisoned) => candidates.shuffle(&mut *poisoned.into_inner()),
        }

        candidates.into_iter().take(request.count).cloned().collect()
    }
}

#[async_trait]
impl CardSource for DatasetSource {
    fn name(&self) -> &str {
        "Offline dataset"
    }

    async fn fetch(&self, request: FetchRequest) -> Result<Vec<Card>, TorchLearnError> {
        if request.is_search() {
            Ok(self.search(&request.search_query, request.count))
        } else {
            Ok(self.browse(&request))
        }
    }
}

/// Lower is better; `None` when the card does not match at all.
fn match_rank(card: &Card, needle: &str) -> Option<u8> {
    let name = card.name.to_lowercase();

    if name == needle {
        Some(0)
    } else if card.short_name().to_lowercase() == needle {
        Some(1)
    } else if name.starts_with(needle) {
        Some(2)
    } else if name.contains(needle) {
        Some(3)
    } else if card.description.to_lowercase().contains(needle) {
        Some(4)
    } else {
        None
    }
}

fn dedup_by_name(cards: Vec<Card>) -> Vec<Card> {
    let mut names = HashSet::new();
    cards.into_iter().filter(|card| names.insert(card.name.clone())).collect()
}
