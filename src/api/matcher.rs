//! Pet match swiper.
//!
//! The deck only stores a cursor and the matched pet ids; pets are read
//! again on every request.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::{
    models::pet::{Pet, PetOrder},
    repo,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Swipe {
    Like,
    Pass,
}

impl FromStr for Swipe {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "like" | "right" => Ok(Swipe::Like),
            "pass" | "left" => Ok(Swipe::Pass),
            other => anyhow::bail!("unknown swipe `{other}`"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchDeck {
    cursor: usize,
    matched: Vec<i64>,
}

impl MatchDeck {
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Past the last pet nothing changes
    pub fn swipe(&mut self, swipe: Swipe, pets: &[Pet]) {
        let Some(pet) = pets.get(self.cursor) else {
            return;
        };

        if swipe == Swipe::Like {
            self.matched.push(pet.id);
        }
        self.cursor += 1;
    }

    pub fn reset(&mut self) {
        self.cursor = 0;
        self.matched.clear();
    }

    pub fn remaining(&self, pets: &[Pet]) -> usize {
        pets.len().saturating_sub(self.cursor)
    }

    pub fn current<'a>(&self, pets: &'a [Pet]) -> Option<&'a Pet> {
        pets.get(self.cursor)
    }

    /// Matched pets still present in `pets`, in match order
    pub fn matches(&self, pets: &[Pet]) -> Vec<Pet> {
        self.matched
            .iter()
            .filter_map(|id| pets.iter().find(|pet| pet.id == *id))
            .cloned()
            .collect()
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct MatchView {
    pub current: Option<Pet>,
    pub next: Option<Pet>,
    pub matches: Vec<Pet>,
    pub remaining: usize,
}

impl MatchView {
    pub fn new(deck: &MatchDeck, pets: &[Pet]) -> Self {
        Self {
            current: deck.current(pets).cloned(),
            next: pets.get(deck.cursor() + 1).cloned(),
            matches: deck.matches(pets),
            remaining: deck.remaining(pets),
        }
    }
}

pub async fn get_match_view(
    deck: &MatchDeck,
    repo: &repo::ImplAppRepo,
) -> anyhow::Result<MatchView> {
    let pets = repo.get_pets(PetOrder::IdAsc).await?;
    Ok(MatchView::new(deck, &pets))
}

/// Applies `swipe` on the current pet and returns the updated view
pub async fn swipe(
    deck: &mut MatchDeck,
    swipe: Swipe,
    repo: &repo::ImplAppRepo,
) -> anyhow::Result<MatchView> {
    let pets = repo.get_pets(PetOrder::IdAsc).await?;
    deck.swipe(swipe, &pets);

    Ok(MatchView::new(deck, &pets))
}
