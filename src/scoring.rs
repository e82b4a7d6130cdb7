use serde::Serialize;
use std::collections::BTreeSet;

use crate::types::{DrawResult, Numbers};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    pub hit_count: usize,
    pub hits: BTreeSet<u8>,
}

/// Counts the pick's numbers that appear in the draw.
pub fn score(pick: &Numbers, draw: &DrawResult) -> MatchResult {
    let hits: BTreeSet<u8> = draw
        .numbers
        .iter()
        .copied()
        .filter(|n| pick.contains(*n))
        .collect();

    MatchResult {
        hit_count: hits.len(),
        hits,
    }
}

/// Presentation bucket for a hit count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Sena,
    Quina,
    Quadra,
    NoPrize,
}

impl Tier {
    pub fn from_hits(hit_count: usize) -> Self {
        match hit_count {
            6 => Tier::Sena,
            5 => Tier::Quina,
            4 => Tier::Quadra,
            _ => Tier::NoPrize,
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Tier::Sena => "🏆🎉",
            Tier::Quina => "💰",
            Tier::Quadra => "🎯",
            Tier::NoPrize => "✖️",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tier::Sena => "Sena",
            Tier::Quina => "Quina",
            Tier::Quadra => "Quadra",
            Tier::NoPrize => "Sem prêmio",
        }
    }
}

impl MatchResult {
    pub fn tier(&self) -> Tier {
        Tier::from_hits(self.hit_count)
    }
}
