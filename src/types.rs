use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::ValidationError;

pub const NUMBERS_PER_PICK: usize = 6;
pub const MIN_NUMBER: u8 = 1;
pub const MAX_NUMBER: u8 = 60;

/// Six distinct numbers in 1..=60, always held in ascending order.
///
/// Only [`crate::validation::validate`] builds one, so every value in
/// circulation satisfies the pick invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Numbers([u8; NUMBERS_PER_PICK]);

impl Numbers {
    pub(crate) fn from_sorted(numbers: [u8; NUMBERS_PER_PICK]) -> Self {
        debug_assert!(numbers.windows(2).all(|w| w[0] < w[1]));
        Self(numbers)
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn contains(&self, number: u8) -> bool {
        self.0.binary_search(&number).is_ok()
    }

    /// Comma-joined, zero-padded text, e.g. `04,15,23,33,40,56`.
    pub fn canonical(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Numbers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, n) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{:02}", n)?;
        }
        Ok(())
    }
}

impl FromStr for Numbers {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::validation::validate(s)
    }
}

pub type PickId = i64;
pub type UserId = i64;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pick {
    pub id: PickId,
    pub owner: UserId,
    pub numbers: Numbers,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "number", rename_all = "snake_case")]
pub enum ContestId {
    Official(u32),
    /// Sentinel for results typed in by an operator.
    Manual,
}

impl fmt::Display for ContestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContestId::Official(n) => write!(f, "{}", n),
            ContestId::Manual => f.write_str("MANUAL"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrizeTier {
    pub label: String,
    pub winners: u32,
    pub prize_amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NextDraw {
    pub date: Option<String>,
    pub estimated_prize: Option<f64>,
}

/// Normalized snapshot of one draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawResult {
    pub contest: ContestId,
    /// Drawn numbers in the order upstream reports them.
    pub numbers: Vec<u8>,
    pub draw_date: String,
    pub prize_tiers: Vec<PrizeTier>,
    pub accumulated: bool,
    pub rollover_amount: Option<f64>,
    pub next_draw: Option<NextDraw>,
}

impl DrawResult {
    pub fn manual(numbers: Numbers, label: &str) -> Self {
        Self {
            contest: ContestId::Manual,
            numbers: numbers.as_slice().to_vec(),
            draw_date: label.to_string(),
            prize_tiers: Vec::new(),
            accumulated: false,
            rollover_amount: None,
            next_draw: None,
        }
    }
}

// ---------------------------
// Upstream payload
// ---------------------------

/// Drawn numbers arrive as zero-padded strings, but integers are accepted too.
#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
pub enum DrawnNumber {
    Text(String),
    Int(i64),
}

#[derive(Deserialize, Debug)]
pub struct DrawResponse {
    #[serde(rename = "numero")]
    pub contest: u32,
    #[serde(rename = "dataApuracao")]
    pub draw_date: String,
    #[serde(rename = "listaDezenasSorteadasOrdemSorteio", default)]
    pub numbers_in_draw_order: Option<Vec<DrawnNumber>>,
    #[serde(rename = "listaDezenas", default)]
    pub numbers: Option<Vec<DrawnNumber>>,
    #[serde(rename = "listaRateioPremio", default)]
    pub prize_breakdown: Option<Vec<PrizeBreakdown>>,
    #[serde(rename = "acumulado", default)]
    pub accumulated: Option<bool>,
    #[serde(rename = "valorAcumuladoProximoConcurso", default)]
    pub rollover_amount: Option<f64>,
    #[serde(rename = "dataProximoConcurso", default)]
    pub next_draw_date: Option<String>,
    #[serde(rename = "valorEstimadoProximoConcurso", default)]
    pub next_estimated_prize: Option<f64>,
}

#[derive(Deserialize, Debug)]
pub struct PrizeBreakdown {
    #[serde(rename = "descricaoFaixa")]
    pub label: String,
    #[serde(rename = "numeroDeGanhadores", default)]
    pub winners: u32,
    #[serde(rename = "valorPremio", default)]
    pub prize_amount: f64,
}
