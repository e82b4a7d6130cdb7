//! Mega-Sena pick registration and draw checking.
//!
//! Users register six-number picks, the latest or a specific draw is fetched
//! from the public results API (the latest one is memoized for a few
//! minutes), and each pick is scored by how many numbers it hit.

pub mod api;
pub mod cache;
pub mod config;
pub mod connection;
pub mod database;
pub mod errors;
pub mod reports;
pub mod router;
pub mod scoring;
pub mod service;
pub mod session;
pub mod types;
pub mod utils;
pub mod validation;

pub use api::{DrawSource, HttpDrawSource};
pub use cache::{CacheState, DrawFetcher};
pub use database::PickStore;
pub use errors::{AppError, AppResult, FetchError, ValidationError};
pub use router::Router;
pub use scoring::{MatchResult, Tier, score};
pub use service::{CheckReport, LotteryService, http_service};
pub use types::*;
pub use validation::{parse_contest_id, validate};
