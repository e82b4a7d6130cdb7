//! Latest-draw memo and the fetcher that guards it.
//!
//! The slot is process-wide: every caller of [`DrawFetcher::fetch_latest`]
//! shares it. An `Overridden` slot is never replaced by an automatic
//! refresh, only by [`DrawFetcher::refresh_latest`] or another override.
//!
//! The mutex is only held to read or swap the slot, never across an upstream
//! call.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::api::DrawSource;
use crate::errors::FetchError;
use crate::types::{DrawResult, Numbers};

pub const DEFAULT_TTL: Duration = Duration::from_secs(10 * 60);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq)]
pub enum CacheState {
    Empty,
    Fresh { draw: DrawResult, fetched_at: Instant },
    Overridden { draw: DrawResult, set_at: Instant },
}

pub struct DrawFetcher<S> {
    source: S,
    slot: Mutex<CacheState>,
    ttl: Duration,
    timeout: Duration,
}

impl<S: DrawSource> DrawFetcher<S> {
    pub fn new(source: S) -> Self {
        Self::with_limits(source, DEFAULT_TTL, DEFAULT_TIMEOUT)
    }

    pub fn with_limits(source: S, ttl: Duration, timeout: Duration) -> Self {
        Self {
            source,
            slot: Mutex::new(CacheState::Empty),
            ttl,
            timeout,
        }
    }

    fn slot(&self) -> MutexGuard<'_, CacheState> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn cache_state(&self) -> CacheState {
        self.slot().clone()
    }

    /// Latest draw, served from the slot while it is fresh or overridden.
    pub async fn fetch_latest(&self) -> Result<DrawResult, FetchError> {
        if let Some(draw) = self.cached_latest() {
            return Ok(draw);
        }

        info!("latest draw not cached, asking upstream");
        let draw = self.fetch_upstream(None).await?;

        let mut slot = self.slot();
        if let CacheState::Overridden { draw: manual, .. } = &*slot {
            debug!("manual result set during fetch, keeping it");
            return Ok(manual.clone());
        }
        *slot = CacheState::Fresh {
            draw: draw.clone(),
            fetched_at: Instant::now(),
        };
        Ok(draw)
    }

    /// Fetches the latest draw and stores it, replacing a manual override.
    pub async fn refresh_latest(&self) -> Result<DrawResult, FetchError> {
        let draw = self.fetch_upstream(None).await?;
        let mut slot = self.slot();
        if matches!(&*slot, CacheState::Overridden { .. }) {
            info!("manual result replaced by upstream contest {}", draw.contest);
        }
        *slot = CacheState::Fresh {
            draw: draw.clone(),
            fetched_at: Instant::now(),
        };
        Ok(draw)
    }

    /// Specific contest. Never cached.
    pub async fn fetch_by_contest(&self, contest: u32) -> Result<DrawResult, FetchError> {
        self.fetch_upstream(Some(contest)).await
    }

    /// Pins an operator-supplied result until the next explicit refresh or override.
    pub fn set_manual_result(&self, numbers: Numbers, label: &str) -> DrawResult {
        let draw = DrawResult::manual(numbers, label);
        info!("manual result set: {} ({})", numbers, label);
        *self.slot() = CacheState::Overridden {
            draw: draw.clone(),
            set_at: Instant::now(),
        };
        draw
    }

    fn cached_latest(&self) -> Option<DrawResult> {
        match &*self.slot() {
            CacheState::Overridden { draw, .. } => {
                debug!("serving manual result");
                Some(draw.clone())
            }
            CacheState::Fresh { draw, fetched_at } if fetched_at.elapsed() < self.ttl => {
                debug!("cache hit for contest {}", draw.contest);
                Some(draw.clone())
            }
            CacheState::Fresh { .. } => {
                debug!("cached draw expired");
                None
            }
            CacheState::Empty => None,
        }
    }

    async fn fetch_upstream(&self, contest: Option<u32>) -> Result<DrawResult, FetchError> {
        match tokio::time::timeout(self.timeout, self.source.fetch(contest)).await {
            Ok(result) => result.inspect_err(|e| warn!("draw fetch failed: {}", e)),
            Err(_) => {
                warn!("draw fetch exceeded {:?}", self.timeout);
                Err(FetchError::Timeout)
            }
        }
    }
}
