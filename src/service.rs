use serde::Serialize;

use crate::api::{DrawSource, HttpDrawSource};
use crate::cache::{CacheState, DrawFetcher};
use crate::config::Config;
use crate::connection::open_store;
use crate::database::PickStore;
use crate::errors::AppResult;
use crate::scoring::{MatchResult, score};
use crate::types::{DrawResult, Pick, PickId, UserId};
use crate::validation::validate;

/// A draw together with every pick of one user scored against it.
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub draw: DrawResult,
    pub entries: Vec<(Pick, MatchResult)>,
}

pub struct LotteryService<S> {
    store: PickStore,
    fetcher: DrawFetcher<S>,
}

impl<S: DrawSource> LotteryService<S> {
    pub fn new(store: PickStore, fetcher: DrawFetcher<S>) -> Self {
        Self { store, fetcher }
    }

    pub fn register_pick(&self, owner: UserId, raw: &str) -> AppResult<Pick> {
        let numbers = validate(raw)?;
        Ok(self.store.add(owner, &numbers)?)
    }

    pub fn list_picks(&self, owner: UserId) -> AppResult<Vec<Pick>> {
        Ok(self.store.list(owner)?)
    }

    pub fn remove_pick(&self, owner: UserId, id: PickId) -> AppResult<bool> {
        Ok(self.store.remove(owner, id)?)
    }

    pub async fn latest_draw(&self) -> AppResult<DrawResult> {
        Ok(self.fetcher.fetch_latest().await?)
    }

    pub async fn draw_by_contest(&self, contest: u32) -> AppResult<DrawResult> {
        Ok(self.fetcher.fetch_by_contest(contest).await?)
    }

    pub async fn refresh_latest(&self) -> AppResult<DrawResult> {
        Ok(self.fetcher.refresh_latest().await?)
    }

    pub fn set_manual_result(&self, raw: &str, label: &str) -> AppResult<DrawResult> {
        let numbers = validate(raw)?;
        Ok(self.fetcher.set_manual_result(numbers, label))
    }

    pub fn cache_state(&self) -> CacheState {
        self.fetcher.cache_state()
    }

    pub async fn check_latest(&self, owner: UserId) -> AppResult<CheckReport> {
        let draw = self.latest_draw().await?;
        self.check_against(owner, draw)
    }

    pub async fn check_contest(&self, owner: UserId, contest: u32) -> AppResult<CheckReport> {
        let draw = self.draw_by_contest(contest).await?;
        self.check_against(owner, draw)
    }

    fn check_against(&self, owner: UserId, draw: DrawResult) -> AppResult<CheckReport> {
        let entries = self
            .store
            .list(owner)?
            .into_iter()
            .map(|pick| {
                let result = score(&pick.numbers, &draw);
                (pick, result)
            })
            .collect();
        Ok(CheckReport { draw, entries })
    }
}

/// Service wired to the real results API and the configured SQLite file.
pub fn http_service(config: &Config) -> AppResult<LotteryService<HttpDrawSource>> {
    let store = open_store(&config.database_url)?;
    let source = HttpDrawSource::new(&config.api_base_url, config.http_timeout())?;
    let fetcher = DrawFetcher::with_limits(source, config.cache_ttl(), config.http_timeout());
    Ok(LotteryService::new(store, fetcher))
}
