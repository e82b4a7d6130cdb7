#![allow(dead_code)]
use megasena::{ContestId, DrawResult, DrawSource, FetchError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub fn draw(contest: u32, numbers: &[u8]) -> DrawResult {
    DrawResult {
        contest: ContestId::Official(contest),
        numbers: numbers.to_vec(),
        draw_date: "20/09/2025".to_string(),
        prize_tiers: Vec::new(),
        accumulated: false,
        rollover_amount: None,
        next_draw: None,
    }
}

/// Upstream JSON as the results API returns it for one contest.
pub fn payload(contest: u32, numbers: &[&str]) -> String {
    let list = numbers
        .iter()
        .map(|n| format!("\"{}\"", n))
        .collect::<Vec<_>>()
        .join(",");
    format!(
        r#"{{"numero": {}, "dataApuracao": "20/09/2025", "listaDezenas": [{}],
            "listaDezenasSorteadasOrdemSorteio": [{}], "acumulado": false,
            "listaRateioPremio": [{{"descricaoFaixa": "6 acertos", "numeroDeGanhadores": 1, "valorPremio": 50000000.0}}]}}"#,
        contest, list, list
    )
}

struct FakeState {
    calls: AtomicUsize,
    latest: Mutex<Result<DrawResult, FetchError>>,
    contests: Mutex<HashMap<u32, DrawResult>>,
    delay: Option<Duration>,
}

/// In-process draw source that counts how often it is asked.
#[derive(Clone)]
pub struct FakeSource {
    state: Arc<FakeState>,
}

impl FakeSource {
    pub fn new(latest: DrawResult) -> Self {
        Self::build(Ok(latest), None)
    }

    pub fn failing(error: FetchError) -> Self {
        Self::build(Err(error), None)
    }

    pub fn slow(latest: DrawResult, delay: Duration) -> Self {
        Self::build(Ok(latest), Some(delay))
    }

    fn build(latest: Result<DrawResult, FetchError>, delay: Option<Duration>) -> Self {
        Self {
            state: Arc::new(FakeState {
                calls: AtomicUsize::new(0),
                latest: Mutex::new(latest),
                contests: Mutex::new(HashMap::new()),
                delay,
            }),
        }
    }

    pub fn calls(&self) -> usize {
        self.state.calls.load(Ordering::SeqCst)
    }

    pub fn set_latest(&self, latest: Result<DrawResult, FetchError>) {
        *self.state.latest.lock().unwrap() = latest;
    }

    pub fn add_contest(&self, draw: DrawResult) {
        if let ContestId::Official(n) = draw.contest {
            self.state.contests.lock().unwrap().insert(n, draw);
        }
    }
}

impl DrawSource for FakeSource {
    async fn fetch(&self, contest: Option<u32>) -> Result<DrawResult, FetchError> {
        self.state.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.state.delay {
            tokio::time::sleep(delay).await;
        }
        match contest {
            None => self.state.latest.lock().unwrap().clone(),
            Some(n) => self
                .state
                .contests
                .lock()
                .unwrap()
                .get(&n)
                .cloned()
                .ok_or(FetchError::ContestNotFound(n)),
        }
    }
}
