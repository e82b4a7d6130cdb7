use reqwest::StatusCode;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, ORIGIN, REFERER, USER_AGENT};
use std::collections::BTreeSet;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

use crate::errors::FetchError;
use crate::types::{
    ContestId, DrawResponse, DrawResult, DrawnNumber, MAX_NUMBER, MIN_NUMBER, NUMBERS_PER_PICK,
    NextDraw, PrizeTier,
};

pub const DEFAULT_API_URL: &str = "https://servicebus2.caixa.gov.br/portaldeloterias/api/megasena";

/// Something that can produce draw results: the real HTTP API, or a stand-in.
///
/// `None` asks for the latest draw, `Some(n)` for contest `n`.
pub trait DrawSource: Send + Sync {
    fn fetch(
        &self,
        contest: Option<u32>,
    ) -> impl Future<Output = Result<DrawResult, FetchError>> + Send;
}

pub struct HttpDrawSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpDrawSource {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("Mozilla/5.0"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            ORIGIN,
            HeaderValue::from_static("https://www.loterias.caixa.gov.br"),
        );
        headers.insert(
            REFERER,
            HeaderValue::from_static("https://www.loterias.caixa.gov.br/"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        Ok(Self::with_client(base_url, client))
    }

    /// Uses a caller-built client, e.g. one without proxy settings.
    pub fn with_client(base_url: &str, client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn url_for(&self, contest: Option<u32>) -> String {
        match contest {
            Some(n) => format!("{}/{}", self.base_url, n),
            None => self.base_url.clone(),
        }
    }
}

impl DrawSource for HttpDrawSource {
    async fn fetch(&self, contest: Option<u32>) -> Result<DrawResult, FetchError> {
        let url = self.url_for(contest);
        debug!("GET {}", url);

        let response = self.client.get(&url).send().await.inspect_err(|e| {
            warn!("request to {} failed: {}", url, e);
        })?;

        match (response.status(), contest) {
            (StatusCode::OK, _) => {}
            (StatusCode::NOT_FOUND, Some(n)) => return Err(FetchError::ContestNotFound(n)),
            (status, _) => {
                warn!("{} answered HTTP {}", url, status);
                return Err(FetchError::Status(status.as_u16()));
            }
        }

        let body = response.text().await?;
        parse_draw_payload(&body)
    }
}

/// Parses one upstream JSON document into a [`DrawResult`].
pub fn parse_draw_payload(body: &str) -> Result<DrawResult, FetchError> {
    let response: DrawResponse =
        serde_json::from_str(body).map_err(|e| FetchError::Malformed(e.to_string()))?;
    normalize(response)
}

fn normalize(response: DrawResponse) -> Result<DrawResult, FetchError> {
    let raw_numbers = [response.numbers_in_draw_order, response.numbers]
        .into_iter()
        .flatten()
        .find(|list| !list.is_empty())
        .ok_or(FetchError::MissingNumbers)?;

    let numbers = raw_numbers
        .iter()
        .map(drawn_number)
        .collect::<Result<Vec<u8>, FetchError>>()?;

    if numbers.len() != NUMBERS_PER_PICK {
        return Err(FetchError::Malformed(format!(
            "expected {} drawn numbers, got {}",
            NUMBERS_PER_PICK,
            numbers.len()
        )));
    }

    let mut seen = BTreeSet::new();
    if let Some(dup) = numbers.iter().find(|n| !seen.insert(**n)) {
        return Err(FetchError::Malformed(format!("duplicate drawn number {}", dup)));
    }

    let prize_tiers = response
        .prize_breakdown
        .unwrap_or_default()
        .into_iter()
        .map(|p| PrizeTier {
            label: p.label,
            winners: p.winners,
            prize_amount: p.prize_amount,
        })
        .collect();

    let next_draw = match (response.next_draw_date, response.next_estimated_prize) {
        (None, None) => None,
        (date, estimated_prize) => Some(NextDraw {
            date,
            estimated_prize,
        }),
    };

    Ok(DrawResult {
        contest: ContestId::Official(response.contest),
        numbers,
        draw_date: response.draw_date,
        prize_tiers,
        accumulated: response.accumulated.unwrap_or(false),
        rollover_amount: response.rollover_amount,
        next_draw,
    })
}

fn drawn_number(raw: &DrawnNumber) -> Result<u8, FetchError> {
    let value = match raw {
        DrawnNumber::Text(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| FetchError::Malformed(format!("drawn number {:?}", s)))?,
        DrawnNumber::Int(n) => *n,
    };
    if value < i64::from(MIN_NUMBER) || value > i64::from(MAX_NUMBER) {
        return Err(FetchError::Malformed(format!(
            "drawn number {} out of range",
            value
        )));
    }
    Ok(value as u8)
}
