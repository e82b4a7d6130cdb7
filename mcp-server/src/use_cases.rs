use anyhow::Result;
use megasena::router::DELETE_CALLBACK_PREFIX;
use megasena::{AppError, DrawSource, LotteryService, Router, validate};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;

fn str_arg<'a>(arguments: &'a HashMap<String, Value>, name: &str) -> Result<&'a str> {
    arguments
        .get(name)
        .and_then(|v| v.as_str())
        .ok_or_else(|| anyhow::anyhow!("Missing {} parameter", name))
}

fn int_arg(arguments: &HashMap<String, Value>, name: &str) -> Result<i64> {
    arguments
        .get(name)
        .and_then(|v| v.as_i64())
        .ok_or_else(|| anyhow::anyhow!("Missing {} parameter", name))
}

fn contest_arg(arguments: &HashMap<String, Value>) -> Result<Option<u32>> {
    match arguments.get("contest") {
        None | Some(Value::Null) => Ok(None),
        Some(v) => v
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .filter(|n| *n > 0)
            .map(Some)
            .ok_or_else(|| anyhow::anyhow!("contest must be a positive integer")),
    }
}

/// Caller-facing failures become `success: false` payloads; storage
/// failures stay errors and surface as JSON-RPC errors.
fn reported(e: AppError) -> Result<String> {
    match e {
        AppError::Invalid(_) | AppError::Fetch(_) => Ok(json!({
            "success": false,
            "error": e.to_string()
        })
        .to_string()),
        other => Err(other.into()),
    }
}

pub struct PickUseCase<S> {
    service: Arc<LotteryService<S>>,
}

impl<S: DrawSource> PickUseCase<S> {
    pub fn new(service: Arc<LotteryService<S>>) -> Self {
        Self { service }
    }

    pub async fn validate_numbers(&self, arguments: &HashMap<String, Value>) -> Result<String> {
        let raw = str_arg(arguments, "numbers")?;

        match validate(raw) {
            Ok(numbers) => Ok(json!({
                "success": true,
                "numbers": numbers,
                "canonical": numbers.canonical()
            })
            .to_string()),
            Err(e) => reported(e.into()),
        }
    }

    pub async fn add_pick(&self, arguments: &HashMap<String, Value>) -> Result<String> {
        let user_id = int_arg(arguments, "user_id")?;
        let raw = str_arg(arguments, "numbers")?;

        match self.service.register_pick(user_id, raw) {
            Ok(pick) => Ok(json!({
                "success": true,
                "pick": pick,
                "message": format!("Registered pick #{}: {}", pick.id, pick.numbers)
            })
            .to_string()),
            Err(e) => reported(e),
        }
    }

    pub async fn list_picks(&self, arguments: &HashMap<String, Value>) -> Result<String> {
        let user_id = int_arg(arguments, "user_id")?;
        let picks = self.service.list_picks(user_id)?;

        Ok(json!({
            "success": true,
            "picks": picks
        })
        .to_string())
    }

    pub async fn remove_pick(&self, arguments: &HashMap<String, Value>) -> Result<String> {
        let user_id = int_arg(arguments, "user_id")?;
        let pick_id = int_arg(arguments, "pick_id")?;
        let removed = self.service.remove_pick(user_id, pick_id)?;

        Ok(json!({
            "success": true,
            "removed": removed
        })
        .to_string())
    }
}

pub struct DrawUseCase<S> {
    service: Arc<LotteryService<S>>,
}

impl<S: DrawSource> DrawUseCase<S> {
    pub fn new(service: Arc<LotteryService<S>>) -> Self {
        Self { service }
    }

    pub async fn fetch_latest_result(&self, _arguments: &HashMap<String, Value>) -> Result<String> {
        match self.service.latest_draw().await {
            Ok(draw) => Ok(json!({ "success": true, "result": draw }).to_string()),
            Err(e) => reported(e),
        }
    }

    pub async fn fetch_result_by_contest(
        &self,
        arguments: &HashMap<String, Value>,
    ) -> Result<String> {
        let contest =
            contest_arg(arguments)?.ok_or_else(|| anyhow::anyhow!("Missing contest parameter"))?;

        match self.service.draw_by_contest(contest).await {
            Ok(draw) => Ok(json!({ "success": true, "result": draw }).to_string()),
            Err(e) => reported(e),
        }
    }

    pub async fn refresh_latest_result(
        &self,
        _arguments: &HashMap<String, Value>,
    ) -> Result<String> {
        match self.service.refresh_latest().await {
            Ok(draw) => Ok(json!({ "success": true, "result": draw }).to_string()),
            Err(e) => reported(e),
        }
    }

    pub async fn set_manual_result(&self, arguments: &HashMap<String, Value>) -> Result<String> {
        let raw = str_arg(arguments, "numbers")?;
        let label = arguments
            .get("label")
            .and_then(|v| v.as_str())
            .unwrap_or("MANUAL");

        match self.service.set_manual_result(raw, label) {
            Ok(draw) => Ok(json!({ "success": true, "result": draw }).to_string()),
            Err(e) => reported(e),
        }
    }

    pub async fn check_picks(&self, arguments: &HashMap<String, Value>) -> Result<String> {
        let user_id = int_arg(arguments, "user_id")?;
        let report = match contest_arg(arguments)? {
            Some(contest) => self.service.check_contest(user_id, contest).await,
            None => self.service.check_latest(user_id).await,
        };

        let report = match report {
            Ok(report) => report,
            Err(e) => return reported(e),
        };

        let entries: Vec<Value> = report
            .entries
            .iter()
            .map(|(pick, result)| {
                json!({
                    "pick_id": pick.id,
                    "numbers": pick.numbers.canonical(),
                    "hit_count": result.hit_count,
                    "hits": result.hits,
                    "tier": result.tier(),
                    "tier_label": result.tier().label()
                })
            })
            .collect();

        Ok(json!({
            "success": true,
            "draw": report.draw,
            "entries": entries
        })
        .to_string())
    }
}

pub struct ChatUseCase<S> {
    router: Router<S>,
}

impl<S: DrawSource> ChatUseCase<S> {
    pub fn new(service: Arc<LotteryService<S>>) -> Self {
        Self {
            router: Router::new(service),
        }
    }

    pub async fn chat_message(&self, arguments: &HashMap<String, Value>) -> Result<String> {
        let user_id = int_arg(arguments, "user_id")?;
        let text = str_arg(arguments, "text")?;

        let reply = if text.starts_with(DELETE_CALLBACK_PREFIX) {
            self.router.handle_callback(user_id, text).await
        } else {
            self.router.handle_text(user_id, text).await
        };

        Ok(json!({
            "success": true,
            "reply": reply
        })
        .to_string())
    }
}
