//! Maps inbound chat text and button callbacks onto the lottery service.

use std::sync::Arc;
use tracing::error;

use crate::api::DrawSource;
use crate::errors::{AppError, FetchError};
use crate::reports::{
    NO_PICKS, format_check_report, format_draw_details, format_pick_list,
};
use crate::service::LotteryService;
use crate::session::{PendingOp, SessionContext};
use crate::types::{PickId, UserId};
use crate::validation::parse_contest_id;

pub const MENU_ADD: &str = "➕ Adicionar Jogo";
pub const MENU_LIST: &str = "📋 Listar Jogos";
pub const MENU_CHECK_LATEST: &str = "✅ Conferir Jogos (Último Sorteio)";
pub const MENU_RESULT_BY_CONTEST: &str = "📅 Resultado por Concurso";
pub const MENU_CHECK_PAST: &str = "📂 Conferir com Concurso Passado";
pub const MENU_DELETE: &str = "❌ Excluir Jogo";

/// Prefix of inline-button payloads that delete a pick: `excluir_<id>`.
pub const DELETE_CALLBACK_PREFIX: &str = "excluir_";

const WELCOME: &str = "🎉 Olá! Bem-vindo ao *Bot Mega-Sena*!\n\nUse o menu abaixo para começar.";
const FETCH_FAILED: &str = "❌ Erro ao obter o resultado da Mega-Sena.";
const INTERNAL_ERROR: &str = "❌ Erro interno, tente novamente.";

/// Menu rows in display order.
pub fn menu() -> [&'static str; 6] {
    [
        MENU_ADD,
        MENU_LIST,
        MENU_CHECK_LATEST,
        MENU_RESULT_BY_CONTEST,
        MENU_CHECK_PAST,
        MENU_DELETE,
    ]
}

pub struct Router<S> {
    service: Arc<LotteryService<S>>,
    sessions: SessionContext,
}

impl<S: DrawSource> Router<S> {
    pub fn new(service: Arc<LotteryService<S>>) -> Self {
        Self {
            service,
            sessions: SessionContext::new(),
        }
    }

    pub fn sessions(&self) -> &SessionContext {
        &self.sessions
    }

    pub async fn handle_text(&self, user: UserId, text: &str) -> String {
        let text = text.trim();
        match text {
            "/start" => {
                self.sessions.reset(user);
                WELCOME.to_string()
            }
            "/cancel" => {
                self.sessions.reset(user);
                "Operação cancelada.".to_string()
            }
            MENU_ADD => {
                self.sessions.begin(user, PendingOp::AwaitingNumbers);
                "Digite 6 dezenas separadas por vírgula:".to_string()
            }
            MENU_LIST => {
                self.sessions.reset(user);
                match self.service.list_picks(user) {
                    Ok(picks) => format_pick_list(&picks),
                    Err(e) => internal_error(e),
                }
            }
            MENU_CHECK_LATEST => {
                self.sessions.reset(user);
                match self.service.check_latest(user).await {
                    Ok(report) => format_check_report(&report.draw, &report.entries),
                    Err(AppError::Fetch(_)) => FETCH_FAILED.to_string(),
                    Err(e) => internal_error(e),
                }
            }
            MENU_RESULT_BY_CONTEST => {
                self.sessions.begin(user, PendingOp::AwaitingContestId);
                "Digite o número do concurso:".to_string()
            }
            MENU_CHECK_PAST => {
                self.sessions.begin(user, PendingOp::AwaitingPastCheck);
                "Digite o número do concurso para conferir seus jogos:".to_string()
            }
            MENU_DELETE => self.start_delete(user),
            _ => match self.sessions.current(user) {
                Some(op) => self.continue_op(user, op, text).await,
                None => "Use o menu para escolher uma opção.".to_string(),
            },
        }
    }

    /// Inline-button payloads. Only pick deletion uses them.
    pub async fn handle_callback(&self, user: UserId, data: &str) -> String {
        match data
            .strip_prefix(DELETE_CALLBACK_PREFIX)
            .and_then(|id| id.parse::<PickId>().ok())
        {
            Some(id) => {
                self.sessions.reset(user);
                self.delete(user, id)
            }
            None => "Ação desconhecida.".to_string(),
        }
    }

    fn start_delete(&self, user: UserId) -> String {
        match self.service.list_picks(user) {
            Ok(picks) if picks.is_empty() => {
                self.sessions.reset(user);
                NO_PICKS.to_string()
            }
            Ok(picks) => {
                self.sessions.begin(user, PendingOp::AwaitingDeleteId);
                let mut text = String::from("Digite o número do jogo para excluir:\n\n");
                for pick in picks {
                    text.push_str(&format!("Jogo #{}: {}\n", pick.id, pick.numbers));
                }
                text
            }
            Err(e) => internal_error(e),
        }
    }

    async fn continue_op(&self, user: UserId, op: PendingOp, text: &str) -> String {
        match op {
            PendingOp::AwaitingNumbers => match self.service.register_pick(user, text) {
                Ok(pick) => {
                    self.sessions.reset(user);
                    format!("✅ Jogo cadastrado: {}", pick.numbers)
                }
                Err(AppError::Invalid(_)) => {
                    "❌ Dezenas inválidas. Digite 6 números de 1 a 60.".to_string()
                }
                Err(e) => {
                    self.sessions.reset(user);
                    internal_error(e)
                }
            },
            PendingOp::AwaitingContestId => {
                let Ok(contest) = parse_contest_id(text) else {
                    return "Número inválido.".to_string();
                };
                self.sessions.reset(user);
                match self.service.draw_by_contest(contest).await {
                    Ok(draw) => format_draw_details(&draw),
                    Err(AppError::Fetch(FetchError::ContestNotFound(_))) => {
                        "Concurso não encontrado.".to_string()
                    }
                    Err(AppError::Fetch(_)) => FETCH_FAILED.to_string(),
                    Err(e) => internal_error(e),
                }
            }
            PendingOp::AwaitingPastCheck => {
                let Ok(contest) = parse_contest_id(text) else {
                    return "Número inválido.".to_string();
                };
                self.sessions.reset(user);
                match self.service.check_contest(user, contest).await {
                    Ok(report) => format_check_report(&report.draw, &report.entries),
                    Err(AppError::Fetch(FetchError::ContestNotFound(_))) => {
                        "Concurso não encontrado ou inválido.".to_string()
                    }
                    Err(AppError::Fetch(_)) => FETCH_FAILED.to_string(),
                    Err(e) => internal_error(e),
                }
            }
            PendingOp::AwaitingDeleteId => {
                let Ok(id) = text.trim_start_matches('#').parse::<PickId>() else {
                    return "Número inválido.".to_string();
                };
                self.sessions.reset(user);
                self.delete(user, id)
            }
        }
    }

    fn delete(&self, user: UserId, id: PickId) -> String {
        match self.service.remove_pick(user, id) {
            Ok(true) => "🗑️ Jogo removido com sucesso!".to_string(),
            Ok(false) => "Jogo não encontrado.".to_string(),
            Err(e) => internal_error(e),
        }
    }
}

fn internal_error(e: AppError) -> String {
    error!("request failed: {}", e);
    INTERNAL_ERROR.to_string()
}
