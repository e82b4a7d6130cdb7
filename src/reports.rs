//! Reply text for chat transports (Markdown-flavoured, Portuguese).

use crate::scoring::MatchResult;
use crate::types::{ContestId, DrawResult, Pick};
use crate::utils::{format_brl, format_timestamp};

pub const NO_PICKS: &str = "Você não tem jogos cadastrados.";

fn join_numbers(numbers: &[u8]) -> String {
    numbers
        .iter()
        .map(|n| format!("{:02}", n))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn format_draw(draw: &DrawResult) -> String {
    let header = match draw.contest {
        ContestId::Official(n) => format!("🎯 Resultado Mega-Sena #{} - {}", n, draw.draw_date),
        ContestId::Manual => format!("🎯 Resultado manual - {}", draw.draw_date),
    };
    format!("{}\nDezenas: {}", header, join_numbers(&draw.numbers))
}

pub fn format_prize_tiers(draw: &DrawResult) -> String {
    let mut text = String::new();
    for tier in &draw.prize_tiers {
        text.push_str(&format!(
            "{}: {} ganhador(es) - {}\n",
            tier.label,
            tier.winners,
            format_brl(tier.prize_amount)
        ));
    }
    if draw.accumulated {
        if let Some(amount) = draw.rollover_amount {
            text.push_str(&format!("Acumulado para o próximo concurso: {}\n", format_brl(amount)));
        }
    }
    if let Some(next) = &draw.next_draw {
        if let (Some(date), Some(estimate)) = (&next.date, next.estimated_prize) {
            text.push_str(&format!(
                "Próximo sorteio {}: estimativa de {}\n",
                date,
                format_brl(estimate)
            ));
        }
    }
    text
}

/// Full result message: header, numbers and, when known, the prize breakdown.
pub fn format_draw_details(draw: &DrawResult) -> String {
    let tiers = format_prize_tiers(draw);
    if tiers.is_empty() {
        format_draw(draw)
    } else {
        format!("{}\n\n{}", format_draw(draw), tiers.trim_end())
    }
}

pub fn format_pick_list(picks: &[Pick]) -> String {
    if picks.is_empty() {
        return NO_PICKS.to_string();
    }
    let mut text = String::from("📋 *Seus Jogos:*\n\n");
    for pick in picks {
        text.push_str(&format!(
            "#{}: {} (cadastrado em {})\n",
            pick.id,
            pick.numbers,
            format_timestamp(&pick.created_at)
        ));
    }
    text
}

pub fn format_pick_check(pick: &Pick, result: &MatchResult) -> String {
    let marked = pick
        .numbers
        .as_slice()
        .iter()
        .map(|n| {
            if result.hits.contains(n) {
                format!("{:02} ✅", n)
            } else {
                format!("{:02}", n)
            }
        })
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "Jogo #{}: {} - Acertos: *{}* {}",
        pick.id,
        marked,
        result.hit_count,
        result.tier().emoji()
    )
}

pub fn format_check_report(draw: &DrawResult, entries: &[(Pick, MatchResult)]) -> String {
    if entries.is_empty() {
        return NO_PICKS.to_string();
    }
    let mut text = format_draw(draw);
    text.push_str("\n\n");
    for (pick, result) in entries {
        text.push_str(&format_pick_check(pick, result));
        text.push('\n');
    }
    text
}
