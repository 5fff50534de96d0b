//! Human readable rendering of a decision
use std::collections::BTreeMap;
use console::style;
use taipai::decision::{Candidate, Decision};
use taipai::{DiscardKind, Hand, Tile};

fn shanten_label(shanten: i8) -> String {
    match shanten {
        -1 => "complete".to_owned(),
        0 => "tenpai".to_owned(),
        n => format!("{n}-shanten"),
    }
}

fn tiles_string(tiles: &BTreeMap<Tile, u8>) -> String {
    tiles
        .iter()
        .map(|(tile, count)| format!("{tile}[{count}]"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn candidate_string(candidate: &Candidate, best: bool) -> String {
    let line = format!(
        "{:<6} {:>2} {:>3} {}",
        candidate.discard.to_string(),
        candidate.shanten,
        candidate.ukeire,
        tiles_string(&candidate.accepting_tiles),
    );
    match candidate.quality {
        _ if best => style(line).green().to_string(),
        DiscardKind::Holding => line,
        DiscardKind::Receding => style(line).dim().to_string(),
    }
}

pub fn to_log_string(hand: &Hand, decision: &Decision) -> String {
    let visible_string = if decision.visible_count > 0 {
        format!(", {} visible", decision.visible_count)
    } else {
        "".to_owned()
    };
    let ukeire_string = match (&decision.accepting_tiles, decision.total_ukeire) {
        (Some(tiles), Some(total)) if !tiles.is_empty() => format!("\nukeire {total}: {}", tiles_string(tiles)),
        _ => "".to_owned(),
    };
    let candidates_string = decision
        .candidates
        .iter()
        .flatten()
        .enumerate()
        .map(|(i, candidate)| candidate_string(candidate, i == 0))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "{} ({}, {}{visible_string}){ukeire_string}{}\n{}",
        style(hand).bold(),
        shanten_label(decision.shanten),
        decision.phase,
        if !candidates_string.is_empty() {
            format!("\n{candidates_string}")
        } else {
            "".to_owned()
        },
        style(decision.advice()).bold(),
    )
}

#[cfg(test)]
pub mod test {
    use super::*;

    fn render(hand: &str, visible: &str) -> String {
        let parsed: Hand = hand.parse().unwrap();
        let decision = Decision::parse(hand, visible).unwrap();
        console::strip_ansi_codes(&to_log_string(&parsed, &decision)).into_owned()
    }

    #[test]
    pub fn waiting_report() {
        let out = render("123m 456p 789s 111z 22z 55z 3F", "");
        assert_eq!(
            out,
            "123m 456p 789s 1112255z +1F (tenpai, waiting)\nukeire 4: South[2] White[2]\ntenpai, waiting on 南, 白"
        );
    }

    #[test]
    pub fn discarding_report() {
        let out = render("123m 456p 789s 111z 22z 55z 7z", "2z");
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines[0], "123m 456p 789s 11122557z (tenpai, discarding, 1 visible)");
        assert_eq!(lines[1], "Red     0   3 South[1] White[2]");
        assert_eq!(lines.len(), 1 + 13 + 1);
        assert_eq!(lines[14], "discard 中 (ukeire 3, shanten 0)");
    }
}
