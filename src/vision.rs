//! Checks the vision service's recommendation against the engine.
use std::fmt;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use taipai::tile::{MAX_COPIES, NUM_TILE_TYPES};
use taipai::{Decision, DiscardKind, Hand, Tile, Token};

/// What the vision service returns for one photo.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub my_hand: Vec<String>,
    /// Discards on the table, the hand's own included.
    #[serde(default)]
    pub discards: Vec<String>,
    #[serde(default)]
    pub safe_tiles: Vec<String>,
    pub recommendation: Recommendation,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Recommendation {
    pub action: Action,
    #[serde(default)]
    pub tile: String,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub reasoning: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Discard,
    Chow,
    Pong,
    Kong,
    Hu,
    Wait,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Verdict {
    /// Same tile the engine ranks first.
    Best,
    Holding,
    Receding,
    NotInHand,
    /// Not a discard, or the hand is not due to discard.
    NotADiscard,
    UnreadableTile,
}

#[derive(Debug, Clone, Serialize)]
pub struct Check {
    #[serde(skip)]
    pub hand: Hand,
    pub verdict: Verdict,
    pub action: Action,
    pub tile: Option<Tile>,
    pub confidence: f64,
    pub decision: Decision,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Best => "best",
            Self::Holding => "holding",
            Self::Receding => "receding",
            Self::NotInHand => "not-in-hand",
            Self::NotADiscard => "not-a-discard",
            Self::UnreadableTile => "unreadable-tile",
        })
    }
}

/// Hand and visible counts read from the result.
///
/// Unreadable discards are skipped, and so are discards that would make more
/// than four of a kind together with the hand.
pub fn read_tiles(result: &AnalysisResult) -> Result<(Hand, [u8; NUM_TILE_TYPES])> {
    let tokens = result
        .my_hand
        .iter()
        .map(|s| s.parse::<Token>())
        .collect::<taipai::Result<Vec<_>>>()
        .context("unreadable tile in myHand")?;
    let hand = Hand::from_tokens(tokens).context("myHand is not a valid hand")?;

    let mut visible = [0; NUM_TILE_TYPES];
    for code in &result.discards {
        let tile = match code.parse::<Tile>() {
            Ok(tile) => tile,
            Err(err) => {
                log::warn!("skipping discard: {err}");
                continue;
            }
        };
        let seen = &mut visible[tile.as_usize()];
        if hand.count(tile) + *seen >= MAX_COPIES {
            log::warn!("skipping discard {tile}, all four copies are already accounted for");
            continue;
        }
        *seen += 1;
    }
    Ok((hand, visible))
}

pub fn verdict(recommendation: &Recommendation, decision: &Decision) -> (Verdict, Option<Tile>) {
    if recommendation.action != Action::Discard {
        return (Verdict::NotADiscard, None);
    }
    let Ok(tile) = recommendation.tile.trim().parse::<Tile>() else {
        return (Verdict::UnreadableTile, None);
    };
    if decision.candidates.is_none() {
        return (Verdict::NotADiscard, Some(tile));
    }
    let verdict = match decision.candidate(tile) {
        None => Verdict::NotInHand,
        Some(_) if decision.best_discard == Some(tile) => Verdict::Best,
        Some(c) if c.quality == DiscardKind::Holding => Verdict::Holding,
        Some(_) => Verdict::Receding,
    };
    (verdict, Some(tile))
}

pub fn check(result: &AnalysisResult) -> Result<Check> {
    let (hand, visible) = read_tiles(result)?;
    let decision = Decision::new(&hand, &visible)?;
    let (verdict, tile) = verdict(&result.recommendation, &decision);
    Ok(Check {
        hand,
        verdict,
        action: result.recommendation.action,
        tile,
        confidence: result.recommendation.confidence,
        decision,
    })
}
