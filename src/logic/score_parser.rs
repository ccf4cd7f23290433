//! Extract match results from activity entries.

use crate::models::{ActivityEntry, ScoreValue, Side};
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

fn score_message_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^Score submitted:\s*(.+)\s+(\d+|W)-(\d+|W)\s+(.+)$").ok()
    })
    .as_ref()
}

/// A score line with names, values and the winning side (None on a tie).
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedScore {
    pub name_a: String,
    pub name_b: String,
    pub score_a: ScoreValue,
    pub score_b: ScoreValue,
    pub winner: Option<Side>,
}

impl ParsedScore {
    pub fn new(
        name_a: impl Into<String>,
        score_a: ScoreValue,
        score_b: ScoreValue,
        name_b: impl Into<String>,
    ) -> Self {
        Self {
            name_a: name_a.into(),
            name_b: name_b.into(),
            score_a,
            score_b,
            winner: compare_scores(score_a, score_b),
        }
    }

    pub fn is_walkover(&self) -> bool {
        self.score_a.is_walkover() || self.score_b.is_walkover()
    }
}

/// `W` beats any number; equal values have no winner; otherwise higher wins.
pub fn compare_scores(a: ScoreValue, b: ScoreValue) -> Option<Side> {
    match (a, b) {
        (ScoreValue::Walkover, ScoreValue::Walkover) => None,
        (ScoreValue::Walkover, _) => Some(Side::A),
        (_, ScoreValue::Walkover) => Some(Side::B),
        (ScoreValue::Games(x), ScoreValue::Games(y)) if x == y => None,
        (ScoreValue::Games(x), ScoreValue::Games(y)) => {
            Some(if x > y { Side::A } else { Side::B })
        }
    }
}

/// Structured score fields take precedence; otherwise the message must read
/// `Score submitted: <A> <scoreA>-<scoreB> <B>`. Anything else is None.
pub fn parse(entry: &ActivityEntry) -> Option<ParsedScore> {
    if let Some(score) = &entry.score {
        return Some(ParsedScore::new(
            score.name_a.trim(),
            lenient_value(&score.score_a),
            lenient_value(&score.score_b),
            score.name_b.trim(),
        ));
    }
    parse_message(&entry.message)
}

/// Parse the free-text form only.
///
/// Game counts must fit a `u32`; a line with a larger number is not a score
/// and is shown as its raw message.
pub fn parse_message(message: &str) -> Option<ParsedScore> {
    let caps = score_message_re()?.captures(message.trim())?;
    let score_a = ScoreValue::parse(&caps[2])?;
    let score_b = ScoreValue::parse(&caps[3])?;
    Some(ParsedScore::new(
        caps[1].trim(),
        score_a,
        score_b,
        caps[4].trim(),
    ))
}

/// Structured values that are neither `W` nor a number count as 0.
fn lenient_value(raw: &str) -> ScoreValue {
    ScoreValue::parse(raw).unwrap_or(ScoreValue::Games(0))
}
