//! Activity log entries (append-only score events).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    #[default]
    Score,
    Note,
}

/// Score fields as submitted; values are raw tokens (`"2"`, `"W"`).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredScore {
    pub name_a: String,
    pub name_b: String,
    pub score_a: String,
    pub score_b: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    #[serde(default, rename = "type")]
    pub kind: ActivityKind,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub score: Option<StructuredScore>,
    #[serde(default)]
    pub time: Option<DateTime<Utc>>,
}

impl ActivityEntry {
    /// A free-text score event.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            kind: ActivityKind::Score,
            message: message.into(),
            score: None,
            time: None,
        }
    }

    /// A structured score event; the message mirrors the legacy text form.
    pub fn score(
        name_a: impl Into<String>,
        score_a: impl Into<String>,
        score_b: impl Into<String>,
        name_b: impl Into<String>,
    ) -> Self {
        let score = StructuredScore {
            name_a: name_a.into(),
            name_b: name_b.into(),
            score_a: score_a.into(),
            score_b: score_b.into(),
        };
        Self {
            kind: ActivityKind::Score,
            message: format!(
                "Score submitted: {} {}-{} {}",
                score.name_a, score.score_a, score.score_b, score.name_b
            ),
            score: Some(score),
            time: None,
        }
    }

    pub fn note(message: impl Into<String>) -> Self {
        Self {
            kind: ActivityKind::Note,
            ..Self::message(message)
        }
    }

    pub fn at(mut self, time: DateTime<Utc>) -> Self {
        self.time = Some(time);
        self
    }
}
