//! Display model for the match activity log.
//!
//! Rows are plain data with styling flags; [`ActivityRow::to_html`] is one
//! possible rendering of them.

use crate::logic::score_parser::{parse, ParsedScore};
use crate::models::{ActivityEntry, ActivityKind, ScoreValue, Side};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// How a score cell is emphasised.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreStyle {
    Winner,
    Loser,
    Neutral,
}

/// One competitor's half of a score line.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreCell {
    pub name: String,
    /// `"2"`, or `"w/o"` for a walkover.
    pub display: String,
    pub style: ScoreStyle,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActivityRow {
    Score {
        a: ScoreCell,
        b: ScoreCell,
        time: Option<DateTime<Utc>>,
    },
    /// Unparsable entry, shown as its raw message.
    Message {
        message: String,
        time: Option<DateTime<Utc>>,
    },
}

impl ActivityRow {
    fn from_parsed(parsed: ParsedScore, time: Option<DateTime<Utc>>) -> Self {
        let style = |side: Side| match parsed.winner {
            None => ScoreStyle::Neutral,
            Some(w) if w == side => ScoreStyle::Winner,
            Some(_) => ScoreStyle::Loser,
        };
        ActivityRow::Score {
            a: ScoreCell {
                name: display_name(&parsed.name_a),
                display: display_value(parsed.score_a),
                style: style(Side::A),
            },
            b: ScoreCell {
                name: display_name(&parsed.name_b),
                display: display_value(parsed.score_b),
                style: style(Side::B),
            },
            time,
        }
    }

    /// Escaped HTML list item.
    pub fn to_html(&self) -> String {
        match self {
            ActivityRow::Score { a, b, time } => format!(
                "<li><span class=\"activity-scoreline\">{} {}<span class=\"activity-score-sep\">-</span>{} {}</span>{}</li>",
                name_html(a),
                score_html(a),
                score_html(b),
                name_html(b),
                time_html(time),
            ),
            ActivityRow::Message { message, time } => format!(
                "<li><strong>{}</strong>{}</li>",
                escape_html(message),
                time_html(time)
            ),
        }
    }
}

fn display_name(name: &str) -> String {
    if name.trim().is_empty() {
        "TBD".to_string()
    } else {
        name.trim().to_string()
    }
}

fn display_value(value: ScoreValue) -> String {
    value.to_string()
}

fn name_html(cell: &ScoreCell) -> String {
    let class = if cell.style == ScoreStyle::Winner {
        "activity-winner-name"
    } else {
        ""
    };
    format!("<span class=\"{}\">{}</span>", class, escape_html(&cell.name))
}

fn score_html(cell: &ScoreCell) -> String {
    let class = match cell.style {
        ScoreStyle::Winner => "activity-score-winner",
        ScoreStyle::Loser => "activity-score-loser",
        ScoreStyle::Neutral => "",
    };
    format!("<span class=\"{}\">{}</span>", class, escape_html(&cell.display))
}

fn time_html(time: &Option<DateTime<Utc>>) -> String {
    time.map(|t| format!("<span>{}</span>", t.format("%H:%M")))
        .unwrap_or_default()
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Turn the log into display rows, oldest first.
///
/// Only score entries are shown. Entries that do not parse fall back to their
/// trimmed message; blank messages are dropped. Entries are never modified.
pub fn activity_rows(entries: &[ActivityEntry]) -> Vec<ActivityRow> {
    entries
        .iter()
        .filter(|e| e.kind == ActivityKind::Score)
        .filter_map(|e| match parse(e) {
            Some(parsed) => Some(ActivityRow::from_parsed(parsed, e.time)),
            None => {
                let message = e.message.trim();
                (!message.is_empty()).then(|| ActivityRow::Message {
                    message: message.to_string(),
                    time: e.time,
                })
            }
        })
        .collect()
}

/// Whole list as HTML, with a placeholder when there is nothing to show.
pub fn render_activity_html(entries: &[ActivityEntry]) -> String {
    let rows = activity_rows(entries);
    if rows.is_empty() {
        return "<li class=\"placeholder-tag\">No updates yet.</li>".to_string();
    }
    rows.iter().map(ActivityRow::to_html).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_html("<b>\"A&B\"</b>"), "&lt;b&gt;&quot;A&amp;B&quot;&lt;/b&gt;");
    }
}
