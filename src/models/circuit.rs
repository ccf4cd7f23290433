//! Circuit: a group of tournaments sharing one leaderboard.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Circuit {
    pub slug: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Member tournament slugs, in circuit order.
    #[serde(default)]
    pub tournaments: Vec<String>,
    #[serde(default)]
    pub final_tournament_slug: Option<String>,
    /// Account ids allowed to manage the circuit besides the creator.
    #[serde(default)]
    pub admins: Vec<String>,
    #[serde(default)]
    pub created_by: Option<String>,
    /// Manual point totals that replace the aggregated value, by leaderboard key.
    #[serde(default)]
    pub points_overrides: BTreeMap<String, f64>,
    pub created_at: DateTime<Utc>,
}

impl Circuit {
    pub fn new(slug: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            name: name.into(),
            description: String::new(),
            tournaments: Vec::new(),
            final_tournament_slug: None,
            admins: Vec::new(),
            created_by: None,
            points_overrides: BTreeMap::new(),
            created_at: Utc::now(),
        }
    }

    /// Trimmed, deduplicated member slugs; the final is appended when it is
    /// not already listed.
    pub fn tournament_slugs(&self) -> Vec<String> {
        let mut slugs: Vec<String> = Vec::with_capacity(self.tournaments.len() + 1);
        let finals = self.final_tournament_slug.iter();
        for slug in self.tournaments.iter().chain(finals) {
            let slug = slug.trim();
            if !slug.is_empty() && !slugs.iter().any(|s| s == slug) {
                slugs.push(slug.to_string());
            }
        }
        slugs
    }

    /// Add a member tournament, ignoring duplicates.
    pub fn add_tournament(&mut self, slug: &str) {
        let slug = slug.trim();
        if !slug.is_empty() && !self.tournaments.iter().any(|s| s == slug) {
            self.tournaments.push(slug.to_string());
        }
    }

    pub fn is_admin(&self, uid: Option<&str>) -> bool {
        match uid {
            Some(uid) if !uid.is_empty() => {
                self.created_by.as_deref() == Some(uid) || self.admins.iter().any(|a| a == uid)
            }
            _ => false,
        }
    }
}
