//! Session-scoped map pool selection.
//!
//! A selector owns its own state; the web layer keeps one per cookie session
//! and rebuilds it from the stored names on each request.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Built-in 1v1 ladder pool, used when no other list is configured.
pub const DEFAULT_LADDER_MAPS: [&str; 9] = [
    "10,000 Feet",
    "Celestial Enclave",
    "Mothership",
    "Old Republic",
    "Ruby Rock",
    "Taito Citadel",
    "Tourmaline",
    "White Rabbit",
    "Winter Madness",
];

/// `Ladder` when the selection is exactly the default list.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolMode {
    #[default]
    Ladder,
    Custom,
}

impl fmt::Display for PoolMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoolMode::Ladder => f.write_str("ladder"),
            PoolMode::Custom => f.write_str("custom"),
        }
    }
}

/// Views that redraw after every selection change, in declaration order.
pub trait MapPoolRenderer {
    fn render_map_pool_picker(&mut self, selection: &BTreeSet<String>);
    fn render_chosen_maps(&mut self, selection: &BTreeSet<String>);
    fn update_map_buttons(&mut self, mode: PoolMode);
}

pub struct MapPoolSelector {
    defaults: Vec<String>,
    selection: BTreeSet<String>,
    mode: PoolMode,
    renderer: Option<Box<dyn MapPoolRenderer>>,
}

impl fmt::Debug for MapPoolSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapPoolSelector")
            .field("defaults", &self.defaults)
            .field("selection", &self.selection)
            .field("mode", &self.mode)
            .finish()
    }
}

impl MapPoolSelector {
    /// Start from the ladder defaults. Blank and repeated names are dropped.
    pub fn new<I, S>(defaults: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut unique: Vec<String> = Vec::new();
        for name in defaults {
            let name = name.as_ref().trim();
            if !name.is_empty() && !unique.iter().any(|d| same_map(d, name)) {
                unique.push(name.to_string());
            }
        }
        let selection = unique.iter().cloned().collect();
        Self {
            defaults: unique,
            selection,
            mode: PoolMode::Ladder,
            renderer: None,
        }
    }

    /// Selector over [`DEFAULT_LADDER_MAPS`].
    pub fn ladder() -> Self {
        Self::new(DEFAULT_LADDER_MAPS)
    }

    pub fn with_renderer(mut self, renderer: Box<dyn MapPoolRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Replace the whole selection.
    pub fn set_selection<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut selection = BTreeSet::new();
        for name in names {
            let Some(name) = self.canonical(name.as_ref()) else {
                continue;
            };
            if !selection.iter().any(|s: &String| same_map(s, &name)) {
                selection.insert(name);
            }
        }
        self.selection = selection;
        self.changed();
    }

    /// Flip one map in or out of the selection. Blank names do nothing.
    pub fn toggle(&mut self, name: &str) {
        let Some(name) = self.canonical(name) else {
            return;
        };
        let existing = self.selection.iter().find(|s| same_map(s, &name)).cloned();
        match existing {
            Some(current) => {
                self.selection.remove(&current);
            }
            None => {
                self.selection.insert(name);
            }
        }
        self.changed();
    }

    /// Back to the default ladder list.
    pub fn reset(&mut self) {
        self.selection = self.defaults.iter().cloned().collect();
        self.changed();
    }

    pub fn clear(&mut self) {
        self.selection.clear();
        self.changed();
    }

    pub fn mode(&self) -> PoolMode {
        self.mode
    }

    pub fn selection(&self) -> &BTreeSet<String> {
        &self.selection
    }

    pub fn defaults(&self) -> &[String] {
        &self.defaults
    }

    /// Order-independent comparison with the default list.
    pub fn is_default_ladder_selection(&self) -> bool {
        self.selection.len() == self.defaults.len()
            && self
                .defaults
                .iter()
                .all(|d| self.selection.iter().any(|s| same_map(s, d)))
    }

    /// Trimmed name in the default list's spelling when it is one of them.
    fn canonical(&self, raw: &str) -> Option<String> {
        let name = raw.trim();
        if name.is_empty() {
            return None;
        }
        let known = self.defaults.iter().find(|d| same_map(d, name));
        Some(known.map_or_else(|| name.to_string(), Clone::clone))
    }

    fn changed(&mut self) {
        self.mode = if self.is_default_ladder_selection() {
            PoolMode::Ladder
        } else {
            PoolMode::Custom
        };
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.render_map_pool_picker(&self.selection);
            renderer.render_chosen_maps(&self.selection);
            renderer.update_map_buttons(self.mode);
        }
    }
}

fn same_map(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

/// Maps a tournament is played on: its own pool, or the ladder when empty.
pub fn resolve_pool(tournament_pool: &[String], defaults: &[String]) -> Vec<String> {
    let own: Vec<String> = tournament_pool
        .iter()
        .map(|m| m.trim())
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .collect();
    if own.is_empty() {
        defaults.to_vec()
    } else {
        own
    }
}
