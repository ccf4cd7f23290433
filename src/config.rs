//! Server configuration from the environment.
//!
//! `HOST`, `PORT`, `STATIC_DIR`, `SESSION_KEY` and `LADDER_MAPS` are read;
//! anything missing or unparsable falls back to its default.

use crate::logic::DEFAULT_LADDER_MAPS;

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub static_dir: String,
    /// Cookie signing secret; at least 64 bytes to be usable.
    pub session_key: Option<String>,
    pub ladder_maps: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            static_dir: "static".to_string(),
            session_key: None,
            ladder_maps: DEFAULT_LADDER_MAPS.iter().map(|m| m.to_string()).collect(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Config::default();
        if let Some(host) = lookup("HOST").filter(|h| !h.trim().is_empty()) {
            config.host = host.trim().to_string();
        }
        if let Some(port) = lookup("PORT") {
            match port.trim().parse() {
                Ok(port) => config.port = port,
                Err(_) => log::warn!("Ignoring invalid PORT {:?}", port),
            }
        }
        if let Some(dir) = lookup("STATIC_DIR").filter(|d| !d.trim().is_empty()) {
            config.static_dir = dir.trim().to_string();
        }
        if let Some(key) = lookup("SESSION_KEY") {
            if key.len() >= 64 {
                config.session_key = Some(key);
            } else {
                log::warn!("SESSION_KEY is shorter than 64 bytes; ignoring it");
            }
        }
        if let Some(maps) = lookup("LADDER_MAPS") {
            let maps: Vec<String> = maps
                .split(',')
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map(str::to_string)
                .collect();
            if maps.is_empty() {
                log::warn!("LADDER_MAPS is empty; using the built-in ladder");
            } else {
                config.ladder_maps = maps;
            }
        }
        config
    }

    pub fn bind(&self) -> (&str, u16) {
        (self.host.as_str(), self.port)
    }
}
