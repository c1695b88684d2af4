use hamcycle_core::{CycleConfig, DEFAULT_MAX_BLOCK_SIZE};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Persisted defaults for the grid the CLI builds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub rows: usize,
    pub cols: usize,
    pub max_block_size: usize,
    pub shuffle: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rows: 24,
            cols: 32,
            max_block_size: DEFAULT_MAX_BLOCK_SIZE,
            shuffle: true,
        }
    }
}

impl Settings {
    /// Get the settings file path
    pub fn path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("hamcycle")
            .join("settings.json")
    }

    /// Settings file, then environment overrides
    pub fn load() -> Self {
        let mut settings = Self::load_from(&Self::path());
        settings.apply_env(std::env::vars());
        settings
    }

    /// Read settings from `path`, falling back to defaults if it is missing or unreadable
    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(json) => serde_json::from_str(&json).unwrap_or_else(|err| {
                warn!(path = %path.display(), %err, "ignoring malformed settings file");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub fn save(&self) -> io::Result<PathBuf> {
        let path = Self::path();
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> io::Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
    }

    /// Apply `HEIGHT`, `WIDTH`, `HAMCYCLE_SUBSECTION_SIZE` and `HAMCYCLE_SHUFFLE`
    pub fn apply_env<I>(&mut self, vars: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            let applied = match key.as_str() {
                "HEIGHT" => parse_into(&value, &mut self.rows),
                "WIDTH" => parse_into(&value, &mut self.cols),
                "HAMCYCLE_SUBSECTION_SIZE" => parse_into(&value, &mut self.max_block_size),
                "HAMCYCLE_SHUFFLE" => match parse_flag(&value) {
                    Some(flag) => {
                        self.shuffle = flag;
                        true
                    }
                    None => false,
                },
                _ => continue,
            };
            if applied {
                debug!(%key, %value, "setting overridden from environment");
            } else {
                warn!(%key, %value, "ignoring unparsable environment override");
            }
        }
    }

    pub fn to_config(&self) -> CycleConfig {
        CycleConfig::new(self.rows, self.cols)
            .max_block_size(self.max_block_size)
            .shuffle(self.shuffle)
    }
}

fn parse_into(value: &str, slot: &mut usize) -> bool {
    match value.trim().parse() {
        Ok(parsed) => {
            *slot = parsed;
            true
        }
        Err(_) => false,
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
