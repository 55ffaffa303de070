//! Startup configuration.
//!
//! A single JSON file read once in `main`. A missing file means defaults; a
//! file that exists but does not parse, or that binds an unknown action or
//! key name, is a fatal startup error. The core never sees this type; `main`
//! converts it into [`Rules`] and key bindings up front.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use crossterm::event::KeyCode;
use serde::Deserialize;

use crate::core::Rules;
use crate::types::GameAction;

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Base automatic-drop period in milliseconds.
    pub period_ms: u64,
    pub starting_level: u32,
    pub max_level: u32,
    /// Drop-period scale approached at the level cap.
    pub killer_modifier: f64,
    /// Mixer volume in `[0, 1]`.
    pub volume: f32,
    /// Action name -> key name overrides; unlisted actions keep defaults.
    pub keys: HashMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            period_ms: 600,
            starting_level: 1,
            max_level: 10,
            killer_modifier: 0.3,
            volume: 0.7,
            keys: HashMap::new(),
        }
    }
}

impl Config {
    /// Load from `path`, falling back to defaults when the file is absent.
    pub fn load(path: &Path) -> Result<Self> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(err) => {
                return Err(err).with_context(|| format!("reading {}", path.display()));
            }
        };
        let config: Config = serde_json::from_str(&text)
            .with_context(|| format!("parsing {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.period_ms == 0 {
            bail!("period_ms must be positive");
        }
        if self.max_level == 0 || self.starting_level == 0 {
            bail!("levels are counted from 1");
        }
        if !(0.0..1.0).contains(&self.killer_modifier) {
            bail!("killer_modifier must be in [0, 1)");
        }
        Ok(())
    }

    pub fn rules(&self) -> Rules {
        Rules {
            period_ms: self.period_ms,
            starting_level: self.starting_level,
            max_level: self.max_level,
            killer_modifier: self.killer_modifier,
            ..Rules::default()
        }
    }

    /// Resolve the key table: defaults overlaid with the `keys` overrides.
    ///
    /// Errors on an action name no binding table row matches, on an
    /// unparseable key name, and on two actions sharing one key.
    pub fn bindings(&self) -> Result<Vec<(KeyCode, GameAction)>> {
        let mut table: Vec<(KeyCode, GameAction)> = Vec::new();
        for action in GameAction::ALL {
            let name = self
                .keys
                .get(action.as_str())
                .map(String::as_str)
                .unwrap_or_else(|| default_key(action));
            let code = parse_key(name)
                .with_context(|| format!("key {name:?} bound to {:?}", action.as_str()))?;
            if let Some((_, other)) = table.iter().find(|(c, _)| *c == code) {
                bail!(
                    "key {name:?} bound to both {:?} and {:?}",
                    other.as_str(),
                    action.as_str()
                );
            }
            table.push((code, action));
        }
        for name in self.keys.keys() {
            if !GameAction::ALL.iter().any(|a| a.as_str() == name) {
                bail!("unknown action {name:?} in key table");
            }
        }
        Ok(table)
    }

    /// Display name of the key driving `action`, for status overlays.
    pub fn key_label(&self, action: GameAction) -> String {
        self.keys
            .get(action.as_str())
            .cloned()
            .unwrap_or_else(|| default_key(action).to_string())
    }
}

fn default_key(action: GameAction) -> &'static str {
    match action {
        GameAction::MoveLeft => "left",
        GameAction::MoveRight => "right",
        GameAction::SoftDrop => "down",
        GameAction::HardDrop => "space",
        GameAction::RotateCw => "up",
        GameAction::RotateCcw => "z",
        GameAction::Pause => "p",
        GameAction::Reset => "r",
        GameAction::ToggleShadow => "g",
        GameAction::ToggleMusic => "m",
        GameAction::ToggleSound => "n",
        GameAction::ToggleTheme => "t",
        GameAction::Quit => "esc",
    }
}

/// Parse a key name: named keys, or any single character.
fn parse_key(name: &str) -> Result<KeyCode> {
    let code = match name.to_ascii_lowercase().as_str() {
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "space" => KeyCode::Char(' '),
        "enter" => KeyCode::Enter,
        "tab" => KeyCode::Tab,
        "esc" | "escape" => KeyCode::Esc,
        "backspace" => KeyCode::Backspace,
        other => {
            let mut chars = other.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) => KeyCode::Char(ch),
                _ => bail!("unknown key name {name:?}"),
            }
        }
    };
    Ok(code)
}
