//! Demo configuration: hardcoded defaults with environment overrides.

use std::path::PathBuf;

/// Runtime configuration for the demo run.
#[derive(Debug, Clone, PartialEq)]
pub struct DemoConfig {
    pub background: PathBuf,
    pub sprite: PathBuf,
    /// Explicit font file; system fonts are searched when unset.
    pub font: Option<PathBuf>,
    pub sprite_size: (u32, u32),
    pub position: (i64, i64),
    pub text: String,
    /// Save the result here instead of opening a window.
    pub output: Option<PathBuf>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            background: "board.png".into(),
            sprite: "sprite.png".into(),
            font: None,
            sprite_size: (100, 100),
            position: (50, 50),
            text: "Demo".into(),
            output: None,
        }
    }
}

impl DemoConfig {
    /// Load configuration from the process environment.
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from a key lookup, keeping defaults for
    /// unset or invalid values.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        let valid = |key: &str| -> Option<String> {
            let value = get(key)?;
            match validate_setting(key, &value) {
                Ok(()) => Some(value),
                Err(msg) => {
                    tracing::warn!("Ignoring {key}={value:?}: {msg}");
                    None
                }
            }
        };

        if let Some(v) = valid("SPRITE_DEMO_BACKGROUND") {
            config.background = v.into();
        }
        if let Some(v) = valid("SPRITE_DEMO_SPRITE") {
            config.sprite = v.into();
        }
        if let Some(v) = valid("SPRITE_DEMO_FONT") {
            config.font = Some(v.into());
        }
        if let Some(size) = valid("SPRITE_DEMO_SPRITE_SIZE").and_then(|v| parse_size(&v)) {
            config.sprite_size = size;
        }
        if let Some(pos) = valid("SPRITE_DEMO_POSITION").and_then(|v| parse_position(&v)) {
            config.position = pos;
        }
        if let Some(v) = get("SPRITE_DEMO_TEXT") {
            config.text = v;
        }
        if let Some(v) = valid("SPRITE_DEMO_OUTPUT") {
            config.output = Some(v.into());
        }

        config
    }
}

/// Validate a setting value. Returns `Ok(())` if valid, or an error message.
pub fn validate_setting(key: &str, value: &str) -> Result<(), String> {
    match key {
        "SPRITE_DEMO_BACKGROUND" | "SPRITE_DEMO_SPRITE" | "SPRITE_DEMO_FONT"
        | "SPRITE_DEMO_OUTPUT" => {
            if value.trim().is_empty() {
                return Err("path must not be empty".into());
            }
        }
        "SPRITE_DEMO_SPRITE_SIZE" => {
            if parse_size(value).is_none() {
                return Err("expected WIDTHxHEIGHT, e.g. 100x100".into());
            }
        }
        "SPRITE_DEMO_POSITION" => {
            if parse_position(value).is_none() {
                return Err("expected X,Y, e.g. 50,50".into());
            }
        }
        _ => {}
    }
    Ok(())
}

/// Parse `WxH`.
pub fn parse_size(value: &str) -> Option<(u32, u32)> {
    let (w, h) = value.trim().split_once(['x', 'X'])?;
    Some((w.trim().parse().ok()?, h.trim().parse().ok()?))
}

/// Parse `X,Y`.
pub fn parse_position(value: &str) -> Option<(i64, i64)> {
    let (x, y) = value.trim().split_once(',')?;
    Some((x.trim().parse().ok()?, y.trim().parse().ok()?))
}
