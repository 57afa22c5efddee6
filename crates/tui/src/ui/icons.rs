//! Icon mapping configuration and icon resolution.
//!
//! The form author configures icons with a JSON object that maps option
//! values to icon names, for example `{"0":"ContactInfo","1":"Send"}`.
//! Turning a name into something drawable is the host's business and goes
//! through [`IconResolver`].

use std::collections::HashMap;

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// Mapping used when the host does not supply a configuration of its own.
pub const DEFAULT_ICON_CONFIGURATION: &str = r#"{"0":"ContactInfo","1":"Send","2":"Phone"}"#;

/// Raised when a configuration string is present but is not valid JSON.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// The message embeds the raw configuration so authors can spot the typo.
    #[error("Invalid configuration: '{raw}'")]
    Parse {
        raw: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Option value to icon name lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IconMapping {
    icons: HashMap<i32, String>,
}

impl IconMapping {
    /// Parse a configuration string.
    ///
    /// `None` and the empty string both mean "no icons". Valid JSON that is not
    /// an object also yields an empty mapping; only unparsable input is an error.
    /// Keys must be canonical decimal integers (`"7"`, not `"07"`) and values
    /// must be strings; anything else is skipped.
    pub fn parse(configuration: Option<&str>) -> Result<Self, ConfigurationError> {
        let Some(raw) = configuration.filter(|raw| !raw.is_empty()) else {
            return Ok(Self::default());
        };

        let parsed: Value = serde_json::from_str(raw).map_err(|source| ConfigurationError::Parse {
            raw: raw.to_string(),
            source,
        })?;

        let Value::Object(entries) = parsed else {
            debug!(configuration = raw, "icon configuration is not a JSON object; no icons mapped");
            return Ok(Self::default());
        };

        let mut icons = HashMap::with_capacity(entries.len());
        for (key, name) in entries {
            let Some(value) = parse_option_key(&key) else {
                debug!(key = %key, "skipping icon mapping entry with a non-integer key");
                continue;
            };
            match name {
                Value::String(name) => {
                    icons.insert(value, name);
                }
                other => debug!(key = %key, value = %other, "skipping icon mapping entry with a non-string icon name"),
            }
        }
        Ok(Self { icons })
    }

    /// Icon name configured for `value`, if any.
    pub fn icon_for(&self, value: i32) -> Option<&str> {
        self.icons.get(&value).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }
}

fn parse_option_key(key: &str) -> Option<i32> {
    let value = key.parse::<i32>().ok()?;
    (value.to_string() == key).then_some(value)
}

/// Something the terminal can draw in place of an icon name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderableIcon {
    pub name: String,
    pub glyph: String,
}

/// Host-supplied capability that turns icon names into drawable glyphs.
///
/// Returning `None` means the name is unknown; the item is drawn without an icon.
pub trait IconResolver {
    fn resolve(&self, name: &str) -> Option<RenderableIcon>;
}

const BUILTIN_GLYPHS: &[(&str, &str)] = &[
    ("ContactInfo", "☺"),
    ("Send", "➤"),
    ("Phone", "☎"),
    ("Mail", "✉"),
    ("Call", "☏"),
    ("Chat", "✎"),
    ("Calendar", "▦"),
    ("Globe", "◍"),
    ("Home", "⌂"),
    ("Star", "★"),
    ("Warning", "⚠"),
    ("CheckMark", "✓"),
    ("Cancel", "✗"),
];

/// Table-driven resolver over single-cell Unicode glyphs.
#[derive(Debug, Clone)]
pub struct GlyphIconResolver {
    glyphs: HashMap<String, String>,
}

impl Default for GlyphIconResolver {
    fn default() -> Self {
        let glyphs = BUILTIN_GLYPHS
            .iter()
            .map(|(name, glyph)| ((*name).to_string(), (*glyph).to_string()))
            .collect();
        Self { glyphs }
    }
}

impl GlyphIconResolver {
    /// A resolver that knows no icons at all.
    pub fn empty() -> Self {
        Self { glyphs: HashMap::new() }
    }

    /// Register or replace the glyph for `name`.
    pub fn with_icon(mut self, name: impl Into<String>, glyph: impl Into<String>) -> Self {
        self.glyphs.insert(name.into(), glyph.into());
        self
    }
}

impl IconResolver for GlyphIconResolver {
    fn resolve(&self, name: &str) -> Option<RenderableIcon> {
        self.glyphs.get(name).map(|glyph| RenderableIcon {
            name: name.to_string(),
            glyph: glyph.clone(),
        })
    }
}
