//! Host context fixtures.
//!
//! A fixture is the JSON form of [`HostContext`], e.g.
//!
//! ```json
//! {
//!   "label": "Preferred contact",
//!   "value": 1,
//!   "options": [{"Value": 0, "Label": "Email"}, {"Value": 1, "Label": "Phone"}],
//!   "security": {"editable": true, "readable": true},
//!   "formFactor": "large",
//!   "configuration": "{\"0\":\"Mail\",\"1\":\"Call\"}"
//! }
//! ```

use std::fs;
use std::path::Path;

use choices_picker_types::{HostContext, OptionMetadata};
use thiserror::Error;

/// Error surfaced when a fixture cannot be read.
#[derive(Debug, Error)]
pub enum ContextFileError {
    #[error("host context I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("host context is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn load(path: &Path) -> Result<HostContext, ContextFileError> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Context used when no fixture is given. Values line up with the built-in
/// icon mapping.
pub fn demo_context() -> HostContext {
    HostContext {
        label: Some("Preferred contact method".to_string()),
        value: None,
        options: Some(vec![
            OptionMetadata::new(0, "Contact card"),
            OptionMetadata::new(1, "Message"),
            OptionMetadata::new(2, "Phone call"),
        ]),
        ..HostContext::default()
    }
}
