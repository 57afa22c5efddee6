use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A single selectable choice supplied by the host.
///
/// Field names follow the host's option metadata (`Value` / `Label`) so
/// fixtures captured from a live host deserialize without remapping.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OptionMetadata {
    /// Numeric value stored in the bound column.
    #[serde(rename = "Value")]
    pub value: i32,
    /// Display label in the user's language.
    #[serde(rename = "Label")]
    pub label: String,
}

impl OptionMetadata {
    pub fn new(value: i32, label: impl Into<String>) -> Self {
        Self {
            value,
            label: label.into(),
        }
    }
}

/// Field-level security for the current user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityFlags {
    /// The user may change the value.
    pub editable: bool,
    /// The user may see the value.
    pub readable: bool,
}

/// Coarse responsive-layout hint.
///
/// `Large` renders a radio group, `Small` a dropdown. Selection semantics are
/// identical in both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormFactor {
    Small,
    #[default]
    Large,
}

impl fmt::Display for FormFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormFactor::Small => write!(f, "small"),
            FormFactor::Large => write!(f, "large"),
        }
    }
}

/// Error returned when a form factor string is neither `small` nor `large`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFormFactorError(String);

impl fmt::Display for ParseFormFactorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown form factor '{}', expected 'small' or 'large'", self.0)
    }
}

impl std::error::Error for ParseFormFactorError {}

impl FromStr for FormFactor {
    type Err = ParseFormFactorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "small" => Ok(FormFactor::Small),
            "large" => Ok(FormFactor::Large),
            other => Err(ParseFormFactorError(other.to_string())),
        }
    }
}

/// Snapshot of the host environment passed on every refresh.
///
/// Every field the host may not have resolved yet is optional; the control
/// treats a missing label or option set as "not ready" rather than an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostContext {
    /// Display name of the bound field.
    #[serde(default)]
    pub label: Option<String>,
    /// Raw bound value; `None` when the record is new or the field is unset.
    #[serde(default)]
    pub value: Option<i32>,
    /// Enumerated valid choices for the field.
    #[serde(default)]
    pub options: Option<Vec<OptionMetadata>>,
    /// Field security, absent when the field is not secured.
    #[serde(default)]
    pub security: Option<SecurityFlags>,
    /// Whether the whole form or control is read-only.
    #[serde(default)]
    pub control_disabled: bool,
    #[serde(default)]
    pub form_factor: FormFactor,
    /// Icon mapping configuration entered by the form author.
    #[serde(default)]
    pub configuration: Option<String>,
}

impl HostContext {
    /// `true` when the control must not accept input.
    pub fn is_disabled(&self) -> bool {
        match self.security {
            Some(security) => self.control_disabled || !security.editable,
            None => self.control_disabled,
        }
    }

    /// `true` when the value must be hidden from the current user.
    pub fn is_masked(&self) -> bool {
        self.security.is_some_and(|security| !security.readable)
    }
}

/// Values handed back to the host when it pulls output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outputs {
    pub value: Option<i32>,
}

/// Side effects reported by the control's input handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// The user picked an option (`Some`) or cleared the selection (`None`).
    SelectionChanged(Option<i32>),
    /// Only transient widget state changed (cursor, dropdown open); redraw.
    Redraw,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_context_deserializes_host_field_names() {
        let json = r#"{
            "label": "Preferred contact",
            "value": 1,
            "options": [{"Value": 0, "Label": "Email"}, {"Value": 1, "Label": "Phone"}],
            "security": {"editable": true, "readable": true},
            "controlDisabled": false,
            "formFactor": "small"
        }"#;

        let context: HostContext = serde_json::from_str(json).expect("deserialize HostContext");
        assert_eq!(context.label.as_deref(), Some("Preferred contact"));
        assert_eq!(context.value, Some(1));
        assert_eq!(
            context.options,
            Some(vec![OptionMetadata::new(0, "Email"), OptionMetadata::new(1, "Phone")])
        );
        assert_eq!(context.form_factor, FormFactor::Small);
        assert!(context.configuration.is_none());
    }

    #[test]
    fn host_context_defaults_when_fields_missing() {
        let context: HostContext = serde_json::from_str("{}").expect("deserialize empty context");
        assert!(context.label.is_none());
        assert!(context.options.is_none());
        assert_eq!(context.form_factor, FormFactor::Large);
        assert!(!context.is_disabled());
        assert!(!context.is_masked());
    }

    #[test]
    fn security_drives_disabled_and_masked() {
        let mut context = HostContext {
            security: Some(SecurityFlags {
                editable: false,
                readable: false,
            }),
            ..HostContext::default()
        };
        assert!(context.is_disabled());
        assert!(context.is_masked());

        context.security = Some(SecurityFlags {
            editable: true,
            readable: true,
        });
        assert!(!context.is_disabled());
        assert!(!context.is_masked());

        context.control_disabled = true;
        assert!(context.is_disabled());
    }

    #[test]
    fn form_factor_parses_case_insensitively() {
        assert_eq!("Small".parse::<FormFactor>(), Ok(FormFactor::Small));
        assert_eq!(" large ".parse::<FormFactor>(), Ok(FormFactor::Large));
        assert!("medium".parse::<FormFactor>().is_err());
    }

    #[test]
    fn outputs_serialize_missing_value_as_null() {
        let json = serde_json::to_string(&Outputs::default()).expect("serialize Outputs");
        assert_eq!(json, r#"{"value":null}"#);
    }
}
