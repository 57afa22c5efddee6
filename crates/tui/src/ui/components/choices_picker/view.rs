use std::rc::Rc;

use choices_picker_types::FormFactor;

use super::derive::DerivedChoice;

/// Placeholder drawn instead of any content when the value is masked.
pub const MASK_INDICATOR: &str = "****";

/// What a refresh decided to show. Exactly one of these applies per render.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderState {
    /// The icon configuration could not be parsed; only the message is shown.
    ConfigError(String),
    /// The current user may not read the value.
    Masked,
    Normal {
        choices: Rc<[DerivedChoice]>,
        /// Key of the selected choice; `None` when the bound value is null.
        selected_key: Option<String>,
    },
}

/// Discriminant of [`RenderState`], handy for reporting outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderKind {
    ConfigError,
    Masked,
    Normal,
}

impl RenderState {
    pub fn kind(&self) -> RenderKind {
        match self {
            RenderState::ConfigError(_) => RenderKind::ConfigError,
            RenderState::Masked => RenderKind::Masked,
            RenderState::Normal { .. } => RenderKind::Normal,
        }
    }
}

/// The visual tree produced by one render of the picker.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoicesView {
    pub label: String,
    pub disabled: bool,
    pub form_factor: FormFactor,
    pub state: RenderState,
}

impl ChoicesView {
    /// Choices on display; empty for masked and error views.
    pub fn choices(&self) -> &[DerivedChoice] {
        match &self.state {
            RenderState::Normal { choices, .. } => &choices[..],
            _ => &[],
        }
    }

    pub fn selected_key(&self) -> Option<&str> {
        match &self.state {
            RenderState::Normal { selected_key, .. } => selected_key.as_deref(),
            _ => None,
        }
    }

    /// Position of the selected choice, if it is one of the choices on display.
    pub fn selected_index(&self) -> Option<usize> {
        let key = self.selected_key()?;
        self.choices().iter().position(|choice| choice.key == key)
    }

    /// Whether user input can change the selection.
    pub fn accepts_input(&self) -> bool {
        !self.disabled && matches!(self.state, RenderState::Normal { .. })
    }
}
