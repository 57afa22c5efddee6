//! Control adapter: the host-facing lifecycle of the choices control.
//!
//! The host drives the adapter through a fixed protocol:
//!
//! 1. `initialize` once, handing over the notify callback and the mount point
//! 2. `refresh` whenever its context changes
//! 3. `collect_output` after being notified (or whenever it likes)
//! 4. `teardown` once, after which the adapter refuses every call except
//!    `collect_output`, which keeps returning the last selection
//!
//! Calls made out of order are rejected with [`LifecycleError`] and leave the
//! adapter untouched, so a confused host can always recover.

use std::fmt;

use choices_picker_types::{Effect, HostContext, Outputs};
use crossterm::event::{KeyEvent, MouseEvent};
use thiserror::Error;
use tracing::{debug, warn};

use crate::mount::MountPoint;
use crate::ui::components::choices_picker::{ChoicesPicker, ChoicesPickerProps, RenderKind};
use crate::ui::icons::DEFAULT_ICON_CONFIGURATION;

/// Zero-argument signal telling the host that output changed.
///
/// It runs while the adapter is mutably borrowed, so it must not call back
/// into the adapter; record the signal and pull output afterwards.
pub type NotifyOutputChanged = Box<dyn FnMut()>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Uninitialized,
    Ready,
    Destroyed,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleState::Uninitialized => write!(f, "uninitialized"),
            LifecycleState::Ready => write!(f, "ready"),
            LifecycleState::Destroyed => write!(f, "destroyed"),
        }
    }
}

/// A lifecycle call arrived in a state that does not allow it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error("cannot {operation} while the control is {state}")]
    InvalidState {
        operation: &'static str,
        state: LifecycleState,
    },
}

/// Metadata the host has not supplied yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingMetadata {
    Label,
    Options,
}

impl fmt::Display for MissingMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingMetadata::Label => write!(f, "label"),
            MissingMetadata::Options => write!(f, "options"),
        }
    }
}

/// What a successful `refresh` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// A new view was mounted.
    Rendered(RenderKind),
    /// The host is not ready yet; the previous view (if any) stays mounted.
    Skipped(MissingMetadata),
}

struct Session {
    notify: NotifyOutputChanged,
    container: MountPoint,
    picker: ChoicesPicker,
    pending_output: Option<i32>,
}

impl Session {
    fn select(&mut self, value: Option<i32>) {
        debug!(?value, "user selection buffered");
        self.pending_output = value;
        (self.notify)();
    }

    fn apply(&mut self, effects: &[Effect]) {
        for effect in effects {
            if let Effect::SelectionChanged(value) = effect {
                self.select(*value);
            }
        }
    }
}

enum Lifecycle {
    Uninitialized,
    Ready(Box<Session>),
    Destroyed { pending_output: Option<i32> },
}

impl Lifecycle {
    fn state(&self) -> LifecycleState {
        match self {
            Lifecycle::Uninitialized => LifecycleState::Uninitialized,
            Lifecycle::Ready(_) => LifecycleState::Ready,
            Lifecycle::Destroyed { .. } => LifecycleState::Destroyed,
        }
    }

    fn session(&self, operation: &'static str) -> Result<&Session, LifecycleError> {
        match self {
            Lifecycle::Ready(session) => Ok(&**session),
            other => Err(reject(operation, other.state())),
        }
    }

    fn session_mut(&mut self, operation: &'static str) -> Result<&mut Session, LifecycleError> {
        match self {
            Lifecycle::Ready(session) => Ok(&mut **session),
            other => Err(reject(operation, other.state())),
        }
    }
}

fn reject(operation: &'static str, state: LifecycleState) -> LifecycleError {
    warn!(operation, %state, "lifecycle call rejected");
    LifecycleError::InvalidState { operation, state }
}

/// Bridges host lifecycle calls to the choices picker and buffers the user's
/// latest choice until the host collects it.
pub struct ControlAdapter {
    lifecycle: Lifecycle,
    default_configuration: Option<String>,
}

impl Default for ControlAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ControlAdapter {
    /// An uninitialized adapter that falls back to [`DEFAULT_ICON_CONFIGURATION`]
    /// when the host supplies no icon configuration.
    pub fn new() -> Self {
        Self::with_default_configuration(Some(DEFAULT_ICON_CONFIGURATION))
    }

    /// An uninitialized adapter with a custom fallback configuration; `None`
    /// means no icons unless the host configures them.
    pub fn with_default_configuration(configuration: Option<impl Into<String>>) -> Self {
        Self {
            lifecycle: Lifecycle::Uninitialized,
            default_configuration: configuration.map(Into::into),
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.lifecycle.state()
    }

    /// Store the notify callback and mount target. Does not render.
    pub fn initialize(
        &mut self,
        context: &HostContext,
        notify: impl FnMut() + 'static,
        container: MountPoint,
    ) -> Result<(), LifecycleError> {
        if !matches!(self.lifecycle, Lifecycle::Uninitialized) {
            return Err(reject("initialize", self.lifecycle.state()));
        }
        debug!(label = ?context.label, form_factor = %context.form_factor, "control initialized");
        self.lifecycle = Lifecycle::Ready(Box::new(Session {
            notify: Box::new(notify),
            container,
            picker: ChoicesPicker::new(),
            pending_output: None,
        }));
        Ok(())
    }

    /// Re-render from a fresh host context.
    ///
    /// Missing label or options skip the cycle; configuration problems show up
    /// in the rendered view, never as an error here.
    pub fn refresh(&mut self, context: &HostContext) -> Result<RefreshOutcome, LifecycleError> {
        let session = self.lifecycle.session_mut("refresh")?;

        let Some(label) = context.label.as_deref() else {
            debug!("refresh skipped: label not available");
            return Ok(RefreshOutcome::Skipped(MissingMetadata::Label));
        };
        let Some(options) = context.options.as_deref() else {
            debug!("refresh skipped: options not available");
            return Ok(RefreshOutcome::Skipped(MissingMetadata::Options));
        };

        let props = ChoicesPickerProps {
            label,
            value: context.value,
            options,
            configuration: context
                .configuration
                .as_deref()
                .or(self.default_configuration.as_deref()),
            disabled: context.is_disabled(),
            masked: context.is_masked(),
            form_factor: context.form_factor,
        };
        debug!(
            value = ?props.value,
            option_count = options.len(),
            disabled = props.disabled,
            masked = props.masked,
            form_factor = %props.form_factor,
            "refreshing control"
        );

        let view = session.picker.render(&props);
        let kind = view.state.kind();
        session.container.mount(view);
        Ok(RefreshOutcome::Rendered(kind))
    }

    /// Record the user's choice and notify the host exactly once.
    pub fn on_user_selection(&mut self, value: Option<i32>) -> Result<(), LifecycleError> {
        self.lifecycle.session_mut("record a selection")?.select(value);
        Ok(())
    }

    /// The latest selection. Reading does not clear it, and it stays readable
    /// after `teardown`.
    pub fn collect_output(&self) -> Result<Outputs, LifecycleError> {
        let value = match &self.lifecycle {
            Lifecycle::Ready(session) => session.pending_output,
            Lifecycle::Destroyed { pending_output } => *pending_output,
            Lifecycle::Uninitialized => return Err(reject("collect output", LifecycleState::Uninitialized)),
        };
        Ok(Outputs { value })
    }

    /// Unmount and enter the terminal state.
    pub fn teardown(&mut self) -> Result<(), LifecycleError> {
        let session = self.lifecycle.session("tear down")?;
        session.container.unmount();
        let pending_output = session.pending_output;
        self.lifecycle = Lifecycle::Destroyed { pending_output };
        debug!("control torn down");
        Ok(())
    }

    /// Route a key press to the mounted view. Selections are buffered and
    /// notified before the effects are returned.
    pub fn handle_key_events(&mut self, key: KeyEvent) -> Vec<Effect> {
        let Ok(session) = self.lifecycle.session_mut("handle key events") else {
            return Vec::new();
        };
        let effects = session.container.dispatch_key(key);
        session.apply(&effects);
        effects
    }

    /// Route a mouse event to the mounted view.
    pub fn handle_mouse_events(&mut self, mouse: MouseEvent) -> Vec<Effect> {
        let Ok(session) = self.lifecycle.session_mut("handle mouse events") else {
            return Vec::new();
        };
        let effects = session.container.dispatch_mouse(mouse);
        session.apply(&effects);
        effects
    }
}
