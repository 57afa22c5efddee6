//! # Choices Picker
//!
//! An embeddable single-select control for ratatui hosts. The host owns the
//! form and the data binding; the control turns a host context snapshot into a
//! radio group (or, for small form factors, a dropdown) and hands the user's
//! choice back when asked.
//!
//! ## Architecture
//!
//! - [`ControlAdapter`] runs the lifecycle (initialize, refresh, teardown),
//!   buffers the pending output and signals the host when it changes.
//! - [`ChoicesPicker`] decides what to show: the mask indicator, a
//!   configuration error, or the choice group with optional icons.
//! - [`MountPoint`] is the container shared with the host's draw loop; it also
//!   carries the host's [`IconResolver`].
//!
//! ## Example
//!
//! ```no_run
//! use choices_picker_tui::{ControlAdapter, MountPoint};
//! use choices_picker_types::{HostContext, OptionMetadata};
//!
//! let container = MountPoint::default();
//! let mut control = ControlAdapter::new();
//! let context = HostContext {
//!     label: Some("Preferred contact".into()),
//!     options: Some(vec![OptionMetadata::new(0, "Email"), OptionMetadata::new(1, "Phone")]),
//!     ..HostContext::default()
//! };
//! control.initialize(&context, || {}, container.clone()).unwrap();
//! control.refresh(&context).unwrap();
//! // terminal.draw(|frame| container.draw(frame, frame.area()))?;
//! ```

mod control;
mod mount;
pub mod ui;

pub use control::{ControlAdapter, LifecycleError, LifecycleState, MissingMetadata, NotifyOutputChanged, RefreshOutcome};
pub use mount::MountPoint;
pub use ui::components::choices_picker::{
    ChoiceGroupState, ChoicesPicker, ChoicesPickerProps, ChoicesView, DerivedChoice, MASK_INDICATOR, RenderKind, RenderState,
};
pub use ui::icons::{
    ConfigurationError, DEFAULT_ICON_CONFIGURATION, GlyphIconResolver, IconMapping, IconResolver, RenderableIcon,
};
