//! Choices picker: option derivation, render decision and the interactive
//! radio group / dropdown.

mod choices_picker_component;
mod derive;
mod picker;
mod state;
mod view;

pub use choices_picker_component::ChoicesPickerComponent;
pub use derive::{DerivationCache, Derivation, DerivedChoice, derive_choices};
pub use picker::{ChoicesPicker, ChoicesPickerProps};
pub use state::ChoiceGroupState;
pub use view::{ChoicesView, MASK_INDICATOR, RenderKind, RenderState};
