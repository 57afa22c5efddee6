//! UI components: the choices picker and the component trait it implements.

pub mod choices_picker;
pub mod component;

pub use choices_picker::ChoicesPickerComponent;
pub use component::*;
