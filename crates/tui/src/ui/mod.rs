//! Presentation layer: the choice group component and icon handling.

pub mod components;
pub mod icons;
