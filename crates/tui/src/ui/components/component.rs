//! Component abstraction for mounted controls.
//!
//! A component owns its local behavior and draws itself into a `Rect`. It does
//! not reach back into the host: anything the host must act on is reported as
//! an [`Effect`].

use choices_picker_types::Effect;
use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::Frame;
use ratatui::layout::Rect;

/// A UI component with transient widget state kept outside of it.
///
/// # Component Lifecycle
///
/// 1. **Mounting**: the component is built from a view and its state is synced
/// 2. **Event Handling**: input arrives through `handle_key_events()` and
///    `handle_mouse_events()`, which return effects instead of mutating the host
/// 3. **Rendering**: `render()` draws into the provided area and may record hit
///    areas in the state for later mouse handling
pub trait Component {
    /// Widget state that survives re-mounting.
    type State;

    /// Handle key events when this component has focus.
    fn handle_key_events(&mut self, _state: &mut Self::State, _key: KeyEvent) -> Vec<Effect> {
        Vec::new()
    }

    /// Handle mouse events targeted at this component.
    fn handle_mouse_events(&mut self, _state: &mut Self::State, _mouse: MouseEvent) -> Vec<Effect> {
        Vec::new()
    }

    /// Render the component into the given area.
    ///
    /// Implementations should only draw and record layout information in
    /// `state`; selection changes belong in the event handlers.
    fn render(&mut self, frame: &mut Frame, rect: Rect, state: &mut Self::State);
}
