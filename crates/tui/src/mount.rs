//! Mount target shared between the control and the host's draw loop.

use std::cell::RefCell;
use std::rc::Rc;

use choices_picker_types::Effect;
use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::Frame;
use ratatui::layout::Rect;

use crate::ui::components::Component;
use crate::ui::components::choices_picker::{ChoiceGroupState, ChoicesPickerComponent, ChoicesView};
use crate::ui::icons::{GlyphIconResolver, IconResolver};

#[derive(Default)]
struct Mounted {
    component: Option<ChoicesPickerComponent>,
    state: ChoiceGroupState,
}

/// Container the control renders into.
///
/// Cloning yields another handle to the same container: the host keeps one to
/// draw, the control keeps one to mount and unmount. The icon resolver is the
/// host's capability and travels with the container.
#[derive(Clone)]
pub struct MountPoint {
    inner: Rc<RefCell<Mounted>>,
    icons: Rc<dyn IconResolver>,
}

impl Default for MountPoint {
    fn default() -> Self {
        Self::new(Rc::new(GlyphIconResolver::default()))
    }
}

impl MountPoint {
    pub fn new(icons: Rc<dyn IconResolver>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Mounted::default())),
            icons,
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.inner.borrow().component.is_some()
    }

    /// Copy of the currently mounted view.
    pub fn view(&self) -> Option<ChoicesView> {
        self.inner.borrow().component.as_ref().map(|component| component.view().clone())
    }

    /// Draw the mounted tree; draws nothing when unmounted.
    pub fn draw(&self, frame: &mut Frame, area: Rect) {
        let mut mounted = self.inner.borrow_mut();
        let Mounted { component, state } = &mut *mounted;
        if let Some(component) = component {
            component.render(frame, area, state);
        }
    }

    pub(crate) fn mount(&self, view: ChoicesView) {
        let mut mounted = self.inner.borrow_mut();
        // Hit areas belong to the previous view until the next draw.
        mounted.state.clear_hit_areas();
        mounted.state.sync(&view);
        mounted.component = Some(ChoicesPickerComponent::new(view, Rc::clone(&self.icons)));
    }

    pub(crate) fn unmount(&self) {
        let mut mounted = self.inner.borrow_mut();
        mounted.component = None;
        mounted.state = ChoiceGroupState::default();
    }

    pub(crate) fn dispatch_key(&self, key: KeyEvent) -> Vec<Effect> {
        let mut mounted = self.inner.borrow_mut();
        let Mounted { component, state } = &mut *mounted;
        component
            .as_mut()
            .map(|component| component.handle_key_events(state, key))
            .unwrap_or_default()
    }

    pub(crate) fn dispatch_mouse(&self, mouse: MouseEvent) -> Vec<Effect> {
        let mut mounted = self.inner.borrow_mut();
        let Mounted { component, state } = &mut *mounted;
        component
            .as_mut()
            .map(|component| component.handle_mouse_events(state, mouse))
            .unwrap_or_default()
    }
}
