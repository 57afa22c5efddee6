use ratatui::layout::{Position, Rect};

use super::view::ChoicesView;

/// Transient widget state for the mounted choice group.
///
/// Holds only what the widget needs to move between renders (cursor, whether
/// the dropdown is open, hit areas from the last draw). The selected value
/// itself always comes from the view.
#[derive(Debug, Clone, Default)]
pub struct ChoiceGroupState {
    cursor: usize,
    open: bool,
    synced_selection: Option<String>,
    item_areas: Vec<Rect>,
    field_area: Option<Rect>,
}

impl ChoiceGroupState {
    /// Align with a freshly mounted view.
    ///
    /// The cursor jumps to the selected item whenever the selection differs
    /// from the last synced one, and is clamped to the number of choices.
    pub fn sync(&mut self, view: &ChoicesView) {
        let selection = view.selected_key().map(str::to_owned);
        if selection != self.synced_selection {
            if let Some(index) = view.selected_index() {
                self.cursor = index;
            }
            self.synced_selection = selection;
        }

        let len = view.choices().len();
        self.cursor = self.cursor.min(len.saturating_sub(1));
        if !view.accepts_input() || len == 0 {
            self.open = false;
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Move the cursor down, wrapping at the end.
    pub fn select_next(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        self.cursor = (self.cursor + 1) % len;
    }

    /// Move the cursor up, wrapping to the end.
    pub fn select_previous(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        if self.cursor == 0 {
            self.cursor = len - 1;
        } else {
            self.cursor -= 1;
        }
    }

    pub(crate) fn clear_hit_areas(&mut self) {
        self.item_areas.clear();
        self.field_area = None;
    }

    pub(crate) fn push_item_area(&mut self, area: Rect) {
        self.item_areas.push(area);
    }

    pub(crate) fn set_field_area(&mut self, area: Rect) {
        self.field_area = Some(area);
    }

    /// Index of the item drawn at `position` during the last render.
    pub fn item_at(&self, position: Position) -> Option<usize> {
        self.item_areas.iter().position(|area| area.contains(position))
    }

    /// Whether `position` hits the collapsed dropdown field.
    pub fn field_contains(&self, position: Position) -> bool {
        self.field_area.is_some_and(|area| area.contains(position))
    }
}
