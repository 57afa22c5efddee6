use std::rc::Rc;

use choices_picker_types::{Effect, FormFactor};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};
use tracing::trace;
use unicode_width::UnicodeWidthStr;

use super::derive::DerivedChoice;
use super::state::ChoiceGroupState;
use super::view::{ChoicesView, MASK_INDICATOR, RenderState};
use crate::ui::components::Component;
use crate::ui::icons::IconResolver;

const DROPDOWN_PLACEHOLDER: &str = "Select an option";

/// Mounted, interactive form of a [`ChoicesView`].
///
/// Large form factors draw a radio group, small ones a dropdown. Both report
/// the same `Effect::SelectionChanged` values for the same choice.
pub struct ChoicesPickerComponent {
    view: ChoicesView,
    icons: Rc<dyn IconResolver>,
}

impl ChoicesPickerComponent {
    pub fn new(view: ChoicesView, icons: Rc<dyn IconResolver>) -> Self {
        Self { view, icons }
    }

    pub fn view(&self) -> &ChoicesView {
        &self.view
    }

    fn select_at(&self, index: usize) -> Vec<Effect> {
        self.view
            .choices()
            .get(index)
            .map(|choice| vec![Effect::SelectionChanged(Some(choice.value))])
            .unwrap_or_default()
    }

    fn handle_radio_key(&self, state: &mut ChoiceGroupState, key: KeyEvent, len: usize) -> Vec<Effect> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') if len > 0 => {
                state.select_previous(len);
                vec![Effect::Redraw]
            }
            KeyCode::Down | KeyCode::Char('j') if len > 0 => {
                state.select_next(len);
                vec![Effect::Redraw]
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.select_at(state.cursor()),
            KeyCode::Backspace | KeyCode::Delete => vec![Effect::SelectionChanged(None)],
            _ => Vec::new(),
        }
    }

    fn handle_dropdown_key(&self, state: &mut ChoiceGroupState, key: KeyEvent, len: usize) -> Vec<Effect> {
        if !state.is_open() {
            return match key.code {
                KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Down if len > 0 => {
                    state.open();
                    vec![Effect::Redraw]
                }
                KeyCode::Backspace | KeyCode::Delete => vec![Effect::SelectionChanged(None)],
                _ => Vec::new(),
            };
        }

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                state.select_previous(len);
                vec![Effect::Redraw]
            }
            KeyCode::Down | KeyCode::Char('j') => {
                state.select_next(len);
                vec![Effect::Redraw]
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                state.close();
                let mut effects = self.select_at(state.cursor());
                effects.push(Effect::Redraw);
                effects
            }
            KeyCode::Esc => {
                state.close();
                vec![Effect::Redraw]
            }
            KeyCode::Backspace | KeyCode::Delete => {
                state.close();
                vec![Effect::SelectionChanged(None), Effect::Redraw]
            }
            _ => Vec::new(),
        }
    }

    fn base_style(&self) -> Style {
        if self.view.disabled {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        }
    }

    fn label_line(&self) -> Line<'_> {
        Line::from(Span::styled(
            self.view.label.as_str(),
            self.base_style().add_modifier(Modifier::BOLD),
        ))
    }

    /// Icon glyph followed by a space, or nothing when the name is unknown.
    fn icon_span(&self, choice: &DerivedChoice) -> Option<Span<'static>> {
        let name = choice.icon_name.as_deref()?;
        match self.icons.resolve(name) {
            Some(icon) => Some(Span::styled(format!("{} ", icon.glyph), self.base_style())),
            None => {
                trace!(icon = name, "icon name did not resolve");
                None
            }
        }
    }

    fn item_line<'a>(&self, choice: &'a DerivedChoice, marker: &'static str, selected: bool, under_cursor: bool) -> Line<'a> {
        let mut style = self.base_style();
        if selected {
            style = style.add_modifier(Modifier::BOLD);
        }
        if under_cursor && self.view.accepts_input() {
            style = style.add_modifier(Modifier::REVERSED);
        }

        let mut spans = vec![Span::styled(marker, style)];
        spans.extend(self.icon_span(choice).map(|span| span.patch_style(style)));
        spans.push(Span::styled(choice.text.as_str(), style));
        Line::from(spans)
    }

    fn render_radio_group(&self, frame: &mut Frame, area: Rect, state: &mut ChoiceGroupState) {
        if let Some(label_row) = row(area, 0) {
            frame.render_widget(self.label_line(), label_row);
        }

        let selected = self.view.selected_index();
        for (index, choice) in self.view.choices().iter().enumerate() {
            let Some(item_row) = row(area, index + 1) else {
                break;
            };
            let is_selected = selected == Some(index);
            let marker = if is_selected { "(•) " } else { "( ) " };
            frame.render_widget(
                self.item_line(choice, marker, is_selected, index == state.cursor()),
                item_row,
            );
            state.push_item_area(item_row);
        }
    }

    fn render_dropdown(&self, frame: &mut Frame, area: Rect, state: &mut ChoiceGroupState) {
        if let Some(label_row) = row(area, 0) {
            frame.render_widget(self.label_line(), label_row);
        }
        let Some(field_row) = row(area, 1) else {
            return;
        };

        let choices = self.view.choices();
        let selected = self.view.selected_index();
        let mut spans: Vec<Span> = Vec::new();
        match selected.and_then(|index| choices.get(index)) {
            Some(choice) => {
                spans.extend(self.icon_span(choice));
                spans.push(Span::styled(choice.text.as_str(), self.base_style()));
            }
            None => spans.push(Span::styled(
                DROPDOWN_PLACEHOLDER,
                self.base_style().add_modifier(Modifier::DIM),
            )),
        }
        let content_width: usize = spans.iter().map(|span| span.content.width()).sum();
        let padding = usize::from(field_row.width).saturating_sub(content_width + 1);
        spans.push(Span::raw(" ".repeat(padding)));
        spans.push(Span::styled(if state.is_open() { "▴" } else { "▾" }, self.base_style()));
        frame.render_widget(Line::from(spans).style(Style::default().add_modifier(Modifier::UNDERLINED)), field_row);
        state.set_field_area(field_row);

        if !state.is_open() {
            return;
        }
        for (index, choice) in choices.iter().enumerate() {
            let Some(item_row) = row(area, index + 2) else {
                break;
            };
            let is_selected = selected == Some(index);
            let marker = if is_selected { "✓ " } else { "  " };
            frame.render_widget(
                self.item_line(choice, marker, is_selected, index == state.cursor()),
                item_row,
            );
            state.push_item_area(item_row);
        }
    }
}

/// The one-line strip at `offset` rows into `area`, if it fits.
fn row(area: Rect, offset: usize) -> Option<Rect> {
    let offset = u16::try_from(offset).ok()?;
    (offset < area.height).then(|| Rect::new(area.x, area.y + offset, area.width, 1))
}

impl Component for ChoicesPickerComponent {
    type State = ChoiceGroupState;

    fn handle_key_events(&mut self, state: &mut ChoiceGroupState, key: KeyEvent) -> Vec<Effect> {
        if key.kind == KeyEventKind::Release || !self.view.accepts_input() {
            return Vec::new();
        }
        let len = self.view.choices().len();
        match self.view.form_factor {
            FormFactor::Large => self.handle_radio_key(state, key, len),
            FormFactor::Small => self.handle_dropdown_key(state, key, len),
        }
    }

    fn handle_mouse_events(&mut self, state: &mut ChoiceGroupState, mouse: MouseEvent) -> Vec<Effect> {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) || !self.view.accepts_input() {
            return Vec::new();
        }
        let position = Position::new(mouse.column, mouse.row);
        if let Some(index) = state.item_at(position) {
            let mut effects = self.select_at(index);
            if state.is_open() {
                state.close();
                effects.push(Effect::Redraw);
            }
            return effects;
        }
        if self.view.form_factor == FormFactor::Small && state.field_contains(position) {
            if state.is_open() {
                state.close();
            } else if !self.view.choices().is_empty() {
                state.open();
            }
            return vec![Effect::Redraw];
        }
        Vec::new()
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, state: &mut ChoiceGroupState) {
        state.clear_hit_areas();
        match &self.view.state {
            RenderState::Masked => frame.render_widget(Paragraph::new(MASK_INDICATOR), rect),
            RenderState::ConfigError(message) => {
                frame.render_widget(Paragraph::new(message.as_str()).wrap(Wrap { trim: false }), rect)
            }
            RenderState::Normal { .. } => match self.view.form_factor {
                FormFactor::Large => self.render_radio_group(frame, rect, state),
                FormFactor::Small => self.render_dropdown(frame, rect, state),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use choices_picker_types::OptionMetadata;
    use crossterm::event::KeyModifiers;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::ui::components::choices_picker::picker::{ChoicesPicker, ChoicesPickerProps};
    use crate::ui::icons::GlyphIconResolver;

    fn contact_options() -> Vec<OptionMetadata> {
        vec![OptionMetadata::new(0, "Email"), OptionMetadata::new(1, "Phone")]
    }

    fn mounted(value: Option<i32>, configuration: Option<&str>, form_factor: FormFactor) -> (ChoicesPickerComponent, ChoiceGroupState) {
        let options = contact_options();
        let view = ChoicesPicker::new().render(&ChoicesPickerProps {
            label: "Contact",
            value,
            options: &options,
            configuration,
            disabled: false,
            masked: false,
            form_factor,
        });
        let mut state = ChoiceGroupState::default();
        state.sync(&view);
        (ChoicesPickerComponent::new(view, Rc::new(GlyphIconResolver::default())), state)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn draw(component: &mut ChoicesPickerComponent, state: &mut ChoiceGroupState, width: u16, height: u16) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).expect("test terminal");
        terminal
            .draw(|frame| {
                let area = frame.area();
                component.render(frame, area, state);
            })
            .expect("draw");
        let buffer = terminal.backend().buffer();
        (0..height)
            .map(|y| {
                (0..width)
                    .map(|x| buffer[(x, y)].symbol())
                    .collect::<String>()
                    .trim_end()
                    .to_string()
            })
            .collect()
    }

    #[test]
    fn radio_group_draws_icons_and_selection() {
        let (mut component, mut state) = mounted(Some(1), Some(r#"{"0":"Mail","1":"Call"}"#), FormFactor::Large);
        let lines = draw(&mut component, &mut state, 24, 4);
        assert_eq!(lines[0], "Contact");
        assert_eq!(lines[1], "( ) ✉ Email");
        assert_eq!(lines[2], "(•) ☏ Phone");
        assert_eq!(lines[3], "");
    }

    #[test]
    fn radio_group_without_value_or_icons() {
        let (mut component, mut state) = mounted(None, None, FormFactor::Large);
        let lines = draw(&mut component, &mut state, 24, 3);
        assert_eq!(lines[1], "( ) Email");
        assert_eq!(lines[2], "( ) Phone");
    }

    #[test]
    fn unknown_icon_names_draw_without_icon() {
        let (mut component, mut state) = mounted(None, Some(r#"{"0":"NoSuchIcon"}"#), FormFactor::Large);
        let lines = draw(&mut component, &mut state, 24, 3);
        assert_eq!(lines[1], "( ) Email");
    }

    #[test]
    fn masked_view_draws_only_the_indicator() {
        let options = contact_options();
        let view = ChoicesPicker::new().render(&ChoicesPickerProps {
            label: "Contact",
            value: Some(1),
            options: &options,
            configuration: Some("{bad json"),
            disabled: false,
            masked: true,
            form_factor: FormFactor::Large,
        });
        let mut state = ChoiceGroupState::default();
        let mut component = ChoicesPickerComponent::new(view, Rc::new(GlyphIconResolver::default()));
        let lines = draw(&mut component, &mut state, 24, 3);
        assert_eq!(lines, ["****", "", ""]);
        assert!(component.handle_key_events(&mut state, key(KeyCode::Enter)).is_empty());
    }

    #[test]
    fn configuration_error_draws_only_the_message() {
        let (mut component, mut state) = mounted(Some(1), Some("{bad json"), FormFactor::Large);
        let lines = draw(&mut component, &mut state, 40, 3);
        assert_eq!(lines, ["Invalid configuration: '{bad json'", "", ""]);
        assert!(component.handle_key_events(&mut state, key(KeyCode::Enter)).is_empty());
    }

    #[test]
    fn radio_keys_move_cursor_and_select() {
        let (mut component, mut state) = mounted(None, None, FormFactor::Large);
        assert_eq!(component.handle_key_events(&mut state, key(KeyCode::Down)), [Effect::Redraw]);
        assert_eq!(
            component.handle_key_events(&mut state, key(KeyCode::Enter)),
            [Effect::SelectionChanged(Some(1))]
        );
        assert_eq!(
            component.handle_key_events(&mut state, key(KeyCode::Backspace)),
            [Effect::SelectionChanged(None)]
        );
    }

    #[test]
    fn reselecting_the_selected_option_still_reports() {
        let (mut component, mut state) = mounted(Some(1), None, FormFactor::Large);
        assert_eq!(state.cursor(), 1);
        for _ in 0..2 {
            assert_eq!(
                component.handle_key_events(&mut state, key(KeyCode::Char(' '))),
                [Effect::SelectionChanged(Some(1))]
            );
        }
    }

    #[test]
    fn disabled_view_ignores_input() {
        let options = contact_options();
        let view = ChoicesPicker::new().render(&ChoicesPickerProps {
            label: "Contact",
            value: None,
            options: &options,
            configuration: None,
            disabled: true,
            masked: false,
            form_factor: FormFactor::Large,
        });
        let mut state = ChoiceGroupState::default();
        let mut component = ChoicesPickerComponent::new(view, Rc::new(GlyphIconResolver::default()));
        let _ = draw(&mut component, &mut state, 24, 3);
        assert!(component.handle_key_events(&mut state, key(KeyCode::Enter)).is_empty());
        assert!(component.handle_mouse_events(&mut state, click(1, 1)).is_empty());
    }

    #[test]
    fn radio_click_selects_item() {
        let (mut component, mut state) = mounted(None, None, FormFactor::Large);
        let _ = draw(&mut component, &mut state, 24, 3);
        assert_eq!(
            component.handle_mouse_events(&mut state, click(2, 1)),
            [Effect::SelectionChanged(Some(0))]
        );
        assert!(component.handle_mouse_events(&mut state, click(2, 0)).is_empty());
    }

    #[test]
    fn dropdown_collapsed_shows_selection() {
        let (mut component, mut state) = mounted(Some(0), Some(r#"{"0":"Mail"}"#), FormFactor::Small);
        let lines = draw(&mut component, &mut state, 12, 4);
        assert_eq!(lines[0], "Contact");
        assert_eq!(lines[1], "✉ Email    ▾");
        assert_eq!(lines[2], "");
    }

    #[test]
    fn dropdown_placeholder_without_value() {
        let (mut component, mut state) = mounted(None, None, FormFactor::Small);
        let lines = draw(&mut component, &mut state, 20, 2);
        assert_eq!(lines[1], "Select an option   ▾");
    }

    #[test]
    fn dropdown_keyboard_flow_matches_radio_semantics() {
        let (mut component, mut state) = mounted(None, None, FormFactor::Small);
        assert_eq!(component.handle_key_events(&mut state, key(KeyCode::Enter)), [Effect::Redraw]);
        assert!(state.is_open());

        let lines = draw(&mut component, &mut state, 20, 4);
        assert_eq!(lines[2], "  Email");
        assert_eq!(lines[3], "  Phone");

        component.handle_key_events(&mut state, key(KeyCode::Down));
        assert_eq!(
            component.handle_key_events(&mut state, key(KeyCode::Enter)),
            [Effect::SelectionChanged(Some(1)), Effect::Redraw]
        );
        assert!(!state.is_open());
    }

    #[test]
    fn dropdown_escape_closes_without_selecting() {
        let (mut component, mut state) = mounted(Some(1), None, FormFactor::Small);
        component.handle_key_events(&mut state, key(KeyCode::Char(' ')));
        assert!(state.is_open());
        assert_eq!(component.handle_key_events(&mut state, key(KeyCode::Esc)), [Effect::Redraw]);
        assert!(!state.is_open());
    }

    #[test]
    fn dropdown_mouse_opens_and_selects() {
        let (mut component, mut state) = mounted(None, None, FormFactor::Small);
        let _ = draw(&mut component, &mut state, 20, 4);
        assert_eq!(component.handle_mouse_events(&mut state, click(3, 1)), [Effect::Redraw]);
        assert!(state.is_open());

        let _ = draw(&mut component, &mut state, 20, 4);
        assert_eq!(
            component.handle_mouse_events(&mut state, click(3, 3)),
            [Effect::SelectionChanged(Some(1)), Effect::Redraw]
        );
        assert!(!state.is_open());
    }

    #[test]
    fn empty_group_draws_label_only() {
        let view = ChoicesPicker::new().render(&ChoicesPickerProps {
            label: "Contact",
            value: Some(3),
            options: &[],
            configuration: None,
            disabled: false,
            masked: false,
            form_factor: FormFactor::Large,
        });
        let mut state = ChoiceGroupState::default();
        state.sync(&view);
        let mut component = ChoicesPickerComponent::new(view, Rc::new(GlyphIconResolver::default()));
        let lines = draw(&mut component, &mut state, 12, 2);
        assert_eq!(lines, ["Contact", ""]);
        assert!(component.handle_key_events(&mut state, key(KeyCode::Down)).is_empty());
        assert!(component.handle_key_events(&mut state, key(KeyCode::Enter)).is_empty());
    }
}
