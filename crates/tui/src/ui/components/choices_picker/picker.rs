use std::rc::Rc;

use choices_picker_types::{FormFactor, OptionMetadata};

use super::derive::DerivationCache;
use super::view::{ChoicesView, RenderState};

/// Inputs to one render of the picker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChoicesPickerProps<'a> {
    pub label: &'a str,
    pub value: Option<i32>,
    pub options: &'a [OptionMetadata],
    pub configuration: Option<&'a str>,
    pub disabled: bool,
    pub masked: bool,
    pub form_factor: FormFactor,
}

/// Turns props into a [`ChoicesView`].
///
/// The only state kept between renders is the derivation memo, so equal props
/// always produce equal views.
#[derive(Debug, Default)]
pub struct ChoicesPicker {
    cache: DerivationCache,
}

impl ChoicesPicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide what to show, in precedence order: masked, configuration error,
    /// then the normal choice group.
    pub fn render(&mut self, props: &ChoicesPickerProps<'_>) -> ChoicesView {
        let derivation = self.cache.get_or_derive(props.options, props.configuration);

        let state = if props.masked {
            RenderState::Masked
        } else {
            match derivation.as_ref() {
                Err(error) => RenderState::ConfigError(error.to_string()),
                Ok(choices) => RenderState::Normal {
                    choices: Rc::clone(choices),
                    selected_key: props.value.map(|value| value.to_string()),
                },
            }
        };

        ChoicesView {
            label: props.label.to_string(),
            disabled: props.disabled,
            form_factor: props.form_factor,
            state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::components::choices_picker::view::{MASK_INDICATOR, RenderKind};

    fn contact_options() -> Vec<OptionMetadata> {
        vec![OptionMetadata::new(0, "Email"), OptionMetadata::new(1, "Phone")]
    }

    fn props<'a>(options: &'a [OptionMetadata], configuration: Option<&'a str>) -> ChoicesPickerProps<'a> {
        ChoicesPickerProps {
            label: "Preferred contact",
            value: Some(1),
            options,
            configuration,
            disabled: false,
            masked: false,
            form_factor: FormFactor::Large,
        }
    }

    #[test]
    fn renders_icons_and_selection() {
        let options = contact_options();
        let view = ChoicesPicker::new().render(&props(&options, Some(r#"{"0":"Mail","1":"Call"}"#)));

        assert_eq!(view.state.kind(), RenderKind::Normal);
        assert_eq!(view.choices().len(), 2);
        assert_eq!(view.selected_key(), Some("1"));
        assert_eq!(view.selected_index(), Some(1));
        let icons: Vec<Option<&str>> = view.choices().iter().map(|choice| choice.icon_name.as_deref()).collect();
        assert_eq!(icons, [Some("Mail"), Some("Call")]);
    }

    #[test]
    fn malformed_configuration_renders_only_the_error() {
        let options = contact_options();
        let view = ChoicesPicker::new().render(&props(&options, Some("{bad json")));

        match &view.state {
            RenderState::ConfigError(message) => assert!(message.contains("{bad json")),
            other => panic!("expected a configuration error, got {other:?}"),
        }
        assert!(view.choices().is_empty());
    }

    #[test]
    fn masking_dominates_configuration_errors() {
        let options = contact_options();
        let mut picker = ChoicesPicker::new();
        for configuration in [None, Some(r#"{"0":"Mail"}"#), Some("{bad json")] {
            let view = picker.render(&ChoicesPickerProps {
                masked: true,
                ..props(&options, configuration)
            });
            assert_eq!(view.state, RenderState::Masked);
        }
        assert_eq!(MASK_INDICATOR, "****");
    }

    #[test]
    fn null_value_selects_nothing() {
        let options = contact_options();
        let view = ChoicesPicker::new().render(&ChoicesPickerProps {
            value: None,
            ..props(&options, None)
        });
        assert_eq!(view.selected_key(), None);
        assert!(view.choices().iter().all(|choice| choice.icon_name.is_none()));
    }

    #[test]
    fn form_factor_does_not_change_selection() {
        let options = contact_options();
        let mut picker = ChoicesPicker::new();
        let large = picker.render(&props(&options, None));
        let small = picker.render(&ChoicesPickerProps {
            form_factor: FormFactor::Small,
            ..props(&options, None)
        });
        assert_eq!(large.state, small.state);
    }

    #[test]
    fn empty_options_render_an_empty_group() {
        let view = ChoicesPicker::new().render(&props(&[], None));
        assert_eq!(view.state.kind(), RenderKind::Normal);
        assert!(view.choices().is_empty());
    }

    #[test]
    fn recovers_once_configuration_is_fixed() {
        let options = contact_options();
        let mut picker = ChoicesPicker::new();
        let broken = picker.render(&props(&options, Some("{bad json")));
        assert_eq!(broken.state.kind(), RenderKind::ConfigError);
        let fixed = picker.render(&props(&options, Some(r#"{"1":"Call"}"#)));
        assert_eq!(fixed.state.kind(), RenderKind::Normal);
    }
}
