//! Option list derivation and its memo.

use std::hash::{DefaultHasher, Hash, Hasher};
use std::rc::Rc;

use choices_picker_types::OptionMetadata;
use tracing::{debug, warn};

use crate::ui::icons::{ConfigurationError, IconMapping};

/// One presentable choice.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DerivedChoice {
    /// Stringified value, used as the selection key.
    pub key: String,
    pub value: i32,
    pub text: String,
    pub icon_name: Option<String>,
}

/// Either the derived choices in option order or the configuration error that
/// prevented deriving them.
pub type Derivation = Result<Rc<[DerivedChoice]>, ConfigurationError>;

/// Build one [`DerivedChoice`] per option, in order.
pub fn derive_choices(options: &[OptionMetadata], configuration: Option<&str>) -> Derivation {
    let mapping = IconMapping::parse(configuration)?;
    Ok(options
        .iter()
        .map(|option| DerivedChoice {
            key: option.value.to_string(),
            value: option.value,
            text: option.label.clone(),
            icon_name: mapping.icon_for(option.value).map(str::to_owned),
        })
        .collect())
}

/// Single-entry memo over [`derive_choices`].
///
/// Entries are keyed by a structural hash of the inputs and confirmed with an
/// equality check, so a hit always returns the same `Rc` for equal inputs.
#[derive(Debug, Default)]
pub struct DerivationCache {
    entry: Option<CacheEntry>,
}

#[derive(Debug)]
struct CacheEntry {
    fingerprint: u64,
    options: Vec<OptionMetadata>,
    configuration: Option<String>,
    derivation: Rc<Derivation>,
}

impl CacheEntry {
    fn matches(&self, fingerprint: u64, options: &[OptionMetadata], configuration: Option<&str>) -> bool {
        self.fingerprint == fingerprint
            && self.configuration.as_deref() == configuration
            && self.options.as_slice() == options
    }
}

impl DerivationCache {
    pub fn get_or_derive(&mut self, options: &[OptionMetadata], configuration: Option<&str>) -> Rc<Derivation> {
        let fingerprint = fingerprint(options, configuration);
        if let Some(entry) = &self.entry
            && entry.matches(fingerprint, options, configuration)
        {
            return Rc::clone(&entry.derivation);
        }

        debug!(option_count = options.len(), "deriving choices");
        let derivation = Rc::new(derive_choices(options, configuration));
        if let Err(error) = derivation.as_ref() {
            warn!(%error, "icon configuration could not be parsed");
        }
        self.entry = Some(CacheEntry {
            fingerprint,
            options: options.to_vec(),
            configuration: configuration.map(str::to_owned),
            derivation: Rc::clone(&derivation),
        });
        derivation
    }
}

fn fingerprint(options: &[OptionMetadata], configuration: Option<&str>) -> u64 {
    let mut hasher = DefaultHasher::new();
    options.hash(&mut hasher);
    configuration.hash(&mut hasher);
    hasher.finish()
}
