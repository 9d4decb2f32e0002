//! Locale-aware text values

use crate::visibility::Visible;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A text value with optional per-locale translations
///
/// `translated_value` is only populated by [`TranslatableString::translate`]
/// and carries the value resolved for the caller's locale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "Option<TranslatableRepr>")]
pub struct TranslatableString {
    /// Stable identifier, used to scrub translations on export
    pub id: String,
    /// Untranslated default value
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translated_value: Option<String>,
    /// Translations indexed by locale (e.g. `de`, `en_GB`)
    pub translations: BTreeMap<String, String>,
}

/// Accepted JSON shapes: a bare string, a full object, or `null`
#[derive(Deserialize)]
#[serde(untagged)]
enum TranslatableRepr {
    Plain(String),
    Full(TranslatableFields),
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct TranslatableFields {
    id: String,
    value: String,
    translated_value: Option<String>,
    translations: BTreeMap<String, String>,
}

impl From<Option<TranslatableRepr>> for TranslatableString {
    fn from(repr: Option<TranslatableRepr>) -> Self {
        match repr {
            None => TranslatableString::default(),
            Some(TranslatableRepr::Plain(value)) => TranslatableString::new(value),
            Some(TranslatableRepr::Full(fields)) => TranslatableString {
                id: fields.id,
                value: fields.value,
                translated_value: fields.translated_value,
                translations: fields.translations,
            },
        }
    }
}

impl TranslatableString {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..Self::default()
        }
    }

    pub fn with_translation(mut self, locale: impl Into<String>, value: impl Into<String>) -> Self {
        self.translations.insert(locale.into(), value.into());
        self
    }

    /// Best match for `locale`.
    ///
    /// Resolution order: exact locale key, then a language key that prefixes
    /// the locale (`de` for `de_DE` or `de-DE`), then the default value.
    pub fn resolve(&self, locale: Option<&str>) -> &str {
        let Some(locale) = locale.filter(|l| !l.trim().is_empty()) else {
            return &self.value;
        };
        if let Some(exact) = self.translations.get(locale) {
            return exact;
        }
        let normalized = locale.replace('-', "_");
        if let Some(exact) = self.translations.get(&normalized) {
            return exact;
        }
        self.translations
            .iter()
            .find(|(key, _)| {
                normalized
                    .strip_prefix(key.as_str())
                    .is_some_and(|rest| rest.starts_with('_'))
            })
            .map(|(_, value)| value.as_str())
            .unwrap_or(self.value.as_str())
    }

    /// Store the value resolved for `locale` in `translated_value`
    pub fn translate(&mut self, locale: Option<&str>) {
        let resolved = self.resolve(locale).to_string();
        self.translated_value = Some(resolved);
    }

    pub fn clear_translation(&mut self) {
        self.translated_value = None;
    }
}

impl Visible for TranslatableString {
    fn accept_translation(&mut self, locale: Option<&str>) {
        self.translate(locale);
    }
}
