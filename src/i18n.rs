use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt, str::FromStr};
use ts_rs::TS;
use utoipa::ToSchema;

/// Locale
///
/// Language tags the site renders content in. `es` is the home language of
/// the stored records and the default fallback.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS, ToSchema,
    Default,
)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Locale {
    #[default]
    Es,
    En,
}

impl Locale {
    pub fn as_str(self) -> &'static str {
        match self {
            Locale::Es => "es",
            Locale::En => "en",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported locale '{0}'")]
pub struct UnknownLocale(pub String);

impl FromStr for Locale {
    type Err = UnknownLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "es" => Ok(Locale::Es),
            "en" => Ok(Locale::En),
            other => Err(UnknownLocale(other.to_string())),
        }
    }
}

/// Per-locale overlays stored alongside an entity's home fields.
pub type Translations<T> = BTreeMap<Locale, T>;

/// A partial field set for one locale. Any field may be missing.
pub trait Overlay {
    fn field(&self, name: &str) -> Option<&str>;
}

/// Localizable
///
/// A record with home fields that can be overlaid per locale.
pub trait Localizable: Clone {
    type Overlay: Overlay;

    /// Fields the whole-item variant resolves. Everything else is left untouched.
    const TRANSLATABLE_FIELDS: &'static [&'static str];

    fn home_field(&self, field: &str) -> Option<&str>;

    fn set_home_field(&mut self, field: &str, value: String);

    fn translations(&self) -> Option<&Translations<Self::Overlay>>;
}

fn overlay_value<'a, O: Overlay>(
    translations: &'a Translations<O>,
    locale: Locale,
    field: &str,
) -> Option<&'a str> {
    translations
        .get(&locale)
        .and_then(|overlay| overlay.field(field))
        .filter(|value| !value.is_empty())
}

/// Resolves the display value of `field`.
///
/// Requested locale overlay first, then the fallback locale overlay, then the
/// home field. Empty overlay values count as missing. Never fails; `None` only
/// when the home field itself is optional and unset.
pub fn resolve_field<'a, E: Localizable>(
    entity: &'a E,
    field: &str,
    requested: Locale,
    fallback: Locale,
) -> Option<&'a str> {
    let Some(translations) = entity.translations() else {
        return entity.home_field(field);
    };

    overlay_value(translations, requested, field)
        .or_else(|| overlay_value(translations, fallback, field))
        .or_else(|| entity.home_field(field))
}

/// Returns a display copy with every translatable field resolved.
pub fn localized<E: Localizable>(entity: &E, requested: Locale, fallback: Locale) -> E {
    let mut copy = entity.clone();
    for field in E::TRANSLATABLE_FIELDS {
        if let Some(value) = resolve_field(entity, field, requested, fallback) {
            copy.set_home_field(field, value.to_string());
        }
    }
    copy
}

/// LocaleSettings
///
/// The locale in effect for one request plus the configured fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocaleSettings {
    pub requested: Locale,
    pub fallback: Locale,
}

impl LocaleSettings {
    pub fn apply<E: Localizable>(&self, entity: &E) -> E {
        localized(entity, self.requested, self.fallback)
    }
}
