use serde::Deserialize;

use super::catalog::Translations;
use super::warning::WarningSink;
use super::Error;

/// Settings for a new [`Gettext`](crate::Gettext).
///
/// Can be built in code or deserialized, e.g. from JSON with [`GettextOptions::from_json`]:
///
/// ```
/// use translate_gettext::GettextOptions;
///
/// let options = GettextOptions::from_json(r#"{
///     "source_locale": "en-US",
///     "debug": true,
///     "translations": {
///         "fi": {"messages": {"translations": {"": {"Yes": {"msgid": "Yes", "msgstr": ["Kyllä"]}}}}}
///     }
/// }"#).unwrap();
/// assert_eq!(options.source_locale.as_deref(), Some("en-US"));
/// ```
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GettextOptions {
    /// The locale the messages in the source code are written in. Lookups in this locale need no
    /// catalogue and do not report misses. A blank value is reported and ignored.
    pub source_locale: Option<String>,
    /// Also log every warning with `tracing`.
    pub debug: bool,
    /// Catalogues to add on construction. Their plural rule warnings go to [`warnings`](Self::warnings).
    pub translations: Translations,
    /// The sink for the new instance. Warnings raised during construction only reach listeners
    /// registered on it beforehand; without one they are only logged, and only in debug mode.
    #[serde(skip)]
    pub warnings: Option<WarningSink>,
}

impl GettextOptions {
    pub fn new() -> Self {
        GettextOptions::default()
    }

    pub fn source_locale(mut self, locale: impl Into<String>) -> Self {
        self.source_locale = Some(locale.into());
        self
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn translations(mut self, translations: Translations) -> Self {
        self.translations.extend(translations);
        self
    }

    /// Uses `sink`, with its listeners, for the new instance.
    pub fn warnings(mut self, sink: WarningSink) -> Self {
        self.warnings = Some(sink);
        self
    }

    pub fn from_json(src: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(src)?)
    }
}
