//! Locale preference from POSIX environment variables.
//!
//! The environment is passed in explicitly, so the process environment is only consulted when the
//! caller does so:
//!
//! ```
//! use translate_gettext::env::guess_locales;
//!
//! let prefs = guess_locales(std::env::vars());
//! # let _ = prefs;
//! assert_eq!(
//!     guess_locales([("LANGUAGE", "fi:sv"), ("LANG", "de_DE.UTF-8")]),
//!     vec!["fi", "sv", "de_DE.UTF-8"]
//! );
//! ```

use std::collections::HashMap;

/// Variables naming the messages locale, in order of precedence.
const LOCALE_VARS: [&str; 3] = ["LC_ALL", "LC_MESSAGES", "LANG"];

/// Preferred locales according to the environment `vars`, most preferred first.
///
/// The entries of `LANGUAGE` come first, followed by `LC_ALL`, `LC_MESSAGES` and `LANG`. If the
/// effective messages locale (the first of those three that is set) is `C` or `POSIX`, messages are
/// not to be translated and the list is empty.
///
/// The result can be passed to [`Gettext::bind_locale`](crate::Gettext::bind_locale) or
/// [`Gettext::set_first_available_locale`](crate::Gettext::set_first_available_locale).
pub fn guess_locales<I, K, V>(vars: I) -> Vec<String>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let vars: HashMap<String, String> = vars
        .into_iter()
        .filter(|(k, v)| {
            let k = k.as_ref();
            !v.as_ref().is_empty() && (k == "LANGUAGE" || LOCALE_VARS.contains(&k))
        })
        .map(|(k, v)| (k.as_ref().to_owned(), v.as_ref().to_owned()))
        .collect();

    let effective = LOCALE_VARS.iter().find_map(|k| vars.get(*k));
    if effective.map_or(false, |l| is_untranslated(l)) {
        tracing::debug!(locale = ?effective, "messages locale is untranslated");
        return Vec::new();
    }

    let mut locales: Vec<String> = vars
        .get("LANGUAGE")
        .into_iter()
        .flat_map(|l| l.split(':'))
        .filter(|l| !l.is_empty())
        .map(str::to_owned)
        .collect();
    locales.extend(LOCALE_VARS.iter().filter_map(|k| vars.get(*k)).cloned());
    locales
}

fn is_untranslated(locale: &str) -> bool {
    locale == "C" || locale == "POSIX" || locale.starts_with("C.")
}
