//! Plural form selection.
//!
//! A gettext catalogue stores one translation per plural form of its language and declares in its
//! `Plural-Forms` header how a count maps to a form, as a C expression. Instead of evaluating the
//! expression, the header is looked up in a table of the formulae in actual use. Catalogues
//! without a header, or with an unknown one, get the rule of their locale.

use std::fmt;

use super::plural_table::{HEADER_TABLE, LOCALE_TABLE};

/// The plural function of a selector.
///
/// Two-form languages are usually expressed as a condition selecting the second form.
#[derive(Clone, Copy)]
pub enum Select {
    /// `false` selects form 0, `true` form 1.
    Bool(fn(u64) -> bool),
    /// Selects the form directly.
    Index(fn(u64) -> usize),
}

/// A count as plural selection sees it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Count {
    /// A non-negative whole number.
    Whole(u64),
    /// A negative or fractional number. Never singular.
    Other,
}

impl Count {
    /// Whether this is exactly one.
    pub fn is_one(self) -> bool {
        self == Count::Whole(1)
    }
}

/// Maps a count to the index of the plural form to use.
#[derive(Clone, Copy)]
pub struct PluralSelector {
    plural_count: usize,
    pub(crate) select: Select,
    fraction: usize,
}

impl PluralSelector {
    /// The rule used when nothing better is known: two forms, singular only for one.
    pub const DEFAULT: PluralSelector = PluralSelector::new(2, Select::Bool(not_one));

    /// Creates a selector. `plural_count` below one is raised to one.
    ///
    /// Counts that are not whole numbers get the last form, see
    /// [`with_fraction_form`](Self::with_fraction_form).
    pub const fn new(plural_count: usize, select: Select) -> Self {
        let plural_count = if plural_count == 0 { 1 } else { plural_count };
        PluralSelector { plural_count, select, fraction: plural_count - 1 }
    }

    /// Sets the form used for negative and fractional counts, clamped to the last form.
    pub const fn with_fraction_form(self, index: usize) -> Self {
        let fraction = if index < self.plural_count { index } else { self.plural_count - 1 };
        PluralSelector { fraction, ..self }
    }

    /// Number of plural forms (`nplurals`).
    pub fn plural_count(&self) -> usize {
        self.plural_count
    }

    /// Index of the plural form for `n`, always below [`plural_count`](Self::plural_count).
    pub fn index(&self, n: u64) -> usize {
        let raw = match self.select {
            Select::Bool(f) => f(n) as usize,
            Select::Index(f) => f(n),
        };
        if raw >= self.plural_count {
            tracing::debug!(n, raw, nplurals = self.plural_count, "plural index out of range");
            self.plural_count - 1
        } else {
            raw
        }
    }

    /// Index of the plural form for `count`.
    pub fn index_of(&self, count: Count) -> usize {
        match count {
            Count::Whole(n) => self.index(n),
            Count::Other => self.fraction,
        }
    }
}

impl fmt::Debug for PluralSelector {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let kind = match self.select {
            Select::Bool(_) => "bool",
            Select::Index(_) => "index",
        };
        f.debug_struct("PluralSelector")
            .field("plural_count", &self.plural_count)
            .field("select", &kind)
            .field("fraction", &self.fraction)
            .finish()
    }
}

fn not_one(n: u64) -> bool {
    n != 1
}

/// Which rule [`resolve`] picked.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Tier {
    /// The declared `Plural-Forms` header was recognized.
    Header,
    /// The locale was found as given.
    Exact,
    /// The locale was found after replacing `-` with `_`.
    Normalized,
    /// Only the language part of the locale was found.
    Language,
    /// Nothing matched; [`PluralSelector::DEFAULT`] was used.
    Default,
}

/// Result of [`resolve`].
#[derive(Copy, Clone, Debug)]
pub struct Resolution {
    pub selector: PluralSelector,
    pub tier: Tier,
    /// A header was declared but is not in the table.
    pub unknown_header: bool,
}

/// Looks up a selector for a declared `Plural-Forms` header.
pub fn by_header(header: &str) -> Option<PluralSelector> {
    HEADER_TABLE.get(normalize_header(header).as_str()).copied()
}

/// Looks up a selector for exactly this locale key.
pub fn by_locale(locale: &str) -> Option<PluralSelector> {
    LOCALE_TABLE.get(locale).copied()
}

/// Picks the selector for a catalogue in `locale` declaring `header`.
///
/// The header is tried first. Then the locale as is, with `-` replaced by `_`, and the bare
/// language code. When all of that fails the result is [`PluralSelector::DEFAULT`].
pub fn resolve(locale: &str, header: Option<&str>) -> Resolution {
    let mut unknown_header = false;
    if let Some(h) = header {
        if let Some(selector) = by_header(h) {
            return Resolution { selector, tier: Tier::Header, unknown_header };
        }
        unknown_header = true;
    }

    let (selector, tier) = if let Some(s) = by_locale(locale) {
        (s, Tier::Exact)
    } else if let Some(s) = by_locale(&locale.replace('-', "_")) {
        (s, Tier::Normalized)
    } else if let Some(s) = by_locale(language_code(locale)) {
        (s, Tier::Language)
    } else {
        (PluralSelector::DEFAULT, Tier::Default)
    };
    Resolution { selector, tier, unknown_header }
}

/// The language part of a locale, at most three characters.
pub fn language_code(locale: &str) -> &str {
    let lang = locale
        .split(|c| c == '-' || c == '_' || c == '.' || c == '@')
        .next()
        .unwrap_or("");
    match lang.char_indices().nth(3) {
        Some((i, _)) => &lang[..i],
        None => lang,
    }
}

/// Strips whitespace so spacing variants of one formula compare equal.
pub(crate) fn normalize_header(header: &str) -> String {
    let mut key: String = header.chars().filter(|c| !c.is_whitespace()).collect();
    if !key.ends_with(';') {
        key.push(';');
    }
    key
}
