//! The lookup shared by [`Gettext`](crate::Gettext) and [`BoundTranslator`](crate::BoundTranslator).

use super::catalog::{Comments, NO_COMMENTS};
use super::plural::Count;
use super::store::CatalogStore;
use super::warning::{Warning, WarningSink};

/// A number of items, for selecting a plural form.
///
/// Implemented for the primitive numbers and for `Option`, where `None` means "no count" and
/// selects the singular. Only exactly one is singular: negative and fractional numbers select a
/// plural form (see [`Count::Other`]). Floats that are not finite also mean "no count".
pub trait PluralCount {
    fn plural_count(self) -> Option<Count>;
}

macro_rules! unsigned_count {
    ($($t:ty),*) => {$(
        impl PluralCount for $t {
            fn plural_count(self) -> Option<Count> {
                Some(Count::Whole(self as u64))
            }
        }
    )*};
}

macro_rules! signed_count {
    ($($t:ty),*) => {$(
        impl PluralCount for $t {
            fn plural_count(self) -> Option<Count> {
                Some(if self < 0 { Count::Other } else { Count::Whole(self as u64) })
            }
        }
    )*};
}

unsigned_count!(u8, u16, u32, u64, usize);
signed_count!(i8, i16, i32, i64, isize);

impl PluralCount for f64 {
    fn plural_count(self) -> Option<Count> {
        if !self.is_finite() {
            None
        } else if self >= 0.0 && self.fract() == 0.0 && self < u64::MAX as f64 {
            Some(Count::Whole(self as u64))
        } else {
            Some(Count::Other)
        }
    }
}

impl PluralCount for f32 {
    fn plural_count(self) -> Option<Count> {
        (self as f64).plural_count()
    }
}

impl<T: PluralCount> PluralCount for Option<T> {
    fn plural_count(self) -> Option<Count> {
        self.and_then(PluralCount::plural_count)
    }
}

/// One lookup configuration: a store, the locale to look in and where to report misses.
pub(crate) struct Translator<'a> {
    pub store: &'a CatalogStore,
    pub locale: &'a str,
    pub source_locale: &'a str,
    pub sink: &'a WarningSink,
}

impl<'a> Translator<'a> {
    /// Translation of `msgid` in `context` of `domain`, in the plural form for `count`.
    ///
    /// Falls back to `msgid`, or to `msgid_plural` when `count` is given and not one. Misses are
    /// reported unless the locale is the source locale.
    pub fn resolve<'r>(
        &self,
        domain: &str,
        context: &str,
        msgid: &'r str,
        msgid_plural: Option<&'r str>,
        count: Option<Count>,
    ) -> &'r str
    where
        'a: 'r,
    {
        let default = match count {
            Some(c) if !c.is_one() => msgid_plural.unwrap_or(msgid),
            _ => msgid,
        };

        let (record, plural) =
            match self
                .store
                .lookup_with_plural(self.locale, domain, context, msgid)
            {
                Some(found) => found,
                None => {
                    if self.source_locale.is_empty() || self.locale != self.source_locale {
                        self.sink.emit(&Warning::NoTranslation {
                            locale: self.locale.to_owned(),
                            domain: domain.to_owned(),
                            context: context.to_owned(),
                            msgid: msgid.to_owned(),
                        });
                    }
                    return default;
                }
            };

        let index = count.map_or(0, |c| plural.index_of(c));
        record.form(index).unwrap_or(default)
    }

    /// Comments of the entry, empty when there is none. Never reports anything.
    pub fn comments(&self, domain: &str, context: &str, msgid: &str) -> &'a Comments {
        self.store
            .lookup(self.locale, domain, context, msgid)
            .and_then(|t| t.comments.as_ref())
            .unwrap_or(&NO_COMMENTS)
    }
}
