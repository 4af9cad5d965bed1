use std::sync::Arc;

use super::catalog::Comments;
use super::engine::{PluralCount, Translator};
use super::store::CatalogStore;
use super::warning::WarningSink;

/// A translator fixed to one locale and domain.
///
/// Created by [`Gettext::bind_locale`](crate::Gettext::bind_locale). It keeps the catalogues that
/// were loaded at that time, so later changes to the [`Gettext`](crate::Gettext) it came from do
/// not affect it, except that it reports warnings to the same listeners.
///
/// It is cheap to clone and can be sent to other threads, e.g. one per request locale.
#[derive(Clone, Debug)]
pub struct BoundTranslator {
    store: Arc<CatalogStore>,
    locale: String,
    domain: String,
    source_locale: String,
    sink: WarningSink,
}

impl BoundTranslator {
    pub(crate) fn new(
        store: Arc<CatalogStore>,
        locale: String,
        domain: String,
        source_locale: String,
        sink: WarningSink,
    ) -> Self {
        BoundTranslator { store, locale, domain, source_locale, sink }
    }

    /// The bound locale; empty when no locale matched.
    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    fn translator(&self) -> Translator<'_> {
        Translator {
            store: &self.store,
            locale: &self.locale,
            source_locale: &self.source_locale,
            sink: &self.sink,
        }
    }

    pub fn gettext<'a>(&'a self, msgid: &'a str) -> &'a str {
        self.translator().resolve(&self.domain, "", msgid, None, None)
    }

    pub fn dgettext<'a>(&'a self, domain: &str, msgid: &'a str) -> &'a str {
        self.translator().resolve(domain, "", msgid, None, None)
    }

    pub fn ngettext<'a, N: PluralCount>(&'a self, msgid: &'a str, msgid_plural: &'a str, n: N) -> &'a str {
        self.translator()
            .resolve(&self.domain, "", msgid, Some(msgid_plural), n.plural_count())
    }

    pub fn dngettext<'a, N: PluralCount>(
        &'a self,
        domain: &str,
        msgid: &'a str,
        msgid_plural: &'a str,
        n: N,
    ) -> &'a str {
        self.translator()
            .resolve(domain, "", msgid, Some(msgid_plural), n.plural_count())
    }

    pub fn pgettext<'a>(&'a self, msgctxt: &str, msgid: &'a str) -> &'a str {
        self.translator().resolve(&self.domain, msgctxt, msgid, None, None)
    }

    pub fn dpgettext<'a>(&'a self, domain: &str, msgctxt: &str, msgid: &'a str) -> &'a str {
        self.translator().resolve(domain, msgctxt, msgid, None, None)
    }

    pub fn npgettext<'a, N: PluralCount>(
        &'a self,
        msgctxt: &str,
        msgid: &'a str,
        msgid_plural: &'a str,
        n: N,
    ) -> &'a str {
        self.translator()
            .resolve(&self.domain, msgctxt, msgid, Some(msgid_plural), n.plural_count())
    }

    pub fn dnpgettext<'a, N: PluralCount>(
        &'a self,
        domain: &str,
        msgctxt: &str,
        msgid: &'a str,
        msgid_plural: Option<&'a str>,
        n: N,
    ) -> &'a str {
        self.translator()
            .resolve(domain, msgctxt, msgid, msgid_plural, n.plural_count())
    }

    pub fn get_comment(&self, domain: &str, msgctxt: &str, msgid: &str) -> &Comments {
        self.translator().comments(domain, msgctxt, msgid)
    }
}

#[cfg(test)]
mod tests {
    use crate::warning::recorder;
    use crate::{DomainCatalog, Gettext, Translation, WarningKind};
    use pretty_assertions::assert_eq;
    use std::thread;

    fn gettext() -> Gettext {
        let mut gt = Gettext::default();
        let mut de = DomainCatalog::new();
        de.insert("", Translation::new("Hello", "Hallo"));
        de.insert("", Translation::plural("day", "days", ["Tag", "Tage"]));
        let mut pl = DomainCatalog::new();
        pl.insert("", Translation::new("Hello", "Cześć"));
        pl.insert("", Translation::plural("day", "days", ["dzień", "dni", "dni"]));
        let mut admin = DomainCatalog::new();
        admin.insert("", Translation::new("Hello", "Guten Tag"));
        gt.add_translations("de", "messages", de);
        gt.add_translations("pl", "messages", pl);
        gt.add_translations("de", "admin", admin);
        gt
    }

    #[test]
    fn unaffected_by_later_state_changes() {
        let mut gt = gettext();
        gt.set_locale("pl");
        let de = gt.bind_locale("de", None);
        gt.set_locale("de");
        gt.set_text_domain("admin");
        gt.add_translations("de", "messages", DomainCatalog::new());

        assert_eq!(de.gettext("Hello"), "Hallo");
        assert_eq!(de.ngettext("day", "days", 2), "Tage");
        assert_eq!(de.dgettext("admin", "Hello"), "Guten Tag");
        assert_eq!(gt.gettext("Hello"), "Guten Tag");
    }

    #[test]
    fn concurrent_locales() {
        let gt = gettext();
        let handles: Vec<_> = [("de", "Tage"), ("pl", "dni")]
            .into_iter()
            .map(|(locale, expected)| {
                let t = gt.bind_locale(locale, None);
                thread::spawn(move || {
                    for n in 2..100u32 {
                        let form = t.ngettext("day", "days", n);
                        if n % 10 == 2 {
                            assert_eq!(form, expected);
                        }
                    }
                    t.gettext("Hello").to_owned()
                })
            })
            .collect();
        let results: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(results, vec!["Hallo", "Cześć"]);
    }

    #[test]
    fn shares_listeners() {
        let gt = gettext();
        let t = gt.bind_locale("de", Some("admin"));
        let seen = recorder(gt.warnings());
        assert_eq!(t.gettext("Goodbye"), "Goodbye");
        assert_eq!(t.ngettext("day", "days", 3), "days");
        let kinds: Vec<_> = seen.lock().unwrap().iter().map(|w| w.kind()).collect();
        assert_eq!(kinds, vec![WarningKind::NoTranslation, WarningKind::NoTranslation]);
    }

    #[test]
    fn untranslated_binding_returns_sources() {
        let gt = gettext();
        let t = gt.bind_locale(["sv", "nb"], None);
        assert_eq!(t.locale(), "");
        assert_eq!(t.gettext("Hello"), "Hello");
        assert_eq!(t.dnpgettext("messages", "", "day", Some("days"), 1), "day");
        assert!(t.get_comment("messages", "", "Hello").is_empty());
    }
}
