//! The stateful interface.

use std::sync::Arc;

use tracing::debug;

use super::bound::BoundTranslator;
use super::catalog::{Comments, DomainCatalog, Translations};
use super::engine::{PluralCount, Translator};
use super::options::GettextOptions;
use super::plural::{self, Tier};
use super::store::CatalogStore;
use super::warning::{ListenerId, Warning, WarningKind, WarningSink};

/// Domain used when none is set.
pub const DEFAULT_DOMAIN: &str = "messages";

/// Locale selection for [`Gettext::bind_locale`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Locales {
    /// Do not translate; always return the source strings.
    Untranslated,
    /// Use this locale, whether catalogues for it exist or not.
    Exact(String),
    /// Use the first of these locales that has catalogues.
    Preferred(Vec<String>),
}

impl<'a> From<&'a str> for Locales {
    fn from(l: &'a str) -> Self {
        Locales::Exact(l.to_owned())
    }
}

impl From<String> for Locales {
    fn from(l: String) -> Self {
        Locales::Exact(l)
    }
}

impl From<Vec<String>> for Locales {
    fn from(l: Vec<String>) -> Self {
        Locales::Preferred(l)
    }
}

impl<'a> From<Vec<&'a str>> for Locales {
    fn from(l: Vec<&'a str>) -> Self {
        Locales::Preferred(l.into_iter().map(str::to_owned).collect())
    }
}

impl<'a, 'b> From<&'b [&'a str]> for Locales {
    fn from(l: &'b [&'a str]) -> Self {
        Locales::Preferred(l.iter().map(|s| (*s).to_owned()).collect())
    }
}

impl<'a, const N: usize> From<[&'a str; N]> for Locales {
    fn from(l: [&'a str; N]) -> Self {
        Locales::Preferred(l.iter().map(|s| (*s).to_owned()).collect())
    }
}

impl<T: Into<Locales>> From<Option<T>> for Locales {
    fn from(l: Option<T>) -> Self {
        l.map_or(Locales::Untranslated, Into::into)
    }
}

/// Translation catalogues with a current locale and domain.
///
/// The `*gettext` methods look messages up in the current locale and domain, or in the given
/// domain for the `d*` variants. Changes made with [`set_locale`](Self::set_locale) and
/// [`set_text_domain`](Self::set_text_domain) apply to the following calls.
///
/// Translators for a fixed locale, unaffected by later changes, are created with
/// [`bind_locale`](Self::bind_locale).
///
/// Problems are never returned as errors. They are reported as [`Warning`]s to the listeners
/// registered with [`on`](Self::on) and the state is left as it was.
#[derive(Clone, Debug)]
pub struct Gettext {
    store: Arc<CatalogStore>,
    source_locale: String,
    locale: String,
    domain: String,
    sink: WarningSink,
}

impl Default for Gettext {
    fn default() -> Self {
        Gettext::new(GettextOptions::default())
    }
}

impl Gettext {
    /// Creates an instance from `options`.
    ///
    /// A blank source locale and the plural rule problems of the initial catalogues are reported
    /// to [`GettextOptions::warnings`], if given.
    pub fn new(options: GettextOptions) -> Self {
        let sink = options.warnings.unwrap_or_default();
        sink.set_debug(options.debug);
        let mut gt = Gettext {
            store: Arc::default(),
            source_locale: String::new(),
            locale: String::new(),
            domain: DEFAULT_DOMAIN.to_owned(),
            sink,
        };
        match options.source_locale {
            Some(l) if l.trim().is_empty() => gt.invalid("source locale", &l, "must not be empty"),
            Some(l) => gt.source_locale = l,
            None => (),
        }
        gt.extend(options.translations);
        gt
    }

    // Listeners

    /// Registers a listener for all warnings.
    pub fn on<F>(&self, handler: F) -> ListenerId
    where
        F: Fn(&Warning) + Send + Sync + 'static,
    {
        self.sink.on(handler)
    }

    /// Registers a listener for one kind of warning.
    pub fn on_kind<F>(&self, kind: WarningKind, handler: F) -> ListenerId
    where
        F: Fn(&Warning) + Send + Sync + 'static,
    {
        self.sink.on_kind(kind, handler)
    }

    /// Removes a listener. Returns whether it was registered.
    pub fn off(&self, id: ListenerId) -> bool {
        self.sink.off(id)
    }

    /// The sink the warnings of this instance and its bound translators go to.
    pub fn warnings(&self) -> &WarningSink {
        &self.sink
    }

    pub fn is_debug(&self) -> bool {
        self.sink.is_debug()
    }

    // Catalogues

    /// Adds the catalogue of `domain` in `locale`, replacing a previous one.
    ///
    /// The plural rule of the catalogue is chosen here, from its `Plural-Forms` header or its
    /// locale. An unknown header or a locale without a known rule is reported.
    ///
    /// Translators bound before this call keep using the catalogues they were bound with.
    pub fn add_translations(&mut self, locale: &str, domain: &str, catalog: DomainCatalog) {
        let res = plural::resolve(locale, catalog.plural_forms());
        if res.unknown_header {
            self.sink.emit(&Warning::UnknownPluralForms {
                locale: locale.to_owned(),
                domain: domain.to_owned(),
                header: catalog.plural_forms().unwrap_or_default().to_owned(),
            });
        }
        if res.tier == Tier::Default {
            self.sink.emit(&Warning::PluralFallback { locale: locale.to_owned() });
        }
        debug!(
            locale,
            domain,
            entries = catalog.len(),
            nplurals = res.selector.plural_count(),
            "adding catalog"
        );
        Arc::make_mut(&mut self.store).insert(locale, domain, catalog, res.selector);
    }

    /// Adds catalogues for several locales and domains, e.g. from a [loader](crate::loaders).
    pub fn extend(&mut self, translations: Translations) {
        for (locale, domains) in translations {
            for (domain, catalog) in domains {
                self.add_translations(&locale, &domain, catalog);
            }
        }
    }

    /// Locales that have catalogues, in sorted order.
    pub fn locales(&self) -> Vec<&str> {
        self.store.locales().collect()
    }

    pub fn catalog(&self, locale: &str, domain: &str) -> Option<&DomainCatalog> {
        self.store.catalog(locale, domain)
    }

    pub fn store(&self) -> &CatalogStore {
        &self.store
    }

    // Current locale and domain

    pub fn source_locale(&self) -> &str {
        &self.source_locale
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Sets the current locale.
    ///
    /// A blank locale is rejected. A locale without catalogues is accepted (lookups will return
    /// the source strings) but reported unless it is the source locale.
    pub fn set_locale(&mut self, locale: &str) {
        if locale.trim().is_empty() {
            return self.invalid("locale", locale, "must not be empty");
        }
        if locale != self.source_locale && !self.store.has_locale(locale) {
            self.sink.emit(&Warning::UntranslatedLocale { locale: locale.to_owned() });
        }
        if self.locale != locale {
            debug!("Gettext::set_locale: {:?} -> {:?}", self.locale, locale);
            self.locale = locale.to_owned();
        }
    }

    /// Sets the current locale to the first of `locales` that has catalogues.
    ///
    /// Returns whether one was found; otherwise the locale is unchanged.
    pub fn set_first_available_locale<S: AsRef<str>>(&mut self, locales: &[S]) -> bool {
        match locales
            .iter()
            .map(AsRef::as_ref)
            .find(|l| self.store.has_locale(l))
        {
            Some(l) => {
                let l = l.to_owned();
                self.set_locale(&l);
                true
            }
            None => {
                self.sink.emit(&Warning::NoMatchingLocale {
                    candidates: locales.iter().map(|l| l.as_ref().to_owned()).collect(),
                });
                false
            }
        }
    }

    /// Sets the current domain. A blank domain is rejected.
    pub fn set_text_domain(&mut self, domain: &str) {
        if domain.trim().is_empty() {
            return self.invalid("domain", domain, "must not be empty");
        }
        if self.domain != domain {
            debug!("Gettext::set_text_domain: {:?} -> {:?}", self.domain, domain);
            self.domain = domain.to_owned();
        }
    }

    /// Same as [`set_text_domain`](Self::set_text_domain).
    pub fn textdomain(&mut self, domain: &str) {
        self.set_text_domain(domain)
    }

    // Binding

    /// Creates a translator for a fixed locale and domain (the default domain if `None`).
    ///
    /// A list of locales resolves to the first one that has catalogues. If none has, this is
    /// reported and the translator returns the source strings.
    pub fn bind_locale<L: Into<Locales>>(&self, locales: L, domain: Option<&str>) -> BoundTranslator {
        let locale = match locales.into() {
            Locales::Untranslated => String::new(),
            Locales::Exact(l) => {
                if l != self.source_locale && !self.store.has_locale(&l) {
                    self.sink.emit(&Warning::UntranslatedLocale { locale: l.clone() });
                }
                l
            }
            Locales::Preferred(mut list) => match list.iter().position(|l| self.store.has_locale(l)) {
                Some(i) => list.swap_remove(i),
                None => {
                    self.sink.emit(&Warning::NoMatchingLocale { candidates: list });
                    String::new()
                }
            },
        };
        let domain = match domain {
            Some(d) if d.trim().is_empty() => {
                self.invalid("domain", d, "must not be empty");
                DEFAULT_DOMAIN
            }
            Some(d) => d,
            None => DEFAULT_DOMAIN,
        };
        BoundTranslator::new(
            self.store.clone(),
            locale,
            domain.to_owned(),
            self.source_locale.clone(),
            self.sink.clone(),
        )
    }

    /// Same as [`bind_locale`](Self::bind_locale).
    pub fn with<L: Into<Locales>>(&self, locales: L, domain: Option<&str>) -> BoundTranslator {
        self.bind_locale(locales, domain)
    }

    // Lookups

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

    pub fn ngettext<'a, N>(&'a self, msgid: &'a str, msgid_plural: &'a str, n: N) -> &'a str
    where
        N: PluralCount,
    {
        self.translator()
            .resolve(&self.domain, "", msgid, Some(msgid_plural), n.plural_count())
    }

    pub fn dngettext<'a, N>(
        &'a self,
        domain: &str,
        msgid: &'a str,
        msgid_plural: &'a str,
        n: N,
    ) -> &'a str
    where
        N: PluralCount,
    {
        self.translator()
            .resolve(domain, "", msgid, Some(msgid_plural), n.plural_count())
    }

    pub fn pgettext<'a>(&'a self, msgctxt: &str, msgid: &'a str) -> &'a str {
        self.translator().resolve(&self.domain, msgctxt, msgid, None, None)
    }

    pub fn dpgettext<'a>(&'a self, domain: &str, msgctxt: &str, msgid: &'a str) -> &'a str {
        self.translator().resolve(domain, msgctxt, msgid, None, None)
    }

    pub fn npgettext<'a, N>(
        &'a self,
        msgctxt: &str,
        msgid: &'a str,
        msgid_plural: &'a str,
        n: N,
    ) -> &'a str
    where
        N: PluralCount,
    {
        self.translator()
            .resolve(&self.domain, msgctxt, msgid, Some(msgid_plural), n.plural_count())
    }

    /// The general form of all lookups. An empty `msgctxt` means no context; the plural id and
    /// count are optional.
    pub fn dnpgettext<'a, N>(
        &'a self,
        domain: &str,
        msgctxt: &str,
        msgid: &'a str,
        msgid_plural: Option<&'a str>,
        n: N,
    ) -> &'a str
    where
        N: PluralCount,
    {
        self.translator()
            .resolve(domain, msgctxt, msgid, msgid_plural, n.plural_count())
    }

    /// Comments of an entry in the current locale, empty if there is no such entry.
    pub fn get_comment(&self, domain: &str, msgctxt: &str, msgid: &str) -> &Comments {
        self.translator().comments(domain, msgctxt, msgid)
    }

    fn invalid(&self, argument: &'static str, value: &str, reason: &'static str) {
        self.sink.emit(&Warning::InvalidArgument {
            argument,
            value: value.to_owned(),
            reason,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Translation;
    use crate::warning::recorder;
    use pretty_assertions::assert_eq;

    fn estonian() -> DomainCatalog {
        let mut cat = DomainCatalog::new().with_header("Plural-Forms", "nplurals=2; plural=(n != 1);");
        cat.insert("", Translation::plural("o2-1", "o2-2", ["t2-1", "t2-2"]));
        cat.insert("c2", Translation::plural("co2-1", "co2-2", ["ct2-1", "ct2-2"]).with_context("c2"));
        cat
    }

    fn kinds(seen: &std::sync::Mutex<Vec<Warning>>) -> Vec<WarningKind> {
        seen.lock().unwrap().iter().map(Warning::kind).collect()
    }

    #[test]
    fn defaults() {
        let gt = Gettext::default();
        assert_eq!(gt.locale(), "");
        assert_eq!(gt.domain(), "messages");
        assert_eq!(gt.source_locale(), "");
        assert!(!gt.is_debug());
        assert!(gt.locales().is_empty());
    }

    #[test]
    fn options_are_applied() {
        let mut translations = Translations::new();
        translations
            .entry("et-EE".to_owned())
            .or_default()
            .insert("messages".to_owned(), estonian());
        let gt = Gettext::new(
            GettextOptions::new()
                .source_locale("01234")
                .debug(true)
                .translations(translations),
        );
        assert_eq!(gt.source_locale(), "01234");
        assert!(gt.is_debug());
        assert_eq!(gt.locales(), vec!["et-EE"]);
        assert_eq!(gt.catalog("et-EE", "messages").map(DomainCatalog::len), Some(2));
    }

    #[test]
    fn blank_source_locale_is_ignored() {
        let gt = Gettext::new(GettextOptions::new().source_locale("  "));
        assert_eq!(gt.source_locale(), "");
    }

    #[test]
    fn set_locale_accepts_any_non_blank_string() {
        let mut gt = Gettext::default();
        gt.set_locale("de-AT");
        assert_eq!(gt.locale(), "de-AT");
        gt.set_locale("01234");
        assert_eq!(gt.locale(), "01234");
    }

    #[test]
    fn set_locale_rejects_blank() {
        let mut gt = Gettext::default();
        let seen = recorder(gt.warnings());
        gt.set_locale("de-AT");
        gt.set_locale("");
        gt.set_locale("   ");
        assert_eq!(gt.locale(), "de-AT");
        assert_eq!(
            kinds(&seen),
            vec![
                WarningKind::UntranslatedLocale,
                WarningKind::InvalidArgument,
                WarningKind::InvalidArgument
            ]
        );
    }

    #[test]
    fn set_locale_without_catalogs_warns() {
        let mut gt = Gettext::default();
        let seen = recorder(gt.warnings());
        gt.set_locale("et-EE");
        assert_eq!(kinds(&seen), vec![WarningKind::UntranslatedLocale]);

        let mut gt = Gettext::new(GettextOptions::new().source_locale("en-US"));
        let seen = recorder(gt.warnings());
        gt.set_locale("en-US");
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn set_text_domain() {
        let mut gt = Gettext::default();
        let seen = recorder(gt.warnings());
        gt.set_text_domain("mydomain");
        assert_eq!(gt.domain(), "mydomain");
        gt.textdomain("01234");
        assert_eq!(gt.domain(), "01234");
        gt.set_text_domain("");
        assert_eq!(gt.domain(), "01234");
        assert_eq!(kinds(&seen), vec![WarningKind::InvalidArgument]);
    }

    #[test]
    fn first_available_locale() {
        let mut gt = Gettext::default();
        gt.add_translations("et-EE", "messages", estonian());
        gt.add_translations("fi", "messages", DomainCatalog::new());
        let seen = recorder(gt.warnings());

        assert!(gt.set_first_available_locale(&["de", "fi", "et-EE"]));
        assert_eq!(gt.locale(), "fi");

        assert!(!gt.set_first_available_locale(&["de", "sv"]));
        assert_eq!(gt.locale(), "fi");
        assert_eq!(
            *seen.lock().unwrap(),
            vec![Warning::NoMatchingLocale { candidates: vec!["de".into(), "sv".into()] }]
        );
    }

    #[test]
    fn plural_rule_warnings_on_add() {
        let mut gt = Gettext::default();
        let seen = recorder(gt.warnings());
        gt.add_translations("et", "messages", DomainCatalog::new());
        assert!(seen.lock().unwrap().is_empty());

        gt.add_translations(
            "tlh",
            "messages",
            DomainCatalog::new().with_header("Plural-Forms", "nplurals=9; plural=n%9;"),
        );
        assert_eq!(
            kinds(&seen),
            vec![WarningKind::UnknownPluralForms, WarningKind::PluralFallback]
        );
    }

    #[test]
    fn replacing_a_catalog_replaces_its_plural_rule() {
        let mut gt = Gettext::default();
        let mut cat = DomainCatalog::new().with_header("Plural-Forms", "nplurals=2; plural=(n > 1);");
        cat.insert("", Translation::plural("x", "xs", ["X1", "X2"]));
        gt.add_translations("fr", "messages", cat.clone());
        gt.set_locale("fr");
        assert_eq!(gt.ngettext("x", "xs", 0), "X1");

        cat.headers.insert("Plural-Forms".into(), "nplurals=2; plural=(n != 1);".into());
        gt.add_translations("fr", "messages", cat);
        assert_eq!(gt.ngettext("x", "xs", 0), "X2");
    }

    #[test]
    fn switching_locale_switches_plural_rule() {
        let mut gt = Gettext::default();
        let mut ru = DomainCatalog::new();
        ru.insert("", Translation::plural("x", "xs", ["r0", "r1", "r2"]));
        let mut ja = DomainCatalog::new();
        ja.insert("", Translation::plural("x", "xs", ["j0"]));
        gt.add_translations("ru", "messages", ru);
        gt.add_translations("ja", "messages", ja);

        gt.set_locale("ru");
        assert_eq!(gt.ngettext("x", "xs", 5), "r2");
        gt.set_locale("ja");
        assert_eq!(gt.ngettext("x", "xs", 5), "j0");
        gt.set_locale("ru");
        assert_eq!(gt.ngettext("x", "xs", 2), "r1");
    }

    #[test]
    fn bind_preferred_list() {
        let mut gt = Gettext::default();
        gt.add_translations("et-EE", "messages", estonian());
        let seen = recorder(gt.warnings());

        let t = gt.bind_locale(["de", "et-EE"], None);
        assert_eq!(t.locale(), "et-EE");
        assert_eq!(t.domain(), "messages");
        assert!(seen.lock().unwrap().is_empty());

        let t = gt.with(vec!["de", "sv"], Some("other"));
        assert_eq!(t.locale(), "");
        assert_eq!(t.domain(), "other");
        assert_eq!(kinds(&seen), vec![WarningKind::NoMatchingLocale]);
    }

    #[test]
    fn bind_exact_and_untranslated() {
        let mut gt = Gettext::new(GettextOptions::new().source_locale("en"));
        gt.add_translations("et-EE", "messages", estonian());
        let seen = recorder(gt.warnings());

        assert_eq!(gt.bind_locale("en", None).locale(), "en");
        assert_eq!(gt.bind_locale(None::<&str>, None).locale(), "");
        assert!(seen.lock().unwrap().is_empty());

        assert_eq!(gt.bind_locale(String::from("uk"), Some(" ")).domain(), "messages");
        assert_eq!(
            kinds(&seen),
            vec![WarningKind::UntranslatedLocale, WarningKind::InvalidArgument]
        );
    }
}
