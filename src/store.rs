//! Catalogues by locale and domain.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::catalog::{DomainCatalog, Translation};
use super::plural::PluralSelector;

/// A catalogue together with the plural rule chosen for it when it was added.
#[derive(Clone, Debug)]
struct Loaded {
    catalog: DomainCatalog,
    plural: PluralSelector,
}

/// Catalogues keyed by locale and domain.
///
/// The plural selector is resolved once per `(locale, domain)` and stored next to the catalogue,
/// so replacing a catalogue also replaces its rule and switching locales never reuses the rule of
/// another locale.
///
/// Cloning is cheap: the catalogues themselves are shared.
#[derive(Clone, Debug, Default)]
pub struct CatalogStore {
    locales: BTreeMap<String, BTreeMap<String, Arc<Loaded>>>,
}

impl CatalogStore {
    pub fn new() -> Self {
        CatalogStore::default()
    }

    /// Inserts or replaces the catalogue of `domain` in `locale`.
    pub fn insert(
        &mut self,
        locale: impl Into<String>,
        domain: impl Into<String>,
        catalog: DomainCatalog,
        plural: PluralSelector,
    ) {
        self.locales
            .entry(locale.into())
            .or_default()
            .insert(domain.into(), Arc::new(Loaded { catalog, plural }));
    }

    /// Locales with at least one domain, in sorted order.
    pub fn locales(&self) -> impl Iterator<Item = &str> {
        self.locales
            .iter()
            .filter(|(_, domains)| !domains.is_empty())
            .map(|(l, _)| l.as_str())
    }

    pub fn has_locale(&self, locale: &str) -> bool {
        self.locales.get(locale).map_or(false, |d| !d.is_empty())
    }

    /// Domains available in `locale`, in sorted order.
    pub fn domains<'a>(&'a self, locale: &str) -> impl Iterator<Item = &'a str> {
        self.locales
            .get(locale)
            .into_iter()
            .flat_map(|d| d.keys().map(String::as_str))
    }

    pub fn catalog(&self, locale: &str, domain: &str) -> Option<&DomainCatalog> {
        self.loaded(locale, domain).map(|l| &l.catalog)
    }

    /// The plural rule of the catalogue of `domain` in `locale`.
    pub fn plural(&self, locale: &str, domain: &str) -> Option<PluralSelector> {
        self.loaded(locale, domain).map(|l| l.plural)
    }

    pub fn lookup(
        &self,
        locale: &str,
        domain: &str,
        context: &str,
        msgid: &str,
    ) -> Option<&Translation> {
        self.catalog(locale, domain)?.lookup(context, msgid)
    }

    /// Record and plural rule in one step.
    pub(crate) fn lookup_with_plural(
        &self,
        locale: &str,
        domain: &str,
        context: &str,
        msgid: &str,
    ) -> Option<(&Translation, PluralSelector)> {
        let loaded = self.loaded(locale, domain)?;
        Some((loaded.catalog.lookup(context, msgid)?, loaded.plural))
    }

    fn loaded(&self, locale: &str, domain: &str) -> Option<&Loaded> {
        self.locales.get(locale)?.get(domain).map(|l| &**l)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plural;
    use pretty_assertions::assert_eq;

    fn catalog(msgid: &str, msgstr: &str) -> DomainCatalog {
        let mut cat = DomainCatalog::new();
        cat.insert("", Translation::new(msgid, msgstr));
        cat
    }

    #[test]
    fn insert_replaces() {
        let mut store = CatalogStore::new();
        store.insert("de", "messages", catalog("a", "A1"), PluralSelector::DEFAULT);
        store.insert("de", "messages", catalog("a", "A2"), PluralSelector::DEFAULT);
        assert_eq!(store.lookup("de", "messages", "", "a").unwrap().msgstr, vec!["A2"]);
        assert_eq!(store.domains("de").collect::<Vec<_>>(), vec!["messages"]);
    }

    #[test]
    fn locales_and_domains() {
        let mut store = CatalogStore::new();
        store.insert("fr", "b", catalog("x", "y"), PluralSelector::DEFAULT);
        store.insert("de", "a", catalog("x", "y"), PluralSelector::DEFAULT);
        store.insert("de", "b", catalog("x", "y"), PluralSelector::DEFAULT);
        assert_eq!(store.locales().collect::<Vec<_>>(), vec!["de", "fr"]);
        assert_eq!(store.domains("de").collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(store.domains("it").count(), 0);
        assert!(store.has_locale("fr"));
        assert!(!store.has_locale("it"));
    }

    #[test]
    fn lookup_misses() {
        let mut store = CatalogStore::new();
        store.insert("de", "messages", catalog("a", "A"), PluralSelector::DEFAULT);
        assert!(store.lookup("de", "messages", "ctx", "a").is_none());
        assert!(store.lookup("de", "other", "", "a").is_none());
        assert!(store.lookup("fr", "messages", "", "a").is_none());
    }

    #[test]
    fn plural_rule_is_per_locale_and_domain() {
        let mut store = CatalogStore::new();
        store.insert("ru", "messages", catalog("a", "A"), plural::resolve("ru", None).selector);
        store.insert("ja", "messages", catalog("a", "A"), plural::resolve("ja", None).selector);
        assert_eq!(store.plural("ru", "messages").unwrap().plural_count(), 3);
        assert_eq!(store.plural("ja", "messages").unwrap().plural_count(), 1);
        assert!(store.plural("ru", "other").is_none());
    }

    #[test]
    fn clones_are_snapshots() {
        let mut store = CatalogStore::new();
        store.insert("de", "messages", catalog("a", "A"), PluralSelector::DEFAULT);
        let snapshot = store.clone();
        store.insert("de", "messages", catalog("a", "B"), PluralSelector::DEFAULT);
        assert_eq!(snapshot.lookup("de", "messages", "", "a").unwrap().msgstr, vec!["A"]);
        assert_eq!(store.lookup("de", "messages", "", "a").unwrap().msgstr, vec!["B"]);
    }
}
