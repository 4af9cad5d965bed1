//! Non-fatal diagnostics.
//!
//! Nothing in this crate fails because a translation is missing or a setting is unusable. Such
//! conditions are reported as [`Warning`]s to listeners registered on a [`WarningSink`]. A
//! listener that wants strict behaviour (for example failing a test run on missing translations)
//! can record or escalate them.

use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

/// A diagnostic event.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Warning {
    /// A lookup found no translation and fell back to the source string.
    #[error("No translation was found for msgid \"{msgid}\" in msgctxt \"{context}\" and domain \"{domain}\" (locale \"{locale}\")")]
    NoTranslation {
        locale: String,
        domain: String,
        context: String,
        msgid: String,
    },
    /// A setter or binding got a value it cannot use; the previous state was kept.
    #[error("Invalid {argument} {value:?}: {reason}")]
    InvalidArgument {
        argument: &'static str,
        value: String,
        reason: &'static str,
    },
    /// The selected locale has no catalogues and is not the source locale.
    #[error("The locale \"{locale}\" does not have translations in the catalogs")]
    UntranslatedLocale { locale: String },
    /// None of the preferred locales has catalogues.
    #[error("None of the locales {candidates:?} have translations in the catalogs")]
    NoMatchingLocale { candidates: Vec<String> },
    /// The `Plural-Forms` header of a catalogue is not a known formula.
    #[error("Unknown Plural-Forms \"{header}\" in domain \"{domain}\" of locale \"{locale}\"")]
    UnknownPluralForms {
        locale: String,
        domain: String,
        header: String,
    },
    /// No plural rule is known for the locale; two forms with singular for one are assumed.
    #[error("No plural rule found for locale \"{locale}\", using the default (n != 1)")]
    PluralFallback { locale: String },
}

/// Discriminant of [`Warning`], for subscribing to one kind only.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum WarningKind {
    NoTranslation,
    InvalidArgument,
    UntranslatedLocale,
    NoMatchingLocale,
    UnknownPluralForms,
    PluralFallback,
}

impl Warning {
    pub fn kind(&self) -> WarningKind {
        match self {
            Warning::NoTranslation { .. } => WarningKind::NoTranslation,
            Warning::InvalidArgument { .. } => WarningKind::InvalidArgument,
            Warning::UntranslatedLocale { .. } => WarningKind::UntranslatedLocale,
            Warning::NoMatchingLocale { .. } => WarningKind::NoMatchingLocale,
            Warning::UnknownPluralForms { .. } => WarningKind::UnknownPluralForms,
            Warning::PluralFallback { .. } => WarningKind::PluralFallback,
        }
    }
}

/// Handle returned when registering a listener, used to remove it again.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Handler = Arc<dyn Fn(&Warning) + Send + Sync>;

struct Listener {
    id: ListenerId,
    kind: Option<WarningKind>,
    handler: Handler,
}

#[derive(Default)]
struct Registry {
    listeners: RwLock<Vec<Listener>>,
    next_id: AtomicU64,
    debug: AtomicBool,
}

/// Registry of warning listeners.
///
/// Clones share the registry, so a listener added through any clone hears warnings emitted
/// through all of them.
///
/// Listeners run synchronously, in registration order, on the thread that emitted the warning.
/// A listener that panics is logged and skipped; the remaining listeners still run. Listeners may
/// add or remove listeners; the change applies from the next warning.
///
/// In debug mode every warning is also logged with [`tracing::warn!`].
#[derive(Clone, Default)]
pub struct WarningSink {
    inner: Arc<Registry>,
}

impl WarningSink {
    pub fn new() -> Self {
        WarningSink::default()
    }

    /// Registers `handler` for all warnings.
    pub fn on<F>(&self, handler: F) -> ListenerId
    where
        F: Fn(&Warning) + Send + Sync + 'static,
    {
        self.register(None, Arc::new(handler))
    }

    /// Registers `handler` for warnings of `kind` only.
    pub fn on_kind<F>(&self, kind: WarningKind, handler: F) -> ListenerId
    where
        F: Fn(&Warning) + Send + Sync + 'static,
    {
        self.register(Some(kind), Arc::new(handler))
    }

    /// Removes a listener. Returns whether it was registered.
    pub fn off(&self, id: ListenerId) -> bool {
        let mut listeners = self
            .inner
            .listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let before = listeners.len();
        listeners.retain(|l| l.id != id);
        listeners.len() != before
    }

    /// Delivers `warning` to the matching listeners.
    pub fn emit(&self, warning: &Warning) {
        if self.is_debug() {
            tracing::warn!(kind = ?warning.kind(), "{}", warning);
        }

        // Handlers are called without holding the lock so they can (un)register listeners.
        let handlers: Vec<Handler> = self
            .inner
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|l| l.kind.map_or(true, |k| k == warning.kind()))
            .map(|l| l.handler.clone())
            .collect();

        for handler in handlers {
            if catch_unwind(AssertUnwindSafe(|| handler(warning))).is_err() {
                tracing::error!(kind = ?warning.kind(), "warning listener panicked");
            }
        }
    }

    pub fn is_debug(&self) -> bool {
        self.inner.debug.load(Ordering::Relaxed)
    }

    pub fn set_debug(&self, debug: bool) {
        self.inner.debug.store(debug, Ordering::Relaxed);
    }

    fn register(&self, kind: Option<WarningKind>, handler: Handler) -> ListenerId {
        let id = ListenerId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        self.inner
            .listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Listener { id, kind, handler });
        id
    }
}

impl fmt::Debug for WarningSink {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let count = self
            .inner
            .listeners
            .read()
            .map(|l| l.len())
            .unwrap_or_default();
        f.debug_struct("WarningSink")
            .field("listeners", &count)
            .field("debug", &self.is_debug())
            .finish()
    }
}

/// Collects warnings for assertions in tests.
#[cfg(test)]
pub(crate) fn recorder(sink: &WarningSink) -> Arc<std::sync::Mutex<Vec<Warning>>> {
    let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
    let s = seen.clone();
    sink.on(move |w| s.lock().unwrap().push(w.clone()));
    seen
}
