//! Runtime lookup of translated messages in [gettext] style catalogues.
//!
//! A catalogue maps the messages of an application, possibly disambiguated with contexts, to
//! their translations, with a separate string for each plural form the target language has. This
//! crate keeps such catalogues in memory, per locale and per *domain* (an independent message set,
//! usually one per library), and answers the classic gettext calls against them:
//!
//! - [`Gettext`] is the stateful interface. It remembers a current locale and domain, changed with
//!   [`Gettext::set_locale`] and [`Gettext::set_text_domain`].
//! - [`BoundTranslator`] is obtained from [`Gettext::bind_locale`]. It captures one locale and
//!   domain and can be shared between threads serving different locales.
//!
//! Lookups never fail. When no translation exists the original message (or its plural) is
//! returned and a [`Warning`] is delivered to the listeners registered on the instance.
//!
//! Plural forms are selected by looking the catalogue's `Plural-Forms` header up in a table of
//! known formulae, falling back to a table keyed by locale. Formulae are not evaluated.
//!
//! Catalogues can be read from [Portable Objects (`.po`)][PO] with [`po`], from compiled
//! Machine Objects (`.mo`) with [`mo`], from directory trees with [`loaders`], or deserialized
//! from JSON.
//!
//! [PO]: https://www.gnu.org/software/gettext/manual/html_node/PO-Files.html
//! [gettext]: https://www.gnu.org/software/gettext/
//!
//! # Example
//!
//! ```
//! use translate_gettext::{DomainCatalog, Gettext, GettextOptions, Translation};
//!
//! let mut catalog = DomainCatalog::new()
//!     .with_header("Plural-Forms", "nplurals=2; plural=(n != 1);");
//! catalog.insert("", Translation::new("Hello", "Tere"));
//! catalog.insert("", Translation::plural("{} file", "{} files", ["{} fail", "{} faili"]));
//!
//! let mut gt = Gettext::new(GettextOptions::new().source_locale("en"));
//! gt.add_translations("et", "messages", catalog);
//! gt.set_locale("et");
//!
//! assert_eq!(gt.gettext("Hello"), "Tere");
//! assert_eq!(gt.ngettext("{} file", "{} files", 3), "{} faili");
//!
//! let en = gt.bind_locale("en", None);
//! assert_eq!(en.gettext("Hello"), "Hello");
//! ```

#[macro_use]
extern crate lazy_static;

use std::path::PathBuf;

// Auxiliary macro for match checking without holding on to the value:
macro_rules! is {
    ($x:expr => $p:pat) => {{
        match $x {
            $p => true,
            _ => false,
        }
    }};
    ($x:expr => $p:pat if $c:expr) => {{
        match $x {
            $p if $c => true,
            _ => false,
        }
    }};
}

mod bound;
mod catalog;
mod engine;
pub mod env;
mod gettext;
pub mod loaders;
pub mod mo;
mod options;
pub mod plural;
mod plural_table;
pub mod po;
mod store;
mod warning;

pub use bound::BoundTranslator;
pub use catalog::{Comments, ContextTable, DomainCatalog, Translation, Translations};
pub use engine::PluralCount;
pub use gettext::{Gettext, Locales, DEFAULT_DOMAIN};
pub use options::GettextOptions;
pub use plural::{Count, PluralSelector, Select};
pub use store::CatalogStore;
pub use warning::{ListenerId, Warning, WarningKind, WarningSink};

/// Error in reading a catalogue.
///
/// Translation lookups never produce errors; these only come from the readers and loaders.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An I/O error while reading a catalogue stream.
    ///
    /// `line` is the line number if applicable, zero otherwise.
    #[error("{}", io_message(.line, .source))]
    Io {
        line: usize,
        #[source]
        source: std::io::Error,
    },
    /// A file or directory could not be accessed.
    #[error("{}: {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A parse error.
    ///
    /// Parameters are line number, optional unexpected token and an array of expected tokens.
    /// Unset unexpected token means the parser is not smart enough to remember what it stopped on.
    /// Empty array of expected items means the parser is not smart enough to remember what it
    /// could have accepted instead.
    #[error("{}", parse_message(.0, .1, .2))]
    Parse(usize, Option<String>, Vec<&'static str>),
    /// A malformed binary (`.mo`) catalogue.
    #[error("invalid MO file: {0}")]
    Mo(String),
    /// A malformed JSON catalogue or configuration.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn io_message(line: &usize, err: &std::io::Error) -> String {
    match *line {
        0 => err.to_string(),
        n => format!("{} at line {}", err, n),
    }
}

fn parse_message(line: &usize, got: &Option<String>, exp: &[&'static str]) -> String {
    let mut res = format!("Parse error at line {}", line);
    let mut prefix = ", expected";
    for e in exp {
        res.push_str(&format!("{} ‘{}’", prefix, e));
        prefix = " or";
    }
    if let Some(g) = got {
        res.push_str(&format!(", got ‘{}’", g));
    }
    res
}
