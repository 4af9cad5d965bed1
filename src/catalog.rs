//! The in-memory shape of a translation catalogue.
//!
//! This is the shape produced by the readers in this crate and, in JSON form, by other gettext
//! toolchains: a catalogue per domain with its charset, its header fields and its translations
//! grouped by context and message id.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::io::Read;

use super::Error;

/// Translations for one domain, keyed by context (empty string for no context) and message id.
pub type ContextTable = HashMap<String, HashMap<String, Translation>>;

/// Catalogues keyed by locale and domain, as returned by the [loaders](crate::loaders).
pub type Translations = BTreeMap<String, BTreeMap<String, DomainCatalog>>;

/// Comments attached to a catalogue entry.
///
/// Multi-line comments are joined with `\n`. All fields are absent for entries without comments.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Comments {
    /// Comment from translator (`# …`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translator: Option<String>,
    /// Comment from developer, extracted from the source (`#. …`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted: Option<String>,
    /// Source references (`#: file:line`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Flags such as `fuzzy` or `c-format` (`#, …`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flag: Option<String>,
    /// Previous context and source of fuzzy entries (`#| …`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<String>,
}

pub(crate) static NO_COMMENTS: Comments = Comments::EMPTY;

impl Comments {
    /// Comments with no fields set.
    pub const EMPTY: Comments = Comments {
        translator: None,
        extracted: None,
        reference: None,
        flag: None,
        previous: None,
    };

    /// Returns whether no comment is set.
    pub fn is_empty(&self) -> bool {
        *self == Comments::EMPTY
    }

    /// Returns whether the flags contain `flag`.
    pub fn has_flag(&self, flag: &str) -> bool {
        self.flag
            .as_ref()
            .map_or(false, |f| f.split(|c| c == ',' || c == '\n').any(|s| s.trim() == flag))
    }

    pub(crate) fn append(field: &mut Option<String>, line: &str) {
        match field {
            Some(s) => {
                s.push('\n');
                s.push_str(line);
            }
            None => *field = Some(line.to_owned()),
        }
    }
}

/// One message of a catalogue with its translations.
///
/// `msgstr` is indexed by plural form; index 0 is the singular. Entries without a plural id
/// only have index 0.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msgctxt: Option<String>,
    pub msgid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msgid_plural: Option<String>,
    #[serde(default)]
    pub msgstr: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<Comments>,
}

impl Translation {
    /// Singular entry.
    pub fn new(msgid: impl Into<String>, msgstr: impl Into<String>) -> Self {
        Translation {
            msgid: msgid.into(),
            msgstr: vec![msgstr.into()],
            ..Translation::default()
        }
    }

    /// Entry with a plural id and one translation per plural form.
    pub fn plural<I, S>(msgid: impl Into<String>, msgid_plural: impl Into<String>, forms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Translation {
            msgid: msgid.into(),
            msgid_plural: Some(msgid_plural.into()),
            msgstr: forms.into_iter().map(Into::into).collect(),
            ..Translation::default()
        }
    }

    pub fn with_context(mut self, msgctxt: impl Into<String>) -> Self {
        self.msgctxt = Some(msgctxt.into());
        self
    }

    pub fn with_comments(mut self, comments: Comments) -> Self {
        self.comments = Some(comments);
        self
    }

    /// Translation for plural form `index`, if present and not blank.
    pub fn form(&self, index: usize) -> Option<&str> {
        self.msgstr
            .get(index)
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }
}

/// All translations of one domain in one locale.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomainCatalog {
    pub charset: String,
    pub headers: BTreeMap<String, String>,
    pub translations: ContextTable,
}

impl DomainCatalog {
    pub fn new() -> Self {
        DomainCatalog::default()
    }

    /// Builder variant of setting a header field.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Inserts `translation` under `context`, replacing an entry with the same id.
    pub fn insert(&mut self, context: impl Into<String>, translation: Translation) {
        self.translations
            .entry(context.into())
            .or_default()
            .insert(translation.msgid.clone(), translation);
    }

    pub fn lookup(&self, context: &str, msgid: &str) -> Option<&Translation> {
        self.translations.get(context)?.get(msgid)
    }

    /// Header field `name`. Exact spelling is preferred, then a case-insensitive match.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(name)
            .or_else(|| {
                self.headers
                    .iter()
                    .find(|(k, _)| k.eq_ignore_ascii_case(name))
                    .map(|(_, v)| v)
            })
            .map(String::as_str)
    }

    /// The declared `Plural-Forms` header, if any.
    pub fn plural_forms(&self) -> Option<&str> {
        self.header("Plural-Forms").filter(|h| !h.trim().is_empty())
    }

    /// Number of entries over all contexts.
    pub fn len(&self) -> usize {
        self.translations.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn from_json(src: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(src)?)
    }

    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, Error> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Fills headers and charset from the translation of the header entry (empty msgid).
    pub(crate) fn set_header_text(&mut self, text: &str) {
        for line in text.split('\n') {
            if let Some(n) = line.find(':') {
                let key = line[..n].trim();
                let val = line[(n + 1)..].trim();
                if !key.is_empty() {
                    self.headers.insert(key.to_owned(), val.to_owned());
                }
            }
        }
        if let Some(cs) = self.header("Content-Type").and_then(charset_of) {
            self.charset = cs.to_owned();
        }
    }
}

fn charset_of(content_type: &str) -> Option<&str> {
    content_type
        .split(';')
        .filter_map(|p| p.trim().strip_prefix("charset="))
        .map(str::trim)
        .find(|cs| !cs.is_empty())
}
