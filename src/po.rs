//! Reading of [Uniforum Portable Objects][PO]
//!
//! This is the text format of the [gettext] suite. It stores translation units with optional
//! context and plural variants, each preceded by comments:
//!
//! ```text
//! # translator comment
//! #. extracted comment
//! #: src/main.rs:12
//! #, fuzzy, c-format
//! #| msgid "previous source"
//! msgctxt "menu"
//! msgid "%d file"
//! msgid_plural "%d files"
//! msgstr[0] "%d fail"
//! msgstr[1] "%d faili"
//! ```
//!
//! Obsolete units are prefixed with `#~`. The unit with an empty `msgid` is the header; its
//! translation holds `Key: Value` lines such as `Language` and `Plural-Forms`.
//!
//! [PO]: https://www.gnu.org/software/gettext/manual/html_node/PO-Files.html
//! [gettext]: https://www.gnu.org/software/gettext/

use locale_config::LanguageRange;
use regex::{Captures, Regex};
use std::collections::{BTreeMap, HashMap};
use std::io::{BufRead, Lines};
use std::iter::Peekable;

use super::catalog::{Comments, DomainCatalog, Translation};
use super::Error;

#[derive(Clone, Debug)]
enum PoLine {
    // (number, kind (translator is space), content of the comment)
    Comment(usize, char, String),
    // (number, obsolete prefix, tag, string)
    Message(usize, String, String, String),
    // (number, obsolete prefix, string)
    Continuation(usize, String, String),
    // ()
    Blank,
}

struct LineIter<R: BufRead> {
    _n: usize,
    _inner: Lines<R>,
}

lazy_static! {
    static ref MESSAGE_RE: Regex = Regex::new(
        r#"^\s*(#~)?\s*(msgctxt|msgid|msgid_plural|msgstr(?:\[\d+\])?)?\s*"(.*)"\s*$"#)
        .unwrap();
    static ref COMMENT_RE: Regex = Regex::new(
        r#"^\s*#~?([:.,|]?)\s*(.*)"#).unwrap();

    static ref UNESCAPE_RE: Regex = Regex::new("\\\\[abfvrtn\"\\\\]").unwrap();
    static ref UNESCAPE_MAP: HashMap<&'static str, &'static str> = [
        (r"\a", "\x07"),
        (r"\b", "\x08"),
        (r"\f", "\x0c"),
        (r"\v", "\x0b"),
        (r"\r", "\r"),
        (r"\t", "\t"),
        (r"\n", "\n"),
        ("\\\"", "\""),
        (r"\\", r"\"),
    ].iter().cloned().collect();
}

fn unescape(s: &str) -> String {
    UNESCAPE_RE
        .replace_all(s, |d: &Captures| {
            UNESCAPE_MAP.get(&d[0]).copied().unwrap_or_default()
        })
        .into_owned()
}

fn parse_po_line(line: &str, n: usize) -> Option<PoLine> {
    if !line.contains(|c: char| !c.is_whitespace()) {
        return Some(PoLine::Blank);
    }
    if let Some(c) = MESSAGE_RE.captures(line) {
        let prefix = c.get(1).map_or("", |m| m.as_str()).to_owned();
        let string = unescape(&c[3]);
        return Some(match c.get(2) {
            Some(tag) => PoLine::Message(n, prefix, tag.as_str().to_owned(), string),
            None => PoLine::Continuation(n, prefix, string),
        });
    }
    COMMENT_RE.captures(line).map(|c| {
        PoLine::Comment(n, c[1].chars().next().unwrap_or(' '), c[2].to_owned())
    })
}

impl<R: BufRead> Iterator for LineIter<R> {
    type Item = Result<PoLine, Error>;
    fn next(&mut self) -> Option<Result<PoLine, Error>> {
        loop {
            let line = match self._inner.next()? {
                Ok(s) => s,
                Err(e) => return Some(Err(Error::Io { line: self._n + 1, source: e })),
            };
            self._n += 1;
            match parse_po_line(&line, self._n) {
                Some(PoLine::Blank) => (),
                Some(p) => return Some(Ok(p)),
                None => return Some(Err(Error::Parse(self._n, Some(line), Vec::new()))),
            }
        }
    }
}

impl<R: BufRead> LineIter<R> {
    fn new(r: R) -> LineIter<R> {
        LineIter {
            _n: 0,
            _inner: r.lines(),
        }
    }
}

trait MsgParser {
    fn parse_comments(&mut self, comments: &mut Comments);
    fn parse_msg(&mut self, tag: &str, obsolete: bool) -> Option<String>;
    fn expected<T>(&mut self, line: usize, exp: Vec<&'static str>) -> Result<T, Error>;
}

impl<R: BufRead> MsgParser for Peekable<LineIter<R>> {
    fn parse_comments(&mut self, comments: &mut Comments) {
        while let Some(Ok(PoLine::Comment(_, kind, s))) = self.next_if(|l| is!(l => Ok(PoLine::Comment(..)))) {
            let field = match kind {
                '.' => &mut comments.extracted,
                ':' => &mut comments.reference,
                ',' => &mut comments.flag,
                '|' => &mut comments.previous,
                _ => &mut comments.translator,
            };
            Comments::append(field, &s);
        }
    }

    // Errors are left in the stream, for `expected` or the next unit to report.
    fn parse_msg(&mut self, tag: &str, obsolete: bool) -> Option<String> {
        let (prefix, mut string) = match self.next_if(|l| {
            is!(l => Ok(PoLine::Message(_, p, t, _)) if t == tag && (p == "#~") == obsolete)
        }) {
            Some(Ok(PoLine::Message(_, p, _, s))) => (p, s),
            _ => return None, // Not the expected message
        };

        while let Some(Ok(PoLine::Continuation(_, _, s))) =
            self.next_if(|l| is!(l => Ok(PoLine::Continuation(_, p, _)) if *p == prefix))
        {
            string.push_str(&s);
        }
        Some(string)
    }

    fn expected<T>(&mut self, line: usize, exp: Vec<&'static str>) -> Result<T, Error> {
        Err(match self.next() {
            Some(Ok(PoLine::Message(n, _, t, _))) => Error::Parse(n, Some(t), exp),
            Some(Ok(PoLine::Continuation(n, ..))) => Error::Parse(n, Some("\"".to_owned()), exp),
            Some(Ok(PoLine::Comment(n, c, ..))) => Error::Parse(n, Some(format!("#{}", c)), exp),
            Some(Err(e)) => e,
            Some(Ok(PoLine::Blank)) | None => Error::Parse(line, None, exp),
        })
    }
}

/// One translation unit of a PO file.
#[derive(Clone, Debug, PartialEq)]
pub struct Unit {
    _context: String,
    _translation: Translation,
    _obsolete: bool,
}

impl Unit {
    /// The context (`msgctxt`), empty if there is none.
    pub fn context(&self) -> &str {
        &self._context
    }

    pub fn translation(&self) -> &Translation {
        &self._translation
    }

    /// Whether the unit was commented out with `#~`.
    pub fn is_obsolete(&self) -> bool {
        self._obsolete
    }

    /// Whether the unit is marked as needing review.
    pub fn is_fuzzy(&self) -> bool {
        self._translation
            .comments
            .as_ref()
            .map_or(false, |c| c.has_flag("fuzzy"))
    }

    pub fn into_translation(self) -> Translation {
        self._translation
    }

    fn is_header(&self) -> bool {
        !self._obsolete
            && self._context.is_empty()
            && self._translation.msgid.is_empty()
            && self._translation.msgid_plural.is_none()
    }
}

/// Iterator over the units of a PO file.
///
/// The header unit is consumed on construction; see [`headers`](Self::headers). Obsolete units
/// are returned and can be told apart with [`Unit::is_obsolete`]. Iteration stops after the first
/// error.
pub struct PoReader<R: BufRead> {
    _lines: Peekable<LineIter<R>>,
    _next_unit: Option<Result<Unit, Error>>,
    _header: Option<Unit>,
    _headers: BTreeMap<String, String>,
    _charset: String,
    _target_language: LanguageRange<'static>,
}

impl<R: BufRead> PoReader<R> {
    pub fn new(reader: R) -> Self {
        let mut res = PoReader {
            _lines: LineIter::new(reader).peekable(),
            _next_unit: None,
            _header: None,
            _headers: BTreeMap::new(),
            _charset: String::new(),
            _target_language: LanguageRange::invariant(),
        };
        res._next_unit = res.next_unit();
        if is!(&res._next_unit => Some(Ok(u)) if u.is_header()) {
            if let Some(Ok(u)) = res._next_unit.take() {
                res.parse_po_header(u);
            }
            res._next_unit = res.next_unit();
        }
        res
    }

    /// Fields of the header unit.
    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self._headers
    }

    /// Language declared in the `Language` header, invariant if none.
    pub fn target_language(&self) -> &LanguageRange<'static> {
        &self._target_language
    }

    /// Reads the remaining units into a catalogue, skipping obsolete ones.
    ///
    /// The header unit is kept as the entry with the empty id.
    pub fn into_catalog(mut self) -> Result<DomainCatalog, Error> {
        let mut catalog = DomainCatalog {
            charset: std::mem::take(&mut self._charset),
            headers: std::mem::take(&mut self._headers),
            ..DomainCatalog::default()
        };
        if let Some(h) = self._header.take() {
            catalog.insert(h._context, h._translation);
        }
        let mut obsolete = 0;
        for unit in self {
            let unit = unit?;
            if unit._obsolete {
                obsolete += 1;
                continue;
            }
            catalog.insert(unit._context, unit._translation);
        }
        tracing::debug!(entries = catalog.len(), obsolete, "read PO catalog");
        Ok(catalog)
    }

    fn parse_unit(&mut self) -> Result<Option<Unit>, Error> {
        let mut comments = Comments::default();
        self._lines.parse_comments(&mut comments);
        let (line, obsolete) = match self._lines.peek() {
            None => return Ok(None), // end if no unit (possibly after comments)
            Some(Ok(PoLine::Message(n, p, ..))) | Some(Ok(PoLine::Continuation(n, p, _))) => {
                (*n, p == "#~")
            }
            Some(Ok(PoLine::Comment(n, ..))) => (*n, false),
            Some(_) => (0, false),
        };

        let context = self._lines.parse_msg("msgctxt", obsolete);

        let msgid = match self._lines.parse_msg("msgid", obsolete) {
            Some(s) => s,
            None => return self._lines.expected(line, vec!["msgid"]),
        };
        let msgid_plural = self._lines.parse_msg("msgid_plural", obsolete);

        let mut msgstr = Vec::new();
        if msgid_plural.is_none() {
            match self._lines.parse_msg("msgstr", obsolete) {
                None => return self._lines.expected(line, vec!["msgstr"]),
                Some(s) => msgstr.push(s),
            }
        } else {
            while let Some(s) = self._lines.parse_msg(&format!("msgstr[{}]", msgstr.len()), obsolete) {
                msgstr.push(s);
            }
            if msgstr.is_empty() {
                return self._lines.expected(line, vec!["msgstr[0]"]);
            }
        }

        Ok(Some(Unit {
            _context: context.clone().unwrap_or_default(),
            _translation: Translation {
                msgctxt: context,
                msgid,
                msgid_plural,
                msgstr,
                comments: if comments.is_empty() { None } else { Some(comments) },
            },
            _obsolete: obsolete,
        }))
    }

    fn next_unit(&mut self) -> Option<Result<Unit, Error>> {
        self.parse_unit().transpose()
    }

    fn parse_po_header(&mut self, unit: Unit) {
        let mut parsed = DomainCatalog::new();
        parsed.set_header_text(unit._translation.form(0).unwrap_or(""));
        if let Some(lang) = parsed.header("Language").filter(|l| !l.is_empty()) {
            self._target_language = LanguageRange::new(lang)
                .map(LanguageRange::into_static)
                .or_else(|_| LanguageRange::from_unix(lang))
                .unwrap_or_else(|_| LanguageRange::invariant());
        }
        self._headers = parsed.headers;
        self._charset = parsed.charset;
        self._header = Some(unit);
    }
}

impl<R: BufRead> Iterator for PoReader<R> {
    type Item = Result<Unit, Error>;
    fn next(&mut self) -> Option<Result<Unit, Error>> {
        let res = self._next_unit.take()?;
        if res.is_ok() {
            self._next_unit = self.next_unit();
        }
        Some(res)
    }
}

/// Reads a PO file into a catalogue. See [`PoReader::into_catalog`].
pub fn read_po<R: BufRead>(reader: R) -> Result<DomainCatalog, Error> {
    PoReader::new(reader).into_catalog()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"# Estonian translation
msgid ""
msgstr ""
"Project-Id-Version: demo\n"
"Language: et_EE\n"
"Content-Type: text/plain; charset=utf-8\n"
"Plural-Forms: nplurals=2; plural=(n != 1);\n"

# translator says
# on two lines
#. developer says
#: src/a.rs:1 src/b.rs:2
#, fuzzy
#| msgid "old"
msgid "test"
msgstr "test "
"translated"

msgctxt "c2"
msgid "co2-1"
msgid_plural "co2-2"
msgstr[0] "ct2-1"
msgstr[1] "ct2-2"

msgid "tab\there"
msgstr "quote \" and \\ backslash\n"

#~ msgid "gone"
#~ msgstr "läinud"
"#;

    #[test]
    fn reads_units() {
        let units: Vec<Unit> = PoReader::new(SAMPLE.as_bytes())
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(units.len(), 4);

        assert_eq!(units[0].context(), "");
        assert_eq!(units[0].translation().msgstr, vec!["test translated"]);
        assert!(units[0].is_fuzzy());
        assert_eq!(
            units[0].translation().comments,
            Some(Comments {
                translator: Some("translator says\non two lines".into()),
                extracted: Some("developer says".into()),
                reference: Some("src/a.rs:1 src/b.rs:2".into()),
                flag: Some("fuzzy".into()),
                previous: Some("msgid \"old\"".into()),
            })
        );

        assert_eq!(units[1].context(), "c2");
        assert_eq!(units[1].translation().msgid_plural.as_deref(), Some("co2-2"));
        assert_eq!(units[1].translation().msgstr, vec!["ct2-1", "ct2-2"]);
        assert_eq!(units[1].translation().comments, None);

        assert_eq!(units[2].translation().msgid, "tab\there");
        assert_eq!(units[2].translation().msgstr, vec!["quote \" and \\ backslash\n"]);

        assert!(units[3].is_obsolete());
        assert_eq!(units[3].translation().msgid, "gone");
    }

    #[test]
    fn header() {
        let reader = PoReader::new(SAMPLE.as_bytes());
        assert_eq!(reader.headers().get("Project-Id-Version").map(String::as_str), Some("demo"));
        assert_eq!(*reader.target_language(), LanguageRange::new("et-EE").unwrap());
    }

    #[test]
    fn catalog() {
        let cat = read_po(SAMPLE.as_bytes()).unwrap();
        assert_eq!(cat.charset, "utf-8");
        assert_eq!(cat.plural_forms(), Some("nplurals=2; plural=(n != 1);"));
        assert_eq!(cat.len(), 4);
        assert!(cat.lookup("", "").unwrap().msgstr[0].starts_with("Project-Id-Version"));
        assert_eq!(cat.lookup("c2", "co2-1").unwrap().form(1), Some("ct2-2"));
        assert!(cat.lookup("", "gone").is_none());
    }

    #[test]
    fn no_header() {
        let cat = read_po("msgid \"a\"\nmsgstr \"b\"\n".as_bytes()).unwrap();
        assert!(cat.headers.is_empty());
        assert_eq!(cat.lookup("", "a").unwrap().msgstr, vec!["b"]);
        assert!(read_po("".as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn missing_msgstr() {
        let err = read_po("msgid \"a\"\n\nmsgid \"b\"\nmsgstr \"c\"\n".as_bytes()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Parse error at line 3, expected ‘msgstr’, got ‘msgid’"
        );
    }

    #[test]
    fn missing_plural_forms() {
        let err = read_po("msgid \"a\"\nmsgid_plural \"as\"\n".as_bytes()).unwrap_err();
        assert!(matches!(err, Error::Parse(1, None, ref exp) if exp == &vec!["msgstr[0]"]));
    }

    #[test]
    fn garbage_line() {
        let mut reader = PoReader::new("msgid \"a\"\nmsgstr \"b\"\nnonsense\n".as_bytes());
        assert!(reader.next().unwrap().is_ok());
        assert!(matches!(reader.next(), Some(Err(Error::Parse(3, Some(_), _)))));
        assert!(reader.next().is_none());
    }

    #[test]
    fn garbage_after_complete_units() {
        let src = "msgid \"a\"\nmsgid_plural \"as\"\nmsgstr[0] \"b\"\nmsgstr[1] \"bs\"\nnonsense\n";
        let mut reader = PoReader::new(src.as_bytes());
        let unit = reader.next().unwrap().unwrap();
        assert_eq!(unit.translation().msgstr, vec!["b", "bs"]);
        assert!(matches!(reader.next(), Some(Err(Error::Parse(5, Some(ref l), _))) if l == "nonsense"));
        assert!(reader.next().is_none());

        let src = "msgid \"a\"\nmsgstr \"\"\n\"b\"\nnonsense\n";
        let mut reader = PoReader::new(src.as_bytes());
        assert_eq!(reader.next().unwrap().unwrap().translation().msgstr, vec!["b"]);
        assert!(matches!(reader.next(), Some(Err(Error::Parse(4, ..)))));
    }

    #[test]
    fn garbage_inside_a_unit() {
        let mut reader = PoReader::new("msgid \"a\"\nnonsense\nmsgstr \"b\"\n".as_bytes());
        assert!(matches!(reader.next(), Some(Err(Error::Parse(2, Some(ref l), _))) if l == "nonsense"));
        assert!(reader.next().is_none());
    }
}
