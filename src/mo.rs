//! Reading of compiled gettext [Machine Objects][MO]
//!
//! An MO file is a table of original strings and a parallel table of translations, as written
//! by `msgfmt`. Context is prefixed to the original, separated by `\x04`. Plural ids and plural
//! forms are joined with `\0`. The translation of the empty original is the header.
//!
//! Strings are decoded as UTF-8; invalid sequences are replaced.
//!
//! [MO]: https://www.gnu.org/software/gettext/manual/html_node/MO-Files.html

use std::io::Read;

use super::catalog::{DomainCatalog, Translation};
use super::Error;

const MAGIC: u32 = 0x9504_12de;
const HEADER_LEN: usize = 28;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Endian {
    Little,
    Big,
}

struct MoData<'a> {
    data: &'a [u8],
    endian: Endian,
}

impl<'a> MoData<'a> {
    fn u32_at(&self, offset: usize) -> Result<u32, Error> {
        let bytes: [u8; 4] = offset
            .checked_add(4)
            .and_then(|end| self.data.get(offset..end))
            .and_then(|b| b.try_into().ok())
            .ok_or_else(|| Error::Mo(format!("offset {} is past the end of the file", offset)))?;
        Ok(match self.endian {
            Endian::Little => u32::from_le_bytes(bytes),
            Endian::Big => u32::from_be_bytes(bytes),
        })
    }

    /// String `index` of the table at `table`.
    fn string(&self, table: usize, index: usize) -> Result<&'a [u8], Error> {
        let entry = index
            .checked_mul(8)
            .and_then(|o| o.checked_add(table))
            .ok_or_else(|| Error::Mo(format!("string table entry {} overflows", index)))?;
        let len = self.u32_at(entry)? as usize;
        let start = self.u32_at(entry + 4)? as usize;
        start
            .checked_add(len)
            .and_then(|end| self.data.get(start..end))
            .ok_or_else(|| {
                Error::Mo(format!(
                    "string {} ({} bytes at {}) is past the end of the file",
                    index, len, start
                ))
            })
    }
}

fn decode(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Parses an MO file held in memory.
pub fn parse_mo(data: &[u8]) -> Result<DomainCatalog, Error> {
    if data.len() < HEADER_LEN {
        return Err(Error::Mo(format!("file too short ({} bytes)", data.len())));
    }
    let endian = if data[..4] == MAGIC.to_le_bytes() {
        Endian::Little
    } else if data[..4] == MAGIC.to_be_bytes() {
        Endian::Big
    } else {
        return Err(Error::Mo("bad magic number".to_owned()));
    };
    let mo = MoData { data, endian };

    let revision = mo.u32_at(4)?;
    if revision >> 16 > 1 {
        return Err(Error::Mo(format!("unsupported revision {:#x}", revision)));
    }
    let count = mo.u32_at(8)? as usize;
    let originals = mo.u32_at(12)? as usize;
    let translations = mo.u32_at(16)? as usize;

    let mut catalog = DomainCatalog::new();
    let mut header = None;
    for i in 0..count {
        let original = mo.string(originals, i)?;
        let translated = mo.string(translations, i)?;

        let (context, id) = match original.iter().position(|&b| b == 0x04) {
            Some(p) => (Some(decode(&original[..p])), &original[(p + 1)..]),
            None => (None, original),
        };
        let mut ids = id.split(|&b| b == 0);
        let msgid = decode(ids.next().unwrap_or_default());
        let msgid_plural = ids.next().map(decode);
        let msgstr: Vec<String> = if msgid_plural.is_some() {
            translated.split(|&b| b == 0).map(decode).collect()
        } else {
            vec![decode(translated)]
        };

        if context.is_none() && msgid.is_empty() {
            header = msgstr.first().cloned();
        }
        let key = context.clone().unwrap_or_default();
        catalog.insert(
            key,
            Translation { msgctxt: context, msgid, msgid_plural, msgstr, comments: None },
        );
    }
    if let Some(text) = header {
        catalog.set_header_text(&text);
    }
    tracing::debug!(entries = catalog.len(), ?endian, revision, "read MO catalog");
    Ok(catalog)
}

/// Reads an MO file from a stream.
pub fn read_mo<R: Read>(mut reader: R) -> Result<DomainCatalog, Error> {
    let mut data = Vec::new();
    reader
        .read_to_end(&mut data)
        .map_err(|e| Error::Io { line: 0, source: e })?;
    parse_mo(&data)
}

/// Writes minimal MO files for tests.
#[cfg(test)]
pub(crate) mod build {
    /// Builds an MO file from `(original, translation)` pairs, already encoded with `\x04` and
    /// `\0` separators.
    pub fn mo_file(entries: &[(&str, &str)], big_endian: bool) -> Vec<u8> {
        let mut entries = entries.to_vec();
        entries.sort();
        let n = entries.len() as u32;
        let originals = 28u32;
        let translations = originals + 8 * n;
        let mut strings = translations + 8 * n;

        let word = |v: u32| if big_endian { v.to_be_bytes() } else { v.to_le_bytes() };
        let mut out = Vec::new();
        for v in [0x9504_12de, 0, n, originals, translations, 0, strings] {
            out.extend(word(v));
        }
        let mut data = Vec::new();
        let mut table = |s: &str, out: &mut Vec<u8>| {
            out.extend(word(s.len() as u32));
            out.extend(word(strings));
            data.extend(s.as_bytes());
            data.push(0);
            strings += s.len() as u32 + 1;
        };
        for (o, _) in &entries {
            table(o, &mut out);
        }
        for (_, t) in &entries {
            table(t, &mut out);
        }
        out.extend(data);
        out
    }
}
