//! Loading catalogues from directory trees.
//!
//! Both loaders return [`Translations`] holding each catalogue as domain
//! [`"messages"`](crate::DEFAULT_DOMAIN), ready for [`Gettext::extend`](crate::Gettext::extend):
//!
//! ```no_run
//! use translate_gettext::{loaders, Gettext};
//!
//! let mut gt = Gettext::default();
//! gt.extend(loaders::load_po_dir("po")?);
//! gt.extend(loaders::bindtextdomain("myapp", &["/usr/share/locale"])?);
//! # Ok::<(), translate_gettext::Error>(())
//! ```

use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

use tracing::debug;

use super::catalog::{DomainCatalog, Translations};
use super::gettext::DEFAULT_DOMAIN;
use super::{mo, po, Error};

fn file_error(path: &Path) -> impl FnOnce(std::io::Error) -> Error + '_ {
    move |source| Error::File { path: path.to_owned(), source }
}

fn store(translations: &mut Translations, locale: &str, catalog: DomainCatalog) {
    translations
        .entry(locale.to_owned())
        .or_default()
        .insert(DEFAULT_DOMAIN.to_owned(), catalog);
}

/// Loads `<dir>/<locale>.po` for every `.po` file in `dir`.
///
/// Fails if `dir` cannot be read or a file in it cannot be parsed.
pub fn load_po_dir<P: AsRef<Path>>(dir: P) -> Result<Translations, Error> {
    let dir = dir.as_ref();
    let mut translations = Translations::new();
    for entry in fs::read_dir(dir).map_err(file_error(dir))? {
        let path = entry.map_err(file_error(dir))?.path();
        let locale = match (path.extension(), path.file_stem().and_then(|s| s.to_str())) {
            (Some(ext), Some(stem)) if ext == "po" && path.is_file() => stem.to_owned(),
            _ => continue,
        };
        debug!(path = %path.display(), locale = %locale, "loading PO file");
        let file = File::open(&path).map_err(file_error(&path))?;
        store(&mut translations, &locale, po::read_po(BufReader::new(file))?);
    }
    Ok(translations)
}

/// Loads `<dir>/<locale>/LC_MESSAGES/<domain>.mo` for every locale directory in each of `dirs`,
/// the layout of `/usr/share/locale`.
///
/// Directories that do not exist and locales without the file are skipped. When several of
/// `dirs` have a catalogue for the same locale, the last one wins.
pub fn bindtextdomain<P: AsRef<Path>>(domain: &str, dirs: &[P]) -> Result<Translations, Error> {
    let mut translations = Translations::new();
    for dir in dirs.iter().map(AsRef::as_ref) {
        if !dir.is_dir() {
            debug!(dir = %dir.display(), "skipping missing locale directory");
            continue;
        }
        for entry in fs::read_dir(dir).map_err(file_error(dir))? {
            let locale_dir = entry.map_err(file_error(dir))?.path();
            let locale = match locale_dir.file_name().and_then(|s| s.to_str()) {
                Some(l) if locale_dir.is_dir() => l.to_owned(),
                _ => continue,
            };
            let path = locale_dir.join("LC_MESSAGES").join(format!("{}.mo", domain));
            if !path.is_file() {
                continue;
            }
            debug!(path = %path.display(), locale = %locale, "loading MO file");
            let file = File::open(&path).map_err(file_error(&path))?;
            store(&mut translations, &locale, mo::read_mo(BufReader::new(file))?);
        }
    }
    Ok(translations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mo::build::mo_file;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn po_directory() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("et.po"), "msgid \"Hello\"\nmsgstr \"Tere\"\n").unwrap();
        fs::write(dir.path().join("fi.po"), "msgid \"Hello\"\nmsgstr \"Hei\"\n").unwrap();
        fs::write(dir.path().join("README"), "not a catalogue").unwrap();
        fs::create_dir(dir.path().join("sv.po")).unwrap();

        let t = load_po_dir(dir.path()).unwrap();
        assert_eq!(t.keys().collect::<Vec<_>>(), vec!["et", "fi"]);
        let fi = &t["fi"]["messages"];
        assert_eq!(fi.lookup("", "Hello").unwrap().msgstr, vec!["Hei"]);
    }

    #[test]
    fn po_directory_errors() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing");
        assert!(matches!(load_po_dir(&missing), Err(Error::File { path, .. }) if path == missing));

        fs::write(dir.path().join("et.po"), "msgid \"Hello\"\n").unwrap();
        assert!(matches!(load_po_dir(dir.path()), Err(Error::Parse(..))));
    }

    #[test]
    fn mo_directories() {
        let first = tempdir().unwrap();
        let second = tempdir().unwrap();
        let write = |root: &Path, locale: &str, msgstr: &str| {
            let dir = root.join(locale).join("LC_MESSAGES");
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join("app.mo"), mo_file(&[("Hello", msgstr)], false)).unwrap();
        };
        write(first.path(), "de", "Hallo");
        write(first.path(), "et", "Tere");
        write(second.path(), "et", "Tervist");
        fs::create_dir_all(second.path().join("fr").join("LC_MESSAGES")).unwrap();
        fs::write(second.path().join("stray.mo"), b"").unwrap();

        let dirs = [
            first.path().to_owned(),
            first.path().join("nonexistent"),
            second.path().to_owned(),
        ];
        let t = bindtextdomain("app", &dirs).unwrap();
        assert_eq!(t.keys().collect::<Vec<_>>(), vec!["de", "et"]);
        assert_eq!(t["et"]["messages"].lookup("", "Hello").unwrap().msgstr, vec!["Tervist"]);
        assert!(bindtextdomain("other", &dirs).unwrap().is_empty());
    }
}
