//! Known plural rules, by `Plural-Forms` header and by locale.
//!
//! The header table holds the formulae as they are written by the gettext tools and common
//! translation platforms. Keys are stored without whitespace (see
//! [`normalize_header`](super::plural::normalize_header)).

use std::collections::HashMap;

use super::plural::{normalize_header, PluralSelector, Select};

// Rule functions. The expressions in the comments are the C formulae they implement.

// 0
fn only_one(_: u64) -> usize {
    0
}

// n != 1
fn germanic(n: u64) -> bool {
    n != 1
}

// n > 1
fn french(n: u64) -> bool {
    n > 1
}

// n%10==1 && n%100!=11 ? 0 : n%10>=2 && n%10<=4 && (n%100<10 || n%100>=20) ? 1 : 2
fn east_slavic(n: u64) -> usize {
    if n % 10 == 1 && n % 100 != 11 {
        0
    } else if (2..=4).contains(&(n % 10)) && (n % 100 < 10 || n % 100 >= 20) {
        1
    } else {
        2
    }
}

// n==1 ? 0 : n%10>=2 && n%10<=4 && (n%100<10 || n%100>=20) ? 1 : 2
fn polish(n: u64) -> usize {
    if n == 1 {
        0
    } else if (2..=4).contains(&(n % 10)) && (n % 100 < 10 || n % 100 >= 20) {
        1
    } else {
        2
    }
}

// (n==1) ? 0 : (n>=2 && n<=4) ? 1 : 2
fn czech(n: u64) -> usize {
    match n {
        1 => 0,
        2..=4 => 1,
        _ => 2,
    }
}

// n%100==1 ? 0 : n%100==2 ? 1 : n%100==3 || n%100==4 ? 2 : 3
fn slovenian(n: u64) -> usize {
    match n % 100 {
        1 => 0,
        2 => 1,
        3 | 4 => 2,
        _ => 3,
    }
}

// n==0 ? 0 : n==1 ? 1 : n==2 ? 2 : n%100>=3 && n%100<=10 ? 3 : n%100>=11 ? 4 : 5
fn arabic(n: u64) -> usize {
    match n {
        0 => 0,
        1 => 1,
        2 => 2,
        _ if (3..=10).contains(&(n % 100)) => 3,
        _ if n % 100 >= 11 => 4,
        _ => 5,
    }
}

// n==1 ? 0 : n==2 ? 1 : n<7 ? 2 : n<11 ? 3 : 4
fn irish(n: u64) -> usize {
    match n {
        1 => 0,
        2 => 1,
        _ if n < 7 => 2,
        _ if n < 11 => 3,
        _ => 4,
    }
}

// n%10==1 && n%100!=11 ? 0 : n%10>=2 && (n%100<10 || n%100>=20) ? 1 : 2
fn lithuanian(n: u64) -> usize {
    if n % 10 == 1 && n % 100 != 11 {
        0
    } else if n % 10 >= 2 && (n % 100 < 10 || n % 100 >= 20) {
        1
    } else {
        2
    }
}

// n%10==1 && n%100!=11 ? 0 : n != 0 ? 1 : 2
fn latvian(n: u64) -> usize {
    if n % 10 == 1 && n % 100 != 11 {
        0
    } else if n != 0 {
        1
    } else {
        2
    }
}

// n==1 ? 0 : (n==0 || (n%100 > 0 && n%100 < 20)) ? 1 : 2
fn romanian(n: u64) -> usize {
    if n == 1 {
        0
    } else if n == 0 || (n % 100 > 0 && n % 100 < 20) {
        1
    } else {
        2
    }
}

// (n==1) ? 0 : (n==2) ? 1 : (n != 8 && n != 11) ? 2 : 3
fn welsh(n: u64) -> usize {
    match n {
        1 => 0,
        2 => 1,
        8 | 11 => 3,
        _ => 2,
    }
}

// n%10!=1 || n%100==11
fn icelandic(n: u64) -> bool {
    n % 10 != 1 || n % 100 == 11
}

// n==1 || n%10==1 ? 0 : 1
fn macedonian(n: u64) -> usize {
    if n == 1 || n % 10 == 1 {
        0
    } else {
        1
    }
}

// (n==1 || n==11) ? 0 : (n==2 || n==12) ? 1 : (n > 2 && n < 20) ? 2 : 3
fn scottish_gaelic(n: u64) -> usize {
    match n {
        1 | 11 => 0,
        2 | 12 => 1,
        3..=19 => 2,
        _ => 3,
    }
}

// n==1 ? 0 : n==0 || (n%100>1 && n%100<11) ? 1 : (n%100>10 && n%100<20) ? 2 : 3
fn maltese(n: u64) -> usize {
    if n == 1 {
        0
    } else if n == 0 || (n % 100 > 1 && n % 100 < 11) {
        1
    } else if n % 100 > 10 && n % 100 < 20 {
        2
    } else {
        3
    }
}

// Negative and fractional counts take the form their formula gives for 1.5, which is the last
// form unless set here.
const ONE_FORM: PluralSelector = PluralSelector::new(1, Select::Index(only_one));
const GERMANIC: PluralSelector = PluralSelector::new(2, Select::Bool(germanic));
const FRENCH: PluralSelector = PluralSelector::new(2, Select::Bool(french));
const EAST_SLAVIC: PluralSelector = PluralSelector::new(3, Select::Index(east_slavic));
const POLISH: PluralSelector = PluralSelector::new(3, Select::Index(polish));
const CZECH: PluralSelector = PluralSelector::new(3, Select::Index(czech));
const SLOVENIAN: PluralSelector = PluralSelector::new(4, Select::Index(slovenian));
const ARABIC: PluralSelector = PluralSelector::new(6, Select::Index(arabic));
const IRISH: PluralSelector =
    PluralSelector::new(5, Select::Index(irish)).with_fraction_form(2);
const LITHUANIAN: PluralSelector = PluralSelector::new(3, Select::Index(lithuanian));
const LATVIAN: PluralSelector =
    PluralSelector::new(3, Select::Index(latvian)).with_fraction_form(1);
const ROMANIAN: PluralSelector =
    PluralSelector::new(3, Select::Index(romanian)).with_fraction_form(1);
const WELSH: PluralSelector =
    PluralSelector::new(4, Select::Index(welsh)).with_fraction_form(2);
const ICELANDIC: PluralSelector = PluralSelector::new(2, Select::Bool(icelandic));
const MACEDONIAN: PluralSelector = PluralSelector::new(2, Select::Index(macedonian));
const SCOTTISH_GAELIC: PluralSelector = PluralSelector::new(4, Select::Index(scottish_gaelic));
const MALTESE: PluralSelector =
    PluralSelector::new(4, Select::Index(maltese)).with_fraction_form(1);

const HEADERS: &[(&str, PluralSelector)] = &[
    ("nplurals=1; plural=0;", ONE_FORM),
    ("nplurals=1; plural=0", ONE_FORM),
    ("nplurals=2; plural=(n != 1);", GERMANIC),
    ("nplurals=2; plural=n != 1;", GERMANIC),
    ("nplurals=2; plural=(n > 1);", FRENCH),
    ("nplurals=2; plural=n > 1;", FRENCH),
    (
        "nplurals=3; plural=(n%10==1 && n%100!=11 ? 0 : n%10>=2 && n%10<=4 && (n%100<10 || n%100>=20) ? 1 : 2);",
        EAST_SLAVIC,
    ),
    (
        "nplurals=3; plural=n%10==1 && n%100!=11 ? 0 : n%10>=2 && n%10<=4 && (n%100<10 || n%100>=20) ? 1 : 2;",
        EAST_SLAVIC,
    ),
    (
        "nplurals=3; plural=(n==1 ? 0 : n%10>=2 && n%10<=4 && (n%100<10 || n%100>=20) ? 1 : 2);",
        POLISH,
    ),
    (
        "nplurals=3; plural=n==1 ? 0 : n%10>=2 && n%10<=4 && (n%100<10 || n%100>=20) ? 1 : 2;",
        POLISH,
    ),
    ("nplurals=3; plural=(n==1) ? 0 : (n>=2 && n<=4) ? 1 : 2;", CZECH),
    ("nplurals=3; plural=(n==1 ? 0 : (n>=2 && n<=4) ? 1 : 2);", CZECH),
    (
        "nplurals=4; plural=(n%100==1 ? 0 : n%100==2 ? 1 : n%100==3 || n%100==4 ? 2 : 3);",
        SLOVENIAN,
    ),
    (
        "nplurals=6; plural=(n==0 ? 0 : n==1 ? 1 : n==2 ? 2 : n%100>=3 && n%100<=10 ? 3 : n%100>=11 ? 4 : 5);",
        ARABIC,
    ),
    (
        "nplurals=5; plural=(n==1 ? 0 : n==2 ? 1 : n<7 ? 2 : n<11 ? 3 : 4);",
        IRISH,
    ),
    (
        "nplurals=3; plural=(n%10==1 && n%100!=11 ? 0 : n%10>=2 && (n%100<10 || n%100>=20) ? 1 : 2);",
        LITHUANIAN,
    ),
    (
        "nplurals=3; plural=(n%10==1 && n%100!=11 ? 0 : n != 0 ? 1 : 2);",
        LATVIAN,
    ),
    (
        "nplurals=3; plural=(n==1 ? 0 : (n==0 || (n%100 > 0 && n%100 < 20)) ? 1 : 2);",
        ROMANIAN,
    ),
    (
        "nplurals=4; plural=(n==1) ? 0 : (n==2) ? 1 : (n != 8 && n != 11) ? 2 : 3;",
        WELSH,
    ),
    ("nplurals=2; plural=(n%10!=1 || n%100==11);", ICELANDIC),
    ("nplurals=2; plural= n==1 || n%10==1 ? 0 : 1;", MACEDONIAN),
    (
        "nplurals=4; plural=(n==1 || n==11) ? 0 : (n==2 || n==12) ? 1 : (n > 2 && n < 20) ? 2 : 3;",
        SCOTTISH_GAELIC,
    ),
    (
        "nplurals=4; plural=(n==1 ? 0 : n==0 || ( n%100>1 && n%100<11) ? 1 : (n%100>10 && n%100<20 ) ? 2 : 3);",
        MALTESE,
    ),
];

const LOCALES: &[(&[&str], PluralSelector)] = &[
    (
        &[
            "ay", "bo", "cgg", "dz", "fa", "id", "ja", "jbo", "ka", "kk", "km", "ko", "ky", "lo",
            "ms", "my", "sah", "su", "th", "tt", "ug", "vi", "wo", "zh", "zh_CN", "zh_HK", "zh_TW",
        ],
        ONE_FORM,
    ),
    (
        &[
            "af", "an", "anp", "as", "ast", "az", "bg", "bn", "brx", "ca", "da", "de", "doi", "el",
            "en", "eo", "es", "es_AR", "et", "eu", "ff", "fi", "fo", "fur", "fy", "gl", "gu", "ha",
            "he", "hi", "hne", "hu", "hy", "ia", "it", "kl", "kn", "ku", "lb", "mai", "ml", "mn",
            "mni", "mr", "nah", "nap", "nb", "ne", "nl", "nn", "no", "nso", "or", "pa", "pap",
            "pms", "ps", "pt", "rm", "rw", "sat", "sco", "sd", "se", "si", "so", "son", "sq", "sv",
            "sw", "ta", "te", "tk", "ur", "yo",
        ],
        GERMANIC,
    ),
    (
        &[
            "ach", "ak", "am", "arn", "br", "fil", "fr", "gun", "ln", "mfe", "mg", "mi", "oc",
            "pt_BR", "tg", "ti", "tr", "uz", "wa",
        ],
        FRENCH,
    ),
    (&["be", "bs", "hr", "ru", "sr", "uk"], EAST_SLAVIC),
    (&["pl"], POLISH),
    (&["cs", "sk"], CZECH),
    (&["sl"], SLOVENIAN),
    (&["ar"], ARABIC),
    (&["ga"], IRISH),
    (&["lt"], LITHUANIAN),
    (&["lv"], LATVIAN),
    (&["ro"], ROMANIAN),
    (&["cy"], WELSH),
    (&["is"], ICELANDIC),
    (&["mk"], MACEDONIAN),
    (&["gd"], SCOTTISH_GAELIC),
    (&["mt"], MALTESE),
];

lazy_static! {
    pub(crate) static ref HEADER_TABLE: HashMap<String, PluralSelector> = HEADERS
        .iter()
        .map(|&(h, s)| (normalize_header(h), s))
        .collect();
    pub(crate) static ref LOCALE_TABLE: HashMap<&'static str, PluralSelector> = LOCALES
        .iter()
        .flat_map(|&(locales, s)| locales.iter().map(move |&l| (l, s)))
        .collect();
}
