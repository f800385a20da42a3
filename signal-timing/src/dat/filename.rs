//! Intersection number and name from a DAT filename
//!
//! Field technicians save controller images as `47_신설사거리.dat`,
//! `궁촌사거리(한진 3.5.2).dat`, `대천중_20240531.dat` and so on. The cleaner
//! strips, in order: a numeric `NN_` prefix (kept as the number), a leading
//! `@`, date suffixes, parenthesised notes, housekeeping keywords, vendor
//! suffixes, `3R`/`4R` style tags and trailing digits.

use regex::Regex;
use serde::Serialize;
use std::path::Path;
use std::sync::LazyLock;

static NUMBER_PREFIX: LazyLock<Regex> = LazyLock::new(|| compile(r"^(\d+)[_\-](.+)$"));
static TEMPLATE_MARK: LazyLock<Regex> = LazyLock::new(|| compile(r"^@"));
static DATE_SUFFIXES: LazyLock<[Regex; 4]> = LazyLock::new(|| {
    [
        compile(r"[._\- ]?\d{4}\.\d{2}\.\d{2}\.?$"),
        compile(r"[._\- ]?\d{2}\.\d{2}\.\d{2}\.?$"),
        compile(r"[._\- ]?\d{8}$"),
        compile(r"[._\- ]?서?\d{6}$"),
    ]
});
static PARENTHESISED: LazyLock<Regex> = LazyLock::new(|| compile(r"\([^)]*\)"));
static UNCLOSED_PAREN: LazyLock<Regex> = LazyLock::new(|| compile(r"\($"));
static KEYWORD_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?i)[_\- ]?(백업|copy|old|최신|수정|원본|임시|test|new|기존|잘못|정문|_수정)$")
});
static VENDOR_SUFFIX: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)[_\- ]?(서돌|한진|서|LCsim)$"));
static RING_TAG: LazyLock<Regex> = LazyLock::new(|| compile(r"\d+[Rr]$"));
static TRAILING_DIGITS: LazyLock<Regex> = LazyLock::new(|| compile(r"\d*$"));

/// Keyword suffixes can be stacked (`_old_백업`)
const KEYWORD_PASSES: usize = 3;

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("filename patterns are constant")
}

/// What the filename says about the intersection
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct IntersectionLabel {
    /// Leading `NN_` number
    pub number: Option<u32>,
    /// Cleaned name, `None` when nothing is left
    pub name: Option<String>,
}

impl IntersectionLabel {
    pub fn from_filename(filename: &str) -> Self {
        let stem = Path::new(filename)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let (number, rest) = match NUMBER_PREFIX.captures(&stem) {
            Some(caps) => (caps[1].parse().ok(), caps[2].to_string()),
            None => (None, stem.clone()),
        };

        let mut cleaned = TEMPLATE_MARK.replace(&rest, "").into_owned();
        for date in DATE_SUFFIXES.iter() {
            cleaned = date.replace(&cleaned, "").into_owned();
        }
        cleaned = PARENTHESISED.replace_all(&cleaned, "").into_owned();
        cleaned = UNCLOSED_PAREN.replace(&cleaned, "").into_owned();
        for _ in 0..KEYWORD_PASSES {
            cleaned = KEYWORD_SUFFIX.replace(&cleaned, "").into_owned();
        }
        cleaned = VENDOR_SUFFIX.replace(&cleaned, "").into_owned();
        cleaned = RING_TAG.replace(&cleaned, "").into_owned();
        cleaned = TRAILING_DIGITS.replace(&cleaned, "").into_owned();

        let name = cleaned.trim_matches(|c| matches!(c, ' ' | '_' | '-' | '.'));
        Self {
            number,
            name: (!name.is_empty()).then(|| name.to_string()),
        }
    }
}
