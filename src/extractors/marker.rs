// src/extractors/marker.rs

// --- Imports ---
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

// --- Regex Patterns (Lazy Static) ---

// Single-letter opener: boundary, optional bullet, optional bold, letter, optional bold, `)` or `:`.
// The boundary is not part of `open`; it only keeps letters glued to words (e.g. "tipo:") out.
static MARKER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?mi)(?:^|[\s,])(?P<open>(?P<bullet>[*•+\-][ \t]+)?(?P<bold>\*\*)?[ \t]*(?P<key>[a-e])[ \t]*(?P<inner>\*\*)?[ \t]*[):](?P<close>\*\*)?)",
    )
    .expect("Failed to compile MARKER_RE")
});

// Grouped opener: two or more items joined by `,` `/` `y` `and`, closed by one `:`.
// Either every item is `L) label` (labels stop at the next comma, colon or newline),
// or every item is a bare letter and the run starts its line. Mixing the two would
// read label prose such as "Hepatitis B y C:" as a group.
static GROUP_RE: Lazy<Regex> = Lazy::new(|| {
    let prefix = r"(?:[*•+\-][ \t]+)?(?:\*\*)?[ \t]*";
    let labelled = r"(?:\*\*)?[a-e](?:\*\*)?[ \t]*\)(?:\*\*)?[^,:\n]*";
    let bare = r"(?:\*\*)?[a-e](?:\*\*)?";
    let sep = r"(?:[ \t]*[,/][ \t]*|[ \t]+(?:y|and)[ \t]+)";
    let pattern = format!(
        r"(?mi)(?:(?:^|[\s,])(?P<run>{prefix}{labelled}(?:{sep}{labelled})+)|^[ \t]*(?P<bare>{prefix}{bare}(?:{sep}{bare})+))[ \t]*(?:\*\*)?[ \t]*:(?:\*\*)?"
    );
    Regex::new(&pattern).expect("Failed to compile GROUP_RE")
});

static GROUP_SEPARATOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)[ \t]*[,/][ \t]*|[ \t]+(?:y|and)[ \t]+").expect("Failed to compile GROUP_SEPARATOR_RE")
});

// Used by body cleaning: an opener sitting at the very start of an already sliced body.
pub(crate) static LEADING_MARKER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:[*•+\-][ \t]+)?(?:\*\*)?[ \t]*(?P<key>[a-e])[ \t]*(?:\*\*)?[ \t]*[):](?:\*\*)?")
        .expect("Failed to compile LEADING_MARKER_RE")
});

pub(crate) static LEADING_SEPARATOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[:)\-–—](?:\s+|$)").expect("Failed to compile LEADING_SEPARATOR_RE")
});

// --- Data Structures ---

/// One of the five multiple-choice option letters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OptionKey {
    A,
    B,
    C,
    D,
    E,
}

impl OptionKey {
    pub const ALL: [OptionKey; 5] = [OptionKey::A, OptionKey::B, OptionKey::C, OptionKey::D, OptionKey::E];

    /// Parses a key from user or record input. Exactly one letter A-E, any case,
    /// surrounding whitespace ignored.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut chars = raw.trim().chars();
        let key = Self::from_char(chars.next()?)?;
        chars.next().is_none().then_some(key)
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'A' => Some(OptionKey::A),
            'B' => Some(OptionKey::B),
            'C' => Some(OptionKey::C),
            'D' => Some(OptionKey::D),
            'E' => Some(OptionKey::E),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            OptionKey::A => 'A',
            OptionKey::B => 'B',
            OptionKey::C => 'C',
            OptionKey::D => 'D',
            OptionKey::E => 'E',
        }
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Authoring convention an opener was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerStyle {
    /// `A) text`
    Plain,
    /// `**A)** text`
    BoldLetter,
    /// `*   **B:** text`
    Bulleted,
    /// `**A) 3 meses:** text`, bold opened before the letter and closed after a label
    BoldLabel,
    /// `**C) 9 meses, D) 10 meses, E) 12 meses:** text`
    Grouped,
}

impl MarkerStyle {
    fn classify(bullet: bool, bold: bool, closed: bool) -> Self {
        match (bullet, bold, closed) {
            (true, _, _) => MarkerStyle::Bulleted,
            (false, true, true) => MarkerStyle::BoldLetter,
            (false, true, false) => MarkerStyle::BoldLabel,
            (false, false, _) => MarkerStyle::Plain,
        }
    }
}

/// A located segment opener. `marker` spans the decoration through the separator
/// (or the shared colon of a group); the body starts at `marker.end`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opener {
    pub keys: Vec<OptionKey>,
    pub style: MarkerStyle,
    pub marker: Range<usize>,
    pub line_start: usize,
    pub at_line_start: bool,
}

impl Opener {
    fn new(text: &str, keys: Vec<OptionKey>, style: MarkerStyle, marker: Range<usize>) -> Self {
        let line_start = text[..marker.start].rfind('\n').map_or(0, |i| i + 1);
        let at_line_start = text[line_start..marker.start].trim().is_empty();
        Self { keys, style, marker, line_start, at_line_start }
    }

    pub fn body_start(&self) -> usize {
        self.marker.end
    }
}

// --- Matching ---

/// Finds every opener in document order. Single-letter markers that fall inside a
/// grouped opener are absorbed by the group.
pub fn find_openers(text: &str) -> Vec<Opener> {
    let mut openers: Vec<Opener> = GROUP_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let run = caps.name("run").or_else(|| caps.name("bare"))?;
            let whole = caps.get(0)?;
            let keys = group_keys(run.as_str());
            if keys.len() < 2 {
                return None;
            }
            tracing::trace!("Found grouped opener {:?} at {}", keys, run.start());
            Some(Opener::new(text, keys, MarkerStyle::Grouped, run.start()..whole.end()))
        })
        .collect();

    let grouped: Vec<Range<usize>> = openers.iter().map(|o| o.marker.clone()).collect();

    for caps in MARKER_RE.captures_iter(text) {
        let Some(open) = caps.name("open") else { continue };
        if grouped.iter().any(|range| range.contains(&open.start())) {
            continue;
        }
        let Some(key) = captured_key(&caps) else { continue };
        let style = MarkerStyle::classify(
            caps.name("bullet").is_some(),
            caps.name("bold").is_some(),
            caps.name("inner").is_some() || caps.name("close").is_some(),
        );
        tracing::trace!("Found {:?} opener for {} at {}", style, key, open.start());
        openers.push(Opener::new(text, vec![key], style, open.range()));
    }

    openers.sort_by_key(|o| o.marker.start);
    openers
}

pub(crate) fn captured_key(caps: &Captures<'_>) -> Option<OptionKey> {
    caps.name("key")
        .and_then(|m| m.as_str().chars().next())
        .and_then(OptionKey::from_char)
}

/// Letters named by a grouped run, in authored order, without repeats.
/// Pieces that are not a letter token (label text split on a conjunction) are skipped.
fn group_keys(run: &str) -> Vec<OptionKey> {
    let mut keys = Vec::new();
    for piece in GROUP_SEPARATOR_RE.split(run) {
        if let Some(key) = item_key(piece) {
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
    }
    keys
}

fn item_key(piece: &str) -> Option<OptionKey> {
    let piece = piece.trim_start_matches(|c: char| matches!(c, '*' | '-' | '•' | '+') || c.is_whitespace());
    let mut chars = piece.chars();
    let key = OptionKey::from_char(chars.next()?)?;
    let rest = chars.as_str().trim_start_matches('*').trim_start();
    (rest.is_empty() || rest.starts_with(')')).then_some(key)
}

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_keys_case_insensitively() {
        assert_eq!(OptionKey::parse("a"), Some(OptionKey::A));
        assert_eq!(OptionKey::parse(" E "), Some(OptionKey::E));
        assert_eq!(OptionKey::parse("Z"), None);
        assert_eq!(OptionKey::parse(""), None);
        assert_eq!(OptionKey::parse("AB"), None);
        assert_eq!(OptionKey::C.to_string(), "C");
    }

    #[test]
    fn classifies_each_convention() {
        let cases = [
            ("A) texto", MarkerStyle::Plain),
            ("**A)** texto", MarkerStyle::BoldLetter),
            ("*   **B:** texto", MarkerStyle::Bulleted),
            ("**A) 3 meses:** texto", MarkerStyle::BoldLabel),
            ("**C) 9 meses, D) 10 meses, E) 12 meses:** texto", MarkerStyle::Grouped),
        ];
        for (text, style) in cases {
            let openers = find_openers(text);
            assert_eq!(openers.len(), 1, "unexpected openers for {:?}: {:?}", text, openers);
            assert_eq!(openers[0].style, style, "wrong style for {:?}", text);
            assert!(openers[0].at_line_start);
        }
    }

    #[test]
    fn group_absorbs_inner_markers() {
        let text = "**C) 9 meses, D) 10 meses, E) 12 meses:** Iniciar";
        let openers = find_openers(text);
        assert_eq!(openers.len(), 1);
        assert_eq!(openers[0].keys, vec![OptionKey::C, OptionKey::D, OptionKey::E]);
        assert_eq!(&text[openers[0].body_start()..], " Iniciar");
    }

    #[test]
    fn bare_letter_group_with_conjunction() {
        let openers = find_openers("**C, D y E:** comparten explicación");
        assert_eq!(openers.len(), 1);
        assert_eq!(openers[0].keys, vec![OptionKey::C, OptionKey::D, OptionKey::E]);
    }

    #[test]
    fn bare_letters_after_a_label_are_not_grouped() {
        for text in [
            "A) Hepatitis B y C: no se transmiten por vía fecal-oral.",
            "A) Déficit de vitamina A y E: produce ceguera.",
            "Se asocia a vitamina A, D: liposolubles.",
        ] {
            let openers = find_openers(text);
            assert!(
                openers.iter().all(|o| o.style != MarkerStyle::Grouped),
                "unexpected group in {:?}: {:?}",
                text,
                openers
            );
        }
    }

    #[test]
    fn letter_without_separator_is_not_a_marker() {
        assert!(find_openers("La vitamina A es liposoluble").is_empty());
        assert!(find_openers("tipo:B12").is_empty());
    }

    #[test]
    fn mid_line_openers_are_flagged() {
        let openers = find_openers("A) foo\nver tambien, B) bar");
        assert_eq!(openers.len(), 2);
        assert!(openers[0].at_line_start);
        assert!(!openers[1].at_line_start);
        assert_eq!(openers[1].keys, vec![OptionKey::B]);
    }

    #[test]
    fn label_words_are_not_group_members() {
        assert_eq!(group_keys("C) 9 meses y medio, D) 10 meses"), vec![OptionKey::C, OptionKey::D]);
        assert_eq!(group_keys("C) vitamina a, D) zinc"), vec![OptionKey::C, OptionKey::D]);
    }
}
