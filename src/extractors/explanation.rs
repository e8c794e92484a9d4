// src/extractors/explanation.rs

// --- Imports ---
use crate::extractors::marker::{
    captured_key, find_openers, MarkerStyle, Opener, OptionKey, LEADING_MARKER_RE, LEADING_SEPARATOR_RE,
};
use crate::utils::config::SegmenterConfig;
use serde::Serialize;
use std::ops::Range;

// --- Data Structures ---

/// The explanation span belonging to one opener.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub keys: Vec<OptionKey>,
    pub style: MarkerStyle,
    pub marker: Range<usize>,
    pub body: Range<usize>,
    pub at_line_start: bool,
    /// Body with marker and bold decoration stripped.
    pub text: String,
}

/// All segments of one text, looked up per key. Build once per explanation text
/// and query it for every rendered option.
#[derive(Debug, Clone)]
pub struct SegmentIndex {
    segments: Vec<Segment>,
    min_body_chars: usize,
}

impl SegmentIndex {
    /// Segment owning `key`.
    ///
    /// This is not plain document order. Candidates are ranked: the key's own
    /// single-letter opener at a line start, then a grouped opener at a line start,
    /// then any opener found mid-line. Within a rank the first one wins, so marker-like
    /// prose earlier in another segment cannot take a key from its own line.
    pub fn get(&self, key: OptionKey) -> Option<&Segment> {
        let owns = |segment: &&Segment| segment.keys.contains(&key);
        let segments = || self.segments.iter();
        segments()
            .filter(|s| s.at_line_start && s.style != MarkerStyle::Grouped)
            .find(owns)
            .or_else(|| segments().filter(|s| s.at_line_start).find(owns))
            .or_else(|| segments().find(owns))
            .filter(|s| s.text.chars().count() >= self.min_body_chars)
    }

    pub fn explanation(&self, key: OptionKey) -> Option<&str> {
        self.get(key).map(|s| s.text.as_str())
    }

    /// Keys that resolve to a non-empty explanation.
    pub fn keys(&self) -> Vec<OptionKey> {
        OptionKey::ALL.into_iter().filter(|k| self.get(*k).is_some()).collect()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

// --- Main Extractor Structure ---

#[derive(Debug, Clone, Default)]
pub struct ExplanationSegmenter {
    config: SegmenterConfig,
}

impl ExplanationSegmenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SegmenterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SegmenterConfig {
        &self.config
    }

    /// Extracts the explanation written for `option_key`.
    ///
    /// Returns `None` when the text is missing or blank, when the key is not one of
    /// A-E, or when no opener for the key exists. Never fails otherwise.
    pub fn extract(&self, text: Option<&str>, option_key: &str) -> Option<String> {
        let Some(key) = OptionKey::parse(option_key) else {
            tracing::debug!("Ignoring invalid option key {:?}", option_key);
            return None;
        };
        let text = text.filter(|t| !t.trim().is_empty())?;

        let found = self.index(text).explanation(key).map(str::to_owned);
        if found.is_none() {
            tracing::debug!("No explanation segment for option {}", key);
        }
        found
    }

    pub fn index(&self, text: &str) -> SegmentIndex {
        SegmentIndex {
            segments: self.segments(text),
            min_body_chars: self.config.min_body_chars.max(1),
        }
    }

    /// Every opener in document order with its cleaned body, empty bodies included.
    pub fn segments(&self, text: &str) -> Vec<Segment> {
        let openers = find_openers(text);
        tracing::debug!("Found {} segment openers in {} bytes of text", openers.len(), text.len());

        openers
            .iter()
            .map(|opener| {
                let body = opener.body_start()..segment_end(text, &openers, opener.body_start());
                Segment {
                    keys: opener.keys.clone(),
                    style: opener.style,
                    marker: opener.marker.clone(),
                    at_line_start: opener.at_line_start,
                    text: clean_body(&text[body.clone()], &opener.keys),
                    body,
                }
            })
            .collect()
    }
}

/// Shorthand for `ExplanationSegmenter::new().extract(text, option_key)`.
pub fn extract_explanation_for_option(text: Option<&str>, option_key: &str) -> Option<String> {
    ExplanationSegmenter::new().extract(text, option_key)
}

/// A body ends where the next line-leading opener's line begins. Mid-line openers never
/// close a segment, so grouped letters and marker-like prose stay inside it.
fn segment_end(text: &str, openers: &[Opener], body_start: usize) -> usize {
    openers
        .iter()
        .filter(|o| o.at_line_start && o.marker.start >= body_start)
        .map(|o| o.line_start.max(body_start))
        .next()
        .unwrap_or(text.len())
}

/// Strips leading openers for `keys`, every `**`, a stray leading separator and
/// surrounding whitespace. Repeats until nothing changes, so the result is a fixpoint.
pub fn clean_body(raw: &str, keys: &[OptionKey]) -> String {
    let mut current = clean_once(raw, keys);
    loop {
        let next = clean_once(&current, keys);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn clean_once(raw: &str, keys: &[OptionKey]) -> String {
    let mut body = raw.trim();
    while let Some(caps) = LEADING_MARKER_RE.captures(body) {
        if !captured_key(&caps).is_some_and(|k| keys.contains(&k)) {
            break;
        }
        let end = caps.get(0).map_or(0, |m| m.end());
        body = body[end..].trim_start();
    }

    let body = body.replace("**", "");
    let body = LEADING_SEPARATOR_RE.replace(body.trim(), "");
    body.trim().to_string()
}
