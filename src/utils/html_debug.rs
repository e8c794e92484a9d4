// src/utils/html_debug.rs
use std::fs::File;
use std::io::Write;
use std::path::Path;
use crate::extractors::explanation::Segment;
use crate::extractors::marker::MarkerStyle;
use crate::utils::error::AppError;

/// Saves explanation text to an HTML file with the given byte spans highlighted.
/// Spans overlapping an earlier one are skipped.
pub fn save_debug_html(text: &str, filename: &Path, highlights: &[(usize, usize, &str)]) -> Result<(), AppError> {
    let mut file = File::create(filename)?;

    // Add debug styling in head
    let mut debug_html = String::from("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<style>\n");

    // CSS for highlight colors
    debug_html.push_str("body { font-family: monospace; white-space: pre-wrap; }\n");
    debug_html.push_str(".highlight-plain { background-color: #FFFF00; }\n");
    debug_html.push_str(".highlight-bold_letter { background-color: #FFA500; }\n");
    debug_html.push_str(".highlight-bulleted { background-color: #90EE90; }\n");
    debug_html.push_str(".highlight-bold_label { background-color: #ADD8E6; }\n");
    debug_html.push_str(".highlight-grouped { background-color: #DDA0DD; }\n");
    debug_html.push_str(".highlight-body { background-color: #F0F0F0; }\n");
    debug_html.push_str(".highlight-custom { background-color: #FFC0CB; }\n");
    debug_html.push_str("</style>\n</head>\n<body>\n");

    let mut last_pos = 0;
    let mut sorted_highlights = highlights.to_vec();
    sorted_highlights.sort_by_key(|h| h.0); // Sort by position

    for (start, end, highlight_type) in sorted_highlights {
        if start < last_pos || end > text.len() || start >= end {
            tracing::trace!("Skipping highlight {}-{} ({})", start, end, highlight_type);
            continue;
        }

        // Add content before the highlight
        if start > last_pos {
            debug_html.push_str(&escape_html(&text[last_pos..start]));
        }

        let css_class = match highlight_type {
            "plain" | "bold_letter" | "bulleted" | "bold_label" | "grouped" | "body" => highlight_type,
            _ => "custom",
        };

        debug_html.push_str(&format!("<span class=\"highlight-{}\" title=\"Position: {}-{}, Type: {}\">",
            css_class, start, end, highlight_type));
        debug_html.push_str(&escape_html(&text[start..end]));
        debug_html.push_str("</span>");

        last_pos = end;
    }

    // Add any remaining content
    if last_pos < text.len() {
        debug_html.push_str(&escape_html(&text[last_pos..]));
    }

    debug_html.push_str("\n</body>\n</html>");

    file.write_all(debug_html.as_bytes())?;

    tracing::info!("Saved debug HTML to {}", filename.display());
    Ok(())
}

/// Creates a debug page with every detected marker (classed by style) and body highlighted.
pub fn create_debug_html(text: &str, filename: &Path, segments: &[Segment]) -> Result<(), AppError> {
    let mut highlights = Vec::with_capacity(segments.len() * 2);

    for segment in segments {
        highlights.push((segment.marker.start, segment.marker.end, style_class(segment.style)));
        highlights.push((segment.body.start, segment.body.end, "body"));
    }

    save_debug_html(text, filename, &highlights)
}

fn style_class(style: MarkerStyle) -> &'static str {
    match style {
        MarkerStyle::Plain => "plain",
        MarkerStyle::BoldLetter => "bold_letter",
        MarkerStyle::Bulleted => "bulleted",
        MarkerStyle::BoldLabel => "bold_label",
        MarkerStyle::Grouped => "grouped",
    }
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
