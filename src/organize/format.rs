use regex::Regex;

use crate::metadata::BookMetadata;

/// Container extension of the finished book
pub const BOOK_EXTENSION: &str = "m4b";

/// Remove `prefix` and the separator after it from the start of `value`
///
/// Matches `<prefix><sep><rest>` where `<sep>` is one of `- – — : ,` with
/// optional whitespace around it, or a `.` followed by whitespace. Anything
/// else, including an empty rest, returns `value` unchanged.
pub fn strip_known_prefix(value: &str, prefix: &str) -> String {
    let prefix = prefix.trim();
    if prefix.is_empty() {
        return value.to_string();
    }

    let pattern = format!(r"^{}(?:\s*[-–—:,]\s*|\.\s+)(?P<rest>.+)$", regex::escape(prefix));
    let Ok(re) = Regex::new(&pattern) else {
        return value.to_string();
    };

    re.captures(value.trim())
        .and_then(|caps| caps.name("rest"))
        .map(|rest| rest.as_str().trim().to_string())
        .filter(|rest| !rest.is_empty())
        .unwrap_or_else(|| value.to_string())
}

/// Build the output filename from finalized tags
pub fn book_filename(metadata: &BookMetadata) -> String {
    let mut stem = if metadata.title != metadata.album {
        let short_title = strip_known_prefix(&metadata.title, &metadata.album);
        if metadata.has_series() {
            format!("{} - {}. {}", metadata.author, metadata.series, short_title)
        } else {
            format!("{} - {} - {}", metadata.author, metadata.album, short_title)
        }
    } else {
        format!("{} - {}", metadata.author, metadata.title)
    };

    if metadata.has_narrator() {
        stem.push_str(&format!(" [{}]", metadata.narrator));
    }
    if metadata.has_comment() {
        stem.push_str(&format!(" ({})", metadata.comment));
    }

    format!("{}.{}", sanitize_path_component(&stem), BOOK_EXTENSION)
}

/// Sanitize a string for use as a path component
/// Removes/replaces characters that are problematic on filesystems
pub fn sanitize_path_component(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => ' ',
            _ => c,
        })
        .collect::<String>()
        .trim()
        .to_string()
}
