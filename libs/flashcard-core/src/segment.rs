//! Segmenter for mixed Greek / English / Russian study text.
//!
//! # Format
//! ```text
//! Χαίρε! hello
//! Привет
//! Γειά σου; how are you
//! Как дела
//! ```
//!
//! Non-blank lines are taken in pairs. The first line of a pair holds the
//! Greek text followed by its English gloss, the second line is an
//! annotation that is appended to the card's translation.

use crate::types::CardDraft;

/// Inclusive code point ranges treated as source script
/// (Greek and Coptic, Greek Extended).
pub const SCRIPT_RANGES: &[(char, char)] = &[('\u{0370}', '\u{03FF}'), ('\u{1F00}', '\u{1FFF}')];

/// Punctuation absorbed into the script span when it directly follows the
/// last script character.
pub const BOUNDARY_PUNCTUATION: &[char] = &['.', ';', '!', '?'];

/// One line split at the script/gloss boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSplit<'a> {
    pub script: &'a str,
    pub gloss: &'a str,
}

/// Segment raw study text into card drafts.
///
/// Never fails: text without any script characters yields an empty list.
pub fn segment(text: &str) -> Vec<CardDraft> {
    normalize_lines(text)
        .chunks(2)
        .filter_map(|pair| {
            let split = split_line(pair[0]);
            if split.script.is_empty() {
                return None;
            }

            let annotation = pair.get(1).copied().unwrap_or_default();
            Some(CardDraft::new(
                split.script.to_string(),
                compose_translation(split.gloss, annotation),
            ))
        })
        .collect()
}

/// Trim every line and drop the blank ones, keeping order.
pub fn normalize_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Check whether a character belongs to the source script.
pub fn is_script_char(c: char) -> bool {
    SCRIPT_RANGES
        .iter()
        .any(|&(start, end)| (start..=end).contains(&c))
}

/// Split a line into its script span and trailing gloss.
///
/// The boundary is anchored on the last script character, so anything
/// before it (including a non-script prefix) belongs to the script span.
pub fn split_line(line: &str) -> LineSplit<'_> {
    let Some((last_idx, last_char)) = line
        .char_indices()
        .filter(|&(_, c)| is_script_char(c))
        .last()
    else {
        return LineSplit {
            script: "",
            gloss: line.trim(),
        };
    };

    let tail_start = last_idx + last_char.len_utf8();
    let mut boundary = tail_start;

    for (offset, c) in line[tail_start..].char_indices() {
        if BOUNDARY_PUNCTUATION.contains(&c) {
            boundary = tail_start + offset + c.len_utf8();
        } else if c != ' ' {
            break;
        }
    }

    LineSplit {
        script: line[..boundary].trim(),
        gloss: line[boundary..].trim(),
    }
}

fn compose_translation(gloss: &str, annotation: &str) -> String {
    match (gloss.is_empty(), annotation.is_empty()) {
        (_, true) => gloss.to_string(),
        (true, false) => annotation.to_string(),
        (false, false) => format!("{}\n{}", gloss, annotation),
    }
}
