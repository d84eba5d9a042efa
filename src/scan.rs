//! Bracket-block scanner for loosely formatted parameter dumps.
//!
//! The reference tool prints round constants and the MDS matrix as
//! Python-style bracketed lists of single-quoted hex literals, spanning
//! one or more lines. Rather than matching those blocks with non-greedy
//! regexes, this module tracks bracket depth explicitly, which makes
//! "block never closes" an observable outcome (`None`) instead of an
//! artifact of regex greediness.
//!
//! Quoted hex literals cannot contain brackets, so depth counting alone
//! is sufficient; no quote-state tracking is required.

use std::sync::OnceLock;

use regex::Regex;

fn hex_literal_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"'(0x[0-9a-fA-F]+)'").expect("hex literal pattern"))
}

/// Return the interior of the balanced bracket block at the start of
/// `text`, or `None` when `text` does not start with `[` or the block
/// never closes before end-of-input.
///
/// An unclosed block is "not found", never a partial result.
pub fn bracket_block(text: &str) -> Option<&str> {
    let mut chars = text.char_indices();
    match chars.next() {
        Some((_, '[')) => {}
        _ => return None,
    }
    let mut depth = 1usize;
    for (i, c) in chars {
        match c {
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[1..i]);
                }
            }
            _ => {}
        }
    }
    None
}

/// The depth-one sub-blocks of a block interior, in textual order.
///
/// Used for MDS rows: the interior of `[[...], [...]]` yields one slice
/// per row. Unclosed trailing sub-blocks are dropped.
pub fn top_level_blocks(interior: &str) -> Vec<&str> {
    let mut blocks = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (i, c) in interior.char_indices() {
        match c {
            '[' => {
                depth += 1;
                if depth == 1 {
                    start = i + 1;
                }
            }
            ']' => {
                if depth > 0 {
                    depth -= 1;
                    if depth == 0 {
                        blocks.push(&interior[start..i]);
                    }
                }
            }
            _ => {}
        }
    }
    blocks
}

/// All single-quoted `0x...` hex literals in `text`, in textual order.
///
/// Whitespace and line breaks between literals are insignificant.
pub fn quoted_hex_literals(text: &str) -> Vec<String> {
    hex_literal_re()
        .captures_iter(text)
        .map(|caps| caps[1].to_string())
        .collect()
}
