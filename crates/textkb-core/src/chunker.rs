//! Boundary-aware text chunker.
//!
//! Scans left to right, cutting at most `size` characters per chunk. Before
//! each hard cut it searches backward for a semantic boundary (paragraph
//! break, newline, CJK or ASCII sentence terminator) and cuts there instead,
//! as long as the boundary lies past `start + size * 0.6` so boundary cuts
//! never produce tiny chunks. Positions are measured in characters, not
//! bytes, so CJK corpora chunk at the same granularity as ASCII ones.

use crate::config::ChunkingConfig;

/// Boundary markers, tried in priority order.
const SEPARATORS: &[&str] = &["\n\n", "\n", "。", "！", "？", ".", "!", "?"];

/// Fraction of `size` a boundary cut must cover before it is preferred over
/// the hard limit. Fixed; changing it silently shifts every chunk boundary
/// and therefore retrieval quality.
const BOUNDARY_FLOOR: f64 = 0.6;

/// Split `text` into overlapping chunks of at most `cfg.size` characters.
/// Empty or whitespace-only input yields no chunks; text shorter than the
/// chunk size yields exactly one.
pub fn chunk(text: &str, cfg: &ChunkingConfig) -> Vec<String> {
    let size = cfg.size.max(1);
    let overlap = cfg.overlap.min(size.saturating_sub(1));

    let chars: Vec<char> = text.trim().chars().collect();
    let n = chars.len();
    let mut chunks = Vec::new();
    let mut start = 0usize;

    while start < n {
        let end = (start + size).min(n);
        let floor = start as f64 + size as f64 * BOUNDARY_FLOOR;

        let mut cut = end;
        for sep in SEPARATORS {
            let sep_chars: Vec<char> = sep.chars().collect();
            if let Some(pos) = rfind(&chars, &sep_chars, start, end) {
                if pos as f64 > floor {
                    cut = pos + sep_chars.len();
                    break;
                }
            }
        }

        let piece: String = chars[start..cut].iter().collect();
        let piece = piece.trim();
        if !piece.is_empty() {
            chunks.push(piece.to_string());
        }

        // The last cut consumed the remaining text; rewinding by the overlap
        // here would only re-emit suffixes of the final chunk.
        if cut == n {
            break;
        }

        // Overlap the next chunk with the tail of this one, but always move
        // forward by at least one character.
        start = cut.saturating_sub(overlap).max(start + 1);
    }

    chunks
}

/// Last position in `[start, end)` where `needle` occurs entirely within the
/// window, or `None`.
fn rfind(haystack: &[char], needle: &[char], start: usize, end: usize) -> Option<usize> {
    if needle.is_empty() || end < start + needle.len() {
        return None;
    }
    let mut pos = end - needle.len();
    loop {
        if haystack[pos..pos + needle.len()] == *needle {
            return Some(pos);
        }
        if pos == start {
            return None;
        }
        pos -= 1;
    }
}
