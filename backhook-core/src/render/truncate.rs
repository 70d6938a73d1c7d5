//! Length-bounded text for sink fields
//!
//! Lengths are counted in `char`s, which is how the sink counts them.

pub const ELLIPSIS: &str = "...";
pub const CODE_FENCE: &str = "```";

/// Room kept free for `"\n..."` and `"\n```"` when cutting a code block
const BLOCK_RESERVE: usize = 2 + ELLIPSIS.len() + CODE_FENCE.len();

pub(crate) fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Whether `text` is a fenced fixed-width block
pub fn is_code_block(text: &str) -> bool {
    text.len() >= 2 * CODE_FENCE.len()
        && text.starts_with(CODE_FENCE)
        && text.ends_with(CODE_FENCE)
        && text.contains('\n')
}

/// Shorten `text` to at most `max_len` characters
///
/// Text that already fits is returned unchanged. Fenced blocks lose whole
/// lines from the end and keep both fences; other text is cut at a word
/// boundary. Both forms end with an ellipsis when shortened, unless the
/// budget only leaves room for the bare fences.
pub fn truncate(text: &str, max_len: usize) -> String {
    if char_len(text) <= max_len {
        return text.to_string();
    }
    if is_code_block(text) {
        if let Some(block) = truncate_block(text, max_len) {
            return block;
        }
    }
    truncate_words(text, max_len)
}

/// `None` when even the bare fences do not fit
///
/// Between that and room for the ellipsis line, only the fences are kept.
fn truncate_block(text: &str, max_len: usize) -> Option<String> {
    let body = &text[..text.len() - CODE_FENCE.len()];
    let mut lines = body.lines();
    let opening = lines.next()?;

    let mut used = char_len(opening);
    if used + 1 + CODE_FENCE.len() > max_len {
        return None;
    }
    let budget = match max_len.checked_sub(BLOCK_RESERVE) {
        Some(budget) if used <= budget => budget,
        _ => return Some(format!("{}\n{}", opening, CODE_FENCE)),
    };

    let mut out = opening.to_string();
    for line in lines {
        let cost = 1 + char_len(line);
        if used + cost > budget {
            break;
        }
        out.push('\n');
        out.push_str(line);
        used += cost;
    }
    out.push('\n');
    out.push_str(ELLIPSIS);
    out.push('\n');
    out.push_str(CODE_FENCE);
    Some(out)
}

fn truncate_words(text: &str, max_len: usize) -> String {
    if max_len < ELLIPSIS.len() {
        return text.chars().take(max_len).collect();
    }
    let keep = max_len - ELLIPSIS.len();
    let end = text
        .char_indices()
        .nth(keep)
        .map_or(text.len(), |(idx, _)| idx);
    let (cut, rest) = text.split_at(end);

    // Only back off when the cut lands inside a word
    let at_boundary = rest.starts_with(char::is_whitespace);
    let cut = match cut.rfind(char::is_whitespace) {
        Some(idx) if idx > 0 && !at_boundary => cut[..idx].trim_end(),
        _ => cut.trim_end(),
    };
    format!("{}{}", cut, ELLIPSIS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(rows: usize) -> String {
        let body: Vec<String> = (0..rows).map(|i| format!("row {:03} | ok", i)).collect();
        format!("```\n{}\n```", body.join("\n"))
    }

    #[test]
    fn test_short_text_is_unchanged() {
        assert_eq!(truncate("hello world", 11), "hello world");
        assert_eq!(truncate("", 0), "");
    }

    #[test]
    fn test_cuts_at_word_boundary() {
        let out = truncate("the quick brown fox jumps", 16);
        assert_eq!(out, "the quick...");
        assert!(char_len(&out) <= 16);
    }

    #[test]
    fn test_keeps_word_ending_exactly_at_cut() {
        assert_eq!(truncate("alpha beta gamma", 13), "alpha beta...");
    }

    #[test]
    fn test_single_long_word_is_hard_cut() {
        let out = truncate("abcdefghijklmnop", 10);
        assert_eq!(out, "abcdefg...");
    }

    #[test]
    fn test_tiny_budget_drops_ellipsis() {
        assert_eq!(truncate("abcdef", 2), "ab");
    }

    #[test]
    fn test_counts_chars_not_bytes() {
        let text = "äöü äöü äöü";
        assert_eq!(truncate(text, 11), text);
        let out = truncate(text, 9);
        assert_eq!(out, "äöü...");
    }

    #[test]
    fn test_code_block_keeps_fences_and_whole_lines() {
        let text = block(50);
        let out = truncate(&text, 120);

        assert!(char_len(&out) <= 120);
        assert!(out.starts_with("```\n"));
        assert!(out.ends_with("\n...\n```"));
        for line in out.lines().skip(1) {
            assert!(line.starts_with("row ") || line == "..." || line == "```");
            if line.starts_with("row ") {
                assert_eq!(line.len(), "row 000 | ok".len());
            }
        }
    }

    #[test]
    fn test_code_block_bound_holds_for_every_budget() {
        let text = block(20);
        for max_len in 0..char_len(&text) {
            let out = truncate(&text, max_len);
            assert!(char_len(&out) <= max_len, "budget {} gave {}", max_len, out);
            if max_len >= 7 {
                assert!(out.starts_with("```\n"), "budget {} gave {}", max_len, out);
                assert!(out.ends_with("\n```"), "budget {} gave {}", max_len, out);
            }
        }
    }

    #[test]
    fn test_small_budget_keeps_bare_fences() {
        let text = block(2);
        for max_len in 7..=10 {
            assert_eq!(truncate(&text, max_len), "```\n```");
        }
        assert_eq!(truncate(&text, 11), "```\n...\n```");
        assert_eq!(truncate(&text, 6), "```...");
    }

    #[test]
    fn test_code_block_with_language_tag() {
        let text = format!("```text\n{}\n```", "line\n".repeat(30).trim_end());
        let out = truncate(&text, 40);
        assert!(out.starts_with("```text\n"));
        assert!(out.ends_with("```"));
        assert!(char_len(&out) <= 40);
    }

    #[test]
    fn test_is_code_block() {
        assert!(is_code_block("```\na\n```"));
        assert!(!is_code_block("```a```"));
        assert!(!is_code_block("plain"));
    }
}
