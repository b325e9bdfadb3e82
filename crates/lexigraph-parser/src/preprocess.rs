//! Source-type specific clean-up applied around tokenization.
//!
//! Text-level passes run before the lexer (dropping fenced code, link targets,
//! URLs and mentions); word-level passes run on the lexed words (identifier
//! splitting, keyword and filler removal).

use crate::{
    SourceType,
    stop_words::{CODE_KEYWORDS, FILLER_PHRASES, FILLER_WORDS},
};

/// Removes content that should never reach the lexer for this source type.
pub(crate) fn clean_text(text: &str, source_type: SourceType) -> String {
    match source_type {
        SourceType::Markdown => drop_urls(&strip_link_targets(&strip_fenced_code(text)), false),
        SourceType::Post => drop_urls(text, true),
        SourceType::Code | SourceType::VoiceTranscript => text.to_string(),
    }
}

/// Rewrites the lowercased word stream for this source type.
pub(crate) fn refine_words(words: Vec<String>, source_type: SourceType) -> Vec<String> {
    match source_type {
        SourceType::Code => words
            .into_iter()
            .filter(|word| !CODE_KEYWORDS.contains(&word.as_str()))
            .collect(),
        SourceType::VoiceTranscript => drop_fillers(words),
        SourceType::Markdown | SourceType::Post => words,
    }
}

/// Splits a code identifier into its `camelCase` / `PascalCase` parts.
///
/// Snake and kebab case never reach this point since `_` and `-` already
/// separate words in the lexer.
///
/// ```text
/// parseHttpRequest -> parse, Http, Request
/// HTMLParser       -> HTML, Parser
/// ```
pub(crate) fn split_identifier(word: &str) -> Vec<&str> {
    let chars: Vec<(usize, char)> = word.char_indices().collect();
    let mut parts = Vec::new();
    let mut start = 0;

    for i in 1..chars.len() {
        let (idx, current) = chars[i];
        let previous = chars[i - 1].1;
        let next_is_lower = chars.get(i + 1).is_some_and(|(_, c)| c.is_lowercase());

        let boundary = (previous.is_lowercase() && current.is_uppercase())
            || (previous.is_uppercase() && current.is_uppercase() && next_is_lower)
            || (previous.is_alphabetic() && current.is_ascii_digit())
            || (previous.is_ascii_digit() && current.is_alphabetic());

        if boundary {
            parts.push(&word[start..idx]);
            start = idx;
        }
    }
    parts.push(&word[start..]);
    parts
}

fn strip_fenced_code(text: &str) -> String {
    let mut in_fence = false;
    let mut kept = Vec::new();
    for line in text.lines() {
        if line.trim_start().starts_with("```") || line.trim_start().starts_with("~~~") {
            in_fence = !in_fence;
            continue;
        }
        if !in_fence {
            kept.push(line);
        }
    }
    kept.join("\n")
}

/// Drops the `(target)` part of `[label](target)` links.
fn strip_link_targets(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(idx) = rest.find("](") {
        out.push_str(&rest[..=idx]);
        let after = &rest[idx + 2..];
        match after.find(')') {
            Some(close) => rest = &after[close + 1..],
            None => {
                rest = after;
                break;
            }
        }
    }
    out.push_str(rest);
    out
}

fn drop_urls(text: &str, drop_mentions: bool) -> String {
    text.split_whitespace()
        .filter(|chunk| {
            let chunk = chunk.trim_start_matches(['(', '<', '"', '\'']);
            let lower = chunk.to_ascii_lowercase();
            let is_url = lower.starts_with("http://")
                || lower.starts_with("https://")
                || lower.starts_with("www.");
            let is_mention = drop_mentions && chunk.starts_with('@');
            !is_url && !is_mention
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn drop_fillers(words: Vec<String>) -> Vec<String> {
    let mut kept = Vec::with_capacity(words.len());
    let mut i = 0;
    while i < words.len() {
        let is_phrase = words.get(i + 1).is_some_and(|next| {
            FILLER_PHRASES
                .iter()
                .any(|(first, second)| words[i] == *first && next == second)
        });
        if is_phrase {
            i += 2;
            continue;
        }
        if !FILLER_WORDS.contains(&words[i].as_str()) {
            kept.push(words[i].clone());
        }
        i += 1;
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_split_camel_case() {
        assert_eq!(split_identifier("parseHttpRequest"), vec!["parse", "Http", "Request"]);
        assert_eq!(split_identifier("HTMLParser"), vec!["HTML", "Parser"]);
        assert_eq!(split_identifier("utf8Decoder"), vec!["utf", "8", "Decoder"]);
        assert_eq!(split_identifier("plain"), vec!["plain"]);
    }

    #[test]
    fn test_markdown_drops_fenced_code_and_links() {
        let text = "# Title\n```rust\nlet hidden = 1;\n```\nSee [the docs](https://example.com/x) now";
        let cleaned = clean_text(text, SourceType::Markdown);
        assert!(!cleaned.contains("hidden"));
        assert!(!cleaned.contains("example"));
        assert!(cleaned.contains("the docs"));
        assert!(cleaned.contains("now"));
    }

    #[test]
    fn test_post_drops_urls_and_mentions() {
        let cleaned = clean_text("loving #rustlang @ferris https://rust-lang.org", SourceType::Post);
        assert_eq!(cleaned, "loving #rustlang");
    }

    #[test]
    fn test_transcript_drops_fillers() {
        let words = owned(&["um", "the", "game", "you", "know", "was", "like", "great"]);
        let refined = refine_words(words, SourceType::VoiceTranscript);
        assert_eq!(refined, owned(&["the", "game", "was", "great"]));
    }

    #[test]
    fn test_code_drops_keywords() {
        let words = owned(&["pub", "fn", "render", "graph", "return"]);
        let refined = refine_words(words, SourceType::Code);
        assert_eq!(refined, owned(&["render", "graph"]));
    }
}
