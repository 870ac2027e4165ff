//! Outbound message splitting.
//!
//! A reply carrying the internal blank-line separator becomes several
//! messages; a long single reply is chunked at sentence boundaries so the
//! receiving side sees a few short bubbles instead of a wall of text.

use crate::textutil::split_sentences;

const CHUNK_BUDGET_CHARS: usize = 160;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitReply {
    pub reply: String,
    pub extra_messages: Vec<String>,
}

pub fn split_reply(text: &str) -> SplitReply {
    let mut parts: Vec<String> = text
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect();

    if parts.is_empty() {
        return SplitReply {
            reply: text.trim().to_string(),
            extra_messages: Vec::new(),
        };
    }

    if parts.len() == 1 && parts[0].chars().count() > CHUNK_BUDGET_CHARS * 2 {
        parts = chunk_by_sentences(&parts[0]);
    }

    let reply = parts.remove(0);
    SplitReply {
        reply,
        extra_messages: parts,
    }
}

fn chunk_by_sentences(text: &str) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    for sentence in split_sentences(text) {
        if !current.is_empty()
            && current.chars().count() + sentence.chars().count() > CHUNK_BUDGET_CHARS
        {
            chunks.push(current.trim().to_string());
            current = String::new();
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&sentence);
    }
    if !current.trim().is_empty() {
        chunks.push(current.trim().to_string());
    }
    if chunks.is_empty() {
        chunks.push(text.trim().to_string());
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_separator_split() {
        let out = split_reply("Первая часть.\n\nВторая часть.\n\nТретья.");
        assert_eq!(out.reply, "Первая часть.");
        assert_eq!(out.extra_messages, vec!["Вторая часть.", "Третья."]);
    }

    #[test]
    fn test_short_reply_untouched() {
        let out = split_reply("Привет!");
        assert_eq!(out.reply, "Привет!");
        assert!(out.extra_messages.is_empty());
    }

    #[test]
    fn test_long_single_reply_chunked() {
        let long = "Это довольно длинное предложение номер раз для проверки. ".repeat(10);
        let out = split_reply(&long);
        assert!(!out.extra_messages.is_empty());
        for chunk in std::iter::once(&out.reply).chain(out.extra_messages.iter()) {
            assert!(chunk.chars().count() <= CHUNK_BUDGET_CHARS + 60, "chunk: {chunk}");
        }
    }
}
