//! Shared text helpers for the pipeline stages.
//!
//! Sentence splitting here is deliberately naive (punctuation-based): the
//! pipeline operates on short conversational Russian, not prose.

/// Split text into sentences, keeping the terminal punctuation attached.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    let chars: Vec<char> = text.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let ch = chars[i];
        current.push(ch);
        if matches!(ch, '.' | '!' | '?' | '…') {
            // Swallow a trailing run of the same closers ("?!", "!!").
            while i + 1 < chars.len() && matches!(chars[i + 1], '.' | '!' | '?' | '…') {
                i += 1;
                current.push(chars[i]);
            }
            let trimmed = current.trim();
            if !trimmed.is_empty() {
                out.push(trimmed.to_string());
            }
            current.clear();
        }
        i += 1;
    }
    let tail = current.trim();
    if !tail.is_empty() {
        out.push(tail.to_string());
    }
    out
}

/// Lowercased word set, punctuation stripped. Basis for Jaccard dedup.
fn token_set(sentence: &str) -> std::collections::HashSet<String> {
    sentence
        .to_lowercase()
        .split_whitespace()
        .map(|w| {
            w.chars()
                .filter(|c| c.is_alphanumeric())
                .collect::<String>()
        })
        .filter(|w| !w.is_empty())
        .collect()
}

/// Token-level Jaccard similarity between two sentences.
pub fn jaccard(a: &str, b: &str) -> f32 {
    let sa = token_set(a);
    let sb = token_set(b);
    if sa.is_empty() && sb.is_empty() {
        return 1.0;
    }
    let inter = sa.intersection(&sb).count() as f32;
    let union = sa.union(&sb).count() as f32;
    if union == 0.0 {
        0.0
    } else {
        inter / union
    }
}

/// Case- and punctuation-insensitive normal form for repeat detection.
pub fn normal_form(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Collapse runs of spaces/tabs and trim. Newlines are preserved: the
/// message splitter uses them as separators.
pub fn normalize_spaces(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_space = false;
    for ch in text.chars() {
        if ch == ' ' || ch == '\t' {
            if !prev_space {
                out.push(' ');
            }
            prev_space = true;
        } else {
            out.push(ch);
            prev_space = ch == '\n';
        }
    }
    out.trim().to_string()
}

/// Uppercase the first alphabetic character, leaving the rest intact.
pub fn capitalize_first(text: &str) -> String {
    let mut done = false;
    text.chars()
        .map(|c| {
            if !done && c.is_alphabetic() {
                done = true;
                c.to_uppercase().next().unwrap_or(c)
            } else {
                c
            }
        })
        .collect()
}

/// Truncate to at most `max_chars` characters at a word boundary,
/// appending an ellipsis when anything was cut.
pub fn truncate_at_word(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let budget = max_chars.saturating_sub(1); // room for the ellipsis
    let mut out = String::new();
    let mut last_space = 0;
    for (count, ch) in text.chars().enumerate() {
        if count >= budget {
            break;
        }
        if ch.is_whitespace() {
            last_space = out.chars().count();
        }
        out.push(ch);
    }
    if last_space > 0 {
        out = out.chars().take(last_space).collect();
    }
    let mut out = out.trim_end().to_string();
    out.push('…');
    out
}

/// A "word" that mixes Cyrillic and Latin letters — an artifact of stitched
/// generations, dropped by the sanitizer.
pub fn is_mixed_script(word: &str) -> bool {
    let has_cyr = word.chars().any(|c| ('\u{0400}'..='\u{04FF}').contains(&c));
    let has_lat = word.chars().any(|c| c.is_ascii_alphabetic());
    has_cyr && has_lat
}
