use super::stopwords::is_stopword;

/// Characters after which the next word starts a new sentence.
const SENTENCE_BREAKS: &[char] = &['.', '?', '!', ':', ';', '\n', '•', '●', '▪', '◦', '*'];

/// A word as it appeared in the source text, plus its normalized form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The word exactly as written.
    pub surface: String,
    /// Normalized term, or `None` for stopwords and single letters.
    pub term: Option<String>,
    /// First character is uppercase.
    pub capitalized: bool,
    /// First word of a sentence, line or list item.
    pub sentence_start: bool,
}

impl Token {
    fn new(surface: &str, sentence_start: bool) -> Self {
        Self {
            surface: surface.to_string(),
            term: normalize_term(surface),
            capitalized: surface.chars().next().is_some_and(char::is_uppercase),
            sentence_start,
        }
    }
}

/// Splits text into word tokens on any non-alphanumeric character.
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut word = String::new();
    let mut at_sentence_start = true;

    for ch in text.chars() {
        if ch.is_alphanumeric() {
            word.push(ch);
            continue;
        }
        if !word.is_empty() {
            tokens.push(Token::new(&word, at_sentence_start));
            at_sentence_start = false;
            word.clear();
        }
        if SENTENCE_BREAKS.contains(&ch) {
            at_sentence_start = true;
        }
    }
    if !word.is_empty() {
        tokens.push(Token::new(&word, at_sentence_start));
    }

    tokens
}

/// Normalized content terms of `text`, in order, duplicates kept.
pub fn terms(text: &str) -> Vec<String> {
    tokenize(text).into_iter().filter_map(|t| t.term).collect()
}

/// Lowercases, drops stopwords and lone letters, and strips plural endings.
pub fn normalize_term(word: &str) -> Option<String> {
    let lower = word.to_lowercase();
    let mut chars = lower.chars();
    let first = chars.next()?;
    if chars.next().is_none() && first.is_alphabetic() {
        return None;
    }
    if is_stopword(&lower) {
        return None;
    }
    Some(stem(&lower))
}

fn stem(word: &str) -> String {
    if word.chars().count() <= 3 || !word.chars().all(char::is_alphabetic) {
        return word.to_string();
    }
    if let Some(base) = word.strip_suffix("ies")
        && base.chars().count() >= 2
    {
        return format!("{base}y");
    }
    if let Some(base) = word.strip_suffix("sses") {
        return format!("{base}ss");
    }
    if word.ends_with("ss") || word.ends_with("us") || word.ends_with("is") {
        return word.to_string();
    }
    word.strip_suffix('s').unwrap_or(word).to_string()
}

pub fn contains_numeral(text: &str) -> bool {
    text.chars().any(|c| c.is_ascii_digit())
}

/// Splits text into trimmed sentences.
///
/// Line breaks always end a sentence; `.`, `?` and `!` end one when followed by
/// whitespace or the end of the line. Returned slices borrow from `text`.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();

    for line in text.lines() {
        let mut start = 0;
        let mut chars = line.char_indices().peekable();
        while let Some((idx, ch)) = chars.next() {
            if !matches!(ch, '.' | '?' | '!') {
                continue;
            }
            let at_boundary = chars.peek().is_none_or(|&(_, next)| next.is_whitespace());
            if at_boundary {
                let end = idx + ch.len_utf8();
                let sentence = line[start..end].trim();
                if !sentence.is_empty() {
                    sentences.push(sentence);
                }
                start = end;
            }
        }
        let rest = line[start..].trim();
        if !rest.is_empty() {
            sentences.push(rest);
        }
    }

    sentences
}
