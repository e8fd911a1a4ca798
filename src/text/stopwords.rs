/// English function words plus the question scaffolding users wrap around a
/// topic ("tell me", "what is", "how many").
///
/// Quantity words ("number", "total", "count") are listed too: they signal
/// intent, which the retriever reads from the raw query, but never topic.
const STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any",
    "are", "as", "at", "be", "because", "been", "before", "being", "below", "between", "both",
    "but", "by", "can", "could", "count", "did", "do", "does", "doing", "down", "during", "each",
    "few", "for", "from", "further", "get", "give", "had", "has", "have", "having", "he", "her",
    "here", "hers", "herself", "him", "himself", "his", "how", "i", "if", "in", "into", "is", "it",
    "its", "itself", "just", "let", "many", "me", "more", "most", "much", "my", "myself", "no",
    "nor", "not", "now", "number", "of", "off", "on", "once", "only", "or", "other", "our", "ours",
    "out", "over", "own", "per", "please", "same", "she", "should", "so", "some", "such", "tell",
    "than", "that", "the", "their", "theirs", "them", "then", "there", "these", "they", "this",
    "those", "through", "to", "too", "total", "under", "until", "up", "us", "very", "was", "we",
    "were", "what", "whats", "when", "where", "which", "while", "who", "whom", "why", "will",
    "with", "would", "you", "your", "yours", "yourself",
];

/// Verbs, adjectives and nouns that phrase a question rather than name its
/// subject ("what is used", "what happens", "any details"). Unlike stopwords
/// these stay in the index; they are only ignored in a query when the corpus
/// never uses them.
const FILLER_WORDS: &[&str] = &[
    "cover", "detail", "expect", "explain", "given", "happen", "info", "information", "kind",
    "know", "known", "learn", "like", "mention", "need", "recommend", "study", "thing", "topic",
    "type", "use", "used", "using", "usual", "way", "work",
];

/// Endings of inflected verbs, adverbs and adjectives ("conducted", "typical").
const FILLER_SUFFIXES: &[&str] = &["al", "ed", "ing", "ly"];

/// Returns `true` for lowercase words that carry no topical signal.
pub fn is_stopword(word: &str) -> bool {
    STOPWORDS.binary_search(&word).is_ok()
}

/// Returns `true` for normalized terms that read as question phrasing: a
/// listed filler word, or an inflected form with at least three characters
/// before the ending.
pub fn is_filler(term: &str) -> bool {
    if FILLER_WORDS.binary_search(&term).is_ok() {
        return true;
    }
    let len = term.chars().count();
    FILLER_SUFFIXES
        .iter()
        .any(|suffix| term.ends_with(suffix) && len > suffix.len() + 2)
}
