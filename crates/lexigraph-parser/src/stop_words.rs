//! Word lists used to filter tokens before graph construction.

/// Common English function words that never become graph nodes.
///
/// Entries are lowercase with ASCII apostrophes; the lexer folds typographic
/// apostrophes before lookup.
pub const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any",
    "are", "aren't", "as", "at", "be", "because", "been", "before", "being", "below", "between",
    "both", "but", "by", "can", "can't", "cannot", "could", "couldn't", "did", "didn't", "do",
    "does", "doesn't", "doing", "don't", "down", "during", "each", "even", "ever", "every", "few",
    "for", "from", "further", "get", "gets", "got", "had", "hadn't", "has", "hasn't", "have",
    "haven't", "having", "he", "he'd", "he'll", "he's", "her", "here", "here's", "hers",
    "herself", "him", "himself", "his", "how", "how's", "i", "i'd", "i'll", "i'm", "i've", "if",
    "in", "into", "is", "isn't", "it", "it's", "its", "itself", "just", "let's", "may", "me",
    "might", "more", "most", "much", "must", "mustn't", "my", "myself", "no", "nor", "not", "now",
    "of", "off", "on", "once", "only", "or", "other", "ought", "our", "ours", "ourselves", "out",
    "over", "own", "same", "shall", "shan't", "she", "she'd", "she'll", "she's", "should",
    "shouldn't", "so", "some", "such", "than", "that", "that's", "the", "their", "theirs", "them",
    "themselves", "then", "there", "there's", "these", "they", "they'd", "they'll", "they're",
    "they've", "this", "those", "through", "to", "too", "under", "until", "up", "upon", "us",
    "very", "was", "wasn't", "we", "we'd", "we'll", "we're", "we've", "were", "weren't", "what",
    "what's", "when", "when's", "where", "where's", "which", "while", "who", "who's", "whom",
    "why", "why's", "will", "with", "won't", "would", "wouldn't", "yet", "you", "you'd",
    "you'll", "you're", "you've", "your", "yours", "yourself", "yourselves",
];

/// Spoken filler words dropped from voice transcripts.
pub const FILLER_WORDS: &[&str] = &[
    "uh", "um", "umm", "uhm", "er", "erm", "ah", "hmm", "mm", "like", "yeah", "okay", "ok",
    "basically", "actually", "literally", "right", "so", "well",
];

/// Two-word fillers dropped from voice transcripts.
pub const FILLER_PHRASES: &[(&str, &str)] = &[
    ("you", "know"),
    ("i", "mean"),
    ("kind", "of"),
    ("sort", "of"),
];

/// Programming keywords that carry no domain meaning in source code.
pub const CODE_KEYWORDS: &[&str] = &[
    "async", "await", "bool", "break", "case", "catch", "class", "const", "continue", "def",
    "default", "elif", "else", "enum", "export", "extends", "false", "fn", "func", "function",
    "impl", "import", "int", "let", "match", "mod", "mut", "new", "nil", "none", "null", "pass",
    "pub", "return", "self", "static", "str", "string", "struct", "switch", "this", "throw",
    "trait", "true", "try", "type", "use", "var", "void", "where", "while",
];

/// Returns `true` if `word` (lowercase) is a stop word.
pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}
