//! Noun-phrase chunking used to isolate product names.
//!
//! The pipeline only depends on [`PhraseChunker`]; a tagger-backed implementation
//! can be plugged in without touching the extraction rules. [`HeuristicChunker`]
//! is the built-in rule-based fallback.

const CONNECTORS: &[&str] = &["of", "and", "&", "in", "or", "with", "n'"];

const STOP_WORDS: &[&str] = &[
    "a", "an", "the", "for", "per", "each", "ea", "only", "at", "to", "your", "our", "all",
    "is", "on", "from", "you", "get", "buy", "one", "two", "price", "prices", "reg",
    "regular", "limit", "when", "while", "supplies", "last", "mix", "match", "or", "more",
    "up", "selected", "varieties", "assorted", "min", "max", "pkg", "ct",
];

pub trait PhraseChunker: Send + Sync {
    /// Noun phrases in order of appearance.
    fn noun_phrases(&self, text: &str) -> Vec<String>;

    /// Runs of proper nouns in order of appearance.
    fn proper_noun_phrases(&self, text: &str) -> Vec<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Noun,
    ProperNoun,
    Connector,
    Break,
}

#[derive(Debug, Clone, Default)]
pub struct HeuristicChunker {
    extra_stop_words: Vec<String>,
}

impl HeuristicChunker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Additional lowercase words that end a phrase (units, promotion words).
    pub fn with_stop_words(mut self, words: impl IntoIterator<Item = String>) -> Self {
        self.extra_stop_words
            .extend(words.into_iter().map(|w| w.to_lowercase()));
        self
    }

    fn tag(&self, token: &str) -> Tag {
        if token.is_empty() || token.chars().any(|c| c.is_ascii_digit() || c == '$' || c == '%') {
            return Tag::Break;
        }
        let lower = token.to_lowercase();
        if CONNECTORS.contains(&lower.as_str()) {
            return Tag::Connector;
        }
        if STOP_WORDS.contains(&lower.as_str())
            || self.extra_stop_words.iter().any(|w| *w == lower)
            || !token.chars().any(char::is_alphabetic)
        {
            return Tag::Break;
        }
        if token.chars().next().is_some_and(char::is_uppercase) {
            Tag::ProperNoun
        } else {
            Tag::Noun
        }
    }

    fn tagged(&self, text: &str) -> Vec<(String, Tag)> {
        text.split_whitespace()
            .flat_map(|raw| raw.split('/'))
            .map(clean_token)
            .filter(|t| !t.is_empty())
            .map(|t| {
                let tag = self.tag(&t);
                (t, tag)
            })
            .collect()
    }

    /// Groups runs of accepted tokens. A single connector between two runs joins them.
    fn chunk(&self, text: &str, accept: impl Fn(Tag) -> bool) -> Vec<String> {
        let tokens = self.tagged(text);
        let mut phrases = Vec::new();
        let mut current: Vec<&str> = Vec::new();
        let mut i = 0;

        while i < tokens.len() {
            let (word, tag) = (&tokens[i].0, tokens[i].1);
            if accept(tag) {
                current.push(word);
            } else if tag == Tag::Connector
                && !current.is_empty()
                && tokens.get(i + 1).is_some_and(|(_, next)| accept(*next))
            {
                current.push(word);
            } else if !current.is_empty() {
                phrases.push(current.join(" "));
                current.clear();
            }
            i += 1;
        }
        if !current.is_empty() {
            phrases.push(current.join(" "));
        }
        phrases
    }
}

impl PhraseChunker for HeuristicChunker {
    fn noun_phrases(&self, text: &str) -> Vec<String> {
        self.chunk(text, |tag| matches!(tag, Tag::Noun | Tag::ProperNoun))
    }

    fn proper_noun_phrases(&self, text: &str) -> Vec<String> {
        self.chunk(text, |tag| tag == Tag::ProperNoun)
    }
}

fn clean_token(raw: &str) -> String {
    raw.trim_matches(|c: char| !(c.is_alphanumeric() || c == '$' || c == '%' || c == '&'))
        .to_string()
}
