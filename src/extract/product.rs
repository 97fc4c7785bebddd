use crate::extract::{BlockText, ComponentExtractor, ComponentValue};
use crate::ocr::annotation::normalize_whitespace;

const MIN_NAME_TEXT_LEN: usize = 5;
const MIN_NAME_PHRASE_LEN: usize = 5;
const MIN_DESCRIPTION_WORDS: usize = 5;

/// First sufficiently long noun phrase left after merchant boilerplate and
/// "product of <country>" phrases are removed.
pub fn extract_product_name(
    extractor: &ComponentExtractor,
    block: &BlockText<'_>,
) -> Option<ComponentValue> {
    let rules = extractor.rules();
    let chunker = extractor.chunker();

    let mut text = block.block.text.clone();
    for pattern in &rules.ignore_in_name {
        text = pattern.replace_all(&text, "").into_owned();
    }
    let text = normalize_whitespace(&text);

    let proper_nouns: Vec<String> = chunker
        .proper_noun_phrases(&text)
        .into_iter()
        .filter(|phrase| phrase.chars().count() > 2)
        .collect();
    let text = normalize_whitespace(&strip_product_of(rules, &text, &proper_nouns));

    if text.chars().count() < MIN_NAME_TEXT_LEN {
        return None;
    }

    chunker
        .noun_phrases(&text)
        .into_iter()
        .find(|phrase| phrase.chars().count() > MIN_NAME_PHRASE_LEN)
        .map(ComponentValue::ProductName)
}

pub fn extract_product_code(
    extractor: &ComponentExtractor,
    block: &BlockText<'_>,
) -> Option<ComponentValue> {
    extractor
        .rules()
        .product_code
        .find(&block.text)
        .map(|m| ComponentValue::ProductCode(m.as_str().to_string()))
}

/// Longer free text that is not just a number.
pub fn extract_product_description(
    _extractor: &ComponentExtractor,
    block: &BlockText<'_>,
) -> Option<ComponentValue> {
    let text = &block.text;
    if !text.chars().any(char::is_alphabetic) {
        return None;
    }
    if text.split_whitespace().count() < MIN_DESCRIPTION_WORDS {
        return None;
    }
    Some(ComponentValue::ProductDescription(text.clone()))
}

/// Removes every "product of X" where X starts with one of the proper-noun phrases.
fn strip_product_of(
    rules: &crate::extract::rules::ExtractionRules,
    text: &str,
    proper_nouns: &[String],
) -> String {
    let mut candidates: Vec<&str> = Vec::new();
    for phrase in proper_nouns {
        candidates.push(phrase);
        // "Product Of Mexico" chunks as one phrase; its tail is the country.
        if let Some((_, tail)) = split_after_connector(phrase) {
            candidates.push(tail);
        }
    }
    candidates.sort_by_key(|c| std::cmp::Reverse(c.len()));

    let mut removals: Vec<(usize, usize)> = Vec::new();
    for m in rules.product_of.find_iter(text) {
        let rest = &text[m.end()..];
        if let Some(country) = candidates.iter().find(|c| rest.starts_with(**c)) {
            removals.push((m.start(), m.end() + country.len()));
        }
    }

    let mut stripped = text.to_string();
    for (start, end) in removals.into_iter().rev() {
        stripped.replace_range(start..end, "");
    }
    stripped
}

fn split_after_connector(phrase: &str) -> Option<(&str, &str)> {
    let lower = phrase.to_ascii_lowercase();
    [" of ", " and ", " or "]
        .iter()
        .filter_map(|connector| lower.find(connector).map(|idx| (idx, connector.len())))
        .min_by_key(|(idx, _)| *idx)
        .map(|(idx, len)| (&phrase[..idx], &phrase[idx + len..]))
}
