//! Frequency-based sentence extraction with a legal-vocabulary boost.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;

use super::SummaryType;

static SENTENCE_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+").expect("valid sentence regex"));
static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z]+").expect("valid word regex"));

static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
        "is", "are", "was", "were", "been", "be", "have", "has", "had", "do", "does", "did",
        "will", "would", "could", "should", "this", "that", "these", "those", "it", "its", "he",
        "she", "they", "them", "their", "there", "where", "when", "who", "what", "which", "why",
    ]
    .into_iter()
    .collect()
});

static LEGAL_TERMS: Lazy<HashMap<&'static str, u32>> = Lazy::new(|| {
    [
        ("court", 4), ("judge", 4), ("ruling", 5), ("decision", 5), ("verdict", 5),
        ("plaintiff", 4), ("defendant", 4), ("evidence", 4), ("testimony", 3),
        ("appeal", 4), ("statute", 4), ("law", 3), ("legal", 3), ("case", 3),
        ("held", 5), ("ruled", 5), ("decided", 5), ("found", 4), ("concluded", 4),
        ("jurisdiction", 3), ("precedent", 4), ("contract", 3), ("liability", 4),
        ("damages", 4), ("injunction", 3), ("motion", 3), ("order", 3), ("judgment", 5),
    ]
    .into_iter()
    .collect()
});

const MIN_SENTENCE_CHARS: usize = 21;
const MAX_BULLETS: usize = 8;

#[derive(Debug, Clone)]
pub struct Extraction {
    pub summary: String,
    pub key_sentences: Vec<String>,
    pub key_phrases: Vec<String>,
}

/// Upper bound on selected sentences for a summary type.
pub fn max_sentences(summary_type: SummaryType) -> usize {
    match summary_type {
        SummaryType::Detailed => 15,
        SummaryType::Concise => 8,
        SummaryType::Executive => 6,
        SummaryType::Technical => 12,
        SummaryType::Bullets => 10,
    }
}

fn max_phrases(summary_type: SummaryType) -> usize {
    match summary_type {
        SummaryType::Detailed => 20,
        SummaryType::Concise => 10,
        SummaryType::Executive => 8,
        SummaryType::Technical => 15,
        SummaryType::Bullets => 12,
    }
}

pub fn summarize(text: &str, summary_type: SummaryType) -> Extraction {
    let sentences = split_sentences(text);
    let key_sentences = top_sentences(&sentences, text, max_sentences(summary_type));
    let key_phrases = key_phrases(text, max_phrases(summary_type));

    let summary = match summary_type {
        SummaryType::Bullets => key_sentences
            .iter()
            .take(MAX_BULLETS)
            .map(|s| format!("• {s}"))
            .collect::<Vec<_>>()
            .join("\n"),
        _ if key_sentences.is_empty() => String::new(),
        _ => format!("{}.", key_sentences.join(". ")),
    };

    Extraction {
        summary,
        key_sentences,
        key_phrases,
    }
}

pub fn split_sentences(text: &str) -> Vec<String> {
    SENTENCE_BREAK
        .split(text)
        .map(|s| s.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|s| s.chars().count() >= MIN_SENTENCE_CHARS)
        .collect()
}

fn content_words(text: &str) -> impl Iterator<Item = String> + '_ {
    WORD.find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .filter(|w| w.len() > 3 && !STOP_WORDS.contains(w.as_str()))
}

fn word_frequencies(text: &str) -> HashMap<String, u32> {
    let mut freq = HashMap::new();
    for word in content_words(text) {
        *freq.entry(word).or_insert(0) += 1;
    }
    freq
}

fn score_sentence(sentence: &str, freq: &HashMap<String, u32>) -> f64 {
    let mut score = 0.0;
    let mut count = 0usize;
    for word in content_words(sentence) {
        score += f64::from(freq.get(&word).copied().unwrap_or(0));
        if let Some(weight) = LEGAL_TERMS.get(word.as_str()) {
            score += f64::from(weight * 2);
        }
        count += 1;
    }
    if count == 0 {
        return 0.0;
    }

    // Favor medium-length sentences
    let mut score = score / count as f64;
    if !(5..=50).contains(&count) {
        score *= 0.7;
    }
    score
}

/// Highest-scoring sentences, returned in document order.
fn top_sentences(sentences: &[String], text: &str, limit: usize) -> Vec<String> {
    let freq = word_frequencies(text);
    let mut scored: Vec<(usize, f64)> = sentences
        .iter()
        .enumerate()
        .map(|(i, s)| (i, score_sentence(s, &freq)))
        .collect();

    // Stable sort keeps earlier sentences ahead on equal scores
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored.truncate(limit);
    scored.sort_by_key(|(i, _)| *i);

    scored.into_iter().map(|(i, _)| sentences[i].clone()).collect()
}

fn key_phrases(text: &str, limit: usize) -> Vec<String> {
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, u32> = HashMap::new();
    for word in content_words(text) {
        let entry = counts.entry(word.clone()).or_insert_with(|| {
            order.push(word);
            0
        });
        *entry += 1;
    }

    let mut ranked: Vec<(usize, String, u32)> = order
        .into_iter()
        .enumerate()
        .map(|(i, w)| {
            let boost = LEGAL_TERMS.get(w.as_str()).copied().unwrap_or(0);
            let count = counts[&w] + boost;
            (i, w, count)
        })
        .collect();
    ranked.sort_by(|a, b| b.2.cmp(&a.2).then(a.0.cmp(&b.0)));
    ranked.into_iter().take(limit).map(|(_, w, _)| w).collect()
}
