
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use tracing::debug;

use crate::corpus::Song;

/// Portuguese stopwords, plus the handful of extra function words the corpus
/// notes called out explicitly ("pra" and friends).
const STOPWORDS: &[&str] = &[
    "a", "à", "ao", "aos", "aquela", "aquelas", "aquele", "aqueles", "aquilo", "as", "às", "até",
    "com", "como", "da", "das", "de", "dela", "delas", "dele", "deles", "depois", "do", "dos",
    "e", "é", "ela", "elas", "ele", "eles", "em", "entre", "era", "eram", "essa", "essas", "esse",
    "esses", "esta", "está", "estamos", "estão", "estas", "estava", "estavam", "este", "esteja",
    "estes", "estou", "eu", "foi", "fomos", "for", "foram", "fosse", "fui", "há", "isso", "isto",
    "já", "lhe", "lhes", "mais", "mas", "me", "mesmo", "meu", "meus", "minha", "minhas", "muito",
    "na", "não", "nas", "nem", "no", "nos", "nós", "nossa", "nossas", "nosso", "nossos", "num",
    "numa", "o", "os", "ou", "para", "pela", "pelas", "pelo", "pelos", "por", "pra", "qual",
    "quando", "que", "quem", "são", "se", "seja", "sem", "ser", "será", "seu", "seus", "só",
    "sou", "sua", "suas", "também", "te", "tem", "tém", "temos", "tenho", "ter", "teu", "tu",
    "tua", "tuas", "um", "uma", "você", "vocês", "vos",
];

static STOPWORD_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| STOPWORDS.iter().copied().collect());

/// Lowercase the text, keep only purely alphabetic words, and drop
/// stopwords. This is the lexical cleanup feeding the frequency and TF-IDF
/// reports; the semantic matching pipeline never sees it.
#[inline]
pub fn normalize_lyrics(text: &str) -> String {
    text.to_lowercase()
        .split_whitespace()
        .filter(|word| word.chars().all(char::is_alphabetic))
        .filter(|word| !STOPWORD_SET.contains(word))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Corpus-wide word counts and per-song TF-IDF key terms.
#[derive(Debug, Clone)]
pub struct FrequencyAnalysis {
    cleaned: Vec<Vec<String>>,
    corpus_counts: HashMap<String, usize>,
    document_frequency: HashMap<String, usize>,
}

impl FrequencyAnalysis {
    #[inline]
    pub fn new(songs: &[Song]) -> Self {
        let cleaned: Vec<Vec<String>> = songs
            .iter()
            .map(|song| {
                normalize_lyrics(&song.lyrics)
                    .split_whitespace()
                    .map(str::to_string)
                    .collect()
            })
            .collect();

        let mut corpus_counts: HashMap<String, usize> = HashMap::new();
        let mut document_frequency: HashMap<String, usize> = HashMap::new();

        for words in &cleaned {
            for word in words {
                *corpus_counts.entry(word.clone()).or_insert(0) += 1;
            }
            let unique: HashSet<&String> = words.iter().collect();
            for word in unique {
                *document_frequency.entry(word.clone()).or_insert(0) += 1;
            }
        }

        debug!(
            "Frequency analysis over {} songs, {} distinct words",
            cleaned.len(),
            corpus_counts.len()
        );

        Self {
            cleaned,
            corpus_counts,
            document_frequency,
        }
    }

    #[inline]
    pub fn song_count(&self) -> usize {
        self.cleaned.len()
    }

    /// The `n` most frequent words across the whole corpus, counts
    /// descending with alphabetical order breaking ties.
    #[inline]
    pub fn top_words(&self, n: usize) -> Vec<(String, usize)> {
        let mut entries: Vec<(String, usize)> = self
            .corpus_counts
            .iter()
            .map(|(word, count)| (word.clone(), *count))
            .collect();
        entries.sort_by(|x, y| y.1.cmp(&x.1).then_with(|| x.0.cmp(&y.0)));
        entries.truncate(n);
        entries
    }

    /// The `n` highest TF-IDF terms for one song, the words that set it
    /// apart from the rest of the corpus. Term frequency is the raw count,
    /// idf is the smoothed `ln((1 + N) / (1 + df)) + 1`, and ties break
    /// alphabetically so output is deterministic.
    #[inline]
    pub fn key_terms(&self, song_index: usize, n: usize) -> Vec<String> {
        let Some(words) = self.cleaned.get(song_index) else {
            return Vec::new();
        };

        let mut term_counts: HashMap<&String, usize> = HashMap::new();
        for word in words {
            *term_counts.entry(word).or_insert(0) += 1;
        }

        let total_docs = self.cleaned.len() as f64;
        let mut scored: Vec<(&String, f64)> = term_counts
            .into_iter()
            .map(|(word, count)| {
                let df = self.document_frequency.get(word).copied().unwrap_or(0) as f64;
                let idf = ((1.0 + total_docs) / (1.0 + df)).ln() + 1.0;
                (word, count as f64 * idf)
            })
            .collect();

        scored.sort_by(|x, y| y.1.total_cmp(&x.1).then_with(|| x.0.cmp(y.0)));
        scored.truncate(n);
        scored.into_iter().map(|(word, _)| word.clone()).collect()
    }
}
