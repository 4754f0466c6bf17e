//! Sparse term-frequency vectors and cosine similarity

use std::collections::HashMap;

use super::document::DocumentMetadata;

/// Mapping from normalized term to its occurrence count within a text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermVector {
    counts: HashMap<String, u32>,
}

impl TermVector {
    /// Builds the vector for `text`
    ///
    /// Lowercases, turns every character that is neither a word character
    /// (ASCII letter, ASCII digit, `_`) nor whitespace into a space, splits
    /// on whitespace and drops single-character tokens.
    pub fn from_text(text: &str) -> Self {
        let normalized: String = text
            .to_lowercase()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '_' || c.is_whitespace() {
                    c
                } else {
                    ' '
                }
            })
            .collect();

        let mut counts = HashMap::new();

        for token in normalized.split_whitespace() {
            // only ASCII word characters survive normalization, so bytes == chars
            if token.len() > 1 {
                *counts.entry(token.to_string()).or_insert(0) += 1;
            }
        }

        Self { counts }
    }

    pub fn get(&self, term: &str) -> u32 {
        self.counts.get(term).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn terms(&self) -> impl Iterator<Item = (&str, u32)> {
        self.counts.iter().map(|(term, count)| (term.as_str(), *count))
    }

    /// Sum of squared counts
    fn squared_magnitude(&self) -> u64 {
        self.counts.values().map(|c| u64::from(*c) * u64::from(*c)).sum()
    }
}

impl<S: Into<String>> FromIterator<(S, u32)> for TermVector {
    fn from_iter<T: IntoIterator<Item = (S, u32)>>(iter: T) -> Self {
        Self {
            counts: iter
                .into_iter()
                .filter(|(_, count)| *count > 0)
                .map(|(term, count)| (term.into(), count))
                .collect(),
        }
    }
}

/// Cosine of the angle between two term vectors, in `[0, 1]`
///
/// Returns 0 when either vector is empty. Sums are accumulated as integers
/// so the result does not depend on map iteration order.
pub fn cosine_similarity(a: &TermVector, b: &TermVector) -> f64 {
    let magnitude_a = a.squared_magnitude();
    let magnitude_b = b.squared_magnitude();

    if magnitude_a == 0 || magnitude_b == 0 {
        return 0.0;
    }

    // keys missing from either side contribute 0 to the dot product
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let dot: u64 = small
        .counts
        .iter()
        .map(|(term, count)| u64::from(*count) * u64::from(large.get(term)))
        .sum();

    let denominator = (magnitude_a as f64 * magnitude_b as f64).sqrt();
    (dot as f64 / denominator).min(1.0)
}

/// Stable cache key for a text
///
/// Polynomial rolling hash `h = h * 31 + c` over UTF-16 code units with
/// 32-bit signed wrapping arithmetic.
pub fn content_hash(text: &str) -> i32 {
    text.encode_utf16().fold(0i32, |hash, unit| {
        hash.wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(i32::from(unit))
    })
}

/// A searchable entry: one per document id
#[derive(Debug, Clone, PartialEq)]
pub struct IndexEntry {
    pub id: String,
    pub vector: TermVector,
    pub metadata: DocumentMetadata,
}

/// Per-query similarity of one index entry
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredResult {
    pub id: String,
    pub score: f64,
    pub metadata: DocumentMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vector(pairs: &[(&str, u32)]) -> TermVector {
        pairs.iter().map(|(t, c)| (*t, *c)).collect()
    }

    #[test]
    fn test_from_text_counts_terms() {
        let v = TermVector::from_text("Webhook trigger, webhook TRIGGER and a cron");

        assert_eq!(v.get("webhook"), 2);
        assert_eq!(v.get("trigger"), 2);
        assert_eq!(v.get("cron"), 1);
        assert_eq!(v.get("and"), 1);
        // single character tokens are dropped
        assert_eq!(v.get("a"), 0);
    }

    #[test]
    fn test_from_text_punctuation_normalization() {
        assert_eq!(
            TermVector::from_text("Hello, World!"),
            TermVector::from_text("hello world")
        );
        assert_eq!(
            TermVector::from_text("  POST   /workflows/{id}/run "),
            TermVector::from_text("post workflows id run")
        );
    }

    #[test]
    fn test_from_text_keeps_underscores_and_digits() {
        let v = TermVector::from_text("N8N_ENCRYPTION_KEY port 5678");

        assert_eq!(v.get("n8n_encryption_key"), 1);
        assert_eq!(v.get("5678"), 1);
    }

    #[test]
    fn test_from_text_non_ascii_letters_split_tokens() {
        let v = TermVector::from_text("configuração");

        assert_eq!(v.get("configura"), 1);
        assert_eq!(v.len(), 1);
    }

    #[test]
    fn test_from_text_empty() {
        assert!(TermVector::from_text("").is_empty());
        assert!(TermVector::from_text(" !? , a b ").is_empty());
    }

    #[test]
    fn test_cosine_self_similarity_is_one() {
        let v = vector(&[("n8n", 3), ("webhook", 2), ("cron", 1)]);
        assert_eq!(cosine_similarity(&v, &v), 1.0);

        let single = vector(&[("workflow", 7)]);
        assert_eq!(cosine_similarity(&single, &single), 1.0);
    }

    #[test]
    fn test_cosine_zero_vector() {
        let v = vector(&[("n8n", 1)]);
        let empty = TermVector::default();

        assert_eq!(cosine_similarity(&v, &empty), 0.0);
        assert_eq!(cosine_similarity(&empty, &v), 0.0);
        assert_eq!(cosine_similarity(&empty, &empty), 0.0);
    }

    #[test]
    fn test_cosine_disjoint_and_partial() {
        let a = vector(&[("alpha", 1), ("beta", 1)]);
        let b = vector(&[("gamma", 4)]);
        let c = vector(&[("alpha", 1)]);

        assert_eq!(cosine_similarity(&a, &b), 0.0);

        let partial = cosine_similarity(&a, &c);
        assert!((partial - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-12);
    }

    #[test]
    fn test_cosine_bounds_and_symmetry() {
        let samples = [
            vector(&[("n8n", 5), ("node", 2)]),
            vector(&[("node", 9), ("set", 1), ("if", 3)]),
            vector(&[("n8n", 1), ("if", 1), ("merge", 12)]),
            TermVector::from_text("Common N8N Errors and Solutions"),
        ];

        for a in &samples {
            for b in &samples {
                let score = cosine_similarity(a, b);
                assert!((0.0..=1.0).contains(&score));
                assert_eq!(score, cosine_similarity(b, a));
            }
        }
    }

    #[test]
    fn test_content_hash_matches_reference_values() {
        assert_eq!(content_hash(""), 0);
        assert_eq!(content_hash("a"), 97);
        assert_eq!(content_hash("ab"), 97 * 31 + 98);
        assert_eq!(content_hash("hello"), 99_162_322);
    }

    #[test]
    fn test_content_hash_wraps() {
        let long = "workflow ".repeat(200);
        // must not panic on overflow and must be stable
        assert_eq!(content_hash(&long), content_hash(&long));
        assert_ne!(content_hash("Hello"), content_hash("hello"));
    }

    #[test]
    fn test_from_iter_drops_zero_counts() {
        let v: TermVector = [("a1", 0u32), ("b2", 2)].into_iter().collect();
        assert_eq!(v.len(), 1);
        assert_eq!(v.get("b2"), 2);
    }
}
