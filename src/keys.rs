use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::SummarizationError;

/// Prefix of the sample values shipped in `.env.example`.
const PLACEHOLDER_PREFIX: &str = "your_groq_api_key";

/// Round-robin pool of LLM provider API keys. The list is fixed at
/// construction; the cursor is shared across requests.
#[derive(Debug, Default)]
pub struct KeyPool {
    keys: Vec<String>,
    cursor: AtomicUsize,
}

impl KeyPool {
    /// Build a pool from raw candidate values, dropping missing, blank and
    /// placeholder entries while keeping the original order.
    pub fn from_candidates<I>(candidates: I) -> Self
    where
        I: IntoIterator<Item = Option<String>>,
    {
        let keys = candidates
            .into_iter()
            .flatten()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty() && !k.starts_with(PLACEHOLDER_PREFIX))
            .collect();

        Self {
            keys,
            cursor: AtomicUsize::new(0),
        }
    }

    /// Hand out the next key, advancing the cursor.
    pub fn next_key(&self) -> Result<&str, SummarizationError> {
        if self.keys.is_empty() {
            return Err(SummarizationError::NoApiKeys);
        }
        let index = self.cursor.fetch_add(1, Ordering::Relaxed) % self.keys.len();
        Ok(&self.keys[index])
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(keys: &[&str]) -> KeyPool {
        KeyPool::from_candidates(keys.iter().map(|k| Some(k.to_string())))
    }

    #[test]
    fn rotates_through_every_key_then_wraps() {
        for size in 1..=4 {
            let names: Vec<String> = (0..size).map(|i| format!("gsk_{i}")).collect();
            let pool = KeyPool::from_candidates(names.iter().cloned().map(Some));

            let handed_out: Vec<String> = (0..size)
                .map(|_| pool.next_key().unwrap().to_string())
                .collect();
            assert_eq!(handed_out, names);
            assert_eq!(pool.next_key().unwrap(), names[0]);
        }
    }

    #[test]
    fn empty_pool_always_fails() {
        let pool = KeyPool::default();
        for _ in 0..3 {
            assert!(matches!(pool.next_key(), Err(SummarizationError::NoApiKeys)));
        }
    }

    #[test]
    fn drops_missing_blank_and_placeholder_keys() {
        let pool = KeyPool::from_candidates(vec![
            Some("gsk_a".to_string()),
            None,
            Some("   ".to_string()),
            Some("your_groq_api_key_here".to_string()),
            Some("gsk_b".to_string()),
        ]);
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.next_key().unwrap(), "gsk_a");
        assert_eq!(pool.next_key().unwrap(), "gsk_b");
    }

    #[test]
    fn concurrent_callers_share_the_rotation() {
        let pool = std::sync::Arc::new(pool(&["k1", "k2"]));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let pool = pool.clone();
                std::thread::spawn(move || pool.next_key().unwrap().to_string())
            })
            .collect();
        let mut seen: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        seen.sort();
        assert_eq!(seen.iter().filter(|k| *k == "k1").count(), 4);
        assert_eq!(seen.iter().filter(|k| *k == "k2").count(), 4);
    }
}
