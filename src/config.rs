use anyhow::{ensure, Result};
use std::env;

/// Tuning parameters for chunking, retrieval and reranking.
///
/// Built once in `main` and passed into the engine at construction time;
/// nothing in the crate reads process-global state after startup.
#[derive(Debug, Clone)]
pub struct RetrievalConfig {
    /// Maximum characters per chunk
    pub max_chars: usize,
    /// Characters shared between consecutive chunks
    pub overlap: usize,
    /// Candidates fetched from the index per query
    pub top_k: usize,
    /// Candidates kept after cosine reranking
    pub rerank_top_k: usize,
    /// Keep an index built from the chunks that embedded successfully
    /// instead of refusing the whole build on the first failure
    pub allow_partial_index: bool,
    /// Window size used when summarizing long documents
    pub summary_chunk_chars: usize,
    /// Window overlap used when summarizing long documents
    pub summary_overlap: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        RetrievalConfig {
            max_chars: 3000,
            overlap: 200,
            top_k: 5,
            rerank_top_k: 3,
            allow_partial_index: false,
            summary_chunk_chars: 2000,
            summary_overlap: 200,
        }
    }
}

impl RetrievalConfig {
    /// Create a configuration from environment variables, falling back to
    /// the defaults for anything unset
    pub fn from_env() -> Result<Self> {
        let mut config = RetrievalConfig::default();

        if let Some(v) = read_usize("MUNESG_MAX_CHARS")? {
            config.max_chars = v;
        }
        if let Some(v) = read_usize("MUNESG_OVERLAP")? {
            config.overlap = v;
        }
        if let Some(v) = read_usize("MUNESG_TOP_K")? {
            config.top_k = v;
        }
        if let Some(v) = read_usize("MUNESG_RERANK_TOP_K")? {
            config.rerank_top_k = v;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check the chunking and retrieval invariants
    pub fn validate(&self) -> Result<()> {
        ensure!(self.overlap > 0, "overlap must be positive");
        ensure!(
            self.overlap < self.max_chars,
            "overlap ({}) must be smaller than max_chars ({})",
            self.overlap,
            self.max_chars
        );
        ensure!(
            self.summary_overlap > 0 && self.summary_overlap < self.summary_chunk_chars,
            "summary_overlap ({}) must be positive and smaller than summary_chunk_chars ({})",
            self.summary_overlap,
            self.summary_chunk_chars
        );
        ensure!(self.top_k > 0, "top_k must be positive");
        ensure!(self.rerank_top_k > 0, "rerank_top_k must be positive");
        Ok(())
    }
}

fn read_usize(name: &str) -> Result<Option<usize>> {
    match env::var(name) {
        Ok(raw) => {
            let value = raw
                .parse::<usize>()
                .map_err(|_| anyhow::anyhow!("{} must be an integer, got '{}'", name, raw))?;
            Ok(Some(value))
        }
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        RetrievalConfig::default().validate().unwrap();
    }

    #[test]
    fn overlap_must_be_smaller_than_max_chars() {
        let config = RetrievalConfig {
            max_chars: 100,
            overlap: 100,
            ..RetrievalConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_overlap_is_rejected() {
        let config = RetrievalConfig {
            overlap: 0,
            ..RetrievalConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
