use crate::chunking::{Chunk, ChunkId};
use crate::index::{Neighbor, VectorIndex};
use crate::llm::EmbeddingService;
use anyhow::Result;
use log::{debug, warn};
use std::collections::HashMap;

/// A chunk whose embedding request failed, with the error that caused it
#[derive(Debug)]
pub struct ChunkFailure {
    pub id: ChunkId,
    pub error: anyhow::Error,
}

/// Result of embedding a chunk set: the searchable base built from the
/// successful chunks, plus the failures. The caller decides whether a
/// partial base is acceptable.
#[derive(Debug)]
pub struct BuildOutcome {
    pub base: KnowledgeBase,
    pub failures: Vec<ChunkFailure>,
}

/// Chunk texts and their embedding vectors behind one exact-search index.
///
/// Immutable once built; replacing the knowledge base means building a new
/// one from scratch.
#[derive(Debug)]
pub struct KnowledgeBase {
    chunks: Vec<Chunk>,
    positions: HashMap<ChunkId, usize>,
    index: VectorIndex,
}

impl KnowledgeBase {
    /// Base with no chunks; every search on it comes back empty
    pub fn empty() -> Self {
        KnowledgeBase {
            chunks: Vec::new(),
            positions: HashMap::new(),
            index: VectorIndex::empty(),
        }
    }

    /// Embed every chunk through the service, one request at a time, and
    /// index the vectors.
    ///
    /// Each chunk gets its own outcome: a failed embedding call is recorded
    /// against that chunk's id and the rest of the build continues. The
    /// returned base holds only the chunks that embedded successfully.
    pub async fn build<E: EmbeddingService>(embedder: &E, chunks: Vec<Chunk>) -> Result<BuildOutcome> {
        let mut kept = Vec::with_capacity(chunks.len());
        let mut entries = Vec::with_capacity(chunks.len());
        let mut failures = Vec::new();

        for chunk in chunks {
            match embedder.embed(&chunk.text).await {
                Ok(vector) => {
                    debug!("Embedded {} ({} chars)", chunk.id, chunk.text.len());
                    entries.push((chunk.id, vector));
                    kept.push(chunk);
                }
                Err(error) => {
                    warn!("Embedding failed for {}: {}", chunk.id, error);
                    failures.push(ChunkFailure {
                        id: chunk.id,
                        error,
                    });
                }
            }
        }

        let index = VectorIndex::build(entries)?;

        let positions = kept
            .iter()
            .enumerate()
            .map(|(pos, chunk)| (chunk.id, pos))
            .collect();

        Ok(BuildOutcome {
            base: KnowledgeBase {
                chunks: kept,
                positions,
                index,
            },
            failures,
        })
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn chunk(&self, id: ChunkId) -> Option<&Chunk> {
        self.positions.get(&id).map(|&pos| &self.chunks[pos])
    }

    /// Embedding vector stored for the given chunk, if any
    pub fn vector(&self, id: ChunkId) -> Option<&[f32]> {
        self.index.vector(id)
    }

    /// Nearest chunks to the query vector, ascending by squared Euclidean
    /// distance; see [`VectorIndex::search`]
    pub fn search(&self, query: &[f32], top_k: usize) -> Result<Vec<Neighbor>> {
        self.index.search(query, top_k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;

    /// Looks up fixed vectors by chunk text; unknown text fails the call
    struct TableEmbedder(Vec<(&'static str, Vec<f32>)>);

    impl EmbeddingService for TableEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            match self.0.iter().find(|(t, _)| *t == text) {
                Some((_, v)) => Ok(v.clone()),
                None => bail!("quota exceeded"),
            }
        }
    }

    fn chunks(texts: &[&str]) -> Vec<Chunk> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| Chunk {
                id: ChunkId(i as u64),
                text: t.to_string(),
            })
            .collect()
    }

    #[tokio::test]
    async fn build_pairs_each_chunk_with_its_vector() {
        let embedder = TableEmbedder(vec![("un", vec![1.0, 0.0]), ("deux", vec![0.0, 1.0])]);
        let outcome = KnowledgeBase::build(&embedder, chunks(&["un", "deux"]))
            .await
            .unwrap();

        assert!(outcome.failures.is_empty());
        assert_eq!(outcome.base.len(), 2);
        assert_eq!(outcome.base.vector(ChunkId(1)).unwrap(), &[0.0, 1.0]);
        assert_eq!(outcome.base.chunk(ChunkId(0)).unwrap().text, "un");
    }

    #[tokio::test]
    async fn failed_chunks_are_reported_not_indexed() {
        let embedder = TableEmbedder(vec![("un", vec![1.0, 0.0])]);
        let outcome = KnowledgeBase::build(&embedder, chunks(&["un", "inconnu"]))
            .await
            .unwrap();

        assert_eq!(outcome.base.len(), 1);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].id, ChunkId(1));
        assert!(outcome.base.chunk(ChunkId(1)).is_none());
    }

    #[tokio::test]
    async fn empty_build_yields_an_empty_searchable_base() {
        let embedder = TableEmbedder(vec![]);
        let outcome = KnowledgeBase::build(&embedder, Vec::new()).await.unwrap();

        assert!(outcome.base.is_empty());
        let hits = outcome.base.search(&[1.0, 0.0], 5).unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn search_finds_the_exact_chunk_first() {
        let embedder = TableEmbedder(vec![
            ("eau", vec![1.0, 0.0]),
            ("transport", vec![0.0, 1.0]),
        ]);
        let outcome = KnowledgeBase::build(&embedder, chunks(&["eau", "transport"]))
            .await
            .unwrap();

        let hits = outcome.base.search(&[1.0, 0.0], 1).unwrap();
        assert_eq!(hits[0].id, ChunkId(0));
        assert_eq!(hits[0].distance, 0.0);
    }
}
