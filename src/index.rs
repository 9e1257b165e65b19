use crate::chunking::ChunkId;
use anyhow::{bail, Result};

/// A single search hit: the stored chunk's key and its squared Euclidean
/// distance to the query
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbor {
    pub id: ChunkId,
    pub distance: f32,
}

/// Exact nearest-neighbor index over fixed-dimension vectors.
///
/// Stores every vector and scans all of them per query, under squared
/// Euclidean distance. Immutable once built; a new knowledge base means a
/// new index.
#[derive(Debug)]
pub struct VectorIndex {
    dimension: usize,
    entries: Vec<(ChunkId, Vec<f32>)>,
}

impl VectorIndex {
    /// Build an index from `(id, vector)` pairs.
    ///
    /// All vectors must share one dimensionality; a mismatch or an empty
    /// vector is a build error.
    pub fn build(entries: Vec<(ChunkId, Vec<f32>)>) -> Result<Self> {
        let dimension = match entries.first() {
            Some((_, v)) => v.len(),
            None => 0,
        };

        for (id, vector) in &entries {
            if vector.is_empty() {
                bail!("empty embedding vector for {}", id);
            }
            if vector.len() != dimension {
                bail!(
                    "dimension mismatch for {}: expected {}, got {}",
                    id,
                    dimension,
                    vector.len()
                );
            }
        }

        Ok(VectorIndex { dimension, entries })
    }

    /// Index with no entries; every search on it returns nothing
    pub fn empty() -> Self {
        VectorIndex {
            dimension: 0,
            entries: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Vector stored for the given chunk, if any
    pub fn vector(&self, id: ChunkId) -> Option<&[f32]> {
        self.entries
            .iter()
            .find(|(entry_id, _)| *entry_id == id)
            .map(|(_, v)| v.as_slice())
    }

    /// Return up to `top_k` stored entries closest to `query`, ascending by
    /// squared Euclidean distance. Ties keep insertion order. An empty index
    /// yields an empty result; a query of the wrong dimensionality is an
    /// error.
    pub fn search(&self, query: &[f32], top_k: usize) -> Result<Vec<Neighbor>> {
        if self.entries.is_empty() {
            return Ok(Vec::new());
        }
        if query.len() != self.dimension {
            bail!(
                "query dimension mismatch: index holds {}-dimensional vectors, query has {}",
                self.dimension,
                query.len()
            );
        }

        let mut neighbors: Vec<Neighbor> = self
            .entries
            .iter()
            .map(|(id, vector)| Neighbor {
                id: *id,
                distance: squared_l2(query, vector),
            })
            .collect();

        neighbors.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        neighbors.truncate(usize::min(top_k, neighbors.len()));

        Ok(neighbors)
    }
}

/// Squared Euclidean distance between two equal-length vectors
pub fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum()
}
