use crate::config::RetrievalConfig;

/// Stable identifier for a chunk, assigned once at chunking time.
///
/// Chunks and their embedding vectors are always paired through this key,
/// never through positional correspondence between two separate sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkId(pub u64);

impl std::fmt::Display for ChunkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "chunk-{}", self.0)
    }
}

/// A bounded-length span of source text with its stable identifier
#[derive(Debug, Clone)]
pub struct Chunk {
    pub id: ChunkId,
    pub text: String,
}

/// Split a document into overlapping fixed-size character windows.
///
/// Starting at offset 0, each window holds at most `max_chars` characters and
/// the next window starts `max_chars - overlap` characters later. The final
/// window may be shorter than `max_chars` and is still emitted. Offsets are
/// counted in characters, so multi-byte text never splits inside a scalar
/// value.
///
/// Requires `0 < overlap < max_chars`; see [`RetrievalConfig::validate`].
pub fn split_document(doc: &str, max_chars: usize, overlap: usize) -> Vec<String> {
    let step = max_chars - overlap;
    let chars: Vec<char> = doc.chars().collect();

    let mut chunks = Vec::new();
    let mut start = 0;
    while start < chars.len() {
        let end = usize::min(start + max_chars, chars.len());
        chunks.push(chars[start..end].iter().collect());
        start += step;
    }

    chunks
}

/// Turn a set of documents into identified chunks.
///
/// Documents whose character count is at most `max_chars` pass through
/// unchanged as a single chunk. Identifiers are assigned sequentially across
/// the whole corpus.
pub fn chunk_documents(documents: &[String], config: &RetrievalConfig) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut next_id = 0u64;

    for doc in documents {
        if doc.chars().count() > config.max_chars {
            for text in split_document(doc, config.max_chars, config.overlap) {
                chunks.push(Chunk {
                    id: ChunkId(next_id),
                    text,
                });
                next_id += 1;
            }
        } else {
            chunks.push(Chunk {
                id: ChunkId(next_id),
                text: doc.clone(),
            });
            next_id += 1;
        }
    }

    chunks
}
