//! Embedding/similarity backend abstraction.
//!
//! The embedding backend is treated as an opaque, externally supplied
//! collaborator: something that can turn text into unit-norm vectors and
//! answer top-K nearest-neighbour queries over a chunk corpus rebuilt on
//! every mutation. [`EmbeddingBackend`] is the narrow capability interface;
//! any implementation satisfying it is acceptable. [`LocalHashEmbedding`] is
//! a deterministic, dependency-free default so the crate is runnable without
//! wiring in a real model — swapping in a production backend (ONNX, an API
//! client, a vector database client) means implementing this trait, not
//! touching the memory core.

use std::collections::HashMap;

use crate::error::MemoryError;

/// A chunk of indexed text tagged with its originating memory id.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedChunk {
    pub chunk: String,
    pub score: f32,
}

/// Narrow capability interface the memory core depends on. Implementations
/// may be unavailable (network down, model not loaded); in that case
/// `rebuild` should persist metadata and still return `Ok(())` if possible,
/// while `search` returning an empty list is also an acceptable
/// "unavailable" response per the error handling design — callers should
/// not treat an empty result as a hard failure.
pub trait EmbeddingBackend: Send + Sync {
    /// Encode `texts` into unit-norm vectors, one per input.
    fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, MemoryError>;

    /// Rebuild the entire index from `chunks`. The backend's indexing
    /// interface is build-once-and-query, so this replaces any prior index.
    fn rebuild(&mut self, chunks: &[String]) -> Result<(), MemoryError>;

    /// Return the top `k` chunks most similar to `query`, ranked descending.
    fn search(&self, query: &str, k: usize) -> Result<Vec<RankedChunk>, MemoryError>;
}

/// Build the canonical chunk representation fed to the embedding backend:
/// `[ID:<uuid>][SEC:<sector>] <content> [tags:t1,t2,...]`.
pub fn build_chunk(id: &str, sector: &str, content: &str, tags: &[String]) -> String {
    let mut chunk = format!("[ID:{id}][SEC:{sector}] {content}");
    if !tags.is_empty() {
        chunk.push_str(" [tags:");
        chunk.push_str(&tags.join(","));
        chunk.push(']');
    }
    chunk
}

/// Recover the memory id from a chunk's `[ID:<uuid>]` prefix. Chunks without
/// this prefix are ignored by the core.
pub fn parse_chunk_id(chunk: &str) -> Option<&str> {
    let rest = chunk.strip_prefix("[ID:")?;
    let end = rest.find(']')?;
    Some(&rest[..end])
}

const HASH_DIMS: usize = 256;

/// Deterministic bag-of-trigrams embedding with no external model
/// dependency. Vectors are unit-norm by construction; cosine similarity
/// reduces to a dot product.
#[derive(Debug, Default)]
pub struct LocalHashEmbedding {
    chunks: Vec<String>,
}

impl LocalHashEmbedding {
    pub fn new() -> Self {
        Self::default()
    }

    fn embed_one(text: &str) -> Vec<f32> {
        let mut vec = vec![0.0f32; HASH_DIMS];
        let lowered = text.to_lowercase();
        let bytes: Vec<u8> = lowered.bytes().collect();
        if bytes.is_empty() {
            return vec;
        }
        if bytes.len() < 3 {
            let bucket = fnv1a(&bytes) as usize % HASH_DIMS;
            vec[bucket] += 1.0;
        } else {
            for window in bytes.windows(3) {
                let bucket = fnv1a(window) as usize % HASH_DIMS;
                vec[bucket] += 1.0;
            }
        }
        normalize(&mut vec);
        vec
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf29ce484222325;
    for &b in bytes {
        hash ^= b as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

fn normalize(vec: &mut [f32]) {
    let norm: f32 = vec.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > 0.0 {
        for v in vec.iter_mut() {
            *v /= norm;
        }
    }
}

fn cosine(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

impl EmbeddingBackend for LocalHashEmbedding {
    fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, MemoryError> {
        Ok(texts.iter().map(|t| Self::embed_one(t)).collect())
    }

    fn rebuild(&mut self, chunks: &[String]) -> Result<(), MemoryError> {
        self.chunks = chunks.to_vec();
        Ok(())
    }

    fn search(&self, query: &str, k: usize) -> Result<Vec<RankedChunk>, MemoryError> {
        if self.chunks.is_empty() {
            return Ok(Vec::new());
        }
        let query_vec = Self::embed_one(query);
        let mut scored: HashMap<usize, f32> = HashMap::new();
        for (idx, chunk) in self.chunks.iter().enumerate() {
            let chunk_vec = Self::embed_one(chunk);
            scored.insert(idx, cosine(&query_vec, &chunk_vec));
        }
        let mut ranked: Vec<(usize, f32)> = scored.into_iter().collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked.truncate(k);
        Ok(ranked
            .into_iter()
            .map(|(idx, score)| RankedChunk {
                chunk: self.chunks[idx].clone(),
                score,
            })
            .collect())
    }
}
