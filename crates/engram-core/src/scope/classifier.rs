//! Semantic scope classifier.
//!
//! Encodes two small fixed corpora — sentences that read as project
//! knowledge, sentences that read as a developer's personal preferences —
//! once at startup, then classifies new content by which corpus it sits
//! closer to on average. The seed sentences are part of the external
//! contract: changing them changes routing behaviour for every caller, so
//! they are reproduced here bit-exact rather than summarized.

use crate::embedding::EmbeddingBackend;
use crate::error::MemoryError;

use super::Scope;

pub const CONFIDENCE_THRESHOLD: f64 = 0.65;

const PROJECT_EXAMPLES: [&str; 10] = [
    "This codebase uses FastAPI for REST APIs",
    "Bug in auth.py line 42 causing null pointer",
    "The MemvidMemory class handles all storage operations",
    "Dependencies are managed via pyproject.toml",
    "We use Redis for caching in this project",
    "The server.py module implements MCP protocol",
    "Tests are located in the tests/ directory",
    "The project requires Python 3.10 or higher",
    "Memory leak in the video encoding module",
    "The API endpoint /users returns 500 error",
];

const USER_EXAMPLES: [&str; 10] = [
    "I prefer using pytest over unittest for testing",
    "I like clean code with type hints",
    "I always write docstrings for public functions",
    "I prefer functional programming patterns",
    "I use Ruff for linting Python code",
    "I like VS Code as my primary editor",
    "I commit frequently with small atomic changes",
    "I prefer reviewing PRs in the morning",
    "Python uses duck typing for polymorphism",
    "REST APIs should be stateless",
];

/// The outcome of classifying a candidate against both exemplar groups.
#[derive(Debug, Clone, Copy)]
pub struct ScopeClassification {
    pub winner: Scope,
    pub confidence: f64,
    pub project_score: f64,
    pub user_score: f64,
}

/// Holds the encoded exemplar vectors so classification only has to encode
/// the candidate text.
pub struct ScopeClassifier {
    project_vectors: Vec<Vec<f32>>,
    user_vectors: Vec<Vec<f32>>,
}

impl ScopeClassifier {
    pub fn new(embedding: &dyn EmbeddingBackend) -> Result<Self, MemoryError> {
        let project_vectors = embedding.encode(
            &PROJECT_EXAMPLES.iter().map(|s| s.to_string()).collect::<Vec<_>>(),
        )?;
        let user_vectors = embedding.encode(
            &USER_EXAMPLES.iter().map(|s| s.to_string()).collect::<Vec<_>>(),
        )?;
        Ok(Self {
            project_vectors,
            user_vectors,
        })
    }

    /// Classify `content`. `confidence` is the winning group's share of the
    /// two mean scores (0.5 when both are zero, i.e. no signal either way).
    pub fn classify(
        &self,
        content: &str,
        embedding: &dyn EmbeddingBackend,
    ) -> Result<ScopeClassification, MemoryError> {
        let vector = embedding
            .encode(&[content.to_string()])?
            .into_iter()
            .next()
            .unwrap_or_default();

        let project_score = mean_cosine(&vector, &self.project_vectors);
        let user_score = mean_cosine(&vector, &self.user_vectors);

        let (winner, winning_score) = if project_score >= user_score {
            (Scope::Project, project_score)
        } else {
            (Scope::User, user_score)
        };
        let total = project_score + user_score;
        let confidence = if total <= 0.0 { 0.5 } else { winning_score / total };

        Ok(ScopeClassification {
            winner,
            confidence,
            project_score,
            user_score,
        })
    }
}

fn mean_cosine(vector: &[f32], group: &[Vec<f32>]) -> f64 {
    if group.is_empty() {
        return 0.0;
    }
    let sum: f64 = group.iter().map(|v| cosine(vector, v) as f64).sum();
    sum / group.len() as f64
}

fn cosine(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}
