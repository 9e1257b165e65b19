pub mod chunking;
pub mod compose;
pub mod config;
pub mod corpus;
pub mod engine;
pub mod index;
pub mod indicators;
pub mod knowledge;
pub mod llm;
pub mod rerank;
pub mod scoring;
pub mod summarize;
