use crate::chunking::split_document;
use crate::config::RetrievalConfig;
use crate::llm::GenerationService;
use anyhow::{Context, Result};
use log::debug;

/// System instructions for condensing one window of a long report
pub const SUMMARY_SYSTEM_PROMPT: &str = "Vous êtes un assistant AI spécialisé dans la synthèse \
    de documents municipaux en français. Veuillez résumer de manière concise le texte suivant.";

/// Condense a long document before indexing.
///
/// The text is cut into overlapping windows, each window is summarized with
/// one generation call, and the summaries are joined with newlines in window
/// order. Short texts still go through a single summarization call, matching
/// the windowing of the full pipeline.
pub async fn summarize_text<G: GenerationService>(
    llm: &G,
    text: &str,
    config: &RetrievalConfig,
) -> Result<String> {
    let windows = split_document(text, config.summary_chunk_chars, config.summary_overlap);
    debug!("Summarizing {} windows", windows.len());

    let mut summaries = Vec::with_capacity(windows.len());
    for (i, window) in windows.iter().enumerate() {
        let prompt = format!("Texte à résumer:\n\n{window}\n\nRésumé concis:");
        let summary = llm
            .generate(SUMMARY_SYSTEM_PROMPT, &prompt)
            .await
            .with_context(|| format!("Failed to summarize window {} of {}", i + 1, windows.len()))?;
        summaries.push(summary.trim().to_string());
    }

    Ok(summaries.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CountingLlm;

    impl GenerationService for CountingLlm {
        async fn generate(&self, _system: &str, user: &str) -> Result<String> {
            Ok(format!("résumé:{}", user.len()))
        }

        async fn generate_structured(&self, system: &str, user: &str) -> Result<String> {
            self.generate(system, user).await
        }
    }

    #[tokio::test]
    async fn one_summary_per_window_joined_with_newlines() {
        let config = RetrievalConfig {
            summary_chunk_chars: 50,
            summary_overlap: 10,
            ..RetrievalConfig::default()
        };
        let text: String = "a".repeat(120);

        let summary = summarize_text(&CountingLlm, &text, &config).await.unwrap();
        // 120 chars, step 40: windows start at 0, 40, 80 -> three summaries
        assert_eq!(summary.lines().count(), 3);
        assert!(summary.lines().all(|l| l.starts_with("résumé:")));
    }

    #[tokio::test]
    async fn short_text_is_a_single_summary() {
        let summary = summarize_text(&CountingLlm, "court", &RetrievalConfig::default())
            .await
            .unwrap();
        assert_eq!(summary.lines().count(), 1);
    }
}
