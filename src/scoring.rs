use crate::indicators::Dimension;
use crate::llm::GenerationService;
use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};

/// System instructions for the category aggregation call
pub const AGGREGATION_SYSTEM_PROMPT: &str =
    "Vous êtes un expert en évaluation municipale fournissant des analyses détaillées.";

/// One indicator's answer, as produced by the retrieval-augmented query
#[derive(Debug, Clone)]
pub struct IndicatorAnswer {
    pub indicator: String,
    pub answer: String,
}

/// Per-indicator estimated score inside a category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorScore {
    pub indicateur: String,
    pub score: u8,
}

/// Aggregated assessment of one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub pourcentage_global: u8,
    pub details: Vec<IndicatorScore>,
}

/// Build the aggregation prompt for one category.
///
/// The model is asked for a JSON object rather than free prose, so the
/// response parses with a fixed schema instead of a fragile textual pattern.
pub fn build_aggregation_prompt(category: Dimension, answers: &[IndicatorAnswer]) -> String {
    let mut prompt = format!(
        "Vous êtes un expert en évaluation municipale. Voici les réponses détaillées pour la catégorie {category}:\n\n"
    );
    for entry in answers {
        prompt.push_str(&format!(
            "Indicateur: {}\nRéponse: {}\n\n",
            entry.indicator, entry.answer
        ));
    }
    prompt.push_str(
        "Veuillez fournir une estimation en pourcentage de la réussite globale de la municipalité \
         dans cette catégorie (entre 0 et 100), suivie du score estimé de chaque indicateur. \
         Répondez uniquement avec un objet JSON de la forme:\n\
         {\"pourcentage_global\": 75, \"details\": [{\"indicateur\": \"Nom\", \"score\": 80}]}",
    );
    prompt
}

/// Parse and validate the structured aggregation response.
///
/// A malformed payload or a score above 100 is an error; aggregation never
/// silently drops a category.
pub fn parse_category_score(raw: &str) -> Result<CategoryScore> {
    let body = strip_code_fences(raw);

    let score: CategoryScore = serde_json::from_str(body)
        .with_context(|| format!("Malformed aggregation response: {raw}"))?;

    ensure!(
        score.pourcentage_global <= 100,
        "Global percentage out of range: {}",
        score.pourcentage_global
    );
    for detail in &score.details {
        ensure!(
            detail.score <= 100,
            "Score out of range for '{}': {}",
            detail.indicateur,
            detail.score
        );
    }

    Ok(score)
}

/// Issue one structured generation call for the category and parse its score
pub async fn aggregate_category<G: GenerationService>(
    llm: &G,
    category: Dimension,
    answers: &[IndicatorAnswer],
) -> Result<CategoryScore> {
    let prompt = build_aggregation_prompt(category, answers);
    let raw = llm
        .generate_structured(AGGREGATION_SYSTEM_PROMPT, &prompt)
        .await
        .with_context(|| format!("Aggregation call failed for category {category}"))?;

    parse_category_score(&raw)
        .with_context(|| format!("Invalid aggregation result for category {category}"))
}

// Some providers wrap JSON answers in a Markdown code fence even when asked
// not to; accept that shape.
fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
