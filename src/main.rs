use anyhow::{Context, Result};
use clap::Parser;
use dotenv::dotenv;
use log::{error, info, warn};
use std::path::Path;

use munesg_rag::config::RetrievalConfig;
use munesg_rag::corpus;
use munesg_rag::engine::RagEngine;
use munesg_rag::llm::{LlmClient, LlmConfig};
use munesg_rag::summarize;

/// Score municipal sustainability reports: index extracted report text,
/// answer the ESG indicator catalog over it, and aggregate per-category
/// success percentages
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Folder containing the extracted report text files (*.txt)
    #[arg(index = 1)]
    folder: String,

    /// Summarize long documents before indexing them
    #[arg(long)]
    summarize: bool,

    /// Skip the indicator scoring run and go straight to the question loop
    #[arg(long)]
    questions_only: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize environment
    dotenv().ok();
    env_logger::init();

    let args = Args::parse();

    let folder = Path::new(&args.folder);
    if !folder.is_dir() {
        error!("Folder not found: {}", args.folder);
        return Err(anyhow::anyhow!("Folder not found"));
    }

    // Load configuration from environment
    let llm_config = LlmConfig::from_env().context("Missing OPENAI_API_KEY")?;
    let retrieval_config = RetrievalConfig::from_env().context("Invalid retrieval settings")?;

    let llm = LlmClient::new(llm_config);
    let mut engine = RagEngine::new(llm.clone(), retrieval_config.clone())?;

    // Collect the extracted report texts
    let documents = corpus::load_documents(folder)?;
    if documents.is_empty() {
        error!("Aucun fichier texte trouvé dans le dossier.");
        return Err(anyhow::anyhow!("Empty corpus"));
    }

    let mut texts = Vec::with_capacity(documents.len());
    for doc in &documents {
        let combined = doc.combined_text();
        if args.summarize && combined.chars().count() > retrieval_config.max_chars {
            info!("Résumé du document: {}", doc.label);
            let summary = summarize::summarize_text(&llm, &combined, &retrieval_config)
                .await
                .with_context(|| format!("Failed to summarize {}", doc.label))?;
            texts.push(summary);
        } else {
            texts.push(combined);
        }
    }

    // Build the knowledge base
    let failures = engine.build_knowledge_base(&texts).await?;
    for failure in &failures {
        warn!("Chunk {} left out of the index: {}", failure.id, failure.error);
    }
    if engine.knowledge().is_empty() {
        error!("Aucun document à indexer.");
        return Err(anyhow::anyhow!("Empty knowledge base"));
    }

    if !args.questions_only {
        // Query every indicator, then aggregate per category
        let answers = engine.score_indicators().await?;
        let scores = engine.aggregate_scores(&answers).await?;

        for (dimension, entries) in &answers {
            println!("\n===== {} =====", dimension);
            for entry in entries {
                println!("\nIndicateur: {}\n{}", entry.indicator, entry.answer);
            }
        }

        println!("\n===== Scores agrégés =====");
        for (dimension, score) in &scores {
            println!("\n{}: {}%", dimension, score.pourcentage_global);
            for detail in &score.details {
                println!("- {}: {}%", detail.indicateur, detail.score);
            }
        }
    }

    // Enter interactive Q&A loop
    engine
        .run_query_loop()
        .await
        .context("Error in query loop")?;

    Ok(())
}
