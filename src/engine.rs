use crate::chunking::chunk_documents;
use crate::compose;
use crate::config::RetrievalConfig;
use crate::indicators::{self, Dimension};
use crate::knowledge::{ChunkFailure, KnowledgeBase};
use crate::llm::{EmbeddingService, GenerationService};
use crate::rerank::{rerank, Candidate};
use crate::scoring::{self, CategoryScore, IndicatorAnswer};
use anyhow::{bail, Context, Result};
use log::info;
use std::collections::BTreeMap;
use std::io::{self, Write};

/// RAG engine: knowledge-base construction, retrieval with reranking, and
/// the indicator scoring pipeline on top
pub struct RagEngine<L> {
    llm: L,
    config: RetrievalConfig,
    knowledge: KnowledgeBase,
}

impl<L> RagEngine<L>
where
    L: EmbeddingService + GenerationService,
{
    /// Create an engine with an empty knowledge base
    pub fn new(llm: L, config: RetrievalConfig) -> Result<Self> {
        config.validate()?;
        Ok(RagEngine {
            llm,
            config,
            knowledge: KnowledgeBase::empty(),
        })
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    /// Chunk the documents, embed every chunk and replace the knowledge base
    /// wholesale.
    ///
    /// Under the default strict policy any embedding failure aborts the build
    /// and the previous base stays in place. With `allow_partial_index` set,
    /// the surviving chunks are indexed and the failures are returned for the
    /// caller to weigh.
    pub async fn build_knowledge_base(
        &mut self,
        documents: &[String],
    ) -> Result<Vec<ChunkFailure>> {
        let chunks = chunk_documents(documents, &self.config);
        if chunks.is_empty() {
            info!("Aucun document à indexer");
            self.knowledge = KnowledgeBase::empty();
            return Ok(Vec::new());
        }
        info!("Indexing {} chunks", chunks.len());

        let outcome = KnowledgeBase::build(&self.llm, chunks).await?;

        if !outcome.failures.is_empty() && !self.config.allow_partial_index {
            bail!(
                "{} of {} chunks failed to embed; refusing a partial index",
                outcome.failures.len(),
                outcome.failures.len() + outcome.base.len()
            );
        }

        info!(
            "Knowledge base built: {} chunks indexed, {} failed",
            outcome.base.len(),
            outcome.failures.len()
        );
        self.knowledge = outcome.base;
        Ok(outcome.failures)
    }

    /// Retrieve the chunks most relevant to a query: embed the query, take
    /// the `top_k` nearest neighbors, rerank them by cosine similarity and
    /// keep `rerank_top_k` texts.
    ///
    /// An empty knowledge base yields an empty result without error; callers
    /// decide how to react.
    pub async fn retrieve(&self, query: &str) -> Result<Vec<String>> {
        if self.knowledge.is_empty() {
            return Ok(Vec::new());
        }

        let query_vector = self
            .llm
            .embed(query)
            .await
            .context("Failed to embed query")?;

        let neighbors = self.knowledge.search(&query_vector, self.config.top_k)?;

        let mut candidates = Vec::with_capacity(neighbors.len());
        for neighbor in &neighbors {
            let chunk = self
                .knowledge
                .chunk(neighbor.id)
                .with_context(|| format!("Index returned unknown {}", neighbor.id))?;
            let vector = self
                .knowledge
                .vector(neighbor.id)
                .with_context(|| format!("No vector stored for {}", neighbor.id))?;
            candidates.push(Candidate {
                id: neighbor.id,
                vector,
                text: &chunk.text,
            });
        }

        Ok(rerank(&query_vector, &candidates, self.config.rerank_top_k))
    }

    /// Answer one question over the knowledge base
    pub async fn answer_query(&self, query: &str) -> Result<String> {
        let context_chunks = self.retrieve(query).await?;
        compose::compose(&self.llm, query, &context_chunks).await
    }

    /// Interrogate the knowledge base once per catalog indicator and group
    /// the answers by dimension, in catalog order
    pub async fn score_indicators(&self) -> Result<BTreeMap<Dimension, Vec<IndicatorAnswer>>> {
        let mut results: BTreeMap<Dimension, Vec<IndicatorAnswer>> = BTreeMap::new();

        for indicator in indicators::GUIDELINES {
            let query = indicator.query();
            info!("Interrogation de l'LLM sur: {}", query);

            let answer = self
                .answer_query(&query)
                .await
                .with_context(|| format!("Failed to answer indicator '{}'", indicator.name))?;

            results
                .entry(indicator.dimension)
                .or_default()
                .push(IndicatorAnswer {
                    indicator: indicator.name.to_string(),
                    answer,
                });
        }

        Ok(results)
    }

    /// One structured aggregation call per dimension over its answers
    pub async fn aggregate_scores(
        &self,
        answers: &BTreeMap<Dimension, Vec<IndicatorAnswer>>,
    ) -> Result<BTreeMap<Dimension, CategoryScore>> {
        let mut scores = BTreeMap::new();

        for (&dimension, entries) in answers {
            info!("Agrégation pour la catégorie '{}'", dimension);
            let score = scoring::aggregate_category(&self.llm, dimension, entries).await?;
            scores.insert(dimension, score);
        }

        Ok(scores)
    }

    /// Run the interactive question loop; `exit` quits
    pub async fn run_query_loop(&self) -> Result<()> {
        info!("Ready to answer questions. Type 'exit' to quit.");

        let stdin = io::stdin();
        let mut stdout = io::stdout();
        let mut buffer = String::new();

        loop {
            print!("\nQuestion ➤ ");
            stdout.flush()?;

            buffer.clear();
            if stdin.read_line(&mut buffer)? == 0 {
                break;
            }

            let question = buffer.trim();
            if question.is_empty() {
                continue;
            }
            if question.eq_ignore_ascii_case("exit") {
                info!("Session terminée.");
                break;
            }

            let context_chunks = self.retrieve(question).await?;
            if context_chunks.is_empty() {
                info!("Aucune information pertinente trouvée dans les documents.");
                continue;
            }

            let answer = compose::compose(&self.llm, question, &context_chunks).await?;
            println!("\n{}", answer);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;

    /// Fixed embeddings per known text; generation echoes the context block
    struct StubLlm {
        vectors: Vec<(&'static str, Vec<f32>)>,
    }

    impl StubLlm {
        fn lookup(&self, text: &str) -> Option<Vec<f32>> {
            self.vectors
                .iter()
                .find(|(t, _)| *t == text)
                .map(|(_, v)| v.clone())
        }
    }

    impl EmbeddingService for StubLlm {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            match self.lookup(text) {
                Some(v) => Ok(v),
                None => bail!("no embedding for '{text}'"),
            }
        }
    }

    impl GenerationService for StubLlm {
        async fn generate(&self, _system: &str, user: &str) -> Result<String> {
            Ok(format!("généré<{user}>"))
        }

        async fn generate_structured(&self, _system: &str, _user: &str) -> Result<String> {
            Ok(r#"{"pourcentage_global": 40, "details": []}"#.to_string())
        }
    }

    fn engine_config() -> RetrievalConfig {
        RetrievalConfig {
            top_k: 2,
            rerank_top_k: 1,
            ..RetrievalConfig::default()
        }
    }

    fn stub() -> StubLlm {
        StubLlm {
            vectors: vec![
                ("eau potable plan", vec![2.0, 0.0]),
                ("transport collectif", vec![0.0, 1.0]),
                ("logement abordable", vec![0.9, 0.1]),
                ("la question", vec![0.95, 0.05]),
            ],
        }
    }

    fn corpus() -> Vec<String> {
        vec![
            "eau potable plan".to_string(),
            "transport collectif".to_string(),
            "logement abordable".to_string(),
        ]
    }

    #[tokio::test]
    async fn euclidean_retrieval_then_cosine_rerank() {
        let mut engine = RagEngine::new(stub(), engine_config()).unwrap();
        let failures = engine.build_knowledge_base(&corpus()).await.unwrap();
        assert!(failures.is_empty());

        // Nearest two by L2 are "logement abordable" (0.005) and
        // "eau potable plan" (1.105); cosine ignores magnitude and gives the
        // final slot to "eau potable plan".
        let retrieved = engine.retrieve("la question").await.unwrap();
        assert_eq!(retrieved, vec!["eau potable plan"]);
    }

    #[tokio::test]
    async fn empty_base_retrieves_nothing_silently() {
        let mut engine = RagEngine::new(stub(), engine_config()).unwrap();
        engine.build_knowledge_base(&[]).await.unwrap();

        let retrieved = engine.retrieve("la question").await.unwrap();
        assert!(retrieved.is_empty());
    }

    #[tokio::test]
    async fn strict_policy_refuses_a_partial_index() {
        let mut engine = RagEngine::new(stub(), engine_config()).unwrap();
        let docs = vec!["eau potable plan".to_string(), "texte inconnu".to_string()];

        assert!(engine.build_knowledge_base(&docs).await.is_err());
        assert!(engine.knowledge().is_empty());
    }

    #[tokio::test]
    async fn permissive_policy_keeps_the_survivors() {
        let config = RetrievalConfig {
            allow_partial_index: true,
            ..engine_config()
        };
        let mut engine = RagEngine::new(stub(), config).unwrap();
        let docs = vec!["eau potable plan".to_string(), "texte inconnu".to_string()];

        let failures = engine.build_knowledge_base(&docs).await.unwrap();
        assert_eq!(failures.len(), 1);
        assert_eq!(engine.knowledge().len(), 1);
    }

    #[tokio::test]
    async fn rebuild_replaces_the_base_wholesale() {
        let mut engine = RagEngine::new(stub(), engine_config()).unwrap();
        engine.build_knowledge_base(&corpus()).await.unwrap();
        assert_eq!(engine.knowledge().len(), 3);

        engine
            .build_knowledge_base(&["transport collectif".to_string()])
            .await
            .unwrap();
        assert_eq!(engine.knowledge().len(), 1);
    }

    #[tokio::test]
    async fn answer_embeds_retrieved_context_in_the_generation() {
        let mut engine = RagEngine::new(stub(), engine_config()).unwrap();
        engine.build_knowledge_base(&corpus()).await.unwrap();

        let answer = engine.answer_query("la question").await.unwrap();
        assert!(answer.contains("eau potable plan"));
        assert!(answer.starts_with("généré<"));
    }
}
