use crate::llm::GenerationService;
use anyhow::Result;

/// System instructions for question answering over retrieved report excerpts
pub const ANSWER_SYSTEM_PROMPT: &str = "Vous êtes un assistant AI spécialisé dans l'analyse de \
    rapports municipaux. Votre rôle est non seulement de répondre aux questions, mais aussi de \
    justifier clairement vos réponses à partir du contexte fourni.";

/// Assemble the user prompt: retrieved chunks joined in order with newlines,
/// followed by the question and the answering constraints.
///
/// The constraints instruct the model to stay inside the provided context and
/// to admit missing information rather than invent an answer; enforcement is
/// entirely on the generation service's side.
pub fn build_answer_prompt(question: &str, context_chunks: &[String]) -> String {
    let context = context_chunks.join("\n");

    format!(
        "Contexte:\n{context}\n\n\
         Question: {question}\n\
         Consignes pour votre réponse :\n\
         1. Votre réponse doit être précise, complète et strictement fondée sur les informations textuelles fournies.\n\
         2. N'utilisez pas de langage d'embellissement. Gardez votre réponse aussi proche que possible des données originales.\n\
         3. Si une entité est mentionnée dans la question, assurez-vous de la mentionner également dans votre réponse.\n\
         4. N'utilisez que les informations nécessaires à la formulation d'une réponse détaillée.\n\
         5. Si vous n'êtes pas sûr, reconnaissez simplement le manque d'information au lieu d'inventer une réponse.\n"
    )
}

/// Issue exactly one generation request over the assembled prompt and return
/// the generated text verbatim. Failures propagate; nothing is retried or
/// cached here.
pub async fn compose<G: GenerationService>(
    llm: &G,
    question: &str,
    context_chunks: &[String],
) -> Result<String> {
    let prompt = build_answer_prompt(question, context_chunks);
    llm.generate(ANSWER_SYSTEM_PROMPT, &prompt).await
}
