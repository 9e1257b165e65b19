use anyhow::{Context, Result};
use log::{info, warn};
use std::fs;
use std::path::Path;

/// Marker substituted for a document whose text could not be read.
///
/// Upstream extractors report their failures the same way, so consumers treat
/// this as valid-but-low-quality text rather than a separate error channel.
pub const UNREADABLE_MARKER: &str = "[ERREUR DE LECTURE DU DOCUMENT]";

/// A plain-text report produced by the upstream extraction tooling
#[derive(Debug, Clone)]
pub struct SourceDocument {
    /// File stem, used to label the document in the combined text
    pub label: String,
    pub text: String,
}

impl SourceDocument {
    /// Document text prefixed with its provenance header, the form the
    /// knowledge base is built from
    pub fn combined_text(&self) -> String {
        format!("[Document: {}]\n{}", self.label, self.text)
    }
}

/// Load every `*.txt` file in a folder, in name order.
///
/// A file that exists but cannot be read is kept in the corpus with the
/// [`UNREADABLE_MARKER`] as its text, matching how the extraction pipeline
/// reports unreadable inputs.
pub fn load_documents(dir: &Path) -> Result<Vec<SourceDocument>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)
        .with_context(|| format!("Failed to list documents in {}", dir.display()))?
    {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) == Some("txt") {
            paths.push(path);
        }
    }
    paths.sort();

    let mut documents = Vec::with_capacity(paths.len());
    for path in paths {
        let label = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("document")
            .to_string();

        let text = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Unreadable document {}: {}", path.display(), e);
                UNREADABLE_MARKER.to_string()
            }
        };

        documents.push(SourceDocument { label, text });
    }

    info!("Loaded {} documents from {}", documents.len(), dir.display());
    Ok(documents)
}
