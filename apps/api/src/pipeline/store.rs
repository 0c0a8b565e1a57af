//! Model artifact persistence.
//!
//! The artifact is one JSON file wrapping the trained [`FitPipeline`] in a
//! `{format, version, model}` envelope. Saves go through a temp file in the
//! target directory and an atomic rename, so readers never see a partial file.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::info;

use crate::errors::ModelError;
use crate::pipeline::FitPipeline;

pub const ARTIFACT_FORMAT: &str = "applicant-fit-model";
pub const ARTIFACT_VERSION: u32 = 1;
pub const DEFAULT_MODEL_PATH: &str = "ml_model/model.json";

#[derive(Serialize)]
struct ArtifactRef<'a> {
    format: &'a str,
    version: u32,
    model: &'a FitPipeline,
}

#[derive(Deserialize)]
struct ArtifactHeader {
    format: String,
    version: u32,
}

#[derive(Deserialize)]
struct Artifact {
    model: FitPipeline,
}

/// Serializes a pipeline into artifact bytes. Identical pipelines give identical bytes.
pub fn to_bytes(model: &FitPipeline) -> Result<Vec<u8>, ModelError> {
    let artifact = ArtifactRef {
        format: ARTIFACT_FORMAT,
        version: ARTIFACT_VERSION,
        model,
    };
    serde_json::to_vec_pretty(&artifact).map_err(|e| ModelError::Io(e.into()))
}

/// Writes the artifact to `path`, replacing any previous one atomically.
pub fn save(path: &Path, model: &FitPipeline) -> Result<(), ModelError> {
    let bytes = to_bytes(model)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir)?;

    let mut tmp = NamedTempFile::new_in(&dir)?;
    tmp.write_all(&bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| ModelError::Io(e.error))?;

    // make the rename itself durable
    #[cfg(unix)]
    std::fs::File::open(&dir)?.sync_all()?;

    info!("Saved model artifact to {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}

/// Loads and checks an artifact. Any failure here means the model must not serve.
pub fn load(path: &Path) -> Result<FitPipeline, ModelError> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ModelError::ArtifactMissing(path.to_path_buf()));
        }
        Err(e) => return Err(e.into()),
    };

    let model = from_bytes(path, &bytes)?;
    info!(
        "Loaded model artifact from {} (vocabulary: {}, trees: {})",
        path.display(),
        model.vectorizer.len(),
        model.classifier.n_trees()
    );
    Ok(model)
}

fn from_bytes(path: &Path, bytes: &[u8]) -> Result<FitPipeline, ModelError> {
    let corrupt = |reason: String| ModelError::ArtifactCorrupt {
        path: path.to_path_buf(),
        reason,
    };

    let header: ArtifactHeader =
        serde_json::from_slice(bytes).map_err(|e| corrupt(e.to_string()))?;

    if header.format != ARTIFACT_FORMAT || header.version != ARTIFACT_VERSION {
        return Err(ModelError::IncompatibleArtifact {
            path: path.to_path_buf(),
            found: format!("{} v{}", header.format, header.version),
            expected: format!("{ARTIFACT_FORMAT} v{ARTIFACT_VERSION}"),
        });
    }

    let artifact: Artifact = serde_json::from_slice(bytes).map_err(|e| corrupt(e.to_string()))?;

    if !artifact.model.is_consistent() {
        return Err(corrupt(
            "classifier, vectorizer and score scaler do not fit together".to_string(),
        ));
    }

    Ok(artifact.model)
}
