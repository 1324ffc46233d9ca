//! Reading and writing pipeline artifacts

use estimators::ModelPipeline;
use frame::CsvOptions;
use polars::prelude::DataFrame;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, info};
use transformers::FeaturePipeline;

use crate::error::{PipelineError, PipelineResult};

/// Fail with [`PipelineError::MissingFile`] unless `path` exists
pub fn require(path: &Path) -> PipelineResult<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(PipelineError::MissingFile(path.to_path_buf()))
    }
}

fn ensure_parent(path: &Path) -> PipelineResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Read a CSV table that must exist
pub fn read_table(path: &Path, options: &CsvOptions) -> PipelineResult<DataFrame> {
    require(path)?;
    Ok(frame::read_csv(path, options)?)
}

/// Write a CSV table
pub fn write_table(table: &DataFrame, path: &Path) -> PipelineResult<()> {
    frame::write_csv(table, path)?;
    info!(rows = table.height(), path = %path.display(), "Saved table");
    Ok(())
}

/// Write a JSON record, pretty-printed
pub fn save_json<T: Serialize>(value: &T, path: &Path) -> PipelineResult<()> {
    ensure_parent(path)?;
    fs::write(path, serde_json::to_vec_pretty(value)?)?;
    debug!(path = %path.display(), "Saved record");
    Ok(())
}

/// Read a JSON record that must exist
pub fn load_json<T: DeserializeOwned>(path: &Path) -> PipelineResult<T> {
    require(path)?;
    Ok(serde_json::from_slice(&fs::read(path)?)?)
}

/// Read a JSON record when present
pub fn load_json_opt<T: DeserializeOwned>(path: &Path) -> PipelineResult<Option<T>> {
    if path.exists() {
        load_json(path).map(Some)
    } else {
        Ok(None)
    }
}

/// Persist a fitted model
pub fn save_model(model: &ModelPipeline, path: &Path) -> PipelineResult<()> {
    ensure_parent(path)?;
    fs::write(path, model.to_bytes()?)?;
    info!(path = %path.display(), "Saved model");
    Ok(())
}

/// Load a fitted model that must exist
pub fn load_model(path: &Path) -> PipelineResult<ModelPipeline> {
    require(path)?;
    Ok(ModelPipeline::from_bytes(&fs::read(path)?)?)
}

/// Persist a fitted feature pipeline
pub fn save_feature_pipeline(pipeline: &FeaturePipeline, path: &Path) -> PipelineResult<()> {
    ensure_parent(path)?;
    fs::write(path, pipeline.to_bytes()?)?;
    info!(path = %path.display(), "Saved feature pipeline");
    Ok(())
}

/// Copy each existing `(source, file name)` pair into the new directory
/// `dir`. Returns how many files were copied. Fails with
/// [`PipelineError::SnapshotExists`] rather than overwrite an earlier
/// snapshot.
pub fn archive(files: &[(&Path, &str)], dir: &Path) -> PipelineResult<usize> {
    let present: Vec<&(&Path, &str)> = files.iter().filter(|(source, _)| source.exists()).collect();
    if present.is_empty() {
        return Ok(0);
    }

    if let Some(parent) = dir.parent() {
        fs::create_dir_all(parent)?;
    }
    match fs::create_dir(dir) {
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            return Err(PipelineError::SnapshotExists(dir.to_path_buf()));
        }
        other => other?,
    }

    for (source, name) in &present {
        fs::copy(source, dir.join(name))?;
    }
    info!(files = present.len(), dir = %dir.display(), "Archived artifacts");
    Ok(present.len())
}

/// Copy `from` to `to`, creating the destination directory
pub fn copy_file(from: &Path, to: &Path) -> PipelineResult<()> {
    require(from)?;
    ensure_parent(to)?;
    fs::copy(from, to)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_archive_refuses_to_overwrite_a_snapshot() {
        let tmp = TempDir::new().unwrap();
        let model = tmp.path().join("trained_model.bin");
        let metrics = tmp.path().join("model_metrics.json");
        fs::write(&model, b"first").unwrap();
        fs::write(&metrics, b"{}").unwrap();
        let dir = tmp.path().join("history/01-02-2024_03-04-05");
        let files = [
            (model.as_path(), "trained_model.bin"),
            (metrics.as_path(), "model_metrics.json"),
        ];

        assert_eq!(archive(&files, &dir).unwrap(), 2);

        fs::write(&model, b"second").unwrap();
        let err = archive(&files, &dir).unwrap_err();

        assert!(matches!(err, PipelineError::SnapshotExists(ref p) if p == &dir));
        assert_eq!(fs::read(dir.join("trained_model.bin")).unwrap(), b"first");
    }

    #[test]
    fn test_archive_without_sources_creates_nothing() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("history/snap");
        let missing = tmp.path().join("absent.bin");

        assert_eq!(archive(&[(missing.as_path(), "absent.bin")], &dir).unwrap(), 0);
        assert!(!dir.exists());
    }
}
