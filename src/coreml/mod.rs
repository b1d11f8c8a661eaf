//! Core ML model structures and persistence.

mod proto;

pub use proto::*;

use std::fs;
use std::path::Path;

use prost::Message;

use crate::error::{Error, Result};

/// Fixed output filename, written to the current working directory.
pub const OUTPUT_FILENAME: &str = "face_detector.mlmodel";

/// Persist a Core ML model to disk.
///
/// The encoded model is written to a sibling temporary file and renamed
/// into place, so an existing file at `path` is replaced atomically and
/// never left half-written.
///
/// # Errors
///
/// Returns an error if the destination is not writable.
pub fn save_model<P: AsRef<Path>>(model: &Model, path: P) -> Result<()> {
    let path = path.as_ref();
    let bytes = model.encode_to_vec();

    let temp_path = path.with_extension("mlmodel.tmp");

    let write = fs::write(&temp_path, &bytes).and_then(|()| fs::rename(&temp_path, path));

    write.map_err(|source| Error::ModelSave {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_model() -> Model {
        Model {
            specification_version: 4,
            description: Some(ModelDescription::default()),
            is_updatable: false,
            r#type: Some(model::Type::NeuralNetwork(NeuralNetwork::default())),
        }
    }

    #[test]
    fn test_save_writes_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join(OUTPUT_FILENAME);

        save_model(&minimal_model(), &path).expect("save");

        let bytes = std::fs::read(&path).expect("read back");
        let decoded = Model::decode(bytes.as_slice()).expect("decode");
        assert_eq!(decoded.specification_version, 4);
    }

    #[test]
    fn test_save_overwrites_existing() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join(OUTPUT_FILENAME);
        std::fs::write(&path, b"stale contents").expect("seed file");

        save_model(&minimal_model(), &path).expect("save");

        let bytes = std::fs::read(&path).expect("read back");
        assert!(Model::decode(bytes.as_slice()).is_ok());
    }

    #[test]
    fn test_save_unwritable_path_errors() {
        let err = save_model(&minimal_model(), "/nonexistent/dir/out.mlmodel")
            .expect_err("unwritable path");
        assert!(matches!(err, Error::ModelSave { .. }));
    }
}
