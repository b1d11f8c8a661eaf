//! Custom error types for onnx2coreml.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the onnx2coreml library.
#[derive(Error, Debug)]
pub enum Error {
    /// The input model path does not exist.
    ///
    /// The display string is the exact sentence the CLI prints on stdout
    /// for this case, wording preserved from the original tool.
    #[error("Model file <{path}> does not exists.")]
    MissingInput { path: PathBuf },

    /// Failed to read an ONNX model file.
    #[error("failed to read model from {path}: {source}")]
    ModelRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not a parseable ONNX protobuf.
    #[error("failed to decode ONNX model {path}: {source}")]
    ModelDecode {
        path: PathBuf,
        #[source]
        source: prost::DecodeError,
    },

    /// The model decoded but carries no graph to convert.
    #[error("ONNX model has no graph")]
    MissingGraph,

    /// The graph contains an operator with no Core ML equivalent.
    #[error("unsupported operator {op_type} (node {node})")]
    UnsupportedOperator { op_type: String, node: String },

    /// The operator is supported but one of its attributes is not.
    #[error("unsupported {op_type} attribute {attribute}: {reason}")]
    UnsupportedAttribute {
        op_type: String,
        attribute: String,
        reason: String,
    },

    /// An image input has no usable NCHW shape declaration.
    #[error("graph input {input} has no concrete NCHW shape")]
    MissingInputShape { input: String },

    /// A node references weight data that is not in the graph initializers.
    #[error("missing initializer tensor {name}")]
    MissingTensor { name: String },

    /// Weight data is stored with an element type the converter cannot use.
    #[error("tensor {name} has unsupported element type {data_type}")]
    UnsupportedTensorType { name: String, data_type: i32 },

    /// Invalid conversion option value.
    #[error("invalid option {name}: {reason}")]
    InvalidOptions { name: String, reason: String },

    /// Failed to persist the converted model.
    #[error("failed to save model to {path}: {source}")]
    ModelSave {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for onnx2coreml operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_missing_input_message() {
        let err = Error::MissingInput {
            path: Path::new("/tmp/does_not_exist.onnx").to_path_buf(),
        };

        assert_eq!(
            err.to_string(),
            "Model file </tmp/does_not_exist.onnx> does not exists."
        );
    }
}
