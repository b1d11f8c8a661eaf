//! ONNX model loading and graph access utilities.

mod proto;

pub use proto::*;

use std::fs;
use std::path::Path;

use prost::Message;

use crate::error::{Error, Result};

/// Load an ONNX model from disk.
///
/// The file is read fully into memory and decoded as a `ModelProto`. No
/// validation beyond protobuf decoding happens here; structural problems
/// surface later during conversion.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid ONNX
/// protobuf.
pub fn load_model<P: AsRef<Path>>(path: P) -> Result<ModelProto> {
    let path = path.as_ref();

    let bytes = fs::read(path).map_err(|source| Error::ModelRead {
        path: path.to_path_buf(),
        source,
    })?;

    ModelProto::decode(bytes.as_slice()).map_err(|source| Error::ModelDecode {
        path: path.to_path_buf(),
        source,
    })
}

impl NodeProto {
    /// Look up an attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&AttributeProto> {
        self.attribute.iter().find(|a| a.name == name)
    }

    /// Integer attribute value, if present.
    pub fn attr_int(&self, name: &str) -> Option<i64> {
        self.attribute(name).map(|a| a.i)
    }

    /// Float attribute value, if present.
    pub fn attr_float(&self, name: &str) -> Option<f32> {
        self.attribute(name).map(|a| a.f)
    }

    /// Integer-list attribute value, if present.
    pub fn attr_ints(&self, name: &str) -> Option<&[i64]> {
        self.attribute(name).map(|a| a.ints.as_slice())
    }

    /// String attribute value, if present and valid UTF-8.
    pub fn attr_string(&self, name: &str) -> Option<&str> {
        self.attribute(name)
            .and_then(|a| std::str::from_utf8(&a.s).ok())
    }
}

impl ValueInfoProto {
    /// Concrete tensor shape of this value, if fully declared.
    ///
    /// Symbolic dimensions (`dim_param`) yield `None`; the converter treats
    /// those the same as a missing shape.
    pub fn shape(&self) -> Option<Vec<i64>> {
        let shape = self.r#type.as_ref()?.tensor_type.as_ref()?.shape.as_ref()?;

        shape
            .dim
            .iter()
            .map(|d| match d.value {
                Some(tensor_shape_proto::dimension::Value::DimValue(v)) => Some(v),
                _ => None,
            })
            .collect()
    }
}

impl TensorProto {
    /// Extract this tensor's data as `f32` values.
    ///
    /// Handles both the typed `float_data` field and little-endian
    /// `raw_data`, which are the two layouts ONNX exporters emit.
    ///
    /// # Errors
    ///
    /// Returns an error if the element type is not float32.
    pub fn to_f32(&self) -> Result<Vec<f32>> {
        if self.data_type != tensor_proto::DataType::Float as i32 {
            return Err(Error::UnsupportedTensorType {
                name: self.name.clone(),
                data_type: self.data_type,
            });
        }

        if !self.float_data.is_empty() {
            return Ok(self.float_data.clone());
        }

        Ok(self
            .raw_data
            .chunks_exact(4)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect())
    }

    /// Extract this tensor's data as `i64` values.
    ///
    /// # Errors
    ///
    /// Returns an error if the element type is not int64.
    pub fn to_i64(&self) -> Result<Vec<i64>> {
        if self.data_type != tensor_proto::DataType::Int64 as i32 {
            return Err(Error::UnsupportedTensorType {
                name: self.name.clone(),
                data_type: self.data_type,
            });
        }

        if !self.int64_data.is_empty() {
            return Ok(self.int64_data.clone());
        }

        Ok(self
            .raw_data
            .chunks_exact(8)
            .map(|b| {
                i64::from_le_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]])
            })
            .collect())
    }

    /// Total number of elements implied by `dims`.
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub fn len(&self) -> usize {
        // Safe: clamped to non-negative before casting
        self.dims.iter().product::<i64>().max(0) as usize
    }

    /// Whether the tensor holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_rejects_garbage() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        // Wire type 7 is invalid, so decoding must fail
        file.write_all(&[0x0f, 0xff, 0xff, 0xff])
            .expect("write garbage");

        let err = load_model(file.path()).expect_err("garbage should not decode");
        assert!(matches!(err, Error::ModelDecode { .. }));
    }

    #[test]
    fn test_load_missing_file_is_read_error() {
        let err = load_model("/nonexistent/model.onnx").expect_err("missing file");
        assert!(matches!(err, Error::ModelRead { .. }));
    }

    #[test]
    fn test_tensor_f32_from_raw_data() {
        let tensor = TensorProto {
            dims: vec![2],
            data_type: tensor_proto::DataType::Float as i32,
            raw_data: [1.5f32.to_le_bytes(), (-2.0f32).to_le_bytes()].concat(),
            ..Default::default()
        };

        assert_eq!(tensor.to_f32().expect("valid raw data"), vec![1.5, -2.0]);
    }

    #[test]
    fn test_tensor_f32_rejects_int64() {
        let tensor = TensorProto {
            dims: vec![1],
            data_type: tensor_proto::DataType::Int64 as i32,
            int64_data: vec![7],
            name: "shape".to_string(),
            ..Default::default()
        };

        let err = tensor.to_f32().expect_err("int64 is not f32");
        assert!(matches!(err, Error::UnsupportedTensorType { .. }));
    }

    #[test]
    fn test_value_shape_symbolic_dim_is_none() {
        let value = ValueInfoProto {
            name: "input".to_string(),
            r#type: Some(TypeProto {
                tensor_type: Some(type_proto::Tensor {
                    elem_type: tensor_proto::DataType::Float as i32,
                    shape: Some(TensorShapeProto {
                        dim: vec![
                            tensor_shape_proto::Dimension {
                                value: Some(
                                    tensor_shape_proto::dimension::Value::DimParam(
                                        "batch".to_string(),
                                    ),
                                ),
                            },
                            tensor_shape_proto::Dimension {
                                value: Some(
                                    tensor_shape_proto::dimension::Value::DimValue(3),
                                ),
                            },
                        ],
                    }),
                }),
            }),
            doc_string: String::new(),
        };

        assert_eq!(value.shape(), None);
    }
}
