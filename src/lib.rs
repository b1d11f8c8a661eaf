//! # onnx2coreml
//!
//! A library for converting ONNX neural-network models into Core ML
//! `.mlmodel` packages.
//!
//! The converter was written for the Ultra-Light face-detector family but
//! handles any feed-forward convolutional graph built from the supported
//! operator set. Image inputs can have affine pixel preprocessing baked in,
//! so the converted model accepts raw 8-bit pixels instead of
//! pre-normalized tensors.
//!
//! ## Example
//!
//! ```no_run
//! use onnx2coreml::{convert, coreml, onnx, ConversionOptions};
//!
//! # fn main() -> onnx2coreml::Result<()> {
//! let model = onnx::load_model("version-RFB-320.onnx")?;
//! let mlmodel = convert(&model, &ConversionOptions::default())?;
//! coreml::save_model(&mlmodel, coreml::OUTPUT_FILENAME)?;
//! # Ok(())
//! # }
//! ```

pub mod convert;
pub mod coreml;
pub mod error;
pub mod onnx;

pub use convert::{convert, ConversionOptions, DeploymentTarget, ModelTask, Preprocessing};
pub use error::{Error, Result};
