//! Conversion options.
//!
//! One configuration structure covers every variant of the original
//! conversion scripts: the model task, which graph inputs are images, the
//! minimum deployment target, and the optional pixel preprocessing that is
//! baked into the emitted model.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// How the converter should treat the graph's outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelTask {
    /// Outputs are continuous values; the model is emitted as a
    /// neural-network regressor.
    #[default]
    Regression,
    /// Outputs are plain tensors with no prediction semantics.
    General,
}

impl FromStr for ModelTask {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "regression" => Ok(Self::Regression),
            "general" => Ok(Self::General),
            other => Err(Error::InvalidOptions {
                name: "task".to_string(),
                reason: format!("unknown task {other:?}, expected regression or general"),
            }),
        }
    }
}

impl fmt::Display for ModelTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Regression => write!(f, "regression"),
            Self::General => write!(f, "general"),
        }
    }
}

/// Minimum iOS version the converted model must stay compatible with.
///
/// Parsed from the bare major version string the original tool used
/// (`"13"`), and mapped to the Core ML specification version stamped into
/// the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum DeploymentTarget {
    Ios11,
    Ios12,
    #[default]
    Ios13,
    Ios14,
    Ios15,
}

impl DeploymentTarget {
    /// The Core ML specification version for this target.
    #[must_use]
    pub const fn spec_version(self) -> i32 {
        match self {
            Self::Ios11 => 1,
            Self::Ios12 => 3,
            Self::Ios13 => 4,
            Self::Ios14 => 5,
            Self::Ios15 => 6,
        }
    }
}

impl FromStr for DeploymentTarget {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "11" => Ok(Self::Ios11),
            "12" => Ok(Self::Ios12),
            "13" => Ok(Self::Ios13),
            "14" => Ok(Self::Ios14),
            "15" => Ok(Self::Ios15),
            other => Err(Error::InvalidOptions {
                name: "deployment_target".to_string(),
                reason: format!("unknown iOS version {other:?}, expected 11 through 15"),
            }),
        }
    }
}

impl fmt::Display for DeploymentTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let version = match self {
            Self::Ios11 => "11",
            Self::Ios12 => "12",
            Self::Ios13 => "13",
            Self::Ios14 => "14",
            Self::Ios15 => "15",
        };
        write!(f, "{version}")
    }
}

/// Pixel preprocessing baked into the converted model, so callers feed raw
/// 8-bit image data instead of pre-normalized tensors.
///
/// Each channel value `v` is mapped to `v * image_scale + bias`. With the
/// defaults this takes `[0, 255]` onto `[-1, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Preprocessing {
    /// Whether the image input uses BGR channel order instead of RGB.
    pub is_bgr: bool,

    /// Additive bias applied to the red channel after scaling.
    pub red_bias: f64,

    /// Additive bias applied to the green channel after scaling.
    pub green_bias: f64,

    /// Additive bias applied to the blue channel after scaling.
    pub blue_bias: f64,

    /// Additive bias for single-channel (grayscale) inputs.
    pub gray_bias: f64,

    /// Multiplicative scale applied to every pixel value.
    pub image_scale: f64,
}

impl Default for Preprocessing {
    fn default() -> Self {
        Self {
            is_bgr: false,
            red_bias: -1.0,
            green_bias: -1.0,
            blue_bias: -1.0,
            gray_bias: -1.0,
            image_scale: 2.0 / 255.0,
        }
    }
}

impl Preprocessing {
    /// Apply the affine pixel mapping for one channel.
    #[must_use]
    pub fn normalize(&self, value: f64, bias: f64) -> f64 {
        value.mul_add(self.image_scale, bias)
    }
}

/// Configuration for one conversion run.
///
/// Defaults reproduce the face-detector conversion: a regression model with
/// a single image input named `input`, an iOS 13 deployment floor, and
/// `[-1, 1]` pixel normalization baked in.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionOptions {
    /// Output interpretation for the converted model.
    pub task: ModelTask,

    /// Names of graph inputs to expose as image features.
    pub image_inputs: Vec<String>,

    /// Minimum deployment target for the emitted operator set.
    pub deployment_target: DeploymentTarget,

    /// Pixel preprocessing to bake in. `None` leaves image inputs raw.
    pub preprocessing: Option<Preprocessing>,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            task: ModelTask::Regression,
            image_inputs: vec!["input".to_string()],
            deployment_target: DeploymentTarget::Ios13,
            preprocessing: Some(Preprocessing::default()),
        }
    }
}

impl ConversionOptions {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any parameter is out of valid range.
    pub fn validate(&self) -> Result<()> {
        if self.image_inputs.iter().any(String::is_empty) {
            return Err(Error::InvalidOptions {
                name: "image_inputs".to_string(),
                reason: "input names must not be empty".to_string(),
            });
        }

        if let Some(ref preprocessing) = self.preprocessing {
            if preprocessing.image_scale == 0.0 {
                return Err(Error::InvalidOptions {
                    name: "image_scale".to_string(),
                    reason: "scale of zero makes the pixel mapping non-invertible".to_string(),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preprocessing_defaults() {
        let p = Preprocessing::default();

        assert!(!p.is_bgr);
        assert!((p.red_bias - (-1.0)).abs() < f64::EPSILON);
        assert!((p.green_bias - (-1.0)).abs() < f64::EPSILON);
        assert!((p.blue_bias - (-1.0)).abs() < f64::EPSILON);
        assert!((p.image_scale - 2.0 / 255.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_normalization_endpoints() {
        let p = Preprocessing::default();

        // v in [0, 255] maps onto [-1, 1]
        assert!((p.normalize(0.0, p.red_bias) - (-1.0)).abs() < 1e-9);
        assert!((p.normalize(255.0, p.red_bias) - 1.0).abs() < 1e-9);
        assert!(p.normalize(127.5, p.red_bias).abs() < 1e-9);
    }

    #[test]
    fn test_normalization_is_invertible() {
        let p = Preprocessing::default();

        for v in [0.0, 1.0, 42.0, 127.5, 254.0, 255.0] {
            let mapped = p.normalize(v, p.green_bias);
            let unmapped = (mapped - p.green_bias) / p.image_scale;
            assert!((unmapped - v).abs() < 1e-9);
        }
    }

    #[test]
    fn test_deployment_target_parse() {
        assert_eq!("13".parse::<DeploymentTarget>().unwrap(), DeploymentTarget::Ios13);
        assert_eq!("11".parse::<DeploymentTarget>().unwrap(), DeploymentTarget::Ios11);
        assert!("10".parse::<DeploymentTarget>().is_err());
        assert!("ios13".parse::<DeploymentTarget>().is_err());
    }

    #[test]
    fn test_spec_versions() {
        assert_eq!(DeploymentTarget::Ios11.spec_version(), 1);
        assert_eq!(DeploymentTarget::Ios12.spec_version(), 3);
        assert_eq!(DeploymentTarget::Ios13.spec_version(), 4);
        assert_eq!(DeploymentTarget::Ios15.spec_version(), 6);
    }

    #[test]
    fn test_task_parse() {
        assert_eq!("regression".parse::<ModelTask>().unwrap(), ModelTask::Regression);
        assert!("classifier".parse::<ModelTask>().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_input_name() {
        let options = ConversionOptions {
            image_inputs: vec![String::new()],
            ..ConversionOptions::default()
        };

        assert!(matches!(
            options.validate(),
            Err(Error::InvalidOptions { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_zero_scale() {
        let options = ConversionOptions {
            preprocessing: Some(Preprocessing {
                image_scale: 0.0,
                ..Preprocessing::default()
            }),
            ..ConversionOptions::default()
        };

        assert!(options.validate().is_err());
    }
}
