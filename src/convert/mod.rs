//! ONNX to Core ML conversion.

mod layers;
mod options;

pub use options::{ConversionOptions, DeploymentTarget, ModelTask, Preprocessing};

use std::collections::HashMap;

use crate::coreml::{
    self, array_feature_type, feature_type, image_feature_type, neural_network_preprocessing,
    ArrayFeatureType, FeatureDescription, FeatureType, ImageFeatureType, Metadata, Model,
    ModelDescription, NeuralNetwork, NeuralNetworkImageScaler, NeuralNetworkPreprocessing,
    NeuralNetworkRegressor,
};
use crate::error::{Error, Result};
use crate::onnx::{GraphProto, ModelProto, ValueInfoProto};

use layers::{map_node, GraphContext};

/// Convert a loaded ONNX model into a Core ML model.
///
/// The graph's inputs and outputs become model features, inputs named in
/// [`ConversionOptions::image_inputs`] become image features with any
/// configured preprocessing baked in, and every node is translated to a
/// Core ML neural-network layer.
///
/// # Errors
///
/// Returns an error if the options are invalid, the model has no graph, or
/// the graph contains constructs the target format cannot express.
pub fn convert(model: &ModelProto, options: &ConversionOptions) -> Result<Model> {
    options.validate()?;

    let graph = model.graph.as_ref().ok_or(Error::MissingGraph)?;

    tracing::info!(
        "Converting graph {:?}: {} nodes, {} initializers",
        graph.name,
        graph.node.len(),
        graph.initializer.len()
    );

    let ctx = GraphContext::new(&graph.initializer);

    for name in &options.image_inputs {
        if !graph.input.iter().any(|v| v.name == *name) {
            return Err(Error::InvalidOptions {
                name: "image_inputs".to_string(),
                reason: format!("graph has no input named {name:?}"),
            });
        }
    }

    let mut inputs = Vec::new();
    for value in &graph.input {
        // Older exporters list weight initializers among the graph inputs
        if ctx.is_initializer(&value.name) {
            continue;
        }
        inputs.push(input_feature(value, options)?);
    }

    let outputs = graph.output.iter().map(output_feature).collect();

    let layers = graph
        .node
        .iter()
        .map(|node| map_node(node, &ctx))
        .collect::<Result<Vec<_>>>()?;

    tracing::info!("Mapped {} layers", layers.len());

    let preprocessing = options.preprocessing.as_ref().map_or_else(Vec::new, |p| {
        options
            .image_inputs
            .iter()
            .map(|name| NeuralNetworkPreprocessing {
                feature_name: name.clone(),
                preprocessor: Some(neural_network_preprocessing::Preprocessor::Scaler(
                    scaler(p),
                )),
            })
            .collect()
    });

    let predicted_feature_name = match options.task {
        ModelTask::Regression => graph
            .output
            .first()
            .map(|v| v.name.clone())
            .unwrap_or_default(),
        ModelTask::General => String::new(),
    };

    let description = ModelDescription {
        input: inputs,
        output: outputs,
        predicted_feature_name,
        metadata: Some(metadata(model, graph)),
    };

    let network_type = match options.task {
        ModelTask::Regression => {
            coreml::model::Type::NeuralNetworkRegressor(NeuralNetworkRegressor {
                layers,
                preprocessing,
            })
        }
        ModelTask::General => coreml::model::Type::NeuralNetwork(NeuralNetwork {
            layers,
            preprocessing,
        }),
    };

    Ok(Model {
        specification_version: options.deployment_target.spec_version(),
        description: Some(description),
        is_updatable: false,
        r#type: Some(network_type),
    })
}

/// Build the feature description for one graph input.
fn input_feature(value: &ValueInfoProto, options: &ConversionOptions) -> Result<FeatureDescription> {
    if !options.image_inputs.contains(&value.name) {
        return Ok(array_feature(value));
    }

    let shape = value.shape().ok_or_else(|| Error::MissingInputShape {
        input: value.name.clone(),
    })?;

    // NCHW, or CHW with the batch dimension already dropped
    let (channels, height, width) = match shape.as_slice() {
        [_, c, h, w] | [c, h, w] => (*c, *h, *w),
        _ => {
            return Err(Error::MissingInputShape {
                input: value.name.clone(),
            })
        }
    };

    let color_space = match channels {
        1 => image_feature_type::ColorSpace::Grayscale,
        3 if options.preprocessing.as_ref().is_some_and(|p| p.is_bgr) => {
            image_feature_type::ColorSpace::Bgr
        }
        3 => image_feature_type::ColorSpace::Rgb,
        other => {
            return Err(Error::InvalidOptions {
                name: "image_inputs".to_string(),
                reason: format!(
                    "input {:?} has {other} channels, image inputs need 1 or 3",
                    value.name
                ),
            })
        }
    };

    Ok(FeatureDescription {
        name: value.name.clone(),
        short_description: String::new(),
        r#type: Some(FeatureType {
            r#type: Some(feature_type::Type::ImageType(ImageFeatureType {
                width,
                height,
                color_space: color_space as i32,
            })),
            is_optional: false,
        }),
    })
}

fn output_feature(value: &ValueInfoProto) -> FeatureDescription {
    array_feature(value)
}

/// Float32 multiarray feature with the declared shape, batch dim stripped.
fn array_feature(value: &ValueInfoProto) -> FeatureDescription {
    let shape = match value.shape().as_deref() {
        Some([_, rest @ ..]) if rest.len() == 3 => rest.to_vec(),
        Some(dims) => dims.to_vec(),
        None => Vec::new(),
    };

    FeatureDescription {
        name: value.name.clone(),
        short_description: String::new(),
        r#type: Some(FeatureType {
            r#type: Some(feature_type::Type::MultiArrayType(ArrayFeatureType {
                shape,
                data_type: array_feature_type::ArrayDataType::Float32 as i32,
            })),
            is_optional: false,
        }),
    }
}

#[allow(clippy::cast_possible_truncation)]
fn scaler(preprocessing: &Preprocessing) -> NeuralNetworkImageScaler {
    // Core ML stores preprocessing parameters as float32
    NeuralNetworkImageScaler {
        channel_scale: preprocessing.image_scale as f32,
        blue_bias: preprocessing.blue_bias as f32,
        gray_bias: preprocessing.gray_bias as f32,
        green_bias: preprocessing.green_bias as f32,
        red_bias: preprocessing.red_bias as f32,
    }
}

fn metadata(model: &ModelProto, graph: &GraphProto) -> Metadata {
    let mut user_defined = HashMap::new();
    if !model.producer_name.is_empty() {
        user_defined.insert(
            "onnx_producer".to_string(),
            format!("{} {}", model.producer_name, model.producer_version)
                .trim()
                .to_string(),
        );
    }

    let short_description = if graph.name.is_empty() {
        "Converted from ONNX".to_string()
    } else {
        format!("Converted from ONNX graph {:?}", graph.name)
    };

    Metadata {
        short_description,
        version_string: String::new(),
        author: String::new(),
        license: String::new(),
        user_defined,
    }
}
