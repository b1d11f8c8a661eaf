//! Core ML protobuf structures.
//!
//! Hand-maintained `prost` subset of Apple's `Model.proto` and
//! `NeuralNetwork.proto` schemas, limited to the messages a converted
//! convolutional network needs. Field numbers match the upstream
//! definitions so emitted files open in Core ML tooling.

use std::collections::HashMap;

/// A complete Core ML model: specification version, description, and the
/// model-type payload.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Model {
    #[prost(int32, tag = "1")]
    pub specification_version: i32,
    #[prost(message, optional, tag = "2")]
    pub description: Option<ModelDescription>,
    #[prost(bool, tag = "10")]
    pub is_updatable: bool,
    #[prost(oneof = "model::Type", tags = "303, 500")]
    pub r#type: Option<model::Type>,
}

pub mod model {
    /// Model-type payload. Only the neural-network family is emitted.
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Type {
        #[prost(message, tag = "303")]
        NeuralNetworkRegressor(super::NeuralNetworkRegressor),
        #[prost(message, tag = "500")]
        NeuralNetwork(super::NeuralNetwork),
    }
}

/// Input/output features and metadata of a model.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ModelDescription {
    #[prost(message, repeated, tag = "1")]
    pub input: Vec<FeatureDescription>,
    #[prost(message, repeated, tag = "10")]
    pub output: Vec<FeatureDescription>,
    #[prost(string, tag = "11")]
    pub predicted_feature_name: String,
    #[prost(message, optional, tag = "100")]
    pub metadata: Option<Metadata>,
}

/// Human-readable model metadata.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Metadata {
    #[prost(string, tag = "1")]
    pub short_description: String,
    #[prost(string, tag = "2")]
    pub version_string: String,
    #[prost(string, tag = "3")]
    pub author: String,
    #[prost(string, tag = "4")]
    pub license: String,
    #[prost(map = "string, string", tag = "100")]
    pub user_defined: HashMap<String, String>,
}

/// A named, typed model input or output.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FeatureDescription {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(string, tag = "2")]
    pub short_description: String,
    #[prost(message, optional, tag = "3")]
    pub r#type: Option<FeatureType>,
}

/// The type of a feature.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FeatureType {
    #[prost(oneof = "feature_type::Type", tags = "2, 4, 5")]
    pub r#type: Option<feature_type::Type>,
    #[prost(bool, tag = "1000")]
    pub is_optional: bool,
}

pub mod feature_type {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Type {
        #[prost(message, tag = "2")]
        DoubleType(super::DoubleFeatureType),
        #[prost(message, tag = "4")]
        ImageType(super::ImageFeatureType),
        #[prost(message, tag = "5")]
        MultiArrayType(super::ArrayFeatureType),
    }
}

/// Scalar double feature.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DoubleFeatureType {}

/// Image feature: pixel dimensions and color space.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ImageFeatureType {
    #[prost(int64, tag = "1")]
    pub width: i64,
    #[prost(int64, tag = "2")]
    pub height: i64,
    #[prost(enumeration = "image_feature_type::ColorSpace", tag = "3")]
    pub color_space: i32,
}

pub mod image_feature_type {
    /// Pixel layout of an image feature.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum ColorSpace {
        InvalidColorSpace = 0,
        Grayscale = 10,
        Rgb = 20,
        Bgr = 30,
    }
}

/// Multidimensional array feature.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ArrayFeatureType {
    #[prost(int64, repeated, tag = "1")]
    pub shape: Vec<i64>,
    #[prost(enumeration = "array_feature_type::ArrayDataType", tag = "2")]
    pub data_type: i32,
}

pub mod array_feature_type {
    /// Element type of an array feature. Values encode bit width in the
    /// low 16 bits, as in the upstream schema.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum ArrayDataType {
        InvalidArrayDataType = 0,
        Float32 = 65_568,
        Double = 65_600,
        Int32 = 131_104,
    }
}

/// A feed-forward neural network.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct NeuralNetwork {
    #[prost(message, repeated, tag = "1")]
    pub layers: Vec<NeuralNetworkLayer>,
    #[prost(message, repeated, tag = "2")]
    pub preprocessing: Vec<NeuralNetworkPreprocessing>,
}

/// A neural network whose predicted feature is a continuous value.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct NeuralNetworkRegressor {
    #[prost(message, repeated, tag = "1")]
    pub layers: Vec<NeuralNetworkLayer>,
    #[prost(message, repeated, tag = "2")]
    pub preprocessing: Vec<NeuralNetworkPreprocessing>,
}

/// Per-input image preprocessing.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct NeuralNetworkPreprocessing {
    #[prost(string, tag = "1")]
    pub feature_name: String,
    #[prost(oneof = "neural_network_preprocessing::Preprocessor", tags = "10")]
    pub preprocessor: Option<neural_network_preprocessing::Preprocessor>,
}

pub mod neural_network_preprocessing {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Preprocessor {
        #[prost(message, tag = "10")]
        Scaler(super::NeuralNetworkImageScaler),
    }
}

/// Affine pixel preprocessing: `channel * channelScale + channelBias`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct NeuralNetworkImageScaler {
    #[prost(float, tag = "10")]
    pub channel_scale: f32,
    #[prost(float, tag = "20")]
    pub blue_bias: f32,
    #[prost(float, tag = "21")]
    pub gray_bias: f32,
    #[prost(float, tag = "22")]
    pub green_bias: f32,
    #[prost(float, tag = "23")]
    pub red_bias: f32,
}

/// One layer of a neural network.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct NeuralNetworkLayer {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(string, repeated, tag = "2")]
    pub input: Vec<String>,
    #[prost(string, repeated, tag = "3")]
    pub output: Vec<String>,
    #[prost(
        oneof = "neural_network_layer::Layer",
        tags = "100, 120, 130, 140, 160, 175, 230, 231, 300, 301, 320"
    )]
    pub layer: Option<neural_network_layer::Layer>,
}

pub mod neural_network_layer {
    /// Layer-parameter payload.
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Layer {
        #[prost(message, tag = "100")]
        Convolution(super::ConvolutionLayerParams),
        #[prost(message, tag = "120")]
        Pooling(super::PoolingLayerParams),
        #[prost(message, tag = "130")]
        Activation(super::ActivationParams),
        #[prost(message, tag = "140")]
        InnerProduct(super::InnerProductLayerParams),
        #[prost(message, tag = "160")]
        Batchnorm(super::BatchnormLayerParams),
        #[prost(message, tag = "175")]
        Softmax(super::SoftmaxLayerParams),
        #[prost(message, tag = "230")]
        Add(super::AddLayerParams),
        #[prost(message, tag = "231")]
        Multiply(super::MultiplyLayerParams),
        #[prost(message, tag = "300")]
        Reshape(super::ReshapeLayerParams),
        #[prost(message, tag = "301")]
        Flatten(super::FlattenLayerParams),
        #[prost(message, tag = "320")]
        Concat(super::ConcatLayerParams),
    }
}

/// Dense weight storage.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct WeightParams {
    #[prost(float, repeated, tag = "1")]
    pub float_value: Vec<f32>,
}

/// Spatial convolution.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ConvolutionLayerParams {
    #[prost(uint64, tag = "1")]
    pub output_channels: u64,
    #[prost(uint64, tag = "2")]
    pub kernel_channels: u64,
    #[prost(uint64, tag = "10")]
    pub n_groups: u64,
    #[prost(uint64, repeated, tag = "20")]
    pub kernel_size: Vec<u64>,
    #[prost(uint64, repeated, tag = "30")]
    pub stride: Vec<u64>,
    #[prost(uint64, repeated, tag = "40")]
    pub dilation_factor: Vec<u64>,
    #[prost(oneof = "convolution_layer_params::ConvolutionPaddingType", tags = "50, 51")]
    pub convolution_padding_type: Option<convolution_layer_params::ConvolutionPaddingType>,
    #[prost(bool, tag = "60")]
    pub is_deconvolution: bool,
    #[prost(bool, tag = "70")]
    pub has_bias: bool,
    #[prost(message, optional, tag = "90")]
    pub weights: Option<WeightParams>,
    #[prost(message, optional, tag = "91")]
    pub bias: Option<WeightParams>,
}

pub mod convolution_layer_params {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum ConvolutionPaddingType {
        #[prost(message, tag = "50")]
        Valid(super::ValidPadding),
        #[prost(message, tag = "51")]
        Same(super::SamePadding),
    }
}

/// Explicit border padding.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ValidPadding {
    #[prost(message, optional, tag = "1")]
    pub padding_amounts: Option<BorderAmounts>,
}

/// TensorFlow-style symmetric padding.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SamePadding {
    #[prost(enumeration = "same_padding::SamePaddingMode", tag = "1")]
    pub asymmetry_mode: i32,
}

pub mod same_padding {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum SamePaddingMode {
        BottomRightHeavy = 0,
        TopLeftHeavy = 1,
    }
}

/// Per-edge padding amounts, one entry per spatial dimension.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct BorderAmounts {
    #[prost(message, repeated, tag = "10")]
    pub border_amounts: Vec<border_amounts::EdgeSizes>,
}

pub mod border_amounts {
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct EdgeSizes {
        #[prost(uint64, tag = "1")]
        pub start_edge_size: u64,
        #[prost(uint64, tag = "2")]
        pub end_edge_size: u64,
    }
}

/// Spatial pooling.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PoolingLayerParams {
    #[prost(enumeration = "pooling_layer_params::PoolingType", tag = "1")]
    pub r#type: i32,
    #[prost(uint64, repeated, tag = "10")]
    pub kernel_size: Vec<u64>,
    #[prost(uint64, repeated, tag = "20")]
    pub stride: Vec<u64>,
    #[prost(oneof = "pooling_layer_params::PoolingPaddingType", tags = "30, 31")]
    pub pooling_padding_type: Option<pooling_layer_params::PoolingPaddingType>,
    #[prost(bool, tag = "50")]
    pub avg_pool_exclude_padding: bool,
    #[prost(bool, tag = "60")]
    pub global_pooling: bool,
}

pub mod pooling_layer_params {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum PoolingType {
        Max = 0,
        Average = 1,
        L2 = 2,
    }

    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum PoolingPaddingType {
        #[prost(message, tag = "30")]
        Valid(super::ValidPadding),
        #[prost(message, tag = "31")]
        Same(super::SamePadding),
    }
}

/// Elementwise nonlinearity.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ActivationParams {
    #[prost(oneof = "activation_params::NonlinearityType", tags = "5, 10, 15, 30, 40")]
    pub nonlinearity_type: Option<activation_params::NonlinearityType>,
}

pub mod activation_params {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum NonlinearityType {
        #[prost(message, tag = "5")]
        Linear(super::ActivationLinear),
        #[prost(message, tag = "10")]
        ReLu(super::ActivationReLu),
        #[prost(message, tag = "15")]
        LeakyReLu(super::ActivationLeakyReLu),
        #[prost(message, tag = "30")]
        Tanh(super::ActivationTanh),
        #[prost(message, tag = "40")]
        Sigmoid(super::ActivationSigmoid),
    }
}

/// `f(x) = alpha * x + beta`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ActivationLinear {
    #[prost(float, tag = "1")]
    pub alpha: f32,
    #[prost(float, tag = "2")]
    pub beta: f32,
}

/// `f(x) = max(0, x)`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ActivationReLu {}

/// `f(x) = x` for `x >= 0`, `alpha * x` otherwise.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ActivationLeakyReLu {
    #[prost(float, tag = "1")]
    pub alpha: f32,
}

/// Hyperbolic tangent activation.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ActivationTanh {}

/// Logistic sigmoid activation.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ActivationSigmoid {}

/// Fully connected layer.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct InnerProductLayerParams {
    #[prost(uint64, tag = "1")]
    pub input_channels: u64,
    #[prost(uint64, tag = "2")]
    pub output_channels: u64,
    #[prost(bool, tag = "10")]
    pub has_bias: bool,
    #[prost(message, optional, tag = "20")]
    pub weights: Option<WeightParams>,
    #[prost(message, optional, tag = "21")]
    pub bias: Option<WeightParams>,
}

/// Batch normalization with folded statistics.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct BatchnormLayerParams {
    #[prost(uint64, tag = "1")]
    pub channels: u64,
    #[prost(bool, tag = "5")]
    pub compute_mean_var: bool,
    #[prost(bool, tag = "6")]
    pub instance_normalization: bool,
    #[prost(float, tag = "10")]
    pub epsilon: f32,
    #[prost(message, optional, tag = "15")]
    pub gamma: Option<WeightParams>,
    #[prost(message, optional, tag = "16")]
    pub beta: Option<WeightParams>,
    #[prost(message, optional, tag = "17")]
    pub mean: Option<WeightParams>,
    #[prost(message, optional, tag = "18")]
    pub variance: Option<WeightParams>,
}

/// Channel-axis softmax.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SoftmaxLayerParams {}

/// Elementwise addition of the input blobs.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AddLayerParams {
    #[prost(float, tag = "1")]
    pub alpha: f32,
}

/// Elementwise multiplication of the input blobs.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MultiplyLayerParams {
    #[prost(float, tag = "1")]
    pub alpha: f32,
}

/// Fixed-target-shape reshape.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ReshapeLayerParams {
    #[prost(int64, repeated, tag = "1")]
    pub target_shape: Vec<i64>,
    #[prost(enumeration = "reshape_layer_params::ReshapeOrder", tag = "2")]
    pub mode: i32,
}

pub mod reshape_layer_params {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum ReshapeOrder {
        ChannelFirst = 0,
        ChannelLast = 1,
    }
}

/// Flatten spatial dimensions into the channel axis.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FlattenLayerParams {
    #[prost(enumeration = "flatten_layer_params::FlattenOrder", tag = "1")]
    pub mode: i32,
}

pub mod flatten_layer_params {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum FlattenOrder {
        ChannelFirst = 0,
        ChannelLast = 1,
    }
}

/// Channel-axis concatenation.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ConcatLayerParams {
    #[prost(bool, tag = "100")]
    pub sequence_concat: bool,
}
