//! ONNX node to Core ML layer translation.

use std::collections::HashMap;

use ndarray::Array2;

use crate::coreml::{
    activation_params, convolution_layer_params, flatten_layer_params, neural_network_layer,
    pooling_layer_params, reshape_layer_params, same_padding, ActivationLeakyReLu, ActivationLinear,
    ActivationParams, ActivationReLu, ActivationSigmoid, ActivationTanh, AddLayerParams,
    BatchnormLayerParams, BorderAmounts, ConcatLayerParams, ConvolutionLayerParams,
    FlattenLayerParams, InnerProductLayerParams, MultiplyLayerParams, NeuralNetworkLayer,
    PoolingLayerParams, ReshapeLayerParams, SamePadding, SoftmaxLayerParams, ValidPadding,
    WeightParams,
};
use crate::coreml::border_amounts::EdgeSizes;
use crate::error::{Error, Result};
use crate::onnx::{NodeProto, TensorProto};

/// Graph-wide lookup state shared by the per-node builders.
pub(super) struct GraphContext<'a> {
    initializers: HashMap<&'a str, &'a TensorProto>,
}

impl<'a> GraphContext<'a> {
    pub(super) fn new(initializers: &'a [TensorProto]) -> Self {
        Self {
            initializers: initializers.iter().map(|t| (t.name.as_str(), t)).collect(),
        }
    }

    /// Whether a graph value name refers to a constant initializer.
    pub(super) fn is_initializer(&self, name: &str) -> bool {
        self.initializers.contains_key(name)
    }

    fn tensor(&self, name: &str) -> Result<&TensorProto> {
        self.initializers
            .get(name)
            .copied()
            .ok_or_else(|| Error::MissingTensor {
                name: name.to_string(),
            })
    }
}

/// Translate one graph node into a Core ML layer.
///
/// # Errors
///
/// Returns an error for operators or attribute combinations the target
/// format cannot express.
pub(super) fn map_node(
    node: &NodeProto,
    ctx: &GraphContext<'_>,
) -> Result<NeuralNetworkLayer> {
    let name = layer_name(node);

    let (layer, data_inputs) = match node.op_type.as_str() {
        "Conv" => (convolution(node, ctx)?, first_input(node)),
        "BatchNormalization" => (batchnorm(node, ctx)?, first_input(node)),
        "Relu" => (
            activation(activation_params::NonlinearityType::ReLu(ActivationReLu {})),
            first_input(node),
        ),
        "LeakyRelu" => (
            activation(activation_params::NonlinearityType::LeakyReLu(
                ActivationLeakyReLu {
                    alpha: node.attr_float("alpha").unwrap_or(0.01),
                },
            )),
            first_input(node),
        ),
        "Sigmoid" => (
            activation(activation_params::NonlinearityType::Sigmoid(
                ActivationSigmoid {},
            )),
            first_input(node),
        ),
        "Tanh" => (
            activation(activation_params::NonlinearityType::Tanh(ActivationTanh {})),
            first_input(node),
        ),
        // Inference no-ops, kept as identity layers so blob names line up
        "Identity" | "Dropout" => (
            activation(activation_params::NonlinearityType::Linear(
                ActivationLinear { alpha: 1.0, beta: 0.0 },
            )),
            first_input(node),
        ),
        "Softmax" => (
            neural_network_layer::Layer::Softmax(SoftmaxLayerParams {}),
            first_input(node),
        ),
        "MaxPool" => (
            pooling(node, pooling_layer_params::PoolingType::Max, false)?,
            first_input(node),
        ),
        "AveragePool" => (
            pooling(node, pooling_layer_params::PoolingType::Average, false)?,
            first_input(node),
        ),
        "GlobalMaxPool" => (
            pooling(node, pooling_layer_params::PoolingType::Max, true)?,
            first_input(node),
        ),
        "GlobalAveragePool" => (
            pooling(node, pooling_layer_params::PoolingType::Average, true)?,
            first_input(node),
        ),
        "Add" => (
            elementwise(node, ctx, neural_network_layer::Layer::Add(AddLayerParams { alpha: 0.0 }))?,
            node.input.clone(),
        ),
        "Mul" => (
            elementwise(
                node,
                ctx,
                neural_network_layer::Layer::Multiply(MultiplyLayerParams { alpha: 0.0 }),
            )?,
            node.input.clone(),
        ),
        "Concat" => (concat(node)?, node.input.clone()),
        "Reshape" => (reshape(node, ctx)?, first_input(node)),
        "Flatten" => (flatten(node)?, first_input(node)),
        "Gemm" => (gemm(node, ctx)?, first_input(node)),
        "MatMul" => (matmul(node, ctx)?, first_input(node)),
        _ => {
            return Err(Error::UnsupportedOperator {
                op_type: node.op_type.clone(),
                node: name,
            })
        }
    };

    Ok(NeuralNetworkLayer {
        name,
        input: data_inputs,
        // Secondary outputs (BatchNormalization training state) are dropped
        output: node.output.iter().take(1).cloned().collect(),
        layer: Some(layer),
    })
}

fn layer_name(node: &NodeProto) -> String {
    if node.name.is_empty() {
        let output = node.output.first().map_or("", String::as_str);
        format!("{}_{output}", node.op_type)
    } else {
        node.name.clone()
    }
}

fn first_input(node: &NodeProto) -> Vec<String> {
    node.input.iter().take(1).cloned().collect()
}

fn activation(nonlinearity: activation_params::NonlinearityType) -> neural_network_layer::Layer {
    neural_network_layer::Layer::Activation(ActivationParams {
        nonlinearity_type: Some(nonlinearity),
    })
}

#[allow(clippy::cast_sign_loss)]
fn as_u64(values: &[i64]) -> Vec<u64> {
    // Safe: ONNX kernel/stride/dilation attributes are non-negative
    values.iter().map(|&v| v.max(0) as u64).collect()
}

/// Padding shared by convolution and pooling.
///
/// ONNX spells padding as either an `auto_pad` mode or an explicit
/// `[top, left, bottom, right]` list; Core ML wants same-padding or
/// per-edge border amounts.
enum Padding {
    Valid(ValidPadding),
    Same(SamePadding),
}

fn padding(node: &NodeProto) -> Result<Padding> {
    match node.attr_string("auto_pad") {
        Some("SAME_UPPER") => {
            return Ok(Padding::Same(SamePadding {
                asymmetry_mode: same_padding::SamePaddingMode::BottomRightHeavy as i32,
            }))
        }
        Some("SAME_LOWER") => {
            return Ok(Padding::Same(SamePadding {
                asymmetry_mode: same_padding::SamePaddingMode::TopLeftHeavy as i32,
            }))
        }
        Some("NOTSET" | "VALID") | None => {}
        Some(other) => {
            return Err(Error::UnsupportedAttribute {
                op_type: node.op_type.clone(),
                attribute: "auto_pad".to_string(),
                reason: format!("unknown mode {other:?}"),
            })
        }
    }

    let pads = node.attr_ints("pads").unwrap_or(&[]);
    if pads.iter().all(|&p| p == 0) {
        return Ok(Padding::Valid(ValidPadding::default()));
    }

    if pads.len() != 4 {
        return Err(Error::UnsupportedAttribute {
            op_type: node.op_type.clone(),
            attribute: "pads".to_string(),
            reason: format!("expected 4 spatial pads, got {}", pads.len()),
        });
    }

    let pads = as_u64(pads);
    Ok(Padding::Valid(ValidPadding {
        padding_amounts: Some(BorderAmounts {
            border_amounts: vec![
                EdgeSizes {
                    start_edge_size: pads[0],
                    end_edge_size: pads[2],
                },
                EdgeSizes {
                    start_edge_size: pads[1],
                    end_edge_size: pads[3],
                },
            ],
        }),
    }))
}

/// Name of the weight operand of a node, for operators whose second input
/// must be a graph initializer.
fn weights_input(node: &NodeProto) -> Result<&str> {
    node.input
        .get(1)
        .map(String::as_str)
        .ok_or_else(|| Error::UnsupportedAttribute {
            op_type: node.op_type.clone(),
            attribute: "input".to_string(),
            reason: "weight operand is missing".to_string(),
        })
}

#[allow(clippy::cast_sign_loss)]
fn convolution(node: &NodeProto, ctx: &GraphContext<'_>) -> Result<neural_network_layer::Layer> {
    let weights = ctx.tensor(weights_input(node)?)?;

    // Weight layout is [M, C/group, kH, kW]
    if weights.dims.len() != 4 {
        return Err(Error::UnsupportedAttribute {
            op_type: node.op_type.clone(),
            attribute: "W".to_string(),
            reason: format!("expected 4-D kernel, got {}-D", weights.dims.len()),
        });
    }

    let n_groups = node.attr_int("group").unwrap_or(1).max(1) as u64;
    let output_channels = weights.dims[0].max(0) as u64;
    let kernel_channels = weights.dims[1].max(0) as u64;

    let kernel_size = node
        .attr_ints("kernel_shape")
        .map_or_else(|| as_u64(&weights.dims[2..]), as_u64);
    let stride = node.attr_ints("strides").map_or(vec![1, 1], as_u64);
    let dilation_factor = node.attr_ints("dilations").map_or(vec![1, 1], as_u64);

    let padding_type = match padding(node)? {
        Padding::Valid(valid) => convolution_layer_params::ConvolutionPaddingType::Valid(valid),
        Padding::Same(same) => convolution_layer_params::ConvolutionPaddingType::Same(same),
    };

    let bias = node
        .input
        .get(2)
        .map(|name| ctx.tensor(name).and_then(weight_params))
        .transpose()?;

    Ok(neural_network_layer::Layer::Convolution(
        ConvolutionLayerParams {
            output_channels,
            kernel_channels,
            n_groups,
            kernel_size,
            stride,
            dilation_factor,
            convolution_padding_type: Some(padding_type),
            is_deconvolution: false,
            has_bias: bias.is_some(),
            weights: Some(weight_params(weights)?),
            bias,
        },
    ))
}

#[allow(clippy::cast_sign_loss)]
fn batchnorm(node: &NodeProto, ctx: &GraphContext<'_>) -> Result<neural_network_layer::Layer> {
    // Inputs are [X, scale, B, mean, var]
    if node.input.len() < 5 {
        return Err(Error::UnsupportedAttribute {
            op_type: node.op_type.clone(),
            attribute: "input".to_string(),
            reason: "scale, bias, mean, and variance must all be initializers".to_string(),
        });
    }

    let gamma = ctx.tensor(&node.input[1])?;
    let beta = ctx.tensor(&node.input[2])?;
    let mean = ctx.tensor(&node.input[3])?;
    let variance = ctx.tensor(&node.input[4])?;

    Ok(neural_network_layer::Layer::Batchnorm(
        BatchnormLayerParams {
            channels: gamma.dims.first().copied().unwrap_or(0).max(0) as u64,
            compute_mean_var: false,
            instance_normalization: false,
            epsilon: node.attr_float("epsilon").unwrap_or(1e-5),
            gamma: Some(weight_params(gamma)?),
            beta: Some(weight_params(beta)?),
            mean: Some(weight_params(mean)?),
            variance: Some(weight_params(variance)?),
        },
    ))
}

fn pooling(
    node: &NodeProto,
    pooling_type: pooling_layer_params::PoolingType,
    global: bool,
) -> Result<neural_network_layer::Layer> {
    if node.attr_int("ceil_mode").unwrap_or(0) != 0 {
        return Err(Error::UnsupportedAttribute {
            op_type: node.op_type.clone(),
            attribute: "ceil_mode".to_string(),
            reason: "ceil-mode output sizing is not supported".to_string(),
        });
    }

    let padding_type = match padding(node)? {
        Padding::Valid(valid) => pooling_layer_params::PoolingPaddingType::Valid(valid),
        Padding::Same(same) => pooling_layer_params::PoolingPaddingType::Same(same),
    };

    Ok(neural_network_layer::Layer::Pooling(PoolingLayerParams {
        r#type: pooling_type as i32,
        kernel_size: node.attr_ints("kernel_shape").map_or_else(Vec::new, as_u64),
        stride: node.attr_ints("strides").map_or(vec![1, 1], as_u64),
        pooling_padding_type: Some(padding_type),
        avg_pool_exclude_padding: node.attr_int("count_include_pad").unwrap_or(0) == 0,
        global_pooling: global,
    }))
}

fn elementwise(
    node: &NodeProto,
    ctx: &GraphContext<'_>,
    layer: neural_network_layer::Layer,
) -> Result<neural_network_layer::Layer> {
    if node.input.iter().any(|name| ctx.is_initializer(name)) {
        return Err(Error::UnsupportedAttribute {
            op_type: node.op_type.clone(),
            attribute: "input".to_string(),
            reason: "constant operands are not supported".to_string(),
        });
    }

    Ok(layer)
}

fn concat(node: &NodeProto) -> Result<neural_network_layer::Layer> {
    // Core ML concatenates along the channel axis
    match node.attr_int("axis") {
        Some(1 | -3) | None => Ok(neural_network_layer::Layer::Concat(ConcatLayerParams {
            sequence_concat: false,
        })),
        Some(axis) => Err(Error::UnsupportedAttribute {
            op_type: node.op_type.clone(),
            attribute: "axis".to_string(),
            reason: format!("only channel-axis concatenation is supported, got {axis}"),
        }),
    }
}

fn reshape(node: &NodeProto, ctx: &GraphContext<'_>) -> Result<neural_network_layer::Layer> {
    // Opset >= 5 carries the shape as a second input; older graphs use an
    // attribute
    let shape = if let Some(name) = node.input.get(1) {
        ctx.tensor(name)?.to_i64()?
    } else if let Some(attr) = node.attr_ints("shape") {
        attr.to_vec()
    } else {
        return Err(Error::UnsupportedAttribute {
            op_type: node.op_type.clone(),
            attribute: "shape".to_string(),
            reason: "dynamic target shapes are not supported".to_string(),
        });
    };

    let target_shape = match shape.as_slice() {
        // Leading batch dimension is implicit in Core ML
        [_, rest @ ..] if rest.len() == 3 => rest.to_vec(),
        [c, h, w] => vec![*c, *h, *w],
        [_, d] => vec![*d, 1, 1],
        other => {
            return Err(Error::UnsupportedAttribute {
                op_type: node.op_type.clone(),
                attribute: "shape".to_string(),
                reason: format!("cannot map target shape {other:?}"),
            })
        }
    };

    Ok(neural_network_layer::Layer::Reshape(ReshapeLayerParams {
        target_shape,
        mode: reshape_layer_params::ReshapeOrder::ChannelFirst as i32,
    }))
}

fn flatten(node: &NodeProto) -> Result<neural_network_layer::Layer> {
    match node.attr_int("axis") {
        Some(1) | None => Ok(neural_network_layer::Layer::Flatten(FlattenLayerParams {
            mode: flatten_layer_params::FlattenOrder::ChannelFirst as i32,
        })),
        Some(axis) => Err(Error::UnsupportedAttribute {
            op_type: node.op_type.clone(),
            attribute: "axis".to_string(),
            reason: format!("only axis 1 flattening is supported, got {axis}"),
        }),
    }
}

#[allow(clippy::float_cmp)]
fn gemm(node: &NodeProto, ctx: &GraphContext<'_>) -> Result<neural_network_layer::Layer> {
    for (attr, default) in [("alpha", 1.0), ("beta", 1.0)] {
        let value = node.attr_float(attr).unwrap_or(default);
        if value != default {
            return Err(Error::UnsupportedAttribute {
                op_type: node.op_type.clone(),
                attribute: attr.to_string(),
                reason: format!("only unit scaling is supported, got {value}"),
            });
        }
    }

    if node.attr_int("transA").unwrap_or(0) != 0 {
        return Err(Error::UnsupportedAttribute {
            op_type: node.op_type.clone(),
            attribute: "transA".to_string(),
            reason: "transposed activations are not supported".to_string(),
        });
    }

    let weights = ctx.tensor(weights_input(node)?)?;
    if weights.dims.len() != 2 {
        return Err(Error::UnsupportedAttribute {
            op_type: node.op_type.clone(),
            attribute: "B".to_string(),
            reason: format!("expected 2-D weights, got {}-D", weights.dims.len()),
        });
    }

    let trans_b = node.attr_int("transB").unwrap_or(0) != 0;

    let (weights, input_channels, output_channels) = if trans_b {
        // Already [N, K], Core ML's native layout
        (weight_params(weights)?, weights.dims[1], weights.dims[0])
    } else {
        let (data, k, n) = transpose_weights(weights, &node.op_type)?;
        (WeightParams { float_value: data }, k, n)
    };

    let bias = node
        .input
        .get(2)
        .map(|name| ctx.tensor(name).and_then(weight_params))
        .transpose()?;

    Ok(inner_product(input_channels, output_channels, weights, bias))
}

fn matmul(node: &NodeProto, ctx: &GraphContext<'_>) -> Result<neural_network_layer::Layer> {
    let name = weights_input(node)?;
    if !ctx.is_initializer(name) {
        return Err(Error::UnsupportedAttribute {
            op_type: node.op_type.clone(),
            attribute: "B".to_string(),
            reason: "dynamic right-hand operands are not supported".to_string(),
        });
    }

    let (data, k, n) = transpose_weights(ctx.tensor(name)?, &node.op_type)?;

    Ok(inner_product(k, n, WeightParams { float_value: data }, None))
}

#[allow(clippy::cast_sign_loss)]
fn inner_product(
    input_channels: i64,
    output_channels: i64,
    weights: WeightParams,
    bias: Option<WeightParams>,
) -> neural_network_layer::Layer {
    neural_network_layer::Layer::InnerProduct(InnerProductLayerParams {
        input_channels: input_channels.max(0) as u64,
        output_channels: output_channels.max(0) as u64,
        has_bias: bias.is_some(),
        weights: Some(weights),
        bias,
    })
}

/// Transpose a `[K, N]` ONNX weight matrix into Core ML's `[N, K]` layout.
///
/// Returns the transposed data plus the `(K, N)` dimensions.
#[allow(clippy::cast_sign_loss)]
fn transpose_weights(tensor: &TensorProto, op_type: &str) -> Result<(Vec<f32>, i64, i64)> {
    if tensor.dims.len() != 2 {
        return Err(Error::UnsupportedAttribute {
            op_type: op_type.to_string(),
            attribute: "B".to_string(),
            reason: format!("expected 2-D weights, got {}-D", tensor.dims.len()),
        });
    }

    let (k, n) = (tensor.dims[0], tensor.dims[1]);
    let data = tensor.to_f32()?;

    let matrix = Array2::from_shape_vec((k.max(0) as usize, n.max(0) as usize), data).map_err(
        |_| Error::UnsupportedAttribute {
            op_type: op_type.to_string(),
            attribute: "B".to_string(),
            reason: "weight element count does not match declared shape".to_string(),
        },
    )?;

    Ok((matrix.t().iter().copied().collect(), k, n))
}

fn weight_params(tensor: &TensorProto) -> Result<WeightParams> {
    Ok(WeightParams {
        float_value: tensor.to_f32()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::onnx::{tensor_proto, AttributeProto};

    fn float_tensor(name: &str, dims: Vec<i64>, data: Vec<f32>) -> TensorProto {
        TensorProto {
            name: name.to_string(),
            dims,
            data_type: tensor_proto::DataType::Float as i32,
            float_data: data,
            ..Default::default()
        }
    }

    fn int_attr(name: &str, value: i64) -> AttributeProto {
        AttributeProto {
            name: name.to_string(),
            i: value,
            ..Default::default()
        }
    }

    fn ints_attr(name: &str, values: Vec<i64>) -> AttributeProto {
        AttributeProto {
            name: name.to_string(),
            ints: values,
            ..Default::default()
        }
    }

    fn node(op_type: &str, input: &[&str], output: &[&str]) -> NodeProto {
        NodeProto {
            op_type: op_type.to_string(),
            input: input.iter().map(ToString::to_string).collect(),
            output: output.iter().map(ToString::to_string).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_conv_mapping() {
        let weights = [float_tensor("w", vec![8, 3, 3, 3], vec![0.5; 8 * 3 * 3 * 3])];
        let ctx = GraphContext::new(&weights);

        let mut conv = node("Conv", &["x", "w"], &["y"]);
        conv.attribute = vec![
            ints_attr("kernel_shape", vec![3, 3]),
            ints_attr("strides", vec![2, 2]),
            ints_attr("pads", vec![1, 1, 1, 1]),
        ];

        let layer = map_node(&conv, &ctx).expect("conv maps");
        assert_eq!(layer.input, vec!["x"]);
        assert_eq!(layer.output, vec!["y"]);

        let Some(neural_network_layer::Layer::Convolution(params)) = layer.layer else {
            panic!("expected convolution layer");
        };
        assert_eq!(params.output_channels, 8);
        assert_eq!(params.kernel_channels, 3);
        assert_eq!(params.stride, vec![2, 2]);
        assert!(!params.has_bias);

        let Some(convolution_layer_params::ConvolutionPaddingType::Valid(valid)) =
            params.convolution_padding_type
        else {
            panic!("expected explicit padding");
        };
        let edges = valid.padding_amounts.expect("padding amounts").border_amounts;
        assert_eq!(edges[0].start_edge_size, 1);
        assert_eq!(edges[1].end_edge_size, 1);
    }

    #[test]
    fn test_leaky_relu_alpha() {
        let ctx = GraphContext::new(&[]);
        let mut leaky = node("LeakyRelu", &["x"], &["y"]);
        leaky.attribute = vec![AttributeProto {
            name: "alpha".to_string(),
            f: 0.2,
            ..Default::default()
        }];

        let layer = map_node(&leaky, &ctx).expect("leaky relu maps");
        let Some(neural_network_layer::Layer::Activation(params)) = layer.layer else {
            panic!("expected activation layer");
        };
        let Some(activation_params::NonlinearityType::LeakyReLu(leaky)) =
            params.nonlinearity_type
        else {
            panic!("expected leaky relu");
        };
        assert!((leaky.alpha - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_gemm_transposes_untransposed_weights() {
        // B is [K=2, N=3]; Core ML wants [N, K]
        let weights = [float_tensor("w", vec![2, 3], vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0])];
        let ctx = GraphContext::new(&weights);

        let gemm = node("Gemm", &["x", "w"], &["y"]);
        let layer = map_node(&gemm, &ctx).expect("gemm maps");

        let Some(neural_network_layer::Layer::InnerProduct(params)) = layer.layer else {
            panic!("expected inner product layer");
        };
        assert_eq!(params.input_channels, 2);
        assert_eq!(params.output_channels, 3);
        assert_eq!(
            params.weights.expect("weights").float_value,
            vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0]
        );
    }

    #[test]
    fn test_gemm_rejects_scaled_product() {
        let weights = [float_tensor("w", vec![2, 3], vec![0.0; 6])];
        let ctx = GraphContext::new(&weights);

        let mut gemm = node("Gemm", &["x", "w"], &["y"]);
        gemm.attribute = vec![AttributeProto {
            name: "alpha".to_string(),
            f: 0.5,
            ..Default::default()
        }];

        let err = map_node(&gemm, &ctx).expect_err("non-unit alpha");
        assert!(matches!(err, Error::UnsupportedAttribute { .. }));
    }

    #[test]
    fn test_unsupported_operator() {
        let ctx = GraphContext::new(&[]);
        let lstm = node("LSTM", &["x"], &["y"]);

        let err = map_node(&lstm, &ctx).expect_err("LSTM is unsupported");
        assert!(matches!(
            err,
            Error::UnsupportedOperator { ref op_type, .. } if op_type == "LSTM"
        ));
    }

    #[test]
    fn test_concat_rejects_spatial_axis() {
        let ctx = GraphContext::new(&[]);
        let mut cat = node("Concat", &["a", "b"], &["y"]);
        cat.attribute = vec![int_attr("axis", 2)];

        assert!(map_node(&cat, &ctx).is_err());
    }

    #[test]
    fn test_reshape_from_initializer() {
        let shape = TensorProto {
            name: "shape".to_string(),
            dims: vec![4],
            data_type: tensor_proto::DataType::Int64 as i32,
            int64_data: vec![1, 16, 4, 4],
            ..Default::default()
        };
        let initializers = [shape];
        let ctx = GraphContext::new(&initializers);

        let reshape = node("Reshape", &["x", "shape"], &["y"]);
        let layer = map_node(&reshape, &ctx).expect("reshape maps");

        assert_eq!(layer.input, vec!["x"]);
        let Some(neural_network_layer::Layer::Reshape(params)) = layer.layer else {
            panic!("expected reshape layer");
        };
        assert_eq!(params.target_shape, vec![16, 4, 4]);
    }

    #[test]
    fn test_add_rejects_constant_operand() {
        let constants = [float_tensor("c", vec![1], vec![1.0])];
        let ctx = GraphContext::new(&constants);

        let add = node("Add", &["x", "c"], &["y"]);
        assert!(map_node(&add, &ctx).is_err());
    }

    #[test]
    fn test_missing_weights_is_an_error() {
        let ctx = GraphContext::new(&[]);
        let conv = node("Conv", &["x", "w"], &["y"]);

        let err = map_node(&conv, &ctx).expect_err("missing initializer");
        assert!(matches!(err, Error::MissingTensor { ref name } if name == "w"));
    }

    #[test]
    fn test_dropout_becomes_identity() {
        let ctx = GraphContext::new(&[]);
        let dropout = node("Dropout", &["x"], &["y", "mask"]);

        let layer = map_node(&dropout, &ctx).expect("dropout maps");
        assert_eq!(layer.output, vec!["y"]);

        let Some(neural_network_layer::Layer::Activation(params)) = layer.layer else {
            panic!("expected activation layer");
        };
        assert!(matches!(
            params.nonlinearity_type,
            Some(activation_params::NonlinearityType::Linear(ActivationLinear {
                alpha,
                ..
            })) if (alpha - 1.0).abs() < f32::EPSILON
        ));
    }
}
