//! `onnx2coreml` CLI - Convert ONNX face-detection models to Core ML.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use onnx2coreml::{convert, coreml, onnx, ConversionOptions, DeploymentTarget, Error, ModelTask};

/// Convert an ONNX model into a Core ML `.mlmodel` package.
///
/// The converted model is written as `face_detector.mlmodel` in the current
/// working directory, replacing any existing file of that name.
#[derive(Parser, Debug)]
#[command(name = "onnx2coreml")]
#[command(version, about, long_about = None)]
struct Args {
    /// The path of the ONNX model to be converted.
    #[arg(value_name = "ONNX_MODEL_PATH")]
    onnx_model_path: PathBuf,

    /// Graph input to expose as an image feature. Repeat for multiple inputs.
    #[arg(long, default_value = "input", value_name = "NAME")]
    image_input: Vec<String>,

    /// How the converter should treat the graph's outputs.
    #[arg(long, default_value = "regression", value_name = "TASK")]
    task: ModelTask,

    /// Minimum iOS deployment target for the emitted operator set.
    #[arg(long, default_value = "13", value_name = "VERSION")]
    deployment_target: DeploymentTarget,

    /// Skip baking pixel normalization into the converted model.
    #[arg(long)]
    no_preprocess: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize logging on stderr; stdout carries only the result lines
    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("onnx2coreml={log_level}").into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        // The missing-input sentence goes to stdout, as in the original tool
        Err(err @ Error::MissingInput { .. }) => {
            println!("{err}");
            ExitCode::FAILURE
        }
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> onnx2coreml::Result<()> {
    if !args.onnx_model_path.exists() {
        return Err(Error::MissingInput {
            path: args.onnx_model_path.clone(),
        });
    }

    let options = ConversionOptions {
        task: args.task,
        image_inputs: args.image_input.clone(),
        deployment_target: args.deployment_target,
        preprocessing: (!args.no_preprocess).then_some(onnx2coreml::Preprocessing::default()),
    };

    let model = onnx::load_model(&args.onnx_model_path)?;
    let mlmodel = convert(&model, &options)?;
    coreml::save_model(&mlmodel, coreml::OUTPUT_FILENAME)?;

    println!(
        "Converted {} -> {}",
        args.onnx_model_path.display(),
        coreml::OUTPUT_FILENAME
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_missing_input() {
        let args = Args::parse_from(["onnx2coreml", "/tmp/does_not_exist.onnx"]);

        let err = run(&args).expect_err("missing input");
        assert_eq!(
            err.to_string(),
            "Model file </tmp/does_not_exist.onnx> does not exists."
        );
    }

    #[test]
    fn test_default_args_match_face_detector_conversion() {
        let args = Args::parse_from(["onnx2coreml", "model.onnx"]);

        assert_eq!(args.image_input, vec!["input"]);
        assert_eq!(args.task, ModelTask::Regression);
        assert_eq!(args.deployment_target, DeploymentTarget::Ios13);
        assert!(!args.no_preprocess);
    }

    #[test]
    fn test_variant_with_plain_image_input() {
        let args = Args::parse_from([
            "onnx2coreml",
            "model.onnx",
            "--image-input",
            "image",
            "--no-preprocess",
        ]);

        assert_eq!(args.image_input, vec!["image"]);
        assert!(args.no_preprocess);
    }
}
