//! Emoscan CLI - Command-line interface for the emoscan engine
//!
//! Commands:
//! - analyze: Run the analysis pipeline over a capture recording
//! - validate: Validate a capture recording against the schema
//! - schema: Print schema information
//!
//! Diagnostics (skipped frames, run summary) go to stderr via tracing; the
//! primary output on stdout stays machine-readable.

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use emoscan::encoder::{frames_to_json, ReportEncoder};
use emoscan::replay::{analyze_recording, CaptureRecording, CAPTURE_SCHEMA_VERSION};
use emoscan::{AnalysisError, DEFAULT_SAMPLE_INTERVAL_MS, ENGINE_VERSION};

/// Emoscan - frame-sampling affect and attention analysis
#[derive(Parser)]
#[command(name = "emoscan")]
#[command(version = ENGINE_VERSION)]
#[command(about = "Derive affect and attention scores from recorded video captures", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the analysis pipeline over a capture recording
    Analyze {
        /// Capture recording path (use - for stdin)
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Wall-clock sampling interval in milliseconds
        #[arg(long, default_value_t = DEFAULT_SAMPLE_INTERVAL_MS)]
        sample_interval: u64,

        /// Output format
        #[arg(long, default_value = "frames")]
        output_format: OutputFormat,
    },

    /// Validate a capture recording against the schema
    Validate {
        /// Capture recording path (use - for stdin)
        input: PathBuf,

        /// Output the validation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print schema information
    Schema {
        /// Schema to print (input or output)
        #[arg(value_enum)]
        schema_type: SchemaType,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// JSON array of frame records (compatibility format)
    Frames,
    /// Report envelope with producer and provenance metadata
    Report,
    /// Pretty-printed report envelope
    ReportPretty,
}

#[derive(Clone, ValueEnum)]
enum SchemaType {
    /// Input schema (affect.capture.v1)
    Input,
    /// Output frame-record fields
    Output,
}

fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("emoscan=info")),
        )
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), EmoscanCliError> {
    match cli.command {
        Commands::Analyze {
            input,
            output,
            sample_interval,
            output_format,
        } => cmd_analyze(&input, &output, sample_interval, output_format),

        Commands::Validate { input, json } => cmd_validate(&input, json),

        Commands::Schema { schema_type } => cmd_schema(schema_type),
    }
}

fn cmd_analyze(
    input: &Path,
    output: &Path,
    sample_interval: u64,
    output_format: OutputFormat,
) -> Result<(), EmoscanCliError> {
    let input_data = read_input(input)?;
    let recording = CaptureRecording::from_json(&input_data)?;
    let source_label = recording.source_label().to_string();

    let result = analyze_recording(recording, sample_interval)?;

    let output_data = match output_format {
        OutputFormat::Frames => frames_to_json(&result.frames)?,
        OutputFormat::Report => ReportEncoder::new().encode_to_json(&result, &source_label)?,
        OutputFormat::ReportPretty => {
            let report = ReportEncoder::new().encode(&result, &source_label);
            serde_json::to_string_pretty(&report)?
        }
    };

    if output.to_string_lossy() == "-" {
        let mut stdout = io::stdout();
        writeln!(stdout, "{output_data}")?;
        stdout.flush()?;
    } else {
        fs::write(output, output_data)?;
    }

    Ok(())
}

fn cmd_validate(input: &Path, json: bool) -> Result<(), EmoscanCliError> {
    let input_data = read_input(input)?;

    let report = match CaptureRecording::from_json(&input_data) {
        Ok(recording) => ValidationReport {
            valid: true,
            schema_version: Some(recording.schema_version.clone()),
            source: recording.source.clone(),
            fps: Some(recording.fps),
            frame_count: Some(recording.frames.len()),
            frames_with_face: Some(
                recording
                    .frames
                    .iter()
                    .filter(|f| f.landmarks.is_some())
                    .count(),
            ),
            error: None,
        },
        Err(e) => ValidationReport {
            valid: false,
            schema_version: None,
            source: None,
            fps: None,
            frame_count: None,
            frames_with_face: None,
            error: Some(e.to_string()),
        },
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Validation Report");
        println!("=================");
        if report.valid {
            println!("Schema:           {}", report.schema_version.as_deref().unwrap_or("-"));
            println!("Source:           {}", report.source.as_deref().unwrap_or("-"));
            println!("Frame rate:       {} fps", report.fps.unwrap_or(0.0));
            println!("Frames:           {}", report.frame_count.unwrap_or(0));
            println!("Frames with face: {}", report.frames_with_face.unwrap_or(0));
        } else {
            println!("Invalid: {}", report.error.as_deref().unwrap_or("unknown"));
        }
    }

    if report.valid {
        Ok(())
    } else {
        Err(EmoscanCliError::ValidationFailed)
    }
}

fn cmd_schema(schema_type: SchemaType) -> Result<(), EmoscanCliError> {
    match schema_type {
        SchemaType::Input => {
            println!("Input Schema: {}", CAPTURE_SCHEMA_VERSION);
            println!();
            println!("A capture recording describes one decoded video:");
            println!();
            println!("- schema_version: \"{}\"", CAPTURE_SCHEMA_VERSION);
            println!("- source: optional label of the original video");
            println!("- fps: frame rate of the decoded stream (must be > 0)");
            println!("- width, height: frame dimensions in pixels");
            println!("- frames: one entry per decoded frame, in stream order:");
            println!("  - emotions: raw classifier scores 0-100 per class");
            println!("    (happy, sad, angry, surprised, fearful, disgusted, neutral;");
            println!("    missing classes read as 0)");
            println!("  - dominant_emotion: classifier label (missing reads as neutral)");
            println!("  - landmarks: normalized {{x, y, z}} points for one face,");
            println!("    absent when no face was found");
        }
        SchemaType::Output => {
            println!("Output: ordered JSON array of frame records");
            println!();
            println!("Each record carries:");
            println!();
            println!("- timestamp: milliseconds from the start of the video");
            println!("- emotions: {{happy, sad, angry, surprised, fearful, disgusted, neutral}}");
            println!("  integer scores, each clamped to 0-100");
            println!("- dominantEmotion: classifier-supplied label");
            println!("- attentionScore: 0-100 (50 when no face was detected)");
            println!("- eyeContact: true when the nose sits dead-center of the frame");
            println!("- headPose: forward | left | right | up | down");
            println!("- bodyLanguage: {{posture, gestures}} (fixed placeholder)");
            println!("- engagement, confidence, stress: derived scores 0-100");
            println!();
            println!("Frames whose analysis failed are absent from the array.");
        }
    }

    Ok(())
}

// Helper functions

fn read_input(input: &Path) -> Result<String, EmoscanCliError> {
    if input.to_string_lossy() == "-" {
        if atty::is(atty::Stream::Stdin) {
            return Err(EmoscanCliError::StdinIsTty);
        }
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(input)?)
    }
}

// Error types

#[derive(Debug)]
enum EmoscanCliError {
    Io(io::Error),
    Analysis(AnalysisError),
    Json(serde_json::Error),
    StdinIsTty,
    ValidationFailed,
}

impl From<io::Error> for EmoscanCliError {
    fn from(e: io::Error) -> Self {
        EmoscanCliError::Io(e)
    }
}

impl From<AnalysisError> for EmoscanCliError {
    fn from(e: AnalysisError) -> Self {
        EmoscanCliError::Analysis(e)
    }
}

impl From<serde_json::Error> for EmoscanCliError {
    fn from(e: serde_json::Error) -> Self {
        EmoscanCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<EmoscanCliError> for CliError {
    fn from(e: EmoscanCliError) -> Self {
        match e {
            EmoscanCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            EmoscanCliError::Analysis(e) => {
                let code = match &e {
                    AnalysisError::InvalidRecording(_) | AnalysisError::Json(_) => {
                        "INVALID_RECORDING"
                    }
                    AnalysisError::SourceOpen(_) | AnalysisError::SourceRead(_) => "SOURCE_ERROR",
                    _ => "ANALYSIS_ERROR",
                };
                CliError {
                    code: code.to_string(),
                    message: e.to_string(),
                    hint: Some("Run 'emoscan validate' on the capture for details".to_string()),
                }
            }
            EmoscanCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            EmoscanCliError::StdinIsTty => CliError {
                code: "STDIN_TTY".to_string(),
                message: "stdin is a TTY, no capture data to read".to_string(),
                hint: Some("Pipe a capture recording or pass a file path".to_string()),
            },
            EmoscanCliError::ValidationFailed => CliError {
                code: "VALIDATION_FAILED".to_string(),
                message: "Capture recording failed validation".to_string(),
                hint: Some("Fix the reported schema errors and retry".to_string()),
            },
        }
    }
}

// Report types

#[derive(serde::Serialize)]
struct ValidationReport {
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    schema_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fps: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    frame_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    frames_with_face: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}
