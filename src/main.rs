// src/main.rs
use std::path::{Path, PathBuf};

use clap::Parser;
use explanation_segmenter::bank::{load_input, InputDocument, QuestionFeedback, QuestionRecord};
use explanation_segmenter::storage::{RunSummary, StorageManager};
use explanation_segmenter::utils::{self, AppError};
use explanation_segmenter::{build_question_feedback, ExplanationSegmenter, OptionKey, SegmenterConfig};

/// Extracts per-option explanations from annotated question explanation text
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Question bank (.json) or plain annotated explanation text file
    #[arg(short, long)]
    input: PathBuf,

    /// Option keys to print, comma separated (default: A-E)
    #[arg(short, long, value_delimiter = ',')]
    keys: Vec<String>,

    /// Output directory for reports
    #[arg(short, long, default_value = "./output")]
    output_dir: String,

    /// Debug mode - save annotated HTML files with detected markers
    #[arg(short, long)]
    debug: bool,

    /// Minimum body length in characters; shorter bodies count as missing
    /// (overrides SEGMENTER_MIN_BODY_CHARS)
    #[arg(long)]
    min_body_chars: Option<usize>,

    /// Print results only, do not write report files
    #[arg(long)]
    no_save: bool,
}

fn main() -> Result<(), AppError> {
    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging();

    // 2. Parse CLI Arguments
    let args = Args::parse();
    tracing::info!("Starting processing for args: {:?}", args);

    // 3. Resolve configuration: environment first, CLI flag wins
    let config = SegmenterConfig::from_env()?.with_min_body_chars(args.min_body_chars);
    let keys = parse_keys(&args.keys)?;
    let segmenter = ExplanationSegmenter::with_config(config);

    let stem = args
        .input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("input")
        .to_string();
    let storage = if args.no_save { None } else { Some(StorageManager::new(&args.output_dir)?) };

    // 4. Load and process the input
    match load_input(&args.input)? {
        InputDocument::Bank(questions) => {
            process_bank(&segmenter, &questions, &keys, &args, &stem, storage.as_ref())
        }
        InputDocument::Text(text) => {
            process_text(&segmenter, &text, &keys, &args, &stem, storage.as_ref())
        }
    }
}

fn parse_keys(raw: &[String]) -> Result<Vec<OptionKey>, AppError> {
    if raw.is_empty() {
        return Ok(OptionKey::ALL.to_vec());
    }
    raw.iter()
        .map(|k| OptionKey::parse(k).ok_or_else(|| AppError::Config(format!("Invalid option key '{}', expected A-E", k))))
        .collect()
}

fn process_bank(
    segmenter: &ExplanationSegmenter,
    questions: &[QuestionRecord],
    keys: &[OptionKey],
    args: &Args,
    stem: &str,
    storage: Option<&StorageManager>,
) -> Result<(), AppError> {
    let mut feedback: Vec<QuestionFeedback> = Vec::with_capacity(questions.len());

    for question in questions {
        let question_feedback = build_question_feedback(segmenter, question);

        for option in question_feedback.options.iter().filter(|o| keys.contains(&o.key)) {
            println!(
                "[{}] {} ({}): {}",
                question_feedback.question_id,
                option.key,
                if option.is_correct { "correct" } else { "incorrect" },
                option.explanation.as_deref().unwrap_or("(no explanation)")
            );
        }

        if args.debug {
            if let Some(text) = question.incorrect_explanation.as_deref() {
                let name = format!("{}_annotated.html", sanitize_file_name(&question.id));
                write_debug_html(segmenter, text, &args.output_dir, stem, &name);
            }
        }

        feedback.push(question_feedback);
    }

    let summary = RunSummary {
        source: args.input.display().to_string(),
        questions: feedback.len(),
        incorrect_options: feedback.iter().map(|f| f.incorrect).sum(),
        explained_options: feedback.iter().map(|f| f.explained).sum(),
        segments: 0,
    };
    tracing::info!(
        "Processing finished. Questions: {}, explained {}/{} incorrect options",
        summary.questions,
        summary.explained_options,
        summary.incorrect_options
    );

    if let Some(storage) = storage {
        storage.save_feedback(stem, &feedback)?;
        storage.save_run_metadata(stem, &summary)?;
    }

    Ok(())
}

fn process_text(
    segmenter: &ExplanationSegmenter,
    text: &str,
    keys: &[OptionKey],
    args: &Args,
    stem: &str,
    storage: Option<&StorageManager>,
) -> Result<(), AppError> {
    let index = segmenter.index(text);

    if args.debug {
        write_debug_html(segmenter, text, &args.output_dir, stem, "annotated.html");
    }

    if index.is_empty() {
        return Err(AppError::Processing(format!(
            "No option markers found in {}",
            args.input.display()
        )));
    }

    for key in keys {
        println!("{}: {}", key, index.explanation(*key).unwrap_or("(no explanation)"));
    }

    let summary = RunSummary {
        source: args.input.display().to_string(),
        segments: index.segments().len(),
        explained_options: index.keys().len(),
        ..RunSummary::default()
    };
    tracing::info!("Processing finished. Segments: {}, keys with explanation: {}", summary.segments, summary.explained_options);

    if let Some(storage) = storage {
        storage.save_segments(stem, index.segments())?;
        storage.save_run_metadata(stem, &summary)?;
    }

    Ok(())
}

// Debug output failures are logged, never fatal.
fn write_debug_html(segmenter: &ExplanationSegmenter, text: &str, output_dir: &str, stem: &str, name: &str) {
    let debug_dir = Path::new(output_dir).join(stem).join("debug");
    if let Err(e) = std::fs::create_dir_all(&debug_dir) {
        tracing::warn!("Failed to create debug directory {}: {}", debug_dir.display(), e);
        return;
    }
    let path = debug_dir.join(name);
    if let Err(e) = utils::html_debug::create_debug_html(text, &path, &segmenter.segments(text)) {
        tracing::warn!("Failed to create debug HTML: {}", e);
    }
}

fn sanitize_file_name(raw: &str) -> String {
    raw.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}
