use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

use anyhow::{Result, bail};
use clap::{Args, Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use reelsight_core::{
    AnalysisReport, AnalysisStage, AnalysisStatus, Credential, GeminiClient, Importance,
    ProviderConfig, ReelsightError, Session, format_analysis_with, format_timestamp,
    get_report_path, get_reports_dir, load_report, save_report,
};
use tokio::fs;
use tracing::debug;

mod logging;
mod player;
mod upload;

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        format!("{:.0}m {:.0}s", (secs / 60.0).floor(), secs % 60.0)
    }
}

fn format_size(bytes: u64) -> String {
    format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
}

#[derive(Parser)]
#[command(name = "reelsight")]
#[command(about = "Analyze videos with Google Gemini and browse the AI-generated reports")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate the API key and list the models it can use for video analysis
    Models {
        /// Gemini API key. Falls back to GEMINI_API_KEY.
        #[arg(long)]
        api_key: Option<String>,
    },
    /// Analyze a video file
    Analyze(AnalyzeArgs),
    /// Render a saved report, optionally seeking a player to one of its key moments
    Show(ShowArgs),
}

#[derive(Args)]
struct AnalyzeArgs {
    /// Video file (max 100MB)
    video: PathBuf,

    /// Gemini API key. Falls back to GEMINI_API_KEY.
    #[arg(long)]
    api_key: Option<String>,

    /// Model to use (e.g. "gemini-1.5-pro"). Defaults to the first available model.
    #[arg(short, long)]
    model: Option<String>,

    /// Custom instructions instead of the default analysis prompt
    #[arg(short, long, conflicts_with = "prompt_file")]
    prompt: Option<String>,

    /// Read custom instructions from a file
    #[arg(long)]
    prompt_file: Option<PathBuf>,

    /// Media type of the video. Guessed from the extension when omitted.
    #[arg(long)]
    mime_type: Option<String>,

    /// Where to save the report JSON
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the report (model, video, status, analysis) as JSON instead of the readable report
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ShowArgs {
    /// Report JSON written by `reelsight analyze`
    report: PathBuf,

    /// Key moment to seek to (1-based, as numbered in the report)
    #[arg(long)]
    play: Option<usize>,

    /// Video to play. Defaults to the path recorded in the report.
    #[arg(long)]
    video: Option<PathBuf>,

    /// Player executable
    #[arg(long, default_value = "mpv")]
    player: String,
}

fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

fn fail(message: &str) -> ! {
    eprintln!("{} {}", style("Error:").red().bold(), message);
    std::process::exit(1);
}

fn importance_label(importance: Importance) -> String {
    let label = importance.as_str().to_uppercase();
    match importance {
        Importance::High => style(label).red().bold().to_string(),
        Importance::Medium => style(label).yellow().to_string(),
        Importance::Low => style(label).blue().to_string(),
    }
}

fn print_banner() {
    println!(
        "\n{}  {}\n",
        style("reelsight").cyan().bold(),
        style("Video Analyzer").dim()
    );
}

fn print_report(report: &AnalysisReport) {
    println!(
        "{} {}  {} {}",
        style("Model:").dim(),
        style(&report.model).yellow(),
        style("Video:").dim(),
        style(&report.video).dim()
    );
    println!("{}", style("─".repeat(60)).dim());
    println!("{}", format_analysis_with(&report.analysis, importance_label));
}

/// The whole report as pretty JSON, the same document `save_report` writes.
fn report_json(report: &AnalysisReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

/// Validate the key and load the catalog, exiting with an inline error when the key is unusable.
async fn connect(api_key: Option<String>) -> Session<GeminiClient> {
    let config = ProviderConfig::from_env();
    let credential = match api_key.and_then(Credential::new) {
        Some(credential) => credential,
        None => match config.credential_from_env() {
            Ok(credential) => credential,
            Err(e) => fail(&e.to_string()),
        },
    };

    let spinner = create_spinner(&format!("Validating {} API key...", config.name()));
    let client = GeminiClient::new(&config);

    match Session::connect(client, config, credential).await {
        Ok(session) => {
            spinner.finish_with_message(format!(
                "{} API key valid: {} models available",
                style("✓").green().bold(),
                session.models().len()
            ));
            session
        }
        Err(ReelsightError::InvalidApiKey) => {
            spinner.finish_and_clear();
            fail("Invalid API key. Please check and try again.")
        }
        Err(e) => {
            spinner.finish_and_clear();
            debug!(error = %e, "catalog fetch failed");
            fail("Error validating API key. Please try again.")
        }
    }
}

async fn run_models(api_key: Option<String>) -> Result<()> {
    print_banner();
    let session = connect(api_key).await;

    if session.models().is_empty() {
        println!("{}", style("No multimodal models available for this key.").yellow());
        return Ok(());
    }

    println!();
    for model in session.models() {
        println!(
            "• {} {}  {}",
            style(&model.display_name).bold(),
            style(format!("({})", model.short_name())).cyan(),
            style(format!(
                "in {} / out {} tokens",
                model.input_token_limit, model.output_token_limit
            ))
            .dim()
        );
        if !model.description.is_empty() {
            println!("  {}", style(&model.description).dim());
        }
    }
    Ok(())
}

async fn run_analyze(args: AnalyzeArgs) -> Result<()> {
    let upload = match upload::inspect_upload(&args.video, args.mime_type.as_deref()).await {
        Ok(upload) => upload,
        Err(e) => fail(&e.to_string()),
    };

    let prompt = match &args.prompt_file {
        Some(path) => Some(fs::read_to_string(path).await?),
        None => args.prompt.clone(),
    };

    if !args.json {
        print_banner();
    }
    let mut session = connect(args.api_key.clone()).await;

    let requested = match args.model.as_deref() {
        Some(name) => name.to_string(),
        None => match session.models().first() {
            Some(model) => model.name.clone(),
            None => bail!("No multimodal models available for this API key"),
        },
    };
    let model_name = match session.select_model(&requested) {
        Ok(model) => model.name.clone(),
        Err(e) => fail(&e.to_string()),
    };

    let total_start = Instant::now();
    let spinner = create_spinner("Preparing...");
    let size = format_size(upload.size);
    let outcome = session
        .analyze(&upload.path, &upload.mime_type, prompt.as_deref(), |stage| {
            let message = match stage {
                AnalysisStage::Encoding => format!("Encoding video ({})...", size),
                AnalysisStage::Requesting => format!(
                    "Analyzing with {}... this may take a few minutes",
                    model_name
                ),
                AnalysisStage::Normalizing => "Reading analysis...".to_string(),
            };
            spinner.set_message(message);
        })
        .await;

    let outcome = match outcome {
        Ok(outcome) => outcome,
        Err(e) if e.is_provider() => {
            spinner.finish_and_clear();
            eprintln!(
                "{} Error analyzing video. Please try again.\n  {}",
                style("Error:").red().bold(),
                style(&e).dim()
            );
            std::process::exit(1);
        }
        Err(e) => {
            spinner.finish_and_clear();
            return Err(e.into());
        }
    };

    let elapsed = style(format!("[{}]", format_duration(total_start.elapsed()))).dim();
    match outcome.status {
        AnalysisStatus::Succeeded => spinner.finish_with_message(format!(
            "{} Analysis complete {}",
            style("✓").green().bold(),
            elapsed
        )),
        AnalysisStatus::Degraded => spinner.finish_with_message(format!(
            "{} Model returned unstructured text; showing it as the summary {}",
            style("!").yellow().bold(),
            elapsed
        )),
    }

    let report = AnalysisReport::new(&model_name, &upload.path, outcome.status, outcome.analysis);
    let report_path = args
        .output
        .clone()
        .unwrap_or_else(|| get_report_path(&get_reports_dir(), &upload.path, &model_name));
    save_report(&report, &report_path).await?;

    if args.json {
        println!("{}", report_json(&report)?);
        return Ok(());
    }

    println!(
        "\n{} {}\n",
        style("Saved:").dim(),
        style(report_path.display()).cyan()
    );
    print_report(&report);
    Ok(())
}

async fn run_show(args: ShowArgs) -> Result<()> {
    let report = load_report(&args.report).await?;
    print_report(&report);

    let Some(index) = args.play else {
        return Ok(());
    };

    let timestamps = &report.analysis.timestamps;
    let Some(moment) = index.checked_sub(1).and_then(|i| timestamps.get(i)) else {
        bail!(
            "Key moment {} does not exist (report has {})",
            index,
            timestamps.len()
        );
    };

    let video = args
        .video
        .clone()
        .unwrap_or_else(|| PathBuf::from(&report.video));
    let seconds = moment.seconds();
    println!(
        "{} Seeking to [{}] {}",
        style("▶").green().bold(),
        format_timestamp(seconds),
        moment.description
    );
    player::seek(&args.player, &video, seconds).await
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    logging::init()?;

    let cli = Cli::parse();
    match cli.command {
        Command::Models { api_key } => run_models(api_key).await,
        Command::Analyze(args) => run_analyze(args).await,
        Command::Show(args) => run_show(args).await,
    }
}
