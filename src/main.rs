use std::io::{self, BufRead};
use std::path::PathBuf;

use eyre::{Result, bail};
use log::{debug, info};

use ytsum::config::{self, Config, Credentials};
use ytsum::metadata::{self, RapidApiMetadata};
use ytsum::output;
use ytsum::pipeline::Pipeline;
use ytsum::summarize::{self, GeminiClient, Summarizer};
use ytsum::youtube::CaptionFetcher;

mod cli;

use cli::{Cli, OutputFormat};

fn setup_logging() -> Result<()> {
    let log_dir = log_dir();
    std::fs::create_dir_all(&log_dir)?;
    let log_file = log_dir.join("ytsum.log");

    let target = Box::new(std::fs::OpenOptions::new().create(true).append(true).open(&log_file)?);

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized: {}", log_file.display());
    Ok(())
}

fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ytsum")
        .join("logs")
}

fn env_line(name: &str) -> String {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => format!("  \x1b[32m✅\x1b[0m {name}"),
        _ => format!("  \x1b[31m❌\x1b[0m {name} (not set)"),
    }
}

fn build_after_help() -> String {
    format!(
        "\nREQUIRED ENVIRONMENT:\n{}\n{}\n\nConfig is read from: {}\nLogs are written to: {}",
        env_line(config::GENAI_API_KEY_VAR),
        env_line(config::RAPIDAPI_KEY_VAR),
        config::config_path().display(),
        log_dir().join("ytsum.log").display()
    )
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging()?;

    let after_help = build_after_help();
    let cmd = <Cli as clap::CommandFactory>::command().after_help(after_help);
    let matches = cmd.get_matches();
    let cli = <Cli as clap::FromArgMatches>::from_arg_matches(&matches)?;

    // Load config file (non-fatal if missing/invalid)
    let config = Config::load().unwrap_or_else(|e| {
        debug!("Ignoring config file: {e}");
        Config::default()
    });

    // CLI flags take priority over config, then built-in defaults
    let lang = cli.lang.clone().or(config.default_lang).unwrap_or_else(|| "en".to_string());
    let model = cli
        .model
        .clone()
        .or(config.default_model)
        .unwrap_or_else(|| summarize::DEFAULT_MODEL.to_string());
    let format = cli
        .format
        .or_else(|| config.default_format.as_deref().and_then(OutputFormat::from_config))
        .unwrap_or(OutputFormat::Text);
    let prompt = config.prompt.unwrap_or_else(|| summarize::DEFAULT_PROMPT.to_string());
    let metadata_host = config
        .metadata_host
        .unwrap_or_else(|| metadata::DEFAULT_HOST.to_string());

    if cli.verbose {
        let config_path = config::config_path();
        if config_path.exists() {
            eprintln!("Config: {}", config_path.display());
        }
    }

    let credentials = Credentials::from_env()?;
    debug!("Using lang={lang} model={model} metadata_host={metadata_host}");

    let client = reqwest::Client::new();
    let transcripts = CaptionFetcher::new(client.clone(), lang);
    let metadata = RapidApiMetadata::new(client.clone(), credentials.rapidapi_key, metadata_host);
    let gemini = GeminiClient::new(client, credentials.genai_api_key, model);
    let pipeline = Pipeline::new(&transcripts, &metadata, Summarizer::new(&gemini, prompt));

    // Collect URLs: from arg or stdin
    let urls = if let Some(ref url) = cli.url {
        vec![url.clone()]
    } else {
        let stdin = io::stdin();
        stdin.lock().lines().collect::<Result<Vec<_>, _>>()?
    };

    if urls.iter().all(|u| u.trim().is_empty()) {
        bail!("no URL provided\n\nUsage: ytsum <URL>\n       echo <URL> | ytsum");
    }

    let outcomes = pipeline.run_all(&urls).await;
    let total = outcomes.len();
    let mut failed = 0;
    let mut rendered_all = Vec::new();

    for outcome in outcomes {
        let report = match outcome {
            Ok(report) => report,
            Err(e) => {
                eprintln!("error: {e:#}");
                failed += 1;
                continue;
            }
        };

        for notice in &report.notices {
            eprintln!("{}", output::render_notice(notice));
        }

        if cli.verbose {
            eprintln!(
                "Video: {}\nSource: {}\nStage: {}",
                report.video_id.as_deref().unwrap_or("-"),
                report.source.map(|s| s.to_string()).unwrap_or_else(|| "-".to_string()),
                report.stage,
            );
        }

        let rendered = match format {
            OutputFormat::Text => output::render_text(&report),
            OutputFormat::Json => output::render_json(&report)?,
        };
        if rendered.is_empty() {
            continue;
        }

        if cli.output.is_some() {
            rendered_all.push(rendered);
        } else {
            println!("{rendered}");
        }
    }

    if let Some(ref path) = cli.output {
        std::fs::write(path, rendered_all.join("\n\n"))?;
        if cli.verbose {
            eprintln!("Output written to: {}", path.display());
        }
    }

    if failed > 0 {
        bail!("{failed} of {total} link(s) could not be summarized");
    }

    Ok(())
}
