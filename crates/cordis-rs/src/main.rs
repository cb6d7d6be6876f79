//! Analyze a cardiac patient record and print the diagnostic opinion.
//!
//! Reads the API key from the `OPENROUTER_KEY` environment variable.
//!
//! # Examples
//!
//! ```sh
//! # Analyze a record from a file
//! cordis --input patient.json
//!
//! # Pipe a record from stdin, respond in Russian
//! cat patient.json | cordis --stdin --language Russian
//!
//! # Audit what would be sent to the engine, without calling it
//! cordis --input patient.json --compile-only
//!
//! # Print the clinical input JSON Schema
//! cordis --schema
//!
//! # Machine-readable output with a specific model and deadline
//! cordis --input patient.json --json --model google/gemini-2.5-flash --timeout-secs 30
//! ```

use std::io::{self, Read};
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::Parser;
use cordis_rs::prelude::*;

/// Analyze a cardiac patient record and print the diagnostic opinion.
///
/// Reads the API key from the OPENROUTER_KEY environment variable.
#[derive(Parser)]
#[command(name = "cordis")]
struct Cli {
    // ── Input ──────────────────────────────────────────────────
    /// Path to a clinical input JSON file
    #[arg(long)]
    input: Option<PathBuf>,

    /// Read the clinical input JSON from stdin
    #[arg(long)]
    stdin: bool,

    /// Override the response language (English or Russian)
    #[arg(long, value_parser = parse_language)]
    language: Option<Language>,

    // ── Engine ─────────────────────────────────────────────────
    /// Model to use
    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,

    /// Maximum tokens in the engine reply
    #[arg(long, default_value_t = 1024)]
    max_tokens: u32,

    /// Sampling temperature
    #[arg(long, default_value_t = 0.2)]
    temperature: f32,

    /// Engine call deadline in seconds
    #[arg(long, default_value_t = 60)]
    timeout_secs: u64,

    // ── Output control ─────────────────────────────────────────
    /// Print the compiled prompt document instead of calling the engine
    #[arg(long)]
    compile_only: bool,

    /// Print the clinical input JSON Schema and exit
    #[arg(long)]
    schema: bool,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

fn parse_language(value: &str) -> Result<Language, String> {
    match value {
        "English" | "english" | "en" => Ok(Language::English),
        "Russian" | "russian" | "ru" => Ok(Language::Russian),
        other => Err(format!("unknown language '{other}' (expected English or Russian)")),
    }
}

fn read_raw_input(cli: &Cli) -> Result<String, String> {
    match (&cli.input, cli.stdin) {
        (Some(path), false) => std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read {}: {e}", path.display())),
        (None, true) => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| format!("failed to read stdin: {e}"))?;
            Ok(buffer)
        }
        (Some(_), true) => Err("--input and --stdin are mutually exclusive".to_string()),
        (None, false) => Err("provide a record via --input FILE or --stdin".to_string()),
    }
}

fn render_report(result: &DiagnosticResult, generated_at: &str) -> String {
    let recommendation = if result.surgical_intervention_needed {
        "recommended"
    } else {
        "not recommended"
    };
    format!(
        "Cardiac diagnostic opinion (generated {generated_at})\n\
         \n\
         Diagnosis:\n{}\n\
         \n\
         Surgical intervention: {recommendation}\n\
         \n\
         Rationale:\n{}",
        result.diagnosis, result.rationale
    )
}

async fn run(cli: &Cli) -> Result<String, String> {
    if cli.schema {
        let schema = json_schema_for::<ClinicalInput>();
        return serde_json::to_string_pretty(&schema)
            .map_err(|e| format!("failed to format schema: {e}"));
    }

    let raw = read_raw_input(cli)?;
    let mut input = parse_str(&raw).map_err(|e| e.to_string())?;
    if let Some(language) = cli.language {
        input.language = language;
    }

    if cli.compile_only {
        validate(&input).map_err(|e| e.to_string())?;
        let document = compile(&input);
        if cli.json {
            let value = serde_json::json!({
                "text": document.text,
                "outputSchema": document.output_schema,
            });
            return serde_json::to_string_pretty(&value)
                .map_err(|e| format!("failed to format document: {e}"));
        }
        return Ok(document.text);
    }

    let api_key = std::env::var("OPENROUTER_KEY")
        .map_err(|_| "OPENROUTER_KEY environment variable is not set".to_string())?;

    let config = EngineConfig::default()
        .with_model(&cli.model)
        .with_max_tokens(cli.max_tokens)
        .with_temperature(cli.temperature)
        .with_timeout(Duration::from_secs(cli.timeout_secs));
    let engine = OpenRouterEngine::new(api_key, config).map_err(|e| e.to_string())?;

    let result = Analyzer::new(engine)
        .analyze(&input)
        .await
        .map_err(|e| e.to_string())?;

    if cli.json {
        serde_json::to_string_pretty(&result).map_err(|e| format!("failed to format result: {e}"))
    } else {
        let generated_at = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string();
        Ok(render_report(&result, &generated_at))
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match run(&cli).await {
        Ok(output) => println!("{output}"),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn cli_with_input(path: Option<PathBuf>, stdin: bool) -> Cli {
        Cli {
            input: path,
            stdin,
            language: None,
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 1024,
            temperature: 0.2,
            timeout_secs: 60,
            compile_only: false,
            schema: false,
            json: false,
        }
    }

    #[test]
    fn read_raw_input_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"language":"Russian"}}"#).unwrap();
        let cli = cli_with_input(Some(file.path().to_path_buf()), false);
        let raw = read_raw_input(&cli).unwrap();
        assert!(raw.contains("Russian"));
    }

    #[test]
    fn input_and_stdin_are_mutually_exclusive() {
        let cli = cli_with_input(Some(PathBuf::from("x.json")), true);
        assert!(read_raw_input(&cli).unwrap_err().contains("mutually exclusive"));
        let cli = cli_with_input(None, false);
        assert!(read_raw_input(&cli).is_err());
    }

    #[test]
    fn language_parser_accepts_common_spellings() {
        assert_eq!(parse_language("English").unwrap(), Language::English);
        assert_eq!(parse_language("ru").unwrap(), Language::Russian);
        assert!(parse_language("French").is_err());
    }

    #[test]
    fn report_states_the_recommendation() {
        let result = DiagnosticResult {
            diagnosis: "Stable angina".to_string(),
            surgical_intervention_needed: false,
            rationale: "Single moderate lesion, preserved EF.".to_string(),
        };
        let report = render_report(&result, "2026-01-01 00:00:00 UTC");
        assert!(report.contains("generated 2026-01-01 00:00:00 UTC"));
        assert!(report.contains("Surgical intervention: not recommended"));
        assert!(report.contains("Stable angina"));
    }
}
