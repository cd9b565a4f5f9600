use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use serde::Serialize;
use tabula_core::app::TableLoader;
use tabula_core::domain::{Inputs, Value};
use tabula_core::engine::{DecisionTable, Outputs};
use tabula_core::impls::JsonFileSource;
use tabula_core::ports::TableKey;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

mod config;
mod error;

use config::Config;
use error::CliError;

#[derive(Parser, Debug)]
#[command(name = "tabula")]
#[command(version)]
#[command(about = "Evaluate JSON input cases against a decision table", long_about = None)]
struct Args {
    /// Table key; the document is read from <table-dir>/<key>.json
    #[arg(value_name = "TABLE_KEY")]
    table: String,

    /// JSON file holding one input object or an array of them
    #[arg(value_name = "CASES")]
    cases: PathBuf,

    /// Directory of table documents (overrides `table_dir` from the config file)
    #[arg(value_name = "TABLE_DIR")]
    table_dir: Option<PathBuf>,
}

/// One line of output.
#[derive(Debug, Serialize)]
struct CaseResult {
    case: usize,
    /// 1-based number of the rule that fired.
    rule: Option<usize>,
    outputs: Outputs,
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Accepts either a single object or an array of objects.
async fn read_cases(path: &Path) -> Result<Vec<Inputs>, CliError> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CliError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    let doc: serde_json::Value = serde_json::from_str(&text).map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let raw = match doc {
        serde_json::Value::Array(items) => items,
        other => vec![other],
    };

    raw.iter()
        .enumerate()
        .map(|(case, item)| {
            let object = item.as_object().ok_or(CliError::CaseShape { case })?;
            Value::inputs_from_json(object).map_err(|source| CliError::Input { case, source })
        })
        .collect()
}

fn evaluate_case(table: &DecisionTable, case: usize, inputs: &Inputs) -> CaseResult {
    let (hit, outputs) = table.evaluate_with_match(inputs);
    CaseResult {
        case,
        rule: hit.map(|hit| hit.index + 1),
        outputs,
    }
}

async fn run(config: Config, args: Args) -> Result<(), CliError> {
    let key = TableKey::new(args.table);
    let table_dir = args.table_dir.unwrap_or(config.table_dir);
    let loader = TableLoader::new(JsonFileSource::new(table_dir));
    debug!(dir = %loader.source().root().display(), "table directory");
    let table = loader.load(&key).await?;
    info!(table = %key, rules = table.rules().len(), "table ready");

    let cases = read_cases(&args.cases).await?;
    debug!(cases = cases.len(), "evaluating");

    // 各ケースは同じ Arc<DecisionTable> を共有して並行に評価する
    let handles: Vec<_> = cases
        .into_iter()
        .enumerate()
        .map(|(case, inputs)| {
            let table = Arc::clone(&table);
            tokio::spawn(async move { evaluate_case(&table, case, &inputs) })
        })
        .collect();

    for handle in handles {
        let result = handle.await?;
        let line = if config.pretty {
            serde_json::to_string_pretty(&result)
        } else {
            serde_json::to_string(&result)
        };
        match line {
            Ok(line) => println!("{line}"),
            Err(e) => error!(case = result.case, "could not serialize result: {e}"),
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    init_tracing(&config);

    match run(config, args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
