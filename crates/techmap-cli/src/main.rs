//! TechMap — patent title → related technology frequency analysis.

use std::path::PathBuf;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use techmap_extract::{HttpCompletionBackend, KeywordExtractor, LLMConfig};
use techmap_runtime::{export_all, Dataset, Pipeline, RunSummary};

fn resolve_data_dir() -> PathBuf {
    std::env::var("TECHMAP_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data"))
}

fn print_help() {
    println!("TechMap — patent technology analysis");
    println!();
    println!("Usage: techmap <command>");
    println!();
    println!("Commands:");
    println!("  run <input.csv> [output-dir]   Suggest technologies per title and export results");
    println!("  normalize <text>               Print the normalized form of a model response");
    println!("  help                           Show this help message");
    println!();
    println!("Environment:");
    println!("  OPENAI_API_KEY / ANTHROPIC_API_KEY / GROQ_API_KEY   provider credentials");
    println!("  TECHMAP_TITLE_COLUMN   title column (default: 발명명칭)");
    println!("  TECHMAP_TOP_N          treemap entries (default: 25)");
    println!("  TECHMAP_CONCURRENCY    extraction calls in flight (default: 1)");
    println!("  TECHMAP_DATA_DIR       data directory (default: data)");
}

async fn run(input: PathBuf, output: Option<PathBuf>) -> anyhow::Result<()> {
    let data_dir = resolve_data_dir();
    info!("Data directory: {}", data_dir.display());

    let config = techmap_core::TechMapConfig::from_env(&data_dir)?;
    let llm_config = LLMConfig::load(&config.data_paths.llm_config_file);

    // Fail on missing credentials before touching the input.
    let backend = HttpCompletionBackend::from_config(&llm_config)?;
    info!(
        "Using provider {} with model {}",
        backend.provider(),
        backend.model()
    );

    let dataset = Dataset::from_csv_path(&input)?;
    let extractor = KeywordExtractor::new(backend, &llm_config);
    let pipeline = Pipeline::new(extractor, &config);

    let report = pipeline.run(&dataset, &config.title_column).await?;

    for w in report.warnings() {
        warn!("Row {} ('{}'): {}", w.row + 1, w.title, w.warning);
    }

    let out_dir = output.unwrap_or_else(|| config.data_paths.outputs.clone());
    let paths = export_all(&report, &out_dir, &config.title_column, config.top_n)?;

    println!("{}", serde_json::to_string_pretty(&RunSummary::from(&report))?);
    println!("Keywords:   {}", paths.keywords.display());
    println!("Frequency:  {}", paths.frequency.display());
    match &paths.treemap {
        Some(p) => println!("Treemap:    {}", p.display()),
        None => println!("Treemap:    skipped (no technology data)"),
    }
    println!("Report:     {}", paths.report.display());

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();

    match args.get(1).map(String::as_str) {
        Some("run") => {
            let Some(input) = args.get(2) else {
                eprintln!("Usage: techmap run <input.csv> [output-dir]");
                std::process::exit(1);
            };
            let output = args.get(3).map(PathBuf::from);
            if let Err(e) = run(PathBuf::from(input), output).await {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
            Ok(())
        }
        Some("normalize") => {
            if args.len() < 3 {
                eprintln!("Usage: techmap normalize <text>");
                std::process::exit(1);
            }
            println!("{}", techmap_analyze::normalize(&args[2..].join(" ")));
            Ok(())
        }
        Some("--help") | Some("-h") | Some("help") | None => {
            print_help();
            Ok(())
        }
        Some(other) => {
            eprintln!("Unknown command: {}. Use 'techmap help' for usage.", other);
            std::process::exit(1);
        }
    }
}
