use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};

use labscan::config::{self, WhoRanges};
use labscan::report::{advice_views, overview_table};
use labscan::{analyze, batch, extract, AdviceClassifier, CategoryRule};

#[derive(Parser)]
#[command(name = "labscan", about = "Structure model-written lab reports into test records")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract test records as JSON
    Extract {
        /// Report text file ("-" for stdin)
        input: PathBuf,
    },
    /// Extract records and split their advice into sections
    Advice {
        /// Report text file ("-" for stdin)
        input: PathBuf,
        /// JSON category table overriding the built-in one
        #[arg(short, long)]
        categories: Option<PathBuf>,
    },
    /// Results overview table
    Overview {
        /// Report text file ("-" for stdin)
        input: PathBuf,
        /// JSON map of test name to WHO reference range
        #[arg(short, long)]
        who: Option<PathBuf>,
        /// Max rows to display
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
    },
    /// Analyze every .txt report in a directory
    Batch {
        dir: PathBuf,
        #[arg(short, long)]
        categories: Option<PathBuf>,
        #[arg(short, long)]
        who: Option<PathBuf>,
        /// Write the summary here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the active advice category table
    Categories {
        #[arg(short, long)]
        categories: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Extract { input } => {
            let raw = read_input(&input)?;
            let results = extract(&raw);
            println!("{}", serde_json::to_string_pretty(&results)?);
            Ok(())
        }
        Commands::Advice { input, categories } => {
            let classifier = classifier_from(categories.as_deref())?;
            let raw = read_input(&input)?;
            let results = extract(&raw);
            let views = advice_views(&results, &classifier);
            println!("{}", serde_json::to_string_pretty(&views)?);
            Ok(())
        }
        Commands::Overview { input, who, limit } => {
            let who = who_from(who.as_deref())?;
            let raw = read_input(&input)?;
            let report = analyze(&raw, AdviceClassifier::default_table(), &who);
            if report.entries.is_empty() {
                println!("No test results found.");
                return Ok(());
            }
            println!("{}", overview_table(&report, limit));
            Ok(())
        }
        Commands::Batch { dir, categories, who, output } => {
            let classifier = classifier_from(categories.as_deref())?;
            let who = who_from(who.as_deref())?;
            let summary = batch::analyze_dir(&dir, &classifier, &who)?;
            let json = serde_json::to_string_pretty(&summary)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, json)
                        .with_context(|| format!("writing {}", path.display()))?;
                    println!(
                        "Wrote {} records from {} files to {}",
                        summary.records,
                        summary.files,
                        path.display()
                    );
                }
                None => println!("{}", json),
            }
            Ok(())
        }
        Commands::Categories { categories } => {
            let classifier = classifier_from(categories.as_deref())?;
            let rules: Vec<&CategoryRule> = classifier.rules();
            println!("{}", serde_json::to_string_pretty(&rules)?);
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        eprintln!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn read_input(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        let mut raw = String::new();
        std::io::stdin()
            .read_to_string(&mut raw)
            .context("reading report from stdin")?;
        return Ok(raw);
    }
    std::fs::read_to_string(path).with_context(|| format!("reading report {}", path.display()))
}

fn classifier_from(path: Option<&Path>) -> anyhow::Result<AdviceClassifier> {
    match path {
        Some(p) => config::load_classifier(p),
        None => Ok(AdviceClassifier::default_table().clone()),
    }
}

fn who_from(path: Option<&Path>) -> anyhow::Result<WhoRanges> {
    match path {
        Some(p) => WhoRanges::load(p),
        None => Ok(WhoRanges::default()),
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
