//! spam-filter: train, test and score mail filters on corpus directories
//!
//! # Usage
//!
//! ```bash
//! # Train on one corpus, test on another, print the score
//! spam-filter evaluate ./data/1 ./data/2
//!
//! # Compare every filter, reproducibly
//! spam-filter --seed 42 evaluate ./data/1 ./data/2 --filter all
//!
//! # Train and test as separate steps
//! spam-filter train ./data/1 --model model.json
//! spam-filter test ./data/2 --model model.json
//! spam-filter score ./data/2
//!
//! # Label a single message
//! spam-filter classify ./inbox/msg.eml --model model.json
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use spam_filter::corpus::Corpus;
use spam_filter::spam::{
    compute_quality_for_corpus, HeuristicFilter, NaiveFilter, ParanoidFilter, RandomFilter,
    SpamFilter, TrainedModel,
};
use spam_filter::FilterConfig;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "spam-filter")]
#[command(about = "Adaptive flag-threshold spam filter", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for randomized steps (overrides the config file)
    #[arg(long)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train on one corpus, test on another and print the score
    Evaluate {
        /// Labeled training corpus
        train: PathBuf,
        /// Labeled test corpus
        test: PathBuf,
        /// Filter to evaluate
        #[arg(short, long, value_enum, default_value_t = FilterKind::Heuristic)]
        filter: FilterKind,
    },
    /// Train the heuristic filter and save the model
    Train {
        /// Labeled training corpus
        corpus: PathBuf,
        /// Output model file
        #[arg(short, long)]
        model: PathBuf,
    },
    /// Classify a corpus with a saved model
    Test {
        /// Corpus to classify
        corpus: PathBuf,
        /// Model file written by `train`
        #[arg(short, long)]
        model: PathBuf,
    },
    /// Score the prediction file of a corpus
    Score {
        /// Labeled corpus with a prediction file
        corpus: PathBuf,
    },
    /// Label one message file with a saved model
    Classify {
        /// Raw message file
        message: PathBuf,
        /// Model file written by `train`
        #[arg(short, long)]
        model: PathBuf,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FilterKind {
    Heuristic,
    Naive,
    Paranoid,
    Random,
    All,
}

fn init_logging(config: &FilterConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("spam_filter={}", config.logging.level).into());

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn filters(kind: FilterKind, config: &FilterConfig) -> Vec<Box<dyn SpamFilter>> {
    let heuristic = || Box::new(HeuristicFilter::new(config.clone())) as Box<dyn SpamFilter>;
    let naive = || {
        Box::new(NaiveFilter {
            corpus: config.corpus.clone(),
        }) as Box<dyn SpamFilter>
    };
    let paranoid = || {
        Box::new(ParanoidFilter {
            corpus: config.corpus.clone(),
        }) as Box<dyn SpamFilter>
    };
    let random = || {
        Box::new(RandomFilter::new(
            config.corpus.clone(),
            config.training.seed,
        )) as Box<dyn SpamFilter>
    };

    match kind {
        FilterKind::Heuristic => vec![heuristic()],
        FilterKind::Naive => vec![naive()],
        FilterKind::Paranoid => vec![paranoid()],
        FilterKind::Random => vec![random()],
        FilterKind::All => vec![naive(), paranoid(), random(), heuristic()],
    }
}

fn evaluate(
    filter: &mut dyn SpamFilter,
    train: &Path,
    test: &Path,
    config: &FilterConfig,
) -> anyhow::Result<f64> {
    println!("Testing filter <{}>", filter.name());

    filter
        .train(train)
        .with_context(|| format!("training {} on {}", filter.name(), train.display()))?;
    filter
        .test(test)
        .with_context(|| format!("testing {} on {}", filter.name(), test.display()))?;

    let corpus = Corpus::with_config(test, config.corpus.clone());
    let quality = compute_quality_for_corpus(&corpus, None)?;
    println!("\tScore: {:.2} %", quality * 100.0);

    corpus.remove_predictions()?;
    Ok(quality)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => FilterConfig::from_file(path)?,
        None => FilterConfig::default(),
    };
    if cli.seed.is_some() {
        config.training.seed = cli.seed;
    }

    init_logging(&config);
    info!("Starting spam-filter v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Evaluate {
            train,
            test,
            filter,
        } => {
            for mut candidate in filters(filter, &config) {
                evaluate(candidate.as_mut(), &train, &test, &config)?;
            }
        }
        Commands::Train { corpus, model } => {
            let mut filter = HeuristicFilter::new(config);
            filter.train(&corpus)?;
            filter.model().save(&model)?;

            if let Some(outcome) = filter.last_outcome() {
                println!("Training score: {:.2} %", outcome.best_score * 100.0);
            }
            for (feature, limit) in filter.thresholds().iter() {
                println!("  {:<16} {}", feature.name(), limit);
            }
            println!("Model written to {}", model.display());
        }
        Commands::Test { corpus, model } => {
            let model = TrainedModel::load(&model)?;
            let prediction_path = Corpus::with_config(&corpus, config.corpus.clone()).prediction_path();

            let mut filter = HeuristicFilter::with_model(config, model);
            filter.test(&corpus)?;
            println!("Predictions written to {}", prediction_path.display());
        }
        Commands::Score { corpus } => {
            let corpus = Corpus::with_config(&corpus, config.corpus.clone());
            let quality = compute_quality_for_corpus(&corpus, None)?;
            println!("Score: {:.2} %", quality * 100.0);
        }
        Commands::Classify { message, model } => {
            let model = TrainedModel::load(&model)?;
            let raw = std::fs::read(&message)
                .with_context(|| format!("reading {}", message.display()))?;

            let filter = HeuristicFilter::with_model(config, model);
            println!("{}", filter.classify_raw(&String::from_utf8_lossy(&raw)));
        }
    }

    Ok(())
}
