//! Meishi command line
//!
//! Train, evaluate and inspect the MEMM person-name tagger.

use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use meishi_core::maxent::MaxentModel;
use meishi_trainer::{
    render_inspection, render_metrics, Harness, HarnessConfig, HistoryPolicy, Split,
};

/// CLI arguments
#[derive(Parser)]
#[command(name = "meishi")]
#[command(about = "Train and evaluate a MEMM person-name tagger")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Training split
    #[arg(long, env = "MEISHI_TRAIN", default_value = "data/train")]
    train_path: PathBuf,

    /// Held-out split
    #[arg(long, env = "MEISHI_DEV", default_value = "data/dev")]
    dev_path: PathBuf,

    /// Model artifact
    #[arg(short, long, env = "MEISHI_MODEL", default_value = "model.json")]
    model: PathBuf,

    /// First-name list, one name per line
    #[arg(long, env = "MEISHI_FIRST_NAMES")]
    first_names: Option<PathBuf>,

    /// Last-name list, one name per line
    #[arg(long, env = "MEISHI_LAST_NAMES")]
    last_names: Option<PathBuf>,

    /// F-score beta
    #[arg(short, long, env = "MEISHI_BETA", default_value_t = 1.0)]
    beta: f64,

    /// Maximum optimizer iterations
    #[arg(short = 'i', long, env = "MEISHI_MAX_ITER", default_value_t = 10)]
    max_iterations: usize,

    /// Stop training once the log-likelihood improves by no more than this
    #[arg(long, env = "MEISHI_MIN_LL_DELTA")]
    min_ll_delta: Option<f64>,

    /// Source of the previous-label feature at evaluation time
    #[arg(long, env = "MEISHI_HISTORY", value_enum, default_value_t = HistoryPolicy::Gold)]
    history: HistoryPolicy,

    /// Progress event interval, in sentences (0 disables)
    #[arg(long, env = "MEISHI_PROGRESS", default_value_t = 1000)]
    progress_every: usize,

    /// Log filter directive
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    log: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a classifier on the training split
    Train {
        /// Save the trained model
        #[arg(short, long)]
        save: bool,
    },
    /// Score a classifier on the held-out split
    Evaluate {
        /// Train first instead of loading the saved model
        #[arg(short, long)]
        train: bool,
    },
    /// Show class probabilities for a window of held-out tokens
    Inspect {
        /// First token of the window
        #[arg(long, default_value_t = 0)]
        from: usize,
        /// One past the last token of the window
        #[arg(long, default_value_t = 20)]
        to: usize,
        /// Train first instead of loading the saved model
        #[arg(short, long)]
        train: bool,
    },
    /// Print extracted features as JSON lines
    Features {
        #[arg(long, value_enum, default_value_t = Split::Train)]
        split: Split,
    },
}

impl Cli {
    fn harness_config(&self) -> HarnessConfig {
        HarnessConfig::new()
            .with_train_path(&self.train_path)
            .with_dev_path(&self.dev_path)
            .with_model_path(&self.model)
            .with_beta(self.beta)
            .with_max_iterations(self.max_iterations)
            .with_min_ll_delta(self.min_ll_delta)
            .with_history(self.history)
            .with_progress_every(self.progress_every)
            .with_name_lists(self.first_names.clone(), self.last_names.clone())
    }
}

/// Train, or load the saved model.
fn prepare(harness: &mut Harness, train: bool) -> Result<()> {
    if train {
        harness.train().context("training failed")
    } else {
        harness.load_model().with_context(|| {
            format!(
                "failed to load model from {}",
                harness.config().model_path.display()
            )
        })
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&cli.log).context("invalid log filter")?)
        .with_writer(io::stderr)
        .init();

    let mut harness =
        Harness::new(cli.harness_config()).context("failed to initialize harness")?;

    match cli.command {
        Commands::Train { save } => {
            harness.train().context("training failed")?;
            if let Some(model) = harness.classifier() {
                log_top_features(model);
            }
            if save {
                harness.save_model().context("failed to save model")?;
            }
        }
        Commands::Evaluate { train } => {
            prepare(&mut harness, train)?;
            let report = harness.evaluate().context("evaluation failed")?;
            print!("{}", render_metrics(&report));
        }
        Commands::Inspect { from, to, train } => {
            prepare(&mut harness, train)?;
            let rows = harness.inspect(from..to).context("inspection failed")?;
            print!("{}", render_inspection(&rows));
        }
        Commands::Features { split } => {
            let rows = harness
                .feature_rows(split)
                .context("feature extraction failed")?;
            let stdout = io::stdout();
            let mut out = BufWriter::new(stdout.lock());
            for row in &rows {
                serde_json::to_writer(&mut out, row)?;
                writeln!(out)?;
            }
            out.flush()?;
            info!(rows = rows.len(), "feature dump complete");
        }
    }

    Ok(())
}

fn log_top_features(model: &MaxentModel) {
    info!(features = model.num_features(), "joint features learned");
    for (feature, label, weight) in model.most_informative(10) {
        info!(%feature, %label, weight, "informative feature");
    }
}
