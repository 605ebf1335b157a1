mod app_config;

use app_config::AppConfig;
use clap::{Args, Parser, Subcommand};
use nntrain::{
  model::{Activation, DivergencePolicy},
  subcommands, utils,
};
use std::{error::Error, path::PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(version, about = "Online-trained 2-layer feedforward network")]
struct Cli {
  #[command(subcommand)]
  command: Command,
}

/// Flags shared by every subcommand. Each one overrides the config file.
#[derive(Args, Debug)]
struct RunArgs {
  /// YAML file with defaults for the flags below
  #[arg(short, long, value_name = "PATH")]
  config: Option<PathBuf>,
  #[arg(short, long, value_name = "INT")]
  epochs: Option<usize>,
  #[arg(short, long, value_name = "FLOAT")]
  learning_rate: Option<f32>,
  #[arg(long, value_name = "INT")]
  hidden_nodes: Option<usize>,
  /// swish or leaky-relu
  #[arg(short, long)]
  activation: Option<Activation>,
  #[arg(short, long, value_name = "INT")]
  seed: Option<u64>,
  /// Use the biased legacy weight-init and shuffle arithmetic; `--legacy-rng false` turns it off
  #[arg(long, value_name = "BOOL", num_args = 0..=1, default_missing_value = "true")]
  legacy_rng: Option<bool>,
  /// What to do when weights become non-finite
  #[arg(long, value_parser = parse_divergence)]
  divergence: Option<DivergencePolicy>,
  /// Write predictions and final MSE as JSON
  #[arg(long, value_name = "PATH")]
  report: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
  /// Train on a whitespace-separated dataset file
  Train {
    #[arg(short, long, value_name = "PATH")]
    data: PathBuf,
    /// Inputs per line; the remaining columns are labels
    #[arg(long, value_name = "INT", default_value_t = 2)]
    inputs: usize,
    #[arg(long, value_name = "INT", default_value_t = 1)]
    outputs: usize,
    #[command(flatten)]
    run: RunArgs,
  },
  /// Train the fixture network on the XOR set
  Xor {
    #[command(flatten)]
    run: RunArgs,
  },
}

fn parse_divergence(s: &str) -> Result<DivergencePolicy, String> {
  match s {
    "ignore" => Ok(DivergencePolicy::Ignore),
    "warn" => Ok(DivergencePolicy::Warn),
    "fail-fast" => Ok(DivergencePolicy::FailFast),
    other => Err(format!("unknown policy '{}', expected ignore, warn or fail-fast", other)),
  }
}

impl RunArgs {
  fn resolve(self) -> Result<AppConfig, Box<dyn Error>> {
    let file = match &self.config {
      Some(path) => AppConfig::from_file(path)?,
      None => AppConfig::default(),
    };
    let cli = AppConfig {
      epochs: self.epochs,
      learning_rate: self.learning_rate,
      hidden_nodes: self.hidden_nodes,
      activation: self.activation,
      seed: self.seed,
      legacy_rng: self.legacy_rng,
      divergence: self.divergence,
      report: self.report,
    };
    Ok(file.merge(cli))
  }
}

fn main() -> Result<(), Box<dyn Error>> {
  utils::init_logging()?;
  let args = Cli::parse();

  let report = match args.command {
    Command::Train {
      data,
      inputs,
      outputs,
      run,
    } => {
      let config = run.resolve()?;
      info!(?config, "resolved configuration");
      let params = config.train_params(inputs, outputs)?;
      subcommands::Train::from_file(&data, params, config.seed())?
        .with_report(config.report)
        .run()?
    }
    Command::Xor { run } => {
      let config = run.resolve()?;
      info!(?config, "resolved configuration");
      let params = config.train_params(2, 1)?;
      subcommands::Train::xor(params, config.seed())
        .with_report(config.report)
        .run()?
    }
  };
  print!("{}", report.render());
  Ok(())
}
