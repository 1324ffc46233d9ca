//! `milkpipe`: one sub-command per batch step
//!
//! Usage:
//!   milkpipe validate-assets --base-path /srv/milk
//!   milkpipe training-model --base-path /srv/milk --dry-run
//!   milkpipe promote-model --base-path /srv/milk --force

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use common::{PipelineConfig, init_tracing};
use pipeline::{
    PromotionOutcome, StepContext, feature_engineering, hypertune_model, preprocess_assets,
    promote_model, training_model, validate_assets,
};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "milkpipe")]
#[command(about = "Batch steps of the milk price model", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct StepArgs {
    /// Directory every data and artifact path is resolved against
    #[arg(long, default_value = ".")]
    base_path: PathBuf,
    /// Run the step without writing anything
    #[arg(long)]
    dry_run: bool,
    /// Pipeline configuration file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check raw tables against the schema
    ValidateAssets(StepArgs),
    /// Collect and merge the raw sources
    PreprocessAssets(StepArgs),
    /// Fit the feature pipeline and split train/test
    FeatureEngineering(StepArgs),
    /// Grid-search the model hyperparameters
    HypertuneModel(StepArgs),
    /// Train and stage a model with the best hyperparameters
    TrainingModel(StepArgs),
    /// Promote the staged model to production
    PromoteModel {
        #[command(flatten)]
        step: StepArgs,
        /// Skip the comparison against the production model
        #[arg(long)]
        force: bool,
    },
}

impl Commands {
    fn step_args(&self) -> &StepArgs {
        match self {
            Self::ValidateAssets(args)
            | Self::PreprocessAssets(args)
            | Self::FeatureEngineering(args)
            | Self::HypertuneModel(args)
            | Self::TrainingModel(args) => args,
            Self::PromoteModel { step, .. } => step,
        }
    }
}

fn main() -> Result<()> {
    init_tracing("milkpipe=info,pipeline=info,estimators=info,transformers=warn");

    let cli = Cli::parse();
    let args = cli.command.step_args();
    let config = PipelineConfig::load(args.config.as_deref())
        .with_context(|| format!("loading configuration from {:?}", args.config))?;
    let ctx = StepContext::new(&args.base_path, config, args.dry_run);

    match &cli.command {
        Commands::ValidateAssets(_) => {
            let sources = validate_assets(&ctx).context("validating raw assets")?;
            info!(sources, "Validation passed");
        }
        Commands::PreprocessAssets(_) => {
            preprocess_assets(&ctx).context("preprocessing raw assets")?;
        }
        Commands::FeatureEngineering(_) => {
            feature_engineering(&ctx).context("building features")?;
        }
        Commands::HypertuneModel(_) => {
            hypertune_model(&ctx).context("tuning hyperparameters")?;
        }
        Commands::TrainingModel(_) => {
            let metrics = training_model(&ctx).context("training the model")?;
            println!("{}", serde_json::to_string(&metrics)?);
        }
        Commands::PromoteModel { force, .. } => {
            match promote_model(&ctx, *force).context("promoting the staged model")? {
                PromotionOutcome::Promoted(metrics) => {
                    info!(rmse = metrics.rmse, r2 = metrics.r2, "Promotion complete");
                }
                PromotionOutcome::DryRun(_) => info!("Dry run, production left as is"),
            }
        }
    }
    Ok(())
}
