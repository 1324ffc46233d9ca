//! Hyperparameter search and model training

use chrono::Local;
use common::constants::{SNAPSHOT_METRICS_FILE, SNAPSHOT_MODEL_FILE};
use estimators::{BestParams, GridSearch, Metrics, ModelPipeline, Regressor};
use frame::CsvOptions;
use ndarray::Array1;
use polars::prelude::DataFrame;
use tracing::info;

use crate::artifacts::{archive, load_json, read_table, save_json, save_model};
use crate::context::StepContext;
use crate::error::{PipelineError, PipelineResult};

fn load_split(ctx: &StepContext) -> PipelineResult<(DataFrame, DataFrame)> {
    let train = read_table(&ctx.layout.train_file(), &CsvOptions::default())?;
    let test = read_table(&ctx.layout.test_file(), &CsvOptions::default())?;
    if train.height() == 0 {
        return Err(PipelineError::EmptyData("loading the training split".into()));
    }
    Ok((train, test))
}

/// Grid-search the model hyperparameters with k-fold cross-validation and
/// record the winner
pub fn hypertune_model(ctx: &StepContext) -> PipelineResult<BestParams> {
    ctx.banner("hypertuning");
    let columns = &ctx.config.columns;
    let (train, _) = load_split(ctx)?;

    let x = frame::to_matrix(&train, &columns.features)?;
    let y = Array1::from(frame::to_vec(&train, &columns.target)?);
    let best = GridSearch::from_config(&ctx.config.tuning)?.run(&columns.features, &x, &y)?;

    info!(
        selector_k = best.params.selector_k,
        poly_degree = best.params.poly_degree,
        ridge_alpha = best.params.ridge_alpha,
        cv_score = best.cv_score,
        "Best hyperparameters"
    );
    if ctx.dry_run {
        info!("Skipping saving");
    } else {
        save_json(&best, &ctx.layout.best_params_file())?;
    }
    Ok(best)
}

/// Fit the model with the recorded hyperparameters, score it on the test
/// split and stage it, archiving the previously staged model first
pub fn training_model(ctx: &StepContext) -> PipelineResult<Metrics> {
    ctx.banner("training");
    let columns = &ctx.config.columns;
    let layout = &ctx.layout;
    let (train, test) = load_split(ctx)?;
    let best: BestParams = load_json(&layout.best_params_file())?;

    let mut model = ModelPipeline::new(
        columns.features.clone(),
        best.params,
        ctx.config.tuning.mi_neighbors,
    );
    model.fit_frame(&train, &columns.target)?;

    let y_test = Array1::from(frame::to_vec(&test, &columns.target)?);
    let predicted = model.predict(&frame::to_matrix(&test, &columns.features)?)?;
    let metrics = Metrics::evaluate(&y_test, &predicted)?;
    info!(rmse = metrics.rmse, r2 = metrics.r2, "Test metrics");

    if ctx.dry_run {
        info!("Skipping saving");
        return Ok(metrics);
    }

    let staged_model = layout.staged_model_file();
    let staged_metrics = layout.staged_metrics_file();
    if staged_metrics.exists() {
        let dir = layout.history_dir(Local::now().naive_local());
        archive(
            &[
                (staged_model.as_path(), SNAPSHOT_MODEL_FILE),
                (staged_metrics.as_path(), SNAPSHOT_METRICS_FILE),
            ],
            &dir,
        )?;
    }
    save_model(&model, &staged_model)?;
    save_json(&metrics, &staged_metrics)?;
    Ok(metrics)
}
