//! Feature engineering: fit the feature pipeline and split train/test

use common::SplitConfig;
use frame::CsvOptions;
use polars::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::{debug, info};
use transformers::{FeaturePipeline, Transformer};

use crate::artifacts::{read_table, save_feature_pipeline, write_table};
use crate::context::StepContext;
use crate::error::{PipelineError, PipelineResult};
use crate::preprocessing::formatted_columns;

/// Sizes of one feature engineering run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureSummary {
    /// Rows after the feature pipeline and null dropping
    pub rows: usize,
    /// Training rows
    pub train_rows: usize,
    /// Test rows
    pub test_rows: usize,
}

/// Row positions of a seeded shuffle split: `(train, test)`. The test share is
/// rounded up.
#[must_use]
pub fn split_indices(n_rows: usize, split: &SplitConfig) -> (Vec<usize>, Vec<usize>) {
    let mut order: Vec<usize> = (0..n_rows).collect();
    let mut rng = StdRng::seed_from_u64(split.seed);
    order.shuffle(&mut rng);

    let n_test = ((n_rows as f64) * split.test_fraction).ceil() as usize;
    let n_test = n_test.min(n_rows);
    let train = order.split_off(n_test);
    (train, order)
}

/// Fit the feature pipeline on the merged table and write the splits
pub fn feature_engineering(ctx: &StepContext) -> PipelineResult<FeatureSummary> {
    ctx.banner("feature engineering");
    let columns = &ctx.config.columns;
    let layout = &ctx.layout;

    let merged = read_table(
        &layout.merged_file(),
        &CsvOptions::with_text_columns(&formatted_columns(columns)),
    )?;

    let target = frame::numeric(&merged, &columns.target)?;
    let inputs = merged.drop(&columns.target)?;

    let mut pipeline = FeaturePipeline::default_from(&ctx.config)?;
    let mut features = pipeline.fit_transform(&inputs, Some(&target))?;
    features.with_column(Column::new(columns.target.as_str().into(), target))?;

    let mut ordered = vec![columns.target.clone()];
    ordered.extend(frame::column_names(&features).into_iter().filter(|c| *c != columns.target));
    let before = features.height();
    let features = features.select(ordered)?.drop_nulls::<String>(None)?;
    debug!(before, after = features.height(), "Dropped rows with missing features");
    if features.height() == 0 {
        return Err(PipelineError::EmptyData("feature engineering".into()));
    }

    let (train_rows, test_rows) = split_indices(features.height(), &ctx.config.split);
    let train = frame::take_rows(&features, &train_rows)?;
    let test = frame::take_rows(&features, &test_rows)?;

    if ctx.dry_run {
        info!("Skipping saving");
    } else {
        write_table(&train, &layout.train_file())?;
        write_table(&test, &layout.test_file())?;
        save_feature_pipeline(&pipeline, &layout.data_pipeline_file())?;
    }

    let summary = FeatureSummary {
        rows: features.height(),
        train_rows: train.height(),
        test_rows: test.height(),
    };
    info!(?summary, "Feature engineering finished");
    Ok(summary)
}
