//! Collect the three raw sources and merge them into one shifted table
//!
//! Each collector normalizes its source to `anio`, `mes` plus the source's
//! value columns. The merge joins them on the period, sorts chronologically
//! and shifts every predictor down one period so a row only sees values
//! known before its own month.

use common::constants::{
    MILK_PRICE_COL, MONTH_COL, RAW_BANK_PERIOD_COL, RAW_MILK_MONTH_COL, RAW_MILK_YEAR_COL,
    RAW_PREP_DATE_COL, YEAR_COL,
};
use common::{ColumnsConfig, Period, Source, spanish_month};
use frame::{CsvOptions, FrameError};
use polars::prelude::*;
use tracing::{debug, info, warn};

use crate::artifacts::{read_table, write_table};
use crate::context::StepContext;
use crate::error::PipelineResult;

/// Row counts of one preprocessing run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreprocessSummary {
    /// Collected milk rows
    pub milk_rows: usize,
    /// Collected precipitation rows
    pub precipitation_rows: usize,
    /// Collected bank rows
    pub bank_rows: usize,
    /// Rows in the merged, shifted table
    pub merged_rows: usize,
}

fn period_columns(periods: &[Option<Period>]) -> (Column, Column) {
    let years: Vec<Option<i32>> = periods.iter().map(|p| p.map(|p| p.year)).collect();
    let months: Vec<Option<i32>> = periods
        .iter()
        .map(|p| p.and_then(|p| i32::try_from(p.month).ok()))
        .collect();
    (
        Column::new(YEAR_COL.into(), years),
        Column::new(MONTH_COL.into(), months),
    )
}

fn parse_periods(raw: &DataFrame, name: &str) -> PipelineResult<Vec<Option<Period>>> {
    Ok(frame::text(raw, name)?
        .iter()
        .map(|d| d.as_deref().and_then(Period::parse_date_prefix))
        .collect())
}

/// `from` cast to `dtype` under the name `to`; unparseable cells become null
fn cast_column(raw: &DataFrame, from: &str, to: &str, dtype: &DataType) -> PipelineResult<Column> {
    let mut column = raw
        .column(from)
        .map_err(|_| FrameError::ColumnNotFound(from.to_string()))?
        .cast(dtype)?;
    column.rename(to.into());
    Ok(column)
}

/// Rename the period columns and turn Spanish month names into numbers
pub fn collect_milk(raw: &DataFrame) -> PipelineResult<DataFrame> {
    let mut unknown = 0usize;
    let months: Vec<Option<i32>> = frame::text(raw, RAW_MILK_MONTH_COL)?
        .iter()
        .map(|m| {
            let month = m
                .as_deref()
                .and_then(spanish_month)
                .and_then(|m| i32::try_from(m).ok());
            if m.is_some() && month.is_none() {
                unknown += 1;
            }
            month
        })
        .collect();
    if unknown > 0 {
        warn!(unknown, "Unrecognized month names in milk data");
    }

    Ok(DataFrame::new(vec![
        cast_column(raw, RAW_MILK_YEAR_COL, YEAR_COL, &DataType::Int32)?,
        Column::new(MONTH_COL.into(), months),
        cast_column(raw, MILK_PRICE_COL, MILK_PRICE_COL, &DataType::Float64)?,
    ])?)
}

/// Derive the period from the `date` column
pub fn collect_precipitation(raw: &DataFrame, columns: &ColumnsConfig) -> PipelineResult<DataFrame> {
    let periods = parse_periods(raw, RAW_PREP_DATE_COL)?;
    let unparsed = periods.iter().filter(|p| p.is_none()).count();
    if unparsed > 0 {
        warn!(unparsed, "Unparseable precipitation dates");
    }

    let (years, months) = period_columns(&periods);
    let mut out = vec![years, months];
    for region in &columns.regions {
        out.push(cast_column(raw, region, region, &DataType::Float64)?);
    }
    Ok(DataFrame::new(out)?)
}

/// Parse `Periodo`, drop duplicate periods (keep first), derive the period
/// and drop rows with any missing value
pub fn collect_bank(raw: &DataFrame, columns: &ColumnsConfig) -> PipelineResult<DataFrame> {
    let periods = parse_periods(raw, RAW_BANK_PERIOD_COL)?;
    let normalized: Vec<Option<String>> = periods.iter().map(|p| p.map(|p| p.to_string())).collect();
    let (years, months) = period_columns(&periods);

    let mut df = raw.clone();
    df.with_column(Column::new(RAW_BANK_PERIOD_COL.into(), normalized))?;
    df.with_column(years)?;
    df.with_column(months)?;

    let original = df.height();
    let df = df.unique_stable(
        Some(&[RAW_BANK_PERIOD_COL.to_string()]),
        UniqueKeepStrategy::First,
        None,
    )?;
    debug!("Dropping duplicated {} records", original - df.height());

    let mut keep = vec![YEAR_COL.to_string(), MONTH_COL.to_string()];
    keep.extend(columns.pib.iter().cloned());
    keep.extend(columns.index.iter().cloned());
    let df = df.select(keep)?;
    let before = df.height();
    let df = df.drop_nulls::<String>(None)?;
    debug!(
        "The bank table was reduced from {} to {} rows after dropping nulls",
        before,
        df.height()
    );
    Ok(df)
}

/// Inner join on the period, then pair each month's milk price (the target)
/// with every predictor from the calendar month before it. A month whose
/// predecessor is missing from any source is dropped.
pub fn merge(
    milk: &DataFrame,
    precipitation: &DataFrame,
    bank: &DataFrame,
    columns: &ColumnsConfig,
) -> PipelineResult<DataFrame> {
    let keys = [col(YEAR_COL), col(MONTH_COL)];
    let joined = milk
        .clone()
        .lazy()
        .join(
            precipitation.clone().lazy(),
            keys.clone(),
            keys.clone(),
            JoinArgs::new(JoinType::Inner),
        )
        .join(
            bank.clone().lazy(),
            keys.clone(),
            keys.clone(),
            JoinArgs::new(JoinType::Inner),
        )
        .sort([YEAR_COL, MONTH_COL], Default::default())
        .collect()?;

    let targets = joined.clone().lazy().select([
        col(YEAR_COL),
        col(MONTH_COL),
        col(columns.milk_price.as_str()).alias(columns.target.as_str()),
    ]);

    // Re-key every predictor row to the following month
    let december = col(MONTH_COL).eq(lit(12));
    let lagged = joined.lazy().with_columns([
        when(december.clone())
            .then(col(YEAR_COL) + lit(1))
            .otherwise(col(YEAR_COL))
            .cast(DataType::Int32)
            .alias(YEAR_COL),
        when(december)
            .then(lit(1))
            .otherwise(col(MONTH_COL) + lit(1))
            .cast(DataType::Int32)
            .alias(MONTH_COL),
    ]);

    let paired = lagged
        .join(targets, keys.clone(), keys, JoinArgs::new(JoinType::Inner))
        .sort([YEAR_COL, MONTH_COL], Default::default())
        .collect()?;

    let before = paired.height();
    let out = paired.drop_nulls::<String>(None)?;
    debug!(before, after = out.height(), "Dropped incomplete merged rows");
    Ok(out)
}

/// Text columns that must keep their literal formatting
pub(crate) fn formatted_columns(columns: &ColumnsConfig) -> Vec<String> {
    columns.pib.iter().chain(columns.index.iter()).cloned().collect()
}

/// Run every collector and the merge, writing intermediate tables unless
/// this is a dry run
pub fn preprocess_assets(ctx: &StepContext) -> PipelineResult<PreprocessSummary> {
    ctx.banner("preprocessing");
    let columns = &ctx.config.columns;
    let layout = &ctx.layout;

    debug!("Starting preprocessing with milk data");
    let milk = collect_milk(&read_table(
        &layout.raw_file(Source::Milk),
        &CsvOptions::with_text_columns(&[RAW_MILK_MONTH_COL]),
    )?)?;

    debug!("Starting preprocessing with precipitation data");
    let precipitation = collect_precipitation(
        &read_table(
            &layout.raw_file(Source::Precipitation),
            &CsvOptions::with_text_columns(&[RAW_PREP_DATE_COL]),
        )?,
        columns,
    )?;

    debug!("Starting preprocessing with bank data");
    let mut bank_text = formatted_columns(columns);
    bank_text.push(RAW_BANK_PERIOD_COL.to_string());
    let bank = collect_bank(
        &read_table(
            &layout.raw_file(Source::Bank),
            &CsvOptions::with_text_columns(&bank_text),
        )?,
        columns,
    )?;

    debug!("Creating intermediate data");
    let merged = merge(&milk, &precipitation, &bank, columns)?;

    if ctx.dry_run {
        info!("Skipping saving");
    } else {
        for (source, table) in [
            (Source::Milk, &milk),
            (Source::Precipitation, &precipitation),
            (Source::Bank, &bank),
        ] {
            write_table(table, &layout.collected_file(source))?;
        }
        write_table(&merged, &layout.merged_file())?;
    }

    let summary = PreprocessSummary {
        milk_rows: milk.height(),
        precipitation_rows: precipitation.height(),
        bank_rows: bank.height(),
        merged_rows: merged.height(),
    };
    info!(?summary, "Preprocessing finished");
    Ok(summary)
}
