//! Feature pipeline behaviour over small merged tables

use common::{ColumnsConfig, PipelineConfig};
use frame::{column_names, numeric, take_rows, to_vec};
use polars::prelude::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::*;
use transformers::{ColumnSelector, FeaturePipeline, Transformer};

#[fixture]
fn config() -> PipelineConfig {
    PipelineConfig {
        columns: ColumnsConfig {
            target: "target".into(),
            milk_price: "Precio_leche".into(),
            regions: vec!["Maule".into()],
            pib: vec!["PIB".into()],
            index: vec!["Imacec_empalmado".into()],
            features: vec![
                "Precio_leche".into(),
                "Precio_leche_rolling3_mean".into(),
                "PIB_rolling3_mean".into(),
                "Imacec_empalmado_rolling3_std".into(),
                "Maule".into(),
            ],
        },
        ..PipelineConfig::default()
    }
}

#[fixture]
fn merged() -> DataFrame {
    df!(
        "Precio_leche" => [200.0, 210.0, 220.0, 230.0],
        "Maule" => [10.0, 0.0, 5.0, 7.5],
        "PIB" => ["1.000", "2.000", "3.000", "4.000"],
        "Imacec_empalmado" => ["90.000", "92.000", "94.000", "96.000"]
    )
    .unwrap()
}

#[rstest]
fn test_default_pipeline_produces_final_features(config: PipelineConfig, merged: DataFrame) {
    let mut pipeline = FeaturePipeline::default_from(&config).unwrap();
    let out = pipeline.fit_transform(&merged, None).unwrap();

    assert_eq!(column_names(&out), config.columns.features);
    assert_eq!(
        to_vec(&out, "Precio_leche_rolling3_mean").unwrap(),
        vec![200.0, 205.0, 210.0, 220.0]
    );
    assert_eq!(
        to_vec(&out, "PIB_rolling3_mean").unwrap(),
        vec![1000.0, 1500.0, 2000.0, 3000.0]
    );

    let std = numeric(&out, "Imacec_empalmado_rolling3_std").unwrap();
    assert_eq!(std[0], None);
    assert!((std[3].unwrap() - 2.0).abs() < 1e-9);
}

#[rstest]
fn test_fitted_pipeline_is_reusable_after_decoding(config: PipelineConfig, merged: DataFrame) {
    let mut pipeline = FeaturePipeline::default_from(&config).unwrap();
    let fitted = pipeline.fit_transform(&merged, None).unwrap();

    let decoded = FeaturePipeline::from_bytes(&pipeline.to_bytes().unwrap()).unwrap();
    let replayed = decoded.transform(&take_rows(&merged, &[1, 2, 3]).unwrap()).unwrap();

    assert_eq!(
        to_vec(&replayed, "PIB_rolling3_mean").unwrap(),
        vec![2000.0, 2500.0, 3000.0]
    );
    assert_eq!(fitted.height(), 4);
}

#[rstest]
fn test_transform_leaves_input_untouched(config: PipelineConfig, merged: DataFrame) {
    let before = merged.clone();
    let pipeline = FeaturePipeline::default_from(&config).unwrap();
    let _ = pipeline.transform(&merged).unwrap();
    assert!(merged.equals_missing(&before));
}

fn selected_names(requested: &[&str], available: &[&str]) -> Vec<String> {
    let mut expected: Vec<String> = Vec::new();
    for r in requested.iter().filter(|c| available.contains(c)) {
        if !expected.iter().any(|e| e == r) {
            expected.push((*r).to_string());
        }
    }
    expected
}

proptest! {
    #[test]
    fn prop_selector_output_is_ordered_subset(
        requested in prop::collection::vec(prop::sample::select(vec!["a", "b", "c", "d", "e"]), 1..6),
        order in Just(vec![0usize, 1, 2, 3]).prop_shuffle(),
    ) {
        let names = ["a", "b", "c", "z"];
        let columns: Vec<Column> = order
            .iter()
            .map(|&i| Column::new(names[i].into(), [i as f64]))
            .collect();
        let frame = DataFrame::new(columns).unwrap();
        let out = ColumnSelector::new(requested.clone()).unwrap().transform(&frame).unwrap();

        prop_assert_eq!(column_names(&out), selected_names(&requested, &names));
    }

    #[test]
    fn prop_selector_commutes_with_row_order(
        requested in prop::collection::vec(prop::sample::select(vec!["a", "b", "c", "d"]), 1..5),
        values in prop::collection::vec(-1e6f64..1e6, 6),
        rows in Just((0..6usize).collect::<Vec<_>>()).prop_shuffle(),
    ) {
        let frame = df!(
            "a" => values.clone(),
            "b" => values.iter().map(|v| v * 2.0).collect::<Vec<_>>(),
            "c" => values.iter().map(|v| format!("{v}")).collect::<Vec<_>>()
        )
        .unwrap();
        let selector = ColumnSelector::new(requested.clone()).unwrap();

        let permuted_then_selected = selector.transform(&take_rows(&frame, &rows).unwrap()).unwrap();
        let selected_then_permuted = take_rows(&selector.transform(&frame).unwrap(), &rows).unwrap();

        prop_assert_eq!(
            column_names(&permuted_then_selected),
            selected_names(&requested, &["a", "b", "c"])
        );
        prop_assert!(permuted_then_selected.equals_missing(&selected_then_permuted));
    }
}
