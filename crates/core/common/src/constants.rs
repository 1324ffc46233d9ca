//! Fixed names shared by every pipeline step
//!
//! Directory names are configurable through [`crate::PathsConfig`]; file
//! names and column names are not, since they are the contract between steps.

/// Raw milk price file stem
pub const MILK_FILE_NAME: &str = "precio_leche";
/// Raw precipitation file stem
pub const PREP_FILE_NAME: &str = "precipitaciones";
/// Raw central bank indicators file stem
pub const BANK_FILE_NAME: &str = "banco_central";
/// Merged intermediate table stem
pub const MERGED_FILE_NAME: &str = "merge_data";

/// Training split file name
pub const TRAIN_FILE: &str = "train.csv";
/// Test split file name
pub const TEST_FILE: &str = "test.csv";
/// Fitted feature pipeline artifact
pub const DATA_PIPELINE_FILE: &str = "data_pipeline.bin";
/// Best hyperparameters record
pub const BEST_PARAMS_FILE: &str = "params/best_params.json";
/// Staged model artifact
pub const STAGED_MODEL_FILE: &str = "model/trained_model.bin";
/// Staged metrics record
pub const STAGED_METRICS_FILE: &str = "model/model_metrics.json";
/// History directory for archived artifacts
pub const HISTORY_DIR: &str = "model/history";
/// Production model artifact
pub const PROD_MODEL_FILE: &str = "model_prod.bin";
/// Production metrics record
pub const PROD_METRICS_FILE: &str = "model_prod_metrics.json";
/// File names used inside a history snapshot
pub const SNAPSHOT_MODEL_FILE: &str = "trained_model.bin";
/// Metrics file name inside a history snapshot
pub const SNAPSHOT_METRICS_FILE: &str = "model_metrics.json";
/// Timestamp layout for history snapshot directories
pub const HISTORY_TIMESTAMP_FORMAT: &str = "%m-%d-%Y_%H-%M-%S_%6f";

/// Period column holding the calendar year
pub const YEAR_COL: &str = "anio";
/// Period column holding the calendar month
pub const MONTH_COL: &str = "mes";
/// Unshifted milk price used as regression target
pub const TARGET_COL: &str = "target";
/// Milk price column, shifted and used as a predictor after the merge
pub const MILK_PRICE_COL: &str = "Precio_leche";

/// Raw milk price columns
pub const RAW_MILK_YEAR_COL: &str = "Anio";
/// Raw milk price month column (Spanish abbreviations)
pub const RAW_MILK_MONTH_COL: &str = "Mes";
/// Raw precipitation date column
pub const RAW_PREP_DATE_COL: &str = "date";
/// Raw bank period column
pub const RAW_BANK_PERIOD_COL: &str = "Periodo";

/// Precipitation columns, one per region
pub const CITY_COLS: [&str; 8] = [
    "Coquimbo",
    "Valparaiso",
    "Metropolitana_de_Santiago",
    "Libertador_Gral__Bernardo_O_Higgins",
    "Maule",
    "Biobio",
    "La_Araucania",
    "Los_Rios",
];

/// GDP columns, integers written with thousands separators
pub const PIB_COLS: [&str; 4] = [
    "PIB_Agropecuario_silvicola",
    "PIB_Industria_Manufacturera",
    "PIB_Comercio",
    "PIB",
];

/// Activity and sales index columns, decimals written with misplaced separators
pub const IMACEC_INDICE_COLS: [&str; 5] = [
    "Imacec_empalmado",
    "Imacec_produccion_de_bienes",
    "Imacec_industria",
    "Imacec_no_minero",
    "Indice_de_ventas_comercio_real_no_durables_IVCM",
];

/// Final feature list fed to the model, in order
pub const TAKE_VARS: [&str; 14] = [
    "Precio_leche",
    "Precio_leche_rolling3_mean",
    "Precio_leche_rolling3_std",
    "Coquimbo_rolling3_mean",
    "Metropolitana_de_Santiago_rolling3_mean",
    "Maule_rolling3_mean",
    "Biobio_rolling3_mean",
    "Los_Rios_rolling3_mean",
    "PIB_Agropecuario_silvicola_rolling3_mean",
    "PIB_rolling3_mean",
    "Imacec_empalmado_rolling3_mean",
    "Imacec_no_minero_rolling3_mean",
    "Indice_de_ventas_comercio_real_no_durables_IVCM_rolling3_mean",
    "Imacec_empalmado_rolling3_std",
];

/// Spanish month abbreviations as they appear in the milk price file
pub const SPANISH_MONTHS: [(&str, u32); 12] = [
    ("Ene", 1),
    ("Feb", 2),
    ("Mar", 3),
    ("Abr", 4),
    ("May", 5),
    ("Jun", 6),
    ("Jul", 7),
    ("Ago", 8),
    ("Sep", 9),
    ("Oct", 10),
    ("Nov", 11),
    ("Dic", 12),
];
