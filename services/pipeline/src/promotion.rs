//! Promotion of the staged model to production

use chrono::Local;
use common::constants::{PROD_METRICS_FILE, PROD_MODEL_FILE};
use estimators::Metrics;
use tracing::{info, warn};

use crate::artifacts::{archive, copy_file, load_json, load_json_opt, load_model};
use crate::context::StepContext;
use crate::error::{PipelineError, PipelineResult};

/// What a promotion run did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PromotionOutcome {
    /// Staged artifacts were copied to production
    Promoted(Metrics),
    /// Gate passed but nothing was copied
    DryRun(Metrics),
}

/// Acceptance rules for a staged model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PromotionGate {
    /// Allowed relative RMSE regression against production
    pub rmse_tolerance: f64,
}

impl PromotionGate {
    /// Check staged metrics; `production` is the current production record.
    /// `force` skips the comparison against production but never the
    /// sanity rule.
    pub fn evaluate(
        &self,
        staged: &Metrics,
        production: Option<&Metrics>,
        force: bool,
    ) -> Result<(), String> {
        if !(staged.rmse.is_finite() && staged.rmse > 0.0) {
            return Err(format!("RMSE must be finite and positive, got {}", staged.rmse));
        }
        if !(staged.r2.is_finite() && staged.r2 > 0.0) {
            return Err(format!("r2 must be finite and positive, got {}", staged.r2));
        }

        let Some(production) = production else {
            return Ok(());
        };
        let limit = production.rmse * (1.0 + self.rmse_tolerance);
        if staged.rmse <= limit {
            return Ok(());
        }
        if force {
            warn!(
                staged_rmse = staged.rmse,
                production_rmse = production.rmse,
                "Forcing promotion of a model worse than production"
            );
            return Ok(());
        }
        Err(format!(
            "staged RMSE {} exceeds production RMSE {} by more than {:.0}%",
            staged.rmse,
            production.rmse,
            self.rmse_tolerance * 100.0
        ))
    }
}

/// Promote the staged model when it passes the gate. Production is left
/// untouched on rejection and in dry runs.
pub fn promote_model(ctx: &StepContext, force: bool) -> PipelineResult<PromotionOutcome> {
    ctx.banner("promotion");
    let layout = &ctx.layout;

    let staged: Metrics = load_json(&layout.staged_metrics_file())?;
    // Fail early on a corrupt staged model
    load_model(&layout.staged_model_file())?;
    let production: Option<Metrics> = load_json_opt(&layout.production_metrics_file())?;

    let gate = PromotionGate {
        rmse_tolerance: ctx.config.promotion.rmse_tolerance,
    };
    gate.evaluate(&staged, production.as_ref(), force)
        .map_err(PipelineError::PromotionRejected)?;
    info!(rmse = staged.rmse, r2 = staged.r2, "Staged model passed the promotion gate");

    if ctx.dry_run {
        info!("Skipping promotion");
        return Ok(PromotionOutcome::DryRun(staged));
    }

    let prod_model = layout.production_model_file();
    let prod_metrics = layout.production_metrics_file();
    archive(
        &[
            (prod_model.as_path(), PROD_MODEL_FILE),
            (prod_metrics.as_path(), PROD_METRICS_FILE),
        ],
        &layout.history_dir(Local::now().naive_local()),
    )?;
    copy_file(&layout.staged_model_file(), &prod_model)?;
    copy_file(&layout.staged_metrics_file(), &prod_metrics)?;
    info!(path = %prod_model.display(), "Model promoted to production");
    Ok(PromotionOutcome::Promoted(staged))
}

#[cfg(test)]
mod tests {
    use super::*;

    const GATE: PromotionGate = PromotionGate { rmse_tolerance: 0.05 };

    #[test]
    fn test_positive_metrics_pass_without_production() {
        assert!(GATE.evaluate(&Metrics { rmse: 5.2, r2: 0.6 }, None, false).is_ok());
    }

    #[test]
    fn test_negative_rmse_fails_even_when_forced() {
        assert!(GATE.evaluate(&Metrics { rmse: -1.0, r2: 0.6 }, None, true).is_err());
        assert!(GATE.evaluate(&Metrics { rmse: 5.0, r2: f64::NAN }, None, false).is_err());
    }

    #[test]
    fn test_regression_against_production() {
        let prod = Metrics { rmse: 5.0, r2: 0.7 };
        assert!(GATE.evaluate(&Metrics { rmse: 5.2, r2: 0.6 }, Some(&prod), false).is_ok());
        assert!(GATE.evaluate(&Metrics { rmse: 5.3, r2: 0.6 }, Some(&prod), false).is_err());
        assert!(GATE.evaluate(&Metrics { rmse: 5.3, r2: 0.6 }, Some(&prod), true).is_ok());
    }
}
