//! Evaluation pass command.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Args;
use std::path::Path;

use crate::cli::context::AppContext;
use crate::cli::output::{output, CommandOutput};
use crate::services::EvaluationPassReport;

#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// User whose active quests are evaluated
    #[arg(short, long)]
    pub user: i64,

    /// Evaluate as of this date (YYYY-MM-DD) instead of today
    #[arg(long)]
    pub as_of: Option<NaiveDate>,
}

#[derive(Debug, serde::Serialize)]
pub struct EvaluateOutput {
    pub seeded: usize,
    #[serde(flatten)]
    pub report: EvaluationPassReport,
}

impl CommandOutput for EvaluateOutput {
    fn to_human(&self) -> String {
        let report = &self.report;
        let mut lines = Vec::new();
        if self.seeded > 0 {
            lines.push(format!("Seeded {} sample quest(s)", self.seeded));
        }
        lines.push(format!(
            "Evaluated {} active quest(s) for user {} as of {}",
            report.evaluated, report.user_id, report.as_of
        ));

        for done in &report.completed {
            lines.push(format!(
                "  {} {} (+{} XP)",
                console::style("completed").green(),
                done.title,
                done.xp_awarded
            ));
        }
        if report.progressed > 0 {
            lines.push(format!("  {} quest(s) made progress", report.progressed));
        }
        for failure in &report.failures {
            lines.push(format!(
                "  {} {}: {}",
                console::style("failed").red(),
                failure.title,
                failure.message
            ));
        }

        lines.push(format!("XP awarded: {}", report.xp_awarded));
        if let Some(level) = report.level {
            lines.push(format!("Level: {level}"));
        }
        lines.join("\n")
    }
}

pub async fn execute(args: EvaluateArgs, config_path: Option<&Path>, json_mode: bool) -> Result<()> {
    let ctx = AppContext::load(config_path).await?;
    let as_of = args.as_of.unwrap_or_else(|| Local::now().date_naive());

    let seeded = if ctx.config.quests.seed_sample_quests {
        ctx.seeder().seed(args.user, as_of).await?.len()
    } else {
        0
    };

    let report = ctx
        .engine()
        .run_evaluation_pass_on(args.user, as_of)
        .await
        .context("Evaluation pass failed")?;

    output(&EvaluateOutput { seeded, report }, json_mode);
    Ok(())
}
