use std::sync::Arc;
use std::time::{Duration, Instant};

use colored::*;
use governor_common::config::Config;
use governor_core::generator::{EnvironmentReport, RoundReport};
use governor_core::round::RoundController;

use crate::terminal::print;

pub async fn once(cfg: &Config) -> anyhow::Result<()> {
    let manager = Arc::new(super::build_manager(cfg)?);
    let shutdown = super::shutdown_on_ctrl_c();
    let controller = RoundController::new(manager, shutdown);

    let start_time: Instant = Instant::now();
    let report: RoundReport = controller.run_round().await?;

    round_ends(&report, start_time.elapsed());
    Ok(())
}

fn round_ends(report: &RoundReport, total_time: Duration) {
    print::header("round summary");

    for (idx, env) in report.environments.iter().enumerate() {
        print::tree_head(idx, &env.environment.to_string());
        print::as_tree_one_level(environment_details(env));
    }

    let tasks: ColoredString = format!("{} health checks", report.submitted()).bold().green();
    let total_time: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();
    print::fat_separator();
    print::print(&format!("Round complete: {tasks} dispatched in {total_time}"));
}

fn environment_details(env: &EnvironmentReport) -> Vec<(String, ColoredString)> {
    let mut details: Vec<(String, ColoredString)> = vec![
        ("Services".to_string(), env.services.len().to_string().normal()),
        ("Checks".to_string(), env.submitted.to_string().green()),
        ("Invalid".to_string(), env.rejected.to_string().yellow()),
        ("Foreign".to_string(), env.filtered.to_string().normal()),
        ("Repeats".to_string(), env.duplicates.to_string().normal()),
    ];

    if let Some(error) = &env.error {
        details.push(("Error".to_string(), error.as_str().red()));
    }
    details
}
