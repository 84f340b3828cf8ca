use std::sync::Arc;

use governor_common::config::Config;
use governor_core::round::RoundController;

pub async fn run(cfg: &Config) -> anyhow::Result<()> {
    let manager = Arc::new(super::build_manager(cfg)?);
    let shutdown = super::shutdown_on_ctrl_c();

    RoundController::new(manager, shutdown).run().await;
    Ok(())
}
