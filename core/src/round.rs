//! # Round Controller
//!
//! Drives the endless scan loop:
//!
//! ```text
//! Scanning ──▶ Draining ──▶ Sleeping ──▶ Scanning ...
//!     └───────────┴────────────┴──▶ Stopped (shutdown only)
//! ```
//!
//! At most one round's tasks are ever in flight: the next round cannot start
//! before the worker pool has drained. Every failure short of shutdown is
//! logged and the loop carries on with the next round.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::address_set::AddressSet;
use crate::error::RoundError;
use crate::generator::{RoundReport, TaskGenerator};
use crate::manager::HealthCheckManager;
use crate::shutdown::ShutdownController;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundState {
    Scanning,
    Draining,
    Sleeping,
    Stopped,
}

pub struct RoundController {
    manager: Arc<HealthCheckManager>,
    shutdown: ShutdownController,
    state: watch::Sender<RoundState>,
}

impl RoundController {
    pub fn new(manager: Arc<HealthCheckManager>, shutdown: ShutdownController) -> Self {
        let (state, _) = watch::channel(RoundState::Scanning);
        Self {
            manager,
            shutdown,
            state,
        }
    }

    pub fn state(&self) -> RoundState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<RoundState> {
        self.state.subscribe()
    }

    /// Runs rounds until shutdown is requested.
    pub async fn run(&self) {
        info!(
            interval_secs = self.manager.interval().as_secs(),
            environments = self.manager.environments().len(),
            "Health check rounds started"
        );

        loop {
            match self.run_round().await {
                Ok(_) => {}
                Err(RoundError::Cancelled) => break,
                Err(e) => error!(error = %e, "Health check round failed"),
            }

            self.state.send_replace(RoundState::Sleeping);
            if self.shutdown.sleep(self.manager.interval()).await.is_err() {
                break;
            }
        }

        warn!("Health check rounds interrupted");
        self.state.send_replace(RoundState::Stopped);
    }

    /// Generates, drains and clears one round.
    ///
    /// Tasks submitted before a registry failure are still drained, so a
    /// failed round never leaks work into the next one. Shutdown during
    /// generation returns at once without draining.
    pub async fn run_round(&self) -> Result<RoundReport, RoundError> {
        self.state.send_replace(RoundState::Scanning);
        info!("round of health check started");

        let mut addresses = AddressSet::new();
        let generated = TaskGenerator::new(&self.manager, &self.shutdown)
            .generate_round(&mut addresses)
            .await;
        if let Err(RoundError::Cancelled) = generated {
            return generated;
        }

        self.state.send_replace(RoundState::Draining);
        self.wait_for_task_complete().await?;
        addresses.clear();

        match &generated {
            Ok(report) => info!(tasks = report.submitted(), "round of health check finished"),
            Err(_) => info!("round of health check finished"),
        }
        generated
    }

    /// Polls the pool until nothing is running or queued.
    async fn wait_for_task_complete(&self) -> Result<(), RoundError> {
        let pool = self.manager.worker_pool();
        let log_every = self.manager.drain_log_every();
        let mut polls: u32 = 0;

        loop {
            let active = pool.active_count();
            let queued = pool.queue_len();
            if active == 0 && queued == 0 {
                return Ok(());
            }

            if polls % log_every == 0 {
                let completed = pool.completed_count();
                info!(
                    active,
                    queued,
                    completed,
                    "active threads: {active}, queue size: {queued}, completed task: {completed}"
                );
            }
            polls = polls.wrapping_add(1);

            self.shutdown
                .sleep(self.manager.drain_poll_interval())
                .await?;
        }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
