//! Check tasks and the seam where the actual probe plugs in.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use governor_common::network::host::Host;
use tracing::{debug, info, warn};

/// Performs the health check for one host.
#[async_trait]
pub trait Checker: Send + Sync {
    async fn check(&self, host: &Host) -> anyhow::Result<()>;
}

/// One host to check, plus the checker shared by every task of the manager.
pub struct CheckTask {
    host: Host,
    checker: Arc<dyn Checker>,
}

impl CheckTask {
    pub fn new(host: Host, checker: Arc<dyn Checker>) -> Self {
        Self { host, checker }
    }

    pub fn host(&self) -> &Host {
        &self.host
    }

    /// Runs the check. Failures stay with the task; they never reach the round.
    pub async fn run(self) {
        match self.checker.check(&self.host).await {
            Ok(()) => debug!(
                service = %self.host.service,
                environment = %self.host.service.environment,
                ip = %self.host.ip,
                port = self.host.port,
                "Health check passed"
            ),
            Err(e) => warn!(
                service = %self.host.service,
                environment = %self.host.service.environment,
                ip = %self.host.ip,
                port = self.host.port,
                error = %e,
                "Health check failed"
            ),
        }
    }
}

impl fmt::Debug for CheckTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckTask").field("host", &self.host).finish()
    }
}

/// Records each dispatched host in the log and reports success.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogChecker;

#[async_trait]
impl Checker for LogChecker {
    async fn check(&self, host: &Host) -> anyhow::Result<()> {
        info!(
            service = %host.service,
            environment = %host.service.environment,
            "health check dispatched for {}:{}",
            host.ip,
            host.port
        );
        Ok(())
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

#[cfg(test)]
mod tests {
    use super::*;
    use governor_common::environment::Environment;
    use governor_common::network::address::Address;
    use governor_common::network::host::{Service, ServiceId};
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<String>>,
        fail: bool,
    }

    #[async_trait]
    impl Checker for Recorder {
        async fn check(&self, host: &Host) -> anyhow::Result<()> {
            self.seen.lock().unwrap().push(format!("{}:{}", host.ip, host.port));
            if self.fail {
                anyhow::bail!("connection refused");
            }
            Ok(())
        }
    }

    fn host() -> Host {
        let mut service = Service::new(ServiceId::new(
            Environment::new("prod", "zk:2181"),
            "com/example/svc",
            "",
        ));
        service.add_host(Address::parse("10.0.0.1:8080").unwrap())
    }

    #[tokio::test]
    async fn run_invokes_the_checker_once() {
        let recorder = Arc::new(Recorder::default());
        CheckTask::new(host(), recorder.clone()).run().await;

        assert_eq!(*recorder.seen.lock().unwrap(), vec!["10.0.0.1:8080"]);
    }

    #[tokio::test]
    async fn failed_check_does_not_panic() {
        let recorder = Arc::new(Recorder {
            fail: true,
            ..Default::default()
        });
        CheckTask::new(host(), recorder.clone()).run().await;

        assert_eq!(recorder.seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn log_checker_always_succeeds() {
        assert!(LogChecker.check(&host()).await.is_ok());
    }
}
