use std::future::Future;
use std::time::Duration;

use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, info, warn};

use super::executor::MonitoringExecutor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Running,
    Stopped,
}

/// Monitoring scheduler - drives cycles on a fixed interval until shutdown
pub struct MonitoringScheduler {
    executor: MonitoringExecutor,
    interval: Duration,
    state: SchedulerState,
    cycles: u64,
}

impl MonitoringScheduler {
    /// `interval` must be non-zero.
    pub fn new(executor: MonitoringExecutor, interval: Duration) -> Self {
        Self { executor, interval, state: SchedulerState::Idle, cycles: 0 }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Run one cycle immediately, then one per tick, until `shutdown` resolves.
    ///
    /// Shutdown is only observed between cycles; a cycle in flight always completes.
    /// Ticks missed by a long cycle are skipped, not queued.
    pub async fn run(&mut self, shutdown: impl Future<Output = ()>) {
        tokio::pin!(shutdown);

        self.state = SchedulerState::Running;
        let start = Instant::now();
        let timer = start.checked_add(self.interval).map(|first_tick| {
            let mut timer = interval_at(first_tick, self.interval);
            timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
            timer
        });

        self.run_cycle().await;

        let Some(mut timer) = timer else {
            warn!(interval = ?self.interval, "Interval is beyond the clock range, no further cycles will run");
            shutdown.await;
            info!("Shutting down...");
            self.state = SchedulerState::Stopped;
            return;
        };

        loop {
            tokio::select! {
                biased;

                _ = &mut shutdown => {
                    info!("Shutting down...");
                    break;
                }
                _ = timer.tick() => {
                    self.run_cycle().await;
                }
            }
        }

        self.state = SchedulerState::Stopped;
    }

    async fn run_cycle(&mut self) {
        self.cycles += 1;
        let report = self.executor.execute_check().await;
        debug!(cycle = self.cycles, verdict = %report.verdict, "Cycle complete");
    }
}
