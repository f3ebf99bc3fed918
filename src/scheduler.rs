//! Periodic batch scheduling
//!
//! Runs are due at `start + n * interval`. The first run starts
//! immediately and no run starts before its due time.

use std::future::Future;
use std::time::Duration;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tokio::task::JoinSet;
use tokio::time::{Instant, sleep_until};
use tracing::{error, info, warn};

use crate::config::{OverlapPolicy, ScheduleConfig};

#[derive(Debug, Clone, Copy)]
pub struct Scheduler {
    interval: Duration,
    overlap: OverlapPolicy,
}

impl Scheduler {
    /// Zero intervals are clamped to one millisecond
    pub fn new(interval: Duration, overlap: OverlapPolicy) -> Self {
        Self {
            interval: interval.max(Duration::from_millis(1)),
            overlap,
        }
    }

    pub fn from_config(config: &ScheduleConfig) -> Self {
        Self::new(config.interval(), config.overlap)
    }

    /// Run `job` on schedule until `shutdown` resolves
    ///
    /// With [`OverlapPolicy::Skip`] a job runs inline and due times that pass
    /// while it is still running are dropped. With [`OverlapPolicy::Allow`]
    /// every due time spawns the job regardless of earlier runs; those still
    /// in flight at shutdown are aborted.
    pub async fn run<F, Fut, S>(&self, mut job: F, shutdown: S)
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
        S: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        let start = Instant::now();
        let mut cycle: u32 = 0;
        let mut in_flight = JoinSet::new();

        loop {
            // An unrepresentable due time never arrives
            let wait = async {
                match self.due(start, cycle) {
                    Some(due) => sleep_until(due).await,
                    None => std::future::pending::<()>().await,
                }
            };

            tokio::select! {
                _ = &mut shutdown => break,
                _ = wait => {}
                Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                    if let Err(e) = joined {
                        error!(error = %e, "Scheduled run terminated abnormally");
                    }
                    continue;
                }
            }

            if cycle > 0 {
                info!(cycle, "Restarting quest run");
            }

            match self.overlap {
                OverlapPolicy::Skip => {
                    tokio::select! {
                        _ = &mut shutdown => break,
                        _ = job() => {}
                    }
                    cycle = self.next_cycle(start, cycle);
                }
                OverlapPolicy::Allow => {
                    if !in_flight.is_empty() {
                        warn!(
                            running = in_flight.len(),
                            "Previous run still in progress, starting another"
                        );
                    }
                    in_flight.spawn(job());
                    cycle = cycle.saturating_add(1);
                }
            }

            self.log_next_run(self.due(start, cycle));
        }

        info!("Shutdown requested, scheduler stopped");
        in_flight.abort_all();
    }

    /// Due time of `cycle`, if it fits in an `Instant`
    fn due(&self, start: Instant, cycle: u32) -> Option<Instant> {
        self.interval
            .checked_mul(cycle)
            .and_then(|offset| start.checked_add(offset))
    }

    /// First cycle whose due time is still ahead
    fn next_cycle(&self, start: Instant, cycle: u32) -> u32 {
        let elapsed = start.elapsed().as_nanos();
        let passed = (elapsed / self.interval.as_nanos()).min(u32::MAX as u128 - 1) as u32;
        let next = passed + 1;

        if next > cycle.saturating_add(1) {
            warn!(
                skipped = next - cycle - 1,
                "Run overran its interval, skipping missed runs"
            );
        }

        next.max(cycle.saturating_add(1))
    }

    fn log_next_run(&self, due: Option<Instant>) {
        let Some(due) = due else {
            warn!("Next run is too far ahead to schedule");
            return;
        };

        let wait = due.saturating_duration_since(Instant::now());
        let at = OffsetDateTime::now_utc()
            .checked_add(wait.try_into().unwrap_or(time::Duration::MAX))
            .and_then(|at| at.format(&Rfc3339).ok())
            .unwrap_or_else(|| "unknown".to_string());

        info!(next_run = %at, wait_secs = wait.as_secs(), "Next quest run scheduled");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::oneshot;
    use tokio::time::sleep;

    const DAY: Duration = Duration::from_secs(24 * 60 * 60);
    const HOUR: Duration = Duration::from_secs(60 * 60);

    /// Job that counts starts and tracks peak concurrency
    #[derive(Clone, Default)]
    struct JobTracker {
        runs: Arc<AtomicUsize>,
        active: Arc<AtomicUsize>,
        peak: Arc<AtomicUsize>,
    }

    impl JobTracker {
        fn job(
            &self,
            duration: Duration,
        ) -> impl FnMut() -> std::pin::Pin<Box<dyn Future<Output = ()> + Send>> + use<> {
            let tracker = self.clone();
            move || {
                let tracker = tracker.clone();
                tracker.runs.fetch_add(1, Ordering::SeqCst);
                Box::pin(async move {
                    let now = tracker.active.fetch_add(1, Ordering::SeqCst) + 1;
                    tracker.peak.fetch_max(now, Ordering::SeqCst);
                    sleep(duration).await;
                    tracker.active.fetch_sub(1, Ordering::SeqCst);
                })
            }
        }

        fn runs(&self) -> usize {
            self.runs.load(Ordering::SeqCst)
        }

        fn peak(&self) -> usize {
            self.peak.load(Ordering::SeqCst)
        }
    }

    fn spawn_scheduler(
        scheduler: Scheduler,
        tracker: &JobTracker,
        duration: Duration,
    ) -> (oneshot::Sender<()>, tokio::task::JoinHandle<()>) {
        let (tx, rx) = oneshot::channel::<()>();
        let job = tracker.job(duration);
        let handle = tokio::spawn(async move {
            scheduler
                .run(job, async {
                    let _ = rx.await;
                })
                .await;
        });
        (tx, handle)
    }

    #[tokio::test(start_paused = true)]
    async fn test_runs_immediately_then_after_interval() {
        let tracker = JobTracker::default();
        let (stop, handle) =
            spawn_scheduler(Scheduler::new(DAY, OverlapPolicy::Skip), &tracker, HOUR);

        sleep(Duration::from_secs(1)).await;
        assert_eq!(tracker.runs(), 1);

        sleep(DAY - Duration::from_secs(2)).await;
        assert_eq!(tracker.runs(), 1, "re-run before the interval elapsed");

        sleep(Duration::from_secs(2)).await;
        assert_eq!(tracker.runs(), 2);

        sleep(DAY).await;
        assert_eq!(tracker.runs(), 3);

        stop.send(()).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_skip_policy_prevents_overlap() {
        let tracker = JobTracker::default();
        let (stop, handle) = spawn_scheduler(
            Scheduler::new(DAY, OverlapPolicy::Skip),
            &tracker,
            DAY + DAY / 2,
        );

        // The 24h slot passes while the first run is still going
        sleep(DAY * 2 - HOUR).await;
        assert_eq!(tracker.runs(), 1);

        sleep(HOUR * 2).await;
        assert_eq!(tracker.runs(), 2);
        assert_eq!(tracker.peak(), 1);

        stop.send(()).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_allow_policy_overlaps_runs() {
        let tracker = JobTracker::default();
        let (stop, handle) = spawn_scheduler(
            Scheduler::new(DAY, OverlapPolicy::Allow),
            &tracker,
            DAY + DAY / 2,
        );

        sleep(DAY + HOUR).await;
        assert_eq!(tracker.runs(), 2);
        assert_eq!(tracker.peak(), 2);

        sleep(DAY).await;
        assert_eq!(tracker.runs(), 3);

        stop.send(()).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_interrupts_running_job() {
        let tracker = JobTracker::default();
        let (stop, handle) =
            spawn_scheduler(Scheduler::new(DAY, OverlapPolicy::Skip), &tracker, DAY * 10);

        sleep(HOUR).await;
        stop.send(()).unwrap();
        handle.await.unwrap();

        assert_eq!(tracker.runs(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_huge_interval_does_not_overflow() {
        let tracker = JobTracker::default();
        let scheduler = Scheduler::new(Duration::MAX, OverlapPolicy::Skip);
        let (stop, handle) = spawn_scheduler(scheduler, &tracker, HOUR);

        sleep(DAY * 30).await;
        assert_eq!(tracker.runs(), 1);

        stop.send(()).unwrap();
        handle.await.unwrap();
    }

    #[test]
    fn test_zero_interval_clamped() {
        let scheduler = Scheduler::new(Duration::ZERO, OverlapPolicy::Skip);
        assert_eq!(scheduler.interval, Duration::from_millis(1));
    }
}
