//! Batch runner - pushes every account through a fixed-size worker pool
//!
//! Architecture:
//! 1. All account ids are queued on a bounded mpsc channel in file order
//! 2. `concurrency` slots share the receiver and pull the next account
//!    as soon as they finish their current one
//! 3. Each slot collects its own outcomes; the runner joins every slot
//!    before returning, so a batch ends only when all accounts are done
//!
//! Failures never escape a slot: the account worker logs and records them.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, mpsc};
use tokio::time::Instant;
use tracing::{Instrument, debug, error, info, info_span};
use uuid::Uuid;

use crate::client::QuestApi;
use crate::inputs::AccountId;
use crate::worker::{AccountOutcome, AccountWorker};

/// Result of one batch cycle
#[derive(Debug)]
pub struct BatchSummary {
    pub run_id: Uuid,
    pub succeeded: usize,
    pub failed: usize,
    pub elapsed: Duration,
    /// In account file order
    pub outcomes: Vec<AccountOutcome>,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }
}

pub struct BatchRunner<A> {
    worker: Arc<AccountWorker<A>>,
    accounts: Arc<[AccountId]>,
    concurrency: usize,
}

impl<A: QuestApi + 'static> BatchRunner<A> {
    pub fn new(worker: AccountWorker<A>, accounts: Vec<AccountId>, concurrency: usize) -> Self {
        Self {
            worker: Arc::new(worker),
            accounts: accounts.into(),
            concurrency: concurrency.max(1),
        }
    }

    pub fn accounts(&self) -> &[AccountId] {
        &self.accounts
    }

    /// Run every account once and wait for all of them
    pub async fn run_once(&self) -> BatchSummary {
        let run_id = Uuid::new_v4();
        let span = info_span!("batch", %run_id);

        async {
            info!(
                accounts = self.accounts.len(),
                concurrency = self.concurrency,
                "Starting quest run"
            );
            let started = Instant::now();

            let outcomes = self.drain().await;

            let succeeded = outcomes.iter().filter(|o| o.is_success()).count();
            let summary = BatchSummary {
                run_id,
                succeeded,
                failed: outcomes.len() - succeeded,
                elapsed: started.elapsed(),
                outcomes,
            };

            info!(
                total = summary.total(),
                succeeded = summary.succeeded,
                failed = summary.failed,
                elapsed_ms = summary.elapsed.as_millis() as u64,
                "All tasks complete"
            );

            summary
        }
        .instrument(span)
        .await
    }

    async fn drain(&self) -> Vec<AccountOutcome> {
        let (tx, rx) = mpsc::channel::<(usize, AccountId)>(self.accounts.len().max(1));
        for (index, account) in self.accounts.iter().enumerate() {
            // Capacity covers every account, so this never waits
            if tx.send((index, account.clone())).await.is_err() {
                break;
            }
        }
        drop(tx);

        let receiver = Arc::new(Mutex::new(rx));
        let slots = self.concurrency.min(self.accounts.len());
        let mut handles = Vec::with_capacity(slots);

        for slot in 0..slots {
            let receiver = Arc::clone(&receiver);
            let worker = Arc::clone(&self.worker);

            handles.push(tokio::spawn(
                async move {
                    let mut done = Vec::new();
                    loop {
                        let next = {
                            let mut guard = receiver.lock().await;
                            guard.recv().await
                        };

                        let Some((index, account)) = next else {
                            break;
                        };

                        debug!(slot, index, "Slot picked up account");
                        done.push((index, worker.run(account).await));
                    }
                    done
                }
                .in_current_span(),
            ));
        }

        let mut outcomes = Vec::with_capacity(self.accounts.len());
        for handle in handles {
            match handle.await {
                Ok(done) => outcomes.extend(done),
                Err(e) => error!(error = %e, "Worker slot terminated abnormally"),
            }
        }

        outcomes.sort_by_key(|(index, _)| *index);
        outcomes.into_iter().map(|(_, outcome)| outcome).collect()
    }
}
