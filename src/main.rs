use questbot::batch::BatchRunner;
use questbot::client::HttpQuestClient;
use questbot::config::Config;
use questbot::inputs::Inputs;
use questbot::observability;
use questbot::scheduler::Scheduler;
use questbot::worker::{AccountWorker, WorkerSettings};
use std::sync::Arc;
use tracing::{error, info};

type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), AnyError> {
    let config = Config::load()?;
    observability::init_tracing(&config.log)?;
    if let Some(path) = &config.source {
        info!("Loaded configuration from: {}", path.display());
    }

    let inputs = Inputs::load(&config)?;
    let api = Arc::new(HttpQuestClient::new(&config.api)?);
    let worker = AccountWorker::new(api, inputs.user_agents, WorkerSettings::from_config(&config));
    let runner = Arc::new(BatchRunner::new(worker, inputs.accounts, config.concurrency));
    let scheduler = Scheduler::from_config(&config.schedule);

    info!(
        accounts = runner.accounts().len(),
        concurrency = config.concurrency,
        interval_secs = config.schedule.interval_secs,
        overlap = ?config.schedule.overlap,
        "questbot starting"
    );

    scheduler
        .run(
            move || {
                let runner = Arc::clone(&runner);
                async move {
                    runner.run_once().await;
                }
            },
            shutdown_signal(),
        )
        .await;

    Ok(())
}

async fn shutdown_signal() {
    // Wait for Ctrl+C
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}
