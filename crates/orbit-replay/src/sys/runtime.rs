use crate::events::SimEvent;
use async_channel::Sender;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;
use tokio::runtime::Runtime;
use tokio::time::{Instant, MissedTickBehavior};

const FRAME_INTERVAL: Duration = Duration::from_micros(16_667);

pub struct Services {
    pub script: PathBuf,
    pub watch: bool,
}

/// Runs the script feed, the frame clock and the optional config watcher on a background runtime.
pub fn start_background_services(
    services: Services,
    tx: Sender<SimEvent>,
) -> std::io::Result<()> {
    let rt = Runtime::new()?;
    let Services { script, watch } = services;

    thread::spawn(move || {
        rt.block_on(async {
            let start = Instant::now();

            {
                let tx = tx.clone();
                tokio::spawn(async move {
                    crate::sys::script::feed_script(script, tx, start).await;
                });
            }

            {
                let tx = tx.clone();
                tokio::spawn(async move {
                    run_frame_clock(tx, start).await;
                });
            }

            if watch {
                let tx = tx.clone();
                tokio::spawn(async move {
                    crate::config::watch_tuning(tx).await;
                });
            }

            std::future::pending::<()>().await;
        });
    });
    Ok(())
}

async fn run_frame_clock(tx: Sender<SimEvent>, start: Instant) {
    let mut interval = tokio::time::interval(FRAME_INTERVAL);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        let now = interval.tick().await;
        if tx.send(SimEvent::Tick(now - start)).await.is_err() {
            break;
        }
    }
}
