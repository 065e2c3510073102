use crate::logger;
use crate::models::Stats;
use crate::session::SessionEvent;
use crate::store::AccountStore;
use crossbeam_channel::{Receiver, Sender};
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatsRequest {
    Save { email: String, stats: Stats },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatsResponse {
    Saved { email: String, stats: Stats },
    Failed { email: String, error: String },
}

/// Turns session events into absolute stats writes.
///
/// `baseline` is what the store held when the user signed in plus every
/// finished question list since. Each answer sends `baseline + score`, so a
/// lost write is repaired by the next one.
///
/// `in_flight` counts requests sent and not yet answered by the worker. The
/// receiver of [`StatsResponse`]s decrements it.
#[derive(Debug)]
pub struct StatsRecorder {
    email: String,
    baseline: Stats,
    tx: Sender<StatsRequest>,
    in_flight: Arc<AtomicUsize>,
}

impl StatsRecorder {
    pub fn new(email: impl Into<String>, baseline: Stats, tx: Sender<StatsRequest>) -> Self {
        Self {
            email: email.into(),
            baseline,
            tx,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_in_flight(mut self, in_flight: Arc<AtomicUsize>) -> Self {
        self.in_flight = in_flight;
        self
    }

    pub fn baseline(&self) -> Stats {
        self.baseline
    }

    pub fn observe(&mut self, event: &SessionEvent) {
        match event {
            SessionEvent::Answered { score, .. } => {
                let stats = self.baseline.plus(score);
                let request = StatsRequest::Save {
                    email: self.email.clone(),
                    stats,
                };
                // Counted before sending so a fast reply never finds zero.
                self.in_flight.fetch_add(1, Ordering::SeqCst);
                if self.tx.send(request).is_err() {
                    self.in_flight.fetch_sub(1, Ordering::SeqCst);
                    logger::error("Stats worker is gone, dropping stats update");
                }
            }
            SessionEvent::Restarted { previous, .. } | SessionEvent::Replaced { previous, .. } => {
                self.baseline = self.baseline.plus(previous);
            }
            SessionEvent::Completed(_) => {}
        }
    }
}

pub fn spawn_stats_worker<S>(
    store: S,
    tx: Sender<StatsResponse>,
    rx: Receiver<StatsRequest>,
) -> io::Result<thread::JoinHandle<()>>
where
    S: AccountStore + Send + 'static,
{
    thread::Builder::new()
        .name("libras-quiz::stats_worker".to_string())
        .spawn(move || {
            // Exits once every request sender is dropped.
            for request in rx.iter() {
                let StatsRequest::Save { email, stats } = request;
                let response = match store.update_stats(&email, &stats) {
                    Ok(()) => {
                        logger::log(&format!("Saved stats for {}: {:?}", email, stats));
                        StatsResponse::Saved { email, stats }
                    }
                    Err(e) => {
                        logger::error(&format!("Failed to save stats for {}: {}", email, e));
                        StatsResponse::Failed {
                            email,
                            error: e.to_string(),
                        }
                    }
                };
                if tx.send(response).is_err() {
                    break;
                }
            }
            logger::log("Stats worker channel disconnected, exiting");
        })
}
