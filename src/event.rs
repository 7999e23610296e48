// event.rs: Periodic media-session sampling and out-of-band lyric fetches

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::lyrics::{LyricsProvider, fetch_for_track};
use crate::mpris::{MediaSession, MprisError};
use crate::state::{LyricPair, SharedMonitor};
use crate::timer::{FetchRequest, wall_clock_now};

/// Drives the monitor from a media session and keeps at most one lyric
/// fetch in flight.
pub struct Sampler<S> {
    session: S,
    monitor: SharedMonitor,
    providers: Arc<Vec<Arc<dyn LyricsProvider>>>,
    pending: Option<JoinHandle<()>>,
}

impl<S: MediaSession> Sampler<S> {
    pub fn new(session: S, monitor: SharedMonitor, providers: Vec<Arc<dyn LyricsProvider>>) -> Self {
        Self {
            session,
            monitor,
            providers: Arc::new(providers),
            pending: None,
        }
    }

    /// Take one sample and ingest it. On error the monitor is left untouched.
    pub async fn tick(&mut self) -> Result<(), MprisError> {
        let sample = self.session.current_sample().await?;
        let now = sample.as_ref().map_or_else(wall_clock_now, |s| s.sampled_at);
        let request = self.monitor.lock().await.ingest(sample.as_ref(), now);
        if let Some(request) = request {
            self.spawn_fetch(request);
        }
        Ok(())
    }

    /// Sample forever: `poll_interval` between good samples, `backoff` after a failure.
    pub async fn run(mut self, poll_interval: Duration, backoff: Duration) {
        loop {
            let outcome = self.tick().await;
            tokio::time::sleep(next_delay(&outcome, poll_interval, backoff)).await;
        }
    }

    fn spawn_fetch(&mut self, request: FetchRequest) {
        // A newer track supersedes whatever is still downloading.
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
        let monitor = self.monitor.clone();
        let providers = self.providers.clone();
        self.pending = Some(tokio::spawn(fetch_lyrics(request, providers, monitor)));
    }

    #[cfg(test)]
    async fn finish_fetch(&mut self) {
        if let Some(handle) = self.pending.take() {
            let _ = handle.await;
        }
    }
}

fn next_delay(outcome: &Result<(), MprisError>, poll_interval: Duration, backoff: Duration) -> Duration {
    match outcome {
        Ok(()) => poll_interval,
        Err(e) => {
            tracing::warn!(error = %e, backoff_ms = backoff.as_millis() as u64, "sampling failed, backing off");
            backoff
        }
    }
}

async fn fetch_lyrics(
    request: FetchRequest,
    providers: Arc<Vec<Arc<dyn LyricsProvider>>>,
    monitor: SharedMonitor,
) {
    let duration = (request.duration > 0.0).then_some(request.duration);
    let texts = fetch_for_track(&providers, &request.title, &request.artist, duration).await;
    if texts.is_none() {
        tracing::info!(song = %request.song_id, "no lyrics found");
    }
    let pair = LyricPair::from_texts(&request.song_id, texts.as_ref());
    monitor.lock().await.apply_lyrics(pair);
}
