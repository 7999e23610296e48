//! Media-session sampling: pick the active MPRIS player and read its timeline.

use async_trait::async_trait;

use crate::mpris::connection::{MprisError, get_active_player_names, is_blocked};
use crate::mpris::metadata::get_metadata;
use crate::mpris::playback::{get_playback_status, get_position};
use crate::timer::{PlaybackSample, wall_clock_now};

/// Source of ground-truth playback samples.
///
/// `Ok(None)` means no session is active; errors are collaborator failures.
#[async_trait]
pub trait MediaSession: Send + Sync {
    async fn current_sample(&self) -> Result<Option<PlaybackSample>, MprisError>;
}

/// MPRIS over the D-Bus session bus.
pub struct MprisSession {
    block_list: Vec<String>,
}

impl MprisSession {
    pub fn new(block_list: Vec<String>) -> Self {
        Self { block_list }
    }

    /// First playing player wins; otherwise the first paused one.
    async fn pick_player(&self) -> Result<Option<(String, String)>, MprisError> {
        let mut fallback = None;
        for service in get_active_player_names().await? {
            if is_blocked(&service, &self.block_list) {
                continue;
            }
            let status = match get_playback_status(&service).await {
                Ok(status) => status,
                Err(e) => {
                    tracing::debug!(service = %service, error = %e, "skipping unresponsive player");
                    continue;
                }
            };
            if status == "Playing" {
                return Ok(Some((service, status)));
            }
            if status != "Stopped" && fallback.is_none() {
                fallback = Some((service, status));
            }
        }
        Ok(fallback)
    }
}

#[async_trait]
impl MediaSession for MprisSession {
    async fn current_sample(&self) -> Result<Option<PlaybackSample>, MprisError> {
        let Some((service, status)) = self.pick_player().await? else {
            return Ok(None);
        };
        let meta = get_metadata(&service).await?;
        if meta.title.is_empty() && meta.artist.is_empty() {
            return Ok(None);
        }
        let position = get_position(&service).await?;
        Ok(Some(PlaybackSample::new(
            &meta.title,
            &meta.artist,
            status == "Playing",
            position,
            meta.length.unwrap_or(0.0),
            wall_clock_now(),
        )))
    }
}
