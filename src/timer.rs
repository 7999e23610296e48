use std::time::{SystemTime, UNIX_EPOCH};

/// Minimum wall-clock gap between two re-baselines while playing.
pub const RESYNC_INTERVAL: f64 = 5.0;

/// Ground-truth snapshot of the active media session.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSample {
    /// Song identity, `"{title}-{artist}"`.
    pub song_id: String,
    pub title: String,
    pub artist: String,
    pub is_playing: bool,
    pub position: f64,
    pub duration: f64,
    pub sampled_at: f64,
}

impl PlaybackSample {
    pub fn new(
        title: &str,
        artist: &str,
        is_playing: bool,
        position: f64,
        duration: f64,
        sampled_at: f64,
    ) -> Self {
        Self {
            song_id: format!("{}-{}", title, artist),
            title: title.to_string(),
            artist: artist.to_string(),
            is_playing,
            position,
            duration,
            sampled_at,
        }
    }
}

/// Emitted once per track change: lyrics for this song should be fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    pub song_id: String,
    pub title: String,
    pub artist: String,
    pub duration: f64,
}

/// Locally extrapolated playback clock, re-anchored from periodic samples.
///
/// Between samples the position advances with wall-clock time from the last
/// anchor (`timer_offset` at `last_update`). While a song is active the
/// reported position never moves backwards.
#[derive(Debug, Default, PartialEq)]
pub struct PlaybackClock {
    current_song_id: Option<String>,
    timer_offset: f64,
    last_update: f64,
    last_sync: f64,
    cached_position: f64,
    playing: bool,
    duration: f64,
    /// Playing flag of the previous sample; `None` before the first sample
    /// and after a session disappears.
    last_status: Option<bool>,
}

impl PlaybackClock {
    /// Feed one media-session sample taken at `now`.
    ///
    /// `None` means no active session. Returns a fetch request when the
    /// sample belongs to a different song than the current one.
    pub fn ingest(&mut self, sample: Option<&PlaybackSample>, now: f64) -> Option<FetchRequest> {
        let Some(sample) = sample else {
            self.playing = false;
            self.current_song_id = None;
            self.last_status = None;
            return None;
        };

        let position = sanitize_position(sample.position);
        self.playing = sample.is_playing;
        self.duration = sanitize_position(sample.duration);

        let mut request = None;
        if self.current_song_id.as_deref() != Some(sample.song_id.as_str()) {
            self.current_song_id = Some(sample.song_id.clone());
            self.rebaseline(position, now);
            self.cached_position = 0.0;
            tracing::info!(song = %sample.song_id, "song changed");
            request = Some(FetchRequest {
                song_id: sample.song_id.clone(),
                title: sample.title.clone(),
                artist: sample.artist.clone(),
                duration: self.duration,
            });
        } else if self.last_status == Some(false) && sample.is_playing {
            self.rebaseline(position, now);
            tracing::info!(position, "playback resumed, timer re-anchored");
        }

        if self.playing && now - self.last_sync >= RESYNC_INTERVAL {
            self.rebaseline(position, now);
            tracing::debug!(position, "periodic resync with player timeline");
        }

        self.last_status = Some(sample.is_playing);
        request
    }

    /// Current estimated position in seconds, clamped to the track length.
    ///
    /// While playing this ratchets the cached position forward, so it is a
    /// read that mutates: a later call never returns less than an earlier
    /// one for the same song unless playback is paused.
    pub fn current_position(&mut self, now: f64) -> f64 {
        if !self.playing {
            return self.cached_position;
        }

        let mut estimated = self.timer_offset + (now - self.last_update);
        if !estimated.is_finite() {
            estimated = self.timer_offset;
        }

        let position = if self.current_song_id.is_some() {
            self.cached_position.max(estimated)
        } else {
            estimated
        };
        self.cached_position = self.clamp(position);
        self.cached_position
    }

    pub fn current_song_id(&self) -> Option<&str> {
        self.current_song_id.as_deref()
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    fn rebaseline(&mut self, position: f64, now: f64) {
        self.timer_offset = position;
        self.last_update = now;
        self.last_sync = now;
    }

    // Players that do not report a length give 0; only the lower bound applies then.
    fn clamp(&self, position: f64) -> f64 {
        if self.duration > 0.0 {
            position.clamp(0.0, self.duration)
        } else {
            position.max(0.0)
        }
    }
}

pub fn sanitize_position(p: f64) -> f64 {
    if p.is_nan() || !p.is_finite() {
        0.0
    } else if p < 0.0 {
        // Negative positions are not meaningful; clamp to zero.
        0.0
    } else {
        p
    }
}

/// Seconds since the Unix epoch.
pub fn wall_clock_now() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}
