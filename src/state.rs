// state.rs: Shared playback/lyrics state read by the HTTP handler and written by the sampler

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::lyrics::{LyricDocument, LyricTexts};
use crate::snapshot::{Snapshot, SongMeta, build_snapshot};
use crate::timer::{FetchRequest, PlaybackClock, PlaybackSample};

pub type SharedMonitor = Arc<Mutex<Monitor>>;

/// Primary and translation lyrics for one song, always replaced together.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LyricPair {
    pub song_id: String,
    pub primary: Option<LyricDocument>,
    pub translation: Option<LyricDocument>,
}

impl LyricPair {
    pub fn from_texts(song_id: &str, texts: Option<&LyricTexts>) -> Self {
        let Some(texts) = texts else {
            return Self { song_id: song_id.to_string(), ..Default::default() };
        };
        Self {
            song_id: song_id.to_string(),
            primary: Some(LyricDocument::parse(&texts.primary)),
            translation: texts.translation.as_deref().map(LyricDocument::parse),
        }
    }
}

/// Everything the sampler writes and the HTTP handler reads.
#[derive(Debug, Default)]
pub struct Monitor {
    clock: PlaybackClock,
    song: Option<SongMeta>,
    lyrics: Option<LyricPair>,
}

impl Monitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedMonitor {
        Arc::new(Mutex::new(Self::new()))
    }

    /// Ingest a media-session sample. On a track change the previous song's
    /// lyrics are dropped and a fetch request is returned.
    pub fn ingest(&mut self, sample: Option<&PlaybackSample>, now: f64) -> Option<FetchRequest> {
        let request = self.clock.ingest(sample, now);
        if let Some(sample) = sample {
            self.song = Some(SongMeta::new(&sample.title, &sample.artist));
        }
        if request.is_some() {
            self.lyrics = None;
        }
        request
    }

    /// Install a fetched lyric pair if it still belongs to the current song.
    /// Returns `false` when the result was stale and discarded.
    pub fn apply_lyrics(&mut self, pair: LyricPair) -> bool {
        if self.clock.current_song_id() != Some(pair.song_id.as_str()) {
            tracing::debug!(song = %pair.song_id, "discarding stale lyrics");
            return false;
        }
        self.lyrics = Some(pair);
        true
    }

    pub fn snapshot(&mut self, now: f64) -> Snapshot {
        let lyrics = self.lyrics.as_ref();
        build_snapshot(
            &mut self.clock,
            lyrics.and_then(|l| l.primary.as_ref()),
            lyrics.and_then(|l| l.translation.as_ref()),
            self.song.as_ref(),
            now,
        )
    }

    #[cfg(test)]
    pub fn lyrics(&self) -> Option<&LyricPair> {
        self.lyrics.as_ref()
    }

    #[cfg(test)]
    pub fn current_song_id(&self) -> Option<&str> {
        self.clock.current_song_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(title: &str, position: f64) -> PlaybackSample {
        PlaybackSample::new(title, "Band", true, position, 240.0, 0.0)
    }

    fn texts(primary: &str, translation: Option<&str>) -> LyricTexts {
        LyricTexts {
            primary: primary.to_string(),
            translation: translation.map(str::to_string),
        }
    }

    #[test]
    fn test_lyrics_applied_for_current_song() {
        let mut monitor = Monitor::new();
        let req = monitor.ingest(Some(&sample("A", 0.0)), 0.0).unwrap();
        let pair = LyricPair::from_texts(
            &req.song_id,
            Some(&texts("[00:00.000]hello", Some("[00:00.000]bonjour"))),
        );
        assert!(monitor.apply_lyrics(pair));

        let snap = monitor.snapshot(1.0);
        assert_eq!(snap.lyric, "hello");
        assert_eq!(snap.translated_lyric, "bonjour");
    }

    #[test]
    fn test_stale_fetch_is_discarded() {
        let mut monitor = Monitor::new();
        let first = monitor.ingest(Some(&sample("A", 0.0)), 0.0).unwrap();
        let second = monitor.ingest(Some(&sample("B", 0.0)), 1.0).unwrap();

        let stale = LyricPair::from_texts(&first.song_id, Some(&texts("[00:00.000]from A", None)));
        assert!(!monitor.apply_lyrics(stale));
        assert!(monitor.lyrics().is_none());
        assert_eq!(monitor.snapshot(2.0).lyric, "");

        let fresh = LyricPair::from_texts(&second.song_id, Some(&texts("[00:00.000]from B", None)));
        assert!(monitor.apply_lyrics(fresh));
        assert_eq!(monitor.lyrics().map(|l| l.song_id.as_str()), Some("B-Band"));
        assert_eq!(monitor.snapshot(2.0).lyric, "from B");
    }

    #[test]
    fn test_lyrics_after_session_lost_are_discarded() {
        let mut monitor = Monitor::new();
        let req = monitor.ingest(Some(&sample("A", 0.0)), 0.0).unwrap();
        monitor.ingest(None, 1.0);
        let pair = LyricPair::from_texts(&req.song_id, Some(&texts("[00:00.000]x", None)));
        assert!(!monitor.apply_lyrics(pair));
    }

    #[test]
    fn test_track_change_drops_previous_pair() {
        let mut monitor = Monitor::new();
        let req = monitor.ingest(Some(&sample("A", 0.0)), 0.0).unwrap();
        monitor.apply_lyrics(LyricPair::from_texts(
            &req.song_id,
            Some(&texts("[00:00.000]a", Some("[00:00.000]b"))),
        ));
        monitor.ingest(Some(&sample("B", 0.0)), 1.0);
        let snap = monitor.snapshot(1.5);
        assert_eq!(snap.title, "B");
        assert_eq!(snap.lyric, "");
        assert_eq!(snap.translated_lyric, "");
    }

    #[test]
    fn test_no_lyrics_found_pair() {
        let pair = LyricPair::from_texts("A-Band", None);
        assert!(pair.primary.is_none());
        assert!(pair.translation.is_none());
    }

    #[test]
    fn test_snapshot_before_any_sample_is_empty() {
        let mut monitor = Monitor::new();
        assert_eq!(monitor.snapshot(10.0), Snapshot::default());
        // Failed sampling never reaches the monitor, so it stays empty.
        monitor.ingest(None, 11.0);
        assert_eq!(monitor.snapshot(12.0), Snapshot::default());
    }

    #[test]
    fn test_song_stays_visible_without_session() {
        let mut monitor = Monitor::new();
        monitor.ingest(Some(&sample("A", 30.0)), 0.0);
        assert_eq!(monitor.snapshot(2.0).now_seconds, 32);
        monitor.ingest(None, 3.0);
        let snap = monitor.snapshot(100.0);
        assert_eq!(snap.title, "A");
        assert_eq!(snap.now_seconds, 32);
    }
}
