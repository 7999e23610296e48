// snapshot.rs: The externally visible now-playing state served over HTTP

use serde::Serialize;

use crate::lyrics::LyricDocument;
use crate::timer::PlaybackClock;

/// Current line and timing as consumed by the wallpaper renderer.
///
/// Field names are a compatibility contract with the renderer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub title: String,
    pub artist: String,
    pub all_time_seconds: u64,
    pub now_seconds: u64,
    pub lyric: String,
    pub translated_lyric: String,
    pub formatted_time: String,
}

/// Title and artist of the song last seen in the media session.
#[derive(Debug, Clone, PartialEq)]
pub struct SongMeta {
    pub title: String,
    pub artist: String,
}

impl SongMeta {
    pub fn new(title: &str, artist: &str) -> Self {
        let or = |s: &str, fallback: &str| {
            if s.trim().is_empty() { fallback.to_string() } else { s.to_string() }
        };
        Self {
            title: or(title, "Unknown Title"),
            artist: or(artist, "Unknown Artist"),
        }
    }
}

/// Assemble the snapshot at wall-clock `now`.
///
/// Without song metadata this is the empty default. Reading the clock
/// advances its monotonic ratchet; nothing else is mutated.
pub fn build_snapshot(
    clock: &mut PlaybackClock,
    primary: Option<&LyricDocument>,
    translation: Option<&LyricDocument>,
    song: Option<&SongMeta>,
    now: f64,
) -> Snapshot {
    let Some(song) = song else {
        return Snapshot::default();
    };

    let position = clock.current_position(now);
    let duration = clock.duration();
    let line_at = |doc: Option<&LyricDocument>| doc.map(|d| d.line_at(position).to_string()).unwrap_or_default();

    Snapshot {
        title: song.title.clone(),
        artist: song.artist.clone(),
        all_time_seconds: whole_seconds(duration),
        now_seconds: whole_seconds(position),
        lyric: line_at(primary),
        translated_lyric: line_at(translation),
        formatted_time: format!("({}/{})", format_time(position), format_time(duration)),
    }
}

/// `MM:SS` with zero padding; minutes are not wrapped into hours.
pub fn format_time(seconds: f64) -> String {
    let total = whole_seconds(seconds);
    format!("{:02}:{:02}", total / 60, total % 60)
}

fn whole_seconds(seconds: f64) -> u64 {
    if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::PlaybackSample;

    fn playing_clock(position: f64, duration: f64) -> PlaybackClock {
        let mut clock = PlaybackClock::default();
        clock.ingest(
            Some(&PlaybackSample::new("Song", "Band", true, position, duration, 0.0)),
            0.0,
        );
        clock
    }

    #[test]
    fn test_empty_without_song() {
        let mut clock = playing_clock(10.0, 100.0);
        let doc = LyricDocument::parse("[00:00.000]x");
        let snap = build_snapshot(&mut clock, Some(&doc), Some(&doc), None, 5.0);
        assert_eq!(snap, Snapshot::default());
        assert_eq!(snap.title, "");
        assert_eq!(snap.formatted_time, "");
        assert_eq!(snap.now_seconds, 0);
        assert_eq!(snap.all_time_seconds, 0);
    }

    #[test]
    fn test_snapshot_fields() {
        let mut clock = playing_clock(60.0, 185.9);
        let primary = LyricDocument::parse("[00:59.000]one\n[01:05.000]two");
        let translation = LyricDocument::parse("[00:59.000]uno");
        let song = SongMeta::new("Song", "Band");

        let snap = build_snapshot(&mut clock, Some(&primary), Some(&translation), Some(&song), 5.5);
        assert_eq!(
            snap,
            Snapshot {
                title: "Song".to_string(),
                artist: "Band".to_string(),
                all_time_seconds: 185,
                now_seconds: 65,
                lyric: "two".to_string(),
                translated_lyric: "uno".to_string(),
                formatted_time: "(01:05/03:05)".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_documents_render_empty_lyrics() {
        let mut clock = playing_clock(1.0, 100.0);
        let song = SongMeta::new("Song", "Band");
        let snap = build_snapshot(&mut clock, None, None, Some(&song), 1.0);
        assert_eq!(snap.lyric, "");
        assert_eq!(snap.translated_lyric, "");
        assert_eq!(snap.formatted_time, "(00:02/01:40)");
    }

    #[test]
    fn test_same_instant_is_idempotent() {
        let mut clock = playing_clock(30.0, 200.0);
        let primary = LyricDocument::parse("[00:30.000]a\n[00:33.000]b");
        let song = SongMeta::new("Song", "Band");
        let first = build_snapshot(&mut clock, Some(&primary), None, Some(&song), 3.25);
        let second = build_snapshot(&mut clock, Some(&primary), None, Some(&song), 3.25);
        assert_eq!(first, second);
    }

    #[test]
    fn test_unknown_metadata_placeholders() {
        let song = SongMeta::new("", "  ");
        assert_eq!(song.title, "Unknown Title");
        assert_eq!(song.artist, "Unknown Artist");
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0.0), "00:00");
        assert_eq!(format_time(59.99), "00:59");
        assert_eq!(format_time(61.0), "01:01");
        assert_eq!(format_time(3725.0), "62:05");
        assert_eq!(format_time(-4.0), "00:00");
    }

    #[test]
    fn test_serializes_with_renderer_field_names() {
        let value = serde_json::to_value(Snapshot::default()).unwrap();
        let mut keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(
            keys,
            ["allTimeSeconds", "artist", "formattedTime", "lyric", "nowSeconds", "title", "translatedLyric"]
        );
    }
}
