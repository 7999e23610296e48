pub mod lrclib;
pub mod netease;

use std::sync::Arc;

use async_trait::async_trait;

use crate::lyrics::types::{LyricTexts, LyricsError, SongId};

pub use lrclib::Lrclib;
pub use netease::Netease;

/// A lyrics catalogue: resolve a song, then download its LRC text.
#[async_trait]
pub trait LyricsProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn find_song_id(
        &self,
        title: &str,
        artist: &str,
        duration: Option<f64>,
    ) -> Result<Option<SongId>, LyricsError>;

    async fn fetch_lyrics(&self, id: &SongId) -> Result<Option<LyricTexts>, LyricsError>;
}

/// Build providers from configured names, preserving order. Unknown names are skipped.
pub fn from_names(names: &[String]) -> Vec<Arc<dyn LyricsProvider>> {
    let mut out: Vec<Arc<dyn LyricsProvider>> = Vec::new();
    for name in names {
        match name.as_str() {
            "netease" => out.push(Arc::new(Netease)),
            "lrclib" => out.push(Arc::new(Lrclib)),
            other => tracing::warn!(provider = other, "unknown lyric provider"),
        }
    }
    out
}

/// Try each provider in order and return the first non-empty lyrics.
///
/// Provider errors are logged and the next provider is tried; `None` means
/// no provider had lyrics for this track.
pub async fn fetch_for_track(
    providers: &[Arc<dyn LyricsProvider>],
    title: &str,
    artist: &str,
    duration: Option<f64>,
) -> Option<LyricTexts> {
    for provider in providers {
        match fetch_from(provider.as_ref(), title, artist, duration).await {
            Ok(Some(texts)) if !texts.primary.trim().is_empty() => {
                tracing::info!(provider = provider.name(), title, artist, "lyrics found");
                return Some(texts);
            }
            Ok(_) => {
                tracing::debug!(provider = provider.name(), title, artist, "no lyrics");
            }
            Err(e) => {
                tracing::warn!(provider = provider.name(), error = %e, "lyric provider failed");
            }
        }
    }
    None
}

async fn fetch_from(
    provider: &dyn LyricsProvider,
    title: &str,
    artist: &str,
    duration: Option<f64>,
) -> Result<Option<LyricTexts>, LyricsError> {
    let Some(id) = provider.find_song_id(title, artist, duration).await? else {
        return Ok(None);
    };
    tracing::debug!(provider = provider.name(), id = %id, "resolved song id");
    provider.fetch_lyrics(&id).await
}


#[cfg(test)]
mod tests {
    use super::testing::StaticProvider;
    use super::*;
    use std::sync::atomic::Ordering;

    #[test]
    fn test_from_names_keeps_order_and_skips_unknown() {
        let names = ["lrclib", "bogus", "netease"].map(String::from);
        let providers = from_names(&names);
        let got: Vec<_> = providers.iter().map(|p| p.name()).collect();
        assert_eq!(got, ["lrclib", "netease"]);
    }

    #[tokio::test]
    async fn test_fetch_falls_through_failures_and_misses() {
        let failing = Arc::new(StaticProvider::failing());
        let empty = Arc::new(StaticProvider::empty());
        let good = Arc::new(StaticProvider::with_lyrics("[00:01.000]hi", Some("[00:01.000]salut")));
        let providers: Vec<Arc<dyn LyricsProvider>> = vec![failing.clone(), empty.clone(), good.clone()];

        let texts = fetch_for_track(&providers, "Song", "Band", None).await;
        assert_eq!(texts.map(|t| t.translation), Some(Some("[00:01.000]salut".to_string())));
        assert_eq!(failing.lookups.load(Ordering::SeqCst), 1);
        assert_eq!(empty.lookups.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_fetch_stops_at_first_hit() {
        let first = Arc::new(StaticProvider::with_lyrics("[00:01.000]one", None));
        let second = Arc::new(StaticProvider::with_lyrics("[00:01.000]two", None));
        let providers: Vec<Arc<dyn LyricsProvider>> = vec![first, second.clone()];

        let texts = fetch_for_track(&providers, "Song", "Band", None).await;
        assert_eq!(texts.map(|t| t.primary), Some("[00:01.000]one".to_string()));
        assert_eq!(second.lookups.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_fetch_with_no_providers_is_none() {
        assert!(fetch_for_track(&[], "Song", "Band", None).await.is_none());
    }
}
