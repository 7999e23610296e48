use async_trait::async_trait;
use serde::Deserialize;

use crate::lyrics::providers::LyricsProvider;
use crate::lyrics::types::{LyricTexts, LyricsError, SongId, http_client};

#[derive(Deserialize)]
#[allow(non_snake_case)]
struct LrcLibResponse {
    id: Option<u64>,
    syncedLyrics: Option<String>,
}

/// Community-sourced synced lyrics from lrclib.net. Never has translations.
pub struct Lrclib;

#[async_trait]
impl LyricsProvider for Lrclib {
    fn name(&self) -> &'static str {
        "lrclib"
    }

    async fn find_song_id(
        &self,
        title: &str,
        artist: &str,
        duration: Option<f64>,
    ) -> Result<Option<SongId>, LyricsError> {
        let Some(response) = get(&build_lrclib_url(artist, title, duration)).await? else {
            return Ok(None);
        };
        Ok(response.id.map(|id| SongId(id.to_string())))
    }

    async fn fetch_lyrics(&self, id: &SongId) -> Result<Option<LyricTexts>, LyricsError> {
        let url = format!("https://lrclib.net/api/get/{}", urlencoding::encode(&id.0));
        let Some(response) = get(&url).await? else {
            return Ok(None);
        };
        Ok(response
            .syncedLyrics
            .filter(|s| !s.is_empty())
            .map(|primary| LyricTexts { primary, translation: None }))
    }
}

async fn get(url: &str) -> Result<Option<LrcLibResponse>, LyricsError> {
    let resp = http_client().get(url).send().await?;

    // 404 means no lyrics found - not an error
    if resp.status().as_u16() == 404 {
        return Ok(None);
    }
    if !resp.status().is_success() {
        return Err(LyricsError::Api(format!("lrclib: HTTP {}", resp.status())));
    }
    Ok(Some(resp.json().await?))
}

/// Build lrclib API URL with query parameters.
fn build_lrclib_url(artist: &str, title: &str, duration: Option<f64>) -> String {
    let mut params = vec![
        format!("artist_name={}", urlencoding::encode(artist)),
        format!("track_name={}", urlencoding::encode(title)),
    ];

    if let Some(d) = duration.filter(|d| *d > 0.0) {
        // API expects duration in seconds (integer)
        params.push(format!("duration={}", d.round() as i64));
    }

    format!("https://lrclib.net/api/get?{}", params.join("&"))
}
