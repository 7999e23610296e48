use async_trait::async_trait;
use serde::Deserialize;

use crate::lyrics::providers::LyricsProvider;
use crate::lyrics::types::{LyricTexts, LyricsError, SongId, http_client};

const SEARCH_URL: &str = "https://music.163.com/api/search/get/web";
const LYRIC_URL: &str = "https://api.vkeys.cn/v2/music/netease/lyric";

#[derive(Deserialize)]
struct SearchResponse {
    result: Option<SearchResult>,
}

#[derive(Deserialize)]
struct SearchResult {
    #[serde(default)]
    songs: Vec<SearchSong>,
}

#[derive(Deserialize)]
struct SearchSong {
    id: u64,
}

#[derive(Deserialize)]
struct LyricResponse {
    data: Option<LyricData>,
}

#[derive(Deserialize)]
struct LyricData {
    lrc: Option<String>,
    trans: Option<String>,
}

/// NetEase Cloud Music search, with lyrics (and translations) served by the
/// vkeys mirror.
pub struct Netease;

#[async_trait]
impl LyricsProvider for Netease {
    fn name(&self) -> &'static str {
        "netease"
    }

    async fn find_song_id(
        &self,
        title: &str,
        artist: &str,
        _duration: Option<f64>,
    ) -> Result<Option<SongId>, LyricsError> {
        let resp = http_client().get(build_search_url(title, artist)).send().await?;
        if !resp.status().is_success() {
            return Err(LyricsError::Api(format!("netease search: HTTP {}", resp.status())));
        }
        let body: SearchResponse = serde_json::from_str(&resp.text().await?)?;
        Ok(first_song_id(body))
    }

    async fn fetch_lyrics(&self, id: &SongId) -> Result<Option<LyricTexts>, LyricsError> {
        let url = format!("{}?id={}", LYRIC_URL, urlencoding::encode(&id.0));
        let resp = http_client().get(&url).send().await?;
        if !resp.status().is_success() {
            return Err(LyricsError::Api(format!("netease lyric: HTTP {}", resp.status())));
        }
        let body: LyricResponse = serde_json::from_str(&resp.text().await?)?;
        Ok(into_texts(body))
    }
}

fn build_search_url(title: &str, artist: &str) -> String {
    let query = format!("{} {}", title, artist);
    format!(
        "{}?s={}&type=1&offset=0&total=true&limit=10",
        SEARCH_URL,
        urlencoding::encode(query.trim())
    )
}

fn first_song_id(body: SearchResponse) -> Option<SongId> {
    body.result?
        .songs
        .first()
        .map(|song| SongId(song.id.to_string()))
}

fn into_texts(body: LyricResponse) -> Option<LyricTexts> {
    let data = body.data?;
    let primary = data.lrc.filter(|s| !s.is_empty())?;
    let translation = data.trans.filter(|s| !s.trim().is_empty());
    Some(LyricTexts { primary, translation })
}
