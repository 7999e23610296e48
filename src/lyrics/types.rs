use once_cell::sync::Lazy;
use reqwest::Client;
use thiserror::Error;

// Shared HTTP client with reasonable defaults for timeouts
static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .user_agent("lrcwall/0.1")
        .timeout(std::time::Duration::from_secs(10))
        .build()
        .unwrap_or_default()
});

/// One timestamped lyric line. Immutable once parsed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LyricLine {
    pub time: f64,
    pub text: String,
}

/// Provider-specific identifier of a song in a lyrics catalogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongId(pub String);

impl std::fmt::Display for SongId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Raw LRC text returned by a provider: the original lyric plus an optional
/// translation track.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LyricTexts {
    pub primary: String,
    pub translation: Option<String>,
}

#[derive(Error, Debug)]
pub enum LyricsError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("API error: {0}")]
    Api(String),
    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub(crate) fn http_client() -> &'static Client {
    &HTTP_CLIENT
}
