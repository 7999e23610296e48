// lyrics/mod.rs - lyric documents and the providers that supply them
pub mod parse;
pub mod providers;
pub mod types;

pub use parse::LyricDocument;
pub use providers::{LyricsProvider, fetch_for_track};
pub use types::LyricTexts;
