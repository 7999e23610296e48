//! MPRIS module: the D-Bus media-session binding that produces playback samples.

pub mod connection;
pub mod metadata;
pub mod playback;
pub mod session;

pub use connection::MprisError;
pub use session::{MediaSession, MprisSession};
