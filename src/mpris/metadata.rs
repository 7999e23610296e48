//! Minimal track metadata struct and metadata querying for MPRIS.

use crate::mpris::connection::{MprisError, get_dbus_conn};
use std::collections::HashMap;
use zbus::Proxy;
use zvariant::OwnedValue;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackMetadata {
    pub title: String,
    pub artist: String,
    /// Track length in seconds, when the player reports one.
    pub length: Option<f64>,
}

/// Extract metadata fields from a D-Bus `a{sv}` property map.
///
/// The MPRIS spec says artist is an array of strings, but some players send a
/// single string; both are accepted and the first artist wins.
pub fn extract_metadata(map: &HashMap<String, OwnedValue>) -> TrackMetadata {
    let string = |key: &str| {
        map.get(key)
            .and_then(|v| TryInto::<String>::try_into(v.clone()).ok())
    };
    let title = string("xesam:title").unwrap_or_default();
    let artist = map
        .get("xesam:artist")
        .and_then(|v| TryInto::<Vec<String>>::try_into(v.clone()).ok())
        .and_then(|v| v.into_iter().next())
        .or_else(|| string("xesam:artist"))
        .unwrap_or_default();
    let length = map.get("mpris:length").and_then(|v| {
        if let Ok(i) = TryInto::<i64>::try_into(v.clone()) {
            return Some(i as f64 / 1_000_000.0);
        }
        if let Ok(u) = TryInto::<u64>::try_into(v.clone()) {
            return Some(u as f64 / 1_000_000.0);
        }
        None
    });
    TrackMetadata { title, artist, length }
}

/// Query metadata for a specific MPRIS player service.
pub async fn get_metadata(service: &str) -> Result<TrackMetadata, MprisError> {
    if service.is_empty() {
        return Ok(TrackMetadata::default());
    }
    let conn = get_dbus_conn().await?;
    // Use targeted Properties.Get to avoid triggering GetAll
    let props_proxy = Proxy::new(&conn, service, "/org/mpris/MediaPlayer2", "org.freedesktop.DBus.Properties").await?;
    let reply = props_proxy
        .call_method("Get", &("org.mpris.MediaPlayer2.Player", "Metadata"))
        .await?;
    let val = reply.body().deserialize::<OwnedValue>()?;
    match TryInto::<HashMap<String, OwnedValue>>::try_into(val) {
        Ok(map) => Ok(extract_metadata(&map)),
        Err(_) => Ok(TrackMetadata::default()),
    }
}
