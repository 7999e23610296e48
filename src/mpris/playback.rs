//! Minimal playback status and position querying for MPRIS.

use crate::mpris::connection::{MprisError, get_dbus_conn};
use zbus::Proxy;
use zvariant::OwnedValue;

fn parse_position_from_owned(val: &OwnedValue) -> Option<f64> {
    // Try direct integer types
    if let Ok(i) = TryInto::<i64>::try_into(val.clone()) {
        return Some(i as f64 / 1_000_000.0);
    }
    if let Ok(u) = TryInto::<u64>::try_into(val.clone()) {
        return Some(u as f64 / 1_000_000.0);
    }
    None
}

async fn get_player_property(service: &str, property: &str) -> Result<OwnedValue, MprisError> {
    let conn = get_dbus_conn().await?;
    let props_proxy = Proxy::new(&conn, service, "/org/mpris/MediaPlayer2", "org.freedesktop.DBus.Properties").await?;
    let reply = props_proxy
        .call_method("Get", &("org.mpris.MediaPlayer2.Player", property))
        .await?;
    Ok(reply.body().deserialize::<OwnedValue>()?)
}

/// Query the playback position (seconds) for a specific MPRIS player service.
///
/// Players that do not expose a position report 0.
pub async fn get_position(service: &str) -> Result<f64, MprisError> {
    if service.is_empty() {
        return Ok(0.0);
    }
    let val = get_player_property(service, "Position").await?;
    Ok(parse_position_from_owned(&val).unwrap_or(0.0))
}

/// Query the playback status (`Playing`, `Paused` or `Stopped`) for a specific MPRIS player service.
pub async fn get_playback_status(service: &str) -> Result<String, MprisError> {
    if service.is_empty() {
        return Ok("Stopped".to_string());
    }
    let val = get_player_property(service, "PlaybackStatus").await?;
    Ok(TryInto::<String>::try_into(val).unwrap_or_else(|_| "Stopped".to_string()))
}
