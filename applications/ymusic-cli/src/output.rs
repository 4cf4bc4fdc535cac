/// Plain-text rendering of SDK types
use ymusic_core::{Album, Artist, Playlist, Track};
use ymusic_ynison::{PlayerSnapshot, PlayerStatus};

pub fn duration(ms: i64) -> String {
    let secs = ms.max(0) / 1000;
    format!("{}:{:02}", secs / 60, secs % 60)
}

pub fn track(track: &Track) -> String {
    let artists = track.artist_names();
    let title = match &track.version {
        Some(version) if !version.is_empty() => format!("{} ({version})", track.title),
        _ => track.title.clone(),
    };
    if artists.is_empty() {
        format!("{title} [{}] {}", track.id, duration(track.duration_ms))
    } else {
        format!("{artists} - {title} [{}] {}", track.id, duration(track.duration_ms))
    }
}

pub fn album(album: &Album) -> String {
    let artists: Vec<&str> = album.artists.iter().map(|a| a.name.as_str()).collect();
    let year = album.year.map(|y| format!(" ({y})")).unwrap_or_default();
    format!("{} - {}{year} [{}]", artists.join(", "), album.title, album.id)
}

pub fn artist(artist: &Artist) -> String {
    format!("{} [{}]", artist.name, artist.id)
}

pub fn playlist(playlist: &Playlist) -> String {
    format!(
        "{} [{}] {} tracks",
        playlist.title,
        playlist.key(),
        playlist.track_count
    )
}

pub fn status(status: &PlayerStatus) -> String {
    format!(
        "{} {}/{}",
        if status.paused { "paused" } else { "playing" },
        duration(status.progress_ms),
        duration(status.duration_ms)
    )
}

/// One line per device, the active one marked with `*`
pub fn devices(snapshot: &PlayerSnapshot) -> Vec<String> {
    snapshot
        .devices
        .iter()
        .filter_map(|device| device.device.info.as_ref())
        .map(|info| {
            let active = snapshot.active_device_id_optional.as_deref() == Some(info.device_id.as_str());
            format!(
                "{} {} ({})",
                if active { "*" } else { " " },
                info.title,
                info.device_type
            )
        })
        .collect()
}
