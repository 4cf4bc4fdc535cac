//! Track lookups and download links.

use crate::client::MusicClient;
use crate::error::{ClientError, Result};
use crate::request::join_ids;
use md5::{Digest, Md5};
use sha1::Sha1;
use tracing::debug;
use ymusic_core::types::{DownloadInfo, SimilarTracks, StorageFile, TrackSupplement};
use ymusic_core::{Track, TrackKey};

/// Salt mixed into download link signatures.
const SIGN_SALT: &str = "XGRlBW9FXlekgbPrRHuSiA";

/// Tracks client.
pub struct TracksClient<'a> {
    client: &'a MusicClient,
}

impl<'a> TracksClient<'a> {
    pub(crate) fn new(client: &'a MusicClient) -> Self {
        Self { client }
    }

    /// Fetch one or more tracks by id (`id` or `id:albumId`).
    pub async fn get<S: AsRef<str>>(&self, ids: &[S]) -> Result<Vec<Track>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let form = [
            ("track-ids", join_ids(ids)),
            ("with-positions", "true".to_string()),
        ];
        let tracks: Vec<Track> = self.client.post_form("tracks", &form, "tracks").await?;

        debug!(requested = ids.len(), returned = tracks.len(), "Fetched tracks");
        Ok(tracks)
    }

    /// List the downloadable variants of a track.
    pub async fn download_info(&self, key: &TrackKey, direct: bool) -> Result<Vec<DownloadInfo>> {
        let path = format!("tracks/{}/download-info", key);
        self.client
            .get_json(&path, &[("direct", direct.to_string())], "download info")
            .await
    }

    /// Resolve a `downloadInfoUrl` to its storage location.
    pub async fn download_file_info(&self, download_info_url: &str) -> Result<StorageFile> {
        self.client
            .get_raw(download_info_url, "download file info")
            .await
    }

    /// Build the signed direct link for a storage location.
    pub fn build_file_link(&self, info: &DownloadInfo, file: &StorageFile) -> Result<String> {
        build_file_link(info, file)
    }

    /// Resolve a playable link, preferring the highest-bitrate mp3.
    pub async fn file_link(&self, key: &TrackKey) -> Result<String> {
        let variants = self.download_info(key, false).await?;
        let chosen = pick_variant(&variants)
            .ok_or_else(|| ClientError::NotFound(format!("download variants for {}", key)))?;

        debug!(
            track = %key,
            codec = %chosen.codec,
            bitrate = chosen.bitrate_in_kbps,
            "Selected download variant"
        );

        let file = self.download_file_info(&chosen.download_info_url).await?;
        build_file_link(chosen, &file)
    }

    /// Tracks similar to `id`.
    pub async fn similar(&self, id: &str) -> Result<SimilarTracks> {
        self.client
            .get_json(&format!("tracks/{}/similar", id), &[], "similar tracks")
            .await
    }

    /// Lyrics and description of `id`.
    pub async fn supplement(&self, id: &str) -> Result<TrackSupplement> {
        self.client
            .get_json(&format!("tracks/{}/supplement", id), &[], "track supplement")
            .await
    }
}

/// Highest-bitrate mp3, or the highest-bitrate variant of any codec.
fn pick_variant(variants: &[DownloadInfo]) -> Option<&DownloadInfo> {
    variants
        .iter()
        .filter(|v| v.codec == "mp3")
        .max_by_key(|v| v.bitrate_in_kbps)
        .or_else(|| variants.iter().max_by_key(|v| v.bitrate_in_kbps))
}

fn build_file_link(info: &DownloadInfo, file: &StorageFile) -> Result<String> {
    if !file.is_complete() {
        return Err(ClientError::IncompleteDownloadInfo(format!(
            "host={:?} path={:?} ts={:?}",
            file.host, file.path, file.ts
        )));
    }

    let secret = format!("{}{}{}", SIGN_SALT, file.path.get(1..).unwrap_or(""), file.s);
    let md5 = Md5::digest(secret.as_bytes());
    let sign = hex::encode(Sha1::digest(md5));

    Ok(format!(
        "https://{}/get-{}/{}/{}{}",
        file.host, info.codec, sign, file.ts, file.path
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variant(codec: &str, bitrate: u32) -> DownloadInfo {
        DownloadInfo {
            codec: codec.into(),
            bitrate_in_kbps: bitrate,
            download_info_url: format!("https://storage/{codec}/{bitrate}"),
            ..Default::default()
        }
    }

    #[test]
    fn prefers_best_mp3() {
        let variants = [variant("aac", 256), variant("mp3", 192), variant("mp3", 320)];
        assert_eq!(pick_variant(&variants).unwrap().bitrate_in_kbps, 320);
    }

    #[test]
    fn falls_back_to_any_codec() {
        let variants = [variant("aac", 64), variant("aac", 192)];
        let chosen = pick_variant(&variants).unwrap();
        assert_eq!((chosen.codec.as_str(), chosen.bitrate_in_kbps), ("aac", 192));
        assert!(pick_variant(&[]).is_none());
    }

    #[test]
    fn signs_link() {
        let file = StorageFile {
            host: "s42.storage.yandex.net".into(),
            path: "/rmusic/abc".into(),
            ts: "0006a1b2".into(),
            s: "secret".into(),
        };
        let link = build_file_link(&variant("mp3", 320), &file).unwrap();

        let expected_md5 = Md5::digest(format!("{SIGN_SALT}rmusic/abcsecret").as_bytes());
        let expected_sign = hex::encode(Sha1::digest(expected_md5));
        assert_eq!(
            link,
            format!("https://s42.storage.yandex.net/get-mp3/{expected_sign}/0006a1b2/rmusic/abc")
        );
        assert_eq!(expected_sign.len(), 40);
    }

    #[test]
    fn incomplete_storage_file_is_rejected() {
        let file = StorageFile {
            host: "h".into(),
            ..Default::default()
        };
        assert!(matches!(
            build_file_link(&variant("mp3", 320), &file),
            Err(ClientError::IncompleteDownloadInfo(_))
        ));
    }
}
