//! Remote API wire types
//!
//! Request bodies for the `PUT` mutation endpoints and the shapes returned by
//! the two list endpoints. Field names are camelCase on the wire.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body of `playlist/add` and `soundboard/add`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddCollectionBody<'a> {
    pub title: &'a str,
    pub url: &'a str,
}

/// Body of `playlist/remove` and `soundboard/remove`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemoveCollectionBody<'a> {
    pub url: &'a str,
}

/// Body of `playlist/addTrack`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddTrackBody<'a> {
    pub title: &'a str,
    pub url: &'a str,
    pub playlist_url: &'a str,
}

/// Body of `playlist/removeTrack`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveTrackBody<'a> {
    pub track_url: &'a str,
    pub playlist_url: &'a str,
}

/// Body of `soundboard/addSound`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddSoundBody<'a> {
    pub soundboard_url: &'a str,
    pub title: &'a str,
    pub url: &'a str,
    #[serde(rename = "loop")]
    pub looped: bool,
    pub volume: u32,
    /// Milliseconds
    pub fade_in: u64,
    /// Milliseconds
    pub fade_out: u64,
}

/// Body of `soundboard/removeSound`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveSoundBody<'a> {
    pub sound_url: &'a str,
    pub soundboard_url: &'a str,
}

/// A playlist as reported by the service.
///
/// Only `url` is relied upon (it is the removal key); everything else the
/// service sends is kept in `extra` for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemotePlaylist {
    pub url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A soundboard as reported by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteSoundboard {
    pub url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `GET playlist` response
#[derive(Debug, Deserialize)]
pub struct PlaylistsResponse {
    #[serde(default)]
    pub playlists: Vec<RemotePlaylist>,
}

/// `GET soundboard` response
#[derive(Debug, Deserialize)]
pub struct SoundboardsResponse {
    #[serde(default)]
    pub soundboards: Vec<RemoteSoundboard>,
}
