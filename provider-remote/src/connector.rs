//! Remote media-control API connector
//!
//! Implements [`RemoteClient`] over JSON/HTTP. Mutations are `PUT` requests
//! with JSON bodies; the two list operations are `GET` requests.

use async_trait::async_trait;
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::client::{RemoteClient, SoundOptions};
use crate::error::{RemoteError, Result};
use crate::types::{
    AddCollectionBody, AddSoundBody, AddTrackBody, PlaylistsResponse, RemoveCollectionBody,
    RemotePlaylist, RemoteSoundboard, RemoveSoundBody, RemoveTrackBody, SoundboardsResponse,
};
use crate::urls::clean_url;

/// Per-request timeout used when none is configured
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP connector for the remote media-control service
///
/// # Example
///
/// ```ignore
/// use provider_remote::{HttpRemoteClient, RemoteClient};
///
/// let client = HttpRemoteClient::new(http_client, "http://127.0.0.1:3333/v1");
/// client.add_playlist("Jazz", "/music/Playlists/Jazz").await?;
/// ```
pub struct HttpRemoteClient {
    /// HTTP client for API requests
    http_client: Arc<dyn HttpClient>,

    /// Versioned API base, without trailing slash
    base_url: String,

    request_timeout: Duration,
}

impl HttpRemoteClient {
    /// Create a new connector
    ///
    /// # Arguments
    ///
    /// * `http_client` - HTTP client implementation
    /// * `base_url` - API base such as `http://127.0.0.1:3333/v1`
    pub fn new(http_client: Arc<dyn HttpClient>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Single round trip; any status >= 400 becomes `OperationFailed`.
    async fn round_trip(
        &self,
        operation: &'static str,
        request: HttpRequest,
    ) -> Result<HttpResponse> {
        let request = request
            .header("Accept", "application/json")
            .timeout(self.request_timeout);

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|source| RemoteError::Transport { operation, source })?;

        if response.is_failure() {
            let body = decode_body(&response);
            warn!(operation, status = response.status, body = %body, "Remote operation failed");
            return Err(RemoteError::OperationFailed {
                operation,
                status: response.status,
                body,
            });
        }

        debug!(operation, status = response.status, "Remote operation succeeded");
        Ok(response)
    }

    async fn put<B: Serialize + Sync>(
        &self,
        operation: &'static str,
        path: &str,
        body: &B,
    ) -> Result<()> {
        let request = HttpRequest::new(HttpMethod::Put, self.endpoint(path))
            .json(body)
            .map_err(|e| RemoteError::Encode {
                operation,
                message: e.to_string(),
            })?;

        self.round_trip(operation, request).await.map(|_| ())
    }

    async fn get<T: DeserializeOwned>(&self, operation: &'static str, path: &str) -> Result<T> {
        let request = HttpRequest::new(HttpMethod::Get, self.endpoint(path));
        let response = self.round_trip(operation, request).await?;

        serde_json::from_slice(&response.body).map_err(|e| RemoteError::Parse {
            operation,
            message: e.to_string(),
        })
    }
}

/// JSON body of a response; non-JSON text is kept as a JSON string.
fn decode_body(response: &HttpResponse) -> Value {
    if response.body.is_empty() {
        return Value::Null;
    }

    serde_json::from_slice(&response.body)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&response.body).into_owned()))
}

#[async_trait]
impl RemoteClient for HttpRemoteClient {
    #[instrument(skip(self))]
    async fn add_playlist(&self, title: &str, url: &str) -> Result<()> {
        let url = clean_url(url);
        self.put(
            "addPlaylist",
            "playlist/add",
            &AddCollectionBody { title, url: &url },
        )
        .await
    }

    #[instrument(skip(self))]
    async fn add_track(&self, title: &str, url: &str, playlist_url: &str) -> Result<()> {
        let url = clean_url(url);
        let playlist_url = clean_url(playlist_url);
        self.put(
            "addTrack",
            "playlist/addTrack",
            &AddTrackBody {
                title,
                url: &url,
                playlist_url: &playlist_url,
            },
        )
        .await
    }

    #[instrument(skip(self))]
    async fn remove_track(&self, track_url: &str, playlist_url: &str) -> Result<()> {
        let track_url = clean_url(track_url);
        let playlist_url = clean_url(playlist_url);
        self.put(
            "removeTrack",
            "playlist/removeTrack",
            &RemoveTrackBody {
                track_url: &track_url,
                playlist_url: &playlist_url,
            },
        )
        .await
    }

    #[instrument(skip(self))]
    async fn remove_playlist(&self, url: &str) -> Result<()> {
        let url = clean_url(url);
        self.put(
            "removePlaylist",
            "playlist/remove",
            &RemoveCollectionBody { url: &url },
        )
        .await
    }

    #[instrument(skip(self))]
    async fn add_soundboard(&self, title: &str, url: &str) -> Result<()> {
        let url = clean_url(url);
        self.put(
            "addSoundboard",
            "soundboard/add",
            &AddCollectionBody { title, url: &url },
        )
        .await
    }

    #[instrument(skip(self, options))]
    async fn add_sound(
        &self,
        title: &str,
        url: &str,
        soundboard_url: &str,
        options: SoundOptions,
    ) -> Result<()> {
        let url = clean_url(url);
        let soundboard_url = clean_url(soundboard_url);
        self.put(
            "addSound",
            "soundboard/addSound",
            &AddSoundBody {
                soundboard_url: &soundboard_url,
                title,
                url: &url,
                looped: options.looped,
                volume: options.volume,
                fade_in: options.fade_in.as_millis() as u64,
                fade_out: options.fade_out.as_millis() as u64,
            },
        )
        .await
    }

    #[instrument(skip(self))]
    async fn remove_sound(&self, sound_url: &str, soundboard_url: &str) -> Result<()> {
        let sound_url = clean_url(sound_url);
        let soundboard_url = clean_url(soundboard_url);
        self.put(
            "removeSound",
            "soundboard/removeSound",
            &RemoveSoundBody {
                sound_url: &sound_url,
                soundboard_url: &soundboard_url,
            },
        )
        .await
    }

    #[instrument(skip(self))]
    async fn remove_soundboard(&self, url: &str) -> Result<()> {
        let url = clean_url(url);
        self.put(
            "removeSoundboard",
            "soundboard/remove",
            &RemoveCollectionBody { url: &url },
        )
        .await
    }

    #[instrument(skip(self))]
    async fn list_playlists(&self) -> Result<Vec<RemotePlaylist>> {
        let response: PlaylistsResponse = self.get("listPlaylists", "playlist").await?;
        Ok(response.playlists)
    }

    #[instrument(skip(self))]
    async fn list_soundboards(&self) -> Result<Vec<RemoteSoundboard>> {
        let response: SoundboardsResponse = self.get("listSoundboards", "soundboard").await?;
        Ok(response.soundboards)
    }
}
