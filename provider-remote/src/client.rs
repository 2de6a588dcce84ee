//! The remote capability surface.

use async_trait::async_trait;
use std::time::Duration;

use crate::error::Result;
use crate::types::{RemotePlaylist, RemoteSoundboard};

/// Playback options attached to every added sound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoundOptions {
    pub looped: bool,
    pub volume: u32,
    pub fade_in: Duration,
    pub fade_out: Duration,
}

impl Default for SoundOptions {
    fn default() -> Self {
        Self {
            looped: true,
            volume: 100,
            fade_in: Duration::from_millis(500),
            fade_out: Duration::from_millis(500),
        }
    }
}

/// One method per remote capability.
///
/// Each call is a single request/response round trip. Implementations never
/// retry; callers decide what a failure means.
#[async_trait]
pub trait RemoteClient: Send + Sync {
    async fn add_playlist(&self, title: &str, url: &str) -> Result<()>;

    async fn add_track(&self, title: &str, url: &str, playlist_url: &str) -> Result<()>;

    async fn remove_track(&self, track_url: &str, playlist_url: &str) -> Result<()>;

    async fn remove_playlist(&self, url: &str) -> Result<()>;

    async fn add_soundboard(&self, title: &str, url: &str) -> Result<()>;

    async fn add_sound(
        &self,
        title: &str,
        url: &str,
        soundboard_url: &str,
        options: SoundOptions,
    ) -> Result<()>;

    async fn remove_sound(&self, sound_url: &str, soundboard_url: &str) -> Result<()>;

    async fn remove_soundboard(&self, url: &str) -> Result<()>;

    async fn list_playlists(&self) -> Result<Vec<RemotePlaylist>>;

    async fn list_soundboards(&self) -> Result<Vec<RemoteSoundboard>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sound_options() {
        let options = SoundOptions::default();
        assert!(options.looped);
        assert_eq!(options.volume, 100);
        assert_eq!(options.fade_in, Duration::from_millis(500));
        assert_eq!(options.fade_out, Duration::from_millis(500));
    }
}
