//! Remote operation planning.
//!
//! One filesystem event plus its classification selects at most one remote
//! call:
//!
//! | Event            | Track / Sound        | Playlist / Soundboard      |
//! |------------------|----------------------|----------------------------|
//! | file added       | add track / sound    |                            |
//! | file removed     | remove track / sound |                            |
//! | directory added  |                      | add playlist / soundboard  |
//! | directory removed|                      | remove playlist / soundboard |

use bridge_traits::watcher::FilesystemEvent;
use provider_remote::{RemoteClient, SoundOptions};
use std::fmt;

use crate::classifier::ClassifiedTarget;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteOperation {
    AddPlaylist { title: String, url: String },
    RemovePlaylist { url: String },
    AddTrack { title: String, url: String, playlist_url: String },
    RemoveTrack { url: String, playlist_url: String },
    AddSoundboard { title: String, url: String },
    RemoveSoundboard { url: String },
    AddSound { title: String, url: String, soundboard_url: String },
    RemoveSound { url: String, soundboard_url: String },
}

impl RemoteOperation {
    /// Selects the remote call for an event, or `None` when the event kind and
    /// target disagree or the target is not applicable.
    pub fn plan(event: &FilesystemEvent, target: ClassifiedTarget) -> Option<Self> {
        use ClassifiedTarget as T;
        use FilesystemEvent as E;

        let operation = match (event, target) {
            (E::FileAdded(_), T::Track { title, url, playlist_url }) => Self::AddTrack {
                title,
                url,
                playlist_url,
            },
            (E::FileRemoved(_), T::Track { url, playlist_url, .. }) => {
                Self::RemoveTrack { url, playlist_url }
            }
            (E::FileAdded(_), T::Sound { title, url, soundboard_url }) => Self::AddSound {
                title,
                url,
                soundboard_url,
            },
            (E::FileRemoved(_), T::Sound { url, soundboard_url, .. }) => {
                Self::RemoveSound { url, soundboard_url }
            }
            (E::DirectoryAdded(_), T::Playlist { title, url }) => Self::AddPlaylist { title, url },
            (E::DirectoryRemoved(_), T::Playlist { url, .. }) => Self::RemovePlaylist { url },
            (E::DirectoryAdded(_), T::Soundboard { title, url }) => {
                Self::AddSoundboard { title, url }
            }
            (E::DirectoryRemoved(_), T::Soundboard { url, .. }) => Self::RemoveSoundboard { url },
            _ => return None,
        };

        Some(operation)
    }

    /// Remote capability name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::AddPlaylist { .. } => "addPlaylist",
            Self::RemovePlaylist { .. } => "removePlaylist",
            Self::AddTrack { .. } => "addTrack",
            Self::RemoveTrack { .. } => "removeTrack",
            Self::AddSoundboard { .. } => "addSoundboard",
            Self::RemoveSoundboard { .. } => "removeSoundboard",
            Self::AddSound { .. } => "addSound",
            Self::RemoveSound { .. } => "removeSound",
        }
    }

    /// URL of the entity being added or removed
    pub fn url(&self) -> &str {
        match self {
            Self::AddPlaylist { url, .. }
            | Self::RemovePlaylist { url }
            | Self::AddTrack { url, .. }
            | Self::RemoveTrack { url, .. }
            | Self::AddSoundboard { url, .. }
            | Self::RemoveSoundboard { url }
            | Self::AddSound { url, .. }
            | Self::RemoveSound { url, .. } => url,
        }
    }

    /// Performs the call. Sounds always use [`SoundOptions::default`].
    pub async fn apply(&self, client: &dyn RemoteClient) -> provider_remote::Result<()> {
        match self {
            Self::AddPlaylist { title, url } => client.add_playlist(title, url).await,
            Self::RemovePlaylist { url } => client.remove_playlist(url).await,
            Self::AddTrack {
                title,
                url,
                playlist_url,
            } => client.add_track(title, url, playlist_url).await,
            Self::RemoveTrack { url, playlist_url } => {
                client.remove_track(url, playlist_url).await
            }
            Self::AddSoundboard { title, url } => client.add_soundboard(title, url).await,
            Self::RemoveSoundboard { url } => client.remove_soundboard(url).await,
            Self::AddSound {
                title,
                url,
                soundboard_url,
            } => {
                client
                    .add_sound(title, url, soundboard_url, SoundOptions::default())
                    .await
            }
            Self::RemoveSound {
                url,
                soundboard_url,
            } => client.remove_sound(url, soundboard_url).await,
        }
    }
}

impl fmt::Display for RemoteOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name(), self.url())
    }
}
