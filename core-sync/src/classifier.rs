//! # Path Classification
//!
//! Maps filesystem paths under the watched root onto remote entities.
//!
//! ## Grammar
//!
//! ```text
//! <root>/<branch>/<collection>            -> Playlist | Soundboard
//! <root>/<branch>/<collection>/<item>     -> Track    | Sound
//! ```
//!
//! `<branch>` is the segment directly under root and must equal the
//! configured playlists or soundboards directory name exactly. Collection
//! names consist of letters, digits, spaces and hyphens. Item names allow
//! the same characters plus at most one `.`. Anything else is
//! [`ClassifiedTarget::NotApplicable`].

use bridge_traits::watcher::FilesystemEvent;
use core_runtime::config::DirectoryLayout;
use provider_remote::file_url;
use std::path::{Component, Path, PathBuf};

/// Title used when an item name yields nothing displayable
pub const UNKNOWN_TITLE: &str = "UnknownTitle";

/// Which managed subdirectory a path lives under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Branch {
    Playlists,
    Soundboards,
}

/// Remote entity a path maps to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifiedTarget {
    Track {
        title: String,
        url: String,
        playlist_url: String,
    },
    Sound {
        title: String,
        url: String,
        soundboard_url: String,
    },
    Playlist {
        title: String,
        url: String,
    },
    Soundboard {
        title: String,
        url: String,
    },
    NotApplicable,
}

impl ClassifiedTarget {
    pub fn is_applicable(&self) -> bool {
        !matches!(self, Self::NotApplicable)
    }
}

/// Pure path-to-entity mapping for one [`DirectoryLayout`].
#[derive(Debug, Clone)]
pub struct PathClassifier {
    layout: DirectoryLayout,
}

impl PathClassifier {
    pub fn new(layout: DirectoryLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &DirectoryLayout {
        &self.layout
    }

    /// Classifies the path an event refers to, using the event's
    /// file/directory kind to pick the grammar.
    pub fn classify(&self, event: &FilesystemEvent) -> ClassifiedTarget {
        if event.is_directory() {
            self.classify_directory(event.path())
        } else {
            self.classify_file(event.path())
        }
    }

    /// `<root>/<branch>/<collection>` becomes a Playlist or Soundboard.
    pub fn classify_directory(&self, path: &Path) -> ClassifiedTarget {
        let Some((branch, segments)) = self.split(path) else {
            return ClassifiedTarget::NotApplicable;
        };

        let [collection] = segments.as_slice() else {
            return ClassifiedTarget::NotApplicable;
        };

        if !is_collection_name(collection) {
            return ClassifiedTarget::NotApplicable;
        }

        let title = title_from_segment(collection);
        let url = path_string(&self.branch_path(branch).join(collection));

        match branch {
            Branch::Playlists => ClassifiedTarget::Playlist { title, url },
            Branch::Soundboards => ClassifiedTarget::Soundboard { title, url },
        }
    }

    /// `<root>/<branch>/<collection>/<item>` becomes a Track or Sound.
    pub fn classify_file(&self, path: &Path) -> ClassifiedTarget {
        let Some((branch, segments)) = self.split(path) else {
            return ClassifiedTarget::NotApplicable;
        };

        let [collection, item] = segments.as_slice() else {
            return ClassifiedTarget::NotApplicable;
        };

        if !is_collection_name(collection) || !is_item_name(item) {
            return ClassifiedTarget::NotApplicable;
        }

        let collection_path = self.branch_path(branch).join(collection);
        let title = title_from_segment(item);
        let url = file_url(&collection_path.join(item));
        let collection_url = path_string(&collection_path);

        match branch {
            Branch::Playlists => ClassifiedTarget::Track {
                title,
                url,
                playlist_url: collection_url,
            },
            Branch::Soundboards => ClassifiedTarget::Sound {
                title,
                url,
                soundboard_url: collection_url,
            },
        }
    }

    fn branch_path(&self, branch: Branch) -> PathBuf {
        match branch {
            Branch::Playlists => self.layout.playlists_path(),
            Branch::Soundboards => self.layout.soundboards_path(),
        }
    }

    /// Branch plus the UTF-8 segments below it, or `None` when the path is
    /// outside both managed subdirectories.
    fn split<'p>(&self, path: &'p Path) -> Option<(Branch, Vec<&'p str>)> {
        let relative = path.strip_prefix(self.layout.root()).ok()?;

        let mut segments = Vec::new();
        for component in relative.components() {
            match component {
                Component::Normal(segment) => segments.push(segment.to_str()?),
                _ => return None,
            }
        }

        let (first, rest) = segments.split_first()?;
        let branch = if *first == self.layout.playlists_dir() {
            Branch::Playlists
        } else if *first == self.layout.soundboards_dir() {
            Branch::Soundboards
        } else {
            return None;
        };

        Some((branch, rest.to_vec()))
    }
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == ' ' || c == '-'
}

/// Letters, digits, spaces and hyphens; non-empty.
pub fn is_collection_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(is_name_char)
}

/// Collection grammar plus at most one `.`.
pub fn is_item_name(name: &str) -> bool {
    !name.is_empty()
        && name.chars().filter(|c| *c == '.').count() <= 1
        && name.chars().all(|c| c == '.' || is_name_char(c))
}

/// Display title for a path segment: everything before the first `.`, or
/// [`UNKNOWN_TITLE`] when that is blank.
pub fn title_from_segment(segment: &str) -> String {
    let stem = segment.split('.').next().unwrap_or_default();
    if stem.trim().is_empty() {
        UNKNOWN_TITLE.to_string()
    } else {
        stem.to_string()
    }
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> PathClassifier {
        PathClassifier::new(DirectoryLayout::new("/r").unwrap())
    }

    #[test]
    fn test_playlist_directory() {
        assert_eq!(
            classifier().classify_directory(Path::new("/r/Playlists/Jazz")),
            ClassifiedTarget::Playlist {
                title: "Jazz".to_string(),
                url: "/r/Playlists/Jazz".to_string(),
            }
        );
    }

    #[test]
    fn test_track_file() {
        assert_eq!(
            classifier().classify_file(Path::new("/r/Playlists/Jazz/Song 1.mp3")),
            ClassifiedTarget::Track {
                title: "Song 1".to_string(),
                url: "file://%2Fr%2FPlaylists%2FJazz%2FSong%201.mp3".to_string(),
                playlist_url: "/r/Playlists/Jazz".to_string(),
            }
        );
    }

    #[test]
    fn test_sound_file() {
        assert_eq!(
            classifier().classify_file(Path::new("/r/Soundboards/Combat/Roar.wav")),
            ClassifiedTarget::Sound {
                title: "Roar".to_string(),
                url: "file://%2Fr%2FSoundboards%2FCombat%2FRoar.wav".to_string(),
                soundboard_url: "/r/Soundboards/Combat".to_string(),
            }
        );
    }

    #[test]
    fn test_soundboard_directory_with_hyphen_and_space() {
        assert_eq!(
            classifier().classify_directory(Path::new("/r/Soundboards/Boss Fight-2")),
            ClassifiedTarget::Soundboard {
                title: "Boss Fight-2".to_string(),
                url: "/r/Soundboards/Boss Fight-2".to_string(),
            }
        );
    }

    #[test]
    fn test_wrong_depth_is_not_applicable() {
        let classifier = classifier();
        for path in [
            "/r",
            "/r/Playlists",
            "/r/Playlists/Jazz/Sub/Song.mp3",
            "/r/Playlists/Jazz/Song.mp3",
        ] {
            assert_eq!(
                classifier.classify_directory(Path::new(path)),
                ClassifiedTarget::NotApplicable,
                "{path}"
            );
        }

        for path in ["/r/Playlists/Jazz", "/r/Playlists/Jazz/Sub/Song.mp3", "/r/Song.mp3"] {
            assert_eq!(
                classifier.classify_file(Path::new(path)),
                ClassifiedTarget::NotApplicable,
                "{path}"
            );
        }
    }

    #[test]
    fn test_outside_managed_directories() {
        let classifier = classifier();
        assert!(!classifier
            .classify_directory(Path::new("/r/Other/Jazz"))
            .is_applicable());
        assert!(!classifier
            .classify_directory(Path::new("/elsewhere/Playlists/Jazz"))
            .is_applicable());
        assert!(!classifier
            .classify_file(Path::new("/r/playlists/Jazz/a.mp3"))
            .is_applicable());
    }

    #[test]
    fn test_disallowed_characters() {
        let classifier = classifier();
        assert!(!classifier
            .classify_directory(Path::new("/r/Playlists/Jazz_Classics"))
            .is_applicable());
        assert!(!classifier
            .classify_directory(Path::new("/r/Playlists/v1.0"))
            .is_applicable());
        assert!(!classifier
            .classify_file(Path::new("/r/Playlists/Jazz/song.tar.gz"))
            .is_applicable());
        assert!(!classifier
            .classify_file(Path::new("/r/Playlists/Jazz/song(live).mp3"))
            .is_applicable());
    }

    #[test]
    fn test_relative_components_rejected() {
        assert!(!classifier()
            .classify_directory(Path::new("/r/Playlists/../Playlists/Jazz"))
            .is_applicable());
    }

    #[test]
    fn test_branch_is_positional() {
        // The playlists name appearing deeper in the path must not switch branches.
        let classifier = PathClassifier::new(
            DirectoryLayout::with_names("/r", "Music", "Music Effects").unwrap(),
        );

        assert!(matches!(
            classifier.classify_file(Path::new("/r/Music Effects/Music/Door.wav")),
            ClassifiedTarget::Sound { .. }
        ));
        assert!(matches!(
            classifier.classify_directory(Path::new("/r/Music/Music Effects")),
            ClassifiedTarget::Playlist { .. }
        ));
    }

    #[test]
    fn test_classify_event_uses_kind() {
        let classifier = classifier();
        let dir = FilesystemEvent::DirectoryRemoved(PathBuf::from("/r/Playlists/Jazz"));
        let file = FilesystemEvent::FileRemoved(PathBuf::from("/r/Playlists/Jazz"));

        assert!(matches!(
            classifier.classify(&dir),
            ClassifiedTarget::Playlist { .. }
        ));
        assert_eq!(classifier.classify(&file), ClassifiedTarget::NotApplicable);
    }

    #[test]
    fn test_title_from_segment() {
        assert_eq!(title_from_segment("Song 1.mp3"), "Song 1");
        assert_eq!(title_from_segment("Roar"), "Roar");
        assert_eq!(title_from_segment(".mp3"), UNKNOWN_TITLE);
        assert_eq!(title_from_segment("   .wav"), UNKNOWN_TITLE);
        assert_eq!(title_from_segment(""), UNKNOWN_TITLE);
    }

    #[test]
    fn test_blank_item_name_gets_placeholder_title() {
        assert!(matches!(
            classifier().classify_file(Path::new("/r/Playlists/Jazz/.mp3")),
            ClassifiedTarget::Track { ref title, .. } if title == UNKNOWN_TITLE
        ));
    }

    #[test]
    fn test_grammar_helpers() {
        assert!(is_collection_name("Lo-Fi Beats 2"));
        assert!(is_collection_name("Café"));
        assert!(!is_collection_name(""));
        assert!(!is_collection_name("a.b"));
        assert!(is_item_name("a.b"));
        assert!(!is_item_name("a.b.c"));
    }
}
