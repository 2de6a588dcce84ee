//! URL construction for filesystem-backed entities.
//!
//! Items (tracks, sounds) are addressed by a `file://` URL whose body is the
//! percent-encoded absolute path, so `/` becomes `%2F`. Collections are
//! addressed by their plain directory path. Every URL sent to the service
//! passes through [`clean_url`] first.

use std::borrow::Cow;
use std::path::Path;

/// Scheme marker prefixed to encoded item paths
pub const FILE_SCHEME: &str = "file://";

/// `file://` URL for an item path.
///
/// ```
/// use provider_remote::file_url;
/// use std::path::Path;
///
/// assert_eq!(
///     file_url(Path::new("/r/Playlists/Jazz/Song 1.mp3")),
///     "file://%2Fr%2FPlaylists%2FJazz%2FSong%201.mp3"
/// );
/// ```
pub fn file_url(path: &Path) -> String {
    let raw = path.to_string_lossy();
    format!("{}{}", FILE_SCHEME, urlencoding::encode(&raw))
}

/// Strips a single trailing `/`.
///
/// A URL ending in a run of slashes is returned unchanged, which keeps the
/// function idempotent while never removing more than one character.
pub fn clean_url(url: &str) -> Cow<'_, str> {
    match url.strip_suffix('/') {
        Some(rest) if !rest.ends_with('/') => Cow::Borrowed(rest),
        _ => Cow::Borrowed(url),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_url_encodes_separators_and_spaces() {
        assert_eq!(
            file_url(Path::new("/r/Soundboards/Combat/Roar.wav")),
            "file://%2Fr%2FSoundboards%2FCombat%2FRoar.wav"
        );
        assert_eq!(
            file_url(Path::new("/r/Playlists/Lo-Fi/a b.mp3")),
            "file://%2Fr%2FPlaylists%2FLo-Fi%2Fa%20b.mp3"
        );
    }

    #[test]
    fn test_clean_url_strips_one_trailing_slash() {
        assert_eq!(clean_url("/r/Playlists/Jazz/"), "/r/Playlists/Jazz");
        assert_eq!(clean_url("/r/Playlists/Jazz"), "/r/Playlists/Jazz");
        assert_eq!(clean_url("/"), "");
        assert_eq!(clean_url(""), "");
        assert_eq!(clean_url("/r//"), "/r//");
    }

    #[test]
    fn test_clean_url_is_idempotent() {
        for input in ["", "/", "//", "a", "a/", "a//", "/r/Playlists/Jazz/", "file://%2Fr"] {
            let once = clean_url(input).into_owned();
            let twice = clean_url(&once).into_owned();
            assert_eq!(once, twice, "not idempotent for {:?}", input);
            assert!(input.len() - once.len() <= 1);
        }
    }
}
