//! Filesystem watcher implementation using `notify`
//!
//! Live events come from the platform's recommended notify backend. The
//! initial scan is a `walkdir` pass over the root that runs after the notify
//! watcher is registered, so nothing created in between is missed (an entry
//! may be reported twice, which downstream consumers tolerate).

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    watcher::{FileWatcher, FilesystemEvent, WatchReceiver, WatchSignal},
};
use notify::{
    event::{CreateKind, ModifyKind, RemoveKind, RenameMode},
    Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher,
};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex as StdMutex};
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Directories seen so far, used to tell file removals from directory
/// removals once the entry no longer exists on disk.
type KnownDirs = Arc<StdMutex<HashSet<PathBuf>>>;

/// Watches directory trees with `notify`
#[derive(Default)]
pub struct NotifyWatcher {
    watchers: Mutex<HashMap<PathBuf, RecommendedWatcher>>,
}

impl NotifyWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    fn watch_error(root: &Path, message: impl ToString) -> BridgeError {
        BridgeError::Watch {
            path: root.display().to_string(),
            message: message.to_string(),
        }
    }
}

#[async_trait]
impl FileWatcher for NotifyWatcher {
    async fn watch(&self, root: &Path) -> Result<WatchReceiver> {
        if !root.is_dir() {
            return Err(Self::watch_error(root, "root is not a directory"));
        }

        let (tx, rx) = mpsc::unbounded_channel();
        let known_dirs: KnownDirs = Arc::new(StdMutex::new(HashSet::new()));

        let callback_tx = tx.clone();
        let callback_dirs = Arc::clone(&known_dirs);
        let mut watcher = notify::recommended_watcher(
            move |res: std::result::Result<Event, notify::Error>| match res {
                Ok(event) => {
                    let translated = {
                        let mut dirs = callback_dirs
                            .lock()
                            .unwrap_or_else(|poisoned| poisoned.into_inner());
                        translate_event(&event, &mut dirs)
                    };
                    for fs_event in translated {
                        debug!(kind = fs_event.kind(), path = %fs_event.path().display(), "Filesystem event");
                        let _ = callback_tx.send(WatchSignal::Event(fs_event));
                    }
                }
                Err(e) => {
                    let _ = callback_tx.send(WatchSignal::Error(e.to_string()));
                }
            },
        )
        .map_err(|e| Self::watch_error(root, e))?;

        watcher
            .watch(root, RecursiveMode::Recursive)
            .map_err(|e| Self::watch_error(root, e))?;

        info!(root = %root.display(), "Watching directory tree");
        self.watchers.lock().await.insert(root.to_path_buf(), watcher);

        let scan_root = root.to_path_buf();
        tokio::task::spawn_blocking(move || initial_scan(&scan_root, &known_dirs, &tx));

        Ok(rx)
    }

    async fn unwatch(&self, root: &Path) -> Result<()> {
        if let Some(mut watcher) = self.watchers.lock().await.remove(root) {
            if let Err(e) = watcher.unwatch(root) {
                warn!(root = %root.display(), error = %e, "Failed to unregister watcher");
            }
            info!(root = %root.display(), "Stopped watching directory tree");
        }
        Ok(())
    }
}

/// Report every entry under `root` (pre-order, root excluded), then `Ready`.
fn initial_scan(root: &Path, known_dirs: &KnownDirs, tx: &mpsc::UnboundedSender<WatchSignal>) {
    let mut discovered = 0usize;

    for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let signal = match entry {
            Ok(entry) => {
                discovered += 1;
                let path = entry.path().to_path_buf();
                if entry.file_type().is_dir() {
                    known_dirs
                        .lock()
                        .unwrap_or_else(|poisoned| poisoned.into_inner())
                        .insert(path.clone());
                    WatchSignal::Event(FilesystemEvent::DirectoryAdded(path))
                } else {
                    WatchSignal::Event(FilesystemEvent::FileAdded(path))
                }
            }
            Err(e) => WatchSignal::Error(e.to_string()),
        };

        if tx.send(signal).is_err() {
            debug!(root = %root.display(), "Watch receiver dropped during initial scan");
            return;
        }
    }

    info!(root = %root.display(), entries = discovered, "Initial scan complete");
    let _ = tx.send(WatchSignal::Ready);
}

/// Map a notify event onto zero or more filesystem events.
fn translate_event(event: &Event, known_dirs: &mut HashSet<PathBuf>) -> Vec<FilesystemEvent> {
    match &event.kind {
        EventKind::Create(kind) => {
            let hint = match kind {
                CreateKind::Folder => Some(true),
                CreateKind::File => Some(false),
                _ => None,
            };
            event
                .paths
                .iter()
                .flat_map(|path| added(path, hint, known_dirs))
                .collect()
        }
        EventKind::Remove(kind) => {
            let hint = match kind {
                RemoveKind::Folder => Some(true),
                RemoveKind::File => Some(false),
                _ => None,
            };
            event
                .paths
                .iter()
                .map(|path| removed(path, hint, known_dirs))
                .collect()
        }
        EventKind::Modify(ModifyKind::Name(mode)) => match mode {
            RenameMode::From => event
                .paths
                .iter()
                .map(|path| removed(path, None, known_dirs))
                .collect(),
            RenameMode::To => event
                .paths
                .iter()
                .flat_map(|path| added(path, None, known_dirs))
                .collect(),
            RenameMode::Both => match event.paths.as_slice() {
                [from, to] => {
                    let mut events = vec![removed(from, None, known_dirs)];
                    events.extend(added(to, None, known_dirs));
                    events
                }
                _ => Vec::new(),
            },
            _ => event
                .paths
                .iter()
                .flat_map(|path| {
                    if path.exists() {
                        added(path, None, known_dirs)
                    } else {
                        vec![removed(path, None, known_dirs)]
                    }
                })
                .collect(),
        },
        _ => Vec::new(),
    }
}

/// A new directory may arrive populated (moved in, or copied faster than the
/// backend registers its watch), so its contents are reported too, parents
/// before children.
fn added(
    path: &Path,
    is_dir: Option<bool>,
    known_dirs: &mut HashSet<PathBuf>,
) -> Vec<FilesystemEvent> {
    if !is_dir.unwrap_or_else(|| path.is_dir()) {
        return vec![FilesystemEvent::FileAdded(path.to_path_buf())];
    }

    known_dirs.insert(path.to_path_buf());
    let mut events = vec![FilesystemEvent::DirectoryAdded(path.to_path_buf())];

    for entry in WalkDir::new(path).min_depth(1).sort_by_file_name() {
        match entry {
            Ok(entry) if entry.file_type().is_dir() => {
                known_dirs.insert(entry.path().to_path_buf());
                events.push(FilesystemEvent::DirectoryAdded(entry.path().to_path_buf()));
            }
            Ok(entry) => events.push(FilesystemEvent::FileAdded(entry.path().to_path_buf())),
            Err(e) => debug!(path = %path.display(), error = %e, "Skipping unreadable entry"),
        }
    }

    events
}

fn removed(
    path: &Path,
    is_dir: Option<bool>,
    known_dirs: &mut HashSet<PathBuf>,
) -> FilesystemEvent {
    let was_dir = known_dirs.remove(path);
    if is_dir.unwrap_or(was_dir) {
        known_dirs.retain(|dir| !dir.starts_with(path));
        FilesystemEvent::DirectoryRemoved(path.to_path_buf())
    } else {
        FilesystemEvent::FileRemoved(path.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::Duration;
    use tokio::time::timeout;

    fn event(kind: EventKind, paths: &[&str]) -> Event {
        paths
            .iter()
            .fold(Event::new(kind), |event, path| event.add_path(PathBuf::from(path)))
    }

    #[test]
    fn test_translate_create_with_kind_hint() {
        let mut dirs = HashSet::new();

        let translated = translate_event(
            &event(EventKind::Create(CreateKind::Folder), &["/m/Playlists/Jazz"]),
            &mut dirs,
        );
        assert_eq!(
            translated,
            vec![FilesystemEvent::DirectoryAdded(PathBuf::from("/m/Playlists/Jazz"))]
        );
        assert!(dirs.contains(Path::new("/m/Playlists/Jazz")));

        let translated = translate_event(
            &event(EventKind::Create(CreateKind::File), &["/m/Playlists/Jazz/a.mp3"]),
            &mut dirs,
        );
        assert_eq!(
            translated,
            vec![FilesystemEvent::FileAdded(PathBuf::from("/m/Playlists/Jazz/a.mp3"))]
        );
    }

    #[test]
    fn test_translate_remove_uses_known_dirs() {
        let mut dirs = HashSet::new();
        dirs.insert(PathBuf::from("/m/Playlists/Jazz"));
        dirs.insert(PathBuf::from("/m/Playlists/Jazz/Nested"));

        let translated = translate_event(
            &event(EventKind::Remove(RemoveKind::Any), &["/m/Playlists/Jazz/a.mp3"]),
            &mut dirs,
        );
        assert_eq!(
            translated,
            vec![FilesystemEvent::FileRemoved(PathBuf::from("/m/Playlists/Jazz/a.mp3"))]
        );

        let translated = translate_event(
            &event(EventKind::Remove(RemoveKind::Any), &["/m/Playlists/Jazz"]),
            &mut dirs,
        );
        assert_eq!(
            translated,
            vec![FilesystemEvent::DirectoryRemoved(PathBuf::from("/m/Playlists/Jazz"))]
        );
        assert!(dirs.is_empty());
    }

    #[test]
    fn test_translate_rename_both() {
        let mut dirs = HashSet::new();
        dirs.insert(PathBuf::from("/m/Playlists/Old"));

        let translated = translate_event(
            &event(
                EventKind::Modify(ModifyKind::Name(RenameMode::Both)),
                &["/m/Playlists/Old", "/m/Playlists/New"],
            ),
            &mut dirs,
        );

        assert_eq!(translated.len(), 2);
        assert_eq!(
            translated[0],
            FilesystemEvent::DirectoryRemoved(PathBuf::from("/m/Playlists/Old"))
        );
        // The target does not exist on disk, so it is reported as a file.
        assert_eq!(
            translated[1],
            FilesystemEvent::FileAdded(PathBuf::from("/m/Playlists/New"))
        );
    }

    #[test]
    fn test_translate_ignores_data_changes() {
        let mut dirs = HashSet::new();
        let translated = translate_event(
            &event(EventKind::Access(notify::event::AccessKind::Any), &["/m/a.mp3"]),
            &mut dirs,
        );
        assert!(translated.is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_initial_scan_reports_existing_entries_then_ready() {
        let temp = tempfile::tempdir().unwrap();
        let jazz = temp.path().join("Playlists").join("Jazz");
        fs::create_dir_all(&jazz).unwrap();
        fs::write(jazz.join("Song 1.mp3"), b"x").unwrap();

        let watcher = NotifyWatcher::new();
        let mut signals = watcher.watch(temp.path()).await.unwrap();

        let mut events = Vec::new();
        loop {
            let signal = timeout(Duration::from_secs(5), signals.recv())
                .await
                .expect("initial scan timed out")
                .expect("channel closed");
            match signal {
                WatchSignal::Ready => break,
                WatchSignal::Event(event) => events.push(event),
                WatchSignal::Error(message) => panic!("watch error: {}", message),
            }
        }

        assert!(events.contains(&FilesystemEvent::DirectoryAdded(temp.path().join("Playlists"))));
        assert!(events.contains(&FilesystemEvent::DirectoryAdded(jazz.clone())));
        assert!(events.contains(&FilesystemEvent::FileAdded(jazz.join("Song 1.mp3"))));

        let dir_index = events
            .iter()
            .position(|e| *e == FilesystemEvent::DirectoryAdded(jazz.clone()))
            .unwrap();
        let file_index = events
            .iter()
            .position(|e| *e == FilesystemEvent::FileAdded(jazz.join("Song 1.mp3")))
            .unwrap();
        assert!(dir_index < file_index, "parents are reported before children");

        watcher.unwatch(temp.path()).await.unwrap();
    }

    #[test]
    fn test_translate_populated_directory_reports_contents() {
        let temp = tempfile::tempdir().unwrap();
        let jazz = temp.path().join("Jazz");
        fs::create_dir_all(jazz.join("Live")).unwrap();
        fs::write(jazz.join("Song.mp3"), b"x").unwrap();

        let mut dirs = HashSet::new();
        let translated = translate_event(
            &Event::new(EventKind::Modify(ModifyKind::Name(RenameMode::To))).add_path(jazz.clone()),
            &mut dirs,
        );

        assert_eq!(
            translated,
            vec![
                FilesystemEvent::DirectoryAdded(jazz.clone()),
                FilesystemEvent::DirectoryAdded(jazz.join("Live")),
                FilesystemEvent::FileAdded(jazz.join("Song.mp3")),
            ]
        );
        assert!(dirs.contains(&jazz.join("Live")));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_moved_in_directory_reports_its_files() {
        let temp = tempfile::tempdir().unwrap();
        let base = temp.path().canonicalize().unwrap();
        let root = base.join("root");
        let staging = base.join("staging").join("Jazz");
        fs::create_dir_all(root.join("Playlists")).unwrap();
        fs::create_dir_all(&staging).unwrap();
        fs::write(staging.join("Song.mp3"), b"x").unwrap();

        let watcher = NotifyWatcher::new();
        let mut signals = watcher.watch(&root).await.unwrap();
        loop {
            let signal = timeout(Duration::from_secs(5), signals.recv())
                .await
                .expect("initial scan timed out")
                .expect("channel closed");
            if matches!(signal, WatchSignal::Ready) {
                break;
            }
        }

        let jazz = root.join("Playlists").join("Jazz");
        fs::rename(&staging, &jazz).unwrap();

        let track = FilesystemEvent::FileAdded(jazz.join("Song.mp3"));
        let mut events = Vec::new();
        while !events.contains(&track) {
            match timeout(Duration::from_secs(5), signals.recv()).await {
                Ok(Some(WatchSignal::Event(event))) => events.push(event),
                Ok(Some(_)) => {}
                other => panic!("no FileAdded for the moved-in track: {other:?}, seen {events:?}"),
            }
        }

        assert!(events.contains(&FilesystemEvent::DirectoryAdded(jazz.clone())));
        watcher.unwatch(&root).await.unwrap();
    }

    #[tokio::test]
    async fn test_watch_missing_root_fails() {
        let watcher = NotifyWatcher::new();
        let result = watcher.watch(Path::new("/definitely/not/here")).await;
        assert!(matches!(result, Err(BridgeError::Watch { .. })));
    }

    #[tokio::test]
    async fn test_unwatch_unknown_root_is_noop() {
        let watcher = NotifyWatcher::new();
        assert!(watcher.unwatch(Path::new("/not/watched")).await.is_ok());
    }
}
