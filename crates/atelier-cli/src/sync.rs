//! `atelier sync`: publish edited markdown into the public content root.
//!
//! Every subdirectory of the source directory is treated as a category.
//! Its `*.md` files are copied to the same relative location under the
//! destination, overwriting older copies. Files elsewhere are left alone.
//! A sync marker is written last so the store can report when content
//! was published.
//!
//! [`watch_content`] keeps the destination current: it syncs once, then
//! again after each burst of file events under the source directory.

use std::future::Future;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use atelier_core::util::files::{
    copy_file, exists, find_all_files, list_subdirectories, write_file, FindOptions,
};
use atelier_core::{Error, Result};
use atelier_store::{SyncMarker, DEFAULT_SYNC_MARKER_PATH};
use notify::{Event, EventKind, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Quiet period after the last file event before syncing again.
pub const SYNC_DEBOUNCE: Duration = Duration::from_millis(300);

/// What a sync run copied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSummary {
    /// Category directories visited, by name.
    pub directories: Vec<String>,
    /// Markdown files copied.
    pub files_copied: usize,
    /// Where the marker was written.
    pub marker_path: PathBuf,
    /// The marker contents.
    pub marker: SyncMarker,
}

/// Copy markdown from `from` into `to` and write the sync marker.
///
/// # Errors
///
/// Fails if `from` does not exist or any copy or write fails.
pub async fn sync_content(from: &Path, to: &Path, message: Option<&str>) -> Result<SyncSummary> {
    if !exists(from).await {
        return Err(Error::not_found(format!(
            "content directory {} does not exist",
            from.display()
        )));
    }

    let mut directories = Vec::new();
    let mut files_copied = 0;
    for dir in list_subdirectories(from).await? {
        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if name.starts_with('.') {
            continue;
        }

        let files = find_all_files(&dir, FindOptions::markdown()).await?;
        for file in &files {
            let target = to.join(&name).join(&file.relative_path);
            debug!(from = %file.path.display(), to = %target.display(), "copying");
            copy_file(&file.path, &target).await?;
        }
        info!(directory = %name, files = files.len(), "synced directory");
        files_copied += files.len();
        directories.push(name);
    }

    let marker = SyncMarker::now(message.map(str::to_string).unwrap_or_else(|| {
        format!(
            "Content synced from {}/ to {}/",
            from.display(),
            to.display()
        )
    }));
    let marker_path = to.join(DEFAULT_SYNC_MARKER_PATH.trim_start_matches('/'));
    write_file(&marker_path, marker.to_json_pretty()?).await?;
    info!(files = files_copied, marker = %marker_path.display(), "content sync completed");

    Ok(SyncSummary {
        directories,
        files_copied,
        marker_path,
        marker,
    })
}

/// Sync `from` into `to`, then keep syncing on changes until `shutdown`
/// resolves. Returns the number of syncs run after the first.
///
/// Events for dotfiles and editor temp files are ignored. A failed re-sync
/// is logged and the watch carries on.
///
/// # Errors
///
/// Fails if the first sync fails or the watcher cannot be started.
pub async fn watch_content<F>(
    from: &Path,
    to: &Path,
    message: Option<&str>,
    debounce: Duration,
    shutdown: F,
) -> Result<usize>
where
    F: Future<Output = ()>,
{
    let root = tokio::fs::canonicalize(from)
        .await
        .map_err(|e| Error::io_with_path(e, from))?;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
        let _ = tx.send(res);
    })
    .map_err(watch_error)?;
    watcher
        .watch(&root, RecursiveMode::Recursive)
        .map_err(watch_error)?;

    sync_content(&root, to, message).await?;
    info!(from = %root.display(), "watching for content changes");

    tokio::pin!(shutdown);
    let mut deadline: Option<Instant> = None;
    let mut resyncs = 0;
    loop {
        let wake = deadline;
        let due = async move {
            match wake {
                Some(at) => tokio::time::sleep_until(at).await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            () = &mut shutdown => {
                info!(resyncs, "stopping content watch");
                break;
            }
            event = rx.recv() => match event {
                Some(Ok(event)) => {
                    if is_content_change(&root, &event) {
                        debug!(kind = ?event.kind, paths = ?event.paths, "content changed");
                        deadline = Some(Instant::now() + debounce);
                    }
                }
                Some(Err(e)) => warn!(error = %e, "file watcher error"),
                None => break,
            },
            () = due => {
                deadline = None;
                match sync_content(&root, to, message).await {
                    Ok(summary) => {
                        resyncs += 1;
                        info!(files = summary.files_copied, "re-synced content");
                    }
                    Err(e) => warn!(error = %e, "content re-sync failed"),
                }
            }
        }
    }
    Ok(resyncs)
}

/// Whether a watcher event should trigger a sync.
///
/// Creates, content modifications and removals count; metadata-only
/// changes do not. Paths with a hidden component below `root`, or that
/// look like editor temp files, are skipped.
fn is_content_change(root: &Path, event: &Event) -> bool {
    let relevant_kind = match event.kind {
        EventKind::Create(_) | EventKind::Remove(_) => true,
        EventKind::Modify(kind) => !matches!(kind, notify::event::ModifyKind::Metadata(_)),
        _ => false,
    };
    relevant_kind && event.paths.iter().any(|path| !is_ignored(root, path))
}

fn is_ignored(root: &Path, path: &Path) -> bool {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let hidden = relative.components().any(|c| match c {
        Component::Normal(name) => name.to_string_lossy().starts_with('.'),
        _ => false,
    });
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let temp = name.ends_with('~')
        || matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("swp" | "swo" | "tmp" | "bak")
        );
    hidden || temp
}

fn watch_error(e: notify::Error) -> Error {
    Error::io(std::io::Error::other(e))
}
