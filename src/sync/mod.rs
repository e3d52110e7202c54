//! Sync executor
//!
//! Applies a computed [`Changes`] to the filesystem. Removals run first,
//! best-effort; installs and refreshes merge into one sequential download
//! queue with a fixed pause between items. The pause is a rate limit for
//! the remote endpoint, not a performance artifact, so the queue must stay
//! serialized even on an async or threaded host.
//!
//! Failure isolation is per item: a failed fetch or write is recorded in
//! the report and the queue continues. The run's `Result` is `Ok` even when
//! items failed; callers inspect [`SyncReport::failed`].

use std::path::Path;
use std::time::Duration;

use crate::config::InstallConfig;
use crate::diff::Changes;
use crate::error::{PacksyncError, Result};
use crate::registry::{Item, ItemType};
use crate::source::ContentSource;
use crate::target::{InstallMode, resolve_target};

/// Pause between consecutive downloads.
const DOWNLOAD_DELAY: Duration = Duration::from_millis(500);

/// Attempts per fetch: the first try plus two retries on transient errors.
const MAX_FETCH_ATTEMPTS: u32 = 3;

/// Progress callback: one human-readable line per completed operation.
pub type ProgressFn<'a> = &'a mut dyn FnMut(&str);

/// Per-item outcomes of one sync run.
#[derive(Debug, Default)]
pub struct SyncReport {
    pub removed: Vec<String>,
    pub synced: Vec<String>,
    pub failed: Vec<(Item, PacksyncError)>,
}

impl SyncReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

pub struct Executor<'a> {
    source: &'a dyn ContentSource,
    mode: InstallMode,
    policy: &'a InstallConfig,
    pause: Duration,
}

impl<'a> Executor<'a> {
    pub fn new(source: &'a dyn ContentSource, mode: InstallMode, policy: &'a InstallConfig) -> Self {
        Self {
            source,
            mode,
            policy,
            pause: DOWNLOAD_DELAY,
        }
    }

    /// Override the inter-download pause (tests use zero).
    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    /// Apply the diff: removals first, then the sequential download queue.
    pub fn apply(&self, changes: &Changes, on_progress: ProgressFn<'_>) -> Result<SyncReport> {
        let mut report = SyncReport::default();

        for item in &changes.remove {
            let dest = resolve_target(item, self.mode, self.policy);
            match remove_path(&dest) {
                Ok(()) => {
                    report.removed.push(item.name.clone());
                    on_progress(&format!("Removed {}", item.name));
                }
                Err(e) => report.failed.push((item.clone(), e)),
            }
        }

        let queue: Vec<&Item> = changes.install.iter().chain(&changes.refresh).collect();
        let total = queue.len();
        let mut completed = 0usize;

        for (idx, item) in queue.iter().enumerate() {
            match self.apply_item(item) {
                Ok(()) => {
                    completed += 1;
                    report.synced.push(item.name.clone());
                    on_progress(&format!("Synced {completed}/{total}: {}", item.name));
                }
                Err(e) => report.failed.push(((*item).clone(), e)),
            }
            if idx + 1 < total && !self.pause.is_zero() {
                std::thread::sleep(self.pause);
            }
        }

        Ok(report)
    }

    /// Fetch one item and write it to its resolved target, replacing any
    /// existing file unconditionally. Manual edits do not survive a
    /// refresh.
    fn apply_item(&self, item: &Item) -> Result<()> {
        let dest = resolve_target(item, self.mode, self.policy);

        if item.kind == ItemType::Skill && is_skill_root(item) {
            return self.apply_skill_dir(item, &dest);
        }

        let content = self.fetch_with_retry(&item.path)?;
        write_file(&dest, &content)
    }

    /// Skill items are directory-granularity. When the source can list the
    /// directory, every file inside is copied; otherwise only the SKILL.md
    /// marker is fetched and asset files ride along as their own queue
    /// entries.
    fn apply_skill_dir(&self, item: &Item, dest: &Path) -> Result<()> {
        match self.source.list(&item.path)? {
            Some(files) => {
                for rel in files {
                    let content = self.fetch_with_retry(&format!("{}/{rel}", item.path))?;
                    write_file(&dest.join(&rel), &content)?;
                }
                Ok(())
            }
            None => {
                let content = self.fetch_with_retry(&format!("{}/SKILL.md", item.path))?;
                write_file(&dest.join("SKILL.md"), &content)
            }
        }
    }

    /// Bounded retry: transient failures (server errors, timeouts) are
    /// retried up to the attempt cap, terminal failures surface at once.
    fn fetch_with_retry(&self, path: &str) -> Result<Vec<u8>> {
        for attempt in 1..=MAX_FETCH_ATTEMPTS {
            match self.source.fetch(path) {
                Ok(content) => return Ok(content),
                Err(e) if e.is_transient() && attempt < MAX_FETCH_ATTEMPTS => {}
                Err(e) if e.is_transient() => {
                    return Err(PacksyncError::RetryExhausted {
                        path: path.to_string(),
                        attempts: MAX_FETCH_ATTEMPTS,
                    });
                }
                Err(e) => return Err(e),
            }
        }
        Err(PacksyncError::RetryExhausted {
            path: path.to_string(),
            attempts: MAX_FETCH_ATTEMPTS,
        })
    }
}

fn write_file(dest: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent).map_err(|e| PacksyncError::FileWriteFailed {
            path: dest.display().to_string(),
            reason: e.to_string(),
        })?;
    }
    std::fs::write(dest, content).map_err(|e| PacksyncError::FileWriteFailed {
        path: dest.display().to_string(),
        reason: e.to_string(),
    })
}

/// Remove a file or directory tree. Already-absent targets count as
/// removed.
fn remove_path(dest: &Path) -> Result<()> {
    let result = if dest.is_dir() {
        std::fs::remove_dir_all(dest)
    } else {
        std::fs::remove_file(dest)
    };
    match result {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(PacksyncError::FileRemoveFailed {
            path: dest.display().to_string(),
            reason: e.to_string(),
        }),
    }
}

/// A skill pivot targets exactly `skill/<name>`; deeper targets are asset
/// entries that install as plain files.
fn is_skill_root(item: &Item) -> bool {
    item.target.split('/').filter(|s| !s.is_empty()).count() == 2
        && item.target.starts_with("skill/")
}
