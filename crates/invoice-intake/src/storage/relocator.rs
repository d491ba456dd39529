use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::RelocateError;
use crate::sanitize;

/// Highest numeric suffix tried when the canonical name is taken.
const MAX_NAME_SUFFIX: u32 = 1000;

/// Moves one file to a destination that does not exist yet.
///
/// Implementations must either complete the move or leave `src` in place;
/// they must never overwrite an existing `dst`.
pub trait FileMover: Send + Sync {
    fn move_file(&self, src: &Path, dst: &Path) -> io::Result<()>;
}

/// Filesystem mover: hard link then unlink (atomic, no-clobber). Falls back to
/// exclusive-create copy + remove when linking is unsupported, e.g. across
/// devices.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsMover;

impl FileMover for FsMover {
    fn move_file(&self, src: &Path, dst: &Path) -> io::Result<()> {
        match std::fs::hard_link(src, dst) {
            Ok(()) => {
                if let Err(e) = std::fs::remove_file(src) {
                    // Source is locked; undo the link so the file exists exactly once.
                    let _ = std::fs::remove_file(dst);
                    return Err(e);
                }
                Ok(())
            }
            Err(e)
                if matches!(
                    e.kind(),
                    io::ErrorKind::AlreadyExists | io::ErrorKind::NotFound
                ) =>
            {
                Err(e)
            }
            Err(e) => {
                debug!("hard link failed ({}), falling back to copy", e);
                copy_then_remove(src, dst)
            }
        }
    }
}

fn copy_then_remove(src: &Path, dst: &Path) -> io::Result<()> {
    let copied = {
        let mut reader = File::open(src)?;
        let mut writer = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(dst)?;
        io::copy(&mut reader, &mut writer).and_then(|_| writer.sync_all())
    };

    if let Err(e) = copied {
        let _ = std::fs::remove_file(dst);
        return Err(e);
    }

    if let Err(e) = std::fs::remove_file(src) {
        let _ = std::fs::remove_file(dst);
        return Err(e);
    }

    Ok(())
}

/// Moves files into their destination directory with bounded, linearly
/// backed-off retries.
#[derive(Clone)]
pub struct Relocator {
    mover: Arc<dyn FileMover>,
    max_attempts: u32,
    backoff: Duration,
}

impl Relocator {
    pub fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self::with_mover(Arc::new(FsMover), max_attempts, backoff)
    }

    pub fn with_mover(mover: Arc<dyn FileMover>, max_attempts: u32, backoff: Duration) -> Self {
        Self {
            mover,
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Moves `src` into `dest_dir` as `filename`, or as `<stem>_N.<ext>` when
    /// that name is taken. Returns the path actually written.
    ///
    /// Attempt `n` that fails is followed by a sleep of `n × backoff`. After
    /// the last failed attempt `src` is still at its original path.
    pub async fn relocate(
        &self,
        src: &Path,
        dest_dir: &Path,
        filename: &str,
    ) -> Result<PathBuf, RelocateError> {
        let mut attempt = 1;
        loop {
            match self.attempt(src, dest_dir, filename) {
                Ok(target) => {
                    debug!(
                        attempt,
                        "Relocated {} -> {}",
                        sanitize::redact_path(src),
                        target.display()
                    );
                    return Ok(target);
                }
                Err(RelocateError::NameExhausted(path)) => {
                    return Err(RelocateError::NameExhausted(path));
                }
                Err(e) if attempt >= self.max_attempts => {
                    return Err(with_attempts(e, attempt));
                }
                Err(e) => {
                    let delay = self.backoff * attempt;
                    warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        "Move attempt failed for {}: {}; retrying in {:?}",
                        sanitize::redact_path(src),
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    fn attempt(&self, src: &Path, dest_dir: &Path, filename: &str) -> Result<PathBuf, RelocateError> {
        std::fs::create_dir_all(dest_dir).map_err(|e| RelocateError::CreateDirectory {
            path: dest_dir.to_path_buf(),
            source: e,
        })?;

        let target = resolve_conflict(dest_dir, filename)?;

        self.mover
            .move_file(src, &target)
            .map_err(|e| RelocateError::MoveFile {
                from: src.to_path_buf(),
                to: target.clone(),
                attempts: 1,
                source: e,
            })?;

        Ok(target)
    }
}

fn with_attempts(err: RelocateError, attempts: u32) -> RelocateError {
    match err {
        RelocateError::MoveFile {
            from, to, source, ..
        } => RelocateError::MoveFile {
            from,
            to,
            attempts,
            source,
        },
        other => other,
    }
}

/// Finds a free name in `directory`: `filename` itself, then `<base>_2<ext>`,
/// `<base>_3<ext>` and so on. Uses `symlink_metadata` so dangling symlinks
/// count as taken.
fn resolve_conflict(directory: &Path, filename: &str) -> Result<PathBuf, RelocateError> {
    let path = directory.join(filename);
    if std::fs::symlink_metadata(&path).is_err() {
        return Ok(path);
    }

    let (base, ext) = match filename.rfind('.') {
        Some(dot_pos) => (&filename[..dot_pos], Some(&filename[dot_pos..])),
        None => (filename, None),
    };

    for counter in 2..=MAX_NAME_SUFFIX {
        let candidate = match ext {
            Some(ext) => format!("{}_{}{}", base, counter, ext),
            None => format!("{}_{}", base, counter),
        };
        let candidate_path = directory.join(candidate);
        if std::fs::symlink_metadata(&candidate_path).is_err() {
            return Ok(candidate_path);
        }
    }

    Err(RelocateError::NameExhausted(path))
}
