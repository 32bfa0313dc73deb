//! Size-bounded artifact directory with least-recently-used eviction

use crate::cache::entry::{CacheEntry, CacheUsage, Ceiling};
use crate::error::{HoardError, HoardResult};
use crate::hash::is_content_name;
use std::fs::{self, File, FileTimes};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, info, warn};

/// Flat directory of content-addressed artifacts kept under a ceiling
///
/// Candidates are materialized in a staging directory first and then moved
/// into the root by [`add`](Self::add), which evicts the least recently
/// accessed entries until the candidate fits. All state lives on disk:
/// access times and sizes come from file metadata.
#[derive(Debug, Clone)]
pub struct BoundedFileCache {
    root: PathBuf,
    staging: PathBuf,
    ceiling: Ceiling,
}

impl BoundedFileCache {
    /// Open a cache, creating its root and staging directories
    pub fn new(
        root: impl Into<PathBuf>,
        staging: impl Into<PathBuf>,
        ceiling: Ceiling,
    ) -> HoardResult<Self> {
        let cache = Self {
            root: root.into(),
            staging: staging.into(),
            ceiling,
        };

        for dir in [&cache.root, &cache.staging] {
            fs::create_dir_all(dir).map_err(|e| {
                HoardError::io(format!("creating cache directory {}", dir.display()), e)
            })?;
        }

        Ok(cache)
    }

    /// Cache root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory generators write candidates into
    pub fn staging_dir(&self) -> &Path {
        &self.staging
    }

    /// Configured ceiling
    pub fn ceiling(&self) -> Ceiling {
        self.ceiling
    }

    /// Whether a readable entry called `name` is cached
    ///
    /// Does not count as an access.
    pub fn exists(&self, name: &str) -> bool {
        if !is_content_name(name) {
            return false;
        }
        let path = self.path_for(name);
        path.is_file() && File::open(&path).is_ok()
    }

    /// Where entry `name` lives in the cache root
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Where a generator should write candidate `name`
    pub fn staging_path_for(&self, name: &str) -> PathBuf {
        self.staging.join(name)
    }

    /// Mark entry `name` as just accessed
    pub fn touch(&self, name: &str) -> HoardResult<()> {
        let path = self.path_for(name);
        let now = SystemTime::now();

        File::options()
            .write(true)
            .open(&path)
            .and_then(|file| file.set_times(FileTimes::new().set_accessed(now).set_modified(now)))
            .map_err(|e| HoardError::io(format!("touching cache entry {}", path.display()), e))
    }

    /// All entries, least recently accessed first
    ///
    /// Files whose names are not content names are ignored. Ties on access
    /// time are ordered by name.
    pub fn entries(&self) -> HoardResult<Vec<CacheEntry>> {
        let listing = fs::read_dir(&self.root).map_err(|e| {
            HoardError::io(format!("reading cache directory {}", self.root.display()), e)
        })?;

        let mut entries = Vec::new();
        for item in listing {
            let item = item.map_err(|e| HoardError::io("reading cache directory entry", e))?;
            let file_name = item.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };
            if !is_content_name(name) {
                continue;
            }

            let metadata = match item.metadata() {
                Ok(metadata) => metadata,
                // Evicted by someone else between listing and stat
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => {
                    return Err(HoardError::io(format!("inspecting cache entry {}", name), e))
                }
            };
            if metadata.is_file() {
                entries.push(CacheEntry::from_metadata(name, &metadata));
            }
        }

        entries.sort_by(|a, b| {
            a.accessed_at
                .cmp(&b.accessed_at)
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(entries)
    }

    /// Current total usage
    pub fn usage(&self) -> HoardResult<CacheUsage> {
        Ok(CacheUsage::of(&self.entries()?))
    }

    /// Admit the staged candidate `name` into the cache
    ///
    /// If the entry is already cached the staged copy is dropped and the
    /// existing entry is touched. A candidate that could never fit is
    /// deleted and rejected. Otherwise the oldest entries are evicted until
    /// it fits. On an IO fault the candidate is not admitted; evictions
    /// already done stay done.
    pub fn add(&self, name: &str) -> HoardResult<PathBuf> {
        check_name(name)?;
        let staged = self.staging_path_for(name);
        let target = self.path_for(name);

        if self.exists(name) {
            discard(&staged);
            self.touch(name)?;
            debug!("Cache already holds {}, reusing it", name);
            return Ok(target);
        }

        let size = fs::metadata(&staged)
            .map_err(|e| {
                if e.kind() == ErrorKind::NotFound {
                    HoardError::NotFound(staged.clone())
                } else {
                    HoardError::io(format!("inspecting staged file {}", staged.display()), e)
                }
            })?
            .len();

        if !self.ceiling.admits_alone(size) {
            discard(&staged);
            warn!(
                "Rejected {}: {} bytes can never fit in a cache limited to {}",
                name, size, self.ceiling
            );
            return Err(HoardError::Oversize {
                path: staged,
                size,
                limit: self.ceiling.limit(),
            });
        }

        let entries = self.entries()?;
        let mut usage = CacheUsage::of(&entries);
        for entry in &entries {
            if self.ceiling.admits(usage.plus(size)) {
                break;
            }
            self.evict(entry)?;
            usage = usage.minus(entry.size);
        }

        move_file(&staged, &target)?;
        if let Err(e) = self.touch(name) {
            warn!("Cached {} but access time not set: {}", name, e);
        }

        info!("Cached {} ({} bytes)", name, size);
        Ok(target)
    }

    /// Path of entry `name`, generating it first if it is not cached
    ///
    /// `generate` receives the staging path to write to. A cache hit
    /// refreshes the entry's access time. If generation fails, whatever it
    /// left in staging is removed and its error is returned.
    pub fn get_or_create<F>(&self, name: &str, generate: F) -> HoardResult<PathBuf>
    where
        F: FnOnce(&Path) -> HoardResult<()>,
    {
        check_name(name)?;

        if self.exists(name) {
            if let Err(e) = self.touch(name) {
                warn!("Cache hit on {} but access time not updated: {}", name, e);
            }
            debug!("Cache hit: {}", name);
            return Ok(self.path_for(name));
        }

        debug!("Cache miss: {}", name);
        let staged = self.staging_path_for(name);
        if let Err(e) = generate(&staged) {
            discard(&staged);
            return Err(e);
        }

        self.add(name)
    }

    /// Delete entry `name`; returns whether it existed
    pub fn remove(&self, name: &str) -> HoardResult<bool> {
        check_name(name)?;
        let path = self.path_for(name);

        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(HoardError::io(
                format!("removing cache entry {}", path.display()),
                e,
            )),
        }
    }

    /// Evict oldest entries until usage is within the ceiling
    ///
    /// Only needed after the ceiling was lowered; `add` never overshoots.
    pub fn prune(&self) -> HoardResult<Vec<CacheEntry>> {
        let entries = self.entries()?;
        let mut usage = CacheUsage::of(&entries);
        let mut evicted = Vec::new();

        for entry in entries {
            if self.ceiling.admits(usage) {
                break;
            }
            self.evict(&entry)?;
            usage = usage.minus(entry.size);
            evicted.push(entry);
        }

        Ok(evicted)
    }

    /// Delete every entry; returns how many were removed
    pub fn clear(&self) -> HoardResult<usize> {
        let entries = self.entries()?;
        for entry in &entries {
            self.evict(entry)?;
        }
        Ok(entries.len())
    }

    fn evict(&self, entry: &CacheEntry) -> HoardResult<()> {
        let path = self.path_for(&entry.name);
        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                return Err(HoardError::io(
                    format!("evicting cache entry {}", path.display()),
                    e,
                ))
            }
        }
        info!("Evicted {} ({} bytes)", entry.name, entry.size);
        Ok(())
    }
}

fn check_name(name: &str) -> HoardResult<()> {
    if is_content_name(name) {
        Ok(())
    } else {
        Err(HoardError::InvalidName(name.to_string()))
    }
}

/// Best-effort removal of a staged file
fn discard(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        if e.kind() != ErrorKind::NotFound {
            warn!("Failed to remove staged file {}: {}", path.display(), e);
        }
    }
}

/// Move `from` to `to`, copying when a rename cannot cross filesystems
///
/// The copy lands under a dot-prefixed name first, which enumeration
/// ignores, so a half-copied file is never visible as an entry.
fn move_file(from: &Path, to: &Path) -> HoardResult<()> {
    let rename_err = match fs::rename(from, to) {
        Ok(()) => return Ok(()),
        Err(e) => e,
    };
    debug!(
        "Rename {} -> {} failed ({}), copying instead",
        from.display(),
        to.display(),
        rename_err
    );

    let file_name = to
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let partial = to.with_file_name(format!(".{}.partial", file_name));

    let copied = fs::copy(from, &partial).and_then(|_| fs::rename(&partial, to));
    if let Err(e) = copied {
        discard(&partial);
        return Err(HoardError::io(
            format!("moving {} into cache", from.display()),
            e,
        ));
    }

    discard(from);
    Ok(())
}
