//! Cache entries, ceilings and usage accounting

use chrono::{DateTime, Utc};
use std::fmt;
use std::fs::Metadata;
use std::time::{SystemTime, UNIX_EPOCH};

/// Format bytes as human-readable size (e.g., "1.5 GB")
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Convert MB to bytes
pub fn mb_to_bytes(mb: u32) -> u64 {
    u64::from(mb) * 1024 * 1024
}

/// One cached artifact, as seen on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// File name (`<hex digest>.<extension>`)
    pub name: String,
    /// Last time the entry was read or admitted
    pub accessed_at: SystemTime,
    /// Size in bytes
    pub size: u64,
}

impl CacheEntry {
    /// Build an entry from filesystem metadata
    ///
    /// The access clock is the later of atime and mtime: touching sets both,
    /// and mounts with `noatime` only ever move mtime.
    pub fn from_metadata(name: impl Into<String>, metadata: &Metadata) -> Self {
        let accessed = metadata.accessed().ok();
        let modified = metadata.modified().ok();
        let accessed_at = accessed.max(modified).unwrap_or(UNIX_EPOCH);

        Self {
            name: name.into(),
            accessed_at,
            size: metadata.len(),
        }
    }

    /// Access time as a UTC timestamp
    pub fn accessed_utc(&self) -> DateTime<Utc> {
        DateTime::<Utc>::from(self.accessed_at)
    }
}

/// Aggregate size of a set of entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheUsage {
    pub bytes: u64,
    pub entries: usize,
}

impl CacheUsage {
    /// Total over `entries`
    pub fn of(entries: &[CacheEntry]) -> Self {
        entries.iter().fold(Self::default(), |usage, e| usage.plus(e.size))
    }

    /// Usage with one more entry of `size` bytes
    pub fn plus(self, size: u64) -> Self {
        Self {
            bytes: self.bytes.saturating_add(size),
            entries: self.entries + 1,
        }
    }

    /// Usage with one entry of `size` bytes gone
    pub fn minus(self, size: u64) -> Self {
        Self {
            bytes: self.bytes.saturating_sub(size),
            entries: self.entries.saturating_sub(1),
        }
    }
}

/// Upper bound on what a cache may hold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ceiling {
    /// Total size of all entries, in bytes
    Bytes(u64),
    /// Number of entries
    Entries(usize),
}

impl Ceiling {
    /// Whether `usage` is within the ceiling
    pub fn admits(&self, usage: CacheUsage) -> bool {
        match *self {
            Self::Bytes(max) => usage.bytes <= max,
            Self::Entries(max) => usage.entries <= max,
        }
    }

    /// Whether a single entry of `size` bytes could ever fit
    pub fn admits_alone(&self, size: u64) -> bool {
        self.admits(CacheUsage::default().plus(size))
    }

    /// The bound as a number, in the ceiling's own unit
    pub fn limit(&self) -> u64 {
        match *self {
            Self::Bytes(max) => max,
            Self::Entries(max) => max as u64,
        }
    }

    /// The part of `usage` this ceiling measures
    pub fn measure(&self, usage: CacheUsage) -> u64 {
        match self {
            Self::Bytes(_) => usage.bytes,
            Self::Entries(_) => usage.entries as u64,
        }
    }
}

impl fmt::Display for Ceiling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Bytes(max) => write!(f, "{}", format_bytes(max)),
            Self::Entries(max) => write!(f, "{} entries", max),
        }
    }
}

/// Cache size status relative to configured limit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheSizeStatus {
    /// Under 80% of limit
    Ok,
    /// Between 80% and 100% of limit
    Warning,
    /// At or over the limit
    Full,
}

impl CacheSizeStatus {
    /// Determine status based on current usage and ceiling
    pub fn from_usage(usage: CacheUsage, ceiling: Ceiling) -> Self {
        let percent = Self::percentage(usage, ceiling);
        if percent >= 100.0 {
            Self::Full
        } else if percent >= 80.0 {
            Self::Warning
        } else {
            Self::Ok
        }
    }

    /// Get percentage of ceiling used
    pub fn percentage(usage: CacheUsage, ceiling: Ceiling) -> f64 {
        let limit = ceiling.limit();
        if limit == 0 {
            return 0.0;
        }
        (ceiling.measure(usage) as f64 / limit as f64) * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_bytes_units() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(mb_to_bytes(3)), "3.0 MB");
        assert_eq!(format_bytes(mb_to_bytes(2048)), "2.0 GB");
    }

    #[test]
    fn byte_ceiling_admits_exact_fit() {
        let ceiling = Ceiling::Bytes(100);
        let usage = CacheUsage { bytes: 60, entries: 2 };
        assert!(ceiling.admits(usage.plus(40)));
        assert!(!ceiling.admits(usage.plus(41)));
        assert!(!ceiling.admits_alone(101));
    }

    #[test]
    fn entry_ceiling_counts_entries() {
        let ceiling = Ceiling::Entries(2);
        let usage = CacheUsage::default().plus(1_000_000);
        assert!(ceiling.admits(usage.plus(1_000_000)));
        assert!(!ceiling.admits(usage.plus(1).plus(1)));
        assert!(!Ceiling::Entries(0).admits_alone(1));
    }

    #[test]
    fn usage_minus_saturates() {
        let usage = CacheUsage::default().minus(10);
        assert_eq!(usage, CacheUsage::default());
    }

    #[test]
    fn size_status_thresholds() {
        let ceiling = Ceiling::Bytes(100);
        let at = |bytes| CacheUsage { bytes, entries: 1 };
        assert_eq!(CacheSizeStatus::from_usage(at(50), ceiling), CacheSizeStatus::Ok);
        assert_eq!(CacheSizeStatus::from_usage(at(85), ceiling), CacheSizeStatus::Warning);
        assert_eq!(CacheSizeStatus::from_usage(at(100), ceiling), CacheSizeStatus::Full);
        assert_eq!(CacheSizeStatus::percentage(at(5), Ceiling::Bytes(0)), 0.0);
    }

    #[test]
    fn ceiling_display() {
        assert_eq!(Ceiling::Bytes(2048).to_string(), "2.0 KB");
        assert_eq!(Ceiling::Entries(5).to_string(), "5 entries");
    }
}
