//! Per-guild permission records

use crate::error::HoardResult;
use crate::store::{Record, RecordStore};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

/// User id lists attached to a guild
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserLists {
    /// Users whose commands are ignored
    pub blacklisted: Vec<u64>,
    /// Users allowed to run privileged commands
    pub admin: Vec<u64>,
}

/// Permission state of one guild
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildPermissions {
    /// Guild id
    pub gid: u64,

    /// When locked, only admins may run commands
    #[serde(default)]
    pub locked: bool,

    #[serde(rename = "uid_dict", default)]
    pub users: UserLists,
}

impl GuildPermissions {
    /// Fresh, unlocked permissions for `gid`
    pub fn new(gid: u64) -> Self {
        Self {
            gid,
            ..Self::default()
        }
    }

    pub fn is_admin(&self, uid: u64) -> bool {
        self.users.admin.contains(&uid)
    }

    pub fn is_blacklisted(&self, uid: u64) -> bool {
        self.users.blacklisted.contains(&uid)
    }

    /// Whether `uid` may run an ordinary command
    pub fn allows(&self, uid: u64) -> bool {
        if self.is_blacklisted(uid) {
            return false;
        }
        !self.locked || self.is_admin(uid)
    }
}

impl Record for GuildPermissions {
    type Key = u64;

    fn key(&self) -> u64 {
        self.gid
    }
}

/// Permission records for every guild, backed by one file
#[derive(Debug)]
pub struct PermissionBook {
    store: RecordStore<GuildPermissions>,
}

impl PermissionBook {
    pub fn new(store: RecordStore<GuildPermissions>) -> Self {
        Self { store }
    }

    /// Open the book stored at `path`
    pub fn open(path: impl Into<PathBuf>, max_bytes: u64) -> Self {
        Self::new(RecordStore::open(path, max_bytes))
    }

    pub fn store(&self) -> &RecordStore<GuildPermissions> {
        &self.store
    }

    /// Permissions of `gid`, or defaults if the guild has no record
    pub fn guild(&mut self, gid: u64) -> GuildPermissions {
        self.store
            .get(&gid)
            .unwrap_or_else(|| GuildPermissions::new(gid))
    }

    pub fn is_locked(&mut self, gid: u64) -> bool {
        self.guild(gid).locked
    }

    pub fn is_admin(&mut self, gid: u64, uid: u64) -> bool {
        self.guild(gid).is_admin(uid)
    }

    pub fn is_blacklisted(&mut self, gid: u64, uid: u64) -> bool {
        self.guild(gid).is_blacklisted(uid)
    }

    /// Lock or unlock a guild; returns whether anything changed
    pub fn set_locked(&mut self, gid: u64, locked: bool) -> HoardResult<bool> {
        let changed = self.update(gid, |perms| {
            let changed = perms.locked != locked;
            perms.locked = locked;
            changed
        })?;
        if changed {
            info!("Guild {} {}", gid, if locked { "locked" } else { "unlocked" });
        }
        Ok(changed)
    }

    pub fn add_admin(&mut self, gid: u64, uid: u64) -> HoardResult<bool> {
        self.update(gid, |perms| insert_unique(&mut perms.users.admin, uid))
    }

    pub fn remove_admin(&mut self, gid: u64, uid: u64) -> HoardResult<bool> {
        self.update(gid, |perms| remove_all(&mut perms.users.admin, uid))
    }

    pub fn blacklist(&mut self, gid: u64, uid: u64) -> HoardResult<bool> {
        self.update(gid, |perms| insert_unique(&mut perms.users.blacklisted, uid))
    }

    pub fn unblacklist(&mut self, gid: u64, uid: u64) -> HoardResult<bool> {
        self.update(gid, |perms| remove_all(&mut perms.users.blacklisted, uid))
    }

    /// Apply `change` to the guild's record and persist it if it reports a change
    fn update<F>(&mut self, gid: u64, change: F) -> HoardResult<bool>
    where
        F: FnOnce(&mut GuildPermissions) -> bool,
    {
        let mut perms = self.guild(gid);
        if !change(&mut perms) {
            return Ok(false);
        }
        self.store.upsert(perms)?;
        Ok(true)
    }
}

fn insert_unique(ids: &mut Vec<u64>, uid: u64) -> bool {
    if ids.contains(&uid) {
        return false;
    }
    ids.push(uid);
    true
}

fn remove_all(ids: &mut Vec<u64>, uid: u64) -> bool {
    let before = ids.len();
    ids.retain(|id| *id != uid);
    ids.len() != before
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::DEFAULT_MAX_FILE_BYTES;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn reads_legacy_layout_and_writes_it_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("permissions.json");
        fs::write(
            &path,
            r#"[{"gid":1,"locked":false,"uid_dict":{"blacklisted":[],"admin":[5]}}]"#,
        )
        .unwrap();

        let mut store: RecordStore<GuildPermissions> =
            RecordStore::new(&path, DEFAULT_MAX_FILE_BYTES);
        store.read().unwrap();
        let index = store.find_index(|p| p.gid == 1).unwrap();
        assert_eq!(index, 0);

        let mut perms = store.records()[index].clone();
        perms.users.admin.push(9);
        store.upsert(perms).unwrap();

        let mut fresh: RecordStore<GuildPermissions> =
            RecordStore::new(&path, DEFAULT_MAX_FILE_BYTES);
        fresh.read().unwrap();
        assert_eq!(fresh.records()[0].users.admin, vec![5, 9]);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            r#"[{"gid":1,"locked":false,"uid_dict":{"blacklisted":[],"admin":[5,9]}}]"#
        );
    }

    #[test]
    fn missing_fields_default() {
        let perms: GuildPermissions = serde_json::from_str(r#"{"gid":3}"#).unwrap();
        assert_eq!(perms, GuildPermissions::new(3));
    }

    #[test]
    fn unknown_guild_gets_defaults_without_writing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("permissions.json");
        let mut book = PermissionBook::open(&path, DEFAULT_MAX_FILE_BYTES);

        assert!(!book.is_locked(42));
        assert!(!path.exists());
    }

    #[test]
    fn admin_and_blacklist_updates() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("permissions.json");
        let mut book = PermissionBook::open(&path, DEFAULT_MAX_FILE_BYTES);

        assert!(book.add_admin(1, 10).unwrap());
        assert!(!book.add_admin(1, 10).unwrap());
        assert!(book.blacklist(1, 20).unwrap());
        assert!(book.set_locked(1, true).unwrap());

        let mut reopened = PermissionBook::open(&path, DEFAULT_MAX_FILE_BYTES);
        let perms = reopened.guild(1);
        assert!(perms.locked);
        assert!(perms.allows(10));
        assert!(!perms.allows(20));
        assert!(!perms.allows(30));
        assert_eq!(reopened.store().len(), 1);

        assert!(reopened.remove_admin(1, 10).unwrap());
        assert!(!reopened.is_admin(1, 10));
        assert!(reopened.unblacklist(1, 20).unwrap());
        assert!(!reopened.is_blacklisted(1, 20));
    }

    #[test]
    fn guilds_are_independent() {
        let dir = TempDir::new().unwrap();
        let mut book = PermissionBook::open(dir.path().join("p.json"), DEFAULT_MAX_FILE_BYTES);

        book.set_locked(1, true).unwrap();
        book.add_admin(2, 7).unwrap();

        assert!(book.is_locked(1));
        assert!(!book.is_locked(2));
        assert!(!book.is_admin(1, 7));
        assert_eq!(book.store().len(), 2);
    }

    #[test]
    fn oversized_file_is_never_overwritten() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("permissions.json");
        let guilds: Vec<GuildPermissions> = (1..=50).map(GuildPermissions::new).collect();
        fs::write(&path, serde_json::to_vec(&guilds).unwrap()).unwrap();
        let before = fs::read(&path).unwrap();

        let mut book = PermissionBook::open(&path, 200);
        let err = book.set_locked(999, true).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Oversize);
        assert_eq!(fs::read(&path).unwrap(), before);
    }

    #[test]
    fn corrupt_file_is_never_overwritten() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("permissions.json");
        let edited = r#"[{"gid":1,"locked":true},{"gid":2,"locked":false},]"#;
        fs::write(&path, edited).unwrap();

        let mut book = PermissionBook::open(&path, DEFAULT_MAX_FILE_BYTES);
        assert!(!book.is_locked(1));
        let err = book.add_admin(3, 7).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Corrupt);
        assert_eq!(fs::read_to_string(&path).unwrap(), edited);
    }
}
