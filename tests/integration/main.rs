//! Integration tests for Hoard

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    /// A config file whose data and cache dirs all live inside `dir`
    fn isolated_config(dir: &TempDir, extra: &str) -> PathBuf {
        let root = dir.path().display().to_string().replace('\\', "/");
        let config = format!(
            r#"
[store]
data_dir = "{root}/data"

[cache]
dir = "{root}/cache"
staging_dir = "{root}/staging"
{extra}
"#
        );
        let path = dir.path().join("config.toml");
        fs::write(&path, config).unwrap();
        path
    }

    fn hoard(config: &Path) -> Command {
        let mut cmd = cargo_bin_cmd!("hoard");
        cmd.arg("--config").arg(config);
        cmd
    }

    #[test]
    fn help_displays() {
        cargo_bin_cmd!("hoard")
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("persistence tier"));
    }

    #[test]
    fn version_displays() {
        cargo_bin_cmd!("hoard")
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("hoard"));
    }

    #[test]
    fn config_path() {
        let dir = TempDir::new().unwrap();
        let config = isolated_config(&dir, "");
        hoard(&config)
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show() {
        let dir = TempDir::new().unwrap();
        let config = isolated_config(&dir, "");
        hoard(&config)
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[cache]"));
    }

    #[test]
    fn invalid_config_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[cache\n").unwrap();

        hoard(&path)
            .args(["cache", "stats"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid configuration"));
    }

    #[test]
    fn cache_name_matches_library() {
        let dir = TempDir::new().unwrap();
        let config = isolated_config(&dir, "");
        let expected = hoard::hash::name_for(&[&"hello", &"en-US"], "mp3");

        hoard(&config)
            .args(["cache", "name", "mp3", "hello", "en-US"])
            .assert()
            .success()
            .stdout(predicate::str::diff(format!("{}\n", expected)));
    }

    #[test]
    fn cache_list_empty() {
        let dir = TempDir::new().unwrap();
        let config = isolated_config(&dir, "");
        hoard(&config)
            .args(["cache", "list"])
            .assert()
            .success()
            .stdout(predicate::str::contains("No cached artifacts"));
    }

    #[test]
    fn cache_prune_respects_lowered_limit() {
        let dir = TempDir::new().unwrap();
        let config = isolated_config(&dir, "max_entries = 1");

        let cache_dir = dir.path().join("cache");
        fs::create_dir_all(&cache_dir).unwrap();
        for label in ["a", "b", "c"] {
            let name = hoard::hash::name_for(&[&label], "bin");
            fs::write(cache_dir.join(name), b"data").unwrap();
        }

        hoard(&config)
            .args(["cache", "prune"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Evicted 2 artifact(s)"));

        hoard(&config)
            .args(["cache", "list", "--format", "plain"])
            .assert()
            .success()
            .stdout(predicate::str::is_match(r"^[0-9a-f]{64}\.bin\n$").unwrap());
    }

    #[test]
    fn cache_clear_with_yes() {
        let dir = TempDir::new().unwrap();
        let config = isolated_config(&dir, "");

        let cache_dir = dir.path().join("cache");
        fs::create_dir_all(&cache_dir).unwrap();
        fs::write(cache_dir.join(hoard::hash::name_for(&[&"x"], "mp3")), b"audio").unwrap();

        hoard(&config)
            .args(["cache", "clear", "--yes"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Removed 1 artifact(s)"));
    }

    #[test]
    fn perms_lock_persists() {
        let dir = TempDir::new().unwrap();
        let config = isolated_config(&dir, "");

        hoard(&config)
            .args(["perms", "lock", "77"])
            .assert()
            .success()
            .stdout(predicate::str::contains("locked"));

        let stored = fs::read_to_string(dir.path().join("data").join("permissions.json")).unwrap();
        assert!(stored.contains(r#""gid":77,"locked":true"#));

        hoard(&config)
            .args(["perms", "show", "77"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Locked: yes"));
    }

    #[test]
    fn perms_corrupt_file_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let config = isolated_config(&dir, "");
        let data = dir.path().join("data");
        fs::create_dir_all(&data).unwrap();
        fs::write(data.join("permissions.json"), "not json").unwrap();

        // Corrupt content reads as empty, so showing falls back to defaults
        hoard(&config)
            .args(["perms", "show", "1"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Locked: no"));
    }

    #[test]
    fn voice_set_and_show() {
        let dir = TempDir::new().unwrap();
        let config = isolated_config(&dir, "");

        hoard(&config)
            .args(["voice", "1", "2", "--set-voice", "ja-JP", "--set-speed", "1.5"])
            .assert()
            .success()
            .stdout(predicate::str::contains("ja-JP").and(predicate::str::contains("1.50x")));

        hoard(&config)
            .args(["voice", "1", "2", "--set-speed", "9"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("outside"));

        hoard(&config)
            .args(["voice", "1", "2", "--set-voice", "de-DE", "--set-speed", "9"])
            .assert()
            .failure();

        hoard(&config)
            .args(["voice", "1", "2"])
            .assert()
            .success()
            .stdout(predicate::str::contains("ja-JP"));
    }

    #[test]
    fn perms_change_refused_on_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let config = isolated_config(&dir, "");
        let data = dir.path().join("data");
        fs::create_dir_all(&data).unwrap();
        let edited = r#"[{"gid":1,"locked":true},]"#;
        fs::write(data.join("permissions.json"), edited).unwrap();

        hoard(&config)
            .args(["perms", "lock", "2"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Corrupt content"));

        assert_eq!(
            fs::read_to_string(data.join("permissions.json")).unwrap(),
            edited
        );
    }
}
