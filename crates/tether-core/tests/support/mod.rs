#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use tether_core::Repository;
use tether_core::config::{GitConfig, Identity};

static FILE_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Config isolated from the host's global and system git settings.
pub fn hermetic_config() -> GitConfig {
    GitConfig::new()
        .with_identity(Identity::new("Tether Tests", "tests@tether.invalid"))
        .with_setting("init.defaultBranch", "main")
        .with_setting("commit.gpgsign", "false")
        .with_setting("pull.rebase", "false")
        .with_env("GIT_CONFIG_NOSYSTEM", "1")
        .with_env("GIT_CONFIG_GLOBAL", "/dev/null")
}

/// Repository handle for `<root>/<name>`, creating the directory.
pub fn repository(root: &Path, name: &str) -> Repository {
    let cwd = root.join(name);
    std::fs::create_dir_all(&cwd).expect("create_dir_all should succeed");
    Repository::open(&cwd)
        .expect("open should succeed")
        .with_config(&hermetic_config())
}

/// Repository handle for `<root>/<name>` without creating anything.
pub fn missing_repository(root: &Path, name: &str) -> Repository {
    Repository::open_allow_missing(root.join(name))
        .expect("open_allow_missing should succeed")
        .with_config(&hermetic_config())
}

/// Create a new empty file with a unique name and return that name.
pub fn make_dirty(repo: &Repository) -> String {
    let n = FILE_COUNTER.fetch_add(1, Ordering::SeqCst);
    let name = format!("file-{}-{n:04}.txt", std::process::id());
    touch(repo.cwd(), &name);
    name
}

pub fn touch(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create_dir_all should succeed");
    }
    std::fs::write(&path, b"").expect("write should succeed");
    path
}

/// An initialized repository with one commit containing `README.md`.
pub fn seeded_repository(root: &Path, name: &str) -> Repository {
    let repo = missing_repository(root, name);
    repo.init().execute().expect("init should succeed");
    std::fs::write(repo.cwd().join("README.md"), "seed\n").expect("write should succeed");
    repo.add()
        .file_pattern("README.md")
        .expect("pattern should be accepted")
        .execute()
        .expect("add should succeed");
    repo.commit("Seed repository").expect("commit should succeed");
    repo
}
