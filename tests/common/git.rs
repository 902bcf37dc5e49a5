//! Scratch git repositories for tests that drive the real `git` executable.

use std::path::{Path, PathBuf};
use std::process::Command;

/// Path of the git executable, or `None` when git is not installed
pub fn executable() -> Option<PathBuf> {
    which::which("git").ok()
}

/// Run git in `dir`, panicking on failure; returns stdout
pub fn run(git: &Path, dir: &Path, args: &[&str]) -> String {
    let output = Command::new(git)
        .args(args)
        .current_dir(dir)
        .output()
        .expect("spawn git");
    assert!(
        output.status.success(),
        "git {} failed: {}",
        args.join(" "),
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Initialise a repository at `root` with `files` committed as "init"
pub fn init_repository(git: &Path, root: &Path, files: &[(&str, &str)]) {
    run(git, root, &["init", "-q"]);
    run(git, root, &["config", "user.name", "Release Tests"]);
    run(git, root, &["config", "user.email", "release@example.org"]);
    run(git, root, &["config", "commit.gpgsign", "false"]);
    run(git, root, &["config", "tag.gpgsign", "false"]);

    for (path, contents) in files {
        let file = root.join(path);
        if let Some(parent) = file.parent() {
            std::fs::create_dir_all(parent).expect("create parent");
        }
        std::fs::write(file, contents).expect("write file");
    }
    run(git, root, &["add", "-A"]);
    run(git, root, &["commit", "-q", "-m", "init"]);
}

/// Commit subjects, newest first
pub fn subjects(git: &Path, dir: &Path) -> Vec<String> {
    run(git, dir, &["log", "--format=%s"])
        .lines()
        .map(str::to_string)
        .collect()
}
