//! Shared test harness utilities for punic-site crates.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use walkdir::WalkDir;

/// Creates a fresh temporary directory for a test.
pub fn temp_root() -> TempDir {
    TempDir::new().expect("tempdir")
}

/// Writes `contents` to `root/relative`, creating parent directories.
pub fn write_file(root: &Path, relative: &str, contents: &str) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent directory");
    }
    let mut file = fs::File::create(&path).expect("create file");
    file.write_all(contents.as_bytes()).expect("write file");
    path
}

/// Populates `root` with a small nested tree: files, an empty directory and
/// a couple of levels of subdirectories.
pub fn populate_tree(root: &Path) {
    write_file(root, "index.html", "<html></html>");
    write_file(root, "css/site.css", "body {}");
    write_file(root, "api/classes/Calendar.html", "calendar");
    write_file(root, "api/classes/Number.html", "number");
    write_file(root, "api/index.html", "api");
    fs::create_dir_all(root.join("empty/nested")).expect("create empty dirs");
}

/// Sorted list of paths below `root`, relative and `/`-separated.
pub fn tree_listing(root: &Path) -> Vec<String> {
    let mut found: Vec<String> = WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .map(|entry| {
            let entry = entry.expect("walk entry");
            entry
                .path()
                .strip_prefix(root)
                .expect("strip prefix")
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect();
    found.sort();
    found
}
