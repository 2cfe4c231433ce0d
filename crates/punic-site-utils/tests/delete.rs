use std::fs;

use punic_site_test_support::{populate_tree, temp_root, tree_listing, write_file};
use punic_site_utils::{delete_recursive, ensure_directory, DeleteMode};

#[test]
fn deletes_directory_and_everything_inside() {
    let temp = temp_root();
    let target = temp.path().join("docs");
    populate_tree(&target);

    delete_recursive(&target, DeleteMode::Everything).expect("delete tree");

    assert!(!target.exists());
    assert!(temp.path().is_dir());
}

#[test]
fn contents_only_keeps_the_directory() {
    let temp = temp_root();
    let target = temp.path().join("docs");
    populate_tree(&target);

    delete_recursive(&target, DeleteMode::ContentsOnly).expect("empty tree");

    assert!(target.is_dir());
    assert!(tree_listing(&target).is_empty());
}

#[test]
fn contents_only_on_empty_directory_is_fine() {
    let temp = temp_root();

    delete_recursive(temp.path(), DeleteMode::ContentsOnly).expect("empty tree");

    assert!(temp.path().is_dir());
}

#[test]
fn deletes_a_single_file() {
    let temp = temp_root();
    let file = write_file(temp.path(), "notes.txt", "bye");

    delete_recursive(&file, DeleteMode::Everything).expect("delete file");

    assert!(!file.exists());
}

#[test]
fn single_file_is_deleted_even_in_contents_only_mode() {
    let temp = temp_root();
    let file = write_file(temp.path(), "notes.txt", "bye");

    delete_recursive(&file, DeleteMode::ContentsOnly).expect("delete file");

    assert!(!file.exists());
}

#[test]
fn missing_path_is_a_no_op() {
    let temp = temp_root();
    let missing = temp.path().join("does/not/exist");

    delete_recursive(&missing, DeleteMode::Everything).expect("no-op");
    delete_recursive(&missing, DeleteMode::ContentsOnly).expect("no-op");

    assert!(!missing.exists());
}

#[test]
fn siblings_outside_the_target_survive() {
    let temp = temp_root();
    populate_tree(&temp.path().join("docs"));
    write_file(temp.path(), "keep/me.txt", "still here");

    delete_recursive(&temp.path().join("docs"), DeleteMode::Everything).expect("delete");

    assert_eq!(tree_listing(temp.path()), vec!["keep", "keep/me.txt"]);
}

#[cfg(unix)]
#[test]
fn symlinks_are_removed_without_touching_their_targets() {
    use std::os::unix::fs::symlink;

    let temp = temp_root();
    let outside = temp.path().join("outside");
    write_file(&outside, "precious.txt", "do not delete");

    let target = temp.path().join("docs");
    populate_tree(&target);
    symlink(&outside, target.join("linked-dir")).expect("dir symlink");
    symlink(outside.join("precious.txt"), target.join("linked-file")).expect("file symlink");
    symlink(temp.path().join("nowhere"), target.join("dangling")).expect("dangling symlink");

    delete_recursive(&target, DeleteMode::Everything).expect("delete tree");

    assert!(!target.exists());
    assert_eq!(
        fs::read_to_string(outside.join("precious.txt")).expect("read precious"),
        "do not delete"
    );
}

#[cfg(unix)]
#[test]
fn symlink_to_directory_as_target_is_only_unlinked() {
    use std::os::unix::fs::symlink;

    let temp = temp_root();
    let real = temp.path().join("real");
    populate_tree(&real);
    let link = temp.path().join("link");
    symlink(&real, &link).expect("symlink");

    delete_recursive(&link, DeleteMode::ContentsOnly).expect("unlink");

    assert!(fs::symlink_metadata(&link).is_err());
    assert!(real.join("index.html").is_file());
}

#[test]
fn ensure_directory_creates_missing_ancestors() {
    let temp = temp_root();
    let nested = temp.path().join("a/b/c");

    ensure_directory(&nested).expect("create nested");

    assert!(nested.is_dir());
}

#[test]
fn ensure_directory_is_idempotent() {
    let temp = temp_root();
    let target = temp.path().join("docs");
    write_file(&target, "index.html", "kept");

    ensure_directory(&target).expect("first");
    ensure_directory(&target).expect("second");

    assert_eq!(
        fs::read_to_string(target.join("index.html")).expect("read"),
        "kept"
    );
}

#[test]
fn ensure_directory_fails_when_a_file_is_in_the_way() {
    let temp = temp_root();
    let blocker = write_file(temp.path(), "blocker", "file");

    let err = ensure_directory(&blocker.join("child")).expect_err("must fail");

    assert_eq!(
        err.to_string(),
        format!("Failed to create the directory {}", blocker.join("child").display())
    );
}

#[cfg(unix)]
mod failures {
    use std::error::Error;
    use std::fs;
    use std::io;
    use std::path::Path;

    use nix::unistd::geteuid;
    use punic_site_test_support::{temp_root, write_file};
    use punic_site_utils::{delete_recursive, DeleteMode, FsError};
    use std::os::unix::fs::PermissionsExt;

    // Permission bits do not stop root, so these only run unprivileged.
    fn privileged() -> bool {
        geteuid().is_root()
    }

    fn chmod(path: &Path, mode: u32) {
        fs::set_permissions(path, fs::Permissions::from_mode(mode)).expect("chmod");
    }

    fn io_kind(err: &FsError) -> Option<io::ErrorKind> {
        err.source()
            .and_then(|source| source.downcast_ref::<io::Error>())
            .map(io::Error::kind)
    }

    #[test]
    fn undeletable_file_reports_failure() {
        if privileged() {
            return;
        }
        let temp = temp_root();
        let file = write_file(temp.path(), "frozen/page.html", "stuck");
        chmod(&temp.path().join("frozen"), 0o555);

        let err = delete_recursive(&file, DeleteMode::Everything).expect_err("must fail");

        chmod(&temp.path().join("frozen"), 0o755);
        assert!(matches!(err, FsError::DeleteFile { .. }));
        assert_eq!(
            err.to_string(),
            format!("Failed to delete the file {}", file.display())
        );
        assert_eq!(io_kind(&err), Some(io::ErrorKind::PermissionDenied));
        assert!(file.is_file());
    }

    #[test]
    fn undeletable_directory_reports_failure() {
        if privileged() {
            return;
        }
        let temp = temp_root();
        let frozen = temp.path().join("frozen");
        let inner = frozen.join("inner");
        fs::create_dir_all(&inner).expect("create inner");
        chmod(&frozen, 0o555);

        let err = delete_recursive(&inner, DeleteMode::Everything).expect_err("must fail");

        chmod(&frozen, 0o755);
        assert!(matches!(err, FsError::DeleteDirectory { .. }));
        assert_eq!(
            err.to_string(),
            format!("Failed to delete the directory {}", inner.display())
        );
        assert_eq!(io_kind(&err), Some(io::ErrorKind::PermissionDenied));
        assert!(inner.is_dir());
    }

    #[test]
    fn unreadable_subdirectory_reports_listing_failure() {
        if privileged() {
            return;
        }
        let temp = temp_root();
        let docs = temp.path().join("docs");
        write_file(&docs, "a.html", "first");
        write_file(&docs, "sealed/secret.html", "hidden");
        let sealed = docs.join("sealed");
        chmod(&sealed, 0o000);

        let err = delete_recursive(&docs, DeleteMode::Everything).expect_err("must fail");

        chmod(&sealed, 0o755);
        assert!(matches!(err, FsError::ListDirectory { .. }));
        assert_eq!(
            err.to_string(),
            format!(
                "Failed to retrieve the contents of the directory {}",
                sealed.display()
            )
        );
        assert_eq!(io_kind(&err), Some(io::ErrorKind::PermissionDenied));
        assert!(!docs.join("a.html").exists());
        assert!(sealed.join("secret.html").is_file());
    }

    #[test]
    fn entries_removed_before_a_failure_stay_removed() {
        if privileged() {
            return;
        }
        let temp = temp_root();
        let docs = temp.path().join("docs");
        write_file(&docs, "a.html", "first");
        write_file(&docs, "b/page.html", "second");
        let stuck = write_file(&docs, "z-frozen/page.html", "stuck");
        chmod(&docs.join("z-frozen"), 0o555);

        let err = delete_recursive(&docs, DeleteMode::ContentsOnly).expect_err("must fail");

        chmod(&docs.join("z-frozen"), 0o755);
        assert!(matches!(err, FsError::DeleteFile { .. }));
        assert!(!docs.join("a.html").exists());
        assert!(!docs.join("b").exists());
        assert!(stuck.is_file());
        assert!(docs.is_dir());
    }
}
