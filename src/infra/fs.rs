//! # File System Operations Module / 文件系统操作模块
//!
//! This module provides the file system helpers used by discovery and the
//! case runner: the executability check, the candidate walk over directories
//! and private scratch directories for test runs.
//!
//! 此模块提供发现和用例运行器使用的文件系统辅助功能：
//! 可执行性检查、目录候选文件遍历以及测试运行的私有临时目录。

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Checks whether `path` is a regular file the current user may execute.
///
/// Any error while reading the metadata, including the file having vanished
/// since it was listed, counts as "not executable".
///
/// 检查 `path` 是否为当前用户可执行的普通文件。
/// 读取元数据时的任何错误（包括文件在列出后消失）均视为“不可执行”。
pub fn is_executable(path: &Path) -> bool {
    let Ok(metadata) = fs::metadata(path) else {
        return false;
    };
    if !metadata.is_file() {
        return false;
    }
    has_exec_permission(path, &metadata)
}

#[cfg(unix)]
fn has_exec_permission(_path: &Path, metadata: &fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o100 != 0
}

#[cfg(not(unix))]
fn has_exec_permission(path: &Path, _metadata: &fs::Metadata) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("exe"))
}

/// A file that may be a test executable, together with whether the user
/// named it explicitly.
/// 可能是测试可执行文件的文件，以及用户是否显式指定了它。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub path: PathBuf,
    /// Explicit targets bypass the file name masks.
    /// 显式目标会跳过文件名掩码过滤。
    pub explicit: bool,
}

/// Expands the paths given on the command line into candidate files.
///
/// Files are explicit targets. Directories are walked recursively in sorted
/// order; entries that cannot be read are skipped, because files may come
/// and go while the walk is in progress.
///
/// 将命令行给出的路径展开为候选文件。
/// 文件是显式目标。目录按排序顺序递归遍历；无法读取的条目会被跳过。
pub fn collect_candidates(roots: &[PathBuf]) -> Vec<Candidate> {
    let mut candidates = Vec::new();
    for root in roots {
        if root.is_dir() {
            walk(root, &mut candidates);
        } else {
            candidates.push(Candidate {
                path: root.clone(),
                explicit: true,
            });
        }
    }
    candidates
}

fn walk(dir: &Path, out: &mut Vec<Candidate>) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!("skipping unreadable directory {}: {e}", dir.display());
            return;
        }
    };
    let mut entries: Vec<fs::DirEntry> = entries.filter_map(Result::ok).collect();
    entries.sort_by_key(fs::DirEntry::path);

    for entry in entries {
        let path = entry.path();
        if is_hidden(&path) {
            continue;
        }
        // Symlinked directories are not descended into; a link back to an
        // ancestor would otherwise be walked again and again.
        let is_dir = entry.file_type().is_ok_and(|kind| kind.is_dir());
        if is_dir {
            walk(&path, out);
        } else {
            out.push(Candidate {
                path,
                explicit: false,
            });
        }
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with('.'))
}

/// Creates a private scratch directory for one test run. The directory is
/// deleted when the returned guard is dropped.
/// 为一次测试运行创建私有临时目录。返回的 guard 被丢弃时目录会被删除。
pub fn scratch_dir() -> std::io::Result<TempDir> {
    tempfile::Builder::new().prefix("native_test_").tempdir()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_path_is_not_executable() {
        let dir = tempdir().unwrap();
        assert!(!is_executable(&dir.path().join("vanished")));
    }

    #[test]
    fn directory_is_not_executable() {
        let dir = tempdir().unwrap();
        assert!(!is_executable(dir.path()));
    }

    #[cfg(unix)]
    #[test]
    fn exec_bit_decides_executability() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempdir().unwrap();
        let path = dir.path().join("test_math");
        fs::write(&path, "#!/bin/sh\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();
        assert!(!is_executable(&path));
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        assert!(is_executable(&path));
    }

    #[test]
    fn walk_is_sorted_recursive_and_skips_hidden() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("sub")).unwrap();
        fs::create_dir_all(dir.path().join(".git")).unwrap();
        fs::write(dir.path().join("b_test"), "").unwrap();
        fs::write(dir.path().join("a_test"), "").unwrap();
        fs::write(dir.path().join("sub/test_c"), "").unwrap();
        fs::write(dir.path().join(".git/test_hidden"), "").unwrap();

        let found = collect_candidates(&[dir.path().to_path_buf()]);
        let names: Vec<_> = found
            .iter()
            .map(|c| c.path.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            names,
            vec![PathBuf::from("a_test"), PathBuf::from("b_test"), PathBuf::from("sub/test_c")]
        );
        assert!(found.iter().all(|c| !c.explicit));
    }

    #[cfg(unix)]
    #[test]
    fn walk_does_not_follow_symlinked_directories() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/test_math"), "").unwrap();
        std::os::unix::fs::symlink("..", dir.path().join("sub/up")).unwrap();

        let found = collect_candidates(&[dir.path().to_path_buf()]);
        let tests: Vec<_> = found.iter().filter(|c| c.path.ends_with("test_math")).collect();
        assert_eq!(tests.len(), 1);
        assert_eq!(found.len(), 2);
        assert!(!is_executable(&dir.path().join("sub/up")));
    }

    #[test]
    fn files_given_directly_are_explicit() {
        let found = collect_candidates(&[PathBuf::from("some/binary")]);
        assert_eq!(
            found,
            vec![Candidate {
                path: PathBuf::from("some/binary"),
                explicit: true
            }]
        );
    }
}
