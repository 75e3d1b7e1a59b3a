//! Local filesystem adapter using std::fs.

use std::io;
use std::path::Path;

use strata_core::{
    application::{
        ApplicationError,
        ports::{DirEntry, EntryKind, Filesystem},
    },
    error::{StrataError, StrataResult},
};

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn create_dir_all(&self, path: &Path) -> StrataResult<()> {
        std::fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn write_file(&self, path: &Path, content: &str) -> StrataResult<()> {
        if let Some(parent) = path.parent() {
            self.create_dir_all(parent)?;
        }
        std::fs::write(path, content).map_err(|e| map_io_error(path, e, "write file"))
    }

    fn read_to_string(&self, path: &Path) -> StrataResult<String> {
        std::fs::read_to_string(path).map_err(|e| map_io_error(path, e, "read file"))
    }

    fn copy_file(&self, from: &Path, to: &Path) -> StrataResult<()> {
        // A read-only file from an earlier layer must not block the overwrite.
        if let Ok(meta) = std::fs::metadata(to) {
            let mut perms = meta.permissions();
            if perms.readonly() {
                #[allow(clippy::permissions_set_readonly_false)]
                perms.set_readonly(false);
                std::fs::set_permissions(to, perms)
                    .map_err(|e| map_io_error(to, e, "make writable"))?;
            }
        }
        std::fs::copy(from, to)
            .map(|_| ())
            .map_err(|e| map_io_error(to, e, "copy file"))
    }

    fn copy_permissions(&self, from: &Path, to: &Path) -> StrataResult<()> {
        let perms = std::fs::metadata(from)
            .map_err(|e| map_io_error(from, e, "stat"))?
            .permissions();
        std::fs::set_permissions(to, perms).map_err(|e| map_io_error(to, e, "set permissions"))
    }

    fn read_dir(&self, path: &Path) -> StrataResult<Vec<DirEntry>> {
        let reader = std::fs::read_dir(path).map_err(|e| map_io_error(path, e, "read directory"))?;

        let mut entries = Vec::new();
        for entry in reader {
            let entry = entry.map_err(|e| map_io_error(path, e, "read directory entry"))?;
            let entry_path = entry.path();
            // symlink_metadata: links are reported as `Other`, never followed.
            let file_type = std::fs::symlink_metadata(&entry_path)
                .map_err(|e| map_io_error(&entry_path, e, "stat"))?
                .file_type();
            let kind = if file_type.is_dir() {
                EntryKind::Directory
            } else if file_type.is_file() {
                EntryKind::File
            } else {
                EntryKind::Other
            };
            entries.push(DirEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                path: entry_path,
                kind,
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn remove_file(&self, path: &Path) -> StrataResult<()> {
        std::fs::remove_file(path).map_err(|e| map_io_error(path, e, "remove file"))
    }

    fn remove_dir_all(&self, path: &Path) -> StrataResult<()> {
        std::fs::remove_dir_all(path).map_err(|e| map_io_error(path, e, "remove directory"))
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> StrataError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn read_dir_is_sorted_and_typed() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir(tmp.path().join("b")).unwrap();
        std::fs::write(tmp.path().join("a.txt"), "x").unwrap();

        let entries = LocalFilesystem.read_dir(tmp.path()).unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a.txt", "b"]);
        assert!(entries[0].is_file());
        assert!(entries[1].is_dir());
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_are_other() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("real"), "x").unwrap();
        std::os::unix::fs::symlink(tmp.path().join("real"), tmp.path().join("link")).unwrap();

        let entries = LocalFilesystem.read_dir(tmp.path()).unwrap();
        let link = entries.iter().find(|e| e.name == "link").unwrap();
        assert_eq!(link.kind, EntryKind::Other);
    }

    #[test]
    fn copy_overwrites_existing_file() {
        let tmp = TempDir::new().unwrap();
        let from = tmp.path().join("from");
        let to = tmp.path().join("to");
        std::fs::write(&from, "new").unwrap();
        std::fs::write(&to, "old").unwrap();

        LocalFilesystem.copy_file(&from, &to).unwrap();
        assert_eq!(std::fs::read_to_string(&to).unwrap(), "new");
    }

    #[cfg(unix)]
    #[test]
    fn copy_permissions_keeps_content() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let from = tmp.path().join("run.marker.sh");
        let to = tmp.path().join("run.sh");
        std::fs::write(&from, "old").unwrap();
        std::fs::write(&to, "rendered").unwrap();
        std::fs::set_permissions(&from, std::fs::Permissions::from_mode(0o750)).unwrap();

        LocalFilesystem.copy_permissions(&from, &to).unwrap();

        let mode = std::fs::metadata(&to).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o750);
        assert_eq!(std::fs::read_to_string(&to).unwrap(), "rendered");
    }

    #[test]
    fn missing_directory_maps_to_filesystem_error() {
        let err = LocalFilesystem
            .read_dir(Path::new("/definitely/not/here"))
            .unwrap_err();
        assert!(matches!(
            err,
            StrataError::Application(ApplicationError::FilesystemError { .. })
        ));
    }
}
