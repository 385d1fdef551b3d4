use std::ffi::OsString;
use std::io;
use std::path::Path;

/// Filesystem operations the switcher is allowed to perform.
///
/// Every mutation is a single rename or delete; nothing is ever copied. Implementations must
/// report failures instead of swallowing them, since the rotation engine stops at the first
/// failed step.
pub trait SlotFs {
    /// Whether a file exists at `path`. Advisory only: the answer can be stale by the time
    /// the caller acts on it.
    fn exists(&self, path: &Path) -> bool;

    /// Move `from` to `to`, replacing `to` if it exists.
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;

    /// Delete the file at `path`.
    fn remove_file(&self, path: &Path) -> io::Result<()>;

    /// File names of the entries in `dir`.
    fn list_dir(&self, dir: &Path) -> io::Result<Vec<OsString>>;

    /// Open `path` for writing (creating it, never truncating) and close it again.
    fn open_for_write(&self, path: &Path) -> io::Result<()>;

    /// Read the whole file at `path`.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Truncate `path` and write `bytes` to it.
    fn write(&self, path: &Path, bytes: &[u8]) -> io::Result<()>;
}

/// [`SlotFs`] backed by `std::fs`.
#[derive(Clone, Copy, Debug, Default)]
pub struct DiskFs;

impl SlotFs for DiskFs {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        std::fs::rename(from, to)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_file(path)
    }

    fn list_dir(&self, dir: &Path) -> io::Result<Vec<OsString>> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            names.push(entry?.file_name());
        }
        names.sort();
        Ok(names)
    }

    fn open_for_write(&self, path: &Path) -> io::Result<()> {
        std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map(drop)
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }

    fn write(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        std::fs::write(path, bytes)
    }
}

impl<T: SlotFs + ?Sized> SlotFs for &T {
    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        (**self).rename(from, to)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        (**self).remove_file(path)
    }

    fn list_dir(&self, dir: &Path) -> io::Result<Vec<OsString>> {
        (**self).list_dir(dir)
    }

    fn open_for_write(&self, path: &Path) -> io::Result<()> {
        (**self).open_for_write(path)
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        (**self).read(path)
    }

    fn write(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        (**self).write(path, bytes)
    }
}
