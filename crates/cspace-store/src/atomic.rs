//! All-or-nothing file writes.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::StoreError;

/// A file written under `<path>.tmp` and renamed into place on
/// [`commit`](Self::commit).
///
/// Dropping the guard without committing removes the temporary file, so
/// an error or panic mid-write never leaves a partial artifact at `path`.
///
/// # Examples
///
/// ```
/// use std::io::Write;
/// use cspace_store::AtomicFile;
///
/// let dir = std::env::temp_dir().join(format!("cspace-atomic-doc-{}", std::process::id()));
/// let path = dir.join("artifact.cspace");
///
/// let mut file = AtomicFile::create(&path).unwrap();
/// file.write_all(b"payload").unwrap();
/// assert!(!path.exists());
/// file.commit().unwrap();
/// assert_eq!(std::fs::read(&path).unwrap(), b"payload");
/// # std::fs::remove_dir_all(&dir).unwrap();
/// ```
#[derive(Debug)]
pub struct AtomicFile {
    path: PathBuf,
    tmp: PathBuf,
    writer: Option<BufWriter<File>>,
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

impl AtomicFile {
    /// Open `<path>.tmp` for writing, creating parent directories.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = tmp_path(&path);
        let file = File::create(&tmp)?;
        Ok(Self {
            path,
            tmp,
            writer: Some(BufWriter::new(file)),
        })
    }

    /// Final destination.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flush, sync and rename the temporary file onto the destination.
    pub fn commit(mut self) -> Result<(), StoreError> {
        let writer = self.writer.take();
        let result = (|| -> io::Result<()> {
            if let Some(writer) = writer {
                let file = writer.into_inner().map_err(|e| e.into_error())?;
                file.sync_all()?;
            }
            fs::rename(&self.tmp, &self.path)
        })();
        if let Err(e) = result {
            let _ = fs::remove_file(&self.tmp);
            return Err(e.into());
        }
        log::debug!("committed {}", self.path.display());
        Ok(())
    }

    fn writer(&mut self) -> io::Result<&mut BufWriter<File>> {
        self.writer
            .as_mut()
            .ok_or_else(|| io::Error::other("atomic file already committed"))
    }
}

impl Write for AtomicFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer()?.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer()?.flush()
    }
}

impl Drop for AtomicFile {
    fn drop(&mut self) {
        // Still holding the writer means commit never ran.
        if self.writer.take().is_some() {
            if let Err(e) = fs::remove_file(&self.tmp) {
                log::warn!("could not remove {}: {e}", self.tmp.display());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cspace_test_utils::scratch_dir;

    #[test]
    fn uncommitted_file_leaves_nothing_behind() {
        let dir = scratch_dir("atomic-drop");
        let path = dir.join("a.cspace");
        {
            let mut f = AtomicFile::create(&path).unwrap();
            f.write_all(b"partial").unwrap();
            assert!(tmp_path(&path).exists());
        }
        assert!(!path.exists());
        assert!(!tmp_path(&path).exists());
    }

    #[test]
    fn commit_replaces_existing_file() {
        let dir = scratch_dir("atomic-replace");
        let path = dir.join("nested/b.cspace");
        let mut first = AtomicFile::create(&path).unwrap();
        first.write_all(b"old").unwrap();
        first.commit().unwrap();

        let mut second = AtomicFile::create(&path).unwrap();
        second.write_all(b"new").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"old");
        second.commit().unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"new");
        assert!(!tmp_path(&path).exists());
    }
}
