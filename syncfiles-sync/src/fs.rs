//! Filesystem primitives consumed by the synchronizer.
//!
//! [`FileSystem`] is the seam between the algorithm and the disk: the
//! synchronizer only ever asks for a modification time, a content-equality
//! check and a copy. [`LocalFs`] is the real implementation.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;
use std::time::SystemTime;

const COMPARE_CHUNK: usize = 8 * 1024;

/// The three filesystem operations a synchronization run needs.
pub trait FileSystem {
    /// Modification time of `path`. Fails if the path is missing or
    /// inaccessible.
    fn modified(&self, path: &Path) -> io::Result<SystemTime>;

    /// Byte-for-byte equality of the contents of `a` and `b`.
    fn same_contents(&self, a: &Path, b: &Path) -> io::Result<bool>;

    /// Copy contents and permission bits of `from` onto `to`, creating or
    /// truncating `to`. Missing parent directories are an error.
    fn copy(&self, from: &Path, to: &Path) -> io::Result<()>;
}

impl<F: FileSystem + ?Sized> FileSystem for &F {
    fn modified(&self, path: &Path) -> io::Result<SystemTime> {
        (**self).modified(path)
    }

    fn same_contents(&self, a: &Path, b: &Path) -> io::Result<bool> {
        (**self).same_contents(a, b)
    }

    fn copy(&self, from: &Path, to: &Path) -> io::Result<()> {
        (**self).copy(from, to)
    }
}

/// [`FileSystem`] backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl FileSystem for LocalFs {
    fn modified(&self, path: &Path) -> io::Result<SystemTime> {
        std::fs::metadata(path)?.modified()
    }

    fn same_contents(&self, a: &Path, b: &Path) -> io::Result<bool> {
        let file_a = File::open(a)?;
        let file_b = File::open(b)?;
        if file_a.metadata()?.len() != file_b.metadata()?.len() {
            return Ok(false);
        }
        streams_equal(BufReader::new(file_a), BufReader::new(file_b))
    }

    fn copy(&self, from: &Path, to: &Path) -> io::Result<()> {
        // std::fs::copy carries the permission bits across.
        std::fs::copy(from, to).map(|_| ())
    }
}

fn streams_equal(mut a: impl Read, mut b: impl Read) -> io::Result<bool> {
    let mut buf_a = [0u8; COMPARE_CHUNK];
    let mut buf_b = [0u8; COMPARE_CHUNK];
    loop {
        let n_a = fill(&mut a, &mut buf_a)?;
        let n_b = fill(&mut b, &mut buf_b)?;
        if n_a != n_b || buf_a[..n_a] != buf_b[..n_b] {
            return Ok(false);
        }
        if n_a == 0 {
            return Ok(true);
        }
    }
}

/// Read until `buf` is full or the reader hits EOF.
fn fill(reader: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    /// Reader that hands out at most `step` bytes per call.
    struct Trickle<'a> {
        data: &'a [u8],
        step: usize,
    }

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = self.step.min(buf.len()).min(self.data.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    #[test]
    fn short_reads_still_compare_equal() {
        let data = vec![7u8; COMPARE_CHUNK * 2 + 13];
        let a = Trickle { data: &data, step: 5 };
        let b = Trickle { data: &data, step: 4096 };
        assert!(streams_equal(a, b).unwrap());
    }

    #[test]
    fn difference_in_last_chunk_is_detected() {
        let a = vec![1u8; COMPARE_CHUNK + 10];
        let mut b = a.clone();
        *b.last_mut().unwrap() = 2;
        assert!(!streams_equal(a.as_slice(), b.as_slice()).unwrap());
    }

    #[test]
    fn same_contents_compares_bytes_not_metadata() {
        let tmp = TempDir::new().unwrap();
        let a = tmp.path().join("a");
        let b = tmp.path().join("b");
        fs::write(&a, "abc").unwrap();
        fs::write(&b, "abd").unwrap();
        assert!(!LocalFs.same_contents(&a, &b).unwrap());

        fs::write(&b, "abc").unwrap();
        assert!(LocalFs.same_contents(&a, &b).unwrap());
    }

    #[test]
    fn same_contents_errors_on_missing_side() {
        let tmp = TempDir::new().unwrap();
        let a = tmp.path().join("a");
        fs::write(&a, "abc").unwrap();
        assert!(LocalFs.same_contents(&a, &tmp.path().join("missing")).is_err());
    }

    #[test]
    fn modified_errors_on_missing_file() {
        let tmp = TempDir::new().unwrap();
        let err = LocalFs.modified(&tmp.path().join("nope")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn copy_does_not_create_parent_directories() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        fs::write(&src, "x").unwrap();
        let dst = tmp.path().join("no").join("such").join("dir");
        assert!(LocalFs.copy(&src, &dst).is_err());
        assert!(!dst.exists());
    }

    #[cfg(unix)]
    #[test]
    fn copy_carries_permission_bits() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src.sh");
        let dst = tmp.path().join("dst.sh");
        fs::write(&src, "#!/bin/sh\n").unwrap();
        fs::set_permissions(&src, fs::Permissions::from_mode(0o750)).unwrap();
        fs::write(&dst, "old").unwrap();
        fs::set_permissions(&dst, fs::Permissions::from_mode(0o644)).unwrap();

        LocalFs.copy(&src, &dst).unwrap();

        assert_eq!(fs::read_to_string(&dst).unwrap(), "#!/bin/sh\n");
        let mode = fs::metadata(&dst).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o750);
    }
}
