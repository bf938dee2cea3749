// DomainLens - platform/fs.rs
//
// Dataset file access. Enforces the size cap before reading and decodes
// content lossily so a stray non-UTF-8 byte never rejects a whole dataset.

use crate::util::error::LoadError;
use std::io;
use std::path::Path;
use std::time::Duration;

/// Retry limits for transient I/O errors within a single read. A read that
/// still fails is returned as a load failure, which is never retried.
const MAX_RETRIES: u32 = 3;
const RETRY_DELAYS_MS: [u64; 3] = [50, 100, 200];

/// Read a dataset file into a string.
///
/// Fails with `FileTooLarge` when the file exceeds `max_bytes`. Invalid UTF-8
/// sequences are replaced with U+FFFD.
pub fn read_dataset(path: &Path, max_bytes: u64) -> Result<String, LoadError> {
    let io_error = |e| LoadError::Io {
        path: path.to_path_buf(),
        source: e,
    };

    let size = std::fs::metadata(path).map_err(io_error)?.len();
    if size > max_bytes {
        return Err(LoadError::FileTooLarge {
            path: path.to_path_buf(),
            size,
            max_size: max_bytes,
        });
    }

    let bytes = read_with_retry(path).map_err(io_error)?;
    let text = String::from_utf8_lossy(&bytes);
    if let std::borrow::Cow::Owned(_) = text {
        tracing::warn!(path = %path.display(), "Dataset contains invalid UTF-8; replaced");
    }
    tracing::debug!(path = %path.display(), bytes = size, "Dataset read");
    Ok(text.into_owned())
}

/// Read a file, retrying transient errors with capped backoff.
fn read_with_retry(path: &Path) -> io::Result<Vec<u8>> {
    let mut last_err: Option<io::Error> = None;

    for attempt in 0..MAX_RETRIES {
        match std::fs::read(path) {
            Ok(bytes) => return Ok(bytes),
            Err(e) if is_transient_error(&e) => {
                tracing::debug!(
                    file = %path.display(),
                    attempt = attempt + 1,
                    error = %e,
                    "Transient I/O error, retrying"
                );
                std::thread::sleep(Duration::from_millis(RETRY_DELAYS_MS[attempt as usize]));
                last_err = Some(e);
            }
            Err(e) => return Err(e),
        }
    }

    Err(last_err.unwrap_or_else(|| io::Error::other("Unknown read error")))
}

fn is_transient_error(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted | io::ErrorKind::TimedOut
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_reads_small_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"Domain,Family\nA,B\n").unwrap();
        let text = read_dataset(file.path(), 1024).unwrap();
        assert_eq!(text, "Domain,Family\nA,B\n");
    }

    #[test]
    fn test_rejects_oversized_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[b'a'; 64]).unwrap();
        let err = read_dataset(file.path(), 16).unwrap_err();
        assert!(matches!(
            err,
            LoadError::FileTooLarge {
                size: 64,
                max_size: 16,
                ..
            }
        ));
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"Domain\nCaf\xe9\n").unwrap();
        let text = read_dataset(file.path(), 1024).unwrap();
        assert!(text.contains("Caf\u{fffd}"));
    }

    #[test]
    fn test_only_transient_errors_are_retried() {
        assert!(is_transient_error(&io::Error::from(io::ErrorKind::Interrupted)));
        assert!(is_transient_error(&io::Error::from(io::ErrorKind::TimedOut)));
        assert!(!is_transient_error(&io::Error::from(io::ErrorKind::NotFound)));
        assert!(!is_transient_error(&io::Error::from(io::ErrorKind::PermissionDenied)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_dataset(&dir.path().join("absent.csv"), 1024).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
