use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, OnceLock};

use tracing::Level;

static GLOBAL_LOG_FILE: OnceLock<LogFile> = OnceLock::new();

/// Append-only log file shared by every writer the subscriber hands out.
#[derive(Debug, Clone)]
pub struct LogFile {
    inner: Arc<Mutex<File>>,
}

impl LogFile {
    pub fn create(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            inner: Arc::new(Mutex::new(file)),
        })
    }

    fn with_file<T>(&self, f: impl FnOnce(&mut File) -> io::Result<T>) -> io::Result<T> {
        let mut file = self
            .inner
            .lock()
            .map_err(|_| io::Error::other("log file lock poisoned"))?;
        f(&mut file)
    }
}

pub fn set_global_log_file(file: LogFile) -> bool {
    GLOBAL_LOG_FILE.set(file).is_ok()
}

pub struct DelegatingWriter {
    inner: DelegatingInner,
}

enum DelegatingInner {
    File(LogFile),
    Stderr(io::Stderr),
}

impl DelegatingWriter {
    fn new() -> Self {
        match GLOBAL_LOG_FILE.get() {
            Some(file) => Self::from(file.clone()),
            None => DelegatingWriter {
                inner: DelegatingInner::Stderr(io::stderr()),
            },
        }
    }
}

impl From<LogFile> for DelegatingWriter {
    fn from(file: LogFile) -> Self {
        DelegatingWriter {
            inner: DelegatingInner::File(file),
        }
    }
}

impl Write for DelegatingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut self.inner {
            DelegatingInner::File(f) => f.with_file(|file| file.write(buf)),
            DelegatingInner::Stderr(s) => s.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.inner {
            DelegatingInner::File(f) => f.with_file(|file| file.flush()),
            DelegatingInner::Stderr(s) => s.flush(),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct SubscriberMakeWriter;

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for SubscriberMakeWriter {
    type Writer = DelegatingWriter;

    fn make_writer(&'a self) -> Self::Writer {
        DelegatingWriter::new()
    }
}

/// Install the global subscriber. Output goes to the global log file when
/// one is set, otherwise stderr. Safe to call multiple times; later calls
/// are no-ops for the global subscriber.
pub fn init_default() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_writer(SubscriberMakeWriter)
        .with_target(false)
        .with_thread_names(false)
        .with_ansi(GLOBAL_LOG_FILE.get().is_none())
        .try_init();
}

/// Open `log_path` (when given) as the global log file, then install the
/// subscriber.
pub fn init(log_path: Option<&Path>) -> io::Result<()> {
    if let Some(path) = log_path {
        set_global_log_file(LogFile::create(path)?);
    }
    init_default();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_writer_appends_through_shared_handle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dom-wm.log");
        let file = LogFile::create(&path).unwrap();

        let mut first = DelegatingWriter::from(file.clone());
        let mut second = DelegatingWriter::from(file);
        first.write_all(b"window created\n").unwrap();
        second.write_all(b"window closed\n").unwrap();
        first.flush().unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "window created\nwindow closed\n");
    }

    #[test]
    fn create_fails_for_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("dom-wm.log");
        assert!(LogFile::create(&path).is_err());
    }
}
