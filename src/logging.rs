//! Logging setup.
//!
//! Installs a `tracing` subscriber with an optional size-rotating log file
//! and an optional stderr layer for debug / verbose runs.

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

use crate::config::{Config, LogLevel};

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
        }
    }
}

/// Install the global subscriber. Safe to call more than once.
pub fn init(config: &Config) {
    let file_layer = if config.enable_logging {
        match RotatingWriter::open(
            &config.log_file,
            config.log_rotation_size,
            config.log_rotation_count,
        ) {
            Ok(writer) => Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(false)
                    .with_writer(move || writer.clone())
                    .with_filter(LevelFilter::from(config.log_level)),
            ),
            Err(e) => {
                eprintln!(
                    "Warning: Could not open log file {}: {}. File logging disabled.",
                    config.log_file.display(),
                    e
                );
                None
            }
        }
    } else {
        None
    };

    let stderr_level = if config.debug_mode {
        Some("debug")
    } else if config.verbose_mode {
        Some("info")
    } else {
        None
    };
    let stderr_layer = stderr_level.map(|level| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
        fmt::layer()
            .with_target(false)
            .with_writer(io::stderr)
            .with_filter(filter)
    });

    let _ = tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .try_init();
}

/// Run `f`, logging its duration when performance monitoring is on.
pub fn timed<T>(enabled: bool, operation: &str, f: impl FnOnce() -> T) -> T {
    if !enabled {
        return f();
    }
    let start = Instant::now();
    let result = f();
    tracing::info!(
        target: "perf",
        operation,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "operation timed"
    );
    result
}

// ============================================================================
// Rotating file
// ============================================================================

/// A log file that rotates to `<path>.1`, `<path>.2`, ... once it would
/// exceed `max_bytes`. At most `max_files` rotated files are kept.
#[derive(Debug)]
pub struct RotatingFile {
    path: PathBuf,
    max_bytes: u64,
    max_files: u32,
    file: Option<File>,
    size: u64,
}

impl RotatingFile {
    pub fn open(path: &Path, max_bytes: u64, max_files: u32) -> io::Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let size = file.metadata()?.len();
        Ok(Self {
            path: path.to_path_buf(),
            max_bytes,
            max_files,
            file: Some(file),
            size,
        })
    }

    /// Path of the n-th rotated file.
    pub fn rotated_path(path: &Path, n: u32) -> PathBuf {
        let mut name: OsString = path.as_os_str().to_owned();
        name.push(format!(".{}", n));
        PathBuf::from(name)
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file = None;
        let shifted = self.shift_files();

        // Reopen even when shifting failed so later writes still land.
        self.file = Some(
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)?,
        );
        shifted?;
        self.size = 0;
        Ok(())
    }

    fn shift_files(&self) -> io::Result<()> {
        if self.max_files == 0 {
            File::create(&self.path)?;
            return Ok(());
        }

        let oldest = Self::rotated_path(&self.path, self.max_files);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }
        for n in (1..self.max_files).rev() {
            let from = Self::rotated_path(&self.path, n);
            if from.exists() {
                fs::rename(&from, Self::rotated_path(&self.path, n + 1))?;
            }
        }
        fs::rename(&self.path, Self::rotated_path(&self.path, 1))
    }
}

impl Write for RotatingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.size > 0 && self.size + buf.len() as u64 > self.max_bytes {
            self.rotate()?;
        }
        let file = match self.file.as_mut() {
            Some(f) => f,
            None => return Err(io::Error::other("log file is not open")),
        };
        let written = file.write(buf)?;
        self.size += written as u64;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.file.as_mut() {
            Some(f) => f.flush(),
            None => Ok(()),
        }
    }
}

/// Shareable handle to a [`RotatingFile`], usable as a `fmt` layer writer.
#[derive(Debug, Clone)]
pub struct RotatingWriter {
    inner: Arc<Mutex<RotatingFile>>,
}

impl RotatingWriter {
    pub fn open(path: &Path, max_bytes: u64, max_files: u32) -> io::Result<Self> {
        Ok(Self {
            inner: Arc::new(Mutex::new(RotatingFile::open(path, max_bytes, max_files)?)),
        })
    }
}

impl Write for RotatingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner
            .lock()
            .map_err(|_| io::Error::other("log writer lock poisoned"))?
            .write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner
            .lock()
            .map_err(|_| io::Error::other("log writer lock poisoned"))?
            .flush()
    }
}
