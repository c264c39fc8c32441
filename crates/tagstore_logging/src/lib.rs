//! Logging setup for the tagstore CLI.
//!
//! Two sinks: a size-capped log file under `$TAGSTORE_HOME/logs` that records
//! every move and scan at `info`, and stderr, which stays quiet (`warn`)
//! unless the user asks for `--verbose`. stdout is never touched; it carries
//! command output.

use anyhow::{Context, Result};
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Environment variable overriding the tagstore home directory
pub const HOME_ENV: &str = "TAGSTORE_HOME";

const FILE_DIRECTIVES: &str = "tagstore=info,tagstore_core=info";
const VERBOSE_DIRECTIVES: &str = "tagstore=debug,tagstore_core=debug";
const QUIET_DIRECTIVES: &str = "warn";

/// Backups kept next to the live log file
const KEEP_BACKUPS: usize = 4;
const MAX_FILE_BYTES: u64 = 8 * 1024 * 1024;

/// What to log and where the file is named after
pub struct LogConfig<'a> {
    pub app_name: &'a str,
    pub verbose: bool,
}

/// Install file and stderr logging.
///
/// Fails if the log directory cannot be created or a subscriber is already
/// installed; callers fall back to [`init_console_logging`].
pub fn init_logging(config: LogConfig<'_>) -> Result<()> {
    let dir = ensure_logs_dir()?;
    let log = SharedLog::open(&dir, config.app_name)?;

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(log)
        .with_ansi(false)
        .with_filter(env_or(FILE_DIRECTIVES));
    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_filter(console_filter(config.verbose));

    tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .context("Failed to install tracing subscriber")
}

/// stderr-only logging
pub fn init_console_logging(verbose: bool) {
    // A subscriber may already be installed; that one wins.
    let _ = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(console_filter(verbose))
        .try_init();
}

fn env_or(directives: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives))
}

fn console_filter(verbose: bool) -> EnvFilter {
    if verbose {
        env_or(VERBOSE_DIRECTIVES)
    } else {
        EnvFilter::new(QUIET_DIRECTIVES)
    }
}

/// `$TAGSTORE_HOME`, else `~/.tagstore`
pub fn tagstore_home() -> PathBuf {
    resolve_home(std::env::var_os(HOME_ENV), dirs::home_dir())
}

fn resolve_home(override_dir: Option<OsString>, user_home: Option<PathBuf>) -> PathBuf {
    match override_dir {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => user_home.unwrap_or_default().join(".tagstore"),
    }
}

pub fn logs_dir() -> PathBuf {
    tagstore_home().join("logs")
}

/// Create the logs directory if needed and return it
pub fn ensure_logs_dir() -> Result<PathBuf> {
    let dir = logs_dir();
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create logs directory: {}", dir.display()))?;
    Ok(dir)
}

/// `<stem>.log` plus numbered backups `<stem>.log.1` (newest) .. `<stem>.log.N`
struct CappedLogFile {
    dir: PathBuf,
    stem: String,
    keep: usize,
    max_bytes: u64,
    file: File,
    written: u64,
}

impl CappedLogFile {
    fn open(dir: &Path, app_name: &str, keep: usize, max_bytes: u64) -> io::Result<Self> {
        let stem: String = app_name
            .chars()
            .map(|c| match c {
                'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' => c,
                _ => '_',
            })
            .collect();
        let live = dir.join(format!("{}.log", stem));
        let file = OpenOptions::new().create(true).append(true).open(&live)?;
        let written = file.metadata()?.len();
        Ok(Self {
            dir: dir.to_path_buf(),
            stem,
            keep,
            max_bytes,
            file,
            written,
        })
    }

    fn generation(&self, n: usize) -> PathBuf {
        match n {
            0 => self.dir.join(format!("{}.log", self.stem)),
            n => self.dir.join(format!("{}.log.{}", self.stem, n)),
        }
    }

    /// Shift every generation up by one, dropping the oldest, and start a fresh live file.
    fn roll(&mut self) -> io::Result<()> {
        self.file.flush()?;
        if self.keep == 0 {
            self.file.set_len(0)?;
            self.written = 0;
            return Ok(());
        }

        match fs::remove_file(self.generation(self.keep)) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => return Err(e),
            _ => {}
        }
        for n in (0..self.keep).rev() {
            let from = self.generation(n);
            if from.exists() {
                fs::rename(&from, self.generation(n + 1))?;
            }
        }

        self.file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.generation(0))?;
        self.written = 0;
        Ok(())
    }
}

impl Write for CappedLogFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.written > 0 && self.written + buf.len() as u64 > self.max_bytes {
            self.roll()?;
        }
        let n = self.file.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

/// Log file shared by every event the file layer writes
struct SharedLog(Mutex<CappedLogFile>);

impl SharedLog {
    fn open(dir: &Path, app_name: &str) -> Result<Self> {
        let file = CappedLogFile::open(dir, app_name, KEEP_BACKUPS, MAX_FILE_BYTES)
            .with_context(|| format!("Failed to open log file in {}", dir.display()))?;
        Ok(Self(Mutex::new(file)))
    }
}

/// One event's writer; holds the file lock until dropped
struct LogLine<'a>(MutexGuard<'a, CappedLogFile>);

impl<'a> MakeWriter<'a> for SharedLog {
    type Writer = LogLine<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        // A panic mid-write leaves the file usable; keep logging.
        LogLine(self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner()))
    }
}

impl Write for LogLine<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn names(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_file_name_is_sanitized() {
        let temp = TempDir::new().unwrap();
        CappedLogFile::open(temp.path(), "tag store/1.0", 2, 64).unwrap();
        assert_eq!(names(temp.path()), vec!["tag_store_1_0.log"]);
    }

    #[test]
    fn test_roll_keeps_bounded_backups() {
        let temp = TempDir::new().unwrap();
        let mut log = CappedLogFile::open(temp.path(), "app", 2, 16).unwrap();

        for line in ["first line\n", "second line\n", "third line\n", "fourth line\n"] {
            log.write_all(line.as_bytes()).unwrap();
        }
        log.flush().unwrap();

        assert_eq!(names(temp.path()), vec!["app.log", "app.log.1", "app.log.2"]);
        assert_eq!(fs::read_to_string(temp.path().join("app.log")).unwrap(), "fourth line\n");
        assert_eq!(fs::read_to_string(temp.path().join("app.log.1")).unwrap(), "third line\n");
        assert_eq!(fs::read_to_string(temp.path().join("app.log.2")).unwrap(), "second line\n");
    }

    #[test]
    fn test_no_backups_truncates_in_place() {
        let temp = TempDir::new().unwrap();
        let mut log = CappedLogFile::open(temp.path(), "app", 0, 8).unwrap();

        log.write_all(b"hello world\n").unwrap();
        log.write_all(b"again\n").unwrap();
        log.flush().unwrap();

        assert_eq!(names(temp.path()), vec!["app.log"]);
        assert_eq!(fs::read_to_string(temp.path().join("app.log")).unwrap(), "again\n");
    }

    #[test]
    fn test_reopen_appends() {
        let temp = TempDir::new().unwrap();
        CappedLogFile::open(temp.path(), "app", 2, 1024)
            .unwrap()
            .write_all(b"one\n")
            .unwrap();
        let mut log = CappedLogFile::open(temp.path(), "app", 2, 1024).unwrap();
        assert_eq!(log.written, 4);
        log.write_all(b"two\n").unwrap();

        assert_eq!(fs::read_to_string(temp.path().join("app.log")).unwrap(), "one\ntwo\n");
    }

    #[test]
    fn test_home_resolution() {
        let user = Some(PathBuf::from("/home/u"));
        assert_eq!(
            resolve_home(Some(OsString::from("/tmp/th")), user.clone()),
            PathBuf::from("/tmp/th")
        );
        assert_eq!(resolve_home(None, user.clone()), PathBuf::from("/home/u/.tagstore"));
        assert_eq!(resolve_home(Some(OsString::new()), user), PathBuf::from("/home/u/.tagstore"));
    }
}
