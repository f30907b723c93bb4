use crate::events::SimEvent;
use async_channel::{Receiver, Sender};
use directories::ProjectDirs;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use orbit::tuning::Tuning;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("org", "orbit", "orbit").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("tuning.toml"))
}

pub fn load_tuning() -> Result<Tuning, ConfigError> {
    let config_path = get_config_path()?;

    let s = config::Config::builder()
        .add_source(config::File::from(config_path).required(false))
        .add_source(
            config::Environment::with_prefix("ORBIT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(s.try_deserialize()?)
}

pub fn load_or_default() -> Tuning {
    match load_tuning() {
        Ok(t) => t,
        Err(e) => {
            log::warn!("Using built-in tuning: {}", e);
            Tuning::default()
        }
    }
}

const DEFAULT_TUNING: &str = include_str!("default_tuning.toml");

/// How long the tuning file must stay quiet before a save counts as finished.
const SAVE_QUIET: Duration = Duration::from_millis(150);

/// Creates the tuning file from the bundled defaults. Returns the path and whether it was
/// written; an existing file is left alone.
pub fn write_default_tuning() -> Result<(PathBuf, bool), ConfigError> {
    let path = get_config_path()?;
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    let file = fs_err::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path);
    match file {
        Ok(mut file) => {
            file.write_all(DEFAULT_TUNING.as_bytes())?;
            Ok((path, true))
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok((path, false)),
        Err(e) => Err(e.into()),
    }
}

/// Turns raw filesystem events on the tuning directory into finished saves of the tuning file.
struct SaveGate {
    path: PathBuf,
    quiet: Duration,
}

impl SaveGate {
    fn touches(&self, res: notify::Result<notify::Event>) -> bool {
        match res {
            Ok(event) => {
                matches!(
                    event.kind,
                    EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                ) && event.paths.iter().any(|p| p == &self.path)
            }
            Err(e) => {
                log::warn!("tuning watcher: {}", e);
                false
            }
        }
    }

    /// A missing file is a finished save too: the tuning falls back to the built-in values.
    fn has_content(&self) -> bool {
        match fs_err::metadata(&self.path) {
            Ok(meta) => meta.len() > 0,
            Err(e) if e.kind() == io::ErrorKind::NotFound => true,
            Err(e) => {
                log::warn!("tuning watcher: {}", e);
                false
            }
        }
    }

    /// Waits for the next finished save, absorbing the rest of its event burst. Returns `false`
    /// once the event source is gone.
    async fn next_save(&self, rx: &Receiver<notify::Result<notify::Event>>) -> bool {
        loop {
            loop {
                let Ok(res) = rx.recv().await else {
                    return false;
                };
                if self.touches(res) {
                    break;
                }
            }

            let mut absorbed = 0usize;
            while let Ok(Ok(res)) = tokio::time::timeout(self.quiet, rx.recv()).await {
                if self.touches(res) {
                    absorbed += 1;
                }
            }
            if absorbed > 0 {
                log::debug!("tuning watcher: folded {} events into one save", absorbed + 1);
            }

            if self.has_content() {
                return true;
            }
            log::debug!(
                "tuning watcher: {} is empty, waiting for the rest of the save",
                self.path.display()
            );
        }
    }
}

/// Sends `ConfigReload` once per finished save of the tuning file.
pub async fn watch_tuning(tx: Sender<SimEvent>) {
    let path = match get_config_path() {
        Ok(p) => p,
        Err(e) => {
            log::error!("tuning watcher disabled: {}", e);
            return;
        }
    };
    let Some(dir) = path.parent().map(PathBuf::from) else {
        log::error!("tuning watcher disabled: {} has no parent", path.display());
        return;
    };
    if let Err(e) = fs_err::create_dir_all(&dir) {
        log::error!("tuning watcher disabled: {}", e);
        return;
    }

    // notify calls back on its own thread
    let (raw_tx, raw_rx) = async_channel::unbounded();
    let watcher = RecommendedWatcher::new(
        move |res| {
            let _ = raw_tx.send_blocking(res);
        },
        notify::Config::default(),
    )
    .and_then(|mut w| w.watch(&dir, RecursiveMode::NonRecursive).map(|_| w));
    let _watcher = match watcher {
        Ok(w) => w,
        Err(e) => {
            log::error!("tuning watcher disabled: {}", e);
            return;
        }
    };
    log::info!("tuning watcher: following {}", path.display());

    let gate = SaveGate {
        path,
        quiet: SAVE_QUIET,
    };
    while gate.next_save(&raw_rx).await {
        log::info!("tuning watcher: {} saved", gate.path.display());
        if tx.send(SimEvent::ConfigReload).await.is_err() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orbit::interp::Curve;
    use std::time::Duration;

    fn parse(toml: &str) -> Tuning {
        config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    fn scratch(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "orbit-replay-{}-{}.toml",
            name,
            std::process::id()
        ));
        fs_err::write(&path, contents).unwrap();
        path
    }

    fn modified(path: &std::path::Path) -> notify::Result<notify::Event> {
        Ok(notify::Event::new(EventKind::Modify(notify::event::ModifyKind::Any))
            .add_path(path.to_path_buf()))
    }

    fn gate(path: PathBuf) -> SaveGate {
        SaveGate {
            path,
            quiet: Duration::from_millis(20),
        }
    }

    #[tokio::test]
    async fn test_burst_is_one_save() {
        let path = scratch("burst", "[index]\nmax_slots = 60\n");
        let (tx, rx) = async_channel::unbounded();
        for _ in 0..4 {
            tx.send(modified(&path)).await.unwrap();
        }
        let gate = gate(path.clone());

        assert!(gate.next_save(&rx).await);
        assert!(rx.is_empty());

        drop(tx);
        assert!(!gate.next_save(&rx).await);
        fs_err::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_truncated_file_is_not_a_save() {
        let path = scratch("truncated", "");
        let (tx, rx) = async_channel::unbounded();
        tx.send(modified(&path)).await.unwrap();
        drop(tx);

        assert!(!gate(path.clone()).next_save(&rx).await);
        fs_err::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_removed_file_is_a_save() {
        let path =
            std::env::temp_dir().join(format!("orbit-replay-gone-{}.toml", std::process::id()));
        let removed = notify::Event::new(EventKind::Remove(notify::event::RemoveKind::File))
            .add_path(path.clone());
        let (tx, rx) = async_channel::unbounded();
        tx.send(Ok(removed)).await.unwrap();

        assert!(gate(path).next_save(&rx).await);
    }

    #[tokio::test]
    async fn test_other_files_are_ignored() {
        let path = scratch("ignored", "x = 1\n");
        let (tx, rx) = async_channel::unbounded();
        tx.send(modified(&path.with_extension("swp"))).await.unwrap();
        tx.send(Err(notify::Error::generic("lost events")))
            .await
            .unwrap();
        drop(tx);

        assert!(!gate(path.clone()).next_save(&rx).await);
        fs_err::remove_file(&path).unwrap();
    }

    #[test]
    fn test_default_file_matches_builtin() {
        assert_eq!(parse(DEFAULT_TUNING), Tuning::default());
    }

    #[test]
    fn test_partial_file() {
        let tuning = parse("[floating]\nscale = 1.5\nanimation = 250\n");
        assert_eq!(tuning.floating.scale, 1.5);
        assert_eq!(tuning.floating.animation, Duration::from_millis(250));
        assert_eq!(tuning.floating.curve, Curve::Decelerate);
        assert_eq!(tuning.index, Tuning::default().index);
    }
}
