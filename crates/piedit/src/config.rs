use crate::editor::ItemState;
use directories::ProjectDirs;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use piekit::ItemConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Layout and animation constants of the editor surface.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Edge length of one overview grid cell.
    pub grid_item_size: f64,
    pub center_item_size: f64,
    pub child_item_size: f64,
    pub animation_ms: f64,
    pub tick_ms: u64,
    /// Ring radius relative to `grid_item_size`.
    pub ring_radius_factor: f64,
    /// How many columns next to a pending drop move aside.
    pub push_range: u32,
    /// Displacement per column of `push_range`.
    pub push_strength: f64,
    /// Width of the insertion band on each side of a column boundary, relative to
    /// `grid_item_size`.
    pub drop_zone_fraction: f64,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            grid_item_size: 128.0,
            center_item_size: 100.0,
            child_item_size: 80.0,
            animation_ms: 200.0,
            tick_ms: 10,
            ring_radius_factor: 1.1,
            push_range: 3,
            push_strength: 15.0,
            drop_zone_fraction: 0.25,
        }
    }
}

impl EditorSettings {
    pub fn item_size(&self, state: ItemState) -> f64 {
        match state {
            ItemState::Grid => self.grid_item_size,
            ItemState::Center => self.center_item_size,
            ItemState::Child => self.child_item_size,
        }
    }

    pub fn drop_zone(&self) -> f64 {
        self.grid_item_size * self.drop_zone_fraction
    }

    pub fn ring_radius(&self) -> f64 {
        self.grid_item_size * self.ring_radius_factor
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub editor: EditorSettings,
    #[serde(default)]
    pub menus: Vec<ItemConfig>,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
}

pub fn get_config_path() -> Result<std::path::PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("org", "piedit", "piedit").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

pub fn load_config() -> Result<Config, ConfigError> {
    let config_path = get_config_path()?;

    let s = config::Config::builder()
        .add_source(config::File::from(config_path).required(false))
        .add_source(config::Environment::with_prefix("PIEDIT").separator("__"))
        .build()?;

    Ok(s.try_deserialize()?)
}

/// Loads the user config, writing the bundled default on first start.
pub fn load_or_setup() -> Config {
    if let Ok(path) = get_config_path()
        && !path.exists()
    {
        match write_default_config() {
            Ok(path) => log::info!("Wrote default configuration to {}", path.display()),
            Err(e) => log::error!("Failed to write default configuration: {}", e),
        }
    }

    match load_config() {
        Ok(c) => c,
        Err(e) => {
            log::error!("Failed to load configuration, using defaults: {}", e);
            default_config()
        }
    }
}

pub fn default_config() -> Config {
    config::Config::builder()
        .add_source(config::File::from_str(
            DEFAULT_CONFIG,
            config::FileFormat::Toml,
        ))
        .build()
        .and_then(|c| c.try_deserialize())
        .unwrap_or_else(|e| {
            log::error!("Bundled default configuration is invalid: {}", e);
            Config::default()
        })
}

pub fn write_default_config() -> std::io::Result<std::path::PathBuf> {
    let path =
        get_config_path().map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e))?;
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(&path, DEFAULT_CONFIG)?;
    }
    Ok(path)
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

use crate::events::AppEvent;
use async_channel::Sender;

pub async fn run_async_watcher(tx: Sender<AppEvent>) {
    let config_path = match get_config_path() {
        Ok(p) => p,
        Err(e) => {
            log::error!("Config watcher error: {}", e);
            return;
        }
    };
    let config_dir = match config_path.parent() {
        Some(p) => p.to_path_buf(),
        None => return,
    };

    if let Err(e) = fs_err::create_dir_all(&config_dir) {
        log::error!("Failed to create config directory for watching: {}", e);
        return;
    }

    let (bridge_tx, bridge_rx) = async_channel::unbounded();

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    ) {
        Ok(w) => w,
        Err(e) => {
            log::error!("Failed to create watcher: {}", e);
            return;
        }
    };

    if let Err(e) = watcher.watch(&config_dir, RecursiveMode::NonRecursive) {
        log::error!("Failed to watch config directory: {}", e);
        return;
    }

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) => {
                let meaningful_event = matches!(
                    event.kind,
                    EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                );

                if meaningful_event
                    && event.paths.iter().any(|p| p == &config_path)
                    && tx.send(AppEvent::ConfigReload).await.is_err()
                {
                    break;
                }
            }
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
}
