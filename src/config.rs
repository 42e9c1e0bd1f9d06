/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.

use log::LevelFilter;
use serde::Deserialize;
use std::path::{Path, PathBuf};

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub log_file: PathBuf,
    pub log_level: LevelFilter,
    /// Resource bundle override; `None` uses the embedded bundle.
    pub bundle: Option<PathBuf>,
    pub frame_sleep_ms: u64,
    pub device: DeviceConfig,
    pub gamepad: GamepadConfig,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeviceConfig {
    pub screen_width: i32,
    pub screen_height: i32,
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub confirm: Vec<String>,
    pub cancel: Vec<String>,
    pub pause: Vec<String>,
    pub background: Vec<String>,
    pub wall: Vec<String>,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    general: TomlGeneral,
    #[serde(default)]
    device: TomlDevice,
    #[serde(default)]
    gamepad: TomlGamepad,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default = "default_log_file")]
    log_file: String,
    #[serde(default = "default_log_level")]
    log_level: String,
    #[serde(default)]
    bundle: String,
    #[serde(default = "default_frame_sleep")]
    frame_sleep_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlDevice {
    #[serde(default = "default_screen_width")]
    screen_width: i32,
    #[serde(default = "default_screen_height")]
    screen_height: i32,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_confirm")]
    confirm: Vec<String>,
    #[serde(default = "default_cancel")]
    cancel: Vec<String>,
    #[serde(default = "default_pause")]
    pause: Vec<String>,
    #[serde(default = "default_background")]
    background: Vec<String>,
    #[serde(default = "default_wall")]
    wall: Vec<String>,
}

// ── Defaults ──

fn default_log_file() -> String { "hamlet.log".into() }
fn default_log_level() -> String { "info".into() }
fn default_frame_sleep() -> u64 { 10 }
fn default_screen_width() -> i32 { 128 }
fn default_screen_height() -> i32 { 146 }

fn default_confirm() -> Vec<String> { vec!["A".into(), "Start".into()] }
fn default_cancel() -> Vec<String> { vec!["Select".into()] }
fn default_pause() -> Vec<String> { vec!["Mode".into()] }
fn default_background() -> Vec<String> { vec!["X".into()] }
fn default_wall() -> Vec<String> { vec!["Y".into()] }

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            log_file: default_log_file(),
            log_level: default_log_level(),
            bundle: String::new(),
            frame_sleep_ms: default_frame_sleep(),
        }
    }
}

impl Default for TomlDevice {
    fn default() -> Self {
        TomlDevice {
            screen_width: default_screen_width(),
            screen_height: default_screen_height(),
        }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            confirm: default_confirm(),
            cancel: default_cancel(),
            pause: default_pause(),
            background: default_background(),
            wall: default_wall(),
        }
    }
}

// ── Loading ──

impl AppConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory,
    /// (3) ~/.local/share/hamlet.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let search_dirs = candidate_dirs();
        let toml_cfg = load_toml(&search_dirs);
        AppConfig::resolve(toml_cfg, &search_dirs)
    }

    fn resolve(toml_cfg: TomlConfig, search_dirs: &[PathBuf]) -> Self {
        let general = toml_cfg.general;

        let log_level = parse_level(&general.log_level).unwrap_or_else(|| {
            eprintln!("Warning: unknown log_level {:?}; using info", general.log_level);
            LevelFilter::Info
        });

        // A relative bundle path is looked up next to config.toml
        let bundle = (!general.bundle.is_empty()).then(|| {
            let p = PathBuf::from(&general.bundle);
            if p.is_absolute() {
                return p;
            }
            search_dirs
                .iter()
                .map(|d| d.join(&p))
                .find(|c| c.is_file())
                .unwrap_or(p)
        });

        let mut device = DeviceConfig {
            screen_width: toml_cfg.device.screen_width,
            screen_height: toml_cfg.device.screen_height,
        };
        if device.screen_width <= 0 || device.screen_height <= 0 {
            eprintln!("Warning: invalid screen size in config.toml; using 128x146");
            device = DeviceConfig {
                screen_width: default_screen_width(),
                screen_height: default_screen_height(),
            };
        }

        AppConfig {
            log_file: PathBuf::from(general.log_file),
            log_level,
            bundle,
            frame_sleep_ms: general.frame_sleep_ms.max(1),
            device,
            gamepad: GamepadConfig {
                confirm: toml_cfg.gamepad.confirm,
                cancel: toml_cfg.gamepad.cancel,
                pause: toml_cfg.gamepad.pause,
                background: toml_cfg.gamepad.background,
                wall: toml_cfg.gamepad.wall,
            },
        }
    }
}

fn parse_level(name: &str) -> Option<LevelFilter> {
    match name.trim().to_ascii_lowercase().as_str() {
        "off" => Some(LevelFilter::Off),
        "error" => Some(LevelFilter::Error),
        "warn" | "warning" => Some(LevelFilter::Warn),
        "info" => Some(LevelFilter::Info),
        "debug" => Some(LevelFilter::Debug),
        "trace" => Some(LevelFilter::Trace),
        _ => None,
    }
}

/// Candidate directories to search: exe dir + CWD + XDG data home (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    // 3. XDG data home (~/.local/share/hamlet)
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/hamlet");
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            if let Some(cfg) = read_toml(&path) {
                return cfg;
            }
            return TomlConfig::default();
        }
    }
    TomlConfig::default()
}

fn read_toml(path: &Path) -> Option<TomlConfig> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Warning: could not read {}: {e}", path.display());
            return None;
        }
    };
    match toml::from_str::<TomlConfig>(&text) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            eprintln!("Warning: config.toml parse error: {e}");
            eprintln!("Using default settings.");
            None
        }
    }
}
