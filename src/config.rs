use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::SubDlError;
use crate::workflows::prompt::Prompt;

const DEFAULT_LANGUAGE: &str = "English";
const DEFAULT_PLAYER: &str = "vlc";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub media_dir: PathBuf,
    pub language: String,
    #[serde(default = "default_player")]
    pub player: String,
}

fn default_player() -> String {
    DEFAULT_PLAYER.to_string()
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| SubDlError::Config(format!("{}: {e}", path.display())))?;
        if config.language.trim().is_empty() {
            return Err(SubDlError::Config("language must not be empty".to_string()).into());
        }
        debug!("Loaded config from {}: {config:?}", path.display());
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Asks for the media directory and language, keeping current values as defaults.
    pub fn create_interactive(prompt: &mut dyn Prompt, current: Option<&Config>) -> Result<Self> {
        let media_dir = loop {
            let question = match current {
                Some(c) => format!("Media directory [{}]: ", c.media_dir.display()),
                None => "Media directory: ".to_string(),
            };
            let answer = prompt.ask(&question)?;
            let dir = match (answer.is_empty(), current) {
                (true, Some(c)) => c.media_dir.clone(),
                _ => PathBuf::from(answer),
            };
            if dir.is_dir() {
                break dir;
            }
            println!("Not a directory: {}", dir.display());
        };

        let default_language = current.map_or(DEFAULT_LANGUAGE, |c| c.language.as_str());
        let answer = prompt.ask(&format!("Subtitle language [{default_language}]: "))?;
        let language = if answer.is_empty() {
            default_language.to_string()
        } else {
            answer
        };

        Ok(Config {
            media_dir,
            language,
            player: current.map_or_else(default_player, |c| c.player.clone()),
        })
    }
}

/// Loads the config, running the interactive setup when it is missing or `reconfigure` is set.
pub fn load_or_create(path: &Path, reconfigure: bool, prompt: &mut dyn Prompt) -> Result<Config> {
    if path.is_file() && !reconfigure {
        return Config::load(path);
    }

    let current = if path.is_file() {
        Config::load(path).ok()
    } else {
        None
    };
    println!("Configuring sub-dl ({})", path.display());
    let config = Config::create_interactive(prompt, current.as_ref())?;
    config.save(path)?;
    Ok(config)
}

pub fn get_config_path() -> PathBuf {
    if let Ok(path) = env::var("SUB_DL_CONFIG") {
        return PathBuf::from(path);
    }
    get_config_dir_path().join("config.toml")
}

fn get_config_dir_path() -> PathBuf {
    xdir::config()
        .map(|path| path.join("sub-dl"))
        // If the standard path could not be found (e.g.`$HOME` is not set),
        // default to the current directory.
        .unwrap_or_default()
}
