use anyhow::{bail, Result};
use log::info;
use std::path::Path;
use std::process::Command;

use crate::error::SubDlError;

/// Opens `media` in `player` and waits for the player to exit.
pub fn launch(player: &str, media: &Path) -> Result<()> {
    info!("Launching {player} on {}", media.display());
    let status = Command::new(player).arg(media).status();

    let status = match status {
        Ok(status) => status,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(SubDlError::PlayerNotFound(player.to_string()).into());
        }
        Err(e) => {
            bail!("Failed to execute {player}: {e}");
        }
    };

    if !status.success() {
        eprintln!("Warning: {player} exited with {status}");
    }

    Ok(())
}

/// Only a single file picked on its own is worth opening in a player.
pub fn should_watch(watch: bool, media: &Path, is_dir: bool, batch_size: usize) -> bool {
    watch && !is_dir && batch_size == 1 && media.is_file()
}
