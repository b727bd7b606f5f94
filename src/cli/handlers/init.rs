use std::path::{Path, PathBuf};

use crate::cli::commands::InitArgs;
use crate::io::config_io::{self, CONFIG_FILE};

/// Where `init` writes: the `--config` path, else `chime.toml` in `dir`.
fn target_path(explicit: Option<&Path>, dir: &Path) -> PathBuf {
    explicit.map_or_else(|| dir.join(CONFIG_FILE), Path::to_path_buf)
}

pub fn cmd_init(
    args: InitArgs,
    explicit: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = std::env::current_dir()?;
    let path = target_path(explicit, &dir);
    config_io::write_default_config(&path, args.force)?;
    tracing::info!(path = %path.display(), force = args.force, "wrote default config");
    println!("Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_path_wins() {
        let dir = Path::new("/work");
        assert_eq!(
            target_path(Some(Path::new("/etc/chime.toml")), dir),
            PathBuf::from("/etc/chime.toml")
        );
        assert_eq!(target_path(None, dir), PathBuf::from("/work/chime.toml"));
    }
}
