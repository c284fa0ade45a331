use std::env;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::Context;
use khitan_config::Config;
use serde::{Deserialize, Serialize};

/// Load a config file shipped next to the binary or passed on the command line
pub fn load_config_file(path: &Path) -> anyhow::Result<Config> {
    tracing::info!("Loading config from {}", path.display());
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let reader = BufReader::new(file);
    let config = serde_json::from_reader(reader)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(config)
}

/// `KHITAN_HOME`, or `.khitan` in the working directory
pub fn khitan_root() -> PathBuf {
    env::var("KHITAN_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(".khitan"))
}

fn profiles_dir(root: &Path) -> PathBuf {
    root.join("profiles")
}

/// Represents a user profile
#[derive(Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub value: Config,
}

fn read_profile(path: &Path) -> anyhow::Result<Config> {
    let data = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let profile: Profile =
        serde_json::from_str(&data).with_context(|| format!("failed to parse profile {}", path.display()))?;
    Ok(profile.value)
}

/// Load a user profile by name, falling back to `main`, then `config.json`,
/// then environment defaults
pub fn load_user_profile(root: &Path, name: &str) -> anyhow::Result<Config> {
    let profile_file = profiles_dir(root).join(format!("{name}.json"));

    if profile_file.exists() {
        return read_profile(&profile_file);
    }

    tracing::warn!("Profile {name} not found, falling back to main profile or defaults");
    let main_file = profiles_dir(root).join("main.json");
    if main_file.exists() {
        return read_profile(&main_file);
    }

    let repo_default = Path::new("config.json");
    if repo_default.exists() {
        return load_config_file(repo_default);
    }

    Ok(Config::new())
}

/// Write a profile wrapping the given config
pub fn save_profile(root: &Path, name: &str, config: &Config) -> anyhow::Result<PathBuf> {
    fs::create_dir_all(profiles_dir(root))?;

    let profile = Profile {
        name: name.into(),
        value: config.clone(),
    };
    let file = profiles_dir(root).join(format!("{name}.json"));
    fs::write(&file, serde_json::to_string_pretty(&profile)?)?;
    tracing::info!("Saved profile: {name}");
    Ok(file)
}

#[cfg(test)]
mod tests {
    use khitan_core::Direction;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn saved_profile_loads_back() {
        let tmp = TempDir::new().unwrap();
        let mut config = Config::default();
        config.default_direction = Direction::ModernToScript;
        config.history.capacity = 5;

        save_profile(tmp.path(), "study", &config).unwrap();
        let loaded = load_user_profile(tmp.path(), "study").unwrap();

        assert_eq!(loaded.default_direction, Direction::ModernToScript);
        assert_eq!(loaded.history.capacity, 5);
    }

    #[test]
    fn unknown_profile_falls_back_to_main() {
        let tmp = TempDir::new().unwrap();
        let mut config = Config::default();
        config.glossary.max_context_entries = 7;
        save_profile(tmp.path(), "main", &config).unwrap();

        let loaded = load_user_profile(tmp.path(), "missing").unwrap();
        assert_eq!(loaded.glossary.max_context_entries, 7);
    }

    #[test]
    fn broken_profile_is_an_error() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(profiles_dir(tmp.path())).unwrap();
        fs::write(profiles_dir(tmp.path()).join("main.json"), "{ not json").unwrap();

        assert!(load_user_profile(tmp.path(), "main").is_err());
    }
}
