use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Locations searched for a `.env` file, relative to the working directory.
const DOTENV_CANDIDATES: [&str; 3] = [".env", "../.env", "../../.env"];

/// Load the first `.env` file found relative to `base`.
///
/// Variables already present in the process environment are not overridden.
pub fn load_dotenv_from(base: &Path) -> Option<PathBuf> {
    for candidate in DOTENV_CANDIDATES {
        let path = base.join(candidate);
        if !path.is_file() {
            continue;
        }
        match dotenvy::from_path(&path) {
            Ok(()) => {
                debug!(path = %path.display(), "Loaded environment file");
                return Some(path);
            }
            Err(e) => warn!(path = %path.display(), error = %e, "Failed to load environment file"),
        }
    }
    None
}

/// Load a `.env` file relative to the current working directory.
pub fn load_dotenv() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .and_then(|dir| load_dotenv_from(&dir))
}

/// Environment source reading the live process environment.
///
/// Values are kept as strings; typed fields are converted on deserialization
/// so secrets that look numeric are not reformatted.
pub fn environment_source() -> config::Environment {
    config::Environment::default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_dotenv_found_in_parent() {
        let root = tempfile::tempdir().unwrap();
        let child = root.path().join("server");
        fs::create_dir(&child).unwrap();
        fs::write(
            root.path().join(".env"),
            "AGGREGATOR_DOTENV_PARENT_PROBE=found\n",
        )
        .unwrap();

        let loaded = load_dotenv_from(&child).unwrap();
        assert_eq!(loaded, child.join("../.env"));
        assert_eq!(
            std::env::var("AGGREGATOR_DOTENV_PARENT_PROBE").unwrap(),
            "found"
        );
    }

    #[test]
    fn test_dotenv_missing() {
        let root = tempfile::tempdir().unwrap();
        let nested = root.path().join("a").join("b").join("c");
        fs::create_dir_all(&nested).unwrap();

        assert!(load_dotenv_from(&nested).is_none());
    }
}
