//! Locates the fragment file and drives injection over the code directory.

use std::fs;
use std::path::PathBuf;

use log::{debug, info, warn};

use super::injector::Injector;
use crate::config::Config;
use crate::error::{Error, Result};

/// Runs the fragment injection stage for one configuration
#[derive(Debug)]
pub struct FragmentManager<'a> {
    config: &'a Config,
}

impl<'a> FragmentManager<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Where the fragment file is read from, if it exists anywhere.
    ///
    /// The fragments directory wins over the code directory.
    pub fn locate(&self) -> Option<PathBuf> {
        let marker = &self.config.fragments.marker;
        [&self.config.paths.fragments, &self.config.paths.code]
            .into_iter()
            .map(|dir| dir.join(marker))
            .find(|candidate| candidate.exists())
    }

    /// Inject the fragment into the code directory, then remove it from there.
    ///
    /// Without a fragment file this succeeds without touching anything.
    /// Returns the fragment path that was used.
    pub fn process(&self) -> Result<Option<PathBuf>> {
        let Some(fragment_path) = self.locate() else {
            debug!(
                "No fragment named {} found, skipping injection",
                self.config.fragments.marker
            );
            return Ok(None);
        };

        let injector = Injector::new(&self.config.fragments.marker).map_err(wrap)?;
        injector
            .inject(&self.config.paths.code, &fragment_path)
            .map_err(wrap)?;

        let leftover = self.config.paths.code.join(&self.config.fragments.marker);
        if leftover.exists() {
            // Removal failure is not fatal; the program can still run.
            match fs::remove_file(&leftover) {
                Ok(()) => info!("Removed fragment {}", leftover.display()),
                Err(e) => warn!("Failed to remove fragment {}: {}", leftover.display(), e),
            }
        }

        Ok(Some(fragment_path))
    }
}

fn wrap(e: Error) -> Error {
    Error::Injection {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    fn config_for(root: &Path) -> Config {
        let mut config = Config::default();
        config.paths.code = root.join("code");
        config.paths.fragments = root.join("fragments");
        config
    }

    #[test]
    fn test_no_fragment_is_noop() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_for(temp_dir.path());
        fs::create_dir(&config.paths.code).unwrap();
        fs::write(config.paths.code.join("run.sh"), "MAIN\n").unwrap();

        let used = FragmentManager::new(&config).process().unwrap();

        assert!(used.is_none());
        assert_eq!(
            fs::read_to_string(config.paths.code.join("run.sh")).unwrap(),
            "MAIN\n"
        );
    }

    #[test]
    fn test_fragment_from_fragments_dir() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_for(temp_dir.path());
        fs::create_dir(&config.paths.code).unwrap();
        fs::create_dir(&config.paths.fragments).unwrap();
        fs::write(config.paths.fragments.join("MAIN"), "echo hello").unwrap();
        fs::write(config.paths.code.join("run.sh"), "MAIN").unwrap();

        let used = FragmentManager::new(&config).process().unwrap();

        assert_eq!(used, Some(config.paths.fragments.join("MAIN")));
        assert_eq!(
            fs::read_to_string(config.paths.code.join("run.sh")).unwrap(),
            "echo hello"
        );
        assert!(!config.paths.code.join("MAIN").exists());
        // The source fragment is left in place.
        assert!(config.paths.fragments.join("MAIN").exists());
    }

    #[test]
    fn test_fragments_dir_wins_over_code_dir() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_for(temp_dir.path());
        fs::create_dir(&config.paths.code).unwrap();
        fs::create_dir(&config.paths.fragments).unwrap();
        fs::write(config.paths.fragments.join("MAIN"), "from fragments").unwrap();
        fs::write(config.paths.code.join("MAIN"), "from code").unwrap();
        fs::write(config.paths.code.join("run.sh"), "MAIN").unwrap();

        FragmentManager::new(&config).process().unwrap();

        assert_eq!(
            fs::read_to_string(config.paths.code.join("run.sh")).unwrap(),
            "from fragments"
        );
        assert!(!config.paths.code.join("MAIN").exists());
    }

    #[test]
    fn test_fragment_from_code_dir_is_consumed() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_for(temp_dir.path());
        fs::create_dir(&config.paths.code).unwrap();
        fs::write(config.paths.code.join("MAIN"), "print('hi')").unwrap();
        fs::write(config.paths.code.join("main.py"), "if True:\n    MAIN\n").unwrap();

        let used = FragmentManager::new(&config).process().unwrap();

        assert_eq!(used, Some(config.paths.code.join("MAIN")));
        assert_eq!(
            fs::read_to_string(config.paths.code.join("main.py")).unwrap(),
            "if True:\n    print('hi')\n"
        );
        assert!(!config.paths.code.join("MAIN").exists());
    }

    #[test]
    fn test_leftover_removal_failure_is_ignored() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_for(temp_dir.path());
        fs::create_dir_all(config.paths.code.join("MAIN")).unwrap();
        fs::create_dir(&config.paths.fragments).unwrap();
        fs::write(config.paths.fragments.join("MAIN"), "echo hello").unwrap();
        fs::write(config.paths.code.join("run.sh"), "MAIN").unwrap();

        let used = FragmentManager::new(&config).process().unwrap();

        assert_eq!(used, Some(config.paths.fragments.join("MAIN")));
        assert_eq!(
            fs::read_to_string(config.paths.code.join("run.sh")).unwrap(),
            "echo hello"
        );
        assert!(config.paths.code.join("MAIN").is_dir());
    }

    #[test]
    fn test_custom_marker() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = config_for(temp_dir.path());
        config.fragments.marker = "BODY".to_string();
        fs::create_dir(&config.paths.code).unwrap();
        fs::create_dir(&config.paths.fragments).unwrap();
        fs::write(config.paths.fragments.join("BODY"), "x").unwrap();
        fs::write(config.paths.code.join("a.txt"), "MAIN\nBODY").unwrap();

        FragmentManager::new(&config).process().unwrap();

        assert_eq!(
            fs::read_to_string(config.paths.code.join("a.txt")).unwrap(),
            "MAIN\nx"
        );
    }

    #[test]
    fn test_missing_code_dir_is_wrapped_error() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_for(temp_dir.path());
        fs::create_dir(&config.paths.fragments).unwrap();
        fs::write(config.paths.fragments.join("MAIN"), "x").unwrap();

        let err = FragmentManager::new(&config).process().unwrap_err();
        assert!(matches!(err, Error::Injection { .. }));
        assert!(err.to_string().starts_with("error injecting fragment"));
    }
}
