//! Standard paths for secretvars files

use std::path::PathBuf;

/// Standard secretvars paths
pub struct Paths {
    /// Data directory (~/.local/share/secretvars)
    pub data: PathBuf,
    /// Config directory (~/.config/secretvars)
    pub config: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Self::new()
    }
}

impl Paths {
    pub fn new() -> Self {
        let data = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("~/.local/share"))
            .join("secretvars");

        let config = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("secretvars");

        Self { data, config }
    }

    /// Paths rooted somewhere other than the user directories
    pub fn rooted(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            data: root.join("data"),
            config: root.join("config"),
        }
    }

    /// Get the secrets file for a named store
    pub fn secrets_file(&self, name: &str) -> PathBuf {
        self.data.join(format!("{}.json", name))
    }

    /// Get the config file path
    pub fn config_file(&self) -> PathBuf {
        self.config.join("config.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secrets_file() {
        let paths = Paths::rooted("/tmp/sv");
        assert_eq!(
            paths.secrets_file("test"),
            PathBuf::from("/tmp/sv/data/test.json")
        );
        assert!(paths.config_file().ends_with("config/config.json"));
    }

    #[test]
    fn test_default_paths_are_namespaced() {
        let paths = Paths::new();
        assert!(paths.data.ends_with("secretvars"));
        assert!(paths.config.ends_with("secretvars"));
    }
}
