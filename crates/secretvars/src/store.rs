//! Secrets store - declared variables backed by one JSON file
//!
//! The file is a flat JSON object: variable name to string, or `null` for a
//! variable that is declared but has no value yet.
//!
//! ```json
//! {"hello": "world", "leggo": null}
//! ```
//!
//! Values are stored in plaintext. Nothing is written to disk until
//! [`SecretsStore::save`] is called.

use std::collections::BTreeMap;
use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info};

use crate::config::StoreOptions;
use crate::error::{Result, StoreError};
use crate::reader::ValueReader;

/// Variable name -> value; `None` means declared but not filled
pub type VariableMap = BTreeMap<String, Option<String>>;

/// The secrets store
pub struct SecretsStore {
    /// Backing JSON file
    path: PathBuf,
    /// Persistence options
    options: StoreOptions,
    /// Loaded and declared variables
    vars: VariableMap,
}

impl SecretsStore {
    /// Open a store over `path` with default options
    ///
    /// A missing file gives an empty store. The file is not created here.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, StoreOptions::default())
    }

    /// Open a store over `path` with explicit options
    pub fn open_with(path: impl AsRef<Path>, options: StoreOptions) -> Result<Self> {
        let path = path.as_ref();

        if path.is_dir() {
            return Err(StoreError::InvalidPath(path.to_path_buf()));
        }

        let exists = path.try_exists().map_err(|e| StoreError::io(path, e))?;
        let vars = if exists {
            Self::load(path)?
        } else {
            debug!(path = %path.display(), "No secrets file yet, starting empty");
            VariableMap::new()
        };

        Ok(Self {
            path: path.to_path_buf(),
            options,
            vars,
        })
    }

    /// Read and parse the backing file
    fn load(path: &Path) -> Result<VariableMap> {
        let content = fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;

        // A bare `null` document is an empty store
        let vars: VariableMap = serde_json::from_str::<Option<VariableMap>>(&content)
            .map_err(|e| StoreError::corrupt(path, e))?
            .unwrap_or_default();

        if vars.contains_key("") {
            return Err(StoreError::corrupt(path, "empty variable name"));
        }

        debug!(path = %path.display(), count = vars.len(), "Loaded secrets file");
        Ok(vars)
    }

    fn validate_key(key: &str) -> Result<()> {
        if key.is_empty() {
            return Err(StoreError::InvalidKey);
        }
        Ok(())
    }

    /// Declare a variable that needs a value
    ///
    /// An existing value is kept unless `overwrite` is set, in which case the
    /// variable is reset to unset.
    pub fn declare(&mut self, key: &str, overwrite: bool) -> Result<&mut Self> {
        self.declare_with(key, overwrite, None)
    }

    /// Declare a variable with a preset value
    ///
    /// `preset` is used when the variable is new, or always when `overwrite`
    /// is set. A `Some` preset means the variable will not be read later.
    pub fn declare_with(
        &mut self,
        key: &str,
        overwrite: bool,
        preset: Option<String>,
    ) -> Result<&mut Self> {
        Self::validate_key(key)?;

        match self.vars.get_mut(key) {
            Some(slot) if overwrite => {
                if slot.is_some() {
                    debug!(key, "Discarding existing value");
                }
                *slot = preset;
            }
            Some(_) => {}
            None => {
                debug!(key, "Declared variable");
                self.vars.insert(key.to_string(), preset);
            }
        }

        Ok(self)
    }

    /// Read values for every unset variable
    ///
    /// Variables that already hold a value are never passed to the reader.
    /// If the reader fails, variables filled before the failure keep their
    /// new values.
    pub fn fill_missing<R>(&mut self, reader: &mut R) -> Result<&mut Self>
    where
        R: ValueReader + ?Sized,
    {
        let mut filled = 0usize;

        for (key, slot) in self.vars.iter_mut().filter(|(_, v)| v.is_none()) {
            let value = reader
                .read_value(key)
                .map_err(|source| StoreError::ReadFailed {
                    key: key.clone(),
                    source,
                })?;

            debug!(key = %key, "Filled variable");
            *slot = Some(value);
            filled += 1;
        }

        if filled > 0 {
            info!(filled, "Filled missing variables");
        }

        Ok(self)
    }

    /// Get the value of a filled variable
    pub fn get(&self, key: &str) -> Result<&str> {
        self.vars
            .get(key)
            .and_then(|v| v.as_deref())
            .ok_or_else(|| StoreError::MissingValue(key.to_string()))
    }

    /// Get a filled variable and convert it with `parse`
    ///
    /// Errors from `parse` are returned as-is. The error type only has to
    /// accept a [`StoreError`] for the missing-value case.
    pub fn extract<T, E, F>(&self, key: &str, parse: F) -> std::result::Result<T, E>
    where
        F: FnOnce(&str) -> std::result::Result<T, E>,
        E: From<StoreError>,
    {
        let raw = self.get(key)?;
        parse(raw)
    }

    /// Get a filled variable and parse it with [`FromStr`]
    ///
    /// The parse error stays the root of the returned error, so callers can
    /// `downcast_ref` it.
    pub fn parse<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        let raw = self.get(key)?;
        Ok(raw.parse::<T>()?)
    }

    /// Current value of a variable, `None` if missing or unset
    pub fn value(&self, key: &str) -> Option<&str> {
        self.vars.get(key).and_then(|v| v.as_deref())
    }

    /// Insert or overwrite a variable
    pub fn set(&mut self, key: &str, value: impl Into<Option<String>>) -> Result<&mut Self> {
        Self::validate_key(key)?;
        self.vars.insert(key.to_string(), value.into());
        Ok(self)
    }

    /// Write every variable to the backing file, unset ones as `null`
    pub fn save(&self) -> Result<&Self> {
        let path = self.path.as_path();

        if self.options.create_dirs {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
            }
        }

        let file = File::create(path).map_err(|e| StoreError::io(path, e))?;
        let mut writer = BufWriter::new(file);

        let written = if self.options.pretty {
            serde_json::to_writer_pretty(&mut writer, &self.vars)
        } else {
            serde_json::to_writer(&mut writer, &self.vars)
        };
        written.map_err(|e| StoreError::io(path, io::Error::from(e)))?;
        writer.flush().map_err(|e| StoreError::io(path, e))?;

        debug!(path = %path.display(), count = self.vars.len(), "Saved secrets file");
        Ok(self)
    }

    /// Delete the backing file, leaving the in-memory variables alone
    ///
    /// Returns `false` if there was no file to delete.
    pub fn purge(&self) -> Result<bool> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "Purged secrets file");
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StoreError::io(&self.path, e)),
        }
    }

    /// True if every variable has a value
    pub fn all_filled(&self) -> bool {
        self.vars.values().all(Option::is_some)
    }

    /// Names of variables still waiting for a value
    pub fn missing(&self) -> impl Iterator<Item = &str> {
        self.vars
            .iter()
            .filter(|(_, v)| v.is_none())
            .map(|(k, _)| k.as_str())
    }

    /// Read-only view of all variables
    pub fn variables(&self) -> &VariableMap {
        &self.vars
    }

    pub fn contains(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn options(&self) -> StoreOptions {
        self.options
    }
}

// Values stay out of debug output
impl fmt::Debug for SecretsStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretsStore")
            .field("path", &self.path)
            .field("options", &self.options)
            .field("keys", &self.vars.keys().collect::<Vec<_>>())
            .field("filled", &self.all_filled())
            .finish()
    }
}
