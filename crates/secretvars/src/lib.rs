//! secretvars - Local user secret variables
//!
//! Keep credentials and per-user settings out of the project tree. A program
//! declares the variables it needs, missing ones are read once (usually by
//! prompting), and everything is persisted to a JSON file in the user's data
//! directory for the next run.
//!
//! Values are stored in plaintext. This is a convenience store, not a vault.

pub mod config;
pub mod error;
pub mod paths;
pub mod reader;
pub mod store;

pub use config::{Config, StoreOptions};
pub use error::StoreError;
pub use paths::Paths;
pub use reader::{ConsoleReader, EnvReader, HiddenReader, ValueReader};
pub use store::{SecretsStore, VariableMap};
