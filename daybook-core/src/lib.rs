pub mod config;
pub mod document;
pub mod error;
pub mod host;
pub mod journal;
pub mod keywords;
pub mod parse_input;
pub mod paths;
pub mod pipeline;
pub mod resolve;
pub mod scanner;
pub mod store;
pub mod templates;

pub use config::Config;
pub use document::{EditorSnapshot, Position, Selection, TextDocument};
pub use error::{ErrorReport, JournalError, JournalResult};
pub use host::{EditorHandle, Host};
pub use journal::Journal;
pub use parse_input::Input;
