use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use directories::BaseDirs;
use serde::Deserialize;
use std::{
    collections::HashMap,
    env, fs,
    path::{Path, PathBuf},
};

use crate::keywords::Keywords;

/// Environment variable pointing at an explicit config file.
pub const CONFIG_ENV: &str = "DAYBOOK_CONFIG";

#[derive(Debug, Clone)]
pub struct Config {
    /// Absolute directory where entries and notes live.
    pub base_path: PathBuf,
    /// Preferred editor name/binary (e.g. hx for Helix). Optional; the CLI will fall back to $VISUAL/$EDITOR.
    pub editor: Option<String>,
    /// File extension of entries and notes, without the dot.
    pub ext: String,
    /// Format of `${localDate}`. Default is "%A, %d %b %Y".
    pub date_format: String,
    /// Format of `${localTime}`. Default is "%H:%M".
    pub time_format: String,
    /// Date literals accepted by the input parser, tried in order.
    pub input_date_formats: Vec<String>,
    /// The day every offset is relative to.
    pub reference_date: NaiveDate,
    pub patterns: Patterns,
    pub templates: Templates,
}

/// Where entries and notes are stored, relative to `base_path`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Patterns {
    pub entry_dir: String,
    pub entry_file: String,
    pub notes_dir: String,
    pub notes_file: String,
}

impl Default for Patterns {
    fn default() -> Self {
        Self {
            entry_dir: "${year}/${month}".to_string(),
            entry_file: "${day}.${ext}".to_string(),
            notes_dir: "notes/${year}/${month}".to_string(),
            notes_file: "${day}-${input}.${ext}".to_string(),
        }
    }
}

/// Content templates. See [`crate::templates`] for the available variables.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Templates {
    pub entry: String,
    pub note: String,
    pub time: String,
    pub memo: String,
    pub task: String,
    pub note_link: String,
}

impl Default for Templates {
    fn default() -> Self {
        Self {
            entry: "# ${localDate}\n\n".to_string(),
            note: "# ${input}\n\n".to_string(),
            time: "${localTime}".to_string(),
            memo: "- ${localTime} ${input}".to_string(),
            task: "- [ ] ${input}".to_string(),
            note_link: "- [${title}](${link})".to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    base_path: Option<PathBuf>,
    editor: Option<String>,
    ext: Option<String>,
    date_format: Option<String>,
    time_format: Option<String>,
    input_date_formats: Option<Vec<String>>,
    patterns: Option<Patterns>,
    templates: Option<Templates>,
    /// Optional table:
    /// [synonyms]
    /// ytd = "yesterday"
    /// ayer = "yesterday"
    synonyms: Option<HashMap<String, String>>,
}

impl Config {
    /// Public entrypoint: load config from disk (`$DAYBOOK_CONFIG`, then XDG path, then native),
    /// apply defaults, and extend the global Keywords registry with user-defined synonyms if present.
    pub fn load() -> Result<Self> {
        let file_config = Self::read_file_config().unwrap_or_else(|error| {
            tracing::warn!(error = %format!("{error:#}"), "ignoring unreadable config file");
            FileConfig::default()
        });
        Ok(Self::from_file_config(file_config))
    }

    fn from_file_config(file_config: FileConfig) -> Self {
        let base_path = file_config
            .base_path
            .map(|p| expand_home(&p))
            .unwrap_or_else(Self::default_base_path);

        // Extend global keyword registry once at startup.
        Self::load_synonyms(&file_config.synonyms);

        Self {
            base_path,
            editor: file_config.editor,
            ext: file_config.ext.unwrap_or_else(|| "md".to_string()),
            date_format: file_config
                .date_format
                .unwrap_or_else(|| "%A, %d %b %Y".to_string()),
            time_format: file_config
                .time_format
                .unwrap_or_else(|| "%H:%M".to_string()),
            input_date_formats: file_config
                .input_date_formats
                .unwrap_or_else(Self::default_input_date_formats),
            reference_date: Local::now().date_naive(),
            patterns: file_config.patterns.unwrap_or_default(),
            templates: file_config.templates.unwrap_or_default(),
        }
    }

    fn default_input_date_formats() -> Vec<String> {
        vec!["%Y-%m-%d".to_string(), "%Y%m%d".to_string()]
    }

    /// Default journal root: `{data_dir}/daybook`
    /// - macOS:   `~/Library/Application Support/daybook`
    /// - Linux:   `$XDG_DATA_HOME/daybook` or `~/.local/share/daybook`
    /// - Windows: `%APPDATA%\daybook`
    fn default_base_path() -> PathBuf {
        if let Some(base) = BaseDirs::new() {
            base.data_dir().join("daybook")
        } else {
            PathBuf::from("./daybook")
        }
    }

    fn config_file_paths() -> Vec<PathBuf> {
        let mut v = Vec::new();
        if let Some(explicit) = env::var_os(CONFIG_ENV) {
            v.push(PathBuf::from(explicit));
        }
        if let Some(b) = BaseDirs::new() {
            let xdg = b
                .home_dir()
                .join(".config")
                .join("daybook")
                .join("config.toml");
            v.push(xdg);
            let native = b.config_dir().join("daybook").join("config.toml");
            v.push(native);
        }
        v
    }

    /// Read the first existing config file and parse it.
    fn read_file_config() -> Result<FileConfig> {
        for path in Self::config_file_paths() {
            if !path.exists() {
                continue;
            }
            let s =
                fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
            return Self::parse_file(&s).with_context(|| format!("parsing {}", path.display()));
        }
        Ok(FileConfig::default())
    }

    /// Parse a TOML string into `FileConfig`.
    fn parse_file(s: &str) -> Result<FileConfig> {
        Ok(toml::from_str::<FileConfig>(s)?)
    }

    /// Merge `[synonyms]` into the global Keywords registry.
    /// Omits synonyms that collide with a canonical keyword (eg. "today").
    fn load_synonyms(synonyms: &Option<HashMap<String, String>>) {
        if let Some(map) = synonyms {
            let pairs: Vec<(String, String)> = map
                .iter()
                .filter(|(alias, _)| !Keywords::is_canonical(alias))
                .map(|(a, t)| (a.clone(), t.clone()))
                .collect();

            if !pairs.is_empty() {
                Keywords::extend(&pairs);
            }
        }
    }
}

/// Replaces a leading `~` with the user's home directory.
fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), BaseDirs::new()) {
        (Ok(rest), Some(b)) => b.home_dir().join(rest),
        _ => path.to_path_buf(),
    }
}
