use chrono::NaiveDate;
use std::path::{Component, Path, PathBuf};

use crate::config::Config;
use crate::templates::{TemplateVars, render, slugify};

pub fn entry_dir(config: &Config, date: NaiveDate) -> PathBuf {
    let vars = TemplateVars::for_date(date, config);
    config
        .base_path
        .join(render(&config.patterns.entry_dir, &vars))
}

/// `{base}/2026/10/2026-10-18.md` with the default patterns.
pub fn entry_path(config: &Config, date: NaiveDate) -> PathBuf {
    let vars = TemplateVars::for_date(date, config);
    entry_dir(config, date).join(render(&config.patterns.entry_file, &vars))
}

/// `{base}/notes/2026/10/2026-10-18-meeting-with-ana.md` with the default patterns.
pub fn note_path(config: &Config, title: &str, date: NaiveDate) -> PathBuf {
    let slug = match slugify(title) {
        s if s.is_empty() => "note".to_string(),
        s => s,
    };
    let vars = TemplateVars::for_date(date, config).with("input", slug);
    config
        .base_path
        .join(render(&config.patterns.notes_dir, &vars))
        .join(render(&config.patterns.notes_file, &vars))
}

/// Where a user-typed path would live: absolute paths as-is, anything else under the base path.
pub fn candidate_path(config: &Config, raw: &str) -> PathBuf {
    let raw = Path::new(raw.trim());
    if raw.is_absolute() {
        raw.to_path_buf()
    } else {
        config.base_path.join(raw)
    }
}

/// Path of `to` as seen from the directory `from_dir`, `/`-separated for Markdown links.
pub fn relative_link(from_dir: &Path, to: &Path) -> String {
    let from: Vec<Component> = from_dir.components().collect();
    let target: Vec<Component> = to.components().collect();
    let common = from
        .iter()
        .zip(target.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let ups = std::iter::repeat_n("..".to_string(), from.len() - common);
    let downs = target[common..]
        .iter()
        .map(|c| c.as_os_str().to_string_lossy().into_owned());
    ups.chain(downs).collect::<Vec<_>>().join("/")
}
