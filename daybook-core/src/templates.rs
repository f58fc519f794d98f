//! `${var}` substitution for paths and generated Markdown.
//!
//! Entry header:  `# Sunday, 18 Oct 2026`
//! Note header:   `# Meeting with Ana`
//! Task line:     `- [ ] call bob`
//! Backlink:      `- [Meeting with Ana](../../notes/2026/10/2026-10-18-meeting-with-ana.md)`

use chrono::{NaiveDate, NaiveTime};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::config::Config;

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\{([A-Za-z]+)\}").expect("placeholder pattern is valid")
});

/// Named values available to a template.
#[derive(Debug, Clone, Default)]
pub struct TemplateVars {
    values: Vec<(&'static str, String)>,
}

impl TemplateVars {
    /// Variables derived from a calendar date only: `year`, `month`, `day`,
    /// `weekday`, `localDate` and `ext`.
    pub fn for_date(date: NaiveDate, config: &Config) -> Self {
        Self::default()
            .with("year", date.format("%Y").to_string())
            .with("month", date.format("%m").to_string())
            .with("day", date.format("%Y-%m-%d").to_string())
            .with("weekday", date.format("%A").to_string())
            .with("localDate", date.format(&config.date_format).to_string())
            .with("ext", config.ext.clone())
    }

    pub fn with(mut self, name: &'static str, value: impl Into<String>) -> Self {
        let value = value.into();
        match self.values.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.values.push((name, value)),
        }
        self
    }

    pub fn with_time(self, time: NaiveTime, config: &Config) -> Self {
        self.with("localTime", time.format(&config.time_format).to_string())
    }

    fn get(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Substitutes every known `${name}`; unknown placeholders are kept verbatim.
pub fn render(template: &str, vars: &TemplateVars) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| match vars.get(&caps[1]) {
            Some(value) => value.to_string(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Default content of a new day entry.
pub fn format_entry(date: NaiveDate, config: &Config) -> String {
    render(&config.templates.entry, &TemplateVars::for_date(date, config))
}

/// Content of a new note titled `title`, created on `date`.
pub fn format_note(title: &str, date: NaiveDate, config: &Config) -> String {
    let vars = TemplateVars::for_date(date, config)
        .with("input", title)
        .with("title", title);
    render(&config.templates.note, &vars)
}

/// The string stamped by `printTime`.
pub fn format_time(now: NaiveTime, config: &Config) -> String {
    render(
        &config.templates.time,
        &TemplateVars::default().with_time(now, config),
    )
}

pub fn format_memo(text: &str, now: NaiveTime, config: &Config) -> String {
    let vars = TemplateVars::default()
        .with_time(now, config)
        .with("input", text);
    render(&config.templates.memo, &vars)
}

pub fn format_task(text: &str, config: &Config) -> String {
    render(
        &config.templates.task,
        &TemplateVars::default().with("input", text),
    )
}

/// The backlink line written into today's entry when a note is created.
pub fn format_note_link(title: &str, link: &str, config: &Config) -> String {
    let vars = TemplateVars::default()
        .with("title", title)
        .with("input", title)
        .with("link", link);
    render(&config.templates.note_link, &vars)
}

/// Lowercase ASCII alphanumerics joined by single dashes: `"Q3 Plan: draft!"` -> `"q3-plan-draft"`.
pub fn slugify(title: &str) -> String {
    title
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::mk_config;
    use std::path::PathBuf;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn entry_header_formats_readably() {
        let config = mk_config(PathBuf::from("/tmp/daybook"), None);
        let s = format_entry(d(2025, 8, 15), &config);
        assert_eq!(s, "# Friday, 15 Aug 2025\n\n");
    }

    #[test]
    fn unknown_placeholders_are_kept() {
        let vars = TemplateVars::default().with("input", "x");
        assert_eq!(render("${input} ${nope}", &vars), "x ${nope}");
    }

    #[test]
    fn later_values_replace_earlier_ones() {
        let vars = TemplateVars::default().with("input", "a").with("input", "b");
        assert_eq!(render("${input}", &vars), "b");
    }

    #[test]
    fn note_and_lines() {
        let config = mk_config(PathBuf::from("/tmp/daybook"), None);
        let t = NaiveTime::from_hms_opt(7, 5, 0).unwrap();
        assert_eq!(
            format_note("Meeting", d(2025, 8, 15), &config),
            "# Meeting\n\n"
        );
        assert_eq!(format_time(t, &config), "07:05");
        assert_eq!(format_memo("coffee", t, &config), "- 07:05 coffee");
        assert_eq!(format_task("call bob", &config), "- [ ] call bob");
        assert_eq!(
            format_note_link("Meeting", "notes/m.md", &config),
            "- [Meeting](notes/m.md)"
        );
    }

    #[test]
    fn slugs() {
        assert_eq!(slugify("Q3 Plan: draft!"), "q3-plan-draft");
        assert_eq!(slugify("  Über  café "), "ber-caf");
        assert_eq!(slugify("!!!"), "");
    }
}
