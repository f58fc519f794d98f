use chrono::Weekday;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, EnumIter, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, AsRefStr, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum Keyword {
    Today,
    Yesterday,
    Tomorrow,
    Next,
    Last,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
    Note,
    Task,
    Todo,
    Memo,
}

impl Keyword {
    /// The calendar weekday a weekday keyword stands for.
    pub fn weekday(self) -> Option<Weekday> {
        match self {
            Keyword::Monday => Some(Weekday::Mon),
            Keyword::Tuesday => Some(Weekday::Tue),
            Keyword::Wednesday => Some(Weekday::Wed),
            Keyword::Thursday => Some(Weekday::Thu),
            Keyword::Friday => Some(Weekday::Fri),
            Keyword::Saturday => Some(Weekday::Sat),
            Keyword::Sunday => Some(Weekday::Sun),
            _ => None,
        }
    }
}

pub struct Keywords;

impl Keywords {
    /// Returns the **global keyword registry** (input → canonical).
    ///
    /// The registry is:
    /// - **Initialized once** on first access (via [`once_cell::sync::Lazy`]).
    /// - **Thread-safe** (wrapped in [`RwLock`]): many readers or one writer.
    /// - **Lowercased**: all keys are stored lowercased for case-insensitive lookups.
    ///
    /// It is seeded with every canonical [`Keyword`] mapped to itself. You normally
    /// **don't call this directly**; use [`extend`](Self::extend) to add synonyms and
    /// [`lookup`](Self::lookup) / [`matches`](Self::matches) for checks.
    fn registry() -> &'static RwLock<HashMap<String, Keyword>> {
        static REGISTRY: Lazy<RwLock<HashMap<String, Keyword>>> = Lazy::new(|| {
            let m = Keyword::iter()
                .map(|key| (key.as_ref().to_string(), key))
                .collect();
            RwLock::new(m)
        });
        &REGISTRY
    }

    /// Extends the global registry with user-defined **synonyms**.
    ///
    /// Each pair is `(alias, target)`. The `target` must be a **known** word already
    /// in the registry (a canonical keyword or an existing synonym). If `target` isn't
    /// known, the pair is ignored silently.
    ///
    /// Typical call site: during `Config::load()`, after reading `[synonyms]`
    /// from `config.toml`:
    ///
    /// ```toml
    /// [synonyms]
    /// ytd  = "yesterday"
    /// mi   = "wednesday"
    /// todo = "task"
    /// ```
    pub fn extend(synonyms: &[(String, String)]) {
        let mut reg = Self::registry()
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        for (alias, target) in synonyms {
            if let Some(&canonical) = reg.get(&target.to_ascii_lowercase()) {
                reg.insert(alias.to_ascii_lowercase(), canonical);
            }
        }
    }

    /// Returns `true` if `word` is a canonical word (eg "today").
    pub fn is_canonical(word: &str) -> bool {
        let word = word.to_ascii_lowercase();
        Keyword::iter().any(|key| key.as_ref() == word)
    }

    /// Resolves `input` (case-insensitively) to the keyword it names, if any.
    pub fn lookup(input: &str) -> Option<Keyword> {
        let reg = Self::registry()
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        reg.get(&input.trim().to_ascii_lowercase()).copied()
    }

    /// Returns `true` if `input` equals (case-insensitively) the given **canonical keyword**
    /// or any of its registered synonyms.
    pub fn matches(keyword: Keyword, input: &str) -> bool {
        Self::lookup(input) == Some(keyword)
    }
}
