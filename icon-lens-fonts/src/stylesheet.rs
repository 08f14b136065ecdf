//! Icon stylesheet parsing.
//!
//! Icon font stylesheets declare one rule per icon of the shape
//! `.icon-home:before{content:"\e901"}`. The rules are matched textually;
//! everything else in the sheet is ignored.

use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

static RULE_REGEX: OnceLock<Regex> = OnceLock::new();

/// Get the compiled `.icon-*:before{content:"\hex"}` rule pattern
fn rule_regex() -> &'static Regex {
    RULE_REGEX.get_or_init(|| {
        Regex::new(
            r#"(?x)
            \.(icon(?:-\w+)+)               # selector: the icon name
            ::?before\s*
            \{\s*content\s*:\s*
            ["']\\+([0-9a-fA-F]+)["']       # escaped hex codepoint
            \s*;?\s*\}
            "#,
        )
        .expect("Failed to compile stylesheet rule regex")
    })
}

/// Icon-name to codepoint table, iterated in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodepointTable {
    entries: Vec<(String, u32)>,
    index: HashMap<String, usize>,
}

impl CodepointTable {
    /// Build the table from stylesheet text.
    ///
    /// A sheet without matching rules yields an empty table. When a name is
    /// declared twice the later codepoint wins and the first position is kept.
    pub fn parse(stylesheet: &str) -> Self {
        let mut table = Self::default();
        for caps in rule_regex().captures_iter(stylesheet) {
            let name = &caps[1];
            let hex = &caps[2];
            match u32::from_str_radix(hex, 16) {
                Ok(codepoint) => table.insert(name.to_string(), codepoint),
                Err(e) => log::debug!("Skipping rule for {}: bad codepoint {:?}: {}", name, hex, e),
            }
        }
        log::debug!("Parsed {} icon rules from stylesheet", table.len());
        table
    }

    fn insert(&mut self, name: String, codepoint: u32) {
        match self.index.get(&name) {
            Some(&slot) => self.entries[slot].1 = codepoint,
            None => {
                self.index.insert(name.clone(), self.entries.len());
                self.entries.push((name, codepoint));
            }
        }
    }

    /// Codepoint declared for `name` (case-sensitive).
    pub fn get(&self, name: &str) -> Option<u32> {
        self.index.get(name).map(|&slot| self.entries[slot].1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(name, codepoint)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.entries.iter().map(|(name, cp)| (name.as_str(), *cp))
    }
}

impl FromIterator<(String, u32)> for CodepointTable {
    fn from_iter<I: IntoIterator<Item = (String, u32)>>(iter: I) -> Self {
        let mut table = Self::default();
        for (name, codepoint) in iter {
            table.insert(name, codepoint);
        }
        table
    }
}
