//! Output identifiers.
use once_cell::sync::Lazy;
use regex::Regex;

use crate::preprocess::PassState;

static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9_]").unwrap());

/// Replace every character outside `[A-Za-z0-9_]` with `_`, non-ASCII letters included.
pub fn sanitize(symbol: &str) -> String {
    NON_WORD.replace_all(symbol, "_").into_owned()
}

pub fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl PassState {
    /// Symbol after rename-table substitution, followed through chains.
    pub fn canonical<'a>(&'a self, symbol: &'a str) -> &'a str {
        let mut current = symbol;
        // a chain can never be longer than the table itself
        for _ in 0..=self.renames.len() {
            match self.renames.get(current) {
                Some(next) if next != current => current = next.as_str(),
                _ => break,
            }
        }
        current
    }

    /// Output identifier for a symbol.
    pub fn name(&self, symbol: &str) -> String {
        sanitize(self.canonical(symbol))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_word_characters_become_underscores() {
        assert_eq!(sanitize("Foo.Bar<Baz>"), "Foo_Bar_Baz_");
        assert_eq!(sanitize("plain_Name1"), "plain_Name1");
        assert_eq!(sanitize("Café"), "Caf_");
        assert_eq!(sanitize("Größe-Δ"), "Gr__e__");
    }

    #[test]
    fn first_character_case_is_mechanical() {
        assert_eq!(upper_first("blogPost"), "BlogPost");
        assert_eq!(lower_first("BlogPost"), "blogPost");
        assert_eq!(lower_first("URL"), "uRL");
        assert_eq!(upper_first(""), "");
    }

    #[test]
    fn renames_apply_before_sanitizing_and_follow_chains() {
        let mut state = PassState::default();
        state.renames.insert("a.B".into(), "Role".into());
        state.renames.insert("Kind".into(), "a.B".into());
        assert_eq!(state.name("Kind"), "Role");
        assert_eq!(state.name("a.B"), "Role");
        assert_eq!(state.name("x-y"), "x_y");
        // idempotent on its own output
        assert_eq!(state.name(&state.name("Kind")), "Role");
    }

    #[test]
    fn self_referential_rename_terminates() {
        let mut state = PassState::default();
        state.renames.insert("A".into(), "B".into());
        state.renames.insert("B".into(), "A".into());
        let name = state.name("A");
        assert!(name == "A" || name == "B");
    }
}
