use std::{collections::HashMap, sync::LazyLock};

use super::token::{Keyword, Symbol};

static KEYWORDS: LazyLock<HashMap<&'static str, Keyword>> = LazyLock::new(|| {
    Keyword::ALL
        .iter()
        .map(|keyword| (keyword.as_str(), *keyword))
        .collect()
});

/// Candidates for the keyword scanner's longest match, in declaration order.
pub static KEYWORD_OPTIONS: LazyLock<Vec<&'static str>> =
    LazyLock::new(|| Keyword::ALL.iter().map(Keyword::as_str).collect());

/// Candidates for the symbol scanner's longest match.
pub static SYMBOL_OPTIONS: LazyLock<Vec<&'static str>> =
    LazyLock::new(|| Symbol::ALL.iter().map(Symbol::as_str).collect());

pub fn get(text: &str) -> Option<Keyword> {
    let keyword = text.to_lowercase();
    KEYWORDS.get(keyword.as_str()).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_ignores_case() {
        assert_eq!(get("SELECT"), Some(Keyword::Select));
        assert_eq!(get("Into"), Some(Keyword::Into));
        assert_eq!(get("int"), Some(Keyword::Int));
        assert_eq!(get("integer"), None);
    }

    #[test]
    fn option_tables_cover_every_variant() {
        assert_eq!(KEYWORD_OPTIONS.len(), Keyword::ALL.len());
        assert_eq!(SYMBOL_OPTIONS.as_slice(), [",", "(", ")", ";", "*"]);
    }
}
