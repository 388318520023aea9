use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Lowercases and strips diacritics, so "Frenó" and "freno" compare equal.
pub fn fold(text: &str) -> String {
    text.chars()
        .flat_map(char::to_lowercase)
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

/// Splits folded text on anything that is not a letter or digit.
pub fn tokenize(text: &str) -> Vec<String> {
    fold(text)
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Query tokens in first-seen order, duplicates removed.
pub fn query_tokens(query: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for token in tokenize(query) {
        if !out.contains(&token) { out.push(token); }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_accents_and_case() {
        assert_eq!(fold("Frenó"), "freno");
        assert_eq!(fold("AÇÃO São"), "acao sao");
        assert_eq!(fold("İZMİR"), "izmir");
    }

    #[test]
    fn tokenizes_on_punctuation() {
        assert_eq!(tokenize("Pastillas de Freno (Delanteras)"), vec!["pastillas", "de", "freno", "delanteras"]);
        assert!(tokenize("  -- ").is_empty());
        assert_eq!(query_tokens("freno FRENO aceite"), vec!["freno", "aceite"]);
    }
}
