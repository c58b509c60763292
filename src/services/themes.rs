use crate::catalog::Catalog;

/// Detect themes in a piece of text.
///
/// Matching is a case-folded substring scan over each theme's token list:
/// deliberately not word-boundary tokenized, so mixed CJK/Latin text and
/// partial-word hits behave the way the dictionaries were tuned. A theme is
/// hit as soon as any one token matches; results come back in dictionary
/// order with no intra-theme scoring.
pub fn detect_themes<'a>(catalog: &'a Catalog, text: &str) -> Vec<&'a str> {
    let folded = text.to_lowercase();

    catalog
        .themes
        .iter()
        .filter(|spec| spec.tokens.iter().any(|token| folded.contains(token)))
        .map(|spec| spec.name)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_cjk_tokens() {
        let catalog = Catalog::builtin();
        let themes = detect_themes(&catalog, "易方达半导体产业混合A");
        assert_eq!(themes, vec!["半导体"]);
    }

    #[test]
    fn test_detects_latin_tokens_case_folded() {
        let catalog = Catalog::builtin();
        let themes = detect_themes(&catalog, "S&P 500 Index Fund");
        assert_eq!(themes, vec!["美股核心"]);
    }

    #[test]
    fn test_multiple_themes_in_dictionary_order() {
        let catalog = Catalog::builtin();
        let themes = detect_themes(&catalog, "新能源光伏与半导体芯片双主题");
        assert_eq!(themes, vec!["半导体", "新能源"]);
    }

    #[test]
    fn test_substring_match_is_intentional() {
        // "晶圆" inside a longer compound still hits; no tokenizer involved
        let catalog = Catalog::builtin();
        let themes = detect_themes(&catalog, "中芯国际晶圆代工产能");
        assert!(themes.contains(&"半导体"));
    }

    #[test]
    fn test_no_match_returns_empty() {
        let catalog = Catalog::builtin();
        assert!(detect_themes(&catalog, "货币基金").is_empty());
    }
}
