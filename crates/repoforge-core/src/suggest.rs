//! Keyword-table based repository name suggestions.

/// Common tech keywords and their abbreviations.
const TECH_KEYWORDS: &[(&str, &str)] = &[
    ("application", "app"),
    ("service", "svc"),
    ("library", "lib"),
    ("framework", "fw"),
    ("interface", "if"),
    ("database", "db"),
    ("microservice", "ms"),
    ("api", "api"),
    ("backend", "be"),
    ("frontend", "fe"),
    ("platform", "platform"),
    ("engine", "engine"),
    ("tool", "tool"),
    ("utility", "util"),
];

const LANGUAGE_PREFIXES: &[(&str, &str)] = &[
    ("python", "py"),
    ("javascript", "js"),
    ("typescript", "ts"),
    ("java", "java"),
    ("golang", "go"),
    ("rust", "rs"),
    ("ruby", "rb"),
];

const COMMON_WORDS: &[&str] = &[
    "the", "a", "an", "is", "are", "for", "to", "of", "in", "and", "or", "this", "that",
];

fn lookup(table: &[(&str, &str)], word: &str) -> Option<String> {
    table
        .iter()
        .find(|(key, _)| *key == word)
        .map(|(_, short)| (*short).to_string())
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Suggest up to `count` repository names for a description, excluding the
/// current name. An empty description yields no suggestions.
pub fn suggest_names(description: &str, current_name: &str, count: usize) -> Vec<String> {
    if description.is_empty() {
        return Vec::new();
    }

    let words: Vec<String> = description
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect();

    let tech_terms: Vec<String> = words
        .iter()
        .filter_map(|w| lookup(TECH_KEYWORDS, w).or_else(|| lookup(LANGUAGE_PREFIXES, w)))
        .collect();

    let important: Vec<&str> = words
        .iter()
        .filter(|w| !COMMON_WORDS.contains(&w.as_str()) && w.len() > 3)
        .map(String::as_str)
        .take(3)
        .collect();

    let mut suggestions: Vec<String> = Vec::new();

    // Kebab-case from the most important words.
    if !important.is_empty() {
        suggestions.push(important.iter().take(2).copied().collect::<Vec<_>>().join("-"));
    }

    // Combined with a tech prefix/suffix.
    if let (Some(term), Some(first)) = (tech_terms.first(), important.first()) {
        suggestions.push(format!("{first}-{term}"));
        if important.len() > 1 {
            suggestions.push(format!(
                "{term}-{}",
                important.iter().take(2).copied().collect::<Vec<_>>().join("-")
            ));
        }
    }

    // Camel-case variant.
    if !important.is_empty() {
        suggestions.push(important.iter().take(2).map(|w| capitalize(w)).collect());
    }

    // Snake-case variant.
    if important.len() >= 2 {
        suggestions.push(important.iter().take(2).copied().collect::<Vec<_>>().join("_"));
    }

    // Dedup preserving order, drop empties and the current name.
    let mut seen = Vec::new();
    for s in suggestions {
        if !s.is_empty() && s != current_name && !seen.contains(&s) {
            seen.push(s);
        }
    }
    seen.truncate(count);
    seen
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_description_yields_nothing() {
        assert!(suggest_names("", "anything", 3).is_empty());
    }

    #[test]
    fn test_suggestions_use_important_words() {
        let suggestions = suggest_names("A payment processing service for merchants", "", 3);

        assert!(!suggestions.is_empty());
        assert_eq!(suggestions[0], "payment-processing");
        // "service" maps to the svc abbreviation.
        assert!(suggestions.iter().any(|s| s.contains("svc")));
    }

    #[test]
    fn test_current_name_is_excluded() {
        let with_current = suggest_names("A payment processing service", "payment-processing", 5);
        assert!(!with_current.contains(&"payment-processing".to_string()));
    }

    #[test]
    fn test_count_is_respected() {
        let suggestions = suggest_names("rust library for parsing configuration files", "", 2);
        assert!(suggestions.len() <= 2);
    }

    #[test]
    fn test_no_duplicates() {
        let suggestions = suggest_names("database database database tooling", "", 5);
        let mut deduped = suggestions.clone();
        deduped.dedup();
        assert_eq!(suggestions, deduped);
    }
}
