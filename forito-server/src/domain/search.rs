/// Escapes regular-expression metacharacters so user-supplied search text is
/// always matched literally (`C++` means the two-character suffix, not a
/// quantifier).
pub(crate) fn escape_regex(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        if matches!(
            ch,
            '.' | '*' | '+' | '?' | '^' | '$' | '{' | '}' | '(' | ')' | '|' | '[' | ']' | '\\'
        ) {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::escape_regex;

    #[test]
    fn passes_plain_text_through() {
        assert_eq!(escape_regex("test"), "test");
        assert_eq!(escape_regex("C Guide"), "C Guide");
    }

    #[test]
    fn escapes_every_metacharacter() {
        assert_eq!(escape_regex("test*"), "test\\*");
        assert_eq!(escape_regex("test+"), "test\\+");
        assert_eq!(escape_regex("test?"), "test\\?");
        assert_eq!(escape_regex("test^"), "test\\^");
        assert_eq!(escape_regex("test$"), "test\\$");
        assert_eq!(escape_regex("test."), "test\\.");
        assert_eq!(escape_regex("test|"), "test\\|");
        assert_eq!(escape_regex("test("), "test\\(");
        assert_eq!(escape_regex("test)"), "test\\)");
        assert_eq!(escape_regex("test["), "test\\[");
        assert_eq!(escape_regex("test]"), "test\\]");
        assert_eq!(escape_regex("test{"), "test\\{");
        assert_eq!(escape_regex("test}"), "test\\}");
        assert_eq!(escape_regex("test\\"), "test\\\\");
    }

    #[test]
    fn escaped_pattern_matches_literally() {
        let pattern = regex::Regex::new(&escape_regex("C++")).expect("must compile");
        assert!(pattern.is_match("C++ Guide"));
        assert!(!pattern.is_match("C Guide"));

        let pattern = regex::Regex::new(&escape_regex("a.b")).expect("must compile");
        assert!(pattern.is_match("a.b"));
        assert!(!pattern.is_match("axb"));
    }
}
