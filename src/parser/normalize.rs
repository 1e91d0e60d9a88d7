//! Pre-parse cleanup of comparison-style angle brackets.

use regex::Regex;

/// Entity-escape angle brackets that cannot be part of a tag.
///
/// Authors write inline comparisons like `x < y`. A `<` followed by
/// whitespace is a mathematical less-than, and a `>` not preceded by a
/// lowercase letter, double quote, slash, or hyphen cannot close a tag name
/// or attribute list. Both are escaped so the markup parses as a
/// well-formed tree; unescaping on read restores the literal text.
pub(crate) fn normalize_angle_brackets(src: &str) -> String {
    let lt = Regex::new(r"<(\s)").unwrap();
    let escaped = lt.replace_all(src, "&lt;$1");
    let gt = Regex::new(r#"([^a-z"/-])>"#).unwrap();
    gt.replace_all(&escaped, "$1&gt;").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_less_than_before_whitespace_is_escaped() {
        assert_eq!(normalize_angle_brackets("a < b"), "a &lt; b");
        assert_eq!(normalize_angle_brackets("a <\tb"), "a &lt;\tb");
        assert_eq!(normalize_angle_brackets("a <\n b"), "a &lt;\n b");
    }

    #[test]
    fn test_greater_than_after_non_tag_char_is_escaped() {
        assert_eq!(normalize_angle_brackets("a > b"), "a &gt; b");
        assert_eq!(normalize_angle_brackets("x2>y"), "x2&gt;y");
    }

    #[test]
    fn test_tags_survive() {
        assert_eq!(normalize_angle_brackets("<par>text</par>"), "<par>text</par>");
        assert_eq!(
            normalize_angle_brackets(r#"<macro name="x" value="1"/>"#),
            r#"<macro name="x" value="1"/>"#
        );
        // Closers preceded by quote, slash, or hyphen stay intact.
        assert_eq!(normalize_angle_brackets("<hr-/>"), "<hr-/>");
    }

    #[test]
    fn test_mixed_comparisons_and_tags() {
        assert_eq!(
            normalize_angle_brackets("<par>a < b and c > d</par>"),
            "<par>a &lt; b and c &gt; d</par>"
        );
    }
}
