/// Escape a value for use inside a quoted CSS attribute selector.
pub fn css_attribute_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' | '\'' | '"' => {
                out.push('\\');
                out.push(c);
            }
            '\n' => out.push_str("\\a "),
            '\r' => out.push_str("\\d "),
            _ => out.push(c),
        }
    }
    out
}

/// Escape a class name or id so it parses as a single CSS identifier.
pub fn css_identifier(ident: &str) -> String {
    let mut out = String::with_capacity(ident.len());
    let chars: Vec<char> = ident.chars().collect();

    for (i, &c) in chars.iter().enumerate() {
        let leading_digit = c.is_ascii_digit()
            && (i == 0 || (i == 1 && chars[0] == '-'));
        if leading_digit {
            out.push_str(&format!("\\{:x} ", c as u32));
        } else if c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii() {
            out.push(c);
        } else {
            out.push('\\');
            out.push(c);
        }
    }
    out
}

/// Quote a string as an XPath 1.0 literal.
///
/// Uses single quotes, double quotes if the value contains a single quote,
/// and `concat()` when it contains both.
pub fn xpath_literal(value: &str) -> String {
    if !value.contains('\'') {
        return format!("'{value}'");
    }
    if !value.contains('"') {
        return format!("\"{value}\"");
    }

    let parts: Vec<String> = value
        .split('\'')
        .map(|part| format!("'{part}'"))
        .collect();
    format!("concat({})", parts.join(", \"'\", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xpath_literal_prefers_single_quotes() {
        assert_eq!(xpath_literal("Submit"), "'Submit'");
        assert_eq!(xpath_literal("Don't"), "\"Don't\"");
    }

    #[test]
    fn xpath_literal_uses_concat_for_mixed_quotes() {
        assert_eq!(
            xpath_literal(r#"a'b"c"#),
            r#"concat('a', "'", 'b"c')"#
        );
    }

    #[test]
    fn css_identifier_escapes_leading_digit_and_punctuation() {
        assert_eq!(css_identifier("1col"), "\\31 col");
        assert_eq!(css_identifier("w-1/2"), "w-1\\/2");
        assert_eq!(css_identifier("nav-item"), "nav-item");
    }

    #[test]
    fn css_attribute_value_escapes_quotes() {
        assert_eq!(css_attribute_value("it's"), "it\\'s");
    }

    #[test]
    fn css_attribute_value_escapes_line_breaks() {
        assert_eq!(css_attribute_value("a\nb"), "a\\a b");
        assert_eq!(css_attribute_value("a\r\nb"), "a\\d \\a b");
    }
}
