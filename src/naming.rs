//! Identifier case helpers used by the accessor generator.

/// Upper-case the first character of `word`, leaving the rest unchanged.
///
/// A single-character word is fully upper-cased.
pub fn capital_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Lower-case the first character of `word`, leaving the rest unchanged.
pub fn small_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Check whether `name` is a valid Go identifier.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_alphanumeric())
}

/// Field name Go assigns to an embedded field of type `type_text`.
///
/// `*pkg.Base` and `Base` both yield `Base`.
pub fn embedded_field_name(type_text: &str) -> &str {
    let base = type_text.trim_start_matches('*');
    let base = base.split('[').next().unwrap_or(base);
    base.rsplit('.').next().unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capital_case() {
        assert_eq!(capital_case(""), "");
        assert_eq!(capital_case("x"), "X");
        assert_eq!(capital_case("things"), "Things");
        assert_eq!(capital_case("camelCase"), "CamelCase");
        assert_eq!(capital_case("Already"), "Already");
        assert_eq!(capital_case("élan"), "Élan");
    }

    #[test]
    fn test_small_case() {
        assert_eq!(small_case(""), "");
        assert_eq!(small_case("P"), "p");
        assert_eq!(small_case("Point"), "point");
        assert_eq!(small_case("HTTPClient"), "hTTPClient");
    }

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("Foo"));
        assert!(is_identifier("_bar9"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("9lives"));
        assert!(!is_identifier("Foo.Bar"));
        assert!(!is_identifier("*"));
    }

    #[test]
    fn test_embedded_field_name() {
        assert_eq!(embedded_field_name("Base"), "Base");
        assert_eq!(embedded_field_name("*Base"), "Base");
        assert_eq!(embedded_field_name("sync.Mutex"), "Mutex");
        assert_eq!(embedded_field_name("*bytes.Buffer"), "Buffer");
        assert_eq!(embedded_field_name("List[T]"), "List");
    }
}
