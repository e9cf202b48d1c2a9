pub use convert_case::Case;
use convert_case::{Boundary, Casing};

/// Converts a string to the specified case.
pub fn str_to_case<S: AsRef<str>>(s: S, case: Case) -> String {
    static BOUNDARIES: &[Boundary] = &[
        Boundary::Underscore,
        Boundary::Hyphen,
        Boundary::Space,
        Boundary::LowerUpper,
        Boundary::Acronym,
        Boundary::UpperDigit,
        // Boundary::LowerDigit,
        Boundary::DigitUpper,
        Boundary::DigitLower,
    ];
    s.as_ref().with_boundaries(BOUNDARIES).to_case(case)
}

/// Converts a proto `snake_case` field name to its `jsonName`, following the
/// exact algorithm from the protobuf JSON mapping spec: an underscore is
/// dropped and the following ASCII letter is upper-cased; everything else
/// (including existing upper-case letters) passes through unchanged.
#[must_use]
pub fn proto_field_to_json_name<S: AsRef<str>>(name: S) -> String {
    let mut result = String::with_capacity(name.as_ref().len());
    let mut capitalize_next = false;
    for c in name.as_ref().chars() {
        if c == '_' {
            capitalize_next = true;
        } else if capitalize_next {
            result.extend(c.to_uppercase());
            capitalize_next = false;
        } else {
            result.push(c);
        }
    }
    result
}

/// Converts a camelCase path segment (as used by `FieldMask`) back to
/// `snake_case` by inserting an underscore before each ASCII upper-case
/// letter and lower-casing it. This is a one-way, best-effort inverse: it is
/// not validated against the original `snake_case` form on decode.
#[must_use]
pub fn camel_case_to_snake_case<S: AsRef<str>>(name: S) -> String {
    let mut result = String::with_capacity(name.as_ref().len() + 4);
    for c in name.as_ref().chars() {
        if c.is_ascii_uppercase() {
            result.push('_');
            result.extend(c.to_lowercase());
        } else {
            result.push(c);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_name() {
        assert_eq!(proto_field_to_json_name("foo_bar"), "fooBar");
        assert_eq!(proto_field_to_json_name("foo_bar_baz"), "fooBarBaz");
        assert_eq!(proto_field_to_json_name("_foo"), "Foo");
        assert_eq!(proto_field_to_json_name("foo"), "foo");
        assert_eq!(proto_field_to_json_name("fooBar"), "fooBar");
    }

    #[test]
    fn snake_case_inverse() {
        assert_eq!(camel_case_to_snake_case("fooBar"), "foo_bar");
        assert_eq!(camel_case_to_snake_case("fooBarBaz"), "foo_bar_baz");
        assert_eq!(camel_case_to_snake_case("foo"), "foo");
    }
}
