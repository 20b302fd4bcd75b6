//! Canonical key derivation: `UpperCamelCase` type names ⇄ `lower-hyphen` keys.
//!
//! Word boundaries follow `convert_case`'s Pascal rules with letter/digit
//! splits disabled, so `AndRule` → `and-rule`. Names made of capitalized
//! lowercase words round-trip exactly.

use convert_case::{Boundary, Case, Casing};

/// `AndRule` → `and-rule`
pub fn camel_to_lower_hyphen(name: &str) -> String {
    name.from_case(Case::Pascal)
        .without_boundaries(&Boundary::letter_digit())
        .to_case(Case::Kebab)
}

/// `and-rule` → `AndRule`
pub fn lower_hyphen_to_camel(key: &str) -> String {
    key.from_case(Case::Kebab).to_case(Case::Pascal)
}

/// Last path segment of a `std::any::type_name`, generics stripped.
///
/// `stratlab_core::components::rule::AndRule` → `AndRule`
pub fn simple_type_name(full: &str) -> &str {
    let without_generics = full.split('<').next().unwrap_or(full);
    without_generics
        .rsplit("::")
        .next()
        .unwrap_or(without_generics)
}

/// Canonical key for a Rust type.
pub fn key_of<T: ?Sized>() -> String {
    camel_to_lower_hyphen(simple_type_name(std::any::type_name::<T>()))
}
