//! GraphQL to TypeScript type mappings.
//!
//! This module renders [`TypeRef`]s as TypeScript type expressions. It
//! provides the [`TypeMapper`] struct which carries the known-scalars
//! context every field, argument and input field is rendered against.
//!
//! # Type Mappings
//!
//! | GraphQL | TypeScript (output position) |
//! |---------|------------------------------|
//! | `String!` | `Scalars['String']` |
//! | `String` | `Maybe<Scalars['String']>` |
//! | `[User!]!` | `Array<User>` |
//! | `[User]` | `Maybe<Array<Maybe<User>>>` |
//! | `user_profile` | `UserProfile` |
//!
//! Input object fields use `InputMaybe` in place of `Maybe`.

use std::collections::HashSet;

use crate::schema::TypeRef;

/// Built-in scalars with a native TypeScript counterpart.
pub const BUILTIN_SCALAR_TYPES: [(&str, &str); 4] = [
    ("String", "string"),
    ("Boolean", "boolean"),
    ("Int", "number"),
    ("Float", "number"),
];

/// Target type for scalars without a registered mapping.
pub const FALLBACK_SCALAR_TYPE: &str = "any";

/// Resolve the TypeScript type a scalar maps to in the `Scalars` registry.
pub fn scalar_target(name: &str) -> &'static str {
    BUILTIN_SCALAR_TYPES
        .iter()
        .find(|(scalar, _)| *scalar == name)
        .map_or(FALLBACK_SCALAR_TYPE, |(_, target)| target)
}

/// Whether a type is rendered in an output or an input position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// Object and interface fields, and their arguments.
    Output,
    /// Input object fields.
    Input,
}

impl Position {
    /// The optional-wrapper used in this position.
    pub fn maybe_wrapper(self) -> &'static str {
        match self {
            Position::Output => "Maybe",
            Position::Input => "InputMaybe",
        }
    }
}

/// Maps GraphQL type references to TypeScript expressions.
#[derive(Debug, Clone, Default)]
pub struct TypeMapper<'a> {
    /// Names found in the `Scalars` registry.
    known_scalars: HashSet<&'a str>,
}

impl<'a> TypeMapper<'a> {
    /// Create a mapper for the given scalar names.
    pub fn new(known_scalars: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            known_scalars: known_scalars.into_iter().collect(),
        }
    }

    /// Check if a name is in the scalar registry.
    pub fn is_scalar(&self, name: &str) -> bool {
        self.known_scalars.contains(name)
    }

    /// Render a property line body: `name: T` or `name?: Maybe<T>`.
    pub fn property(&self, name: &str, ty: &TypeRef, position: Position) -> String {
        let separator = if ty.is_non_null() { ":" } else { "?:" };
        format!("{}{} {}", name, separator, self.map_type(ty, position))
    }

    /// Map a type reference, wrapping nullable positions.
    pub fn map_type(&self, ty: &TypeRef, position: Position) -> String {
        match ty {
            TypeRef::NonNull(inner) => self.map_non_null(inner, position),
            nullable => format!(
                "{}<{}>",
                position.maybe_wrapper(),
                self.map_non_null(nullable, position)
            ),
        }
    }

    /// Map a type reference whose own position is already non-null.
    fn map_non_null(&self, ty: &TypeRef, position: Position) -> String {
        match ty {
            TypeRef::Named(name) => self.map_named(name),
            TypeRef::List(element) => format!("Array<{}>", self.map_type(element, position)),
            TypeRef::NonNull(inner) => self.map_non_null(inner, position),
        }
    }

    /// Map a named type: scalar registry first, then the naming convention.
    pub fn map_named(&self, name: &str) -> String {
        if self.is_scalar(name) {
            format!("Scalars['{}']", name)
        } else {
            to_pascal_case(name)
        }
    }
}

/// Normalize a GraphQL name to PascalCase.
///
/// The first letter of each underscore-separated segment is upper-cased,
/// everything else is kept as written.
pub fn to_pascal_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut capitalize_next = true;

    for c in s.chars() {
        if c == '_' {
            capitalize_next = true;
        } else if capitalize_next {
            result.push(c.to_ascii_uppercase());
            capitalize_next = false;
        } else {
            result.push(c);
        }
    }

    // A name made only of underscores keeps its spelling.
    if result.is_empty() {
        return s.to_string();
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapper() -> TypeMapper<'static> {
        TypeMapper::new(["String", "ID", "Int"])
    }

    #[test]
    fn test_non_null_scalar_is_unwrapped() {
        let ty = TypeRef::non_null(TypeRef::named("String"));
        assert_eq!(mapper().map_type(&ty, Position::Output), "Scalars['String']");
    }

    #[test]
    fn test_nullable_scalar_is_wrapped_once() {
        let ty = TypeRef::named("String");
        assert_eq!(mapper().map_type(&ty, Position::Output), "Maybe<Scalars['String']>");
        assert_eq!(
            mapper().map_type(&ty, Position::Input),
            "InputMaybe<Scalars['String']>"
        );
    }

    #[test]
    fn test_list_nesting_order() {
        let nullable_of_nullable = TypeRef::list(TypeRef::named("User"));
        assert_eq!(
            mapper().map_type(&nullable_of_nullable, Position::Output),
            "Maybe<Array<Maybe<User>>>"
        );

        let required_of_nullable = TypeRef::non_null(TypeRef::list(TypeRef::named("User")));
        assert_eq!(
            mapper().map_type(&required_of_nullable, Position::Output),
            "Array<Maybe<User>>"
        );

        let required_of_required =
            TypeRef::non_null(TypeRef::list(TypeRef::non_null(TypeRef::named("User"))));
        assert_eq!(
            mapper().map_type(&required_of_required, Position::Output),
            "Array<User>"
        );
    }

    #[test]
    fn test_nested_lists() {
        let ty = TypeRef::list(TypeRef::non_null(TypeRef::list(TypeRef::named("Int"))));
        assert_eq!(
            mapper().map_type(&ty, Position::Input),
            "InputMaybe<Array<Array<InputMaybe<Scalars['Int']>>>>"
        );
    }

    #[test]
    fn test_property_marks_optional() {
        let m = mapper();
        assert_eq!(
            m.property("id", &TypeRef::non_null(TypeRef::named("ID")), Position::Output),
            "id: Scalars['ID']"
        );
        assert_eq!(
            m.property("color", &TypeRef::named("Color"), Position::Output),
            "color?: Maybe<Color>"
        );
    }

    #[test]
    fn test_named_types_follow_naming_convention() {
        assert_eq!(mapper().map_named("user_profile"), "UserProfile");
        assert_eq!(mapper().map_named("UserProfile"), "UserProfile");
    }

    #[test]
    fn test_scalar_target() {
        assert_eq!(scalar_target("String"), "string");
        assert_eq!(scalar_target("Boolean"), "boolean");
        assert_eq!(scalar_target("Int"), "number");
        assert_eq!(scalar_target("ID"), "any");
        assert_eq!(scalar_target("DateTime"), "any");
    }

    #[test]
    fn test_to_pascal_case() {
        assert_eq!(to_pascal_case("user_name"), "UserName");
        assert_eq!(to_pascal_case("first_name"), "FirstName");
        assert_eq!(to_pascal_case("id"), "Id");
        assert_eq!(to_pascal_case("HTTPRequest"), "HTTPRequest");
        assert_eq!(to_pascal_case("__"), "__");
    }
}
