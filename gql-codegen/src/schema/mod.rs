//! Immutable GraphQL schema model.
//!
//! A [`Schema`] is produced once per distinct schema set by the
//! [`loader`] and then shared read-only by every generation task that
//! targets it. Types keep their collection order: built-in scalars first,
//! then user definitions in file and declaration order.

pub mod loader;

pub use loader::SchemaLoader;

/// Built-in scalars every schema carries, in registration order.
pub const BUILTIN_SCALARS: [&str; 5] = ["Int", "Float", "String", "Boolean", "ID"];

/// Default reason attached to `@deprecated` without an explicit reason.
pub const DEFAULT_DEPRECATION_REASON: &str = "No longer supported";

/// A parsed, immutable GraphQL schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    pub(crate) types: Vec<TypeDefinition>,
    pub(crate) directives: Vec<DirectiveDefinition>,
    pub(crate) query_type: Option<String>,
    pub(crate) mutation_type: Option<String>,
    pub(crate) subscription_type: Option<String>,
}

impl Schema {
    /// All type definitions in collection order.
    pub fn types(&self) -> &[TypeDefinition] {
        &self.types
    }

    /// Look up a type definition by name.
    pub fn get_type(&self, name: &str) -> Option<&TypeDefinition> {
        self.types.iter().find(|t| t.name == name)
    }

    /// Scalar definitions, built-in and custom, in collection order.
    pub fn scalars(&self) -> impl Iterator<Item = &TypeDefinition> {
        self.types
            .iter()
            .filter(|t| matches!(t.kind, TypeKind::Scalar))
    }

    /// Directive definitions declared by the schema documents.
    pub fn directives(&self) -> &[DirectiveDefinition] {
        &self.directives
    }

    /// Name of the query root type, if any.
    pub fn query_type(&self) -> Option<&str> {
        self.query_type.as_deref()
    }

    /// Name of the mutation root type, if any.
    pub fn mutation_type(&self) -> Option<&str> {
        self.mutation_type.as_deref()
    }

    /// Name of the subscription root type, if any.
    pub fn subscription_type(&self) -> Option<&str> {
        self.subscription_type.as_deref()
    }

    /// Implementations of an interface, in collection order.
    pub fn implementations_of<'a>(&'a self, interface: &'a str) -> impl Iterator<Item = &'a str> {
        self.types.iter().filter_map(move |t| match &t.kind {
            TypeKind::Object(object)
                if object.interfaces.iter().any(|i| i == interface) =>
            {
                Some(t.name.as_str())
            }
            _ => None,
        })
    }
}

/// A named type definition.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDefinition {
    /// Type name as declared.
    pub name: String,
    /// Description text, if any.
    pub description: Option<String>,
    /// Whether the definition comes from the built-in prelude.
    pub builtin: bool,
    /// Kind-specific content.
    pub kind: TypeKind,
}

impl TypeDefinition {
    /// Create a built-in scalar definition.
    pub fn builtin_scalar(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: None,
            builtin: true,
            kind: TypeKind::Scalar,
        }
    }

    /// Short lowercase name of the definition kind.
    pub fn kind_name(&self) -> &'static str {
        self.kind.name()
    }
}

/// The kinds of named GraphQL types.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    Scalar,
    Object(ObjectType),
    Interface(InterfaceType),
    Union(UnionType),
    Enum(EnumType),
    InputObject(InputObjectType),
}

impl TypeKind {
    /// Short lowercase name of the kind.
    pub fn name(&self) -> &'static str {
        match self {
            TypeKind::Scalar => "scalar",
            TypeKind::Object(_) => "object",
            TypeKind::Interface(_) => "interface",
            TypeKind::Union(_) => "union",
            TypeKind::Enum(_) => "enum",
            TypeKind::InputObject(_) => "input object",
        }
    }
}

/// An object type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectType {
    /// Names of implemented interfaces.
    pub interfaces: Vec<String>,
    pub fields: Vec<Field>,
}

/// An interface type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InterfaceType {
    /// Names of implemented interfaces.
    pub interfaces: Vec<String>,
    pub fields: Vec<Field>,
}

/// A union type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnionType {
    pub members: Vec<String>,
}

/// An enum type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnumType {
    pub values: Vec<EnumValue>,
}

/// An input object type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputObjectType {
    pub fields: Vec<InputValue>,
}

/// An output field on an object or interface.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub description: Option<String>,
    pub arguments: Vec<InputValue>,
    pub ty: TypeRef,
    /// Deprecation reason when the field is `@deprecated`.
    pub deprecation: Option<String>,
}

/// An argument or input object field.
#[derive(Debug, Clone, PartialEq)]
pub struct InputValue {
    pub name: String,
    pub description: Option<String>,
    pub ty: TypeRef,
    /// Default value rendered as GraphQL source.
    pub default_value: Option<String>,
}

/// A single enum value.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumValue {
    pub name: String,
    pub description: Option<String>,
    pub deprecation: Option<String>,
}

/// A directive definition.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectiveDefinition {
    pub name: String,
    pub description: Option<String>,
    pub arguments: Vec<InputValue>,
    pub repeatable: bool,
    /// Locations in GraphQL spelling, e.g. `FIELD_DEFINITION`.
    pub locations: Vec<String>,
}

/// A reference to a type in a field, argument or list position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    Named(String),
    List(Box<TypeRef>),
    NonNull(Box<TypeRef>),
}

impl TypeRef {
    /// Create a named type reference.
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// Wrap in a list.
    pub fn list(inner: TypeRef) -> Self {
        Self::List(Box::new(inner))
    }

    /// Wrap in non-null.
    pub fn non_null(inner: TypeRef) -> Self {
        Self::NonNull(Box::new(inner))
    }

    /// Whether the outermost position is non-null.
    pub fn is_non_null(&self) -> bool {
        matches!(self, TypeRef::NonNull(_))
    }

    /// Whether the type is a list once non-null is unwrapped.
    pub fn is_list(&self) -> bool {
        match self {
            TypeRef::NonNull(inner) => inner.is_list(),
            TypeRef::List(_) => true,
            TypeRef::Named(_) => false,
        }
    }

    /// The innermost named type.
    pub fn name(&self) -> &str {
        match self {
            TypeRef::Named(name) => name,
            TypeRef::List(inner) | TypeRef::NonNull(inner) => inner.name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_ref_flags() {
        let ty = TypeRef::non_null(TypeRef::list(TypeRef::named("User")));
        assert!(ty.is_non_null());
        assert!(ty.is_list());
        assert_eq!(ty.name(), "User");

        let plain = TypeRef::named("String");
        assert!(!plain.is_non_null());
        assert!(!plain.is_list());
    }

    #[test]
    fn test_implementations_of() {
        let schema = Schema {
            types: vec![
                TypeDefinition {
                    name: "Node".to_string(),
                    description: None,
                    builtin: false,
                    kind: TypeKind::Interface(InterfaceType::default()),
                },
                TypeDefinition {
                    name: "User".to_string(),
                    description: None,
                    builtin: false,
                    kind: TypeKind::Object(ObjectType {
                        interfaces: vec!["Node".to_string()],
                        fields: Vec::new(),
                    }),
                },
                TypeDefinition {
                    name: "Post".to_string(),
                    description: None,
                    builtin: false,
                    kind: TypeKind::Object(ObjectType::default()),
                },
            ],
            ..Default::default()
        };

        let implementations: Vec<_> = schema.implementations_of("Node").collect();
        assert_eq!(implementations, vec!["User"]);
    }
}
