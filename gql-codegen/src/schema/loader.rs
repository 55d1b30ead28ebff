//! Adapter between `graphql-parser` documents and the [`Schema`] model.
//!
//! Every schema file is parsed on its own so parse errors point at the
//! right path, then all documents are merged into one schema. Type
//! extensions are applied once every definition has been collected, so an
//! `extend type` may appear in a file before the type it extends.

use std::collections::HashMap;
use std::path::Path;

use graphql_parser::schema as ast;

use super::{
    DirectiveDefinition, EnumType, EnumValue, Field, InputObjectType, InputValue, InterfaceType,
    ObjectType, Schema, TypeDefinition, TypeKind, TypeRef, UnionType, BUILTIN_SCALARS,
    DEFAULT_DEPRECATION_REASON,
};
use crate::error::SchemaError;

/// Loads schema sources into an immutable [`Schema`].
#[derive(Debug, Default)]
pub struct SchemaLoader {
    builder: SchemaBuilder,
}

impl SchemaLoader {
    /// Create an empty loader seeded with the built-in scalars.
    pub fn new() -> Self {
        Self {
            builder: SchemaBuilder::new(),
        }
    }

    /// Read and merge a list of schema files.
    pub fn load_files<P: AsRef<Path>>(paths: &[P]) -> Result<Schema, SchemaError> {
        if paths.is_empty() {
            return Err(SchemaError::NoInputs);
        }

        let mut loader = Self::new();
        for path in paths {
            loader.add_file(path.as_ref())?;
        }
        loader.finish()
    }

    /// Parse a single in-memory schema document.
    pub fn load_str(source: &str) -> Result<Schema, SchemaError> {
        let mut loader = Self::new();
        loader.add_source(Path::new("<inline>"), source)?;
        loader.finish()
    }

    /// Read and add one schema file.
    pub fn add_file(&mut self, path: &Path) -> Result<&mut Self, SchemaError> {
        let source = std::fs::read_to_string(path).map_err(|source| SchemaError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.add_source(path, &source)
    }

    /// Parse and add one schema document. `origin` is used for errors only.
    pub fn add_source(&mut self, origin: &Path, source: &str) -> Result<&mut Self, SchemaError> {
        let document = graphql_parser::parse_schema::<String>(source)
            .map_err(|e| SchemaError::parse(origin.to_path_buf(), e.to_string()))?;

        tracing::trace!(
            origin = %origin.display(),
            definitions = document.definitions.len(),
            "Parsed schema document"
        );

        for definition in document.definitions {
            self.builder.add_definition(definition)?;
        }
        Ok(self)
    }

    /// Apply pending extensions and produce the schema.
    pub fn finish(self) -> Result<Schema, SchemaError> {
        self.builder.finish()
    }
}

/// Extension content waiting for every definition to be collected.
#[derive(Debug)]
enum Extension {
    Scalar,
    Object {
        interfaces: Vec<String>,
        fields: Vec<Field>,
    },
    Interface {
        interfaces: Vec<String>,
        fields: Vec<Field>,
    },
    Union {
        members: Vec<String>,
    },
    Enum {
        values: Vec<EnumValue>,
    },
    InputObject {
        fields: Vec<InputValue>,
    },
}

impl Extension {
    fn kind_name(&self) -> &'static str {
        match self {
            Extension::Scalar => "scalar",
            Extension::Object { .. } => "object",
            Extension::Interface { .. } => "interface",
            Extension::Union { .. } => "union",
            Extension::Enum { .. } => "enum",
            Extension::InputObject { .. } => "input object",
        }
    }
}

#[derive(Debug)]
struct SchemaBuilder {
    types: Vec<TypeDefinition>,
    index: HashMap<String, usize>,
    extensions: Vec<(String, Extension)>,
    directives: Vec<DirectiveDefinition>,
    query_type: Option<String>,
    mutation_type: Option<String>,
    subscription_type: Option<String>,
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaBuilder {
    fn new() -> Self {
        let mut builder = Self {
            types: Vec::new(),
            index: HashMap::new(),
            extensions: Vec::new(),
            directives: Vec::new(),
            query_type: None,
            mutation_type: None,
            subscription_type: None,
        };
        for name in BUILTIN_SCALARS {
            builder.push_type(TypeDefinition::builtin_scalar(name));
        }
        builder
    }

    fn push_type(&mut self, definition: TypeDefinition) {
        self.index.insert(definition.name.clone(), self.types.len());
        self.types.push(definition);
    }

    fn add_definition(&mut self, definition: ast::Definition<'_, String>) -> Result<(), SchemaError> {
        match definition {
            ast::Definition::SchemaDefinition(schema) => {
                self.query_type = schema.query.or(self.query_type.take());
                self.mutation_type = schema.mutation.or(self.mutation_type.take());
                self.subscription_type = schema.subscription.or(self.subscription_type.take());
                Ok(())
            }
            ast::Definition::TypeDefinition(definition) => {
                self.add_type(convert_type_definition(definition))
            }
            ast::Definition::TypeExtension(extension) => {
                self.extensions.push(convert_extension(extension));
                Ok(())
            }
            ast::Definition::DirectiveDefinition(directive) => {
                self.directives.push(DirectiveDefinition {
                    name: directive.name,
                    description: directive.description,
                    arguments: directive.arguments.into_iter().map(convert_input_value).collect(),
                    repeatable: directive.repeatable,
                    locations: directive
                        .locations
                        .iter()
                        .map(|location| location.as_str().to_string())
                        .collect(),
                });
                Ok(())
            }
        }
    }

    fn add_type(&mut self, definition: TypeDefinition) -> Result<(), SchemaError> {
        match self.index.get(&definition.name) {
            None => {
                self.push_type(definition);
                Ok(())
            }
            Some(&position) => {
                let existing = &mut self.types[position];
                // Redeclaring a built-in scalar only contributes its description.
                if existing.builtin && matches!(definition.kind, TypeKind::Scalar) {
                    if definition.description.is_some() {
                        existing.description = definition.description;
                    }
                    Ok(())
                } else {
                    Err(SchemaError::duplicate_type(definition.name))
                }
            }
        }
    }

    fn finish(mut self) -> Result<Schema, SchemaError> {
        for (name, extension) in std::mem::take(&mut self.extensions) {
            self.apply_extension(name, extension)?;
        }

        let query_type = self.query_type.take().or_else(|| self.default_root("Query"));
        let mutation_type = self
            .mutation_type
            .take()
            .or_else(|| self.default_root("Mutation"));
        let subscription_type = self
            .subscription_type
            .take()
            .or_else(|| self.default_root("Subscription"));

        Ok(Schema {
            types: self.types,
            directives: self.directives,
            query_type,
            mutation_type,
            subscription_type,
        })
    }

    fn default_root(&self, name: &str) -> Option<String> {
        self.index.contains_key(name).then(|| name.to_string())
    }

    fn apply_extension(&mut self, name: String, extension: Extension) -> Result<(), SchemaError> {
        let Some(&position) = self.index.get(&name) else {
            return Err(SchemaError::unknown_extension(name));
        };
        let target = &mut self.types[position];

        match (&mut target.kind, extension) {
            (TypeKind::Scalar, Extension::Scalar) => {}
            (TypeKind::Object(object), Extension::Object { interfaces, fields }) => {
                object.interfaces.extend(interfaces);
                object.fields.extend(fields);
            }
            (TypeKind::Interface(interface), Extension::Interface { interfaces, fields }) => {
                interface.interfaces.extend(interfaces);
                interface.fields.extend(fields);
            }
            (TypeKind::Union(union), Extension::Union { members }) => {
                union.members.extend(members);
            }
            (TypeKind::Enum(enumeration), Extension::Enum { values }) => {
                enumeration.values.extend(values);
            }
            (TypeKind::InputObject(input), Extension::InputObject { fields }) => {
                input.fields.extend(fields);
            }
            (kind, extension) => {
                return Err(SchemaError::ExtensionKindMismatch {
                    name,
                    expected: extension.kind_name(),
                    actual: kind.name(),
                });
            }
        }
        Ok(())
    }
}

fn convert_type_definition(definition: ast::TypeDefinition<'_, String>) -> TypeDefinition {
    let (name, description, kind) = match definition {
        ast::TypeDefinition::Scalar(scalar) => (scalar.name, scalar.description, TypeKind::Scalar),
        ast::TypeDefinition::Object(object) => (
            object.name,
            object.description,
            TypeKind::Object(ObjectType {
                interfaces: object.implements_interfaces,
                fields: object.fields.into_iter().map(convert_field).collect(),
            }),
        ),
        ast::TypeDefinition::Interface(interface) => (
            interface.name,
            interface.description,
            TypeKind::Interface(InterfaceType {
                interfaces: interface.implements_interfaces,
                fields: interface.fields.into_iter().map(convert_field).collect(),
            }),
        ),
        ast::TypeDefinition::Union(union) => (
            union.name,
            union.description,
            TypeKind::Union(UnionType {
                members: union.types,
            }),
        ),
        ast::TypeDefinition::Enum(enumeration) => (
            enumeration.name,
            enumeration.description,
            TypeKind::Enum(EnumType {
                values: enumeration.values.into_iter().map(convert_enum_value).collect(),
            }),
        ),
        ast::TypeDefinition::InputObject(input) => (
            input.name,
            input.description,
            TypeKind::InputObject(InputObjectType {
                fields: input.fields.into_iter().map(convert_input_value).collect(),
            }),
        ),
    };

    TypeDefinition {
        name,
        description,
        builtin: false,
        kind,
    }
}

fn convert_extension(extension: ast::TypeExtension<'_, String>) -> (String, Extension) {
    match extension {
        ast::TypeExtension::Scalar(scalar) => (scalar.name, Extension::Scalar),
        ast::TypeExtension::Object(object) => (
            object.name,
            Extension::Object {
                interfaces: object.implements_interfaces,
                fields: object.fields.into_iter().map(convert_field).collect(),
            },
        ),
        ast::TypeExtension::Interface(interface) => (
            interface.name,
            Extension::Interface {
                interfaces: interface.implements_interfaces,
                fields: interface.fields.into_iter().map(convert_field).collect(),
            },
        ),
        ast::TypeExtension::Union(union) => (
            union.name,
            Extension::Union {
                members: union.types,
            },
        ),
        ast::TypeExtension::Enum(enumeration) => (
            enumeration.name,
            Extension::Enum {
                values: enumeration.values.into_iter().map(convert_enum_value).collect(),
            },
        ),
        ast::TypeExtension::InputObject(input) => (
            input.name,
            Extension::InputObject {
                fields: input.fields.into_iter().map(convert_input_value).collect(),
            },
        ),
    }
}

fn convert_field(field: ast::Field<'_, String>) -> Field {
    Field {
        deprecation: deprecation(&field.directives),
        name: field.name,
        description: field.description,
        arguments: field.arguments.into_iter().map(convert_input_value).collect(),
        ty: convert_type(field.field_type),
    }
}

fn convert_input_value(value: ast::InputValue<'_, String>) -> InputValue {
    InputValue {
        name: value.name,
        description: value.description,
        ty: convert_type(value.value_type),
        default_value: value.default_value.map(|default| default.to_string()),
    }
}

fn convert_enum_value(value: ast::EnumValue<'_, String>) -> EnumValue {
    EnumValue {
        deprecation: deprecation(&value.directives),
        name: value.name,
        description: value.description,
    }
}

fn convert_type(ty: ast::Type<'_, String>) -> TypeRef {
    match ty {
        ast::Type::NamedType(name) => TypeRef::Named(name),
        ast::Type::ListType(inner) => TypeRef::list(convert_type(*inner)),
        ast::Type::NonNullType(inner) => TypeRef::non_null(convert_type(*inner)),
    }
}

fn deprecation(directives: &[ast::Directive<'_, String>]) -> Option<String> {
    let directive = directives.iter().find(|d| d.name == "deprecated")?;
    let reason = directive
        .arguments
        .iter()
        .find_map(|(name, value)| match value {
            ast::Value::String(reason) if name == "reason" => Some(reason.clone()),
            _ => None,
        });
    Some(reason.unwrap_or_else(|| DEFAULT_DEPRECATION_REASON.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_builtin_scalars_come_first() {
        let schema = SchemaLoader::load_str("type Query { hello: String }").unwrap();

        let names: Vec<_> = schema.types().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Int", "Float", "String", "Boolean", "ID", "Query"]);
        assert!(schema.types()[..5].iter().all(|t| t.builtin));
        assert!(!schema.types()[5].builtin);
        assert_eq!(schema.query_type(), Some("Query"));
        assert_eq!(schema.mutation_type(), None);
    }

    #[test]
    fn test_field_types_are_converted() {
        let schema =
            SchemaLoader::load_str("type Query { users(first: Int = 10): [User!]! }\ntype User { id: ID! }")
                .unwrap();

        let TypeKind::Object(query) = &schema.get_type("Query").unwrap().kind else {
            panic!("Query should be an object");
        };
        let field = &query.fields[0];
        assert_eq!(
            field.ty,
            TypeRef::non_null(TypeRef::list(TypeRef::non_null(TypeRef::named("User"))))
        );
        assert_eq!(field.arguments[0].name, "first");
        assert_eq!(field.arguments[0].default_value.as_deref(), Some("10"));
    }

    #[test]
    fn test_redeclared_builtin_scalar_is_merged() {
        let schema = SchemaLoader::load_str("\"text\" scalar String\nscalar DateTime").unwrap();

        let strings: Vec<_> = schema.scalars().filter(|s| s.name == "String").collect();
        assert_eq!(strings.len(), 1);
        assert!(strings[0].builtin);
        assert_eq!(strings[0].description.as_deref(), Some("text"));
        assert!(schema.get_type("DateTime").is_some_and(|t| !t.builtin));
    }

    #[test]
    fn test_duplicate_type_is_rejected() {
        let result = SchemaLoader::load_str("type A { x: Int }\ntype A { y: Int }");
        assert!(matches!(result, Err(SchemaError::DuplicateType { name }) if name == "A"));
    }

    #[test]
    fn test_extensions_apply_across_files() {
        let dir = TempDir::new().unwrap();
        let ext = dir.path().join("ext.graphql");
        let base = dir.path().join("base.graphql");
        fs::write(&ext, "extend type Query { goodbye: String }\nextend enum Color { BLUE }").unwrap();
        fs::write(&base, "type Query { hello: String }\nenum Color { RED }").unwrap();

        let schema = SchemaLoader::load_files(&[ext, base]).unwrap();

        let TypeKind::Object(query) = &schema.get_type("Query").unwrap().kind else {
            panic!("Query should be an object");
        };
        let fields: Vec<_> = query.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(fields, vec!["hello", "goodbye"]);

        let TypeKind::Enum(color) = &schema.get_type("Color").unwrap().kind else {
            panic!("Color should be an enum");
        };
        assert_eq!(color.values.len(), 2);
    }

    #[test]
    fn test_interface_extension_adds_interfaces() {
        let schema = SchemaLoader::load_str(
            "interface Node { id: ID! }\n\
             interface Named { name: String }\n\
             extend interface Named implements Node { id: ID! }",
        )
        .unwrap();

        let TypeKind::Interface(named) = &schema.get_type("Named").unwrap().kind else {
            panic!("Named should be an interface");
        };
        assert_eq!(named.interfaces, vec!["Node".to_string()]);
        let fields: Vec<_> = named.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(fields, vec!["name", "id"]);
    }

    #[test]
    fn test_extension_of_unknown_type_fails() {
        let result = SchemaLoader::load_str("extend type Missing { x: Int }");
        assert!(matches!(result, Err(SchemaError::UnknownExtension { .. })));
    }

    #[test]
    fn test_extension_kind_mismatch_fails() {
        let result = SchemaLoader::load_str("enum A { X }\nextend type A { y: Int }");
        assert!(matches!(
            result,
            Err(SchemaError::ExtensionKindMismatch { actual: "enum", expected: "object", .. })
        ));
    }

    #[test]
    fn test_schema_definition_sets_roots() {
        let schema = SchemaLoader::load_str(
            "schema { query: Root mutation: Change }\ntype Root { a: Int }\ntype Change { b: Int }\ntype Query { c: Int }",
        )
        .unwrap();

        assert_eq!(schema.query_type(), Some("Root"));
        assert_eq!(schema.mutation_type(), Some("Change"));
    }

    #[test]
    fn test_deprecation_is_captured() {
        let schema = SchemaLoader::load_str(
            "type Query { old: Int @deprecated, older: Int @deprecated(reason: \"use new\") }",
        )
        .unwrap();

        let TypeKind::Object(query) = &schema.get_type("Query").unwrap().kind else {
            panic!("Query should be an object");
        };
        assert_eq!(query.fields[0].deprecation.as_deref(), Some(DEFAULT_DEPRECATION_REASON));
        assert_eq!(query.fields[1].deprecation.as_deref(), Some("use new"));
    }

    #[test]
    fn test_parse_error_names_the_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.graphql");
        fs::write(&path, "type Query {").unwrap();

        let err = SchemaLoader::load_files(&[path.clone()]).unwrap_err();
        assert!(matches!(&err, SchemaError::Parse { path: p, .. } if p == &path));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = SchemaLoader::load_files(&[PathBuf::from("/nonexistent/schema.graphql")]).unwrap_err();
        assert!(matches!(err, SchemaError::Io { .. }));
    }

    #[test]
    fn test_no_inputs() {
        let paths: [PathBuf; 0] = [];
        assert!(matches!(SchemaLoader::load_files(&paths), Err(SchemaError::NoInputs)));
    }
}
