//! TypeScript type emitter.
//!
//! This module walks an immutable [`Schema`] and writes TypeScript type
//! declarations in a fixed order:
//!
//! 1. A banner comment carrying the generation timestamp
//! 2. The helper type prelude (`Maybe`, `InputMaybe`, `Exact`, ...)
//! 3. The `Scalars` registry
//! 4. One declaration per non-built-in definition, in schema order
//!
//! A definition that cannot be rendered is logged and skipped; the rest of
//! the schema is still emitted.

use chrono::{Local, NaiveDateTime};

use super::type_mapper::{scalar_target, to_pascal_case, Position, TypeMapper};
use crate::error::EmitError;
use crate::schema::{
    EnumType, Field, InputObjectType, InputValue, InterfaceType, ObjectType, Schema,
    TypeDefinition, TypeKind, UnionType,
};

/// Format of the banner timestamp.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Helper types every generated document starts with.
pub const PRELUDE: &str = "\
export type Maybe<T> = T | null;
export type InputMaybe<T> = Maybe<T>;
export type Exact<T extends { [key: string]: unknown }> = { [K in keyof T]: T[K] };
export type MakeOptional<T, K extends keyof T> = Omit<T, K> & { [SubKey in K]?: Maybe<T[SubKey]> };
export type MakeMaybe<T, K extends keyof T> = Omit<T, K> & { [SubKey in K]: Maybe<T[SubKey]> };
export type MakeEmpty<T extends { [key: string]: unknown }, K extends keyof T> = { [_ in K]?: never };
export type Incremental<T> = T | { [P in keyof T]?: P extends ' $fragmentName' | '__typename' ? T[P] : never };
";

/// Meta-fields never emitted on object types.
const INTROSPECTION_FIELDS: [&str; 2] = ["__type", "__schema"];

const INDENT: &str = "  ";

/// Outcome of one emission pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmitReport {
    /// Names of the scalars written to the `Scalars` registry.
    pub scalars: Vec<String>,
    /// Number of definitions written.
    pub emitted: usize,
    /// Definitions that were skipped.
    pub skipped: Vec<EmitError>,
}

/// TypeScript declaration emitter.
///
/// # Example
///
/// ```rust
/// use gql_codegen::plugin::typescript::TypeScriptEmitter;
/// use gql_codegen::schema::SchemaLoader;
///
/// let schema = SchemaLoader::load_str("type Query { hello: String }").unwrap();
/// let mut output = String::new();
/// TypeScriptEmitter::new().emit(&schema, &mut output);
///
/// assert!(output.contains("hello?: Maybe<Scalars['String']>;"));
/// ```
#[derive(Debug, Clone)]
pub struct TypeScriptEmitter {
    generated_at: NaiveDateTime,
}

impl Default for TypeScriptEmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeScriptEmitter {
    /// Create an emitter stamped with the current local time.
    pub fn new() -> Self {
        Self {
            generated_at: Local::now().naive_local(),
        }
    }

    /// Use a fixed banner timestamp.
    pub fn with_timestamp(mut self, generated_at: NaiveDateTime) -> Self {
        self.generated_at = generated_at;
        self
    }

    /// Emit the whole document for `schema`, appending to `output`.
    pub fn emit(&self, schema: &Schema, output: &mut String) -> EmitReport {
        self.emit_banner(output);
        emit_prelude(output);
        let scalars = emit_scalars(schema, output);

        let mapper = TypeMapper::new(scalars.iter().map(|s| s.name.as_str()));
        let mut report = EmitReport {
            scalars: scalars.iter().map(|s| s.name.clone()).collect(),
            ..Default::default()
        };

        for definition in schema.types().iter().filter(|t| !t.builtin) {
            match emit_definition(definition, &mapper) {
                Ok(Some(block)) => {
                    output.push_str(&block);
                    output.push('\n');
                    report.emitted += 1;
                }
                Ok(None) => {}
                Err(error) => {
                    tracing::error!(
                        kind = definition.kind_name(),
                        name = %definition.name,
                        %error,
                        "Skipping definition"
                    );
                    report.skipped.push(error);
                }
            }
        }

        tracing::debug!(
            emitted = report.emitted,
            skipped = report.skipped.len(),
            "TypeScript emission finished"
        );
        report
    }

    fn emit_banner(&self, output: &mut String) {
        output.push_str(&format!(
            "/* Generated by gql-codegen on {} */\n",
            self.generated_at.format(TIMESTAMP_FORMAT)
        ));
    }
}

fn emit_prelude(output: &mut String) {
    output.push_str(PRELUDE);
    output.push('\n');
}

/// Write the `Scalars` registry and return the scalar definitions it lists.
fn emit_scalars<'s>(schema: &'s Schema, output: &mut String) -> Vec<&'s TypeDefinition> {
    let scalars: Vec<_> = schema.scalars().collect();

    output.push_str("/** All built-in and custom scalars, mapped to their actual values */\n");
    output.push_str("export type Scalars = {\n");
    for scalar in &scalars {
        push_doc(output, INDENT, scalar.description.as_deref(), None);
        output.push_str(&format!(
            "{}{}: {};\n",
            INDENT,
            scalar.name,
            scalar_target(&scalar.name)
        ));
    }
    output.push_str("};\n\n");

    scalars
}

// =========================================================================
// Definitions
// =========================================================================

/// Render one definition into a scratch buffer.
///
/// Returns `Ok(None)` for scalars, which only live in the registry.
fn emit_definition(
    definition: &TypeDefinition,
    mapper: &TypeMapper<'_>,
) -> Result<Option<String>, EmitError> {
    let mut block = String::new();
    push_doc(&mut block, "", definition.description.as_deref(), None);

    match &definition.kind {
        TypeKind::Scalar => return Ok(None),
        TypeKind::Enum(e) => emit_enum(&definition.name, e, &mut block)?,
        TypeKind::Union(u) => emit_union(&definition.name, u, &mut block)?,
        TypeKind::Interface(i) => emit_interface(&definition.name, i, mapper, &mut block),
        TypeKind::Object(o) => emit_object(&definition.name, o, mapper, &mut block),
        TypeKind::InputObject(i) => emit_input_object(&definition.name, i, mapper, &mut block),
    }

    Ok(Some(block))
}

fn emit_enum(name: &str, e: &EnumType, out: &mut String) -> Result<(), EmitError> {
    if e.values.is_empty() {
        return Err(EmitError::EmptyEnum {
            name: name.to_string(),
        });
    }

    out.push_str(&format!("export enum {} {{\n", to_pascal_case(name)));
    let last = e.values.len() - 1;
    for (index, value) in e.values.iter().enumerate() {
        push_doc(
            out,
            INDENT,
            value.description.as_deref(),
            value.deprecation.as_deref(),
        );
        let separator = if index < last { "," } else { "" };
        out.push_str(&format!(
            "{}{} = '{}'{}\n",
            INDENT,
            value.name.to_uppercase(),
            value.name,
            separator
        ));
    }
    out.push_str("}\n");
    Ok(())
}

fn emit_union(name: &str, u: &UnionType, out: &mut String) -> Result<(), EmitError> {
    if u.members.is_empty() {
        return Err(EmitError::EmptyUnion {
            name: name.to_string(),
        });
    }

    let members: Vec<_> = u.members.iter().map(|m| to_pascal_case(m)).collect();
    out.push_str(&format!(
        "export type {} = {};\n",
        to_pascal_case(name),
        members.join(" | ")
    ));
    Ok(())
}

fn emit_interface(name: &str, i: &InterfaceType, mapper: &TypeMapper<'_>, out: &mut String) {
    let type_name = to_pascal_case(name);
    out.push_str(&format!("export type {} = {{\n", type_name));
    for field in &i.fields {
        push_field(out, field, mapper);
    }
    out.push_str("};\n");

    emit_arguments(&type_name, &i.fields, mapper, out);
}

fn emit_object(name: &str, o: &ObjectType, mapper: &TypeMapper<'_>, out: &mut String) {
    let type_name = to_pascal_case(name);
    let mut head: Vec<String> = o.interfaces.iter().map(|i| to_pascal_case(i)).collect();
    head.push("{".to_string());

    out.push_str(&format!("export type {} = {}\n", type_name, head.join(" & ")));
    out.push_str(&format!("{}__typename: '{}';\n", INDENT, type_name));

    let fields: Vec<&Field> = o
        .fields
        .iter()
        .filter(|f| !INTROSPECTION_FIELDS.contains(&f.name.as_str()))
        .collect();
    for field in &fields {
        push_field(out, field, mapper);
    }
    out.push_str("};\n");

    emit_arguments(&type_name, fields.iter().copied(), mapper, out);
}

fn emit_input_object(
    name: &str,
    i: &InputObjectType,
    mapper: &TypeMapper<'_>,
    out: &mut String,
) {
    out.push_str(&format!("export type {} = {{\n", to_pascal_case(name)));
    for field in &i.fields {
        push_input_value(out, field, mapper, Position::Input);
    }
    out.push_str("};\n");
}

/// Emit a `<Type><Field>Args` type for every field that takes arguments.
fn emit_arguments<'f>(
    type_name: &str,
    fields: impl IntoIterator<Item = &'f Field>,
    mapper: &TypeMapper<'_>,
    out: &mut String,
) {
    for field in fields {
        if field.arguments.is_empty() {
            continue;
        }

        out.push('\n');
        out.push_str(&format!(
            "export type {}{}Args = {{\n",
            type_name,
            to_pascal_case(&field.name)
        ));
        for argument in &field.arguments {
            push_input_value(out, argument, mapper, Position::Output);
        }
        out.push_str("};\n");
    }
}

// =========================================================================
// Members
// =========================================================================

fn push_field(out: &mut String, field: &Field, mapper: &TypeMapper<'_>) {
    push_doc(
        out,
        INDENT,
        field.description.as_deref(),
        field.deprecation.as_deref(),
    );
    out.push_str(&format!(
        "{}{};\n",
        INDENT,
        mapper.property(&field.name, &field.ty, Position::Output)
    ));
}

/// Arguments render in output position; only input object fields take `InputMaybe`.
fn push_input_value(
    out: &mut String,
    value: &InputValue,
    mapper: &TypeMapper<'_>,
    position: Position,
) {
    push_doc(out, INDENT, value.description.as_deref(), None);
    out.push_str(&format!(
        "{}{};\n",
        INDENT,
        mapper.property(&value.name, &value.ty, position)
    ));
}

/// Write a JSDoc comment for a description and deprecation, if any.
fn push_doc(out: &mut String, indent: &str, description: Option<&str>, deprecation: Option<&str>) {
    let mut lines: Vec<String> = description
        .map(|d| d.trim().lines().map(escape_doc).collect())
        .unwrap_or_default();
    if let Some(reason) = deprecation {
        lines.push(format!("@deprecated {}", escape_doc(reason)).trim_end().to_string());
    }

    match lines.as_slice() {
        [] => {}
        [line] => out.push_str(&format!("{}/** {} */\n", indent, line)),
        _ => {
            out.push_str(&format!("{}/**\n", indent));
            for line in &lines {
                if line.is_empty() {
                    out.push_str(&format!("{} *\n", indent));
                } else {
                    out.push_str(&format!("{} * {}\n", indent, line));
                }
            }
            out.push_str(&format!("{} */\n", indent));
        }
    }
}

/// Keep comment text from closing the comment early.
fn escape_doc(line: &str) -> String {
    line.trim_end().replace("*/", "*\\/")
}
