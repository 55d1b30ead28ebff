//! The `introspection` plugin: the schema as an introspection-result JSON.

use std::collections::HashMap;

use serde_json::{json, Value};

use super::{Plugin, PluginTask};
use crate::error::PluginError;
use crate::schema::{
    DirectiveDefinition, EnumValue, Field, InputValue, Schema, TypeDefinition, TypeKind, TypeRef,
};

/// Emits `{"__schema": ...}` for the whole schema.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntrospectionPlugin;

impl IntrospectionPlugin {
    pub fn new() -> Self {
        Self
    }
}

impl Plugin for IntrospectionPlugin {
    fn name(&self) -> &'static str {
        "introspection"
    }

    fn run(&self, task: &mut PluginTask<'_>) -> Result<(), PluginError> {
        let document = introspect(task.schema);
        let rendered =
            serde_json::to_string_pretty(&document).map_err(|source| PluginError::Serialize {
                plugin: "introspection",
                source,
            })?;

        task.output.push_str(&rendered);
        task.output.push('\n');
        Ok(())
    }
}

/// Build the introspection result for a schema.
pub fn introspect(schema: &Schema) -> Value {
    let kinds: HashMap<&str, &'static str> = schema
        .types()
        .iter()
        .map(|t| (t.name.as_str(), introspection_kind(&t.kind)))
        .collect();
    let ctx = Context { schema, kinds };

    json!({
        "__schema": {
            "queryType": root(schema.query_type()),
            "mutationType": root(schema.mutation_type()),
            "subscriptionType": root(schema.subscription_type()),
            "types": schema.types().iter().map(|t| ctx.full_type(t)).collect::<Vec<_>>(),
            "directives": schema.directives().iter().map(|d| ctx.directive(d)).collect::<Vec<_>>(),
        }
    })
}

fn root(name: Option<&str>) -> Value {
    match name {
        Some(name) => json!({ "name": name }),
        None => Value::Null,
    }
}

fn introspection_kind(kind: &TypeKind) -> &'static str {
    match kind {
        TypeKind::Scalar => "SCALAR",
        TypeKind::Object(_) => "OBJECT",
        TypeKind::Interface(_) => "INTERFACE",
        TypeKind::Union(_) => "UNION",
        TypeKind::Enum(_) => "ENUM",
        TypeKind::InputObject(_) => "INPUT_OBJECT",
    }
}

struct Context<'a> {
    schema: &'a Schema,
    kinds: HashMap<&'a str, &'static str>,
}

impl Context<'_> {
    fn full_type(&self, definition: &TypeDefinition) -> Value {
        let mut fields = Value::Null;
        let mut input_fields = Value::Null;
        let mut interfaces = Value::Null;
        let mut enum_values = Value::Null;
        let mut possible_types = Value::Null;

        match &definition.kind {
            TypeKind::Scalar => {}
            TypeKind::Object(object) => {
                fields = self.fields(&object.fields);
                interfaces = self.named_refs(&object.interfaces);
            }
            TypeKind::Interface(interface) => {
                fields = self.fields(&interface.fields);
                interfaces = self.named_refs(&interface.interfaces);
                let implementations: Vec<String> = self
                    .schema
                    .implementations_of(&definition.name)
                    .map(str::to_string)
                    .collect();
                possible_types = self.named_refs(&implementations);
            }
            TypeKind::Union(union) => {
                possible_types = self.named_refs(&union.members);
            }
            TypeKind::Enum(e) => {
                enum_values = Value::Array(e.values.iter().map(enum_value).collect());
            }
            TypeKind::InputObject(input) => {
                input_fields = self.input_values(&input.fields);
            }
        }

        json!({
            "kind": introspection_kind(&definition.kind),
            "name": definition.name,
            "description": definition.description,
            "fields": fields,
            "inputFields": input_fields,
            "interfaces": interfaces,
            "enumValues": enum_values,
            "possibleTypes": possible_types,
        })
    }

    fn fields(&self, fields: &[Field]) -> Value {
        fields
            .iter()
            .map(|field| {
                json!({
                    "name": field.name,
                    "description": field.description,
                    "args": self.input_values(&field.arguments),
                    "type": self.type_ref(&field.ty),
                    "isDeprecated": field.deprecation.is_some(),
                    "deprecationReason": field.deprecation,
                })
            })
            .collect()
    }

    fn input_values(&self, values: &[InputValue]) -> Value {
        values
            .iter()
            .map(|value| {
                json!({
                    "name": value.name,
                    "description": value.description,
                    "type": self.type_ref(&value.ty),
                    "defaultValue": value.default_value,
                })
            })
            .collect()
    }

    fn directive(&self, directive: &DirectiveDefinition) -> Value {
        json!({
            "name": directive.name,
            "description": directive.description,
            "isRepeatable": directive.repeatable,
            "locations": directive.locations,
            "args": self.input_values(&directive.arguments),
        })
    }

    fn named_refs(&self, names: &[String]) -> Value {
        names
            .iter()
            .map(|name| self.type_ref(&TypeRef::named(name.as_str())))
            .collect()
    }

    fn type_ref(&self, ty: &TypeRef) -> Value {
        match ty {
            TypeRef::Named(name) => json!({
                "kind": self.kinds.get(name.as_str()),
                "name": name,
                "ofType": null,
            }),
            TypeRef::List(inner) => json!({
                "kind": "LIST",
                "name": null,
                "ofType": self.type_ref(inner),
            }),
            TypeRef::NonNull(inner) => json!({
                "kind": "NON_NULL",
                "name": null,
                "ofType": self.type_ref(inner),
            }),
        }
    }
}

fn enum_value(value: &EnumValue) -> Value {
    json!({
        "name": value.name,
        "description": value.description,
        "isDeprecated": value.deprecation.is_some(),
        "deprecationReason": value.deprecation,
    })
}
