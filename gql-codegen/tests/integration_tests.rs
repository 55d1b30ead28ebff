//! Integration tests for gql-codegen.
//!
//! These tests load schemas from disk and run the built-in plugins through
//! the registry, the same way the CLI does.

use std::fs;
use tempfile::TempDir;

use chrono::NaiveDate;
use gql_codegen::plugin::typescript::TypeScriptEmitter;
use gql_codegen::plugin::{PluginRegistry, PluginTask};
use gql_codegen::schema::SchemaLoader;
use gql_codegen::settings::Settings;

/// Create a temporary directory with schema files.
fn create_temp_schemas(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (name, content) in files {
        fs::write(dir.path().join(name), content).unwrap();
    }
    dir
}

// =============================================================================
// Emission
// =============================================================================

#[test]
fn test_item_color_document() {
    let schema = SchemaLoader::load_str(
        "enum Color { RED, GREEN }\n\
         type Item { id: ID!, name: String, color: Color }",
    )
    .unwrap();
    let generated_at = NaiveDate::from_ymd_opt(2025, 1, 2)
        .and_then(|d| d.and_hms_opt(3, 4, 5))
        .unwrap();

    let mut output = String::new();
    let report = TypeScriptEmitter::new()
        .with_timestamp(generated_at)
        .emit(&schema, &mut output);

    let expected_tail = "\
export enum Color {
  RED = 'RED',
  GREEN = 'GREEN'
}

export type Item = {
  __typename: 'Item';
  id: Scalars['ID'];
  name?: Maybe<Scalars['String']>;
  color?: Maybe<Color>;
};

";

    assert!(output.starts_with("/* Generated by gql-codegen on 2025-01-02 03:04:05 */\n"));
    assert!(output.ends_with(expected_tail));
    assert_eq!(report.emitted, 2);
    assert!(report.skipped.is_empty());

    let banner_at = output.find("/* Generated").unwrap();
    let prelude_at = output.find("export type Maybe<T> = T | null;").unwrap();
    let scalars_at = output.find("export type Scalars = {").unwrap();
    let enum_at = output.find("export enum Color").unwrap();
    assert!(banner_at < prelude_at && prelude_at < scalars_at && scalars_at < enum_at);

    let scalars = &output[scalars_at..enum_at];
    assert!(scalars.contains("  String: string;\n"));
    assert!(scalars.contains("  ID: any;\n"));
}

#[test]
fn test_definitions_follow_file_order() {
    let dir = create_temp_schemas(&[
        ("b.graphql", "type Zebra { a: Int }\ntype Apple { b: Int }"),
        ("a.graphql", "type Mango { c: Int }"),
    ]);

    let schema = SchemaLoader::load_files(&[
        dir.path().join("b.graphql"),
        dir.path().join("a.graphql"),
    ])
    .unwrap();

    let mut output = String::new();
    TypeScriptEmitter::new().emit(&schema, &mut output);

    let zebra = output.find("export type Zebra").unwrap();
    let apple = output.find("export type Apple").unwrap();
    let mango = output.find("export type Mango").unwrap();
    assert!(zebra < apple && apple < mango);
}

#[test]
fn test_extension_fields_are_emitted() {
    let dir = create_temp_schemas(&[
        ("base.graphql", "type Query { a: Int }"),
        ("ext.graphql", "extend type Query { b: String! }"),
    ]);

    let schema = SchemaLoader::load_files(&[
        dir.path().join("base.graphql"),
        dir.path().join("ext.graphql"),
    ])
    .unwrap();

    let mut output = String::new();
    TypeScriptEmitter::new().emit(&schema, &mut output);

    assert!(output.contains(
        "export type Query = {\n  __typename: 'Query';\n  a?: Maybe<Scalars['Int']>;\n  b: Scalars['String'];\n};\n"
    ));
}

// =============================================================================
// Plugin chain
// =============================================================================

#[test]
fn test_plugins_run_in_declared_order() {
    let schema = SchemaLoader::load_str("type Query { ok: Boolean }").unwrap();
    let settings = Settings::default();
    let registry = PluginRegistry::builtin();

    let mut output = String::new();
    let mut task = PluginTask::new(&schema, &mut output, &settings);
    for name in ["introspection", "typescript"] {
        registry.get(name).unwrap().run(&mut task).unwrap();
    }

    let json_at = output.find("\"__schema\"").unwrap();
    let ts_at = output.find("/* Generated by gql-codegen").unwrap();
    assert!(json_at < ts_at);
}

#[test]
fn test_unknown_plugins_are_reported() {
    let registry = PluginRegistry::builtin();
    assert_eq!(
        registry.unknown(["typescript", "typescript-resolvers"]),
        vec!["typescript-resolvers"]
    );
}
