#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::fs;
use std::path::PathBuf;

use sdkgen_core::{GeneratorConfig, NoopFormatter, SdkgenError, generate_graphql_sdk};

const BLOG_SCHEMA: &str = r#"
scalar Time
scalar Json

"A blog post."
type Post {
  id: ID!
  title: String
  tags: [String!]!
  publishedAt: Time
  parent: Post
  status: Status!
  meta: Json
}

type User {
  id: ID!
  email: String
}

union SearchResult = Post | User

type Page {
  results: [SearchResult!]!
}

enum Status {
  DRAFT
  PUBLISHED
}

input PostInput {
  title: String!
  tags: [String!]
}

type Query {
  post(id: ID!): Post
  search(term: String!): [SearchResult!]!
}
"#;

const MUTATIONS: &str = r#"
type Mutation {
  createPost(input: PostInput!): Post!
}
"#;

fn write_schemas(dir: &std::path::Path) -> Vec<PathBuf> {
    let schema = dir.join("schema.graphql");
    let mutations = dir.join("mutations.graphql");
    fs::write(&schema, BLOG_SCHEMA).unwrap();
    fs::write(&mutations, MUTATIONS).unwrap();
    vec![schema, mutations]
}

#[test]
fn test_generates_graphql_client() {
    let dir = tempfile::tempdir().unwrap();
    let schemas = write_schemas(dir.path());
    let out_dir = dir.path().join("out");

    let generated = generate_graphql_sdk(
        &schemas,
        &out_dir,
        &GeneratorConfig::default(),
        &NoopFormatter,
    )
    .unwrap();

    assert_eq!(generated.path, out_dir.join("client.go"));
    assert!(generated.report.is_clean());

    let source = fs::read_to_string(&generated.path).unwrap();
    assert!(source.starts_with("// Code generated by sdkgen. DO NOT EDIT."));
    assert!(source.contains("package client"));
    assert!(source.contains("\"time\""));
    assert!(source.contains("type Post struct {"));
    assert!(source.contains("PublishedAt time.Time `json:\"publishedAt,omitempty\"`"));
    assert!(source.contains("Tags []string `json:\"tags\"`"));
    assert!(source.contains("Parent *Post `json:\"parent,omitempty\"`"));
    assert!(source.contains("Meta interface{} `json:\"meta,omitempty\"`"));
    assert!(source.contains("// Post: A blog post."));
    assert!(source.contains("StatusDRAFT Status = \"DRAFT\""));
    assert!(source.contains("StatusDRAFT, StatusPUBLISHED,"));
    assert!(source.contains("type SearchResultInstance struct {"));
    assert!(source.contains("Results []SearchResultInstance `json:\"results\"`"));
    assert!(source.contains("type PostInput struct {"));
    assert!(source.contains(
        "func (c *Client) Post(ctx context.Context, id string) (*Post, error) {"
    ));
    assert!(source.contains(
        "const postQuery = `query Post($id: ID!) { post(id: $id) { id title tags publishedAt status meta } }`"
    ));
    assert!(source.contains("c.config.MutationURL, createPostMutation"));
    assert!(!source.contains("type Query struct"));
}

#[test]
fn test_custom_package_and_file_name() {
    let dir = tempfile::tempdir().unwrap();
    let schemas = write_schemas(dir.path());
    let config = GeneratorConfig {
        package: "blog".into(),
        file_name: "blog.go".into(),
        ..GeneratorConfig::default()
    };

    let generated = generate_graphql_sdk(&schemas, dir.path(), &config, &NoopFormatter).unwrap();
    assert_eq!(generated.path, dir.path().join("blog.go"));
    let source = fs::read_to_string(&generated.path).unwrap();
    assert!(source.contains("package blog"));
}

#[test]
fn test_unresolved_type_is_lenient_unless_strict() {
    let dir = tempfile::tempdir().unwrap();
    let schema = dir.path().join("schema.graphql");
    fs::write(&schema, "type Post { author: Author }\ntype Query { post: Post }").unwrap();
    let schemas = vec![schema];

    let lenient = generate_graphql_sdk(
        &schemas,
        &dir.path().join("lenient"),
        &GeneratorConfig::default(),
        &NoopFormatter,
    )
    .unwrap();
    assert_eq!(
        lenient.report.unresolved_pointers(),
        vec!["#/types/Author".to_string()]
    );
    let source = fs::read_to_string(&lenient.path).unwrap();
    assert!(source.contains("Author interface{}"));

    let strict_dir = dir.path().join("strict");
    let strict = GeneratorConfig {
        strict_refs: true,
        ..GeneratorConfig::default()
    };
    let err = generate_graphql_sdk(&schemas, &strict_dir, &strict, &NoopFormatter).unwrap_err();
    assert!(matches!(err, SdkgenError::UnresolvedReferences { .. }));
    assert!(!strict_dir.exists());
}

#[test]
fn test_load_errors_are_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let missing = vec![dir.path().join("missing.graphql")];
    let err = generate_graphql_sdk(
        &missing,
        dir.path(),
        &GeneratorConfig::default(),
        &NoopFormatter,
    )
    .unwrap_err();
    assert!(matches!(err, SdkgenError::Read { .. }));

    let broken = dir.path().join("broken.graphql");
    fs::write(&broken, "type Post {").unwrap();
    let err = generate_graphql_sdk(
        &[broken],
        dir.path(),
        &GeneratorConfig::default(),
        &NoopFormatter,
    )
    .unwrap_err();
    assert!(matches!(err, SdkgenError::GraphqlParse { .. }));
    assert!(!dir.path().join("client.go").exists());
}

#[test]
fn test_same_field_on_two_roots_renders_distinct_methods() {
    let dir = tempfile::tempdir().unwrap();
    let schema = dir.path().join("schema.graphql");
    fs::write(
        &schema,
        "type Post { id: ID! }\ntype Query { post: Post }\ntype Mutation { post: Post }\n",
    )
    .unwrap();

    let generated = generate_graphql_sdk(
        &[schema],
        dir.path(),
        &GeneratorConfig::default(),
        &NoopFormatter,
    )
    .unwrap();
    let source = fs::read_to_string(&generated.path).unwrap();
    assert_eq!(source.matches("func (c *Client) Post(").count(), 1);
    assert_eq!(source.matches("func (c *Client) PostMutation(").count(), 1);
    assert!(source.contains("const postMutation = `mutation PostMutation { post { id } }`"));
    assert!(source.contains("c.config.MutationURL, postMutation"));
}
