//! Swagger 2.0 type tree

use serde_json::{Map, Value};

use super::common::{self, path_item_for_key, response_for_code, schema_keywords};
use super::{
    boolean, computed, integer, named, number, one_of, scalar, string, string_list, unchecked,
    NodeType, ScalarSchema,
};
use crate::location::Key;
use crate::matcher::JsonType;

const PARAMETER_LOCATIONS: &[&str] = &["query", "header", "path", "formData", "body"];
const PRIMITIVE_TYPES: &[&str] = &["string", "number", "integer", "boolean", "array"];
const COLLECTION_FORMATS: &[&str] = &["csv", "ssv", "tsv", "pipes", "multi"];
const OPERATION_METHODS: &[&str] = &["get", "put", "post", "delete", "options", "head", "patch"];

fn root() -> NodeType {
    NodeType::object("Root")
        .prop("swagger", unchecked())
        .prop("info", named("Info"))
        .prop("host", string())
        .prop("basePath", string())
        .prop("schemes", string_list())
        .prop("consumes", string_list())
        .prop("produces", string_list())
        .prop("paths", named("PathMap"))
        .prop("definitions", named("NamedSchemas"))
        .prop("parameters", named("NamedParameters"))
        .prop("responses", named("NamedResponses"))
        .prop("securityDefinitions", named("NamedSecuritySchemes"))
        .prop("security", named("SecurityRequirementList"))
        .prop("tags", named("TagList"))
        .prop("externalDocs", named("ExternalDocs"))
        .required(&["swagger", "paths", "info"])
}

fn path_item() -> NodeType {
    let node = NodeType::object("PathItem")
        .prop("$ref", string())
        .prop("parameters", named("ParameterList"));
    OPERATION_METHODS
        .iter()
        .fold(node, |node, method| node.prop(*method, named("Operation")))
}

fn operation() -> NodeType {
    NodeType::object("Operation")
        .prop(
            "tags",
            scalar(ScalarSchema::array_of(JsonType::String).referenceable()),
        )
        .prop("summary", string())
        .prop("description", string())
        .prop("externalDocs", named("ExternalDocs"))
        .prop("operationId", string())
        .prop("consumes", string_list())
        .prop("produces", string_list())
        .prop("parameters", named("ParameterList"))
        .prop("responses", named("ResponsesMap"))
        .prop("schemes", string_list())
        .prop("deprecated", boolean())
        .prop("security", named("SecurityRequirementList"))
        .required(&["responses"])
}

/// Validation keywords shared by non-body parameters, headers and items
fn primitive_keywords(node: NodeType) -> NodeType {
    node.prop("format", string())
        .prop("items", named("ParameterItems"))
        .prop("collectionFormat", one_of(COLLECTION_FORMATS))
        .prop("default", unchecked())
        .prop("maximum", number())
        .prop("exclusiveMaximum", boolean())
        .prop("minimum", number())
        .prop("exclusiveMinimum", boolean())
        .prop("maxLength", integer())
        .prop("minLength", integer())
        .prop("pattern", string())
        .prop("maxItems", integer())
        .prop("minItems", integer())
        .prop("uniqueItems", boolean())
        .prop("enum", scalar(ScalarSchema::of(JsonType::Array)))
        .prop("multipleOf", number())
}

/// Body parameters carry a schema; the rest carry a primitive type, and
/// path parameters must be marked required
fn parameter_required(node: &Map<String, Value>, _key: Option<&Key>) -> Vec<&'static str> {
    match node.get("in").and_then(Value::as_str) {
        Some("body") => vec!["name", "in", "schema"],
        Some("path") => with_items(node, vec!["name", "in", "type", "required"]),
        _ => with_items(node, vec!["name", "in", "type"]),
    }
}

fn with_items(node: &Map<String, Value>, mut required: Vec<&'static str>) -> Vec<&'static str> {
    if node.get("type").and_then(Value::as_str) == Some("array") {
        required.push("items");
    }
    required
}

fn parameter() -> NodeType {
    let node = NodeType::object("Parameter")
        .prop("name", string())
        .prop("in", one_of(PARAMETER_LOCATIONS))
        .prop("description", string())
        .prop("required", boolean())
        .prop("schema", named("Schema"))
        .prop("type", one_of(&["string", "number", "integer", "boolean", "array", "file"]))
        .prop("allowEmptyValue", boolean());
    primitive_keywords(node).required_by(parameter_required)
}

fn items_required(node: &Map<String, Value>, _key: Option<&Key>) -> Vec<&'static str> {
    with_items(node, vec!["type"])
}

fn parameter_items() -> NodeType {
    let node = NodeType::object("ParameterItems").prop("type", one_of(PRIMITIVE_TYPES));
    primitive_keywords(node).required_by(items_required)
}

fn header() -> NodeType {
    let node = NodeType::object("Header")
        .prop("description", string())
        .prop("type", one_of(PRIMITIVE_TYPES));
    primitive_keywords(node).required_by(items_required)
}

fn responses() -> NodeType {
    NodeType::object("ResponsesMap")
        .prop("default", named("Response"))
        .additional(computed(response_for_code))
}

fn response() -> NodeType {
    NodeType::object("Response")
        .prop("description", string())
        .prop("schema", named("Schema"))
        .prop("headers", named("HeaderMap"))
        .prop("examples", named("Examples"))
        .required(&["description"])
}

fn schema() -> NodeType {
    schema_keywords(NodeType::object("Schema")).prop("discriminator", string())
}

fn security_scheme_required(node: &Map<String, Value>, _key: Option<&Key>) -> Vec<&'static str> {
    match node.get("type").and_then(Value::as_str) {
        Some("apiKey") => vec!["type", "name", "in"],
        Some("oauth2") => match node.get("flow").and_then(Value::as_str) {
            Some("implicit") => vec!["type", "flow", "authorizationUrl", "scopes"],
            Some("accessCode") => vec!["type", "flow", "authorizationUrl", "tokenUrl", "scopes"],
            Some("password") | Some("application") => vec!["type", "flow", "tokenUrl", "scopes"],
            _ => vec!["type", "flow", "scopes"],
        },
        _ => vec!["type"],
    }
}

fn security_scheme() -> NodeType {
    NodeType::object("SecurityScheme")
        .prop("type", one_of(&["basic", "apiKey", "oauth2"]))
        .prop("description", string())
        .prop("name", string())
        .prop("in", one_of(&["query", "header"]))
        .prop("flow", one_of(&["implicit", "password", "application", "accessCode"]))
        .prop("authorizationUrl", string())
        .prop("tokenUrl", string())
        .prop("scopes", scalar(ScalarSchema::of(JsonType::Object)))
        .required_by(security_scheme_required)
}

/// All Swagger 2.0 types; the root is `Root`
pub fn types() -> Vec<NodeType> {
    let mut types = common::types();
    types.extend([
        root(),
        NodeType::object("PathMap").additional(computed(path_item_for_key)),
        path_item(),
        operation(),
        parameter(),
        NodeType::list("ParameterList", "Parameter"),
        parameter_items(),
        header(),
        NodeType::map("HeaderMap", "Header"),
        responses(),
        response(),
        NodeType::object("Examples").additional(unchecked()),
        schema(),
        NodeType::map("NamedSchemas", "Schema"),
        NodeType::map("NamedParameters", "Parameter"),
        NodeType::map("NamedResponses", "Response"),
        NodeType::map("NamedSecuritySchemes", "SecurityScheme"),
        security_scheme(),
    ]);
    types
}
