//! Types shared by Swagger 2.0 and OpenAPI 3.0

use serde_json::Value;

use super::{
    boolean, computed, integer, named, number, one_of, scalar, string, string_list, unchecked,
    NodeType, PropSchema, ScalarSchema,
};
use crate::matcher::JsonType;

pub fn info() -> NodeType {
    NodeType::object("Info")
        .prop("title", string())
        .prop("version", string())
        .prop("description", string())
        .prop("termsOfService", string())
        .prop("contact", named("Contact"))
        .prop("license", named("License"))
        .required(&["title", "version"])
}

pub fn contact() -> NodeType {
    NodeType::object("Contact")
        .prop("name", string())
        .prop("url", string())
        .prop("email", string())
}

pub fn license() -> NodeType {
    NodeType::object("License")
        .prop("name", string())
        .prop("url", string())
        .required(&["name"])
}

pub fn tag() -> NodeType {
    NodeType::object("Tag")
        .prop("name", string())
        .prop("description", string())
        .prop("externalDocs", named("ExternalDocs"))
        .required(&["name"])
}

pub fn external_docs() -> NodeType {
    NodeType::object("ExternalDocs")
        .prop("description", string())
        .prop("url", string())
        .required(&["url"])
}

pub fn security_requirement() -> NodeType {
    NodeType::object("SecurityRequirement").additional(string_list())
}

pub fn xml() -> NodeType {
    NodeType::object("Xml")
        .prop("name", string())
        .prop("namespace", string())
        .prop("prefix", string())
        .prop("attribute", boolean())
        .prop("wrapped", boolean())
}

/// `items` is a Schema, or a SchemaList for tuple-style arrays
pub fn schema_items(value: &Value, _name: &str) -> Option<PropSchema> {
    if value.is_array() {
        Some(PropSchema::Named("SchemaList"))
    } else {
        Some(PropSchema::Named("Schema"))
    }
}

/// `additionalProperties` is a boolean switch or a Schema
pub fn schema_additional_properties(value: &Value, _name: &str) -> Option<PropSchema> {
    if value.is_boolean() {
        Some(PropSchema::Scalar(ScalarSchema::of(JsonType::Boolean)))
    } else {
        Some(PropSchema::Named("Schema"))
    }
}

/// Only `/`-prefixed keys are paths
pub fn path_item_for_key(_value: &Value, name: &str) -> Option<PropSchema> {
    name.starts_with('/').then_some(PropSchema::Named("PathItem"))
}

/// Response keys are three-digit codes or `1XX`..`5XX` ranges; `default`
/// is declared explicitly
pub fn response_for_code(_value: &Value, name: &str) -> Option<PropSchema> {
    is_response_code(name).then_some(PropSchema::Named("Response"))
}

fn is_response_code(code: &str) -> bool {
    match code.as_bytes() {
        [b'1'..=b'5', b'X', b'X'] | [b'1'..=b'5', b'x', b'x'] => true,
        [b'1'..=b'5', tens, units] => tens.is_ascii_digit() && units.is_ascii_digit(),
        _ => false,
    }
}

/// Shared JSON-schema keywords of the Schema object
pub fn schema_keywords(node: NodeType) -> NodeType {
    node.prop("title", string())
        .prop("description", string())
        .prop("multipleOf", number())
        .prop("maximum", number())
        .prop("minimum", number())
        .prop("exclusiveMaximum", boolean())
        .prop("exclusiveMinimum", boolean())
        .prop("maxLength", integer())
        .prop("minLength", integer())
        .prop("pattern", string())
        .prop("maxItems", integer())
        .prop("minItems", integer())
        .prop("uniqueItems", boolean())
        .prop("maxProperties", integer())
        .prop("minProperties", integer())
        .prop(
            "required",
            scalar(ScalarSchema::array_of(JsonType::String).referenceable()),
        )
        .prop(
            "enum",
            scalar(ScalarSchema::of(JsonType::Array).referenceable()),
        )
        .prop(
            "type",
            one_of(&["object", "array", "string", "number", "integer", "boolean", "null"]),
        )
        .prop("items", computed(schema_items))
        .prop("allOf", named("SchemaList"))
        .prop("properties", named("SchemaProperties"))
        .prop("additionalProperties", computed(schema_additional_properties))
        .prop("format", string())
        .prop("default", unchecked())
        .prop("readOnly", boolean())
        .prop("xml", named("Xml"))
        .prop("externalDocs", named("ExternalDocs"))
        .prop("example", unchecked())
}

/// Types present unchanged in both versions
pub fn types() -> Vec<NodeType> {
    vec![
        info(),
        contact(),
        license(),
        tag(),
        NodeType::list("TagList", "Tag"),
        external_docs(),
        security_requirement(),
        NodeType::list("SecurityRequirementList", "SecurityRequirement"),
        xml(),
        NodeType::list("SchemaList", "Schema"),
        NodeType::map("SchemaProperties", "Schema"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_response_codes() {
        assert!(is_response_code("200"));
        assert!(is_response_code("4XX"));
        assert!(is_response_code("5xx"));
        assert!(!is_response_code("600"));
        assert!(!is_response_code("20"));
        assert!(!is_response_code("default"));
        assert!(!is_response_code("2X5"));
        assert!(!is_response_code("2x0"));
        assert!(!is_response_code("4Xx"));
        assert!(!is_response_code("2000"));
    }

    #[test]
    fn test_schema_items_depends_on_value() {
        assert_eq!(
            schema_items(&json!([{}]), "items"),
            Some(PropSchema::Named("SchemaList"))
        );
        assert_eq!(
            schema_items(&json!({}), "items"),
            Some(PropSchema::Named("Schema"))
        );
    }

    #[test]
    fn test_path_keys() {
        assert!(path_item_for_key(&json!({}), "/pets").is_some());
        assert!(path_item_for_key(&json!({}), "pets").is_none());
    }
}
