//! OpenAPI 3.0 type tree

use serde_json::{Map, Value};

use super::common::{self, path_item_for_key, response_for_code, schema_keywords};
use super::{
    boolean, computed, named, one_of, scalar, string, string_list, unchecked, NodeType,
    PropertySlot, ScalarSchema,
};
use crate::location::Key;
use crate::matcher::JsonType;

const PARAMETER_LOCATIONS: &[&str] = &["query", "header", "path", "cookie"];
const STYLES: &[&str] = &[
    "form",
    "simple",
    "label",
    "matrix",
    "spaceDelimited",
    "pipeDelimited",
    "deepObject",
];
const OPERATION_METHODS: &[&str] = &[
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

fn root() -> NodeType {
    NodeType::object("Root")
        .prop("openapi", unchecked())
        .prop("info", named("Info"))
        .prop("servers", named("ServerList"))
        .prop("security", named("SecurityRequirementList"))
        .prop("tags", named("TagList"))
        .prop("externalDocs", named("ExternalDocs"))
        .prop("paths", named("PathMap"))
        .prop("components", named("Components"))
        .required(&["openapi", "paths", "info"])
}

fn server() -> NodeType {
    NodeType::object("Server")
        .prop("url", string())
        .prop("description", string())
        .prop("variables", named("ServerVariableMap"))
        .required(&["url"])
}

fn server_variable() -> NodeType {
    NodeType::object("ServerVariable")
        .prop("enum", string_list())
        .prop("default", string())
        .prop("description", unchecked())
        .required(&["default"])
}

fn path_item() -> NodeType {
    let node = NodeType::object("PathItem")
        .prop("$ref", string())
        .prop("servers", named("ServerList"))
        .prop("parameters", named("ParameterList"))
        .prop("summary", string())
        .prop("description", string());
    OPERATION_METHODS
        .iter()
        .fold(node, |node, method| node.prop(*method, named("Operation")))
}

/// Path parameters must also declare `required`
fn parameter_required(node: &Map<String, Value>, _key: Option<&Key>) -> Vec<&'static str> {
    match node.get("in").and_then(Value::as_str) {
        Some("path") => vec!["name", "in", "required"],
        _ => vec!["name", "in"],
    }
}

fn parameter() -> NodeType {
    NodeType::object("Parameter")
        .prop("name", string())
        .prop("in", one_of(PARAMETER_LOCATIONS))
        .prop("description", string())
        .prop("required", boolean())
        .prop("deprecated", boolean())
        .prop("allowEmptyValue", boolean())
        .prop("style", one_of(STYLES))
        .prop("explode", boolean())
        .prop("allowReserved", boolean())
        .prop("schema", named("Schema"))
        .prop("example", unchecked())
        .prop("examples", named("ExamplesMap"))
        .prop("content", named("MediaTypeMap"))
        .required_by(parameter_required)
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
        .prop("parameters", named("ParameterList"))
        .prop("security", named("SecurityRequirementList"))
        .prop("servers", named("ServerList"))
        .prop("requestBody", named("RequestBody"))
        .prop("responses", named("ResponsesMap"))
        .prop("deprecated", boolean())
        .prop("callbacks", named("CallbacksMap"))
        .required(&["responses"])
}

fn request_body() -> NodeType {
    NodeType::object("RequestBody")
        .prop("description", string())
        .prop("required", boolean())
        .prop("content", named("MediaTypeMap"))
        .required(&["content"])
}

fn media_type() -> NodeType {
    NodeType::object("MediaType")
        .prop("schema", named("Schema"))
        .prop("example", unchecked())
        .prop("examples", named("ExamplesMap"))
        .prop("encoding", named("EncodingMap"))
}

fn example() -> NodeType {
    NodeType::object("Example")
        .prop("value", unchecked())
        .prop("summary", string())
        .prop("description", string())
        .prop("externalValue", string())
}

fn encoding() -> NodeType {
    NodeType::object("Encoding")
        .prop("contentType", string())
        .prop("headers", named("HeaderMap"))
        .prop("style", one_of(STYLES))
        .prop("explode", boolean())
        .prop("allowReserved", boolean())
}

fn header() -> NodeType {
    NodeType::object("Header")
        .prop("description", string())
        .prop("required", boolean())
        .prop("deprecated", boolean())
        .prop("allowEmptyValue", boolean())
        .prop("style", one_of(STYLES))
        .prop("explode", boolean())
        .prop("allowReserved", boolean())
        .prop("schema", named("Schema"))
        .prop("example", unchecked())
        .prop("examples", named("ExamplesMap"))
        .prop("content", named("MediaTypeMap"))
}

fn responses() -> NodeType {
    NodeType::object("ResponsesMap")
        .prop("default", named("Response"))
        .additional(computed(response_for_code))
}

fn response() -> NodeType {
    NodeType::object("Response")
        .prop("description", string())
        .prop("headers", named("HeaderMap"))
        .prop("content", named("MediaTypeMap"))
        .prop("links", named("LinkMap"))
        .required(&["description"])
}

fn link() -> NodeType {
    NodeType::object("Link")
        .prop("operationRef", string())
        .prop("operationId", string())
        .prop("parameters", unchecked())
        .prop("requestBody", unchecked())
        .prop("description", string())
        .prop("server", named("Server"))
}

fn schema() -> NodeType {
    schema_keywords(NodeType::object("Schema"))
        .prop("anyOf", named("SchemaList"))
        .prop("oneOf", named("SchemaList"))
        .prop("not", named("Schema"))
        .prop("discriminator", named("Discriminator"))
        .prop("nullable", boolean())
        .prop("writeOnly", boolean())
        .prop("deprecated", boolean())
}

fn discriminator() -> NodeType {
    NodeType::object("Discriminator")
        .prop("propertyName", string())
        .prop("mapping", named("DiscriminatorMapping"))
        .required(&["propertyName"])
}

fn components() -> NodeType {
    NodeType::object("Components")
        .prop("parameters", named("NamedParameters"))
        .prop("schemas", named("NamedSchemas"))
        .prop("responses", named("NamedResponses"))
        .prop("examples", named("NamedExamples"))
        .prop("requestBodies", named("NamedRequestBodies"))
        .prop("headers", named("NamedHeaders"))
        .prop("securitySchemes", named("NamedSecuritySchemes"))
        .prop("links", named("NamedLinks"))
        .prop("callbacks", named("NamedCallbacks"))
}

/// Fields each security scheme type needs
fn security_scheme_required(node: &Map<String, Value>, _key: Option<&Key>) -> Vec<&'static str> {
    match node.get("type").and_then(Value::as_str) {
        Some("apiKey") => vec!["type", "name", "in"],
        Some("http") => vec!["type", "scheme"],
        Some("oauth2") => vec!["type", "flows"],
        Some("openIdConnect") => vec!["type", "openIdConnectUrl"],
        _ => vec!["type"],
    }
}

fn security_scheme() -> NodeType {
    NodeType::object("SecurityScheme")
        .prop("type", one_of(&["apiKey", "http", "oauth2", "openIdConnect"]))
        .prop("description", string())
        .prop("name", string())
        .prop("in", one_of(&["query", "header", "cookie"]))
        .prop("scheme", string())
        .prop("bearerFormat", string())
        .prop("flows", named("SecuritySchemeFlows"))
        .prop("openIdConnectUrl", string())
        .required_by(security_scheme_required)
}

fn flows() -> NodeType {
    NodeType::object("SecuritySchemeFlows")
        .prop("implicit", named("ImplicitFlow"))
        .prop("password", named("PasswordFlow"))
        .prop("clientCredentials", named("ClientCredentials"))
        .prop("authorizationCode", named("AuthorizationCode"))
}

fn scopes() -> PropertySlot {
    scalar(ScalarSchema::of(JsonType::Object))
}

fn flow_types() -> Vec<NodeType> {
    vec![
        NodeType::object("ImplicitFlow")
            .prop("refreshUrl", string())
            .prop("scopes", scopes())
            .prop("authorizationUrl", string())
            .required(&["authorizationUrl", "scopes"]),
        NodeType::object("PasswordFlow")
            .prop("refreshUrl", string())
            .prop("tokenUrl", string())
            .prop("scopes", scopes())
            .required(&["tokenUrl", "scopes"]),
        NodeType::object("ClientCredentials")
            .prop("refreshUrl", string())
            .prop("tokenUrl", string())
            .prop("scopes", scopes())
            .required(&["tokenUrl", "scopes"]),
        NodeType::object("AuthorizationCode")
            .prop("refreshUrl", string())
            .prop("authorizationUrl", string())
            .prop("tokenUrl", string())
            .prop("scopes", scopes())
            .required(&["authorizationUrl", "tokenUrl", "scopes"]),
    ]
}

/// All OpenAPI 3.0 types; the root is `Root`
pub fn types() -> Vec<NodeType> {
    let mut types = common::types();
    types.extend([
        root(),
        server(),
        NodeType::list("ServerList", "Server"),
        server_variable(),
        NodeType::map("ServerVariableMap", "ServerVariable"),
        NodeType::object("PathMap").additional(computed(path_item_for_key)),
        path_item(),
        parameter(),
        NodeType::list("ParameterList", "Parameter"),
        operation(),
        NodeType::map("CallbacksMap", "Callback"),
        NodeType::map("Callback", "PathItem"),
        request_body(),
        NodeType::map("MediaTypeMap", "MediaType"),
        media_type(),
        example(),
        NodeType::map("ExamplesMap", "Example"),
        encoding(),
        NodeType::map("EncodingMap", "Encoding"),
        header(),
        NodeType::map("HeaderMap", "Header"),
        responses(),
        response(),
        link(),
        NodeType::map("LinkMap", "Link"),
        schema(),
        discriminator(),
        NodeType::object("DiscriminatorMapping").additional(string()),
        components(),
        NodeType::map("NamedSchemas", "Schema"),
        NodeType::map("NamedResponses", "Response"),
        NodeType::map("NamedParameters", "Parameter"),
        NodeType::map("NamedExamples", "Example"),
        NodeType::map("NamedRequestBodies", "RequestBody"),
        NodeType::map("NamedHeaders", "Header"),
        NodeType::map("NamedSecuritySchemes", "SecurityScheme"),
        NodeType::map("NamedLinks", "Link"),
        NodeType::map("NamedCallbacks", "Callback"),
        security_scheme(),
        flows(),
    ]);
    types.extend(flow_types());
    types
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_path_parameters_require_required() {
        let path = json!({ "name": "id", "in": "path" });
        let query = json!({ "name": "q", "in": "query" });
        assert!(parameter_required(path.as_object().unwrap(), None).contains(&"required"));
        assert!(!parameter_required(query.as_object().unwrap(), None).contains(&"required"));
    }

    #[test]
    fn test_security_scheme_required_by_type() {
        let api_key = json!({ "type": "apiKey" });
        assert_eq!(
            security_scheme_required(api_key.as_object().unwrap(), None),
            vec!["type", "name", "in"]
        );
        let unknown = json!({});
        assert_eq!(
            security_scheme_required(unknown.as_object().unwrap(), None),
            vec!["type"]
        );
    }

    #[test]
    fn test_path_item_declares_all_methods() {
        let item = path_item();
        for method in OPERATION_METHODS {
            assert!(item.property_names().contains(method));
        }
    }
}
