//! OpenAPI document loader.
//!
//! Reads a specification from a local file or a URL (JSON or YAML) and
//! normalizes it into the read-only [`Document`] model. Structural
//! problems are load errors and fatal to startup; the rest of the
//! application only ever sees an already-normalized document.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::Value;

use crate::document::{
    Document, MediaType, Operation, Parameter, ParamLocation, PathItem, RequestBody,
    ResponseSpec, Schema, Server,
};

/// Load and normalize a specification from a local file.
pub fn load_from_file(path: impl AsRef<Path>) -> Result<Document> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_document(&content)
}

/// Fetch and normalize a specification from a URL.
pub async fn load_from_url(url: &str) -> Result<Document> {
    let resp = reqwest::get(url)
        .await
        .with_context(|| format!("failed to fetch {url}"))?;
    let content = resp
        .text()
        .await
        .context("failed to read specification response")?;
    parse_document(&content)
}

/// Parse JSON or YAML content into a normalized document.
pub fn parse_document(content: &str) -> Result<Document> {
    // YAML is a superset of JSON, but try JSON first so JSON syntax
    // errors surface as JSON errors.
    let spec: Value = match serde_json::from_str(content) {
        Ok(v) => v,
        Err(_) => serde_yaml::from_str(content).context("document is neither valid JSON nor YAML")?,
    };

    if spec.get("openapi").is_none() && spec.get("swagger").is_none() {
        bail!("document has no `openapi` version field");
    }

    let info = spec
        .get("info")
        .and_then(|i| i.as_object())
        .context("document has no `info` object")?;

    let mut doc = Document {
        title: str_field(info.get("title")),
        version: str_field(info.get("version")),
        description: str_field(info.get("description")),
        ..Document::default()
    };

    if let Some(servers) = spec.get("servers").and_then(|s| s.as_array()) {
        for server in servers {
            if let Some(url) = server.get("url").and_then(|u| u.as_str()) {
                doc.servers.push(Server {
                    url: url.to_string(),
                    description: str_field(server.get("description")),
                });
            }
        }
    }

    let paths = spec
        .get("paths")
        .and_then(|p| p.as_object())
        .context("document has no `paths` object")?;

    for (path, item) in paths {
        let Some(item_obj) = item.as_object() else {
            continue;
        };

        let mut operations = Vec::new();
        for (method, operation) in item_obj {
            if !is_http_method(method) {
                continue;
            }
            operations.push(parse_operation(method, operation, item));
        }

        // Paths with no operations carry nothing to explore.
        if !operations.is_empty() {
            doc.paths.push(PathItem {
                path: path.clone(),
                operations,
            });
        }
    }

    Ok(doc)
}

fn is_http_method(s: &str) -> bool {
    matches!(
        s.to_lowercase().as_str(),
        "get" | "post" | "put" | "patch" | "delete" | "head" | "options" | "trace"
    )
}

fn str_field(value: Option<&Value>) -> String {
    value
        .and_then(|v| v.as_str())
        .map(String::from)
        .unwrap_or_default()
}

fn parse_operation(method: &str, operation: &Value, path_item: &Value) -> Operation {
    let mut op = Operation {
        method: method.to_uppercase(),
        summary: str_field(operation.get("summary")),
        description: str_field(operation.get("description")),
        operation_id: str_field(operation.get("operationId")),
        ..Operation::default()
    };

    if let Some(tags) = operation.get("tags").and_then(|t| t.as_array()) {
        op.tags = tags
            .iter()
            .filter_map(|t| t.as_str().map(String::from))
            .collect();
    }

    if let Some(params) = operation.get("parameters").and_then(|p| p.as_array()) {
        for param in params {
            if let Some(p) = parse_parameter(param) {
                op.parameters.push(p);
            }
        }
    }

    // Path-level parameters apply to every operation under the path;
    // operation-level declarations take precedence.
    if let Some(params) = path_item.get("parameters").and_then(|p| p.as_array()) {
        for param in params {
            if let Some(p) = parse_parameter(param) {
                if !op.parameters.iter().any(|existing| existing.name == p.name) {
                    op.parameters.push(p);
                }
            }
        }
    }

    if let Some(body) = operation.get("requestBody") {
        op.request_body = parse_request_body(body);
    }

    if let Some(responses) = operation.get("responses").and_then(|r| r.as_object()) {
        for (status, resp) in responses {
            op.responses.insert(
                status.clone(),
                ResponseSpec {
                    description: str_field(resp.get("description")),
                    content: parse_content(resp.get("content")),
                },
            );
        }
    }

    op
}

fn parse_parameter(param: &Value) -> Option<Parameter> {
    let name = param.get("name")?.as_str()?.to_string();
    let location = match param.get("in")?.as_str()? {
        "path" => ParamLocation::Path,
        "query" => ParamLocation::Query,
        "header" => ParamLocation::Header,
        "cookie" => ParamLocation::Cookie,
        _ => return None,
    };

    Some(Parameter {
        name,
        location,
        description: str_field(param.get("description")),
        required: param
            .get("required")
            .and_then(|r| r.as_bool())
            .unwrap_or(false),
        schema: param.get("schema").map(parse_schema),
    })
}

fn parse_request_body(body: &Value) -> Option<RequestBody> {
    let content = parse_content(body.get("content"));
    if content.is_empty() {
        return None;
    }

    Some(RequestBody {
        description: str_field(body.get("description")),
        required: body
            .get("required")
            .and_then(|r| r.as_bool())
            .unwrap_or(false),
        content,
    })
}

fn parse_content(content: Option<&Value>) -> BTreeMap<String, MediaType> {
    let mut result = BTreeMap::new();
    if let Some(obj) = content.and_then(|c| c.as_object()) {
        for (content_type, media) in obj {
            result.insert(
                content_type.clone(),
                MediaType {
                    schema: media.get("schema").map(parse_schema),
                },
            );
        }
    }
    result
}

fn parse_schema(schema: &Value) -> Schema {
    let mut s = Schema {
        schema_type: str_field(schema.get("type")),
        format: str_field(schema.get("format")),
        required: schema
            .get("required")
            .and_then(|r| r.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| v.as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default(),
        example: schema.get("example").cloned(),
        ..Schema::default()
    };

    if let Some(props) = schema.get("properties").and_then(|p| p.as_object()) {
        for (name, prop) in props {
            s.properties.insert(name.clone(), parse_schema(prop));
        }
    }

    s
}

#[cfg(test)]
mod tests {
    use super::*;

    const YAML_SPEC: &str = r#"
openapi: 3.0.0
info:
  title: Test API
  version: 1.0.0
servers:
  - url: https://api.example.com
    description: Production
paths:
  /users:
    get:
      summary: Get all users
      parameters:
        - name: limit
          in: query
          description: Limit results
          schema:
            type: integer
      responses:
        '200':
          description: OK
    post:
      summary: Create user
      requestBody:
        required: true
        content:
          application/json:
            schema:
              type: object
      responses:
        '201':
          description: Created
  /users/{id}:
    parameters:
      - name: id
        in: path
        required: true
        schema:
          type: string
    get:
      summary: Get user by ID
      responses:
        '200':
          description: OK
  /empty: {}
"#;

    #[test]
    fn parses_yaml_spec() {
        let doc = parse_document(YAML_SPEC).unwrap();

        assert_eq!(doc.title, "Test API");
        assert_eq!(doc.version, "1.0.0");
        assert_eq!(doc.base_url(), "https://api.example.com");
        // /empty declares no operations and is dropped.
        assert_eq!(doc.paths.len(), 2);
    }

    #[test]
    fn parses_json_spec() {
        let json = r#"{
            "openapi": "3.0.0",
            "info": {"title": "JSON API", "version": "2.0"},
            "paths": {
                "/health": {
                    "get": {"summary": "Health check", "responses": {"200": {"description": "OK"}}}
                }
            }
        }"#;

        let doc = parse_document(json).unwrap();
        assert_eq!(doc.title, "JSON API");
        assert_eq!(doc.paths.len(), 1);
        assert_eq!(doc.paths[0].operations[0].method, "GET");
    }

    #[test]
    fn path_level_parameters_inherited() {
        let doc = parse_document(YAML_SPEC).unwrap();
        let users_by_id = doc
            .paths
            .iter()
            .find(|p| p.path == "/users/{id}")
            .unwrap();
        let get = &users_by_id.operations[0];

        assert_eq!(get.parameters.len(), 1);
        assert_eq!(get.parameters[0].name, "id");
        assert_eq!(get.parameters[0].location, ParamLocation::Path);
        assert!(get.parameters[0].required);
    }

    #[test]
    fn required_body_detected() {
        let doc = parse_document(YAML_SPEC).unwrap();
        let users = doc.paths.iter().find(|p| p.path == "/users").unwrap();
        let post = users.operations.iter().find(|o| o.method == "POST").unwrap();

        let body = post.request_body.as_ref().unwrap();
        assert!(body.required);
        assert!(body.content.contains_key("application/json"));
    }

    #[test]
    fn rejects_document_without_openapi_field() {
        let err = parse_document(r#"{"info": {"title": "x"}, "paths": {}}"#).unwrap_err();
        assert!(err.to_string().contains("openapi"));
    }

    #[test]
    fn rejects_document_without_paths() {
        let err =
            parse_document(r#"{"openapi": "3.0.0", "info": {"title": "x"}}"#).unwrap_err();
        assert!(err.to_string().contains("paths"));
    }

    #[test]
    fn rejects_garbage_input() {
        assert!(parse_document("{not json, not yaml").is_err());
    }

    #[test]
    fn load_from_file_reads_spec() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("openapi.yaml");
        std::fs::write(&path, YAML_SPEC).unwrap();

        let doc = load_from_file(&path).unwrap();
        assert_eq!(doc.title, "Test API");
    }

    #[test]
    fn load_from_missing_file_errors() {
        assert!(load_from_file("/nonexistent/openapi.yaml").is_err());
    }
}
