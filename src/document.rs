//! Normalized OpenAPI document model and the flattened endpoint projection.
//!
//! The document is built once by the loader and never mutated afterwards;
//! the app layer shares it behind an `Arc` and only reads it.

use std::collections::BTreeMap;
use std::sync::Arc;

/// Normalized, read-only projection of an OpenAPI document.
#[derive(Clone, Debug, Default)]
pub struct Document {
    pub title: String,
    pub version: String,
    pub description: String,
    pub servers: Vec<Server>,
    pub paths: Vec<PathItem>,
}

#[derive(Clone, Debug)]
pub struct Server {
    pub url: String,
    pub description: String,
}

/// One path template with its declared operations.
#[derive(Clone, Debug)]
pub struct PathItem {
    pub path: String,
    pub operations: Vec<Operation>,
}

/// One HTTP method bound to one path.
#[derive(Clone, Debug, Default)]
pub struct Operation {
    pub method: String,
    pub summary: String,
    pub description: String,
    pub operation_id: String,
    pub tags: Vec<String>,
    pub parameters: Vec<Parameter>,
    pub request_body: Option<RequestBody>,
    pub responses: BTreeMap<String, ResponseSpec>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamLocation {
    Path,
    Query,
    Header,
    Cookie,
}

impl ParamLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamLocation::Path => "path",
            ParamLocation::Query => "query",
            ParamLocation::Header => "header",
            ParamLocation::Cookie => "cookie",
        }
    }
}

#[derive(Clone, Debug)]
pub struct Parameter {
    pub name: String,
    pub location: ParamLocation,
    pub description: String,
    pub required: bool,
    pub schema: Option<Schema>,
}

#[derive(Clone, Debug)]
pub struct RequestBody {
    pub description: String,
    pub required: bool,
    pub content: BTreeMap<String, MediaType>,
}

#[derive(Clone, Debug, Default)]
pub struct MediaType {
    pub schema: Option<Schema>,
}

#[derive(Clone, Debug, Default)]
pub struct ResponseSpec {
    pub description: String,
    pub content: BTreeMap<String, MediaType>,
}

/// Display-only schema projection. Recursive, never used for validation.
#[derive(Clone, Debug, Default)]
pub struct Schema {
    pub schema_type: String,
    pub format: String,
    pub properties: BTreeMap<String, Schema>,
    pub required: Vec<String>,
    pub example: Option<serde_json::Value>,
}

impl Document {
    /// URL of the first declared server, empty when none are declared.
    pub fn base_url(&self) -> &str {
        self.servers.first().map(|s| s.url.as_str()).unwrap_or("")
    }
}

/// One entry of the flattened endpoint sequence, remembering where it
/// came from so lookups stay consistent with the displayed order.
#[derive(Clone, Debug)]
struct EndpointEntry {
    path_idx: usize,
    op_idx: usize,
    label: String,
}

/// Flattened, stably-ordered sequence of (path, operation) pairs.
///
/// Computed once at session start: sorted by path string first, then by
/// method string. Navigation never re-sorts it.
#[derive(Clone, Debug, Default)]
pub struct Endpoints {
    entries: Vec<EndpointEntry>,
}

impl Endpoints {
    pub fn new(doc: &Document) -> Self {
        let mut entries = Vec::new();
        for (path_idx, path) in doc.paths.iter().enumerate() {
            for (op_idx, op) in path.operations.iter().enumerate() {
                entries.push(EndpointEntry {
                    path_idx,
                    op_idx,
                    label: format!("{} {}", op.method, path.path),
                });
            }
        }

        entries.sort_by(|a, b| {
            let path_a = &doc.paths[a.path_idx].path;
            let path_b = &doc.paths[b.path_idx].path;
            path_a.cmp(path_b).then_with(|| {
                let method_a = &doc.paths[a.path_idx].operations[a.op_idx].method;
                let method_b = &doc.paths[b.path_idx].operations[b.op_idx].method;
                method_a.cmp(method_b)
            })
        });

        Endpoints { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Label of the entry at `index`, "{METHOD} {path}".
    pub fn label(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(|e| e.label.as_str())
    }

    /// Path of the entry at `index`. `None` when out of range.
    pub fn path_at<'a>(&self, doc: &'a Document, index: usize) -> Option<&'a PathItem> {
        let entry = self.entries.get(index)?;
        doc.paths.get(entry.path_idx)
    }

    /// Operation of the entry at `index`. `None` when out of range.
    pub fn operation_at<'a>(&self, doc: &'a Document, index: usize) -> Option<&'a Operation> {
        let entry = self.entries.get(index)?;
        doc.paths
            .get(entry.path_idx)?
            .operations
            .get(entry.op_idx)
    }

    /// Iterate over all labels in display order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.label.as_str())
    }
}

/// Document plus its projection, as shared with the app layer.
#[derive(Clone, Debug, Default)]
pub struct LoadedDocument {
    pub doc: Arc<Document>,
    pub endpoints: Arc<Endpoints>,
}

impl LoadedDocument {
    pub fn new(doc: Document) -> Self {
        let endpoints = Endpoints::new(&doc);
        LoadedDocument {
            doc: Arc::new(doc),
            endpoints: Arc::new(endpoints),
        }
    }
}
