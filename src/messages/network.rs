//! Network messages - communication between App and Network layers.

/// Commands sent from the app layer to the network actor.
#[derive(Debug, Clone)]
pub enum NetworkCommand {
    /// Execute one HTTP request built from the request builder.
    Execute {
        id: u64,
        method: String,
        /// First declared server URL; empty when the document declares
        /// no servers.
        base_url: String,
        /// Path template, possibly containing `{name}` placeholders.
        path: String,
        /// Field values in declared parameter order. Values matching a
        /// path placeholder are substituted; the rest become query
        /// parameters, empty ones dropped.
        params: Vec<(String, String)>,
        /// Raw request payload; `None` when the operation has no body
        /// field. When present it is sent with a JSON content type.
        body: Option<String>,
    },
    /// Shut down the network actor.
    Shutdown,
}

/// Completed response payload. Populated in full or not at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseData {
    pub status: u16,
    pub status_text: String,
    /// Header name to values, in response order. Multi-value headers
    /// keep every value.
    pub headers: Vec<(String, Vec<String>)>,
    pub body: String,
}

impl ResponseData {
    /// Declared content type of the body, empty when absent.
    pub fn content_type(&self) -> String {
        self.headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case("content-type"))
            .and_then(|(_, values)| values.first())
            .cloned()
            .unwrap_or_default()
    }
}

/// Completion events posted by the network actor. Exactly one per
/// dispatched command: either a response or an error, never both.
#[derive(Debug, Clone)]
pub enum NetworkEvent {
    Completed {
        id: u64,
        result: Result<ResponseData, String>,
    },
}

impl NetworkEvent {
    pub fn id(&self) -> u64 {
        match self {
            NetworkEvent::Completed { id, .. } => *id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_lookup_is_case_insensitive() {
        let resp = ResponseData {
            headers: vec![("Content-Type".into(), vec!["text/plain".into()])],
            ..ResponseData::default()
        };
        assert_eq!(resp.content_type(), "text/plain");
    }

    #[test]
    fn content_type_empty_when_header_missing() {
        assert_eq!(ResponseData::default().content_type(), "");
    }
}
