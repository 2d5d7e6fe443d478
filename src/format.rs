//! Response formatting - pure text assembly with semantic token classes.
//!
//! The formatter never touches colors or terminal attributes. It emits
//! [`StyledLine`]s whose segments carry a [`TokenClass`]; mapping a class
//! to visual style is the UI layer's concern (see `ui::class_style`).
//!
//! Body formatting is strategy-based: each [`BodyFormatter`] declares
//! whether it can handle a `(body, content-type)` pair and the first
//! match wins. Bodies no strategy claims pass through verbatim.

use crate::messages::network::ResponseData;

/// Semantic class of a text segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenClass {
    Plain,
    /// Section label such as "Headers:".
    Label,
    /// Error line.
    Error,
    /// Response status line.
    Status,
    /// JSON object key.
    Key,
    /// JSON string value.
    Str,
    /// JSON numeric value.
    Number,
    /// JSON boolean or null value.
    Literal,
}

/// One contiguous run of text sharing a token class.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Segment {
    pub class: TokenClass,
    pub text: String,
}

impl Segment {
    pub fn new(class: TokenClass, text: impl Into<String>) -> Self {
        Segment {
            class,
            text: text.into(),
        }
    }
}

/// One display line made of classified segments.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StyledLine {
    pub segments: Vec<Segment>,
}

impl StyledLine {
    pub fn plain(text: impl Into<String>) -> Self {
        StyledLine {
            segments: vec![Segment::new(TokenClass::Plain, text)],
        }
    }

    pub fn push(&mut self, class: TokenClass, text: impl Into<String>) {
        self.segments.push(Segment::new(class, text));
    }

    /// Concatenated text with all classes stripped.
    pub fn unstyled(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }
}

/// Pluggable body-formatting strategy.
pub trait BodyFormatter {
    /// Whether this strategy applies to the given body and content type.
    fn can_handle(&self, body: &str, content_type: &str) -> bool;

    /// Format the body. When the body fails to parse under this
    /// strategy the returned lines, rejoined with `\n`, must reproduce
    /// the original text byte for byte; never panics, never truncates.
    fn format(&self, body: &str) -> Vec<StyledLine>;
}

/// JSON strategy: re-serializes with 2-space indentation and classifies
/// keys, string values, numbers, and boolean/null literals per line.
pub struct JsonFormatter;

impl BodyFormatter for JsonFormatter {
    fn can_handle(&self, body: &str, content_type: &str) -> bool {
        if content_type.contains("json") {
            return true;
        }

        let trimmed = body.trim_start();
        matches!(trimmed.chars().next(), Some('{') | Some('['))
    }

    fn format(&self, body: &str) -> Vec<StyledLine> {
        let Ok(parsed) = serde_json::from_str::<serde_json::Value>(body) else {
            return passthrough(body);
        };

        let Ok(pretty) = serde_json::to_string_pretty(&parsed) else {
            return passthrough(body);
        };

        pretty.lines().map(classify_json_line).collect()
    }
}

// `split` rather than `lines`: keeps `\r` and trailing-newline structure
// so rejoining with `\n` reproduces the body byte for byte.
fn passthrough(body: &str) -> Vec<StyledLine> {
    body.split('\n').map(StyledLine::plain).collect()
}

/// Classify one pretty-printed JSON line into key/value segments.
fn classify_json_line(line: &str) -> StyledLine {
    let trimmed = line.trim();

    // Pure structure lines stay plain.
    if matches!(trimmed, "{" | "}" | "[" | "]" | "{}" | "[]" | "},"  | "],") || trimmed.is_empty()
    {
        return StyledLine::plain(line);
    }

    let indent_len = line.len() - line.trim_start().len();
    let (indent, rest) = line.split_at(indent_len);

    // `"key": value` lines. Keys in pretty-printed JSON always start
    // with a quote, which keeps colons inside string values from being
    // mistaken for separators on value-only lines.
    if rest.starts_with('"') {
        if let Some((key, value)) = split_key_value(rest) {
            let mut out = StyledLine::default();
            out.push(TokenClass::Plain, indent);
            out.push(TokenClass::Key, key);
            out.push(TokenClass::Plain, ": ");
            classify_value(&mut out, value);
            return out;
        }
    }

    // Array elements and other value-only lines.
    let mut out = StyledLine::default();
    out.push(TokenClass::Plain, indent);
    classify_value(&mut out, rest);
    out
}

/// Split `"key": value` at the colon that terminates the quoted key.
fn split_key_value(rest: &str) -> Option<(&str, &str)> {
    let mut escaped = false;
    for (i, c) in rest.char_indices().skip(1) {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '"' => {
                let after = &rest[i + 1..];
                return after
                    .strip_prefix(": ")
                    .map(|value| (&rest[..=i], value));
            }
            _ => {}
        }
    }
    None
}

fn classify_value(out: &mut StyledLine, value: &str) {
    let (value, comma) = match value.strip_suffix(',') {
        Some(v) => (v, true),
        None => (value, false),
    };

    let class = if value == "true" || value == "false" || value == "null" {
        TokenClass::Literal
    } else if value.starts_with('"') {
        TokenClass::Str
    } else if value.parse::<f64>().is_ok() {
        TokenClass::Number
    } else {
        TokenClass::Plain
    };

    out.push(class, value);
    if comma {
        out.push(TokenClass::Plain, ",");
    }
}

/// Format a body with the first matching strategy, verbatim fallthrough.
pub fn detect_and_format(body: &str, content_type: &str) -> Vec<StyledLine> {
    let formatters: [&dyn BodyFormatter; 1] = [&JsonFormatter];

    for formatter in formatters {
        if formatter.can_handle(body, content_type) {
            return formatter.format(body);
        }
    }

    passthrough(body)
}

/// Format a completed dispatch for the response view.
///
/// Errors collapse to a single error line; successes render the status
/// line, one line per header (multi-value headers joined by ", "), a
/// blank line, and the formatted body.
pub fn format_response(outcome: &Result<ResponseData, String>) -> Vec<StyledLine> {
    let resp = match outcome {
        Err(message) => {
            let mut line = StyledLine::default();
            line.push(TokenClass::Error, "Error: ");
            line.push(TokenClass::Plain, message.clone());
            return vec![line];
        }
        Ok(resp) => resp,
    };

    let mut lines = Vec::new();

    let mut status = StyledLine::default();
    status.push(
        TokenClass::Status,
        format!("Response: {} {}", resp.status, resp.status_text),
    );
    lines.push(status);
    lines.push(StyledLine::default());

    let mut label = StyledLine::default();
    label.push(TokenClass::Label, "Headers:");
    lines.push(label);
    for (name, values) in &resp.headers {
        lines.push(StyledLine::plain(format!(
            "  {}: {}",
            name,
            values.join(", ")
        )));
    }

    lines.push(StyledLine::default());
    let mut label = StyledLine::default();
    label.push(TokenClass::Label, "Body:");
    lines.push(label);

    lines.extend(detect_and_format(&resp.body, &resp.content_type()));

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unstyled(lines: &[StyledLine]) -> String {
        lines
            .iter()
            .map(|l| l.unstyled())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn json_round_trips_through_unstyled_text() {
        let body = r#"{"name":"ada","age":36,"admin":true,"notes":null,"tags":["a","b"]}"#;
        let lines = detect_and_format(body, "application/json");

        let reparsed: serde_json::Value = serde_json::from_str(&unstyled(&lines)).unwrap();
        let original: serde_json::Value = serde_json::from_str(body).unwrap();
        assert_eq!(reparsed, original);
    }

    #[test]
    fn invalid_json_returned_unchanged_every_time() {
        let body = r#"{"a": b}"#;
        for _ in 0..3 {
            let lines = detect_and_format(body, "application/json");
            assert_eq!(unstyled(&lines), body);
        }
    }

    #[test]
    fn passthrough_preserves_trailing_newline_and_carriage_returns() {
        let body = "line one\r\nline two\n";
        let lines = detect_and_format(body, "text/plain");
        assert_eq!(unstyled(&lines), body);

        let invalid = "{\"a\": b}\n";
        let lines = detect_and_format(invalid, "application/json");
        assert_eq!(unstyled(&lines), invalid);
    }

    #[test]
    fn json_strategy_selected_by_content_type() {
        let lines = detect_and_format("[1, 2]", "application/json; charset=utf-8");
        assert_eq!(unstyled(&lines), "[\n  1,\n  2\n]");
    }

    #[test]
    fn json_strategy_selected_by_leading_brace() {
        let lines = detect_and_format("  {\"a\": 1}", "");
        assert!(lines
            .iter()
            .flat_map(|l| &l.segments)
            .any(|s| s.class == TokenClass::Key));
    }

    #[test]
    fn non_matching_body_passes_through_verbatim() {
        let body = "<html><body>hi</body></html>";
        let lines = detect_and_format(body, "text/html");
        assert_eq!(unstyled(&lines), body);
        assert!(lines
            .iter()
            .flat_map(|l| &l.segments)
            .all(|s| s.class == TokenClass::Plain));
    }

    #[test]
    fn token_classes_assigned_per_value_kind() {
        let body = r#"{"s": "text", "n": 4.5, "b": false, "x": null}"#;
        let lines = detect_and_format(body, "application/json");
        let classes: Vec<TokenClass> = lines
            .iter()
            .flat_map(|l| &l.segments)
            .map(|s| s.class)
            .collect();

        assert!(classes.contains(&TokenClass::Key));
        assert!(classes.contains(&TokenClass::Str));
        assert!(classes.contains(&TokenClass::Number));
        assert!(classes.contains(&TokenClass::Literal));
    }

    #[test]
    fn string_value_containing_colon_not_split() {
        let body = r#"{"url": "https://example.com:8080/x"}"#;
        let lines = detect_and_format(body, "application/json");

        let reparsed: serde_json::Value = serde_json::from_str(&unstyled(&lines)).unwrap();
        assert_eq!(reparsed["url"], "https://example.com:8080/x");
    }

    #[test]
    fn error_outcome_formats_as_single_error_line() {
        let lines = format_response(&Err("connection refused".to_string()));

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].segments[0].class, TokenClass::Error);
        assert_eq!(lines[0].unstyled(), "Error: connection refused");
    }

    #[test]
    fn success_outcome_formats_status_headers_and_body() {
        let resp = ResponseData {
            status: 200,
            status_text: "OK".into(),
            headers: vec![
                ("content-type".into(), vec!["application/json".into()]),
                ("vary".into(), vec!["accept".into(), "origin".into()]),
            ],
            body: r#"{"ok":true}"#.into(),
        };

        let lines = format_response(&Ok(resp));
        let text = unstyled(&lines);

        assert!(text.starts_with("Response: 200 OK"));
        assert!(text.contains("  vary: accept, origin"));
        assert!(text.contains("\"ok\": true"));
    }
}
