//! UI helpers - the only place semantic token classes meet colors.

use ratatui::{prelude::*, widgets::*};

use crate::format::{StyledLine, TokenClass};

/// Visual style for a semantic token class. The formatting layer only
/// emits classes; the mapping to terminal attributes lives here.
pub fn class_style(class: TokenClass) -> Style {
    match class {
        TokenClass::Plain => Style::default(),
        TokenClass::Label => Style::default().fg(Color::Magenta).bold(),
        TokenClass::Error => Style::default().fg(Color::Red).bold(),
        TokenClass::Status => Style::default().fg(Color::Green).bold(),
        TokenClass::Key => Style::default().fg(Color::Cyan),
        TokenClass::Str => Style::default().fg(Color::Green),
        TokenClass::Number => Style::default().fg(Color::Yellow),
        TokenClass::Literal => Style::default().fg(Color::Magenta),
    }
}

/// Convert classified lines into ratatui lines.
pub fn styled_text(lines: &[StyledLine]) -> Vec<Line<'static>> {
    lines
        .iter()
        .map(|line| {
            Line::from(
                line.segments
                    .iter()
                    .map(|seg| Span::styled(seg.text.clone(), class_style(seg.class)))
                    .collect::<Vec<_>>(),
            )
        })
        .collect()
}

/// Method color for the endpoint list.
pub fn method_color(method: &str) -> Color {
    match method {
        "GET" => Color::Green,
        "POST" => Color::Yellow,
        "PUT" => Color::Blue,
        "PATCH" => Color::Cyan,
        "DELETE" => Color::Red,
        _ => Color::White,
    }
}

/// List item for one endpoint label of the form "METHOD /path".
pub fn endpoint_item(label: &str) -> ListItem<'static> {
    let (method, path) = label.split_once(' ').unwrap_or((label, ""));
    ListItem::new(Line::from(vec![
        Span::styled(
            format!("{method:7}"),
            Style::default().fg(method_color(method)).bold(),
        ),
        Span::raw(path.to_string()),
    ]))
}

/// Centered popup area, sized as a percentage of the surrounding rect.
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_class_has_a_style() {
        // Key, string, number and literal must be visually independent.
        let classes = [
            TokenClass::Key,
            TokenClass::Str,
            TokenClass::Number,
            TokenClass::Literal,
        ];
        for (i, a) in classes.iter().enumerate() {
            for b in &classes[i + 1..] {
                assert_ne!(class_style(*a), class_style(*b));
            }
        }
    }

    #[test]
    fn styled_text_preserves_content() {
        let mut line = StyledLine::default();
        line.push(TokenClass::Key, "\"a\"");
        line.push(TokenClass::Plain, ": ");
        line.push(TokenClass::Number, "1");

        let rendered = styled_text(&[line]);
        assert_eq!(rendered.len(), 1);
        let text: String = rendered[0]
            .spans
            .iter()
            .map(|s| s.content.as_ref())
            .collect();
        assert_eq!(text, "\"a\": 1");
    }
}
