//! Code pane rendering with syntax highlighting
//!
//! Used for both sides of the viewer: the C input and the C++ output. The
//! highlighter is a per-line character scanner that knows both languages'
//! keywords; it does not need the lexer and never fails on partial code.

use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// What a code pane shows
pub struct CodePane<'a> {
    pub title: &'a str,
    pub code: &'a str,
    /// Shown dimmed when `code` is empty
    pub placeholder: &'a str,
    pub is_focused: bool,
}

/// Simple syntax highlighting for C and C++ lines
fn highlight_line(line: &str) -> Line<'static> {
    let mut spans = Vec::new();
    let mut current_word = String::new();
    let chars: Vec<char> = line.chars().collect();
    let rest = |from: usize| chars[from..].iter().collect::<String>();
    let mut i = 0;

    if line.trim_start().starts_with('#') {
        return Line::from(Span::styled(
            line.to_string(),
            Style::default().fg(DEFAULT_THEME.preprocessor),
        ));
    }

    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();

        // Comments run to the end of the line; block comments are only
        // recognized when they open on this line
        if c == '/' && matches!(next, Some('/') | Some('*')) {
            flush_word(&mut spans, &mut current_word, false);
            spans.push(Span::styled(
                rest(i),
                Style::default().fg(DEFAULT_THEME.comment),
            ));
            break;
        }

        if c == '"' || c == '\'' {
            flush_word(&mut spans, &mut current_word, false);
            let mut end = i + 1;
            while end < chars.len() && chars[end] != c {
                end += if chars[end] == '\\' { 2 } else { 1 };
            }
            let end = (end + 1).min(chars.len());
            spans.push(Span::styled(
                chars[i..end].iter().collect::<String>(),
                Style::default().fg(DEFAULT_THEME.string),
            ));
            i = end;
            continue;
        }

        if !c.is_alphanumeric() && c != '_' {
            flush_word(&mut spans, &mut current_word, c == '(');

            let style = match c {
                '{' | '}' | '(' | ')' | '[' | ']' => Style::default().fg(DEFAULT_THEME.primary),
                _ => Style::default().fg(DEFAULT_THEME.fg),
            };
            spans.push(Span::styled(c.to_string(), style));
            i += 1;
            continue;
        }

        current_word.push(c);
        i += 1;
    }

    flush_word(&mut spans, &mut current_word, false);
    Line::from(spans)
}

fn flush_word(spans: &mut Vec<Span<'static>>, word: &mut String, is_function: bool) {
    if word.is_empty() {
        return;
    }
    let style = word_style(word, is_function);
    spans.push(Span::styled(std::mem::take(word), style));
}

fn word_style(word: &str, is_function: bool) -> Style {
    match word {
        "int" | "char" | "void" | "bool" | "float" | "double" | "long" | "short" | "unsigned"
        | "signed" | "const" | "static" | "extern" | "auto" | "register" | "volatile" => {
            Style::default().fg(DEFAULT_THEME.type_name)
        }
        "struct" | "class" | "union" | "enum" | "typedef" | "return" | "if" | "else" | "while"
        | "for" | "do" | "switch" | "case" | "default" | "break" | "continue" | "goto"
        | "sizeof" | "new" | "delete" | "using" | "namespace" | "public" | "private"
        | "protected" => Style::default()
            .fg(DEFAULT_THEME.keyword)
            .add_modifier(Modifier::BOLD),
        "NULL" | "nullptr" | "endl" => Style::default().fg(DEFAULT_THEME.number),
        "cout" | "cin" | "std" => Style::default().fg(DEFAULT_THEME.function),
        _ if word.chars().next().is_some_and(|c| c.is_ascii_digit()) => {
            Style::default().fg(DEFAULT_THEME.number)
        }
        _ if is_function => Style::default().fg(DEFAULT_THEME.function),
        _ => Style::default().fg(DEFAULT_THEME.fg),
    }
}

/// Render a code pane, clamping `scroll` so the last page stays filled.
pub fn render_code_pane(frame: &mut Frame, area: Rect, pane: CodePane<'_>, scroll: &mut usize) {
    let border_style = if pane.is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(format!(" {} ", pane.title))
        .borders(Borders::ALL)
        .border_style(border_style);

    if pane.code.is_empty() {
        *scroll = 0;
        let placeholder = Line::from(Span::styled(
            pane.placeholder.to_string(),
            Style::default()
                .fg(DEFAULT_THEME.comment)
                .add_modifier(Modifier::ITALIC),
        ));
        frame.render_widget(Paragraph::new(placeholder).block(block), area);
        return;
    }

    let lines: Vec<&str> = pane.code.lines().collect();
    let visible_height = area.height.saturating_sub(2).max(1) as usize; // borders
    *scroll = (*scroll).min(lines.len().saturating_sub(visible_height));

    let visible_lines: Vec<Line> = lines
        .iter()
        .enumerate()
        .skip(*scroll)
        .take(visible_height)
        .map(|(idx, line)| {
            let mut spans = vec![Span::styled(
                format!("{:4} ", idx + 1),
                Style::default().fg(DEFAULT_THEME.comment),
            )];
            spans.extend(highlight_line(line).spans);
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(visible_lines).block(block), area);
}
