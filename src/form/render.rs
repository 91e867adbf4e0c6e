//! Drawing a form into a frame region.

use ratatui::{
    Frame,
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::{Field, Form, Widget};

const ACCENT: Color = Color::Rgb(0x25, 0xA0, 0x65);

/// Lines for one field; the focused field gets a bar and highlighted options.
fn field_lines<D>(field: &Field<D>, focused: bool, width: usize) -> Vec<Line<'static>> {
    let bar = if focused { "┃ " } else { "  " };
    let bar_style = Style::default().fg(ACCENT);
    let label_style = if focused {
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };

    let mut lines = vec![Line::from(vec![
        Span::styled(bar, bar_style),
        Span::styled(field.label.clone(), label_style),
    ])];

    if let Some(desc) = &field.description {
        lines.push(Line::from(vec![
            Span::styled(bar, bar_style),
            Span::styled(desc.clone(), Style::default().fg(Color::Gray)),
        ]));
    }

    match &field.widget {
        Widget::Text { input, placeholder } => {
            let text = if input.value().is_empty() && !focused {
                Span::styled(placeholder.clone(), Style::default().fg(Color::DarkGray))
            } else if focused {
                Span::raw(format!("> {}", input.display(width.saturating_sub(6))))
            } else {
                Span::raw(format!("> {}", input.value()))
            };
            lines.push(Line::from(vec![Span::styled(bar, bar_style), text]));
        }
        Widget::Select { options, cursor } => {
            for (i, opt) in options.iter().enumerate() {
                let marker = if i == *cursor { "> " } else { "  " };
                let style = if i == *cursor && focused {
                    Style::default().fg(ACCENT)
                } else {
                    Style::default()
                };
                lines.push(Line::from(vec![
                    Span::styled(bar, bar_style),
                    Span::styled(format!("{marker}{}", opt.label), style),
                ]));
            }
        }
        Widget::MultiSelect {
            options,
            cursor,
            picked,
        } => {
            if options.is_empty() {
                lines.push(Line::from(vec![
                    Span::styled(bar, bar_style),
                    Span::styled("(nothing to choose yet)", Style::default().fg(Color::DarkGray)),
                ]));
            }
            for (i, opt) in options.iter().enumerate() {
                let marker = if i == *cursor && focused { ">" } else { " " };
                let check = if picked.contains(&opt.value) { "[x]" } else { "[ ]" };
                lines.push(Line::from(vec![
                    Span::styled(bar, bar_style),
                    Span::raw(format!("{marker} {check} {}", opt.label)),
                ]));
            }
            let unlisted = picked
                .iter()
                .filter(|v| !options.iter().any(|c| c.value == **v))
                .count();
            if unlisted > 0 {
                lines.push(Line::from(vec![
                    Span::styled(bar, bar_style),
                    Span::styled(
                        format!("  + {unlisted} selected, not listed"),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]));
            }
        }
        Widget::Confirm {
            affirmative,
            negative,
            value,
        } => {
            let on = Style::default()
                .fg(Color::Black)
                .bg(ACCENT)
                .add_modifier(Modifier::BOLD);
            let off = Style::default().fg(Color::Gray);
            let (yes, no) = if *value { (on, off) } else { (off, on) };
            lines.push(Line::from(vec![
                Span::styled(bar, bar_style),
                Span::styled(format!(" {affirmative} "), yes),
                Span::raw("  "),
                Span::styled(format!(" {negative} "), no),
            ]));
        }
    }

    if let Some(err) = &field.error {
        lines.push(Line::from(vec![
            Span::styled(bar, bar_style),
            Span::styled(format!("* {err}"), Style::default().fg(Color::Red)),
        ]));
    }
    lines.push(Line::default());
    lines
}

/// Draw `form` into `area`, scrolled so the focused field is visible.
pub fn render_form<D: Clone>(f: &mut Frame, area: Rect, form: &Form<D>) {
    let (width, height) = form.size();
    let area = Rect {
        width: area.width.min(width.max(20)),
        height: area.height.min(height.max(5)),
        ..area
    };
    let inner_width = area.width.saturating_sub(2) as usize;

    let mut lines = Vec::new();
    let mut focus_end = 0;
    for (i, field) in form.fields().iter().enumerate() {
        lines.extend(field_lines(field, i == form.focus(), inner_width));
        if i == form.focus() {
            focus_end = lines.len();
        }
    }
    if form.is_submitting() {
        lines.push(Line::styled(
            "Submitting...",
            Style::default().fg(Color::Yellow),
        ));
        focus_end = lines.len();
    }

    let visible = area.height.saturating_sub(2) as usize;
    let scroll = focus_end.saturating_sub(visible) as u16;

    let para = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(form.title.clone()))
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    f.render_widget(para, area);
}
