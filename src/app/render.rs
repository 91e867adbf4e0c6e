//! Drawing. Pure projection of [`App`]; nothing here mutates state.

use ratatui::{
    Frame,
    prelude::*,
    widgets::{Block, Borders, Paragraph, Row, Table, TableState, Wrap},
};

use crate::{
    events::Screen,
    form::render_form,
    layout,
    rows::EnvRow,
    shortcuts::{Shortcuts, format_keys},
    table::{Filter, Identify, SelectList},
};

use super::App;

const ACCENT: Color = Color::Rgb(0x25, 0xA0, 0x65);

fn highlight() -> Style {
    Style::default()
        .bg(ACCENT)
        .fg(Color::Black)
        .add_modifier(Modifier::BOLD)
}

pub fn draw(f: &mut Frame, app: &App) {
    let main = layout::create_main_layout(f.area());

    draw_header(f, main.header, app);

    match app.ui.screen {
        Screen::MainMenu => draw_list(f, main.body, "Menu", &app.main_menu, &[], |i| {
            vec![i.title.to_string(), i.description.to_string()]
        }),
        Screen::MachineList => draw_list(
            f,
            main.body,
            "Machines",
            &app.machines,
            &["ID", "Name", "VPN IP", "Public IP", "Status", "CPU", "RAM", "Disk"],
            |m| {
                vec![
                    m.id.clone(),
                    m.name.clone(),
                    m.vpn_ip.clone(),
                    m.public_ip.clone(),
                    m.status.clone(),
                    m.cpu_usage.clone(),
                    m.mem_usage.clone(),
                    m.disk_usage.clone(),
                ]
            },
        ),
        Screen::ServiceList => draw_list(
            f,
            main.body,
            "Services",
            &app.services,
            &["Name", "Git URL"],
            |s| vec![s.name.clone(), s.git_url.clone()],
        ),
        Screen::EnvironmentList => {
            let title = match &app.selected_service {
                Some(s) => format!("Environments of {}", s.name),
                None => "Environments".into(),
            };
            draw_list(
                f,
                main.body,
                &title,
                &app.environments,
                &["Name", "Branch", "Domains", "Last deployment"],
                |r| match r {
                    EnvRow::Add => vec!["+ Add Environment".into()],
                    EnvRow::Env(e) => vec![
                        e.name.clone(),
                        e.branch.clone(),
                        e.domains.join(", "),
                        e.last_deployment_status.clone(),
                    ],
                },
            )
        }
        Screen::EnvironmentMenu => {
            let title = match &app.selected_environment {
                Some(e) => format!("Environment {}", e.name),
                None => "Environment".into(),
            };
            draw_list(f, main.body, &title, &app.env_menu, &[], |i| {
                vec![i.title.to_string(), i.description.to_string()]
            })
        }
        Screen::AddMachineForm => {
            if let Some(form) = &app.machine_form {
                render_form(f, main.body, form);
            }
        }
        Screen::AddServiceForm => {
            if let Some(form) = &app.service_form {
                render_form(f, main.body, form);
            }
        }
        Screen::AddEnvironmentForm | Screen::EditEnvironmentForm => {
            if let Some(form) = &app.env_form {
                render_form(f, main.body, form);
            }
        }
        Screen::DeleteConfirmation => {
            if let Some(form) = &app.delete_form {
                render_form(f, main.body, form);
            }
        }
        Screen::MachineJoinHint | Screen::DeploymentScheduled => {
            let text = format!("{}\nPress Enter or Esc to continue.", app.hint_text);
            let para = Paragraph::new(text)
                .block(Block::default().borders(Borders::ALL))
                .wrap(Wrap { trim: false });
            f.render_widget(para, main.body);
        }
    }

    let help = Paragraph::new(help_text(app.ui.screen, &app.shortcuts))
        .block(Block::default().borders(Borders::ALL).title("HELP"))
        .wrap(Wrap { trim: true });
    f.render_widget(help, main.help_bar);

    f.render_widget(status_bar(app), main.status_bar);
}

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
    let hint = match app.ui.screen {
        Screen::MainMenu => "Press Ctrl+C to quit".to_string(),
        s => match s.parent() {
            Some(p) => format!("Press ESC to return to {}", p.name()),
            None => "Press ESC to cancel".to_string(),
        },
    };
    let lines = vec![
        Line::styled(
            app.ui.screen.breadcrumb(),
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        ),
        Line::styled(hint, Style::default().fg(Color::DarkGray)),
    ];
    f.render_widget(Paragraph::new(lines), area);
}

/// A bordered, scrolling list with an optional header row and filter bar.
fn draw_list<T: Identify>(
    f: &mut Frame,
    area: Rect,
    title: &str,
    list: &SelectList<T>,
    header: &[&str],
    cells: impl Fn(&T) -> Vec<String>,
) {
    let (area, filter_area) = match list.filter() {
        Filter::Off => (area, None),
        _ => {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(1), Constraint::Length(1)])
                .split(area);
            (chunks[0], Some(chunks[1]))
        }
    };

    let visible = list.visible();
    let columns = header.len().max(2);
    let rows = visible.iter().map(|r| Row::new(cells(r)));
    let widths = vec![Constraint::Fill(1); columns];

    let mut table = Table::new(rows, widths)
        .block(Block::default().borders(Borders::ALL).title(title.to_string()))
        .row_highlight_style(highlight())
        .highlight_symbol("> ");
    if !header.is_empty() {
        table = table.header(Row::new(header.to_vec()).bold());
    }

    let mut state = TableState::default().with_offset(list.offset());
    if !visible.is_empty() {
        state.select(Some(list.cursor()));
    }
    f.render_stateful_widget(table, area, &mut state);

    if let Some(fa) = filter_area {
        let text = match list.filter() {
            Filter::Editing(input) => format!("Filter: {}", input.display(fa.width as usize)),
            Filter::Applied(q) => format!("Filter: {q} (Esc to clear)"),
            Filter::Off => String::new(),
        };
        f.render_widget(
            Paragraph::new(text).style(Style::default().fg(Color::Yellow)),
            fa,
        );
    }
}

fn help_text(screen: Screen, sc: &Shortcuts) -> String {
    let nav = format!(
        "{}/{}: move | {}: filter",
        format_keys(&sc.list.up),
        format_keys(&sc.list.down),
        format_keys(&sc.list.filter)
    );
    let choose = format_keys(&sc.list.choose);
    let back = format_keys(&sc.list.back);
    let quit = format_keys(&sc.list.quit);
    match screen {
        Screen::MainMenu => format!("{choose}: open | {nav} | {quit}: quit"),
        Screen::MachineList => format!(
            "{}: new | {}: delete | {}: refresh | {nav} | {back}: back | {quit}: quit",
            format_keys(&sc.list.new),
            format_keys(&sc.list.delete),
            format_keys(&sc.list.refresh),
        ),
        Screen::ServiceList => format!(
            "{choose}: environments | {}: new | {}: refresh | {nav} | {back}: back",
            format_keys(&sc.list.new),
            format_keys(&sc.list.refresh),
        ),
        Screen::EnvironmentList => format!(
            "{choose}: open | {}: new | {}: refresh | {nav} | {back}: back",
            format_keys(&sc.list.new),
            format_keys(&sc.list.refresh),
        ),
        Screen::EnvironmentMenu => format!("{choose}: run | {nav} | {back}: back"),
        Screen::AddMachineForm
        | Screen::AddServiceForm
        | Screen::AddEnvironmentForm
        | Screen::EditEnvironmentForm
        | Screen::DeleteConfirmation => format!(
            "{}: next | {}: previous | {}: toggle | {}: cancel",
            format_keys(&sc.form.next),
            format_keys(&sc.form.prev),
            format_keys(&sc.form.toggle),
            format_keys(&sc.form.cancel),
        ),
        Screen::MachineJoinHint | Screen::DeploymentScheduled => {
            format!("{}: continue", format_keys(&sc.hint.dismiss))
        }
    }
}

fn status_bar(app: &App) -> Paragraph<'static> {
    let refreshed = app
        .ui
        .last_refresh
        .map(|t| format!(" | refreshed {}", t.format("%H:%M:%S")))
        .unwrap_or_default();

    let (text, style) = match &app.ui.notice {
        Some(n) if n.is_error => (
            format!("[{}] ERROR: {}{refreshed}", app.ui.screen.name(), n.text),
            Style::default().fg(Color::Red),
        ),
        Some(n) => (
            format!("[{}] {}{refreshed}", app.ui.screen.name(), n.text),
            Style::default().fg(Color::Yellow),
        ),
        None => (
            format!("[{}] {}{refreshed}", app.ui.screen.name(), app.ui.status),
            Style::default(),
        ),
    };

    Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title("STATUS"))
        .style(style)
        .wrap(Wrap { trim: true })
}
