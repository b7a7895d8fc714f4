use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use unicode_width::UnicodeWidthChar;

use crate::model::board::FilterTag;
use crate::model::task::{Status, Task};

use super::app::{AdvisorTab, App, FormField, FormState, Mode, ViewMode};
use super::theme::Theme;

/// Draw one frame
pub fn render(frame: &mut Frame, app: &App) {
    let theme = &app.theme;
    let area = frame.area();
    frame.render_widget(
        Block::default().style(Style::default().bg(theme.background).fg(theme.text)),
        area,
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(4),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(frame, app, chunks[0]);
    match app.view {
        ViewMode::Board => render_board(frame, app, chunks[1]),
        ViewMode::List => render_list(frame, app, chunks[1]),
    }
    render_status_line(frame, app, chunks[2]);

    match app.mode {
        Mode::Form => {
            if let Some(form) = &app.form {
                render_form(frame, theme, form, area);
            }
        }
        Mode::Advisor => render_advisor(frame, app, area),
        Mode::ConfirmDelete => render_confirm_delete(frame, app, area),
        _ => {}
    }

    if app.show_help {
        render_help(frame, theme, area);
    }
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(area);

    let view_label = match app.view {
        ViewMode::Board => "board",
        ViewMode::List => "list",
    };
    let title = Line::from(vec![
        Span::styled(
            " taskdeck ",
            Style::default()
                .fg(theme.text_bright)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("[{view_label}]"), Style::default().fg(theme.dim)),
    ]);
    frame.render_widget(Paragraph::new(title), rows[0]);

    // Filter tabs plus the live search query
    let active = app.board.state().filter;
    let mut spans = vec![Span::raw(" ")];
    for (i, tag) in FilterTag::ALL.iter().enumerate() {
        let style = if *tag == active {
            Style::default()
                .fg(theme.highlight)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.dim)
        };
        spans.push(Span::styled(format!("{} {}", i + 1, tag.label()), style));
        spans.push(Span::raw("  "));
    }
    let query = &app.board.state().search_query;
    if app.mode == Mode::Search {
        spans.push(Span::styled(
            format!("/{}\u{2588}", app.search_input),
            Style::default().fg(theme.text_bright),
        ));
    } else if !query.is_empty() {
        spans.push(Span::styled(
            format!("/{query}"),
            Style::default().fg(theme.text),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), rows[1]);
}

fn render_board(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(33),
            Constraint::Percentage(33),
            Constraint::Percentage(34),
        ])
        .split(area);

    for (index, column_area) in columns.iter().enumerate() {
        let status = Status::ALL[index];
        let tasks = app.column_tasks(index);
        let focused = index == app.column;

        let border_style = if focused {
            Style::default().fg(theme.status_color(status))
        } else {
            Style::default().fg(theme.dim)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(Span::styled(
                format!(" {} ({}) ", status.label(), tasks.len()),
                Style::default().fg(theme.status_color(status)),
            ));
        let inner_width = column_area.width.saturating_sub(2) as usize;

        let items: Vec<ListItem> = tasks
            .iter()
            .map(|task| ListItem::new(task_line(theme, task, inner_width)))
            .collect();
        let mut list_state = ListState::default();
        if focused && !tasks.is_empty() {
            list_state.select(Some(app.cursors[index].min(tasks.len() - 1)));
        }
        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().bg(theme.selection_bg));
        frame.render_stateful_widget(list, *column_area, &mut list_state);
    }
}

fn render_list(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let tasks = app.visible_tasks();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.dim))
        .title(Span::styled(
            format!(" Tasks ({}) ", tasks.len()),
            Style::default().fg(theme.text_bright),
        ));
    let inner_width = area.width.saturating_sub(2) as usize;

    let items: Vec<ListItem> = tasks
        .iter()
        .map(|task| {
            let mut spans = vec![Span::styled(
                format!("{:<12}", format!("[{}]", task.status.as_str())),
                Style::default().fg(theme.status_color(task.status)),
            )];
            spans.extend(task_line(theme, task, inner_width.saturating_sub(12)).spans);
            ListItem::new(Line::from(spans))
        })
        .collect();
    let mut list_state = ListState::default();
    if !tasks.is_empty() {
        list_state.select(Some(app.list_cursor.min(tasks.len() - 1)));
    }
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(theme.selection_bg));
    frame.render_stateful_widget(list, area, &mut list_state);
}

/// One task as a row: priority marker, title, optional due date
fn task_line<'a>(theme: &Theme, task: &'a Task, width: usize) -> Line<'a> {
    let marker = Span::styled(
        "\u{25CF} ",
        Style::default().fg(theme.priority_color(task.priority)),
    );
    let title_style = if task.completed {
        Style::default()
            .fg(theme.dim)
            .add_modifier(Modifier::CROSSED_OUT)
    } else {
        Style::default().fg(theme.text)
    };
    let due = task
        .due_date
        .as_deref()
        .map(|d| format!(" {d}"))
        .unwrap_or_default();
    let title_width = width.saturating_sub(2 + due.len());
    let mut spans = vec![
        marker,
        Span::styled(truncate(&task.title, title_width), title_style),
    ];
    if !due.is_empty() {
        spans.push(Span::styled(due, Style::default().fg(theme.dim)));
    }
    Line::from(spans)
}

fn render_status_line(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let hint = match app.mode {
        Mode::Navigate => {
            " a:add  e:edit  d:delete  space:done  H/L:move  J/K:reorder  /:search  f:filter  i:advisor  t:theme  ?:help  q:quit"
        }
        Mode::Search => " type to search  enter:keep  esc:clear",
        Mode::Form => " tab:next field  enter:save  esc:cancel",
        Mode::Advisor => " tab:switch  enter:run/accept  esc:close",
        Mode::ConfirmDelete => " y:delete  n:keep",
    };
    frame.render_widget(
        Paragraph::new(Span::styled(hint, Style::default().fg(theme.dim))),
        area,
    );
}

fn render_form(frame: &mut Frame, theme: &Theme, form: &FormState, area: Rect) {
    let popup = centered_rect(60, 50, area);
    frame.render_widget(Clear, popup);

    let title = if form.editing.is_some() {
        " Edit Task "
    } else {
        " New Task "
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.highlight))
        .title(Span::styled(
            title,
            Style::default()
                .fg(theme.text_bright)
                .add_modifier(Modifier::BOLD),
        ))
        .style(Style::default().bg(theme.background));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let field_line = |label: &str, value: &str, field: FormField| -> Line<'static> {
        let active = form.field == field;
        let label_style = if active {
            Style::default()
                .fg(theme.highlight)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.dim)
        };
        let cursor = if active { "\u{2588}" } else { "" };
        Line::from(vec![
            Span::styled(format!("{label:<13}"), label_style),
            Span::styled(
                format!("{value}{cursor}"),
                Style::default().fg(theme.text_bright),
            ),
        ])
    };

    let mut lines = vec![
        Line::raw(""),
        field_line("Title", &form.title, FormField::Title),
        Line::raw(""),
        field_line("Description", &form.description, FormField::Description),
        Line::raw(""),
        field_line("Due (Y-m-d)", &form.due_date, FormField::DueDate),
        Line::raw(""),
    ];
    // Priority renders as a picker rather than a text field
    let priority_active = form.field == FormField::Priority;
    let mut priority_spans = vec![Span::styled(
        format!("{:<13}", "Priority"),
        if priority_active {
            Style::default()
                .fg(theme.highlight)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.dim)
        },
    )];
    for p in crate::model::task::Priority::ALL {
        let style = if p == form.priority {
            Style::default()
                .fg(theme.priority_color(p))
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.dim)
        };
        priority_spans.push(Span::styled(format!("{} ", p.as_str()), style));
    }
    lines.push(Line::from(priority_spans));

    for error in &form.errors {
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(
            error.to_string(),
            Style::default().fg(theme.error),
        )));
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

fn render_advisor(frame: &mut Frame, app: &App, area: Rect) {
    let Some(advisor) = &app.advisor else {
        return;
    };
    let theme = &app.theme;
    let popup = centered_rect(70, 70, area);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.highlight))
        .title(Span::styled(
            format!(" Advisor: {} ", truncate(&advisor.task_title, 40)),
            Style::default()
                .fg(theme.text_bright)
                .add_modifier(Modifier::BOLD),
        ))
        .style(Style::default().bg(theme.background));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(2)])
        .split(inner);

    let tabs = [
        (AdvisorTab::Analyze, "Analyze"),
        (AdvisorTab::Ask, "Ask"),
        (AdvisorTab::Subtasks, "Subtasks"),
    ];
    let mut spans = Vec::new();
    for (tab, label) in tabs {
        let style = if tab == advisor.tab {
            Style::default()
                .fg(theme.highlight)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.dim)
        };
        spans.push(Span::styled(label, style));
        spans.push(Span::raw("  "));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), rows[0]);

    let mut lines: Vec<Line> = Vec::new();
    if advisor.tab == AdvisorTab::Ask {
        lines.push(Line::from(vec![
            Span::styled("> ", Style::default().fg(theme.dim)),
            Span::styled(
                format!("{}\u{2588}", advisor.question),
                Style::default().fg(theme.text_bright),
            ),
        ]));
        lines.push(Line::raw(""));
    }
    if advisor.pending.is_some() {
        lines.push(Line::from(Span::styled(
            "Thinking...",
            Style::default().fg(theme.dim),
        )));
    } else if let Some(error) = &advisor.error {
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(theme.error),
        )));
    } else if advisor.tab == AdvisorTab::Subtasks {
        if advisor.subtasks.is_empty() {
            lines.push(Line::from(Span::styled(
                "Press enter to suggest subtasks.",
                Style::default().fg(theme.dim),
            )));
        } else {
            for (index, suggestion) in advisor.subtasks.iter().enumerate() {
                let selected = index == advisor.subtask_cursor;
                let style = if selected {
                    Style::default().fg(theme.text_bright).bg(theme.selection_bg)
                } else {
                    Style::default().fg(theme.text)
                };
                lines.push(Line::from(Span::styled(
                    format!(" {} {}", if selected { ">" } else { " " }, suggestion.title),
                    style,
                )));
                if !suggestion.description.is_empty() {
                    lines.push(Line::from(Span::styled(
                        format!("     {}", suggestion.description),
                        Style::default().fg(theme.dim),
                    )));
                }
            }
            lines.push(Line::raw(""));
            lines.push(Line::from(Span::styled(
                "enter: add selected as a task",
                Style::default().fg(theme.dim),
            )));
        }
    } else if let Some(output) = &advisor.output {
        for text_line in output.lines() {
            lines.push(Line::from(Span::styled(
                text_line.to_string(),
                Style::default().fg(theme.text),
            )));
        }
    }
    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: false }),
        rows[1],
    );
}

fn render_confirm_delete(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let title = app
        .confirm_delete
        .as_ref()
        .and_then(|id| app.board.state().task(id))
        .map(|t| t.title.clone())
        .unwrap_or_default();
    let popup = centered_rect(50, 20, area);
    frame.render_widget(Clear, popup);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.error))
        .title(" Delete Task ")
        .style(Style::default().bg(theme.background));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);
    let lines = vec![
        Line::raw(""),
        Line::from(Span::styled(
            format!("Delete \"{}\"?", truncate(&title, 40)),
            Style::default().fg(theme.text_bright),
        )),
        Line::raw(""),
        Line::from(Span::styled(
            "y: delete    n: keep",
            Style::default().fg(theme.dim),
        )),
    ];
    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center),
        inner,
    );
}

fn render_help(frame: &mut Frame, theme: &Theme, area: Rect) {
    let popup = centered_rect(60, 70, area);
    frame.render_widget(Clear, popup);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.highlight))
        .title(" Help ")
        .style(Style::default().bg(theme.background));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let entries = [
        ("h/l, arrows", "focus column"),
        ("j/k", "move cursor"),
        ("H/L", "move task across columns"),
        ("J/K", "reorder task within a column"),
        ("space", "toggle completion"),
        ("a", "add task in focused column"),
        ("e / enter", "edit task"),
        ("d", "delete task"),
        ("/", "search"),
        ("f, 1-4", "filter"),
        ("tab / v", "board or list view"),
        ("i", "open advisor"),
        ("t", "toggle theme"),
        ("q", "quit"),
    ];
    let lines: Vec<Line> = entries
        .iter()
        .map(|(key, action)| {
            Line::from(vec![
                Span::styled(
                    format!(" {key:<14}"),
                    Style::default().fg(theme.highlight),
                ),
                Span::styled(*action, Style::default().fg(theme.text)),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}

/// Center a popup of the given percentage size within `area`
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

/// Truncate to a display width, appending an ellipsis when cut short
fn truncate(s: &str, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0usize;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width.saturating_sub(1) {
            if out.len() < s.len() {
                out.push('\u{2026}');
            }
            return out;
        }
        used += w;
        out.push(c);
    }
    out
}
