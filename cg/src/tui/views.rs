//! TUI views and rendering

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph, Wrap};

use taskstore::Task;

use super::app::{App, ChatLine, ChatRole};

/// Main render function
pub fn render(app: &App, frame: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Chat and board
            Constraint::Length(3), // Input
        ])
        .split(frame.area());

    render_header(app, frame, chunks[0]);

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[1]);

    render_chat(app, frame, panes[0]);
    render_board(app, frame, panes[1]);

    render_input(app, frame, chunks[2]);
}

/// Render the header bar
fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let header = Paragraph::new(vec![Line::from(vec![
        Span::styled(
            "Concierge ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw("│ "),
        Span::styled(
            format!("{} open", app.open_count()),
            Style::default().fg(Color::Yellow),
        ),
        Span::raw(" │ "),
        Span::styled(
            format!("{} done", app.done_count()),
            Style::default().fg(Color::Green),
        ),
    ])])
    .block(Block::default().borders(Borders::ALL).title(" Status "));

    frame.render_widget(header, area);
}

/// Render the conversation pane, pinned to the latest lines
fn render_chat(app: &App, frame: &mut Frame, area: Rect) {
    let lines: Vec<Line> = app.messages.iter().map(chat_line).collect();

    let inner_height = area.height.saturating_sub(2) as usize;
    let scroll = lines.len().saturating_sub(inner_height) as u16;

    let chat = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Chat "))
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));

    frame.render_widget(chat, area);
}

fn chat_line(line: &ChatLine) -> Line<'_> {
    match line.role {
        ChatRole::User => Line::from(vec![
            Span::styled("you ", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::raw(&line.text),
        ]),
        ChatRole::Assistant => Line::from(vec![
            Span::styled(
                "concierge ",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::raw(&line.text),
        ]),
    }
}

/// Render the task board pane
fn render_board(app: &App, frame: &mut Frame, area: Rect) {
    let title = format!(" Tasks ({} open / {} done) ", app.open_count(), app.done_count());
    let block = Block::default().borders(Borders::ALL).title(title);

    if app.tasks.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            "No tasks yet",
            Style::default().fg(Color::DarkGray),
        )))
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = app.tasks.iter().map(|t| ListItem::new(task_line(t))).collect();
    let list = List::new(items).block(block);

    frame.render_widget(list, area);
}

fn task_line(task: &Task) -> Line<'_> {
    let (mark, mark_color) = if task.is_completed() {
        ("✓ ", Color::Green)
    } else {
        ("○ ", Color::Yellow)
    };
    let title_style = if task.is_completed() {
        Style::default().fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT)
    } else {
        Style::default()
    };

    let mut spans = vec![
        Span::styled(mark, Style::default().fg(mark_color)),
        Span::styled(&task.title, title_style),
        Span::styled(format!(" ({})", task.short_id()), Style::default().fg(Color::DarkGray)),
    ];
    if let Some(due) = &task.due {
        spans.push(Span::styled(format!(" due: {due}"), Style::default().fg(Color::Cyan)));
    }

    Line::from(spans)
}

/// Render the input line
fn render_input(app: &App, frame: &mut Frame, area: Rect) {
    let title = if app.busy {
        " Thinking... "
    } else {
        " Message (Enter to send, Esc to quit) "
    };
    let style = if app.busy {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };

    let input = Paragraph::new(Line::from(vec![
        Span::styled("> ", Style::default().fg(Color::Green)),
        Span::raw(&app.input),
    ]))
    .style(style)
    .block(Block::default().borders(Borders::ALL).title(title));

    frame.render_widget(input, area);

    if !app.busy {
        frame.set_cursor_position((area.x + cursor_col(&app.input, area.width), area.y + 1));
    }
}

/// Cursor column inside the input block: border plus the "> " prompt plus
/// one cell per typed character, clamped to the pane. Byte length would
/// drift on multibyte input.
fn cursor_col(input: &str, pane_width: u16) -> u16 {
    let typed = input.chars().count().min(u16::MAX as usize) as u16;
    3u16.saturating_add(typed).min(pane_width.saturating_sub(2))
}
