use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use ratatui::Frame;

use crate::task::TaskRecord;

use super::app::{AppState, StatusKind};

pub(crate) fn draw(frame: &mut Frame, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(frame.size());

    draw_list(frame, chunks[0], state);
    draw_status(frame, chunks[1], state);
    draw_help(frame, chunks[2]);
}

fn draw_list(frame: &mut Frame, area: Rect, state: &AppState) {
    let items: Vec<ListItem> = state
        .view
        .tasks()
        .iter()
        .map(|task| ListItem::new(task_line(task)))
        .collect();

    let title = format!(" Tasks ({}) ", state.view.len());
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut list_state = ListState::default();
    list_state.select(state.selected);
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn task_line(task: &TaskRecord) -> Line<'_> {
    let marker = if task.completed { "[x] " } else { "[ ] " };
    let title_style = if task.completed {
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::CROSSED_OUT)
    } else {
        Style::default()
    };

    Line::from(vec![
        Span::raw(marker),
        Span::styled(task.title.clone(), title_style),
        Span::styled(
            format!("  due {}", task.due_date.format("%Y-%m-%d %H:%M")),
            Style::default().fg(Color::Green),
        ),
    ])
}

fn draw_status(frame: &mut Frame, area: Rect, state: &AppState) {
    let line = if let Some(confirm) = &state.delete_confirm {
        Line::from(Span::styled(
            format!(" delete '{}'? (y/n)", confirm.title),
            Style::default().fg(Color::Yellow),
        ))
    } else if let Some(status) = &state.status {
        let color = match status.kind {
            StatusKind::Error => Color::Red,
            StatusKind::Info => Color::Cyan,
        };
        Line::from(Span::styled(
            format!(" {}", status.text),
            Style::default().fg(color),
        ))
    } else {
        Line::default()
    };

    frame.render_widget(Paragraph::new(line), area);
}

fn draw_help(frame: &mut Frame, area: Rect) {
    let help = Line::from(Span::styled(
        " j/k move  space toggle  d delete  r reload  q quit",
        Style::default().fg(Color::DarkGray),
    ));
    frame.render_widget(Paragraph::new(help), area);
}
