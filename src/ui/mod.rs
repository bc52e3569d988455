mod entries;
mod helpers;
mod help;
mod projects;
mod report;
mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    prelude::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::app::{App, AppView};
use crate::core::{RANGE_PRESETS, format_duration};
use theme::Theme;

/// Renders the entire UI for a single frame.
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let (title, body_text) = match app.view {
        AppView::Report => (" Report ".to_string(), report::build_report_text(app)),
        AppView::Entries => (
            entries::build_entries_title(app),
            entries::build_entries_text(app),
        ),
        AppView::Projects => (" Projects ".to_string(), projects::build_projects_text(app)),
        AppView::Help => (" Help ".to_string(), help::build_help_text()),
    };

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(area);

    let header_lines = vec![Line::from(vec![
        Span::styled(
            "  Thyme  ",
            Style::default().fg(Color::Black).bg(Theme::primary()),
        ),
        Span::raw(" "),
        Span::styled(
            "time tracker",
            Style::default()
                .fg(Theme::secondary())
                .add_modifier(Modifier::BOLD),
        ),
    ])];
    let header = Paragraph::new(Text::from(header_lines))
        .alignment(Alignment::Left)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .style(Style::default().fg(Theme::secondary())),
        );
    frame.render_widget(header, layout[0]);

    let mut body_lines = vec![
        presets_line(app),
        Line::from(""),
        Line::from(vec![
            Span::styled(
                format!("  {title}"),
                Style::default()
                    .fg(Theme::accent())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  {}", app.range),
                Style::default().fg(Theme::dim()),
            ),
        ]),
        Line::from(""),
    ];
    body_lines.extend(body_text.lines);
    body_lines.push(Line::from(""));
    body_lines.push(Line::from(Span::styled(
        "----------------------------------------",
        Style::default().fg(Theme::dim()),
    )));
    body_lines.extend(keybinds_lines(app));
    let body = Paragraph::new(Text::from(body_lines))
        .style(Style::default().fg(Theme::text()))
        .alignment(Alignment::Left)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .style(Style::default().fg(Theme::secondary())),
        );
    frame.render_widget(body, layout[1]);

    let footer = Paragraph::new(Text::from(footer_line(app)))
        .alignment(Alignment::Left)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .style(Style::default().fg(Theme::secondary())),
        );
    frame.render_widget(footer, layout[2]);
}

fn presets_line(app: &App) -> Line<'_> {
    let mut spans = Vec::new();
    for (index, preset) in RANGE_PRESETS.iter().enumerate() {
        if index > 0 {
            spans.push(Span::raw("  "));
        }
        let style = if index == app.preset_index {
            Style::default()
                .fg(Color::Black)
                .bg(Theme::highlight())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Theme::dim())
        };
        spans.push(Span::styled(format!(" {} ", preset.label()), style));
    }
    Line::from(spans)
}

fn footer_line(app: &App) -> Line<'_> {
    if let Some(status) = &app.status {
        return Line::from(Span::styled(
            format!("! {status}"),
            Style::default()
                .fg(Theme::warn())
                .add_modifier(Modifier::BOLD),
        ));
    }

    let mut spans = vec![
        Span::styled("Total ", Style::default().fg(Theme::dim())),
        Span::styled(
            format_duration(app.filtered_total()),
            Style::default()
                .fg(Theme::accent())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {} entries", app.report.entry_count()),
            Style::default().fg(Theme::dim()),
        ),
    ];
    if app.filters.is_some() {
        spans.push(Span::styled(
            "  (filtered)",
            Style::default().fg(Theme::warn()),
        ));
    }
    Line::from(spans)
}

fn keybinds_lines(app: &App) -> Vec<Line<'static>> {
    let (primary, secondary) = match app.view {
        AppView::Report => (
            "Up/Down: Select  Enter: Entries  space: Include/Exclude  a: All",
            "Tab: Preset  Left/Right: Shift range  p: Projects  r: Reload  ?: Help  q: Quit",
        ),
        AppView::Entries => (
            "Up/Down: Select  Left/Right: Shift range",
            "esc: Back  r: Reload  ?: Help  q: Quit",
        ),
        AppView::Projects => (
            "Up/Down: Select  Tab: Preset  Left/Right: Shift range",
            "h: Report  esc: Back  r: Reload  ?: Help  q: Quit",
        ),
        AppView::Help => ("Press ? or esc to close this help screen", ""),
    };
    vec![
        Line::from(Span::styled(primary, Style::default().fg(Theme::dim()))),
        Line::from(Span::styled(secondary, Style::default().fg(Theme::dim()))),
    ]
}
