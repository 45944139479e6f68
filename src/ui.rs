use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

use crate::app::{format_wealth, App, Screen};
use crate::course::{ActId, Level};
use crate::progress::{AttemptPhase, LevelStatus, SaveSlot};

fn act_color(act: ActId) -> Color {
    match act {
        1 => Color::Magenta,
        2 => Color::LightBlue,
        3 => Color::LightGreen,
        4 => Color::LightYellow,
        _ => Color::White,
    }
}

pub fn draw<S: SaveSlot>(f: &mut Frame, app: &App<S>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(10)])
        .split(f.area());

    draw_header(f, app, chunks[0]);

    match (app.screen, app.current_level()) {
        (Screen::Level, Some(level)) => draw_level(f, app, level, chunks[1]),
        _ => draw_map(f, app, chunks[1]),
    }
}

fn draw_header<S: SaveSlot>(f: &mut Frame, app: &App<S>, area: Rect) {
    let state = app.store.state();
    let header = Line::from(vec![
        Span::styled(
            " MONEY QUEST ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(
            format!(
                " 🏆 {}/{} ",
                state.completed_levels().len(),
                app.store.catalog().total_levels()
            ),
            Style::default().fg(Color::White).bg(Color::DarkGray),
        ),
        Span::raw("  "),
        Span::styled(
            format!(" 💎 {} ", format_wealth(state.wealth())),
            Style::default().fg(Color::Yellow),
        ),
    ]);
    f.render_widget(
        Paragraph::new(header).block(Block::default().borders(Borders::BOTTOM)),
        area,
    );
}

fn draw_map<S: SaveSlot>(f: &mut Frame, app: &App<S>, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(4)])
        .split(area);

    let catalog = app.store.catalog();
    let mut lines = Vec::new();
    let mut cursor_line: u16 = 0;
    for act in catalog.acts() {
        let color = act_color(act.id);
        lines.push(Line::from(vec![
            Span::styled(
                format!(" ACT {} // {} ", act.id, act.name),
                Style::default()
                    .fg(Color::Black)
                    .bg(color)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("  {}", act.subtitle), Style::default().fg(color)),
        ]));

        for level in catalog.levels_in_act(act.id) {
            let selected = level.id() as usize == app.map_cursor + 1;
            let (icon, style) = match app.store.status(level.id()) {
                LevelStatus::Completed => ("✓", Style::default().fg(Color::Green)),
                LevelStatus::Available => (
                    "▶",
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                ),
                LevelStatus::Locked => ("🔒", Style::default().fg(Color::DarkGray)),
            };
            let style = if selected {
                cursor_line = lines.len() as u16;
                style.bg(Color::DarkGray)
            } else {
                style
            };
            lines.push(Line::from(Span::styled(
                format!(
                    "  {} {:>2}. {} {}  {}",
                    icon, level.id(), level.meta.emoji, level.meta.title, level.meta.description
                ),
                style,
            )));
        }
        lines.push(Line::raw(""));
    }

    // Keep the cursor visible on short terminals
    let visible = chunks[0].height.saturating_sub(2);
    let scroll = cursor_line.saturating_sub(visible.saturating_sub(1));

    let map = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" World Map "))
        .scroll((scroll, 0));
    f.render_widget(map, chunks[0]);

    let footer_text = if app.message.is_empty() {
        "↑/↓ select  •  ENTER play  •  r reset  •  q quit".to_string()
    } else {
        app.message.clone()
    };
    let footer_style = if app.message.is_empty() {
        Style::default().fg(Color::DarkGray)
    } else {
        app.message_style
    };
    let title = if app.screen == Screen::ConfirmReset {
        " Reset "
    } else {
        " Messages "
    };
    let footer = Paragraph::new(footer_text)
        .style(footer_style)
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: false });
    f.render_widget(footer, chunks[1]);
}

fn draw_level<S: SaveSlot>(f: &mut Frame, app: &App<S>, level: &Level, area: Rect) {
    let catalog = app.store.catalog();
    let total = catalog.total_levels();
    let color = act_color(level.act());
    let act_name = catalog.act(level.act()).map(|a| a.name.as_str()).unwrap_or("");

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(1),
            Constraint::Min(8),
        ])
        .split(area);

    let already = app.store.state().is_completed(level.id())
        && !matches!(app.attempt.map(|a| a.phase()), Some(AttemptPhase::Completed));
    let mut title_spans = vec![
        Span::styled(
            format!("{} {}", level.meta.emoji, level.meta.title.to_uppercase()),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
    ];
    if already {
        title_spans.push(Span::styled("   ALREADY COMPLETED", Style::default().fg(color)));
    }
    let heading = Paragraph::new(vec![
        Line::from(vec![
            Span::styled(
                format!("ACT {} // {}", level.act(), act_name),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("    LEVEL {} OF {}    [Esc: back to map]", level.id(), total),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        Line::from(title_spans),
        Line::from(Span::styled(
            level.meta.description.as_str(),
            Style::default().fg(Color::Gray),
        )),
    ]);
    f.render_widget(heading, chunks[0]);

    let ratio = (level.id() as f64 / total as f64).clamp(0.0, 1.0);
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(color))
        .ratio(ratio)
        .label(format!("{}/{}", level.id(), total));
    f.render_widget(gauge, chunks[1]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[2]);

    let mut article = Vec::new();
    if let Some(url) = &level.content.video_url {
        article.push(Line::from(Span::styled(
            format!("▶ Video: {url}"),
            Style::default().fg(color),
        )));
        article.push(Line::raw(""));
    }
    article.extend(level.content.article.lines().map(|line| {
        if let Some(heading) = line.strip_prefix("## ") {
            Line::from(Span::styled(
                heading.to_uppercase(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ))
        } else {
            Line::raw(line)
        }
    }));
    let article = Paragraph::new(article)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Lesson [PgUp/PgDn] "),
        )
        .wrap(Wrap { trim: false })
        .scroll((app.article_scroll, 0));
    f.render_widget(article, body[0]);

    draw_quiz(f, app, level, color, body[1]);
}

fn draw_quiz<S: SaveSlot>(f: &mut Frame, app: &App<S>, level: &Level, color: Color, area: Rect) {
    let phase = app.attempt.map(|a| a.phase());
    let mut lines = vec![
        Line::from(Span::styled(
            level.quiz.question.as_str(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::ITALIC),
        )),
        Line::raw(""),
    ];

    for (i, option) in level.quiz.options.iter().enumerate() {
        let style = match phase {
            Some(AttemptPhase::WrongAnswer(wrong)) if wrong == i => Style::default().fg(Color::Red),
            Some(AttemptPhase::Completed) if option.correct => {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            }
            Some(AttemptPhase::Completed) => Style::default().fg(Color::DarkGray),
            _ => Style::default(),
        };
        lines.push(Line::from(vec![
            Span::styled(format!("[{}] ", i + 1), Style::default().fg(color)),
            Span::styled(option.text.as_str(), style),
        ]));
    }

    if !app.message.is_empty() {
        lines.push(Line::raw(""));
        for line in app.message.lines() {
            lines.push(Line::from(Span::styled(line.to_string(), app.message_style)));
        }
    }

    let quiz = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color))
                .title(" Quest Challenge "),
        )
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: false });
    f.render_widget(quiz, area);
}
