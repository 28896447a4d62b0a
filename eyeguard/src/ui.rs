use crate::app::{App, AppMode};
use eyeguard_core::view::format_hms;
use eyeguard_core::{StepKind, Switch};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Gauge, List, ListItem, Paragraph, Wrap},
    Frame,
};
use std::time::Duration;

pub fn draw(f: &mut Frame, app: &mut App, frame_time: Duration) {
    let area = f.area();

    if app.break_overlay.visible {
        draw_break_overlay(f, area, app);
    } else {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(7),
                Constraint::Length(9),
                Constraint::Min(1),
                Constraint::Length(3),
            ])
            .split(area);

        draw_header(f, chunks[0], app);
        draw_status(f, chunks[1], app);
        draw_settings(f, chunks[2], app);
        draw_toasts(f, chunks[3], app);
        draw_status_bar(f, chunks[4], app);

        match app.mode {
            AppMode::EditingWork => {
                draw_input_overlay(f, "Work duration (minutes)", &app.input_buffer, app)
            }
            AppMode::EditingBreak => {
                draw_input_overlay(f, "Break duration (minutes)", &app.input_buffer, app)
            }
            AppMode::ShowHelp => draw_help_overlay(f, app),
            AppMode::Normal => {}
        }
    }

    app.effect_manager
        .process_effects(frame_time.into(), f.buffer_mut(), area);
}

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.config.theme;
    let icons = &app.config.icons;
    let text = Line::from(vec![
        Span::raw(icons.header_left.clone()),
        Span::styled(
            "EYEGUARD",
            Style::default().fg(theme.blue).add_modifier(Modifier::BOLD),
        ),
        Span::raw(icons.header_right.clone()),
    ]);
    f.render_widget(
        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(theme.black)),
        ),
        area,
    );
}

fn protection_label(kind: StepKind, app: &App) -> (&'static str, Color) {
    let theme = &app.config.theme;
    match kind {
        StepKind::Off => ("Protection off", theme.gray),
        StepKind::Suspended => ("Protection suspended", theme.red),
        _ => ("Protection active", theme.green),
    }
}

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.config.theme;
    let status = &app.status;
    let time_str = match status.step_kind {
        StepKind::Off => "Time until break: ∞ : ∞ : ∞".to_string(),
        StepKind::Suspended => format!("Time until normal mode: {}", format_hms(status.remaining)),
        StepKind::Break => format!("On a break: {} left", format_hms(status.remaining)),
        _ => format!("Time until break: {}", format_hms(status.remaining)),
    };
    let (label, color) = protection_label(status.step_kind, app);

    let block = Block::default()
        .title(Span::styled(
            format!(" {} Status ", app.config.icons.for_step(status.step_kind)),
            Style::default().fg(theme.gray),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color));
    let inner_area = block.inner(area);
    f.render_widget(block, area);
    let v_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner_area);
    f.render_widget(
        Paragraph::new(time_str)
            .style(
                Style::default()
                    .fg(theme.foreground)
                    .add_modifier(Modifier::BOLD),
            )
            .alignment(Alignment::Center),
        v_chunks[0],
    );
    f.render_widget(
        Gauge::default()
            .gauge_style(Style::default().fg(theme.blue).bg(theme.black))
            .ratio(status.progress.clamp(0.0, 1.0)),
        v_chunks[1],
    );

    let mut line = vec![Span::styled(
        label,
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )];
    if let Some(at) = app.next_break_at {
        line.push(Span::styled(
            format!("  │  next break at {}", at.format("%H:%M")),
            Style::default().fg(theme.gray),
        ));
    }
    f.render_widget(
        Paragraph::new(Line::from(line)).alignment(Alignment::Center),
        v_chunks[2],
    );
}

fn switch_span(switch: Switch, app: &App) -> Span<'static> {
    let theme = &app.config.theme;
    match switch {
        Switch::On => Span::styled("on", Style::default().fg(theme.green)),
        Switch::Off => Span::styled("off", Style::default().fg(theme.red)),
    }
}

fn draw_settings(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.config.theme;
    let draft = &app.draft;
    let description = match app.settings_step {
        StepKind::Off => Span::styled("Protection off!", Style::default().fg(theme.gray)),
        StepKind::Suspended => {
            Span::styled("Protection suspended!", Style::default().fg(theme.red))
        }
        _ => Span::styled("cares about your vision", Style::default().fg(theme.green)),
    };

    let row = |key: &'static str, label: &'static str, value: Span<'static>| {
        Line::from(vec![
            Span::styled(format!(" {} ", key), Style::default().fg(theme.blue)),
            Span::styled(format!("{:<26}", label), Style::default().fg(theme.foreground)),
            value,
        ])
    };
    let value = |minutes: u32| Span::styled(minutes.to_string(), Style::default().fg(theme.yellow));

    let mut lines = vec![
        Line::from(description),
        row("w", "Work duration (minutes)", value(draft.work_duration_minutes)),
        row("r", "Break duration (minutes)", value(draft.break_duration_minutes)),
        row("p", "Protection status", switch_span(draft.protection_status, app)),
        row("m", "Sounds enabled", switch_span(draft.sounds, app)),
        row("n", "Notifications enabled", switch_span(draft.notifications, app)),
    ];
    if app.settings_dirty() {
        lines.push(Line::from(Span::styled(
            " unsaved changes, press a to apply",
            Style::default()
                .fg(theme.yellow)
                .add_modifier(Modifier::ITALIC),
        )));
    }

    f.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .title(Span::styled(" Settings ", Style::default().fg(theme.gray)))
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(theme.magenta)),
        ),
        area,
    );
}

fn draw_toasts(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.config.theme;
    let items: Vec<ListItem> = app
        .toasts
        .iter()
        .rev()
        .map(|toast| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!(" {} ", toast.title),
                    Style::default()
                        .fg(theme.background)
                        .bg(theme.yellow)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(" "),
                Span::styled(toast.message.clone(), Style::default().fg(theme.foreground)),
            ]))
        })
        .collect();
    f.render_widget(List::new(items), area);
}

fn draw_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.config.theme;
    let (mode_text, mode_color) = match app.mode {
        AppMode::Normal => ("NORMAL", theme.green),
        AppMode::EditingWork | AppMode::EditingBreak => ("EDIT", theme.yellow),
        AppMode::ShowHelp => ("HELP", theme.magenta),
    };
    let help = if app.mode == AppMode::Normal {
        "s:suspend │ b:break │ w/r:minutes │ n/m/p:toggle │ a:apply │ ?:help │ q:quit"
    } else {
        "enter:confirm │ esc:cancel"
    };
    f.render_widget(
        Paragraph::new(vec![
            Line::from(vec![
                Span::styled(
                    format!(" {} ", mode_text),
                    Style::default()
                        .bg(mode_color)
                        .fg(theme.background)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(" "),
                Span::styled(
                    format!(
                        "{} {}",
                        app.config.icons.for_step(app.status.step_kind),
                        app.status.tooltip
                    ),
                    Style::default().fg(theme.foreground),
                ),
            ]),
            Line::from(Span::raw(format!(" {}", help))),
        ])
        .block(Block::default().style(Style::default().bg(theme.black).fg(theme.gray))),
        area,
    );
}

fn draw_break_overlay(f: &mut Frame, area: Rect, app: &mut App) {
    if app.break_fade_pending {
        app.trigger_break_fade(area);
    }
    let theme = &app.config.theme;
    let overlay = &app.break_overlay;
    f.render_widget(Clear, area);
    let block = Block::default()
        .title(Span::styled(
            format!(" {} Break ", app.config.icons.break_time),
            Style::default().fg(theme.gray),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(theme.green))
        .style(Style::default().bg(theme.background));
    let inner_area = block.inner(area);
    f.render_widget(block, area);

    let centered = centered_rect(60, 40, inner_area);
    let v_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Min(1),
        ])
        .split(centered);
    f.render_widget(
        Paragraph::new("Time for a break")
            .style(Style::default().fg(theme.green).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center),
        v_chunks[0],
    );
    f.render_widget(
        Paragraph::new(format!(
            "Remaining break time: {}",
            format_hms(overlay.remaining)
        ))
        .style(Style::default().fg(theme.foreground))
        .alignment(Alignment::Center),
        v_chunks[1],
    );
    f.render_widget(
        Gauge::default()
            .gauge_style(Style::default().fg(theme.green).bg(theme.black))
            .ratio(overlay.progress.clamp(0.0, 1.0)),
        v_chunks[2],
    );
    f.render_widget(
        Paragraph::new("Look away from the screen and let your eyes rest.")
            .style(Style::default().fg(theme.gray))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        v_chunks[3],
    );
    f.render_widget(
        Paragraph::new("esc: end break early │ q: quit")
            .style(Style::default().fg(theme.gray))
            .alignment(Alignment::Center),
        v_chunks[4],
    );
}

fn draw_input_overlay(f: &mut Frame, title: &str, input: &str, app: &App) {
    let area = centered_rect(50, 20, f.area());
    f.render_widget(Clear, area);
    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.config.theme.yellow))
        .border_type(BorderType::Double)
        .style(Style::default().bg(app.config.theme.background));
    let inner_area = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("▸ ", Style::default().fg(app.config.theme.foreground)),
            Span::styled(input, Style::default().fg(app.config.theme.foreground)),
            Span::styled(
                &app.config.icons.input_cursor,
                Style::default()
                    .fg(app.config.theme.foreground)
                    .add_modifier(Modifier::SLOW_BLINK),
            ),
        ])),
        inner_area,
    );
}

fn draw_help_overlay(f: &mut Frame, app: &App) {
    let area = centered_rect(60, 70, f.area());
    f.render_widget(Clear, area);

    let shortcuts = [
        (
            "Protection",
            vec![
                ("s", "Suspend / resume protection"),
                ("b", "Take a break now"),
                ("esc", "End the break early"),
            ],
        ),
        (
            "Settings",
            vec![
                ("w", "Edit work duration"),
                ("r", "Edit break duration"),
                ("p", "Toggle protection status"),
                ("m", "Toggle sounds"),
                ("n", "Toggle notifications"),
                ("a", "Apply and save settings"),
            ],
        ),
        ("General", vec![("?", "Toggle help"), ("q", "Quit")]),
    ];

    let theme = &app.config.theme;
    let mut items = Vec::new();
    for (section, keys) in shortcuts.iter() {
        items.push(ListItem::new(Line::from(Span::styled(
            *section,
            Style::default().fg(theme.magenta).add_modifier(Modifier::BOLD),
        ))));
        for (key, action) in keys {
            items.push(ListItem::new(Line::from(vec![
                Span::styled(format!("  {:<5}", key), Style::default().fg(theme.blue)),
                Span::styled(*action, Style::default().fg(theme.foreground)),
            ])));
        }
    }
    f.render_widget(
        List::new(items).block(
            Block::default()
                .title(" Help ")
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(theme.magenta))
                .style(Style::default().bg(theme.background)),
        ),
        area,
    );
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
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
