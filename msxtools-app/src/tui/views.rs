use crate::cli::commands::local_time;
use crate::tui::form::{Field, FormState};
use crate::tui::state::{Screen, Splash};
use crate::tui::theme::Palette;
use msxtools_core::{ConfigRecord, DirectoryKey};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn draw_ui(f: &mut Frame, area: Rect, screen: &Screen, p: &Palette) {
    f.render_widget(Block::default().style(p.base()), area);
    match screen {
        Screen::Splash(s) => draw_splash(f, area, s, p),
        Screen::FirstRunSetup(form) => draw_form(f, area, form, p),
        Screen::Settings { form, .. } => draw_form(f, area, form, p),
        Screen::Main(record) => draw_main(f, area, record, p),
        Screen::Exit => {}
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect {
        x: area.x + (area.width - w) / 2,
        y: area.y + (area.height - h) / 2,
        width: w,
        height: h,
    }
}

fn draw_splash(f: &mut Frame, area: Rect, splash: &Splash, p: &Palette) {
    let boxed = centered(area, 50, 11);
    let block = Block::default().borders(Borders::ALL).style(p.base());
    let inner = block.inner(boxed);
    f.render_widget(block, boxed);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(inner);

    f.render_widget(
        Paragraph::new("MSX TOOLS").style(p.title()).alignment(Alignment::Center),
        rows[1],
    );
    f.render_widget(
        Paragraph::new("Modular frontend").style(p.hint()).alignment(Alignment::Center),
        rows[2],
    );
    let gauge = Gauge::default()
        .gauge_style(p.selected())
        .ratio(splash.progress())
        .label("");
    f.render_widget(gauge, rows[4]);
    f.render_widget(
        Paragraph::new(splash.status).style(p.base()).alignment(Alignment::Center),
        rows[5],
    );
    f.render_widget(
        Paragraph::new(format!("v{VERSION}")).style(p.hint()).alignment(Alignment::Center),
        rows[7],
    );
}

fn draw_form(f: &mut Frame, area: Rect, state: &FormState, p: &Palette) {
    let title = if state.first_run { "Initial setup" } else { "Settings" };
    let outer = Block::default().title(title).borders(Borders::ALL).style(p.base());
    let inner = outer.inner(area);
    f.render_widget(outer, area);

    let mut lines = Vec::new();
    if state.first_run {
        lines.push(Line::from(Span::raw("Configure the system directories and preferences").style(p.hint())));
        lines.push(Line::from(""));
    }
    for (i, field) in Field::ALL.iter().enumerate() {
        let focused = i == state.focus;
        let label_style = if focused { p.selected() } else { p.title() };
        let marker = if focused { "> " } else { "  " };
        let value = match field {
            Field::Theme => format!("< {} >", state.value(*field)),
            _ if focused => format!("{}_", state.value(*field)),
            _ => state.value(*field).to_string(),
        };
        lines.push(Line::from(vec![
            Span::raw(marker).style(label_style),
            Span::raw(format!("{:<20}", field.label())).style(label_style),
            Span::raw(value).style(p.base()),
            Span::raw(format!("  {}", field.hint())).style(p.hint()),
        ]));
        lines.push(Line::from(""));
    }
    if let Some(err) = &state.error {
        lines.push(Line::from(Span::raw(err.clone()).style(p.error())));
    }

    let body = Rect { height: inner.height.saturating_sub(1), ..inner };
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), body);

    let cancel = if state.first_run { " Esc quit " } else { " Esc cancel " };
    let foot = Paragraph::new(Line::from(vec![
        Span::raw(" Tab/↑/↓ move  "),
        Span::raw(" ←/→ theme  "),
        Span::raw(" Enter save  "),
        Span::raw(cancel),
    ]))
    .style(p.footer());
    f.render_widget(foot, footer_row(inner));
}

fn draw_main(f: &mut Frame, area: Rect, record: &ConfigRecord, p: &Palette) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(30), Constraint::Min(0)])
        .split(area);
    draw_sidebar(f, chunks[0], p);
    draw_summary(f, chunks[1], record, p);
}

fn draw_sidebar(f: &mut Frame, area: Rect, p: &Palette) {
    let block = Block::default().borders(Borders::RIGHT).style(p.base());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let text = vec![
        Line::from(""),
        Line::from(Span::raw("MSX TOOLS").style(p.title())),
        Line::from(Span::raw("Modular frontend").style(p.hint())),
        Line::from(""),
        Line::from(Span::raw("Modules").style(p.selected())),
        Line::from(""),
        Line::from(Span::raw("No modules installed yet.").style(p.hint())),
        Line::from(Span::raw("Modules will show up here as they are developed.").style(p.hint())),
    ];
    f.render_widget(Paragraph::new(text).wrap(Wrap { trim: true }), inner);

    let foot = Paragraph::new(" s settings   q quit ").style(p.footer());
    f.render_widget(foot, footer_row(inner));
}

fn draw_summary(f: &mut Frame, area: Rect, record: &ConfigRecord, p: &Palette) {
    let block = Block::default().borders(Borders::NONE).style(p.base());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let row = |label: &str, value: String, extra: String| {
        Line::from(vec![
            Span::raw(format!("  {label:<18}")).style(p.title()),
            Span::raw(value).style(p.base()),
            Span::raw(extra).style(p.hint()),
        ])
    };
    let dir_row = |key: DirectoryKey| {
        row(
            key.label(),
            record.directory(key).to_string(),
            format!("  {}", record.resolve(key).display()),
        )
    };

    let lines = vec![
        Line::from(""),
        Line::from(Span::raw("Welcome to MSX Tools!").style(p.title())).alignment(Alignment::Center),
        Line::from(Span::raw("Modules will be added in future versions").style(p.hint()))
            .alignment(Alignment::Center),
        Line::from(""),
        Line::from(Span::raw("Current configuration").style(p.selected())),
        Line::from(""),
        row("Root", record.root_directory.clone(), String::new()),
        dir_row(DirectoryKey::Database),
        dir_row(DirectoryKey::Work),
        dir_row(DirectoryKey::Download),
        dir_row(DirectoryKey::Temp),
        row("Theme", capitalize(record.theme.as_str()), String::new()),
        row("Last saved", local_time(record.updated_at), String::new()),
    ];
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);

    let version = Paragraph::new(format!("Version {VERSION}"))
        .style(p.hint())
        .alignment(Alignment::Center);
    f.render_widget(version, footer_row(inner));
}

fn footer_row(area: Rect) -> Rect {
    Rect {
        x: area.x,
        y: area.y + area.height.saturating_sub(1),
        width: area.width,
        height: area.height.min(1),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
