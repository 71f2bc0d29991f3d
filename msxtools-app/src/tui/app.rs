use crate::tui::{
    inputs::{map_event, Action},
    state::{transition, Event, Screen, Splash},
    theme::Palette,
    views,
};
use crossterm::{
    event::{self},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use msxtools_core::{ConfigRecord, ConfigService, Theme};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{stdout, Stdout};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;
use tracing::{info, warn};

pub struct TuiApp {
    service: ConfigService,
    rt: Arc<Runtime>,
    screen: Screen,
    theme: Theme,
    configured: bool,
    loaded: ConfigRecord,
}

impl TuiApp {
    /// Reads the startup state; storage errors surface here, before the terminal is taken over.
    pub fn new(service: ConfigService, rt: Arc<Runtime>, splash: Duration) -> anyhow::Result<Self> {
        let configured = rt.block_on(service.exists())?;
        let loaded = rt.block_on(service.load())?;
        let status = if configured { "Loading configuration..." } else { "First run detected..." };
        Ok(Self {
            service,
            rt,
            screen: Screen::Splash(Splash::new(splash, status)),
            theme: loaded.theme,
            configured,
            loaded,
        })
    }

    pub fn run(&mut self) -> anyhow::Result<()> {
        enable_raw_mode()?;
        let mut stdout = stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let res = self.mainloop(&mut terminal);

        disable_raw_mode().ok();
        let mut out: Stdout = std::io::stdout();
        execute!(out, LeaveAlternateScreen).ok();
        terminal.show_cursor().ok();

        res
    }

    fn mainloop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> anyhow::Result<()> {
        loop {
            if matches!(self.screen, Screen::Exit) {
                break;
            }
            let palette = Palette::for_theme(self.display_theme());
            terminal.draw(|f| {
                let area = f.size();
                views::draw_ui(f, area, &self.screen, &palette);
            })?;

            if let Screen::Splash(s) = &self.screen {
                if s.is_done() {
                    self.apply(Event::SplashDone {
                        configured: self.configured,
                        record: self.loaded.clone(),
                    });
                    continue;
                }
            }

            if event::poll(Duration::from_millis(50))? {
                let action = map_event(event::read()?);
                if let Some(ev) = self.handle(action) {
                    self.apply(ev);
                }
            }
        }
        Ok(())
    }

    /// The form previews its theme; other screens use the saved one.
    fn display_theme(&self) -> Theme {
        match &self.screen {
            Screen::FirstRunSetup(form) | Screen::Settings { form, .. } => form.theme(),
            _ => self.theme,
        }
    }

    fn apply(&mut self, ev: Event) {
        if let Event::Saved(record) = &ev {
            self.theme = record.theme;
        }
        let screen = std::mem::replace(&mut self.screen, Screen::Exit);
        self.screen = transition(screen, ev);
    }

    fn handle(&mut self, action: Action) -> Option<Event> {
        if action == Action::Quit {
            return Some(Event::Quit);
        }
        match &mut self.screen {
            Screen::Splash(_) | Screen::Exit => None,
            Screen::Main(_) => match action {
                Action::Char('s') => Some(Event::OpenSettings),
                Action::Char('q') | Action::Cancel => Some(Event::Cancel),
                _ => None,
            },
            Screen::FirstRunSetup(form) | Screen::Settings { form, .. } => match action {
                Action::Cancel => Some(Event::Cancel),
                Action::NextField | Action::Down => { form.focus_next(); None }
                Action::PrevField | Action::Up => { form.focus_prev(); None }
                Action::Left => { form.cycle_theme(false); None }
                Action::Right => { form.cycle_theme(true); None }
                Action::Char(c) => { form.insert_char(c); None }
                Action::Backspace => { form.backspace(); None }
                Action::Submit => match self.rt.block_on(self.service.save_form(&form.form)) {
                    Ok(record) => {
                        info!(first_run = form.first_run, "configuration saved from form");
                        Some(Event::Saved(record))
                    }
                    Err(e) => {
                        warn!(error = %e, "configuration not saved");
                        form.error = Some(e.to_string());
                        None
                    }
                },
                _ => None,
            },
        }
    }
}
