use crate::tui::form::FormState;
use msxtools_core::ConfigRecord;
use std::time::{Duration, Instant};

pub const SPLASH_DURATION: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Splash {
    started: Instant,
    duration: Duration,
    pub status: &'static str,
}

impl Splash {
    pub fn new(duration: Duration, status: &'static str) -> Self {
        Self { started: Instant::now(), duration, status }
    }

    /// Fraction of the splash time elapsed, in `0.0..=1.0`.
    pub fn progress(&self) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.started.elapsed().as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    pub fn is_done(&self) -> bool {
        self.progress() >= 1.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Splash(Splash),
    FirstRunSetup(FormState),
    Main(ConfigRecord),
    Settings { form: FormState, current: ConfigRecord },
    Exit,
}

#[derive(Debug, Clone)]
pub enum Event {
    /// The splash finished; `configured` says whether a record was already saved.
    SplashDone { configured: bool, record: ConfigRecord },
    Saved(ConfigRecord),
    OpenSettings,
    Cancel,
    Quit,
}

/// Screen transition table. Pairs not listed leave the screen as it is.
pub fn transition(screen: Screen, event: Event) -> Screen {
    match (screen, event) {
        (_, Event::Quit) => Screen::Exit,

        (Screen::Splash(_), Event::SplashDone { configured: false, record }) => {
            Screen::FirstRunSetup(FormState::new(&record, true))
        }
        (Screen::Splash(_), Event::SplashDone { configured: true, record }) => Screen::Main(record),

        (Screen::FirstRunSetup(_), Event::Saved(record)) => Screen::Main(record),
        (Screen::FirstRunSetup(_), Event::Cancel) => Screen::Exit,

        (Screen::Main(record), Event::OpenSettings) => Screen::Settings {
            form: FormState::new(&record, false),
            current: record,
        },
        (Screen::Main(_), Event::Cancel) => Screen::Exit,

        (Screen::Settings { .. }, Event::Saved(record)) => Screen::Main(record),
        (Screen::Settings { current, .. }, Event::Cancel) => Screen::Main(current),

        (screen, _) => screen,
    }
}
