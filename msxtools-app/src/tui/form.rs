use msxtools_core::{ConfigForm, ConfigRecord, Theme};

/// Fields in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Root,
    Database,
    Work,
    Temp,
    Download,
    Theme,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::Root,
        Field::Database,
        Field::Work,
        Field::Temp,
        Field::Download,
        Field::Theme,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Field::Root => "Root directory",
            Field::Database => "Database",
            Field::Work => "Work directory",
            Field::Temp => "Temp directory",
            Field::Download => "Download directory",
            Field::Theme => "Theme",
        }
    }

    pub fn hint(&self) -> &'static str {
        match self {
            Field::Root => "base for all other directories",
            Field::Theme => "←/→ to change",
            _ => "(relative to root)",
        }
    }
}

/// Editing state of the configuration form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub form: ConfigForm,
    pub focus: usize,
    pub first_run: bool,
    pub error: Option<String>,
}

impl FormState {
    pub fn new(record: &ConfigRecord, first_run: bool) -> Self {
        Self {
            form: ConfigForm::from(record),
            focus: 0,
            first_run,
            error: None,
        }
    }

    pub fn focused(&self) -> Field {
        Field::ALL[self.focus]
    }

    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Root => &self.form.root_directory,
            Field::Database => &self.form.database_directory,
            Field::Work => &self.form.work_directory,
            Field::Temp => &self.form.temp_directory,
            Field::Download => &self.form.download_directory,
            Field::Theme => &self.form.theme,
        }
    }

    fn text_mut(&mut self, field: Field) -> Option<&mut String> {
        match field {
            Field::Root => Some(&mut self.form.root_directory),
            Field::Database => Some(&mut self.form.database_directory),
            Field::Work => Some(&mut self.form.work_directory),
            Field::Temp => Some(&mut self.form.temp_directory),
            Field::Download => Some(&mut self.form.download_directory),
            Field::Theme => None,
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % Field::ALL.len();
    }

    pub fn focus_prev(&mut self) {
        self.focus = (self.focus + Field::ALL.len() - 1) % Field::ALL.len();
    }

    pub fn insert_char(&mut self, c: char) {
        if let Some(text) = self.text_mut(self.focused()) {
            text.push(c);
            self.error = None;
        }
    }

    pub fn backspace(&mut self) {
        if let Some(text) = self.text_mut(self.focused()) {
            text.pop();
            self.error = None;
        }
    }

    /// Only acts while the theme field has focus.
    pub fn cycle_theme(&mut self, forward: bool) {
        if self.focused() != Field::Theme {
            return;
        }
        let current: Theme = self.form.theme.parse().unwrap_or_default();
        let next = if forward { current.next() } else { current.prev() };
        self.form.theme = next.to_string();
    }

    pub fn theme(&self) -> Theme {
        self.form.theme.parse().unwrap_or_default()
    }
}
