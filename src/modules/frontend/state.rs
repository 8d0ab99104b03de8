use crate::config::settings::AppConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    List,
    Form,
    Bulk,
}

impl View {
    pub const ALL: [View; 3] = [View::List, View::Form, View::Bulk];

    pub fn path(self) -> &'static str {
        match self {
            View::List => "/",
            View::Form => "/submit",
            View::Bulk => "/admin",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            View::List => "Releases",
            View::Form => "Add release",
            View::Bulk => "Bulk entry",
        }
    }
}

/// Per-request page state handed to the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub view: View,
    pub selected_year: i32,
    pub current_year: i32,
    pub start_year: i32,
}

impl ViewState {
    /// Falls back to the configured current year when `requested_year` is
    /// absent or not a four-digit year.
    pub fn new(config: &AppConfig, view: View, requested_year: Option<&str>) -> Self {
        let selected_year = requested_year
            .map(str::trim)
            .filter(|y| y.len() == 4)
            .and_then(|y| y.parse::<i32>().ok())
            .unwrap_or(config.current_year);

        Self {
            view,
            selected_year,
            current_year: config.current_year,
            start_year: config.start_year,
        }
    }

    /// Selector entries, newest first: next year down to the start year.
    /// A selected year outside that range is kept so the selector never lies.
    pub fn year_options(&self) -> Vec<i32> {
        let newest = self.current_year + 1;
        let oldest = self.start_year.min(newest);
        let mut years: Vec<i32> = (oldest..=newest).rev().collect();

        if !years.contains(&self.selected_year) {
            years.push(self.selected_year);
            years.sort_unstable_by(|a, b| b.cmp(a));
        }

        years
    }
}
