#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControlTab {
    #[default]
    Countdown,
    Appearance,
}

impl ControlTab {
    pub const ALL: [Self; 2] = [Self::Countdown, Self::Appearance];

    pub fn label(self) -> &'static str {
        match self {
            ControlTab::Countdown => "Countdown",
            ControlTab::Appearance => "Appearance",
        }
    }
}

#[derive(Debug, Default)]
pub struct AppState {
    pub active_tab: ControlTab,
    /// Whether we've done the initial bounds sanitization on first frame
    pub geometry_sanitized: bool,
    /// Set once the overlay asked to close; the control window follows.
    pub overlay_closed: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}
