//! Display state that exports temporarily override.

use crate::render::Theme;

/// Theme and busy indicator of the report view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    theme: Theme,
    busy_label: Option<String>,
}

impl ViewState {
    /// Create a view state with the given theme.
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            busy_label: None,
        }
    }

    /// Active theme.
    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Change the theme.
    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    /// Label of the action in progress, if any.
    pub fn busy_label(&self) -> Option<&str> {
        self.busy_label.as_deref()
    }

    /// Force light rendering and show `label` until the guard is dropped.
    ///
    /// The previous theme and label come back on drop, whether the export
    /// finished, failed or was abandoned.
    pub fn export_guard(&mut self, label: impl Into<String>) -> ViewGuard<'_> {
        self.guard(label.into(), true)
    }

    /// Show `label` until the guard is dropped, keeping the active theme.
    pub fn busy_guard(&mut self, label: impl Into<String>) -> ViewGuard<'_> {
        self.guard(label.into(), false)
    }

    fn guard(&mut self, label: String, force_light: bool) -> ViewGuard<'_> {
        let saved_theme = self.theme;
        let saved_label = self.busy_label.replace(label);
        if force_light {
            self.theme = Theme::Light;
        }
        ViewGuard {
            view: self,
            saved_theme,
            saved_label,
        }
    }
}

/// Restores a [`ViewState`] when dropped.
#[derive(Debug)]
pub struct ViewGuard<'a> {
    view: &'a mut ViewState,
    saved_theme: Theme,
    saved_label: Option<String>,
}

impl ViewGuard<'_> {
    /// Theme in force while the guard lives.
    pub fn theme(&self) -> Theme {
        self.view.theme
    }

    /// Busy label in force while the guard lives.
    pub fn busy_label(&self) -> Option<&str> {
        self.view.busy_label()
    }
}

impl Drop for ViewGuard<'_> {
    fn drop(&mut self) {
        self.view.theme = self.saved_theme;
        self.view.busy_label = self.saved_label.take();
    }
}
