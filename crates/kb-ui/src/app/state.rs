//! Application mode and navigation state

/// Application mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppMode {
    /// Category cards
    #[default]
    Categories,
    /// Subcategory tree of one category
    Documents,
    /// A document is open
    Viewer,
    /// Help popup
    Help,
}

impl AppMode {
    /// Short label for the status bar
    pub fn label(&self) -> &'static str {
        match self {
            AppMode::Categories => "CATEGORIES",
            AppMode::Documents => "DOCUMENTS",
            AppMode::Viewer => "VIEW",
            AppMode::Help => "HELP",
        }
    }
}

/// Application state
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Current mode
    pub mode: AppMode,
    /// Mode to return to when help closes
    pub previous_mode: AppMode,
    /// Status message
    pub message: Option<String>,
    /// Should quit
    pub should_quit: bool,
    /// Selected category
    pub category_index: usize,
    /// Selected document within the category
    pub doc_index: usize,
    /// First visible line of the open document
    pub scroll: usize,
    /// Height of the document area at the last draw
    pub viewport_height: usize,
}

impl AppState {
    /// Create a new app state
    pub fn new() -> Self {
        Self::default()
    }

    /// Set status message
    pub fn set_message(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
    }

    /// Clear status message
    pub fn clear_message(&mut self) {
        self.message = None;
    }

    pub fn open_help(&mut self) {
        if self.mode != AppMode::Help {
            self.previous_mode = self.mode;
            self.mode = AppMode::Help;
        }
    }

    pub fn close_help(&mut self) {
        self.mode = self.previous_mode;
    }

    /// Lines moved by a page key
    pub fn page_size(&self) -> usize {
        (self.viewport_height / 2).max(1)
    }
}

/// Move an index one step within `len` items, clamped at both ends
pub(crate) fn step(index: usize, len: usize, forward: bool) -> usize {
    if len == 0 {
        0
    } else if forward {
        (index + 1).min(len - 1)
    } else {
        index.saturating_sub(1)
    }
}
