//! Terminal-independent browser model: catalog navigation, viewer and theme

use super::state::{step, AppMode, AppState};
use crate::markdown::render_blocks;
use crate::theme::UiTheme;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use kb_core::catalog::{Catalog, Category, DocTreeGroup, DocTreeLeaf};
use kb_core::document::{DocumentLoader, DocumentSource, LoadOutcome, LOAD_FAILURE_MESSAGE};
use kb_core::export::MarkdownViewer;
use kb_core::theme::{Theme, ThemeContext, ThemeStore};
use kb_core::CopyKind;
use ratatui::text::Line;
use tracing::{debug, warn};

/// Everything the TUI shows, driven by key events
pub struct Browser {
    pub state: AppState,
    catalog: Catalog,
    source: Box<dyn DocumentSource>,
    loader: DocumentLoader,
    viewer: MarkdownViewer,
    theme: ThemeContext,
    store: Box<dyn ThemeStore>,
    ui_theme: UiTheme,
    tree: Vec<DocTreeGroup>,
    current_path: Option<String>,
    lines: Vec<Line<'static>>,
    show_tree: bool,
}

impl Browser {
    /// Build a browser; the theme preference is read from `store` once here
    pub fn new(
        catalog: Catalog,
        source: Box<dyn DocumentSource>,
        viewer: MarkdownViewer,
        store: Box<dyn ThemeStore>,
    ) -> Self {
        let theme = ThemeContext::load(store.as_ref());
        let mut browser = Self {
            state: AppState::new(),
            catalog,
            source,
            loader: DocumentLoader::new(),
            viewer,
            theme,
            store,
            ui_theme: UiTheme::new(theme.theme()),
            tree: Vec::new(),
            current_path: None,
            lines: Vec::new(),
            show_tree: true,
        };
        browser.apply_theme();
        browser
    }

    /// Builder: show the document tree beside the viewer
    pub fn with_tree_panel(mut self, show: bool) -> Self {
        self.show_tree = show;
        self
    }

    /// Builder: start with `theme` instead of the stored preference
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme.set(theme);
        self.apply_theme();
        self
    }

    pub fn show_tree(&self) -> bool {
        self.show_tree
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn theme(&self) -> Theme {
        self.theme.theme()
    }

    pub fn ui_theme(&self) -> &UiTheme {
        &self.ui_theme
    }

    pub fn viewer(&self) -> &MarkdownViewer {
        &self.viewer
    }

    /// Rendered lines of the open document
    pub fn lines(&self) -> &[Line<'static>] {
        &self.lines
    }

    pub fn current_path(&self) -> Option<&str> {
        self.current_path.as_deref()
    }

    pub fn selected_category(&self) -> Option<&Category> {
        self.catalog.categories.get(self.state.category_index)
    }

    /// Subcategory groups of the selected category
    pub fn tree(&self) -> &[DocTreeGroup] {
        &self.tree
    }

    /// Documents of the selected category in tree order
    pub fn leaves(&self) -> Vec<&DocTreeLeaf> {
        self.tree.iter().flat_map(|g| g.children.iter()).collect()
    }

    /// Title of the open document, from the catalog when known
    pub fn document_title(&self) -> String {
        match &self.current_path {
            Some(path) => self
                .catalog
                .find_by_path(path)
                .map(|d| d.title.clone())
                .unwrap_or_else(|| path.clone()),
            None => String::new(),
        }
    }

    /// Handle one key press
    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.state.mode == AppMode::Help {
            self.state.close_help();
            return;
        }

        match key.code {
            KeyCode::Char('q') => {
                self.state.should_quit = true;
                return;
            }
            KeyCode::Char('?') => {
                self.state.open_help();
                return;
            }
            KeyCode::Char('t') => {
                self.toggle_theme();
                return;
            }
            _ => {}
        }

        match self.state.mode {
            AppMode::Categories => self.handle_categories_key(key),
            AppMode::Documents => self.handle_documents_key(key),
            AppMode::Viewer => self.handle_viewer_key(key),
            AppMode::Help => {}
        }
    }

    fn handle_categories_key(&mut self, key: KeyEvent) {
        let len = self.catalog.categories.len();
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.state.category_index = step(self.state.category_index, len, true)
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.state.category_index = step(self.state.category_index, len, false)
            }
            KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => self.enter_category(),
            _ => {}
        }
    }

    fn handle_documents_key(&mut self, key: KeyEvent) {
        let len = self.leaves().len();
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.state.doc_index = step(self.state.doc_index, len, true)
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.state.doc_index = step(self.state.doc_index, len, false)
            }
            KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => self.open_selected(),
            KeyCode::Esc | KeyCode::Char('h') | KeyCode::Left | KeyCode::Backspace => {
                self.state.mode = AppMode::Categories
            }
            _ => {}
        }
    }

    fn handle_viewer_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.scroll_by(1, true),
            KeyCode::Char('k') | KeyCode::Up => self.scroll_by(1, false),
            KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.scroll_by(self.state.page_size(), true)
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.scroll_by(self.state.page_size(), false)
            }
            KeyCode::PageDown => self.scroll_by(self.state.page_size(), true),
            KeyCode::PageUp => self.scroll_by(self.state.page_size(), false),
            KeyCode::Char('g') | KeyCode::Home => self.state.scroll = 0,
            KeyCode::Char('G') | KeyCode::End => self.state.scroll = self.max_scroll(),

            KeyCode::Char('o') => self.copy(CopyKind::Original),
            KeyCode::Char('p') => self.copy(CopyKind::Plain),
            KeyCode::Char('y') => self.copy(CopyKind::FormattedHtml),

            KeyCode::Char('n') => self.open_adjacent(true),
            KeyCode::Char('N') => self.open_adjacent(false),

            KeyCode::Esc | KeyCode::Char('h') | KeyCode::Left | KeyCode::Backspace => {
                self.state.mode = AppMode::Documents
            }
            _ => {}
        }
    }

    fn enter_category(&mut self) {
        let Some(category) = self.selected_category() else {
            return;
        };
        let key = category.key.clone();
        let title = category.title.clone();
        self.tree = self.catalog.tree(&key);
        self.state.doc_index = 0;
        if self.tree.is_empty() {
            self.state.set_message(format!("No documents in {}", title));
        } else {
            self.state.clear_message();
            self.state.mode = AppMode::Documents;
        }
    }

    fn open_selected(&mut self) {
        let path = self
            .leaves()
            .get(self.state.doc_index)
            .map(|leaf| leaf.key.clone());
        if let Some(path) = path {
            self.open(&path);
        }
    }

    fn open_adjacent(&mut self, forward: bool) {
        let len = self.leaves().len();
        let next = step(self.state.doc_index, len, forward);
        if next != self.state.doc_index {
            self.state.doc_index = next;
            self.open_selected();
        }
    }

    /// Load `path` and show it in the viewer
    pub fn open(&mut self, path: &str) {
        let outcome = self.loader.load(self.source.as_ref(), path);
        match &outcome {
            LoadOutcome::Loaded { .. } => self.state.clear_message(),
            LoadOutcome::Failed { error, .. } => {
                self.state
                    .set_message(format!("{} ({})", LOAD_FAILURE_MESSAGE, error))
            }
            LoadOutcome::Stale => return,
        }
        if let Some(document) = outcome.document() {
            debug!("Showing {} ({} bytes)", path, document.len());
            self.viewer.set_document(document.clone());
            self.current_path = Some(path.to_string());
            self.state.scroll = 0;
            self.state.mode = AppMode::Viewer;
            self.refresh_lines();
        }
    }

    /// Copy the open document and report the outcome in the status bar
    pub fn copy(&mut self, kind: CopyKind) {
        let result = self.viewer.copy(kind);
        let message = self
            .viewer
            .last_outcome()
            .map(|o| o.message().to_string())
            .unwrap_or_default();
        match result {
            Ok(()) => self.state.set_message(message),
            Err(e) => self.state.set_message(format!("{}: {}", message, e)),
        }
    }

    /// Flip the theme, persist it and re-render
    pub fn toggle_theme(&mut self) {
        match self.theme.toggle_and_save(self.store.as_mut()) {
            Ok(theme) => self.state.set_message(format!("Theme: {}", theme)),
            Err(e) => {
                warn!("Failed to save theme preference: {}", e);
                self.state
                    .set_message(format!("Theme: {} (not saved)", self.theme.theme()));
            }
        }
        self.apply_theme();
    }

    fn apply_theme(&mut self) {
        let theme = self.theme.theme();
        self.ui_theme = UiTheme::new(theme);
        self.viewer.set_palette(theme.code_palette());
        self.refresh_lines();
    }

    fn refresh_lines(&mut self) {
        self.lines = render_blocks(
            self.viewer.output().blocks(),
            &self.ui_theme,
            self.viewer.palette(),
        );
    }

    fn max_scroll(&self) -> usize {
        self.lines.len().saturating_sub(1)
    }

    fn scroll_by(&mut self, amount: usize, forward: bool) {
        self.state.scroll = if forward {
            (self.state.scroll + amount).min(self.max_scroll())
        } else {
            self.state.scroll.saturating_sub(amount)
        };
    }
}
