//! Application structure and drawing

mod browser;
mod state;

pub use browser::Browser;
pub use state::{AppMode, AppState};

use crate::events::{self, Event};
use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::*, widgets::*};
use std::io::{self, Stdout};
use std::time::Duration;

/// Rows taken by the title bar, status bar and content borders
const CHROME_HEIGHT: u16 = 4;

/// Main application
pub struct App {
    /// Browser model
    pub browser: Browser,
    /// Terminal
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl App {
    /// Take over the terminal and show `browser`
    pub fn new(browser: Browser) -> Result<Self> {
        // Install panic hook to restore terminal on panic
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
            original_hook(panic_info);
        }));

        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self { browser, terminal })
    }

    /// Run the main application loop
    pub fn run(&mut self) -> Result<()> {
        loop {
            self.draw()?;

            match events::next(Duration::from_millis(100))? {
                Event::Input(key) => self.browser.handle_key(key),
                Event::Resize(_, height) => {
                    self.browser.state.viewport_height = height.saturating_sub(CHROME_HEIGHT) as usize
                }
                Event::Tick => {}
            }

            if self.browser.state.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn draw(&mut self) -> Result<()> {
        let size = self.terminal.size()?;
        self.browser.state.viewport_height = size.height.saturating_sub(CHROME_HEIGHT) as usize;

        let browser = &self.browser;
        self.terminal.draw(|frame| render(frame, browser))?;
        Ok(())
    }
}

impl Drop for App {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture);
        let _ = self.terminal.show_cursor();
    }
}

// Render functions

/// Draw the whole screen
pub fn render(frame: &mut Frame, browser: &Browser) {
    let area = frame.area();
    let theme = browser.ui_theme();
    frame.render_widget(Block::default().style(theme.base()), area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(3), Constraint::Length(1)])
        .split(area);

    render_title_bar(frame, chunks[0], browser);

    let mode = match browser.state.mode {
        AppMode::Help => browser.state.previous_mode,
        mode => mode,
    };
    match mode {
        AppMode::Categories | AppMode::Help => render_categories(frame, chunks[1], browser),
        AppMode::Documents => render_documents(frame, chunks[1], browser, true),
        AppMode::Viewer => {
            if browser.show_tree() && !browser.tree().is_empty() {
                let cols = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
                    .split(chunks[1]);
                render_documents(frame, cols[0], browser, false);
                render_viewer(frame, cols[1], browser);
            } else {
                render_viewer(frame, chunks[1], browser);
            }
        }
    }

    render_status_bar(frame, chunks[2], browser);

    if browser.state.mode == AppMode::Help {
        render_help(frame, area, browser);
    }
}

fn render_title_bar(frame: &mut Frame, area: Rect, browser: &Browser) {
    let theme = browser.ui_theme();
    let mut title = " kbase".to_string();
    if browser.state.mode != AppMode::Categories {
        if let Some(category) = browser.selected_category() {
            title.push_str(&format!(" › {}", category.title));
        }
    }
    if browser.state.mode == AppMode::Viewer {
        title.push_str(&format!(" › {}", browser.document_title()));
    }

    frame.render_widget(
        Paragraph::new(title).style(
            Style::default()
                .bg(theme.header)
                .fg(theme.text)
                .add_modifier(Modifier::BOLD),
        ),
        area,
    );
}

fn panel<'a>(title: &'a str, focused: bool, browser: &Browser) -> Block<'a> {
    let theme = browser.ui_theme();
    let border = if focused { theme.focus_border } else { theme.border };
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .style(theme.base())
}

fn render_categories(frame: &mut Frame, area: Rect, browser: &Browser) {
    let theme = browser.ui_theme();
    let items: Vec<ListItem> = browser
        .catalog()
        .categories
        .iter()
        .map(|category| {
            let accent = category
                .rgb()
                .map(|(r, g, b)| Color::Rgb(r, g, b))
                .unwrap_or(theme.accent);
            let count = browser.catalog().docs_in(&category.key).len();
            ListItem::new(vec![
                Line::from(vec![
                    Span::styled("▌ ", Style::default().fg(accent)),
                    Span::styled(category.title.clone(), Style::default().add_modifier(Modifier::BOLD)),
                    Span::styled(format!("  ({})", count), Style::default().fg(theme.muted)),
                ]),
                Line::from(Span::styled(
                    format!("  {}", category.description),
                    Style::default().fg(theme.muted),
                )),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(panel("Categories", true, browser))
        .highlight_style(theme.selected());
    let mut state = ListState::default().with_selected(Some(browser.state.category_index));
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_documents(frame: &mut Frame, area: Rect, browser: &Browser, focused: bool) {
    let theme = browser.ui_theme();
    let mut items = Vec::new();
    let mut selected = None;
    let mut leaf_index = 0;

    for group in browser.tree() {
        items.push(ListItem::new(Line::from(Span::styled(
            group.title.clone(),
            Style::default().fg(theme.muted).add_modifier(Modifier::BOLD),
        ))));
        for leaf in &group.children {
            if leaf_index == browser.state.doc_index {
                selected = Some(items.len());
            }
            let marker = if browser.current_path() == Some(leaf.key.as_str()) {
                "● "
            } else {
                "  "
            };
            items.push(ListItem::new(format!("{}{}", marker, leaf.title)));
            leaf_index += 1;
        }
    }

    let list = List::new(items)
        .block(panel("Documents", focused, browser))
        .highlight_style(theme.selected());
    let mut state = ListState::default().with_selected(selected);
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_viewer(frame: &mut Frame, area: Rect, browser: &Browser) {
    let title = browser.document_title();
    let paragraph = Paragraph::new(browser.lines().to_vec())
        .block(panel(&title, true, browser))
        .wrap(Wrap { trim: false })
        .scroll((browser.state.scroll.min(u16::MAX as usize) as u16, 0));
    frame.render_widget(paragraph, area);
}

fn render_status_bar(frame: &mut Frame, area: Rect, browser: &Browser) {
    let state = &browser.state;
    let text = state.message.clone().unwrap_or_else(|| match state.mode {
        AppMode::Viewer => format!(
            " {} | L{}/{} | {} | clipboard: {} ",
            state.mode.label(),
            state.scroll + 1,
            browser.lines().len(),
            browser.theme(),
            browser.viewer().clipboard_name()
        ),
        mode => format!(" {} | {} | ? for help ", mode.label(), browser.theme()),
    });

    frame.render_widget(
        Paragraph::new(text).style(Style::default().bg(Color::DarkGray).fg(Color::White)),
        area,
    );
}

fn render_help(frame: &mut Frame, area: Rect, browser: &Browser) {
    let heading = Style::default().fg(Color::Yellow);
    let text = vec![
        Line::from(Span::styled("kbase - Knowledge Base", Style::default().add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from(Span::styled("Navigation", heading)),
        Line::from("  j/k         Move down/up"),
        Line::from("  Enter/l     Open"),
        Line::from("  Esc/h       Back"),
        Line::from("  g/G         Go to top/bottom"),
        Line::from("  Ctrl-u/d    Page up/down"),
        Line::from("  n/N         Next/Previous document"),
        Line::from(""),
        Line::from(Span::styled("Copy", heading)),
        Line::from("  o           Original markdown"),
        Line::from("  p           Plain text"),
        Line::from("  y           Formatted HTML"),
        Line::from(""),
        Line::from(Span::styled("Other", heading)),
        Line::from("  t           Toggle light/dark theme"),
        Line::from("  q           Quit"),
        Line::from("  ?           Show this help"),
        Line::from(""),
        Line::from(Span::styled("Press any key to close", Style::default().fg(Color::DarkGray))),
    ];

    let help_area = centered_rect(50, 70, area);
    frame.render_widget(Clear, help_area);
    frame.render_widget(
        Paragraph::new(text).block(
            Block::default()
                .title("Help")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(browser.ui_theme().focus_border)),
        ),
        help_area,
    );
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup = Layout::default()
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
        .split(popup[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use kb_core::catalog::Catalog;
    use kb_core::document::MemorySource;
    use kb_core::export::{MarkdownViewer, MemoryClipboard};
    use kb_core::theme::MemoryThemeStore;
    use ratatui::backend::TestBackend;

    fn screen(browser: &Browser) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|frame| render(frame, browser)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn browser() -> Browser {
        let catalog = Catalog::builtin().unwrap();
        let path = catalog.docs[0].path.clone();
        let source = MemorySource::new().with(path, "# Hello\n\nWorld");
        let viewer = MarkdownViewer::new(Box::new(MemoryClipboard::new()));
        Browser::new(catalog, Box::new(source), viewer, Box::new(MemoryThemeStore::new()))
    }

    #[test]
    fn test_render_categories() {
        let b = browser();
        let text = screen(&b);
        assert!(text.contains("kbase"));
        assert!(text.contains("Categories"));
        assert!(text.contains(&b.catalog().categories[0].title));
    }

    #[test]
    fn test_render_viewer_and_help() {
        let mut b = browser();
        let path = b.catalog().docs[0].path.clone();
        b.open(&path);
        let text = screen(&b);
        assert!(text.contains("# Hello"));
        assert!(text.contains("World"));

        b.handle_key(KeyEvent::new(KeyCode::Char('?'), KeyModifiers::NONE));
        assert!(screen(&b).contains("Knowledge Base"));
    }

    #[test]
    fn test_centered_rect_is_inside() {
        let area = Rect::new(0, 0, 100, 40);
        let popup = centered_rect(50, 50, area);
        assert_eq!(popup.width, 50);
        assert_eq!(popup.height, 20);
        assert_eq!(popup.x, 25);
    }
}
