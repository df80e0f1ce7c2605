pub mod debounce;
pub mod requests;
pub mod setup;

use crossterm::{
    cursor, event::{self, Event, KeyCode, KeyEvent},
    execute, queue, style::{Color, Print, SetBackgroundColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use log::{debug, warn};

use crate::api::{ApiError, ClipClient};
use crate::config::{Config, DEFAULT_API_BASE_URL};
use crate::models::{SearchResult, ThumbItem};
use debounce::QueryDebouncer;
use requests::{DetailController, GifController, SearchController};

// Layout constants
struct Layout;

impl Layout {
    const MARGIN_X: u16 = 1;  // Horizontal margin (left/right)
    const MARGIN_Y: u16 = 1;  // Vertical margin (top/bottom)
    const HEADER_HEIGHT: u16 = 3;
    const STATUS_BAR_LINES: u16 = 3;
}

// Dracula theme colors
struct DraculaTheme;

impl DraculaTheme {
    const BG: Color = Color::Rgb { r: 40, g: 42, b: 54 };
    const FG: Color = Color::Rgb { r: 248, g: 248, b: 242 };
    const FG_DIM: Color = Color::Rgb { r: 189, g: 191, b: 186 };
    const CYAN: Color = Color::Rgb { r: 139, g: 233, b: 253 };
    const GREEN: Color = Color::Rgb { r: 80, g: 250, b: 123 };
    const PINK: Color = Color::Rgb { r: 255, g: 121, b: 198 };
    const PURPLE: Color = Color::Rgb { r: 189, g: 147, b: 249 };
    const YELLOW: Color = Color::Rgb { r: 241, g: 250, b: 140 };
}

#[derive(Clone, Copy, PartialEq, Debug)]
enum Panel {
    Search,
    Results,
}

/// Which screen is rendered. Purely a function of the selection: no
/// selection means the grid, a selection means the detail view, never both.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum View {
    Grid,
    Detail,
}

pub fn view_for(selection: Option<&SearchResult>) -> View {
    if selection.is_some() {
        View::Detail
    } else {
        View::Grid
    }
}

// Precomputed marquee for scrolling status bar
struct MarqueeCache {
    chars: Vec<char>,
    offset: usize,
}

impl MarqueeCache {
    fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            offset: 0,
        }
    }

    fn advance(&mut self) {
        self.offset = (self.offset + 1) % self.chars.len();
    }

    fn render(&self, width: usize) -> String {
        if self.chars.is_empty() {
            return String::new();
        }

        self.chars.iter()
            .cycle()
            .skip(self.offset)
            .take(width)
            .collect()
    }
}

pub struct App {
    config: Config,
    client: Option<ClipClient>,
    base_url: String,
    query: String,
    debouncer: QueryDebouncer,
    search: SearchController,
    detail: DetailController,
    gif: GifController,
    results: Vec<SearchResult>,
    selection: Option<SearchResult>,
    thumbs: Vec<ThumbItem>,
    cursor_index: usize,
    scroll_offset: usize,
    active_panel: Panel,
    status_message: String,
    spinner_frame: u8,
    frame_counter: u8,
    marquee_cache: MarqueeCache,
    cached_height: u16,
}

impl App {
    pub fn new(config: Config) -> Self {
        let client = config.api_base_url.as_deref().map(ClipClient::new);
        let base_url = client
            .as_ref()
            .map(|c| c.base_url().to_string())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        let debouncer = QueryDebouncer::new(Duration::from_millis(config.debounce_ms));

        Self {
            config,
            client,
            base_url,
            query: String::new(),
            debouncer,
            search: SearchController::new(),
            detail: DetailController::new(),
            gif: GifController::new(),
            results: Vec::new(),
            selection: None,
            thumbs: Vec::new(),
            cursor_index: 0,
            scroll_offset: 0,
            active_panel: Panel::Search,
            status_message: "Ready".to_string(),
            spinner_frame: 0,
            frame_counter: 0,
            marquee_cache: MarqueeCache::new("+++ cliptui - every quote, every frame. Type to search, Enter to open a clip, g to grab the GIF +++    +++"),
            cached_height: 0,
        }
    }

    pub fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        execute!(
            stdout,
            terminal::LeaveAlternateScreen,
            cursor::Show
        )?;
        terminal::disable_raw_mode()?;

        result
    }

    fn main_loop(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        loop {
            self.tick();
            self.draw()?;

            self.frame_counter = self.frame_counter.wrapping_add(1);
            if self.frame_counter % 3 == 0 {
                self.update_animation();
            }

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if !self.handle_key(key) {
                        break;
                    }
                }
            }
        }

        // Teardown: a pending commit must not outlive the view.
        self.debouncer.cancel();

        Ok(())
    }

    /// One pass of the transition function: drain the debouncer and every
    /// request controller, applying whatever settled since the last pass.
    fn tick(&mut self) {
        if let Some(committed) = self.debouncer.poll() {
            self.commit_query(&committed);
        }
        if let Some(outcome) = self.search.poll() {
            self.apply_search_outcome(outcome);
        }
        if let Some(outcome) = self.detail.poll() {
            self.apply_detail_outcome(outcome);
        }
        if let Some(outcome) = self.gif.poll() {
            self.apply_gif_outcome(outcome);
        }
    }

    /// An empty commit never issues a request; whether it clears what is
    /// on screen is a config decision.
    fn commit_query(&mut self, committed: &str) {
        if committed.is_empty() {
            if self.config.clear_results_on_empty_query {
                self.results.clear();
                self.cursor_index = 0;
                self.scroll_offset = 0;
            }
            return;
        }

        let Some(client) = &self.client else {
            self.status_message = "✗ Backend not configured (run with --setup)".to_string();
            return;
        };

        debug!("committed query: {:?}", committed);
        self.search.search(client, committed);
    }

    fn apply_search_outcome(&mut self, outcome: Result<Vec<SearchResult>, ApiError>) {
        match outcome {
            Ok(results) => {
                self.results = results;
                self.cursor_index = 0;
                self.scroll_offset = 0;
                self.status_message = format!("✓ Found {} results", self.results.len());
            }
            Err(e) => {
                // Failures never reach the screen; the last good results stay.
                warn!("search failed: {}", e);
            }
        }
    }

    fn apply_detail_outcome(&mut self, outcome: Result<Vec<ThumbItem>, ApiError>) {
        match outcome {
            Ok(thumbs) => {
                self.thumbs = thumbs;
            }
            Err(e) => {
                warn!("filmstrip load failed: {}", e);
            }
        }
    }

    fn apply_gif_outcome(&mut self, outcome: Result<PathBuf, ApiError>) {
        match outcome {
            Ok(path) => {
                self.status_message = format!("✓ Saved {}", path.display());
            }
            Err(e) => {
                warn!("gif export failed: {}", e);
            }
        }
    }

    fn select_result(&mut self, index: usize) {
        let Some(result) = self.results.get(index) else {
            return;
        };
        let result = result.clone();

        self.thumbs.clear();
        if let Some(client) = &self.client {
            self.detail.load(client, &result);
        }
        self.selection = Some(result);
    }

    /// Returning to the grid is structurally supported but deliberately has
    /// no key binding; the original client had no back affordance either.
    #[allow(dead_code)]
    fn clear_selection(&mut self) {
        self.selection = None;
        self.thumbs.clear();
        self.detail.reset();
    }

    fn export_gif(&mut self) {
        if self.gif.exporting {
            return;
        }
        let (Some(client), Some(selection)) = (&self.client, &self.selection) else {
            return;
        };

        let dir = self
            .config
            .gif_dir
            .clone()
            .or_else(|| {
                directories::UserDirs::new()
                    .and_then(|dirs| dirs.download_dir().map(|p| p.to_path_buf()))
            })
            .unwrap_or_else(|| PathBuf::from("."));

        self.status_message = format!(
            "Exporting S{}E{} @ {} ms...",
            selection.season, selection.episode, selection.start
        );
        self.gif.export(client, selection, &dir);
    }

    fn update_animation(&mut self) {
        self.marquee_cache.advance();

        if self.search.searching || self.detail.loading || self.gif.exporting {
            self.spinner_frame = self.spinner_frame.wrapping_add(1);
        }
    }

    fn spinner(&self) -> char {
        const FRAMES: [char; 4] = ['|', '/', '-', '\\'];
        FRAMES[self.spinner_frame as usize % 4]
    }

    fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.code == KeyCode::Esc {
            return false; // Quit
        }

        if self.selection.is_some() {
            self.handle_detail_key(key);
            return true;
        }

        match key.code {
            KeyCode::Tab | KeyCode::BackTab => {
                self.active_panel = match self.active_panel {
                    Panel::Search => Panel::Results,
                    Panel::Results => Panel::Search,
                };
            }
            _ => match self.active_panel {
                Panel::Search => self.handle_search_key(key),
                Panel::Results => self.handle_results_key(key),
            },
        }

        true
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(c) => {
                self.query.push(c);
                self.debouncer.record(&self.query);
            }
            KeyCode::Backspace => {
                self.query.pop();
                self.debouncer.record(&self.query);
            }
            KeyCode::Down | KeyCode::Enter => {
                if !self.results.is_empty() {
                    self.active_panel = Panel::Results;
                }
            }
            _ => {}
        }
    }

    fn handle_results_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up => {
                if self.results.is_empty() || self.cursor_index == 0 {
                    self.active_panel = Panel::Search;
                } else {
                    self.cursor_index -= 1;
                    if self.cursor_index < self.scroll_offset {
                        self.scroll_offset = self.cursor_index;
                    }
                }
            }
            KeyCode::Down if self.cursor_index + 1 < self.results.len() => {
                self.cursor_index += 1;
                let rows = self.visible_rows();
                if self.cursor_index >= self.scroll_offset + rows {
                    self.scroll_offset = self.cursor_index + 1 - rows;
                }
            }
            KeyCode::Enter => {
                self.select_result(self.cursor_index);
            }
            _ => {}
        }
    }

    fn handle_detail_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('g') {
            self.export_gif();
        }
    }

    /// Result rows that fit between the panel header and the status bars.
    fn visible_rows(&self) -> usize {
        (self.cached_height as usize)
            .saturating_sub(Layout::HEADER_HEIGHT as usize + Layout::STATUS_BAR_LINES as usize + 4)
            .max(1)
    }

    fn draw(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let mut stdout = io::stdout();

        let (term_width, term_height) = terminal::size()?;
        self.cached_height = term_height;

        let x_offset = Layout::MARGIN_X;
        let y_offset = Layout::MARGIN_Y;
        let content_width = term_width.saturating_sub(Layout::MARGIN_X * 2);
        let content_height = term_height.saturating_sub(Layout::MARGIN_Y * 2);

        queue!(
            stdout,
            terminal::Clear(ClearType::All),
            SetBackgroundColor(DraculaTheme::BG),
            SetForegroundColor(DraculaTheme::FG)
        )?;

        self.draw_search_bar(&mut stdout, x_offset, content_width, y_offset)?;
        self.draw_horizontal_line(&mut stdout, x_offset, 2 + y_offset, content_width)?;

        match view_for(self.selection.as_ref()) {
            View::Grid => {
                self.draw_grid_panel(&mut stdout, x_offset, term_width, content_height, y_offset)?
            }
            View::Detail => {
                self.draw_detail_panel(&mut stdout, x_offset, term_width, content_height, y_offset)?
            }
        }

        self.draw_status_bars(&mut stdout, x_offset, content_width, content_height, y_offset)?;

        stdout.flush()?;
        Ok(())
    }

    fn draw_search_bar(&self, stdout: &mut io::Stdout, x: u16, width: u16, y: u16) -> Result<(), Box<dyn std::error::Error>> {
        let active = matches!(self.active_panel, Panel::Search) && self.selection.is_none();
        let border_color = if active { DraculaTheme::CYAN } else { DraculaTheme::FG_DIM };

        queue!(
            stdout,
            cursor::MoveTo(x, y),
            SetForegroundColor(border_color),
            Print("┌"),
            Print("─".repeat((width - 2) as usize)),
            Print("┐"),
            cursor::MoveTo(x, y + 1),
            Print("│ "),
            SetForegroundColor(DraculaTheme::FG),
        )?;

        if active {
            queue!(
                stdout,
                SetForegroundColor(DraculaTheme::PINK),
                Print("▶ "),
            )?;
        } else {
            queue!(stdout, Print("  "))?;
        }

        queue!(
            stdout,
            SetForegroundColor(DraculaTheme::FG),
            Print("Search: "),
            SetForegroundColor(DraculaTheme::CYAN),
            Print(&self.query),
        )?;

        if active {
            queue!(stdout, SetForegroundColor(DraculaTheme::YELLOW), Print("_"))?;
        }

        let searching = if self.search.searching {
            format!("searching {} ", self.spinner())
        } else if self.debouncer.is_pending() {
            "... ".to_string()
        } else {
            String::new()
        };

        // Pad out to the right border, leaving room for the indicator.
        let used = 2 + 2 + 8 + self.query.chars().count() + (if active { 1 } else { 0 });
        let right_border_pos = (x as usize) + (width as usize) - 1;
        let current_pos = (x as usize) + used;
        let remaining = right_border_pos
            .saturating_sub(current_pos)
            .saturating_sub(searching.chars().count());
        queue!(
            stdout,
            SetForegroundColor(DraculaTheme::FG),
            Print(" ".repeat(remaining)),
            SetForegroundColor(DraculaTheme::YELLOW),
            Print(&searching),
            SetForegroundColor(border_color),
            Print("│"),
        )?;

        Ok(())
    }

    fn draw_horizontal_line(&self, stdout: &mut io::Stdout, x: u16, y: u16, width: u16) -> Result<(), Box<dyn std::error::Error>> {
        queue!(
            stdout,
            cursor::MoveTo(x, y),
            SetForegroundColor(DraculaTheme::FG_DIM),
            Print("├"),
            Print("─".repeat((width - 2) as usize)),
            Print("┤"),
        )?;
        Ok(())
    }

    fn draw_panel_frame(
        &self,
        stdout: &mut io::Stdout,
        title: &str,
        active: bool,
        x: u16,
        width: u16,
        height: u16,
        y_offset: u16,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let y = Layout::HEADER_HEIGHT + y_offset;
        let right_edge = (width as usize).saturating_sub(Layout::MARGIN_X as usize + 1);
        let header_width = right_edge.saturating_sub(x as usize + title.chars().count() + 4);

        queue!(
            stdout,
            cursor::MoveTo(x, y),
            SetForegroundColor(if active { DraculaTheme::CYAN } else { DraculaTheme::PURPLE }),
            Print(format!("┌─ {} ", title)),
            SetForegroundColor(DraculaTheme::FG_DIM),
            Print("─".repeat(header_width)),
            Print("┐"),
        )?;

        for row_y in (y + 1)..(height + y_offset - Layout::STATUS_BAR_LINES) {
            queue!(
                stdout,
                cursor::MoveTo(x, row_y),
                SetForegroundColor(DraculaTheme::FG_DIM),
                Print("│"),
                cursor::MoveTo(width - Layout::MARGIN_X - 1, row_y),
                Print("│"),
            )?;
        }

        let border_width = right_edge.saturating_sub(x as usize + 1);
        queue!(
            stdout,
            cursor::MoveTo(x, height + y_offset - Layout::STATUS_BAR_LINES),
            SetForegroundColor(if active { DraculaTheme::CYAN } else { DraculaTheme::FG_DIM }),
            Print("└"),
            Print("─".repeat(border_width)),
            Print("┘"),
        )?;

        Ok(())
    }

    fn draw_center_box(
        &self,
        stdout: &mut io::Stdout,
        message: &str,
        x: u16,
        width: u16,
        height: u16,
        y_offset: u16,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let y = Layout::HEADER_HEIGHT + y_offset;
        let msg_len = message.chars().count();
        let box_width = msg_len + 4;
        let panel_width = (width as usize).saturating_sub(x as usize + 1);
        let box_x = x + ((panel_width.saturating_sub(box_width)) / 2) as u16;
        let box_y = y + ((height.saturating_sub(y + Layout::STATUS_BAR_LINES + 5)) / 2);

        let padding = (box_width - 2).saturating_sub(msg_len) / 2;
        let right_padding = (box_width - 2).saturating_sub(msg_len + padding);

        queue!(
            stdout,
            cursor::MoveTo(box_x, box_y),
            SetForegroundColor(DraculaTheme::CYAN),
            Print("┌"),
            Print("─".repeat(box_width - 2)),
            Print("┐"),
            cursor::MoveTo(box_x, box_y + 1),
            Print("│"),
            SetForegroundColor(DraculaTheme::FG),
            Print(" ".repeat(padding)),
            SetForegroundColor(DraculaTheme::CYAN),
            Print(message),
            SetForegroundColor(DraculaTheme::FG),
            Print(" ".repeat(right_padding)),
            SetForegroundColor(DraculaTheme::CYAN),
            Print("│"),
            cursor::MoveTo(box_x, box_y + 2),
            Print("└"),
            Print("─".repeat(box_width - 2)),
            Print("┘"),
        )?;

        Ok(())
    }

    fn draw_grid_panel(&self, stdout: &mut io::Stdout, x: u16, width: u16, height: u16, y_offset: u16) -> Result<(), Box<dyn std::error::Error>> {
        let active = matches!(self.active_panel, Panel::Results);
        let y = Layout::HEADER_HEIGHT + y_offset;

        self.draw_panel_frame(stdout, "RESULTS", active, x, width, height, y_offset)?;

        if self.results.is_empty() {
            if self.search.searching {
                let message = format!("Fetching {}", self.spinner());
                self.draw_center_box(stdout, &message, x, width, height, y_offset)?;
            } else {
                queue!(
                    stdout,
                    cursor::MoveTo(x, y + 2),
                    SetForegroundColor(DraculaTheme::FG_DIM),
                    Print("│   "),
                    Print("No results. Type a quote to search."),
                )?;
            }
            return Ok(());
        }

        let rows = self.visible_rows();
        let visible_end = (self.scroll_offset + rows).min(self.results.len());
        let has_more_above = self.scroll_offset > 0;
        let has_more_below = visible_end < self.results.len();
        let right_edge = (width as usize).saturating_sub(Layout::MARGIN_X as usize + 1);

        // Column header
        queue!(
            stdout,
            cursor::MoveTo(x, y + 1),
            SetForegroundColor(DraculaTheme::FG_DIM),
            Print("│ "),
        )?;
        if has_more_above {
            queue!(stdout, SetForegroundColor(DraculaTheme::YELLOW), Print("^^ "))?;
        } else {
            queue!(stdout, Print("   "))?;
        }
        queue!(
            stdout,
            SetForegroundColor(DraculaTheme::CYAN),
            Print(format!("{:<6} │ {:<4} │ {:>9} │ Quote", "Season", "Ep", "Start ms")),
        )?;

        for (row, (index, result)) in self
            .results
            .iter()
            .enumerate()
            .skip(self.scroll_offset)
            .take(rows)
            .enumerate()
        {
            let highlighted = index == self.cursor_index && active;
            let (fg, bg) = if highlighted {
                (DraculaTheme::BG, DraculaTheme::PINK)
            } else {
                (DraculaTheme::FG, DraculaTheme::BG)
            };

            let label = match &result.text {
                Some(text) if !text.is_empty() => text.clone(),
                _ => result.thumb_url(&self.base_url),
            };
            let prefix = format!(
                "{:<6} │ {:<4} │ {:>9} │ ",
                result.season, result.episode, result.start
            );
            let avail = right_edge.saturating_sub(x as usize + 5 + prefix.chars().count());
            let label = truncate_ellipsis(&label, avail);

            queue!(
                stdout,
                cursor::MoveTo(x, y + 2 + row as u16),
                SetForegroundColor(DraculaTheme::FG_DIM),
                Print("│ "),
                Print("   "),
                SetBackgroundColor(bg),
                SetForegroundColor(fg),
                Print(&prefix),
                Print(&label),
                SetBackgroundColor(DraculaTheme::BG),
            )?;
        }

        if has_more_below {
            queue!(
                stdout,
                cursor::MoveTo(x + 2, height + y_offset - Layout::STATUS_BAR_LINES - 1),
                SetForegroundColor(DraculaTheme::YELLOW),
                Print("vv"),
            )?;
        }

        Ok(())
    }

    fn draw_detail_panel(&self, stdout: &mut io::Stdout, x: u16, width: u16, height: u16, y_offset: u16) -> Result<(), Box<dyn std::error::Error>> {
        let Some(selection) = &self.selection else {
            return Ok(());
        };
        let y = Layout::HEADER_HEIGHT + y_offset;

        self.draw_panel_frame(stdout, "CLIP", true, x, width, height, y_offset)?;

        queue!(
            stdout,
            cursor::MoveTo(x + 2, y + 1),
            SetForegroundColor(DraculaTheme::GREEN),
            Print(format!(
                "Season {}, Episode {}",
                selection.season, selection.episode
            )),
            cursor::MoveTo(x + 2, y + 2),
            SetForegroundColor(DraculaTheme::FG),
            Print(format!("Start time: {} ms", selection.start)),
        )?;

        let mut row_y = y + 3;
        if let Some(text) = &selection.text {
            queue!(
                stdout,
                cursor::MoveTo(x + 2, row_y),
                SetForegroundColor(DraculaTheme::YELLOW),
                Print(format!("\u{201c}{}\u{201d}", text)),
            )?;
            row_y += 1;
        }

        if self.gif.exporting {
            queue!(
                stdout,
                cursor::MoveTo(x + 2, row_y),
                SetForegroundColor(DraculaTheme::PINK),
                Print(format!("Exporting GIF {}", self.spinner())),
            )?;
        }
        row_y += 2;

        if self.detail.loading {
            let message = format!("Fetching {}", self.spinner());
            self.draw_center_box(stdout, &message, x, width, height, y_offset)?;
            return Ok(());
        }

        let right_edge = (width as usize).saturating_sub(Layout::MARGIN_X as usize + 1);
        let bottom = height + y_offset - Layout::STATUS_BAR_LINES;
        let strip_rows = (bottom.saturating_sub(row_y + 1)) as usize;

        queue!(
            stdout,
            cursor::MoveTo(x + 2, row_y),
            SetForegroundColor(DraculaTheme::CYAN),
            Print(format!("{:>3}  {:>9}    {}", "#", "Frame ms", "Thumbnail")),
        )?;

        for (i, thumb) in self.thumbs.iter().take(strip_rows).enumerate() {
            let url = thumb.thumb_url(&self.base_url, &selection.season, &selection.episode);
            let line = format!("{:>3}  {:>9} ms {}", i + 1, thumb.timestamp, url);
            let avail = right_edge.saturating_sub(x as usize + 3);
            queue!(
                stdout,
                cursor::MoveTo(x + 2, row_y + 1 + i as u16),
                SetForegroundColor(if thumb.timestamp == selection.start {
                    DraculaTheme::GREEN
                } else {
                    DraculaTheme::FG
                }),
                Print(truncate_ellipsis(&line, avail)),
            )?;
        }

        if self.thumbs.len() > strip_rows {
            queue!(
                stdout,
                cursor::MoveTo(x + 2, bottom - 1),
                SetForegroundColor(DraculaTheme::YELLOW),
                Print(format!("... {} more frames", self.thumbs.len() - strip_rows)),
            )?;
        }

        Ok(())
    }

    fn draw_status_bars(&self, stdout: &mut io::Stdout, x: u16, width: u16, height: u16, y_offset: u16) -> Result<(), Box<dyn std::error::Error>> {
        let help_text = if self.selection.is_some() {
            "g: export GIF | ESC: quit"
        } else {
            "Tab: switch focus | ↑↓: navigate | Enter: open clip | ESC: quit"
        };
        let count = if self.selection.is_some() {
            format!("{} frames", self.thumbs.len())
        } else if !self.results.is_empty() {
            format!("{} results", self.results.len())
        } else {
            String::new()
        };

        let total_text_len = help_text.chars().count() + count.chars().count();
        let padding_width = (width as usize).saturating_sub(total_text_len);

        queue!(
            stdout,
            cursor::MoveTo(x, height + y_offset - 3),
            SetBackgroundColor(DraculaTheme::BG),
            SetForegroundColor(DraculaTheme::CYAN),
            Print(help_text),
            Print(" ".repeat(padding_width)),
            SetForegroundColor(DraculaTheme::GREEN),
            Print(&count),
        )?;

        queue!(
            stdout,
            cursor::MoveTo(x, height + y_offset - 2),
            SetForegroundColor(DraculaTheme::FG_DIM),
            Print(truncate_ellipsis(&self.status_message, width as usize)),
        )?;

        let visible_marquee = self.marquee_cache.render(width as usize);
        queue!(
            stdout,
            cursor::MoveTo(x, height + y_offset - 1),
            SetBackgroundColor(DraculaTheme::PINK),
            SetForegroundColor(DraculaTheme::BG),
            Print(&visible_marquee),
            SetBackgroundColor(DraculaTheme::BG),
            SetForegroundColor(DraculaTheme::FG),
        )?;

        Ok(())
    }
}

fn truncate_ellipsis(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let truncated: String = s.chars().take(width.saturating_sub(3)).collect();
    format!("{}...", truncated)
}
