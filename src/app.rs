use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use rand::SeedableRng;
use rand::rngs::StdRng;
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Paragraph, TableState},
};
use ratatui_image::picker::Picker;
use ratatui_image::protocol::StatefulProtocol;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::catalog::{FetchOutcome, PageSource, fetch_bounded};
use crate::charts::{ChartKind, DemoData};
use crate::config::Config;
use crate::dataset::AnimeDataset;
use crate::error::Result;
use crate::map::{Location, random_locations};
use crate::portrait::load_portrait;
use crate::survey::{Submission, SurveyForm};
use crate::ui::{
    render_about_view, render_charts_view, render_data_view, render_form_view, render_map_view,
    widgets,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Form,
    AnimeData,
    Charts,
    Map,
    About,
}

impl Tab {
    pub const ALL: [Tab; 5] = [Tab::Form, Tab::AnimeData, Tab::Charts, Tab::Map, Tab::About];

    pub fn as_display(&self) -> &'static str {
        match self {
            Tab::Form => "Form",
            Tab::AnimeData => "Anime Data",
            Tab::Charts => "Charts",
            Tab::Map => "Map",
            Tab::About => "About",
        }
    }

    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|t| t == self).unwrap_or(0)
    }

    pub fn from_digit(c: char) -> Option<Self> {
        let n = c.to_digit(10)? as usize;
        n.checked_sub(1).and_then(|i| Self::ALL.get(i)).copied()
    }

    pub fn next(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Whether keys drive the sidebar or the selected tab
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Menu,
    Content,
}

pub enum AppMessage {
    FetchFinished(FetchOutcome),
}

pub struct App {
    pub config: Config,
    pub running: bool,
    pub tab: Tab,
    pub focus: Focus,
    pub show_help: bool,
    pub accent: Color,

    pub form: SurveyForm,
    pub submission: Option<Submission>,
    pub form_error: Option<String>,
    pub portrait: Option<StatefulProtocol>,
    pub picker: Picker,

    pub data: AnimeDataset,
    pub table_state: TableState,
    pub upload_input: String,
    pub editing_upload: bool,

    pub demo: DemoData,
    pub chart: ChartKind,
    pub locations: Vec<Location>,
    rng: StdRng,

    pub msg_tx: mpsc::UnboundedSender<AppMessage>,
    pub msg_rx: mpsc::UnboundedReceiver<AppMessage>,

    pub source: Arc<dyn PageSource + Send + Sync>,
}

impl App {
    pub fn new(config: Config, source: Arc<dyn PageSource + Send + Sync>, picker: Picker) -> Self {
        let accent = widgets::parse_accent_color(&config.ui.accent_color);
        let (msg_tx, msg_rx) = mpsc::unbounded_channel();

        let mut rng = StdRng::from_os_rng();
        let demo = DemoData::generate(&mut rng);
        let locations = random_locations(&mut rng, &config.map);

        Self {
            config,
            running: true,
            tab: Tab::Form,
            focus: Focus::Menu,
            show_help: false,
            accent,

            form: SurveyForm::default(),
            submission: None,
            form_error: None,
            portrait: None,
            picker,

            data: AnimeDataset::default(),
            table_state: TableState::default(),
            upload_input: String::new(),
            editing_upload: false,

            demo,
            chart: ChartKind::default(),
            locations,
            rng,

            msg_tx,
            msg_rx,

            source,
        }
    }

    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        while self.running {
            terminal.draw(|frame| self.render(frame))?;
            self.handle_events()?;
            self.process_messages();
        }

        info!("Shutting down");
        Ok(())
    }

    fn process_messages(&mut self) {
        while let Ok(msg) = self.msg_rx.try_recv() {
            match msg {
                AppMessage::FetchFinished(outcome) => {
                    self.data.finish_fetch(outcome);
                    self.table_state
                        .select(if self.data.rows().is_empty() { None } else { Some(0) });
                }
            }
        }
    }

    fn render(&mut self, frame: &mut Frame) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(1),
            ])
            .split(frame.area());

        let header = Paragraph::new(Line::styled(
            " Anime Fan Survey, UNM campus",
            Style::default()
                .fg(self.accent)
                .add_modifier(Modifier::BOLD),
        ));
        frame.render_widget(header, rows[0]);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(18), Constraint::Min(20)])
            .split(rows[1]);

        let menu: Vec<&str> = Tab::ALL.iter().map(|t| t.as_display()).collect();
        widgets::render_menu(frame, columns[0], &menu, self.tab.index(), self.accent);

        let main_area = columns[1];
        match self.tab {
            Tab::Form => render_form_view(
                frame,
                main_area,
                &self.form,
                self.submission.as_ref(),
                self.form_error.as_deref(),
                self.portrait.as_mut(),
                self.accent,
            ),
            Tab::AnimeData => render_data_view(
                frame,
                main_area,
                &self.data,
                &self.upload_input,
                self.editing_upload,
                &mut self.table_state,
                self.accent,
            ),
            Tab::Charts => render_charts_view(frame, main_area, &self.demo, self.chart, self.accent),
            Tab::Map => render_map_view(
                frame,
                main_area,
                &self.locations,
                &self.config.map,
                self.accent,
            ),
            Tab::About => render_about_view(frame, main_area, self.accent),
        }

        let help = widgets::help_bar(self.help_hints());
        frame.render_widget(help, rows[2]);

        if self.show_help {
            self.render_help(frame);
        }
    }

    fn help_hints(&self) -> &'static [(&'static str, &'static str)] {
        if self.focus == Focus::Menu {
            return &[
                ("j/k", "menu"),
                ("Enter", "open"),
                ("1-5", "jump"),
                ("?", "help"),
                ("q", "quit"),
            ];
        }
        match self.tab {
            Tab::Form => &[
                ("↑/↓", "field"),
                ("←/→", "choose"),
                ("Enter", "submit"),
                ("Esc", "menu"),
            ],
            Tab::AnimeData if self.editing_upload => &[("Enter", "load CSV"), ("Esc", "cancel")],
            Tab::AnimeData => &[
                ("j/k", "scroll"),
                ("r", "refetch"),
                ("u", "upload CSV"),
                ("s", "API/CSV"),
                ("Esc", "menu"),
            ],
            Tab::Charts => &[("j/k", "chart"), ("g", "new data"), ("Esc", "menu")],
            Tab::Map => &[("r", "new points"), ("Esc", "menu")],
            Tab::About => &[("Esc", "menu")],
        }
    }

    fn handle_events(&mut self) -> Result<()> {
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                self.handle_key(key);
            }
        }
        Ok(())
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.running = false;
            return;
        }
        if self.show_help {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?')) {
                self.show_help = false;
            }
            return;
        }

        match self.focus {
            Focus::Menu => self.handle_menu_input(key.code),
            Focus::Content => match self.tab {
                Tab::Form => self.handle_form_input(key),
                Tab::AnimeData => self.handle_data_input(key.code),
                Tab::Charts => self.handle_charts_input(key.code),
                Tab::Map => self.handle_map_input(key.code),
                Tab::About => {
                    if matches!(key.code, KeyCode::Esc | KeyCode::Char('h') | KeyCode::Left) {
                        self.focus = Focus::Menu;
                    }
                }
            },
        }
    }

    fn select_tab(&mut self, tab: Tab) {
        if tab == self.tab {
            return;
        }
        debug!(tab = tab.as_display(), "Switching tab");
        self.tab = tab;
        // The data view always shows fresh API data
        if tab == Tab::AnimeData {
            self.start_fetch();
        }
    }

    fn handle_menu_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') => self.running = false,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Char('j') | KeyCode::Down | KeyCode::Tab => self.select_tab(self.tab.next()),
            KeyCode::Char('k') | KeyCode::Up | KeyCode::BackTab => self.select_tab(self.tab.prev()),
            KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => self.focus = Focus::Content,
            KeyCode::Char(c) => {
                if let Some(tab) = Tab::from_digit(c) {
                    self.select_tab(tab);
                }
            }
            _ => {}
        }
    }

    fn handle_form_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.focus = Focus::Menu,
            KeyCode::Down | KeyCode::Tab => self.form.focus_next(),
            KeyCode::Up | KeyCode::BackTab => self.form.focus_prev(),
            KeyCode::Left => self.form.cycle_option(false),
            KeyCode::Right => self.form.cycle_option(true),
            KeyCode::Backspace => self.form.pop_char(),
            KeyCode::Enter => self.submit_form(),
            KeyCode::Char(c) => self.form.push_char(c),
            _ => {}
        }
    }

    fn submit_form(&mut self) {
        self.submission = None;
        self.portrait = None;

        let submission = match self.form.submit() {
            Ok(submission) => submission,
            Err(e) => {
                self.form_error = Some(e.to_string());
                return;
            }
        };

        if let Some(path) = &submission.character_image {
            match load_portrait(Path::new(path)) {
                Ok(img) => self.portrait = Some(self.picker.new_resize_protocol(img)),
                Err(e) => {
                    self.form_error = Some(e.to_string());
                    return;
                }
            }
        }

        self.form_error = None;
        self.submission = Some(submission);
    }

    fn handle_data_input(&mut self, key: KeyCode) {
        if self.editing_upload {
            match key {
                KeyCode::Esc => self.editing_upload = false,
                KeyCode::Enter => {
                    self.editing_upload = false;
                    let path = PathBuf::from(self.upload_input.trim());
                    self.data.load_upload(&path);
                    self.reset_table_selection();
                }
                KeyCode::Backspace => {
                    self.upload_input.pop();
                }
                KeyCode::Char(c) => self.upload_input.push(c),
                _ => {}
            }
            return;
        }

        match key {
            KeyCode::Esc | KeyCode::Char('h') | KeyCode::Left => self.focus = Focus::Menu,
            KeyCode::Char('j') | KeyCode::Down => self.move_table_selection(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_table_selection(-1),
            KeyCode::Char('r') => self.start_fetch(),
            KeyCode::Char('u') => self.editing_upload = true,
            KeyCode::Char('s') => {
                self.data.toggle_source();
                self.reset_table_selection();
            }
            _ => {}
        }
    }

    fn handle_charts_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::Char('h') => self.focus = Focus::Menu,
            KeyCode::Char('j') | KeyCode::Down | KeyCode::Right => self.chart = self.chart.next(),
            KeyCode::Char('k') | KeyCode::Up | KeyCode::Left => self.chart = self.chart.prev(),
            KeyCode::Char('g') => self.demo = DemoData::generate(&mut self.rng),
            _ => {}
        }
    }

    fn handle_map_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::Char('h') | KeyCode::Left => self.focus = Focus::Menu,
            KeyCode::Char('r') => {
                self.locations = random_locations(&mut self.rng, &self.config.map);
            }
            _ => {}
        }
    }

    fn move_table_selection(&mut self, delta: i64) {
        let len = self.data.rows().len();
        if len == 0 {
            self.table_state.select(None);
            return;
        }
        let current = self.table_state.selected().unwrap_or(0) as i64;
        let next = (current + delta).clamp(0, len as i64 - 1) as usize;
        self.table_state.select(Some(next));
    }

    fn reset_table_selection(&mut self) {
        let selected = if self.data.rows().is_empty() { None } else { Some(0) };
        self.table_state.select(selected);
    }

    fn start_fetch(&mut self) {
        if !self.data.begin_fetch() {
            debug!("Fetch already running");
            return;
        }

        let source = Arc::clone(&self.source);
        let target = self.config.fetch.target_count;
        let tx = self.msg_tx.clone();

        info!(target, "Starting anime fetch");
        tokio::spawn(async move {
            let outcome = fetch_bounded(source.as_ref(), target).await;
            let _ = tx.send(AppMessage::FetchFinished(outcome));
        });
    }

    fn render_help(&self, frame: &mut Frame) {
        use ratatui::widgets::{Block, Borders, Clear, Row, Table};

        let area = frame.area();
        let dialog_area = Rect {
            x: area.width.saturating_sub(64) / 2,
            y: area.height.saturating_sub(22) / 2,
            width: 64.min(area.width),
            height: 22.min(area.height),
        };

        frame.render_widget(Clear, dialog_area);

        let block = Block::default()
            .title(" Help ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.accent));

        let inner = block.inner(dialog_area);
        frame.render_widget(block, dialog_area);

        let rows = vec![
            Row::new(vec!["Menu", "j/k, Tab", "Select tab"]),
            Row::new(vec!["", "1-5", "Jump to tab"]),
            Row::new(vec!["", "Enter/l", "Focus tab content"]),
            Row::new(vec!["", "q", "Quit"]),
            Row::new(vec!["Any", "Esc", "Back to menu"]),
            Row::new(vec!["", "Ctrl-C", "Quit"]),
            Row::new(vec!["Form", "↑/↓", "Move between fields"]),
            Row::new(vec!["", "←/→", "Change faculty/genre"]),
            Row::new(vec!["", "Enter", "Submit form"]),
            Row::new(vec!["Anime Data", "r", "Fetch again"]),
            Row::new(vec!["", "u", "Enter CSV path"]),
            Row::new(vec!["", "s", "Switch API/CSV rows"]),
            Row::new(vec!["Charts", "j/k", "Previous/next chart"]),
            Row::new(vec!["", "g", "Regenerate data"]),
            Row::new(vec!["Map", "r", "New random points"]),
        ];

        let table = Table::new(
            rows,
            [
                Constraint::Percentage(25),
                Constraint::Percentage(25),
                Constraint::Percentage(50),
            ],
        )
        .header(
            Row::new(vec!["Context", "Key", "Action"]).style(
                Style::default()
                    .add_modifier(Modifier::BOLD)
                    .fg(self.accent),
            ),
        )
        .block(Block::default().borders(Borders::NONE));

        frame.render_widget(table, inner);
    }
}

pub fn init_terminal() -> io::Result<DefaultTerminal> {
    crossterm::terminal::enable_raw_mode()?;
    crossterm::execute!(io::stdout(), crossterm::terminal::EnterAlternateScreen)?;
    Ok(ratatui::init())
}

pub fn restore_terminal() -> io::Result<()> {
    ratatui::restore();
    Ok(())
}

const GLYPH_A: [&str; 6] = [
    " █████╗ ",
    "██╔══██╗",
    "███████║",
    "██╔══██║",
    "██║  ██║",
    "╚═╝  ╚═╝",
];

const GLYPH_N: [&str; 6] = [
    "███╗   ██╗",
    "████╗  ██║",
    "██╔██╗ ██║",
    "██║╚██╗██║",
    "██║ ╚████║",
    "╚═╝  ╚═══╝",
];

const GLYPH_I: [&str; 6] = ["██╗", "██║", "██║", "██║", "██║", "╚═╝"];

const SPLASH_TAGLINE: &str = "アニメ - survey";

/// Logo text with the first `letters` glyphs of "ANI"
fn splash_frame(letters: usize) -> String {
    let glyphs = [&GLYPH_A, &GLYPH_N, &GLYPH_I];
    let shown = &glyphs[..letters.min(glyphs.len())];
    (0..GLYPH_A.len())
        .map(|row| {
            shown
                .iter()
                .map(|g| g[row])
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn draw_centered(terminal: &mut DefaultTerminal, text: &str, tagline: Option<&str>, accent: Color) -> io::Result<()> {
    use ratatui::{layout::Alignment, text::Text};

    terminal.draw(|f| {
        let area = f.area();
        let lines = text.lines().count() as u16;
        let y_offset = area.height.saturating_sub(lines + 2) / 2;

        let logo_area = Rect {
            x: 0,
            y: y_offset,
            width: area.width,
            height: lines.min(area.height),
        };
        let logo = Paragraph::new(Text::styled(text.to_string(), Style::default().fg(accent)))
            .alignment(Alignment::Center);
        f.render_widget(logo, logo_area);

        if let Some(tagline) = tagline {
            let tagline_area = Rect {
                x: 0,
                y: (y_offset + lines + 1).min(area.height.saturating_sub(1)),
                width: area.width,
                height: 1,
            };
            let tagline = Paragraph::new(Line::styled(tagline, Style::default().fg(Color::DarkGray)))
                .alignment(Alignment::Center);
            f.render_widget(tagline, tagline_area);
        }
    })?;
    Ok(())
}

pub fn play_splash(terminal: &mut DefaultTerminal, accent: Color) -> io::Result<()> {
    for letters in 1..=3 {
        draw_centered(terminal, &splash_frame(letters), None, accent)?;
        thread::sleep(Duration::from_millis(150));
    }

    draw_centered(terminal, &splash_frame(3), Some(SPLASH_TAGLINE), accent)?;
    thread::sleep(Duration::from_millis(700));

    terminal.draw(|_f| {})?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{AnimeRecord, FetchError, Page};

    struct OnePage;

    #[async_trait::async_trait]
    impl PageSource for OnePage {
        async fn fetch_page(&self, page: u32) -> std::result::Result<Page, FetchError> {
            if page == 1 {
                Ok(Page {
                    records: vec![AnimeRecord::titled("Frieren"), AnimeRecord::titled("Monster")],
                    has_next_page: Some(false),
                })
            } else {
                Err(FetchError::NoData { page })
            }
        }
    }

    fn app() -> App {
        let mut config = Config::default();
        config.fetch.target_count = 10;
        App::new(config, Arc::new(OnePage), Picker::from_fontsize((8, 16)))
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_tab_from_digit() {
        assert_eq!(Tab::from_digit('1'), Some(Tab::Form));
        assert_eq!(Tab::from_digit('5'), Some(Tab::About));
        assert_eq!(Tab::from_digit('0'), None);
        assert_eq!(Tab::from_digit('6'), None);
        assert_eq!(Tab::About.next(), Tab::Form);
    }

    #[test]
    fn test_splash_frames_grow() {
        let one = splash_frame(1);
        let three = splash_frame(3);
        assert_eq!(one.lines().count(), 6);
        assert!(three.lines().next().unwrap().len() > one.lines().next().unwrap().len());
        assert_eq!(splash_frame(9), three);
    }

    #[test]
    fn test_form_typing_and_submit() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.focus, Focus::Content);

        for c in "Ayu q".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        assert!(app.running, "q inside a text field is just a letter");
        assert_eq!(app.form.name, "Ayu q");

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.submission.as_ref().map(|s| s.name.as_str()), Some("Ayu q"));

        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.running);
    }

    #[test]
    fn test_form_error_is_shown_instead_of_summary() {
        let mut app = app();
        app.form.start_date = "someday".into();
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Enter);
        assert!(app.submission.is_none());
        assert!(app.form_error.as_deref().unwrap().contains("someday"));
    }

    #[test]
    fn test_submit_with_picture_shows_preview() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fern.png");
        image::RgbImage::new(8, 8).save(&path).unwrap();

        let mut app = app();
        app.form.character_image = path.display().to_string();
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Enter);

        assert!(app.form_error.is_none());
        assert!(app.submission.is_some());
        assert!(app.portrait.is_some());
    }

    #[test]
    fn test_unreadable_picture_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fern.jpg");
        std::fs::write(&path, b"not a jpeg").unwrap();

        let mut app = app();
        app.form.character_image = path.display().to_string();
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Enter);

        assert!(app.submission.is_none());
        assert!(app.portrait.is_none());
        assert!(app.form_error.as_deref().unwrap().contains("fern.jpg"));
    }

    #[tokio::test]
    async fn test_opening_data_tab_fetches() {
        let mut app = app();
        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.tab, Tab::AnimeData);
        assert!(app.data.loading);

        let msg = app.msg_rx.recv().await.unwrap();
        app.msg_tx.send(msg).unwrap();
        app.process_messages();

        assert!(!app.data.loading);
        assert_eq!(app.data.rows().len(), 2);
        assert_eq!(app.table_state.selected(), Some(0));
    }

    #[test]
    fn test_charts_and_map_keys() {
        let mut app = app();
        press(&mut app, KeyCode::Char('3'));
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.chart, ChartKind::Bar);
        press(&mut app, KeyCode::Char('k'));
        press(&mut app, KeyCode::Char('k'));
        assert_eq!(app.chart, ChartKind::Bubble);

        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Char('4'));
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.locations.len(), 100);
    }

    #[test]
    fn test_help_overlay_swallows_keys() {
        let mut app = app();
        press(&mut app, KeyCode::Char('?'));
        assert!(app.show_help);
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.tab, Tab::Form);
        press(&mut app, KeyCode::Esc);
        assert!(!app.show_help);
    }
}
