use crate::api::BreedSource;
use crate::catalog::{Catalog, CatalogEvent, CatalogLimits, Command};
use crate::error::{BreedViewError, Result};
use crate::logging;
use crate::tui::cards::CardListState;
use crate::tui::search::SearchState;
use crate::tui::ui;
use chrono::{DateTime, Local};
use crossbeam_channel::{unbounded, Receiver, Sender};
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use serde_json::Value;
use std::io::Stdout;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Messages from fetch workers
#[derive(Debug)]
pub enum BgMessage {
    PageLoaded { page: u32, items: Vec<Value> },
    PageFailed { page: u32, error: BreedViewError },
}

impl From<BgMessage> for CatalogEvent {
    fn from(msg: BgMessage) -> Self {
        match msg {
            BgMessage::PageLoaded { page, items } => CatalogEvent::PageLoaded { page, items },
            BgMessage::PageFailed { page, error } => CatalogEvent::PageFailed { page, error },
        }
    }
}

pub struct App {
    pub catalog: Catalog,

    // Sub-states
    pub search: SearchState,
    pub cards: CardListState,

    pub last_loaded: Option<DateTime<Local>>,

    source: Arc<dyn BreedSource>,

    // Channel
    bg_receiver: Receiver<BgMessage>,
    bg_sender: Sender<BgMessage>,

    /// Cleared on drop so in-flight workers discard their results
    alive: Arc<AtomicBool>,

    pub should_quit: bool,
}

impl App {
    pub fn new(source: Arc<dyn BreedSource>, limits: CatalogLimits) -> Self {
        let (tx, rx) = unbounded();
        Self {
            catalog: Catalog::new(limits),
            search: SearchState::default(),
            cards: CardListState::default(),
            last_loaded: None,
            source,
            bg_receiver: rx,
            bg_sender: tx,
            alive: Arc::new(AtomicBool::new(true)),
            should_quit: false,
        }
    }

    pub fn run(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        let tick_rate = Duration::from_millis(50);
        let mut last_tick = Instant::now();

        self.dispatch(CatalogEvent::Mounted);

        loop {
            terminal.draw(|frame| ui::draw(frame, self))?;

            let timeout = tick_rate.saturating_sub(last_tick.elapsed());
            if event::poll(timeout)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
                    Event::Mouse(mouse) => self.handle_mouse(mouse),
                    _ => {}
                }
            }

            if last_tick.elapsed() >= tick_rate {
                self.process_messages();
                last_tick = Instant::now();
            }

            if self.should_quit {
                logging::info("APP", "Quit requested");
                return Ok(());
            }
        }
    }

    /// Feed one event to the catalog and carry out the command it returns
    pub fn dispatch(&mut self, event: CatalogEvent) {
        if let Some(command) = self.catalog.handle(event) {
            self.execute(command);
        }
    }

    fn execute(&mut self, command: Command) {
        match command {
            Command::FetchPage { page, limit } => {
                let source = Arc::clone(&self.source);
                let alive = Arc::clone(&self.alive);
                let tx = self.bg_sender.clone();
                thread::spawn(move || {
                    fetch_worker(source.as_ref(), page, limit, &alive, &tx);
                });
            }
        }
    }

    /// Drain completed fetches into the catalog
    pub fn process_messages(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(msg) = self.bg_receiver.try_recv() {
            self.apply_message(msg);
            handled += 1;
        }
        handled
    }

    /// Block until one fetch completes or `timeout` passes
    pub fn wait_for_message(&mut self, timeout: Duration) -> bool {
        match self.bg_receiver.recv_timeout(timeout) {
            Ok(msg) => {
                self.apply_message(msg);
                true
            }
            Err(_) => false,
        }
    }

    fn apply_message(&mut self, msg: BgMessage) {
        let loaded = matches!(msg, BgMessage::PageLoaded { .. });
        self.dispatch(msg.into());
        if loaded {
            self.last_loaded = Some(Local::now());
        }
        let total = self.visible_len();
        if self.cards.selected.is_none() {
            self.cards.reset(total);
        } else {
            self.cards.clamp(total);
        }
    }

    pub fn visible_len(&self) -> usize {
        self.catalog.visible().len()
    }

    /// Id of the card under the selection cursor
    pub fn selected_id(&self) -> Option<String> {
        let index = self.cards.selected?;
        self.catalog.visible().get(index).map(|r| r.id.clone())
    }

    /// Scroll position changed: fetch more if the list bottom is on screen
    fn check_scroll(&mut self) {
        if self.cards.is_at_bottom(self.visible_len()) {
            self.dispatch(CatalogEvent::ScrollNearBottom);
        }
    }

    fn query_changed(&mut self) {
        self.dispatch(CatalogEvent::QueryChanged(self.search.query.clone()));
        self.cards.reset(self.visible_len());
    }

    // --- Input handling ---

    pub fn handle_key(&mut self, key: KeyEvent) {
        // Global keys
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('q')
                if key.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                self.should_quit = true;
                return;
            }
            KeyCode::Esc => {
                if self.search.focused && !self.search.query.is_empty() {
                    self.search.clear();
                    self.query_changed();
                } else if self.search.focused {
                    self.search.focused = false;
                } else {
                    self.should_quit = true;
                }
                return;
            }
            _ => {}
        }

        if self.search.focused {
            self.handle_search_key(key);
        } else {
            self.handle_list_key(key);
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        let changed = match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.search.insert_char(c)
            }
            KeyCode::Backspace => self.search.backspace(),
            KeyCode::Delete => self.search.delete(),
            KeyCode::Left => {
                self.search.move_left();
                false
            }
            KeyCode::Right => {
                self.search.move_right();
                false
            }
            KeyCode::Home => {
                self.search.home();
                false
            }
            KeyCode::End => {
                self.search.end();
                false
            }
            KeyCode::Tab | KeyCode::Down | KeyCode::Enter => {
                self.search.focused = false;
                if self.cards.selected.is_none() {
                    self.cards.reset(self.visible_len());
                }
                false
            }
            _ => false,
        };

        if changed {
            self.query_changed();
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent) {
        let total = self.visible_len();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.cards.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => {
                self.cards.select_next(total);
                self.check_scroll();
            }
            KeyCode::PageUp => self.cards.page_up(),
            KeyCode::PageDown => {
                self.cards.page_down(total);
                self.check_scroll();
            }
            KeyCode::Home | KeyCode::Char('g') => self.cards.select_first(),
            KeyCode::End | KeyCode::Char('G') => {
                self.cards.select_last(total);
                self.check_scroll();
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(id) = self.selected_id() {
                    self.dispatch(CatalogEvent::ToggleDetail(id));
                }
            }
            KeyCode::Tab | KeyCode::Char('/') => {
                self.search.focused = true;
            }
            // Any other printable char focuses search and types it
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.search.focused = true;
                self.search.end();
                self.search.insert_char(c);
                self.query_changed();
            }
            _ => {}
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::ScrollDown => {
                self.cards.scroll_down(self.visible_len());
                self.check_scroll();
            }
            MouseEventKind::ScrollUp => self.cards.scroll_up(),
            _ => {}
        }
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.alive.store(false, Ordering::SeqCst);
    }
}

/// Body of a fetch worker thread.
///
/// Returns whether a result was delivered. Nothing is sent once the owning
/// view is gone.
pub fn fetch_worker(
    source: &dyn BreedSource,
    page: u32,
    limit: u32,
    alive: &AtomicBool,
    tx: &Sender<BgMessage>,
) -> bool {
    let msg = match source.fetch_page(page, limit) {
        Ok(items) => BgMessage::PageLoaded { page, items },
        Err(error) => BgMessage::PageFailed { page, error },
    };

    if !alive.load(Ordering::SeqCst) {
        logging::warn(
            "FETCH",
            &BreedViewError::TornDown(page).to_string(),
        );
        return false;
    }
    tx.send(msg).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    /// Serves full pages and records which pages were requested
    struct StubSource {
        requested: Mutex<Vec<u32>>,
        fail_page: Option<u32>,
    }

    impl StubSource {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                requested: Mutex::new(Vec::new()),
                fail_page: None,
            })
        }

        fn failing_on(page: u32) -> Arc<Self> {
            Arc::new(Self {
                requested: Mutex::new(Vec::new()),
                fail_page: Some(page),
            })
        }
    }

    impl BreedSource for StubSource {
        fn fetch_page(&self, page: u32, limit: u32) -> Result<Vec<Value>> {
            self.requested.lock().unwrap().push(page);
            if self.fail_page == Some(page) {
                return Err(BreedViewError::UnexpectedStatus { page, status: 502 });
            }
            Ok((0..limit)
                .map(|i| {
                    let origin = if page == 1 && i == 0 { "Egypt" } else { "Elsewhere" };
                    json!({
                        "name": format!("Breed {page}-{i}"),
                        "child_friendly": 4,
                        "dog_friendly": 5,
                        "stranger_friendly": 3,
                        "origin": origin,
                        "description": format!("Description of breed {page}-{i}")
                    })
                })
                .collect())
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn mounted(source: Arc<StubSource>) -> App {
        let mut app = App::new(source, CatalogLimits::default());
        app.dispatch(CatalogEvent::Mounted);
        assert!(app.wait_for_message(Duration::from_secs(5)));
        app
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn mount_loads_first_page() {
        let source = StubSource::new();
        let app = mounted(source.clone());
        assert_eq!(app.catalog.records().len(), 10);
        assert_eq!(app.catalog.next_page(), 2);
        assert_eq!(app.cards.selected, Some(0));
        assert!(app.last_loaded.is_some());
        assert_eq!(*source.requested.lock().unwrap(), vec![1]);
    }

    #[test]
    fn reaching_bottom_fetches_next_page() {
        let source = StubSource::new();
        let mut app = mounted(source.clone());
        app.search.focused = false;
        app.cards.visible_rows = 3;

        app.handle_key(key(KeyCode::Down));
        assert!(!app.catalog.is_loading());

        app.handle_key(key(KeyCode::End));
        assert!(app.catalog.is_loading());
        // Single flight: another bottom hit does not start a second fetch
        app.handle_key(key(KeyCode::End));
        assert!(app.wait_for_message(Duration::from_secs(5)));

        assert_eq!(app.catalog.records().len(), 20);
        assert_eq!(*source.requested.lock().unwrap(), vec![1, 2]);
    }

    #[test]
    fn failed_page_leaves_state_unchanged() {
        let source = StubSource::failing_on(2);
        let mut app = mounted(source);
        app.search.focused = false;
        app.handle_key(key(KeyCode::End));
        assert!(app.wait_for_message(Duration::from_secs(5)));

        assert!(!app.catalog.is_loading());
        assert_eq!(app.catalog.records().len(), 10);
        assert_eq!(app.catalog.next_page(), 2);
    }

    #[test]
    fn typing_filters_and_escape_clears() {
        let mut app = mounted(StubSource::new());
        type_text(&mut app, "egypt");
        assert_eq!(app.catalog.query(), "egypt");
        assert_eq!(app.catalog.filtered_len(), 1);
        assert_eq!(app.visible_len(), 1);

        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.catalog.query(), "");
        assert_eq!(app.visible_len(), 10);
    }

    #[test]
    fn unmatched_query_shows_everything() {
        let mut app = mounted(StubSource::new());
        type_text(&mut app, "xyz");
        assert_eq!(app.catalog.filtered_len(), 0);
        assert!(app.catalog.is_unmatched_query());
        assert_eq!(app.visible_len(), 10);
    }

    #[test]
    fn enter_toggles_selected_card() {
        let mut app = mounted(StubSource::new());
        app.handle_key(key(KeyCode::Tab));
        app.handle_key(key(KeyCode::Down));
        let id = app.selected_id().unwrap();

        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.catalog.expanded_id(), Some(id.as_str()));
        app.handle_key(key(KeyCode::Char(' ')));
        assert_eq!(app.catalog.expanded_id(), None);
    }

    #[test]
    fn printable_key_in_list_starts_search() {
        let mut app = mounted(StubSource::new());
        app.search.focused = false;
        app.handle_key(key(KeyCode::Char('e')));
        assert!(app.search.focused);
        assert_eq!(app.catalog.query(), "e");
    }

    #[test]
    fn ctrl_c_quits() {
        let mut app = App::new(StubSource::new(), CatalogLimits::default());
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }

    #[test]
    fn worker_stays_silent_after_teardown() {
        let source = StubSource::new();
        let (tx, rx) = unbounded();
        let alive = AtomicBool::new(false);

        assert!(!fetch_worker(source.as_ref(), 1, 10, &alive, &tx));
        assert!(rx.try_recv().is_err());

        alive.store(true, Ordering::SeqCst);
        assert!(fetch_worker(source.as_ref(), 1, 10, &alive, &tx));
        assert!(matches!(rx.try_recv(), Ok(BgMessage::PageLoaded { page: 1, .. })));
    }

    #[test]
    fn dropping_app_clears_liveness_token() {
        let app = App::new(StubSource::new(), CatalogLimits::default());
        let alive = Arc::clone(&app.alive);
        drop(app);
        assert!(!alive.load(Ordering::SeqCst));
    }
}
