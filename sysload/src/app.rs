//! App state and main loop: input handling, pumping the feed, and drawing.

use std::{cell::RefCell, io, rc::Rc, time::Duration};

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};
use tokio::time::sleep;
use tracing::info;

use sysload::assembler::SeriesAssembler;
use sysload::history::{Windows, DEFAULT_SEED};
use sysload::stream::StreamController;
use sysload::ws::WsFeed;

use crate::ui::{header::draw_header, load::draw_load_chart};

const TICK: Duration = Duration::from_millis(250);

pub struct App {
    url: String,
    capacity: usize,
    feed: Rc<WsFeed>,
    stream: StreamController<WsFeed>,
    series: SeriesAssembler,

    // Quit flag
    should_quit: bool,
}

impl App {
    pub fn new(url: &str, capacity: usize) -> Result<Self> {
        let feed = WsFeed::spawn(url)?;
        let windows = Rc::new(RefCell::new(Windows::seeded(capacity, &DEFAULT_SEED)));
        let stream = StreamController::new(Rc::clone(&feed), Rc::clone(&windows));
        let series = SeriesAssembler::new(windows);
        stream.start();
        Ok(Self {
            url: url.to_string(),
            capacity,
            feed,
            stream,
            series,
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        // Terminal setup
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        // Main loop
        let res = self.event_loop(&mut terminal).await;

        // Teardown
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        res
    }

    async fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<()> {
        loop {
            // Input (non-blocking)
            while event::poll(Duration::from_millis(10))? {
                if let Event::Key(k) = event::read()? {
                    if k.kind == KeyEventKind::Press {
                        self.handle_key(k.code);
                    }
                }
            }
            if self.should_quit {
                break;
            }

            self.feed.pump();

            terminal.draw(|f| self.draw(f))?;

            sleep(TICK).await;
        }
        info!("quitting");
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char(' ') | KeyCode::Char('s') | KeyCode::Char('S') => {
                let state = self.stream.toggle();
                info!("stream {}", state.label());
            }
            _ => {}
        }
    }

    pub fn draw(&self, f: &mut ratatui::Frame<'_>) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Min(5)])
            .split(f.area());

        draw_header(f, rows[0], &self.url, self.stream.state());
        draw_load_chart(f, rows[1], &self.series.assemble(), self.capacity);
    }
}
