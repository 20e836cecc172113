use crate::config::{
    init_logging, load_settings, project_paths, save_settings_atomic, Args, Paths, Settings,
};
use crate::input::{collect_input, map_event, Command};
use crate::render::{draw_frame, draw_status, logical_size, status_lines, Terminal};
use anyhow::Context;
use life_braille::{DotMatrixRenderer, Session};
use log::{info, warn};
use std::time::{Duration, Instant};

const MARQUEE_PERIOD: Duration = Duration::from_secs(3);
/// Upper bound on one input wait, so resizes are noticed while stopped.
const MAX_WAIT: Duration = Duration::from_millis(100);

pub(crate) struct App {
    stored: Settings,
    settings: Settings,
    paths: Paths,
    session: Session,
    term: Terminal,
    should_quit: bool,
    marquee_index: usize,
    marquee_at: Instant,
}

impl App {
    fn init(args: Args) -> anyhow::Result<Self> {
        let paths = project_paths()?;
        let log_path = args.log_file.clone().unwrap_or_else(|| paths.log_path.clone());
        init_logging(&log_path)?;

        let stored = load_settings(&paths.settings_path);
        let settings = stored.with_args(&args);

        let mut term = Terminal::begin()?;
        let (w, h) = logical_size(term.cols, term.rows, settings.status_rows);
        let renderer = DotMatrixRenderer::new(settings.dot_layout, settings.cursor_glyph);
        let now = Instant::now();
        let mut session = match Session::new(w, h, settings.speed_level, renderer, now) {
            Ok(s) => s,
            Err(e) => {
                term.end()?;
                return Err(e).context("terminal too small for the grid");
            }
        };

        if settings.seed_density > 0.0 {
            session.seed_random(&mut rand::thread_rng(), settings.seed_density);
            info!("seeded grid at density {}", settings.seed_density);
        }

        Ok(Self {
            stored,
            settings,
            paths,
            session,
            term,
            should_quit: false,
            marquee_index: 0,
            marquee_at: now + MARQUEE_PERIOD,
        })
    }

    fn run(&mut self) -> anyhow::Result<()> {
        let mut dirty = true;

        while !self.should_quit {
            if self.term.resize_if_needed()? {
                let (w, h) = logical_size(self.term.cols, self.term.rows, self.settings.status_rows);
                // A rejected resize keeps the old grid; the reason is logged.
                let _ = self.session.resize(w, h);
                dirty = true;
            }

            if dirty {
                self.render_frame()?;
                dirty = false;
            }

            let now = Instant::now();
            let wait = self
                .session
                .clock()
                .time_until_tick(now)
                .unwrap_or(MAX_WAIT)
                .min(self.marquee_at.saturating_duration_since(now))
                .min(MAX_WAIT);

            for ev in collect_input(wait)? {
                let Some(cmd) = map_event(self.session.catalog(), self.settings.cursor_step, &ev)
                else {
                    continue;
                };
                self.apply(cmd);
                dirty = true;
                if self.should_quit {
                    break;
                }
            }

            let now = Instant::now();
            if self.session.tick(now) {
                dirty = true;
            }
            if now >= self.marquee_at {
                self.marquee_index = (self.marquee_index + 1) % self.session.catalog().shapes().len();
                self.marquee_at = now + MARQUEE_PERIOD;
                dirty = true;
            }
        }

        self.session.stop();
        Ok(())
    }

    fn apply(&mut self, cmd: Command) {
        match cmd {
            Command::MoveCursor(dx, dy) => self.session.move_cursor(dx, dy),
            Command::Toggle => self.session.toggle_cell(),
            Command::Stamp(key) => {
                self.session.stamp_shape(key);
            }
            Command::Speed(level) => self.session.set_speed(level, Instant::now()),
            Command::Quit => self.should_quit = true,
        }
    }

    fn render_frame(&mut self) -> anyhow::Result<()> {
        self.term.cur.clear();

        let frame = self.session.render_frame();
        draw_frame(&mut self.term.cur, &frame, self.settings.enable_color);

        let top = self.term.rows.saturating_sub(self.settings.status_rows);
        let lines = status_lines(&self.session, self.marquee_index);
        draw_status(&mut self.term.cur, top, &lines, self.settings.enable_color);

        self.term.present()
    }

    /// Persist the stored settings, carrying over the last speed picked.
    fn save_settings(&mut self) -> anyhow::Result<()> {
        self.stored.speed_level = self.session.clock().level();
        save_settings_atomic(&self.paths.settings_path, &self.stored)
    }
}

pub(crate) fn run(args: Args) -> anyhow::Result<()> {
    let mut app = App::init(args)?;
    let result = app.run();
    app.term.end()?;
    if let Err(e) = &result {
        warn!("exiting on error: {e:#}");
    }
    app.save_settings()?;
    result
}
