use crate::config::{load_settings, save_settings_atomic, Cli, Paths, Settings};
use crate::frame::SceneContext;
use crate::input::{collect_input_nonblocking, map_key_to_action, InputEvent};
use crate::model::{MoodLog, Scene};
use crate::raster::Pixel;
use crate::render::{canvas_to_cells, draw_box, ui_panel, Terminal};
use crate::state::{Effect, UiState, NOTE_MAX_CHARS};
use crate::storage::{load_log, save_log_atomic};
use crate::strategy::CATALOG;
use crate::surface::Point;
use std::time::{Duration, Instant};

pub(crate) struct App {
    settings: Settings,
    fps_cap: u32,
    enable_color: bool,
    paths: Paths,
    log: MoodLog,
    ui: UiState,
    scene: SceneContext,
    term: Terminal,
    pointer: Option<(u16, u16)>,
    should_quit: bool,
}

impl App {
    fn init(cli: Cli, paths: Paths) -> anyhow::Result<Self> {
        let settings = load_settings(&paths.settings_path);
        let log = load_log(&paths.history_path);

        // flags only shape this run; the saved file keeps its own values
        let mut session = settings.clone();
        cli.apply(&mut session);
        let seed = match session.seed {
            0 => rand::random(),
            s => s,
        };
        tracing::info!(
            seed,
            weather = session.enable_weather,
            timeline = session.enable_timeline,
            entries = log.entries.len(),
            "session settings"
        );

        let term = Terminal::begin()?;
        Ok(Self {
            ui: UiState::new(session.defaults),
            scene: SceneContext::new(seed, session.frame_options()),
            fps_cap: session.fps_cap.clamp(10, 240),
            enable_color: session.enable_color,
            settings,
            paths,
            log,
            term,
            pointer: None,
            should_quit: false,
        })
    }

    fn run(&mut self) -> anyhow::Result<()> {
        let frame_dt = Duration::from_secs_f32(1.0 / self.fps_cap as f32);

        while !self.should_quit {
            let frame_start = Instant::now();
            if self.term.resize_if_needed()? {
                self.pointer = None;
            }

            for ev in collect_input_nonblocking(frame_dt)? {
                match ev {
                    InputEvent::Key { key, mods } => {
                        if let Some(action) = map_key_to_action(&self.ui.scene, key, mods) {
                            let effect = self.ui.apply(action, chrono::Utc::now(), Instant::now());
                            self.handle(effect)?;
                        }
                    }
                    InputEvent::Pointer { col, row } => self.pointer = Some((col, row)),
                    InputEvent::PointerLost => self.pointer = None,
                }
                if self.should_quit {
                    break;
                }
            }

            self.render_frame()?;
            spin_sleep(frame_dt, frame_start);
        }

        self.term.end()?;
        save_settings_atomic(&self.paths.settings_path, &self.settings)?;
        tracing::info!("bye");
        Ok(())
    }

    fn handle(&mut self, effect: Effect) -> anyhow::Result<()> {
        match effect {
            Effect::None => {}
            Effect::Quit => self.should_quit = true,
            Effect::Append(entry) => {
                self.log.push(entry);
                tracing::info!(entries = self.log.entries.len(), "mood logged");
                self.save_log()?;
            }
            Effect::Clear => {
                self.log.clear();
                tracing::info!("mood log cleared");
                self.save_log()?;
            }
        }
        Ok(())
    }

    fn save_log(&self) -> anyhow::Result<()> {
        save_log_atomic(&self.paths.history_path, &self.log)
    }

    fn render_frame(&mut self) -> anyhow::Result<()> {
        let bg = crossterm::style::Color::Black;
        self.term.cur.clear(bg);

        let layout = self.term.layout();
        let vp = layout.canvas;
        let (w, h) = vp.pixel_size();
        self.term.canvas.ensure_size(w, h, vp.scale);
        self.term.canvas.clear(Pixel::default());

        let pointer: Option<Point> = self.pointer.and_then(|(c, r)| vp.to_logical(c, r));
        let report = self
            .scene
            .tick(self.ui.mood, &mut self.term.canvas, &self.log.entries, pointer);
        canvas_to_cells(&self.term.canvas, &mut self.term.cur, vp, self.enable_color);

        let toast = self.ui.toast_text(Instant::now());
        ui_panel(&mut self.term.cur, &self.ui, &report, &self.log, toast);

        match &self.ui.scene {
            Scene::Main => {}
            Scene::Help => draw_box(
                &mut self.term.cur,
                "How it works",
                "The flower mirrors three inputs you set yourself.\n\
                 Motivation grows the stem, bloom and leaves.\n\
                 Focus steadies the sway and clears the sky.\n\
                 Stress grays the plant, droops the leaves and changes the face.\n\
                 Stress above 70 brings rain; motivation above 80 brings petals.\n\n\
                 1/2/3 or up/down select, left/right adjust, shift for steps of 10.\n\
                 L logs your mood with a note. The strip below the flower shows\n\
                 your log; hover a segment with the mouse for details.\n\
                 S opens coping strategies. X clears the log.\n\n\
                 Esc or H to close help.",
            ),
            Scene::Journal { draft } => {
                let mut preview = draft.clone();
                preview.push('_');
                draw_box(
                    &mut self.term.cur,
                    "Log your mood",
                    &format!(
                        "Motivation {}  Focus {}  Stress {}\n\nNote (optional, max {NOTE_MAX_CHARS} chars):\n{preview}\n\nEnter save | Esc cancel | Backspace delete",
                        self.ui.mood.motivation, self.ui.mood.focus, self.ui.mood.stress
                    ),
                );
            }
            Scene::Strategies { cursor } => {
                let mut body = String::new();
                for (i, s) in CATALOG.iter().enumerate() {
                    let mark = if i == *cursor { '>' } else { ' ' };
                    body.push_str(&format!("{mark} [{:<10}] {}\n", s.category.label(), s.title));
                }
                body.push_str("\nEnter open | Esc back");
                draw_box(&mut self.term.cur, "Coping strategies", &body);
            }
            Scene::Strategy { index } => {
                if let Some(s) = CATALOG.get(*index) {
                    let mut body = format!("{}\n\n", s.description);
                    for (n, step) in s.steps.iter().enumerate() {
                        body.push_str(&format!("{}. {}\n", n + 1, step));
                    }
                    body.push_str("\nEnter mark complete | Esc back");
                    draw_box(&mut self.term.cur, s.title, &body);
                }
            }
            Scene::ConfirmClear => draw_box(
                &mut self.term.cur,
                "Clear all logs?",
                "This removes every saved mood entry and cannot be undone.\n\nY clear | N keep",
            ),
        }

        self.term.present(true)?;
        Ok(())
    }
}

pub(crate) fn run(cli: Cli, paths: Paths) -> anyhow::Result<()> {
    let mut app = App::init(cli, paths)?;
    let result = app.run();
    if result.is_err() {
        // leave the user with a usable shell even on failure
        let _ = app.term.end();
    }
    result
}

/* -----------------------------
   Frame pacing helper
------------------------------ */

fn spin_sleep(target: Duration, start: Instant) {
    let end = start + target;
    loop {
        let t = Instant::now();
        if t >= end {
            break;
        }
        let left = end - t;
        if left > Duration::from_millis(2) {
            std::thread::sleep(Duration::from_millis(1));
        } else {
            std::hint::spin_loop();
        }
    }
}
