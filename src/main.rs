//! Asteroid Rush entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlInputElement, HtmlSelectElement};

    use asteroid_rush::audio::{AudioManager, AudioSink};
    use asteroid_rush::platform::storage::LocalStorage;
    use asteroid_rush::platform::{FpsCounter, KeyState, now_ms};
    use asteroid_rush::renderer::{CanvasRenderer, FrameInfo};
    use asteroid_rush::sim::{Difficulty, GamePhase};
    use asteroid_rush::{Game, Settings};

    /// Everything the frame callback touches
    struct App {
        game: Game<LocalStorage>,
        keys: KeyState,
        audio: AudioManager,
        renderer: CanvasRenderer,
        fps: FpsCounter,
        last_phase: GamePhase,
        /// Settings panel lives here
        document: Document,
    }

    impl App {
        /// Tick, play queued sounds, draw
        fn frame(&mut self) {
            let now = now_ms();
            let input = self.keys.take_tick_input();
            self.game.tick(&input, now);

            for event in self.game.take_events() {
                self.audio.play(event);
            }
            self.audio.update();
            self.fps.frame(now);

            let settings = self.game.settings();
            let frame = FrameInfo {
                thrusting: input.controls.thrust,
                show_particles: settings.particles,
                show_fps: settings.show_fps,
                fps: self.fps.fps(),
                ship_color: &settings.ship_color,
            };
            self.renderer.render(self.game.state(), &frame);
        }

        /// Update HUD elements in DOM
        fn update_hud(&mut self, document: &Document) {
            let hud = self.game.hud();
            set_text(document, "score", &hud.score_text());
            set_text(document, "high-score", &hud.high_score.to_string());
            set_text(document, "level", &hud.level.to_string());
            set_text(document, "time", &hud.time);

            let phase = self.game.phase();
            if phase == self.last_phase {
                return;
            }
            self.last_phase = phase;

            set_hidden(document, "pause-menu", phase != GamePhase::Paused);
            set_hidden(document, "game-over", phase != GamePhase::GameOver);
            if let Some(stats) = self.game.final_stats() {
                set_text(document, "final-score", &stats.score.to_string());
                set_text(document, "final-best", &stats.best.to_string());
                set_text(document, "final-level", &stats.level.to_string());
                set_text(document, "final-time", &stats.time);
                set_hidden(document, "new-record", !stats.new_high_score);
            }
        }

        /// Restart with the stored settings and show them in the panel
        fn restart(&mut self) {
            self.keys.clear();
            self.game.restart(now_ms());
            self.audio.apply_settings(self.game.settings());
            sync_settings_controls(&self.document, self.game.settings());
        }

        fn apply_settings(&mut self, settings: Settings) {
            self.audio.apply_settings(&settings);
            self.game.apply_settings(settings);
            sync_settings_controls(&self.document, self.game.settings());
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_hidden(document: &Document, id: &str, hidden: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", hidden);
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialised".into());
        }

        log::info!("Asteroid Rush starting...");

        let Some(window) = web_sys::window() else {
            log::error!("No window");
            return;
        };
        let Some(document) = window.document() else {
            log::error!("No document");
            return;
        };
        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No canvas element");
            return;
        };

        let bounds = fit_canvas(&canvas);
        let renderer = match CanvasRenderer::new(&canvas) {
            Ok(r) => r,
            Err(e) => {
                log::error!("{e}");
                return;
            }
        };

        let seed = js_sys::Date::now() as u64;
        let game = Game::new(LocalStorage::new(), bounds, seed, now_ms());
        let audio = AudioManager::new(game.settings());
        let last_phase = game.phase();
        sync_settings_controls(&document, game.settings());

        let app = Rc::new(RefCell::new(App {
            game,
            keys: KeyState::new(),
            audio,
            renderer,
            fps: FpsCounter::new(now_ms()),
            last_phase,
            document: document.clone(),
        }));

        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(app.clone());
        setup_buttons(app.clone(), &document);
        setup_settings(app.clone(), &document);
        setup_resize(app.clone(), canvas);

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.class_list().add_1("hidden");
        }

        // Start game loop
        request_animation_frame(app);

        log::info!("Asteroid Rush running!");
    }

    /// Match the backing store to the displayed size
    fn fit_canvas(canvas: &HtmlCanvasElement) -> Vec2 {
        let width = canvas.client_width().max(1) as u32;
        let height = canvas.client_height().max(1) as u32;
        canvas.set_width(width);
        canvas.set_height(height);
        Vec2::new(width as f32, height as f32)
    }

    fn setup_input_handlers(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else { return };

        // Key down
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut a = app.borrow_mut();
                // Browsers only allow audio after a gesture
                a.audio.resume();
                match event.key().to_lowercase().as_str() {
                    " " => {
                        event.prevent_default();
                        a.keys.request_fire();
                    }
                    "p" => a.keys.request_pause(),
                    "m" => {
                        let mut settings = a.game.settings().clone();
                        settings.music = !settings.music;
                        log::info!("Music: {}", settings.music);
                        a.apply_settings(settings);
                    }
                    key => {
                        if key.starts_with("arrow") {
                            event.prevent_default();
                        }
                        a.keys.key_down(key);
                    }
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                app.borrow_mut().keys.key_up(&event.key());
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window blur: drop held keys so the ship doesn't keep turning
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                app.borrow_mut().keys.clear();
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn on_click(document: &Document, id: &str, mut f: impl FnMut() + 'static) {
        if let Some(btn) = document.get_element_by_id(id) {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| f());
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(app: Rc<RefCell<App>>, document: &Document) {
        {
            let app = app.clone();
            on_click(document, "restart-btn", move || {
                app.borrow_mut().restart();
                log::info!("Restart requested");
            });
        }
        {
            let app = app.clone();
            on_click(document, "pause-btn", move || {
                app.borrow_mut().game.toggle_pause(now_ms());
            });
        }
        on_click(document, "resume-btn", move || {
            app.borrow_mut().game.resume(now_ms());
        });
    }

    /// Put stored settings into the settings panel
    fn sync_settings_controls(document: &Document, settings: &Settings) {
        let checkbox = |id: &str, value: bool| {
            if let Some(el) = input(document, id) {
                el.set_checked(value);
            }
        };
        checkbox("sound-toggle", settings.sound);
        checkbox("music-toggle", settings.music);
        checkbox("particles-toggle", settings.particles);
        checkbox("fps-toggle", settings.show_fps);
        if let Some(el) = input(document, "music-volume") {
            el.set_value(&((settings.music_volume * 100.0).round() as u32).to_string());
        }
        if let Some(el) = input(document, "ship-color") {
            el.set_value(&settings.ship_color);
        }
        if let Some(el) = select(document, "difficulty") {
            el.set_value(settings.difficulty.as_str());
        }
    }

    fn input(document: &Document, id: &str) -> Option<HtmlInputElement> {
        document.get_element_by_id(id)?.dyn_into().ok()
    }

    fn select(document: &Document, id: &str) -> Option<HtmlSelectElement> {
        document.get_element_by_id(id)?.dyn_into().ok()
    }

    /// Wire one settings control to a field
    fn bind_setting(
        app: &Rc<RefCell<App>>,
        document: &Document,
        id: &str,
        event: &str,
        apply: impl Fn(&mut Settings, &Document) + 'static,
    ) {
        let Some(el) = document.get_element_by_id(id) else {
            return;
        };
        let app = app.clone();
        let doc = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let mut a = app.borrow_mut();
            let mut settings = a.game.settings().clone();
            apply(&mut settings, &doc);
            a.apply_settings(settings);
        });
        let _ = el.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_settings(app: Rc<RefCell<App>>, document: &Document) {
        let checked = |doc: &Document, id: &str| input(doc, id).map(|el| el.checked());

        bind_setting(&app, document, "sound-toggle", "change", move |s, doc| {
            s.sound = checked(doc, "sound-toggle").unwrap_or(s.sound);
        });
        bind_setting(&app, document, "music-toggle", "change", move |s, doc| {
            s.music = checked(doc, "music-toggle").unwrap_or(s.music);
        });
        bind_setting(&app, document, "particles-toggle", "change", move |s, doc| {
            s.particles = checked(doc, "particles-toggle").unwrap_or(s.particles);
        });
        bind_setting(&app, document, "fps-toggle", "change", move |s, doc| {
            s.show_fps = checked(doc, "fps-toggle").unwrap_or(s.show_fps);
        });
        bind_setting(&app, document, "music-volume", "input", |s, doc| {
            if let Some(vol) = input(doc, "music-volume").and_then(|el| el.value().parse::<f32>().ok()) {
                s.set_music_volume(vol / 100.0);
            }
        });
        bind_setting(&app, document, "ship-color", "input", |s, doc| {
            if let Some(el) = input(doc, "ship-color") {
                s.ship_color = el.value();
            }
        });
        bind_setting(&app, document, "difficulty", "change", |s, doc| {
            let picked = select(doc, "difficulty").map(|el| el.value());
            if let Some(d) = picked.as_deref().and_then(Difficulty::from_control) {
                s.difficulty = d;
            }
        });
    }

    fn setup_resize(app: Rc<RefCell<App>>, canvas: HtmlCanvasElement) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let bounds = fit_canvas(&canvas);
            let mut a = app.borrow_mut();
            a.renderer.resize(bounds.x, bounds.y);
            a.game.resize(bounds);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |_time: f64| {
            game_loop(app);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>) {
        {
            let mut a = app.borrow_mut();
            a.frame();
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                a.update_hud(&document);
            }
        }

        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Ticks per second of the headless session
#[cfg(not(target_arch = "wasm32"))]
const HEADLESS_FPS: f64 = 60.0;
/// Upper bound on a headless session (five minutes of play)
#[cfg(not(target_arch = "wasm32"))]
const HEADLESS_MAX_TICKS: u64 = 5 * 60 * 60;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use asteroid_rush::Game;
    use asteroid_rush::persistence::MemoryStorage;
    use asteroid_rush::sim::GamePhase;
    use glam::Vec2;

    env_logger::init();
    log::info!("Asteroid Rush (native) starting...");
    log::info!("Native mode runs a headless autopilot - serve the wasm build to play");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| asteroid_rush::platform::now_ms() as u64);

    let frame_ms = 1000.0 / HEADLESS_FPS;
    let mut game = Game::new(MemoryStorage::new(), Vec2::new(800.0, 600.0), seed, 0.0);
    let mut ticks = 0;
    while game.phase() == GamePhase::Running && ticks < HEADLESS_MAX_TICKS {
        ticks += 1;
        let input = autopilot::steer(game.state(), ticks);
        game.tick(&input, ticks as f64 * frame_ms);
        game.take_events();
    }

    let hud = game.hud();
    match game.final_stats() {
        Some(stats) => log::info!("Autopilot destroyed: {:?}", stats),
        None => log::info!("Autopilot survived: {:?}", hud),
    }
    println!(
        "seed {seed}: score {} level {} time {}",
        hud.score, hud.level, hud.time
    );
}

#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use asteroid_rush::sim::{GameState, ShipControls, TickInput};

    /// Heading error (radians) inside which the ship fires
    const AIM_TOLERANCE: f32 = 0.15;
    /// Ticks between shots
    const FIRE_INTERVAL: u64 = 8;

    /// Turn toward the nearest asteroid and fire when roughly lined up
    pub fn steer(state: &GameState, tick: u64) -> TickInput {
        let ship = &state.ship;
        let Some(target) = state
            .asteroids
            .iter()
            .min_by(|a, b| {
                a.pos
                    .distance_squared(ship.pos)
                    .total_cmp(&b.pos.distance_squared(ship.pos))
            })
        else {
            return TickInput::default();
        };

        let error = heading_error(ship.angle, (target.pos - ship.pos).to_angle());
        TickInput {
            controls: ShipControls {
                turn_left: error < -AIM_TOLERANCE / 2.0,
                turn_right: error > AIM_TOLERANCE / 2.0,
                thrust: false,
            },
            fire: error.abs() < AIM_TOLERANCE && tick % FIRE_INTERVAL == 0,
            pause: false,
        }
    }

    /// Signed shortest rotation from `current` to `desired`, in (-PI, PI]
    pub fn heading_error(current: f32, desired: f32) -> f32 {
        use std::f32::consts::{PI, TAU};
        let diff = (desired - current).rem_euclid(TAU);
        if diff > PI { diff - TAU } else { diff }
    }

}
