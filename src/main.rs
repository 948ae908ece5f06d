//! Hedgehog Dash entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use hedgehog_dash::audio::WebAudio;
    use hedgehog_dash::persistence::{GameStorage, LocalStorageStore};
    use hedgehog_dash::platform::{PointerPhase, is_game_key, key_to_input, pointer_to_input};
    use hedgehog_dash::renderer::{RenderState, Starfield, scene};
    use hedgehog_dash::ui::{format_high_score, format_score};
    use hedgehog_dash::{GameConfig, InputEvent, Session, SessionState};

    /// DOM elements the HUD writes to. Missing ones are skipped.
    struct Hud {
        score: Option<Element>,
        high_score: Option<Element>,
        start_prompt: Option<Element>,
        game_over: Option<Element>,
        final_score: Option<Element>,
        mute_button: Option<Element>,
    }

    impl Hud {
        fn find(document: &Document) -> Self {
            let lookup = |id: &str| {
                let el = document.get_element_by_id(id);
                if el.is_none() {
                    log::warn!("#{id} not found, skipping it");
                }
                el
            };
            Self {
                score: lookup("score"),
                high_score: lookup("high-score"),
                start_prompt: lookup("start-prompt"),
                game_over: lookup("game-over"),
                final_score: lookup("final-score"),
                mute_button: lookup("mute-btn"),
            }
        }

        fn update(&self, session: &Session) {
            if let Some(el) = &self.score {
                el.set_text_content(Some(&format_score(session.score())));
            }
            if let Some(el) = &self.high_score {
                el.set_text_content(Some(&format_high_score(session.high_score())));
            }
            if let Some(el) = &self.start_prompt {
                let class = if session.state() == SessionState::Waiting { "" } else { "hidden" };
                let _ = el.set_attribute("class", class);
            }
            if let Some(el) = &self.game_over {
                if session.state() == SessionState::Over {
                    let _ = el.set_attribute("class", "");
                    if let Some(score_el) = &self.final_score {
                        score_el.set_text_content(Some(&session.score().to_string()));
                    }
                } else {
                    let _ = el.set_attribute("class", "hidden");
                }
            }
            if let Some(el) = &self.mute_button {
                let label = if session.is_muted() { "Sound: Off" } else { "Sound: On" };
                el.set_text_content(Some(label));
            }
        }
    }

    /// Game instance holding all state
    struct Game {
        session: Session,
        render_state: RenderState,
        starfield: Starfield,
        hud: Hud,
        /// An animation frame is pending
        loop_running: bool,
    }

    impl Game {
        /// Draw the current state and refresh the HUD
        fn refresh(&mut self) {
            let vertices = scene(&self.session, &self.starfield);
            match self.render_state.render(&vertices) {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    let (w, h) = self.render_state.size;
                    self.render_state.resize(w, h);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
            self.hud.update(&self.session);
        }
    }

    /// Same clock as requestAnimationFrame timestamps
    fn now_ms() -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or_else(js_sys::Date::now)
    }

    /// Show a startup failure on the page
    fn report_fatal(message: &str) {
        log::error!("{message}");
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        if let Some(el) = document.get_element_by_id("error") {
            el.set_text_content(Some(message));
            let _ = el.set_attribute("class", "");
        } else if let Some(body) = document.body() {
            let _ = body.insert_adjacent_text("afterbegin", message);
        }
    }

    /// Optional `<script id="game-config" type="application/json">` block
    fn load_config(document: &Document) -> GameConfig {
        let Some(json) = document
            .get_element_by_id("game-config")
            .and_then(|el| el.text_content())
        else {
            return GameConfig::default();
        };
        match GameConfig::from_json(&json) {
            Ok(config) => {
                log::info!("Loaded game config from page");
                config
            }
            Err(e) => {
                log::warn!("Ignoring page config: {e}");
                GameConfig::default()
            }
        }
    }

    fn open_storage() -> GameStorage {
        match LocalStorageStore::open() {
            Ok(store) => GameStorage::new(Box::new(store)),
            Err(e) => {
                log::warn!("{e}; scores will not be saved");
                GameStorage::in_memory()
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Hedgehog Dash starting...");

        if let Err(message) = start().await {
            report_fatal(&message);
        }
    }

    async fn start() -> Result<(), String> {
        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no #canvas element on the page")?
            .dyn_into()
            .map_err(|_| "#canvas is not a canvas element")?;

        let mut config = load_config(&document);
        config.seed = js_sys::Date::now() as u64;
        let field = config.field;

        let dpr = window.device_pixel_ratio();
        let width = (field.width as f64 * dpr) as u32;
        let height = (field.height as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| format!("Failed to create surface: {e}"))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| format!("Failed to get adapter: {e}"))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height, field)
            .await
            .map_err(|e| e.to_string())?;

        let seed = config.seed;
        let session = Session::new(config, open_storage(), Box::new(WebAudio::new()))
            .map_err(|e| format!("Invalid game config: {e}"))?;

        let game = Rc::new(RefCell::new(Game {
            session,
            render_state,
            starfield: Starfield::new(&field, seed),
            hud: Hud::find(&document),
            loop_running: false,
        }));
        game.borrow_mut().refresh();

        setup_keyboard(game.clone());
        setup_pointer(&canvas, game.clone());
        setup_buttons(&document, game);

        log::info!("Hedgehog Dash ready (seed {seed})");
        Ok(())
    }

    /// Feed one event to the session and start the loop if a run began
    fn dispatch(game: &Rc<RefCell<Game>>, event: InputEvent) {
        let start_loop = {
            let mut g = game.borrow_mut();
            g.session.handle_input(event, now_ms());
            g.refresh();
            let start = g.session.is_playing() && !g.loop_running;
            if start {
                g.loop_running = true;
            }
            start
        };
        if start_loop {
            request_animation_frame(game.clone());
        }
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        for (kind, pressed) in [("keydown", true), ("keyup", false)] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let code = event.code();
                if is_game_key(&code) {
                    event.prevent_default();
                }
                if pressed && event.repeat() {
                    return;
                }
                if let Some(input) = key_to_input(&code, pressed) {
                    dispatch(&game, input);
                }
            });
            let _ = window.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_pointer(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        for (kind, phase) in [("mousedown", PointerPhase::Down), ("mouseup", PointerPhase::Up)] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                dispatch(&game, pointer_to_input(phase));
            });
            let _ = canvas.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        for (kind, phase) in [("touchstart", PointerPhase::Down), ("touchend", PointerPhase::Up)] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                dispatch(&game, pointer_to_input(phase));
            });
            let _ = canvas.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        for (id, input) in [("restart-btn", InputEvent::Restart), ("mute-btn", InputEvent::ToggleMute)] {
            let Some(btn) = document.get_element_by_id(id) else {
                log::warn!("#{id} not found, button disabled");
                continue;
            };
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                dispatch(&game, input);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let keep_going = {
            let mut g = game.borrow_mut();
            let keep_going = g.session.frame(time);
            g.refresh();
            g.loop_running = keep_going;
            keep_going
        };

        // Only re-arm while a run is in progress
        if keep_going {
            request_animation_frame(game);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    env_logger::init();
    log::info!("Hedgehog Dash (native) starting...");
    log::info!("Native mode runs a headless autopilot demo - use the web build to play");

    let config = match std::env::args().nth(1) {
        Some(path) => match load_config(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("{e}");
                return std::process::ExitCode::FAILURE;
            }
        },
        None => hedgehog_dash::GameConfig::default(),
    };

    match run_demo(config) {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            std::process::ExitCode::FAILURE
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn load_config(path: &str) -> Result<hedgehog_dash::GameConfig, String> {
    let json = std::fs::read_to_string(path).map_err(|e| format!("cannot read {path}: {e}"))?;
    hedgehog_dash::GameConfig::from_json(&json).map_err(|e| format!("{path}: {e}"))
}

/// Drive a session at 60 Hz with the autopilot until it crashes or time runs out
#[cfg(not(target_arch = "wasm32"))]
fn run_demo(config: hedgehog_dash::GameConfig) -> Result<(), hedgehog_dash::config::ConfigError> {
    use hedgehog_dash::audio::SilentAudio;
    use hedgehog_dash::consts::REFERENCE_FRAME_MS;
    use hedgehog_dash::persistence::GameStorage;
    use hedgehog_dash::sim::autopilot_should_jump;
    use hedgehog_dash::ui::{format_high_score, format_score};
    use hedgehog_dash::{InputEvent, Session};

    const DEMO_LIMIT_MS: f64 = 120_000.0;

    let mut session = Session::new(config, GameStorage::in_memory(), Box::new(SilentAudio))?;
    let mut now = 0.0;
    session.handle_input(InputEvent::Start, now);

    let mut jumps = 0u32;
    loop {
        now += REFERENCE_FRAME_MS;
        if session.actor().is_charging() {
            session.handle_input(InputEvent::JumpRelease, now);
        } else if autopilot_should_jump(session.actor(), session.obstacles()) {
            session.handle_input(InputEvent::JumpPress, now);
            jumps += 1;
        }
        if !session.frame(now) || now >= DEMO_LIMIT_MS {
            break;
        }
    }

    log::info!(
        "demo finished after {:.1}s: score {} ({}), {} jumps, final speed {:.2}",
        now / 1000.0,
        format_score(session.score()),
        format_high_score(session.high_score()),
        jumps,
        session.manager().speed()
    );
    Ok(())
}
