//! Drop Dash entry point
//!
//! On the web this binds the page, wires input and runs the frame loop.
//! Natively it plays a seeded autopilot run and prints a JSON summary.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, KeyboardEvent, MouseEvent, TouchEvent};

    use drop_dash::consts::*;
    use drop_dash::platform::Presenter;
    use drop_dash::platform::dom::DomStage;
    use drop_dash::sim::{FrameDriver, GamePhase, GameState, TickInput};
    use drop_dash::tuning::Tuning;

    /// Game instance holding all state
    struct Game {
        state: GameState,
        driver: FrameDriver,
        presenter: Presenter<DomStage>,
        input: TickInput,
        last_time: f64,
        loop_active: bool,
    }

    impl Game {
        fn new(seed: u64, tuning: Tuning, stage: DomStage) -> Self {
            let mut game = Self {
                state: GameState::new(seed, tuning),
                driver: FrameDriver::new(),
                presenter: Presenter::new(stage),
                input: TickInput::default(),
                last_time: 0.0,
                loop_active: false,
            };
            game.presenter.show_idle(&mut game.state);
            game
        }

        /// Begin a run from the start or game-over screen
        fn start(&mut self) {
            self.presenter.refresh_field(&mut self.state);
            self.state.start();
            self.driver.reset();
            self.input.jump_held = false;
            self.input.jump_pressed = false;
            self.last_time = 0.0;
            self.presenter.sync(&mut self.state);
        }

        fn toggle_pause(&mut self) {
            self.state.toggle_pause();
            self.last_time = 0.0;
            self.presenter.sync(&mut self.state);
        }

        fn auto_pause(&mut self, why: &str) {
            if self.state.phase == GamePhase::Running {
                self.state.pause();
                self.presenter.sync(&mut self.state);
                log::info!("Auto-paused ({why})");
            }
        }

        /// Run one display frame; false once the loop should stop
        fn frame(&mut self, time: f64) -> bool {
            let dt = if self.last_time > 0.0 {
                time - self.last_time
            } else {
                SIM_DT_MS
            };
            self.last_time = time;

            // The page may have been resized since the last frame
            self.presenter.refresh_field(&mut self.state);
            let result = self.driver.advance(&mut self.state, &mut self.input, dt);
            self.presenter.sync(&mut self.state);
            result.keep_running
        }
    }

    /// Read optional balance overrides from `<script id="tuning" type="application/json">`
    fn page_tuning(document: &Document) -> Tuning {
        let Some(json) = document
            .get_element_by_id("tuning")
            .and_then(|el| el.text_content())
        else {
            return Tuning::default();
        };
        match Tuning::from_json(&json) {
            Ok(tuning) => {
                log::info!("Loaded page tuning");
                tuning
            }
            Err(e) => {
                log::warn!("Ignoring page tuning: {e}");
                Tuning::default()
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Drop Dash starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let Some(stage) = DomStage::from_document(document.clone()) else {
            log::error!("Page is missing #game-container or #player");
            return;
        };

        let seed = js_sys::Date::now() as u64;
        let tuning = page_tuning(&document);
        let game = Rc::new(RefCell::new(Game::new(seed, tuning, stage)));

        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(&document, game.clone());
        setup_buttons(&document, game.clone());
        setup_auto_pause(&document, game);
    }

    /// Schedule the frame loop unless it is already running
    fn ensure_loop(game: &Rc<RefCell<Game>>) {
        {
            let mut g = game.borrow_mut();
            if g.loop_active {
                return;
            }
            g.loop_active = true;
        }
        request_animation_frame(game.clone());
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
        let keep_running = {
            let mut g = game.borrow_mut();
            let keep = g.frame(time);
            if !keep {
                g.loop_active = false;
                g.last_time = 0.0;
            }
            keep
        };

        if keep_running {
            request_animation_frame(game);
        }
    }

    /// Record a jump input edge. A press is also latched so a tap released
    /// before the next frame still jumps.
    fn set_jump(game: &Rc<RefCell<Game>>, held: bool) {
        let mut g = game.borrow_mut();
        g.input.jump_held = held;
        if held {
            g.input.jump_pressed = true;
        }
    }

    fn setup_input_handlers(document: &Document, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                match event.key().as_str() {
                    " " | "ArrowUp" => {
                        event.prevent_default();
                        if !event.repeat() {
                            set_jump(&game, true);
                        }
                    }
                    "p" | "P" | "Escape" => game.borrow_mut().toggle_pause(),
                    "d" | "D" => {
                        let mut g = game.borrow_mut();
                        g.input.autopilot = !g.input.autopilot;
                        log::info!("Autopilot: {}", g.input.autopilot);
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if matches!(event.key().as_str(), " " | "ArrowUp") {
                    set_jump(&game, false);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        let Some(container) = document.get_element_by_id("game-container") else {
            return;
        };

        // Mouse
        for (name, held) in [("mousedown", true), ("mouseup", false), ("mouseleave", false)] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                set_jump(&game, held);
            });
            let _ = container
                .add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch
        for (name, held) in [("touchstart", true), ("touchend", false), ("touchcancel", false)] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                set_jump(&game, held);
            });
            let _ = container
                .add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        for id in ["start-button", "restart-button"] {
            if let Some(btn) = document.get_element_by_id(id) {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                    game.borrow_mut().start();
                    ensure_loop(&game);
                });
                let _ =
                    btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }

        if let Some(btn) = document.get_element_by_id("pause-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().toggle_pause();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(document: &Document, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    game.borrow_mut().auto_pause("tab hidden");
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().auto_pause("window blur");
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

/// Simulated seconds a native demo run may last
#[cfg(not(target_arch = "wasm32"))]
const DEMO_SECONDS: f64 = 180.0;

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    use drop_dash::Tuning;
    use drop_dash::platform::play_demo;

    env_logger::init();

    // drop-dash [seed] [tuning.json]
    let mut args = std::env::args().skip(1);
    let seed = match args.next() {
        Some(arg) => arg.parse::<u64>()?,
        None => 42,
    };
    let tuning = match args.next() {
        Some(path) => Tuning::load(&path)?,
        None => Tuning::default(),
    };

    log::info!("Drop Dash (native) demo with seed {}", seed);
    let summary = play_demo(seed, tuning, DEMO_SECONDS);
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
