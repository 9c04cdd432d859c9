//! Wave Arena entry point
//!
//! Browser: wires DOM events, the 2D canvas and the HUD to the simulation and
//! runs it from `requestAnimationFrame`. Native: runs a headless autoplay
//! session and prints its summary as JSON.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{GamepadEvent, KeyboardEvent, MouseEvent, TouchEvent};

    use wave_arena::StartupError;
    use wave_arena::platform::InputAdapter;
    use wave_arena::platform::web::{DomHud, RESTART_ID, WebCanvas, poll_gamepad};
    use wave_arena::renderer::{FpsCounter, draw_frame};
    use wave_arena::settings::Settings;
    use wave_arena::sim::{GamePhase, GameState, tick};
    use wave_arena::ui::HudSync;

    /// Game instance holding all state
    struct Game {
        state: GameState,
        input: InputAdapter,
        canvas: WebCanvas,
        hud: DomHud,
        hud_sync: HudSync,
        fps: FpsCounter,
        debug: bool,
    }

    impl Game {
        /// One animation frame: input → tick → draw → HUD
        fn frame(&mut self, time_ms: f64, navigator: &web_sys::Navigator) {
            poll_gamepad(navigator, &mut self.input);
            let input = self.input.sample(self.state.player.center());
            tick(&mut self.state, &input, time_ms / 1000.0);

            let fps = self.fps.record(time_ms);
            let debug_fps = self.debug.then_some(fps);
            draw_frame(&mut self.canvas, &self.state, debug_fps);
            self.hud_sync.sync(&self.state, &mut self.hud);
        }
    }

    pub fn run() -> Result<(), StartupError> {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"logger already initialised".into());
        }

        log::info!("Wave Arena starting...");
        let settings = Settings::load();

        let window = web_sys::window().ok_or(StartupError::NoWindow)?;
        let document = window.document().ok_or(StartupError::NoWindow)?;

        let canvas = WebCanvas::from_document(&document)?;
        let hud = DomHud::from_document(&document)?;
        let arena = canvas.fit_to_window(&window);

        let seed = js_sys::Date::now() as u64;
        let mut state = GameState::new(seed, arena);
        state.clock.set_max_factor(settings.max_delta_factor);
        log::info!("Game initialized with seed: {}", seed);

        let game = Rc::new(RefCell::new(Game {
            state,
            input: InputAdapter::new(settings.gamepad_dead_zone),
            canvas,
            hud,
            hud_sync: HudSync::default(),
            fps: FpsCounter::default(),
            debug: settings.debug,
        }));

        setup_keyboard(&window, game.clone());
        setup_pointer(game.clone());
        setup_gamepad(&window, game.clone());
        setup_restart_button(&document, game.clone());
        setup_auto_pause(&window, &document, game.clone());
        setup_resize(&window, game.clone());

        request_animation_frame(game);
        log::info!("Wave Arena running!");
        Ok(())
    }

    fn setup_keyboard(window: &web_sys::Window, game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if game.borrow_mut().input.key_down(&event.key(), event.repeat()) {
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().input.key_up(&event.key());
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_pointer(game: Rc<RefCell<Game>>) {
        let target = game.borrow().canvas.element().clone();

        // Mouse: aim at the cursor and fire
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                let pos = g.canvas.to_canvas_point(event.client_x(), event.client_y());
                g.input.pointer_down(pos);
            });
            let _ = target
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch: same as a click at the first touch point
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let mut g = game.borrow_mut();
                    let pos = g.canvas.to_canvas_point(touch.client_x(), touch.client_y());
                    g.input.touch_start(pos);
                }
            });
            let _ = target
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_gamepad(window: &web_sys::Window, game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: GamepadEvent| {
                if let Some(pad) = event.gamepad() {
                    game.borrow_mut().input.gamepad_connected(pad.index());
                }
            });
            let _ = window.add_event_listener_with_callback(
                "gamepadconnected",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: GamepadEvent| {
                if let Some(pad) = event.gamepad() {
                    game.borrow_mut().input.gamepad_disconnected(pad.index());
                }
            });
            let _ = window.add_event_listener_with_callback(
                "gamepaddisconnected",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }
    }

    fn setup_restart_button(document: &web_sys::Document, game: Rc<RefCell<Game>>) {
        // Optional: Enter also restarts
        if let Some(btn) = document.get_element_by_id(RESTART_ID) {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().input.request_start();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(
        window: &web_sys::Window,
        document: &web_sys::Document,
        game: Rc<RefCell<Game>>,
    ) {
        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.hidden() {
                    let mut g = game.borrow_mut();
                    if g.state.phase == GamePhase::Playing {
                        g.input.request_pause();
                        log::info!("Auto-paused (tab hidden)");
                    }
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur: keys released while unfocused never reach us
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                g.input.release_all();
                if g.state.phase == GamePhase::Playing {
                    g.input.request_pause();
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(window: &web_sys::Window, game: Rc<RefCell<Game>>) {
        let window_clone = window.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let mut g = game.borrow_mut();
            let arena = g.canvas.fit_to_window(&window_clone);
            g.state.set_arena(arena);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
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
        if let Some(window) = web_sys::window() {
            game.borrow_mut().frame(time, &window.navigator());
        }
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run().map_err(|e| {
        log::error!("Startup failed: {}", e);
        JsValue::from_str(&e.to_string())
    })
}

#[cfg(not(target_arch = "wasm32"))]
const AUTOPLAY_SEED: u64 = 42;
/// Two minutes of play at 60 Hz
#[cfg(not(target_arch = "wasm32"))]
const AUTOPLAY_TICKS: u64 = 60 * 120;

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    log::info!("Wave Arena (native) starting...");
    log::info!("Browser build: `trunk serve`; native runs a headless autoplay session");

    let settings_path = std::env::args().nth(1).map(std::path::PathBuf::from);
    let settings = wave_arena::Settings::load(settings_path.as_deref());

    let summary = wave_arena::autoplay::run(&settings, AUTOPLAY_SEED, AUTOPLAY_TICKS);
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
