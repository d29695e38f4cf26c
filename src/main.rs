//! Skyshot entry point
//!
//! Handles platform-specific initialization and drives the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use skyshot::consts::*;
    use skyshot::leaderboard::{LeaderboardSource, LocalLeaderboard};
    use skyshot::render::{CanvasRenderer, Renderer};
    use skyshot::session::{Command, GameSession};
    use skyshot::settings::Settings;
    use skyshot::sim::GamePhase;

    type Session = GameSession<LocalLeaderboard>;

    /// App instance holding the session and render plumbing
    struct App {
        session: Session,
        renderer: CanvasRenderer,
        settings: Settings,
        notification_el: web_sys::Element,
        last_time: f64,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl App {
        fn new(
            seed: u64,
            ctx: CanvasRenderingContext2d,
            notification_el: web_sys::Element,
        ) -> Self {
            let settings = Settings::load();
            Self {
                session: GameSession::new(seed, LocalLeaderboard::load("player")),
                renderer: CanvasRenderer::new(ctx, settings.clone()),
                settings,
                notification_el,
                last_time: 0.0,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// Advance and draw one animation frame
        fn frame(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                ((time - self.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            self.last_time = time;

            self.session.frame(dt);
            self.renderer.draw(&self.session.snapshot());

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;
            let oldest = self.frame_times[self.frame_index];
            if oldest > 0.0 {
                let elapsed = time - oldest;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Sync HUD elements with session state
        fn update_hud(&self, document: &Document) {
            let phase = self.session.phase();

            if let Some(el) = document.get_element_by_id("score") {
                el.set_text_content(Some(&self.session.score().to_string()));
            }
            if let Some(el) = document.get_element_by_id("lives") {
                el.set_text_content(Some(&self.session.lives().to_string()));
            }
            if let Some(el) = document.get_element_by_id("level") {
                el.set_text_content(Some(&self.session.level().to_string()));
            }
            if let Some(el) = document.get_element_by_id("fps") {
                if self.settings.show_fps {
                    el.set_text_content(Some(&self.fps.to_string()));
                }
            }

            // Button states follow the phase
            if let Some(btn) = document.get_element_by_id("startBtn") {
                if phase == GamePhase::Idle {
                    let _ = btn.remove_attribute("disabled");
                } else {
                    let _ = btn.set_attribute("disabled", "");
                }
            }
            if let Some(btn) = document.get_element_by_id("pauseBtn") {
                match phase {
                    GamePhase::Running | GamePhase::Paused => {
                        let _ = btn.remove_attribute("disabled");
                    }
                    _ => {
                        let _ = btn.set_attribute("disabled", "");
                    }
                }
                btn.set_text_content(Some(if phase == GamePhase::Paused {
                    "Resume"
                } else {
                    "Pause"
                }));
            }

            // Game over modal
            if let Some(modal) = document.get_element_by_id("gameOverModal") {
                if phase == GamePhase::GameOver {
                    let _ = modal.set_attribute("class", "modal");
                    if let Some(el) = document.get_element_by_id("finalScore") {
                        el.set_text_content(Some(&self.session.score().to_string()));
                    }
                    if let Some(el) = document.get_element_by_id("finalRank") {
                        let text = match self.session.sink().rank_of(self.session.score()) {
                            Some(rank) => format!("#{rank}"),
                            None => "-".to_string(),
                        };
                        el.set_text_content(Some(&text));
                    }
                } else {
                    let _ = modal.set_attribute("class", "modal hidden");
                }
            }

            // Latest transient notification, if any
            match self.session.notifications().last() {
                Some(notification) => {
                    self.notification_el
                        .set_text_content(Some(&notification.text));
                    let _ = self.notification_el.set_attribute("class", "notification");
                }
                None => {
                    let _ = self
                        .notification_el
                        .set_attribute("class", "notification hidden");
                }
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Skyshot starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        canvas.set_width(CANVAS_W as u32);
        canvas.set_height(CANVAS_H as u32);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .expect("context request failed")
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");

        // One shared element for transient notifications
        let notification_el = document
            .create_element("div")
            .expect("create notification element");
        let _ = notification_el.set_attribute("id", "notification");
        let _ = notification_el.set_attribute("class", "notification hidden");
        if let Some(body) = document.body() {
            let _ = body.append_child(&notification_el);
        }

        let seed = js_sys::Date::now() as u64;
        let app = Rc::new(RefCell::new(App::new(seed, ctx, notification_el)));

        log::info!("Session initialized with seed: {}", seed);

        setup_input_handlers(&canvas, app.clone());
        setup_buttons(app.clone());
        setup_auto_pause(app.clone());

        request_animation_frame(app);

        log::info!("Skyshot running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        // Mouse move - aim the cannon
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                app.borrow_mut()
                    .session
                    .pointer_moved(event.offset_x() as f32, event.offset_y() as f32);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse click - fire
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                app.borrow_mut().session.trigger_shot();
            });
            let _ =
                canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch - aim and fire
        {
            let app = app.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let rect = canvas_clone.get_bounding_client_rect();
                    let x = touch.client_x() as f32 - rect.left() as f32;
                    let y = touch.client_y() as f32 - rect.top() as f32;
                    let mut a = app.borrow_mut();
                    a.session.pointer_moved(x, y);
                    a.session.trigger_shot();
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let app = app.clone();
            let window = web_sys::window().unwrap();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut a = app.borrow_mut();
                match event.key().as_str() {
                    " " | "Enter" => a.session.trigger_shot(),
                    "Escape" => a.session.apply(Command::PauseToggle),
                    "r" | "R" => a.session.apply(Command::Reset),
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(app: Rc<RefCell<App>>) {
        let document = web_sys::window().unwrap().document().unwrap();

        let wiring: [(&str, Command); 4] = [
            ("startBtn", Command::Start),
            ("pauseBtn", Command::PauseToggle),
            ("resetBtn", Command::Reset),
            ("playAgainBtn", Command::Replay),
        ];

        for (id, command) in wiring {
            if let Some(btn) = document.get_element_by_id(id) {
                let app = app.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                    app.borrow_mut().session.apply(command);
                });
                let _ =
                    btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }

    fn setup_auto_pause(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Visibility change (tab switch, minimize)
        {
            let app = app.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut a = app.borrow_mut();
                    if a.session.phase() == GamePhase::Running {
                        a.session.apply(Command::PauseToggle);
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

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut a = app.borrow_mut();
                if a.session.phase() == GamePhase::Running {
                    a.session.apply(Command::PauseToggle);
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            frame_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame_loop(app: Rc<RefCell<App>>, time: f64) {
        {
            let document = web_sys::window().unwrap().document().unwrap();
            let mut a = app.borrow_mut();
            a.frame(time);
            a.update_hud(&document);
        }
        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_app::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use skyshot::consts::*;
    use skyshot::leaderboard::{LeaderboardSource, LocalLeaderboard};
    use skyshot::session::{Command, GameSession};
    use skyshot::sim::GamePhase;

    env_logger::init();
    log::info!("Skyshot (native) starting headless demo...");

    let seed = skyshot::leaderboard::now_ms() as u64;
    let mut session = GameSession::new(seed, LocalLeaderboard::new("demo"));
    session.apply(Command::Start);

    // Aim straight up and fire on a fixed cadence until the run ends
    session.pointer_moved(CANNON_X, 0.0);
    let max_frames = 60 * 120; // two minutes of simulated play
    for frame in 0..max_frames {
        if frame % 10 == 0 {
            session.trigger_shot();
        }
        session.frame(SIM_DT);
        if session.phase() == GamePhase::GameOver {
            break;
        }
    }

    println!(
        "demo over: score {}, level {}, lives {}",
        session.score(),
        session.level(),
        session.lives()
    );
    for (i, entry) in session.sink().list_top(10).iter().enumerate() {
        println!("  {}. {} - {} (level {})", i + 1, entry.username, entry.score, entry.level);
    }
}
