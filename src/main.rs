//! Keyma Quest entry point
//!
//! Browser: wires DOM events into the controller and redraws from its state
//! every animation frame. Native: plays every level headlessly and logs the
//! run.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::fmt::Write;
    use std::rc::Rc;

    use wasm_bindgen::prelude::*;
    use web_sys::{
        ClipboardEvent, Element, Event, HtmlInputElement, KeyboardEvent, MouseEvent, PointerEvent,
    };

    use keyma_quest::Settings;
    use keyma_quest::audio::WebAudio;
    use keyma_quest::catalog::LEVELS;
    use keyma_quest::sim::intro::DISTRESS_LINES;
    use keyma_quest::sim::{
        AdminGate, Challenge, ChallengeInput, Feedback, GameController, GamePhase, IntroStage,
    };
    use keyma_quest::ui::{HudView, ZoneState, symbol_layer};

    /// Game instance holding all state
    struct Game {
        controller: GameController,
        admin: AdminGate,
        admin_open: bool,
        /// Current screen, redrawn only when its markup changes
        screen: Element,
        /// Kept apart from `screen` so the secret field survives redraws
        admin_panel: Element,
        last_time: f64,
        last_screen: String,
        last_admin: String,
    }

    impl Game {
        fn new(settings: &Settings, screen: Element, admin_panel: Element) -> Self {
            let audio = WebAudio::new(settings);
            Self {
                controller: GameController::from_settings(
                    settings,
                    js_sys::Date::now() as u64,
                    Box::new(audio),
                ),
                admin: AdminGate::new(settings),
                admin_open: false,
                screen,
                admin_panel,
                last_time: 0.0,
                last_screen: String::new(),
                last_admin: String::new(),
            }
        }

        /// Handle a click on an element carrying `data-action`
        fn on_action(&mut self, action: &str, el: &Element) {
            let attr = |name: &str| el.get_attribute(name).unwrap_or_default();
            match action {
                "advance-intro" => self.controller.advance_intro(),
                "start" => self.controller.start_game(),
                "restart" => self.controller.restart(),
                "hit" => self.controller.handle_input(ChallengeInput::Hit),
                "key" => self
                    .controller
                    .handle_input(ChallengeInput::Key(attr("data-key"))),
                "open" => self
                    .controller
                    .handle_input(ChallengeInput::Open(attr("data-name"))),
                "back" => self.controller.handle_input(ChallengeInput::Back),
                "choice" => self
                    .controller
                    .handle_input(ChallengeInput::Choice(attr("data-value") == "true")),
                "admin-toggle" => self.admin_open = !self.admin_open,
                "admin-submit" => {
                    let text = web_sys::window()
                        .and_then(|w| w.document())
                        .and_then(|d| d.get_element_by_id("admin-secret"))
                        .and_then(|e| e.dyn_into::<HtmlInputElement>().ok())
                        .map(|input| input.value())
                        .unwrap_or_default();
                    self.admin.enter(&text);
                }
                "jump" => {
                    if let Ok(index) = attr("data-index").parse::<usize>() {
                        if self.admin.jump(&mut self.controller, index) {
                            self.admin_open = false;
                        }
                    }
                }
                _ => log::debug!("Unknown action {}", action),
            }
        }

        fn update(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                (time - self.last_time).max(0.0) as u64
            } else {
                0
            };
            self.last_time = time;
            self.controller.tick(dt);
        }

        fn render(&mut self) {
            let screen = match self.controller.phase() {
                GamePhase::Welcome => self.render_welcome(),
                GamePhase::Playing => self.render_playing(),
                GamePhase::Result => self.render_result(),
            };
            if screen != self.last_screen {
                self.screen.set_inner_html(&screen);
                self.last_screen = screen;
            }

            // Falling symbols move every frame; only their layer is redrawn
            if let Some(Challenge::Typing(c)) = self.controller.challenge() {
                if let Ok(Some(layer)) = self.screen.query_selector("#symbols") {
                    layer.set_inner_html(&symbol_layer(c.symbols()));
                }
            }

            let admin = self.render_admin();
            if admin != self.last_admin {
                self.admin_panel.set_inner_html(&admin);
                self.last_admin = admin;
            }
        }

        fn render_welcome(&self) -> String {
            let intro = self.controller.intro();
            match intro.stage() {
                IntroStage::Booting => {
                    r#"<div class="boot">ESTABLISHING SECURE CONNECTION...</div>"#.to_string()
                }
                IntroStage::Distress => {
                    let label = if intro.has_more_lines() {
                        "다음 내용 보기"
                    } else {
                        "시스템 접속하기"
                    };
                    let mut html = String::from(r#"<div class="distress">"#);
                    let _ = write!(html, "<p>{}</p>", intro.line().unwrap_or_default());
                    html.push_str(r#"<div class="dots">"#);
                    for i in 0..DISTRESS_LINES.len() {
                        let class = if i == intro.line_index() { "dot on" } else { "dot" };
                        let _ = write!(html, r#"<span class="{}"></span>"#, class);
                    }
                    let _ = write!(
                        html,
                        r#"</div><button data-action="advance-intro">{}</button></div>"#,
                        label
                    );
                    html
                }
                IntroStage::Menu => r#"<div class="menu">
                    <div class="badge">SIGNAL RESTORED: MISSION READY</div>
                    <h1>KEYMA QUEST</h1>
                    <p>바이러스를 물리치고 마스터 칩을 되찾으세요.</p>
                    <button data-action="start">시뮬레이션 시작</button>
                </div>"#
                    .to_string(),
            }
        }

        fn render_playing(&self) -> String {
            let Some(hud) = HudView::from_game(&self.controller) else {
                return String::new();
            };
            let mut html = String::from(r#"<header class="hud">"#);
            html.push_str(r#"<div class="map">"#);
            for (i, zone) in hud.map.iter().enumerate() {
                let class = match zone {
                    ZoneState::Cleared => "cleared",
                    ZoneState::Current => "current",
                    ZoneState::Locked => "locked",
                };
                let _ = write!(html, r#"<span class="zone {}">{}</span>"#, class, i + 1);
            }
            let _ = write!(
                html,
                r#"</div><div class="zone-label">Zone {}</div><h2>{}</h2><p class="story">{}</p><p class="instructions">{}</p><div class="guide">"서둘러요! 시스템 오염도가 {}%입니다!"</div><div class="score">{}</div></header>"#,
                hud.zone,
                hud.title,
                hud.description,
                hud.instructions,
                hud.contamination,
                hud.score
            );

            html.push_str(r#"<main class="level">"#);
            if let Some(challenge) = self.controller.challenge() {
                render_challenge(&mut html, challenge);
            }
            html.push_str("</main>");
            html
        }

        fn render_admin(&self) -> String {
            if self.controller.phase() != GamePhase::Playing {
                return String::new();
            }
            let mut html =
                String::from(r#"<button class="admin-toggle" data-action="admin-toggle">⚙</button>"#);
            if !self.admin_open {
                return html;
            }
            html.push_str(r#"<div class="admin">"#);
            if self.admin.is_unlocked() {
                for level in LEVELS.iter() {
                    let _ = write!(
                        html,
                        r#"<button data-action="jump" data-index="{}">{}. {}</button>"#,
                        level.id,
                        level.id + 1,
                        level.title
                    );
                }
            } else {
                html.push_str(
                    r#"<input id="admin-secret" type="password"><button data-action="admin-submit">OK</button>"#,
                );
            }
            html.push_str("</div>");
            html
        }

        fn render_result(&self) -> String {
            format!(
                r#"<div class="result"><h1>MISSION COMPLETE</h1><div class="final-score">{}</div><button data-action="restart">처음으로</button></div>"#,
                self.controller.score()
            )
        }
    }

    fn render_challenge(html: &mut String, challenge: &Challenge) {
        match challenge {
            Challenge::Pointer(c) => {
                let (top, left) = c.position();
                let _ = write!(
                    html,
                    r#"<div class="counter">{} / 10</div><div class="target" data-action="hit" style="top:{:.1}%;left:{:.1}%">{}</div>"#,
                    c.hits(),
                    top,
                    left,
                    c.creature().glyph()
                );
            }
            Challenge::Typing(c) => {
                let _ = write!(
                    html,
                    r#"<div class="counter">{} / 10</div><div id="symbols" class="symbols"></div>"#,
                    c.hits()
                );
                html.push_str(r#"<div class="keyboard">"#);
                for row in c.layout().keyboard_rows() {
                    html.push_str(r#"<div class="row">"#);
                    for key in row.iter() {
                        let _ = write!(
                            html,
                            r#"<button data-action="key" data-key="{0}">{0}</button>"#,
                            key
                        );
                    }
                    html.push_str("</div>");
                }
                html.push_str("</div>");
            }
            Challenge::Clipboard(c) => {
                let _ = write!(
                    html,
                    r#"<div class="spell">{}</div><div class="paste-zone">여기에 붙여넣기 (Ctrl+V)</div><div class="apples">{}</div><div class="counter">{} / 5</div>"#,
                    c.target(),
                    c.markers().concat(),
                    c.successes()
                );
            }
            Challenge::FileSystem(c) => {
                let _ = write!(
                    html,
                    r#"<div class="breadcrumb">{}</div><button data-action="back">⬅ 뒤로</button><ul class="entries">"#,
                    c.path_display()
                );
                for entry in c.contents() {
                    let _ = write!(
                        html,
                        r#"<li data-action="open" data-name="{0}">{0}</li>"#,
                        entry
                    );
                }
                html.push_str("</ul>");
            }
            Challenge::Judgment(c) => {
                let _ = write!(
                    html,
                    r#"<div class="counter">{} / 8</div><div class="scenario">{}</div>"#,
                    c.index() + 1,
                    c.current().text
                );
                match c.feedback() {
                    Some(Feedback::Correct) => html.push_str(r#"<div class="feedback ok">정답!</div>"#),
                    Some(Feedback::Incorrect) => html.push_str(r#"<div class="feedback bad">다시 생각해 봐요</div>"#),
                    None => html.push_str(
                        r#"<button data-action="choice" data-value="true">😊</button><button data-action="choice" data-value="false">😡</button>"#,
                    ),
                }
            }
        }
    }

    /// Split the root into the screen and admin panel layers
    fn mount_layers(root: &Element) -> Option<(Element, Element)> {
        root.set_inner_html(r#"<div id="screen"></div><div id="admin-panel"></div>"#);
        let screen = root.query_selector("#screen").ok()??;
        let admin_panel = root.query_selector("#admin-panel").ok()??;
        Some((screen, admin_panel))
    }

    /// Find the `#app` element, creating it if the page has none
    fn app_root() -> Option<Element> {
        let document = web_sys::window()?.document()?;
        if let Some(root) = document.get_element_by_id("app") {
            return Some(root);
        }
        let root = document.create_element("div").ok()?;
        root.set_id("app");
        document.body()?.append_child(&root).ok()?;
        Some(root)
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Keyma Quest starting...");

        let settings = Settings::load();
        let Some(root) = app_root() else {
            log::error!("No document to attach to");
            return;
        };
        let Some((screen, admin_panel)) = mount_layers(&root) else {
            log::error!("Failed to build screen layers");
            return;
        };

        let game = Rc::new(RefCell::new(Game::new(&settings, screen, admin_panel)));

        setup_pointer_handlers(&root, game.clone());
        setup_keyboard(game.clone());
        setup_paste(game.clone());

        request_animation_frame(game);
        log::info!("Keyma Quest running!");
    }

    /// Nearest element carrying `data-action`, with the action name
    fn action_target(event: &Event) -> Option<(String, Element)> {
        let target = event.target()?.dyn_into::<Element>().ok()?;
        let el = target.closest("[data-action]").ok()??;
        let action = el.get_attribute("data-action")?;
        Some((action, el))
    }

    fn setup_pointer_handlers(root: &Element, game: Rc<RefCell<Game>>) {
        // Keyboard keys fire on press; a click could be lost to a redraw
        // between mousedown and mouseup
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                if let Some((action, el)) = action_target(&event) {
                    if action == "key" {
                        event.prevent_default();
                        game.borrow_mut().on_action(&action, &el);
                    }
                }
            });
            let _ = root
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Everything else
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                if let Some((action, el)) = action_target(&event) {
                    if action != "key" {
                        game.borrow_mut().on_action(&action, &el);
                    }
                }
            });
            let _ = root.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let mut g = game.borrow_mut();
            if g.admin_open {
                return;
            }
            match g.controller.phase() {
                GamePhase::Welcome => {
                    if matches!(event.key().as_str(), "Enter" | " ") {
                        g.controller.advance_intro();
                    }
                }
                GamePhase::Playing => {
                    if matches!(g.controller.challenge(), Some(Challenge::Typing(_))) {
                        g.controller.handle_input(ChallengeInput::Key(event.key()));
                    }
                }
                GamePhase::Result => {}
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_paste(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: ClipboardEvent| {
            let mut g = game.borrow_mut();
            if g.admin_open || !matches!(g.controller.challenge(), Some(Challenge::Clipboard(_))) {
                return;
            }
            event.prevent_default();
            let text = event
                .clipboard_data()
                .and_then(|data| data.get_data("text").ok())
                .unwrap_or_default();
            g.controller.handle_input(ChallengeInput::Paste(text));
        });
        let _ = window.add_event_listener_with_callback("paste", closure.as_ref().unchecked_ref());
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
        {
            let mut g = game.borrow_mut();
            g.update(time);
            g.render();
        }
        request_animation_frame(game);
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

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Keyma Quest (native) starting...");
    log::info!("Native mode plays every level automatically - use `trunk serve` for the web version");

    let settings = keyma_quest::Settings::load();
    let score = autoplay::run(&settings);
    println!("\nAll zones cleared, final score: {}", score);
}

/// Scripted player for the native build
#[cfg(not(target_arch = "wasm32"))]
mod autoplay {
    use std::time::{SystemTime, UNIX_EPOCH};

    use keyma_quest::Settings;
    use keyma_quest::audio::LogAudio;
    use keyma_quest::consts::*;
    use keyma_quest::sim::clipboard::SPELL_WORD;
    use keyma_quest::sim::filesystem::MASTER_CHIP;
    use keyma_quest::sim::{Challenge, ChallengeInput, GameController, GamePhase};
    use keyma_quest::ui::HudView;

    /// Give up on a level after this many simulated frames
    const FRAME_LIMIT: u32 = 10_000;

    fn clock_seed() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    }

    /// Play a full run and return the final score
    pub fn run(settings: &Settings) -> u32 {
        let mut game =
            GameController::from_settings(settings, clock_seed(), Box::new(LogAudio::new()));

        // Sit through the intro like a player would
        for _ in 0..(BOOT_DELAY_MS / MAX_FRAME_MS) {
            game.tick(MAX_FRAME_MS);
        }
        while game.intro().line().is_some() {
            game.advance_intro();
        }
        game.start_game();

        let mut frames = 0;
        while game.phase() == GamePhase::Playing && frames < FRAME_LIMIT {
            if let Some(hud) = HudView::from_game(&game) {
                log::debug!("Zone {} {} score {}", hud.zone, hud.title, hud.score);
            }
            step(&mut game);
            game.tick(MAX_FRAME_MS);
            frames += 1;
        }

        if game.phase() != GamePhase::Result {
            log::warn!("Autoplay stalled on level {}", game.level_index() + 1);
        }
        log::info!("Run finished after {} frames", frames);
        game.score()
    }

    /// One decision per frame for whatever level is mounted
    fn step(game: &mut GameController) {
        let input = match game.challenge() {
            Some(Challenge::Pointer(_)) => Some(ChallengeInput::Hit),
            Some(Challenge::Typing(c)) => c
                .symbols()
                .first()
                .map(|s| ChallengeInput::Key(s.glyph.to_string())),
            Some(Challenge::Clipboard(_)) => Some(ChallengeInput::Paste(SPELL_WORD.to_string())),
            Some(Challenge::FileSystem(c)) => {
                let contents = c.contents();
                let next = if contents.contains(&MASTER_CHIP) {
                    Some(MASTER_CHIP)
                } else if contents.contains(&c.treasure()) {
                    Some(c.treasure())
                } else if c.path().len() > 1 {
                    None
                } else {
                    // Peek one level down for the folder holding the treasure
                    contents.into_iter().find(|folder| {
                        let mut peek = c.clone();
                        peek.open(folder, &mut LogAudio::new());
                        peek.contents().contains(&c.treasure())
                    })
                };
                Some(match next {
                    Some(name) => ChallengeInput::Open(name.to_string()),
                    None => ChallengeInput::Back,
                })
            }
            Some(Challenge::Judgment(c)) => match c.feedback() {
                None => Some(ChallengeInput::Choice(c.current().acceptable)),
                Some(_) => None,
            },
            None => None,
        };
        if let Some(input) = input {
            game.handle_input(input);
        }
    }
}
