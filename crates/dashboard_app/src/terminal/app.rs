use std::io::{self, BufRead};
use std::sync::{mpsc, Arc};
use std::thread;

use dashboard_core::{join_targets, parse_targets, update, AppState, AppViewModel, Msg};
use dashboard_engine::{ReqwestApiClient, Session};
use engine_logging::{engine_info, engine_warn};

use super::commands::{parse_line, Command, HELP};
use super::config::AppConfig;
use super::effects::EffectRunner;
use super::history::TriggerHistory;
use super::render;

/// Everything the main loop reacts to.
pub enum AppEvent {
    Line(String),
    Msg(Msg),
    InputClosed,
}

pub fn run_app(config: AppConfig) -> anyhow::Result<()> {
    let session = Arc::new(match &config.access_token {
        Some(token) => Session::with_token(token.clone()),
        None => Session::anonymous(),
    });
    // The engine client lives on the engine runtime; session calls get their own.
    let engine_client = ReqwestApiClient::new(config.api_settings(), session.clone())?;
    let auth_client = ReqwestApiClient::new(config.api_settings(), session.clone())?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>();
    let effects = EffectRunner::new(
        Arc::new(engine_client),
        config.engine_settings(),
        event_tx.clone(),
    )?;
    spawn_stdin_reader(event_tx);

    let mut shell = Shell {
        state: AppState::new(),
        history: TriggerHistory::default(),
        effects,
        auth: auth_client,
        session,
        runtime,
    };
    shell.startup();

    while let Ok(event) = event_rx.recv() {
        let keep_running = match event {
            AppEvent::Line(line) => shell.handle_line(&line),
            AppEvent::Msg(msg) => {
                shell.dispatch_msg(msg);
                true
            }
            AppEvent::InputClosed => false,
        };
        if !keep_running {
            break;
        }
    }
    engine_info!("Shutting down");
    Ok(())
}

fn spawn_stdin_reader(tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(AppEvent::Line(line)).is_err() {
                        return;
                    }
                }
                Err(err) => {
                    engine_warn!("Failed to read stdin: {}", err);
                    break;
                }
            }
        }
        let _ = tx.send(AppEvent::InputClosed);
    });
}

struct Shell {
    state: AppState,
    history: TriggerHistory,
    effects: EffectRunner,
    auth: ReqwestApiClient,
    session: Arc<Session>,
    runtime: tokio::runtime::Runtime,
}

impl Shell {
    fn startup(&mut self) {
        if self.session.is_signed_in() {
            match self.runtime.block_on(self.session.refresh(&self.auth)) {
                Ok(user) => println!("Signed in as {}", user.email),
                Err(err) => println!("Stored token rejected: {}", err.message),
            }
        }
        print_lines(HELP.iter().copied());
        self.render();
    }

    /// Returns false when the user asked to quit.
    fn handle_line(&mut self, line: &str) -> bool {
        match parse_line(line) {
            Command::Draft(text) => {
                let input = append_line(self.state.input(), &text);
                self.dispatch_msg(Msg::InputChanged(input));
            }
            Command::Submit => self.dispatch_msg(Msg::Submitted),
            Command::Go(raw) => {
                let trigger = Some(raw).filter(|raw| !raw.trim().is_empty());
                self.history.push(history_entry(trigger.as_deref()));
                self.dispatch_msg(Msg::TriggerChanged(trigger));
            }
            Command::Prev => match self.history.go_back() {
                Some(trigger) => self.dispatch_msg(Msg::TriggerChanged(trigger)),
                None => println!("Nothing to go back to."),
            },
            Command::Open(position) => match entry_index(&self.state.view(), position) {
                Some(index) => self.dispatch_msg(Msg::ResultSelected { index }),
                None => println!("No result #{position} in the current list."),
            },
            Command::Back => self.dispatch_msg(Msg::BackClicked),
            Command::Reset => self.dispatch_msg(Msg::ResetClicked),
            Command::Clear => self.dispatch_msg(Msg::InputChanged(String::new())),
            Command::Login { email, password } => {
                let outcome = self
                    .runtime
                    .block_on(self.session.login(&self.auth, &email, &password));
                report_session(outcome);
            }
            Command::Register { email, password } => {
                let outcome = self
                    .runtime
                    .block_on(self.session.register(&self.auth, &email, &password));
                report_session(outcome);
            }
            Command::Logout => {
                self.session.invalidate();
                println!("Signed out.");
            }
            Command::WhoAmI => match self.session.user() {
                Some(user) => println!(
                    "{} (plan: {})",
                    user.email,
                    user.plan_type.as_deref().unwrap_or("unknown")
                ),
                None => println!("Not signed in."),
            },
            Command::Platforms => match self.runtime.block_on(self.auth.platforms()) {
                Ok(platforms) => {
                    for platform in platforms {
                        println!(
                            "{} (max {} comments) {}",
                            platform.name,
                            platform
                                .max_comments
                                .map_or_else(|| "?".to_string(), |max| max.to_string()),
                            platform.example.unwrap_or_default()
                        );
                    }
                }
                Err(err) => println!("Error: {}", err.message),
            },
            Command::Help => print_lines(HELP.iter().copied()),
            Command::Quit => return false,
            Command::Invalid(reason) => println!("{reason}"),
        }
        true
    }

    fn dispatch_msg(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.effects.run(effects, &mut self.history);
        if self.state.consume_dirty() {
            self.render();
        }
    }

    fn render(&self) {
        print_lines(render::render(&self.state.view()));
    }
}

fn report_session(outcome: Result<dashboard_engine::UserProfile, dashboard_engine::ApiError>) {
    match outcome {
        Ok(user) => println!("Signed in as {}", user.email),
        Err(err) => println!("Error: {}", err.message),
    }
}

fn print_lines<I, S>(lines: I)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    for line in lines {
        println!("{}", line.as_ref());
    }
}

/// Appends one typed line to the multi-line input.
fn append_line(input: &str, line: &str) -> String {
    if input.is_empty() {
        line.to_string()
    } else {
        format!("{input}\n{line}")
    }
}

/// Trigger value as the controller writes it back, so `:go a, b` and a
/// submit of the same targets share one history entry.
fn history_entry(trigger: Option<&str>) -> Option<String> {
    let targets = parse_targets(trigger?);
    if targets.is_empty() {
        None
    } else {
        Some(join_targets(&targets))
    }
}

/// Maps a 1-based display position to the entry's batch index.
fn entry_index(view: &AppViewModel, position: usize) -> Option<usize> {
    position
        .checked_sub(1)
        .and_then(|offset| view.entries.get(offset))
        .map(|entry| entry.index)
}
