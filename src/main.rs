use std::env;
use std::io;
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::{Backend, CrosstermBackend};

use kru_terminal::api::{FixtureApi, LeagueApi, SignInRequest, StubApi};
use kru_terminal::state::{
    AppState, ComparisonTab, Delta, ProviderCommand, Screen, SignInField, apply_delta,
};
use kru_terminal::{provider, ui};

fn env_limit(key: &str, default: usize) -> usize {
    env::var(key)
        .ok()
        .and_then(|val| val.parse::<usize>().ok())
        .unwrap_or(default)
        .clamp(1, 50)
}

/// Selects the data backend from `API_SOURCE`: `stub` (default) or `fixture`
/// with a JSON snapshot at `FIXTURE_PATH`.
fn build_api() -> Result<Box<dyn LeagueApi>> {
    let source = env::var("API_SOURCE").unwrap_or_else(|_| "stub".to_string());
    match source.trim().to_lowercase().as_str() {
        "fixture" => {
            let path = env::var("FIXTURE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("fixtures/league.json"));
            Ok(Box::new(FixtureApi::load(&path)?))
        }
        _ => Ok(Box::new(StubApi::from_env())),
    }
}

struct App {
    state: AppState,
    cmd_tx: mpsc::Sender<ProviderCommand>,
    should_quit: bool,
    recent_limit: usize,
    upcoming_limit: usize,
    // Comparison side picks staged here until both sides are chosen.
    pending_team_pick: Option<String>,
    pending_player_pick: Option<String>,
}

impl App {
    fn new(cmd_tx: mpsc::Sender<ProviderCommand>) -> App {
        App {
            state: AppState::new(),
            cmd_tx,
            should_quit: false,
            recent_limit: env_limit("RECENT_LIMIT", 5),
            upcoming_limit: env_limit("UPCOMING_LIMIT", 5),
            pending_team_pick: None,
            pending_player_pick: None,
        }
    }

    fn send(&mut self, cmd: ProviderCommand) {
        if self.cmd_tx.send(cmd).is_err() {
            self.state.push_log("[WARN] Data provider is not running");
        }
    }

    fn request_teams(&mut self) {
        let generation = self.state.begin_teams_fetch();
        self.send(ProviderCommand::FetchTeams { generation });
    }

    fn request_players(&mut self) {
        let generation = self.state.begin_players_fetch();
        self.send(ProviderCommand::FetchPlayers { generation });
    }

    fn request_matches(&mut self) {
        let generation = self.state.begin_matches_fetch();
        let cmd = ProviderCommand::FetchMatches {
            generation,
            recent_limit: self.recent_limit,
            upcoming_limit: self.upcoming_limit,
        };
        self.send(cmd);
    }

    fn request_dashboard(&mut self) {
        let generation = self.state.begin_dashboard_fetch();
        self.send(ProviderCommand::FetchDashboard { generation });
    }

    fn request_team_comparison(&mut self, id1: String, id2: String) {
        let generation = self.state.begin_team_comparison(id1.clone(), id2.clone());
        self.send(ProviderCommand::FetchTeamComparison {
            generation,
            id1,
            id2,
        });
    }

    fn request_player_comparison(&mut self, id1: String, id2: String) {
        let generation = self.state.begin_player_comparison(id1.clone(), id2.clone());
        self.send(ProviderCommand::FetchPlayerComparison {
            generation,
            id1,
            id2,
        });
    }

    fn submit_sign_in(&mut self) {
        if self.state.sign_in.submitting {
            return;
        }
        let Some(role) = self.state.sign_in.role else {
            self.state.sign_in.error = Some("Choose a role with ←/→".to_string());
            return;
        };
        let request = SignInRequest {
            email: self.state.sign_in.email.clone(),
            password: self.state.sign_in.password.clone(),
            role,
        };
        let generation = self.state.begin_sign_in();
        self.send(ProviderCommand::SignIn {
            generation,
            request,
        });
    }

    /// First visit to a screen kicks off its fetches; later visits reuse the
    /// cached collections until the user refreshes.
    fn enter_screen(&mut self, screen: Screen) {
        let cmds = self
            .state
            .enter_screen(screen, self.recent_limit, self.upcoming_limit);
        for cmd in cmds {
            self.send(cmd);
        }
    }

    fn refresh_current(&mut self) {
        match self.state.screen {
            Screen::SignIn | Screen::Insights => {}
            Screen::Dashboard => {
                self.request_dashboard();
                self.request_matches();
            }
            Screen::Teams => self.request_teams(),
            Screen::Players => self.request_players(),
            Screen::Comparisons => {
                self.request_teams();
                self.request_players();
            }
        }
    }

    fn pick_comparison_side(&mut self, second: bool) {
        match self.state.comparison_tab {
            ComparisonTab::Teams => {
                let Some(team) = self.state.selected_team() else {
                    self.state.push_log("[WARN] No team selected to compare");
                    return;
                };
                let (id, name) = (team.id.clone(), team.name.clone());
                if second {
                    let Some(first) = self.pending_team_pick.clone() else {
                        self.state.push_log("[WARN] Pick side A first");
                        return;
                    };
                    self.state.push_log(format!("[INFO] Side B: {name}"));
                    self.request_team_comparison(first, id);
                    self.pending_team_pick = None;
                } else {
                    self.state.push_log(format!("[INFO] Side A: {name}"));
                    self.pending_team_pick = Some(id);
                }
            }
            ComparisonTab::Players => {
                let Some(player) = self.state.selected_player() else {
                    self.state.push_log("[WARN] No player selected to compare");
                    return;
                };
                let (id, name) = (player.id.clone(), player.name.clone());
                if second {
                    let Some(first) = self.pending_player_pick.clone() else {
                        self.state.push_log("[WARN] Pick side A first");
                        return;
                    };
                    self.state.push_log(format!("[INFO] Side B: {name}"));
                    self.request_player_comparison(first, id);
                    self.pending_player_pick = None;
                } else {
                    self.state.push_log(format!("[INFO] Side A: {name}"));
                    self.pending_player_pick = Some(id);
                }
            }
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if self.state.screen == Screen::SignIn {
            self.on_sign_in_key(key);
            return;
        }
        if self.state.help_overlay {
            match key.code {
                KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q') => {
                    self.state.help_overlay = false;
                }
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('?') => self.state.help_overlay = true,
            KeyCode::Char('o') => {
                self.pending_team_pick = None;
                self.pending_player_pick = None;
                self.state.logout();
            }
            KeyCode::Char('r') => self.refresh_current(),
            KeyCode::Char('1') => self.enter_screen(Screen::Dashboard),
            KeyCode::Char('2') => self.enter_screen(Screen::Teams),
            KeyCode::Char('3') => self.enter_screen(Screen::Players),
            KeyCode::Char('4') => self.enter_screen(Screen::Comparisons),
            KeyCode::Char('5') => self.enter_screen(Screen::Insights),
            KeyCode::Char('j') | KeyCode::Down => self.move_selection(true),
            KeyCode::Char('k') | KeyCode::Up => self.move_selection(false),
            KeyCode::Char('f') if self.state.screen == Screen::Players => {
                self.state.toggle_player_team_filter();
            }
            KeyCode::Char('t') if self.state.screen == Screen::Comparisons => {
                self.state.cycle_comparison_tab();
            }
            KeyCode::Char('a') if self.state.screen == Screen::Comparisons => {
                self.pick_comparison_side(false);
            }
            KeyCode::Char('b') if self.state.screen == Screen::Comparisons => {
                self.pick_comparison_side(true);
            }
            KeyCode::Char('c') if self.state.screen == Screen::Comparisons => {
                self.pending_team_pick = None;
                self.pending_player_pick = None;
                self.state.clear_comparison();
                self.state.push_log("[INFO] Comparison cleared");
            }
            _ => {}
        }
    }

    fn move_selection(&mut self, forward: bool) {
        let on_players = self.state.screen == Screen::Players
            || (self.state.screen == Screen::Comparisons
                && self.state.comparison_tab == ComparisonTab::Players);
        match (on_players, forward) {
            (true, true) => self.state.select_player_next(),
            (true, false) => self.state.select_player_prev(),
            (false, true) => self.state.select_team_next(),
            (false, false) => self.state.select_team_prev(),
        }
    }

    fn on_sign_in_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Enter => self.submit_sign_in(),
            KeyCode::Tab | KeyCode::Down => self.state.sign_in.focus_next(),
            KeyCode::Left => self.state.sign_in.cycle_role_prev(),
            KeyCode::Right => self.state.sign_in.cycle_role_next(),
            KeyCode::Backspace => self.state.sign_in.pop_char(),
            KeyCode::Char(ch) => {
                if self.state.sign_in.focus != SignInField::Role {
                    self.state.sign_in.push_char(ch);
                }
            }
            _ => {}
        }
    }
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
) -> Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();
    loop {
        while let Ok(delta) = rx.try_recv() {
            // A delta can move the screen (successful sign-in lands on the
            // dashboard); route that through enter_screen so the landing
            // screen issues its fetches.
            let before = app.state.screen;
            apply_delta(&mut app.state, delta);
            if app.state.screen != before {
                app.enter_screen(app.state.screen);
            }
        }

        terminal.draw(|frame| ui::ui(frame, &app.state))?;

        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }
        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }
        if app.should_quit {
            return Ok(());
        }
    }
}

fn main() -> Result<()> {
    dotenvy::from_filename(".env.local").ok();
    dotenvy::dotenv().ok();

    // Fail before touching the terminal if the backend cannot be built.
    let api = build_api()?;

    let (delta_tx, delta_rx) = mpsc::channel::<Delta>();
    let (cmd_tx, cmd_rx) = mpsc::channel::<ProviderCommand>();
    provider::spawn_provider(api, delta_tx, cmd_rx);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(cmd_tx);
    let result = run_app(&mut terminal, &mut app, delta_rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}
