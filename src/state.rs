use std::collections::VecDeque;

use crate::api::{Session, SignInRequest};
use crate::auth::{AuthState, Role};
use crate::models::{DashboardStats, Match, Player, PlayerComparison, Team, TeamComparison};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    SignIn,
    Dashboard,
    Teams,
    Players,
    Comparisons,
    Insights,
}

impl Screen {
    pub fn label(self) -> &'static str {
        match self {
            Screen::SignIn => "SIGN IN",
            Screen::Dashboard => "DASHBOARD",
            Screen::Teams => "TEAMS",
            Screen::Players => "PLAYERS",
            Screen::Comparisons => "COMPARISONS",
            Screen::Insights => "INSIGHTS",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignInField {
    Email,
    Password,
    Role,
}

#[derive(Debug, Clone)]
pub struct SignInForm {
    pub email: String,
    pub password: String,
    pub role: Option<Role>,
    pub focus: SignInField,
    pub submitting: bool,
    pub error: Option<String>,
}

impl Default for SignInForm {
    fn default() -> Self {
        Self::new()
    }
}

impl SignInForm {
    pub fn new() -> Self {
        Self {
            email: String::new(),
            password: String::new(),
            role: None,
            focus: SignInField::Email,
            submitting: false,
            error: None,
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = match self.focus {
            SignInField::Email => SignInField::Password,
            SignInField::Password => SignInField::Role,
            SignInField::Role => SignInField::Email,
        };
    }

    pub fn push_char(&mut self, ch: char) {
        match self.focus {
            SignInField::Email => self.email.push(ch),
            SignInField::Password => self.password.push(ch),
            SignInField::Role => {}
        }
    }

    pub fn pop_char(&mut self) {
        match self.focus {
            SignInField::Email => {
                self.email.pop();
            }
            SignInField::Password => {
                self.password.pop();
            }
            SignInField::Role => {}
        }
    }

    pub fn cycle_role_next(&mut self) {
        self.role = Some(self.role.map_or(Role::Admin, Role::next));
    }

    pub fn cycle_role_prev(&mut self) {
        self.role = Some(self.role.map_or(Role::Fan, Role::prev));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonTab {
    Teams,
    Players,
}

/// At most one current team pair and one player pair. No history.
#[derive(Debug, Clone, Default)]
pub struct ComparisonState {
    pub team_pair: Option<(String, String)>,
    pub player_pair: Option<(String, String)>,
    pub teams: Option<TeamComparison>,
    pub players: Option<PlayerComparison>,
    pub teams_error: Option<String>,
    pub players_error: Option<String>,
    pub teams_loading: bool,
    pub players_loading: bool,
}

impl ComparisonState {
    pub fn clear(&mut self) {
        *self = ComparisonState::default();
    }
}

/// Monotonic per-collection request generations. A fetch result is applied
/// only if it carries the latest generation for its collection, so a slow
/// superseded fetch can never overwrite fresher data.
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchGen {
    pub teams: u64,
    pub players: u64,
    pub matches: u64,
    pub dashboard: u64,
    pub team_comparison: u64,
    pub player_comparison: u64,
    pub sign_in: u64,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub screen: Screen,
    pub auth: AuthState,
    pub sign_in: SignInForm,

    pub teams: Vec<Team>,
    pub teams_loading: bool,
    pub teams_selected: usize,

    pub players: Vec<Player>,
    pub players_loading: bool,
    pub players_selected: usize,
    pub player_team_filter: Option<String>,

    pub recent_matches: Vec<Match>,
    pub upcoming_matches: Vec<Match>,
    pub matches_loading: bool,

    pub dashboard: Option<DashboardStats>,
    pub dashboard_loading: bool,

    pub comparison: ComparisonState,
    pub comparison_tab: ComparisonTab,

    pub fetch_gen: FetchGen,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            screen: Screen::SignIn,
            auth: AuthState::new(),
            sign_in: SignInForm::new(),
            teams: Vec::new(),
            teams_loading: false,
            teams_selected: 0,
            players: Vec::new(),
            players_loading: false,
            players_selected: 0,
            player_team_filter: None,
            recent_matches: Vec::new(),
            upcoming_matches: Vec::new(),
            matches_loading: false,
            dashboard: None,
            dashboard_loading: false,
            comparison: ComparisonState::default(),
            comparison_tab: ComparisonTab::Teams,
            fetch_gen: FetchGen::default(),
            logs: VecDeque::with_capacity(200),
            help_overlay: false,
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        const MAX_LOGS: usize = 200;
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    // Full-replace setters; no merge or patch semantics.

    pub fn set_teams(&mut self, teams: Vec<Team>) {
        self.teams = teams;
        self.clamp_team_selection();
    }

    pub fn set_players(&mut self, players: Vec<Player>) {
        self.players = players;
        self.clamp_player_selection();
    }

    pub fn set_recent_matches(&mut self, matches: Vec<Match>) {
        self.recent_matches = matches;
    }

    pub fn set_upcoming_matches(&mut self, matches: Vec<Match>) {
        self.upcoming_matches = matches;
    }

    // Derived reads. Linear scans; absence is `None`, never an error.

    pub fn team_by_id(&self, id: &str) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == id)
    }

    pub fn player_by_id(&self, id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn match_by_id(&self, id: &str) -> Option<&Match> {
        self.recent_matches
            .iter()
            .chain(self.upcoming_matches.iter())
            .find(|m| m.id == id)
    }

    /// Subset of the player collection owned by `team_id`, relative order
    /// preserved.
    pub fn players_by_team(&self, team_id: &str) -> Vec<&Player> {
        self.players
            .iter()
            .filter(|p| p.team_id == team_id)
            .collect()
    }

    pub fn matches_by_team(&self, team_id: &str) -> Vec<&Match> {
        self.recent_matches
            .iter()
            .chain(self.upcoming_matches.iter())
            .filter(|m| m.involves(team_id))
            .collect()
    }

    pub fn clear_comparison(&mut self) {
        self.comparison.clear();
    }

    // Selection cursors.

    pub fn selected_team(&self) -> Option<&Team> {
        self.teams.get(self.teams_selected)
    }

    pub fn visible_players(&self) -> Vec<&Player> {
        match &self.player_team_filter {
            Some(team_id) => self.players_by_team(team_id),
            None => self.players.iter().collect(),
        }
    }

    pub fn selected_player(&self) -> Option<&Player> {
        self.visible_players().get(self.players_selected).copied()
    }

    pub fn select_team_next(&mut self) {
        let total = self.teams.len();
        if total == 0 {
            self.teams_selected = 0;
            return;
        }
        self.teams_selected = (self.teams_selected + 1) % total;
    }

    pub fn select_team_prev(&mut self) {
        let total = self.teams.len();
        if total == 0 {
            self.teams_selected = 0;
            return;
        }
        if self.teams_selected == 0 {
            self.teams_selected = total - 1;
        } else {
            self.teams_selected -= 1;
        }
    }

    pub fn select_player_next(&mut self) {
        let total = self.visible_players().len();
        if total == 0 {
            self.players_selected = 0;
            return;
        }
        self.players_selected = (self.players_selected + 1) % total;
    }

    pub fn select_player_prev(&mut self) {
        let total = self.visible_players().len();
        if total == 0 {
            self.players_selected = 0;
            return;
        }
        if self.players_selected == 0 {
            self.players_selected = total - 1;
        } else {
            self.players_selected -= 1;
        }
    }

    fn clamp_team_selection(&mut self) {
        if self.teams.is_empty() {
            self.teams_selected = 0;
        } else if self.teams_selected >= self.teams.len() {
            self.teams_selected = self.teams.len() - 1;
        }
    }

    fn clamp_player_selection(&mut self) {
        let total = self.visible_players().len();
        if total == 0 {
            self.players_selected = 0;
        } else if self.players_selected >= total {
            self.players_selected = total - 1;
        }
    }

    /// Cycles the player list between "all" and "selected team only".
    pub fn toggle_player_team_filter(&mut self) {
        match self.player_team_filter.take() {
            Some(_) => {}
            None => {
                if let Some(team) = self.selected_team() {
                    self.player_team_filter = Some(team.id.clone());
                }
            }
        }
        self.players_selected = 0;
    }

    pub fn cycle_comparison_tab(&mut self) {
        self.comparison_tab = match self.comparison_tab {
            ComparisonTab::Teams => ComparisonTab::Players,
            ComparisonTab::Players => ComparisonTab::Teams,
        };
    }

    // Fetch bookkeeping: each `begin_*` bumps the collection's generation,
    // raises the loading flag, and returns the token the eventual delta must
    // carry to be applied.

    pub fn begin_teams_fetch(&mut self) -> u64 {
        self.fetch_gen.teams += 1;
        self.teams_loading = true;
        self.fetch_gen.teams
    }

    pub fn begin_players_fetch(&mut self) -> u64 {
        self.fetch_gen.players += 1;
        self.players_loading = true;
        self.fetch_gen.players
    }

    pub fn begin_matches_fetch(&mut self) -> u64 {
        self.fetch_gen.matches += 1;
        self.matches_loading = true;
        self.fetch_gen.matches
    }

    pub fn begin_dashboard_fetch(&mut self) -> u64 {
        self.fetch_gen.dashboard += 1;
        self.dashboard_loading = true;
        self.fetch_gen.dashboard
    }

    pub fn begin_team_comparison(&mut self, id1: String, id2: String) -> u64 {
        self.fetch_gen.team_comparison += 1;
        self.comparison.team_pair = Some((id1, id2));
        self.comparison.teams = None;
        self.comparison.teams_error = None;
        self.comparison.teams_loading = true;
        self.fetch_gen.team_comparison
    }

    pub fn begin_player_comparison(&mut self, id1: String, id2: String) -> u64 {
        self.fetch_gen.player_comparison += 1;
        self.comparison.player_pair = Some((id1, id2));
        self.comparison.players = None;
        self.comparison.players_error = None;
        self.comparison.players_loading = true;
        self.fetch_gen.player_comparison
    }

    pub fn begin_sign_in(&mut self) -> u64 {
        self.fetch_gen.sign_in += 1;
        self.sign_in.submitting = true;
        self.sign_in.error = None;
        self.fetch_gen.sign_in
    }

    /// Screen transition plus the fetches a visit issues. Returns the
    /// provider commands the caller must send; collections already present
    /// or in flight are not re-requested. Every entry to a screen goes
    /// through here, including the post-sign-in landing.
    pub fn enter_screen(
        &mut self,
        screen: Screen,
        recent_limit: usize,
        upcoming_limit: usize,
    ) -> Vec<ProviderCommand> {
        self.screen = screen;
        let mut cmds = Vec::new();
        match screen {
            Screen::SignIn | Screen::Insights => {}
            Screen::Dashboard => {
                if self.dashboard.is_none() && !self.dashboard_loading {
                    cmds.push(ProviderCommand::FetchDashboard {
                        generation: self.begin_dashboard_fetch(),
                    });
                }
                if self.recent_matches.is_empty()
                    && self.upcoming_matches.is_empty()
                    && !self.matches_loading
                {
                    cmds.push(ProviderCommand::FetchMatches {
                        generation: self.begin_matches_fetch(),
                        recent_limit,
                        upcoming_limit,
                    });
                }
            }
            Screen::Teams => {
                if self.teams.is_empty() && !self.teams_loading {
                    cmds.push(ProviderCommand::FetchTeams {
                        generation: self.begin_teams_fetch(),
                    });
                }
            }
            Screen::Players => {
                if self.players.is_empty() && !self.players_loading {
                    cmds.push(ProviderCommand::FetchPlayers {
                        generation: self.begin_players_fetch(),
                    });
                }
            }
            Screen::Comparisons => {
                if self.teams.is_empty() && !self.teams_loading {
                    cmds.push(ProviderCommand::FetchTeams {
                        generation: self.begin_teams_fetch(),
                    });
                }
                if self.players.is_empty() && !self.players_loading {
                    cmds.push(ProviderCommand::FetchPlayers {
                        generation: self.begin_players_fetch(),
                    });
                }
            }
        }
        cmds
    }

    /// Clears identity and token; cached domain data stays (it is public
    /// league data, and the store lives for the process).
    pub fn logout(&mut self) {
        self.auth.logout();
        self.sign_in = SignInForm::new();
        self.screen = Screen::SignIn;
        self.push_log("[INFO] Signed out");
    }
}

/// State mutations delivered from the provider thread. Each fetch result
/// carries the request generation it was issued under.
#[derive(Debug, Clone)]
pub enum Delta {
    SetTeams {
        generation: u64,
        teams: Vec<Team>,
    },
    SetPlayers {
        generation: u64,
        players: Vec<Player>,
    },
    SetMatches {
        generation: u64,
        recent: Vec<Match>,
        upcoming: Vec<Match>,
    },
    SetDashboard {
        generation: u64,
        stats: DashboardStats,
    },
    SetTeamComparison {
        generation: u64,
        result: Result<TeamComparison, String>,
    },
    SetPlayerComparison {
        generation: u64,
        result: Result<PlayerComparison, String>,
    },
    SignedIn {
        generation: u64,
        result: Result<Session, String>,
    },
    Log(String),
}

#[derive(Debug, Clone)]
pub enum ProviderCommand {
    FetchTeams {
        generation: u64,
    },
    FetchPlayers {
        generation: u64,
    },
    FetchMatches {
        generation: u64,
        recent_limit: usize,
        upcoming_limit: usize,
    },
    FetchDashboard {
        generation: u64,
    },
    FetchTeamComparison {
        generation: u64,
        id1: String,
        id2: String,
    },
    FetchPlayerComparison {
        generation: u64,
        id1: String,
        id2: String,
    },
    SignIn {
        generation: u64,
        request: SignInRequest,
    },
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::SetTeams { generation, teams } => {
            if generation != state.fetch_gen.teams {
                state.push_log("[INFO] Discarded stale teams result");
                return;
            }
            state.set_teams(teams);
            state.teams_loading = false;
        }
        Delta::SetPlayers {
            generation,
            players,
        } => {
            if generation != state.fetch_gen.players {
                state.push_log("[INFO] Discarded stale players result");
                return;
            }
            state.set_players(players);
            state.players_loading = false;
        }
        Delta::SetMatches {
            generation,
            recent,
            upcoming,
        } => {
            if generation != state.fetch_gen.matches {
                state.push_log("[INFO] Discarded stale matches result");
                return;
            }
            state.set_recent_matches(recent);
            state.set_upcoming_matches(upcoming);
            state.matches_loading = false;
        }
        Delta::SetDashboard { generation, stats } => {
            if generation != state.fetch_gen.dashboard {
                state.push_log("[INFO] Discarded stale dashboard result");
                return;
            }
            state.dashboard = Some(stats);
            state.dashboard_loading = false;
        }
        Delta::SetTeamComparison { generation, result } => {
            if generation != state.fetch_gen.team_comparison {
                state.push_log("[INFO] Discarded stale team comparison");
                return;
            }
            state.comparison.teams_loading = false;
            match result {
                Ok(comparison) => {
                    state.comparison.teams = Some(comparison);
                    state.comparison.teams_error = None;
                }
                Err(msg) => {
                    state.push_log(format!("[WARN] Team comparison: {msg}"));
                    state.comparison.teams = None;
                    state.comparison.teams_error = Some(msg);
                }
            }
        }
        Delta::SetPlayerComparison { generation, result } => {
            if generation != state.fetch_gen.player_comparison {
                state.push_log("[INFO] Discarded stale player comparison");
                return;
            }
            state.comparison.players_loading = false;
            match result {
                Ok(comparison) => {
                    state.comparison.players = Some(comparison);
                    state.comparison.players_error = None;
                }
                Err(msg) => {
                    state.push_log(format!("[WARN] Player comparison: {msg}"));
                    state.comparison.players = None;
                    state.comparison.players_error = Some(msg);
                }
            }
        }
        Delta::SignedIn { generation, result } => {
            if generation != state.fetch_gen.sign_in {
                state.push_log("[INFO] Discarded stale sign-in result");
                return;
            }
            state.sign_in.submitting = false;
            match result {
                Ok(session) => {
                    let who = format!(
                        "{} ({})",
                        session.user.email,
                        session.user.role.label()
                    );
                    state.auth.set_user(session.user);
                    state.auth.set_access_token(session.access_token);
                    state.sign_in = SignInForm::new();
                    state.screen = Screen::Dashboard;
                    state.push_log(format!("[INFO] Signed in as {who}"));
                }
                Err(msg) => {
                    state.push_log(format!("[WARN] Sign-in failed: {msg}"));
                    state.sign_in.error = Some(msg);
                }
            }
        }
        Delta::Log(msg) => state.push_log(msg),
    }
}
