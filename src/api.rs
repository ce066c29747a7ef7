use std::env;
use std::fs;
use std::path::Path;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use chrono::{Duration as ChronoDuration, Utc};
use serde::Deserialize;
use thiserror::Error;

use crate::auth::{Role, User};
use crate::models::{
    DashboardStats, Match, MatchStatus, Player, PlayerComparison, Team, TeamComparison,
    TopScoringTeam,
};

// Fixed messages the comparison stubs reject with until a backend exists.
pub const TEAM_COMPARISON_NOT_IMPLEMENTED: &str =
    "Backend not implemented - team comparison data will be available when the backend is ready";
pub const PLAYER_COMPARISON_NOT_IMPLEMENTED: &str =
    "Backend not implemented - player comparison data will be available when the backend is ready";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BackendNotImplemented(&'static str),
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("fixture data error: {0}")]
    Fixture(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Clone)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Clone)]
pub struct Session {
    pub user: User,
    pub access_token: String,
}

/// The sole boundary to a future backend. Calls are made from the provider
/// thread, may block there, and may fail; store and view code see only the
/// resulting deltas, so implementations are swappable wholesale.
///
/// Absence is `Option::None`, never an error.
pub trait LeagueApi: Send {
    fn teams(&self) -> ApiResult<Vec<Team>>;
    fn team_by_id(&self, id: &str) -> ApiResult<Option<Team>>;
    fn players(&self) -> ApiResult<Vec<Player>>;
    fn player_by_id(&self, id: &str) -> ApiResult<Option<Player>>;
    fn players_by_team(&self, team_id: &str) -> ApiResult<Vec<Player>>;
    fn recent_matches(&self, limit: usize) -> ApiResult<Vec<Match>>;
    fn upcoming_matches(&self, limit: usize) -> ApiResult<Vec<Match>>;
    fn match_by_id(&self, id: &str) -> ApiResult<Option<Match>>;
    fn matches_by_team(&self, team_id: &str) -> ApiResult<Vec<Match>>;
    fn team_comparison(&self, id1: &str, id2: &str) -> ApiResult<TeamComparison>;
    fn player_comparison(&self, id1: &str, id2: &str) -> ApiResult<PlayerComparison>;
    fn dashboard_stats(&self) -> ApiResult<DashboardStats>;
    fn sign_in(&self, request: &SignInRequest) -> ApiResult<Session>;
}

/// Mock credential exchange shared by the stub and fixture backends. The form
/// contract is checked (shape only, no real verification); everything else is
/// fabricated the way a placeholder backend would.
fn mock_session(request: &SignInRequest) -> ApiResult<Session> {
    let email = request.email.trim();
    let local = email.split('@').next().unwrap_or("");
    if local.is_empty() || !email.contains('@') {
        return Err(ApiError::InvalidCredentials);
    }
    if request.password.chars().count() < 7 {
        return Err(ApiError::InvalidCredentials);
    }

    let user = User {
        id: "ACC001".to_string(),
        email: email.to_string(),
        name: local.to_string(),
        role: request.role,
        team_id: None,
        player_id: None,
        permissions: Vec::new(),
        exp: Utc::now() + ChronoDuration::hours(24),
    };
    Ok(Session {
        user,
        access_token: "stub-access-token".to_string(),
    })
}

/// Default backend: every call waits a fixed artificial delay and then
/// resolves empty, zeroed, or with the fixed not-implemented error.
#[derive(Debug, Clone)]
pub struct StubApi {
    delay: Duration,
}

impl StubApi {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn from_env() -> Self {
        let millis = env::var("STUB_DELAY_MS")
            .ok()
            .and_then(|val| val.parse::<u64>().ok())
            .unwrap_or(300)
            .min(5_000);
        Self::new(Duration::from_millis(millis))
    }

    fn pause(&self) {
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
    }
}

impl LeagueApi for StubApi {
    fn teams(&self) -> ApiResult<Vec<Team>> {
        self.pause();
        Ok(Vec::new())
    }

    fn team_by_id(&self, _id: &str) -> ApiResult<Option<Team>> {
        self.pause();
        Ok(None)
    }

    fn players(&self) -> ApiResult<Vec<Player>> {
        self.pause();
        Ok(Vec::new())
    }

    fn player_by_id(&self, _id: &str) -> ApiResult<Option<Player>> {
        self.pause();
        Ok(None)
    }

    fn players_by_team(&self, _team_id: &str) -> ApiResult<Vec<Player>> {
        self.pause();
        Ok(Vec::new())
    }

    fn recent_matches(&self, _limit: usize) -> ApiResult<Vec<Match>> {
        self.pause();
        Ok(Vec::new())
    }

    fn upcoming_matches(&self, _limit: usize) -> ApiResult<Vec<Match>> {
        self.pause();
        Ok(Vec::new())
    }

    fn match_by_id(&self, _id: &str) -> ApiResult<Option<Match>> {
        self.pause();
        Ok(None)
    }

    fn matches_by_team(&self, _team_id: &str) -> ApiResult<Vec<Match>> {
        self.pause();
        Ok(Vec::new())
    }

    fn team_comparison(&self, _id1: &str, _id2: &str) -> ApiResult<TeamComparison> {
        self.pause();
        Err(ApiError::BackendNotImplemented(
            TEAM_COMPARISON_NOT_IMPLEMENTED,
        ))
    }

    fn player_comparison(&self, _id1: &str, _id2: &str) -> ApiResult<PlayerComparison> {
        self.pause();
        Err(ApiError::BackendNotImplemented(
            PLAYER_COMPARISON_NOT_IMPLEMENTED,
        ))
    }

    fn dashboard_stats(&self) -> ApiResult<DashboardStats> {
        self.pause();
        Ok(DashboardStats::default())
    }

    fn sign_in(&self, request: &SignInRequest) -> ApiResult<Session> {
        self.pause();
        mock_session(request)
    }
}

#[derive(Debug, Default, Deserialize)]
struct FixtureFile {
    #[serde(default)]
    teams: Vec<Team>,
    #[serde(default)]
    players: Vec<Player>,
    #[serde(default)]
    matches: Vec<Match>,
}

/// Fixture-file backend: serves a JSON snapshot through the same trait, which
/// keeps the boundary honest about being swappable without touching store or
/// view code.
pub struct FixtureApi {
    data: FixtureFile,
}

impl FixtureApi {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read fixture file {}", path.display()))?;
        let data = serde_json::from_str(&raw)
            .with_context(|| format!("parse fixture file {}", path.display()))?;
        Ok(Self { data })
    }

    pub fn from_parts(teams: Vec<Team>, players: Vec<Player>, matches: Vec<Match>) -> Self {
        Self {
            data: FixtureFile {
                teams,
                players,
                matches,
            },
        }
    }

    fn find_team(&self, id: &str) -> ApiResult<Team> {
        self.data
            .teams
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| ApiError::Fixture(format!("unknown team id: {id}")))
    }

    fn find_player(&self, id: &str) -> ApiResult<Player> {
        self.data
            .players
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| ApiError::Fixture(format!("unknown player id: {id}")))
    }

    fn matches_with_status(&self, status: MatchStatus, limit: usize) -> Vec<Match> {
        self.data
            .matches
            .iter()
            .filter(|m| m.status == status)
            .take(limit)
            .cloned()
            .collect()
    }
}

impl LeagueApi for FixtureApi {
    fn teams(&self) -> ApiResult<Vec<Team>> {
        Ok(self.data.teams.clone())
    }

    fn team_by_id(&self, id: &str) -> ApiResult<Option<Team>> {
        Ok(self.data.teams.iter().find(|t| t.id == id).cloned())
    }

    fn players(&self) -> ApiResult<Vec<Player>> {
        Ok(self.data.players.clone())
    }

    fn player_by_id(&self, id: &str) -> ApiResult<Option<Player>> {
        Ok(self.data.players.iter().find(|p| p.id == id).cloned())
    }

    fn players_by_team(&self, team_id: &str) -> ApiResult<Vec<Player>> {
        Ok(self
            .data
            .players
            .iter()
            .filter(|p| p.team_id == team_id)
            .cloned()
            .collect())
    }

    fn recent_matches(&self, limit: usize) -> ApiResult<Vec<Match>> {
        Ok(self.matches_with_status(MatchStatus::Completed, limit))
    }

    fn upcoming_matches(&self, limit: usize) -> ApiResult<Vec<Match>> {
        Ok(self.matches_with_status(MatchStatus::Upcoming, limit))
    }

    fn match_by_id(&self, id: &str) -> ApiResult<Option<Match>> {
        Ok(self.data.matches.iter().find(|m| m.id == id).cloned())
    }

    fn matches_by_team(&self, team_id: &str) -> ApiResult<Vec<Match>> {
        Ok(self
            .data
            .matches
            .iter()
            .filter(|m| m.involves(team_id))
            .cloned()
            .collect())
    }

    fn team_comparison(&self, id1: &str, id2: &str) -> ApiResult<TeamComparison> {
        let team1 = self.find_team(id1)?;
        let team2 = self.find_team(id2)?;
        Ok(TeamComparison::between(&team1, &team2))
    }

    fn player_comparison(&self, id1: &str, id2: &str) -> ApiResult<PlayerComparison> {
        let player1 = self.find_player(id1)?;
        let player2 = self.find_player(id2)?;
        Ok(PlayerComparison::between(&player1, &player2))
    }

    fn dashboard_stats(&self) -> ApiResult<DashboardStats> {
        let completed: Vec<&Match> = self
            .data
            .matches
            .iter()
            .filter(|m| m.status == MatchStatus::Completed)
            .collect();
        let total_tries: u32 = completed
            .iter()
            .map(|m| m.stats.home.tries + m.stats.away.tries)
            .sum();
        let total_points: u32 = completed.iter().map(|m| m.home_score + m.away_score).sum();
        let top_scoring_team = self
            .data
            .teams
            .iter()
            .max_by_key(|t| t.stats.tries)
            .map(|t| TopScoringTeam {
                id: t.id.clone(),
                name: t.name.clone(),
                tries: t.stats.tries,
            });

        Ok(DashboardStats {
            total_matches: completed.len() as u32,
            total_tries,
            total_points,
            top_scoring_team,
            recent_matches: self.matches_with_status(MatchStatus::Completed, 5),
            upcoming_matches: self.matches_with_status(MatchStatus::Upcoming, 5),
        })
    }

    fn sign_in(&self, request: &SignInRequest) -> ApiResult<Session> {
        mock_session(request)
    }
}
