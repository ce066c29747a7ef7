use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamStats {
    pub points: u32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub tries: u32,
    pub possession: f64,
    pub territory: f64,
    pub scrum_success: f64,
    pub lineout_success: f64,
    pub discipline: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: String,
    pub name: String,
    pub short_name: String,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub stats: TeamStats,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStats {
    pub tries: u32,
    pub tackles: u32,
    pub meters_gained: u32,
    pub kicking_meters: u32,
    pub lineouts_won: u32,
    pub scrums_won: u32,
    pub penalties: u32,
    pub yellow_cards: u32,
    pub red_cards: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: String,
    pub name: String,
    pub position: String,
    /// Non-owning reference; resolving against a missing team is "not found",
    /// never an error.
    pub team_id: String,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub height: Option<String>,
    #[serde(default)]
    pub weight: Option<String>,
    #[serde(default)]
    pub nationality: Option<String>,
    #[serde(default)]
    pub stats: PlayerStats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Completed,
    Upcoming,
    Live,
}

impl MatchStatus {
    pub fn label(self) -> &'static str {
        match self {
            MatchStatus::Completed => "FT",
            MatchStatus::Upcoming => "UPC",
            MatchStatus::Live => "LIVE",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SideStats {
    pub tries: u32,
    pub conversions: u32,
    pub penalties: u32,
    pub possession: f64,
    pub territory: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchStatSplit {
    pub home: SideStats,
    pub away: SideStats,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: String,
    pub home_team_id: String,
    pub away_team_id: String,
    pub home_score: u32,
    pub away_score: u32,
    /// ISO date string (`YYYY-MM-DD`), as the future backend will send it.
    pub date: String,
    pub status: MatchStatus,
    #[serde(default)]
    pub stats: MatchStatSplit,
}

impl Match {
    pub fn involves(&self, team_id: &str) -> bool {
        self.home_team_id == team_id || self.away_team_id == team_id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopScoringTeam {
    pub id: String,
    pub name: String,
    pub tries: u32,
}

/// Small aggregate summary for the dashboard landing screen.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_matches: u32,
    pub total_tries: u32,
    pub total_points: u32,
    #[serde(default)]
    pub top_scoring_team: Option<TopScoringTeam>,
    #[serde(default)]
    pub recent_matches: Vec<Match>,
    #[serde(default)]
    pub upcoming_matches: Vec<Match>,
}

/// One chart row of a side-by-side comparison. `delta` is `left - right`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricDelta {
    pub metric: String,
    pub left: f64,
    pub right: f64,
    pub delta: f64,
}

impl MetricDelta {
    fn row(metric: &str, left: f64, right: f64) -> MetricDelta {
        MetricDelta {
            metric: metric.to_string(),
            left,
            right,
            delta: left - right,
        }
    }
}

/// Derived on demand from two teams; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamComparison {
    pub team1: Team,
    pub team2: Team,
    pub deltas: Vec<MetricDelta>,
}

impl TeamComparison {
    pub fn between(team1: &Team, team2: &Team) -> TeamComparison {
        let a = &team1.stats;
        let b = &team2.stats;
        let deltas = vec![
            MetricDelta::row("Possession", a.possession, b.possession),
            MetricDelta::row("Territory", a.territory, b.territory),
            MetricDelta::row("Scrum Success", a.scrum_success, b.scrum_success),
            MetricDelta::row("Lineout Success", a.lineout_success, b.lineout_success),
            MetricDelta::row("Discipline", a.discipline, b.discipline),
        ];
        TeamComparison {
            team1: team1.clone(),
            team2: team2.clone(),
            deltas,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerComparison {
    pub player1: Player,
    pub player2: Player,
    pub deltas: Vec<MetricDelta>,
}

impl PlayerComparison {
    pub fn between(player1: &Player, player2: &Player) -> PlayerComparison {
        let a = &player1.stats;
        let b = &player2.stats;
        let deltas = vec![
            MetricDelta::row("Tries", a.tries as f64, b.tries as f64),
            MetricDelta::row("Tackles", a.tackles as f64, b.tackles as f64),
            MetricDelta::row("Meters Gained", a.meters_gained as f64, b.meters_gained as f64),
            MetricDelta::row(
                "Kicking Meters",
                a.kicking_meters as f64,
                b.kicking_meters as f64,
            ),
            MetricDelta::row("Lineouts Won", a.lineouts_won as f64, b.lineouts_won as f64),
        ];
        PlayerComparison {
            player1: player1.clone(),
            player2: player2.clone(),
            deltas,
        }
    }
}

/// "12 Apr 2026" for valid ISO dates, the raw string otherwise.
pub fn format_match_date(raw: &str) -> String {
    let cleaned = raw.trim();
    if cleaned.is_empty() {
        return "TBD".to_string();
    }
    match NaiveDate::parse_from_str(cleaned, "%Y-%m-%d") {
        Ok(date) => date.format("%d %b %Y").to_string(),
        Err(_) => cleaned.to_string(),
    }
}
