use std::time::Duration;

use kru_terminal::api::{ApiError, FixtureApi, LeagueApi, SignInRequest, StubApi};
use kru_terminal::auth::Role;
use kru_terminal::models::{
    Match, MatchStatSplit, MatchStatus, Player, PlayerStats, SideStats, Team, TeamStats,
};

fn stub() -> StubApi {
    StubApi::new(Duration::ZERO)
}

fn request(email: &str, password: &str, role: Role) -> SignInRequest {
    SignInRequest {
        email: email.to_string(),
        password: password.to_string(),
        role,
    }
}

#[test]
fn stub_collections_resolve_empty() {
    let api = stub();
    assert!(api.teams().unwrap().is_empty());
    assert!(api.players().unwrap().is_empty());
    assert!(api.recent_matches(5).unwrap().is_empty());
    assert!(api.upcoming_matches(5).unwrap().is_empty());
    assert!(api.players_by_team("kcb").unwrap().is_empty());
    assert!(api.matches_by_team("kcb").unwrap().is_empty());
}

#[test]
fn stub_lookups_resolve_absent() {
    let api = stub();
    assert!(api.team_by_id("kabras-sugar").unwrap().is_none());
    assert!(api.player_by_id("p1").unwrap().is_none());
    assert!(api.match_by_id("m1").unwrap().is_none());
}

#[test]
fn stub_dashboard_is_zeroed() {
    let stats = stub().dashboard_stats().unwrap();
    assert_eq!(stats.total_matches, 0);
    assert_eq!(stats.total_tries, 0);
    assert_eq!(stats.total_points, 0);
    assert!(stats.top_scoring_team.is_none());
    assert!(stats.recent_matches.is_empty());
}

#[test]
fn stub_comparisons_fail_with_their_per_kind_messages() {
    let api = stub();
    let err = api.team_comparison("a", "b").unwrap_err();
    assert!(matches!(err, ApiError::BackendNotImplemented(_)));
    assert_eq!(
        err.to_string(),
        "Backend not implemented - team comparison data will be available when the backend is ready"
    );

    let err = api.player_comparison("a", "b").unwrap_err();
    assert!(matches!(err, ApiError::BackendNotImplemented(_)));
    assert_eq!(
        err.to_string(),
        "Backend not implemented - player comparison data will be available when the backend is ready"
    );
}

#[test]
fn sign_in_fabricates_a_session_from_the_email() {
    let session = stub()
        .sign_in(&request("wanjiru@club.co.ke", "longenough", Role::Coach))
        .unwrap();
    assert_eq!(session.user.id, "ACC001");
    assert_eq!(session.user.name, "wanjiru");
    assert_eq!(session.user.email, "wanjiru@club.co.ke");
    assert_eq!(session.user.role, Role::Coach);
    assert!(!session.access_token.is_empty());
}

#[test]
fn sign_in_rejects_short_passwords() {
    let err = stub()
        .sign_in(&request("fan@club.co.ke", "short1", Role::Fan))
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidCredentials));
}

#[test]
fn sign_in_rejects_malformed_emails() {
    let api = stub();
    for email in ["not-an-email", "@club.co.ke", ""] {
        let err = api
            .sign_in(&request(email, "longenough", Role::Fan))
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidCredentials), "{email:?}");
    }
}

// Fixture backend: same trait, data actually comes back.

fn team(id: &str, tries: u32, possession: f64) -> Team {
    Team {
        id: id.to_string(),
        name: id.to_string(),
        short_name: id.to_string(),
        colors: Vec::new(),
        stats: TeamStats {
            tries,
            possession,
            ..Default::default()
        },
    }
}

fn player(id: &str, team_id: &str, tries: u32) -> Player {
    Player {
        id: id.to_string(),
        name: id.to_string(),
        position: "Wing".to_string(),
        team_id: team_id.to_string(),
        age: None,
        height: None,
        weight: None,
        nationality: None,
        stats: PlayerStats {
            tries,
            ..Default::default()
        },
    }
}

fn fixture_match(id: &str, status: MatchStatus, home_score: u32, home_tries: u32) -> Match {
    Match {
        id: id.to_string(),
        home_team_id: "kcb".to_string(),
        away_team_id: "quins".to_string(),
        home_score,
        away_score: 10,
        date: "2026-03-07".to_string(),
        status,
        stats: MatchStatSplit {
            home: SideStats {
                tries: home_tries,
                ..Default::default()
            },
            away: SideStats {
                tries: 1,
                ..Default::default()
            },
        },
    }
}

fn fixture_api() -> FixtureApi {
    FixtureApi::from_parts(
        vec![team("kcb", 40, 55.0), team("quins", 28, 45.0)],
        vec![
            player("p1", "kcb", 9),
            player("p2", "quins", 4),
            player("p3", "kcb", 2),
        ],
        vec![
            fixture_match("m1", MatchStatus::Completed, 24, 3),
            fixture_match("m2", MatchStatus::Upcoming, 0, 0),
            fixture_match("m3", MatchStatus::Completed, 17, 2),
        ],
    )
}

#[test]
fn fixture_serves_its_collections() {
    let api = fixture_api();
    assert_eq!(api.teams().unwrap().len(), 2);
    assert_eq!(api.team_by_id("quins").unwrap().unwrap().stats.tries, 28);

    let kcb: Vec<String> = api
        .players_by_team("kcb")
        .unwrap()
        .into_iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(kcb, ["p1", "p3"]);
}

#[test]
fn fixture_splits_matches_by_status() {
    let api = fixture_api();
    let recent: Vec<String> = api
        .recent_matches(5)
        .unwrap()
        .into_iter()
        .map(|m| m.id)
        .collect();
    assert_eq!(recent, ["m1", "m3"]);

    let upcoming = api.upcoming_matches(5).unwrap();
    assert_eq!(upcoming.len(), 1);
    assert_eq!(upcoming[0].id, "m2");

    assert_eq!(api.recent_matches(1).unwrap().len(), 1);
}

#[test]
fn fixture_team_comparison_computes_deltas() {
    let cmp = fixture_api().team_comparison("kcb", "quins").unwrap();
    assert_eq!(cmp.team1.id, "kcb");
    let possession = cmp
        .deltas
        .iter()
        .find(|d| d.metric == "Possession")
        .unwrap();
    assert_eq!(possession.left, 55.0);
    assert_eq!(possession.right, 45.0);
    assert_eq!(possession.delta, 10.0);
}

#[test]
fn fixture_player_comparison_computes_deltas() {
    let cmp = fixture_api().player_comparison("p1", "p2").unwrap();
    let tries = cmp.deltas.iter().find(|d| d.metric == "Tries").unwrap();
    assert_eq!(tries.left, 9.0);
    assert_eq!(tries.right, 4.0);
    assert_eq!(tries.delta, 5.0);
}

#[test]
fn fixture_comparison_with_unknown_id_is_an_error() {
    let err = fixture_api().team_comparison("kcb", "nope").unwrap_err();
    assert!(matches!(err, ApiError::Fixture(_)));
    assert!(err.to_string().contains("nope"));
}

#[test]
fn fixture_dashboard_aggregates_completed_matches() {
    let stats = fixture_api().dashboard_stats().unwrap();
    assert_eq!(stats.total_matches, 2);
    // Home and away tries of m1 and m3.
    assert_eq!(stats.total_tries, 3 + 1 + 2 + 1);
    assert_eq!(stats.total_points, 24 + 10 + 17 + 10);
    assert_eq!(stats.top_scoring_team.unwrap().id, "kcb");
    assert_eq!(stats.recent_matches.len(), 2);
    assert_eq!(stats.upcoming_matches.len(), 1);
}
