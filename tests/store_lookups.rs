use kru_terminal::models::{Match, MatchStatSplit, MatchStatus, Player, Team, TeamStats};
use kru_terminal::state::AppState;

fn team(id: &str, name: &str) -> Team {
    Team {
        id: id.to_string(),
        name: name.to_string(),
        short_name: name.split(' ').next().unwrap_or(name).to_string(),
        colors: Vec::new(),
        stats: TeamStats::default(),
    }
}

fn player(id: &str, name: &str, team_id: &str) -> Player {
    Player {
        id: id.to_string(),
        name: name.to_string(),
        position: "Fly-half".to_string(),
        team_id: team_id.to_string(),
        age: None,
        height: None,
        weight: None,
        nationality: None,
        stats: Default::default(),
    }
}

fn fixture(id: &str, home: &str, away: &str, status: MatchStatus) -> Match {
    Match {
        id: id.to_string(),
        home_team_id: home.to_string(),
        away_team_id: away.to_string(),
        home_score: 24,
        away_score: 17,
        date: "2026-04-12".to_string(),
        status,
        stats: MatchStatSplit::default(),
    }
}

#[test]
fn lookups_on_an_empty_store_are_none() {
    let state = AppState::new();
    assert!(state.team_by_id("kabras-sugar").is_none());
    assert!(state.player_by_id("p1").is_none());
    assert!(state.match_by_id("m1").is_none());
    assert!(state.players_by_team("kabras-sugar").is_empty());
    assert!(state.matches_by_team("kabras-sugar").is_empty());
}

#[test]
fn team_lookup_after_replace() {
    let mut state = AppState::new();
    state.set_teams(vec![
        team("kabras-sugar", "Kabras Sugar"),
        team("kcb", "KCB Rugby"),
    ]);
    assert_eq!(state.team_by_id("kabras-sugar").unwrap().name, "Kabras Sugar");
    assert!(state.team_by_id("quins").is_none());
}

#[test]
fn set_teams_replaces_rather_than_merges() {
    let mut state = AppState::new();
    state.set_teams(vec![team("kabras-sugar", "Kabras Sugar")]);
    state.set_teams(vec![team("kcb", "KCB Rugby")]);
    assert!(state.team_by_id("kabras-sugar").is_none());
    assert_eq!(state.teams.len(), 1);
}

#[test]
fn players_by_team_preserves_collection_order() {
    let mut state = AppState::new();
    state.set_players(vec![
        player("p1", "A", "kcb"),
        player("p2", "B", "kabras-sugar"),
        player("p3", "C", "kcb"),
        player("p4", "D", "kcb"),
    ]);
    let kcb: Vec<&str> = state
        .players_by_team("kcb")
        .iter()
        .map(|p| p.id.as_str())
        .collect();
    assert_eq!(kcb, ["p1", "p3", "p4"]);
}

#[test]
fn match_lookup_spans_recent_and_upcoming() {
    let mut state = AppState::new();
    state.set_recent_matches(vec![fixture("m1", "kcb", "quins", MatchStatus::Completed)]);
    state.set_upcoming_matches(vec![fixture(
        "m2",
        "kabras-sugar",
        "kcb",
        MatchStatus::Upcoming,
    )]);

    assert!(state.match_by_id("m1").is_some());
    assert!(state.match_by_id("m2").is_some());
    assert!(state.match_by_id("m3").is_none());
}

#[test]
fn matches_by_team_covers_home_and_away() {
    let mut state = AppState::new();
    state.set_recent_matches(vec![
        fixture("m1", "kcb", "quins", MatchStatus::Completed),
        fixture("m2", "quins", "kabras-sugar", MatchStatus::Completed),
    ]);
    state.set_upcoming_matches(vec![fixture(
        "m3",
        "kabras-sugar",
        "kcb",
        MatchStatus::Upcoming,
    )]);

    let ids: Vec<&str> = state
        .matches_by_team("kabras-sugar")
        .iter()
        .map(|m| m.id.as_str())
        .collect();
    assert_eq!(ids, ["m2", "m3"]);
}

#[test]
fn selection_clamps_when_the_collection_shrinks() {
    let mut state = AppState::new();
    state.set_teams(vec![
        team("a", "A"),
        team("b", "B"),
        team("c", "C"),
    ]);
    state.select_team_next();
    state.select_team_next();
    assert_eq!(state.teams_selected, 2);

    state.set_teams(vec![team("a", "A")]);
    assert_eq!(state.teams_selected, 0);

    state.set_teams(Vec::new());
    assert_eq!(state.teams_selected, 0);
    state.select_team_next();
    assert_eq!(state.teams_selected, 0);
}

#[test]
fn player_team_filter_narrows_the_visible_list() {
    let mut state = AppState::new();
    state.set_teams(vec![team("kcb", "KCB Rugby")]);
    state.set_players(vec![
        player("p1", "A", "kcb"),
        player("p2", "B", "kabras-sugar"),
    ]);

    assert_eq!(state.visible_players().len(), 2);
    state.toggle_player_team_filter();
    assert_eq!(state.player_team_filter.as_deref(), Some("kcb"));
    assert_eq!(state.visible_players().len(), 1);

    state.toggle_player_team_filter();
    assert!(state.player_team_filter.is_none());
    assert_eq!(state.visible_players().len(), 2);
}

#[test]
fn clear_comparison_always_leaves_it_absent() {
    let mut state = AppState::new();
    // Clearing when nothing is set is a no-op, not an error.
    state.clear_comparison();
    assert!(state.comparison.teams.is_none());

    state.begin_team_comparison("kcb".to_string(), "quins".to_string());
    state.clear_comparison();
    assert!(state.comparison.team_pair.is_none());
    assert!(state.comparison.teams.is_none());
    assert!(state.comparison.teams_error.is_none());
    assert!(!state.comparison.teams_loading);
}
