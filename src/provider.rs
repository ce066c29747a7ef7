use std::sync::mpsc::{Receiver, Sender};
use std::thread;

use crate::api::LeagueApi;
use crate::state::{Delta, ProviderCommand};

/// One worker thread between the UI and whatever `LeagueApi` backend is
/// configured. Commands arrive with their request generation; results go back
/// as deltas carrying the same generation so the store can discard stale ones.
pub fn spawn_provider(
    api: Box<dyn LeagueApi>,
    tx: Sender<Delta>,
    cmd_rx: Receiver<ProviderCommand>,
) {
    thread::spawn(move || {
        while let Ok(cmd) = cmd_rx.recv() {
            handle_command(api.as_ref(), &tx, cmd);
        }
    });
}

fn handle_command(api: &dyn LeagueApi, tx: &Sender<Delta>, cmd: ProviderCommand) {
    match cmd {
        ProviderCommand::FetchTeams { generation } => {
            let teams = match api.teams() {
                Ok(teams) => teams,
                Err(err) => {
                    let _ = tx.send(Delta::Log(format!("[WARN] Teams fetch failed: {err}")));
                    Vec::new()
                }
            };
            let _ = tx.send(Delta::SetTeams { generation, teams });
        }
        ProviderCommand::FetchPlayers { generation } => {
            let players = match api.players() {
                Ok(players) => players,
                Err(err) => {
                    let _ = tx.send(Delta::Log(format!("[WARN] Players fetch failed: {err}")));
                    Vec::new()
                }
            };
            let _ = tx.send(Delta::SetPlayers {
                generation,
                players,
            });
        }
        ProviderCommand::FetchMatches {
            generation,
            recent_limit,
            upcoming_limit,
        } => {
            let recent = match api.recent_matches(recent_limit) {
                Ok(matches) => matches,
                Err(err) => {
                    let _ = tx.send(Delta::Log(format!(
                        "[WARN] Recent matches fetch failed: {err}"
                    )));
                    Vec::new()
                }
            };
            let upcoming = match api.upcoming_matches(upcoming_limit) {
                Ok(matches) => matches,
                Err(err) => {
                    let _ = tx.send(Delta::Log(format!(
                        "[WARN] Upcoming matches fetch failed: {err}"
                    )));
                    Vec::new()
                }
            };
            let _ = tx.send(Delta::SetMatches {
                generation,
                recent,
                upcoming,
            });
        }
        ProviderCommand::FetchDashboard { generation } => {
            let stats = match api.dashboard_stats() {
                Ok(stats) => stats,
                Err(err) => {
                    let _ = tx.send(Delta::Log(format!("[WARN] Dashboard fetch failed: {err}")));
                    Default::default()
                }
            };
            let _ = tx.send(Delta::SetDashboard { generation, stats });
        }
        // Comparison and sign-in failures are first-class results: the view
        // renders them, not just the log.
        ProviderCommand::FetchTeamComparison {
            generation,
            id1,
            id2,
        } => {
            let result = api.team_comparison(&id1, &id2).map_err(|err| err.to_string());
            let _ = tx.send(Delta::SetTeamComparison { generation, result });
        }
        ProviderCommand::FetchPlayerComparison {
            generation,
            id1,
            id2,
        } => {
            let result = api
                .player_comparison(&id1, &id2)
                .map_err(|err| err.to_string());
            let _ = tx.send(Delta::SetPlayerComparison { generation, result });
        }
        ProviderCommand::SignIn {
            generation,
            request,
        } => {
            let result = api.sign_in(&request).map_err(|err| err.to_string());
            let _ = tx.send(Delta::SignedIn { generation, result });
        }
    }
}
