use chrono::Utc;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Clear, Paragraph};

use crate::auth::role_capabilities;
use crate::models::{Match, MetricDelta, format_match_date};
use crate::state::{AppState, ComparisonTab, Screen, SignInField};

pub fn ui(frame: &mut Frame, state: &AppState) {
    if state.screen == Screen::SignIn {
        render_sign_in(frame, frame.size(), state);
        if state.help_overlay {
            render_help_overlay(frame, frame.size());
        }
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header =
        Paragraph::new(header_text(state)).block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match state.screen {
        Screen::SignIn => {}
        Screen::Dashboard => render_gated(
            frame,
            chunks[1],
            state,
            "view:dashboard",
            None,
            |f, area| render_dashboard(f, area, state),
        ),
        Screen::Teams => render_gated(frame, chunks[1], state, "view:teams", None, |f, area| {
            render_teams(f, area, state)
        }),
        Screen::Players => render_gated(frame, chunks[1], state, "view:players", None, |f, area| {
            render_players(f, area, state)
        }),
        Screen::Comparisons => render_gated(
            frame,
            chunks[1],
            state,
            "view:comparisons",
            Some("Comparisons are not available for your role"),
            |f, area| render_comparisons(f, area, state),
        ),
        Screen::Insights => render_gated(
            frame,
            chunks[1],
            state,
            "view:insights",
            Some("Insights are not available for your role"),
            |f, area| render_insights(f, area, state),
        ),
    }

    let footer = Paragraph::new(footer_text(state)).block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[2]);

    if state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

/// Renders `render` iff the current session holds `permission`; otherwise the
/// fallback notice (or nothing). Silent by design: denial is not an error.
fn render_gated(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    permission: &str,
    fallback: Option<&str>,
    render: impl FnOnce(&mut Frame, Rect),
) {
    if state.auth.can(permission) {
        render(frame, area);
    } else if let Some(msg) = fallback {
        let notice = Paragraph::new(msg).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(notice, area);
    }
}

fn header_text(state: &AppState) -> String {
    let badge = match state.auth.user() {
        Some(user) => {
            let expired = if state.auth.session_expired(Utc::now()) {
                " (session expired)"
            } else {
                ""
            };
            format!("{} [{}]{expired}", user.name, user.role.label())
        }
        None => "not signed in".to_string(),
    };
    format!("KENYA CUP ANALYTICS | {} | {badge}", state.screen.label())
}

fn footer_text(state: &AppState) -> String {
    match state.screen {
        Screen::SignIn => "Tab Next field | ←/→ Role | Enter Sign in | Esc Quit".to_string(),
        Screen::Comparisons => {
            "1-5 Screens | t Tab | a/b Pick sides | c Clear | r Refresh | o Sign out | ? Help | q Quit"
                .to_string()
        }
        Screen::Players => {
            "1-5 Screens | j/k Move | f Team filter | r Refresh | o Sign out | ? Help | q Quit"
                .to_string()
        }
        _ => "1-5 Screens | j/k Move | r Refresh | o Sign out | ? Help | q Quit".to_string(),
    }
}

fn render_sign_in(frame: &mut Frame, area: Rect, state: &AppState) {
    let popup = centered_rect(60, 60, area);
    let block = Block::default()
        .title("Kenya Cup Analytics - Sign in")
        .borders(Borders::ALL);
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let form = &state.sign_in;
    let marker = |field: SignInField| if form.focus == field { ">" } else { " " };
    let masked: String = "*".repeat(form.password.chars().count());
    let role_line = match form.role {
        Some(role) => role.label().to_string(),
        None => "←/→ to choose".to_string(),
    };

    let mut lines: Vec<Line> = vec![
        Line::from(format!("{} Email:    {}", marker(SignInField::Email), form.email)),
        Line::from(format!(
            "{} Password: {}",
            marker(SignInField::Password),
            masked
        )),
        Line::from(format!("{} Role:     {}", marker(SignInField::Role), role_line)),
        Line::from(""),
    ];

    if let Some(role) = form.role {
        lines.push(Line::from(Span::styled(
            format!("{} can:", role.label()),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for cap in role_capabilities(role) {
            lines.push(Line::from(format!("  - {cap}")));
        }
        lines.push(Line::from(""));
    }

    if form.submitting {
        lines.push(Line::from(Span::styled(
            "Signing in...",
            Style::default().fg(Color::Yellow),
        )));
    } else if let Some(err) = &form.error {
        lines.push(Line::from(Span::styled(
            err.clone(),
            Style::default().fg(Color::Red),
        )));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_dashboard(frame: &mut Frame, area: Rect, state: &AppState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(4),
            Constraint::Length(5),
        ])
        .split(area);

    render_stat_cards(frame, rows[0], state);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);
    render_match_list(
        frame,
        cols[0],
        state,
        "Recent Matches",
        &state.recent_matches,
        "No recent matches yet",
    );
    render_match_list(
        frame,
        cols[1],
        state,
        "Upcoming Matches",
        &state.upcoming_matches,
        "No upcoming matches yet",
    );

    render_console(frame, rows[2], state);
}

fn render_stat_cards(frame: &mut Frame, area: Rect, state: &AppState) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(area);

    let (matches, tries, points, top) = match &state.dashboard {
        Some(stats) => (
            stats.total_matches.to_string(),
            stats.total_tries.to_string(),
            stats.total_points.to_string(),
            stats
                .top_scoring_team
                .as_ref()
                .map(|t| format!("{} ({})", t.name, t.tries))
                .unwrap_or_else(|| "No data available".to_string()),
        ),
        None if state.dashboard_loading => (
            "...".to_string(),
            "...".to_string(),
            "...".to_string(),
            "Loading...".to_string(),
        ),
        None => (
            "-".to_string(),
            "-".to_string(),
            "-".to_string(),
            "No data available".to_string(),
        ),
    };

    render_stat_card(frame, cols[0], "Total Matches", &matches);
    render_stat_card(frame, cols[1], "Total Tries", &tries);
    render_stat_card(frame, cols[2], "Total Points", &points);
    render_stat_card(frame, cols[3], "Top Scoring Team", &top);
}

fn render_stat_card(frame: &mut Frame, area: Rect, title: &str, value: &str) {
    let card = Paragraph::new(value.to_string())
        .block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(card, area);
}

fn render_match_list(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    title: &str,
    matches: &[Match],
    empty: &str,
) {
    let block = Block::default().title(title).borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if state.matches_loading && matches.is_empty() {
        let loading = Paragraph::new("Loading matches...").style(Style::default().fg(Color::Yellow));
        frame.render_widget(loading, inner);
        return;
    }
    if matches.is_empty() {
        let placeholder = Paragraph::new(empty).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(placeholder, inner);
        return;
    }

    let lines: Vec<String> = matches
        .iter()
        .take(inner.height as usize)
        .map(|m| {
            let home = team_short(state, &m.home_team_id);
            let away = team_short(state, &m.away_team_id);
            format!(
                "{} {home} {}-{} {away}  {}",
                m.status.label(),
                m.home_score,
                m.away_score,
                format_match_date(&m.date)
            )
        })
        .collect();
    frame.render_widget(Paragraph::new(lines.join("\n")), inner);
}

fn team_short(state: &AppState, team_id: &str) -> String {
    state
        .team_by_id(team_id)
        .map(|t| t.short_name.clone())
        .unwrap_or_else(|| team_id.to_string())
}

fn render_console(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default().title("Console").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let text = if state.logs.is_empty() {
        "No alerts yet".to_string()
    } else {
        let take = inner.height.max(1) as usize;
        let mut recent: Vec<String> = state.logs.iter().rev().take(take).cloned().collect();
        recent.reverse();
        recent.join("\n")
    };
    frame.render_widget(Paragraph::new(text), inner);
}

fn render_teams(frame: &mut Frame, area: Rect, state: &AppState) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(area);

    let header = format!(
        "{:<24} {:>4} {:>3} {:>3} {:>3} {:>5} {:>6} {:>6} {:>6} {:>6} {:>5}",
        "Team", "Pts", "W", "L", "D", "Tries", "Poss%", "Terr%", "Scrum%", "LO%", "Disc"
    );
    frame.render_widget(
        Paragraph::new(header).style(Style::default().add_modifier(Modifier::BOLD)),
        sections[0],
    );

    let list_area = sections[1];
    if state.teams_loading && state.teams.is_empty() {
        let loading = Paragraph::new("Loading teams...").style(Style::default().fg(Color::Yellow));
        frame.render_widget(loading, list_area);
        return;
    }
    if state.teams.is_empty() {
        let empty = Paragraph::new("No team data available yet - waiting for backend")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, list_area);
        return;
    }

    let lines: Vec<Line> = state
        .teams
        .iter()
        .enumerate()
        .take(list_area.height as usize)
        .map(|(idx, t)| {
            let s = &t.stats;
            let row = format!(
                "{:<24} {:>4} {:>3} {:>3} {:>3} {:>5} {:>5.1} {:>5.1} {:>5.1} {:>5.1} {:>5.1}",
                t.name,
                s.points,
                s.wins,
                s.losses,
                s.draws,
                s.tries,
                s.possession,
                s.territory,
                s.scrum_success,
                s.lineout_success,
                s.discipline
            );
            let style = if idx == state.teams_selected {
                Style::default().fg(Color::White).bg(Color::DarkGray)
            } else {
                Style::default()
            };
            Line::from(Span::styled(row, style))
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), list_area);
}

fn render_players(frame: &mut Frame, area: Rect, state: &AppState) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Min(1)])
        .split(area);

    let filter = match &state.player_team_filter {
        Some(team_id) => format!("Filter: {}", team_short(state, team_id)),
        None => "Filter: all teams".to_string(),
    };
    frame.render_widget(
        Paragraph::new(filter).style(Style::default().fg(Color::DarkGray)),
        sections[0],
    );

    let header = format!(
        "{:<22} {:<14} {:<10} {:>5} {:>7} {:>7} {:>6} {:>4} {:>4}",
        "Player", "Position", "Team", "Tries", "Tackles", "Meters", "Kick m", "Pen", "Cards"
    );
    frame.render_widget(
        Paragraph::new(header).style(Style::default().add_modifier(Modifier::BOLD)),
        sections[1],
    );

    let list_area = sections[2];
    let visible = state.visible_players();
    if state.players_loading && visible.is_empty() {
        let loading =
            Paragraph::new("Loading players...").style(Style::default().fg(Color::Yellow));
        frame.render_widget(loading, list_area);
        return;
    }
    if visible.is_empty() {
        let empty = Paragraph::new("No player data available yet - waiting for backend")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, list_area);
        return;
    }

    let lines: Vec<Line> = visible
        .iter()
        .enumerate()
        .take(list_area.height as usize)
        .map(|(idx, p)| {
            let s = &p.stats;
            let row = format!(
                "{:<22} {:<14} {:<10} {:>5} {:>7} {:>7} {:>6} {:>4} {:>2}/{:<2}",
                p.name,
                p.position,
                team_short(state, &p.team_id),
                s.tries,
                s.tackles,
                s.meters_gained,
                s.kicking_meters,
                s.penalties,
                s.yellow_cards,
                s.red_cards
            );
            let style = if idx == state.players_selected {
                Style::default().fg(Color::White).bg(Color::DarkGray)
            } else {
                Style::default()
            };
            Line::from(Span::styled(row, style))
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), list_area);
}

fn render_comparisons(frame: &mut Frame, area: Rect, state: &AppState) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(1)])
        .split(area);

    let (tab_label, pair, loading, error) = match state.comparison_tab {
        ComparisonTab::Teams => (
            "Team vs Team",
            state.comparison.team_pair.as_ref(),
            state.comparison.teams_loading,
            state.comparison.teams_error.as_deref(),
        ),
        ComparisonTab::Players => (
            "Player vs Player",
            state.comparison.player_pair.as_ref(),
            state.comparison.players_loading,
            state.comparison.players_error.as_deref(),
        ),
    };

    let picked = match pair {
        Some((a, b)) => format!("{a} vs {b}"),
        None => "pick side A with 'a', side B with 'b'".to_string(),
    };
    frame.render_widget(
        Paragraph::new(format!("{tab_label} | {picked}")),
        sections[0],
    );

    let body = sections[1];
    if loading {
        let msg = Paragraph::new("Comparing...").style(Style::default().fg(Color::Yellow));
        frame.render_widget(msg, body);
        return;
    }
    if let Some(err) = error {
        let msg = Paragraph::new(format!("No comparison data\n{err}"))
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(msg, body);
        return;
    }

    match state.comparison_tab {
        ComparisonTab::Teams => {
            if let Some(cmp) = &state.comparison.teams {
                render_delta_chart(
                    frame,
                    body,
                    &cmp.team1.short_name,
                    &cmp.team2.short_name,
                    &cmp.deltas,
                );
            } else {
                render_comparison_placeholder(frame, body);
            }
        }
        ComparisonTab::Players => {
            if let Some(cmp) = &state.comparison.players {
                render_delta_chart(frame, body, &cmp.player1.name, &cmp.player2.name, &cmp.deltas);
            } else {
                render_comparison_placeholder(frame, body);
            }
        }
    }
}

fn render_comparison_placeholder(frame: &mut Frame, area: Rect) {
    let msg = Paragraph::new("No comparison yet").style(Style::default().fg(Color::DarkGray));
    frame.render_widget(msg, area);
}

fn render_delta_chart(
    frame: &mut Frame,
    area: Rect,
    left_name: &str,
    right_name: &str,
    deltas: &[MetricDelta],
) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let mut chart = BarChart::default()
        .block(
            Block::default()
                .title(format!("{left_name} vs {right_name}"))
                .borders(Borders::ALL),
        )
        .bar_width(5)
        .bar_gap(1)
        .group_gap(2);
    for d in deltas {
        let bars = [
            Bar::default()
                .value(d.left.round().max(0.0) as u64)
                .label(Line::from("A")),
            Bar::default()
                .value(d.right.round().max(0.0) as u64)
                .label(Line::from("B")),
        ];
        chart = chart.data(BarGroup::default().label(Line::from(d.metric.clone())).bars(&bars));
    }
    frame.render_widget(chart, cols[0]);

    let rows: Vec<String> = deltas
        .iter()
        .map(|d| {
            format!(
                "{:<16} {:>7.1} {:>7.1} {:>+7.1}",
                d.metric, d.left, d.right, d.delta
            )
        })
        .collect();
    let table = Paragraph::new(rows.join("\n")).block(
        Block::default()
            .title(format!("{:<16} {:>7} {:>7} {:>7}", "Metric", "A", "B", "Delta"))
            .borders(Borders::ALL),
    );
    frame.render_widget(table, cols[1]);
}

fn render_insights(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default().title("League Insights").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = vec![
        "AI insights will be available when the backend is ready".to_string(),
        String::new(),
    ];
    if let Some(user) = state.auth.user() {
        lines.push(format!("Your access ({}):", user.role.label()));
        for cap in role_capabilities(user.role) {
            lines.push(format!("  - {cap}"));
        }
    }
    frame.render_widget(
        Paragraph::new(lines.join("\n")).style(Style::default().fg(Color::DarkGray)),
        inner,
    );
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Kenya Cup Analytics - Help",
        "",
        "Global:",
        "  1            Dashboard",
        "  2            Teams",
        "  3            Players",
        "  4            Comparisons",
        "  5            Insights",
        "  j/k or ↑/↓   Move selection",
        "  r            Refresh current screen",
        "  o            Sign out",
        "  ?            Toggle help",
        "  q            Quit",
        "",
        "Comparisons:",
        "  t            Teams / players tab",
        "  a / b        Pick selected entity as side A / B",
        "  c            Clear comparison",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
