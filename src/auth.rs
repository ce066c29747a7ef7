use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Closed set of league roles. Anything outside these four is rejected at the
/// parsing boundary, so downstream code can match exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Coach,
    Player,
    Fan,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Admin, Role::Coach, Role::Player, Role::Fan];

    /// Fail-closed parse: unknown role strings yield `None`, never a panic.
    pub fn parse(raw: &str) -> Option<Role> {
        match raw.trim().to_lowercase().as_str() {
            "admin" => Some(Role::Admin),
            "coach" => Some(Role::Coach),
            "player" => Some(Role::Player),
            "fan" => Some(Role::Fan),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Coach => "coach",
            Role::Player => "player",
            Role::Fan => "fan",
        }
    }

    pub fn next(self) -> Role {
        match self {
            Role::Admin => Role::Coach,
            Role::Coach => Role::Player,
            Role::Player => Role::Fan,
            Role::Fan => Role::Admin,
        }
    }

    pub fn prev(self) -> Role {
        match self {
            Role::Admin => Role::Fan,
            Role::Coach => Role::Admin,
            Role::Player => Role::Coach,
            Role::Fan => Role::Player,
        }
    }
}

/// Ordered permission grants per role. The lists are static data, not policy
/// logic; checks are exact string matches.
pub fn role_permissions(role: Role) -> &'static [&'static str] {
    match role {
        Role::Admin => &[
            "view:dashboard",
            "view:teams",
            "view:players",
            "view:comparisons",
            "view:insights",
            "edit:teams",
            "edit:players",
            "edit:matches",
            "delete:teams",
            "delete:players",
            "manage:users",
            "manage:system",
        ],
        Role::Coach => &[
            "view:dashboard",
            "view:teams",
            "view:players",
            "view:comparisons",
            "view:insights",
            "edit:team:own",
            "edit:players:team",
            "view:team:analytics",
        ],
        Role::Player => &[
            "view:dashboard",
            "view:teams",
            "view:players",
            "view:own:stats",
            "view:team:basic",
        ],
        Role::Fan => &[
            "view:dashboard",
            "view:teams",
            "view:players",
            "view:comparisons",
        ],
    }
}

/// Human-readable capability blurbs shown by the role selector.
pub fn role_capabilities(role: Role) -> &'static [&'static str] {
    match role {
        Role::Admin => &[
            "Full system access",
            "Manage all teams and players",
            "Edit match results",
            "Access advanced analytics",
            "User management",
            "System configuration",
        ],
        Role::Coach => &[
            "Team management",
            "Player performance tracking",
            "Match strategy analysis",
            "Team-specific insights",
            "Player statistics access",
        ],
        Role::Player => &[
            "Personal statistics",
            "Team information",
            "Performance tracking",
            "Match schedules",
        ],
        Role::Fan => &[
            "View team standings",
            "Player statistics",
            "Match results",
            "Basic comparisons",
        ],
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    /// Team linkage for coaches and players.
    #[serde(default)]
    pub team_id: Option<String>,
    /// Player linkage for players.
    #[serde(default)]
    pub player_id: Option<String>,
    /// Explicit per-user grants on top of the role's static list.
    #[serde(default)]
    pub permissions: Vec<String>,
    /// Expiry is recorded but nothing in the app enforces it; views may
    /// surface it as informational state.
    pub exp: DateTime<Utc>,
}

/// True iff the permission is in the user's explicit override list or in the
/// static list for the user's role.
pub fn has_permission(user: &User, permission: &str) -> bool {
    user.permissions.iter().any(|p| p == permission)
        || role_permissions(user.role).contains(&permission)
}

/// At most one signed-in identity, process-wide. Mutations go through the
/// named operations below; fields stay private so the invariants hold.
#[derive(Debug, Clone, Default)]
pub struct AuthState {
    user: Option<User>,
    access_token: Option<String>,
}

impl AuthState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    /// Replaces the current identity unconditionally.
    pub fn set_user(&mut self, user: User) {
        self.user = Some(user);
    }

    /// Replaces the current token unconditionally.
    pub fn set_access_token(&mut self, token: String) {
        self.access_token = Some(token);
    }

    /// Back to unauthenticated: clears both identity and token.
    pub fn logout(&mut self) {
        self.user = None;
        self.access_token = None;
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// Informational only; no scheduler acts on this.
    pub fn session_expired(&self, now: DateTime<Utc>) -> bool {
        self.user.as_ref().is_some_and(|u| u.exp <= now)
    }

    /// Permission gate used by the view layer. No user means no access.
    pub fn can(&self, permission: &str) -> bool {
        self.user
            .as_ref()
            .is_some_and(|u| has_permission(u, permission))
    }
}
