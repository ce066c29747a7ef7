use chrono::{Duration, Utc};

use kru_terminal::auth::{AuthState, Role, User, has_permission, role_permissions};

fn user_with(role: Role, permissions: Vec<String>) -> User {
    User {
        id: "ACC001".to_string(),
        email: "test@example.com".to_string(),
        name: "test".to_string(),
        role,
        team_id: None,
        player_id: None,
        permissions,
        exp: Utc::now() + Duration::hours(24),
    }
}

#[test]
fn every_role_has_a_fixed_nonempty_grant_list() {
    for role in Role::ALL {
        let perms = role_permissions(role);
        assert!(!perms.is_empty(), "{} has no permissions", role.label());
        // Same role, same list, every time.
        assert_eq!(perms, role_permissions(role));
    }
}

#[test]
fn all_roles_share_the_core_view_permissions() {
    for role in Role::ALL {
        for perm in ["view:dashboard", "view:teams", "view:players"] {
            assert!(
                role_permissions(role).contains(&perm),
                "{} is missing {perm}",
                role.label()
            );
        }
    }
}

#[test]
fn admin_grants_are_a_superset_of_fan_grants() {
    let admin = role_permissions(Role::Admin);
    for perm in role_permissions(Role::Fan) {
        assert!(admin.contains(perm), "admin is missing {perm}");
    }
}

#[test]
fn admin_grants_cover_editing_and_management() {
    let admin = role_permissions(Role::Admin);
    for perm in ["edit:teams", "delete:players", "manage:users", "manage:system"] {
        assert!(admin.contains(&perm));
    }
    assert_eq!(admin.len(), 12);
}

#[test]
fn fan_cannot_edit_but_can_compare() {
    let user = user_with(Role::Fan, Vec::new());
    assert!(has_permission(&user, "view:comparisons"));
    assert!(!has_permission(&user, "edit:teams"));
    assert!(!has_permission(&user, "view:insights"));
}

#[test]
fn player_role_lacks_comparisons() {
    let user = user_with(Role::Player, Vec::new());
    assert!(!has_permission(&user, "view:comparisons"));
    assert!(has_permission(&user, "view:own:stats"));
}

#[test]
fn explicit_override_grants_beyond_the_role() {
    let user = user_with(Role::Fan, vec!["view:insights".to_string()]);
    assert!(has_permission(&user, "view:insights"));
    // Overrides add grants, they do not remove role grants.
    assert!(has_permission(&user, "view:teams"));
}

#[test]
fn unknown_permission_string_is_denied() {
    let user = user_with(Role::Admin, Vec::new());
    assert!(!has_permission(&user, "view:everything"));
    assert!(!has_permission(&user, ""));
}

#[test]
fn role_parse_is_fail_closed() {
    assert_eq!(Role::parse("admin"), Some(Role::Admin));
    assert_eq!(Role::parse(" Coach "), Some(Role::Coach));
    assert_eq!(Role::parse("PLAYER"), Some(Role::Player));
    assert_eq!(Role::parse("superadmin"), None);
    assert_eq!(Role::parse(""), None);
    assert_eq!(Role::parse("guest"), None);
}

#[test]
fn every_role_passes_the_dashboard_gate() {
    for role in Role::ALL {
        let mut auth = AuthState::new();
        auth.set_user(user_with(role, Vec::new()));
        assert!(auth.can("view:dashboard"), "{}", role.label());
    }
}

#[test]
fn auth_state_gate_denies_without_a_user() {
    let auth = AuthState::new();
    assert!(!auth.can("view:dashboard"));
}

#[test]
fn auth_state_gate_follows_the_signed_in_role() {
    let mut auth = AuthState::new();
    auth.set_user(user_with(Role::Coach, Vec::new()));
    assert!(auth.can("edit:team:own"));
    assert!(!auth.can("manage:system"));
}
