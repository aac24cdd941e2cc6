use thiserror::Error;
use uuid::Uuid;

use crate::domain::Role;

/// Actions gated by the access policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CreateUser,
    EditUser,
    DeleteUser,
    ViewUser,
    ViewVisitLog,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    #[error("authentication required")]
    NotAuthenticated,
    #[error("insufficient rights for this action")]
    InsufficientRole,
    #[error("only the owner may access this resource")]
    NotOwner,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }
}

/// Capability check for user-administration actions.
///
/// Admins may do anything. Regular users may view or edit only records they
/// own and may read the visit log (scoped to their own visits by the
/// caller). Anonymous actors are always denied.
pub fn evaluate(
    actor_role: Option<Role>,
    action: Action,
    resource_owner_id: Option<Uuid>,
    actor_id: Option<Uuid>,
) -> Decision {
    let Some(role) = actor_role else {
        return Decision::Deny(DenyReason::NotAuthenticated);
    };

    match role {
        Role::Admin => Decision::Allow,
        Role::User => match action {
            Action::EditUser | Action::ViewUser => match (resource_owner_id, actor_id) {
                (Some(owner), Some(actor)) if owner == actor => Decision::Allow,
                _ => Decision::Deny(DenyReason::NotOwner),
            },
            Action::ViewVisitLog => Decision::Allow,
            Action::CreateUser | Action::DeleteUser => {
                Decision::Deny(DenyReason::InsufficientRole)
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_actors_are_denied() {
        let decision = evaluate(None, Action::ViewUser, None, None);
        assert_eq!(decision, Decision::Deny(DenyReason::NotAuthenticated));
    }

    #[test]
    fn admins_can_do_everything() {
        let admin_id = Some(Uuid::new_v4());
        for action in [
            Action::CreateUser,
            Action::EditUser,
            Action::DeleteUser,
            Action::ViewUser,
            Action::ViewVisitLog,
        ] {
            let decision = evaluate(Some(Role::Admin), action, Some(Uuid::new_v4()), admin_id);
            assert!(decision.is_allowed(), "{:?} denied for admin", action);
        }
    }

    #[test]
    fn users_are_scoped_to_their_own_records() {
        let me = Uuid::new_v4();
        let someone_else = Uuid::new_v4();

        assert_eq!(
            evaluate(Some(Role::User), Action::EditUser, Some(me), Some(me)),
            Decision::Allow
        );
        assert_eq!(
            evaluate(
                Some(Role::User),
                Action::EditUser,
                Some(someone_else),
                Some(me)
            ),
            Decision::Deny(DenyReason::NotOwner)
        );
        assert_eq!(
            evaluate(Some(Role::User), Action::ViewUser, None, Some(me)),
            Decision::Deny(DenyReason::NotOwner)
        );
    }

    #[test]
    fn users_cannot_manage_accounts() {
        let me = Some(Uuid::new_v4());
        assert_eq!(
            evaluate(Some(Role::User), Action::CreateUser, None, me),
            Decision::Deny(DenyReason::InsufficientRole)
        );
        assert_eq!(
            evaluate(Some(Role::User), Action::DeleteUser, me, me),
            Decision::Deny(DenyReason::InsufficientRole)
        );
    }

    #[test]
    fn users_can_read_the_visit_log() {
        assert_eq!(
            evaluate(Some(Role::User), Action::ViewVisitLog, None, Some(Uuid::new_v4())),
            Decision::Allow
        );
    }
}
