use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;

use crate::errors::ServiceError;

use super::AuthUser;

/// The three back-office roles. Every operation names its allowed set
/// explicitly via [`require_role`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
pub enum Role {
    Admin,
    Sales,
    Warehouse,
}

/// Destructive operations are reserved for administrators.
pub const ADMIN_ONLY: &[Role] = &[Role::Admin];
/// Commercial paperwork: orders, invoices, payments, receipts.
pub const SALES_DESK: &[Role] = &[Role::Admin, Role::Sales];
/// Physical goods: stock mutations and delivery notes.
pub const WAREHOUSE_DESK: &[Role] = &[Role::Admin, Role::Warehouse];
/// Stock levels are visible to everyone.
pub const ALL_ROLES: &[Role] = &[Role::Admin, Role::Sales, Role::Warehouse];

/// Short-circuits with `Forbidden` when the caller's role is outside the
/// allowed set. Called before any other work in every gated handler.
pub fn require_role(user: &AuthUser, allowed: &[Role]) -> Result<(), ServiceError> {
    if allowed.contains(&user.role) {
        Ok(())
    } else {
        Err(ServiceError::Forbidden("Access denied".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn user_with(role: Role) -> AuthUser {
        AuthUser {
            user_id: Uuid::new_v4(),
            role,
            name: "Test".to_string(),
            email: "test@example.com".to_string(),
            token_id: "jti".to_string(),
        }
    }

    #[test]
    fn roles_parse_from_their_names() {
        assert_eq!("Admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("Sales".parse::<Role>().unwrap(), Role::Sales);
        assert_eq!("Warehouse".parse::<Role>().unwrap(), Role::Warehouse);
        assert!("Intern".parse::<Role>().is_err());
    }

    #[test]
    fn require_role_accepts_members_of_the_set() {
        assert!(require_role(&user_with(Role::Warehouse), WAREHOUSE_DESK).is_ok());
        assert!(require_role(&user_with(Role::Admin), ADMIN_ONLY).is_ok());
    }

    #[test]
    fn require_role_rejects_outsiders() {
        let err = require_role(&user_with(Role::Warehouse), SALES_DESK).unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));

        let err = require_role(&user_with(Role::Sales), ADMIN_ONLY).unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
    }
}
