use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Global role carried in the bearer token. The storefront only knows two:
/// regular customers and back-office administrators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Customer,
    Admin,
}

impl Role {
    /// Admins are granted everything a customer is granted.
    pub fn grants(self, required: Role) -> bool {
        match self {
            Role::Admin => true,
            Role::Customer => required == Role::Customer,
        }
    }

    pub fn is_admin(self) -> bool {
        self == Role::Admin
    }
}

/// The authenticated identity every protected operation acts on behalf of.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub sub: String,
    pub role: Role,
}

/// Uniform authorization gate applied at the entry point of every protected
/// mutation: resolves the principal and checks the required role, returning
/// early with `UNAUTHORIZED`/`FORBIDDEN` otherwise.
#[macro_export]
macro_rules! ensure_role {
    ($user:expr, $role:expr) => {{
        let principal = $user.principal()?;
        if !principal.role.grants($role) {
            return Err($crate::error::ApiError::forbidden(
                "Insufficient permissions",
            ));
        }
        principal
    }};
}

#[cfg(test)]
mod tests {
    use super::Role;

    #[test]
    fn admin_grants_everything() {
        assert!(Role::Admin.grants(Role::Admin));
        assert!(Role::Admin.grants(Role::Customer));
    }

    #[test]
    fn customer_does_not_grant_admin() {
        assert!(Role::Customer.grants(Role::Customer));
        assert!(!Role::Customer.grants(Role::Admin));
    }

    #[test]
    fn roles_serialize_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        assert_eq!(
            serde_json::from_str::<Role>("\"customer\"").unwrap(),
            Role::Customer
        );
    }
}
