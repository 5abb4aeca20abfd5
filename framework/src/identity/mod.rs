//! Identity subsystem wiring.
//!
//! This module does not implement credential storage; it defines the store
//! contracts ([`UserStore`], [`RoleStore`]) that the application backs with
//! its persistence context, plus password hashing and the default token
//! provider. [`Identity`] ties the three together and is what the
//! authentication middleware consumes.

mod token;

pub use token::{DefaultTokenProvider, TokenProvider};

use crate::error::FrameworkError;
use async_trait::async_trait;
use std::sync::Arc;

/// Authenticated caller attached to a request.
#[derive(Debug, Clone, PartialEq)]
pub struct Principal {
    pub id: i64,
    pub username: String,
    pub roles: Vec<String>,
}

/// A stored user record, as the identity subsystem sees it.
#[derive(Debug, Clone)]
pub struct IdentityUser {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// User storage contract, backed by the application's persistence context.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<IdentityUser>, FrameworkError>;
    async fn find_by_username(&self, username: &str)
        -> Result<Option<IdentityUser>, FrameworkError>;
}

/// Role storage contract, backed by the same persistence context.
#[async_trait]
pub trait RoleStore: Send + Sync {
    async fn roles_for(&self, user_id: i64) -> Result<Vec<String>, FrameworkError>;
}

/// Name of the authentication cookie. Value format: `<user id>:<token>`.
pub const AUTH_COOKIE: &str = ".blog.auth";

/// The wired identity subsystem: user store, role store, token provider.
pub struct Identity {
    users: Arc<dyn UserStore>,
    roles: Arc<dyn RoleStore>,
    tokens: Arc<dyn TokenProvider>,
}

impl Identity {
    pub fn new(
        users: Arc<dyn UserStore>,
        roles: Arc<dyn RoleStore>,
        tokens: Arc<dyn TokenProvider>,
    ) -> Self {
        Self {
            users,
            roles,
            tokens,
        }
    }

    /// Verify a username/password pair and produce the caller's principal.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<Principal>, FrameworkError> {
        let Some(user) = self.users.find_by_username(username).await? else {
            return Ok(None);
        };
        if !verify_password(password, &user.password_hash)? {
            return Ok(None);
        }
        let roles = self.roles.roles_for(user.id).await?;
        Ok(Some(Principal {
            id: user.id,
            username: user.username,
            roles,
        }))
    }

    /// Resolve an auth cookie value (`<user id>:<token>`) to a principal.
    /// Any malformed or stale cookie resolves to anonymous, not an error.
    pub async fn resolve_cookie(
        &self,
        cookie: &str,
    ) -> Result<Option<Principal>, FrameworkError> {
        let Some((id, token)) = cookie.split_once(':') else {
            return Ok(None);
        };
        let Ok(id) = id.parse::<i64>() else {
            return Ok(None);
        };
        let Some(user) = self.users.find_by_id(id).await? else {
            return Ok(None);
        };
        if !self.tokens.validate(&user, "authentication", token) {
            return Ok(None);
        }
        let roles = self.roles.roles_for(user.id).await?;
        Ok(Some(Principal {
            id: user.id,
            username: user.username,
            roles,
        }))
    }

    /// Issue a token for a user (authentication, email confirmation, ...).
    pub fn generate_token(&self, user: &IdentityUser, purpose: &str) -> String {
        self.tokens.generate(user, purpose)
    }
}

/// Hash a password for storage.
pub fn hash_password(password: &str) -> Result<String, FrameworkError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| FrameworkError::internal(format!("password hashing failed: {}", e)))
}

/// Verify a password against its stored hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, FrameworkError> {
    bcrypt::verify(password, hash)
        .map_err(|e| FrameworkError::internal(format!("password verification failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    struct FakeUsers {
        users: HashMap<i64, IdentityUser>,
    }

    #[async_trait]
    impl UserStore for FakeUsers {
        async fn find_by_id(&self, id: i64) -> Result<Option<IdentityUser>, FrameworkError> {
            Ok(self.users.get(&id).cloned())
        }

        async fn find_by_username(
            &self,
            username: &str,
        ) -> Result<Option<IdentityUser>, FrameworkError> {
            Ok(self
                .users
                .values()
                .find(|u| u.username == username)
                .cloned())
        }
    }

    struct FakeRoles;

    #[async_trait]
    impl RoleStore for FakeRoles {
        async fn roles_for(&self, _user_id: i64) -> Result<Vec<String>, FrameworkError> {
            Ok(vec!["author".to_string()])
        }
    }

    fn identity_with_user(password: &str) -> Identity {
        let mut users = HashMap::new();
        users.insert(
            7,
            IdentityUser {
                id: 7,
                username: "maria".to_string(),
                email: "maria@example.com".to_string(),
                password_hash: hash_password(password).unwrap(),
            },
        );
        Identity::new(
            Arc::new(FakeUsers { users }),
            Arc::new(FakeRoles),
            Arc::new(DefaultTokenProvider::new()),
        )
    }

    #[tokio::test]
    async fn authenticate_accepts_the_right_password() {
        let identity = identity_with_user("hunter2!");
        let principal = identity.authenticate("maria", "hunter2!").await.unwrap();
        let principal = principal.unwrap();
        assert_eq!(principal.username, "maria");
        assert_eq!(principal.roles, vec!["author".to_string()]);
    }

    #[tokio::test]
    async fn authenticate_rejects_the_wrong_password() {
        let identity = identity_with_user("hunter2!");
        assert!(identity
            .authenticate("maria", "wrong")
            .await
            .unwrap()
            .is_none());
        assert!(identity
            .authenticate("nobody", "hunter2!")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn malformed_cookies_resolve_to_anonymous() {
        let identity = identity_with_user("hunter2!");
        assert!(identity.resolve_cookie("garbage").await.unwrap().is_none());
        assert!(identity.resolve_cookie("notanid:tok").await.unwrap().is_none());
        assert!(identity.resolve_cookie("99:sometoken").await.unwrap().is_none());
    }
}
