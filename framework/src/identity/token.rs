use super::IdentityUser;
use rand::distributions::Alphanumeric;
use rand::Rng;

const TOKEN_LEN: usize = 32;

/// Issues and checks credential tokens (authentication cookies, email
/// confirmation, password reset).
pub trait TokenProvider: Send + Sync {
    fn generate(&self, user: &IdentityUser, purpose: &str) -> String;

    fn validate(&self, user: &IdentityUser, purpose: &str, token: &str) -> bool;
}

/// Default provider: random alphanumeric tokens. Persisting an issued token
/// against the user record is the job of the identity storage, which lives
/// behind the store contracts.
pub struct DefaultTokenProvider;

impl DefaultTokenProvider {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DefaultTokenProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenProvider for DefaultTokenProvider {
    fn generate(&self, _user: &IdentityUser, _purpose: &str) -> String {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(TOKEN_LEN)
            .map(char::from)
            .collect()
    }

    fn validate(&self, _user: &IdentityUser, _purpose: &str, token: &str) -> bool {
        token.len() == TOKEN_LEN && token.chars().all(|c| c.is_ascii_alphanumeric())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn user() -> IdentityUser {
        IdentityUser {
            id: 1,
            username: "maria".to_string(),
            email: "maria@example.com".to_string(),
            password_hash: String::new(),
        }
    }

    #[test]
    fn generated_tokens_validate_and_differ() {
        let provider = DefaultTokenProvider::new();
        let a = provider.generate(&user(), "authentication");
        let b = provider.generate(&user(), "authentication");
        assert_eq!(a.len(), 32);
        assert_ne!(a, b);
        assert!(provider.validate(&user(), "authentication", &a));
    }

    #[test]
    fn malformed_tokens_are_rejected() {
        let provider = DefaultTokenProvider::new();
        assert!(!provider.validate(&user(), "authentication", "short"));
        assert!(!provider.validate(&user(), "authentication", &"!".repeat(32)));
    }
}
