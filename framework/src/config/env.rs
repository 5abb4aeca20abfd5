use std::path::Path;

/// Hosting environment, detected once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Staging,
    Production,
    Custom(String),
}

impl Environment {
    /// Detect the environment from `APP_ENVIRONMENT`, defaulting to Production.
    pub fn detect() -> Self {
        match std::env::var("APP_ENVIRONMENT").ok().as_deref() {
            Some(name) => Self::from_name(name),
            None => Self::Production,
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "development" => Self::Development,
            "staging" => Self::Staging,
            "production" | "" => Self::Production,
            _ => Self::Custom(name.to_string()),
        }
    }

    /// Name used in settings file names (`appsettings.<name>.json`).
    pub fn name(&self) -> &str {
        match self {
            Self::Development => "Development",
            Self::Staging => "Staging",
            Self::Production => "Production",
            Self::Custom(name) => name.as_str(),
        }
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Load `.env` files from the content root with environment precedence.
///
/// Precedence (later overrides earlier): `.env` → `.env.<environment>`.
/// Loaded in reverse order because dotenvy never overwrites variables that
/// are already set; real process environment variables always win.
pub fn load_dotenv(content_root: &Path, env: &Environment) {
    let suffix = env.name().to_ascii_lowercase();
    let _ = dotenvy::from_path(content_root.join(format!(".env.{}", suffix)));
    let _ = dotenvy::from_path(content_root.join(".env"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn from_name_is_case_insensitive() {
        assert_eq!(Environment::from_name("DEVELOPMENT"), Environment::Development);
        assert_eq!(Environment::from_name("staging"), Environment::Staging);
        assert_eq!(
            Environment::from_name("Sandbox"),
            Environment::Custom("Sandbox".to_string())
        );
    }

    #[test]
    fn settings_file_name_is_capitalized() {
        assert_eq!(Environment::Development.name(), "Development");
        assert_eq!(Environment::Production.to_string(), "Production");
    }
}
