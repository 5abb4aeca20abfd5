//! Framework-wide error types.
//!
//! Two families: [`StartupError`] for failures that must abort the process
//! before the listener binds (bad configuration, invalid route table), and
//! [`FrameworkError`] for failures inside a request, which convert into HTTP
//! responses so handlers can propagate them with `?`.

use thiserror::Error;

/// Fatal errors raised while composing the application.
///
/// Anything that produces one of these means the process fails to start;
/// there is no recovery path.
#[derive(Debug, Error)]
pub enum StartupError {
    /// A configuration file exists but is not valid JSON.
    #[error("configuration file '{path}' is malformed: {source}")]
    MalformedConfig {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// A configuration file exists but could not be read.
    #[error("configuration file '{path}' could not be read: {source}")]
    ConfigIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A required configuration key is absent from every layer.
    #[error("missing required configuration key '{0}'")]
    MissingKey(String),

    /// A configuration section failed to bind onto its typed settings object.
    #[error("configuration section '{section}' failed to bind: {source}")]
    Bind {
        section: String,
        #[source]
        source: serde_json::Error,
    },

    /// A route template could not be parsed.
    #[error("invalid route template '{template}': {reason}")]
    Route { template: String, reason: String },

    /// Two routes were registered under the same name.
    #[error("duplicate route name '{0}'")]
    DuplicateRoute(String),

    /// The database connection could not be established.
    #[error("database startup failed: {0}")]
    Database(String),

    /// The listener failed to bind or accept.
    #[error("server failed to start: {0}")]
    Server(#[from] std::io::Error),
}

/// Request-time error type.
///
/// Implements `From<FrameworkError> for HttpResponse` (in `http::response`)
/// so controller handlers returning `Response` can use the `?` operator.
#[derive(Debug, Clone, Error)]
pub enum FrameworkError {
    /// A contract was resolved from the registry without a registration.
    /// Surfaces at first use, as a construction failure of the caller.
    #[error("service '{type_name}' not registered in the service registry")]
    ServiceNotFound { type_name: &'static str },

    /// A required route parameter was absent.
    #[error("missing required parameter '{param_name}'")]
    ParamError { param_name: String },

    /// A route parameter was present but could not be parsed.
    #[error("invalid parameter '{param}': expected {expected_type}")]
    ParamParse {
        param: String,
        expected_type: &'static str,
    },

    /// Database error.
    #[error("database error: {0}")]
    Database(String),

    /// Generic internal error.
    #[error("internal server error: {message}")]
    Internal { message: String },

    /// Domain error carrying its own HTTP status code.
    #[error("{message}")]
    Domain { message: String, status_code: u16 },
}

impl FrameworkError {
    pub fn service_not_found<T: ?Sized>() -> Self {
        Self::ServiceNotFound {
            type_name: std::any::type_name::<T>(),
        }
    }

    pub fn param(name: impl Into<String>) -> Self {
        Self::ParamError {
            param_name: name.into(),
        }
    }

    pub fn param_parse(param: impl Into<String>, expected_type: &'static str) -> Self {
        Self::ParamParse {
            param: param.into(),
            expected_type,
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn domain(message: impl Into<String>, status_code: u16) -> Self {
        Self::Domain {
            message: message.into(),
            status_code,
        }
    }

    /// Stable kind label, carried on failure responses so error-handling
    /// pipeline stages can tell failure families apart.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ServiceNotFound { .. } => "service-not-found",
            Self::ParamError { .. } | Self::ParamParse { .. } => "parameter",
            Self::Database(_) => "database",
            Self::Internal { .. } => "internal",
            Self::Domain { .. } => "domain",
        }
    }

    /// HTTP status code this error renders as.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::ServiceNotFound { .. } => 500,
            Self::ParamError { .. } => 400,
            Self::ParamParse { .. } => 400,
            Self::Database(_) => 500,
            Self::Internal { .. } => 500,
            Self::Domain { status_code, .. } => *status_code,
        }
    }
}

impl From<sea_orm::DbErr> for FrameworkError {
    fn from(e: sea_orm::DbErr) -> Self {
        Self::Database(e.to_string())
    }
}
