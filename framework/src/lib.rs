pub mod config;
pub mod container;
pub mod database;
pub mod error;
pub mod http;
pub mod identity;
pub mod logging;
pub mod middleware;
pub mod routing;
pub mod server;

pub use config::{Configuration, ConfigurationBuilder, Environment};
pub use container::{Lifetime, Registry};
pub use error::{FrameworkError, StartupError};
pub use http::{HttpResponse, Redirect, Request, Response};
pub use middleware::{Middleware, Next, Pipeline};
pub use routing::{route, ActionRegistry, Dispatcher, RouteMatch, RouteTable};
pub use server::Server;
