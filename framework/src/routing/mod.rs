//! Request routing.
//!
//! An ordered [`RouteTable`] of URL templates is consulted once per request;
//! the first rule that matches wins. Templates support literal segments,
//! required `{name}` parameters, optional `{name?}` parameters, and inline
//! defaults `{name=Value}`. The [`Dispatcher`] maps the resolved
//! (controller, action) pair onto an explicitly registered handler.

mod dispatch;
mod table;
mod template;

pub use dispatch::{ActionRegistry, BoxedHandler, Dispatcher};
pub use table::{route, RouteDef, RouteMatch, RouteTable};
pub use template::RouteTemplate;
