pub mod body;
pub mod request;
pub mod response;

pub use request::Request;
pub use response::{HttpResponse, Redirect, Response};
