use super::page;
use crate::services::{ContactMessage, ContactService};
use plume::{Registry, Request, Response};
use std::sync::Arc;

/// GET /contact — the contact form.
pub async fn index(_req: Request, _services: Arc<Registry>) -> Response {
    Ok(page(
        "Contact",
        "<h1>Contact</h1>\n\
         <form method=\"post\" action=\"/contact/send\">\n\
         <p><label>Name <input name=\"name\" required></label></p>\n\
         <p><label>Email <input name=\"email\" type=\"email\" required></label></p>\n\
         <p><label>Message <textarea name=\"message\" required></textarea></label></p>\n\
         <p><button type=\"submit\">Send</button></p>\n\
         </form>",
    ))
}

/// POST /contact/send — validate and record the submission.
pub async fn send(req: Request, services: Arc<Registry>) -> Response {
    let contact = services.resolve::<dyn ContactService>()?;
    let message: ContactMessage = req.form().await?;
    contact.send(message).await?;
    Ok(page(
        "Thanks",
        "<h1>Thanks</h1><p>Your message has been sent.</p>",
    ))
}
