pub mod handlers;
pub mod responder;
pub mod router;
