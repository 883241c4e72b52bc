// Bid audit: request building, the response schema and the HTTP entry point.
// All generation goes through dispatch::Dispatcher — no direct Gemini calls here.

pub mod handlers;
pub mod prompts;
pub mod request;
pub mod schema;
