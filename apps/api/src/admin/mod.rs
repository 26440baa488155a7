// Admin surface: credential-gated access to stored résumés.

pub mod handlers;
pub mod session;
