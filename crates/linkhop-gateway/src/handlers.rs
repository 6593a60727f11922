mod health;
mod links;

pub use health::health_handler;
pub use links::{create_url_handler, get_url_handler, redirect_handler, submit_form_handler};
