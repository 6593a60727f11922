//! HTTP surface of the linkhop URL shortener.
//!
//! The router only translates between HTTP and the shortener/redirector
//! services held in [`AppState`]; it owns no link logic itself.

pub mod app;
pub mod error;
pub mod handlers;
pub mod model;
pub mod state;

pub use app::App;
pub use state::AppState;
