pub mod config;
pub mod session;
pub mod splice;
pub mod text;
pub mod trigger;
pub mod window;

pub use config::{Config, ConfigLayer};
pub use session::SessionState;
pub use trigger::{Occurrence, TRIGGER_TOKEN, newly_complete, scan};
