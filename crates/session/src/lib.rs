pub mod messages;
pub mod runner;
pub mod state;
pub mod store;

pub use messages::{ClientMessage, ServerMessage};
pub use runner::{spawn_session, SessionChannels};
pub use state::{Session, WindowCache};
pub use store::SessionStore;
