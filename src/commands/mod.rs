pub mod config;
pub mod export;
pub mod layout;
pub mod permissions;
pub mod session;
pub mod templates;

pub use config::*;
pub use export::*;
pub use layout::*;
pub use permissions::*;
pub use session::*;
pub use templates::*;
