mod render;
mod replies;
mod session_state;
mod sessions;

pub use render::*;
pub use replies::*;
pub use session_state::*;
pub use sessions::*;
