mod backend;
mod event;
mod message;
mod role;
mod session;
mod store;
mod transcript;
mod view;

pub use backend::*;
pub use event::*;
pub use message::*;
pub use role::*;
pub use session::*;
pub use store::*;
pub use transcript::*;
pub use view::*;
