pub mod error;
pub mod event;
pub mod notification;
pub mod record;
mod util;

pub use error::{Error, Result};
pub use event::*;
pub use notification::*;
pub use record::PromptRecord;
pub use util::*;
