// Stateless decision logic.
// Everything here is a pure function of its inputs; storage and delivery live
// in ccnotify-index and ccnotify-runtime.

pub mod duration;
pub mod policy;
pub mod validator;

pub use duration::{DurationError, elapsed, format_elapsed, parse_timestamp, try_elapsed};
pub use policy::{Category, PolicyDecision, classify, decide, stop_notification};
pub use validator::{ValidationError, required_fields, validate};
