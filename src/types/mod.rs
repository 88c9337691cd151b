//! Shared primitive types.
mod credential;
pub use credential::*;

mod key;
pub use key::*;

mod message;
pub use message::*;

mod module;
pub use module::*;

mod webauthn;
pub use webauthn::*;
