mod ber;
mod message;
mod oid;
mod session;
mod value;

pub use message::*;
pub use oid::*;
pub use session::*;
pub use value::*;
