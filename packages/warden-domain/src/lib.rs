pub mod endpoint;
pub mod merge;
pub mod projection;
pub mod record;

pub use endpoint::{BROADCAST_UID, Endpoint, ParseEndpointError, Role};
pub use record::{NewRecord, Payload, Record, Scope, UnknownScopeError};
