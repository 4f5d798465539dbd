pub mod capture;
pub mod connection;
pub mod host;

pub use capture::{CaptureBatch, CaptureReport};
pub use connection::ConnectionRecord;
pub use host::HostIdentity;
