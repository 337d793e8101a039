pub mod model;
pub mod publisher;
pub mod server;

pub use publisher::HttpPublisher;
pub use server::TelemetryBridge;
