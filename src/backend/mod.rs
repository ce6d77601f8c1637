pub mod factory;
pub mod null;
pub mod ports;

pub use factory::{BackendError, BackendFactory, BackendRegistry, BackendType};
pub use null::NullBackendFactory;
