pub mod config;
pub mod error;
pub mod rbac;
pub mod types;

pub use config::Config;
pub use error::{FieldError, SightlineError};
pub use rbac::*;
pub use types::*;
