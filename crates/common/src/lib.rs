//! Shared foundation for the curator crates.
//!
//! - [`Config`]: layered application settings
//! - [`AppError`] / [`AppResult`]: the unified error type every layer
//!   speaks
//! - [`IdGenerator`]: ULID entity ids and access tokens
//!
//! ```no_run
//! use curator_common::{AppResult, Config, IdGenerator};
//!
//! fn bootstrap() -> AppResult<String> {
//!     let _config = Config::load()?;
//!     Ok(IdGenerator::new().generate())
//! }
//! ```

pub mod config;
pub mod error;
pub mod id;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use id::IdGenerator;
