//! docfetch Core Library
//!
//! Wire-level building blocks shared by the docfetch client and CLI:
//! - Authentication variants and the headers they resolve to
//! - Extended JSON codec
//! - Data API action names, per-call options and result shapes
//! - Request body composition
//! - Error taxonomy
//! - File and environment configuration

pub mod auth;
pub mod codec;
pub mod config;
pub mod error;
pub mod models;
pub mod options;
pub mod request;

// Re-export commonly used types
pub use auth::{Auth, AuthConfig};
pub use config::Config;
pub use error::{CodecError, ConfigError, DataApiError, OperationResult};
pub use models::*;
pub use options::{CallOptions, FindOneOptions, FindOptions, UpdateOptions};
pub use request::{Namespace, OperationRequest};

pub use bson;
pub use bson::{doc, Bson, Document};
