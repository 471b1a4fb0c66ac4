//! docfetch Client Library
//!
//! Document-database style client for HTTPS Data API endpoints. Each
//! operation is one stateless POST; no sockets, pools or cursors.
//!
//! ```rust,no_run
//! use docfetch::{doc, Auth, Client, ClientOptions};
//!
//! # async fn run() -> docfetch::Result<()> {
//! let client = Client::new(ClientOptions::new(
//!     "https://data.mongodb-api.com/app/data-abcde/endpoint/data/v1",
//!     "Cluster0",
//!     Auth::api_key("..."),
//! ))?;
//!
//! let orders = client.db("shop").collection("orders");
//! match orders.find_one(doc! { "status": "open" }, None).await? {
//!     Ok(Some(order)) => println!("{order}"),
//!     Ok(None) => println!("no open orders"),
//!     Err(error) => eprintln!("{} {}", error.code, error.message),
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod connection;
mod invoker;
mod scope;
pub mod transport;

pub use client::Client;
pub use connection::{ClientOptions, ConnectionContext};
pub use scope::{Collection, Database};
pub use transport::{HttpRequest, HttpResponse, Transport, TransportError};

pub use docfetch_core::{
    bson, codec, doc, Action, Auth, Bson, CallOptions, ConfigError, DataApiError, DeleteResult,
    Document, FindOneOptions, FindOptions, InsertManyResult, InsertOneResult, OperationResult,
    UpdateOptions, UpdateResult,
};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Transport failed: {0}")]
    Transport(#[source] TransportError),

    #[error("Codec error: {0}")]
    Codec(#[from] docfetch_core::CodecError),

    #[error("Empty {0} name")]
    EmptyIdentifier(&'static str),

    #[error("Invalid action name '{0}'")]
    InvalidAction(String),
}

pub type Result<T> = std::result::Result<T, ClientError>;
