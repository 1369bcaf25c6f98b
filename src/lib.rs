//! Client for the DaData suggestion API.
//!
//! [`DaData`] sends address autocomplete and lookup-by-code queries, retrying
//! when the service answers with an error envelope or cannot be reached, and
//! maps each suggestion into a [`Record`] / [`AddressRecord`].

pub mod address;
pub mod config;
pub mod http;
pub mod record;
pub mod suggest;

pub use address::{AddressRecord, CapitalMarker};
pub use config::{ClientConfig, Credentials, ProviderErrorPolicy};
pub use record::Record;
pub use suggest::{DaData, Suggest, SuggestKind};
