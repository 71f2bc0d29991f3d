pub mod errors;
pub mod models;
pub mod service;
pub mod store;

pub use errors::*;
pub use models::*;
pub use service::*;
pub use store::*;
