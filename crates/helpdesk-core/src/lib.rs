pub mod article;
pub mod audit;
pub mod classifier;
pub mod decision;
pub mod drafter;
pub mod error;
pub mod io;
pub mod paths;
pub mod pipeline;
pub mod policy;
pub mod retriever;
pub mod store;
pub mod suggestion;
pub mod ticket;
pub mod types;
pub mod worker;

pub use error::{HelpdeskError, Result};
