pub mod db;
pub mod mem;
pub mod models;
pub mod postgres;
pub mod schema;
pub mod store;

mod error;

pub use error::{Error, Result};
pub use store::{EndpointMatch, RecordPredicate, RecordStore, SortOrder};

use std::{future::Future, pin::Pin};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
