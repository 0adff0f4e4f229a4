//! Read-only travel video catalog: records, JSON loading, lookups and
//! display formatting.

pub mod catalog;
pub mod error;
pub mod format;
pub mod model;

pub use catalog::Catalog;
pub use error::{CatalogError, Result};
pub use format::{format_duration, format_number, format_time_ago};
pub use model::{
    Author, Budget, Category, Comment, Location, TravelInfo, VideoEntity, VideoId,
};
