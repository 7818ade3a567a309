pub mod columns;
pub mod derive;
pub mod error;
pub mod export;
pub mod model;
pub mod page;
pub mod params;
pub mod render;
pub mod source;
pub mod table;

pub use derive::{derive, Derivation, InvalidRecord};
pub use error::{Result, StatsError};
pub use model::*;
pub use page::{PageOptions, StatsPage, Status};
pub use params::{SortDirection, ViewParams};
pub use source::Source;
