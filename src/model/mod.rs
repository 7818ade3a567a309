pub mod faction;
pub mod field;
pub mod record;
pub mod row;

pub use faction::FactionStyle;
pub use field::{FieldName, FieldSelection, MetricFields, IDENTITY_COLUMNS};
pub use record::{Dataset, RawRecord};
pub use row::DerivedRow;
