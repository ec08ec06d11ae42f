pub mod column_family;
pub mod factory;
pub mod updater;
pub mod writer;

pub use column_family::ColumnFamilyTemplate;
pub use factory::{ColumnFactory, DefaultColumnFactory, FixedClockColumnFactory};
pub use updater::{ColumnFamilyUpdater, RowUpdater};
pub use writer::ColumnWriter;
