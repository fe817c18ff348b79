//! TableAccessor: generic per-table CRUD using the safe SQL builder.

mod accessor;
pub use accessor::TableAccessor;
