//! Request extractors that turn path segments and bodies into validated inputs.

mod id;
mod record;
pub use id::RowId;
pub use record::RecordBody;
