//! Safe SQL builder: identifiers quoted, values as positional parameters.

mod builder;
pub mod params;
pub mod schema;
pub use builder::*;
pub use params::*;
pub use schema::*;
