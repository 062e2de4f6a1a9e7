pub mod provider;
pub mod query;
pub mod result;

// Re-exports for convenience
pub use provider::*;
pub use query::*;
pub use result::*;
