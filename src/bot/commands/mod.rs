//! Discord command implementations organized by category.

/// General utility commands
pub mod general;

/// Price lookup command and its modal
pub mod price;

// Export commands
pub use general::*;
pub use price::*;
