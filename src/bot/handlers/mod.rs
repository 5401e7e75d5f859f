//! Discord interaction handlers
//!
//! This module provides handlers for Discord interactions that arrive
//! outside the command flow, currently the refresh-price button.

/// Component handler for the refresh-price button
pub mod component;
