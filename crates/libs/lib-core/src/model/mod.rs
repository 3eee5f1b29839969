//! # Model Layer
//!
//! User records and the stores that own them.

pub mod store;
