//! # Story State
//!
//! The single source of truth for mutable story state. This crate holds the
//! story variables, the reversible timeline of narrative transitions, and the
//! format that timeline is saved in. It knows nothing about storylets or
//! requirement matching.
//!
//! ## Core Components
//!
//! - **state_store**: Observable key/value store of story variables
//! - **history**: Snapshot log with a cursor for undo/redo and visit queries
//! - **persistence**: Storage adapter contract and the saved history format

pub mod history;
pub mod persistence;
pub mod state_store;

pub use history::*;
pub use persistence::*;
pub use state_store::*;
