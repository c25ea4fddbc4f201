//! # Narrative Core
//!
//! The storylet engine built on top of `story_state`. This crate decides which
//! narrative units are eligible for presentation by testing declarative
//! requirements against the live story variables, and ties store, history and
//! registry together into one reader session.
//!
//! ## Core Components
//!
//! - **content**: Named content units and the lookup the registry validates against
//! - **predicate**: The requirement evaluator contract and a built-in document matcher
//! - **storylets**: Registry of gated, prioritized content and availability ranking
//! - **session**: One reader's run: state, history and storylets in a single object
//! - **config**: Engine settings loaded from TOML
//!
//! ## Design Philosophy
//!
//! - **State-Driven**: Availability is a pure function of the current story variables
//! - **Explicit Ownership**: No globals; every session owns its own state and history
//! - **Pluggable Matching**: Any [`Predicate`] implementation can evaluate requirements

pub mod config;
pub mod content;
pub mod predicate;
pub mod session;
pub mod storylets;

pub use config::*;
pub use content::*;
pub use predicate::*;
pub use session::*;
pub use storylets::*;
