//! Tour orchestrator.
//!
//! Owns the running walkthrough, decides what happens when a page's tour
//! ends, and drives the navigations that carry a full-sequence walkthrough
//! from page to page. `TourSession`, `Phase` and `Prompt` are the data model;
//! `Orchestrator` holds the transition functions.

pub mod machine;
pub mod session;

pub use machine::Orchestrator;
pub use session::{Phase, Prompt, TourSession};
