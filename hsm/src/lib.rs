//! A small, dependency-light hierarchical state machine engine implementing
//! Miro Samek's UML statechart semantics: entry/exit/init actions and
//! least-common-ancestor transitions, driven by signals dispatched against
//! a tree of state handlers.
pub mod delegate;
pub mod errors;
pub mod logger;
pub mod machine;
pub mod path;
pub mod signal;
pub mod state;
mod utils;

pub mod examples;
