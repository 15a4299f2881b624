//! rpatch: apply context, unified, normal, and ed-style diff listings to the
//! files they describe, with fuzzy placement, reversed-patch detection,
//! `#ifdef` output synthesis, and reject files for hunks that do not fit.

pub mod apply;
pub mod cli;
pub mod ed;
pub mod engine;
pub mod error;
pub mod hunk;
pub mod locate;
pub mod names;
pub mod parser;
pub mod reject;
pub mod session;
pub mod store;
