//! Keeps track of a group's shared expenses and works out who should pay whom
//! so that everybody ends up having paid the same share.
//!
//! The interesting part lives in [`settlement`]; the other modules are the
//! plumbing around it: reading CSV files, storing records, printing results.

pub mod args;
pub mod config;
pub mod filter;
pub mod input;
pub mod output;
pub mod run;
pub mod settlement;
pub mod store;
