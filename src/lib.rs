//! # ovenboard
//!
//! Client-side tracker for a bank of kitchen ovens cooking skewered
//! chicken in batches. Holds the per-oven state machine (Empty ->
//! Cooking -> Ready -> Empty), mirrors every transition to a remote
//! store over JSON/HTTP, and resynchronizes from it on a fixed interval,
//! last fetch wins.

pub mod board;
pub mod client;
pub mod config;
pub mod error;
pub mod event;
pub mod model;
pub mod sync;
pub mod view;
