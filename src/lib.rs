//! # League Scorer
//!
//! Scoring and ranking engine for golf league rounds.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (rounds, points systems, awards)
//! - **calculate**: Event grouping, ranking, points, recomputation, awards
//! - **storage**: JSONL round and award store
//! - **config**: Configuration loading and validation

pub mod calculate;
pub mod config;
pub mod models;
pub mod storage;

pub use models::*;
