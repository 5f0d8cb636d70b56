//! Core data models for the scoring engine.

mod award;
mod ids;
mod points_system;
mod policy;
mod round;

pub use award::*;
pub use ids::*;
pub use points_system::*;
pub use policy::*;
pub use round::*;
