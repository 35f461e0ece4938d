//! Authorization core
//!
//! - [`RoleRegistry`]: the one table mapping each role to its permissions
//! - [`PolicyEvaluator`]: fail-closed decisions over that table
//! - [`Requirement`] / [`ProtectedResource`]: what a route or element demands
//!
//! The route guard and the view gate both hold the same evaluator instance.

mod evaluator;
mod registry;
mod resource;

pub use evaluator::{DefaultPolicyEvaluator, PolicyEvaluator};
pub use registry::{describe, RoleDescription, RoleRegistry};
pub use resource::{ProtectedResource, Requirement};
