//! Virtual-user iteration for load testing the node endpoint.
//!
//! The core is [`Iteration`]: one GET built from an immutable
//! [`RequestTemplate`], followed by a fixed pause. Any host runtime can drive
//! it through [`VirtualUserIteration`]; [`runner`] is a minimal one.

pub mod config;
pub mod error;
pub mod iteration;
pub mod login;
pub mod runner;
pub mod telemetry;
pub mod template;

pub use error::LoadError;
pub use iteration::{Iteration, VirtualUserIteration};
pub use template::RequestTemplate;
