//! The node-facing API layer: [`facade::NodeFacade`] and the Axum HTTP
//! surface built on top of it.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod facade;
pub mod http;

pub use facade::{NodeFacade, NodeFacadeImpl};
