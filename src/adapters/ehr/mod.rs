//! Identity gateway integration
//!
//! [`EhrClient`] wraps the vendor REST API; [`HttpStepInvoker`] adapts it to the
//! [`StepInvoker`] seam the flow engine is written against.

pub mod client;
pub mod invoker;

pub use client::EhrClient;
pub use invoker::{query_pairs, HttpMethod, HttpStepInvoker, StepInvoker};
