//! Registration state machines
//!
//! One generic engine ([`RegistrationFlow`]) driven by a per-flow transition
//! table ([`abha_table`], [`hpr_table`]).

pub mod abha;
pub mod engine;
pub mod hpr;
pub mod table;

pub use abha::abha_table;
pub use engine::RegistrationFlow;
pub use hpr::hpr_table;
pub use table::{Condition, FlowTable, RequestContract, Route, StepSpec, Transition};
