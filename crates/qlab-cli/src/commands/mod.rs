//! CLI command implementations.

pub mod arithmetic;
pub mod bell;
pub mod common;
pub mod dump;
pub mod grover;
pub mod teleport;
