//! MedBook client library
//!
//! Screens, services and the bridge between the REST gateway and the core
//! booking model. The `medbook` binary is a thin shell over [`commands::run`].

pub mod cli;
pub mod commands;
pub mod network;
pub mod state;
#[cfg(test)]
mod testing;
pub mod viewmodel;
