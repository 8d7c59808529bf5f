//! Mate Trainer - checkmate puzzle sessions against an automated opponent.
//!
//! This module exposes the session core for testing and external use.

pub mod build_info;
pub mod cli;
pub mod config;
pub mod constants;
pub mod puzzle;
pub mod rules;
pub mod session;
pub mod stats;
