//! Net settlement: classify net positions, match debtors to creditors and
//! compose the whole pipeline.

pub mod classifier;
pub mod config;
pub mod matcher;
pub mod plan;
pub mod simplifier;
pub mod summary;
