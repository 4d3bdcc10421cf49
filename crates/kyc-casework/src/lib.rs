//! Document checklist derivation and workflow stage mapping for KYC onboarding cases.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
