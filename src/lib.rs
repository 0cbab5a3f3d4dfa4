//! Offer onboarding: candidate-side client for the onboarding portal.

pub mod cli;
pub mod config;
pub mod error;
pub mod onboarding;
