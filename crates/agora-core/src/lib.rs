//! Decision maker and configuration for the Agora agent framework.
//!
//! This crate owns the single-consumer drain loop that vets transaction
//! proposals against the agent's holdings and preferences, settles the
//! acceptable ones, and applies state updates.
//!
//! # Modules
//!
//! - [`config`] -- Configuration loading from `agora-config.yaml` into
//!   strongly-typed structs.
//! - [`decision_maker`] -- [`DecisionMaker`] and its producer-side
//!   [`DecisionMakerHandle`].
//! - [`readiness`] -- The one-way [`GoalPursuitReadiness`] flag.
//!
//! [`DecisionMaker`]: decision_maker::DecisionMaker
//! [`DecisionMakerHandle`]: decision_maker::DecisionMakerHandle
//! [`GoalPursuitReadiness`]: readiness::GoalPursuitReadiness

pub mod config;
pub mod decision_maker;
pub mod readiness;
