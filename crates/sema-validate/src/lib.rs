//! Semantic merge validation for Sema.
//!
//! Composes diffing, conflict detection, rule evaluation, and dependency
//! analysis into an automated merge decision with per-conflict resolutions,
//! impact analysis, and risk assessment.
//!
//! # Invariant
//!
//! `decision == AutoMerge` iff there are no conflicts, or there is no
//! `Critical` conflict and every conflict's resolution confidence meets the
//! configured threshold.
//!
//! # Modules
//!
//! - [`error`] — Fail-closed error type for validation
//! - [`rules`] — The [`MergeRule`] trait, registry, and built-in rules
//! - [`resolution`] — Pure severity/resolution/decision mapping tables
//! - [`service`] — The [`MergeValidationService`] orchestrator

pub mod error;
pub mod resolution;
pub mod rules;
pub mod service;

pub use error::{ValidateError, ValidateResult};
pub use resolution::{
    conflict_signature, data_integrity_risk, decide, estimated_resolution_time, performance_risk,
    recommend_strategy, resolution_for, ImpactAnalysis, Resolution, ResolutionAction,
    RiskAssessment, RiskLevel,
};
pub use rules::{
    DeletionRule, IdentifierChangeRule, MergeRule, RuleContext, RuleRegistry, TypeChangeRule,
};
pub use service::{MergeValidationResult, MergeValidationService};
