//! Preprint detection and reconciliation of publication identifiers

pub mod links;
pub mod reconcile;
pub mod resolver;

pub use links::{NoIdentifierError, PublicationLinkBuilder};
pub use reconcile::{
    apply_classification, merge_preprints, BatchReconciler, ProblemAgent, ProblemKind,
    ReconcileMode, Reconciliation,
};
pub use resolver::{Classification, ClassificationOutcome, PreprintResolver};
