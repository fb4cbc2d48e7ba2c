//! Domain models for the promotion gate.
//!
//! Canonical definitions for the transient entities of one invocation:
//! - `Corpus`: Aligned evaluation texts
//! - `ScoreTriple`: Precision/recall/F-measure of a corpus pair
//! - `PromotionOutcome`: Promote or reject decision
//! - `NotificationPayload`: Rendered operator email
//! - `RunIdentity`: Unique name for a launched workflow run

pub mod corpus;
pub mod error;
pub mod notification;
pub mod outcome;
pub mod run_identity;
pub mod score;

pub use corpus::Corpus;
pub use error::{CollaboratorError, ErrorKind, GateError, Result, ValidationError};
pub use notification::{NotificationKind, NotificationPayload};
pub use outcome::PromotionOutcome;
pub use run_identity::RunIdentity;
pub use score::ScoreTriple;
