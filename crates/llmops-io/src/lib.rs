//! llmops-io: Collaborator Interfaces for the LLMOps Promotion Gate
//!
//! The gate's decision logic never talks to the network directly. Everything
//! it reads or triggers goes through the traits defined here, which are
//! injected into the handlers at construction time.
//!
//! ## Key Components
//!
//! - `BlobStore`: Reads prediction and reference corpora
//! - `EmailSender`: Delivers operator notifications
//! - `WorkflowStarter`: Launches training/evaluation workflow executions
//! - `fakes`: In-memory implementations with failure injection
//! - `FsBlobStore` and `http`: Filesystem and HTTP backends

pub mod collaborators;
mod error;
pub mod fakes;
mod fs;
pub mod http;

pub use collaborators::{
    BlobLocation, BlobStore, EmailMessage, EmailSender, ExecutionHandle, SendReceipt,
    StorageResult, WorkflowRequest, WorkflowStarter,
};
pub use error::{EmailError, StorageError, WorkflowError};
pub use fs::FsBlobStore;
pub use http::{HttpBlobStore, HttpEmailSender, HttpWorkflowStarter};
