//! External collaborators the storefront core calls out to.

pub mod order_submission;

pub use order_submission::{AcknowledgingSubmitter, OrderSubmissionService, SubmissionError};
