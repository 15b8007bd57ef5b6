//! `partquote-app`
//!
//! **Responsibility:** the application shell around the pricing core.
//!
//! This crate provides:
//! - Form validation for part registration and quote requests
//! - A session owning the part registry for its lifetime
//! - User-facing notifications for every submission
//! - Environment-based configuration and the JSON action script replayed by
//!   the `partquote` binary

pub mod config;
pub mod error;
pub mod forms;
pub mod notification;
pub mod script;
pub mod session;

pub use config::{AppConfig, ConfigError};
pub use error::AppError;
pub use forms::{FieldError, FormErrors, PartForm, QuoteForm, RangeForm, VariationForm};
pub use notification::{Notification, NotificationVariant};
pub use session::{PartListing, Session, Submission, VariationChoice};
