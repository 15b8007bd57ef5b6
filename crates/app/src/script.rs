//! JSON session scripts.
//!
//! A script is a JSON array of actions replayed, in order, through one
//! [`Session`]:
//!
//! ```json
//! [
//!   {"action": "register", "part_type": "Gear",
//!    "ranges": [{"quantity": 10, "price": "5.00"}, {"quantity": 50, "price": "4.00"}],
//!    "variations": [{"name": "Polished", "surcharge": "1.50"}]},
//!   {"action": "quote", "part_type": "Gear", "quantity": 5, "variations": ["Polished"]},
//!   {"action": "update", "part": "Gear",
//!    "form": {"part_type": "Gear", "ranges": [{"quantity": 10, "price": "6.00"}]}},
//!   {"action": "remove", "part": "Gear"},
//!   {"action": "list"}
//! ]
//! ```
//!
//! `part` references accept a part id or a part type (first registered wins).

use serde::{Deserialize, Serialize};

use partquote_quoting::Quote;

use crate::error::AppError;
use crate::forms::{FieldError, PartForm, QuoteForm};
use crate::notification::Notification;
use crate::session::{PartListing, Session};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    Register(PartForm),
    Quote(QuoteForm),
    Update { part: String, form: PartForm },
    Remove { part: String },
    List,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::Register(_) => "register",
            Action::Quote(_) => "quote",
            Action::Update { .. } => "update",
            Action::Remove { .. } => "remove",
            Action::List => "list",
        }
    }
}

/// Parse a script document.
pub fn parse(json: &str) -> Result<Vec<Action>, AppError> {
    Ok(serde_json::from_str(json)?)
}

/// What happened for one action.
#[derive(Debug, Clone, Serialize)]
pub struct ActionReport {
    pub index: usize,
    pub action: &'static str,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification: Option<Notification>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub field_errors: Vec<FieldError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote: Option<Quote>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listing: Option<Vec<PartListing>>,
}

impl ActionReport {
    fn new(index: usize, action: &'static str) -> Self {
        Self {
            index,
            action,
            ok: true,
            notification: None,
            error: None,
            field_errors: Vec::new(),
            quote: None,
            listing: None,
        }
    }

    fn record<T>(mut self, outcome: Result<T, AppError>) -> (Self, Option<T>) {
        match outcome {
            Ok(value) => (self, Some(value)),
            Err(err) => {
                self.ok = false;
                if let AppError::Form(errors) = &err {
                    self.field_errors = errors.iter().cloned().collect();
                }
                self.error = Some(err.to_string());
                (self, None)
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScriptReport {
    pub reports: Vec<ActionReport>,
    pub failures: usize,
    /// Set when `fail_fast` cut the run short.
    pub stopped_early: bool,
}

/// Replay `actions` through `session`.
///
/// With `fail_fast`, the run stops at the first failed action.
pub fn run(session: &mut Session, actions: &[Action], fail_fast: bool) -> ScriptReport {
    let mut reports = Vec::with_capacity(actions.len());
    let mut failures = 0;
    let mut stopped_early = false;

    for (index, action) in actions.iter().enumerate() {
        let report = apply(session, index, action);
        tracing::debug!(index, action = action.name(), ok = report.ok, "script action applied");

        let ok = report.ok;
        reports.push(report);
        if !ok {
            failures += 1;
            if fail_fast && index + 1 < actions.len() {
                stopped_early = true;
                break;
            }
        }
    }

    ScriptReport {
        reports,
        failures,
        stopped_early,
    }
}

fn apply(session: &mut Session, index: usize, action: &Action) -> ActionReport {
    let mut report = ActionReport::new(index, action.name());

    match action {
        Action::Register(form) => {
            let submission = session.submit_registration(form);
            report.notification = submission.notification;
            report.record(submission.outcome).0
        }
        Action::Quote(form) => {
            let submission = session.submit_quote(form);
            report.notification = submission.notification;
            let (mut report, quote) = report.record(submission.outcome);
            report.quote = quote;
            report
        }
        Action::Update { part, form } => match session.resolve_part(part) {
            Some(part_id) => {
                let submission = session.update_part(part_id, form);
                report.notification = submission.notification;
                report.record(submission.outcome).0
            }
            None => report.record::<()>(Err(AppError::UnknownPart(part.clone()))).0,
        },
        Action::Remove { part } => match session.resolve_part(part) {
            Some(part_id) => {
                let submission = session.remove_part(part_id);
                report.notification = submission.notification;
                report.record(submission.outcome).0
            }
            None => report.record::<()>(Err(AppError::UnknownPart(part.clone()))).0,
        },
        Action::List => {
            report.listing = Some(session.listing());
            report
        }
    }
}
