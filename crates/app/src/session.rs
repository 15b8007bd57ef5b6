//! A quoting session.
//!
//! The session owns the part registry from start to end; nothing outlives it.
//! Each submission validates its form, calls into the registry or the quote
//! engine, and yields the outcome plus the notification to show the user.
//! Validation failures carry no notification: they are rendered inline.

use serde::Serialize;

use partquote_core::{Money, PartId, SessionId};
use partquote_parts::{PartRegistry, RegisteredPart};
use partquote_quoting::{Quote, compute_quote};

use crate::config::AppConfig;
use crate::error::AppError;
use crate::forms::{PartForm, QuoteForm};
use crate::notification::Notification;

/// Result of one submission.
#[derive(Debug)]
pub struct Submission<T> {
    pub outcome: Result<T, AppError>,
    pub notification: Option<Notification>,
}

impl<T> Submission<T> {
    fn succeeded(value: T, notification: Notification) -> Self {
        Self {
            outcome: Ok(value),
            notification: Some(notification),
        }
    }

    fn failed(error: AppError, notification: Option<Notification>) -> Self {
        Self {
            outcome: Err(error),
            notification,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// One row of the registered-parts table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartListing {
    pub part_id: PartId,
    pub part_type: String,
    /// `"<threshold> un: <amount>"` per range.
    pub ranges: Vec<String>,
    /// `"<name>: <amount>"` per variation.
    pub variations: Vec<String>,
}

/// A variation offered on the quote form for the selected part type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariationChoice {
    pub name: String,
    pub label: String,
}

#[derive(Debug)]
pub struct Session {
    id: SessionId,
    registry: PartRegistry,
    currency_symbol: String,
    last_quote: Option<Quote>,
}

impl Session {
    /// Start a session with an empty registry.
    pub fn new(config: &AppConfig) -> Self {
        let id = SessionId::new();
        tracing::info!(session_id = %id, "session started");
        Self {
            id,
            registry: PartRegistry::new(),
            currency_symbol: config.currency_symbol.clone(),
            last_quote: None,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn registry(&self) -> &PartRegistry {
        &self.registry
    }

    /// Most recent successful quote.
    pub fn last_quote(&self) -> Option<&Quote> {
        self.last_quote.as_ref()
    }

    /// Amount as displayed: currency symbol plus two decimals.
    pub fn format_amount(&self, amount: Money) -> String {
        format!("{} {}", self.currency_symbol, amount)
    }

    pub fn submit_registration(&mut self, form: &PartForm) -> Submission<PartId> {
        let definition = match form.validate() {
            Ok(definition) => definition,
            Err(errors) => {
                tracing::debug!(invalid_fields = errors.len(), "registration form rejected");
                return Submission::failed(errors.into(), None);
            }
        };

        if !definition.ranges_ascending() {
            tracing::warn!(
                part_type = definition.part_type(),
                "price ranges are not in ascending threshold order; tiers resolve in stored order"
            );
        }

        let description = format!("Type: {}", definition.part_type());
        let part_id = self.registry.register(definition);
        tracing::info!(
            session_id = %self.id,
            part_id = %part_id,
            registered = self.registry.len(),
            "part registered"
        );

        Submission::succeeded(
            part_id,
            Notification::success("Part registered successfully!", description),
        )
    }

    pub fn submit_quote(&mut self, form: &QuoteForm) -> Submission<Quote> {
        let request = match form.validate() {
            Ok(request) => request,
            Err(errors) => {
                tracing::debug!(invalid_fields = errors.len(), "quote form rejected");
                return Submission::failed(errors.into(), None);
            }
        };

        match compute_quote(&self.registry, &request) {
            Ok(quote) => {
                let total = quote.display_total();
                tracing::info!(
                    session_id = %self.id,
                    part_type = %quote.part_type,
                    quantity = quote.quantity,
                    total = %total,
                    "quote generated"
                );
                let notification = Notification::success(
                    "Quote generated",
                    format!("Total: {}", self.format_amount(total)),
                );
                self.last_quote = Some(quote.clone());
                Submission::succeeded(quote, notification)
            }
            Err(err) => {
                tracing::warn!(session_id = %self.id, error = %err, "quote failed");
                let notification = Notification::destructive("Error", err.to_string());
                Submission::failed(err.into(), Some(notification))
            }
        }
    }

    /// Replace a registered definition, keeping its id and position.
    pub fn update_part(&mut self, part_id: PartId, form: &PartForm) -> Submission<()> {
        let definition = match form.validate() {
            Ok(definition) => definition,
            Err(errors) => return Submission::failed(errors.into(), None),
        };

        let description = format!("Type: {}", definition.part_type());
        match self.registry.update(part_id, definition) {
            Ok(()) => {
                tracing::info!(session_id = %self.id, part_id = %part_id, "part updated");
                Submission::succeeded((), Notification::success("Part updated", description))
            }
            Err(err) => {
                let notification = Notification::destructive("Error", "part not found");
                Submission::failed(err.into(), Some(notification))
            }
        }
    }

    pub fn remove_part(&mut self, part_id: PartId) -> Submission<RegisteredPart> {
        match self.registry.remove(part_id) {
            Ok(removed) => {
                tracing::info!(session_id = %self.id, part_id = %part_id, "part removed");
                let description = format!("Type: {}", removed.part_type());
                Submission::succeeded(removed, Notification::success("Part removed", description))
            }
            Err(err) => {
                let notification = Notification::destructive("Error", "part not found");
                Submission::failed(err.into(), Some(notification))
            }
        }
    }

    /// Resolve a part reference: a part id, or else the first part of that type.
    pub fn resolve_part(&self, reference: &str) -> Option<PartId> {
        if let Ok(id) = reference.parse::<PartId>() {
            return self.registry.get(id).map(|p| p.id_typed());
        }
        self.registry.find_by_type(reference).map(|p| p.id_typed())
    }

    /// Part types offered by the quote form, in registration order.
    pub fn part_type_choices(&self) -> Vec<&str> {
        self.registry.part_types()
    }

    /// Variations offered for `part_type` (empty when it is not registered).
    pub fn variation_choices(&self, part_type: &str) -> Vec<VariationChoice> {
        self.registry
            .find_by_type(part_type)
            .map(|part| {
                part.definition()
                    .variations()
                    .iter()
                    .map(|v| VariationChoice {
                        name: v.name.clone(),
                        label: format!("{} ({})", v.name, self.format_amount(v.surcharge)),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Registered parts, in registration order.
    pub fn listing(&self) -> Vec<PartListing> {
        self.registry
            .iter()
            .map(|part| {
                let definition = part.definition();
                PartListing {
                    part_id: part.id_typed(),
                    part_type: definition.part_type().to_string(),
                    ranges: definition
                        .ranges()
                        .iter()
                        .map(|r| {
                            format!(
                                "{} un: {}",
                                r.quantity_threshold,
                                self.format_amount(r.unit_price)
                            )
                        })
                        .collect(),
                    variations: definition
                        .variations()
                        .iter()
                        .map(|v| format!("{}: {}", v.name, self.format_amount(v.surcharge)))
                        .collect(),
                }
            })
            .collect()
    }

    /// Plain-text table of [`Session::listing`].
    pub fn render_listing(&self) -> String {
        let mut out = String::from("Part type | Price ranges | Variations\n");
        for row in self.listing() {
            out.push_str(&format!(
                "{} | {} | {}\n",
                row.part_type,
                row.ranges.join(", "),
                row.variations.join(", ")
            ));
        }
        out
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        tracing::debug!(
            session_id = %self.id,
            discarded_parts = self.registry.len(),
            "session ended"
        );
    }
}
