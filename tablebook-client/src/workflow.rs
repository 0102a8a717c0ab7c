//! Reservation workflow
//!
//! One instance per restaurant detail view:
//!
//! ```text
//! Browsing ──select──▶ SlotSelected ──submit──▶ Submitting ──▶ Reserved
//!                        ▲      │                   │
//!                        └select┘                   └──────────▶ Failed ──select/submit──▶ ...
//! ```
//!
//! The move into `Submitting` is a check-and-set on the draft, so a second
//! `submit` while one is in flight is ignored instead of creating a second
//! reservation.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use shared::{CreateReservationRequest, Reservation, ReservationSlot, ReservationStatus, Restaurant};
use tokio::sync::watch;

use crate::catalog::CatalogCache;
use crate::error::{ClientError, ClientResult, WorkflowError};
use crate::http::ReservationApi;
use crate::session::{AuthSession, Session};

pub const RESERVE_FAILED: &str = "Failed to reserve";
pub const RESERVE_ERROR: &str = "Error occurred while making reservation.";
pub const LOAD_FAILED: &str = "Failed to load restaurant details.";
pub const AUTH_REQUIRED: &str = "Authentication required";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftStatus {
    Browsing,
    SlotSelected,
    Submitting,
    Reserved,
    Failed,
}

/// Ephemeral state of one reservation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationDraft {
    pub restaurant_id: String,
    pub selected_slot: Option<ReservationSlot>,
    pub status: DraftStatus,
    pub reservation_id: Option<String>,
    pub error_message: Option<String>,
}

impl ReservationDraft {
    fn browsing(restaurant_id: &str) -> Self {
        Self {
            restaurant_id: restaurant_id.to_string(),
            selected_slot: None,
            status: DraftStatus::Browsing,
            reservation_id: None,
            error_message: None,
        }
    }
}

/// Everything the payment step needs.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentHandoff {
    pub reservation_id: String,
    pub restaurant_id: String,
    pub slot: ReservationSlot,
    pub reservation: Reservation,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Reservation created, proceed to payment
    Reserved(PaymentHandoff),
    /// Draft is now `Failed` with this message
    Failed(String),
    /// Another submit was already in flight
    Ignored,
    /// The workflow was abandoned before the response arrived; the
    /// response was discarded.
    Abandoned,
}

enum Gate {
    Send(ReservationSlot, AuthSession),
    SignedOut,
    Ignore,
    Reject(WorkflowError),
}

pub struct ReservationWorkflow {
    api: Arc<dyn ReservationApi>,
    session: watch::Receiver<Session>,
    restaurant: Restaurant,
    draft: watch::Sender<ReservationDraft>,
    abandoned: AtomicBool,
}

impl ReservationWorkflow {
    pub fn new(
        api: Arc<dyn ReservationApi>,
        session: watch::Receiver<Session>,
        restaurant: Restaurant,
    ) -> Self {
        let (draft, _) = watch::channel(ReservationDraft::browsing(&restaurant.id));
        Self {
            api,
            session,
            restaurant,
            draft,
            abandoned: AtomicBool::new(false),
        }
    }

    /// Opens the detail view for `restaurant_id`, using the catalog entry
    /// when loaded and fetching it otherwise.
    ///
    /// Callers surface a failure with `LOAD_FAILED` as the fallback text.
    pub async fn open(
        api: Arc<dyn ReservationApi>,
        session: watch::Receiver<Session>,
        catalog: &CatalogCache,
        restaurant_id: &str,
    ) -> ClientResult<Self> {
        let restaurant = catalog.fetch_restaurant(restaurant_id).await?;
        tracing::debug!(restaurant_id = %restaurant.id, slots = restaurant.slots.len(), "Reservation workflow opened");
        Ok(Self::new(api, session, restaurant))
    }

    pub fn restaurant(&self) -> &Restaurant {
        &self.restaurant
    }

    pub fn draft(&self) -> ReservationDraft {
        self.draft.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ReservationDraft> {
        self.draft.subscribe()
    }

    /// Selects one of this restaurant's slots. Re-selecting replaces the
    /// previous choice. Capacity is not checked here, the service decides
    /// on submit.
    ///
    /// The slot must be exactly one this restaurant offers; a slot that only
    /// shares an id with one of them is rejected, never swapped for it.
    pub fn select_slot(&self, slot: &ReservationSlot) -> Result<(), WorkflowError> {
        let owned = self
            .restaurant
            .slot(&slot.id)
            .filter(|own| *own == slot)
            .cloned()
            .ok_or_else(|| WorkflowError::ForeignSlot {
                slot_id: slot.id.clone(),
                restaurant_id: self.restaurant.id.clone(),
            })?;

        let mut outcome = Ok(());
        self.draft.send_if_modified(|draft| {
            if self.abandoned.load(Ordering::SeqCst) {
                outcome = Err(WorkflowError::Abandoned);
                return false;
            }
            match draft.status {
                DraftStatus::Submitting => {
                    outcome = Err(WorkflowError::SubmissionInFlight);
                    false
                }
                DraftStatus::Reserved => {
                    outcome = Err(WorkflowError::Completed);
                    false
                }
                DraftStatus::Browsing | DraftStatus::SlotSelected | DraftStatus::Failed => {
                    draft.selected_slot = Some(owned.clone());
                    draft.status = DraftStatus::SlotSelected;
                    draft.error_message = None;
                    true
                }
            }
        });

        if outcome.is_ok() {
            tracing::debug!(slot_id = %owned.id, capacity = owned.capacity, "Slot selected");
        }
        outcome
    }

    /// Creates the reservation for the selected slot.
    ///
    /// Allowed from `SlotSelected`, or from `Failed` with the slot still
    /// selected. Dropping the returned future mid-flight leaves the draft
    /// `Submitting`; use [`abandon`](Self::abandon) to leave the view.
    pub async fn submit(&self) -> Result<SubmitOutcome, WorkflowError> {
        let (slot, auth) = match self.begin_submit() {
            Gate::Send(slot, auth) => (slot, auth),
            Gate::SignedOut => {
                tracing::warn!("Reservation submitted without a session");
                return Ok(SubmitOutcome::Failed(AUTH_REQUIRED.to_string()));
            }
            Gate::Ignore => {
                tracing::debug!("Reservation already submitting, ignoring");
                return Ok(SubmitOutcome::Ignored);
            }
            Gate::Reject(e) => return Err(e),
        };

        let request = CreateReservationRequest {
            user: auth.user.id.clone(),
            restaurant: self.restaurant.id.clone(),
            date: slot.date,
            status: ReservationStatus::Confirmed,
        };
        let result = self
            .api
            .create_reservation(&auth.token, &request)
            .await
            .and_then(|reservation| {
                if reservation.id.trim().is_empty() {
                    return Err(ClientError::InvalidResponse(
                        "Missing reservation id".into(),
                    ));
                }
                Ok(reservation)
            });

        if self.abandoned.load(Ordering::SeqCst) {
            tracing::debug!(restaurant_id = %self.restaurant.id, "Discarding reservation response for abandoned workflow");
            return Ok(SubmitOutcome::Abandoned);
        }

        match result {
            Ok(reservation) => {
                tracing::info!(
                    reservation_id = %reservation.id,
                    restaurant_id = %self.restaurant.id,
                    slot_id = %slot.id,
                    "Reservation created"
                );
                self.draft.send_modify(|draft| {
                    draft.status = DraftStatus::Reserved;
                    draft.reservation_id = Some(reservation.id.clone());
                    draft.error_message = None;
                });
                Ok(SubmitOutcome::Reserved(PaymentHandoff {
                    reservation_id: reservation.id.clone(),
                    restaurant_id: self.restaurant.id.clone(),
                    slot,
                    reservation,
                }))
            }
            Err(e) => {
                let message = e.user_message(RESERVE_FAILED, RESERVE_ERROR);
                tracing::warn!(error = %e, restaurant_id = %self.restaurant.id, "Reservation failed");
                self.fail(&message);
                Ok(SubmitOutcome::Failed(message))
            }
        }
    }

    /// Check-and-set into `Submitting` (or straight into `Failed` when
    /// signed out).
    fn begin_submit(&self) -> Gate {
        let auth = self.session.borrow().auth().cloned();
        let mut gate = Gate::Reject(WorkflowError::NoSlotSelected);

        self.draft.send_if_modified(|draft| {
            if self.abandoned.load(Ordering::SeqCst) {
                gate = Gate::Reject(WorkflowError::Abandoned);
                return false;
            }
            let slot = match draft.status {
                DraftStatus::Submitting => {
                    gate = Gate::Ignore;
                    return false;
                }
                DraftStatus::Reserved => {
                    gate = Gate::Reject(WorkflowError::Completed);
                    return false;
                }
                DraftStatus::Browsing => return false,
                DraftStatus::SlotSelected | DraftStatus::Failed => match &draft.selected_slot {
                    Some(slot) => slot.clone(),
                    None => return false,
                },
            };

            match &auth {
                Some(auth) => {
                    draft.status = DraftStatus::Submitting;
                    draft.error_message = None;
                    gate = Gate::Send(slot, auth.clone());
                }
                None => {
                    draft.status = DraftStatus::Failed;
                    draft.error_message = Some(AUTH_REQUIRED.to_string());
                    gate = Gate::SignedOut;
                }
            }
            true
        });
        gate
    }

    fn fail(&self, message: &str) {
        self.draft.send_modify(|draft| {
            draft.status = DraftStatus::Failed;
            draft.error_message = Some(message.to_string());
        });
    }

    /// Leaves the view. Later calls are rejected and an in-flight response
    /// is discarded without touching the draft.
    pub fn abandon(&self) {
        if !self.abandoned.swap(true, Ordering::SeqCst) {
            tracing::debug!(restaurant_id = %self.restaurant.id, "Reservation workflow abandoned");
        }
    }

    pub fn is_abandoned(&self) -> bool {
        self.abandoned.load(Ordering::SeqCst)
    }
}

impl std::fmt::Debug for ReservationWorkflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReservationWorkflow")
            .field("restaurant_id", &self.restaurant.id)
            .field("draft", &*self.draft.borrow())
            .field("abandoned", &self.is_abandoned())
            .finish()
    }
}
