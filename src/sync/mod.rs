//! Keeps the local equipment list consistent with the server.
//!
//! The local list is never edited in place. Every successful write is
//! followed by a full re-fetch, and only that listing replaces the list.
//! Writing and re-fetching happen in [`perform`], which touches no local
//! state; applying the result happens in [`ListSynchronizer::apply`]. The
//! split lets the TUI run requests as background tasks and fold results in
//! as they arrive.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::api::{ApiError, EquipmentApi};
use crate::model::{EquipmentId, EquipmentRecord, FormMode, FormState, Submission};

/// Which remote operation an outcome belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Refresh,
    Create,
    Update,
    Remove,
}

impl Operation {
    fn is_submit(self) -> bool {
        matches!(self, Self::Create | Self::Update)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Refresh => "refresh",
            Self::Create => "create",
            Self::Update => "update",
            Self::Remove => "remove",
        })
    }
}

/// A remote call failed. Local state was left as it was before the call.
#[derive(Debug, thiserror::Error)]
#[error("{operation} failed: {source}")]
pub struct SyncError {
    pub operation: Operation,
    pub source: ApiError,
}

/// Work to send to the server.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncRequest {
    Refresh,
    Submit { mode: FormMode, body: Submission },
    Remove(EquipmentId),
}

impl SyncRequest {
    /// Create or update request built from the form's current values and mode.
    pub fn submit(form: &FormState) -> Self {
        Self::Submit {
            mode: form.mode().clone(),
            body: form.to_submission(),
        }
    }

    pub fn operation(&self) -> Operation {
        match self {
            Self::Refresh => Operation::Refresh,
            Self::Submit {
                mode: FormMode::Create,
                ..
            } => Operation::Create,
            Self::Submit {
                mode: FormMode::Edit(_),
                ..
            } => Operation::Update,
            Self::Remove(_) => Operation::Remove,
        }
    }
}

/// Outcome of a [`SyncRequest`], ready to be applied.
#[derive(Debug)]
pub struct Completion {
    pub operation: Operation,
    /// Result of the write. Always `Ok` for a plain refresh.
    pub mutation: Result<(), ApiError>,
    /// The re-fetch issued after a successful write; `None` if the write failed.
    pub listing: Option<Result<Vec<EquipmentRecord>, ApiError>>,
}

/// Runs `request` against `api`: the write first, then a full listing once
/// the write has succeeded.
pub async fn perform<A: EquipmentApi + ?Sized>(api: &A, request: SyncRequest) -> Completion {
    let operation = request.operation();
    let mutation = match request {
        SyncRequest::Refresh => Ok(()),
        SyncRequest::Submit {
            mode: FormMode::Create,
            body,
        } => api.create(&body).await.map(|()| {
            debug!("equipment created");
        }),
        SyncRequest::Submit {
            mode: FormMode::Edit(id),
            body,
        } => api.update(&id, &body).await.map(|()| {
            debug!(%id, "equipment updated");
        }),
        SyncRequest::Remove(id) => api.delete(&id).await.map(|()| {
            debug!(%id, "equipment removed");
        }),
    };

    let listing = match mutation {
        Ok(()) => Some(api.list().await),
        Err(_) => None,
    };

    Completion {
        operation,
        mutation,
        listing,
    }
}

/// Owner of the local equipment list.
pub struct ListSynchronizer<A: ?Sized> {
    api: Arc<A>,
    records: Vec<EquipmentRecord>,
}

impl<A: EquipmentApi + ?Sized> ListSynchronizer<A> {
    /// Starts with an empty list; call [`refresh`](Self::refresh) to load it.
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            records: Vec::new(),
        }
    }

    /// The last successfully fetched listing.
    pub fn records(&self) -> &[EquipmentRecord] {
        &self.records
    }

    pub fn find(&self, id: &EquipmentId) -> Option<&EquipmentRecord> {
        self.records.iter().find(|r| &r.id == id)
    }

    /// A handle to the API for running [`perform`] elsewhere.
    pub fn api(&self) -> Arc<A> {
        Arc::clone(&self.api)
    }

    /// Re-fetches the whole collection. On failure the list is kept.
    pub async fn refresh(&mut self) -> Result<(), SyncError> {
        let completion = perform(self.api.as_ref(), SyncRequest::Refresh).await;
        self.settle(completion)
    }

    /// Creates or updates a record from the form, depending on its mode.
    ///
    /// On success the list is re-fetched and the form cleared. On failure
    /// the form keeps the user's input and the list is not refreshed.
    pub async fn submit(&mut self, form: &mut FormState) -> Result<(), SyncError> {
        let completion = perform(self.api.as_ref(), SyncRequest::submit(form)).await;
        self.apply(completion, form)
    }

    /// Deletes a record by id, then re-fetches. On failure the list is kept.
    pub async fn remove(&mut self, id: &EquipmentId) -> Result<(), SyncError> {
        let completion = perform(self.api.as_ref(), SyncRequest::Remove(id.clone())).await;
        self.settle(completion)
    }

    /// Folds a finished request into local state.
    ///
    /// A successful create or update clears `form` even if the following
    /// re-fetch fails. Failures are logged and returned; nothing local
    /// changes for them.
    pub fn apply(&mut self, completion: Completion, form: &mut FormState) -> Result<(), SyncError> {
        if completion.operation.is_submit() && completion.mutation.is_ok() {
            form.clear();
        }
        self.settle(completion)
    }

    fn settle(&mut self, completion: Completion) -> Result<(), SyncError> {
        let Completion {
            operation,
            mutation,
            listing,
        } = completion;

        if let Err(source) = mutation {
            return Err(report(operation, source));
        }

        match listing {
            Some(Ok(records)) => {
                debug!(count = records.len(), "equipment list replaced");
                self.records = records;
                Ok(())
            }
            Some(Err(source)) => Err(report(Operation::Refresh, source)),
            None => Ok(()),
        }
    }
}

fn report(operation: Operation, source: ApiError) -> SyncError {
    warn!(%operation, error = %source, "remote call failed");
    SyncError { operation, source }
}
