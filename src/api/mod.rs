//! Remote equipment API: the trait the synchronizer talks to, and its HTTP
//! implementation.
//!
//! The server exposes a plain REST collection at `/equipment`:
//! `GET` lists, `POST` creates, `PUT /equipment/:id` updates and
//! `DELETE /equipment/:id` removes.

mod error;
#[cfg(test)]
pub(crate) mod fake;
mod http;

use async_trait::async_trait;

use crate::model::{EquipmentId, EquipmentRecord, Submission};

pub use error::ApiError;
pub use http::HttpEquipmentApi;

/// CRUD operations on the remote equipment collection.
///
/// Every call may fail; implementations never retry.
#[async_trait]
pub trait EquipmentApi: Send + Sync + 'static {
    /// Fetches the full collection.
    async fn list(&self) -> Result<Vec<EquipmentRecord>, ApiError>;

    /// Creates a record; the server assigns its id. Any response body is
    /// ignored, the next [`list`](Self::list) is authoritative.
    async fn create(&self, body: &Submission) -> Result<(), ApiError>;

    /// Replaces the fields of the record with the given id.
    async fn update(&self, id: &EquipmentId, body: &Submission) -> Result<(), ApiError>;

    /// Deletes the record with the given id.
    async fn delete(&self, id: &EquipmentId) -> Result<(), ApiError>;
}
