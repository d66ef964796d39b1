//! In-memory [`EquipmentApi`] that records every call.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{ApiError, EquipmentApi};
use crate::model::{EquipmentId, EquipmentRecord, Submission};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum CallKind {
    List,
    Create,
    Update,
    Delete,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    List,
    Create(Submission),
    Update(EquipmentId, Submission),
    Delete(EquipmentId),
}

impl Call {
    fn kind(&self) -> CallKind {
        match self {
            Self::List => CallKind::List,
            Self::Create(_) => CallKind::Create,
            Self::Update(..) => CallKind::Update,
            Self::Delete(_) => CallKind::Delete,
        }
    }
}

#[derive(Debug, Default)]
struct FakeState {
    records: Vec<EquipmentRecord>,
    next_id: u64,
    calls: Vec<Call>,
    failures: HashMap<CallKind, u16>,
}

#[derive(Debug, Default)]
pub(crate) struct FakeApi {
    state: Mutex<FakeState>,
}

impl FakeApi {
    pub(crate) fn new() -> Self {
        Self::with_records(Vec::new())
    }

    /// Seeds the server; new ids continue after the largest numeric id.
    pub(crate) fn with_records(records: Vec<EquipmentRecord>) -> Self {
        let next_id = records
            .iter()
            .filter_map(|r| r.id.as_str().parse::<u64>().ok())
            .max()
            .unwrap_or(0)
            + 1;
        Self {
            state: Mutex::new(FakeState {
                records,
                next_id,
                ..FakeState::default()
            }),
        }
    }

    /// Makes every call of `kind` fail with `status` until [`recover`](Self::recover).
    pub(crate) fn fail(&self, kind: CallKind, status: u16) {
        self.state.lock().unwrap().failures.insert(kind, status);
    }

    pub(crate) fn recover(&self, kind: CallKind) {
        self.state.lock().unwrap().failures.remove(&kind);
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub(crate) fn count(&self, kind: CallKind) -> usize {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|c| c.kind() == kind)
            .count()
    }

    pub(crate) fn records(&self) -> Vec<EquipmentRecord> {
        self.state.lock().unwrap().records.clone()
    }

    fn begin(&self, call: Call) -> Result<std::sync::MutexGuard<'_, FakeState>, ApiError> {
        let mut state = self.state.lock().unwrap();
        let kind = call.kind();
        state.calls.push(call);
        match state.failures.get(&kind).copied() {
            Some(status) => Err(ApiError::Server {
                status,
                message: "injected failure".into(),
            }),
            None => Ok(state),
        }
    }
}

fn not_found(id: &EquipmentId) -> ApiError {
    ApiError::Server {
        status: 404,
        message: format!("no equipment {id}"),
    }
}

fn stored(id: EquipmentId, body: &Submission) -> EquipmentRecord {
    EquipmentRecord {
        id,
        name: body.name.clone(),
        part_code: body.part_code.clone(),
        price: (!body.price.is_nan()).then_some(body.price),
        in_stock: body.in_stock,
        last_serviced: Some(body.last_serviced.clone()),
    }
}

#[async_trait]
impl EquipmentApi for FakeApi {
    async fn list(&self) -> Result<Vec<EquipmentRecord>, ApiError> {
        let state = self.begin(Call::List)?;
        Ok(state.records.clone())
    }

    async fn create(&self, body: &Submission) -> Result<(), ApiError> {
        let mut state = self.begin(Call::Create(body.clone()))?;
        let id = EquipmentId::from(state.next_id);
        state.next_id += 1;
        state.records.push(stored(id, body));
        Ok(())
    }

    async fn update(&self, id: &EquipmentId, body: &Submission) -> Result<(), ApiError> {
        let mut state = self.begin(Call::Update(id.clone(), body.clone()))?;
        let slot = state
            .records
            .iter_mut()
            .find(|r| &r.id == id)
            .ok_or_else(|| not_found(id))?;
        *slot = stored(id.clone(), body);
        Ok(())
    }

    async fn delete(&self, id: &EquipmentId) -> Result<(), ApiError> {
        let mut state = self.begin(Call::Delete(id.clone()))?;
        let before = state.records.len();
        state.records.retain(|r| &r.id != id);
        if state.records.len() == before {
            return Err(not_found(id));
        }
        Ok(())
    }
}
