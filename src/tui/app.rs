use std::sync::Arc;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::{Frame, Terminal};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info};

use crate::api::EquipmentApi;
use crate::model::FormState;
use crate::sync::{self, Completion, ListSynchronizer, SyncRequest};

use super::action::Action;
use super::error::AppError;
use super::screens::{EquipmentScreenState, draw_equipment};

/// What woke the event loop.
enum Wake {
    Terminal(Option<std::io::Result<Event>>),
    Completion(Completion),
}

/// Top-level application state.
///
/// Remote calls run as spawned tasks; their [`Completion`]s come back over
/// a channel and are applied on the UI loop in arrival order.
pub struct App<A: EquipmentApi> {
    screen: EquipmentScreenState,
    form: FormState,
    sync: ListSynchronizer<A>,
    in_flight: usize,
    completions_tx: UnboundedSender<Completion>,
    completions_rx: UnboundedReceiver<Completion>,
    should_quit: bool,
}

impl<A: EquipmentApi> App<A> {
    /// Creates an app with an empty form and an empty, not yet fetched list.
    pub fn new(api: Arc<A>) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Self {
            screen: EquipmentScreenState::new(),
            form: FormState::new(),
            sync: ListSynchronizer::new(api),
            in_flight: 0,
            completions_tx,
            completions_rx,
            should_quit: false,
        }
    }

    /// Main event loop: initial refresh, then draw → wait for a key or a
    /// completion → dispatch → check quit.
    #[cfg_attr(coverage_nightly, coverage(off))]
    #[mutants::skip]
    pub async fn run<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
        let mut events = EventStream::new();
        self.dispatch(SyncRequest::Refresh);

        while !self.should_quit {
            terminal.draw(|frame| self.draw(frame))?;

            let wake = tokio::select! {
                event = events.next() => Wake::Terminal(event),
                Some(done) = self.completions_rx.recv() => Wake::Completion(done),
            };

            match wake {
                Wake::Terminal(Some(Ok(Event::Key(key)))) => self.handle_key(key),
                Wake::Terminal(Some(Ok(_))) => {}
                Wake::Terminal(Some(Err(e))) => return Err(e.into()),
                Wake::Terminal(None) => break,
                Wake::Completion(done) => self.complete(done),
            }
        }

        info!(in_flight = self.in_flight, "shutting down");
        Ok(())
    }

    #[cfg_attr(coverage_nightly, coverage(off))]
    #[mutants::skip]
    fn draw(&self, frame: &mut Frame) {
        draw_equipment(
            &self.screen,
            &self.form,
            self.sync.records(),
            self.in_flight,
            frame,
            frame.area(),
        );
    }

    /// Handles a key event: global keys first, then screen-specific.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        let action = self
            .screen
            .handle_key(key, &mut self.form, self.sync.records().len());
        self.apply_action(action);
    }

    fn apply_action(&mut self, action: Action) {
        match action {
            Action::None => {}
            Action::Submit => self.dispatch(SyncRequest::submit(&self.form)),
            Action::ClearForm => self.form.clear(),
            Action::Edit(index) => {
                if let Some(record) = self.sync.records().get(index) {
                    debug!(id = %record.id, "editing");
                    self.form.load_for_edit(record);
                }
            }
            Action::Delete(index) => {
                if let Some(record) = self.sync.records().get(index) {
                    let id = record.id.clone();
                    self.dispatch(SyncRequest::Remove(id));
                }
            }
            Action::Refresh => self.dispatch(SyncRequest::Refresh),
            Action::Quit => self.should_quit = true,
        }
    }

    /// Runs `request` on a background task. No cancellation: the task
    /// reports back even if newer requests finish first.
    fn dispatch(&mut self, request: SyncRequest) {
        debug!(operation = %request.operation(), "dispatching");
        let api = self.sync.api();
        let tx = self.completions_tx.clone();
        self.in_flight += 1;
        tokio::spawn(async move {
            let done = sync::perform(api.as_ref(), request).await;
            let _ = tx.send(done);
        });
    }

    /// Applies a finished request. Failures were already logged by the
    /// synchronizer and are otherwise ignored.
    fn complete(&mut self, done: Completion) {
        self.in_flight = self.in_flight.saturating_sub(1);
        let _ = self.sync.apply(done, &mut self.form);
        self.screen.clamp_selection(self.sync.records().len());
    }

    /// Returns `true` if the app should quit.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn synchronizer(&self) -> &ListSynchronizer<A> {
        &self.sync
    }

    /// Requests dispatched but not yet applied.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Waits for and applies every outstanding completion.
    #[cfg(test)]
    async fn settle(&mut self) {
        while self.in_flight > 0 {
            let done = self
                .completions_rx
                .recv()
                .await
                .expect("sender is owned by the app");
            self.complete(done);
        }
    }
}
