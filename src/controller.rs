use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::action::Action;
use crate::catalog::Catalog;
use crate::projection::Projection;
use crate::types::{Page, Record};

/// Shown in place of any catalog failure; the raw error only goes to the log.
pub const LOAD_ERROR_MESSAGE: &str =
    "Failed to load heroes. Please check your internet connection.";

/// Where the list is in its fetch cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    /// Nothing requested yet
    Idle,
    /// A fetch is in flight. The error of a previous attempt stays visible
    /// until a fetch succeeds.
    Loading { stale_error: Option<String> },
    /// Last fetch succeeded; an empty page marks the catalog as exhausted
    Loaded { exhausted: bool },
    Errored { message: String },
}

impl Phase {
    pub fn is_loading(&self) -> bool {
        matches!(self, Phase::Loading { .. })
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Phase::Loading { stale_error } => stale_error.as_deref(),
            Phase::Errored { message } => Some(message),
            Phase::Idle | Phase::Loaded { .. } => None,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, Phase::Loaded { exhausted: true })
    }
}

#[derive(Debug)]
struct PaginationState {
    items: Vec<Record>,
    next_offset: u32,
    phase: Phase,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            next_offset: 0,
            phase: Phase::Idle,
        }
    }
}

/// Drives incremental loading of the catalog for one list session.
///
/// Fetches run on spawned tasks and report back through `action_tx`; the
/// owner feeds those actions into [`Controller::update`] from its loop.
pub struct Controller {
    state: PaginationState,
    page_size: u32,
    catalog: Arc<dyn Catalog>,
    action_tx: mpsc::UnboundedSender<Action>,
    projection_tx: watch::Sender<Projection>,
    load_id: u64,
    attached: bool,
    disposed: bool,
    cancel: CancellationToken,
}

impl Controller {
    pub fn new(
        catalog: Arc<dyn Catalog>,
        page_size: u32,
        action_tx: mpsc::UnboundedSender<Action>,
    ) -> Self {
        let (projection_tx, _) = watch::channel(Projection::default());
        Self {
            state: PaginationState::default(),
            page_size,
            catalog,
            action_tx,
            projection_tx,
            load_id: 0,
            attached: false,
            disposed: false,
            cancel: CancellationToken::new(),
        }
    }

    pub fn update(&mut self, action: Action) {
        match action {
            Action::Attach => self.attach(),
            Action::NearEnd(index) => self.near_end(index),
            Action::Dispose => self.dispose(),
            Action::PageLoaded(page, load_id) => self.apply_page(page, load_id),
            Action::PageFailed(error, load_id) => self.apply_failure(error, load_id),
        }
    }

    /// Initial load. Only the first call has any effect.
    pub fn attach(&mut self) {
        if self.attached {
            return;
        }
        self.attached = true;
        self.load_next();
    }

    /// Request the page after the last accumulated record. No-op while a
    /// fetch is in flight or after disposal.
    pub fn load_next(&mut self) {
        if self.disposed || self.state.phase.is_loading() {
            return;
        }

        let stale_error = self.state.phase.error().map(str::to_string);
        self.state.phase = Phase::Loading { stale_error };
        self.load_id += 1;
        self.publish();
        self.spawn_fetch(self.state.next_offset, self.load_id);
    }

    /// The presentation layer reports the last visible index. Loads more when
    /// that is the final accumulated record.
    pub fn near_end(&mut self, index: usize) {
        if self.state.items.len().checked_sub(1) != Some(index) {
            return;
        }
        self.load_next();
    }

    /// Tear down the session. The in-flight fetch is abandoned and nothing
    /// reaches the projection afterwards.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.cancel.cancel();
        debug!(records = self.state.items.len(), "controller disposed");
    }

    pub fn subscribe(&self) -> watch::Receiver<Projection> {
        self.projection_tx.subscribe()
    }

    pub fn projection(&self) -> Projection {
        Projection {
            records: self.state.items.clone(),
            loading: self.state.phase.is_loading(),
            error: self.state.phase.error().map(str::to_string),
        }
    }

    pub fn items(&self) -> &[Record] {
        &self.state.items
    }

    pub fn next_offset(&self) -> u32 {
        self.state.next_offset
    }

    pub fn phase(&self) -> &Phase {
        &self.state.phase
    }

    pub fn is_loading(&self) -> bool {
        self.state.phase.is_loading()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.state.phase.error()
    }

    /// Look up an accumulated record for the detail view.
    pub fn record(&self, id: u64) -> Option<&Record> {
        self.state.items.iter().find(|r| r.id == id)
    }

    fn accepts(&self, load_id: u64) -> bool {
        if self.disposed {
            debug!(load_id, "discarding result after dispose");
            return false;
        }
        if !self.state.phase.is_loading() || load_id != self.load_id {
            warn!(load_id, current = self.load_id, "discarding stale result");
            return false;
        }
        true
    }

    fn apply_page(&mut self, page: Page, load_id: u64) {
        if !self.accepts(load_id) {
            return;
        }

        let count = page.len();
        let exhausted = page.is_empty();
        self.state.items.extend(page.records);
        self.state.next_offset = self
            .state
            .next_offset
            .saturating_add(u32::try_from(count).unwrap_or(u32::MAX));
        self.state.phase = Phase::Loaded { exhausted };

        debug!(
            offset = page.offset,
            count,
            total = self.state.items.len(),
            "page applied"
        );
        self.publish();
    }

    fn apply_failure(&mut self, error: String, load_id: u64) {
        if !self.accepts(load_id) {
            return;
        }

        warn!(offset = self.state.next_offset, %error, "failed to load page");
        self.state.phase = Phase::Errored {
            message: LOAD_ERROR_MESSAGE.to_string(),
        };
        self.publish();
    }

    fn publish(&self) {
        if self.disposed {
            return;
        }
        self.projection_tx.send_replace(self.projection());
    }

    fn spawn_fetch(&self, offset: u32, load_id: u64) {
        let tx = self.action_tx.clone();
        let catalog = Arc::clone(&self.catalog);
        let limit = self.page_size;
        let cancel = self.cancel.clone();
        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!(load_id, "fetch abandoned");
                }
                result = catalog.fetch_page(offset, limit) => {
                    let action = match result {
                        Ok(page) => Action::PageLoaded(page, load_id),
                        Err(e) => Action::failed(e, load_id),
                    };
                    tx.send(action).ok();
                }
            }
        });
    }
}
