/// Runtime around the pure state machine.
///
/// A session holds the current snapshot, applies intents one at a time and
/// sends the resulting store commands without waiting for them. Failed
/// requests are logged; the snapshot is never rolled back.
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tokio::task::{JoinError, JoinSet};

use crate::order::audit::audit;
use crate::state::{board_view, reduce, BoardView, Intent, Snapshot};
use crate::storage::{execute, BoardStore, StoreError};
use crate::sync::StoreCommand;

pub struct BoardSession {
    store: Arc<dyn BoardStore>,
    /// Current snapshot; also the channel renderers subscribe to.
    updates: watch::Sender<Arc<Snapshot>>,
    in_flight: Mutex<JoinSet<()>>,
}

impl BoardSession {
    pub fn new(store: Arc<dyn BoardStore>) -> Self {
        let (updates, _) = watch::channel(Arc::new(Snapshot::new()));
        Self {
            store,
            updates,
            in_flight: Mutex::new(JoinSet::new()),
        }
    }

    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.updates.borrow().clone()
    }

    pub fn view(&self) -> BoardView {
        board_view(&self.snapshot())
    }

    /// Receiver that is notified whenever a dispatch changes the snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Snapshot>> {
        self.updates.subscribe()
    }

    /// Apply `intent` and fire its store commands. Returns the new snapshot.
    ///
    /// Must be called from within a tokio runtime.
    pub fn dispatch(&self, intent: Intent) -> Arc<Snapshot> {
        let name = intent.name();
        let mut commands = Vec::new();
        self.updates.send_if_modified(|current| {
            let transition = reduce(&**current, intent);
            commands = transition.commands;
            if transition.snapshot == **current {
                return false;
            }
            *current = Arc::new(transition.snapshot);
            true
        });
        log::debug!(
            "[kanban.session] {} applied, {} store command(s)",
            name,
            commands.len()
        );

        if !commands.is_empty() {
            let mut tasks = self.tasks();
            reap_finished(&mut tasks);
            for command in commands {
                tasks.spawn(send_command(self.store.clone(), command));
            }
        }
        self.snapshot()
    }

    /// Fetch columns, then cards and order concurrently, and feed them to the
    /// state machine. Issues found in the loaded order map are logged.
    pub async fn load(&self) -> Result<(), StoreError> {
        let columns = self.store.load_columns().await?;
        log::info!("[kanban.session] Loaded {} columns", columns.len());
        self.dispatch(Intent::ColumnsLoaded { columns });

        let (cards, order) = tokio::try_join!(self.store.load_cards(), self.store.load_order())?;
        log::info!(
            "[kanban.session] Loaded {} cards, {} order entries",
            cards.len(),
            order.len()
        );
        let snapshot = self.dispatch(Intent::CardsLoaded { cards, order });
        self.log_audit(&snapshot);
        Ok(())
    }

    /// Wait for every store request sent so far, including any sent while
    /// waiting.
    pub async fn flush(&self) {
        loop {
            let mut pending = std::mem::take(&mut *self.tasks());
            if pending.is_empty() {
                return;
            }
            while let Some(result) = pending.join_next().await {
                log_task_result(result);
            }
        }
    }

    fn log_audit(&self, snapshot: &Snapshot) {
        let columns = snapshot.columns.as_deref().unwrap_or_default();
        let Some(cards) = snapshot.cards_by_id.as_ref() else {
            return;
        };
        for issue in audit(
            &snapshot.order,
            columns.iter().map(|column| &column.id),
            cards.keys(),
        ) {
            log::warn!("[kanban.session] Order map issue: {}", issue);
        }
    }

    fn tasks(&self) -> MutexGuard<'_, JoinSet<()>> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Collect already finished store tasks without waiting. Returns how many of
/// them panicked or were cancelled.
fn reap_finished(tasks: &mut JoinSet<()>) -> usize {
    let mut failed = 0;
    while let Some(result) = tasks.try_join_next() {
        if !log_task_result(result) {
            failed += 1;
        }
    }
    failed
}

fn log_task_result(result: Result<(), JoinError>) -> bool {
    match result {
        Ok(()) => true,
        Err(e) => {
            log::error!("[kanban.session] Store request task failed: {}", e);
            false
        }
    }
}

async fn send_command(store: Arc<dyn BoardStore>, command: StoreCommand) {
    match execute(store.as_ref(), &command).await {
        Ok(()) => log::debug!("[kanban.store] {} done", command.name()),
        Err(e) if e.is_client_error() => {
            log::warn!("[kanban.store] {} rejected: {}", command.name(), e)
        }
        Err(e) => log::error!("[kanban.store] {} failed: {}", command.name(), e),
    }
}
