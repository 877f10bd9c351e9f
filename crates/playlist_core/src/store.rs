use std::sync::{mpsc, Arc};

use chrono::{DateTime, Utc};
use engine_logging::{engine_debug, engine_error, engine_info, engine_warn};

use crate::storage::{KeyValueStore, CREDENTIAL_KEY, STATE_KEY};
use crate::{update, Action, AppState, Effect, Rejection};

pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

pub fn system_clock() -> Clock {
    Arc::new(Utc::now)
}

/// Owns the authoritative [`AppState`] and its durable backing store.
///
/// All mutation goes through [`Store::dispatch`], which runs the reducer,
/// writes the resulting snapshot through to storage and notifies
/// subscribers before returning.
pub struct Store<S: KeyValueStore> {
    state: Arc<AppState>,
    storage: S,
    clock: Clock,
    subscribers: Vec<mpsc::Sender<Arc<AppState>>>,
}

impl<S: KeyValueStore> Store<S> {
    /// Empty store; nothing is read from `storage`.
    pub fn new(storage: S, clock: Clock) -> Self {
        Self {
            state: Arc::new(AppState::new()),
            storage,
            clock,
            subscribers: Vec::new(),
        }
    }

    pub fn bootstrap(storage: S) -> Self {
        Self::bootstrap_with_clock(storage, system_clock())
    }

    /// Seeds the store from the last persisted snapshot, falling back to
    /// defaults when it is missing or unreadable.
    pub fn bootstrap_with_clock(storage: S, clock: Clock) -> Self {
        let mut store = Self::new(storage, clock);
        let snapshot = store.read_snapshot();
        // LoadState never rejects.
        let _ = store.dispatch(Action::LoadState(Box::new(snapshot)));
        engine_info!(
            "Store bootstrapped with {} playlists",
            store.state.playlists().len()
        );
        store
    }

    pub fn state(&self) -> Arc<AppState> {
        Arc::clone(&self.state)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Receives every snapshot published after this call.
    pub fn subscribe(&mut self) -> mpsc::Receiver<Arc<AppState>> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn dispatch(&mut self, action: Action) -> Result<(), Rejection> {
        let action = match action {
            Action::LoadState(snapshot) => Action::LoadState(self.reconcile_credential(snapshot)),
            other => other,
        };

        let now = (self.clock)();
        let (next, effects) = update(AppState::clone(&self.state), action, now);

        let mut outcome = Ok(());
        let mut changed = false;
        for effect in effects {
            match effect {
                Effect::Persist => changed = true,
                Effect::Rejected(rejection) => {
                    engine_warn!("Action rejected: {}", rejection);
                    outcome = Err(rejection);
                }
            }
        }

        if changed {
            self.state = Arc::new(next);
            self.persist();
            self.publish();
        }
        outcome
    }

    fn reconcile_credential(&self, mut snapshot: Box<AppState>) -> Box<AppState> {
        if snapshot.credential().is_some() {
            return snapshot;
        }
        match self.storage.get(CREDENTIAL_KEY) {
            Ok(Some(credential)) if !credential.trim().is_empty() => {
                engine_debug!("Credential restored from its own storage key");
                snapshot.set_credential(Some(credential));
            }
            Ok(_) => {}
            Err(err) => engine_warn!("Failed to read stored credential: {}", err),
        }
        snapshot
    }

    fn read_snapshot(&self) -> AppState {
        let text = match self.storage.get(STATE_KEY) {
            Ok(Some(text)) => text,
            Ok(None) => {
                engine_info!("No persisted state found; starting fresh");
                return AppState::new();
            }
            Err(err) => {
                engine_warn!("Failed to read persisted state: {}", err);
                return AppState::new();
            }
        };

        match AppState::from_json(&text) {
            Ok(state) => state,
            Err(err) => {
                engine_warn!("Failed to parse persisted state: {}", err);
                AppState::new()
            }
        }
    }

    fn persist(&mut self) {
        match self.state.to_json() {
            Ok(text) => {
                if let Err(err) = self.storage.set(STATE_KEY, &text) {
                    engine_error!("Failed to write persisted state: {}", err);
                }
            }
            Err(err) => engine_error!("Failed to serialize state: {}", err),
        }

        if let Some(credential) = self.state.credential() {
            if let Err(err) = self.storage.set(CREDENTIAL_KEY, credential) {
                engine_error!("Failed to write credential: {}", err);
            }
        }
    }

    fn publish(&mut self) {
        let snapshot = &self.state;
        self.subscribers
            .retain(|tx| tx.send(Arc::clone(snapshot)).is_ok());
    }
}
