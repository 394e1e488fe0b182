use thiserror::Error;
use tokio::sync::{broadcast, mpsc, oneshot};

use crate::{
    contact::{Contact, ContactDraft},
    persist::RecordStore,
    service::{ContactService, ServiceError},
    types::ContactId,
};

use super::events::ContactEvent;

/// Failure of a call made through [`ContactBookHandle`].
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The service rejected the operation.
    #[error(transparent)]
    Service(#[from] ServiceError),
    /// The owner thread has stopped.
    #[error("contact book runtime is not running")]
    ChannelClosed,
}

/// Channel sizing for [`spawn_contact_book`].
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Commands that may wait for the owner thread.
    pub command_queue_bound: usize,
    /// Events buffered per subscriber before it lags.
    pub event_capacity: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            command_queue_bound: 256,
            event_capacity: 1024,
        }
    }
}

/// Cloneable async front end to a single owned [`ContactService`].
#[derive(Clone)]
pub struct ContactBookHandle {
    cmd_tx: mpsc::Sender<Command>,
    events_tx: broadcast::Sender<ContactEvent>,
}

enum Command {
    Create {
        draft: ContactDraft,
        resp: oneshot::Sender<Result<Contact, RuntimeError>>,
    },
    List {
        resp: oneshot::Sender<Vec<Contact>>,
    },
    Get {
        id: ContactId,
        resp: oneshot::Sender<Option<Contact>>,
    },
    Update {
        id: ContactId,
        draft: ContactDraft,
        resp: oneshot::Sender<Result<(), RuntimeError>>,
    },
    Delete {
        id: ContactId,
        resp: oneshot::Sender<Result<(), RuntimeError>>,
    },
    Shutdown {
        resp: oneshot::Sender<()>,
    },
}

/// Moves `service` onto a dedicated blocking thread and returns a handle
/// to it. Commands are applied one at a time in arrival order.
///
/// Must be called from within a tokio runtime.
pub fn spawn_contact_book<S>(service: ContactService<S>, config: RuntimeConfig) -> ContactBookHandle
where
    S: RecordStore + 'static,
{
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<Command>(config.command_queue_bound.max(1));
    let (events_tx, _) = broadcast::channel::<ContactEvent>(config.event_capacity.max(1));

    let events_tx_loop = events_tx.clone();

    tokio::task::spawn_blocking(move || {
        let mut service = service;
        while let Some(cmd) = cmd_rx.blocking_recv() {
            if handle_command(cmd, &mut service, &events_tx_loop) {
                break;
            }
        }
    });

    ContactBookHandle { cmd_tx, events_tx }
}

impl ContactBookHandle {
    /// Subscribes to change events emitted after successful mutations.
    pub fn subscribe(&self) -> broadcast::Receiver<ContactEvent> {
        self.events_tx.subscribe()
    }

    /// See [`ContactService::create`].
    pub async fn create(&self, draft: ContactDraft) -> Result<Contact, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Create { draft, resp: tx }).await?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    /// See [`ContactService::list`].
    pub async fn list(&self) -> Result<Vec<Contact>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::List { resp: tx }).await?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    /// See [`ContactService::get`].
    pub async fn get(&self, id: ContactId) -> Result<Option<Contact>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Get { id, resp: tx }).await?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    /// See [`ContactService::update`].
    pub async fn update(&self, id: ContactId, draft: ContactDraft) -> Result<(), RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Update { id, draft, resp: tx }).await?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    /// See [`ContactService::delete`].
    pub async fn delete(&self, id: ContactId) -> Result<(), RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Delete { id, resp: tx }).await?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    /// Stops the owner thread after commands already queued ahead of it.
    pub async fn shutdown(&self) -> Result<(), RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Shutdown { resp: tx }).await?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    async fn send(&self, cmd: Command) -> Result<(), RuntimeError> {
        self.cmd_tx
            .send(cmd)
            .await
            .map_err(|_| RuntimeError::ChannelClosed)
    }
}

fn handle_command<S: RecordStore>(
    cmd: Command,
    service: &mut ContactService<S>,
    events_tx: &broadcast::Sender<ContactEvent>,
) -> bool {
    match cmd {
        Command::Create { draft, resp } => {
            let res = service
                .create(draft.name, draft.phone, draft.email)
                .map_err(RuntimeError::from);
            if let Ok(contact) = &res {
                let _ = events_tx.send(ContactEvent::Created { id: contact.id });
            }
            let _ = resp.send(res);
        }
        Command::List { resp } => {
            let _ = resp.send(service.list());
        }
        Command::Get { id, resp } => {
            let _ = resp.send(service.get(id));
        }
        Command::Update { id, draft, resp } => {
            let res = service
                .update(id, draft.name, draft.phone, draft.email)
                .map_err(RuntimeError::from);
            if res.is_ok() {
                let _ = events_tx.send(ContactEvent::Updated { id });
            }
            let _ = resp.send(res);
        }
        Command::Delete { id, resp } => {
            let res = service.delete(id).map_err(RuntimeError::from);
            if res.is_ok() {
                let _ = events_tx.send(ContactEvent::Deleted { id });
            }
            let _ = resp.send(res);
        }
        Command::Shutdown { resp } => {
            let _ = resp.send(());
            return true;
        }
    }

    false
}
