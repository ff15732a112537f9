use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::debug;

use crate::{
    core::{country::CountryStore, store::PersonStore},
    country::{CountryRecord, CountryRequest},
    error::DirectoryError,
    person::{PersonRequest, PersonResponse, PersonUpdateRequest},
    service::{person::PersonService, query},
    types::{CountryId, PersonId, SortOrder},
};

use super::events::DirectoryEvent;

/// Failure of a call made through a [`DirectoryHandle`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuntimeError {
    /// The operation itself failed.
    #[error(transparent)]
    Directory(#[from] DirectoryError),
    /// The runtime loop has stopped.
    #[error("directory runtime is not running")]
    ChannelClosed,
}

/// Channel sizing for [`spawn_directory`].
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Pending commands accepted before callers wait.
    pub command_queue_bound: usize,
    /// Events buffered per subscriber before the slowest one lags.
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

/// Cloneable async front for a [`PersonService`] owned by one task.
#[derive(Clone)]
pub struct DirectoryHandle {
    cmd_tx: mpsc::Sender<Command>,
    events_tx: broadcast::Sender<DirectoryEvent>,
}

type Reply<T> = oneshot::Sender<Result<T, DirectoryError>>;

enum Command {
    AddCountry {
        request: CountryRequest,
        resp: Reply<CountryRecord>,
    },
    GetCountry {
        id: CountryId,
        resp: Reply<CountryRecord>,
    },
    ListCountries {
        resp: oneshot::Sender<Vec<CountryRecord>>,
    },
    AddPerson {
        request: PersonRequest,
        resp: Reply<PersonResponse>,
    },
    GetPerson {
        id: PersonId,
        resp: Reply<PersonResponse>,
    },
    ListPersons {
        resp: Reply<Vec<PersonResponse>>,
    },
    Filtered {
        field: String,
        text: String,
        resp: Reply<Vec<PersonResponse>>,
    },
    UpdatePerson {
        request: PersonUpdateRequest,
        resp: Reply<PersonResponse>,
    },
    DeletePerson {
        id: PersonId,
        resp: Reply<bool>,
    },
    Shutdown {
        resp: oneshot::Sender<()>,
    },
}

/// Moves `service` into a new task and returns a handle to it.
///
/// Must be called from within a tokio runtime.
pub fn spawn_directory<S, C>(service: PersonService<S, C>, config: RuntimeConfig) -> DirectoryHandle
where
    S: PersonStore + Send + 'static,
    C: CountryStore + Send + 'static,
{
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<Command>(config.command_queue_bound);
    let (events_tx, _) = broadcast::channel::<DirectoryEvent>(config.event_capacity);

    let events_tx_loop = events_tx.clone();

    tokio::spawn(async move {
        let mut service = service;
        while let Some(cmd) = cmd_rx.recv().await {
            if handle_command(cmd, &mut service, &events_tx_loop) {
                break;
            }
        }
        debug!("directory runtime stopped");
    });

    DirectoryHandle { cmd_tx, events_tx }
}

impl DirectoryHandle {
    /// Subscribes to mutation events.
    pub fn subscribe(&self) -> broadcast::Receiver<DirectoryEvent> {
        self.events_tx.subscribe()
    }

    /// Adds a country.
    pub async fn add_country(&self, request: CountryRequest) -> Result<CountryRecord, RuntimeError> {
        Ok(self.call(|resp| Command::AddCountry { request, resp }).await??)
    }

    /// Fetches a country by id.
    pub async fn get_country(&self, id: CountryId) -> Result<CountryRecord, RuntimeError> {
        Ok(self.call(|resp| Command::GetCountry { id, resp }).await??)
    }

    /// Lists all countries.
    pub async fn list_countries(&self) -> Result<Vec<CountryRecord>, RuntimeError> {
        self.call(|resp| Command::ListCountries { resp }).await
    }

    /// Adds a person.
    pub async fn add_person(&self, request: PersonRequest) -> Result<PersonResponse, RuntimeError> {
        Ok(self.call(|resp| Command::AddPerson { request, resp }).await??)
    }

    /// Fetches a person by id.
    pub async fn get_person(&self, id: PersonId) -> Result<PersonResponse, RuntimeError> {
        Ok(self.call(|resp| Command::GetPerson { id, resp }).await??)
    }

    /// Lists all persons.
    pub async fn list_persons(&self) -> Result<Vec<PersonResponse>, RuntimeError> {
        Ok(self.call(|resp| Command::ListPersons { resp }).await??)
    }

    /// Filters persons by a named field.
    pub async fn filtered(
        &self,
        field: impl Into<String>,
        text: impl Into<String>,
    ) -> Result<Vec<PersonResponse>, RuntimeError> {
        let (field, text) = (field.into(), text.into());
        Ok(self
            .call(|resp| Command::Filtered { field, text, resp })
            .await??)
    }

    /// Sorts `list` by a named field. Runs on the caller's task.
    pub fn sorted(&self, list: Vec<PersonResponse>, field: &str, order: SortOrder) -> Vec<PersonResponse> {
        query::sort_named(list, field, order)
    }

    /// Updates a person.
    pub async fn update_person(&self, request: PersonUpdateRequest) -> Result<PersonResponse, RuntimeError> {
        Ok(self
            .call(|resp| Command::UpdatePerson { request, resp })
            .await??)
    }

    /// Deletes a person; `Ok(false)` when nothing matched.
    pub async fn delete_person(&self, id: PersonId) -> Result<bool, RuntimeError> {
        Ok(self.call(|resp| Command::DeletePerson { id, resp }).await??)
    }

    /// Stops the runtime loop. Later calls fail with [`RuntimeError::ChannelClosed`].
    pub async fn shutdown(&self) -> Result<(), RuntimeError> {
        self.call(|resp| Command::Shutdown { resp }).await
    }

    async fn call<T>(&self, make: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(make(tx))
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }
}

fn handle_command<S, C>(
    cmd: Command,
    service: &mut PersonService<S, C>,
    events_tx: &broadcast::Sender<DirectoryEvent>,
) -> bool
where
    S: PersonStore,
    C: CountryStore,
{
    match cmd {
        Command::AddCountry { request, resp } => {
            let res = service.countries_mut().add(request);
            if let Ok(rec) = &res {
                let _ = events_tx.send(DirectoryEvent::CountryAdded { id: rec.id });
            }
            let _ = resp.send(res);
        }
        Command::GetCountry { id, resp } => {
            let _ = resp.send(service.countries().get(id));
        }
        Command::ListCountries { resp } => {
            let _ = resp.send(service.countries().list());
        }
        Command::AddPerson { request, resp } => {
            let res = service.add(request);
            if let Ok(person) = &res {
                let _ = events_tx.send(DirectoryEvent::PersonAdded { id: person.id });
            }
            let _ = resp.send(res);
        }
        Command::GetPerson { id, resp } => {
            let _ = resp.send(service.get_by_id(id));
        }
        Command::ListPersons { resp } => {
            let _ = resp.send(service.list());
        }
        Command::Filtered { field, text, resp } => {
            let _ = resp.send(service.filtered(&field, &text));
        }
        Command::UpdatePerson { request, resp } => {
            let res = service.update(request);
            if let Ok(person) = &res {
                let _ = events_tx.send(DirectoryEvent::PersonUpdated { id: person.id });
            }
            let _ = resp.send(res);
        }
        Command::DeletePerson { id, resp } => {
            let res = service.delete(id);
            if let Ok(true) = res {
                let _ = events_tx.send(DirectoryEvent::PersonDeleted { id });
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
