//! Admin panel controller
//!
//! [`AdminController`] owns the view state and runs every store call on a
//! tokio task. The host thread only ever calls the synchronous methods and
//! reads [`AdminController::snapshot`]; it is told about changes through the
//! `watch` channel returned by [`AdminController::subscribe`].
//!
//! Fetches are numbered. A fetch commits its result only when no later fetch
//! was started and the resource it ran for is still selected, so the cache
//! always equals one complete result of the newest request.

use crate::config::AdminConfig;
use crate::error::ControllerError;
use crate::state::{AdminState, ReportedError};
use crate::tasks::{Operation, TaskHandle, TaskKey, TaskRegistry};
use crate::view::{validate_transition, ViewMode};
use chrono::Utc;
use gova_resource::{CreateForm, Label, Properties, Resource, ResourceRegistry};
use gova_store::GraphStore;
use parking_lot::RwLock;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

/// Result of a fetch task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Committed to the cache with this many records
    Loaded(usize),
    /// A newer fetch or another resource took over; nothing was committed
    Superseded,
}

/// Handle of a background fetch
pub type FetchHandle = TaskHandle<Result<FetchOutcome, ControllerError>>;

/// Handle of a background save
pub type SaveHandle = TaskHandle<Result<(), ControllerError>>;

/// Admin panel controller
///
/// Cheap to clone; clones share state and tasks.
#[derive(Clone)]
pub struct AdminController {
    shared: Arc<Shared>,
}

struct Shared {
    store: Arc<dyn GraphStore>,
    registry: Arc<ResourceRegistry>,
    fetch_limit: usize,
    state: RwLock<AdminState>,
    generation: AtomicU64,
    changes: watch::Sender<u64>,
    tasks: TaskRegistry,
}

impl fmt::Debug for AdminController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminController")
            .field("resources", &self.shared.registry.len())
            .field("fetch_limit", &self.shared.fetch_limit)
            .field("in_flight", &self.shared.tasks.in_flight())
            .finish_non_exhaustive()
    }
}

impl AdminController {
    /// Create a controller with the first registered resource selected
    ///
    /// Nothing is fetched until [`start`](Self::start) is called.
    ///
    /// # Errors
    /// [`ControllerError::EmptyRegistry`] if `registry` holds no resources,
    /// [`ControllerError::Config`] if `fetch_limit` is zero
    pub fn new(
        registry: ResourceRegistry,
        store: Arc<dyn GraphStore>,
        fetch_limit: usize,
    ) -> Result<Self, ControllerError> {
        if fetch_limit == 0 {
            return Err(ControllerError::Config("fetch limit must be at least 1".into()));
        }
        let first = registry
            .first()
            .map(|r| r.label().clone())
            .ok_or(ControllerError::EmptyRegistry)?;
        let (changes, _) = watch::channel(0);

        Ok(Self {
            shared: Arc::new(Shared {
                store,
                registry: Arc::new(registry),
                fetch_limit,
                state: RwLock::new(AdminState::new(first)),
                generation: AtomicU64::new(0),
                changes,
                tasks: TaskRegistry::new(),
            }),
        })
    }

    /// Create a controller from a loaded configuration
    ///
    /// # Errors
    /// [`ControllerError::Config`] if the configuration does not validate
    pub fn from_config(config: &AdminConfig, store: Arc<dyn GraphStore>) -> Result<Self, ControllerError> {
        config
            .validate()
            .map_err(|e| ControllerError::Config(e.to_string()))?;
        let registry = config
            .registry()
            .map_err(|e| ControllerError::Config(e.to_string()))?;
        Self::new(registry, store, config.fetch_limit)
    }

    /// Trigger the initial fetch of the selected resource
    ///
    /// Must be called within a tokio runtime.
    pub fn start(&self) -> FetchHandle {
        let label = self.shared.state.read().current.clone();
        tracing::info!(resource = %label, "starting admin controller");
        self.shared.spawn_fetch(label)
    }

    /// Select the resource named `label`
    ///
    /// Switches to the list view, discards any open form and fetches the
    /// resource in the background. Selecting another resource drops the
    /// cached records and cancels the previous resource's fetch.
    ///
    /// # Errors
    /// [`ControllerError::UnknownResource`] if `label` is not registered
    pub fn select_resource(&self, label: &str) -> Result<FetchHandle, ControllerError> {
        let resource = self
            .shared
            .registry
            .get(label)
            .ok_or_else(|| ControllerError::UnknownResource(label.to_string()))?;
        let next = resource.label().clone();

        let previous = {
            let mut state = self.shared.state.write();
            validate_transition(state.view, ViewMode::List)?;
            let previous = std::mem::replace(&mut state.current, next.clone());
            state.view = ViewMode::List;
            state.form = None;
            if previous != next {
                state.records = Arc::from(Vec::new());
                state.records_for = None;
                state.fetched_at = None;
                if state.last_error.as_ref().is_some_and(|e| e.resource != next) {
                    state.last_error = None;
                }
            }
            previous
        };

        if previous != next {
            self.shared.tasks.cancel(&TaskKey::fetch(previous));
        }
        tracing::info!(resource = %next, "selected resource");
        self.shared.notify();
        Ok(self.shared.spawn_fetch(next))
    }

    /// Open a blank create form for the selected resource
    ///
    /// # Errors
    /// [`ControllerError::InvalidTransition`] if a form is already open
    pub fn open_create_form(&self) -> Result<(), ControllerError> {
        {
            let mut state = self.shared.state.write();
            validate_transition(state.view, ViewMode::Create)?;
            let resource = self
                .shared
                .registry
                .get(state.current.as_str())
                .ok_or_else(|| ControllerError::UnknownResource(state.current.to_string()))?;
            state.form = Some(CreateForm::new(resource));
            state.form_session += 1;
            state.view = ViewMode::Create;
            tracing::debug!(resource = %state.current, "opened create form");
        }
        self.shared.notify();
        Ok(())
    }

    /// Set the text of the open form's field `attribute`
    ///
    /// # Errors
    /// [`ControllerError::NoOpenForm`] outside the create view,
    /// [`ControllerError::Resource`] if the resource has no such field
    pub fn set_field(&self, attribute: &str, text: impl Into<String>) -> Result<(), ControllerError> {
        {
            let mut state = self.shared.state.write();
            let form = state.form.as_mut().ok_or(ControllerError::NoOpenForm)?;
            form.set(attribute, text)?;
        }
        self.shared.notify();
        Ok(())
    }

    /// Discard the open form and return to the list
    ///
    /// # Errors
    /// [`ControllerError::NoOpenForm`] outside the create view
    pub fn cancel_create(&self) -> Result<(), ControllerError> {
        {
            let mut state = self.shared.state.write();
            if state.view != ViewMode::Create {
                return Err(ControllerError::NoOpenForm);
            }
            state.view = ViewMode::List;
            state.form = None;
        }
        self.shared.notify();
        Ok(())
    }

    /// Save the open form and wait for the store
    ///
    /// On success the view returns to the list and a fetch is triggered. On
    /// failure the error is recorded in the state, the form keeps its values
    /// and the view stays in create mode.
    ///
    /// # Errors
    /// Those of [`spawn_save`](Self::spawn_save), plus
    /// [`ControllerError::Store`] when the write fails
    pub async fn save(&self) -> Result<(), ControllerError> {
        self.spawn_save()?.wait().await?
    }

    /// Start saving the open form in the background
    ///
    /// # Errors
    /// [`ControllerError::NoOpenForm`] outside the create view,
    /// [`ControllerError::SaveInProgress`] while an earlier save is running
    pub fn spawn_save(&self) -> Result<SaveHandle, ControllerError> {
        let mut state = self.shared.state.write();
        let form = state.form.as_ref().ok_or(ControllerError::NoOpenForm)?;
        let label = form.resource_label().clone();
        if state.saving {
            return Err(ControllerError::SaveInProgress(label));
        }
        let properties = form.properties();
        let session = state.form_session;
        state.saving = true;

        let shared = Arc::clone(&self.shared);
        let handle = self.shared.tasks.spawn(TaskKey::save(label.clone()), async move {
            shared.save(label, properties, session).await
        });
        drop(state);

        self.shared.notify();
        Ok(handle)
    }

    /// Fetch the selected resource and wait for the result
    ///
    /// # Errors
    /// [`ControllerError::Store`] if the store fails, or
    /// [`ControllerError::Cancelled`] if a newer request aborted this one
    pub async fn refresh(&self) -> Result<FetchOutcome, ControllerError> {
        self.refresh_in_background().wait().await?
    }

    /// Fetch the selected resource in the background
    pub fn refresh_in_background(&self) -> FetchHandle {
        let label = self.shared.state.read().current.clone();
        self.shared.spawn_fetch(label)
    }

    /// Consistent copy of the state
    #[must_use]
    pub fn snapshot(&self) -> AdminState {
        self.shared.state.read().clone()
    }

    /// One display string per cached record of the selected resource
    #[must_use]
    pub fn rows(&self) -> Vec<String> {
        let state = self.shared.state.read();
        let Some(resource) = self.shared.registry.get(state.current.as_str()) else {
            return Vec::new();
        };
        state
            .current_records()
            .iter()
            .map(|record| record.summary(resource))
            .collect()
    }

    /// Selected resource
    #[must_use]
    pub fn current_resource(&self) -> Option<Resource> {
        let state = self.shared.state.read();
        self.shared.registry.get(state.current.as_str()).cloned()
    }

    /// Current view
    #[inline]
    #[must_use]
    pub fn view(&self) -> ViewMode {
        self.shared.state.read().view
    }

    /// Copy of the open form, if any
    #[must_use]
    pub fn form(&self) -> Option<CreateForm> {
        self.shared.state.read().form.clone()
    }

    /// Registered resources
    #[inline]
    #[must_use]
    pub fn registry(&self) -> &ResourceRegistry {
        &self.shared.registry
    }

    /// Configured fetch limit
    #[inline]
    #[must_use]
    pub fn fetch_limit(&self) -> usize {
        self.shared.fetch_limit
    }

    /// Receiver whose value changes on every state change
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.shared.changes.subscribe()
    }

    /// Number of background tasks still running
    #[inline]
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.shared.tasks.in_flight()
    }

    /// Abort every background task
    pub fn shutdown(&self) {
        self.shared.tasks.cancel_all();
        {
            let mut state = self.shared.state.write();
            state.loading = false;
            state.saving = false;
        }
        tracing::info!("admin controller shut down");
        self.shared.notify();
    }
}

impl Shared {
    fn notify(&self) {
        self.changes.send_modify(|revision| *revision = revision.wrapping_add(1));
    }

    fn spawn_fetch(self: &Arc<Self>, label: Label) -> FetchHandle {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut state = self.state.write();
            if state.current == label {
                state.loading = true;
            }
        }
        self.notify();

        let shared = Arc::clone(self);
        self.tasks.spawn(TaskKey::fetch(label.clone()), async move {
            shared.fetch(label, generation).await
        })
    }

    async fn fetch(&self, label: Label, generation: u64) -> Result<FetchOutcome, ControllerError> {
        let result = self.store.fetch_list(&label, self.fetch_limit).await;

        let outcome = {
            let mut state = self.state.write();
            if self.generation.load(Ordering::SeqCst) != generation || state.current != label {
                tracing::debug!(resource = %label, generation, "discarding superseded fetch");
                return Ok(FetchOutcome::Superseded);
            }
            state.loading = false;
            match result {
                Ok(records) => {
                    let count = records.len();
                    state.records = Arc::from(records);
                    state.records_for = Some(label.clone());
                    state.fetched_at = Some(Utc::now());
                    state.clear_error(Operation::Fetch);
                    tracing::debug!(resource = %label, count, "committed fetch");
                    Ok(FetchOutcome::Loaded(count))
                }
                Err(err) => {
                    tracing::warn!(resource = %label, error = %err, "fetch failed, keeping cached records");
                    state.last_error = Some(ReportedError::new(Operation::Fetch, label.clone(), err.clone()));
                    Err(ControllerError::Store(err))
                }
            }
        };
        self.notify();
        outcome
    }

    async fn save(
        self: Arc<Self>,
        label: Label,
        properties: Properties,
        session: u64,
    ) -> Result<(), ControllerError> {
        let result = self.store.create_record(&label, properties).await;

        let refetch = {
            let mut state = self.state.write();
            state.saving = false;
            match result {
                Ok(()) => {
                    state.clear_error(Operation::Save);
                    let selected = state.current == label;
                    // only the form that was saved is closed
                    if selected && state.view == ViewMode::Create && state.form_session == session {
                        state.view = ViewMode::List;
                        state.form = None;
                    }
                    tracing::info!(resource = %label, "record created");
                    selected
                }
                Err(err) => {
                    tracing::error!(resource = %label, error = %err, "save failed");
                    state.last_error = Some(ReportedError::new(Operation::Save, label, err.clone()));
                    drop(state);
                    self.notify();
                    return Err(ControllerError::Store(err));
                }
            }
        };

        self.notify();
        if refetch {
            self.spawn_fetch(label);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gova_store::{MemoryStore, MockGraphStore, StoreError};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::time::Duration;

    fn label(s: &str) -> Label {
        Label::new(s).unwrap()
    }

    fn two_resources() -> ResourceRegistry {
        let post = Resource::new(
            label("Post"),
            vec![gova_resource::FieldDef::text("Title", "title")],
        )
        .unwrap();
        ResourceRegistry::from_resources([Resource::user(), post]).unwrap()
    }

    fn controller(store: Arc<dyn GraphStore>) -> AdminController {
        AdminController::new(two_resources(), store, 25).unwrap()
    }

    fn named(name: &str) -> Properties {
        Properties::from([("name".to_string(), json!(name))])
    }

    #[test]
    fn new_selects_first_resource() {
        let ctl = controller(Arc::new(MemoryStore::new()));
        let state = ctl.snapshot();
        assert_eq!(state.current, label("User"));
        assert_eq!(state.view, ViewMode::List);
        assert!(state.records_for.is_none());
    }

    #[test]
    fn new_rejects_empty_registry_and_zero_limit() {
        let store: Arc<dyn GraphStore> = Arc::new(MemoryStore::new());
        assert_eq!(
            AdminController::new(ResourceRegistry::new(), Arc::clone(&store), 25).unwrap_err(),
            ControllerError::EmptyRegistry
        );
        assert!(matches!(
            AdminController::new(two_resources(), store, 0),
            Err(ControllerError::Config(_))
        ));
    }

    #[tokio::test]
    async fn start_loads_first_resource() {
        let store = Arc::new(MemoryStore::new());
        store.seed(&label("User"), [named("Ada")]).await;
        let ctl = controller(store);

        assert_eq!(ctl.start().wait().await.unwrap(), Ok(FetchOutcome::Loaded(1)));
        assert_eq!(ctl.rows(), vec!["Ada".to_string()]);
        let state = ctl.snapshot();
        assert!(!state.loading);
        assert!(state.fetched_at.is_some());
    }

    #[tokio::test]
    async fn select_unknown_resource_fails() {
        let ctl = controller(Arc::new(MemoryStore::new()));
        assert_eq!(
            ctl.select_resource("Ghost").unwrap_err(),
            ControllerError::UnknownResource("Ghost".into())
        );
        assert_eq!(ctl.snapshot().current, label("User"));
    }

    #[tokio::test]
    async fn select_discards_open_form() {
        let ctl = controller(Arc::new(MemoryStore::new()));
        ctl.open_create_form().unwrap();
        ctl.set_field("name", "Ada").unwrap();

        ctl.select_resource("Post").unwrap().wait().await.unwrap().unwrap();
        let state = ctl.snapshot();
        assert_eq!(state.view, ViewMode::List);
        assert!(state.form.is_none());
        assert_eq!(state.current, label("Post"));
        assert_eq!(state.records_for, Some(label("Post")));
    }

    #[tokio::test]
    async fn form_lifecycle() {
        let ctl = controller(Arc::new(MemoryStore::new()));
        assert_eq!(ctl.set_field("name", "Ada"), Err(ControllerError::NoOpenForm));
        assert_eq!(ctl.cancel_create(), Err(ControllerError::NoOpenForm));

        ctl.open_create_form().unwrap();
        assert_eq!(
            ctl.open_create_form(),
            Err(ControllerError::InvalidTransition {
                from: ViewMode::Create,
                to: ViewMode::Create,
            })
        );
        assert!(matches!(
            ctl.set_field("age", "3"),
            Err(ControllerError::Resource(_))
        ));

        ctl.set_field("name", "Ada").unwrap();
        assert_eq!(ctl.form().unwrap().field("name").unwrap().value(), "Ada");

        ctl.cancel_create().unwrap();
        assert_eq!(ctl.view(), ViewMode::List);
        assert!(ctl.form().is_none());
    }

    #[tokio::test]
    async fn save_without_form_fails() {
        let ctl = controller(Arc::new(MemoryStore::new()));
        assert_eq!(ctl.save().await, Err(ControllerError::NoOpenForm));
    }

    #[tokio::test]
    async fn save_sends_form_properties() {
        let mut store = MockGraphStore::new();
        store
            .expect_create_record()
            .withf(|l, props| {
                l.as_str() == "User"
                    && props.get("name") == Some(&json!("Ada"))
                    && props.get("email") == Some(&json!("a@x.com"))
            })
            .times(1)
            .returning(|_, _| Ok(()));
        store.expect_fetch_list().returning(|_, _| Ok(Vec::new()));
        let ctl = controller(Arc::new(store));

        ctl.open_create_form().unwrap();
        ctl.set_field("name", "Ada").unwrap();
        ctl.set_field("email", "a@x.com").unwrap();
        ctl.save().await.unwrap();

        assert_eq!(ctl.view(), ViewMode::List);
        assert!(ctl.form().is_none());
        assert!(!ctl.snapshot().saving);
    }

    #[tokio::test]
    async fn failed_save_keeps_form() {
        let store = Arc::new(MemoryStore::new());
        store.fail_with(StoreError::Connection("refused".into()));
        let ctl = controller(Arc::clone(&store) as Arc<dyn GraphStore>);

        ctl.open_create_form().unwrap();
        ctl.set_field("name", "Ada").unwrap();
        let err = ctl.save().await.unwrap_err();
        assert!(err.store_error().is_some_and(StoreError::is_connection));

        let state = ctl.snapshot();
        assert_eq!(state.view, ViewMode::Create);
        assert_eq!(state.form.as_ref().unwrap().field("name").unwrap().value(), "Ada");
        assert_eq!(state.error_for(Operation::Save).unwrap().resource, label("User"));

        store.clear_failure();
        ctl.save().await.unwrap();
        assert!(ctl.snapshot().last_error.is_none());
    }

    #[tokio::test]
    async fn late_save_keeps_reopened_form() {
        let mut store = MockGraphStore::new();
        store
            .expect_create_record()
            .withf(|_, props| props.get("name") == Some(&json!("Ada")))
            .times(1)
            .returning(|_, _| Ok(()));
        store.expect_fetch_list().returning(|_, _| Ok(Vec::new()));
        let ctl = controller(Arc::new(store));

        ctl.open_create_form().unwrap();
        ctl.set_field("name", "Ada").unwrap();
        let first = ctl.spawn_save().unwrap();

        ctl.cancel_create().unwrap();
        ctl.open_create_form().unwrap();
        ctl.set_field("name", "Grace").unwrap();
        first.wait().await.unwrap().unwrap();

        let state = ctl.snapshot();
        assert_eq!(state.view, ViewMode::Create);
        assert_eq!(state.form.as_ref().unwrap().field("name").unwrap().value(), "Grace");
        assert!(!state.saving);
    }

    #[tokio::test]
    async fn saved_form_closes_when_still_open() {
        let ctl = controller(Arc::new(MemoryStore::new()));
        ctl.open_create_form().unwrap();
        let session = ctl.snapshot().form_session;
        ctl.set_field("name", "Ada").unwrap();
        ctl.save().await.unwrap();

        let state = ctl.snapshot();
        assert_eq!(state.form_session, session);
        assert_eq!(state.view, ViewMode::List);
        assert!(state.form.is_none());
    }

    #[tokio::test]
    async fn second_save_while_running_is_rejected() {
        let (tx, rx) = std::sync::mpsc::channel::<()>();
        let rx = parking_lot::Mutex::new(rx);
        let mut store = MockGraphStore::new();
        store.expect_create_record().times(1).returning(move |_, _| {
            let _ = rx.lock().recv_timeout(Duration::from_secs(5));
            Ok(())
        });
        store.expect_fetch_list().returning(|_, _| Ok(Vec::new()));
        let ctl = controller(Arc::new(store));

        ctl.open_create_form().unwrap();
        let first = ctl.spawn_save().unwrap();
        assert_eq!(
            ctl.spawn_save().unwrap_err(),
            ControllerError::SaveInProgress(label("User"))
        );

        tx.send(()).unwrap();
        first.wait().await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn failed_fetch_keeps_cache() {
        let store = Arc::new(MemoryStore::new());
        store.seed(&label("User"), [named("Ada")]).await;
        let ctl = controller(Arc::clone(&store) as Arc<dyn GraphStore>);
        ctl.refresh().await.unwrap();

        store.fail_with(StoreError::Query("boom".into()));
        assert!(ctl.refresh().await.is_err());
        let state = ctl.snapshot();
        assert_eq!(state.current_records().len(), 1);
        assert!(state.error_for(Operation::Fetch).is_some());
        assert!(!state.loading);

        store.clear_failure();
        ctl.refresh().await.unwrap();
        assert!(ctl.snapshot().last_error.is_none());
    }

    #[tokio::test]
    async fn changes_are_broadcast() {
        let ctl = controller(Arc::new(MemoryStore::new()));
        let mut changes = ctl.subscribe();
        ctl.open_create_form().unwrap();
        assert!(changes.has_changed().unwrap());
        let _ = changes.borrow_and_update();
        ctl.cancel_create().unwrap();
        assert!(changes.has_changed().unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_aborts_in_flight_fetch() {
        let store = Arc::new(MemoryStore::new());
        store.set_fetch_delay(&label("User"), Duration::from_secs(30));
        let ctl = controller(store);

        let handle = ctl.start();
        assert!(ctl.snapshot().loading);
        ctl.shutdown();

        assert_eq!(handle.wait().await.unwrap_err(), ControllerError::Cancelled);
        assert_eq!(ctl.in_flight(), 0);
        assert!(!ctl.snapshot().loading);
    }
}
