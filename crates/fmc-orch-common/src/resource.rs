//! Base Resource trait and observed-state sink.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::diag::Diagnostics;

/// Opaque session context handed to every remote call.
///
/// The resource never interprets it beyond logging; the remote client owns
/// authentication, cancellation and timeouts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    /// Label identifying the host session (for logging and debugging).
    pub session_id: String,
    /// Per-call timeout the client should enforce, if any.
    pub timeout: Option<Duration>,
}

impl SessionContext {
    /// Creates a context with the given session label and no timeout.
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            timeout: None,
        }
    }

    /// Sets the per-call timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Lifecycle state of a single record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    /// No remote object exists for the record.
    Unmanaged,
    /// The record is bound to a remote object by identifier.
    Managed,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unmanaged => write!(f, "unmanaged"),
            Self::Managed => write!(f, "managed"),
        }
    }
}

/// Mutable observed-state sink for one record.
///
/// Holds the remote identifier (the sole persistent key) and the record's
/// fields. The identifier is written by a successful create and cleared by a
/// successful delete; nothing else should touch it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceData<R> {
    id: Option<String>,
    /// Declared fields on input, observed fields after create/read.
    pub record: R,
}

impl<R> ResourceData<R> {
    /// Creates an unmanaged record.
    pub fn new(record: R) -> Self {
        Self { id: None, record }
    }

    /// Creates a record already bound to a remote identifier.
    pub fn with_id(id: impl Into<String>, record: R) -> Self {
        let mut data = Self::new(record);
        data.set_id(id);
        data
    }

    /// Returns the remote identifier, if the record is managed.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Binds the record to a remote identifier. An empty identifier unbinds it.
    pub fn set_id(&mut self, id: impl Into<String>) {
        let id = id.into();
        if id.is_empty() {
            self.clear_id();
            return;
        }
        match self.id.replace(id.clone()) {
            Some(prev) if prev != id => {
                warn!(previous = %prev, id = %id, "Rebinding record to a new identifier")
            }
            Some(_) => {}
            None => debug!(id = %id, "Record bound to identifier"),
        }
    }

    /// Clears the remote identifier, ending the record's lifecycle.
    pub fn clear_id(&mut self) {
        if let Some(prev) = self.id.take() {
            debug!(id = %prev, "Record unbound from identifier");
        }
    }

    /// Returns the lifecycle state derived from the identifier.
    pub fn lifecycle(&self) -> LifecycleState {
        if self.id.is_some() {
            LifecycleState::Managed
        } else {
            LifecycleState::Unmanaged
        }
    }
}

/// Classification of the difference between a prior and a desired record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannedChange {
    /// Nothing to do.
    NoOp,
    /// Fields changed that could be patched in place.
    Update {
        /// Names of the changed fields.
        fields: Vec<String>,
    },
    /// At least one changed field forces destroy and recreate.
    Replace {
        /// Names of the changed fields that force replacement.
        fields: Vec<String>,
    },
}

impl PlannedChange {
    /// Returns true if the change requires destroying and recreating the object.
    pub fn requires_replace(&self) -> bool {
        matches!(self, Self::Replace { .. })
    }
}

impl fmt::Display for PlannedChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoOp => write!(f, "no-op"),
            Self::Update { fields } => write!(f, "update ({})", fields.join(", ")),
            Self::Replace { fields } => write!(f, "replace ({})", fields.join(", ")),
        }
    }
}

/// Base trait for resources driven by a declarative host.
///
/// The host calls these operations in response to differences between the
/// desired and the observed state. Every operation reports its outcome as
/// [`Diagnostics`]; an empty collection means success.
///
/// # Lifecycle
///
/// 1. `create()`: Unmanaged → Managed, identifier captured
/// 2. `read()`: Managed → Managed, observed fields refreshed
/// 3. `update()`: patch in place (may be refused)
/// 4. `delete()`: Managed → Unmanaged, identifier cleared
///
/// A failed operation leaves the record in its prior state.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`. The host guarantees at most one
/// in-flight operation per record.
#[async_trait]
pub trait Resource: Send + Sync {
    /// The declarative record type held by the host.
    type Record: Send + Sync;

    /// Returns the resource type name (for logging and diagnostics).
    fn type_name(&self) -> &str;

    /// Creates the remote object and populates the observed state.
    async fn create(
        &self,
        ctx: &SessionContext,
        data: &mut ResourceData<Self::Record>,
    ) -> Diagnostics;

    /// Refreshes the observed state from the remote object.
    async fn read(
        &self,
        ctx: &SessionContext,
        data: &mut ResourceData<Self::Record>,
    ) -> Diagnostics;

    /// Modifies the remote object in place.
    async fn update(
        &self,
        ctx: &SessionContext,
        data: &mut ResourceData<Self::Record>,
    ) -> Diagnostics;

    /// Removes the remote object and clears the identifier.
    async fn delete(
        &self,
        ctx: &SessionContext,
        data: &mut ResourceData<Self::Record>,
    ) -> Diagnostics;
}
