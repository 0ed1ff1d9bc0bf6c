//! The injection container.
//!
//! One container per application, shared by every wrapped handler. It holds
//! long-lived, type-keyed values — pool handles, clients, config — and is
//! the collaborator the wrapping layer delegates each request to: given a
//! handler and a per-request [`Scope`], [`Container::invoke`] resolves the
//! handler's declared parameters and runs it.
//!
//! The container carries no per-request state. Request-scoped values travel
//! only inside the `Scope` argument, never through the container itself.

use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::trace;

use crate::handler::Handler;
use crate::registry::BoxFuture;
use crate::scope::Scope;

type Values = HashMap<TypeId, Arc<dyn Any + Send + Sync>>;

/// A type-keyed store of shared application dependencies.
pub struct Container {
    values: RwLock<Values>,
}

impl Container {
    pub fn new() -> Self {
        Self {
            values: RwLock::new(HashMap::new()),
        }
    }

    /// Registers `value` as the `T` handlers resolve via
    /// [`Dep<T>`](crate::Dep).
    ///
    /// Registering a second `T` replaces the first. Registration is fine
    /// at any point — before or after handlers are wired — because lookup
    /// happens per request.
    pub fn register<T: Send + Sync + 'static>(&self, value: T) {
        self.register_arc(Arc::new(value));
    }

    /// Registers an already-shared value without another allocation.
    pub fn register_arc<T: Send + Sync + 'static>(&self, value: Arc<T>) {
        self.write().insert(TypeId::of::<T>(), value);
    }

    /// Looks up the registered `T`, if any.
    pub fn get<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.read().get(&TypeId::of::<T>()).cloned()?.downcast().ok()
    }

    /// Resolves `handler`'s parameters from `scope` and invokes it.
    ///
    /// Exactly one resolution per request per handler; nothing is cached
    /// across requests. A parameter neither the scope nor the container
    /// can supply fails the returned future with
    /// [`Error::Unresolved`](crate::Error::Unresolved) before the handler
    /// body runs.
    pub fn invoke<H, M>(&self, handler: &H, scope: Scope) -> BoxFuture
    where
        H: Handler<M>,
    {
        trace!(handler = type_name::<H>(), "resolving handler dependencies");
        handler.call(scope)
    }

    fn read(&self) -> RwLockReadGuard<'_, Values> {
        self.values.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Values> {
        self.values.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::Container;

    #[test]
    fn register_and_get() {
        let container = Container::new();
        assert!(container.get::<String>().is_none());
        container.register("pool".to_owned());
        assert_eq!(*container.get::<String>().unwrap(), "pool");
    }

    #[test]
    fn later_registration_replaces() {
        let container = Container::new();
        container.register(1u32);
        container.register(2u32);
        assert_eq!(*container.get::<u32>().unwrap(), 2);
    }

    #[test]
    fn register_arc_shares_the_instance() {
        let container = Container::new();
        let value = Arc::new(7i64);
        container.register_arc(Arc::clone(&value));
        assert!(Arc::ptr_eq(&value, &container.get::<i64>().unwrap()));
    }
}
