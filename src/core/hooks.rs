//! Hook pipeline for observing and vetoing ledger mutations
//!
//! Before-hooks run ahead of an operation and may veto it; after-hooks
//! run once the operation has committed and are purely informational.
//! Hooks fire only for user-facing operations, never for the internal
//! legs a compound operation is built from.
//!
//! Firing works on a snapshot of the registered hooks, so a hook may
//! call back into the ledger (or register further hooks) without
//! deadlocking the registry.

use std::sync::{Arc, RwLock};

use crate::types::EventRecord;

/// Decision returned by a before-hook
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Let the operation proceed
    Allow,
    /// Reject the operation before it touches any state
    Deny,
}

/// Listener consulted before a mutation commits
pub type BeforeHook = Arc<dyn Fn(&EventRecord) -> Verdict + Send + Sync>;

/// Listener notified after a mutation has committed
pub type AfterHook = Arc<dyn Fn(&EventRecord) + Send + Sync>;

/// Registered before- and after-hooks
///
/// Registration order is preserved and is the firing order.
#[derive(Default)]
pub struct HookRegistry {
    before: RwLock<Vec<BeforeHook>>,
    after: RwLock<Vec<AfterHook>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        HookRegistry::default()
    }

    /// Adds a before-hook at the end of the firing order.
    pub fn register_before(&self, hook: BeforeHook) {
        self.lock_before_mut().push(hook);
    }

    /// Adds an after-hook at the end of the firing order.
    pub fn register_after(&self, hook: AfterHook) {
        self.lock_after_mut().push(hook);
    }

    /// Consults every before-hook in registration order.
    ///
    /// Stops at the first `Deny`; later hooks are not consulted.
    pub fn fire_before(&self, record: &EventRecord) -> Verdict {
        let hooks = self
            .before
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone();
        for hook in &hooks {
            if hook.as_ref()(record) == Verdict::Deny {
                return Verdict::Deny;
            }
        }
        Verdict::Allow
    }

    /// Notifies every after-hook in registration order.
    pub fn fire_after(&self, record: &EventRecord) {
        let hooks = self
            .after
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone();
        for hook in &hooks {
            hook.as_ref()(record);
        }
    }

    // The registry lock only guards the Vec itself; hook bodies run on a
    // snapshot, so poisoning cannot leave a half-applied registration.
    fn lock_before_mut(&self) -> std::sync::RwLockWriteGuard<'_, Vec<BeforeHook>> {
        self.before
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn lock_after_mut(&self) -> std::sync::RwLockWriteGuard<'_, Vec<AfterHook>> {
        self.after
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
