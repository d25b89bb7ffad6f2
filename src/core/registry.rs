//=========================================================================
// Window Registry
//
// Process-wide count of open windows with an explicit lifecycle:
// `register()` on window construction, `unregister()` on close; the last
// unregister fires an injectable shutdown hook.
//
// This replaces the hidden static-counter-plus-process-exit pattern: the
// hook is injected (the runtime installs `process::exit(0)` only when the
// caller opts in), so the lifecycle is testable on fresh instances.
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, info};
use parking_lot::Mutex;

//=== WindowRegistry ======================================================

type ShutdownHook = Box<dyn FnMut() + Send>;

/// Open-window counter with a last-close shutdown hook.
pub struct WindowRegistry {
    state: Mutex<RegistryState>,
}

struct RegistryState {
    open: usize,
    on_last_close: Option<ShutdownHook>,
}

impl WindowRegistry {
    pub const fn new() -> Self {
        Self {
            state: Mutex::new(RegistryState {
                open: 0,
                on_last_close: None,
            }),
        }
    }

    /// The registry backing the runtime's windows.
    pub fn global() -> &'static WindowRegistry {
        static GLOBAL: WindowRegistry = WindowRegistry::new();
        &GLOBAL
    }

    //--- Lifecycle --------------------------------------------------------

    /// Records a newly opened window.
    pub fn register(&self) {
        let mut state = self.state.lock();
        state.open += 1;
        debug!(target: "easel::registry", "window registered ({} open)", state.open);
    }

    /// Records a closed window. When this was the last open window the
    /// shutdown hook runs (outside the registry lock).
    ///
    /// # Panics
    ///
    /// Panics if called more often than `register` — an unbalanced
    /// lifecycle is a caller bug.
    pub fn unregister(&self) {
        let hook = {
            let mut state = self.state.lock();
            assert!(state.open > 0, "unregister without a matching register");
            state.open -= 1;
            debug!(target: "easel::registry", "window unregistered ({} open)", state.open);

            if state.open == 0 {
                state.on_last_close.take()
            } else {
                None
            }
        };

        if let Some(mut hook) = hook {
            info!(target: "easel::registry", "last window closed, running shutdown hook");
            hook();
        }
    }

    /// Installs the hook to run when the last window closes, replacing any
    /// previous hook.
    pub fn set_shutdown_hook(&self, hook: impl FnMut() + Send + 'static) {
        self.state.lock().on_last_close = Some(Box::new(hook));
    }

    /// Removes the shutdown hook without running it.
    pub fn clear_shutdown_hook(&self) {
        self.state.lock().on_last_close = None;
    }

    pub fn open_windows(&self) -> usize {
        self.state.lock().open
    }
}

impl Default for WindowRegistry {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn register_unregister_balances_count() {
        let registry = WindowRegistry::new();
        registry.register();
        registry.register();
        assert_eq!(registry.open_windows(), 2);

        registry.unregister();
        assert_eq!(registry.open_windows(), 1);
        registry.unregister();
        assert_eq!(registry.open_windows(), 0);
    }

    #[test]
    fn hook_fires_exactly_once_on_last_close() {
        let registry = WindowRegistry::new();
        let fired = Arc::new(AtomicUsize::new(0));

        let hook_fired = Arc::clone(&fired);
        registry.set_shutdown_hook(move || {
            hook_fired.fetch_add(1, Ordering::SeqCst);
        });

        registry.register();
        registry.register();
        registry.unregister();
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        registry.unregister();
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn hook_does_not_fire_again_for_later_windows() {
        let registry = WindowRegistry::new();
        let fired = Arc::new(AtomicUsize::new(0));

        let hook_fired = Arc::clone(&fired);
        registry.set_shutdown_hook(move || {
            hook_fired.fetch_add(1, Ordering::SeqCst);
        });

        registry.register();
        registry.unregister();
        assert_eq!(fired.load(Ordering::SeqCst), 1);

        registry.register();
        registry.unregister();
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn cleared_hook_does_not_fire() {
        let registry = WindowRegistry::new();
        let fired = Arc::new(AtomicUsize::new(0));

        let hook_fired = Arc::clone(&fired);
        registry.set_shutdown_hook(move || {
            hook_fired.fetch_add(1, Ordering::SeqCst);
        });
        registry.clear_shutdown_hook();

        registry.register();
        registry.unregister();
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[test]
    #[should_panic(expected = "without a matching register")]
    fn unbalanced_unregister_panics() {
        let registry = WindowRegistry::new();
        registry.unregister();
    }
}
