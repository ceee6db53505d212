//! Callback exposure as `window[<name>]` functions.

use median_bridge::{CallbackScope, InboundRoute};

#[derive(Debug, Clone, Copy, Default)]
/// [`CallbackScope`] installing one global function per live callback name.
pub struct WebCallbackScope;

impl WebCallbackScope {
    /// Returns the names this page currently exposes, sorted.
    pub fn exposed_names(&self) -> Vec<String> {
        crate::bridge::installed_globals()
    }
}

impl CallbackScope for WebCallbackScope {
    fn expose(&self, name: &str, route: InboundRoute) {
        if let Err(err) = crate::bridge::install_global(name, route) {
            log::debug!("callback `{name}` not exposed: {err}");
        }
    }

    fn retract(&self, name: &str) {
        crate::bridge::remove_global(name);
    }
}
