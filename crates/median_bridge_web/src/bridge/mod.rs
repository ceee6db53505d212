//! Browser capability bridge for the Median host.
//!
//! Callers in this crate go through these wrappers; `interop` holds the wasm and non-wasm
//! implementations.

mod interop;

use std::time::Duration;

use median_bridge::{InboundRoute, TickControl};
use serde_json::Value;

use crate::detect::HostTransport;

pub fn host_transport() -> Option<HostTransport> {
    interop::host_transport()
}

pub fn post_to_host(transport: HostTransport, message: &Value) -> Result<(), String> {
    interop::post_to_host(transport, message)
}

pub fn install_global(name: &str, route: InboundRoute) -> Result<(), String> {
    interop::install_global(name, route)
}

pub fn remove_global(name: &str) {
    interop::remove_global(name)
}

pub fn installed_globals() -> Vec<String> {
    interop::installed_globals()
}

pub fn set_interval(interval: Duration, tick: Box<dyn FnMut() -> TickControl>) -> Result<(), String> {
    interop::set_interval(interval, tick)
}

#[cfg(test)]
mod tests {
    use median_bridge::{CallbackRegistry, CallbackScope};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::{cell::RefCell, rc::Rc};

    use super::*;

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn host_public_api_non_wasm_parity() {
        let expected =
            "Median host bridge APIs are only available when compiled for wasm32".to_string();

        assert_eq!(host_transport(), None);
        assert_eq!(
            post_to_host(
                HostTransport::InjectedInterface,
                &json!({ "medianCommand": "median://auth/status" })
            )
            .expect_err("post should fail"),
            expected
        );
        assert_eq!(
            set_interval(Duration::from_millis(500), Box::new(|| TickControl::Stop))
                .expect_err("interval should fail"),
            expected
        );
    }

    #[derive(Default)]
    struct CapturingScope {
        routes: RefCell<Vec<(String, InboundRoute)>>,
    }

    impl CallbackScope for CapturingScope {
        fn expose(&self, name: &str, route: InboundRoute) {
            self.routes.borrow_mut().push((name.to_string(), route));
        }

        fn retract(&self, _name: &str) {}
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn globals_public_api_non_wasm_parity() {
        let scope = Rc::new(CapturingScope::default());
        let registry = CallbackRegistry::new();
        registry.attach_scope(scope.clone());
        let id = registry.register_one_shot("_median_temp_", |_| {});
        let (name, route) = scope.routes.borrow_mut().remove(0);
        assert_eq!(name, id.as_str());

        assert_eq!(
            install_global(&name, route).expect_err("install should fail"),
            "Median host bridge APIs are only available when compiled for wasm32".to_string()
        );
        remove_global(&name);
        assert_eq!(installed_globals(), Vec::<String>::new());
        assert!(registry.contains(id.as_str()));
    }
}
