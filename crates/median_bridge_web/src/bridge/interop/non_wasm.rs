use super::*;

fn unsupported() -> String {
    "Median host bridge APIs are only available when compiled for wasm32".to_string()
}

pub fn host_transport() -> Option<HostTransport> {
    None
}

pub fn post_to_host(_transport: HostTransport, _message: &Value) -> Result<(), String> {
    Err(unsupported())
}

pub fn install_global(_name: &str, _route: InboundRoute) -> Result<(), String> {
    Err(unsupported())
}

pub fn remove_global(_name: &str) {}

pub fn installed_globals() -> Vec<String> {
    Vec::new()
}

pub fn set_interval(
    _interval: Duration,
    _tick: Box<dyn FnMut() -> TickControl>,
) -> Result<(), String> {
    Err(unsupported())
}
