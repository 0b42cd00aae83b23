//! Projections over the `/api/overview` payload

use std::collections::BTreeMap;

use crate::resource::Resource;

/// Protocol names of all listeners, deduplicated, in listener order.
///
/// Common values are `amqp`, `amqp/ssl`, `mqtt`, `stomp` and `http`; the
/// exact set depends on broker configuration and enabled plugins.
pub fn enabled_protocols(overview: &Resource) -> Vec<String> {
    let mut protocols: Vec<String> = Vec::new();
    for listener in overview.resources("listeners").unwrap_or_default() {
        if let Some(protocol) = listener.str("protocol") {
            if !protocols.iter().any(|p| p == protocol) {
                protocols.push(protocol.to_string());
            }
        }
    }
    protocols
}

/// Map of protocol name to listener port.
///
/// When several listeners share a protocol (e.g. one per cluster node), the
/// last one listed wins.
pub fn protocol_ports(overview: &Resource) -> BTreeMap<String, u16> {
    let mut ports = BTreeMap::new();
    for listener in overview.resources("listeners").unwrap_or_default() {
        let port = listener.u64("port").and_then(|p| u16::try_from(p).ok());
        if let (Some(protocol), Some(port)) = (listener.str("protocol"), port) {
            ports.insert(protocol.to_string(), port);
        }
    }
    ports
}
