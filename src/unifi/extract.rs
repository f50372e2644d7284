use crate::common::{Device, DeviceGroup, HostRecord};

pub const GATEWAY_PRODUCT_LINE: &str = "network";
pub const DEFAULT_GATEWAY_MODELS: [&str; 1] = ["USG"];

/// Decides which device in the devices listing is the WAN1 gateway.
///
/// A device qualifies when its product line is `network` and its model
/// contains one of the configured patterns.
#[derive(Debug, Clone)]
pub struct GatewayMatcher {
    model_patterns: Vec<String>,
}

impl GatewayMatcher {
    pub fn new(model_patterns: Vec<String>) -> Self {
        Self { model_patterns }
    }

    pub fn patterns(&self) -> &[String] {
        &self.model_patterns
    }

    pub fn matches(&self, device: &Device) -> bool {
        if device.product_line.as_deref() != Some(GATEWAY_PRODUCT_LINE) {
            return false;
        }
        let model = device.model.as_deref().unwrap_or_default();
        self.model_patterns
            .iter()
            .any(|pattern| model.contains(pattern.as_str()))
    }
}

impl Default for GatewayMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_GATEWAY_MODELS.map(String::from).to_vec())
    }
}

fn non_empty(ip: Option<&String>) -> Option<String> {
    ip.filter(|ip| !ip.is_empty()).cloned()
}

/// Returns the IP of the first gateway device, scanning groups and then
/// devices in listing order.
///
/// The scan stops at the first gateway. If that device has no IP, WAN1 is
/// unresolved even when a later gateway carries one.
pub fn extract_wan1(groups: &[DeviceGroup], matcher: &GatewayMatcher) -> Option<String> {
    groups
        .iter()
        .flat_map(|group| group.devices.iter())
        .find(|device| matcher.matches(device))
        .and_then(|device| non_empty(device.ip.as_ref()))
}

/// Returns the IP of the first host. Any other hosts are ignored.
pub fn extract_wan2(hosts: &[HostRecord]) -> Option<String> {
    hosts
        .first()
        .and_then(|host| non_empty(host.ip_address.as_ref()))
}
