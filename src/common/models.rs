pub const RECORD_KIND_A: &str = "A";

/// One desired upsert against the DNS provider.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct DnsChange {
    pub name: String,
    pub kind: String,
    pub ttl: u32,
    pub content: String,
}

impl DnsChange {
    pub fn a_record(name: &str, ttl: u32, content: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: RECORD_KIND_A.to_string(),
            ttl,
            content: content.to_string(),
        }
    }
}

/// Maps an explicit `null` to the type's default, like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + serde::Deserialize<'de>,
{
    let value: Option<T> = serde::Deserialize::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct HostRecord {
    #[serde(default, rename = "ipAddress")]
    pub ip_address: Option<String>,
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct DeviceGroup {
    #[serde(default, deserialize_with = "null_as_default")]
    pub devices: Vec<Device>,
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct Device {
    #[serde(default, rename = "productLine")]
    pub product_line: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub ip: Option<String>,
}

/// Source of the observed network state.
pub trait Backend {
    fn fetch_hosts(&self) -> super::Result<Vec<HostRecord>>;
    fn fetch_devices(&self) -> super::Result<Vec<DeviceGroup>>;
}

/// DNS provider the changes are written to.
pub trait Frontend {
    /// Submits the batch as a single upsert and returns the provider's change id.
    fn apply_changes(&self, zone_id: &str, changes: &[DnsChange]) -> super::Result<String>;
}
