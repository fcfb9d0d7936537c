use serde::{Deserialize, Serialize};
use std::time::Duration;

/// The region list a [`DiscoveryConfig`] resolves against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionSelector {
    /// Scan exactly these regions, in the given order.
    List(Vec<String>),
    /// Enumerate every region the provider's region-list API returns.
    All,
}

/// Input to `DiscoveryOrchestrator::start_discovery`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// AWS account id override. If absent, the credential provider's default is used.
    #[serde(default)]
    pub account_id: Option<String>,
    /// Azure subscription id override. If absent, the credential provider's default is used.
    #[serde(default)]
    pub subscription_id: Option<String>,
    /// Which regions to scan.
    pub regions: RegionSelector,
    /// Regions to subtract from the resolved region list.
    #[serde(default)]
    pub exclude_regions: Vec<String>,
    /// Services to scan. Defaults to every registered scanner's service name.
    #[serde(default)]
    pub services: Option<Vec<String>>,
    /// Services to subtract from the resolved service list.
    #[serde(default)]
    pub exclude_services: Vec<String>,
    /// Overrides the rate limiter's `max_concurrent`. Defaults to 10.
    #[serde(default)]
    pub concurrency: Option<usize>,
    /// Wall-clock deadline for the whole session.
    #[serde(default, with = "duration_millis_opt")]
    pub timeout: Option<Duration>,
    /// How long a completed/failed session is retained before `cleanup_sessions`
    /// sweeps it. Defaults to 24h.
    #[serde(default = "default_session_ttl", with = "duration_millis")]
    pub session_ttl: Duration,
}

fn default_session_ttl() -> Duration {
    Duration::from_secs(24 * 60 * 60)
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

mod duration_millis_opt {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(
        value: &Option<Duration>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => serializer.serialize_some(&(d.as_millis() as u64)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Duration>, D::Error> {
        let millis = Option::<u64>::deserialize(deserializer)?;
        Ok(millis.map(Duration::from_millis))
    }
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            account_id: None,
            subscription_id: None,
            regions: RegionSelector::All,
            exclude_regions: Vec::new(),
            services: None,
            exclude_services: Vec::new(),
            concurrency: None,
            timeout: None,
            session_ttl: default_session_ttl(),
        }
    }
}

impl DiscoveryConfig {
    /// Start building a config that scans the given regions.
    pub fn builder(regions: RegionSelector) -> DiscoveryConfigBuilder {
        DiscoveryConfigBuilder {
            config: DiscoveryConfig {
                regions,
                ..Default::default()
            },
        }
    }
}

/// Builder for [`DiscoveryConfig`].
#[derive(Debug, Clone)]
pub struct DiscoveryConfigBuilder {
    config: DiscoveryConfig,
}

impl DiscoveryConfigBuilder {
    /// Set the AWS account id override.
    pub fn account_id(mut self, account_id: impl Into<String>) -> Self {
        self.config.account_id = Some(account_id.into());
        self
    }

    /// Set the Azure subscription id override.
    pub fn subscription_id(mut self, subscription_id: impl Into<String>) -> Self {
        self.config.subscription_id = Some(subscription_id.into());
        self
    }

    /// Set regions to exclude from the resolved list.
    pub fn exclude_regions(mut self, regions: impl IntoIterator<Item = String>) -> Self {
        self.config.exclude_regions = regions.into_iter().collect();
        self
    }

    /// Restrict the scan to this explicit set of services.
    pub fn services(mut self, services: impl IntoIterator<Item = String>) -> Self {
        self.config.services = Some(services.into_iter().collect());
        self
    }

    /// Set services to exclude from the resolved list.
    pub fn exclude_services(mut self, services: impl IntoIterator<Item = String>) -> Self {
        self.config.exclude_services = services.into_iter().collect();
        self
    }

    /// Override the rate limiter's concurrency cap for this session.
    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.config.concurrency = Some(concurrency);
        self
    }

    /// Arm a wall-clock deadline for the whole session.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    /// Override the session TTL used by `cleanup_sessions`.
    pub fn session_ttl(mut self, ttl: Duration) -> Self {
        self.config.session_ttl = ttl;
        self
    }

    /// Finish building.
    pub fn build(self) -> DiscoveryConfig {
        self.config
    }
}
