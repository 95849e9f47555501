use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use web_time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "General", inline)]
#[serde(default)]
/// Engine-wide switches.
pub struct GeneralOptions {
    /// Honor the user's reduced-motion preference: no listeners, no
    /// writes.
    #[schemars(title = "Reduced Motion")]
    pub reduced_motion: bool,
    /// Minimum spacing between broadcast ticks, in milliseconds.
    #[schemars(title = "Throttle", range(min = 0, max = 250))]
    pub throttle_ms: u64,
    /// Fixed seed for particle placement. Random when unset.
    #[schemars(skip)]
    pub particle_seed: Option<u64>,
}

impl Default for GeneralOptions {
    fn default() -> Self {
        Self {
            reduced_motion: false,
            throttle_ms: 16,
            particle_seed: None,
        }
    }
}

impl GeneralOptions {
    /// Broadcast throttle interval.
    #[must_use]
    pub fn throttle(&self) -> Duration {
        Duration::from_millis(self.throttle_ms)
    }
}
