//! Engine configuration.

use crate::{Error, Result};
use midiwire_core::{Channel, DEFAULT_SYSEX_CAPACITY};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Channel for sends that don't name one. Must be a concrete channel.
    pub send_channel: Channel,
    /// Filter for incoming channel messages.
    pub receive_channel: Channel,
    /// Largest accepted incoming SysEx, 0xF0 and 0xF7 included.
    pub sysex_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            send_channel: Channel::Ch1,
            receive_channel: Channel::Any,
            sysex_capacity: DEFAULT_SYSEX_CAPACITY,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.send_channel.is_any() {
            return Err(Error::InvalidConfig(
                "send_channel must be a concrete channel, not any".into(),
            ));
        }
        if self.sysex_capacity < 2 {
            return Err(Error::InvalidConfig(format!(
                "sysex_capacity {} too small (minimum 2)",
                self.sysex_capacity
            )));
        }
        Ok(())
    }
}
