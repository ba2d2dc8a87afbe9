//! # Registry configuration.
//!
//! Provides [`RegistryConfig`], centralized settings for a [`Registry`](crate::Registry).
//!
//! Config is used in two places:
//! 1. **Registry creation**: `Registry::builder(config)` / `Registry::new(config)`
//! 2. **Channel creation**: every namespace sizes its result channels from it
//!
//! ## Sentinel values
//! - `channel_capacity = 0` → clamped to 1
//! - `bus_capacity = 0` → clamped to 1

/// Configuration for a registry instance.
///
/// ## Field semantics
/// - `channel_capacity`: results buffered per observed handler before slow observers lag
/// - `bus_capacity`: lifecycle event ring buffer size
///
/// ## Notes
/// All fields are public. Prefer the clamped accessors over reading fields directly.
#[derive(Clone, Debug)]
pub struct RegistryConfig {
    /// Capacity of each observed handler's broadcast ring buffer.
    ///
    /// An observer that falls more than `channel_capacity` results behind
    /// skips the oldest ones and receives [`ChannelError::Lagged`](crate::ChannelError::Lagged).
    pub channel_capacity: usize,

    /// Capacity of the lifecycle event bus.
    ///
    /// Event receivers that lag behind more than `bus_capacity` events skip older items.
    pub bus_capacity: usize,
}

impl RegistryConfig {
    /// Returns a channel capacity clamped to a minimum of 1.
    #[inline]
    pub fn channel_capacity_clamped(&self) -> usize {
        self.channel_capacity.max(1)
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for RegistryConfig {
    /// Default configuration:
    ///
    /// - `channel_capacity = 1024`
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            channel_capacity: 1024,
            bus_capacity: 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_capacities_are_clamped() {
        let cfg = RegistryConfig {
            channel_capacity: 0,
            bus_capacity: 0,
        };
        assert_eq!(cfg.channel_capacity_clamped(), 1);
        assert_eq!(cfg.bus_capacity_clamped(), 1);
        assert_eq!(RegistryConfig::default().channel_capacity_clamped(), 1024);
    }
}
