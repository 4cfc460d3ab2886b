//! Session configuration.

/// Default seed for undefined-read noise.
pub const DEFAULT_NOISE_SEED: u64 = 0x6D65_3838;
/// Default number of bus cycles retained for status snapshots.
pub const DEFAULT_BUS_LOG_CAPACITY: usize = 64;
/// Default reset code selector (EPROM base `0xF0000`).
pub const DEFAULT_RESET_CS: u16 = 0xF000;
/// Default reset instruction pointer.
pub const DEFAULT_RESET_IP: u16 = 0x0000;

/// Top-level configuration for a machine session.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MachineConfig {
    /// Seed for the pseudo-random bytes returned by undefined reads.
    pub noise_seed: u64,
    /// Upper bound on retained bus-access log entries.
    pub bus_log_capacity: usize,
    /// `CS` loaded on reset.
    pub reset_cs: u16,
    /// `IP` loaded on reset.
    pub reset_ip: u16,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            noise_seed: DEFAULT_NOISE_SEED,
            bus_log_capacity: DEFAULT_BUS_LOG_CAPACITY,
            reset_cs: DEFAULT_RESET_CS,
            reset_ip: DEFAULT_RESET_IP,
        }
    }
}

impl MachineConfig {
    /// Returns a copy with a different noise seed.
    #[must_use]
    pub const fn with_noise_seed(mut self, seed: u64) -> Self {
        self.noise_seed = seed;
        self
    }

    /// Physical reset address.
    #[must_use]
    pub const fn reset_address(&self) -> u32 {
        crate::address::physical_address(self.reset_cs, self.reset_ip)
    }
}

#[cfg(test)]
mod tests {
    use super::MachineConfig;

    #[test]
    fn default_reset_vector_points_at_eprom_base() {
        assert_eq!(MachineConfig::default().reset_address(), 0xF0000);
    }

    #[test]
    fn seed_override_keeps_other_fields() {
        let config = MachineConfig::default().with_noise_seed(1);
        assert_eq!(config.noise_seed, 1);
        assert_eq!(config.bus_log_capacity, 64);
    }
}
