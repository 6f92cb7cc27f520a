use bitflags::bitflags;

use crate::DirectionPolicy;

bitflags! {
    /// How a watcher shares samples with watchers further up the path.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct BlockMode: u8 {
        /// No blocking.
        const AUTO = 1;
        /// Ignore samples aimed at this watcher.
        const SELF = 1 << 1;
        /// Mark every sample consumed after this watcher saw it.
        const OTHERS = 1 << 2;
        const ALL = Self::SELF.bits() | Self::OTHERS.bits();
        /// Mark a sample consumed once a matcher reports HANDLED.
        const ONCE = 1 << 3;
    }
}

impl Default for BlockMode {
    fn default() -> Self {
        BlockMode::AUTO
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WatcherConfig {
    pub block: BlockMode,
    pub direction: DirectionPolicy,
    /// Run the global pool (needed for focus/blur).
    pub global: bool,
    /// Reuse one watcher per element.
    pub share: bool,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            block: BlockMode::AUTO,
            direction: DirectionPolicy::Tolerant,
            global: false,
            share: true,
        }
    }
}
