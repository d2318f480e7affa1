use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::id::AbilityId;

bitflags! {
    /// Damage schools an effect belongs to. Combined schools set several bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct SchoolMask: u8 {
        const PHYSICAL = 1 << 0;
        const HOLY = 1 << 1;
        const FIRE = 1 << 2;
        const NATURE = 1 << 3;
        const FROST = 1 << 4;
        const SHADOW = 1 << 5;
        const ARCANE = 1 << 6;

        const MAGIC = Self::HOLY.bits()
            | Self::FIRE.bits()
            | Self::NATURE.bits()
            | Self::FROST.bits()
            | Self::SHADOW.bits()
            | Self::ARCANE.bits();
    }
}

impl Default for SchoolMask {
    fn default() -> Self {
        SchoolMask::PHYSICAL
    }
}

bitflags! {
    /// Threat-relevant attributes of an ability definition.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct AbilityFlags: u8 {
        /// The ability never generates threat.
        const NO_THREAT = 1 << 0;
        /// Pure resource generation; bypasses every threat multiplier.
        const ENERGIZE = 1 << 1;
        /// May be autocast by controlled units.
        const AUTOCAST = 1 << 2;
    }
}

impl Default for AbilityFlags {
    fn default() -> Self {
        AbilityFlags::empty()
    }
}

/// The slice of an ability definition that threat resolution consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ability {
    pub id: AbilityId,
    #[serde(default)]
    pub school: SchoolMask,
    #[serde(default)]
    pub flags: AbilityFlags,
}

impl Ability {
    pub fn new(id: AbilityId, school: SchoolMask) -> Self {
        Self {
            id,
            school,
            flags: AbilityFlags::empty(),
        }
    }

    pub fn with_flags(mut self, flags: AbilityFlags) -> Self {
        self.flags |= flags;
        self
    }

    pub fn generates_threat(&self) -> bool {
        !self.flags.contains(AbilityFlags::NO_THREAT)
    }

    pub fn is_energize(&self) -> bool {
        self.flags.contains(AbilityFlags::ENERGIZE)
    }
}
