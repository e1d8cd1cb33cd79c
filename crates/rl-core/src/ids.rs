//! Strongly typed, zero-cost identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.
//!
//! The three IDs use different numbering:
//!
//! - `VehicleId` is a dense 0-based index into per-vehicle `Vec`s.
//! - `StationId` is the 1-based station number devices see (`1..=N`).
//! - `CommandId` is a global counter starting at 1; `0` means "no command".

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty) => $fmt:literal;) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        $vis struct $name(pub $inner);

        impl $name {
            /// The raw integer value.
            #[inline(always)]
            pub fn get(self) -> $inner {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, $fmt, self.0)
            }
        }

        impl From<$name> for $inner {
            #[inline(always)]
            fn from(id: $name) -> $inner {
                id.0
            }
        }
    };
}

typed_id! {
    /// Index of a vehicle in per-vehicle storage.
    pub struct VehicleId(u32) => "vehicle#{}";
}

typed_id! {
    /// A station number on the loop, `1..=station_count`.
    pub struct StationId(u32) => "S{}";
}

typed_id! {
    /// A dispatcher command id.  Global, monotonic, never reused.
    pub struct CommandId(u64) => "cmd#{}";
}

impl VehicleId {
    /// Cast to `usize` for direct use as a `Vec` index.
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl TryFrom<usize> for VehicleId {
    type Error = std::num::TryFromIntError;
    fn try_from(n: usize) -> Result<VehicleId, Self::Error> {
        u32::try_from(n).map(VehicleId)
    }
}

impl StationId {
    /// 0-based slot for indexing a station-sized `Vec`.
    ///
    /// Only meaningful for stations that passed range validation.
    #[inline(always)]
    pub fn slot(self) -> usize {
        (self.0 as usize).wrapping_sub(1)
    }

    /// Inverse of [`slot`][Self::slot].
    #[inline(always)]
    pub fn from_slot(slot: usize) -> StationId {
        StationId(slot as u32 + 1)
    }

    /// `true` if the station number lies in `1..=station_count`.
    #[inline]
    pub fn in_range(self, station_count: u32) -> bool {
        self.0 >= 1 && self.0 <= station_count
    }
}

impl CommandId {
    /// Placeholder reported for vehicles that never received a command.
    pub const NONE: CommandId = CommandId(0);

    /// First id handed out by a fresh dispatcher.
    pub const FIRST: CommandId = CommandId(1);

    /// The id allocated after `self`.
    #[inline]
    pub fn next(self) -> CommandId {
        CommandId(self.0 + 1)
    }

    #[inline]
    pub fn is_none(self) -> bool {
        self == CommandId::NONE
    }
}

impl Default for CommandId {
    /// Returns [`CommandId::NONE`].
    #[inline(always)]
    fn default() -> Self {
        CommandId::NONE
    }
}
