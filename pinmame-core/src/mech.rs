/*
    Copyright (C) 1999-2024  PinMAME development team and contributors

    This file is part of PINMAME-RS, Rust bindings for the PinMAME pinball emulator.

    For the full copyright notice, see the lib.rs file.
*/
//! Simulated mechanical devices.
//!
//! A mech is a playfield toy driven by up to two solenoids (a rotating castle, a moving
//! ramp, a spinning disc). The engine simulates its travel and toggles the switches whose
//! activation windows cover the current position.
use core::convert::TryFrom;
use core::fmt;

#[cfg(feature = "serde")]
use serde::{Serialize, Deserialize};

use arrayvec::ArrayVec;
use bitflags::bitflags;

/// The maximum number of switch activation windows of a single mech.
pub const MAX_MECH_SWITCHES: usize = 20;

bitflags! {
    /// Mech type flags.
    ///
    /// Several modes are the zero value of their group; they are defined as associated
    /// constants so configurations read the same way as their native counterparts.
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    #[cfg_attr(feature = "serde", serde(try_from = "u32", into = "u32"))]
    #[derive(Default, Debug, PartialEq, Eq, Hash, Clone, Copy)]
    pub struct MechFlags: u32 {
        const NONLINEAR   = 0x0001;
        /// Stop at the end of travel.
        const STOPEND     = 0x0002;
        /// Reverse direction at the end of travel.
        const REVERSE     = 0x0004;
        /// One solenoid enables the motor, the other one sets the direction.
        const ONEDIRSOL   = 0x0010;
        /// Two solenoids, one for each direction.
        const TWODIRSOL   = 0x0020;
        /// Two solenoids acting as a two-phase stepper.
        const TWOSTEPSOL  = 0x0040;
        const FAST        = 0x0080;
        /// Switch positions are given as lengths rather than steps.
        const LENGTHSW    = 0x0100;
    }
}

impl MechFlags {
    pub const LINEAR: Self = Self::empty();
    pub const CIRCLE: Self = Self::empty();
    pub const ONESOL: Self = Self::empty();
    pub const SLOW: Self = Self::empty();
    pub const STEPSW: Self = Self::empty();
    /// Four solenoids acting as a four-phase stepper.
    pub const FOURSTEPSOL: Self = Self::from_bits_retain(Self::TWODIRSOL.bits() | Self::TWOSTEPSOL.bits());
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TryFromU32MechFlagsError(pub u32);

/// The position window in which a mech activates a switch.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MechSwitchConfig {
    pub switch_no: i32,
    pub start_pos: i32,
    pub end_pos: i32,
    /// If not 0, the switch pulses with this period instead of staying closed.
    pub pulse: i32,
}

/// A mech simulation set up.
///
/// Holds at most [MAX_MECH_SWITCHES] switch windows; [MechConfig::add_switch] refuses
/// any more.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MechConfig {
    pub flags: MechFlags,
    pub sol1: i32,
    /// The second solenoid, 0 if the mech is driven by one solenoid.
    pub sol2: i32,
    pub length: i32,
    pub steps: i32,
    pub initial_pos: i32,
    pub acc: i32,
    pub ret: i32,
    switches: ArrayVec<MechSwitchConfig, MAX_MECH_SWITCHES>,
}

/// Returned by [MechConfig::add_switch] when the switch list is full.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MechSwitchCapacityError(pub MechSwitchConfig);

/// The state of a mech as reported by the engine.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(C)]
pub struct MechInfo {
    pub mech_type: i32,
    pub length: i32,
    pub steps: i32,
    pub pos: i32,
    pub speed: i32,
}

/// The native layout of a switch window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(C)]
pub struct RawMechSwitchConfig {
    pub sw_no: i32,
    pub start_pos: i32,
    pub end_pos: i32,
    pub pulse: i32,
}

/// The native layout of a mech configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(C)]
pub struct RawMechConfig {
    pub mech_type: i32,
    pub sol1: i32,
    pub sol2: i32,
    pub length: i32,
    pub steps: i32,
    pub initial_pos: i32,
    pub acc: i32,
    pub ret: i32,
    pub sw: [RawMechSwitchConfig; MAX_MECH_SWITCHES],
}

impl MechSwitchConfig {
    pub fn new(switch_no: i32, start_pos: i32, end_pos: i32) -> Self {
        MechSwitchConfig { switch_no, start_pos, end_pos, pulse: 0 }
    }

    pub fn with_pulse(mut self, pulse: i32) -> Self {
        self.pulse = pulse;
        self
    }
}

impl MechConfig {
    /// Creates a configuration of a mech driven by a single solenoid.
    pub fn new(flags: MechFlags, sol1: i32, length: i32, steps: i32,
               initial_pos: i32, acc: i32, ret: i32) -> Self
    {
        Self::with_two_solenoids(flags, sol1, 0, length, steps, initial_pos, acc, ret)
    }

    /// Creates a configuration of a mech driven by two solenoids.
    #[allow(clippy::too_many_arguments)]
    pub fn with_two_solenoids(flags: MechFlags, sol1: i32, sol2: i32, length: i32, steps: i32,
                              initial_pos: i32, acc: i32, ret: i32) -> Self
    {
        MechConfig {
            flags, sol1, sol2, length, steps, initial_pos, acc, ret,
            switches: ArrayVec::new()
        }
    }

    /// Appends a switch window.
    ///
    /// # Errors
    /// Returns the rejected window if [MAX_MECH_SWITCHES] windows are already present,
    /// leaving the list untouched.
    pub fn add_switch(&mut self, switch: MechSwitchConfig) -> Result<(), MechSwitchCapacityError> {
        self.switches.try_push(switch).map_err(|err| MechSwitchCapacityError(err.element()))
    }

    /// The switch windows in the order they were added.
    pub fn switches(&self) -> &[MechSwitchConfig] {
        &self.switches
    }

    pub fn clear_switches(&mut self) {
        self.switches.clear();
    }

    /// Converts this configuration to the native struct, zero-filling unused switch slots.
    pub fn to_raw(&self) -> RawMechConfig {
        let mut sw = [RawMechSwitchConfig::default(); MAX_MECH_SWITCHES];
        for (raw, switch) in sw.iter_mut().zip(self.switches.iter()) {
            *raw = RawMechSwitchConfig::from(*switch);
        }
        RawMechConfig {
            mech_type: self.flags.bits() as i32,
            sol1: self.sol1,
            sol2: self.sol2,
            length: self.length,
            steps: self.steps,
            initial_pos: self.initial_pos,
            acc: self.acc,
            ret: self.ret,
            sw
        }
    }
}

impl From<MechSwitchConfig> for RawMechSwitchConfig {
    fn from(switch: MechSwitchConfig) -> Self {
        RawMechSwitchConfig {
            sw_no: switch.switch_no,
            start_pos: switch.start_pos,
            end_pos: switch.end_pos,
            pulse: switch.pulse,
        }
    }
}

impl std::error::Error for MechSwitchCapacityError {}

impl fmt::Display for MechSwitchCapacityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a maximum of {} switches can be added to a mech", MAX_MECH_SWITCHES)
    }
}

impl std::error::Error for TryFromU32MechFlagsError {}

impl fmt::Display for TryFromU32MechFlagsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "converted integer (0x{:x}) contains extraneous bits for `MechFlags`", self.0)
    }
}

impl TryFrom<u32> for MechFlags {
    type Error = TryFromU32MechFlagsError;
    fn try_from(flags: u32) -> core::result::Result<Self, Self::Error> {
        MechFlags::from_bits(flags).ok_or(TryFromU32MechFlagsError(flags))
    }
}

impl From<MechFlags> for u32 {
    fn from(flags: MechFlags) -> u32 {
        flags.bits()
    }
}

impl fmt::Display for MechInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "type={}, length={}, steps={}, pos={}, speed={}",
            self.mech_type, self.length, self.steps, self.pos, self.speed)
    }
}
