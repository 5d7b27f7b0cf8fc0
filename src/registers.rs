//! 2A03 APU Register Definitions
//!
//! Defines the memory-mapped registers ($4000-$4017) routed to the sound
//! unit and the channel tags used to address individual channels.

use std::fmt;

use bitflags::bitflags;
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use serde::{Deserialize, Serialize};

/// APU register address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromPrimitive)]
#[repr(u16)]
pub enum Register {
    /// Pulse 1 duty and volume - $4000
    Pulse1Control = 0x4000,
    /// Pulse 1 sweep unit - $4001
    Pulse1Sweep = 0x4001,
    /// Pulse 1 timer (low byte) - $4002
    Pulse1TimerLo = 0x4002,
    /// Pulse 1 timer (high bits) and trigger - $4003
    Pulse1TimerHi = 0x4003,
    /// Pulse 2 duty and volume - $4004
    Pulse2Control = 0x4004,
    /// Pulse 2 sweep unit - $4005
    Pulse2Sweep = 0x4005,
    /// Pulse 2 timer (low byte) - $4006
    Pulse2TimerLo = 0x4006,
    /// Pulse 2 timer (high bits) and trigger - $4007
    Pulse2TimerHi = 0x4007,
    /// Triangle linear counter control - $4008
    TriangleControl = 0x4008,
    /// Triangle timer (low byte) - $400A
    TriangleTimerLo = 0x400A,
    /// Triangle timer (high bits) and trigger - $400B
    TriangleTimerHi = 0x400B,
    /// Noise volume - $400C
    NoiseControl = 0x400C,
    /// Noise period and mode - $400E
    NoisePeriod = 0x400E,
    /// Noise trigger - $400F
    NoiseLength = 0x400F,
    /// DMC rate and loop flag - $4010
    DmcControl = 0x4010,
    /// DMC direct load - $4011
    DmcDirectLoad = 0x4011,
    /// DMC sample address - $4012
    DmcAddress = 0x4012,
    /// DMC sample length - $4013
    DmcLength = 0x4013,
    /// Channel enable (write) / channel status (read) - $4015
    Status = 0x4015,
    /// Frame counter mode and IRQ inhibit - $4017
    FrameCounter = 0x4017,
}

impl Register {
    /// Decode a bus address into a register, `None` for unmapped addresses
    pub fn from_addr(addr: u16) -> Option<Self> {
        Register::from_u16(addr)
    }

    /// Get the bus address of the register
    pub fn addr(&self) -> u16 {
        *self as u16
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Register::Pulse1Control => "Pulse 1 Control",
            Register::Pulse1Sweep => "Pulse 1 Sweep",
            Register::Pulse1TimerLo => "Pulse 1 Timer Low",
            Register::Pulse1TimerHi => "Pulse 1 Timer High",
            Register::Pulse2Control => "Pulse 2 Control",
            Register::Pulse2Sweep => "Pulse 2 Sweep",
            Register::Pulse2TimerLo => "Pulse 2 Timer Low",
            Register::Pulse2TimerHi => "Pulse 2 Timer High",
            Register::TriangleControl => "Triangle Control",
            Register::TriangleTimerLo => "Triangle Timer Low",
            Register::TriangleTimerHi => "Triangle Timer High",
            Register::NoiseControl => "Noise Control",
            Register::NoisePeriod => "Noise Period",
            Register::NoiseLength => "Noise Length",
            Register::DmcControl => "DMC Control",
            Register::DmcDirectLoad => "DMC Direct Load",
            Register::DmcAddress => "DMC Address",
            Register::DmcLength => "DMC Length",
            Register::Status => "Channel Status",
            Register::FrameCounter => "Frame Counter",
        };
        write!(f, "${:04X} ({})", self.addr(), name)
    }
}

bitflags! {
    /// Channel set using the bit layout of the status register ($4015)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct ChannelMask: u8 {
        /// Pulse 1 (bit 0)
        const PULSE1 = 0x01;
        /// Pulse 2 (bit 1)
        const PULSE2 = 0x02;
        /// Triangle (bit 2)
        const TRIANGLE = 0x04;
        /// Noise (bit 3)
        const NOISE = 0x08;
        /// DMC (bit 4)
        const DMC = 0x10;
    }
}

impl ChannelMask {
    /// Create a mask from a raw $4015 value, ignoring bits 5-7
    pub fn from_register(value: u8) -> Self {
        ChannelMask::from_bits_truncate(value)
    }
}

/// Channel tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    /// First pulse channel
    Pulse1,
    /// Second pulse channel
    Pulse2,
    /// Triangle channel
    Triangle,
    /// Noise channel
    Noise,
    /// Delta modulation channel
    Dmc,
}

impl Channel {
    /// All channels in mixer order
    pub const ALL: [Channel; 5] = [
        Channel::Pulse1,
        Channel::Pulse2,
        Channel::Triangle,
        Channel::Noise,
        Channel::Dmc,
    ];

    /// Position of the channel in mixer order (0-4)
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Channel::Pulse1 => 0,
            Channel::Pulse2 => 1,
            Channel::Triangle => 2,
            Channel::Noise => 3,
            Channel::Dmc => 4,
        }
    }

    /// The status register bit owned by this channel
    #[inline]
    pub fn mask(self) -> ChannelMask {
        match self {
            Channel::Pulse1 => ChannelMask::PULSE1,
            Channel::Pulse2 => ChannelMask::PULSE2,
            Channel::Triangle => ChannelMask::TRIANGLE,
            Channel::Noise => ChannelMask::NOISE,
            Channel::Dmc => ChannelMask::DMC,
        }
    }
}

/// Selects one of the two pulse channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PulseId {
    /// Pulse 1 ($4000-$4003)
    One,
    /// Pulse 2 ($4004-$4007)
    Two,
}

impl PulseId {
    /// Index into per-pulse storage
    #[inline]
    pub fn index(self) -> usize {
        match self {
            PulseId::One => 0,
            PulseId::Two => 1,
        }
    }

    /// Mixer channel tag for this pulse
    #[inline]
    pub fn channel(self) -> Channel {
        match self {
            PulseId::One => Channel::Pulse1,
            PulseId::Two => Channel::Pulse2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_conversion() {
        assert_eq!(Register::from_addr(0x4000), Some(Register::Pulse1Control));
        assert_eq!(Register::from_addr(0x400B), Some(Register::TriangleTimerHi));
        assert_eq!(Register::from_addr(0x4015), Some(Register::Status));
        assert_eq!(Register::from_addr(0x4017), Some(Register::FrameCounter));
    }

    #[test]
    fn test_unmapped_addresses() {
        for addr in [0x4009, 0x400D, 0x4014, 0x4016, 0x4018, 0x2000, 0x0000] {
            assert_eq!(Register::from_addr(addr), None, "{addr:#06x} should be unmapped");
        }
    }

    #[test]
    fn test_register_addr_round_trip() {
        let reg = Register::DmcAddress;
        assert_eq!(Register::from_addr(reg.addr()), Some(reg));
    }

    #[test]
    fn test_register_display() {
        assert_eq!(Register::Status.to_string(), "$4015 (Channel Status)");
    }

    #[test]
    fn test_channel_mask_layout() {
        let mask = ChannelMask::from_register(0xFF);
        assert_eq!(mask, ChannelMask::all());
        assert_eq!(mask.bits(), 0x1F);
        for channel in Channel::ALL {
            assert_eq!(channel.mask().bits(), 1 << channel.index());
        }
    }

    #[test]
    fn test_pulse_id_channels() {
        assert_eq!(PulseId::One.channel(), Channel::Pulse1);
        assert_eq!(PulseId::Two.channel(), Channel::Pulse2);
        assert_ne!(PulseId::One.index(), PulseId::Two.index());
    }
}
