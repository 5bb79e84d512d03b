/// A named holding register in the inverter's SunSpec map.
///
/// Addresses are fixed by the SunSpec models SolarEdge exposes over
/// Modbus TCP: the common inverter model, the first meter model, and the
/// first battery block. Integer registers are one word plus a companion
/// scale-factor register; the battery block exposes IEEE-754 floats as
/// two words in little-endian word order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Register {
    pub name: &'static str,
    pub address: u16,
    pub words: u16,
}

/// Inverter AC power, int16 + scale factor.
pub const I_AC_POWER: Register = Register {
    name: "I_AC_Power",
    address: 40083,
    words: 1,
};

pub const I_AC_POWER_SF: Register = Register {
    name: "I_AC_Power_SF",
    address: 40084,
    words: 1,
};

/// Meter 1 AC power, int16 + scale factor. Positive = import from grid.
pub const M1_AC_POWER: Register = Register {
    name: "M_AC_Power",
    address: 40206,
    words: 1,
};

pub const M1_AC_POWER_SF: Register = Register {
    name: "M_AC_Power_SF",
    address: 40210,
    words: 1,
};

/// Battery 1 instantaneous power in watts, float32.
/// Positive = discharging, negative = charging.
pub const B1_INSTANTANEOUS_POWER: Register = Register {
    name: "B_Instantaneous_Power",
    address: 62836,
    words: 2,
};

/// Battery 1 state of energy in percent, float32.
pub const B1_STATE_OF_ENERGY: Register = Register {
    name: "B_State_of_Energy",
    address: 62852,
    words: 2,
};
