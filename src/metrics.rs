//! The derived-metrics pipeline: scale-factor normalization, the four
//! power-flow quantities, and the rounding/formatting rules the screens
//! display.

/// Arrows on the dashboard are suppressed below this magnitude so that
/// meter/battery noise around zero does not flicker them.
pub const FLOW_ARROW_MIN_WATTS: f64 = 9.0;

/// Converts a raw register reading plus its scale-factor register into a
/// physical value: `raw * 10^scale_factor`.
///
/// Pure; the scale-factor range is bounded by the SunSpec encoding and is
/// a caller precondition, not checked here.
pub fn normalize(raw: i16, scale_factor: i16) -> f64 {
    f64::from(raw) * 10f64.powi(i32::from(scale_factor))
}

/// Flow direction of a signed power value, as rendered by the dashboard
/// arrows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrowDirection {
    Up,
    Down,
}

/// The four derived quantities for one update tick, plus the battery
/// state of energy. Built fresh on every tick; never merged or smoothed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerFlowSnapshot {
    /// Solar production in watts.
    pub sun_power: f64,
    /// Household consumption in watts.
    pub house_usage: f64,
    /// Grid flow in watts; positive = import, negative = export.
    pub grid_power: f64,
    /// Battery flow in watts; positive = discharging, negative = charging.
    pub battery_power: f64,
    /// Battery state of energy, 0-100 percent.
    pub battery_soe: f32,
}

impl PowerFlowSnapshot {
    /// Derives the snapshot from the normalized inverter AC power `I`,
    /// the normalized meter AC power `M`, and the battery instantaneous
    /// power `B` (already a float, not register-scaled).
    ///
    /// `sun = max(I - B, 0)`: a charging draw (`B < 0`) adds to the array
    /// output, a discharge contribution is removed from it.
    /// `house = max(I + M, 0)`: inverter output plus grid import.
    pub fn derive(inverter_ac: f64, meter_ac: f64, battery_power: f64, battery_soe: f32) -> Self {
        Self {
            sun_power: (inverter_ac - battery_power).max(0.0),
            house_usage: (inverter_ac + meter_ac).max(0.0),
            grid_power: meter_ac,
            battery_power,
            battery_soe,
        }
    }

    /// Whether the inverter-to-house arrow is shown.
    pub fn sun_flow_active(&self) -> bool {
        self.sun_power > 0.0
    }

    /// Battery arrow: up while charging, down while discharging, hidden
    /// inside the noise floor.
    pub fn battery_arrow(&self) -> Option<ArrowDirection> {
        if self.battery_power.abs() <= FLOW_ARROW_MIN_WATTS {
            None
        } else if self.battery_power < 0.0 {
            Some(ArrowDirection::Up)
        } else {
            Some(ArrowDirection::Down)
        }
    }

    /// Meter arrow: up while exporting, down while importing, hidden
    /// inside the noise floor.
    pub fn meter_arrow(&self) -> Option<ArrowDirection> {
        if self.grid_power.abs() <= FLOW_ARROW_MIN_WATTS {
            None
        } else if self.grid_power < 0.0 {
            Some(ArrowDirection::Up)
        } else {
            Some(ArrowDirection::Down)
        }
    }
}

/// Symmetric round-half-away-from-zero: adds 0.005 to the absolute value
/// before restoring the sign.
///
/// This deliberately shadows the standard rounding functions; the display
/// values must round half-cents away from zero, not to even.
pub fn round_half_away_from_zero(f: f64) -> f64 {
    let sign = if f < 0.0 { -1.0 } else { 1.0 };
    (f * sign + 0.005) * sign
}

/// Formats a watt value as a fixed two-decimal kilowatt string.
///
/// Negative zero formats as "0.00".
pub fn format_kw(watts: f64) -> String {
    let kw = round_half_away_from_zero(watts / 1000.0);
    // the 0.005 above already carried the half up, so cut at two
    // decimals; decimal half-boundaries sit one ulp shy of their binary
    // value, so nudge across before cutting
    let hundredths = (kw.abs() * 100.0 + 1e-9).trunc() * kw.signum();
    let kw = hundredths / 100.0;
    if kw == 0.0 {
        "0.00".to_string()
    } else {
        format!("{:.2}", kw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_applies_power_of_ten() {
        assert!((normalize(500, 1) - 5000.0).abs() < 1e-6);
        assert!((normalize(-200, 1) - -2000.0).abs() < 1e-6);
        assert!((normalize(1234, 0) - 1234.0).abs() < 1e-6);
        assert!((normalize(1234, -2) - 12.34).abs() < 1e-6);
        assert!((normalize(-5, 3) - -5000.0).abs() < 1e-6);
        assert!(normalize(0, 10) == 0.0);
    }

    #[test]
    fn rounding_is_symmetric() {
        for x in [0.001, 0.005, 0.123, 1.005, 99.999] {
            let pos = round_half_away_from_zero(x);
            let neg = round_half_away_from_zero(-x);
            assert!((pos + neg).abs() < 1e-9, "asymmetric at {}", x);
        }
    }

    #[test]
    fn format_kw_rounds_half_up() {
        assert_eq!(format_kw(1000.0), "1.00");
        assert_eq!(format_kw(5000.0), "5.00");
        assert_eq!(format_kw(1234.0), "1.23");
        assert_eq!(format_kw(1236.0), "1.24");
        assert_eq!(format_kw(-2000.0), "-2.00");
        assert_eq!(format_kw(-1236.0), "-1.24");
    }

    #[test]
    fn format_kw_carries_exact_half_cents_up() {
        // half-cent boundaries must visibly round away from zero, even
        // though 1.005 is stored a hair below the boundary in binary
        assert_eq!(format_kw(1005.0), "1.01");
        assert_eq!(format_kw(-1005.0), "-1.01");
        assert_eq!(format_kw(15.0), "0.02");
        // exact hundredths must not be dragged up by the bias
        assert_eq!(format_kw(10.0), "0.01");
        assert_eq!(format_kw(1010.0), "1.01");
    }

    #[test]
    fn format_kw_never_shows_negative_zero() {
        assert_eq!(format_kw(0.0), "0.00");
        assert_eq!(format_kw(-0.0001), "0.00");
        assert_eq!(format_kw(-0.0), "0.00");
    }

    #[test]
    fn derive_matches_sign_conventions() {
        // producing 5kW, exporting 2kW, discharging 1kW
        let snap = PowerFlowSnapshot::derive(5000.0, -2000.0, 1000.0, 76.0);
        assert!((snap.sun_power - 4000.0).abs() < 1e-6);
        assert!((snap.house_usage - 3000.0).abs() < 1e-6);
        assert!((snap.grid_power - -2000.0).abs() < 1e-6);
        assert!((snap.battery_power - 1000.0).abs() < 1e-6);
    }

    #[test]
    fn derive_clamps_night_time_noise() {
        // inverter idle, small negative readings must not show negative sun
        let snap = PowerFlowSnapshot::derive(-2.0, 300.0, 0.0, 50.0);
        assert_eq!(snap.sun_power, 0.0);
        assert!((snap.house_usage - 298.0).abs() < 1e-6);
    }

    #[test]
    fn derive_is_deterministic() {
        let a = PowerFlowSnapshot::derive(4321.0, -123.0, -2500.0, 61.5);
        let b = PowerFlowSnapshot::derive(4321.0, -123.0, -2500.0, 61.5);
        assert_eq!(a, b);
    }

    #[test]
    fn arrows_respect_noise_floor() {
        let base = PowerFlowSnapshot::derive(0.0, 0.0, 0.0, 50.0);
        assert_eq!(base.meter_arrow(), None);
        assert_eq!(base.battery_arrow(), None);

        let quiet = PowerFlowSnapshot::derive(0.0, 9.0, -9.0, 50.0);
        assert_eq!(quiet.meter_arrow(), None);
        assert_eq!(quiet.battery_arrow(), None);

        let exporting = PowerFlowSnapshot::derive(0.0, -15.0, 0.0, 50.0);
        assert_eq!(exporting.meter_arrow(), Some(ArrowDirection::Up));

        let importing = PowerFlowSnapshot::derive(0.0, 15.0, 0.0, 50.0);
        assert_eq!(importing.meter_arrow(), Some(ArrowDirection::Down));

        let charging = PowerFlowSnapshot::derive(0.0, 0.0, -250.0, 50.0);
        assert_eq!(charging.battery_arrow(), Some(ArrowDirection::Up));

        let discharging = PowerFlowSnapshot::derive(0.0, 0.0, 250.0, 50.0);
        assert_eq!(discharging.battery_arrow(), Some(ArrowDirection::Down));
    }
}
