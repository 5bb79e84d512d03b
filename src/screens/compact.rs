use crate::display::Surface;
use crate::metrics::{format_kw, PowerFlowSnapshot};
use crate::prelude::*;

const LINE_X: i32 = 2;
const LINE_HEIGHT: i32 = 10;

/// The compact text screen: one line per quantity, sign-aware kilowatt
/// values; the battery line carries the state of energy as well.
pub fn render<S: Surface>(surface: &mut S, snapshot: &PowerFlowSnapshot) -> Result<()> {
    let lines = [
        format!("S: {}kW", format_kw(snapshot.sun_power)),
        format!("H: {}kW", format_kw(snapshot.house_usage)),
        format!("M: {}kW", format_kw(snapshot.grid_power)),
        format!(
            "B: {:.0}% {}kW",
            snapshot.battery_soe,
            format_kw(snapshot.battery_power)
        ),
    ];

    surface.clear();
    for (i, line) in lines.iter().enumerate() {
        surface.draw_text(LINE_X, 2 + i as i32 * LINE_HEIGHT, line)?;
    }
    surface.flush()
}
