use crate::display::bitmaps::{
    ARROW_DOWN, ARROW_RIGHT, ARROW_UP, ARROW_WIDTH, BATTERY_ICON, HOUSE_ICON, ICON_WIDTH,
    PYLON_ICON, SUN_ICON,
};
use crate::display::Surface;
use crate::metrics::{format_kw, ArrowDirection, PowerFlowSnapshot};
use crate::prelude::*;

// quadrant anchors: array top-left, house top-right, grid bottom-left,
// battery bottom-right
const SUN_ICON_POS: (i32, i32) = (0, 0);
const HOUSE_ICON_POS: (i32, i32) = (112, 0);
const PYLON_ICON_POS: (i32, i32) = (0, 48);
const BATTERY_ICON_POS: (i32, i32) = (112, 48);

const SUN_TEXT_POS: (i32, i32) = (20, 4);
const HOUSE_TEXT_POS: (i32, i32) = (66, 4);
const GRID_TEXT_POS: (i32, i32) = (20, 52);
const BATTERY_TEXT_POS: (i32, i32) = (66, 52);

const SUN_ARROW_POS: (i32, i32) = (60, 14);
const METER_ARROW_POS: (i32, i32) = (4, 36);
const BATTERY_ARROW_POS: (i32, i32) = (116, 36);

// battery gauge, sitting above the battery icon
const GAUGE_FRAME: (i32, i32, u32, u32) = (88, 26, 38, 8);
const GAUGE_SPAN_PX: f32 = 34.0;

/// Width of the gauge fill for a state of energy percentage.
pub fn gauge_width(soe: f32) -> u32 {
    (soe.clamp(0.0, 100.0) / 100.0 * GAUGE_SPAN_PX).round() as u32
}

/// The iconographic dashboard: quadrant icons with numeric fields, a
/// battery gauge, and flow arrows gated by the noise floor.
pub fn render<S: Surface>(surface: &mut S, snapshot: &PowerFlowSnapshot) -> Result<()> {
    surface.clear();

    surface.draw_bitmap(SUN_ICON_POS.0, SUN_ICON_POS.1, ICON_WIDTH, &SUN_ICON)?;
    surface.draw_bitmap(HOUSE_ICON_POS.0, HOUSE_ICON_POS.1, ICON_WIDTH, &HOUSE_ICON)?;
    surface.draw_bitmap(PYLON_ICON_POS.0, PYLON_ICON_POS.1, ICON_WIDTH, &PYLON_ICON)?;
    surface.draw_bitmap(
        BATTERY_ICON_POS.0,
        BATTERY_ICON_POS.1,
        ICON_WIDTH,
        &BATTERY_ICON,
    )?;

    surface.draw_text(
        SUN_TEXT_POS.0,
        SUN_TEXT_POS.1,
        &format!("{}kW", format_kw(snapshot.sun_power)),
    )?;
    surface.draw_text(
        HOUSE_TEXT_POS.0,
        HOUSE_TEXT_POS.1,
        &format!("{}kW", format_kw(snapshot.house_usage)),
    )?;
    surface.draw_text(
        GRID_TEXT_POS.0,
        GRID_TEXT_POS.1,
        &format!("{}kW", format_kw(snapshot.grid_power)),
    )?;
    surface.draw_text(
        BATTERY_TEXT_POS.0,
        BATTERY_TEXT_POS.1,
        &format!("{:.0}%", snapshot.battery_soe),
    )?;

    let (gx, gy, gw, gh) = GAUGE_FRAME;
    surface.draw_rect(gx, gy, gw, gh)?;
    let fill = gauge_width(snapshot.battery_soe);
    if fill > 0 {
        surface.fill_rect(gx + 2, gy + 2, fill, gh - 4)?;
    }

    if snapshot.sun_flow_active() {
        surface.draw_bitmap(SUN_ARROW_POS.0, SUN_ARROW_POS.1, ARROW_WIDTH, &ARROW_RIGHT)?;
    }
    if let Some(direction) = snapshot.meter_arrow() {
        surface.draw_bitmap(
            METER_ARROW_POS.0,
            METER_ARROW_POS.1,
            ARROW_WIDTH,
            arrow_glyph(direction),
        )?;
    }
    if let Some(direction) = snapshot.battery_arrow() {
        surface.draw_bitmap(
            BATTERY_ARROW_POS.0,
            BATTERY_ARROW_POS.1,
            ARROW_WIDTH,
            arrow_glyph(direction),
        )?;
    }

    surface.flush()
}

fn arrow_glyph(direction: ArrowDirection) -> &'static [u8] {
    match direction {
        ArrowDirection::Up => &ARROW_UP,
        ArrowDirection::Down => &ARROW_DOWN,
    }
}
