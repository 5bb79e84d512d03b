use crate::display::Surface;
use crate::prelude::*;

const LINE_X: i32 = 2;
const LINE_HEIGHT: i32 = 10;

/// Renders the connection-status screen: a header plus up to three
/// detail lines. Empty lines are skipped.
pub fn render<S: Surface>(surface: &mut S, lines: &[&str]) -> Result<()> {
    surface.clear();

    for (i, line) in lines.iter().take(4).enumerate() {
        if !line.is_empty() {
            surface.draw_text(LINE_X, 2 + i as i32 * LINE_HEIGHT, line)?;
        }
    }

    surface.flush()
}

/// The two-line WiFi state screen shown while the network is not online.
pub fn render_network<S: Surface>(surface: &mut S, network: NetworkState) -> Result<()> {
    render(surface, &["Init WiFi connection", network.label()])
}
