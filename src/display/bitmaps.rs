//! 1-bpp bitmap tables for the dashboard screen. Rows are MSB-first,
//! padded to a byte boundary (the ImageRaw layout).

pub const ICON_WIDTH: u32 = 16;
pub const ARROW_WIDTH: u32 = 8;

#[rustfmt::skip]
pub const SUN_ICON: [u8; 32] = [
    0x01, 0x80,
    0x01, 0x80,
    0x20, 0x04,
    0x13, 0xc8,
    0x07, 0xe0,
    0x0f, 0xf0,
    0xcf, 0xf3,
    0xcf, 0xf3,
    0x0f, 0xf0,
    0x07, 0xe0,
    0x13, 0xc8,
    0x20, 0x04,
    0x01, 0x80,
    0x01, 0x80,
    0x00, 0x00,
    0x00, 0x00,
];

#[rustfmt::skip]
pub const HOUSE_ICON: [u8; 32] = [
    0x01, 0x80,
    0x03, 0xc0,
    0x07, 0xe0,
    0x0f, 0xf0,
    0x1f, 0xf8,
    0x3f, 0xfc,
    0x7f, 0xfe,
    0x30, 0x0c,
    0x30, 0x0c,
    0x30, 0x0c,
    0x31, 0x8c,
    0x31, 0x8c,
    0x31, 0x8c,
    0x31, 0x8c,
    0x30, 0x0c,
    0x3f, 0xfc,
];

#[rustfmt::skip]
pub const PYLON_ICON: [u8; 32] = [
    0x01, 0x80,
    0x02, 0x40,
    0x7f, 0xfe,
    0x02, 0x40,
    0x3f, 0xfc,
    0x04, 0x20,
    0x04, 0x20,
    0x02, 0x40,
    0x03, 0xc0,
    0x02, 0x40,
    0x04, 0x20,
    0x08, 0x10,
    0x10, 0x08,
    0x20, 0x04,
    0x40, 0x02,
    0xff, 0xff,
];

#[rustfmt::skip]
pub const BATTERY_ICON: [u8; 32] = [
    0x00, 0x00,
    0x00, 0x00,
    0x00, 0x00,
    0x7f, 0xfc,
    0x40, 0x04,
    0x40, 0x07,
    0x40, 0x07,
    0x40, 0x07,
    0x40, 0x07,
    0x40, 0x04,
    0x7f, 0xfc,
    0x00, 0x00,
    0x00, 0x00,
    0x00, 0x00,
    0x00, 0x00,
    0x00, 0x00,
];

#[rustfmt::skip]
pub const ARROW_UP: [u8; 8] = [
    0x18,
    0x3c,
    0x7e,
    0xff,
    0x18,
    0x18,
    0x18,
    0x18,
];

#[rustfmt::skip]
pub const ARROW_DOWN: [u8; 8] = [
    0x18,
    0x18,
    0x18,
    0x18,
    0xff,
    0x7e,
    0x3c,
    0x18,
];

#[rustfmt::skip]
pub const ARROW_RIGHT: [u8; 8] = [
    0x08,
    0x0c,
    0xfe,
    0xff,
    0xfe,
    0x0c,
    0x08,
    0x00,
];
