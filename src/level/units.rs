//! Volume and length conversions for display.
//!
//! Stateless. No rounding beyond `f32` precision; decimal places are the
//! display adapter's concern.

/// Liters in one US gallon, as used by the device.
pub const LITERS_PER_GALLON: f32 = 3.785;

pub const CM_PER_METER: f32 = 100.0;

pub fn liters_to_gallons(liters: f32) -> f32 {
    liters / LITERS_PER_GALLON
}

pub fn gallons_to_liters(gallons: f32) -> f32 {
    gallons * LITERS_PER_GALLON
}

pub fn cm_to_meters(cm: f32) -> f32 {
    cm / CM_PER_METER
}

pub fn meters_to_cm(meters: f32) -> f32 {
    meters * CM_PER_METER
}
