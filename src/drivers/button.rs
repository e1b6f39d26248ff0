// GestureWatch - Trigger Button
//
// Plain level read, no debounce timer: the capture loop polls at a fixed
// interval and that interval is the debounce.

use esp_idf_hal::gpio::{AnyInputPin, Input, PinDriver};

use crate::config::PIN_BUTTON;

pub struct TriggerButton<'d> {
    pin: PinDriver<'d, AnyInputPin, Input>,
}

impl<'d> TriggerButton<'d> {
    pub fn new(pin: PinDriver<'d, AnyInputPin, Input>) -> Self {
        // PinDriver::input already set the direction; enable the pull-up
        // through the raw API since the downgraded pin type has no set_pull.
        unsafe {
            esp_idf_sys::gpio_set_pull_mode(
                PIN_BUTTON,
                esp_idf_sys::gpio_pull_mode_t_GPIO_PULLUP_ONLY,
            );
        }
        Self { pin }
    }

    /// Active LOW with pull-up.
    pub fn is_pressed(&self) -> bool {
        self.pin.is_low()
    }
}
