//! Adapters from `embedded-hal` 1.0 pins to the platform GPIO traits
//!
//! Board support crates (embassy-stm32 on the target, `embedded-hal-mock` in
//! tests) hand out `embedded_hal::digital` pins; the controller is written
//! against [`platform::InputPin`] / [`platform::OutputPin`]. These newtypes
//! bridge the two without touching either side.

use embedded_hal::digital;

/// An `embedded-hal` input pin seen as a [`platform::InputPin`].
pub struct HalInput<P>(pub P);

impl<P: digital::InputPin> platform::InputPin for HalInput<P> {
    type Error = P::Error;

    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.0.is_high()
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.0.is_low()
    }
}

/// An `embedded-hal` output pin seen as a [`platform::OutputPin`].
pub struct HalOutput<P>(pub P);

impl<P: digital::OutputPin> platform::OutputPin for HalOutput<P> {
    type Error = P::Error;

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.0.set_high()
    }

    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.0.set_low()
    }
}
