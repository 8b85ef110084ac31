//! Full example code for bringing up an SSD1306 text device. This runs on an STM32F303RE, using a
//! 128x64 SSD1306 module at address 0x3C on I2C1 (PB6 SCL, PB7 SDA).
//!
//! There is no operating system to register device nodes with, so the host accepts every
//! resource and the "device" is driven directly through its `CharDevice` interface.

#![deny(unsafe_code)]
#![no_main]
#![no_std]

extern crate chrdisp;
extern crate cortex_m;
extern crate stm32f30x;
extern crate stm32f30x_hal as hal;
#[macro_use]
extern crate cortex_m_rt;
extern crate panic_abort;

use chrdisp::interface::i2c::DEFAULT_ADDRESS;
use chrdisp::{CharDevice, Config, DeviceNames, Host, HostError, Resource, Ssd1306I2cDevice};
use cortex_m::asm;
use cortex_m_rt::ExceptionFrame;
use hal::i2c::I2c;
use hal::prelude::*;

entry!(main);

exception!(*, default_handler);
exception!(HardFault, hard_fault);

fn hard_fault(_ef: &ExceptionFrame) -> ! {
    asm::bkpt();
    loop {}
}

fn default_handler(_irqn: i16) {
    loop {}
}

/// Accepts every registration.
struct BareMetal;

impl Host for BareMetal {
    fn acquire(&mut self, _resource: Resource, _names: &DeviceNames) -> Result<(), HostError> {
        Ok(())
    }

    fn release(&mut self, _resource: Resource, _names: &DeviceNames) {}
}

fn main() -> ! {
    // Get peripherals and set up RCC.
    let cp = cortex_m::Peripherals::take().unwrap();
    let dp = stm32f30x::Peripherals::take().unwrap();

    let mut flash = dp.FLASH.constrain();
    let mut rcc = dp.RCC.constrain();
    let clocks = rcc.cfgr.freeze(&mut flash.acr);
    let mut delay = hal::delay::Delay::new(cp.SYST, clocks);

    // I2C1 is Alternate Function 4 for GPIOs PB6,7.
    let mut gpiob = dp.GPIOB.split(&mut rcc.ahb);
    let scl = gpiob.pb6.into_af4(&mut gpiob.moder, &mut gpiob.afrl);
    let sda = gpiob.pb7.into_af4(&mut gpiob.moder, &mut gpiob.afrl);
    let i2c = I2c::i2c1(dp.I2C1, (scl, sda), 400.khz(), clocks, &mut rcc.apb1);

    // Bring up the display with a greeting and a brighter contrast than the stock 0x80.
    let config = Config::new().contrast(0xCF).greeting("Hello World\n");
    let mut disp =
        Ssd1306I2cDevice::attach_i2c(i2c, DEFAULT_ADDRESS, config, BareMetal, &mut delay)
            .unwrap();

    // Replace the greeting with a message of our own, as a write to the device node would.
    disp.write(&b"STM32F303 up\nI2C1 @ 400kHz"[..]).unwrap();

    loop {
        asm::wfi();
    }
}
