mod input;

use esp_idf_svc::hal::{delay::FreeRtos, gpio::PinDriver, peripherals::Peripherals};
use esp_idf_svc::sys::{self, EspError};
use mini_button::{Config, LongPress, RepeatButton, RepeatConfig};

use input::{EspClock, EspLine};

const POWER_BUTTON_GPIO: i32 = 3;
const POWER_LONG_PRESS_MS: u32 = 2000;
const DEBOUNCE_MS: u32 = 25;
const REPEAT_DELAY_MS: u32 = 600;
const REPEAT_RATE_MS: u32 = 150;
const POLL_MS: u32 = 10;

/// Sleep until the power button reads pressed again.
///
/// The wake level follows the button's polarity, so an active-high wiring
/// wakes on a high level.
fn sleep_until_pressed(gpio: i32, config: &Config) {
    let (wake_mode, level) = if config.invert() {
        (sys::esp_deepsleep_gpio_wake_up_mode_t_ESP_GPIO_WAKEUP_GPIO_LOW, "low")
    } else {
        (sys::esp_deepsleep_gpio_wake_up_mode_t_ESP_GPIO_WAKEUP_GPIO_HIGH, "high")
    };
    log::info!("Entering deep sleep, wake on GPIO{} {}", gpio, level);
    unsafe {
        sys::esp_deep_sleep_enable_gpio_wakeup(1u64 << gpio, wake_mode);
        sys::esp_deep_sleep_start();
    }
}

fn main() -> Result<(), EspError> {
    esp_idf_svc::sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();

    let peripherals = Peripherals::take()?;
    let line = EspLine::new(PinDriver::input(peripherals.pins.gpio3)?);

    // Power button: contact to ground, internal pull-up.
    let config = Config::builder().debounce_ms(DEBOUNCE_MS).build();
    let mut power = RepeatButton::new(
        line,
        EspClock,
        config,
        RepeatConfig::new(REPEAT_DELAY_MS, REPEAT_RATE_MS),
    );
    power.begin().map_err(|e| e.into_inner().into_esp())?;

    // Watches the physical button so repeat blips don't restart the count.
    let mut power_off = LongPress::new(EspClock, POWER_LONG_PRESS_MS);
    power_off.begin();

    log::info!(
        "Polling power button every {}ms (debounce {}ms)",
        POLL_MS,
        DEBOUNCE_MS
    );

    loop {
        power.read();
        power_off.read(power.button());

        if power.was_pressed() {
            match power.repeat_count() {
                0 => log::info!("Power button press"),
                n => log::info!("Power button repeat {}", n),
            }
        } else if power.button().was_released() {
            log::info!("Power button released");
        }

        if power_off.was_pressed() {
            log::info!(
                "Power button held for {}ms - powering off!",
                power_off.threshold_ms()
            );
            while power.button().is_pressed() {
                FreeRtos::delay_ms(POLL_MS);
                power.read();
            }
            sleep_until_pressed(POWER_BUTTON_GPIO, power.button().config());
        }

        FreeRtos::delay_ms(POLL_MS);
    }
}
