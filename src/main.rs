// GestureWatch - Firmware Entry Point
//
// Boot sequence:
//   1. Bring up the report UART and print the IMU WHO_AM_I.
//   2. Configure the MPU9250 (fatal on failure).
//   3. Initialise the classifier (fatal on failure).
//   4. Run the capture loop forever: hold the button, move, release.
//
// Fatal errors are reported on the UART and the firmware halts: without a
// working sensor or model there is nothing useful left to do.

#[cfg(target_os = "espidf")]
fn main() -> anyhow::Result<()> {
    firmware::run()
}

#[cfg(not(target_os = "espidf"))]
fn main() {
    eprintln!("gesturewatch firmware only runs on ESP-IDF targets; use the `replay` binary on the host");
    std::process::exit(1);
}

#[cfg(target_os = "espidf")]
mod firmware {
    use std::thread;
    use std::time::Duration;

    use esp_idf_hal::gpio::{AnyIOPin, InputPin, PinDriver};
    use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
    use esp_idf_hal::prelude::*;
    use esp_idf_hal::uart::{config::Config as UartConfig, UartDriver};

    use gesturewatch::classifier::ScoreClassifier;
    use gesturewatch::config::*;
    use gesturewatch::controller::GestureController;
    use gesturewatch::drivers::button::TriggerButton;
    use gesturewatch::drivers::imu::{Mpu9250, SampleUnits};
    use gesturewatch::drivers::uart::UartSink;
    use gesturewatch::pipeline::GesturePipeline;
    use gesturewatch::report::Reporter;
    use gesturewatch::sensor::SixAxis;
    use gesturewatch::tasks;

    pub fn run() -> anyhow::Result<()> {
        // Link esp-idf-sys runtime patches and initialise logging.
        esp_idf_svc::sys::link_patches();
        esp_idf_svc::log::EspLogger::initialize_default();
        log::info!("GestureWatch firmware starting");

        // ---- Peripherals --------------------------------------------------
        let peripherals = Peripherals::take()?;

        // ---- Report UART --------------------------------------------------
        let uart = UartDriver::new(
            peripherals.uart1,
            peripherals.pins.gpio21, // TX
            peripherals.pins.gpio20, // RX
            Option::<AnyIOPin>::None,
            Option::<AnyIOPin>::None,
            &UartConfig::default().baudrate(Hertz(UART_BAUDRATE)),
        )?;
        let mut reporter = Reporter::new(UartSink::new(uart), &CLASS_LABELS);

        // ---- IMU ----------------------------------------------------------
        let i2c_config = I2cConfig::new().baudrate(I2C_BAUDRATE_KHZ.kHz().into());
        let i2c = I2cDriver::new(
            peripherals.i2c0,
            peripherals.pins.gpio6, // SDA
            peripherals.pins.gpio7, // SCL
            &i2c_config,
        )?;
        let mut imu = Mpu9250::new(i2c, SampleUnits::Raw);

        match imu.who_am_i() {
            Ok(id) => reporter.who_am_i(id)?,
            Err(e) => {
                log::warn!("WHO_AM_I read failed: {}", e);
                reporter.text("MPU9250: WHO_AM_I read failed")?;
            }
        }

        if let Err(e) = imu.init() {
            log::error!("MPU9250 init failed: {}", e);
            let _ = reporter.text("MPU9250: init failed");
            halt();
        }

        // ---- Classifier ---------------------------------------------------
        let classifier = match ScoreClassifier::new(AXIS_COUNT, CLASS_COUNT) {
            Ok(c) => c,
            Err(e) => {
                log::error!("classifier init failed: {}", e);
                let _ = reporter.error(&e);
                halt();
            }
        };

        // ---- Trigger button -----------------------------------------------
        let button = TriggerButton::new(PinDriver::input(peripherals.pins.gpio3.downgrade_input())?);

        let config = PipelineConfig::default();
        log::info!("Boot complete - {:?}", config);
        let controller = GestureController::new(GesturePipeline::new(config, classifier), reporter);

        // ---- Capture loop (own FreeRTOS task for a known stack size) -------
        thread::Builder::new()
            .name("capture".into())
            .stack_size(STACK_CAPTURE)
            .spawn(move || {
                tasks::capture::capture_task(button, SixAxis(imu), controller);
            })?;

        // Main thread has nothing left to do - park it forever.
        loop {
            thread::sleep(Duration::from_secs(60));
        }
    }

    /// Stop here after a fatal init error; the report line is already out.
    fn halt() -> ! {
        log::error!("halted");
        loop {
            thread::sleep(Duration::from_secs(60));
        }
    }
}
