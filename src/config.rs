// GestureWatch - Hardware & System Configuration
// Target: Seeed Studio Xiao ESP32-C3 (RISC-V) + MPU9250 breakout

use crate::controller::CaptureMode;
use crate::resample::OversizePolicy;

// ---------------------------------------------------------------------------
// GPIO Pin Definitions (Xiao ESP32-C3 pinout)
// ---------------------------------------------------------------------------
pub const PIN_BUTTON: i32 = 3;      // D1/A1 - Trigger button (INPUT_PULLUP, active LOW)
pub const PIN_I2C_SDA: i32 = 6;     // D4    - I2C data line
pub const PIN_I2C_SCL: i32 = 7;     // D5    - I2C clock line
pub const PIN_UART_TX: i32 = 21;    // D6    - Report UART TX
pub const PIN_UART_RX: i32 = 20;    // D7    - Report UART RX

// ---------------------------------------------------------------------------
// I2C Bus
// ---------------------------------------------------------------------------
pub const I2C_ADDR_MPU9250: u8 = 0x69; // AD0 pulled high
pub const I2C_BAUDRATE_KHZ: u32 = 400;
pub const I2C_TIMEOUT_TICKS: u32 = 1000; // FreeRTOS ticks

// ---------------------------------------------------------------------------
// Report UART
// ---------------------------------------------------------------------------
pub const UART_BAUDRATE: u32 = 115_200;

/// Longest line the reporter will ever emit, terminator included.
/// Sized for the all-class score dump: header + CLASS_COUNT * "<label>: 0.00 ".
pub const REPORT_LINE_MAX: usize = 256;

// ---------------------------------------------------------------------------
// Task Stack Sizes (bytes)
// ---------------------------------------------------------------------------
pub const STACK_CAPTURE: usize = 16 * 1024;

// ---------------------------------------------------------------------------
// Timing (milliseconds)
// ---------------------------------------------------------------------------
// One tick = one button poll = one sensor sample. Keep it at or above the
// sensor output period (1 kHz / (1 + SAMPLE_RATE_DIVIDER) = ~166 Hz -> 6 ms).
pub const POLL_INTERVAL_MS: u64 = 6;

// ---------------------------------------------------------------------------
// Gesture capture
// ---------------------------------------------------------------------------
pub const AXIS_COUNT: usize = 6;            // accX..accZ, gyrX..gyrZ
pub const MAX_RAW_SAMPLES: usize = 1000;    // ~6 s at 166 Hz
pub const MODEL_WINDOW_LEN: usize = 100;    // rows the model was trained on
pub const FEATURE_COUNT: usize = MODEL_WINDOW_LEN * AXIS_COUNT; // 600

/// Captures shorter than this are still classified, but flagged as stretched.
pub const MIN_CONFIDENT_SAMPLES: usize = MODEL_WINDOW_LEN / 4;

pub const OVERSIZE_POLICY: OversizePolicy = OversizePolicy::Resample;

#[cfg(not(feature = "data-collection"))]
pub const CAPTURE_MODE: CaptureMode = CaptureMode::Classify;
#[cfg(feature = "data-collection")]
pub const CAPTURE_MODE: CaptureMode = CaptureMode::Collect;

// ---------------------------------------------------------------------------
// Model
// ---------------------------------------------------------------------------
pub const CLASS_COUNT: usize = 6;

/// Class names in model output order. Class id `n` (1-based) maps to
/// `CLASS_LABELS[n - 1]`; id 0 is "unknown".
pub const CLASS_LABELS: [&str; CLASS_COUNT] = [
    "updown",
    "rightleft",
    "lightning",
    "leftright",
    "downup",
    "circle",
];

// ---------------------------------------------------------------------------
// MPU9250 register configuration
// ---------------------------------------------------------------------------
pub const SAMPLE_RATE_DIVIDER: u8 = 5;  // 1 kHz / (1 + 5) = ~166 Hz
pub const DLPF_CONFIG: u8 = 0x03;       // 41 Hz gyro bandwidth
pub const ACCEL_SCALE_2G: f32 = 16384.0; // LSB/g   at ±2 g
pub const GYRO_SCALE_250: f32 = 131.0;   // LSB/°/s at ±250 °/s

/// Runtime knobs of the capture pipeline. `Default` mirrors the constants
/// above; the replay tool and tests override individual fields.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub capacity: usize,
    pub window_len: usize,
    pub oversize: OversizePolicy,
    pub mode: CaptureMode,
    pub min_confident_samples: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            capacity: MAX_RAW_SAMPLES,
            window_len: MODEL_WINDOW_LEN,
            oversize: OVERSIZE_POLICY,
            mode: CAPTURE_MODE,
            min_confident_samples: MIN_CONFIDENT_SAMPLES,
        }
    }
}
