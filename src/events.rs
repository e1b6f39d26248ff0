// GestureWatch - Sensor Data & Recorder Events

// ---------------------------------------------------------------------------
// Sensor Data (6-axis IMU reading from the MPU9250)
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ImuSample {
    pub ax: f32,
    pub ay: f32,
    pub az: f32,
    pub gx: f32,
    pub gy: f32,
    pub gz: f32,
}

impl ImuSample {
    /// Axis order used by the recorder and the trained models.
    pub fn axes(&self) -> [f32; 6] {
        [self.ax, self.ay, self.az, self.gx, self.gy, self.gz]
    }

    pub fn accel(&self) -> [f32; 3] {
        [self.ax, self.ay, self.az]
    }
}

// ---------------------------------------------------------------------------
// Recorder Events - what a single poll tick did
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderEvent {
    /// Nothing happened (idle, button released).
    None,
    /// Falling edge: a new capture started, buffer cleared.
    Started,
    /// One sample appended; `count` is the new buffer length.
    Sampled { count: usize },
    /// The sensor read failed; the tick was skipped.
    SampleSkipped,
    /// Buffer is at capacity; further samples of this press are dropped.
    Full,
    /// Rising edge: capture ended with `count` samples.
    Finished { count: usize },
}
