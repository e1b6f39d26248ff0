// GestureWatch - Sample Sources
//
// A sample source turns one sensor read into a fixed-arity row of scalars.
// The arity is a const generic so 3-axis and 6-axis pipelines are checked at
// compile time.

use crate::events::ImuSample;

/// One sensor reading: `A` scalars in model axis order.
pub type Sample<const A: usize> = [f32; A];

pub trait SampleSource<const A: usize> {
    /// Read one sample. Must return within one poll interval.
    fn read(&mut self) -> anyhow::Result<Sample<A>>;
}

impl<const A: usize, S: SampleSource<A> + ?Sized> SampleSource<A> for &mut S {
    fn read(&mut self) -> anyhow::Result<Sample<A>> {
        (**self).read()
    }
}

/// Anything producing full IMU readings (the MPU9250 driver, a replay file).
pub trait ImuReader {
    fn read_imu(&mut self) -> anyhow::Result<ImuSample>;
}

/// Accelerometer + gyroscope, 6 axes.
pub struct SixAxis<R>(pub R);

impl<R: ImuReader> SampleSource<6> for SixAxis<R> {
    fn read(&mut self) -> anyhow::Result<Sample<6>> {
        Ok(self.0.read_imu()?.axes())
    }
}

/// Accelerometer only, 3 axes (gyro discarded).
pub struct AccelOnly<R>(pub R);

impl<R: ImuReader> SampleSource<3> for AccelOnly<R> {
    fn read(&mut self) -> anyhow::Result<Sample<3>> {
        Ok(self.0.read_imu()?.accel())
    }
}
