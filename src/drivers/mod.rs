pub mod button;
pub mod imu;
pub mod uart;
