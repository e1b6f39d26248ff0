// GestureWatch - Report UART

use esp_idf_hal::uart::UartDriver;

use crate::report::LineSink;

pub struct UartSink<'d> {
    uart: UartDriver<'d>,
}

impl<'d> UartSink<'d> {
    pub fn new(uart: UartDriver<'d>) -> Self {
        Self { uart }
    }
}

impl LineSink for UartSink<'_> {
    /// Blocks until every byte is queued in the TX FIFO.
    fn write_line(&mut self, line: &str) -> anyhow::Result<()> {
        let mut pending = line.as_bytes();
        while !pending.is_empty() {
            let written = self.uart.write(pending)?;
            pending = &pending[written..];
        }
        Ok(())
    }
}
