// GestureWatch - Capture Task
//
// The whole application runs in this one loop: poll the button, let the
// controller sample / classify / report, then sleep out the rest of the
// tick. The tick period is both the sensor sampling interval and the
// button debounce.

use std::thread;
use std::time::{Duration, Instant};

use crate::classifier::GestureClassifier;
use crate::config::*;
use crate::controller::GestureController;
use crate::drivers::button::TriggerButton;
use crate::report::LineSink;
use crate::sensor::SampleSource;

pub fn capture_task<C, S, Src>(
    button: TriggerButton<'static>,
    mut source: Src,
    mut controller: GestureController<'static, AXIS_COUNT, C, S>,
) -> !
where
    C: GestureClassifier,
    S: LineSink,
    Src: SampleSource<AXIS_COUNT>,
{
    log::info!("Capture task started ({} ms tick)", POLL_INTERVAL_MS);

    let interval = Duration::from_millis(POLL_INTERVAL_MS);

    loop {
        let tick_start = Instant::now();

        if let Err(e) = controller.tick(button.is_pressed(), &mut source) {
            log::warn!("report write failed: {}", e);
        }

        // Sleep for the remainder of the tick; classification ticks overrun.
        let elapsed = tick_start.elapsed();
        if elapsed < interval {
            thread::sleep(interval - elapsed);
        }
    }
}
