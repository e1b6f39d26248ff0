// GestureWatch - Capture Log Codec
//
// Data-collection firmware streams one `NEW_RUN` header per press followed by
// one comma separated sample row per tick. This parses such a log (captured
// from the serial port) back into runs for replay and offline checks.

use crate::sensor::Sample;

pub const RUN_HEADER: &str = "NEW_RUN";

/// Split a capture log into runs of `A`-axis samples.
///
/// Rows before the first header, rows with the wrong number of fields and
/// rows that do not parse are skipped, as serial logs routinely carry boot
/// chatter and partial lines.
pub fn parse_runs<const A: usize>(log: &str) -> Vec<Vec<Sample<A>>> {
    let mut runs: Vec<Vec<Sample<A>>> = Vec::new();

    for line in log.lines().map(str::trim) {
        if line.is_empty() {
            continue;
        }
        if line == RUN_HEADER {
            runs.push(Vec::new());
            continue;
        }
        let Some(run) = runs.last_mut() else {
            continue;
        };
        match parse_row::<A>(line) {
            Some(sample) => run.push(sample),
            None => log::debug!("skipping log line {:?}", line),
        }
    }
    runs
}

fn parse_row<const A: usize>(line: &str) -> Option<Sample<A>> {
    let mut sample = [0.0f32; A];
    let mut fields = line.split(',').map(str::trim);
    for slot in sample.iter_mut() {
        *slot = fields.next()?.parse().ok()?;
    }
    if fields.next().is_some() {
        return None;
    }
    Some(sample)
}
