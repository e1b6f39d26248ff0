// GestureWatch - Capture Controller
//
// One owned state struct driven by the poll loop: each tick feeds the trigger
// level to the recorder and reacts to what the recorder reports. Everything
// (buffer, count, previous trigger level) lives here; no globals.

use crate::classifier::{Classification, GestureClassifier};
use crate::events::RecorderEvent;
use crate::pipeline::GesturePipeline;
use crate::recorder::GestureRecorder;
use crate::report::{LineSink, Reporter};
use crate::sensor::SampleSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureMode {
    /// Record while held, classify on release.
    Classify,
    /// Stream every recorded sample as a CSV row for training data.
    Collect,
}

pub struct GestureController<'t, const A: usize, C, S> {
    recorder: GestureRecorder<A>,
    pipeline: GesturePipeline<'t, C>,
    reporter: Reporter<S>,
    last: Option<Classification>,
}

impl<'t, const A: usize, C: GestureClassifier, S: LineSink> GestureController<'t, A, C, S> {
    /// Collect mode streams rows as they are taken, so its recorder is not
    /// bounded by `capacity`.
    pub fn new(pipeline: GesturePipeline<'t, C>, reporter: Reporter<S>) -> Self {
        let recorder = match pipeline.config().mode {
            CaptureMode::Classify => GestureRecorder::new(pipeline.config().capacity),
            CaptureMode::Collect => GestureRecorder::streaming(),
        };
        Self {
            recorder,
            pipeline,
            reporter,
            last: None,
        }
    }

    pub fn recorder(&self) -> &GestureRecorder<A> {
        &self.recorder
    }

    pub fn reporter(&self) -> &Reporter<S> {
        &self.reporter
    }

    pub fn pipeline(&self) -> &GesturePipeline<'t, C> {
        &self.pipeline
    }

    /// Result of the most recent successful classification.
    pub fn last_result(&self) -> Option<&Classification> {
        self.last.as_ref()
    }

    fn mode(&self) -> CaptureMode {
        self.pipeline.config().mode
    }

    /// Run one poll tick. Only sink write failures are returned; sensor and
    /// classifier failures are reported and absorbed here.
    pub fn tick<Src: SampleSource<A>>(
        &mut self,
        pressed: bool,
        source: &mut Src,
    ) -> anyhow::Result<RecorderEvent> {
        let event = self.recorder.poll(pressed, source);

        match (event, self.mode()) {
            (RecorderEvent::Started, CaptureMode::Classify) => {
                log::info!("recording started");
                self.reporter.recording_started()?;
            }
            (RecorderEvent::Started, CaptureMode::Collect) => {
                self.reporter.new_run()?;
            }
            (RecorderEvent::Sampled { .. }, CaptureMode::Collect) => {
                if let Some(sample) = self.recorder.samples().last() {
                    self.reporter.sample(sample)?;
                }
            }
            (RecorderEvent::Finished { count }, CaptureMode::Classify) => {
                self.finish(count)?;
            }
            (RecorderEvent::Finished { count }, CaptureMode::Collect) => {
                log::info!("run finished with {} samples", count);
            }
            _ => {}
        }

        Ok(event)
    }

    fn finish(&mut self, count: usize) -> anyhow::Result<()> {
        if count == 0 {
            log::info!("capture ended without samples");
            return self.reporter.no_samples();
        }

        log::info!("capture ended with {} samples, classifying", count);
        match self.pipeline.run(self.recorder.samples()) {
            Ok(outcome) => {
                let short = outcome.stretched.then_some(outcome.captured);
                self.reporter.result(&outcome.classification, short)?;
                self.last = Some(outcome.classification);
            }
            Err(e) => {
                log::error!("classification failed: {}", e);
                self.reporter.error(&e)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::classifier::ClassifierKind;
    use crate::config::{PipelineConfig, CLASS_LABELS};
    use crate::error::GestureError;
    use crate::report::tests::Captured;
    use crate::sensor::Sample;

    struct Ramp(f32);

    impl SampleSource<3> for Ramp {
        fn read(&mut self) -> anyhow::Result<Sample<3>> {
            self.0 += 1.0;
            Ok([self.0; 3])
        }
    }

    /// Counts calls; fails with `fail_with` when set.
    struct Counting {
        calls: Rc<Cell<usize>>,
        fail_with: Option<i32>,
    }

    impl GestureClassifier for Counting {
        fn kind(&self) -> ClassifierKind {
            ClassifierKind::ScoreVector
        }

        fn class_count(&self) -> usize {
            2
        }

        fn classify(&mut self, _features: &[f32]) -> Result<Classification, GestureError> {
            self.calls.set(self.calls.get() + 1);
            match self.fail_with {
                Some(code) => Err(GestureError::Classifier(code)),
                None => Ok(Classification::from_index(Some(1), vec![0.25, 0.75])),
            }
        }
    }

    fn controller(
        mode: CaptureMode,
        fail_with: Option<i32>,
    ) -> (GestureController<'static, 3, Counting, Captured>, Rc<Cell<usize>>) {
        let calls = Rc::new(Cell::new(0));
        let cfg = PipelineConfig {
            window_len: 5,
            min_confident_samples: 2,
            mode,
            ..PipelineConfig::default()
        };
        let clf = Counting { calls: Rc::clone(&calls), fail_with };
        let ctl = GestureController::new(
            GesturePipeline::new(cfg, clf),
            Reporter::new(Captured::default(), &CLASS_LABELS),
        );
        (ctl, calls)
    }

    fn with_capacity(mode: CaptureMode, capacity: usize) -> GestureController<'static, 3, Counting, Captured> {
        let cfg = PipelineConfig {
            window_len: 5,
            capacity,
            mode,
            ..PipelineConfig::default()
        };
        let clf = Counting { calls: Rc::new(Cell::new(0)), fail_with: None };
        GestureController::new(GesturePipeline::new(cfg, clf), Reporter::new(Captured::default(), &CLASS_LABELS))
    }

    fn press(ctl: &mut GestureController<'static, 3, Counting, Captured>, ticks: usize) {
        let mut src = Ramp(0.0);
        ctl.tick(true, &mut src).unwrap();
        for _ in 0..ticks {
            ctl.tick(true, &mut src).unwrap();
        }
        ctl.tick(false, &mut src).unwrap();
    }

    #[test]
    fn test_empty_press_skips_classifier() {
        let (mut ctl, calls) = controller(CaptureMode::Classify, None);
        press(&mut ctl, 0);
        assert_eq!(calls.get(), 0);
        assert_eq!(ctl.reporter().sink().0, vec!["Recording...\r\n", "No samples captured\r\n"]);
        assert!(ctl.last_result().is_none());
    }

    #[test]
    fn test_press_classifies_and_reports() {
        let (mut ctl, calls) = controller(CaptureMode::Classify, None);
        press(&mut ctl, 3);
        assert_eq!(calls.get(), 1);
        let lines = &ctl.reporter().sink().0;
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "Class: rightleft (Prob: 0.75) | rightleft: 0.75 updown: 0.25\r\n");
        assert_eq!(ctl.last_result().map(|c| c.class_id), Some(2));
    }

    #[test]
    fn test_classifier_error_reported_and_recorder_idle() {
        let (mut ctl, calls) = controller(CaptureMode::Classify, Some(-2));
        press(&mut ctl, 2);
        assert_eq!(calls.get(), 1);
        assert_eq!(ctl.reporter().sink().0[1], "Error: classifier status -2\r\n");
        assert_eq!(ctl.recorder().state(), crate::recorder::RecorderState::Idle);

        // Next gesture still runs.
        press(&mut ctl, 2);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_short_capture_marked() {
        let (mut ctl, _) = controller(CaptureMode::Classify, None);
        press(&mut ctl, 1);
        assert!(ctl.reporter().sink().0[1].contains("[short: 1]"));
    }

    #[test]
    fn test_collect_mode_streams_rows() {
        let (mut ctl, calls) = controller(CaptureMode::Collect, None);
        press(&mut ctl, 2);
        assert_eq!(calls.get(), 0);
        assert_eq!(
            ctl.reporter().sink().0,
            vec!["NEW_RUN\r\n", "1.000, 1.000, 1.000\r\n", "2.000, 2.000, 2.000\r\n"]
        );
    }

    #[test]
    fn test_collect_mode_streams_past_capacity() {
        let mut ctl = with_capacity(CaptureMode::Collect, 1000);
        assert!(ctl.recorder().is_streaming());
        press(&mut ctl, 1500);

        let lines = &ctl.reporter().sink().0;
        assert_eq!(lines.len(), 1 + 1500);
        assert_eq!(lines[0], "NEW_RUN\r\n");
        assert_eq!(lines[1500], "1500.000, 1500.000, 1500.000\r\n");
        assert_eq!(ctl.recorder().count(), 1500);
    }

    #[test]
    fn test_classify_mode_still_caps_at_capacity() {
        let mut ctl = with_capacity(CaptureMode::Classify, 10);
        assert!(!ctl.recorder().is_streaming());
        press(&mut ctl, 25);
        assert_eq!(ctl.recorder().count(), 10);
        assert_eq!(ctl.recorder().samples()[9], [10.0; 3]);
    }
}
