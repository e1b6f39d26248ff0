//! End-to-end tests: trigger edges in, report lines out.

use std::collections::VecDeque;

use gesturewatch::capture_log::parse_runs;
use gesturewatch::classifier::{
    Activation, Classification, ClassifierKind, DecisionForest, DenseLayer, ForestClassifier,
    GestureClassifier, Mlp, MlpClassifier, Node,
};
use gesturewatch::config::{PipelineConfig, CLASS_LABELS};
use gesturewatch::controller::{CaptureMode, GestureController};
use gesturewatch::error::GestureError;
use gesturewatch::events::RecorderEvent;
use gesturewatch::model_file::ModelFile;
use gesturewatch::pipeline::GesturePipeline;
use gesturewatch::report::{LineSink, Reporter};
use gesturewatch::scaler::StandardScaler;
use gesturewatch::sensor::{Sample, SampleSource};

#[derive(Default)]
struct Lines(Vec<String>);

impl LineSink for Lines {
    fn write_line(&mut self, line: &str) -> anyhow::Result<()> {
        self.0.push(line.to_owned());
        Ok(())
    }
}

/// Yields queued samples; `None` entries simulate a failed bus read.
struct Scripted<const A: usize>(VecDeque<Option<Sample<A>>>);

impl<const A: usize> SampleSource<A> for Scripted<A> {
    fn read(&mut self) -> anyhow::Result<Sample<A>> {
        match self.0.pop_front() {
            Some(Some(s)) => Ok(s),
            _ => anyhow::bail!("bus error"),
        }
    }
}

/// Records the features it was handed.
#[derive(Default)]
struct Spy {
    features: Vec<Vec<f32>>,
}

impl GestureClassifier for Spy {
    fn kind(&self) -> ClassifierKind {
        ClassifierKind::ScoreVector
    }

    fn class_count(&self) -> usize {
        CLASS_LABELS.len()
    }

    fn classify(&mut self, features: &[f32]) -> Result<Classification, GestureError> {
        self.features.push(features.to_vec());
        let mut scores = vec![0.0; CLASS_LABELS.len()];
        scores[0] = 0.9;
        Ok(Classification::from_index(Some(0), scores))
    }
}

fn config(window_len: usize) -> PipelineConfig {
    PipelineConfig {
        window_len,
        min_confident_samples: 1,
        mode: CaptureMode::Classify,
        ..PipelineConfig::default()
    }
}

#[test]
fn test_three_samples_resampled_to_five() {
    let mut ctl: GestureController<'_, 3, Spy, Lines> = GestureController::new(
        GesturePipeline::new(config(5), Spy::default()),
        Reporter::new(Lines::default(), &CLASS_LABELS),
    );
    let mut src = Scripted(VecDeque::from(vec![
        Some([1.0; 3]),
        Some([2.0; 3]),
        Some([3.0; 3]),
    ]));

    assert_eq!(ctl.tick(false, &mut src).unwrap(), RecorderEvent::None);
    assert_eq!(ctl.tick(true, &mut src).unwrap(), RecorderEvent::Started);
    for n in 1..=3 {
        assert_eq!(ctl.tick(true, &mut src).unwrap(), RecorderEvent::Sampled { count: n });
    }
    assert_eq!(ctl.tick(false, &mut src).unwrap(), RecorderEvent::Finished { count: 3 });

    let seen = &ctl.pipeline().classifier().features;
    assert_eq!(seen.len(), 1);
    let rows: Vec<&[f32]> = seen[0].chunks(3).collect();
    let expected = [1.0, 1.5, 2.0, 2.5, 3.0];
    assert_eq!(rows.len(), 5);
    for (row, want) in rows.iter().zip(expected) {
        assert_eq!(*row, &[want; 3][..]);
    }

    let lines = &ctl.reporter().sink().0;
    assert_eq!(lines[0], "Recording...\r\n");
    assert!(lines[1].starts_with("Class: updown (Prob: 0.90) |"));
}

#[test]
fn test_failed_reads_are_skipped_not_reported() {
    let mut ctl: GestureController<'_, 3, Spy, Lines> = GestureController::new(
        GesturePipeline::new(config(2), Spy::default()),
        Reporter::new(Lines::default(), &CLASS_LABELS),
    );
    let mut src = Scripted(VecDeque::from(vec![Some([4.0; 3]), None, Some([8.0; 3])]));

    ctl.tick(true, &mut src).unwrap();
    ctl.tick(true, &mut src).unwrap();
    assert_eq!(ctl.tick(true, &mut src).unwrap(), RecorderEvent::SampleSkipped);
    ctl.tick(true, &mut src).unwrap();
    ctl.tick(false, &mut src).unwrap();

    assert_eq!(ctl.pipeline().classifier().features[0], vec![4.0, 4.0, 4.0, 8.0, 8.0, 8.0]);
    assert_eq!(ctl.reporter().sink().0.len(), 2);
}

#[test]
fn test_overlong_press_keeps_first_samples() {
    let cfg = PipelineConfig {
        capacity: 1000,
        ..config(2)
    };
    let mut ctl: GestureController<'_, 3, Spy, Lines> = GestureController::new(
        GesturePipeline::new(cfg, Spy::default()),
        Reporter::new(Lines::default(), &CLASS_LABELS),
    );
    let mut src = Scripted(VecDeque::from(
        (0..1200).map(|i| Some([i as f32; 3])).collect::<Vec<_>>(),
    ));

    ctl.tick(true, &mut src).unwrap();
    for _ in 0..1200 {
        ctl.tick(true, &mut src).unwrap();
    }
    assert_eq!(ctl.recorder().count(), 1000);
    ctl.tick(false, &mut src).unwrap();

    // First and 1000th sample, not the most recent ones.
    assert_eq!(ctl.pipeline().classifier().features[0], vec![0.0, 0.0, 0.0, 999.0, 999.0, 999.0]);
}

#[test]
fn test_collect_streams_whole_press_beyond_capacity() {
    let cfg = PipelineConfig {
        capacity: 1000,
        mode: CaptureMode::Collect,
        ..config(4)
    };
    let mut ctl: GestureController<'_, 3, Spy, Lines> = GestureController::new(
        GesturePipeline::new(cfg, Spy::default()),
        Reporter::new(Lines::default(), &CLASS_LABELS),
    );
    let mut src = Scripted(VecDeque::from(
        (0..1500).map(|i| Some([i as f32; 3])).collect::<Vec<_>>(),
    ));

    ctl.tick(true, &mut src).unwrap();
    for _ in 0..1500 {
        ctl.tick(true, &mut src).unwrap();
    }
    assert_eq!(ctl.tick(false, &mut src).unwrap(), RecorderEvent::Finished { count: 1500 });

    let log: String = ctl.reporter().sink().0.concat();
    let runs = parse_runs::<3>(&log);
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].len(), 1500);
    assert_eq!(runs[0][1499], [1499.0; 3]);
    assert!(ctl.pipeline().classifier().features.is_empty());
}

#[test]
fn test_forest_model_file_drives_controller() {
    // 2 rows x 1 axis; first row < 0 -> class 2, else class 1.
    let json = r#"{"kind": "forest", "class_count": 2, "feature_count": 2,
                   "trees": [[{"feature": 0, "threshold": 0, "left": 1, "right": 2},
                              {"class": 1}, {"class": 0}]]}"#;
    let ModelFile::Forest(file) = ModelFile::from_json(json).unwrap() else {
        panic!("expected a forest");
    };
    let tables = file.node_tables();
    let trees: Vec<&[Node]> = tables.iter().map(Vec::as_slice).collect();
    let forest = file.forest(&trees).unwrap();

    let mut ctl: GestureController<'_, 1, _, Lines> = GestureController::new(
        GesturePipeline::new(config(2), ForestClassifier::new(forest)),
        Reporter::new(Lines::default(), &CLASS_LABELS),
    );
    let mut src = Scripted(VecDeque::from(vec![Some([-5.0]), Some([3.0])]));
    ctl.tick(true, &mut src).unwrap();
    ctl.tick(true, &mut src).unwrap();
    ctl.tick(true, &mut src).unwrap();
    ctl.tick(false, &mut src).unwrap();

    assert_eq!(ctl.last_result().map(|c| c.class_id), Some(2));
    assert_eq!(
        ctl.reporter().sink().0[1],
        "Class: rightleft (Prob: 1.00) | rightleft: 1.00 updown: 0.00\r\n"
    );
}

#[test]
fn test_collected_log_replays_through_forest() {
    // Collect a run, then parse what the device printed and classify it.
    let collect = PipelineConfig {
        mode: CaptureMode::Collect,
        ..config(4)
    };
    let mut recorder: GestureController<'_, 3, Spy, Lines> = GestureController::new(
        GesturePipeline::new(collect, Spy::default()),
        Reporter::new(Lines::default(), &CLASS_LABELS),
    );
    let mut src = Scripted(VecDeque::from(vec![
        Some([-100.0, 0.0, 0.0]),
        Some([-300.0, 0.0, 0.0]),
    ]));
    recorder.tick(true, &mut src).unwrap();
    recorder.tick(true, &mut src).unwrap();
    recorder.tick(true, &mut src).unwrap();
    recorder.tick(false, &mut src).unwrap();
    assert!(recorder.pipeline().classifier().features.is_empty());

    let log: String = recorder.reporter().sink().0.concat();
    let runs = parse_runs::<3>(&log);
    assert_eq!(runs, vec![vec![[-100.0, 0.0, 0.0], [-300.0, 0.0, 0.0]]]);

    // feature 0 (first row, x) < -150 -> class 1, else class 0
    const TREE: &[Node] = &[
        Node::Split { feature: 0, threshold: -150, left: 1, right: 2 },
        Node::Leaf { class: 1 },
        Node::Leaf { class: 0 },
    ];
    const TREES: &[&[Node]] = &[TREE];
    let forest = DecisionForest::new(TREES, 2, 12).unwrap();
    let mut pipeline = GesturePipeline::new(config(4), ForestClassifier::new(forest));

    let outcome = pipeline.run(&runs[0]).unwrap();
    // first row is -100 -> right -> class 0 -> id 1
    assert_eq!(outcome.classification.class_id, 1);
    assert_eq!(outcome.classification.scores, vec![1.0, 0.0]);
}

#[test]
fn test_scaled_mlp_stage() {
    // 2 rows x 1 axis; scaler centres on 10 and halves, MLP picks sign.
    const MEAN: [f32; 2] = [10.0, 10.0];
    const SCALE: [f32; 2] = [2.0, 2.0];
    const W: [f32; 4] = [1.0, 1.0, -1.0, -1.0];
    const B: [f32; 2] = [0.0, 0.0];

    let mlp = Mlp::new(vec![DenseLayer {
        inputs: 2,
        outputs: 2,
        weights: &W,
        biases: &B,
        activation: Activation::Softmax,
    }])
    .unwrap();
    let scaler = StandardScaler::new(&MEAN, &SCALE).unwrap();
    let mut pipeline = GesturePipeline::new(config(2), MlpClassifier::new(mlp)).with_scaler(scaler);

    assert_eq!(pipeline.features(&[[14.0], [12.0]]), vec![2.0, 1.0]);
    assert_eq!(pipeline.run(&[[14.0], [12.0]]).unwrap().classification.class_id, 1);
    assert_eq!(pipeline.run(&[[6.0], [8.0]]).unwrap().classification.class_id, 2);
}
