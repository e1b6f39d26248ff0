// GestureWatch - Capture Log Replay (host)
//
// Feeds runs recorded in data-collection mode through the same controller the
// firmware uses and prints the report lines the device would have sent.
//
//   replay [--axes 3|6] [--window N] [--truncate] [--model model.json] <capture.log>
//
// Without `--model` the built-in score classifier is used. A model file holds
// either a decision forest or an MLP (with its scaler tables).

#[cfg(not(target_os = "espidf"))]
fn main() -> anyhow::Result<()> {
    host::main()
}

#[cfg(target_os = "espidf")]
fn main() {
    eprintln!("replay is a host tool; flash the gesturewatch binary instead");
    std::process::exit(1);
}

#[cfg(not(target_os = "espidf"))]
mod host {
    use std::env;
    use std::path::PathBuf;

    use anyhow::{anyhow, bail, Context, Result};

    use gesturewatch::capture_log::parse_runs;
    use gesturewatch::classifier::{ForestClassifier, GestureClassifier, MlpClassifier, Node, ScoreClassifier};
    use gesturewatch::config::{PipelineConfig, CLASS_COUNT, CLASS_LABELS};
    use gesturewatch::controller::{CaptureMode, GestureController};
    use gesturewatch::model_file::ModelFile;
    use gesturewatch::pipeline::GesturePipeline;
    use gesturewatch::report::{IoSink, Reporter};
    use gesturewatch::resample::OversizePolicy;
    use gesturewatch::sensor::{Sample, SampleSource};

    const USAGE: &str =
        "usage: replay [--axes 3|6] [--window N] [--truncate] [--model model.json] <capture.log>";

    struct ReplayOptions {
        path: PathBuf,
        model: Option<PathBuf>,
        axes: usize,
        config: PipelineConfig,
    }

    fn parse_args() -> Result<ReplayOptions> {
        let mut path: Option<PathBuf> = None;
        let mut model: Option<PathBuf> = None;
        let mut axes = 6;
        let mut config = PipelineConfig {
            mode: CaptureMode::Classify,
            ..PipelineConfig::default()
        };

        let mut args = env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--axes" => {
                    let value = args.next().ok_or_else(|| anyhow!(USAGE))?;
                    axes = value.parse().with_context(|| format!("bad axis count {:?}", value))?;
                }
                "--window" => {
                    let value = args.next().ok_or_else(|| anyhow!(USAGE))?;
                    config.window_len = value.parse().with_context(|| format!("bad window {:?}", value))?;
                    config.min_confident_samples = config.window_len / 4;
                }
                "--truncate" => config.oversize = OversizePolicy::Truncate,
                "--model" => model = Some(PathBuf::from(args.next().ok_or_else(|| anyhow!(USAGE))?)),
                _ if path.is_none() && !arg.starts_with("--") => path = Some(PathBuf::from(&arg)),
                _ => bail!(USAGE),
            }
        }

        Ok(ReplayOptions {
            path: path.ok_or_else(|| anyhow!(USAGE))?,
            model,
            axes,
            config,
        })
    }

    /// Plays back one recorded run, one sample per tick.
    struct RunSource<'r, const A: usize> {
        rows: std::slice::Iter<'r, Sample<A>>,
    }

    impl<const A: usize> SampleSource<A> for RunSource<'_, A> {
        fn read(&mut self) -> Result<Sample<A>> {
            self.rows.next().copied().ok_or_else(|| anyhow!("run exhausted"))
        }
    }

    fn replay<const A: usize, C: GestureClassifier>(
        runs: &[Vec<Sample<A>>],
        pipeline: GesturePipeline<'_, C>,
    ) -> Result<()> {
        if pipeline.classifier().class_count() != CLASS_LABELS.len() {
            log::warn!(
                "model has {} classes, labels cover {}",
                pipeline.classifier().class_count(),
                CLASS_LABELS.len()
            );
        }

        let reporter = Reporter::new(IoSink(std::io::stdout()), &CLASS_LABELS);
        let mut controller: GestureController<'_, A, _, _> = GestureController::new(pipeline, reporter);

        for (n, run) in runs.iter().enumerate() {
            log::info!("run #{}: {} samples", n + 1, run.len());
            let mut source = RunSource { rows: run.iter() };

            controller.tick(true, &mut source)?;
            for _ in 0..run.len() {
                controller.tick(true, &mut source)?;
            }
            controller.tick(false, &mut source)?;
        }
        Ok(())
    }

    fn replay_with<const A: usize>(log: &str, config: PipelineConfig, model: Option<&ModelFile>) -> Result<()> {
        let runs = parse_runs::<A>(log);
        log::info!("{} runs with {} axes", runs.len(), A);

        match model {
            None => {
                let classifier = ScoreClassifier::new(A, CLASS_COUNT)?;
                replay(&runs, GesturePipeline::new(config, classifier))
            }
            Some(ModelFile::Forest(file)) => {
                let tables = file.node_tables();
                let trees: Vec<&[Node]> = tables.iter().map(Vec::as_slice).collect();
                let forest = file.forest(&trees)?;
                log::info!("forest: {} trees, {} features", trees.len(), forest.feature_count());
                replay(&runs, GesturePipeline::new(config, ForestClassifier::new(forest)))
            }
            Some(ModelFile::Mlp(file)) => {
                let mlp = file.mlp()?;
                log::info!("mlp: {} inputs, {} outputs", mlp.input_len(), mlp.output_len());
                let mut pipeline = GesturePipeline::new(config, MlpClassifier::new(mlp));
                if let Some(scaler) = file.scaler()? {
                    pipeline = pipeline.with_scaler(scaler);
                }
                replay(&runs, pipeline)
            }
        }
    }

    pub fn main() -> Result<()> {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

        let opts = parse_args()?;
        let log = std::fs::read_to_string(&opts.path)
            .with_context(|| format!("reading {}", opts.path.display()))?;

        let model = match &opts.model {
            Some(path) => {
                let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
                Some(ModelFile::from_json(&text).with_context(|| format!("parsing {}", path.display()))?)
            }
            None => None,
        };

        match opts.axes {
            3 => replay_with::<3>(&log, opts.config, model.as_ref()),
            6 => replay_with::<6>(&log, opts.config, model.as_ref()),
            n => bail!("unsupported axis count {} (expected 3 or 6)", n),
        }
    }
}
