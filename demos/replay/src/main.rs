use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tactus_core::*;
use tactus_devtools::{Hud, Inspector};
use tactus_platform::Host;

/// One line of a recorded trace.
#[derive(Debug, Deserialize)]
struct TraceSample {
    kind: SampleKind,
    x: f32,
    y: f32,
    t: f64,
    #[serde(default)]
    path: Vec<u64>,
    #[serde(default)]
    pointer: PointerKind,
    #[serde(default)]
    pressure: f32,
    #[serde(default)]
    tilt: [f32; 2],
}

impl TraceSample {
    fn to_raw(&self) -> RawSample {
        RawSample::new(self.kind, Vec2::new(self.x, self.y), self.t)
            .with_path(self.path.iter().copied().map(ElementId))
            .with_pointer(self.pointer)
            .with_pressure(self.pressure, Vec2::new(self.tilt[0], self.tilt[1]))
    }
}

/// Optional `--config` document; missing fields keep their defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ReplayConfig {
    watcher: WatcherConfig,
    tap: TapRule,
    press: PressRule,
    pan: PanRule,
    swipe: SwipeRule,
    focus_blur: FocusBlurRule,
}

struct Args {
    trace: PathBuf,
    config: Option<PathBuf>,
    watch: Vec<u64>,
}

fn usage() -> String {
    "usage: replay <trace.json> [--config config.json] [--watch ID]...".to_string()
}

fn parse_args() -> anyhow::Result<Args> {
    let mut trace = None;
    let mut config = None;
    let mut watch = Vec::new();
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let path = args.next().context("missing path after --config")?;
                config = Some(PathBuf::from(path));
            }
            "--watch" => {
                let id = args.next().context("missing element id after --watch")?;
                watch.push(id.parse().with_context(|| format!("bad element id `{id}`"))?);
            }
            "-h" | "--help" => {
                println!("{}", usage());
                std::process::exit(0);
            }
            value if value.starts_with('-') => bail!("unknown argument: {value}\n{}", usage()),
            value => {
                if trace.is_some() {
                    bail!("multiple trace paths provided");
                }
                trace = Some(PathBuf::from(value));
            }
        }
    }
    let Some(trace) = trace else {
        bail!("{}", usage());
    };
    Ok(Args {
        trace,
        config,
        watch,
    })
}

fn load<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = parse_args()?;

    let samples: Vec<TraceSample> = load(&args.trace)?;
    let config: ReplayConfig = match &args.config {
        Some(path) => load(path)?,
        None => ReplayConfig::default(),
    };
    log::info!("{} samples from {}", samples.len(), args.trace.display());

    // Watch every element that appears in the trace unless told otherwise.
    let elements: BTreeSet<u64> = if args.watch.is_empty() {
        samples.iter().flat_map(|s| s.path.iter().copied()).collect()
    } else {
        args.watch.iter().copied().collect()
    };

    let host = Host::new();
    let mut inspectors = Vec::new();
    for id in elements {
        let element = ElementId(id);
        let key = host.watch(element, config.watcher.clone());
        let inspector = Inspector::new();
        host.with_watcher(key, |w| -> anyhow::Result<()> {
            w.add(Box::new(TapMatcher::new(config.tap.clone())))?;
            w.add(Box::new(PressMatcher::new(PressRule {
                auto: true,
                ..config.press.clone()
            })))?;
            w.add(Box::new(PanMatcher::new(config.pan.clone())))?;
            w.add(Box::new(SwipeMatcher::new(config.swipe.clone())))?;
            w.add(Box::new(FocusBlurMatcher::new(config.focus_blur.clone())))?;
            inspector.attach(w);
            Ok(())
        })
        .context("watcher vanished during setup")??;
        inspectors.push((element, inspector));
    }

    let mut last = 0.0;
    for sample in &samples {
        let consumed = host.dispatch(sample.to_raw());
        log::debug!("{:?} at {} consumed={consumed}", sample.kind, sample.t);
        last = sample.t;
    }
    // Let a press that is still held fire.
    host.advance(last + 1000.0);

    let hud = Hud::new();
    for (element, inspector) in &inspectors {
        println!("element {}: {}", element.0, inspector.summary());
        for line in hud.lines(inspector) {
            println!("    {line}");
        }
    }
    Ok(())
}
