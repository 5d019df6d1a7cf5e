use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;
use std::time::{Duration, Instant};

use clap::{Parser, ValueEnum};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use slottrack_rs::integration::{JsonLinesSource, LogSink, UdpOscSink};
use slottrack_rs::{CandidateOrder, FrameSource, MessageSink, Settings, SlotPipeline};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OrderArg {
    LargestFirst,
    LowestTrackId,
}

impl From<OrderArg> for CandidateOrder {
    fn from(order: OrderArg) -> Self {
        match order {
            OrderArg::LargestFirst => CandidateOrder::LargestFirst,
            OrderArg::LowestTrackId => CandidateOrder::LowestTrackId,
        }
    }
}

/// Replay recorded tracker output through the slot engine and send it as OSC.
#[derive(Parser, Debug)]
#[command(name = "slottrack", version)]
struct Args {
    /// JSON-lines file of frames, or `-` for stdin
    #[arg(long, value_name = "PATH")]
    input: String,
    /// JSON settings file; flags below override it
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Comma-separated class labels to track, e.g. "sports ball,cup"
    #[arg(long, value_delimiter = ',')]
    classes: Option<Vec<String>>,
    #[arg(long)]
    max_slots: Option<usize>,
    /// Minimum normalized box area
    #[arg(long)]
    min_area: Option<f32>,
    /// Minimum detection confidence
    #[arg(long)]
    conf: Option<f32>,
    /// EMA weight of the previous value, in [0, 1); 0 disables smoothing
    #[arg(long)]
    ema: Option<f32>,
    /// Frames to hold the last value before sending the sentinel
    #[arg(long)]
    hold: Option<u32>,
    #[arg(long, value_enum)]
    candidate_order: Option<OrderArg>,
    #[arg(long)]
    osc_host: Option<String>,
    #[arg(long)]
    osc_port: Option<u16>,
    #[arg(long)]
    base_path: Option<String>,
    #[arg(long)]
    count_path: Option<String>,
    /// Cap processing rate in frames per second (0 = uncapped)
    #[arg(long, default_value_t = 0.0, value_parser = parse_fps_cap)]
    fps_cap: f64,
    /// Log messages instead of sending them
    #[arg(long)]
    dry_run: bool,
}

impl Args {
    fn settings(&self) -> Result<Settings, slottrack_rs::ConfigError> {
        let mut settings = match &self.config {
            Some(path) => Settings::from_json_file(path)?,
            None => Settings::default(),
        };

        let slots = &mut settings.slots;
        if let Some(classes) = &self.classes {
            slots.classes = classes.iter().map(|c| c.trim().to_string()).collect();
        }
        if let Some(v) = self.max_slots {
            slots.max_slots = v;
        }
        if let Some(v) = self.min_area {
            slots.min_area = v;
        }
        if let Some(v) = self.conf {
            slots.min_confidence = v;
        }
        if let Some(v) = self.ema {
            slots.ema = v;
        }
        if let Some(v) = self.hold {
            slots.hold = v;
        }
        if let Some(v) = self.candidate_order {
            slots.candidate_order = v.into();
        }

        let output = &mut settings.output;
        if let Some(v) = &self.osc_host {
            output.host = v.clone();
        }
        if let Some(v) = self.osc_port {
            output.port = v;
        }
        if let Some(v) = &self.base_path {
            output.base_path = v.clone();
        }
        if let Some(v) = &self.count_path {
            output.count_path = v.clone();
        }

        settings.validate()?;
        Ok(settings)
    }
}

fn parse_fps_cap(raw: &str) -> Result<f64, String> {
    let fps: f64 = raw.parse().map_err(|err| format!("{err}"))?;
    if !fps.is_finite() || fps < 0.0 {
        return Err(format!("expected a finite, non-negative rate, got {fps}"));
    }
    if fps > 0.0 {
        Duration::try_from_secs_f64(1.0 / fps)
            .map_err(|err| format!("rate {fps} is too small: {err}"))?;
    }
    Ok(fps)
}

/// Sleep interval between frames; `None` when uncapped.
fn frame_interval(fps_cap: f64) -> Option<Duration> {
    if fps_cap > 0.0 {
        Duration::try_from_secs_f64(1.0 / fps_cap).ok()
    } else {
        None
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn open_input(path: &str) -> io::Result<Box<dyn BufRead>> {
    if path == "-" {
        Ok(Box::new(BufReader::new(io::stdin())))
    } else {
        Ok(Box::new(BufReader::new(File::open(path)?)))
    }
}

fn replay<S, K>(pipeline: &mut SlotPipeline<S, K>, fps_cap: f64) -> Result<u64, S::Error>
where
    S: FrameSource,
    K: MessageSink,
{
    let interval = frame_interval(fps_cap);
    let mut frames = 0;
    let mut last_tick = Instant::now();

    loop {
        if let Some(interval) = interval {
            let elapsed = last_tick.elapsed();
            if elapsed < interval {
                thread::sleep(interval - elapsed);
            }
            last_tick = Instant::now();
        }
        match pipeline.process_next()? {
            Some(_) => frames += 1,
            None => return Ok(frames),
        }
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let settings = args.settings()?;
    let source = JsonLinesSource::new(open_input(&args.input)?);
    info!(
        max_slots = settings.slots.max_slots,
        classes = ?settings.slots.classes,
        ema = settings.slots.ema,
        hold = settings.slots.hold,
        "starting replay"
    );

    let frames = if args.dry_run {
        let mut pipeline = SlotPipeline::new(source, LogSink, settings)?;
        replay(&mut pipeline, args.fps_cap)?
    } else {
        let sink = UdpOscSink::connect(&settings.output.host, settings.output.port)?;
        info!(destination = %sink.target(), "sending OSC");
        let mut pipeline = SlotPipeline::new(source, sink, settings)?;
        replay(&mut pipeline, args.fps_cap)?
    };

    info!(frames, "replay finished");
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fps_cap_parsing() {
        assert_eq!(parse_fps_cap("0"), Ok(0.0));
        assert_eq!(parse_fps_cap("30"), Ok(30.0));
        assert!(parse_fps_cap("-5").is_err());
        assert!(parse_fps_cap("inf").is_err());
        assert!(parse_fps_cap("NaN").is_err());
        assert!(parse_fps_cap("1e-310").is_err());
    }

    #[test]
    fn test_frame_interval() {
        assert_eq!(frame_interval(0.0), None);
        assert_eq!(frame_interval(4.0), Some(Duration::from_millis(250)));
        assert_eq!(frame_interval(1e-310), None);
    }
}
