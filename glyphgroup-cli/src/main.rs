use clap::Parser;
use glyphgroup::io::{load_gray_image, save_canvas};
use glyphgroup::{
    image::threshold, DetectConfig, Flow, InputEvent, MatchConfig, OwnedImage, RgbCanvas, Session,
};
use serde::Deserialize;
use std::fs;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "Glyph grouping CLI (JSON config, scripted events)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Event script, one event per line. Reads stdin when omitted.
    #[arg(short, long, value_name = "FILE")]
    events: Option<PathBuf>,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
enum BinarizeMode {
    #[default]
    None,
    Fixed,
    Otsu,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct BinarizeJson {
    mode: BinarizeMode,
    level: u8,
    invert: bool,
}

impl Default for BinarizeJson {
    fn default() -> Self {
        Self {
            mode: BinarizeMode::None,
            level: 127,
            invert: false,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct DetectConfigJson {
    dilate: Option<(usize, usize)>,
    min_width: i32,
    min_height: i32,
}

impl Default for DetectConfigJson {
    fn default() -> Self {
        let cfg = DetectConfig::default();
        Self {
            dilate: cfg.dilate,
            min_width: cfg.min_width,
            min_height: cfg.min_height,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct MatchConfigJson {
    threshold: f32,
    dilate: Option<(usize, usize)>,
    min_var_i: f32,
    parallel: bool,
}

impl Default for MatchConfigJson {
    fn default() -> Self {
        let cfg = MatchConfig::default();
        Self {
            threshold: cfg.threshold,
            dilate: cfg.dilate,
            min_var_i: cfg.min_var_i,
            parallel: cfg.parallel,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct Config {
    image_path: String,
    snapshot_path: String,
    output_path: Option<String>,
    load_snapshot: bool,
    binarize: BinarizeJson,
    detect: DetectConfigJson,
    #[serde(rename = "match")]
    match_cfg: MatchConfigJson,
    line_thickness: i32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            image_path: String::new(),
            snapshot_path: "boxes.json".to_string(),
            output_path: None,
            load_snapshot: false,
            binarize: BinarizeJson::default(),
            detect: DetectConfigJson::default(),
            match_cfg: MatchConfigJson::default(),
            line_thickness: 2,
        }
    }
}

fn prepare_image(config: &Config) -> Result<OwnedImage, Box<dyn std::error::Error>> {
    let gray = load_gray_image(&config.image_path)?;
    let binary = match config.binarize.mode {
        BinarizeMode::None => gray,
        BinarizeMode::Fixed => {
            threshold::binarize(gray.view(), config.binarize.level, config.binarize.invert)?
        }
        BinarizeMode::Otsu => threshold::binarize_otsu(gray.view(), config.binarize.invert)?,
    };
    Ok(binary)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive("glyphgroup=info".parse()?),
            )
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.image_path.is_empty() {
        return Err("image_path must be set in the config".into());
    }
    if config.line_thickness < 1 {
        return Err("line_thickness must be at least 1".into());
    }

    let binary = prepare_image(&config)?;
    let detect = DetectConfig {
        dilate: config.detect.dilate,
        min_width: config.detect.min_width,
        min_height: config.detect.min_height,
    };
    let matching = MatchConfig {
        threshold: config.match_cfg.threshold,
        dilate: config.match_cfg.dilate,
        min_var_i: config.match_cfg.min_var_i,
        parallel: config.match_cfg.parallel,
    };
    let mut session =
        Session::from_image(binary.view(), &detect, matching, &config.snapshot_path)?;
    if config.load_snapshot {
        session.registry_mut().load(&config.snapshot_path)?;
    }
    tracing::info!(regions = session.registry().len(), "session ready");

    let reader: Box<dyn BufRead> = match &cli.events {
        Some(path) => Box::new(BufReader::new(fs::File::open(path)?)),
        None => Box::new(BufReader::new(io::stdin())),
    };

    let mut frame = RgbCanvas::from_gray(binary.view(), config.line_thickness);
    session.render(&mut frame);
    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        let event = match InputEvent::parse_line(&line) {
            Ok(Some(event)) => event,
            Ok(None) => continue,
            Err(err) => {
                tracing::warn!(line = lineno + 1, %err, "skipping event");
                continue;
            }
        };
        let flow = match session.dispatch(event) {
            Ok(flow) => flow,
            Err(err) => {
                tracing::error!(line = lineno + 1, %err, "event failed");
                Flow::Continue
            }
        };
        frame = RgbCanvas::from_gray(binary.view(), config.line_thickness);
        session.render(&mut frame);
        if flow == Flow::Quit {
            break;
        }
    }

    if let Some(report) = session.last_report() {
        tracing::info!(
            groups = report.groups.len(),
            grouped = report.regions_grouped,
            garbage = report.garbage_skipped,
            "last auto-group"
        );
    }
    if let Some(path) = &config.output_path {
        save_canvas(&frame, path)?;
    }

    Ok(())
}
