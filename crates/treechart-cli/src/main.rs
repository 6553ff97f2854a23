use serde::Serialize;
use std::io::Read;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;
use treechart::{
    ChartOptions, Dataset, Direction, HeadlessOverlay, HeadlessSvgSurface, LayoutSnapshot,
    LinkStyle, Size, SvgRenderOptions, TreeChart,
};

const LOG_ENV: &str = "TREECHART_LOG";

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Chart(treechart::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Chart(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<treechart::Error> for CliError {
    fn from(value: treechart::Error) -> Self {
        Self::Chart(value)
    }
}

impl From<treechart::CoreError> for CliError {
    fn from(value: treechart::CoreError) -> Self {
        Self::Chart(value.into())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Layout,
    Render,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    config: Option<String>,
    pretty: bool,
    direction: Option<Direction>,
    link_style: Option<LinkStyle>,
    viewport_width: f64,
    viewport_height: f64,
    diagram_id: Option<String>,
    with_transform: bool,
    out: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LayoutOut<'a> {
    transform: String,
    #[serde(flatten)]
    snapshot: &'a LayoutSnapshot,
}

fn usage() -> &'static str {
    "treechart-cli\n\
\n\
USAGE:\n\
  treechart-cli [layout] [--pretty] [--config <json-file>] [--direction vertical|horizontal] [--link-style curve|straight] [--viewport-width <w>] [--viewport-height <h>] [<path>|-]\n\
  treechart-cli render [--config <json-file>] [--direction vertical|horizontal] [--link-style curve|straight] [--viewport-width <w>] [--viewport-height <h>] [--id <diagram-id>] [--with-transform] [--out <path>] [<path>|-]\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', the JSON dataset is read from stdin.\n\
  - --config reads chart options (treeConfig, collapseEnabled, direction, linkStyle) from a JSON file;\n\
    --direction and --link-style override it.\n\
  - layout prints laid-out nodes, links and the initial transform as JSON.\n\
  - render prints SVG to stdout by default; use --out to write a file.\n\
  - Set TREECHART_LOG (e.g. TREECHART_LOG=debug) for diagnostics on stderr.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args {
        viewport_width: 800.0,
        viewport_height: 600.0,
        ..Default::default()
    };

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "layout" => args.command = Command::Layout,
            "render" => args.command = Command::Render,
            "--pretty" => args.pretty = true,
            "--with-transform" => args.with_transform = true,
            "--config" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.config = Some(path.clone());
            }
            "--direction" => {
                let Some(d) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.direction = Some(d.parse().map_err(|_| CliError::Usage(usage()))?);
            }
            "--link-style" => {
                let Some(s) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.link_style = Some(s.parse().map_err(|_| CliError::Usage(usage()))?);
            }
            "--viewport-width" => {
                let Some(w) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.viewport_width = w.parse::<f64>().map_err(|_| CliError::Usage(usage()))?;
            }
            "--viewport-height" => {
                let Some(h) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.viewport_height = h.parse::<f64>().map_err(|_| CliError::Usage(usage()))?;
            }
            "--id" => {
                let Some(id) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.diagram_id = Some(id.clone());
            }
            "--out" => {
                let Some(out) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.out = Some(out.clone());
            }
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
                }
                if it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            other if other.starts_with('-') && other != "-" => {
                return Err(CliError::Usage(usage()));
            }
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    if !(args.viewport_width.is_finite() && args.viewport_height.is_finite()) {
        return Err(CliError::Usage(usage()));
    }
    Ok(args)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(std::io::stdout().lock(), value)?;
    } else {
        serde_json::to_writer(std::io::stdout().lock(), value)?;
    }
    println!();
    Ok(())
}

fn write_text(text: &str, out: Option<&str>) -> Result<(), CliError> {
    match out {
        None => {
            print!("{text}");
            Ok(())
        }
        Some(path) => {
            std::fs::write(path, text)?;
            Ok(())
        }
    }
}

fn chart_options(args: &Args) -> Result<ChartOptions, CliError> {
    let mut options = match args.config.as_deref() {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            ChartOptions::from_json_str(&text)?
        }
        None => ChartOptions::new(true),
    };
    if let Some(direction) = args.direction {
        options = options.with_direction(direction);
    }
    if let Some(link_style) = args.link_style {
        options = options.with_link_style(link_style);
    }
    Ok(options)
}

fn run(args: Args) -> Result<(), CliError> {
    let options = chart_options(&args)?;
    let text = read_input(args.input.as_deref())?;
    let dataset = if text.trim().is_empty() {
        None
    } else {
        Some(Dataset::from_json_str(&text)?)
    };

    let mut chart = TreeChart::new(
        options,
        dataset.as_ref(),
        HeadlessSvgSurface::new(),
        HeadlessOverlay::new(Size::new(args.viewport_width, args.viewport_height)),
    )?;
    chart.init()?;
    tracing::debug!(
        nodes = chart.node_data_list().len(),
        links = chart.links().len(),
        "chart ready"
    );

    match args.command {
        Command::Layout => {
            let snapshot = chart.snapshot();
            let out = LayoutOut {
                transform: chart.transform_state().to_string(),
                snapshot: &snapshot,
            };
            write_json(&out, args.pretty)
        }
        Command::Render => {
            let render_options = SvgRenderOptions {
                diagram_id: args.diagram_id.clone(),
                direction: options.direction,
                tree_config: options.tree_config,
                include_transform: args.with_transform,
                ..SvgRenderOptions::default()
            };
            let svg = chart
                .vector_surface()?
                .render_svg(chart.layout(), &render_options);
            write_text(&svg, args.out.as_deref())
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    init_tracing();

    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
