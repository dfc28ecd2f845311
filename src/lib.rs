pub mod config;
pub mod editor;
pub mod engine;
pub mod error;
pub mod fit;
pub mod geometry;
pub mod logging;
pub mod normalized;
pub mod preset;
pub mod render;
pub mod session;
pub mod source;
pub mod units;

pub use error::{AppError, AppResult};

use std::ffi::OsString;
use std::fmt::Write;
use std::path::PathBuf;

use config::AppConfig;
use engine::Layout;
use session::Session;
use units::Unit;

const USAGE: &str = "frametamer [--unit in|mm] [--json] [IMAGE]";

/// Command-line options for the one-shot report.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CliArgs {
    pub image: Option<PathBuf>,
    pub unit: Option<Unit>,
    pub json: bool,
}

impl CliArgs {
    pub fn parse<I>(args: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = OsString>,
    {
        let mut parsed = Self::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.to_str() {
                Some("--json") => parsed.json = true,
                Some("--unit") => {
                    let value = args
                        .next()
                        .and_then(|value| value.into_string().ok())
                        .ok_or_else(|| AppError::Usage(USAGE.to_string()))?;
                    let unit = value
                        .parse()
                        .map_err(|err: units::UnknownUnit| AppError::Usage(err.to_string()))?;
                    parsed.unit = Some(unit);
                }
                Some("-h" | "--help") => return Err(AppError::Usage(USAGE.to_string())),
                Some(flag) if flag.starts_with("--") => {
                    return Err(AppError::Usage(format!("unknown option {flag}; {USAGE}")));
                }
                _ if parsed.image.is_none() => parsed.image = Some(PathBuf::from(arg)),
                _ => return Err(AppError::Usage(USAGE.to_string())),
            }
        }
        Ok(parsed)
    }
}

/// Builds a session from config defaults plus the command-line overrides.
pub fn build_session(config: &AppConfig, args: &CliArgs) -> AppResult<Session> {
    let mut input = config.engine_input();
    if let Some(unit) = args.unit {
        input.unit = unit;
    }
    let mut session = Session::new(input);
    if let Some(path) = &args.image {
        let image = source::probe(path)?;
        session.set_image(Some(image));
    }
    Ok(session)
}

/// Summary and cut sheet of the session's current layout.
pub fn report(session: &Session) -> AppResult<String> {
    let layout = match (session.layout(), session.last_error()) {
        (_, Some(err)) => return Err(err.clone().into()),
        (Some(layout), None) => layout,
        (None, None) => return Err(AppError::Usage(USAGE.to_string())),
    };
    let mut out = String::new();
    write_report(&mut out, layout)?;
    Ok(out)
}

fn write_report(out: &mut impl Write, layout: &Layout) -> std::fmt::Result {
    for line in layout.summary() {
        writeln!(out, "{line}")?;
    }
    writeln!(out)?;
    for line in layout.cut_sheet() {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

/// Entrypoint used by the binary.
pub fn run() -> AppResult<()> {
    logging::init();
    tracing::info!("starting frametamer");

    let args = CliArgs::parse(std::env::args_os().skip(1))?;
    let config = config::load_app_config();
    let session = build_session(&config, &args)?;
    if args.json {
        let layout = match session.layout() {
            Some(layout) if session.last_error().is_none() => layout,
            _ => return report(&session).map(|_| ()),
        };
        let json = serde_json::to_string_pretty(layout)?;
        println!("{json}");
    } else {
        print!("{}", report(&session)?);
    }
    Ok(())
}
