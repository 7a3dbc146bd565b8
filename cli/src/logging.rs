use std::fmt;
use std::io;

use ::changelog::diagnostics::NOTICE_TARGET;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

use crate::cli::LogFormat;
use crate::error::{CliError, Result};

/// Event formatter writing one `<prefix><message>` line per event
#[derive(Debug, Clone, Copy)]
pub struct WorkflowFormat {
    style: LogFormat,
}

impl WorkflowFormat {
    pub fn new(style: LogFormat) -> Self {
        Self { style }
    }

    fn prefix(self, level: Level, target: &str) -> &'static str {
        let notice = level == Level::INFO && target == NOTICE_TARGET;
        match self.style {
            LogFormat::Github => match level {
                Level::ERROR => "::error::",
                Level::WARN => "::warning::",
                Level::INFO if notice => "::notice::",
                Level::INFO => "",
                _ => "::debug::",
            },
            LogFormat::Plain => match level {
                Level::ERROR => "error: ",
                Level::WARN => "warning: ",
                Level::INFO if notice => "notice: ",
                Level::INFO => "",
                _ => "debug: ",
            },
        }
    }
}

impl<S, N> FormatEvent<S, N> for WorkflowFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let metadata = event.metadata();
        write!(writer, "{}", self.prefix(*metadata.level(), metadata.target()))?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Install the global subscriber. `RUST_LOG` wins over the default level
/// unless `verbose` is set.
pub fn init(style: LogFormat, verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .event_format(WorkflowFormat::new(style))
        .try_init()
        .map_err(|e| CliError::Other(format!("Failed to initialize logging: {e}")))
}
