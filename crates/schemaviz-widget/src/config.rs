use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "schemaviz")]
#[command(about = "SchemaViz - Entity-relationship view of a database schema")]
#[command(version)]
pub struct Args {
    /// SQLite database file to introspect
    pub database: PathBuf,

    /// Print the schema snapshot as JSON and exit
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Pretty-print JSON output
    #[arg(long, default_value_t = false, requires = "json")]
    pub pretty: bool,

    /// Port to listen on
    #[arg(short, long, default_value = "3000")]
    pub port: u16,

    /// Address to bind to (localhost only for security)
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Diagram width in pixels
    #[arg(long, default_value_t = WidgetConfig::DEFAULT_WIDTH)]
    pub width: u32,

    /// Diagram height in pixels
    #[arg(long, default_value_t = WidgetConfig::DEFAULT_HEIGHT)]
    pub height: u32,

    /// Hide attribute datatypes in the diagram
    #[arg(long, default_value_t = false)]
    pub hide_datatypes: bool,

    /// Truncate datatypes longer than this many characters (0 = never)
    #[arg(long, default_value_t = WidgetConfig::DEFAULT_DATATYPE_MAX_LENGTH)]
    pub datatype_max_length: usize,

    /// Directory holding the front end bundle (index.js, index.css)
    #[arg(long, default_value = "static")]
    pub assets: PathBuf,

    /// Don't open browser automatically
    #[arg(long, default_value_t = false)]
    pub no_open: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

/// Presentation parameters handed to the view unmodified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetConfig {
    pub width: u32,
    pub height: u32,
    pub show_datatypes: bool,
    pub datatype_max_length: usize,
}

impl WidgetConfig {
    pub const DEFAULT_WIDTH: u32 = 800;
    pub const DEFAULT_HEIGHT: u32 = 600;
    pub const DEFAULT_DATATYPE_MAX_LENGTH: usize = 30;
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            width: Self::DEFAULT_WIDTH,
            height: Self::DEFAULT_HEIGHT,
            show_datatypes: true,
            datatype_max_length: Self::DEFAULT_DATATYPE_MAX_LENGTH,
        }
    }
}

impl From<&Args> for WidgetConfig {
    fn from(args: &Args) -> Self {
        Self {
            width: args.width,
            height: args.height,
            show_datatypes: !args.hide_datatypes,
            datatype_max_length: args.datatype_max_length,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServeConfig {
    pub host: String,
    pub port: u16,
    pub assets_dir: PathBuf,
    pub open_browser: bool,
}

impl From<&Args> for ServeConfig {
    fn from(args: &Args) -> Self {
        Self {
            host: args.host.clone(),
            port: args.port,
            assets_dir: args.assets.clone(),
            open_browser: !args.no_open,
        }
    }
}

impl ServeConfig {
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}
