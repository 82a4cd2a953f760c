#![forbid(unsafe_code)]

use anyhow::{Result, anyhow};
use log::{info, error, LevelFilter};
use serde::Deserialize;
use std::{env, fs, io::ErrorKind, path::Path};
use lazy_static::lazy_static;
use structopt::StructOpt;

use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Config as LogConfig, Root};
use log4rs::encode::pattern::PatternEncoder;

// Server Utilities
use crate::utils::{writer_utils::get_absolute_path, errors::Errors};

// ***************************************************************************
//                                Constants
// ***************************************************************************
// Directory and file locations. Unless otherwise noted, all files and directories
// are relative to the root directory.
const ENV_ROOT_DIR         : &str = "WRITER_LLM_ROOT_DIR";
const DEFAULT_ROOT_DIR     : &str = "~/.writer_llm";
const CONFIG_DIR           : &str = "/config";
const LOG4RS_CONFIG_FILE   : &str = "/log4rs.yml";      // relative to config dir
const APP_CONFIG_FILE      : &str = "/writer_llm.toml"; // relative to config dir

// Networking.
const DEFAULT_HTTP_ADDR    : &str = "http://localhost";
const DEFAULT_HTTP_PORT    : u16  = 8080;
const DEFAULT_SHUTDOWN_SECS: u64  = 5;

// Console logging used when no log4rs file is installed.
const DEFAULT_LOG_PATTERN  : &str = "{d(%Y-%m-%dT%H:%M:%S%.6fZ)(utc)} {h({l})} {t} - {m}{n}";

// ***************************************************************************
//                             Static Variables
// ***************************************************************************
// Assign the command line arguments BEFORE the runtime context is initialized in main.
lazy_static! {
    pub static ref WRITER_ARGS: WriterArgs = init_writer_args();
}

// Calculate the data directories BEFORE the runtime context is initialized in main.
lazy_static! {
    pub static ref WRITER_DIRS: WriterDirs = init_writer_dirs();
}

// ***************************************************************************
//                             Directory Structs
// ***************************************************************************
// ---------------------------------------------------------------------------
// WriterDirs:
// ---------------------------------------------------------------------------
#[derive(Debug)]
#[allow(dead_code)]
pub struct WriterDirs {
    pub root_dir: String,
    pub config_dir: String,
}

// ***************************************************************************
//                               Config Structs
// ***************************************************************************
// ---------------------------------------------------------------------------
// WriterArgs:
// ---------------------------------------------------------------------------
#[derive(Debug, StructOpt)]
#[structopt(name = "writer_llm", about = "Command line arguments for the writer_llm server.")]
pub struct WriterArgs {
    /// Specify the server's root data directory.
    ///
    /// The root directory is calculated using the following priority order:
    ///
    ///   1. If set, the value of the WRITER_LLM_ROOT_DIR environment variable,
    ///
    ///   2. Otherwise, if set, the value of the --root-dir command line argument,
    ///
    ///   3. Otherwise, ~/.writer_llm
    ///
    #[structopt(short, long)]
    pub root_dir: Option<String>,

    /// Listen on this port instead of the configured one.
    #[structopt(short = "p", long)]
    pub http_port: Option<u16>,
}

// ---------------------------------------------------------------------------
// Parms:
// ---------------------------------------------------------------------------
#[derive(Debug)]
#[allow(dead_code)]
pub struct Parms {
    pub config_file: String,
    pub config: Config,
}

// ---------------------------------------------------------------------------
// RuntimeCtx:
// ---------------------------------------------------------------------------
#[derive(Debug)]
#[allow(dead_code)]
pub struct RuntimeCtx {
    pub parms: Parms,
    pub writer_args: &'static WriterArgs,
    pub writer_dirs: &'static WriterDirs,
}

// ---------------------------------------------------------------------------
// Config:
// ---------------------------------------------------------------------------
#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub title: String,
    pub http_addr: String,
    pub http_port: u16,
    pub shutdown_timeout_secs: u64,
}

impl Config {
    pub fn new() -> Self {
        Config::default()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: "Writer LLM Server".to_string(),
            http_addr: DEFAULT_HTTP_ADDR.to_string(),
            http_port: DEFAULT_HTTP_PORT,
            shutdown_timeout_secs: DEFAULT_SHUTDOWN_SECS,
        }
    }
}

// ***************************************************************************
//                            Directory Functions
// ***************************************************************************
// ---------------------------------------------------------------------------
// init_writer_args:
// ---------------------------------------------------------------------------
/** Get the command line arguments. */
fn init_writer_args() -> WriterArgs {
    WriterArgs::from_args()
}

// ---------------------------------------------------------------------------
// init_writer_dirs:
// ---------------------------------------------------------------------------
/** Calculate the external data directories.  The directories are not created
 * here; missing files under them fall back to default settings.
 */
fn init_writer_dirs() -> WriterDirs {
    let root_dir = resolve_root_dir(env::var(ENV_ROOT_DIR).ok(), WRITER_ARGS.root_dir.clone());
    let config_dir = root_dir.clone() + CONFIG_DIR;
    WriterDirs { root_dir, config_dir }
}

// ---------------------------------------------------------------------------
// resolve_root_dir:
// ---------------------------------------------------------------------------
fn resolve_root_dir(env_dir: Option<String>, arg_dir: Option<String>) -> String {
    // Order of precedence:
    //  1. Environment variable
    //  2. Command line --root-dir argument
    //  3. Default location
    //
    let root_dir = env_dir
        .or(arg_dir)
        .unwrap_or_else(|| DEFAULT_ROOT_DIR.to_string());

    // Canonicalize the path.
    get_absolute_path(&root_dir)
}

// ***************************************************************************
//                               Log Functions
// ***************************************************************************
// ---------------------------------------------------------------------------
// init_log:
// ---------------------------------------------------------------------------
/** Initialize log4rs from the config directory's log4rs.yml if one exists,
 * otherwise log to the console at info level.
 */
pub fn init_log() -> Result<()> {
    let logconfig = init_log_config();
    if Path::new(&logconfig).is_file() {
        if let Err(e) = log4rs::init_file(&logconfig, Default::default()) {
            println!("{}", e);
            return Err(anyhow!(Errors::Log4rsInitialization(logconfig)));
        }
        info!("Log4rs initialized using: {}", logconfig);
    } else {
        init_default_log()?;
        info!("Log4rs initialized with console defaults, no file at: {}", logconfig);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// init_default_log:
// ---------------------------------------------------------------------------
fn init_default_log() -> Result<()> {
    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(DEFAULT_LOG_PATTERN)))
        .build();

    let config = LogConfig::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(LevelFilter::Info))
        .map_err(|e| Errors::Log4rsDefaultConfig(e.to_string()))?;

    log4rs::init_config(config).map_err(|e| Errors::Log4rsDefaultConfig(e.to_string()))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// init_log_config:
// ---------------------------------------------------------------------------
fn init_log_config() -> String {
    WRITER_DIRS.config_dir.clone() + LOG4RS_CONFIG_FILE
}

// ***************************************************************************
//                             Parms Functions
// ***************************************************************************
// ---------------------------------------------------------------------------
// get_parms:
// ---------------------------------------------------------------------------
/** Retrieve the application parameters from the configuration file in the
 * config directory.  If the file doesn't exist, default values are used.
 */
fn get_parms() -> Result<Parms> {
    let config_file = WRITER_DIRS.config_dir.clone() + APP_CONFIG_FILE;
    read_parms(&config_file)
}

// ---------------------------------------------------------------------------
// read_parms:
// ---------------------------------------------------------------------------
fn read_parms(config_file: &str) -> Result<Parms> {
    // Read the configuration file.
    let config_file_abs = get_absolute_path(config_file);
    info!("{}", Errors::ReadingConfigFile(config_file_abs.clone()));
    let contents = match fs::read_to_string(&config_file_abs) {
        Ok(c) => c,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!("Unable to read configuration at {}. Using default values.", config_file_abs);
            return Ok(Parms { config_file: Default::default(), config: Config::new() });
        }
        Err(e) => {
            error!("{}: {}", Errors::ReadingConfigFile(config_file_abs), e);
            return Err(anyhow!(Errors::IOError(e)));
        }
    };

    let config = parse_config(&contents, &config_file_abs)?;
    Ok(Parms { config_file: config_file_abs, config })
}

// ---------------------------------------------------------------------------
// parse_config:
// ---------------------------------------------------------------------------
/** Parse the toml configuration.  Keys that are not present keep their default. */
fn parse_config(contents: &str, config_file: &str) -> Result<Config> {
    match toml::from_str(contents) {
        Ok(c)  => Ok(c),
        Err(e) => {
            let msg = format!("{}\n   {}", Errors::TOMLParseError(config_file.to_string()), e);
            error!("{}", msg);
            Result::Err(anyhow!(msg))
        }
    }
}

// ***************************************************************************
//                             Config Functions
// ***************************************************************************
// ---------------------------------------------------------------------------
// init_runtime_context:
// ---------------------------------------------------------------------------
pub fn init_runtime_context() -> Result<RuntimeCtx> {
    let mut parms = get_parms()?;

    // The command line port wins over the file.
    if let Some(port) = WRITER_ARGS.http_port {
        parms.config.http_port = port;
    }

    Ok(RuntimeCtx {parms, writer_args: &WRITER_ARGS, writer_dirs: &WRITER_DIRS})
}
