use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use tracing::{info, Level};

use vipddl::config::ConnectionConfig;
use vipddl::ddl_generator::{DdlGenerator, TypeMapRegistry};
use vipddl::ddl_sink::{apply_schema, DatabaseSink, RunSummary, WriterSink};
use vipddl::error::DdlError;
use vipddl::schema_model::SchemaDocument;
use vipddl::types::Dialect;

#[derive(Parser)]
#[command(name = "vipddl")]
#[command(about = "Create a relational database schema from a parsed VIP XML Schema")]
#[command(version)]
#[command(long_about = "vipddl reads a parsed XML Schema model (simple types, complex types and top-level elements) and creates the equivalent tables in sqlite3, MySQL or PostgreSQL. Each statement is committed as soon as it is executed; a failure part way through leaves the statements before it in place.")]
#[command(after_help = "EXAMPLES:
    # Create the schema in a local SQLite file
    vipddl create -s vip_schema.json -d sqlite3 --host vip.db

    # Create the schema in PostgreSQL
    vipddl create -s vip_schema.json -d postgres --host localhost -n vip -u vip -p secret

    # Write the MySQL statements to a file for review
    vipddl generate -s vip_schema.json -d mysql -o schema.sql")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Set log level explicitly
    #[arg(long, global = true, value_enum)]
    log_level: Option<LogLevel>,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,
}

#[derive(ValueEnum, Clone, Debug)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

#[derive(Args, Debug)]
struct SchemaArgs {
    /// Parsed schema model (JSON)
    #[arg(short, long, value_name = "FILE")]
    schema: PathBuf,

    /// Database type: sqlite3, mysql or postgres
    #[arg(short = 'd', long = "dialect", default_value = "sqlite3", value_parser = parse_dialect)]
    dialect: Dialect,

    /// Replacement type map (JSON, same layout as the built-in one)
    #[arg(long, value_name = "FILE")]
    type_map: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the schema in a live database
    Create {
        #[command(flatten)]
        schema: SchemaArgs,

        /// Database host address; the database file path for sqlite3
        #[arg(long, default_value = "localhost")]
        host: String,

        /// Database port (driver default when omitted)
        #[arg(long)]
        port: Option<u16>,

        /// Database name the data is stored in
        #[arg(short = 'n', long = "name", default_value = "vip")]
        database: String,

        /// Username to access the database
        #[arg(short, long, default_value = "username")]
        user: String,

        /// Password for the database user
        #[arg(short, long, default_value = "password")]
        password: String,
    },

    /// Write the statements to a file or stdout instead of executing them
    Generate {
        #[command(flatten)]
        schema: SchemaArgs,

        /// Output SQL file (stdout when omitted)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

fn parse_dialect(value: &str) -> Result<Dialect, String> {
    value.parse::<Dialect>().map_err(|e| e.to_string())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    initialize_logging(&cli)?;

    info!("Starting vipddl v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Create {
            schema,
            host,
            port,
            database,
            user,
            password,
        } => {
            let config = ConnectionConfig {
                dialect: schema.dialect,
                host,
                port,
                database,
                user,
                password,
            };
            info!("Creating schema from {:?} in {}", schema.schema, config.describe());

            match execute_create(&schema, &config).await {
                Ok(summary) => {
                    info!("Schema created successfully!");
                    info!("Summary: {}", summary.summary());
                }
                Err(e) => {
                    eprintln!("Schema creation failed: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Commands::Generate { schema, output } => {
            info!("Generating {} statements from {:?}", schema.dialect, schema.schema);

            match execute_generate(&schema, output.as_ref()).await {
                Ok(summary) => {
                    info!("Summary: {}", summary.summary());
                    if let Some(path) = &output {
                        info!("DDL written to: {:?}", path);
                    }
                }
                Err(e) => {
                    eprintln!("Generation failed: {}", e);
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}

fn load_inputs(args: &SchemaArgs) -> Result<(SchemaDocument, TypeMapRegistry), DdlError> {
    let registry = match &args.type_map {
        Some(path) => TypeMapRegistry::from_path(path)?,
        None => TypeMapRegistry::builtin()?,
    };
    let document = SchemaDocument::from_path(&args.schema)?;
    Ok((document, registry))
}

/// Connect and apply every statement to the configured database
async fn execute_create(args: &SchemaArgs, config: &ConnectionConfig) -> Result<RunSummary, DdlError> {
    let (document, registry) = load_inputs(args)?;
    let generator = DdlGenerator::new(config.dialect, &registry)?;

    let mut sink = DatabaseSink::connect(config).await?;
    info!("Connected to {}", config.describe());

    apply_schema(&generator, &document, &mut sink).await
}

/// Write every statement to a file or stdout
async fn execute_generate(args: &SchemaArgs, output: Option<&PathBuf>) -> Result<RunSummary, DdlError> {
    let (document, registry) = load_inputs(args)?;
    let generator = DdlGenerator::new(args.dialect, &registry)?;

    match output {
        Some(path) => {
            let file = BufWriter::new(File::create(path)?);
            let mut sink = WriterSink::with_header(file, args.dialect)?;
            apply_schema(&generator, &document, &mut sink).await
        }
        None => {
            let mut sink = WriterSink::new(io::stdout().lock());
            apply_schema(&generator, &document, &mut sink).await
        }
    }
}

/// Initialize logging based on CLI configuration
fn initialize_logging(cli: &Cli) -> Result<()> {
    let log_level = if let Some(level) = &cli.log_level {
        level.clone().into()
    } else if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    // statements may go to stdout, keep logs on stderr
    if cli.json_logs {
        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_target(false)
            .with_thread_ids(cli.verbose)
            .with_file(cli.verbose)
            .with_line_number(cli.verbose)
            .with_writer(io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_target(false)
            .with_thread_ids(cli.verbose)
            .with_file(cli.verbose)
            .with_line_number(cli.verbose)
            .with_writer(io::stderr)
            .init();
    }

    Ok(())
}
