use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use color_eyre::Result;
use color_eyre::eyre::{WrapErr, eyre};

use jqwrap::config;
use jqwrap::{JqExecutor, JqParams};

/// Run jq filters through the bundled jq binary
#[derive(Parser, Debug)]
#[command(version, about = "Run jq filters through the bundled jq binary")]
struct Args {
    /// jq filter expression
    #[arg(required_unless_present = "print_jq_path")]
    filter: Option<String>,

    /// Input JSON file (if not provided, reads from stdin)
    input: Option<PathBuf>,

    /// Output raw strings, not JSON texts
    #[arg(short = 'r', long)]
    raw_output: bool,

    /// Compact instead of pretty-printed output
    #[arg(short = 'c', long)]
    compact_output: bool,

    /// Disable colored output
    #[arg(short = 'M', long)]
    monochrome_output: bool,

    /// Force colored output
    #[arg(short = 'C', long)]
    color_output: bool,

    /// Read all inputs into an array and run the filter once
    #[arg(short = 's', long)]
    slurp: bool,

    /// Use null as the single input value
    #[arg(short = 'n', long)]
    null_input: bool,

    /// Set the exit status from the last output value
    #[arg(short = 'e', long)]
    exit_status: bool,

    /// Escape non-ASCII characters in output
    #[arg(short = 'a', long)]
    ascii_output: bool,

    /// Sort object keys in output
    #[arg(short = 'S', long)]
    sort_keys: bool,

    /// No newline after each output
    #[arg(short = 'j', long)]
    join_output: bool,

    /// Indent with tabs
    #[arg(long)]
    tab: bool,

    /// Indent with N spaces
    #[arg(long, value_name = "N")]
    indent: Option<u32>,

    /// Bind $NAME to a string value
    #[arg(long, num_args = 2, value_names = ["NAME", "VALUE"], action = ArgAction::Append)]
    arg: Vec<String>,

    /// Bind $NAME to a JSON value
    #[arg(long, num_args = 2, value_names = ["NAME", "JSON"], action = ArgAction::Append)]
    argjson: Vec<String>,

    /// Bind $NAME to an array of the JSON values in FILE
    #[arg(long, num_args = 2, value_names = ["NAME", "FILE"], action = ArgAction::Append)]
    slurpfile: Vec<String>,

    /// Bind $NAME to the contents of FILE as a string
    #[arg(long, num_args = 2, value_names = ["NAME", "FILE"], action = ArgAction::Append)]
    rawfile: Vec<String>,

    /// Use this jq binary instead of the bundled one
    #[arg(long, env = "JQWRAP_JQ")]
    jq: Option<PathBuf>,

    /// Print the resolved jq path and exit
    #[arg(long)]
    print_jq_path: bool,
}

fn main() -> Result<ExitCode> {
    init_logging();
    color_eyre::install()?;

    let args = Args::parse();

    let executor = build_executor(&args)?;

    if args.print_jq_path {
        println!("{}", executor.binary().display());
        return Ok(ExitCode::SUCCESS);
    }

    let params = build_params(&args)?;
    let result = executor.execute(&params)?;

    if !result.stdout().is_empty() {
        if args.join_output {
            print!("{}", result.stdout());
            std::io::stdout().flush()?;
        } else {
            println!("{}", result.stdout());
        }
    }
    if !result.stderr().is_empty() {
        eprintln!("{}", result.stderr());
    }

    log::debug!("jq finished with exit code {}", result.exit_code());

    // Codes outside 0..=255 (signal termination) become a generic failure
    Ok(ExitCode::from(u8::try_from(result.exit_code()).unwrap_or(1)))
}

/// Logs go to stderr, filtered by JQWRAP_LOG (default: warn)
fn init_logging() {
    use std::time::SystemTime;

    env_logger::Builder::from_env(env_logger::Env::default().filter_or("JQWRAP_LOG", "warn"))
        .format(|buf, record| {
            let datetime: chrono::DateTime<chrono::Local> = SystemTime::now().into();
            writeln!(
                buf,
                "[{}] [{}] {}",
                datetime.format("%Y-%m-%dT%H:%M:%S%.3f"),
                record.level(),
                record.args()
            )
        })
        .init();
}

fn build_executor(args: &Args) -> Result<JqExecutor> {
    let config_result = config::load_config();
    if let Some(warning) = &config_result.warning {
        eprintln!("Warning: {}", warning);
    }

    let mut config = config_result.config;
    if let Some(jq) = &args.jq {
        config.binary.path = Some(jq.clone());
    }

    Ok(JqExecutor::from_config(&config)?)
}

fn build_params(args: &Args) -> Result<JqParams> {
    let filter = args
        .filter
        .as_deref()
        .ok_or_else(|| eyre!("A filter is required"))?;

    let mut params = JqParams::new(filter)?
        .raw_output(args.raw_output)
        .compact_output(args.compact_output)
        .monochrome_output(args.monochrome_output)
        .color_output(args.color_output)
        .slurp(args.slurp)
        .null_input(args.null_input)
        .exit_status(args.exit_status)
        .ascii_output(args.ascii_output)
        .sort_keys(args.sort_keys)
        .join_output(args.join_output)
        .tab(args.tab);

    if let Some(width) = args.indent {
        params = params.indent(width);
    }

    for pair in args.arg.chunks_exact(2) {
        params = params.arg(&pair[0], &pair[1]);
    }

    for pair in args.argjson.chunks_exact(2) {
        // Validate only; jq gets the text as written so key order and numbers survive
        serde_json::from_str::<serde_json::Value>(&pair[1])
            .wrap_err_with(|| format!("Invalid JSON text passed to --argjson {}", pair[0]))?;
        params = params.arg_json(&pair[0], &pair[1]);
    }

    for pair in args.slurpfile.chunks_exact(2) {
        params = params.slurp_file(&pair[0], &pair[1]);
    }

    for pair in args.rawfile.chunks_exact(2) {
        params = params.raw_file(&pair[0], &pair[1]);
    }

    if !args.null_input {
        params = params.json(read_input(args.input.as_deref())?);
    }

    Ok(params)
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read {}", path.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .wrap_err("Failed to read stdin")?;
            Ok(buf)
        }
    }
}
