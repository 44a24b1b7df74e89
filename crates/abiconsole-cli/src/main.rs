//! abiconsole CLI
//!
//! Inspect a contract interface and invoke its operations from the terminal.

mod config;

use abiconsole_abi::{OperationClass, Registry};
use abiconsole_client::{
    connect, format_outcome, Capability, HttpProvider, Provider, Session, SessionConfig,
};
use abiconsole_exporter::{export_solidity, summarize};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::{load_file_config, CallConfig, FileConfig, Overrides};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::{fs, io};
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "abiconsole")]
#[command(about = "Inspect and invoke smart-contract operations from their ABI", long_about = None)]
struct Cli {
    /// Log dispatcher activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the callable operations of an ABI
    Inspect {
        /// Path to the ABI JSON file
        #[arg(short, long)]
        abi: PathBuf,
    },

    /// Print the one-line summary of every operation
    Summary {
        /// Path to the ABI JSON file
        #[arg(short, long)]
        abi: PathBuf,

        /// Interface name (defaults to the file name)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Export the ABI as a Solidity interface
    Export {
        /// Path to the ABI JSON file
        #[arg(short, long)]
        abi: PathBuf,

        /// Interface name
        #[arg(short, long)]
        name: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Invoke an operation on a deployed contract
    Call {
        /// Path to a JSON config file (address, abi, rpc_url, poll_interval_ms)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Path to the ABI JSON file
        #[arg(long)]
        abi: Option<PathBuf>,

        /// Contract address
        #[arg(long)]
        address: Option<String>,

        /// JSON-RPC endpoint
        #[arg(long)]
        rpc_url: Option<String>,

        /// Receipt polling interval in milliseconds
        #[arg(long)]
        poll_interval_ms: Option<u64>,

        /// Value in wei to attach to a payable operation
        #[arg(long)]
        value: Option<String>,

        /// Operation name, or full signature for overloads
        operation: String,

        /// Arguments, in declaration order (arrays as `[a, b]`, tuples as `(a, b)`)
        args: Vec<String>,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = fmt().with_env_filter(env_filter).with_writer(io::stderr).try_init();
}

fn load_registry(path: &Path) -> Result<Registry> {
    let document =
        fs::read_to_string(path).context(format!("Failed to read ABI file: {:?}", path))?;
    Registry::from_document(&document).context(format!("Failed to parse ABI file: {:?}", path))
}

fn interface_name(path: &Path) -> String {
    path.file_stem().and_then(|s| s.to_str()).unwrap_or("Contract").to_string()
}

fn inspect(path: &Path) -> Result<()> {
    let registry = load_registry(path)?;

    println!("📋 {} operation(s) in {:?}", registry.len(), path);
    println!();
    for operation in registry.functions() {
        println!(
            "   {:<5} 0x{}  {}",
            OperationClass::of(operation).as_str(),
            hex::encode(operation.selector()),
            operation.signature()
        );
    }

    let errors = registry.errors().count();
    let events = registry.events().count();
    if errors + events > 0 {
        println!();
        println!("   Also declared: {} event(s), {} error(s)", events, errors);
    }
    Ok(())
}

fn summary(path: &Path, name: Option<String>) -> Result<()> {
    let registry = load_registry(path)?;
    let name = name.unwrap_or_else(|| interface_name(path));
    println!("{}", summarize(&registry).render_block(&name));
    Ok(())
}

fn export(path: &Path, name: &str, output: Option<PathBuf>) -> Result<()> {
    let registry = load_registry(path)?;
    let source = export_solidity(name, &registry);

    match output {
        Some(output) => {
            fs::write(&output, &source).context(format!("Failed to write {:?}", output))?;
            println!("✅ Interface {} written to {:?}", name, output);
        }
        None => print!("{}", source),
    }
    Ok(())
}

struct CallRequest {
    operation: String,
    args: Vec<String>,
    value: Option<String>,
}

async fn call(config: CallConfig, request: CallRequest) -> Result<()> {
    let document = fs::read_to_string(&config.abi)
        .context(format!("Failed to read ABI file: {:?}", config.abi))?;
    let session = Session::new(
        SessionConfig::new(config.address, document).with_poll_interval(config.poll_interval),
    )
    .context("Failed to initialize session")?;

    let provider: Arc<dyn Provider> = Arc::new(HttpProvider::new(&config.rpc_url)?);
    let class = session.registry().classify(&request.operation)?;
    debug!(rpc_url = %config.rpc_url, class = class.as_str(), "binding contract handle");
    let capability = match class {
        OperationClass::Read => Capability::read_only(provider),
        OperationClass::Write => connect(provider).await.context("Failed to connect wallet")?,
    };
    session.bind(capability);

    for (index, arg) in request.args.iter().enumerate() {
        session.set_slot(&request.operation, index, arg.as_str())?;
    }
    if let Some(value) = request.value {
        session.set_fee(&request.operation, value)?;
    }

    println!("📡 Invoking {} on {}...", request.operation, config.address);
    let invocation = session.invoke(&request.operation).await;
    let report = format_outcome(&invocation.outcome);
    println!("{}", report);

    if !report.is_success() {
        anyhow::bail!("Invocation {} failed", invocation.id);
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Inspect { abi } => inspect(&abi)?,
        Commands::Summary { abi, name } => summary(&abi, name)?,
        Commands::Export { abi, name, output } => export(&abi, &name, output)?,
        Commands::Call {
            config,
            abi,
            address,
            rpc_url,
            poll_interval_ms,
            value,
            operation,
            args,
        } => {
            let file = match config {
                Some(path) => load_file_config(&path)?,
                None => FileConfig::default(),
            };
            let overrides = Overrides { address, abi, rpc_url, poll_interval_ms };
            let config = CallConfig::resolve(file, overrides)?;
            call(config, CallRequest { operation, args, value }).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const ABI: &str = r#"[
        {"type": "function", "name": "getStepCount", "stateMutability": "view",
         "inputs": [], "outputs": [{"name": "", "type": "uint256"}]},
        {"type": "function", "name": "revealEntropy", "stateMutability": "payable",
         "inputs": [{"name": "entropy", "type": "bytes"}], "outputs": []}
    ]"#;

    fn abi_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_load_registry_valid() {
        let file = abi_file(ABI);
        let registry = load_registry(file.path()).unwrap();
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_load_registry_malformed() {
        let file = abi_file(r#"[{"name": "noType"}]"#);
        let err = load_registry(file.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("Malformed descriptor"));
    }

    #[test]
    fn test_load_registry_missing_file() {
        assert!(load_registry(Path::new("/nonexistent/abi.json")).is_err());
    }

    #[test]
    fn test_interface_name_from_file_stem() {
        assert_eq!(interface_name(Path::new("abis/EntropyEngine.json")), "EntropyEngine");
    }

    #[test]
    fn test_export_to_file() {
        let file = abi_file(ABI);
        let output = NamedTempFile::new().unwrap();

        export(file.path(), "IEngine", Some(output.path().to_path_buf())).unwrap();

        let source = fs::read_to_string(output.path()).unwrap();
        assert!(source.contains("interface IEngine {"));
        assert!(source.contains("function revealEntropy(bytes calldata entropy) external payable;"));
    }

    #[test]
    fn test_inspect_and_summary_run() {
        let file = abi_file(ABI);
        inspect(file.path()).unwrap();
        summary(file.path(), Some("IEngine".to_string())).unwrap();
    }

    #[test]
    fn test_cli_parses_call() {
        let cli = Cli::parse_from([
            "abiconsole",
            "call",
            "--config",
            "console.json",
            "--value",
            "1000",
            "revealEntropy",
            "0xdeadbeef",
        ]);
        match cli.command {
            Commands::Call { config, value, operation, args, .. } => {
                assert_eq!(config, Some(PathBuf::from("console.json")));
                assert_eq!(value.as_deref(), Some("1000"));
                assert_eq!(operation, "revealEntropy");
                assert_eq!(args, vec!["0xdeadbeef".to_string()]);
            }
            _ => panic!("expected call subcommand"),
        }
    }
}
