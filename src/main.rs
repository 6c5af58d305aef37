use std::path::PathBuf;

use alloy::primitives::{Address, Bytes, B256, U256};
use alloy::providers::Provider;
use alloy::rpc::types::BlockId;
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use entitlement_checker::config::{self, Config};
use entitlement_checker::infrastructure::abi::{AbiLoader, AlloyAbiDecoder};
use entitlement_checker::infrastructure::checker::PendingTx;
use entitlement_checker::modules::export::{self, EventRow, ExportFormat};
use entitlement_checker::modules::toolkit;
use entitlement_checker::{
    confirm, connect, deploy, ensure_node_registered, list_nodes, requests_for, signer_from_env,
    CallOpts, Connection, EntitlementCheckRequest, EntitlementChecker, FilterOpts, ProviderConfig,
    Registration, TransactOpts, WatchOpts,
};

#[derive(Debug, Parser)]
#[command(
    name = "entitlement-checker",
    version,
    about = "Query, transact with, and watch an EntitlementChecker contract"
)]
struct Args {
    /// HTTP JSON-RPC endpoint (e.g. http://localhost:8545)
    #[arg(long, global = true)]
    rpc: Option<String>,

    /// WebSocket endpoint (e.g. ws://localhost:8546)
    #[arg(long, global = true)]
    ws: Option<String>,

    /// IPC path (e.g. ~/.ethereum/geth.ipc). Unix only.
    #[arg(long, global = true)]
    ipc: Option<PathBuf>,

    /// Named endpoint from the config file
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Checker contract address
    #[arg(long, global = true)]
    contract: Option<Address>,

    /// Block to run view calls against (default: latest)
    #[arg(long, global = true)]
    block: Option<u64>,

    /// Extra tracing directives, e.g. `entitlement_checker=debug`
    #[arg(long = "log-level", global = true)]
    log_level: Vec<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List every selector and topic, or compute one for a signature
    Selectors { signature: Option<String> },
    /// Decode calldata or revert data, or log data when topics are given
    Decode {
        data: String,
        /// Log topic, topic0 first; repeat for indexed arguments
        #[arg(long = "topic")]
        topics: Vec<String>,
    },
    /// Encode calldata for a checker method
    Encode { method: String, values: Vec<String> },
    NodeCount,
    NodeAt { index: U256 },
    /// List all registered nodes at a single block
    Nodes,
    NodesByOperator { operator: Address },
    RandomNodes { count: U256 },
    IsValid { node: Address },
    /// Call `__EntitlementChecker_init` through a proxy; a direct deployment
    /// has its initializers disabled and reverts
    Init,
    Register {
        node: Address,
        /// Treat an already registered node as success
        #[arg(long)]
        ensure: bool,
    },
    Unregister { node: Address },
    RequestCheck {
        wallet: Address,
        transaction_id: B256,
        role_id: U256,
        nodes: Vec<Address>,
    },
    RequestCheckV2 {
        wallet: Address,
        transaction_id: B256,
        request_id: U256,
        extra_data: Bytes,
        /// Wei to attach
        #[arg(long)]
        value: Option<U256>,
    },
    /// Deploy a new checker from the embedded bytecode
    Deploy,
    /// Query past events
    Events {
        #[arg(long, default_value_t = 0)]
        from: u64,
        #[arg(long)]
        to: Option<u64>,
        #[arg(long, value_enum, default_value_t = ExportFormat::Table)]
        format: ExportFormat,
        /// Output file; defaults to stdout for tables, the export dir otherwise
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Stream events as they are emitted
    Watch {
        /// Only show check requests that selected this node
        #[arg(long)]
        node: Option<Address>,
        #[arg(long)]
        from: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = config::load()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(config.tracing_env_filter(&args.log_level)?)
        .try_init()?;
    tracing::debug!(path = ?config::config_path(), "config resolved");

    match &args.command {
        Command::Selectors { signature } => {
            let result = match signature {
                Some(signature) => toolkit::selector::selector(signature),
                None => toolkit::selector::selectors(&AbiLoader::checker()),
            };
            println!("{}", result.render());
            Ok(())
        }
        Command::Decode { data, topics } => {
            let decoder = AlloyAbiDecoder::new(AbiLoader::checker());
            let result = if topics.is_empty() {
                toolkit::decode::decode(&decoder, data)?
            } else {
                toolkit::decode::decode_log(&decoder, topics, data)?
            };
            println!("{}", result.render());
            Ok(())
        }
        Command::Encode { method, values } => {
            let result = toolkit::encode::encode(&AbiLoader::checker(), method, values)?;
            println!("{}", result.render());
            Ok(())
        }
        Command::Deploy => {
            let connection = connect_from(&args, &config).await?;
            let opts = transact_opts(&connection)?;
            let checker = deploy(&connection, &opts).await?;
            println!("{}", checker.address());
            Ok(())
        }
        _ => {
            let connection = connect_from(&args, &config).await?;
            let address = args
                .contract
                .or(config.contract)
                .context("No contract address: pass --contract or set `contract` in the config")?;
            let checker = EntitlementChecker::connect(address, &connection);
            run_contract_command(&args, &config, &connection, &checker).await
        }
    }
}

async fn run_contract_command(
    args: &Args,
    config: &Config,
    connection: &Connection,
    checker: &EntitlementChecker,
) -> Result<()> {
    let call_opts = CallOpts {
        block: args.block.map(BlockId::number),
        from: connection.signer,
    };

    match &args.command {
        Command::NodeCount => {
            println!("{}", checker.caller.get_node_count(&call_opts).await?);
        }
        Command::NodeAt { index } => {
            println!("{}", checker.caller.get_node_at_index(&call_opts, *index).await?);
        }
        Command::Nodes => {
            // Pin one block so the count and every index agree
            let block = match args.block {
                Some(block) => block,
                None => connection.provider.get_block_number().await?,
            };
            let session = checker.session(CallOpts::at_block(block), TransactOpts::default());
            for node in list_nodes(&session).await? {
                println!("{node}");
            }
        }
        Command::NodesByOperator { operator } => {
            for node in checker.caller.get_nodes_by_operator(&call_opts, *operator).await? {
                println!("{node}");
            }
        }
        Command::RandomNodes { count } => {
            for node in checker.caller.get_random_nodes(&call_opts, *count).await? {
                println!("{node}");
            }
        }
        Command::IsValid { node } => {
            println!("{}", checker.caller.is_valid_node(&call_opts, *node).await?);
        }
        Command::Init => {
            let opts = transact_opts(connection)?;
            let pending = checker.transactor.entitlement_checker_init(&opts).await?;
            print_receipt(pending).await?;
        }
        Command::Register { node, ensure: true } => {
            let opts = transact_opts(connection)?;
            match ensure_node_registered(checker, *node, &opts).await? {
                Registration::AlreadyRegistered => println!("{node} already registered"),
                Registration::Registered(receipt) => {
                    println!("{node} registered in {}", receipt.transaction_hash)
                }
            }
        }
        Command::Register { node, ensure: false } => {
            let opts = transact_opts(connection)?;
            let pending = checker.transactor.register_node(&opts, *node).await?;
            print_receipt(pending).await?;
        }
        Command::Unregister { node } => {
            let opts = transact_opts(connection)?;
            let pending = checker.transactor.unregister_node(&opts, *node).await?;
            print_receipt(pending).await?;
        }
        Command::RequestCheck {
            wallet,
            transaction_id,
            role_id,
            nodes,
        } => {
            let opts = transact_opts(connection)?;
            let pending = checker
                .transactor
                .request_entitlement_check(&opts, *wallet, *transaction_id, *role_id, nodes.clone())
                .await?;
            print_receipt(pending).await?;
        }
        Command::RequestCheckV2 {
            wallet,
            transaction_id,
            request_id,
            extra_data,
            value,
        } => {
            let mut opts = transact_opts(connection)?;
            if let Some(value) = value {
                opts = opts.with_value(*value);
            }
            let pending = checker
                .transactor
                .request_entitlement_check_v2(&opts, *wallet, *transaction_id, *request_id, extra_data.clone())
                .await?;
            print_receipt(pending).await?;
        }
        Command::Events {
            from,
            to,
            format,
            out,
        } => {
            let opts = FilterOpts {
                start: *from,
                end: *to,
            };
            let records = checker.filterer.filter_all(&opts).await?;
            match (format, out) {
                (ExportFormat::Table, None) => {
                    let rows: Vec<EventRow> = records.iter().map(EventRow::from_record).collect();
                    println!("{}", export::render_table(&rows));
                }
                _ => {
                    let path = export::export_events(&records, *format, out.clone(), config.export_dir())?;
                    println!("{}", path.display());
                }
            }
        }
        Command::Watch { node, from } => {
            let mut watch = checker.filterer.watch_all(&WatchOpts { start: *from }).await?;
            tracing::info!(contract = %checker.address(), "watching events");
            while let Some(item) = watch.next().await {
                let record = item?;
                if let Some(node) = node {
                    let request = EntitlementCheckRequest::from_event(&record.event)
                        .map(|request| record.clone().map(|_| request));
                    if requests_for(*node, request).is_empty() {
                        continue;
                    }
                }
                println!("{}", export::render_row(&EventRow::from_record(&record)));
            }
        }
        Command::Selectors { .. } | Command::Decode { .. } | Command::Encode { .. } | Command::Deploy => {
            unreachable!("handled without a contract binding")
        }
    }
    Ok(())
}

async fn connect_from(args: &Args, config: &Config) -> Result<Connection> {
    let endpoint = endpoint_from_args_and_config(args, config)?;
    let signer = signer_from_env(config.private_key_env())?;
    connect(endpoint, signer).await
}

fn endpoint_from_args_and_config(args: &Args, config: &Config) -> Result<ProviderConfig> {
    // CLI arguments take precedence
    if let Some(ipc) = args.ipc.clone() {
        #[cfg(unix)]
        return Ok(ProviderConfig::Ipc(ipc));
        #[cfg(not(unix))]
        {
            let _ = ipc;
            bail!("IPC is not supported on this platform");
        }
    }
    if let Some(ws) = args.ws.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        return Ok(ProviderConfig::WebSocket(ws.to_string()));
    }
    if let Some(rpc) = args.rpc.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        return Ok(ProviderConfig::Http(config::normalize_http_endpoint(rpc)));
    }

    if let Some(endpoint) = config.endpoint(args.endpoint.as_deref()) {
        return Ok(endpoint);
    }
    if let Some(name) = &args.endpoint {
        bail!("No usable endpoint named '{name}' in the config");
    }
    Ok(ProviderConfig::Http("http://localhost:8545".to_string()))
}

fn transact_opts(connection: &Connection) -> Result<TransactOpts> {
    let Some(from) = connection.signer else {
        bail!("This command sends a transaction; set a private key in the configured key variable");
    };
    Ok(TransactOpts {
        from: Some(from),
        ..TransactOpts::default()
    })
}

async fn print_receipt(pending: PendingTx) -> Result<()> {
    let tx_hash = *pending.tx_hash();
    tracing::info!(%tx_hash, "transaction submitted");
    let receipt = confirm(pending).await?;
    println!(
        "{} mined in block {}",
        tx_hash,
        receipt
            .block_number
            .map(|n| n.to_string())
            .unwrap_or_else(|| "?".to_string())
    );
    Ok(())
}
