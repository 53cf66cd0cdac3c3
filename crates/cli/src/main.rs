//! TradeGuard CLI - Main entry point

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tradeguard_cli::{commands, AppContext};
use tradeguard_core::{Address, PairId, Period};
use tradeguard_engine::{AnalysisRequest, CallContext, ScreenRequest, TradeRequest};

#[derive(Parser)]
#[command(name = "tradeguard")]
#[command(about = "TradeGuard - DEX fraud risk engine", long_about = None)]
struct Cli {
    /// Data directory path
    #[arg(short, long, default_value = "./data")]
    data: PathBuf,

    /// JSON config file (defaults apply when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Audit the journal (verify hash chain)
    Audit,

    #[command(flatten)]
    Engine(EngineCommands),
}

/// Commands that run against a replayed engine
#[derive(Subcommand)]
enum EngineCommands {
    /// Initialize the engine with its owner
    Init {
        /// Owner address
        #[arg(long)]
        owner: Address,
    },

    /// Record an executed trade
    RecordTrade {
        /// Sender address
        sender: Address,
        /// Pair as TOKEN_A/TOKEN_B
        pair: PairId,
        /// Execution price
        #[arg(long)]
        price: u64,
        /// Trade volume
        #[arg(long)]
        volume: u64,
        /// Counterparty address
        #[arg(long)]
        counterparty: Address,
        /// Period (block height) of the trade
        #[arg(long)]
        period: u64,
    },

    /// Analyze the fraud risk of a prospective trade
    Analyze {
        /// User address
        user: Address,
        /// Pair as TOKEN_A/TOKEN_B
        pair: PairId,
        /// Quoted price
        #[arg(long)]
        price: u64,
        /// Requested volume
        #[arg(long)]
        volume: u64,
        /// Period to analyze at
        #[arg(long)]
        period: u64,
        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Screen a prospective trade (proceed / warn / block)
    Screen {
        /// User address
        user: Address,
        /// Pair as TOKEN_A/TOKEN_B
        pair: PairId,
        /// Quoted price
        #[arg(long)]
        price: u64,
        /// Requested volume
        #[arg(long)]
        volume: u64,
        /// Period to screen at
        #[arg(long)]
        period: u64,
    },

    /// Flag an address (owner only)
    Flag {
        /// Address to flag
        address: Address,
        /// Manual risk score
        #[arg(long)]
        score: u32,
        /// Reason (at most 50 bytes)
        #[arg(long)]
        reason: String,
        /// Calling address
        #[arg(long)]
        caller: Address,
        /// Current period
        #[arg(long)]
        period: u64,
    },

    /// Remove a flag (owner only)
    Unflag {
        /// Address to unflag
        address: Address,
        /// Calling address
        #[arg(long)]
        caller: Address,
        /// Current period
        #[arg(long)]
        period: u64,
    },

    /// Switch fraud detection on/off (owner only)
    Toggle {
        /// Calling address
        #[arg(long)]
        caller: Address,
        /// Current period
        #[arg(long)]
        period: u64,
    },

    /// Transfer ownership (owner only)
    SetOwner {
        /// New owner address
        new_owner: Address,
        /// Calling address
        #[arg(long)]
        caller: Address,
        /// Current period
        #[arg(long)]
        period: u64,
    },

    /// Show owner, switch and flagged addresses
    Status,

    /// Show activity, wash score and flag for an address
    Inspect {
        /// Address to inspect
        address: Address,
        /// Period for activity lookup
        #[arg(long)]
        period: u64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        // Audit must work even when the journal no longer replays
        Commands::Audit => {
            let ok = commands::audit(&cli.data.join("journal.jsonl"))?;
            if !ok {
                std::process::exit(1);
            }
        }
        Commands::Engine(command) => {
            let mut ctx = AppContext::new(&cli.data, cli.config.as_deref()).await?;
            run(&mut ctx, command).await?;
        }
    }

    Ok(())
}

async fn run(ctx: &mut AppContext, command: EngineCommands) -> anyhow::Result<()> {
    match command {
        EngineCommands::Init { owner } => {
            commands::init(ctx, owner).await?;
        }

        EngineCommands::RecordTrade {
            sender,
            pair,
            price,
            volume,
            counterparty,
            period,
        } => {
            let call = CallContext::new(sender, Period::new(period));
            let trade = TradeRequest {
                pair,
                price,
                volume,
                counterparty,
            };
            commands::record_trade(ctx, &call, &trade).await?;
        }

        EngineCommands::Analyze {
            user,
            pair,
            price,
            volume,
            period,
            json,
        } => {
            let request = AnalysisRequest {
                user,
                pair,
                volume,
                price,
            };
            commands::analyze(ctx, Period::new(period), &request, json).await?;
        }

        EngineCommands::Screen {
            user,
            pair,
            price,
            volume,
            period,
        } => {
            let request = ScreenRequest {
                period: Period::new(period),
                request: AnalysisRequest {
                    user,
                    pair,
                    volume,
                    price,
                },
            };
            commands::screen(ctx, request).await?;
        }

        EngineCommands::Flag {
            address,
            score,
            reason,
            caller,
            period,
        } => {
            let call = CallContext::new(caller, Period::new(period));
            commands::flag(ctx, &call, &address, score, &reason).await?;
        }

        EngineCommands::Unflag {
            address,
            caller,
            period,
        } => {
            let call = CallContext::new(caller, Period::new(period));
            commands::unflag(ctx, &call, &address).await?;
        }

        EngineCommands::Toggle { caller, period } => {
            let call = CallContext::new(caller, Period::new(period));
            commands::toggle(ctx, &call).await?;
        }

        EngineCommands::SetOwner {
            new_owner,
            caller,
            period,
        } => {
            let call = CallContext::new(caller, Period::new(period));
            commands::set_owner(ctx, &call, &new_owner).await?;
        }

        EngineCommands::Status => {
            commands::status(ctx).await?;
        }

        EngineCommands::Inspect { address, period } => {
            commands::inspect(ctx, &address, Period::new(period)).await?;
        }
    }

    Ok(())
}
