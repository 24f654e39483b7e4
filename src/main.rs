use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use thiserror::Error;

use cidacake::config::{Config, ConfigError};
use cidacake::ledger::{Catalog, LedgerError, MemoryLedger, SourceError, classify};
use cidacake::pda;
use cidacake::subscriber::{self, LoggingError};
use cidacake::{
    Address, CodecError, Product, PurchaseLayout, PurchaseRecord, StoreInstruction, StoreLayout,
    StoreState,
};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Logging error: {0}")]
    Logging(#[from] LoggingError),

    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Account source error: {0}")]
    Source(#[from] SourceError),

    #[error("Invalid hex input: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("No store account given (use --store or [program].store)")]
    NoStore,
}

/// Record kinds that can be decoded from raw account bytes.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum RecordArg {
    /// Store state account.
    Store,
    /// Product account.
    Product,
    /// Purchase history record.
    Purchase,
}

#[derive(Parser)]
#[command(name = "cidacake")]
#[command(about = "Decode Cidacake store accounts, encode instructions and derive addresses")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true, env = "CIDACAKE_CONFIG")]
    config: Option<PathBuf>,

    /// Store program id, overriding the configuration
    #[arg(short, long, global = true, env = "CIDACAKE_PROGRAM")]
    program: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Derive a program address
    Derive {
        #[command(subcommand)]
        target: DeriveTarget,
    },

    /// Encode an instruction payload
    Encode {
        #[command(subcommand)]
        instruction: EncodeInstruction,

        /// Write raw bytes to this file instead of printing hex
        #[arg(short, long, global = true)]
        output: Option<PathBuf>,
    },

    /// Decode raw account bytes
    Decode {
        /// Record kind
        kind: RecordArg,

        #[command(flatten)]
        input: BytesInput,

        /// Layout name (defaults to the configured layout)
        #[arg(short, long)]
        layout: Option<String>,
    },

    /// Decode an instruction payload
    Inspect {
        #[command(flatten)]
        input: BytesInput,
    },

    /// Summarize a directory of account dumps (`<address>.bin`)
    Snapshot {
        /// Directory holding the dumps
        #[arg(short, long)]
        dir: PathBuf,

        /// Store account address (defaults to [program].store)
        #[arg(short, long)]
        store: Option<Address>,

        /// Also list this buyer's purchases
        #[arg(short, long)]
        buyer: Option<Address>,
    },
}

#[derive(Subcommand)]
enum DeriveTarget {
    /// Product account
    Product {
        #[arg(long)]
        id: u64,
    },
    /// Purchase history account
    History {
        #[arg(long)]
        buyer: Address,
        #[arg(long)]
        product_id: u64,
        /// The store's history counter when the purchase was made
        #[arg(long)]
        index: u64,
    },
    /// Token metadata account of a mint
    Metadata {
        #[arg(long)]
        mint: Address,
    },
}

#[derive(Subcommand)]
enum EncodeInstruction {
    Initialize {
        #[arg(long)]
        bump: Option<u8>,
    },
    AddProduct {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        price: u64,
        #[arg(long)]
        stock: u64,
    },
    UpdatePrice {
        #[arg(long)]
        price: u64,
    },
    Sell {
        #[arg(long)]
        quantity: u64,
    },
    SellProduct {
        #[arg(long)]
        product_id: u64,
        #[arg(long)]
        quantity: u64,
    },
    CloseAccount,
    CloseProductAccount {
        #[arg(long)]
        product_id: u64,
    },
}

impl From<EncodeInstruction> for StoreInstruction {
    fn from(cmd: EncodeInstruction) -> Self {
        match cmd {
            EncodeInstruction::Initialize { bump } => Self::Initialize { bump },
            EncodeInstruction::AddProduct {
                name,
                description,
                price,
                stock,
            } => Self::add_product(&name, &description, price, stock),
            EncodeInstruction::UpdatePrice { price } => Self::UpdatePrice { new_price: price },
            EncodeInstruction::Sell { quantity } => Self::Sell { quantity },
            EncodeInstruction::SellProduct {
                product_id,
                quantity,
            } => Self::SellProduct {
                product_id,
                quantity,
            },
            EncodeInstruction::CloseAccount => Self::CloseAccount,
            EncodeInstruction::CloseProductAccount { product_id } => {
                Self::CloseProductAccount { product_id }
            }
        }
    }
}

/// Bytes given inline as hex or read from a file.
#[derive(Args)]
#[group(required = true, multiple = false)]
struct BytesInput {
    /// Hex-encoded bytes
    #[arg(long)]
    hex: Option<String>,

    /// File containing raw bytes
    #[arg(short, long)]
    input: Option<PathBuf>,
}

impl BytesInput {
    fn read(&self) -> Result<Vec<u8>, AppError> {
        match (&self.hex, &self.input) {
            (Some(h), _) => Ok(hex::decode(h.trim().trim_start_matches("0x"))?),
            (None, Some(path)) => Ok(std::fs::read(path)?),
            (None, None) => Ok(Vec::new()),
        }
    }
}

fn main() -> Result<(), AppError> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if let Some(program) = cli.program {
        config.program.id = Some(program);
    }
    subscriber::init(&config.logging)?;

    match cli.command {
        Commands::Derive { target } => {
            let derived = match target {
                DeriveTarget::Product { id } => pda::product_address(&config.program_id()?, id)?,
                DeriveTarget::History {
                    buyer,
                    product_id,
                    index,
                } => pda::history_address(&config.program_id()?, &buyer, product_id, index)?,
                DeriveTarget::Metadata { mint } => pda::metadata_address(&mint)?,
            };
            println!("{}", derived);
            Ok(())
        }
        Commands::Encode {
            instruction,
            output,
        } => {
            let instruction = StoreInstruction::from(instruction);
            let bytes = instruction.encode(&config.opcode_table()?)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, &bytes)?;
                    println!(
                        "Encoded {} to {} ({} bytes)",
                        instruction.name(),
                        path.display(),
                        bytes.len()
                    );
                }
                None => println!("{}", hex::encode(&bytes)),
            }
            Ok(())
        }
        Commands::Decode {
            kind,
            input,
            layout,
        } => {
            let bytes = input.read()?;
            match kind {
                RecordArg::Store => {
                    let layout = match layout {
                        Some(l) => l.parse::<StoreLayout>().map_err(ConfigError::Layout)?,
                        None => config.store_layout()?,
                    };
                    print_store(&StoreState::decode(&bytes, layout)?);
                }
                RecordArg::Product => print_product(&Product::decode(&bytes)?),
                RecordArg::Purchase => {
                    let layout = match layout {
                        Some(l) => l.parse::<PurchaseLayout>().map_err(ConfigError::Layout)?,
                        None => config.purchase_layout()?,
                    };
                    print_purchase(&PurchaseRecord::decode(&bytes, layout)?);
                }
            }
            Ok(())
        }
        Commands::Inspect { input } => {
            let bytes = input.read()?;
            let instruction = StoreInstruction::decode(&bytes, &config.opcode_table()?)?;
            println!("{}", instruction);
            Ok(())
        }
        Commands::Snapshot { dir, store, buyer } => {
            let program = config.store_program()?;
            let store = match store {
                Some(s) => s,
                None => config.store_address()?.ok_or(AppError::NoStore)?,
            };

            let ledger = MemoryLedger::load_dir(&dir, &program.program_id)?;
            println!("Accounts ({}):", ledger.len());
            for (address, account) in ledger.iter() {
                let kind = classify(
                    account.data.len(),
                    program.store_layout,
                    program.purchase_layout,
                )
                .map(|k| k.name())
                .unwrap_or("unknown");
                println!("  {} {:>4} bytes  {}", address, account.data.len(), kind);
            }

            let catalog = Catalog::new(&ledger, program);
            let info = catalog.contract_info(&store)?;
            println!("Program: {}", info.program_id);
            println!("Store:   {}", info.store_address);
            match &info.store {
                Some(state) => print_store(state),
                None => println!("  (store account not found)"),
            }
            for slot in &info.products {
                match &slot.product {
                    Ok(Some(product)) => print_product(product),
                    Ok(None) => println!("Product {}: closed ({})", slot.id, slot.address),
                    Err(e) => println!("Product {}: {}", slot.id, e),
                }
            }

            if let Some(buyer) = buyer {
                let history = catalog.purchase_history(&buyer)?;
                println!("Purchases by {} ({}):", buyer, history.len());
                for record in &history {
                    print_purchase(record);
                }
            }
            Ok(())
        }
    }
}

fn show(value: Option<u64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

fn print_store(state: &StoreState) {
    println!("Store state ({} layout)", state.layout);
    println!("  owner:           {}", state.owner);
    println!("  stock:           {}", show(state.stock));
    println!("  price:           {}", show(state.price));
    println!("  product_counter: {}", show(state.product_counter()));
    println!("  history_counter: {}", show(state.history_counter()));
}

fn print_product(product: &Product) {
    println!("Product {}: {:?}", product.id, product.name);
    println!("  description: {:?}", product.description);
    println!("  price:       {}", product.price);
    println!("  stock:       {}", product.stock);
}

fn print_purchase(record: &PurchaseRecord) {
    println!(
        "  {} product={} quantity={} total={} buyer={}",
        record.timestamp, record.product_id, record.quantity, record.total_price, record.buyer
    );
}
