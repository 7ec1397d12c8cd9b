//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;
use std::time::Duration;

use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_file_store::JsonFileStore;
use crate::adapters::log_notifier::LogNotifier;
use crate::domain::alert::AlertCondition;
use crate::domain::calc::{self, QuantityUnit, TradeDirection};
use crate::domain::config::MonitorConfig;
use crate::domain::error::GoldwatchError;
use crate::domain::format::{format_currency, format_percent};
use crate::domain::portfolio::{InstrumentType, Position};
use crate::domain::store::AppStore;

#[derive(Parser, Debug)]
#[command(name = "goldwatch", about = "Spot-gold price monitor and risk toolkit")]
pub struct Cli {
    /// Path to an INI config file; defaults apply when omitted
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print one simulated price snapshot
    Price,
    /// Run the periodic monitor loop: refresh, evaluate alerts, print a ticker line
    Watch {
        /// Stop after this many refreshes (0 = run until interrupted)
        #[arg(long, default_value_t = 0)]
        ticks: u64,
    },
    /// ATR-based stop loss calculator
    AtrStop {
        #[arg(long)]
        price: f64,
        #[arg(long)]
        atr: f64,
        #[arg(long, default_value_t = 2.0)]
        multiplier: f64,
        /// long or short
        #[arg(long, default_value = "long")]
        direction: String,
    },
    /// Fixed-fractional position size calculator
    PositionSize {
        #[arg(long)]
        balance: f64,
        /// Risk per trade as a percentage of the balance
        #[arg(long)]
        risk: f64,
        #[arg(long)]
        entry: f64,
        #[arg(long)]
        stop: f64,
    },
    /// Classical pivot point levels from the prior session
    Pivots {
        #[arg(long)]
        high: f64,
        #[arg(long)]
        low: f64,
        #[arg(long)]
        close: f64,
    },
    /// Manage price alerts
    Alert {
        #[command(subcommand)]
        command: AlertCommand,
    },
    /// Manage portfolio positions
    Position {
        #[command(subcommand)]
        command: PositionCommand,
    },
    /// Value the portfolio against a fresh snapshot
    Valuate,
}

#[derive(Subcommand, Debug)]
pub enum AlertCommand {
    /// Add an alert, e.g. `alert add --condition ">" --target 2500`
    Add {
        #[arg(long)]
        condition: String,
        #[arg(long)]
        target: f64,
    },
    List,
    /// Flip an alert between active and inactive (no effect once triggered)
    Toggle {
        #[arg(long)]
        id: String,
    },
    Remove {
        #[arg(long)]
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum PositionCommand {
    /// Record a holding, e.g. `position add --instrument physical --quantity 2 --unit oz --cost 1900`
    Add {
        /// physical, etf, or future
        #[arg(long)]
        instrument: String,
        #[arg(long)]
        quantity: f64,
        /// oz, gram, or shares
        #[arg(long)]
        unit: String,
        /// Average cost per troy ounce or share
        #[arg(long)]
        cost: f64,
        #[arg(long)]
        notes: Option<String>,
    },
    List,
    Remove {
        #[arg(long)]
        id: String,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let config = match load_config(cli.config.as_ref()) {
        Ok(config) => config,
        Err(code) => return code,
    };

    let result = match cli.command {
        Command::Price => run_price(&config),
        Command::Watch { ticks } => run_watch(&config, ticks),
        Command::AtrStop {
            price,
            atr,
            multiplier,
            direction,
        } => run_atr_stop(price, atr, multiplier, &direction),
        Command::PositionSize {
            balance,
            risk,
            entry,
            stop,
        } => run_position_size(balance, risk, entry, stop),
        Command::Pivots { high, low, close } => run_pivots(high, low, close),
        Command::Alert { command } => run_alert(&config, command),
        Command::Position { command } => run_position(&config, command),
        Command::Valuate => run_valuate(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: Option<&PathBuf>) -> Result<MonitorConfig, ExitCode> {
    let Some(path) = path else {
        return Ok(MonitorConfig::default());
    };
    let adapter = FileConfigAdapter::from_file(path).map_err(|e| {
        let err = GoldwatchError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })?;
    MonitorConfig::from_port(&adapter).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })
}

fn open_store(config: &MonitorConfig) -> AppStore {
    AppStore::new(
        config.simulator(),
        Box::new(JsonFileStore::new(&config.data_dir)),
        Box::new(LogNotifier),
    )
}

fn parse_direction(s: &str) -> Result<TradeDirection, GoldwatchError> {
    match s {
        "long" => Ok(TradeDirection::Long),
        "short" => Ok(TradeDirection::Short),
        other => Err(GoldwatchError::invalid_input(
            "direction",
            &format!("unknown direction {other:?}, expected long or short"),
        )),
    }
}

fn parse_unit(s: &str) -> Result<QuantityUnit, GoldwatchError> {
    match s {
        "oz" => Ok(QuantityUnit::TroyOunce),
        "gram" => Ok(QuantityUnit::Gram),
        "shares" => Ok(QuantityUnit::Share),
        other => Err(GoldwatchError::invalid_input(
            "unit",
            &format!("unknown unit {other:?}, expected oz, gram, or shares"),
        )),
    }
}

fn parse_instrument(s: &str) -> Result<InstrumentType, GoldwatchError> {
    match s {
        "physical" => Ok(InstrumentType::Physical),
        "etf" => Ok(InstrumentType::Etf),
        "future" => Ok(InstrumentType::Future),
        other => Err(GoldwatchError::invalid_input(
            "instrument",
            &format!("unknown instrument {other:?}, expected physical, etf, or future"),
        )),
    }
}

fn print_snapshot(snapshot: &crate::domain::snapshot::PriceSnapshot) {
    println!(
        "{}  {}  {} 24h  (high {}, low {})",
        snapshot.timestamp.format("%Y-%m-%d %H:%M:%S"),
        format_currency(snapshot.price, &snapshot.currency),
        format_percent(snapshot.change_percent_24h),
        format_currency(snapshot.high_24h, &snapshot.currency),
        format_currency(snapshot.low_24h, &snapshot.currency),
    );
}

fn run_price(config: &MonitorConfig) -> Result<(), GoldwatchError> {
    let snapshot = config.simulator().next_snapshot();
    print_snapshot(&snapshot);
    Ok(())
}

fn run_watch(config: &MonitorConfig, ticks: u64) -> Result<(), GoldwatchError> {
    let mut store = open_store(config);
    eprintln!(
        "Watching simulated feed every {}s ({} alerts, {} positions)",
        config.refresh_secs,
        store.alerts().len(),
        store.positions().len(),
    );

    let period = Duration::from_secs(config.refresh_secs);
    let mut refreshes = 0u64;
    loop {
        let fired = store.refresh_price();
        print_snapshot(store.snapshot());
        if fired > 0 {
            eprintln!("{fired} alert(s) triggered");
        }
        refreshes += 1;
        if ticks != 0 && refreshes >= ticks {
            return Ok(());
        }
        thread::sleep(period);
    }
}

fn run_atr_stop(
    price: f64,
    atr: f64,
    multiplier: f64,
    direction: &str,
) -> Result<(), GoldwatchError> {
    let direction = parse_direction(direction)?;
    let result = calc::atr_stop_loss(price, atr, multiplier, direction)?;
    println!("Stop loss:     {}", format_currency(result.stop_loss, "USD"));
    println!(
        "Stop distance: {} ({} pips)",
        format_currency(result.stop_distance, "USD"),
        result.stop_distance_pips
    );
    Ok(())
}

fn run_position_size(
    balance: f64,
    risk: f64,
    entry: f64,
    stop: f64,
) -> Result<(), GoldwatchError> {
    let result = calc::position_size(balance, risk, entry, stop)?;
    println!("Risk amount:    {}", format_currency(result.risk_amount, "USD"));
    println!(
        "Position size:  {} ({:.4} units)",
        format_currency(result.position_size_currency, "USD"),
        result.position_size_units
    );
    println!(
        "Potential loss: {}",
        format_currency(result.potential_loss, "USD")
    );
    Ok(())
}

fn run_pivots(high: f64, low: f64, close: f64) -> Result<(), GoldwatchError> {
    if high < low {
        return Err(GoldwatchError::invalid_input(
            "high",
            "must not be below low",
        ));
    }
    let levels = calc::pivot_points(high, low, close)?;
    println!("R3: {}", format_currency(levels.r3, "USD"));
    println!("R2: {}", format_currency(levels.r2, "USD"));
    println!("R1: {}", format_currency(levels.r1, "USD"));
    println!("PP: {}", format_currency(levels.pp, "USD"));
    println!("S1: {}", format_currency(levels.s1, "USD"));
    println!("S2: {}", format_currency(levels.s2, "USD"));
    println!("S3: {}", format_currency(levels.s3, "USD"));
    Ok(())
}

fn run_alert(config: &MonitorConfig, command: AlertCommand) -> Result<(), GoldwatchError> {
    let mut store = open_store(config);
    match command {
        AlertCommand::Add { condition, target } => {
            let condition: AlertCondition = condition.parse()?;
            let alert = store.create_alert(condition, target);
            println!("Created alert {}", alert.id);
        }
        AlertCommand::List => {
            for alert in store.alerts() {
                let status = if alert.is_triggered() {
                    "triggered"
                } else if alert.active {
                    "active"
                } else {
                    "inactive"
                };
                println!(
                    "{}  price {} {}  [{}]",
                    alert.id,
                    alert.condition,
                    format_currency(alert.target_value, &config.currency),
                    status
                );
            }
        }
        AlertCommand::Toggle { id } => {
            if !store.toggle_alert(&id) {
                return Err(GoldwatchError::invalid_input(
                    "id",
                    "no untriggered alert with that id",
                ));
            }
            println!("Toggled alert {id}");
        }
        AlertCommand::Remove { id } => {
            if !store.remove_alert(&id) {
                return Err(GoldwatchError::invalid_input("id", "no alert with that id"));
            }
            println!("Removed alert {id}");
        }
    }
    Ok(())
}

fn run_position(config: &MonitorConfig, command: PositionCommand) -> Result<(), GoldwatchError> {
    let mut store = open_store(config);
    match command {
        PositionCommand::Add {
            instrument,
            quantity,
            unit,
            cost,
            notes,
        } => {
            let position = Position::new(
                parse_instrument(&instrument)?,
                quantity,
                parse_unit(&unit)?,
                cost,
                notes,
            );
            let id = position.id.clone();
            store.add_position(position);
            println!("Added position {id}");
        }
        PositionCommand::List => {
            for position in store.positions() {
                println!(
                    "{}  {:?} {} {:?} @ {}",
                    position.id,
                    position.instrument_type,
                    position.quantity,
                    position.unit,
                    format_currency(position.avg_cost_basis, &config.currency),
                );
            }
        }
        PositionCommand::Remove { id } => {
            if !store.remove_position(&id) {
                return Err(GoldwatchError::invalid_input(
                    "id",
                    "no position with that id",
                ));
            }
            println!("Removed position {id}");
        }
    }
    Ok(())
}

fn run_valuate(config: &MonitorConfig) -> Result<(), GoldwatchError> {
    let mut store = open_store(config);
    store.refresh_price();
    print_snapshot(store.snapshot());

    let valuation = store.valuation();
    for entry in &valuation.positions {
        println!(
            "{}  value {}  P/L {} ({})",
            entry.position_id,
            format_currency(entry.valuation.total_value, &config.currency),
            format_currency(entry.valuation.unrealized_pl, &config.currency),
            format_percent(entry.valuation.unrealized_pl_percent),
        );
    }
    let totals = valuation.totals;
    println!(
        "Total: value {}  cost {}  P/L {} ({})",
        format_currency(totals.total_value, &config.currency),
        format_currency(totals.cost_basis, &config.currency),
        format_currency(totals.unrealized_pl, &config.currency),
        format_percent(totals.unrealized_pl_percent),
    );
    Ok(())
}
