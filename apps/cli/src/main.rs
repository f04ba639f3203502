use anyhow::{anyhow, Context};
use chainlens_agents::{select_operations, AnalystRole, OperatingMode, Operation, ToolCall, Toolkit};
use chainlens_market_intel::{AssetSymbol, IntelConfig, IntelHub};
use clap::Parser;
use serde_json::{json, Map, Value};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Run one crypto analyst operation and print its text.
#[derive(Debug, Parser)]
#[command(name = "chainlens", version, about)]
struct Cli {
    /// Operation wire name, e.g. `get_crypto_price_data`. `list` prints all names.
    operation: String,

    #[arg(long)]
    symbol: Option<String>,

    #[arg(long)]
    days: Option<u32>,

    /// Trending list size.
    #[arg(long)]
    limit: Option<usize>,

    #[arg(long)]
    hours: Option<u32>,

    #[arg(long)]
    max_articles: Option<usize>,

    /// Check the operation against this role's profile before running it.
    #[arg(long, requires = "symbol")]
    role: Option<String>,

    #[arg(long, default_value = "crypto")]
    mode: String,

    #[arg(long)]
    online: bool,
}

impl Cli {
    fn arguments(&self) -> Value {
        let mut args = Map::new();
        if let Some(symbol) = &self.symbol {
            args.insert("symbol".into(), json!(symbol));
        }
        if let Some(days) = self.days {
            args.insert("days".into(), json!(days));
        }
        if let Some(limit) = self.limit {
            args.insert("limit".into(), json!(limit));
        }
        if let Some(hours) = self.hours {
            args.insert("hours".into(), json!(hours));
        }
        if let Some(max) = self.max_articles {
            args.insert("maxArticles".into(), json!(max));
        }
        Value::Object(args)
    }
}

fn init_tracing() {
    let log_format = std::env::var("CHAINLENS_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false).with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    if cli.operation == "list" {
        for op in Operation::ALL {
            let scope = if op.is_crypto() { "crypto" } else { "standard" };
            println!("{:<45} {}", op.name(), scope);
        }
        return Ok(());
    }

    let op = Operation::from_name(&cli.operation).ok_or_else(|| anyhow!("unknown operation: {}", cli.operation))?;
    let toolkit = Toolkit::new(IntelHub::from_config(&IntelConfig::from_env()));
    let arguments = cli.arguments();

    let text = match (&cli.role, &cli.symbol) {
        (Some(role), Some(symbol)) => {
            let mode = OperatingMode::parse(&cli.mode, cli.online)?;
            let role: AnalystRole = role.parse()?;
            let asset = AssetSymbol::parse(symbol)?;
            let profile = select_operations(mode, role, &asset);
            let call = ToolCall::new("cli", op.name(), arguments);
            toolkit
                .dispatch(&profile, &call)
                .await
                .with_context(|| format!("{} as {} analyst", op, role))?
                .text
        }
        _ => toolkit.run(op, &arguments).await?.0,
    };

    println!("{}", text);
    Ok(())
}
