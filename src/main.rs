use anyhow::Result;
use clap::{Parser, Subcommand};

use growthdash::cli::{self, OutputFormat};
use growthdash::config;
use growthdash::modules::ModuleKind;
use growthdash::render::terminal;

#[derive(Debug, Parser)]
#[command(name = "growthdash")]
#[command(about = "Terminal dashboard for the AI Business Growth Platform API")]
struct App {
    /// Output format: table (default), json
    #[arg(long, global = true, default_value = "table")]
    format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Analyze the sentiment of customer feedback
    Sentiment {
        #[arg(trailing_var_arg = true, required = true, allow_hyphen_values = true)]
        feedback: Vec<String>,
    },
    /// Benchmark a brand against its market
    Benchmark {
        #[arg(trailing_var_arg = true, required = true, allow_hyphen_values = true)]
        brand: Vec<String>,
    },
    /// Compute an optimal price
    Pricing {
        /// Unit cost
        #[arg(long, default_value = "")]
        cost: String,
        /// Demand index (0.5-1.5)
        #[arg(long, default_value = "")]
        demand: String,
        /// Competitor price
        #[arg(long, default_value = "")]
        competitor: String,
    },
    /// Check marketing copy for compliance risks
    Compliance {
        #[arg(trailing_var_arg = true, required = true, allow_hyphen_values = true)]
        text: Vec<String>,
    },
    /// Predict churn risk and next best action from customer history
    Predict {
        #[arg(trailing_var_arg = true, required = true, allow_hyphen_values = true)]
        history: Vec<String>,
    },
    /// Recommend products for a user profile
    Personalize {
        #[arg(trailing_var_arg = true, required = true, allow_hyphen_values = true)]
        profile: Vec<String>,
    },
    /// Generate a marketing campaign strategy
    Campaign {
        /// Product details: what it does, pricing, proof points
        #[arg(long)]
        product: String,
        /// LinkedIn demographics of the target audience
        #[arg(long)]
        audience: String,
    },
    /// Draft a B2B sales pitch for a prospect
    Pitch {
        /// Prospect job title
        #[arg(long)]
        title: String,
        /// Company tier, e.g. "Mid-Market (250-1000 employees)"
        #[arg(long)]
        tier: String,
        /// Product or service info
        #[arg(long, default_value = "")]
        product: String,
    },
    /// Score a lead from budget, timeline and urgency
    LeadScore {
        #[arg(long)]
        budget: String,
        #[arg(long)]
        timeline: String,
        #[arg(long)]
        urgency: String,
        /// Additional context about the lead
        #[arg(long, default_value = "")]
        context: String,
    },
    /// Interactive chat with the AI assistant
    Chat,
    /// Interactive dashboard: sidebar sections, module forms and chat
    Dashboard,
    /// Check backend health
    Health {
        /// Keep polling at the configured interval until interrupted
        #[arg(long)]
        watch: bool,
    },
    /// Check the health endpoint and every module endpoint
    Status,
    /// Show recent activity log entries
    Activity {
        /// Number of entries to show
        #[arg(long, default_value = "20")]
        limit: usize,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Show the effective configuration and its sources
    Show,
    /// Write the default config to ~/.growthdash/config.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Set a dotted key, e.g. `api.base_url http://localhost:8000`
    Set { key: String, value: String },
    /// Reset the global config to defaults
    Reset,
}

fn main() -> Result<()> {
    let app = App::parse();
    let format = OutputFormat::from_str_opt(Some(&app.format));

    let config = config::load();
    terminal::configure_color(config.display.color);

    match app.command {
        Commands::Sentiment { feedback } => {
            cli::run_module(&config, ModuleKind::Sentiment, &[feedback.join(" ")], format)
        }
        Commands::Benchmark { brand } => {
            cli::run_module(&config, ModuleKind::Benchmark, &[brand.join(" ")], format)
        }
        Commands::Pricing {
            cost,
            demand,
            competitor,
        } => cli::run_module(&config, ModuleKind::Pricing, &[cost, demand, competitor], format),
        Commands::Compliance { text } => {
            cli::run_module(&config, ModuleKind::Compliance, &[text.join(" ")], format)
        }
        Commands::Predict { history } => {
            cli::run_module(&config, ModuleKind::Prediction, &[history.join(" ")], format)
        }
        Commands::Personalize { profile } => cli::run_module(
            &config,
            ModuleKind::Personalization,
            &[profile.join(" ")],
            format,
        ),
        Commands::Campaign { product, audience } => cli::run_module(
            &config,
            ModuleKind::MarketingCampaign,
            &[product, audience],
            format,
        ),
        Commands::Pitch {
            title,
            tier,
            product,
        } => cli::run_module(&config, ModuleKind::SalesPitch, &[title, tier, product], format),
        Commands::LeadScore {
            budget,
            timeline,
            urgency,
            context,
        } => cli::run_module(
            &config,
            ModuleKind::LeadScore,
            &[budget, timeline, urgency, context],
            format,
        ),
        Commands::Chat => cli::run_chat(&config, format),
        Commands::Dashboard => cli::run_dashboard(&config, format),
        Commands::Health { watch } => cli::run_health(&config, watch, format),
        Commands::Status => cli::run_status(&config, format),
        Commands::Activity { limit } => cli::run_activity(&config, limit, format),
        Commands::Config { action } => match action {
            ConfigAction::Show => cli::run_config_show(),
            ConfigAction::Init { force } => cli::run_config_init(force),
            ConfigAction::Set { key, value } => cli::run_config_set(&key, &value),
            ConfigAction::Reset => cli::run_config_reset(),
        },
    }
}
