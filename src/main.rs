//! Dynamik Webhook CLI
//!
//! Replays a single lifecycle event from a JSON record file, for smoke
//! testing the backend contract without a running storefront.

use std::path::PathBuf;

use async_trait::async_trait;
use clap::{Parser, Subcommand};

use dynamik_webhook::config::WebhookConfig;
use dynamik_webhook::model::{Order, User};
use dynamik_webhook::notify::LoggingMailer;
use dynamik_webhook::pipeline::{EventPipeline, OrderSource, UserSource};

/// Dynamik Up webhook forwarder
#[derive(Parser, Debug)]
#[command(name = "dynamik-webhook")]
#[command(version)]
#[command(about = "Forward e-commerce lifecycle events to the Dynamik Up backend")]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Forward an order-completed event
    Order {
        /// Path to the order record (JSON)
        #[arg(long)]
        file: PathBuf,

        /// Path to the customer's user record (JSON); billing-only when absent
        #[arg(long)]
        user_file: Option<PathBuf>,
    },
    /// Forward a user-registered event
    User {
        /// Path to the user record (JSON)
        #[arg(long)]
        file: PathBuf,
    },
}

/// Record source backed by the JSON files passed on the command line.
#[derive(Clone)]
struct FileSource {
    order: Option<Order>,
    user: Option<User>,
}

#[async_trait]
impl OrderSource for FileSource {
    async fn fetch_order(&self, order_id: u64) -> anyhow::Result<Order> {
        self.order
            .clone()
            .ok_or_else(|| anyhow::anyhow!("no order record loaded for id {order_id}"))
    }
}

#[async_trait]
impl UserSource for FileSource {
    async fn fetch_user(&self, user_id: u64) -> anyhow::Result<User> {
        self.user
            .clone()
            .ok_or_else(|| anyhow::anyhow!("no user record loaded for id {user_id}"))
    }
}

fn load<T: serde::de::DeserializeOwned>(path: &PathBuf) -> anyhow::Result<T> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = WebhookConfig::from_env()?;
    tracing::info!(base_url = %config.base_url, "Dynamik webhook forwarder starting");

    let result = match args.command {
        Command::Order { file, user_file } => {
            let order: Order = load(&file)?;
            let order_id = order.id;
            let user = user_file.as_ref().map(load::<User>).transpose()?;
            let source = FileSource {
                order: Some(order),
                user,
            };
            let pipeline = EventPipeline::new(&config, source.clone(), source, LoggingMailer)?;
            pipeline.handle_order_completed(order_id).await
        }
        Command::User { file } => {
            let user: User = load(&file)?;
            let user_id = user.id;
            let source = FileSource {
                order: None,
                user: Some(user),
            };
            let pipeline = EventPipeline::new(&config, source.clone(), source, LoggingMailer)?;
            pipeline.handle_user_registered(user_id).await
        }
    };

    if result.is_success() {
        tracing::info!("Event delivered");
        Ok(())
    } else {
        anyhow::bail!(
            "delivery failed: {}",
            result.failure_detail().unwrap_or("unknown")
        )
    }
}
