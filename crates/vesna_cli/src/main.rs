use anyhow::Result;
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;
use vesna_core::config::VesnaConfig;
use vesna_core::memory::{InMemoryStore, UserProfile};
use vesna_reasoning::{Engine, IdleMessage, LlmClient, OpenAiClient};

mod offline;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the TOML config file
    #[arg(short, long, default_value = "vesna.toml")]
    config: String,

    /// Fixed rng seed for reproducible sessions
    #[arg(long)]
    seed: Option<u64>,

    /// Run without a model endpoint, answering from canned lines
    #[arg(long)]
    offline: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();
    let args = Args::parse();

    let mut config = VesnaConfig::load_or_default(&args.config);
    if let Some(seed) = args.seed {
        config.persona.rng_seed = Some(seed);
    }

    let llm: Arc<dyn LlmClient> = if args.offline {
        info!("offline mode, using canned responder");
        Arc::new(offline::OfflineClient::default())
    } else {
        info!(base_url = %config.llm.base_url, model = %config.llm.model, "using chat endpoint");
        Arc::new(OpenAiClient::new(&config.llm)?)
    };

    let profile = UserProfile {
        name: config.persona.user_name.clone(),
        gender: None,
    };
    let memory = Arc::new(InMemoryStore::new(profile));
    let tick_interval = config.persona.tick_interval_secs;
    let persona_name = config.persona.name.clone();
    let engine = Arc::new(Engine::new(config, llm, memory));

    // Idle messages arrive from the background ticker.
    let (idle_tx, mut idle_rx) = mpsc::channel::<IdleMessage>(8);
    let ticker_engine = engine.clone();
    tokio::spawn(async move {
        let mut interval =
            tokio::time::interval(std::time::Duration::from_secs(tick_interval.max(1)));
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            match ticker_engine.check_idle_tick().await {
                Ok(Some(msg)) => {
                    if idle_tx.send(msg).await.is_err() {
                        break;
                    }
                }
                Ok(None) => {}
                Err(e) => tracing::warn!(error = %e, "idle tick failed"),
            }
        }
    });

    println!("{persona_name} на связи. Пустая строка или \"выход\" — завершить.");
    print!("> ");
    io::stdout().flush()?;

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed == "выход" || trimmed == "quit" {
            break;
        }

        // Deliver anything she said while the user was typing.
        while let Ok(idle) = idle_rx.try_recv() {
            println!("{persona_name}: {}", idle.text);
        }

        let output = engine.process_turn(trimmed).await?;
        println!("{persona_name} {}: {}", output.mood.emoji, output.reply);
        for extra in &output.extra_messages {
            println!("{persona_name}: {extra}");
        }

        print!("> ");
        io::stdout().flush()?;
    }

    println!("До встречи.");
    Ok(())
}
