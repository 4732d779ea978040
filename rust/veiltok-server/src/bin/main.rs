use std::{path::PathBuf, process};

use anyhow::Context;
use structopt::StructOpt;
use tokio::signal;
use tracing_subscriber::*;
use veiltok_core::WorkerId;
use veiltok_server::{
    coordinator::{Coordinator, Language},
    network::Network,
    settings::{PipelineSettings, Settings, WorkerSettings},
    worker,
};

#[macro_use]
extern crate tracing;

#[derive(Debug, StructOpt)]
#[structopt(name = "Coordinator")]
struct Opt {
    /// Path of the configuration file
    #[structopt(short, parse(from_os_str))]
    config_path: PathBuf,

    /// The text to tokenize on the data worker
    #[structopt(long, default_value = "A string to tokenize")]
    text: String,
}

#[tokio::main]
async fn main() {
    let opt = Opt::from_args();

    let settings = Settings::new(opt.config_path).unwrap_or_else(|err| {
        eprintln!("{}", err);
        process::exit(1);
    });
    let Settings {
        log: log_settings,
        network: network_settings,
        pipeline: pipeline_settings,
        sharing: sharing_settings,
        workers: worker_settings,
    } = settings;

    let _fmt_subscriber = FmtSubscriber::builder()
        .with_env_filter(log_settings.filter)
        .with_ansi(true)
        .init();

    if let Err(err) = veiltok_core::init() {
        error!("{}", err);
        process::exit(1);
    }

    let network = Network::new(network_settings.timeout());
    for id in worker_settings.workers() {
        worker::spawn(id, &network).await;
    }
    let coordinator = Coordinator::new(
        WorkerId::from(worker_settings.coordinator.as_str()),
        network,
        sharing_settings.into(),
    );

    let failed = tokio::select! {
        result = run(&coordinator, &pipeline_settings, &worker_settings, opt.text) => {
            if let Err(err) = &result {
                error!("{:#}", err);
            }
            result.is_err()
        }
        _ = signal::ctrl_c() => {
            warn!("shutting down: interrupted");
            false
        }
    };

    coordinator.network().shutdown().await;
    if failed {
        process::exit(1);
    }
}

async fn run(
    coordinator: &Coordinator,
    pipeline: &PipelineSettings,
    workers: &WorkerSettings,
    text: String,
) -> anyhow::Result<()> {
    let nlp = Language::load(&pipeline.model, coordinator, pipeline.oov)?;
    let data = WorkerId::from(workers.data.as_str());
    let [holder_a, holder_b] = &workers.holders;
    let (holder_a, holder_b) = (
        WorkerId::from(holder_a.as_str()),
        WorkerId::from(holder_b.as_str()),
    );
    let crypto_provider = WorkerId::from(workers.crypto_provider.as_str());

    let text = coordinator
        .send_text(text, &data)
        .await
        .context("failed to send the text")?;
    println!("{}", text);

    let document = nlp
        .tokenize(&text)
        .await
        .context("failed to tokenize the text")?;
    let tokens = coordinator.token_count(&document).await?;
    println!("{} ({} tokens)", document, tokens);

    let mean = coordinator
        .get_encrypted_vector(&document, &holder_a, &holder_b, &crypto_provider)
        .await
        .context("failed to share the document embedding")?;
    println!("{}", mean);

    let per_token = coordinator
        .get_encrypted_token_vectors(&document, &holder_a, &holder_b, &crypto_provider)
        .await
        .context("failed to share the token embeddings")?;
    for vector in per_token {
        println!("{}", vector);
    }
    Ok(())
}
