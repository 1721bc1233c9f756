use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use mapper::{
    common::dmi,
    config::{self, Config, DeviceInit, Overrides},
    parse,
};
use serde::de::DeserializeOwned;

#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Log verbosity, a level (0-4+) or a filter directive
    #[arg(short, long, global = true, default_value = "info")]
    verbosity: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load and validate the mapper configuration
    Check {
        #[arg(long, default_value = config::DEFAULT_CONFIG_FILE)]
        config_file: PathBuf,

        /// Meta server address, in metaserver mode
        #[arg(long)]
        metaserver_addr: Option<String>,

        /// MQTT broker address
        #[arg(long)]
        mqtt_address: Option<String>,

        #[arg(long)]
        mqtt_username: Option<String>,

        #[arg(long)]
        mqtt_password: Option<String>,

        /// MQTT client certificate file
        #[arg(long)]
        mqtt_certification: Option<String>,

        /// MQTT client private key file
        #[arg(long)]
        mqtt_privatekey: Option<String>,
    },

    /// Translate a device and its model into a device instance
    Translate {
        /// Device descriptor (JSON)
        #[arg(long)]
        device: PathBuf,

        /// Device model descriptor (JSON)
        #[arg(long)]
        model: Option<PathBuf>,

        #[arg(long)]
        pretty: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    mapper::log::init_with_verbosity(&args.verbosity);

    match args.command {
        Command::Check {
            config_file,
            metaserver_addr,
            mqtt_address,
            mqtt_username,
            mqtt_password,
            mqtt_certification,
            mqtt_privatekey,
        } => {
            let settings = Config::load(&config_file)
                .with_context(|| format!("failed to load {}", config_file.display()))?
                .with_overrides(Overrides {
                    metaserver_addr,
                    mqtt_address,
                    mqtt_username,
                    mqtt_password,
                    mqtt_certification,
                    mqtt_privatekey,
                })
                .validate()
                .context("invalid configuration")?;

            tracing::info!(
                name = %settings.common.name,
                protocol = %settings.common.protocol,
                mqtt = %settings.mqtt.server_address,
                tls = settings.mqtt.tls().is_some(),
                "configuration ok",
            );

            match &settings.dev_init {
                DeviceInit::Configmap { profile } => {
                    tracing::info!(bytes = profile.len(), "device profile loaded")
                }
                DeviceInit::Register => tracing::info!("devices are registered at runtime"),
                DeviceInit::MetaServer { addr, namespace } => {
                    tracing::info!(%addr, %namespace, "devices come from the meta server")
                }
            }
        }

        Command::Translate { device, model, pretty } => {
            let device: dmi::Device = read_json(&device)?;

            let model = match model {
                Some(path) => {
                    let model: dmi::DeviceModel = read_json(&path)?;
                    Some(parse::parse_device_model(&model))
                }
                None => None,
            };

            let instance = parse::parse_device(&device, model.as_ref())
                .with_context(|| format!("failed to translate device {}", device.name))?;

            let out = if pretty {
                serde_json::to_string_pretty(&instance)?
            } else {
                serde_json::to_string(&instance)?
            };

            println!("{out}");
        }
    }

    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let file = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;

    serde_json::from_slice(&file).with_context(|| format!("failed to parse {}", path.display()))
}
