use clap::Parser;
use embassy_executor::Spawner;
use embassy_time::Duration;
use guitar_connector::{
    Connection, Discovery, DiscoveryConfig, Error, GuitarBridge, Result, SerialOpener,
    SerialTransport, TerminalDisplay,
};

/// Serial connector for the PSGTS2 guitar controller.
#[derive(Debug, Parser)]
#[command(name = "guitar-connector", version)]
struct Args {
    /// Skip discovery and open this port
    #[arg(short, long, value_name = "NAME")]
    port: Option<String>,

    /// Never probe this port (repeatable)
    #[arg(short, long, value_name = "NAME")]
    ignore: Vec<String>,

    /// Time a probed port has to send a live snapshot
    #[arg(long, value_name = "MS")]
    timeout_ms: Option<u64>,

    /// Exit when the guitar disconnects instead of searching again
    #[arg(long, action = clap::ArgAction::SetTrue)]
    no_reconnect: bool,
}

impl Args {
    fn discovery_config(&self) -> DiscoveryConfig {
        let mut config = DiscoveryConfig {
            ignore: self.ignore.clone(),
            ..DiscoveryConfig::default()
        };
        if let Some(ms) = self.timeout_ms {
            config.timeout = Duration::from_millis(ms);
        }
        config
    }
}

async fn connect(
    discovery: &Discovery<SerialOpener>,
    args: &Args,
) -> Result<Connection<SerialTransport>> {
    match &args.port {
        Some(port) => discovery.connect(port).await,
        None => discovery.discover().await,
    }
}

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    std::process::exit(run().await);
}

/// Returns the process exit status.
async fn run() -> i32 {
    let args = Args::parse();
    let discovery = Discovery::new(SerialOpener::default(), args.discovery_config());

    log::info!("Guitar connector starting...");

    loop {
        print!("Discovering...\r");
        let connection = match connect(&discovery, &args).await {
            Ok(connection) => connection,
            Err(Error::NotFound) => {
                eprintln!("PSGTS2 Guitar not found.");
                return 1;
            }
            Err(e) => {
                eprintln!("{e}");
                return 1;
            }
        };
        println!("PSGTS2 Guitar on port {}", connection.name());

        let mut bridge = GuitarBridge::new(connection, TerminalDisplay::new(std::io::stdout()));
        let reason = bridge.run().await;
        let (connection, _) = bridge.into_parts();
        log::warn!("{}: input stopped ({:?})", connection.name(), reason);
        connection.close();

        if args.no_reconnect {
            return 0;
        }
    }
}
