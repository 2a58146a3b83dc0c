use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use cc1101_rs::{init_logger, AppConfig};

#[derive(Parser)]
#[command(name = "cc1101-cli")]
#[command(about = "Demo harness for the CC1101 radio link")]
struct Cli {
    /// JSON configuration file (defaults apply when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Raw round-trip test: the primary side sends, the secondary echoes
    Ping {
        /// Echo received packets instead of initiating
        #[arg(long)]
        secondary: bool,
    },
    /// Send one addressed message and wait for the acknowledgement
    Send {
        /// Destination link address
        dest: u8,
        /// Payload text
        message: String,
        #[arg(short, long, default_value_t = 3)]
        retries: u8,
    },
    /// Print every received frame, acknowledging unicast data
    Listen,
    /// Show the effective configuration
    Info,
}

fn main() -> Result<()> {
    init_logger();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => {
            AppConfig::load(path).with_context(|| format!("loading {}", path.display()))?
        }
        None => AppConfig::default(),
    };

    match cli.command {
        Commands::Info => {
            println!("Band     : {}", config.radio.band.label());
            println!("Mode     : {}", config.radio.data_rate.label());
            println!("Channel  : {}", config.radio.channel);
            println!("Power    : {} dBm", config.radio.power_dbm);
            println!(
                "Sync     : {:02X} {:02X}",
                config.radio.sync_word[0], config.radio.sync_word[1]
            );
            println!("Address  : {:#04X}", config.radio.device_address);
            println!("Peer     : {:#04X}", config.peer_address);
            Ok(())
        }
        command => run(command, config),
    }
}

#[cfg(feature = "raspberry-pi")]
fn run(command: Commands, config: AppConfig) -> Result<()> {
    use cc1101_rs::radio::hal::raspberry_pi::{GpioPins, RaspberryPiHal};
    use cc1101_rs::{Cc1101Driver, LinkLayer};

    let pins = GpioPins {
        csn: config.csn_pin,
        gdo0: config.gdo0_pin,
    };
    let hal = RaspberryPiHal::new(config.spi_bus, &pins)?;
    let mut driver = Cc1101Driver::new(hal, config.radio.clone());
    driver.initialize()?;

    match command {
        Commands::Ping { secondary } => ping(driver, config.link.rssi_offset, secondary),
        Commands::Send {
            dest,
            message,
            retries,
        } => {
            let mut link = LinkLayer::new(driver, config.link.clone());
            link.send_packet(dest, message.as_bytes(), retries)?;
            println!("delivered to {dest:#04X}");
            Ok(())
        }
        Commands::Listen => listen(LinkLayer::new(driver, config.link.clone())),
        Commands::Info => unreachable!("handled before hardware setup"),
    }
}

#[cfg(not(feature = "raspberry-pi"))]
fn run(_command: Commands, _config: AppConfig) -> Result<()> {
    anyhow::bail!("built without a platform HAL; rebuild with --features raspberry-pi")
}

/// Ping-pong over the raw (unaddressed) data path
#[cfg(feature = "raspberry-pi")]
fn ping<H: cc1101_rs::Hal>(
    mut driver: cc1101_rs::Cc1101Driver<H>,
    rssi_offset: i16,
    secondary: bool,
) -> Result<()> {
    use std::time::{Duration, Instant};

    if secondary {
        println!("echoing incoming packets");
        loop {
            if driver.packet_available()? {
                let packet = driver.receive_data()?;
                if packet.is_empty() {
                    continue;
                }
                if !packet.crc_ok() {
                    log::error!("crc not ok");
                    continue;
                }
                println!(
                    "echo {} bytes ({} dBm, LQI {})",
                    packet.length,
                    packet.rssi_dbm(rssi_offset),
                    packet.lqi()
                );
                driver.send_data(&packet.payload)?;
            }
            std::thread::sleep(Duration::from_millis(1));
        }
    }

    let mut seq = 0u32;
    loop {
        let message = format!("Hello World {seq}");
        driver.send_data(message.as_bytes())?;

        let start = Instant::now();
        if driver.wait_for_packet(100)? {
            let packet = driver.receive_data()?;
            if !packet.crc_ok() {
                log::error!("crc not ok");
            } else if !packet.is_empty() {
                println!(
                    "[{}] --> [{}]  rtt {:?}  {} dBm  LQI {}",
                    message,
                    String::from_utf8_lossy(&packet.payload),
                    start.elapsed(),
                    packet.rssi_dbm(rssi_offset),
                    packet.lqi()
                );
            }
        } else {
            log::error!("no response from others");
        }

        seq += 1;
        std::thread::sleep(Duration::from_secs(1));
    }
}

/// Dump every addressed frame; unicast data is acknowledged automatically
#[cfg(feature = "raspberry-pi")]
fn listen<H: cc1101_rs::Hal>(mut link: cc1101_rs::LinkLayer<H>) -> Result<()> {
    use cc1101_rs::LinkEvent;

    println!("listening on address {:#04X}", link.address());
    loop {
        if link.driver_mut().packet_available()? {
            match link.receive()? {
                LinkEvent::Data(frame) => println!(
                    "{:#04X} -> {:#04X}  {}  ({} dBm, LQI {}, CRC {})",
                    frame.src,
                    frame.dest,
                    hex::encode(&frame.data),
                    frame.rssi_dbm,
                    frame.lqi,
                    if frame.crc_ok { "OK" } else { "BAD" }
                ),
                LinkEvent::Ack { peer, rssi_dbm, .. } => {
                    println!("ACK from {peer:#04X} ({rssi_dbm} dBm)")
                }
                LinkEvent::BadFrame => log::warn!("bad frame"),
            }
        }
        std::thread::sleep(std::time::Duration::from_millis(1));
    }
}
