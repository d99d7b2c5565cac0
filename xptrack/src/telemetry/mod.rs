//! Telemetry Receiver - UDP listener for X-Plane data output.
//!
//! Listens for X-Plane `DATA` packets and forwards each decoded record as a
//! [`TelemetryEvent`] on an mpsc channel. The channel is the ordered queue
//! the recording session consumes.
//!
//! # Setup
//!
//! In X-Plane: Settings → Data Output → "Send network data output", with the
//! IP of this machine and the configured port. Enable at least rows 3, 16,
//! 17 and 20.
//!
//! # Example
//!
//! ```ignore
//! let (tx, rx) = mpsc::channel(256);
//! let cancel = CancellationToken::new();
//! let receiver = TelemetryReceiver::new(TelemetryReceiverConfig::default(), tx, cancel.clone());
//! let handle = receiver.start();
//! ```

mod event;
mod protocol;

use std::time::{Duration, Instant};

use tokio::net::UdpSocket;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

pub use event::{
    AngularRate, Attitude, Category, EngineRpm, FlightControls, GearBrakes, LoadFactor,
    PositionSample, Speed, TelemetryEvent, TrimFlapsBrakes, Weather,
};
pub use protocol::parse_packet;

/// Maximum packet size we expect.
const MAX_PACKET_SIZE: usize = 2048;

/// Seconds between "waiting for telemetry" messages.
const WAITING_LOG_INTERVAL_SECS: u64 = 10;

/// Default UDP port X-Plane sends data output to.
pub const DEFAULT_TELEMETRY_PORT: u16 = 49005;

/// Telemetry receiver configuration.
#[derive(Debug, Clone)]
pub struct TelemetryReceiverConfig {
    /// UDP port to listen on.
    pub port: u16,

    /// Timeout for socket receive operations.
    pub recv_timeout: Duration,
}

impl Default for TelemetryReceiverConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_TELEMETRY_PORT,
            recv_timeout: Duration::from_millis(500),
        }
    }
}

/// Error type for telemetry receiver.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// Failed to bind the UDP socket.
    #[error("Failed to bind UDP socket on port {port}: {source}")]
    SocketBind {
        port: u16,
        #[source]
        source: std::io::Error,
    },
}

/// Telemetry receiver for X-Plane UDP data output.
pub struct TelemetryReceiver {
    config: TelemetryReceiverConfig,
    events_tx: mpsc::Sender<TelemetryEvent>,
    cancellation: CancellationToken,
}

impl TelemetryReceiver {
    /// Create a new telemetry receiver.
    pub fn new(
        config: TelemetryReceiverConfig,
        events_tx: mpsc::Sender<TelemetryEvent>,
        cancellation: CancellationToken,
    ) -> Self {
        Self {
            config,
            events_tx,
            cancellation,
        }
    }

    /// Get the configured port.
    pub fn port(&self) -> u16 {
        self.config.port
    }

    /// Start the telemetry receiver.
    ///
    /// Spawns an async task that listens for UDP datagrams.
    pub fn start(self) -> tokio::task::JoinHandle<Result<(), TelemetryError>> {
        tokio::spawn(self.run())
    }

    /// Run the receiver loop until cancelled or the channel closes.
    pub async fn run(self) -> Result<(), TelemetryError> {
        let socket = UdpSocket::bind(("0.0.0.0", self.config.port))
            .await
            .map_err(|e| TelemetryError::SocketBind {
                port: self.config.port,
                source: e,
            })?;

        let local_addr = socket.local_addr().ok();
        info!(
            port = self.config.port,
            local_addr = ?local_addr,
            "Telemetry receiver started"
        );

        let mut buffer = [0u8; MAX_PACKET_SIZE];
        let started = Instant::now();
        let mut packets_received: u64 = 0;
        let mut events_sent: u64 = 0;
        let mut last_waiting_log: u64 = 0;

        'receive: loop {
            let recv_result = tokio::select! {
                _ = self.cancellation.cancelled() => break,
                r = tokio::time::timeout(self.config.recv_timeout, socket.recv(&mut buffer)) => r,
            };

            match recv_result {
                Ok(Ok(len)) => {
                    packets_received += 1;
                    self.log_first_packet(packets_received, &buffer[..len]);

                    let Some(events) = parse_packet(&buffer[..len]) else {
                        if packets_received <= 5 {
                            let preview = String::from_utf8_lossy(&buffer[..len.min(16)]);
                            debug!(packet_num = packets_received, preview = %preview, "Ignoring non-DATA packet");
                        }
                        continue;
                    };

                    for event in events {
                        tokio::select! {
                            _ = self.cancellation.cancelled() => break 'receive,
                            sent = self.events_tx.send(event) => {
                                if sent.is_err() {
                                    debug!("Telemetry channel closed, stopping receiver");
                                    break 'receive;
                                }
                                events_sent += 1;
                            }
                        }
                    }
                }
                Ok(Err(e)) => {
                    warn!(error = %e, "UDP receive error");
                    tokio::time::sleep(Duration::from_millis(100)).await;
                }
                Err(_) => {
                    if self.events_tx.is_closed() {
                        debug!("Telemetry channel closed, stopping receiver");
                        break;
                    }
                    self.log_waiting(packets_received, started, &mut last_waiting_log);
                    trace!("No telemetry data received (timeout)");
                }
            }
        }

        info!(packets_received, events_sent, "Telemetry receiver stopped");
        Ok(())
    }

    fn log_first_packet(&self, packets_received: u64, data: &[u8]) {
        if packets_received == 1 {
            let header = if data.len() >= 4 {
                String::from_utf8_lossy(&data[..4]).to_string()
            } else {
                format!("{:?}", data)
            };
            info!(
                port = self.config.port,
                header = %header,
                len = data.len(),
                "Received first telemetry packet"
            );
        }
    }

    fn log_waiting(&self, packets_received: u64, started: Instant, last_logged: &mut u64) {
        let elapsed = started.elapsed().as_secs();
        if packets_received == 0 && waiting_log_due(elapsed, last_logged) {
            info!(
                port = self.config.port,
                elapsed_secs = elapsed,
                "Waiting for telemetry data..."
            );
        }
    }
}

/// True once per interval; records `elapsed` as the last logged second.
fn waiting_log_due(elapsed: u64, last_logged: &mut u64) -> bool {
    if elapsed < *last_logged + WAITING_LOG_INTERVAL_SECS {
        return false;
    }
    *last_logged = elapsed;
    true
}
