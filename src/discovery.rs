//! Device discovery: find the port the guitar is on.
//!
//! Serial ports carry no identification the guitar could be recognised by,
//! so every candidate is probed blind and in parallel:
//!
//! 1. open the port on a helper thread, giving up after `connect_timeout`
//! 2. read from it until a snapshot with a non-zero uptime arrives, giving
//!    up after `timeout`
//!
//! The first probe to get through both steps wins. The other probes are
//! dropped on the spot, which drops their connections and closes their
//! ports. A port that finishes opening after its probe gave up is closed as
//! soon as the helper thread hands it over.

use std::future::{poll_fn, Future};
use std::pin::Pin;
use std::sync::Arc;
use std::task::Poll;
use std::thread;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::with_timeout;

use crate::config::{DiscoveryConfig, SerialConfig};
use crate::connection::Connection;
use crate::error::{Error, Result};
use crate::transport::{SerialTransport, Transport};

/// Lists and opens candidate ports.
///
/// `open` may block; discovery always calls it off the executor.
pub trait PortOpener: Send + Sync + 'static {
    type Port: Transport + 'static;

    /// Names of the ports that could host the guitar.
    fn list(&self) -> Result<Vec<String>>;

    /// Open and configure one port.
    fn open(&self, name: &str) -> Result<Self::Port>;
}

/// Opens real serial ports.
#[derive(Debug, Clone, Default)]
pub struct SerialOpener {
    config: SerialConfig,
}

impl SerialOpener {
    pub fn new(config: SerialConfig) -> Self {
        Self { config }
    }
}

impl PortOpener for SerialOpener {
    type Port = SerialTransport;

    fn list(&self) -> Result<Vec<String>> {
        SerialTransport::list()
    }

    fn open(&self, name: &str) -> Result<SerialTransport> {
        SerialTransport::open(name, &self.config)
    }
}

/// Discovery race over the ports of one [`PortOpener`].
pub struct Discovery<O: PortOpener> {
    opener: Arc<O>,
    config: DiscoveryConfig,
}

impl<O: PortOpener> Discovery<O> {
    pub fn new(opener: O, config: DiscoveryConfig) -> Self {
        Self {
            opener: Arc::new(opener),
            config,
        }
    }

    pub fn config(&self) -> &DiscoveryConfig {
        &self.config
    }

    /// Ports that will be probed: everything listed minus the ignore list.
    pub fn candidates(&self) -> Result<Vec<String>> {
        Ok(self
            .opener
            .list()?
            .into_iter()
            .filter(|name| !self.config.is_ignored(name))
            .collect())
    }

    /// Race all candidates and return the first live connection.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] when every candidate failed to open, timed out or
    /// never produced a live snapshot. Listing errors are returned as-is.
    pub async fn discover(&self) -> Result<Connection<O::Port>> {
        let candidates = self.candidates()?;
        if candidates.is_empty() {
            log::info!("No candidate ports");
            return Err(Error::NotFound);
        }

        log::info!(
            "Probing {} port(s): {}",
            candidates.len(),
            candidates.join(", ")
        );

        let probes = candidates
            .into_iter()
            .map(|name| {
                let probe = Box::pin(self.probe(name.clone()));
                (name, probe)
            })
            .collect();

        match first_ok(probes).await {
            Some(connection) => {
                log::info!("Guitar found on {}", connection.name());
                Ok(connection)
            }
            None => Err(Error::NotFound),
        }
    }

    /// Open a single named port and wait for it to prove live.
    pub async fn connect(&self, name: &str) -> Result<Connection<O::Port>> {
        self.probe(name.to_string()).await
    }

    async fn probe(&self, name: String) -> Result<Connection<O::Port>> {
        let transport = self.open(&name).await?;
        let mut connection = Connection::new(transport, &self.config.connection);

        match with_timeout(self.config.timeout, connection.wait_live()).await {
            Ok(Ok(event)) => {
                log::debug!("{}: live, uptime {} us", name, event.state.uptime);
                Ok(connection)
            }
            Ok(Err(e)) => Err(e),
            Err(_) => Err(Error::LiveTimeout {
                port: name,
                timeout_ms: self.config.timeout.as_millis(),
            }),
        }
    }

    /// Open `name` on a helper thread, bounded by the connect timeout.
    async fn open(&self, name: &str) -> Result<O::Port> {
        let opened: Arc<Signal<CriticalSectionRawMutex, Result<O::Port>>> =
            Arc::new(Signal::new());

        let opener = Arc::clone(&self.opener);
        let done = Arc::clone(&opened);
        let port = name.to_string();
        thread::Builder::new()
            .name(format!("open {name}"))
            .spawn(move || done.signal(opener.open(&port)))?;

        with_timeout(self.config.connect_timeout, opened.wait())
            .await
            .map_err(|_| Error::OpenTimeout {
                port: name.to_string(),
                timeout_ms: self.config.connect_timeout.as_millis(),
            })?
    }
}

/// Connect to the guitar on real serial ports.
pub async fn discover(config: DiscoveryConfig) -> Result<Connection<SerialTransport>> {
    Discovery::new(SerialOpener::default(), config)
        .discover()
        .await
}

/// Poll every probe until one succeeds or all have failed.
///
/// Returning drops the remaining probes.
async fn first_ok<F, T>(mut probes: Vec<(String, Pin<Box<F>>)>) -> Option<T>
where
    F: Future<Output = Result<T>>,
{
    poll_fn(move |cx| {
        let mut i = 0;
        while i < probes.len() {
            match probes[i].1.as_mut().poll(cx) {
                Poll::Ready(Ok(value)) => return Poll::Ready(Some(value)),
                Poll::Ready(Err(e)) => {
                    let (name, _) = probes.swap_remove(i);
                    log::debug!("{}: {}", name, e);
                }
                Poll::Pending => i += 1,
            }
        }

        if probes.is_empty() {
            Poll::Ready(None)
        } else {
            Poll::Pending
        }
    })
    .await
}
