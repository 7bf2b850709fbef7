use log::{info, warn};
use tokio::{
    io::{AsyncWriteExt, BufReader},
    runtime::Handle,
    task::JoinHandle,
    time::timeout,
};
use vista_shared::ConfigError;

use crate::{
    connection::{connect, read_response, write_request},
    directory_config::DirectoryConfig,
    error::DirectoryError,
    messages::{DirectoryQuery, DirectoryRecord, DirectoryRequest, ListingUpdate, ServerDescriptor},
    registration::DirectoryRegistration,
};

/// Talks to the directory service. Each operation opens its own short-lived
/// connection on the given runtime, so callers are never blocked.
#[derive(Clone)]
pub struct DirectoryClient {
    config: DirectoryConfig,
    runtime: Handle,
}

impl DirectoryClient {
    pub fn new(config: DirectoryConfig, runtime: Handle) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, runtime })
    }

    pub fn config(&self) -> &DirectoryConfig {
        &self.config
    }

    /// Asks the directory for servers matching `filter`. Returns `None` when
    /// the directory cannot be reached or does not answer with a host list,
    /// and an empty list when no server matches.
    pub async fn query(&self, filter: DirectoryQuery) -> Option<Vec<DirectoryRecord>> {
        match query_hosts(&self.config, filter).await {
            Ok(hosts) => {
                info!("directory returned {} host(s)", hosts.len());
                Some(hosts)
            }
            Err(error) => {
                warn!("directory query failed: {}", error);
                None
            }
        }
    }

    /// Runs [`DirectoryClient::query`] in the background and hands the
    /// result to `callback` on a runtime thread
    pub fn spawn_query<F>(&self, filter: DirectoryQuery, callback: F) -> JoinHandle<()>
    where
        F: FnOnce(Option<Vec<DirectoryRecord>>) + Send + 'static,
    {
        let client = self.clone();
        self.runtime.spawn(async move {
            let hosts = client.query(filter).await;
            callback(hosts);
        })
    }

    /// Publishes `descriptor` and keeps it listed for as long as the returned
    /// registration is alive
    pub fn register(&self, descriptor: ServerDescriptor) -> DirectoryRegistration {
        DirectoryRegistration::spawn(&self.runtime, self.config.clone(), descriptor)
    }

    /// Sends a partial listing update on its own connection. Failures are
    /// logged and otherwise ignored, a stale listing does not affect play.
    pub fn update(&self, patch: ListingUpdate) -> JoinHandle<()> {
        let config = self.config.clone();
        self.runtime.spawn(async move {
            if let Err(error) = send_update(&config, patch).await {
                warn!("directory listing update failed: {}", error);
            }
        })
    }
}

async fn query_hosts(
    config: &DirectoryConfig,
    filter: DirectoryQuery,
) -> Result<Vec<DirectoryRecord>, DirectoryError> {
    let stream = connect(config).await?;
    let (read_half, mut write_half) = stream.into_split();
    write_request(&mut write_half, &DirectoryRequest::Get(filter)).await?;

    let mut reader = BufReader::new(read_half);
    let response = timeout(config.response_timeout, read_response(&mut reader))
        .await
        .map_err(|_| DirectoryError::Timeout { phase: "query" })??;

    // the connection is dropped here whatever the answer was
    response.hosts.ok_or(DirectoryError::Rejected)
}

async fn send_update(config: &DirectoryConfig, patch: ListingUpdate) -> Result<(), DirectoryError> {
    let mut stream = connect(config).await?;
    write_request(&mut stream, &DirectoryRequest::Update(patch)).await?;
    stream.shutdown().await?;
    Ok(())
}

