use log::{info, warn};
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    runtime::Handle,
    sync::{oneshot, watch},
};

use crate::{
    connection::{connect, write_request},
    directory_config::DirectoryConfig,
    messages::{DirectoryRequest, ServerDescriptor},
};

/// Where a listing is in its life
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegistrationState {
    Connecting,
    Registered,
    /// The directory went away. Nothing reconnects automatically.
    Lost,
    Closed,
}

/// A listing held open on the directory. Dropping it removes the listing.
pub struct DirectoryRegistration {
    state: watch::Receiver<RegistrationState>,
    shutdown: Option<oneshot::Sender<()>>,
}

impl DirectoryRegistration {
    pub(crate) fn spawn(
        runtime: &Handle,
        config: DirectoryConfig,
        descriptor: ServerDescriptor,
    ) -> Self {
        let (state_sender, state) = watch::channel(RegistrationState::Connecting);
        let (shutdown, shutdown_receiver) = oneshot::channel();

        runtime.spawn(run_registration(
            config,
            descriptor,
            state_sender,
            shutdown_receiver,
        ));

        Self {
            state,
            shutdown: Some(shutdown),
        }
    }

    pub fn state(&self) -> RegistrationState {
        *self.state.borrow()
    }

    /// Whether the listing is registered or still connecting
    pub fn is_active(&self) -> bool {
        matches!(
            self.state(),
            RegistrationState::Connecting | RegistrationState::Registered
        )
    }

    pub fn close(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}

impl Drop for DirectoryRegistration {
    fn drop(&mut self) {
        self.close();
    }
}

async fn run_registration(
    config: DirectoryConfig,
    descriptor: ServerDescriptor,
    state: watch::Sender<RegistrationState>,
    mut shutdown: oneshot::Receiver<()>,
) {
    let stream = tokio::select! {
        connected = connect(&config) => match connected {
            Ok(stream) => stream,
            Err(error) => {
                warn!("directory registration failed: {}", error);
                state.send_replace(RegistrationState::Lost);
                return;
            }
        },
        _ = &mut shutdown => {
            state.send_replace(RegistrationState::Closed);
            return;
        }
    };

    let (read_half, mut write_half) = stream.into_split();
    if let Err(error) = write_request(&mut write_half, &DirectoryRequest::Register(descriptor)).await {
        warn!("directory registration failed: {}", error);
        state.send_replace(RegistrationState::Lost);
        return;
    }
    info!("registered on directory at {}", config.address());
    state.send_replace(RegistrationState::Registered);

    let mut lines = BufReader::new(read_half).lines();
    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("disconnecting from directory");
                state.send_replace(RegistrationState::Closed);
                break;
            }
            line = lines.next_line() => match line {
                // the directory has nothing to say to a registered server
                Ok(Some(_)) => {}
                Ok(None) | Err(_) => {
                    info!("disconnected from directory");
                    state.send_replace(RegistrationState::Lost);
                    break;
                }
            }
        }
    }

    let _ = write_half.shutdown().await;
}
