use log::debug;
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt},
    net::TcpStream,
    time::timeout,
};

use crate::{
    directory_config::DirectoryConfig,
    error::DirectoryError,
    messages::{DirectoryRequest, DirectoryResponse},
};

// Every message is one JSON document followed by a newline.

pub(crate) async fn connect(config: &DirectoryConfig) -> Result<TcpStream, DirectoryError> {
    let address = config.address();
    match timeout(config.connect_timeout, TcpStream::connect(&address)).await {
        Ok(Ok(stream)) => {
            debug!("connected to directory at {}", address);
            Ok(stream)
        }
        Ok(Err(source)) => Err(DirectoryError::Connect { address, source }),
        Err(_) => Err(DirectoryError::Timeout { phase: "connect" }),
    }
}

pub(crate) async fn write_request<W: AsyncWrite + Unpin>(
    writer: &mut W,
    request: &DirectoryRequest,
) -> Result<(), DirectoryError> {
    let mut line = serde_json::to_vec(request)?;
    line.push(b'\n');
    writer.write_all(&line).await?;
    writer.flush().await?;
    Ok(())
}

pub(crate) async fn read_response<R: AsyncBufRead + Unpin>(
    reader: &mut R,
) -> Result<DirectoryResponse, DirectoryError> {
    let mut line = String::new();
    if reader.read_line(&mut line).await? == 0 {
        return Err(DirectoryError::Closed);
    }
    Ok(serde_json::from_str(line.trim_end())?)
}
