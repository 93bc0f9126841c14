//! A low-level TCP table client.
//!
//! It speaks the wire protocol and nothing more, so it's mostly used to
//! drive tables from tests and scripts.

use anyhow::{Error, bail};
use std::{net::SocketAddr, time::Duration};
use tokio::{
    io::AsyncWriteExt,
    net::TcpStream,
    time::{sleep, timeout},
};

use super::utils;
use crate::game::entities::{Board, Player, PlayerAction, Username};

/// Default timeout for reading from the server.
pub const READ_TIMEOUT: Duration = Duration::from_secs(10);

/// A TCP client seated at a table.
pub struct Client {
    /// The name this client announced. The server may have shortened it.
    pub username: Username,
    /// The underlying TCP stream.
    pub stream: TcpStream,
}

impl Client {
    /// Connect to a table and send the name payload.
    ///
    /// Connecting is retried three times with decreasing timeouts (1s,
    /// 500ms, 100ms) in case the server isn't listening yet.
    ///
    /// # Errors
    ///
    /// Returns an error if no connection could be made or the name payload
    /// couldn't be sent.
    pub async fn connect(name: &str, addr: &SocketAddr) -> Result<Self, Error> {
        let mut connect_timeouts = vec![
            Duration::from_secs(1),
            Duration::from_millis(500),
            Duration::from_millis(100),
        ];
        while let Some(connect_timeout) = connect_timeouts.pop() {
            match timeout(connect_timeout, TcpStream::connect(addr)).await {
                Ok(Ok(mut stream)) => {
                    stream.set_nodelay(true)?;
                    stream.write_all(&utils::encode_name(name)).await?;
                    let username = utils::decode_name(&utils::encode_name(name));
                    return Ok(Self { username, stream });
                }
                _ => sleep(connect_timeout).await,
            }
        }
        bail!("couldn't connect to {addr} as {name}")
    }

    /// Wait for the next board snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the server closed the connection, sent something
    /// that isn't a board, or stayed silent for [`READ_TIMEOUT`].
    pub async fn recv_board(&mut self) -> Result<Board, Error> {
        match timeout(READ_TIMEOUT, utils::read_prefixed(&mut self.stream)).await {
            Ok(Ok(board)) => Ok(board),
            Ok(Err(error)) => bail!(error),
            Err(_) => bail!("no board from the server within {READ_TIMEOUT:?}"),
        }
    }

    /// Send an action (or an acknowledgment) to the table.
    ///
    /// # Errors
    ///
    /// Returns an error if the message cannot be sent to the server.
    pub async fn send_action(&mut self, action: PlayerAction) -> Result<(), Error> {
        utils::write_prefixed(&mut self.stream, &action).await?;
        Ok(())
    }

    /// This client's entry on `board`, matched by name. `None` once the
    /// client has been eliminated.
    #[must_use]
    pub fn me<'a>(&self, board: &'a Board) -> Option<&'a Player> {
        board.players.values().find(|p| p.name == self.username)
    }
}
