//! Seating clients and running the table over TCP.

use anyhow::Error;
use log::{info, warn};
use std::time::Duration;
use tokio::{
    net::{TcpListener, tcp::OwnedReadHalf},
    time::timeout,
};

use super::utils;
use crate::{
    game::{entities::Username, settings::TableSettings},
    table::{Seat, Table, TableOutcome},
};

/// How long a fresh connection has to send its name payload.
pub const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

/// Accept connections until every seat is taken.
///
/// Seats are handed out in connection order. A connection that doesn't
/// send its name payload in time is dropped and the seat goes to the next
/// one. An empty name is replaced with `seat<N>`.
///
/// # Errors
///
/// Fails only if the listener itself fails.
pub async fn accept_seats(
    listener: &TcpListener,
    seat_count: usize,
) -> Result<Vec<Seat<OwnedReadHalf>>, Error> {
    let mut seats = Vec::with_capacity(seat_count);
    while seats.len() < seat_count {
        let (mut stream, addr) = listener.accept().await?;
        let id = seats.len();
        let name = match timeout(HANDSHAKE_TIMEOUT, utils::read_name(&mut stream)).await {
            Ok(Ok(name)) => name,
            Ok(Err(error)) => {
                warn!("{addr}: handshake failed: {error}");
                continue;
            }
            Err(_) => {
                warn!("{addr}: handshake timed out");
                continue;
            }
        };
        let name = if name.is_empty() {
            Username::new(&format!("seat{id}"))
        } else {
            name
        };
        if let Err(error) = stream.set_nodelay(true) {
            warn!("{addr}: couldn't disable Nagle: {error}");
        }
        info!("{name} took seat {id} from {addr} ({}/{seat_count})", id + 1);
        let (reader, writer) = stream.into_split();
        seats.push(Seat::spawn(id, name, reader, writer));
    }
    Ok(seats)
}

/// Seat a full table from `listener` and play it to the end.
///
/// # Errors
///
/// Fails if `settings` are invalid or the listener fails while seating.
pub async fn run(listener: TcpListener, settings: TableSettings) -> Result<TableOutcome, Error> {
    settings.validate()?;
    info!(
        "waiting for {} players on {}",
        settings.seat_count,
        listener.local_addr()?
    );
    let seats = accept_seats(&listener, settings.seat_count).await?;
    // Nobody else gets a seat once play starts.
    drop(listener);
    Ok(Table::new(&settings, seats).run().await)
}
