use bincode::config;
use serde::{Serialize, de::DeserializeOwned};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use super::errors::{NetError, Result};
use crate::game::{constants::NAME_PAYLOAD_LEN, entities::Username};

/// Maximum allowed message size (1MB) to prevent DoS attacks via unbounded allocation
pub const MAX_MESSAGE_SIZE: usize = 1024 * 1024;

/// Read one length-prefixed message: a little-endian `u32` length followed
/// by that many bytes of bincode.
///
/// # Errors
///
/// Fails if the stream closes mid-message, the prefix announces more than
/// [`MAX_MESSAGE_SIZE`], or the payload doesn't decode as `T`.
pub async fn read_prefixed<T, R>(reader: &mut R) -> Result<T>
where
    T: DeserializeOwned,
    R: AsyncRead + Unpin,
{
    let len = reader.read_u32_le().await? as usize;

    // Validate message size before allocating anything.
    if len > MAX_MESSAGE_SIZE {
        return Err(NetError::MessageTooLarge {
            actual: len,
            max: MAX_MESSAGE_SIZE,
        });
    }

    let mut buf = vec![0; len];
    reader.read_exact(&mut buf).await?;
    let (value, _) = bincode::serde::decode_from_slice(&buf, config::standard())?;
    Ok(value)
}

/// Write one length-prefixed message.
///
/// # Errors
///
/// Fails if `value` doesn't encode, encodes larger than
/// [`MAX_MESSAGE_SIZE`], or the stream rejects the write.
pub async fn write_prefixed<T, W>(writer: &mut W, value: &T) -> Result<()>
where
    T: Serialize,
    W: AsyncWrite + Unpin,
{
    let serialized = bincode::serde::encode_to_vec(value, config::standard())?;
    if serialized.len() > MAX_MESSAGE_SIZE {
        return Err(NetError::MessageTooLarge {
            actual: serialized.len(),
            max: MAX_MESSAGE_SIZE,
        });
    }

    // Write the size and the data in one chunk so readers never see a
    // prefix without its payload.
    let size = serialized.len() as u32;
    let mut buf = Vec::from(size.to_le_bytes());
    buf.extend(serialized);
    writer.write_all(&buf).await?;
    writer.flush().await?;
    Ok(())
}

/// The fixed-size name payload a client sends right after connecting.
/// Longer names are cut to fit; shorter ones are padded with NUL bytes.
#[must_use]
pub fn encode_name(name: &str) -> [u8; NAME_PAYLOAD_LEN] {
    let mut payload = [0; NAME_PAYLOAD_LEN];
    let bytes = name.as_bytes();
    let len = bytes.len().min(NAME_PAYLOAD_LEN);
    payload[..len].copy_from_slice(&bytes[..len]);
    payload
}

/// Inverse of [`encode_name`]. Padding, control characters, and invalid
/// UTF-8 are dropped.
#[must_use]
pub fn decode_name(payload: &[u8; NAME_PAYLOAD_LEN]) -> Username {
    let end = payload
        .iter()
        .position(|b| *b == 0)
        .unwrap_or(NAME_PAYLOAD_LEN);
    Username::new(&String::from_utf8_lossy(&payload[..end]).replace('\u{FFFD}', ""))
}

/// Read the name payload off a fresh connection.
///
/// # Errors
///
/// Fails if the client disconnects before sending the full payload.
pub async fn read_name<R: AsyncRead + Unpin>(reader: &mut R) -> Result<Username> {
    let mut payload = [0; NAME_PAYLOAD_LEN];
    reader.read_exact(&mut payload).await?;
    Ok(decode_name(&payload))
}
