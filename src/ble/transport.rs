//! Radio and GATT transport abstractions.
//!
//! The pipeline only talks to the radio through these traits, so the
//! btleplug backend can be swapped for a scripted one in tests.

use async_trait::async_trait;
use uuid::Uuid;

use crate::data::ScanCandidate;
use crate::error::Result;

/// Scanning and connection primitive of a local radio.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Connection type produced by [`Transport::connect`].
    type Connection: Connection;

    /// Perform one discovery pass and return every advertisement seen.
    async fn scan(&self) -> Result<Vec<ScanCandidate>>;

    /// Open a connection to the peripheral at `address`.
    async fn connect(&self, address: &str) -> Result<Self::Connection>;
}

/// An open GATT connection to one peripheral.
///
/// A connection is owned by a single enumeration and consumed by
/// [`Connection::close`].
#[async_trait]
pub trait Connection: Send {
    /// List service UUIDs in the order the peripheral reports them.
    async fn services(&mut self) -> Result<Vec<Uuid>>;

    /// List the characteristic UUIDs of one service, in discovery order.
    async fn characteristics(&mut self, service: &Uuid) -> Result<Vec<Uuid>>;

    /// Read the current value of a characteristic.
    async fn read(&mut self, service: &Uuid, characteristic: &Uuid) -> Result<Vec<u8>>;

    /// Close the connection.
    async fn close(self) -> Result<()>;
}
