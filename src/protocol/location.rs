//! Location characteristics: location data mode, location data and proxy
//! positions.
//!
//! Positions are signed millimetres, distances unsigned millimetres, and
//! quality factors range 0-100.

use std::fmt;

use crate::error::{Error, Result};
use crate::protocol::reader::ByteReader;

/// What a location data value carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LocationDataMode {
    /// Position only.
    Position,
    /// Distances to anchors only.
    Distances,
    /// Position followed by distances.
    PositionAndDistances,
}

impl LocationDataMode {
    /// Convert from the raw mode byte.
    pub fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::Position),
            1 => Some(Self::Distances),
            2 => Some(Self::PositionAndDistances),
            _ => None,
        }
    }

    /// Parse the location data mode characteristic (one byte).
    pub fn parse(data: &[u8]) -> Result<Self> {
        let raw = ByteReader::new(data, "Location data mode").u8()?;
        Self::from_raw(raw).ok_or_else(|| Error::InvalidData {
            context: format!("Unknown location data mode {}", raw),
        })
    }

    fn has_position(&self) -> bool {
        matches!(self, Self::Position | Self::PositionAndDistances)
    }

    fn has_distances(&self) -> bool {
        matches!(self, Self::Distances | Self::PositionAndDistances)
    }
}

impl fmt::Display for LocationDataMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Position => write!(f, "Position"),
            Self::Distances => write!(f, "Distances"),
            Self::PositionAndDistances => write!(f, "Position and distances"),
        }
    }
}

/// A 3D position with its quality factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    /// X in millimetres.
    pub x: i32,
    /// Y in millimetres.
    pub y: i32,
    /// Z in millimetres.
    pub z: i32,
    /// Quality factor.
    pub quality: u8,
}

impl Position {
    /// Encoded size.
    pub const SIZE: usize = 13;

    fn read(reader: &mut ByteReader<'_>) -> Result<Self> {
        Ok(Self {
            x: reader.i32()?,
            y: reader.i32()?,
            z: reader.i32()?,
            quality: reader.u8()?,
        })
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "x {} mm, y {} mm, z {} mm, quality {}",
            self.x, self.y, self.z, self.quality
        )
    }
}

/// Range to one anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Distance {
    /// 16-bit UWB address of the anchor.
    pub node_id: u16,
    /// Distance in millimetres.
    pub distance: u32,
    /// Quality factor.
    pub quality: u8,
}

impl Distance {
    /// Encoded size.
    pub const SIZE: usize = 7;

    fn read(reader: &mut ByteReader<'_>) -> Result<Self> {
        Ok(Self {
            node_id: reader.u16()?,
            distance: reader.u32()?,
            quality: reader.u8()?,
        })
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "0x{:04x} {} mm (quality {})",
            self.node_id, self.distance, self.quality
        )
    }
}

/// Decoded location data value.
///
/// An empty value (a node that has not ranged yet) decodes to all `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LocationData {
    /// Content type announced by the first byte.
    pub content: Option<LocationDataMode>,
    /// Position, when the content carries one.
    pub position: Option<Position>,
    /// Distances, when the content carries them.
    pub distances: Option<Vec<Distance>>,
}

impl LocationData {
    /// Parse the location data characteristic.
    ///
    /// Layout: one content byte, then a 13-byte position when the content
    /// includes one, then a count byte and 7-byte distance entries when the
    /// content includes distances.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.is_empty() {
            return Ok(Self::default());
        }

        let mut reader = ByteReader::new(data, "Location data");
        let raw = reader.u8()?;
        let content = LocationDataMode::from_raw(raw).ok_or_else(|| Error::InvalidData {
            context: format!("Unknown location data content {}", raw),
        })?;

        let position = if content.has_position() {
            Some(Position::read(&mut reader)?)
        } else {
            None
        };

        let distances = if content.has_distances() {
            let count = reader.u8()? as usize;
            let mut distances = Vec::with_capacity(count);
            for _ in 0..count {
                distances.push(Distance::read(&mut reader)?);
            }
            Some(distances)
        } else {
            None
        };

        Ok(Self {
            content: Some(content),
            position,
            distances,
        })
    }
}

impl fmt::Display for LocationData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(content) = self.content else {
            return write!(f, "empty");
        };

        write!(f, "{}", content)?;
        if let Some(position) = &self.position {
            write!(f, "; position {}", position)?;
        }
        if let Some(distances) = &self.distances {
            write!(f, "; {} distances", distances.len())?;
            for distance in distances {
                write!(f, ", {}", distance)?;
            }
        }
        Ok(())
    }
}

/// Position of a tag as relayed by a proxy node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProxyPosition {
    /// 16-bit UWB address of the tag.
    pub node_id: u16,
    /// Its position.
    pub position: Position,
}

impl ProxyPosition {
    /// Encoded size of one entry.
    pub const SIZE: usize = 15;

    /// Parse the proxy positions characteristic: a count byte followed by
    /// 15-byte entries. An empty value decodes to no entries.
    pub fn parse_list(data: &[u8]) -> Result<Vec<Self>> {
        if data.is_empty() {
            return Ok(Vec::new());
        }

        let mut reader = ByteReader::new(data, "Proxy positions");
        let count = reader.u8()? as usize;
        let mut entries = Vec::with_capacity(count);
        for _ in 0..count {
            entries.push(Self {
                node_id: reader.u16()?,
                position: Position::read(&mut reader)?,
            });
        }
        Ok(entries)
    }
}

impl fmt::Display for ProxyPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:04x} at {}", self.node_id, self.position)
    }
}
