//! Little-endian cursor over characteristic bytes.

use crate::error::{Error, Result};

/// Reads fixed-width little-endian fields front to back.
///
/// Every accessor fails with [`Error::InvalidData`] naming `what` when the
/// buffer runs out.
#[derive(Debug, Clone)]
pub(crate) struct ByteReader<'a> {
    data: &'a [u8],
    offset: usize,
    what: &'static str,
}

impl<'a> ByteReader<'a> {
    pub(crate) fn new(data: &'a [u8], what: &'static str) -> Self {
        Self {
            data,
            offset: 0,
            what,
        }
    }

    /// Bytes not yet consumed.
    pub(crate) fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N]> {
        let end = self.offset + N;
        let bytes = self
            .data
            .get(self.offset..end)
            .ok_or_else(|| Error::InvalidData {
                context: format!(
                    "{} too short: {} bytes (need at least {})",
                    self.what,
                    self.data.len(),
                    end
                ),
            })?;

        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        self.offset = end;
        Ok(out)
    }

    pub(crate) fn u8(&mut self) -> Result<u8> {
        Ok(self.take::<1>()?[0])
    }

    pub(crate) fn u16(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.take()?))
    }

    pub(crate) fn u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.take()?))
    }

    pub(crate) fn i32(&mut self) -> Result<i32> {
        Ok(i32::from_le_bytes(self.take()?))
    }

    pub(crate) fn u64(&mut self) -> Result<u64> {
        Ok(u64::from_le_bytes(self.take()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_little_endian_in_order() {
        let data = [0x01, 0x34, 0x12, 0xfe, 0xff, 0xff, 0xff];
        let mut reader = ByteReader::new(&data, "Sample");
        assert_eq!(reader.u8().unwrap(), 0x01);
        assert_eq!(reader.u16().unwrap(), 0x1234);
        assert_eq!(reader.i32().unwrap(), -2);
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn test_short_buffer_names_the_field() {
        let mut reader = ByteReader::new(&[0x01, 0x02], "Update rate");
        match reader.u32() {
            Err(Error::InvalidData { context }) => {
                assert_eq!(context, "Update rate too short: 2 bytes (need at least 4)")
            }
            other => panic!("expected InvalidData, got {:?}", other),
        }
        // A failed read consumes nothing
        assert_eq!(reader.remaining(), 2);
    }
}
