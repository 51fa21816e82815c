//! Endian-aware binary encoding.
//!
//! # Layout
//!
//! | Type                       | Encoding                                   |
//! |----------------------------|--------------------------------------------|
//! | `bool`                     | 1 byte, `0` or `1`                         |
//! | `i32`                      | 4 bytes                                    |
//! | `i64`, `ArrayTime`, `Interval` | 8 bytes                                |
//! | `f64` and quantities       | IEEE754, 8 bytes                           |
//! | `String`                   | `i32` byte length, then UTF-8 bytes        |
//! | `Tag`                      | its text form as a string                  |
//! | enumerations               | `i32` ordinal                              |
//! | `Entity`                   | five strings                               |
//! | 1-D vector                 | `i32` length, then elements                |
//! | 2-D vector                 | `i32` rows, `i32` columns, then elements   |
//! | optional attribute         | `bool` presence, then the value if present |
//!
//! Multi-byte values follow the stream's [`ByteOrder`].

use std::fmt;
use std::str::FromStr;

use asdm_model::{
    Angle, AntennaMake, AntennaType, ArrayTime, AsdmEnum, AtmPhaseCorrection, BasebandName,
    CorrelationMode, CorrelatorCalibration, Entity, EntityId, Frequency, Interval, Length,
    NetSideband, PolarizationType, ProcessorSubType, ProcessorType, SidebandProcessingMode,
    SpectralResolutionType, StationType, StokesParameter, SubscanIntent, SwitchingMode, Tag,
    WindowFunction,
};

use crate::error::{CodecError, Result};

/// Byte order of multi-byte values in a binary stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    BigEndian,
    LittleEndian,
}

impl ByteOrder {
    /// Byte order of the host.
    pub const fn native() -> Self {
        if cfg!(target_endian = "big") {
            Self::BigEndian
        } else {
            Self::LittleEndian
        }
    }

    /// Name used in binary table headers.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BigEndian => "Big_Endian",
            Self::LittleEndian => "Little_Endian",
        }
    }
}

impl Default for ByteOrder {
    fn default() -> Self {
        Self::native()
    }
}

impl fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ByteOrder {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "Big_Endian" => Ok(Self::BigEndian),
            "Little_Endian" => Ok(Self::LittleEndian),
            other => Err(CodecError::UnknownByteOrder(other.to_string())),
        }
    }
}

/// A value with a fixed binary encoding.
pub trait BinValue: Sized {
    fn write_bin(&self, writer: &mut BinWriter) -> Result<()>;
    fn read_bin(reader: &mut BinReader<'_>) -> Result<Self>;
}

/// Appends encoded values to an in-memory buffer.
#[derive(Debug)]
pub struct BinWriter {
    buf: Vec<u8>,
    byte_order: ByteOrder,
}

impl BinWriter {
    pub fn new(byte_order: ByteOrder) -> Self {
        Self {
            buf: Vec::new(),
            byte_order,
        }
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }

    pub fn write_bool(&mut self, value: bool) {
        self.buf.push(u8::from(value));
    }

    pub fn write_i32(&mut self, value: i32) {
        let bytes = match self.byte_order {
            ByteOrder::BigEndian => value.to_be_bytes(),
            ByteOrder::LittleEndian => value.to_le_bytes(),
        };
        self.buf.extend_from_slice(&bytes);
    }

    pub fn write_i64(&mut self, value: i64) {
        let bytes = match self.byte_order {
            ByteOrder::BigEndian => value.to_be_bytes(),
            ByteOrder::LittleEndian => value.to_le_bytes(),
        };
        self.buf.extend_from_slice(&bytes);
    }

    pub fn write_f64(&mut self, value: f64) {
        let bytes = match self.byte_order {
            ByteOrder::BigEndian => value.to_be_bytes(),
            ByteOrder::LittleEndian => value.to_le_bytes(),
        };
        self.buf.extend_from_slice(&bytes);
    }

    /// Write a length prefix.
    pub fn write_len(&mut self, len: usize) -> Result<()> {
        let value = i32::try_from(len).map_err(|_| CodecError::InvalidLength {
            offset: self.buf.len(),
            length: i64::try_from(len).unwrap_or(i64::MAX),
        })?;
        self.write_i32(value);
        Ok(())
    }

    pub fn write_str(&mut self, value: &str) -> Result<()> {
        self.write_len(value.len())?;
        self.buf.extend_from_slice(value.as_bytes());
        Ok(())
    }

    pub fn write<T: BinValue>(&mut self, value: &T) -> Result<()> {
        value.write_bin(self)
    }

    /// Presence flag followed by the value when present.
    pub fn write_optional<T: BinValue>(&mut self, value: Option<&T>) -> Result<()> {
        self.write_bool(value.is_some());
        match value {
            Some(v) => v.write_bin(self),
            None => Ok(()),
        }
    }

    pub fn write_vec<T: BinValue>(&mut self, values: &[T]) -> Result<()> {
        self.write_len(values.len())?;
        values.iter().try_for_each(|v| v.write_bin(self))
    }

    /// Presence flag followed by the vector when present.
    pub fn write_optional_vec<T: BinValue>(&mut self, values: Option<&[T]>) -> Result<()> {
        self.write_bool(values.is_some());
        match values {
            Some(v) => self.write_vec(v),
            None => Ok(()),
        }
    }

    /// Rows and columns once, then every element row-major. Rows must share a length.
    pub fn write_matrix<T: BinValue>(&mut self, values: &[Vec<T>]) -> Result<()> {
        let columns = values.first().map_or(0, Vec::len);
        if values.iter().any(|row| row.len() != columns) {
            return Err(CodecError::invalid_value(
                format!("{} rows", values.len()),
                "ragged two-dimensional array",
            ));
        }
        if columns == 0 && !values.is_empty() {
            return Err(CodecError::invalid_value(
                format!("{} rows", values.len()),
                "two-dimensional array rows have no columns",
            ));
        }
        self.write_len(values.len())?;
        self.write_len(columns)?;
        values
            .iter()
            .flatten()
            .try_for_each(|v| v.write_bin(self))
    }
}

/// Decodes values from a borrowed byte slice.
#[derive(Debug)]
pub struct BinReader<'a> {
    data: &'a [u8],
    pos: usize,
    byte_order: ByteOrder,
}

impl<'a> BinReader<'a> {
    pub fn new(data: &'a [u8], byte_order: ByteOrder) -> Self {
        Self {
            data,
            pos: 0,
            byte_order,
        }
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Consume `len` raw bytes.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        if self.remaining() < len {
            return Err(CodecError::UnexpectedEof {
                offset: self.pos,
                needed: len - self.remaining(),
            });
        }
        let bytes = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let offset = self.pos;
        self.read_bytes(N)?
            .try_into()
            .map_err(|_| CodecError::UnexpectedEof { offset, needed: N })
    }

    pub fn read_bool(&mut self) -> Result<bool> {
        let [byte] = self.read_array::<1>()?;
        Ok(byte != 0)
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        let bytes = self.read_array::<4>()?;
        Ok(match self.byte_order {
            ByteOrder::BigEndian => i32::from_be_bytes(bytes),
            ByteOrder::LittleEndian => i32::from_le_bytes(bytes),
        })
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        let bytes = self.read_array::<8>()?;
        Ok(match self.byte_order {
            ByteOrder::BigEndian => i64::from_be_bytes(bytes),
            ByteOrder::LittleEndian => i64::from_le_bytes(bytes),
        })
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        let bytes = self.read_array::<8>()?;
        Ok(match self.byte_order {
            ByteOrder::BigEndian => f64::from_be_bytes(bytes),
            ByteOrder::LittleEndian => f64::from_le_bytes(bytes),
        })
    }

    /// Read a length prefix, rejecting negative values.
    pub fn read_len(&mut self) -> Result<usize> {
        let offset = self.pos;
        let value = self.read_i32()?;
        usize::try_from(value).map_err(|_| CodecError::InvalidLength {
            offset,
            length: i64::from(value),
        })
    }

    pub fn read_string(&mut self) -> Result<String> {
        let len = self.read_len()?;
        let offset = self.pos;
        let bytes = self.read_bytes(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| CodecError::InvalidUtf8 { offset })
    }

    pub fn read<T: BinValue>(&mut self) -> Result<T> {
        T::read_bin(self)
    }

    pub fn read_optional<T: BinValue>(&mut self) -> Result<Option<T>> {
        if self.read_bool()? {
            T::read_bin(self).map(Some)
        } else {
            Ok(None)
        }
    }

    pub fn read_vec<T: BinValue>(&mut self) -> Result<Vec<T>> {
        let len = self.read_len()?;
        let mut values = Vec::with_capacity(len.min(self.remaining()));
        for _ in 0..len {
            values.push(T::read_bin(self)?);
        }
        Ok(values)
    }

    pub fn read_optional_vec<T: BinValue>(&mut self) -> Result<Option<Vec<T>>> {
        if self.read_bool()? {
            self.read_vec().map(Some)
        } else {
            Ok(None)
        }
    }

    pub fn read_matrix<T: BinValue>(&mut self) -> Result<Vec<Vec<T>>> {
        let rows = self.read_len()?;
        let offset = self.pos;
        let columns = self.read_len()?;
        if columns == 0 && rows != 0 {
            return Err(CodecError::InvalidLength {
                offset,
                length: 0,
            });
        }
        let mut values = Vec::with_capacity(rows.min(self.remaining()));
        for _ in 0..rows {
            let mut row = Vec::with_capacity(columns.min(self.remaining()));
            for _ in 0..columns {
                row.push(T::read_bin(self)?);
            }
            values.push(row);
        }
        Ok(values)
    }
}

impl BinValue for bool {
    fn write_bin(&self, writer: &mut BinWriter) -> Result<()> {
        writer.write_bool(*self);
        Ok(())
    }

    fn read_bin(reader: &mut BinReader<'_>) -> Result<Self> {
        reader.read_bool()
    }
}

impl BinValue for i32 {
    fn write_bin(&self, writer: &mut BinWriter) -> Result<()> {
        writer.write_i32(*self);
        Ok(())
    }

    fn read_bin(reader: &mut BinReader<'_>) -> Result<Self> {
        reader.read_i32()
    }
}

impl BinValue for i64 {
    fn write_bin(&self, writer: &mut BinWriter) -> Result<()> {
        writer.write_i64(*self);
        Ok(())
    }

    fn read_bin(reader: &mut BinReader<'_>) -> Result<Self> {
        reader.read_i64()
    }
}

impl BinValue for f64 {
    fn write_bin(&self, writer: &mut BinWriter) -> Result<()> {
        writer.write_f64(*self);
        Ok(())
    }

    fn read_bin(reader: &mut BinReader<'_>) -> Result<Self> {
        reader.read_f64()
    }
}

impl BinValue for String {
    fn write_bin(&self, writer: &mut BinWriter) -> Result<()> {
        writer.write_str(self)
    }

    fn read_bin(reader: &mut BinReader<'_>) -> Result<Self> {
        reader.read_string()
    }
}

impl BinValue for Tag {
    fn write_bin(&self, writer: &mut BinWriter) -> Result<()> {
        writer.write_str(&self.to_string())
    }

    fn read_bin(reader: &mut BinReader<'_>) -> Result<Self> {
        Ok(reader.read_string()?.parse()?)
    }
}

impl BinValue for ArrayTime {
    fn write_bin(&self, writer: &mut BinWriter) -> Result<()> {
        writer.write_i64(self.nanoseconds());
        Ok(())
    }

    fn read_bin(reader: &mut BinReader<'_>) -> Result<Self> {
        reader.read_i64().map(ArrayTime::from_nanoseconds)
    }
}

impl BinValue for Interval {
    fn write_bin(&self, writer: &mut BinWriter) -> Result<()> {
        writer.write_i64(self.nanoseconds());
        Ok(())
    }

    fn read_bin(reader: &mut BinReader<'_>) -> Result<Self> {
        reader.read_i64().map(Interval::from_nanoseconds)
    }
}

impl BinValue for Entity {
    fn write_bin(&self, writer: &mut BinWriter) -> Result<()> {
        writer.write_str(self.entity_id.as_str())?;
        writer.write_str(&self.entity_id_encrypted)?;
        writer.write_str(&self.entity_type_name)?;
        writer.write_str(&self.entity_version)?;
        writer.write_str(&self.instance_version)
    }

    fn read_bin(reader: &mut BinReader<'_>) -> Result<Self> {
        Ok(Entity {
            entity_id: EntityId::new(reader.read_string()?)?,
            entity_id_encrypted: reader.read_string()?,
            entity_type_name: reader.read_string()?,
            entity_version: reader.read_string()?,
            instance_version: reader.read_string()?,
        })
    }
}

macro_rules! quantity_bin_value {
    ($($ty:ty),+) => {
        $(
            impl BinValue for $ty {
                fn write_bin(&self, writer: &mut BinWriter) -> Result<()> {
                    writer.write_f64(self.get());
                    Ok(())
                }

                fn read_bin(reader: &mut BinReader<'_>) -> Result<Self> {
                    reader.read_f64().map(<$ty>::new)
                }
            }
        )+
    };
}

quantity_bin_value!(Length, Frequency, Angle);

macro_rules! enum_bin_value {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl BinValue for $ty {
                fn write_bin(&self, writer: &mut BinWriter) -> Result<()> {
                    writer.write_i32(self.ordinal());
                    Ok(())
                }

                fn read_bin(reader: &mut BinReader<'_>) -> Result<Self> {
                    Ok(<$ty>::from_ordinal(reader.read_i32()?)?)
                }
            }
        )+
    };
}

enum_bin_value!(
    StationType,
    AntennaMake,
    AntennaType,
    BasebandName,
    NetSideband,
    SidebandProcessingMode,
    WindowFunction,
    StokesParameter,
    PolarizationType,
    ProcessorType,
    ProcessorSubType,
    CorrelationMode,
    AtmPhaseCorrection,
    SpectralResolutionType,
    SubscanIntent,
    SwitchingMode,
    CorrelatorCalibration,
);
