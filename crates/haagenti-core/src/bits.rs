//! Bit-granular stream I/O.
//!
//! Compressed streams are read and written in groups of 1 to 32 bits, most
//! significant bit first. [`BitRead`] and [`BitWrite`] describe the
//! operations the compressors rely on; [`BitReader`] and [`BitWriter`] are
//! buffered implementations over any `Read + Seek` source and `Write` sink.

use std::io::{self, Read, Seek, SeekFrom, Write};

use crate::error::Result;

/// Default byte buffer size for bit streams (8 KB).
pub const DEFAULT_BIT_BUFFER: usize = 8 * 1024;

/// Largest group that can be transferred in one call.
pub const MAX_BITS_PER_CALL: u8 = 32;

/// A readable, rewindable source of bits.
pub trait BitRead {
    /// Read `n` bits (`n <= 32`), most significant bit first.
    ///
    /// Returns `Ok(None)` once fewer than `n` bits remain.
    fn read_bits(&mut self, n: u8) -> Result<Option<u32>>;

    /// Rewind to the first bit of the stream.
    fn reset(&mut self) -> Result<()>;

    /// Number of bits consumed since creation or the last reset.
    fn bits_read(&self) -> u64;

    /// Read a single bit.
    #[inline]
    fn read_bit(&mut self) -> Result<Option<bool>> {
        Ok(self.read_bits(1)?.map(|bit| bit == 1))
    }
}

/// A writable sink of bits.
pub trait BitWrite {
    /// Write the low `n` bits of `value` (`n <= 32`), most significant bit first.
    fn write_bits(&mut self, n: u8, value: u32) -> Result<()>;

    /// Total bits emitted so far, including flush padding.
    fn bits_written(&self) -> u64;

    /// Pad the current byte with zero bits and flush the sink.
    fn flush(&mut self) -> Result<()>;
}

#[inline]
fn low_mask(n: u8) -> u64 {
    (1u64 << n) - 1
}

/// Buffered MSB-first bit reader.
pub struct BitReader<R> {
    inner: R,
    buf: Box<[u8]>,
    pos: usize,
    len: usize,
    eof: bool,
    bit_buf: u64,
    bit_count: u8,
    bits_read: u64,
}

impl<R: Read + Seek> BitReader<R> {
    /// Create a new bit reader with the default buffer size.
    pub fn new(inner: R) -> Self {
        Self::with_capacity(DEFAULT_BIT_BUFFER, inner)
    }

    /// Create a new bit reader with the given byte buffer size.
    pub fn with_capacity(capacity: usize, inner: R) -> Self {
        Self {
            inner,
            buf: vec![0u8; capacity.max(1)].into_boxed_slice(),
            pos: 0,
            len: 0,
            eof: false,
            bit_buf: 0,
            bit_count: 0,
            bits_read: 0,
        }
    }

    /// Get a reference to the inner reader.
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Consume the bit reader, returning the inner reader.
    pub fn into_inner(self) -> R {
        self.inner
    }

    fn next_byte(&mut self) -> io::Result<Option<u8>> {
        if self.pos == self.len {
            if self.eof {
                return Ok(None);
            }
            loop {
                match self.inner.read(&mut self.buf) {
                    Ok(0) => {
                        self.eof = true;
                        return Ok(None);
                    }
                    Ok(n) => {
                        self.pos = 0;
                        self.len = n;
                        break;
                    }
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e),
                }
            }
        }
        let byte = self.buf[self.pos];
        self.pos += 1;
        Ok(Some(byte))
    }
}

impl<R: Read + Seek> BitRead for BitReader<R> {
    fn read_bits(&mut self, n: u8) -> Result<Option<u32>> {
        debug_assert!(n <= MAX_BITS_PER_CALL);

        while self.bit_count < n {
            match self.next_byte()? {
                Some(byte) => {
                    self.bit_buf = (self.bit_buf << 8) | byte as u64;
                    self.bit_count += 8;
                }
                None => return Ok(None),
            }
        }

        self.bit_count -= n;
        let value = (self.bit_buf >> self.bit_count) & low_mask(n);
        self.bit_buf &= low_mask(self.bit_count);
        self.bits_read += n as u64;
        Ok(Some(value as u32))
    }

    fn reset(&mut self) -> Result<()> {
        self.inner.seek(SeekFrom::Start(0))?;
        self.pos = 0;
        self.len = 0;
        self.eof = false;
        self.bit_buf = 0;
        self.bit_count = 0;
        self.bits_read = 0;
        Ok(())
    }

    fn bits_read(&self) -> u64 {
        self.bits_read
    }
}

/// Buffered MSB-first bit writer.
///
/// Call [`BitWrite::flush`] or [`BitWriter::finish`] when done; bits still
/// in the accumulator are not written on drop.
pub struct BitWriter<W: Write> {
    inner: W,
    buf: Vec<u8>,
    capacity: usize,
    bit_buf: u64,
    bit_count: u8,
    bits_written: u64,
}

impl<W: Write> BitWriter<W> {
    /// Create a new bit writer with the default buffer size.
    pub fn new(inner: W) -> Self {
        Self::with_capacity(DEFAULT_BIT_BUFFER, inner)
    }

    /// Create a new bit writer with the given byte buffer size.
    pub fn with_capacity(capacity: usize, inner: W) -> Self {
        let capacity = capacity.max(1);
        Self {
            inner,
            buf: Vec::with_capacity(capacity),
            capacity,
            bit_buf: 0,
            bit_count: 0,
            bits_written: 0,
        }
    }

    /// Get a reference to the inner writer.
    ///
    /// Buffered bytes are not visible until the writer is flushed.
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Flush all pending bits and return the inner writer.
    pub fn finish(mut self) -> Result<W> {
        BitWrite::flush(&mut self)?;
        Ok(self.inner)
    }

    #[inline]
    fn push_byte(&mut self, byte: u8) -> io::Result<()> {
        self.buf.push(byte);
        if self.buf.len() >= self.capacity {
            self.inner.write_all(&self.buf)?;
            self.buf.clear();
        }
        Ok(())
    }
}

impl<W: Write> BitWrite for BitWriter<W> {
    fn write_bits(&mut self, n: u8, value: u32) -> Result<()> {
        debug_assert!(n <= MAX_BITS_PER_CALL);

        self.bit_buf = (self.bit_buf << n) | (value as u64 & low_mask(n));
        self.bit_count += n;
        self.bits_written += n as u64;

        while self.bit_count >= 8 {
            self.bit_count -= 8;
            let byte = (self.bit_buf >> self.bit_count) as u8;
            self.push_byte(byte)?;
        }
        self.bit_buf &= low_mask(self.bit_count);
        Ok(())
    }

    fn bits_written(&self) -> u64 {
        self.bits_written
    }

    fn flush(&mut self) -> Result<()> {
        if self.bit_count > 0 {
            let pad = 8 - self.bit_count;
            let byte = (self.bit_buf << pad) as u8;
            self.bits_written += pad as u64;
            self.bit_buf = 0;
            self.bit_count = 0;
            self.push_byte(byte)?;
        }
        if !self.buf.is_empty() {
            self.inner.write_all(&self.buf)?;
            self.buf.clear();
        }
        self.inner.flush()?;
        Ok(())
    }
}
