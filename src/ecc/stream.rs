//! Stream framing for the extended Hamming codes.
//!
//! A byte stream is read as a little-endian bit stream (bit `i` of the stream
//! is bit `i % 8` of byte `i / 8`) and cut into consecutive windows of
//! `data_bits` bits. Every window is encoded into one codeword, and codewords
//! are written back to back as little-endian `W`s.
//!
//! Windows are not byte aligned, so the framer works in frame periods of
//! `lcm(data_bits, code_bits)` bits. For the (32,26) code that is 416 bits:
//! 52 input bytes become 16 codewords (64 bytes). For the (64,57) code 456
//! input bytes become 64 codewords (512 bytes). Every buffer is a whole number
//! of frames, so window boundaries line up again at the start of each frame.
//!
//! The format has no header and no length field. The last frame is padded
//! with zeros on encode and the decoder drops the trailing zero bytes of each
//! frame again, so data that genuinely ends in zero bytes at a frame boundary
//! loses them. [`TrimPolicy`] selects a less lossy behaviour without changing
//! the file format.

use crate::ecc::hamming::ExtendedHamming;
use crate::ecc::word::Word;
use crate::ecc::{ErrorCorrection, Result};
use crate::error::Error;
use bitvec::prelude::*;
use log::{debug, trace, warn};
use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

/// Frames processed per read/encode/write cycle by default
const DEFAULT_FRAMES_PER_BUFFER: usize = 64;

/// Which decoded frames get their trailing zero bytes removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TrimPolicy {
    /// Trim every frame, keeping at least its first byte
    #[default]
    EveryFrame,
    /// Trim only the last frame of the stream
    FinalFrame,
    /// Emit whole frames, padding included
    Never,
}

/// Counters of one stream operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamStats {
    /// Frame periods processed
    pub frames: u64,
    /// Codewords encoded or decoded
    pub codewords: u64,
    /// Codewords that needed a correction while decoding
    pub corrected: u64,
    /// Bytes consumed from the reader
    pub bytes_read: u64,
    /// Bytes handed to the writer
    pub bytes_written: u64,
}

/// Packs byte streams into codewords of an [`ExtendedHamming`] code and back.
#[derive(Debug, Clone, Copy)]
pub struct StreamFramer<W: Word> {
    code: ExtendedHamming<W>,
    frames_per_buffer: usize,
    trim: TrimPolicy,
}

impl<W: Word> Default for StreamFramer<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Word> StreamFramer<W> {
    /// Creates a framer with the default buffer size and trim policy.
    pub fn new() -> Self {
        StreamFramer {
            code: ExtendedHamming::new(),
            frames_per_buffer: DEFAULT_FRAMES_PER_BUFFER,
            trim: TrimPolicy::default(),
        }
    }

    /// Sets how many frame periods are read, transformed and written per cycle.
    pub fn with_frames_per_buffer(mut self, frames: usize) -> Result<Self> {
        if frames == 0 {
            return Err(Error::InvalidInput(
                "Buffer must hold at least one frame".to_string(),
            ));
        }
        self.frames_per_buffer = frames;
        Ok(self)
    }

    /// Sets which decoded frames are trimmed of trailing zero bytes.
    pub fn with_trim(mut self, trim: TrimPolicy) -> Self {
        self.trim = trim;
        self
    }

    /// Gets the underlying code
    pub fn code(&self) -> &ExtendedHamming<W> {
        &self.code
    }

    /// Gets the trim policy
    pub fn trim(&self) -> TrimPolicy {
        self.trim
    }

    /// Frame period in bits: `lcm(data_bits, code_bits)`
    pub fn frame_bits(&self) -> usize {
        num_integer::lcm(self.code.data_bits(), self.code.code_bits()) as usize
    }

    /// Codewords per frame period
    pub fn codewords_per_frame(&self) -> usize {
        self.frame_bits() / self.code.data_bits() as usize
    }

    /// Plain bytes per frame period
    pub fn input_frame_bytes(&self) -> usize {
        self.frame_bits() / 8
    }

    /// Encoded bytes per frame period
    pub fn output_frame_bytes(&self) -> usize {
        self.codewords_per_frame() * W::BYTES
    }

    /// Size of the encoding of `input_len` plain bytes
    pub fn encoded_len(&self, input_len: usize) -> usize {
        input_len.div_ceil(self.input_frame_bytes()) * self.output_frame_bytes()
    }

    /// Encodes everything `reader` yields into `writer`.
    ///
    /// The final partial window and the rest of its frame are zero padded.
    /// An empty input produces an empty output.
    pub fn encode_stream<R: Read, O: Write>(
        &self,
        mut reader: R,
        mut writer: O,
    ) -> Result<StreamStats> {
        let in_frame = self.input_frame_bytes();
        let out_frame = self.output_frame_bytes();
        let mut input = vec![0u8; in_frame * self.frames_per_buffer];
        let mut output = vec![0u8; out_frame * self.frames_per_buffer];
        let mut stats = StreamStats::default();

        loop {
            let read = read_full(&mut reader, &mut input)?;
            if read == 0 {
                break;
            }
            stats.bytes_read += read as u64;

            let frames = read.div_ceil(in_frame);
            input[read..frames * in_frame].fill(0);

            for (plain, encoded) in input[..frames * in_frame]
                .chunks_exact(in_frame)
                .zip(output.chunks_exact_mut(out_frame))
            {
                self.encode_frame(plain, encoded)?;
                trace!(
                    "Encoded frame {}, first codeword {}",
                    stats.frames,
                    hex::encode(&encoded[..W::BYTES])
                );
                stats.frames += 1;
                stats.codewords += self.codewords_per_frame() as u64;
            }

            emit(&mut writer, &output[..frames * out_frame], &mut stats)?;

            if read < input.len() {
                break;
            }
        }

        writer.flush()?;
        debug!(
            "Encoded {} bytes into {} frames ({} bytes)",
            stats.bytes_read, stats.frames, stats.bytes_written
        );
        Ok(stats)
    }

    /// Decodes a stream written by [`encode_stream`](Self::encode_stream).
    ///
    /// Every frame is written as soon as it is decoded. Decoding stops at the
    /// first uncorrectable codeword with [`Error::Frame`], naming the frame and
    /// its byte offset in the encoded stream; all earlier frames are already
    /// written. A trailing chunk that is not a whole frame is rejected.
    pub fn decode_stream<R: Read, O: Write>(
        &self,
        mut reader: R,
        mut writer: O,
    ) -> Result<StreamStats> {
        let in_frame = self.output_frame_bytes();
        let out_frame = self.input_frame_bytes();
        let mut input = vec![0u8; in_frame * self.frames_per_buffer];
        let mut plain = vec![0u8; out_frame];
        // Last frame seen so far, held back until we know whether it is final
        let mut held: Vec<u8> = Vec::with_capacity(out_frame);
        let mut stats = StreamStats::default();

        loop {
            let read = read_full(&mut reader, &mut input)?;
            if read == 0 {
                break;
            }
            stats.bytes_read += read as u64;

            if read % in_frame != 0 {
                return Err(Error::InvalidInput(format!(
                    "Encoded stream ends with a partial frame of {} bytes, expected multiples of {}",
                    read % in_frame,
                    in_frame
                )));
            }

            for encoded in input[..read].chunks_exact(in_frame) {
                if let Err(err) = self.decode_frame(encoded, &mut plain, &mut stats) {
                    let frame = stats.frames;
                    warn!("Decoding stopped at frame {}", frame);
                    // Frames before the bad one are good; the held one is not the last.
                    if !held.is_empty() {
                        emit(&mut writer, &held, &mut stats)?;
                    }
                    writer.flush()?;
                    return Err(Error::Frame {
                        frame,
                        offset: frame * in_frame as u64,
                        source: Box::new(err),
                    });
                }
                trace!("Decoded frame {}", stats.frames);
                stats.frames += 1;

                match self.trim {
                    TrimPolicy::EveryFrame => {
                        emit(&mut writer, &plain[..trimmed_len(&plain)], &mut stats)?
                    }
                    TrimPolicy::FinalFrame => {
                        if !held.is_empty() {
                            emit(&mut writer, &held, &mut stats)?;
                        }
                        held.clear();
                        held.extend_from_slice(&plain);
                    }
                    TrimPolicy::Never => emit(&mut writer, &plain, &mut stats)?,
                }
            }

            if read < input.len() {
                break;
            }
        }

        if !held.is_empty() {
            emit(&mut writer, &held[..trimmed_len(&held)], &mut stats)?;
        }

        writer.flush()?;
        debug!(
            "Decoded {} frames into {} bytes, {} codewords corrected",
            stats.frames, stats.bytes_written, stats.corrected
        );
        Ok(stats)
    }

    /// Encodes the file at `input` into a new file at `output`.
    pub fn encode_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input: P,
        output: Q,
    ) -> Result<StreamStats> {
        let (reader, writer) = open_pair(input.as_ref(), output.as_ref())?;
        self.encode_stream(reader, writer)
    }

    /// Decodes the file at `input` into a new file at `output`.
    pub fn decode_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input: P,
        output: Q,
    ) -> Result<StreamStats> {
        let (reader, writer) = open_pair(input.as_ref(), output.as_ref())?;
        self.decode_stream(reader, writer)
    }

    /// Encodes one frame period of plain bytes into `encoded`.
    fn encode_frame(&self, plain: &[u8], encoded: &mut [u8]) -> Result<()> {
        let data_bits = self.code.data_bits() as usize;
        for (window, slot) in plain
            .view_bits::<Lsb0>()
            .chunks_exact(data_bits)
            .zip(encoded.chunks_exact_mut(W::BYTES))
        {
            let message = W::truncate(window.load_le::<u64>());
            slot.copy_from_slice(self.code.encode(message)?.to_le_array().as_ref());
        }
        Ok(())
    }

    /// Decodes one frame period of codewords into `plain`.
    fn decode_frame(
        &self,
        encoded: &[u8],
        plain: &mut [u8],
        stats: &mut StreamStats,
    ) -> Result<()> {
        let data_bits = self.code.data_bits() as usize;
        for (slot, window) in encoded
            .chunks_exact(W::BYTES)
            .zip(plain.view_bits_mut::<Lsb0>().chunks_exact_mut(data_bits))
        {
            let mut raw = W::Bytes::default();
            raw.as_mut().copy_from_slice(slot);
            let decoded = self.code.decode_detailed(W::from_le_array(raw))?;
            if decoded.correction.is_corrected() {
                stats.corrected += 1;
            }
            stats.codewords += 1;
            window.store_le(decoded.message.widen());
        }
        Ok(())
    }
}

impl<W: Word> ErrorCorrection for StreamFramer<W> {
    fn encode(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut encoded = Vec::with_capacity(self.encoded_len(data.len()));
        self.encode_stream(data, &mut encoded)?;
        Ok(encoded)
    }

    fn decode(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut decoded = Vec::with_capacity(data.len());
        self.decode_stream(data, &mut decoded)?;
        Ok(decoded)
    }
}

/// Length of a decoded frame once its trailing zero bytes are dropped.
///
/// The first byte is always kept.
fn trimmed_len(frame: &[u8]) -> usize {
    frame.iter().rposition(|&b| b != 0).map_or(1, |last| last + 1)
}

/// Fills `buf` as far as the reader allows, retrying interrupted reads.
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

fn emit<O: Write>(writer: &mut O, bytes: &[u8], stats: &mut StreamStats) -> Result<()> {
    writer.write_all(bytes)?;
    stats.bytes_written += bytes.len() as u64;
    Ok(())
}

fn open_pair(input: &Path, output: &Path) -> Result<(File, BufWriter<File>)> {
    let reader = File::open(input)
        .inspect_err(|e| warn!("Unable to open input file {}: {}", input.display(), e))?;
    let writer = File::create(output)
        .inspect_err(|e| warn!("Unable to open output file {}: {}", output.display(), e))?;
    Ok((reader, BufWriter::new(writer)))
}

/// Encodes `reader` into `writer` with the (32,26) code.
pub fn encode_stream<R: Read, O: Write>(reader: R, writer: O) -> Result<StreamStats> {
    StreamFramer::<u32>::new().encode_stream(reader, writer)
}

/// Decodes a (32,26) stream from `reader` into `writer`.
pub fn decode_stream<R: Read, O: Write>(reader: R, writer: O) -> Result<StreamStats> {
    StreamFramer::<u32>::new().decode_stream(reader, writer)
}

/// Encodes the file at `input` into `output` with the (32,26) code.
pub fn encode_file<P: AsRef<Path>, Q: AsRef<Path>>(input: P, output: Q) -> Result<StreamStats> {
    StreamFramer::<u32>::new().encode_file(input, output)
}

/// Decodes the (32,26) file at `input` into `output`.
pub fn decode_file<P: AsRef<Path>, Q: AsRef<Path>>(input: P, output: Q) -> Result<StreamStats> {
    StreamFramer::<u32>::new().decode_file(input, output)
}
