use crate::debug::macros::*;
use crate::{
    validate, BitString, BitWriter, Error, Result, Segment, SegmentOpt, SegmentType, Value,
};

mod bytes;
mod float;
mod integer;
mod utf;

/// Accumulates segments and packs them into a [`BitString`].
///
/// Segments are encoded strictly in insertion order, with no implicit
/// padding between them: a 3-bit segment followed by an 8-bit segment
/// produces an 11-bit result. Validation happens in [`Builder::build`],
/// so assembling bad segments is cheap and the first offender reports
/// its error.
///
/// # Examples
///
/// ```
/// use bitsyntax::Builder;
///
/// let bits = Builder::new()
///     .add_integer(0x2au8, &[])
///     .build()
///     .unwrap();
/// assert_eq!(bits.to_bytes(), [0x2a]);
/// ```
#[derive(Debug, Default)]
pub struct Builder {
    segments: Vec<Segment>,
}

impl Builder {
    /// Build a new, empty builder.
    pub fn new() -> Self {
        Builder::default()
    }

    fn add_typed<V: Into<Value>>(mut self, ty: SegmentType, value: V, opts: &[SegmentOpt]) -> Self {
        let mut all = Vec::with_capacity(opts.len() + 1);
        all.push(SegmentOpt::Type(ty));
        all.extend_from_slice(opts);
        self.segments.push(Segment::new(value, &all));
        self
    }

    /// Append an integer segment (default size 8, unsigned, big-endian).
    pub fn add_integer<V: Into<Value>>(self, value: V, opts: &[SegmentOpt]) -> Self {
        self.add_typed(SegmentType::Integer, value, opts)
    }

    /// Append a float segment (default size 64).
    pub fn add_float<V: Into<Value>>(self, value: V, opts: &[SegmentOpt]) -> Self {
        self.add_typed(SegmentType::Float, value, opts)
    }

    /// Append a binary segment. The size (in bytes, with the default
    /// unit) must be given explicitly.
    pub fn add_binary<V: Into<Value>>(self, value: V, opts: &[SegmentOpt]) -> Self {
        self.add_typed(SegmentType::Binary, value, opts)
    }

    /// Append a bitstring segment (defaults to the value's full length).
    pub fn add_bitstring<V: Into<Value>>(self, value: V, opts: &[SegmentOpt]) -> Self {
        self.add_typed(SegmentType::Bitstring, value, opts)
    }

    /// Append a code point (or string) as UTF-8.
    pub fn add_utf8<V: Into<Value>>(self, value: V, opts: &[SegmentOpt]) -> Self {
        self.add_typed(SegmentType::Utf8, value, opts)
    }

    /// Append a code point (or string) as UTF-16.
    pub fn add_utf16<V: Into<Value>>(self, value: V, opts: &[SegmentOpt]) -> Self {
        self.add_typed(SegmentType::Utf16, value, opts)
    }

    /// Append a code point (or string) as UTF-32.
    pub fn add_utf32<V: Into<Value>>(self, value: V, opts: &[SegmentOpt]) -> Self {
        self.add_typed(SegmentType::Utf32, value, opts)
    }

    /// Append a pre-assembled segment.
    pub fn add_segment(mut self, segment: Segment) -> Self {
        self.segments.push(segment);
        self
    }

    /// Validate and encode all segments, in order.
    ///
    /// The output is the bit-level concatenation of the per-segment
    /// encodings; the first failing segment aborts the build.
    pub fn build(self) -> Result<BitString> {
        let mut writer = BitWriter::new();
        for mut segment in self.segments {
            validate(&mut segment)?;
            encode_segment(&segment, &mut writer)?;
        }
        Ok(writer.finalize())
    }
}

fn encode_segment(segment: &Segment, writer: &mut BitWriter) -> Result<()> {
    if segment.dynamic_size.is_some() {
        // late-bound sizes only exist in match context
        return Err(Error::InvalidSize {
            size: 0,
            msg: "dynamic sizes cannot be used when building",
        });
    }
    // the validator assigned a type
    let ty = segment.ty.unwrap_or(SegmentType::Integer);
    log_trace!(
        "encode {:?} ({} bits) at bit {}",
        ty,
        segment.effective_bits(),
        writer.bit_len()
    );
    let result = match ty {
        SegmentType::Integer => integer::encode(segment, writer),
        SegmentType::Float => float::encode(segment, writer),
        SegmentType::Binary => bytes::encode_binary(segment, writer),
        SegmentType::Bitstring => bytes::encode_bitstring(segment, writer),
        SegmentType::Utf8 | SegmentType::Utf16 | SegmentType::Utf32 => {
            utf::encode(ty, segment, writer)
        }
        // rest segments are match-only patterns
        SegmentType::RestBinary | SegmentType::RestBitstring => Err(Error::InvalidType),
    };
    if let Err(_e) = &result {
        log_error!("encoding {:?} segment failed: {}", ty, _e);
    }
    result
}
