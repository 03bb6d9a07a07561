use std::convert::TryFrom;

use crate::debug::macros::*;
use crate::expr::{self, Bindings};
use crate::{
    validate, BitReader, BitString, DynamicSize, Error, Result, Segment, SegmentOpt, SegmentType,
    Value,
};

mod bytes;
mod float;
mod integer;
mod utf;

pub(crate) use integer::Decoded;

/// Where a decoded segment lands.
///
/// The set of supported destinations is closed: primitive integers,
/// floats, byte vectors, bit strings, chars, or nothing at all.
#[derive(Debug)]
pub(crate) enum Dest<'d> {
    U8(&'d mut u8),
    U16(&'d mut u16),
    U32(&'d mut u32),
    U64(&'d mut u64),
    U128(&'d mut u128),
    I8(&'d mut i8),
    I16(&'d mut i16),
    I32(&'d mut i32),
    I64(&'d mut i64),
    I128(&'d mut i128),
    F32(&'d mut f32),
    F64(&'d mut f64),
    Bytes(&'d mut Vec<u8>),
    Bits(&'d mut BitString),
    Char(&'d mut char),
    /// Decode and discard.
    Skip,
}

impl Dest<'_> {
    /// Short name of the destination shape, for diagnostics.
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Dest::U8(_)
            | Dest::U16(_)
            | Dest::U32(_)
            | Dest::U64(_)
            | Dest::U128(_)
            | Dest::I8(_)
            | Dest::I16(_)
            | Dest::I32(_)
            | Dest::I64(_)
            | Dest::I128(_) => "integer destination",
            Dest::F32(_) | Dest::F64(_) => "float destination",
            Dest::Bytes(_) => "byte destination",
            Dest::Bits(_) => "bitstring destination",
            Dest::Char(_) => "char destination",
            Dest::Skip => "discard",
        }
    }
}

/// Opaque handle tying a caller-supplied slot to the matcher.
///
/// Obtained through [`IntDestination`] / [`FloatDestination`]; not
/// constructible outside the crate.
#[derive(Debug)]
pub struct Destination<'d>(pub(crate) Dest<'d>);

/// Integer types that can receive a decoded integer segment.
pub trait IntDestination {
    #[doc(hidden)]
    fn destination(slot: &mut Self) -> Destination<'_>;
}

/// Float types that can receive a decoded float segment.
pub trait FloatDestination {
    #[doc(hidden)]
    fn destination(slot: &mut Self) -> Destination<'_>;
}

macro_rules! impl_int_destination {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl IntDestination for $ty {
                fn destination(slot: &mut Self) -> Destination<'_> {
                    Destination(Dest::$variant(slot))
                }
            }
        )*
    };
}

macro_rules! impl_float_destination {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl FloatDestination for $ty {
                fn destination(slot: &mut Self) -> Destination<'_> {
                    Destination(Dest::$variant(slot))
                }
            }
        )*
    };
}

impl_int_destination!(
    u8 => U8, u16 => U16, u32 => U32, u64 => U64, u128 => U128,
    i8 => I8, i16 => I16, i32 => I32, i64 => I64, i128 => I128,
);
impl_float_destination!(f32 => F32, f64 => F64);

struct Pattern<'d> {
    segment: Segment,
    dest: Dest<'d>,
}

/// Consumes a [`BitString`] against a declarative pattern of segments,
/// binding decoded values into caller-supplied destinations.
///
/// Pattern segments are tried strictly in order; the unconsumed tail is
/// returned as the residual (empty unless the pattern ends in a `rest`
/// segment or input is longer than the pattern).
///
/// Destinations are written eagerly as each segment decodes. When
/// [`Matcher::match_bits`] returns an error, destinations decoded
/// before the failing segment hold values and later ones are untouched;
/// treat every destination as unspecified unless the call returned
/// `Ok`.
///
/// # Examples
///
/// ```
/// use bitsyntax::{Builder, Matcher, SegmentOpt};
///
/// let input = Builder::new()
///     .add_integer(0xabcdu16, &[SegmentOpt::Size(16)])
///     .build()
///     .unwrap();
///
/// let mut value = 0u16;
/// let rest = Matcher::new()
///     .integer(&mut value, &[SegmentOpt::Size(16)])
///     .match_bits(&input)
///     .unwrap();
/// assert_eq!(value, 0xabcd);
/// assert!(rest.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct Matcher<'d> {
    patterns: Vec<Pattern<'d>>,
}

impl std::fmt::Debug for Pattern<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pattern")
            .field("segment", &self.segment)
            .finish()
    }
}

impl<'d> Matcher<'d> {
    /// Build a new, empty matcher.
    pub fn new() -> Self {
        Matcher {
            patterns: Vec::new(),
        }
    }

    fn add_pattern(mut self, ty: SegmentType, dest: Dest<'d>, opts: &[SegmentOpt]) -> Self {
        let mut all = Vec::with_capacity(opts.len() + 1);
        all.push(SegmentOpt::Type(ty));
        all.extend_from_slice(opts);
        self.patterns.push(Pattern {
            segment: Segment::new(Value::Null, &all),
            dest,
        });
        self
    }

    /// Expect an integer segment and bind it into `dst`.
    pub fn integer<T: IntDestination>(self, dst: &'d mut T, opts: &[SegmentOpt]) -> Self {
        let Destination(dest) = T::destination(dst);
        self.add_pattern(SegmentType::Integer, dest, opts)
    }

    /// Expect a float segment and bind it into `dst`.
    pub fn float<T: FloatDestination>(self, dst: &'d mut T, opts: &[SegmentOpt]) -> Self {
        let Destination(dest) = T::destination(dst);
        self.add_pattern(SegmentType::Float, dest, opts)
    }

    /// Expect whole bytes and bind them into `dst`. Without an explicit
    /// size, consumes the rest of the input (which must be
    /// byte-aligned).
    pub fn binary(self, dst: &'d mut Vec<u8>, opts: &[SegmentOpt]) -> Self {
        self.add_pattern(SegmentType::Binary, Dest::Bytes(dst), opts)
    }

    /// Expect a bitstring segment and bind it into `dst`. Without an
    /// explicit size, consumes the rest of the input.
    pub fn bitstring(self, dst: &'d mut BitString, opts: &[SegmentOpt]) -> Self {
        self.add_pattern(SegmentType::Bitstring, Dest::Bits(dst), opts)
    }

    /// Expect one UTF-8 encoded code point.
    pub fn utf8(self, dst: &'d mut char, opts: &[SegmentOpt]) -> Self {
        self.add_pattern(SegmentType::Utf8, Dest::Char(dst), opts)
    }

    /// Expect one UTF-16 encoded code point (surrogate pairs included).
    pub fn utf16(self, dst: &'d mut char, opts: &[SegmentOpt]) -> Self {
        self.add_pattern(SegmentType::Utf16, Dest::Char(dst), opts)
    }

    /// Expect one UTF-32 encoded code point.
    pub fn utf32(self, dst: &'d mut char, opts: &[SegmentOpt]) -> Self {
        self.add_pattern(SegmentType::Utf32, Dest::Char(dst), opts)
    }

    /// Bind all remaining input as bytes; the remainder must be
    /// byte-aligned.
    pub fn rest_binary(self, dst: &'d mut Vec<u8>) -> Self {
        self.add_pattern(SegmentType::RestBinary, Dest::Bytes(dst), &[])
    }

    /// Bind all remaining input as a bitstring.
    pub fn rest_bitstring(self, dst: &'d mut BitString) -> Self {
        self.add_pattern(SegmentType::RestBitstring, Dest::Bits(dst), &[])
    }

    /// Decode a segment and throw the value away (pattern wildcard).
    pub fn skip(self, opts: &[SegmentOpt]) -> Self {
        let ty = opts
            .iter()
            .rev()
            .find_map(|o| match o {
                SegmentOpt::Type(t) => Some(*t),
                _ => None,
            })
            .unwrap_or(SegmentType::Integer);
        self.add_pattern(ty, Dest::Skip, opts)
    }

    /// Run the pattern against `input` and return the residual bits.
    ///
    /// Dynamic sizes are resolved against names bound by earlier
    /// integer segments (see [`SegmentOpt::Name`]); each segment is
    /// then validated and decoded in order. The first failure aborts
    /// the match — see the type-level note on destination state.
    pub fn match_bits(mut self, input: &BitString) -> Result<BitString> {
        let mut reader = BitReader::new(input);
        let mut env = Bindings::new();
        for pattern in &mut self.patterns {
            let segment = &mut pattern.segment;
            if let Some(dynamic) = &segment.dynamic_size {
                let resolved = match dynamic {
                    DynamicSize::Name(name) => expr::eval_name(name, &env)?,
                    DynamicSize::Expression(e) => expr::eval_expression(e, &env)?,
                };
                segment.size = usize::try_from(resolved).map_err(|_| Error::InvalidSize {
                    size: usize::MAX,
                    msg: "dynamic size does not fit",
                })?;
                segment.size_specified = true;
            }
            validate(segment)?;
            log_trace!(
                "match {:?} ({} bits) at bit {}",
                segment.segment_type(),
                segment.effective_bits(),
                reader.bits_consumed()
            );
            decode_segment(segment, &mut pattern.dest, &mut reader, &mut env)?;
        }
        Ok(reader.read_rest())
    }
}

fn decode_segment(
    segment: &Segment,
    dest: &mut Dest<'_>,
    reader: &mut BitReader<'_>,
    env: &mut Bindings,
) -> Result<()> {
    // the validator assigned a type
    let ty = segment.ty.unwrap_or(SegmentType::Integer);
    let result = match ty {
        SegmentType::Integer => {
            let decoded = integer::decode(segment, reader)?;
            integer::store(dest, &decoded)?;
            if let Some(name) = &segment.name {
                bind(env, name, &decoded)?;
            }
            Ok(())
        }
        SegmentType::Float => float::decode_into(segment, dest, reader),
        SegmentType::Binary => bytes::decode_binary(segment, dest, reader),
        SegmentType::Bitstring => bytes::decode_bitstring(segment, dest, reader),
        SegmentType::Utf8 | SegmentType::Utf16 | SegmentType::Utf32 => {
            utf::decode_into(ty, segment, dest, reader)
        }
        SegmentType::RestBinary => bytes::decode_rest_binary(dest, reader),
        SegmentType::RestBitstring => bytes::decode_rest_bitstring(dest, reader),
    };
    if let Err(_e) = &result {
        log_error!("decoding {:?} segment failed: {}", ty, _e);
    }
    result
}

fn bind(env: &mut Bindings, name: &str, decoded: &Decoded) -> Result<()> {
    let value = match *decoded {
        Decoded::Unsigned(v) => u64::try_from(v).ok(),
        Decoded::Signed(v) => u64::try_from(v).ok(),
    }
    .ok_or(Error::Overflow {
        msg: "bound name does not fit a size value",
    })?;
    env.insert(name.to_string(), value);
    Ok(())
}
