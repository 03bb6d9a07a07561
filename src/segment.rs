use crate::{BitString, Endianness};

#[cfg(feature = "bigint")]
#[cfg_attr(docsrs, doc(cfg(feature = "bigint")))]
pub use num_bigint::{BigInt, BigUint, Sign};

/// The datum carried by a segment.
///
/// Encoders dispatch on this variant; the validator rejects (value, type)
/// pairs that make no sense (for ex. a float value in a binary segment).
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// No value. Only valid while assembling a descriptor.
    Null,
    /// Signed integer, up to 128 bits.
    Signed(i128),
    /// Unsigned integer, up to 128 bits.
    Unsigned(u128),
    /// Arbitrary-precision integer. Truncation at the declared width
    /// follows the same two's-complement rule as the primitive variants.
    #[cfg(feature = "bigint")]
    #[cfg_attr(docsrs, doc(cfg(feature = "bigint")))]
    Big(BigInt),
    /// Floating-point value; converted to the declared width on encode.
    Float(f64),
    /// Byte sequence, for binary segments.
    Bytes(Vec<u8>),
    /// Nested bit string, for bitstring segments.
    Bits(BitString),
    /// Text, for UTF segments: encoded as the concatenation of the
    /// per-character encodings.
    Str(String),
}

impl Value {
    /// Short name of the variant, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Signed(_) => "signed integer",
            Value::Unsigned(_) => "unsigned integer",
            #[cfg(feature = "bigint")]
            Value::Big(_) => "big integer",
            Value::Float(_) => "float",
            Value::Bytes(_) => "bytes",
            Value::Bits(_) => "bitstring",
            Value::Str(_) => "string",
        }
    }
}

macro_rules! impl_value_from_uint {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::Unsigned(v as u128)
                }
            }
        )*
    };
}

macro_rules! impl_value_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::Signed(v as i128)
                }
            }
        )*
    };
}

impl_value_from_uint!(u8, u16, u32, u64, u128);
impl_value_from_int!(i8, i16, i32, i64, i128);

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Bytes(v.to_vec())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl From<BitString> for Value {
    fn from(v: BitString) -> Self {
        Value::Bits(v)
    }
}

impl From<char> for Value {
    fn from(v: char) -> Self {
        Value::Unsigned(u32::from(v) as u128)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

#[cfg(feature = "bigint")]
#[cfg_attr(docsrs, doc(cfg(feature = "bigint")))]
impl From<BigInt> for Value {
    fn from(v: BigInt) -> Self {
        Value::Big(v)
    }
}

/// Type of a segment, selecting the encoder/decoder.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SegmentType {
    /// Fixed-width integer, signed or unsigned. The default type.
    Integer,
    /// IEEE-754 float, 16, 32 or 64 bits wide.
    Float,
    /// Whole bytes.
    Binary,
    /// A nested bit string of arbitrary bit length.
    Bitstring,
    /// One Unicode code point as UTF-8 (1–4 bytes).
    Utf8,
    /// One Unicode code point as UTF-16 (2 or 4 bytes, endianness applies).
    Utf16,
    /// One Unicode code point as UTF-32 (4 bytes, endianness applies).
    Utf32,
    /// Match-only: all remaining input, which must be byte-aligned.
    RestBinary,
    /// Match-only: all remaining input.
    RestBitstring,
}

impl SegmentType {
    /// Default segment size in units, where the type has one.
    pub(crate) fn default_size(self) -> Option<usize> {
        match self {
            SegmentType::Integer => Some(8),
            SegmentType::Float => Some(64),
            _ => None,
        }
    }

    /// Default (and for UTF types, only) unit in bits.
    pub(crate) fn default_unit(self) -> u32 {
        match self {
            SegmentType::Binary | SegmentType::RestBinary => 8,
            _ => 1,
        }
    }

    /// True for the three UTF variants.
    pub(crate) fn is_utf(self) -> bool {
        matches!(
            self,
            SegmentType::Utf8 | SegmentType::Utf16 | SegmentType::Utf32
        )
    }
}

/// Late-bound segment size, resolved against the binding environment of
/// the current match call.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DynamicSize {
    /// The value bound under this name.
    Name(String),
    /// An arithmetic expression over bound names (`+`, `*`, parentheses,
    /// unsigned literals).
    Expression(String),
}

/// A single option modifier for [`Segment::new`].
///
/// Modifiers are applied in order, last writer wins.
#[derive(Clone, Debug, PartialEq)]
pub enum SegmentOpt {
    /// Set the size (in units) and mark it explicit.
    Size(usize),
    /// Set the unit (bits per size step) and mark it explicit.
    Unit(u32),
    /// Set integer signedness.
    Signed(bool),
    /// Set the segment type.
    Type(SegmentType),
    /// Set the byte order.
    Endianness(Endianness),
    /// Take the size from a name bound earlier in the match.
    DynamicSize(String),
    /// Take the size from an expression over bound names.
    DynamicSizeExpression(String),
    /// Bind the decoded value under this name for later segments.
    Name(String),
}

/// A typed portion of a bit string: value, type, size × unit, signedness
/// and endianness.
///
/// Segments are plain data. They are assembled through [`Segment::new`]
/// or the `with_*` modifiers, and checked by the validator when a build
/// or match runs; an unchecked segment may be in an inconsistent state.
#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    pub(crate) value: Value,
    pub(crate) ty: Option<SegmentType>,
    pub(crate) size: usize,
    pub(crate) size_specified: bool,
    /// Holds the type default until a unit is given explicitly.
    pub(crate) unit: u32,
    pub(crate) unit_specified: bool,
    pub(crate) signed: bool,
    pub(crate) endianness: Option<Endianness>,
    pub(crate) dynamic_size: Option<DynamicSize>,
    pub(crate) name: Option<String>,
}

impl Segment {
    /// Build a segment from a value and a list of option modifiers.
    ///
    /// Modifiers apply in order (last writer wins); type-based defaults
    /// for size and unit are filled afterwards.
    pub fn new<V: Into<Value>>(value: V, opts: &[SegmentOpt]) -> Self {
        let mut seg = Segment {
            value: value.into(),
            ty: None,
            size: 0,
            size_specified: false,
            unit: 0,
            unit_specified: false,
            signed: false,
            endianness: None,
            dynamic_size: None,
            name: None,
        };
        for opt in opts {
            seg.apply(opt.clone());
        }
        seg.apply_type_defaults();
        // constructed UTF segments never carry a size
        if seg.ty.map_or(false, SegmentType::is_utf) {
            seg.size_specified = false;
        }
        seg
    }

    fn apply(&mut self, opt: SegmentOpt) {
        match opt {
            SegmentOpt::Size(n) => {
                self.size = n;
                self.size_specified = true;
            }
            SegmentOpt::Unit(n) => {
                self.unit = n;
                self.unit_specified = true;
            }
            SegmentOpt::Signed(b) => self.signed = b,
            SegmentOpt::Type(t) => self.ty = Some(t),
            SegmentOpt::Endianness(e) => self.endianness = Some(e),
            SegmentOpt::DynamicSize(name) => self.dynamic_size = Some(DynamicSize::Name(name)),
            SegmentOpt::DynamicSizeExpression(expr) => {
                self.dynamic_size = Some(DynamicSize::Expression(expr))
            }
            SegmentOpt::Name(name) => self.name = Some(name),
        }
    }

    /// Fill size and unit defaults for the current type.
    pub(crate) fn apply_type_defaults(&mut self) {
        if let Some(ty) = self.ty {
            if !self.size_specified {
                if let Some(d) = ty.default_size() {
                    self.size = d;
                }
            }
            if !self.unit_specified {
                self.unit = ty.default_unit();
            }
        }
    }

    /// Set the size (in units). Marks the size as explicitly given.
    pub fn with_size(mut self, n: usize) -> Self {
        self.apply(SegmentOpt::Size(n));
        self
    }

    /// Set the unit (bits per size step). Marks the unit as explicitly given.
    pub fn with_unit(mut self, n: u32) -> Self {
        self.apply(SegmentOpt::Unit(n));
        self
    }

    /// Set integer signedness.
    pub fn with_signed(mut self, signed: bool) -> Self {
        self.apply(SegmentOpt::Signed(signed));
        self
    }

    /// Set the segment type and re-apply type defaults.
    pub fn with_type(mut self, ty: SegmentType) -> Self {
        self.apply(SegmentOpt::Type(ty));
        self.apply_type_defaults();
        self
    }

    /// Set the byte order.
    pub fn with_endianness(mut self, endianness: Endianness) -> Self {
        self.apply(SegmentOpt::Endianness(endianness));
        self
    }

    /// Take the size from a name bound earlier in the match call.
    pub fn with_dynamic_size<S: Into<String>>(mut self, name: S) -> Self {
        self.apply(SegmentOpt::DynamicSize(name.into()));
        self
    }

    /// Take the size from an arithmetic expression over bound names.
    pub fn with_dynamic_size_expression<S: Into<String>>(mut self, expr: S) -> Self {
        self.apply(SegmentOpt::DynamicSizeExpression(expr.into()));
        self
    }

    /// Bind the decoded value under `name` for later pattern segments.
    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.apply(SegmentOpt::Name(name.into()));
        self
    }

    /// The value carried by this segment.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// The segment type, if one has been assigned yet.
    pub fn segment_type(&self) -> Option<SegmentType> {
        self.ty
    }

    /// Effective bit length: size × unit.
    pub fn effective_bits(&self) -> usize {
        self.size * self.unit as usize
    }

    /// The declared (or resolved-default) endianness, `Native` collapsed
    /// to the host order.
    pub(crate) fn resolved_endianness(&self) -> Endianness {
        self.endianness.unwrap_or(Endianness::Big).resolve()
    }
}
