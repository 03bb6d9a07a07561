/// Byte order of a multi-byte segment.
///
/// `Native` is a request to use the byte order of the machine running the
/// codec; it is resolved to [`Endianness::Big`] or [`Endianness::Little`]
/// when a segment is encoded or decoded, never stored in output.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Endianness {
    /// Most significant byte first (network order). The default.
    Big,
    /// Least significant byte first.
    Little,
    /// The host byte order, resolved at call time.
    Native,
}

impl Endianness {
    /// Collapse `Native` to the host's byte order.
    ///
    /// `Big` and `Little` are returned unchanged.
    #[inline]
    pub const fn resolve(self) -> Endianness {
        match self {
            Endianness::Native => native_endianness(),
            other => other,
        }
    }

    /// True if this endianness, once resolved, is little-endian.
    #[inline]
    pub const fn is_little(self) -> bool {
        matches!(self.resolve(), Endianness::Little)
    }

    /// Lowercase name of the (unresolved) byte order.
    pub const fn as_str(self) -> &'static str {
        match self {
            Endianness::Big => "big",
            Endianness::Little => "little",
            Endianness::Native => "native",
        }
    }
}

impl Default for Endianness {
    fn default() -> Self {
        Endianness::Big
    }
}

/// The host's byte order, as observed by `native` segments.
///
/// Always returns [`Endianness::Big`] or [`Endianness::Little`]. The value
/// is a compile-time constant of the target, so "once per process" holds
/// trivially.
#[inline]
pub const fn native_endianness() -> Endianness {
    #[cfg(target_endian = "little")]
    {
        Endianness::Little
    }
    #[cfg(target_endian = "big")]
    {
        Endianness::Big
    }
}

#[cfg(test)]
mod tests {
    use super::{native_endianness, Endianness};

    #[test]
    fn resolve_collapses_native() {
        let native = Endianness::Native.resolve();
        assert_ne!(native, Endianness::Native);
        assert_eq!(native, native_endianness());
        assert_eq!(Endianness::Big.resolve(), Endianness::Big);
        assert_eq!(Endianness::Little.resolve(), Endianness::Little);
    }

    #[test]
    fn names() {
        assert_eq!(Endianness::Big.as_str(), "big");
        assert_eq!(Endianness::Little.as_str(), "little");
        assert_eq!(Endianness::Native.as_str(), "native");
        // the host order is observable as one of the two concrete names
        let host = native_endianness().as_str();
        assert!(host == "big" || host == "little");
    }

    #[test]
    fn default_is_big() {
        assert_eq!(Endianness::default(), Endianness::Big);
    }
}
