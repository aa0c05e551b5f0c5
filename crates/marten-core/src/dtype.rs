use std::fmt;

use num_complex::{Complex32, Complex64};

// DType — Supported element kinds
//
// Every array has a DType that determines its element size and numeric
// behavior. The kind set mirrors the scientific-analysis datasets the
// engine models:
//
//   I8/I16/I32/I64 — signed integers
//   U8/U16/U32/U64 — unsigned integers
//   F32/F64        — IEEE floats
//   C64/C128       — complex numbers (pairs of f32 / f64)
//   Bool           — booleans, also the element kind of index masks
//
// Compound (structured) elements are not a DType: they are a layout-level
// reinterpretation handled by `CompoundArray`.

/// Enum of all supported element kinds.
///
/// Stored inside every array so operations dispatch to the correct typed
/// implementation at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    C64,
    C128,
    Bool,
}

impl DType {
    /// Size of one element in bytes.
    pub fn size_in_bytes(&self) -> usize {
        match self {
            DType::I8 | DType::U8 | DType::Bool => 1,
            DType::I16 | DType::U16 => 2,
            DType::I32 | DType::U32 | DType::F32 => 4,
            DType::I64 | DType::U64 | DType::F64 | DType::C64 => 8,
            DType::C128 => 16,
        }
    }

    /// Whether this kind is a real floating-point kind.
    pub fn is_float(&self) -> bool {
        matches!(self, DType::F32 | DType::F64)
    }

    /// Whether this kind is complex.
    pub fn is_complex(&self) -> bool {
        matches!(self, DType::C64 | DType::C128)
    }

    /// Whether this kind is a signed or unsigned integer.
    pub fn is_int(&self) -> bool {
        matches!(
            self,
            DType::I8
                | DType::I16
                | DType::I32
                | DType::I64
                | DType::U8
                | DType::U16
                | DType::U32
                | DType::U64
        )
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DType::I8 => "i8",
            DType::I16 => "i16",
            DType::I32 => "i32",
            DType::I64 => "i64",
            DType::U8 => "u8",
            DType::U16 => "u16",
            DType::U32 => "u32",
            DType::U64 => "u64",
            DType::F32 => "f32",
            DType::F64 => "f64",
            DType::C64 => "c64",
            DType::C128 => "c128",
            DType::Bool => "bool",
        };
        write!(f, "{}", s)
    }
}

// Scalar — One element value of any kind
//
// Scalars cross the boundary between the typed storage buffers and the
// kind-agnostic engine code: element reads produce a Scalar, element writes
// cast a Scalar to the destination kind. Conversions are explicit — there
// is no implicit coercion between 0-d arrays and native numbers.

/// A single element value, tagged with its kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    C64(Complex32),
    C128(Complex64),
    Bool(bool),
}

impl Scalar {
    /// The kind of this value.
    pub fn dtype(&self) -> DType {
        match self {
            Scalar::I8(_) => DType::I8,
            Scalar::I16(_) => DType::I16,
            Scalar::I32(_) => DType::I32,
            Scalar::I64(_) => DType::I64,
            Scalar::U8(_) => DType::U8,
            Scalar::U16(_) => DType::U16,
            Scalar::U32(_) => DType::U32,
            Scalar::U64(_) => DType::U64,
            Scalar::F32(_) => DType::F32,
            Scalar::F64(_) => DType::F64,
            Scalar::C64(_) => DType::C64,
            Scalar::C128(_) => DType::C128,
            Scalar::Bool(_) => DType::Bool,
        }
    }

    /// Real part as f64. Integer and boolean values widen; complex values
    /// drop their imaginary part.
    pub fn to_f64(self) -> f64 {
        match self {
            Scalar::I8(v) => v as f64,
            Scalar::I16(v) => v as f64,
            Scalar::I32(v) => v as f64,
            Scalar::I64(v) => v as f64,
            Scalar::U8(v) => v as f64,
            Scalar::U16(v) => v as f64,
            Scalar::U32(v) => v as f64,
            Scalar::U64(v) => v as f64,
            Scalar::F32(v) => v as f64,
            Scalar::F64(v) => v,
            Scalar::C64(v) => v.re as f64,
            Scalar::C128(v) => v.re,
            Scalar::Bool(v) => v as u8 as f64,
        }
    }

    /// Imaginary part as f64 (zero for every real kind).
    pub fn imag_f64(self) -> f64 {
        match self {
            Scalar::C64(v) => v.im as f64,
            Scalar::C128(v) => v.im,
            _ => 0.0,
        }
    }

    /// Value as i64. Floats truncate toward zero (saturating at the i64
    /// range), `u64` values wrap bit-wise, complex values use the real part.
    pub fn to_i64(self) -> i64 {
        match self {
            Scalar::I8(v) => v as i64,
            Scalar::I16(v) => v as i64,
            Scalar::I32(v) => v as i64,
            Scalar::I64(v) => v,
            Scalar::U8(v) => v as i64,
            Scalar::U16(v) => v as i64,
            Scalar::U32(v) => v as i64,
            Scalar::U64(v) => v as i64,
            Scalar::F32(v) => v as i64,
            Scalar::F64(v) => v as i64,
            Scalar::C64(v) => v.re as i64,
            Scalar::C128(v) => v.re as i64,
            Scalar::Bool(v) => v as i64,
        }
    }

    /// Value as Complex64.
    pub fn to_c128(self) -> Complex64 {
        match self {
            Scalar::C64(v) => Complex64::new(v.re as f64, v.im as f64),
            Scalar::C128(v) => v,
            other => Complex64::new(other.to_f64(), 0.0),
        }
    }

    /// Truthiness: any non-zero value (real or imaginary) is true.
    pub fn to_bool(self) -> bool {
        match self {
            Scalar::Bool(v) => v,
            Scalar::C64(v) => v.re != 0.0 || v.im != 0.0,
            Scalar::C128(v) => v.re != 0.0 || v.im != 0.0,
            other if other.dtype().is_int() => other.to_i64() != 0,
            other => other.to_f64() != 0.0,
        }
    }

    /// Convert to another kind. Follows C-style casting: float → integer
    /// truncates, integer narrowing wraps, complex → real keeps the real
    /// part, numeric → bool is a zero test.
    pub fn cast(self, dtype: DType) -> Scalar {
        match dtype {
            DType::I8 => Scalar::I8(self.to_i64() as i8),
            DType::I16 => Scalar::I16(self.to_i64() as i16),
            DType::I32 => Scalar::I32(self.to_i64() as i32),
            DType::I64 => Scalar::I64(self.to_i64()),
            DType::U8 => Scalar::U8(self.to_i64() as u8),
            DType::U16 => Scalar::U16(self.to_i64() as u16),
            DType::U32 => Scalar::U32(self.to_i64() as u32),
            DType::U64 => Scalar::U64(self.to_i64() as u64),
            DType::F32 => Scalar::F32(self.to_f64() as f32),
            DType::F64 => Scalar::F64(self.to_f64()),
            DType::C64 => {
                let c = self.to_c128();
                Scalar::C64(Complex32::new(c.re as f32, c.im as f32))
            }
            DType::C128 => Scalar::C128(self.to_c128()),
            DType::Bool => Scalar::Bool(self.to_bool()),
        }
    }

    /// Numeric equality across kinds. Integer and boolean operands compare
    /// exactly (no float rounding); any float or complex operand lifts both
    /// sides to Complex64, so NaN never compares equal.
    pub fn num_eq(self, other: Scalar) -> bool {
        fn exact(s: Scalar) -> Option<i128> {
            match s {
                Scalar::U64(v) => Some(v as i128),
                Scalar::Bool(v) => Some(v as i128),
                other if other.dtype().is_int() => Some(other.to_i64() as i128),
                _ => None,
            }
        }
        match (exact(self), exact(other)) {
            (Some(a), Some(b)) => a == b,
            _ => self.to_c128() == other.to_c128(),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::I8(v) => write!(f, "{}", v),
            Scalar::I16(v) => write!(f, "{}", v),
            Scalar::I32(v) => write!(f, "{}", v),
            Scalar::I64(v) => write!(f, "{}", v),
            Scalar::U8(v) => write!(f, "{}", v),
            Scalar::U16(v) => write!(f, "{}", v),
            Scalar::U32(v) => write!(f, "{}", v),
            Scalar::U64(v) => write!(f, "{}", v),
            Scalar::F32(v) => write!(f, "{}", v),
            Scalar::F64(v) => write!(f, "{}", v),
            Scalar::C64(v) => write!(f, "{}", v),
            Scalar::C128(v) => write!(f, "{}", v),
            Scalar::Bool(v) => write!(f, "{}", v),
        }
    }
}

// Element — Trait that connects Rust types to the DType enum
//
// The bridge between Rust's type system and the runtime DType. Implementing
// it for i32, f64, Complex64, etc. lets constructors like
//
//   Array::from_vec(vec![1i32, 2, 3], 3)
//
// determine the element kind from the data, and typed extraction
// (`to_vec::<f64>()`) check the kind it expects.

/// Trait implemented by Rust types that can be stored in an array.
pub trait Element: Copy + Send + Sync + PartialEq + std::fmt::Debug + 'static {
    /// The corresponding DType variant.
    const DTYPE: DType;

    /// Wrap this value as a Scalar.
    fn into_scalar(self) -> Scalar;

    /// Extract a value of this type from a Scalar, casting between kinds.
    fn from_scalar(s: Scalar) -> Self;
}

macro_rules! int_element {
    ($t:ty, $dt:ident) => {
        impl Element for $t {
            const DTYPE: DType = DType::$dt;
            fn into_scalar(self) -> Scalar {
                Scalar::$dt(self)
            }
            fn from_scalar(s: Scalar) -> Self {
                s.to_i64() as $t
            }
        }
    };
}

macro_rules! float_element {
    ($t:ty, $dt:ident) => {
        impl Element for $t {
            const DTYPE: DType = DType::$dt;
            fn into_scalar(self) -> Scalar {
                Scalar::$dt(self)
            }
            fn from_scalar(s: Scalar) -> Self {
                s.to_f64() as $t
            }
        }
    };
}

int_element!(i8, I8);
int_element!(i16, I16);
int_element!(i32, I32);
int_element!(i64, I64);
int_element!(u8, U8);
int_element!(u16, U16);
int_element!(u32, U32);
int_element!(u64, U64);
float_element!(f32, F32);
float_element!(f64, F64);

impl Element for Complex32 {
    const DTYPE: DType = DType::C64;
    fn into_scalar(self) -> Scalar {
        Scalar::C64(self)
    }
    fn from_scalar(s: Scalar) -> Self {
        let c = s.to_c128();
        Complex32::new(c.re as f32, c.im as f32)
    }
}

impl Element for Complex64 {
    const DTYPE: DType = DType::C128;
    fn into_scalar(self) -> Scalar {
        Scalar::C128(self)
    }
    fn from_scalar(s: Scalar) -> Self {
        s.to_c128()
    }
}

impl Element for bool {
    const DTYPE: DType = DType::Bool;
    fn into_scalar(self) -> Scalar {
        Scalar::Bool(self)
    }
    fn from_scalar(s: Scalar) -> Self {
        s.to_bool()
    }
}

impl<T: Element> From<T> for Scalar {
    fn from(v: T) -> Self {
        v.into_scalar()
    }
}
