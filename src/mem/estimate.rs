//! Memory size calculations for the data structures in this crate.
//!
//! Sizes follow the actual in-memory layout: element payload plus the
//! container overhead of the backing `Vec`/`Box` allocations. Overheads are
//! approximations; they matter for capacity planning, not accounting.

/// Shallow size of a boxed slice header (pointer + length).
const SLICE_HEADER_BYTES: usize = 16;

/// Memory size calculations.
pub struct Estimate;

impl Estimate {
    /// Bytes required for an `i64` array of the given length.
    pub fn size_of_long_array(length: usize) -> usize {
        SLICE_HEADER_BYTES + length * std::mem::size_of::<i64>()
    }

    /// Bytes required for an `f64` array of the given length.
    pub fn size_of_double_array(length: usize) -> usize {
        SLICE_HEADER_BYTES + length * std::mem::size_of::<f64>()
    }

    /// Bytes required for an `i32` array of the given length.
    pub fn size_of_int_array(length: usize) -> usize {
        SLICE_HEADER_BYTES + length * std::mem::size_of::<i32>()
    }

    /// Bytes required for a byte array of the given length.
    pub fn size_of_byte_array(length: usize) -> usize {
        SLICE_HEADER_BYTES + length
    }

    /// Bytes required for an array of page pointers.
    pub fn size_of_object_array(length: usize) -> usize {
        SLICE_HEADER_BYTES + length * std::mem::size_of::<usize>()
    }

    /// Bytes required for a bitset covering `bits` bits.
    pub fn size_of_bitset(bits: usize) -> usize {
        Self::size_of_long_array(crate::mem::BitUtil::ceil_div(bits, 64))
    }

    /// Renders a byte count using binary units, e.g. `1234567` -> `"1205 KiB"`.
    pub fn human_readable(bytes: usize) -> String {
        const UNITS: [&str; 7] = ["Bytes", "KiB", "MiB", "GiB", "TiB", "PiB", "EiB"];
        let mut value = bytes;
        let mut unit = 0;
        while value >= 1024 && unit < UNITS.len() - 1 {
            value /= 1024;
            unit += 1;
        }
        format!("{} {}", value, UNITS[unit])
    }
}
