//! Native capability flags
//!
//! Each flag names one family of composite operations. A backend that
//! overrides the [`Ops`](crate::Ops) default for a family lists its flag in
//! [`Backend::NATIVE`](crate::Backend::NATIVE); every family it leaves out
//! runs the backend-independent code in [`generic`](crate::generic).

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Operation families with a backend-native implementation
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Native: u64 {
        /// `bit_cast`, `resize_bit_cast`
        const BIT_CAST = 1 << 0;
        /// `iota`
        const IOTA = 1 << 1;
        /// `not`, `xor3`, `or3`, `or_and`
        const LOGICAL3 = 1 << 2;
        /// `if_vec_then_else`, `copy_sign`, `copy_sign_to_abs`
        const BITWISE_IF_THEN_ELSE = 1 << 3;
        /// `if_then_else` and its zeroing and sign-driven variants
        const IF_THEN_ELSE = 1 << 4;
        /// Logical operators on masks
        const MASK_LOGICAL = 1 << 5;
        /// `neg`, `abs`, `abs_diff`
        const NEG_ABS = 1 << 6;
        /// `mul_add`, `neg_mul_add`, `mul_sub`, `neg_mul_sub`
        const MUL_ADD = 1 << 7;
        /// `saturated_add`, `saturated_sub`
        const SATURATED_ADD_SUB = 1 << 8;
        /// `average_round`
        const AVERAGE_ROUND = 1 << 9;
        /// Immediate and same-count shifts, `broadcast_sign_bit`
        const SHIFT_IMMEDIATE = 1 << 10;
        /// `rotate_right`
        const ROTATE = 1 << 11;
        /// `ne`, `gt`, `le`, `ge`
        const COMPARE_DERIVED = 1 << 12;
        /// `round`, `trunc`, `ceil`, `floor`
        const ROUND = 1 << 13;
        /// `nearest_int`
        const NEAREST_INT = 1 << 14;
        /// `is_nan`, `is_inf`, `is_finite`
        const FLOAT_CLASSIFY = 1 << 15;
        /// `masked_load`, `masked_load_or`
        const MASKED_LOAD = 1 << 16;
        /// `load_n`, `load_n_or`, `store_n`
        const LOAD_STORE_N = 1 << 17;
        /// `blended_store`
        const BLENDED_STORE = 1 << 18;
        /// `stream`
        const STREAM = 1 << 19;
        /// `extract_lane`, `insert_lane`, `get_lane`
        const LANE_ACCESS = 1 << 20;
        /// `broadcast`
        const BROADCAST = 1 << 21;
        /// `table_lookup_bytes_or0`
        const TABLE_LOOKUP_BYTES_OR0 = 1 << 22;
        /// `table_lookup_lanes`, `two_tables_lookup_lanes`
        const TABLE_LOOKUP_LANES = 1 << 23;
        /// `reverse`
        const REVERSE = 1 << 24;
        /// `reverse2`, `reverse4`, `reverse8`
        const REVERSE2_8 = 1 << 25;
        /// `reverse_lane_bytes`
        const REVERSE_LANE_BYTES = 1 << 26;
        /// `reverse_bits`
        const REVERSE_BITS = 1 << 27;
        /// `interleave_lower`, `interleave_upper`, `zip_lower`, `zip_upper`
        const INTERLEAVE = 1 << 28;
        /// `odd_even`, `dup_even`, `dup_odd`
        const ODD_EVEN = 1 << 29;
        /// Halves, concatenation, `combine_shift_right_lanes`
        const CONCAT = 1 << 30;
        /// `slide_up_lanes`, `slide_down_lanes`, `slide1_up`, `slide1_down`
        const SLIDE = 1 << 31;
        /// The `compress` family
        const COMPRESS = 1 << 32;
        /// `expand`, `load_expand`
        const EXPAND = 1 << 33;
        /// `load_interleaved{2,3,4}`, `store_interleaved{2,3,4}`
        const LOAD_STORE_INTERLEAVED = 1 << 34;
        /// AES round functions
        const AES = 1 << 35;
        /// `population_count`
        const POPCNT = 1 << 36;
        /// Leading/trailing zero counts
        const LEADING_ZERO_COUNT = 1 << 37;
        /// Horizontal reductions
        const REDUCTIONS = 1 << 38;
        /// Mask bit extraction and first/last-true queries
        const MASK_BITS = 1 << 39;
        /// `first_n` and the `set_*_first` family
        const FIRST_N = 1 << 40;
        /// Promotion to wider lanes, demotion and truncation to narrower ones
        const PROMOTE_DEMOTE = 1 << 41;
        /// Indexed gather and scatter
        const GATHER_SCATTER = 1 << 42;
        /// `sums_of8_abs_diff`
        const SUMS_OF_8_ABS_DIFF = 1 << 43;
    }
}

impl Native {
    /// Flag names, in bit order
    pub fn names(self) -> Vec<&'static str> {
        self.iter_names().map(|(name, _)| name).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_are_distinct() {
        let mut seen = 0u64;
        for (_, flag) in Native::all().iter_names() {
            assert_eq!(seen & flag.bits(), 0);
            seen |= flag.bits();
        }
        assert_eq!(seen, Native::all().bits());
    }

    #[test]
    fn test_names() {
        let set = Native::COMPRESS | Native::AES;
        assert_eq!(set.names(), vec!["COMPRESS", "AES"]);
        assert!(Native::empty().names().is_empty());
    }

    #[test]
    fn test_serde_round_trip() {
        let set = Native::ROUND | Native::REDUCTIONS;
        let json = serde_json::to_string(&set).unwrap();
        let back: Native = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
    }
}
