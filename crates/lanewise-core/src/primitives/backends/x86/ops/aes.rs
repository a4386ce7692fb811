//! AES-NI round instructions

use std::arch::x86_64::*;

use crate::primitives::backends::x86::utils::*;
use crate::vector::Vector;

type State = Vector<u8, 16>;

// Safety for every function here: only compiled with the `aes` target feature,
// and a 16-byte state always fills the register.

pub fn aes_round(state: &State, key: &State) -> State {
    unsafe { from_si(_mm_aesenc_si128(to_si(state), to_si(key))) }
}

pub fn aes_last_round(state: &State, key: &State) -> State {
    unsafe { from_si(_mm_aesenclast_si128(to_si(state), to_si(key))) }
}

pub fn aes_round_inv(state: &State, key: &State) -> State {
    unsafe { from_si(_mm_aesdec_si128(to_si(state), to_si(key))) }
}

pub fn aes_last_round_inv(state: &State, key: &State) -> State {
    unsafe { from_si(_mm_aesdeclast_si128(to_si(state), to_si(key))) }
}

pub fn aes_inv_mix_columns(state: &State) -> State {
    unsafe { from_si(_mm_aesimc_si128(to_si(state))) }
}

pub fn aes_key_gen_assist<const RCON: i32>(v: &State) -> State {
    unsafe { from_si(_mm_aeskeygenassist_si128::<RCON>(to_si(v))) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::{generic, Emu128Backend};

    #[test]
    fn test_matches_table_implementation() {
        let be = Emu128Backend;
        let state = Vector::<u8, 16>::from_array(std::array::from_fn(|i| (i * 17 + 3) as u8));
        let key = Vector::<u8, 16>::from_array(std::array::from_fn(|i| (i * 29 + 11) as u8));
        assert_eq!(aes_round(&state, &key), generic::aes_round(&be, state, key));
        assert_eq!(aes_last_round(&state, &key), generic::aes_last_round(&be, state, key));
        assert_eq!(aes_round_inv(&state, &key), generic::aes_round_inv(&be, state, key));
        assert_eq!(
            aes_last_round_inv(&state, &key),
            generic::aes_last_round_inv(&be, state, key)
        );
        assert_eq!(aes_inv_mix_columns(&state), generic::aes_inv_mix_columns(&be, state));
        assert_eq!(
            aes_key_gen_assist::<0x1B>(&state),
            generic::aes_key_gen_assist::<0x1B, _>(&be, state)
        );
    }
}
