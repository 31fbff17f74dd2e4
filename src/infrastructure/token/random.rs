//! Random base-32 tokens
//!
//! Each token carries 130 bits of randomness rendered as 26 characters from
//! `0-9a-v`. The tokens only need to be unique, not secret.

use rand::Rng;

use crate::domain::TokenSource;

const ALPHABET: &[u8; 32] = b"0123456789abcdefghijklmnopqrstuv";

/// Characters per token; 5 bits each
pub const TOKEN_LENGTH: usize = 26;

/// [`TokenSource`] backed by the thread-local RNG
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomTokenSource;

impl RandomTokenSource {
    pub fn new() -> Self {
        Self
    }
}

impl TokenSource for RandomTokenSource {
    fn next_token(&self) -> String {
        let mut rng = rand::thread_rng();

        (0..TOKEN_LENGTH)
            .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
            .collect()
    }
}
