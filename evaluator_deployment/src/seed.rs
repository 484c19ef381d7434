use std::fmt;

use ethers::{abi::Token, types::U256};
use rand::{
    rngs::{OsRng, SmallRng},
    Rng, RngCore, SeedableRng,
};

/// Number of records pushed to each evaluator
pub const SEED_RECORD_COUNT: usize = 20;
/// Length (in hex chars) of each generated name
pub const SEED_NAME_LEN: usize = 15;

const MAX_LEGS: u8 = 4;

/// Four parallel sequences of equal length, one entry per record
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeedData {
    pub names: Vec<String>,
    pub legs: Vec<u8>,
    pub sex: Vec<u8>,
    pub wings: Vec<u8>,
}

/// `len` hex chars from `len` bytes of OS randomness
fn random_hex_name(len: usize) -> String {
    let mut bytes = vec![0u8; len];
    OsRng.fill_bytes(&mut bytes);
    let mut name = hex::encode(bytes);
    name.truncate(len);
    name
}

impl SeedData {
    /// Numeric fields only need to be uniform, not unpredictable
    pub fn generate() -> Self {
        Self::generate_with(SEED_RECORD_COUNT, &mut SmallRng::from_entropy())
    }

    /// Names always come from the OS CSPRNG; `rng` only drives the numeric fields
    pub fn generate_with(count: usize, rng: &mut impl Rng) -> Self {
        let mut seed = Self {
            names: Vec::with_capacity(count),
            legs: Vec::with_capacity(count),
            sex: Vec::with_capacity(count),
            wings: Vec::with_capacity(count),
        };

        for _ in 0..count {
            seed.names.push(random_hex_name(SEED_NAME_LEN));
            seed.legs.push(rng.gen_range(0..=MAX_LEGS));
            seed.sex.push(rng.gen_range(0..2));
            seed.wings.push(rng.gen_range(0..2));
        }

        seed
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// ABI args of `setRandomValuesStore(string[], uint256[], uint256[], uint256[])`
    pub fn to_tokens(&self) -> Vec<Token> {
        let uints = |values: &[u8]| {
            Token::Array(values.iter().map(|v| Token::Uint(U256::from(*v))).collect())
        };

        vec![
            Token::Array(self.names.iter().cloned().map(Token::String).collect()),
            uints(&self.legs),
            uints(&self.sex),
            uints(&self.wings),
        ]
    }
}

impl fmt::Display for SeedData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:?}", self.names)?;
        writeln!(f, "{:?}", self.legs)?;
        writeln!(f, "{:?}", self.sex)?;
        write!(f, "{:?}", self.wings)
    }
}
