/// Edge weight type. Weights are severity counts and therefore never negative.
pub type Weight = u64;
