//! Missing-value imputation.

mod neighbor;

pub use neighbor::NeighborImputer;
