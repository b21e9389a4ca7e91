pub mod expression;
pub mod filter;
