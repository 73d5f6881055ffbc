//! Netting, reserve application, tiered fees, and the settlement pipeline.

pub mod fees;
pub mod netting;
pub mod pipeline;
