pub mod enrichment;
pub mod projector;
