pub mod map;
pub mod publish;
pub mod ref_count;
