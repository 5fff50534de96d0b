pub mod decompose;
pub mod discard;
pub mod shanten;
pub mod ukeire;
