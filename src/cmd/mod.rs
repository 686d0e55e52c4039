pub mod extract;
pub mod inspect;
pub mod replay;
