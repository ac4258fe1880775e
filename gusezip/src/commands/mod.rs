pub mod add;
pub mod cat;
pub mod inspect;
pub mod repack;
