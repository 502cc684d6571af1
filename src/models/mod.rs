pub mod club;
pub mod coordinates;
pub mod identity;
pub mod member;
pub mod outcome;
pub mod session_state;
