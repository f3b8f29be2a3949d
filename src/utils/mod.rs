pub mod clock;
pub mod password;
pub mod reorder;
pub mod token;
