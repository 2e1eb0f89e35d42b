pub mod clock;
pub mod photo;
