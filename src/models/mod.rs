pub mod ack;
pub mod application;
pub mod loan;
pub mod user;

pub use ack::*;
pub use application::*;
pub use loan::*;
pub use user::*;
