pub mod acquire;
pub mod cancel;
pub mod done;

pub use acquire::acquire;
pub use cancel::cancel;
pub use done::done;
