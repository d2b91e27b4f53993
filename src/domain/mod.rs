pub mod address;
pub mod amount;
pub mod pool;
pub mod receipt;
pub mod state;

pub use address::*;
pub use amount::*;
pub use pool::*;
pub use receipt::*;
pub use state::*;
