pub mod change;
pub mod changes;

pub use change::Change;
pub use changes::Changes;
