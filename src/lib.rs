//! Observable values with publish, behavior and replay subjects.
//!
//! Subscriptions are plain callbacks receiving `(new_value, old_value)` and are owned by the
//! returned [`Disposable`]. Dropping or disposing it ends the subscription, and a
//! [`DisposeBag`] ends many at once.
//!
//! ```
//! use rxbind::prelude::*;
//!
//! let bag = DisposeBag::new();
//! let temperature = Variable::new(20);
//!
//! temperature
//!     .subscribe(|value, old| println!("{old:?} -> {value}"))
//!     .disposed_by(&bag);
//!
//! temperature.update(21);
//! ```

mod bind;
pub mod disposable;
pub mod observable;
pub mod stream;
pub mod subject;

pub use disposable::{DisposeBag, Disposable};
pub use observable::Observable;
pub use subject::Subject;

pub mod prelude {
    pub use crate::disposable::*;
    pub use crate::observable::*;
    pub use crate::stream::*;
    pub use crate::subject::behavior_subject::*;
    pub use crate::subject::publish_subject::*;
    pub use crate::subject::replay_subject::*;
    pub use crate::subject::*;
}
