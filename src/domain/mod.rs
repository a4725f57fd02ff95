mod account;
mod favorite;
mod ids;
mod money;
mod payment;

pub use account::*;
pub use favorite::*;
pub use ids::*;
pub use money::*;
pub use payment::*;
