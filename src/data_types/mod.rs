pub mod group;
pub mod materialized;
pub mod plot_configs;
pub mod range;
pub mod series;
pub mod store;

pub use group::*;
pub use materialized::*;
pub use plot_configs::*;
pub use range::*;
pub use series::*;
pub use store::*;
