pub mod admin;
pub mod buy;
pub mod claim_reward;
pub mod draw_period;
pub mod prepare_period;
pub mod randomness;
pub mod views;

pub use admin::*;
pub use buy::*;
pub use claim_reward::*;
pub use draw_period::*;
pub use prepare_period::*;
pub use randomness::*;
pub use views::*;
