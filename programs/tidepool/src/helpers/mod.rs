pub mod dispatch;
pub mod math;
