//! 世界层：接口抽象与内存模拟实现

pub mod sim;
pub mod traits;

pub use sim::SimWorld;
pub use traits::{InventoryResult, ScanResult, ToolResult, WorldInterface};
