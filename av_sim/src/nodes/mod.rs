//! Built-in node implementations wrapping the world models.

pub mod control;
pub mod dynamics;
pub mod lidar;
pub mod obstacles;
pub mod recorder;
pub mod supervisor;

pub use control::ScriptedControlNode;
pub use dynamics::DynamicsNode;
pub use lidar::LidarNode;
pub use obstacles::ObstacleNode;
pub use recorder::RecorderNode;
pub use supervisor::SupervisorNode;
