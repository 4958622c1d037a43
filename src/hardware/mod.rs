//! Hand commander abstraction and drivers.
//!
//! [`HandCommander`] is the dispatch seam between the teleoperation core
//! and whatever drives the hand. The console ships with [`mock::MockHand`];
//! a real transport would implement the same trait. The commander is
//! responsible for safety-checking the targets it is sent before they
//! reach hardware or controllers.

pub mod mock;

use crate::core::JointSnapshot;
use crate::error::HandResult;
use async_trait::async_trait;

/// Dispatcher for joint targets and source of the current pose.
///
/// All methods take `&self`; implementations use interior mutability and
/// must be safe to share behind an `Arc` across the GUI thread and the
/// runtime.
#[async_trait]
pub trait HandCommander: Send + Sync {
    /// The joints this commander drives.
    fn joint_names(&self) -> Vec<String>;

    /// The hand's current joint positions.
    async fn current_pose(&self) -> HandResult<JointSnapshot>;

    /// Dispatches joint targets toward the controllers.
    ///
    /// Joints absent from `targets` keep their previous targets. Unknown
    /// joint names are ignored with a warning rather than rejected, so a
    /// partial or over-wide snapshot still moves the joints it can.
    async fn send_joint_targets(&self, targets: &JointSnapshot) -> HandResult<()>;
}
