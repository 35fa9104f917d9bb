// CONTROLLER: Input, navigation, and the per-frame update
pub mod input;
pub mod navigation;
pub mod broadcaster;
pub mod frame_loop;

pub use input::{Control, InputEvent, KeyBindings, KeyState, MouseDragState};
pub use navigation::{CameraOrientation, NavigationController};
pub use broadcaster::{Animatable, UniformBroadcaster};
pub use frame_loop::FrameLoopContext;
