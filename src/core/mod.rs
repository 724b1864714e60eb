pub mod device;
pub mod error;
pub mod events;
pub mod format;
pub mod geometry;
pub mod gpu_context;
pub mod host;
pub mod input_adapter;
pub mod key_repeat;
pub mod keymap;
pub mod pipeline;
pub mod present;
pub mod renderer;
pub mod surface;
pub mod surface_renderer;
pub mod texture;

pub use device::{Color, Cursor, VideoDevice};
pub use error::{RendererError, VideoError};
pub use events::{Event, EventQueue, KeyState, PointerAction};
pub use format::PixelFormat;
pub use geometry::{Rect, ScreenGeometry};
pub use gpu_context::GpuContext;
pub use host::{HostHandle, HostMessage};
pub use input_adapter::WinitInput;
pub use key_repeat::{ChannelState, Direction, KeyFilter, KeyRepeat, Transition};
pub use keymap::{Key, KeySym, Keycode};
pub use pipeline::PresentationPipeline;
pub use present::PresentCallback;
pub use renderer::{DrawRect, Placement, Renderer};
pub use surface::{BufferSlot, LogicalSurface, SurfaceDescriptor, VideoFlags};
pub use surface_renderer::{SurfacePresenter, WgpuRenderer};
pub use texture::{CropRect, Filter, GpuTexture, TexelFormat, TextureDescriptor, TextureId};
