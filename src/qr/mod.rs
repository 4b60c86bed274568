pub mod render;

pub use render::{code_for, QrRenderClient, DEFAULT_RENDER_URL};
