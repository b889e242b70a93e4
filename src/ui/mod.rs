pub mod pipe;
pub mod render;
pub mod screen;
pub mod styles;
