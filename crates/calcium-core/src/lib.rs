pub mod align;
pub mod consts;
pub mod detection;
pub mod error;
pub mod frame;
pub mod io;
pub mod measure;
pub mod pipeline;
pub mod stack;
