pub mod diagram;
pub mod export;
pub mod preview;
pub mod util;
