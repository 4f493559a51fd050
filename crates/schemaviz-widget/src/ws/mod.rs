mod sync;

pub use sync::ws_sync;
