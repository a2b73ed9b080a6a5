pub use alloc::sync::Arc;
