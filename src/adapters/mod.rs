// Adapters layer: concrete implementations for external systems (REST backend, memory, CSV sheets)

pub mod http;
pub mod memory;
pub mod sheet;
