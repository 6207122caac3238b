// WebSocket module - organized into focused submodules
//
// - handler: WebSocket upgrade handler (entry point)
// - connection: Socket loop, heartbeat, and liveness tracking
// - routes: HTTP route setup (room list, health, metrics, static assets)

mod connection;
mod handler;
mod routes;

pub use handler::websocket_handler;
pub use routes::create_router;
