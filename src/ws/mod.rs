//! WebSocket layer: the device session protocol.
//!
//! Devices connect at `/` (or `/ws`). Each connection gets one
//! [`session::Session`] running a receive duty (sensor frames in, acks out)
//! and a send duty (LED commands out) over a shared [`writer::FrameWriter`].
//! The [`supervisor`] accepts connections and tracks live sessions in the
//! [`registry::SessionRegistry`].

pub mod handler;
pub mod messages;
pub mod registry;
pub mod session;
pub mod supervisor;
pub mod writer;
