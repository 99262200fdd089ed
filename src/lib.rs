//! # water-quality-gateway
//!
//! WebSocket ingestion gateway for water-quality probes.
//!
//! A probe connects over WebSocket and streams TDS, turbidity and pH
//! reports. Each report is persisted and acknowledged on the same
//! connection, while LED commands from the local operator are pushed back
//! down it. A separate read view lists the stored readings.
//!
//! ## Architecture
//!
//! ```text
//! Probe (WebSocket)                 Browser / HTTP client
//!     │                                  │
//!     ├── Session Supervisor (ws/)       ├── Read View (api/)
//!     ├── Session engine (ws/)           │
//!     │     ├── receive duty ──┐         │
//!     │     └── send duty      │         │
//!     │           │            │         │
//!     │   Command Source       │         │
//!     │   (command/)           │         │
//!     │           │            ▼         ▼
//!     │   Operator panel    Reading Store (persistence/)
//!     │   + console              │
//!     │                          └── PostgreSQL
//! ```

pub mod api;
pub mod app_state;
pub mod command;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod shutdown;
pub mod telemetry;
pub mod ws;
