//! # sorng-epc – EPAM Orchestration (Maestro) client
//!
//! Talks to the Maestro CLI endpoint: HMAC-signed form POSTs in, XML status
//! envelopes out.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │  ComputeClient  (compute.rs)                     │
//! │  └── instances · key pairs · images · shapes ·   │
//! │      projects · regions                          │
//! ├──────────────────────────────────────────────────┤
//! │  MaestroClient  (client.rs)                      │
//! │  ├── call    – signed POST, raw reply            │
//! │  └── invoke  – call + envelope decode            │
//! ├──────────────────────────────────────────────────┤
//! │  MaestroSigner (signing.rs)  │ Envelope          │
//! │  └── hmac-sha256 / date      │ (envelope.rs)     │
//! └──────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use sorng_epc::{ComputeClient, Credentials, EpcConfig, Placement};
//!
//! # async fn example() -> sorng_epc::EpcResult<()> {
//! let config = EpcConfig::new(
//!     Credentials::new("access-id", "access-secret"),
//!     Placement::new("MY-PROJECT", "EPAM-BY1", "CentOS7_64-bit", "SMALL"),
//! );
//! let compute = ComputeClient::from_config(&config)?;
//!
//! for image in compute.images().await? {
//!     println!("{} ({})", image.id, image.description);
//! }
//! # Ok(())
//! # }
//! ```

pub mod action;
pub mod client;
pub mod compute;
pub mod config;
pub mod envelope;
pub mod error;
pub mod signing;
pub mod types;

// ── Re-exports for ergonomic access ─────────────────────────────────────

pub use action::{Action, InstanceAction};
pub use client::{FormParams, MaestroClient, MaestroResponse};
pub use compute::ComputeClient;
pub use config::{Credentials, EpcConfig, Placement};
pub use envelope::{decode, Envelope, STATUS_OK};
pub use error::{EpcError, EpcResult};
pub use signing::{format_date, sign, MaestroSigner};
pub use types::{Image, Instance, Key, Project, Region, Shape};
