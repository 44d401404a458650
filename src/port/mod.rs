//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!     feed events ──▶│      Application        │
//!                    │  classify · resolve ·   │
//!                    │  validate · cutover     │
//!                    └─────────────────────────┘
//!                      │          │          │
//!                      ▼          ▼          ▼
//!                 ┌────────┐ ┌──────────┐ ┌───────┐
//!                 │  Feed  │ │Historical│ │ Store │
//!                 │control │ │   API    │ │       │
//!                 └────────┘ └──────────┘ └───────┘
//! ```

pub mod inbound;
pub mod outbound;
