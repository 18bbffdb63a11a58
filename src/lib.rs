//! kvenv - Azure Key Vault secrets as shell environment variables.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── save/update   # Write secrets and tags
//! │   ├── load/clear    # Emit export/unset statements for eval
//! │   ├── list/delete   # Inspect and remove entries
//! │   ├── migrate       # Legacy registry -> tags
//! │   ├── setup         # Write config.toml
//! │   ├── run           # Run a command with secrets injected
//! │   └── output        # Status output (stderr)
//! └── core/             # Core library components
//!     ├── config        # config.toml management
//!     ├── secret        # Entry naming and tag model
//!     ├── resolve       # Identity and tag resolution
//!     ├── registry      # Legacy JSON registry
//!     ├── shell         # Shell export emitter
//!     └── vault/        # Vault trait, az CLI and memory backends
//! ```
//!
//! # Shell integration
//!
//! ```bash
//! eval "$(kvenv load -r myapp)"
//! ```

pub mod cli;
pub mod core;
pub mod error;
