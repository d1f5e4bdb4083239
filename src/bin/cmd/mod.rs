// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! CLI subcommands.

mod inspect;
mod metadata;
mod upgrade;
mod validate;

pub use inspect::InspectCmd;
pub use metadata::MetadataCmd;
pub use upgrade::UpgradeCmd;
pub use validate::ValidateCmd;
