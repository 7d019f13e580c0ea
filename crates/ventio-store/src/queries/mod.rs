// SPDX-FileCopyrightText: 2026 Ventio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query modules for CRUD operations on storage entities.

pub mod flags;
pub mod history;
pub mod subscription;
pub mod usage;
pub mod users;
