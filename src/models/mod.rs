// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Domain layer: pure data types and validation helpers shared between UI and submission logic.

pub mod catalog;
pub mod notice;
pub mod segment;
