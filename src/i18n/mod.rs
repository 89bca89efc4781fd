// SPDX-License-Identifier: MPL-2.0
//! Localization support via Fluent.

pub mod fluent;
