// Copyright (c) 2025 Pablo Soto.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod cli;
pub mod commands;
pub mod fixed;
pub mod goals;
pub mod ledger;
pub mod models;
pub mod normalize;
pub mod prefs;
pub mod store;
pub mod utils;
