// Copyright (c) 2025 Pablo Soto.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod config;
pub mod entry;
pub mod exporter;
pub mod fixed;
pub mod goal;
pub mod importer;
pub mod profile;
pub mod report;
