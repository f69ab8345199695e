// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
pub mod config;
pub mod constants;
pub mod error;
pub mod id;
pub mod kubernetes;
pub mod provider;
pub mod resources;
pub mod rpc;
pub mod schema;
pub mod state;
pub mod types;

#[cfg(test)]
mod acctest;
#[cfg(test)]
mod test_utils;
